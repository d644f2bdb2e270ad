//! sp-uploader - verified upload of mHealth files.
//!
//! Uploading a file is a two-step hand-off: the file is stored in S3 under
//! `{environment}/UPLOADS/{studyId}/{filename}`, its ETag is checked against
//! the local MD5, and only then is an SQS message sent announcing the file
//! to the platform.
//!
//! - [`Uploader`] - orchestrates validation, storage, verification and notification
//! - [`FileStore`] / [`S3FileStore`] - object storage seam
//! - [`UploadNotifier`] / [`SqsNotifier`] - queue notification seam
//!
//! # Example
//!
//! ```ignore
//! use sp_types::{AwsUploadConfig, Environment};
//! use sp_uploader::Uploader;
//!
//! let config = AwsUploadConfig::new("mhealth-uploads", "mhealth-files")
//!     .with_credentials(access_key, secret_key)
//!     .with_environment(Environment::Development)
//!     .with_region("us-east-1");
//!
//! let uploader = Uploader::from_config(config).await?;
//! let receipt = uploader.upload_file(&user, path).await?;
//! eprintln!("Uploaded {} ({} bytes)", receipt.key, receipt.bytes);
//! ```

pub mod aws;
pub mod checksum;
pub mod s3;
pub mod sqs;
pub mod uploader;

pub use s3::{FileStore, S3FileStore, StoredObject};
pub use sqs::{SqsNotifier, UploadNotifier};
pub use uploader::{collect_candidates, UploadReceipt, Uploader};
