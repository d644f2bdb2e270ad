//! Object storage for uploaded files.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ServerSideEncryption;
use aws_sdk_s3::Client;
use sp_error::{Result, StorageError};
use sp_types::AwsUploadConfig;
use std::path::Path;
use tracing::debug;

use crate::aws::load_sdk_config;

/// Content type of stored mHealth files.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Content encoding of stored mHealth files.
pub const GZIP_CONTENT_ENCODING: &str = "gzip";

/// What the store reports about a written object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// ETag as returned by the store, quotes included
    pub etag: String,

    /// Size of the uploaded content
    pub bytes: u64,
}

/// Trait for storing a local file under a key.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Upload `path` to `bucket`/`key`.
    async fn put_file(&self, path: &Path, bucket: &str, key: &str) -> Result<StoredObject>;
}

/// S3-backed [`FileStore`].
///
/// Objects are written as gzip-encoded CSV with AES256 server-side
/// encryption.
pub struct S3FileStore {
    client: Client,
}

impl S3FileStore {
    /// Create a store from upload settings.
    pub async fn new(config: &AwsUploadConfig) -> Result<Self> {
        let sdk_config = load_sdk_config(config).await;
        Ok(Self::from_sdk_config(&sdk_config, config.endpoint.is_some()))
    }

    /// Create a store from loaded SDK configuration.
    ///
    /// Path-style addressing is forced for custom endpoints (LocalStack).
    pub fn from_sdk_config(sdk_config: &SdkConfig, path_style: bool) -> Self {
        let s3_config = aws_sdk_s3::config::Builder::from(sdk_config)
            .force_path_style(path_style)
            .build();
        Self::with_client(Client::from_conf(s3_config))
    }

    /// Create a store with an existing client (useful for testing).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FileStore for S3FileStore {
    async fn put_file(&self, path: &Path, bucket: &str, key: &str) -> Result<StoredObject> {
        let bytes = tokio::fs::metadata(path)
            .await
            .map_err(|e| StorageError::Io(format!("{}: {e}", path.display())))?
            .len();

        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::Io(format!("{}: {e}", path.display())))?;

        debug!(bucket = %bucket, key = %key, bytes, "Putting object");

        let output = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .content_type(CSV_CONTENT_TYPE)
            .content_encoding(GZIP_CONTENT_ENCODING)
            .server_side_encryption(ServerSideEncryption::Aes256)
            .send()
            .await
            .map_err(|e| StorageError::Upload(format!("s3://{bucket}/{key}: {e}")))?;

        let etag = output
            .e_tag()
            .ok_or_else(|| StorageError::Upload(format!("s3://{bucket}/{key}: no ETag returned")))?
            .to_string();

        Ok(StoredObject { etag, bytes })
    }
}
