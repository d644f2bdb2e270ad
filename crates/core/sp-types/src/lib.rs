//! Core types for the mHealth platform SDK.
//!
//! This crate provides the foundational types shared by the client, the
//! uploader and the demo runner:
//! - [`ResponseCode`] - Result codes exchanged with the platform
//! - [`MobileUser`] - Identity returned by installation authentication
//! - [`SensorKind`] / [`SensorRegistration`] - Sensors the device registers
//! - [`AwsUploadConfig`] - Object storage and queue settings for uploads
//! - [`UploadNotification`] - Queue message announcing an uploaded file

pub mod aws;
pub mod notification;
pub mod response;
pub mod sensor;
pub mod user;

pub use aws::*;
pub use notification::*;
pub use response::*;
pub use sensor::*;
pub use user::*;
