//! Error types and classification for the mHealth platform SDK.
//!
//! This crate provides:
//! - [`SpError`] - Top-level error enum for every SDK operation
//! - Domain-specific errors ([`ClientError`], [`StorageError`], [`QueueError`], [`FilenameError`])
//! - [`ErrorCategory`] for deciding whether a failed step is worth repeating
//! - [`OperationStage`] naming the step an error came from

use thiserror::Error;

/// Top-level error type for the SDK.
#[derive(Error, Debug)]
pub enum SpError {
    /// Platform REST errors (auth, login, registration, protocols)
    #[error("Platform error: {0}")]
    Client(#[from] ClientError),

    /// Object storage errors (upload, integrity)
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Queue notification errors
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    /// The file does not follow the mHealth naming convention
    #[error("Invalid mHealth file: {0}")]
    Filename(#[from] FilenameError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (wrapped anyhow)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors reported by, or while talking to, the platform REST API.
#[derive(Error, Debug)]
pub enum ClientError {
    /// No platform base URL was configured
    #[error("Platform API URL is not configured")]
    InvalidApiUrl,

    /// The installation has not been authenticated (missing study id, phone or participant)
    #[error("App installation is not authenticated")]
    AppNotAuthenticated,

    /// Login did not yield an access token
    #[error("Credentials rejected")]
    Credentials,

    /// No access token was supplied
    #[error("Missing access token")]
    Unauthorized,

    /// The platform reported errors while registering sensors
    #[error("Sensor registration rejected: {0}")]
    InvalidSensors(String),

    /// No push notification key was supplied
    #[error("Push notification key is not registered")]
    GcmNotRegistered,

    /// The platform answered with a body missing required fields
    #[error("Unexpected server response: {0}")]
    ServerResponse(String),

    /// The platform answered with an explicit non-OK result code
    #[error("Platform returned {0}")]
    Rejected(String),

    /// Transport failure or non-success HTTP status
    #[error("Request failed: {0}")]
    Failed(String),

    /// The platform accepted the request but the outcome is inconsistent
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Object storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Upload settings are incomplete
    #[error("Invalid AWS settings: {0}")]
    InvalidConfig(String),

    /// Local file does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// Local I/O failure
    #[error("I/O error: {0}")]
    Io(String),

    /// The object store rejected or failed the upload
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Stored object's ETag does not match the local content hash
    #[error("Integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },
}

/// Queue notification errors.
#[derive(Error, Debug)]
pub enum QueueError {
    /// Failed to resolve the queue URL from its name
    #[error("Queue URL lookup failed: {0}")]
    QueueUrl(String),

    /// Failed to send a message
    #[error("Send failed: {0}")]
    Send(String),

    /// Message serialization failed
    #[error("Serialization failed: {0}")]
    Serialize(String),
}

/// Reasons a filename cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilenameError {
    /// Field index outside `0..=5`
    #[error("field index {0} is out of range")]
    IndexOutOfRange(usize),

    /// Name does not end in `.csv.gz`
    #[error("missing .csv.gz suffix")]
    MissingSuffix,

    /// Dot-split produced the wrong number of segments
    #[error("expected 6 dot-separated segments, found {0}")]
    SegmentCount(usize),

    /// Name fails the full naming grammar
    #[error("'{0}' does not match the mHealth filename grammar")]
    Grammar(String),

    /// Unknown file kind token
    #[error("unknown file kind '{0}'")]
    InvalidKind(String),

    /// Timestamp segment is malformed
    #[error("malformed timestamp '{0}'")]
    InvalidTimestamp(String),
}

/// Error classification for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transient error - repeating the step may succeed
    ///
    /// Examples: network failure, S3 upload interrupted, queue unavailable
    Transient,

    /// Permanent error - repeating the step cannot succeed
    ///
    /// Examples: malformed filename, missing file, rejected credentials
    Permanent,
}

/// SDK step an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStage {
    /// Verifying the app installation
    Authenticate,

    /// Logging the mobile user in
    Login,

    /// Registering device sensors
    RegisterSensors,

    /// Registering the push notification key
    RegisterPushKey,

    /// Fetching study protocols
    FetchProtocol,

    /// Uploading to object storage
    Upload,

    /// Sending the queue notification
    Notify,
}

impl std::fmt::Display for OperationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authenticate => write!(f, "Authenticate"),
            Self::Login => write!(f, "Login"),
            Self::RegisterSensors => write!(f, "RegisterSensors"),
            Self::RegisterPushKey => write!(f, "RegisterPushKey"),
            Self::FetchProtocol => write!(f, "FetchProtocol"),
            Self::Upload => write!(f, "Upload"),
            Self::Notify => write!(f, "Notify"),
        }
    }
}

/// Classifies an error to determine whether the step may be repeated.
///
/// # Arguments
///
/// * `error` - The error to classify
/// * `stage` - The step where the error occurred
pub fn classify_error(error: &SpError, stage: OperationStage) -> ErrorCategory {
    match error {
        SpError::Client(e) => classify_client_error(e),
        SpError::Storage(e) => classify_storage_error(e),
        SpError::Queue(e) => classify_queue_error(e),
        SpError::Filename(_) => ErrorCategory::Permanent,
        SpError::Config(_) => ErrorCategory::Permanent,
        SpError::Other(e) => classify_anyhow_error(e, stage),
    }
}

fn classify_client_error(error: &ClientError) -> ErrorCategory {
    match error {
        ClientError::Failed(_) => ErrorCategory::Transient,
        ClientError::Unknown(_) => ErrorCategory::Transient,
        ClientError::InvalidApiUrl
        | ClientError::AppNotAuthenticated
        | ClientError::Credentials
        | ClientError::Unauthorized
        | ClientError::InvalidSensors(_)
        | ClientError::GcmNotRegistered
        | ClientError::ServerResponse(_)
        | ClientError::Rejected(_) => ErrorCategory::Permanent,
    }
}

fn classify_storage_error(error: &StorageError) -> ErrorCategory {
    match error {
        StorageError::InvalidConfig(_) => ErrorCategory::Permanent,
        StorageError::NotFound(_) => ErrorCategory::Permanent,
        StorageError::Io(_) => ErrorCategory::Transient,
        StorageError::Upload(_) => ErrorCategory::Transient,
        StorageError::IntegrityMismatch { .. } => ErrorCategory::Transient,
    }
}

fn classify_queue_error(error: &QueueError) -> ErrorCategory {
    match error {
        QueueError::QueueUrl(_) => ErrorCategory::Transient,
        QueueError::Send(_) => ErrorCategory::Transient,
        QueueError::Serialize(_) => ErrorCategory::Permanent,
    }
}

fn classify_anyhow_error(error: &anyhow::Error, stage: OperationStage) -> ErrorCategory {
    let err_string = error.to_string().to_lowercase();

    match stage {
        OperationStage::Upload | OperationStage::Notify => {
            if err_string.contains("accessdenied")
                || err_string.contains("403")
                || err_string.contains("nosuchbucket")
                || err_string.contains("nonexistentqueue")
            {
                ErrorCategory::Permanent
            } else {
                ErrorCategory::Transient
            }
        }
        _ => {
            if err_string.contains("timeout") || err_string.contains("connection") {
                ErrorCategory::Transient
            } else {
                ErrorCategory::Permanent
            }
        }
    }
}

/// Result type alias using SpError.
pub type Result<T> = std::result::Result<T, SpError>;
