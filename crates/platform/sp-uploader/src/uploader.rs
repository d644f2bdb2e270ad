//! Upload orchestration.

use sp_error::{ClientError, FilenameError, Result, StorageError};
use sp_mhealth::{FilenameFilter, MHealthFilename};
use sp_types::{
    AwsUploadConfig, MobileUser, SensorMetadata, UploadNotification, NOTIFICATION_ORIGIN,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::aws::load_sdk_config;
use crate::checksum::{etag_matches, md5_hex, quoted_etag};
use crate::s3::{FileStore, S3FileStore};
use crate::sqs::{SqsNotifier, UploadNotifier};

/// Outcome of a verified, announced upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// UUID v4 shared by the stored object and its notification
    pub transaction_id: String,

    /// Object key the file was stored under
    pub key: String,

    /// Uploaded size
    pub bytes: u64,
}

/// Uploads mHealth files and announces them on the queue.
pub struct Uploader<S, N> {
    config: AwsUploadConfig,
    store: S,
    notifier: N,
}

impl Uploader<S3FileStore, SqsNotifier> {
    /// Create an S3/SQS uploader from upload settings.
    pub async fn from_config(config: AwsUploadConfig) -> Result<Self> {
        config.validate()?;

        let sdk_config = load_sdk_config(&config).await;
        let store = S3FileStore::from_sdk_config(&sdk_config, config.endpoint.is_some());
        let notifier = SqsNotifier::from_sdk_config(&sdk_config, &config.queue_name);

        Ok(Self::new(config, store, notifier))
    }
}

impl<S: FileStore, N: UploadNotifier> Uploader<S, N> {
    /// Create an uploader over explicit store and notifier.
    pub fn new(config: AwsUploadConfig, store: S, notifier: N) -> Self {
        Self {
            config,
            store,
            notifier,
        }
    }

    /// Upload settings in use.
    pub fn config(&self) -> &AwsUploadConfig {
        &self.config
    }

    /// Upload one file on behalf of `user`.
    ///
    /// A file whose name breaks the mHealth grammar is rejected before any
    /// network call. The notification is sent only once the stored ETag
    /// matches the local MD5.
    pub async fn upload_file(&self, user: &MobileUser, path: &Path) -> Result<UploadReceipt> {
        let study_id = user
            .study_id()
            .filter(|_| !user.participant_id.is_empty())
            .ok_or(ClientError::AppNotAuthenticated)?;

        self.config.validate()?;

        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| FilenameError::Grammar(path.display().to_string()))?;
        let parsed = MHealthFilename::parse(filename)?;

        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => {}
            _ => return Err(StorageError::NotFound(path.display().to_string()).into()),
        }

        let prefix = self
            .config
            .key_prefix(&study_id)
            .ok_or_else(|| StorageError::InvalidConfig("missing environment".to_string()))?;
        let key = format!("{prefix}/{filename}");
        let transaction_id = Uuid::new_v4().to_string();

        info!(
            file = %filename,
            bucket = %self.config.bucket,
            key = %key,
            transaction_id = %transaction_id,
            "Uploading mHealth file"
        );

        let expected = md5_hex(path).await?;
        let stored = self
            .store
            .put_file(path, &self.config.bucket, &key)
            .await?;

        if !etag_matches(&stored.etag, &expected) {
            warn!(
                key = %key,
                etag = %stored.etag,
                md5 = %expected,
                "Stored object does not match local content"
            );
            return Err(StorageError::IntegrityMismatch {
                expected: quoted_etag(&expected),
                actual: stored.etag,
            }
            .into());
        }

        let notification = UploadNotification {
            sensor_id: parsed.sensor_id().to_string(),
            filename: filename.to_string(),
            s3_key_path: key.clone(),
            file_size_in_bytes: stored.bytes,
            sensor_metadata: SensorMetadata::mhealth(
                parsed.sensor_id(),
                parsed.sensor_type_and_version(),
                &study_id,
                parsed.kind().as_str(),
            ),
            transaction_id: transaction_id.clone(),
            participant_code: user.participant_id.clone(),
            origin: NOTIFICATION_ORIGIN.to_string(),
        };
        self.notifier.notify(&notification).await?;

        if self.config.remove_original {
            match tokio::fs::remove_file(path).await {
                Ok(()) => debug!(path = %path.display(), "Removed original"),
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove original"),
            }
        }

        info!(key = %key, bytes = stored.bytes, "Upload verified and announced");

        Ok(UploadReceipt {
            transaction_id,
            key,
            bytes: stored.bytes,
        })
    }
}

/// Files directly inside `dir` that pass `filter`, sorted by path.
pub async fn collect_candidates(dir: &Path, filter: &FilenameFilter) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| StorageError::Io(format!("{}: {e}", dir.display())))?;

    let mut candidates = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| StorageError::Io(format!("{}: {e}", dir.display())))?
    {
        let path = entry.path();
        let is_file = entry.file_type().await.is_ok_and(|t| t.is_file());
        if is_file && filter.matches_path(&path) {
            candidates.push(path);
        }
    }

    candidates.sort();
    debug!(
        dir = %dir.display(),
        filter = %filter.description(),
        count = candidates.len(),
        "Collected upload candidates"
    );
    Ok(candidates)
}
