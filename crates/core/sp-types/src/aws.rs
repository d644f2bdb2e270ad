//! Object storage and queue settings for uploads.

use serde::{Deserialize, Serialize};
use sp_error::{Result, StorageError};

/// Platform environment; selects the top-level upload prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Key prefix segment for this environment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials, bucket and queue used to upload mHealth files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsUploadConfig {
    /// AWS access key ID
    pub access_key_id: String,

    /// AWS secret access key
    pub secret_access_key: String,

    /// Target S3 bucket
    pub bucket: String,

    /// SQS queue name (not URL) notified after each upload
    pub queue_name: String,

    /// Platform environment
    pub environment: Option<Environment>,

    /// AWS region
    pub region: Option<String>,

    /// Custom endpoint URL (for LocalStack)
    pub endpoint: Option<String>,

    /// Delete the local file once the upload is verified
    pub remove_original: bool,
}

impl AwsUploadConfig {
    /// Create a configuration for `bucket` and `queue_name`.
    pub fn new(bucket: impl Into<String>, queue_name: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            queue_name: queue_name.into(),
            ..Default::default()
        }
    }

    /// Set explicit credentials.
    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = access_key_id.into();
        self.secret_access_key = secret_access_key.into();
        self
    }

    /// Set the platform environment.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Set the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set a custom endpoint (for LocalStack).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Remove the local file after a verified upload.
    pub fn with_remove_original(mut self, remove_original: bool) -> Self {
        self.remove_original = remove_original;
        self
    }

    /// Whether every required setting is present.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check that every required setting is present.
    pub fn validate(&self) -> Result<()> {
        let missing = [
            ("access_key_id", self.access_key_id.is_empty()),
            ("secret_access_key", self.secret_access_key.is_empty()),
            ("bucket", self.bucket.is_empty()),
            ("queue_name", self.queue_name.is_empty()),
            ("environment", self.environment.is_none()),
            (
                "region",
                self.region.as_deref().map_or(true, str::is_empty),
            ),
        ]
        .iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| *name)
        .collect::<Vec<_>>();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(StorageError::InvalidConfig(format!("missing {}", missing.join(", "))).into())
        }
    }

    /// Key prefix under which a study's uploads are stored.
    pub fn key_prefix(&self, study_id: &str) -> Option<String> {
        self.environment
            .map(|env| format!("{}/UPLOADS/{}", env.as_str(), study_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> AwsUploadConfig {
        AwsUploadConfig::new("bucket", "queue")
            .with_credentials("access", "secret")
            .with_environment(Environment::Development)
            .with_region("us-east-1")
    }

    #[test]
    fn test_complete_config_is_valid() {
        assert!(complete().is_valid());
    }

    #[test]
    fn test_missing_fields_are_reported() {
        let config = AwsUploadConfig::new("bucket", "").with_credentials("access", "secret");
        let err = config.validate().unwrap_err().to_string();

        assert!(err.contains("queue_name"));
        assert!(err.contains("environment"));
        assert!(err.contains("region"));
        assert!(!err.contains("bucket"));
    }

    #[test]
    fn test_empty_region_is_invalid() {
        let config = complete().with_region("");
        assert!(!config.is_valid());
    }

    #[test]
    fn test_key_prefix() {
        assert_eq!(
            complete().key_prefix("42").as_deref(),
            Some("development/UPLOADS/42")
        );
        assert_eq!(AwsUploadConfig::default().key_prefix("42"), None);
    }

    #[test]
    fn test_builder() {
        let config = complete()
            .with_endpoint("http://localhost:4566")
            .with_remove_original(true);
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:4566"));
        assert!(config.remove_original);
    }
}
