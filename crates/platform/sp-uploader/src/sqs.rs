//! Queue notification after a verified upload.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sqs::types::MessageAttributeValue;
use aws_sdk_sqs::Client;
use sp_error::{QueueError, Result};
use sp_types::{AwsUploadConfig, UploadNotification, QUEUE_ACTION_ATTRIBUTE, UPLOAD_FILE_ACTION};
use tracing::debug;

use crate::aws::load_sdk_config;

/// Trait for announcing an uploaded file to the platform.
#[async_trait]
pub trait UploadNotifier: Send + Sync {
    /// Deliver one notification.
    async fn notify(&self, notification: &UploadNotification) -> Result<()>;
}

/// SQS-backed [`UploadNotifier`].
///
/// The queue is addressed by name; its URL is looked up on every send.
pub struct SqsNotifier {
    client: Client,
    queue_name: String,
}

impl SqsNotifier {
    /// Create a notifier from upload settings.
    pub async fn new(config: &AwsUploadConfig) -> Result<Self> {
        let sdk_config = load_sdk_config(config).await;
        Ok(Self::from_sdk_config(&sdk_config, &config.queue_name))
    }

    /// Create a notifier from loaded SDK configuration.
    pub fn from_sdk_config(sdk_config: &SdkConfig, queue_name: impl Into<String>) -> Self {
        Self::with_client(Client::new(sdk_config), queue_name)
    }

    /// Create a notifier with an existing client (useful for testing).
    pub fn with_client(client: Client, queue_name: impl Into<String>) -> Self {
        Self {
            client,
            queue_name: queue_name.into(),
        }
    }

    async fn queue_url(&self) -> Result<String> {
        let output = self
            .client
            .get_queue_url()
            .queue_name(&self.queue_name)
            .send()
            .await
            .map_err(|e| QueueError::QueueUrl(format!("{}: {e}", self.queue_name)))?;

        output.queue_url().map(str::to_string).ok_or_else(|| {
            QueueError::QueueUrl(format!("{}: no URL returned", self.queue_name)).into()
        })
    }
}

#[async_trait]
impl UploadNotifier for SqsNotifier {
    async fn notify(&self, notification: &UploadNotification) -> Result<()> {
        let body = serde_json::to_string(notification)
            .map_err(|e| QueueError::Serialize(e.to_string()))?;

        let queue_url = self.queue_url().await?;

        let action = MessageAttributeValue::builder()
            .data_type("String")
            .string_value(UPLOAD_FILE_ACTION)
            .build()
            .map_err(|e| QueueError::Send(format!("Failed to build message attribute: {e}")))?;

        let output = self
            .client
            .send_message()
            .queue_url(&queue_url)
            .message_body(body)
            .message_attributes(QUEUE_ACTION_ATTRIBUTE, action)
            .send()
            .await
            .map_err(|e| QueueError::Send(format!("{queue_url}: {e}")))?;

        debug!(
            message_id = output.message_id().unwrap_or_default(),
            transaction_id = %notification.transaction_id,
            "Upload notification sent"
        );

        Ok(())
    }
}
