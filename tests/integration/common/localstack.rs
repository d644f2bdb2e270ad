//! LocalStack test context and utilities.

use aws_sdk_s3::operation::head_object::HeadObjectOutput;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_sqs::types::Message;
use aws_sdk_sqs::Client as SqsClient;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sp_types::{AwsUploadConfig, Environment, MobileUser};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Credentials LocalStack accepts.
const TEST_CREDENTIAL: &str = "test";

/// LocalStack test context providing S3 and SQS clients.
pub struct LocalStackTestContext {
    pub s3: S3Client,
    pub sqs: SqsClient,
    pub endpoint: String,
    pub region: String,
}

impl LocalStackTestContext {
    /// Create a new LocalStack test context.
    ///
    /// Uses the `LOCALSTACK_ENDPOINT` environment variable if set,
    /// otherwise defaults to `http://localhost:4566`.
    pub async fn new() -> Self {
        let endpoint = std::env::var("LOCALSTACK_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:4566".to_string());
        let region = "us-east-1".to_string();

        let credentials = aws_sdk_s3::config::Credentials::new(
            TEST_CREDENTIAL,
            TEST_CREDENTIAL,
            None,
            None,
            "integration-tests",
        );
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(region.clone()))
            .endpoint_url(&endpoint)
            .credentials_provider(credentials)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(true)
            .build();

        Self {
            s3: S3Client::from_conf(s3_config),
            sqs: SqsClient::new(&config),
            endpoint,
            region,
        }
    }

    /// Check if LocalStack is available and healthy.
    pub async fn is_available(&self) -> bool {
        self.s3.list_buckets().send().await.is_ok()
    }

    /// Upload settings pointing at this LocalStack instance.
    pub fn upload_config(&self, bucket: &str, queue_name: &str) -> AwsUploadConfig {
        AwsUploadConfig::new(bucket, queue_name)
            .with_credentials(TEST_CREDENTIAL, TEST_CREDENTIAL)
            .with_environment(Environment::Development)
            .with_region(&self.region)
            .with_endpoint(&self.endpoint)
    }

    /// Create an S3 bucket for testing.
    pub async fn create_bucket(&self, name: &str) -> Result<(), aws_sdk_s3::Error> {
        let buckets = self.s3.list_buckets().send().await?;
        let exists = buckets
            .buckets()
            .iter()
            .any(|b| b.name().unwrap_or_default() == name);

        if !exists {
            self.s3.create_bucket().bucket(name).send().await?;
        }
        Ok(())
    }

    /// Create an SQS queue for testing.
    ///
    /// Returns the queue URL.
    pub async fn create_queue(&self, name: &str) -> Result<String, aws_sdk_sqs::Error> {
        let result = self.sqs.create_queue().queue_name(name).send().await?;
        Ok(result.queue_url.unwrap_or_default())
    }

    /// Delete an SQS queue.
    pub async fn delete_queue(&self, queue_url: &str) -> Result<(), aws_sdk_sqs::Error> {
        self.sqs.delete_queue().queue_url(queue_url).send().await?;
        Ok(())
    }

    /// Metadata of a stored object.
    pub async fn head_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<HeadObjectOutput, aws_sdk_s3::Error> {
        Ok(self.s3.head_object().bucket(bucket).key(key).send().await?)
    }

    /// Content of a stored object.
    pub async fn get_object_bytes(&self, bucket: &str, key: &str) -> anyhow::Result<Vec<u8>> {
        let output = self
            .s3
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(aws_sdk_s3::Error::from)?;
        Ok(output.body.collect().await?.into_bytes().to_vec())
    }

    /// List object keys under a prefix.
    pub async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<String>, aws_sdk_s3::Error> {
        let result = self
            .s3
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .send()
            .await?;

        Ok(result
            .contents()
            .iter()
            .filter_map(|o| o.key().map(String::from))
            .collect())
    }

    /// Receive messages with all their attributes.
    pub async fn receive_messages(
        &self,
        queue_url: &str,
        max: i32,
    ) -> Result<Vec<Message>, aws_sdk_sqs::Error> {
        let result = self
            .sqs
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(max)
            .message_attribute_names("All")
            .wait_time_seconds(1)
            .send()
            .await?;

        Ok(result.messages().to_vec())
    }

    /// Receive until `count` messages arrived or a few polls came back empty.
    pub async fn receive_at_least(
        &self,
        queue_url: &str,
        count: usize,
    ) -> Result<Vec<Message>, aws_sdk_sqs::Error> {
        let mut messages = Vec::new();
        for _ in 0..5 {
            messages.extend(self.receive_messages(queue_url, 10).await?);
            if messages.len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        Ok(messages)
    }
}

/// Resource name unique to one test run.
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}

/// Participant of study 42.
pub fn sample_user() -> MobileUser {
    MobileUser {
        username: "device".to_string(),
        password: "secret".to_string(),
        participant_id: "P001".to_string(),
        phone_number: "1112223333".to_string(),
        install_token: STANDARD.encode("42"),
    }
}

/// Write an mHealth file with CSV content into `dir`.
pub fn write_mhealth_file(dir: &Path, name: &str, rows: usize) -> PathBuf {
    let mut content = String::from("HEADER_TIME_STAMP,STEPS\n");
    for i in 0..rows {
        content.push_str(&format!("2016-01-22 19:22:{:02}.310,{}\n", i % 60, i * 3));
    }

    let path = dir.join(name);
    std::fs::write(&path, content).expect("write mHealth file");
    path
}
