//! Shared AWS SDK configuration.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use sp_types::AwsUploadConfig;

/// Credentials provider name reported to the SDK.
const PROVIDER_NAME: &str = "sp-uploader";

/// Load SDK configuration for the upload settings.
///
/// Explicit credentials are used when both halves are set; otherwise the
/// default provider chain applies.
pub async fn load_sdk_config(config: &AwsUploadConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }

    // LocalStack
    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    if !config.access_key_id.is_empty() && !config.secret_access_key.is_empty() {
        let credentials = aws_sdk_s3::config::Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            PROVIDER_NAME,
        );
        loader = loader.credentials_provider(credentials);
    }

    loader.load().await
}
