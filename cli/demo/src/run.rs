//! Main execution logic for sp-demo.

use anyhow::{Context, Result};
use sp_cli_common::{format_bytes, redact};
use sp_client::{PlatformClient, PlatformConfig};
use sp_error::classify_error;
use sp_mhealth::FilenameFilter;
use sp_types::{AwsUploadConfig, ResponseCode};
use sp_uploader::{UploadReceipt, Uploader};
use tracing::{error, info, warn};

use crate::args::Cli;
use crate::session::{DemoSession, DemoSettings, DemoState};

/// Where a run ended.
#[derive(Debug)]
pub struct DemoSummary {
    pub state: DemoState,
    pub protocols_fetched: usize,
    pub receipts: Vec<UploadReceipt>,
}

/// Run the demo steps up to `args.until`.
pub async fn execute(args: Cli) -> Result<DemoSummary> {
    let platform = PlatformClient::new(
        PlatformConfig::new(&args.platform_url).with_timeout(args.timeout_secs),
    )?;

    // Upload problems surface at the upload step, not before enrollment.
    let uploader = match build_upload_config(&args) {
        Some(config) => match config.validate() {
            Ok(()) => {
                let uploader = Uploader::from_config(config).await?;
                info!(
                    bucket = %uploader.config().bucket,
                    queue = %uploader.config().queue_name,
                    "Upload target configured"
                );
                Some(uploader)
            }
            Err(e) => {
                warn!(error = %e, "Incomplete upload settings; the upload step will fail");
                None
            }
        },
        None => {
            warn!("No bucket/queue configured; the upload step will fail");
            None
        }
    };

    let settings = DemoSettings {
        phone_number: args.phone_number.clone(),
        install_token: args.install_token.clone(),
        push_key: args.push_key.clone(),
        protocol_id: args.protocol_id,
        upload_path: args.upload_path.clone(),
        filter: build_filter(&args)?,
    };

    info!(
        platform = %platform.config().base_url,
        phone = %args.phone_number,
        install_token = %redact(&args.install_token),
        until = %args.until,
        "Starting demo"
    );

    let mut session = DemoSession::new(platform, uploader, settings);
    while session.state() < args.until {
        let from = session.state();
        match session.advance().await {
            Ok(to) => info!(from = %from, to = %to, "Step succeeded"),
            Err(e) => {
                let code = ResponseCode::from(&e);
                if let Some(stage) = from.stage() {
                    error!(
                        stage = %stage,
                        code = %code,
                        category = ?classify_error(&e, stage),
                        error = %e,
                        "Step failed"
                    );
                }
                return Err(e).with_context(|| format!("Step from {from} failed with {code}"));
            }
        }
    }

    Ok(DemoSummary {
        state: session.state(),
        protocols_fetched: session.protocols().len(),
        receipts: session.receipts().to_vec(),
    })
}

/// Build upload settings when both a bucket and a queue are given.
fn build_upload_config(args: &Cli) -> Option<AwsUploadConfig> {
    let (Some(bucket), Some(queue_name)) = (&args.bucket, &args.queue_name) else {
        return None;
    };

    let mut config = AwsUploadConfig::new(bucket, queue_name)
        .with_environment(args.environment.into())
        .with_region(&args.region)
        .with_remove_original(args.remove_original);

    if let Some(endpoint) = &args.endpoint {
        config = config.with_endpoint(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&args.access_key, &args.secret_key) {
        config = config.with_credentials(access_key, secret_key);
    }

    Some(config)
}

fn build_filter(args: &Cli) -> Result<FilenameFilter> {
    let mut filter = FilenameFilter::new().with_pattern(&args.pattern)?;
    for kind in &args.kinds {
        filter = filter.with_kind((*kind).into());
    }
    Ok(filter)
}

/// Print a summary of the run to stderr.
pub fn report(summary: &DemoSummary) {
    eprintln!();
    eprintln!("Demo finished in state {}", summary.state);
    eprintln!("  Protocol responses: {}", summary.protocols_fetched);
    for receipt in &summary.receipts {
        eprintln!(
            "  Uploaded {} ({}), transaction {}",
            receipt.key,
            format_bytes(receipt.bytes),
            receipt.transaction_id
        );
    }
    if summary.state == DemoState::FileUploaded {
        eprintln!("All done!");
    }
}
