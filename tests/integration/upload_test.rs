//! Upload integration tests using LocalStack.
//!
//! Exercise the S3 store and SQS notifier against real endpoints: stored
//! object headers, ETag verification and the queue message contract.

use crate::common::{sample_user, unique_name, write_mhealth_file, LocalStackTestContext};
use aws_sdk_s3::types::ServerSideEncryption;
use sp_error::{QueueError, SpError};
use sp_mhealth::{FileKind, FilenameFilter};
use sp_types::{UploadNotification, QUEUE_ACTION_ATTRIBUTE, UPLOAD_FILE_ACTION};
use sp_uploader::{collect_candidates, Uploader};

const SENSOR_FILE: &str =
    "iPhone-STEPS-iOSx9x1.1112223333-STEPS.2016-01-22-19-22-34-310-M0500.sensor.csv.gz";
const EVENT_FILE: &str = "Battery.1112223333-Battery.2016-01-22-19-22-34-310-M0500.event.csv.gz";

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_upload_stores_object_and_sends_notification() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = unique_name("sp-uploads");
    let queue_name = unique_name("sp-files");
    ctx.create_bucket(&bucket).await.unwrap();
    let queue_url = ctx.create_queue(&queue_name).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = write_mhealth_file(dir.path(), SENSOR_FILE, 50);
    let local = std::fs::read(&path).unwrap();

    let uploader = Uploader::from_config(ctx.upload_config(&bucket, &queue_name))
        .await
        .unwrap();
    let receipt = uploader.upload_file(&sample_user(), &path).await.unwrap();

    assert_eq!(receipt.key, format!("development/UPLOADS/42/{SENSOR_FILE}"));
    assert_eq!(receipt.bytes, local.len() as u64);
    assert!(path.exists());

    // Stored object
    let head = ctx.head_object(&bucket, &receipt.key).await.unwrap();
    assert_eq!(head.content_type(), Some("text/csv"));
    assert_eq!(head.content_encoding(), Some("gzip"));
    assert_eq!(
        head.server_side_encryption(),
        Some(&ServerSideEncryption::Aes256)
    );
    let stored = ctx.get_object_bytes(&bucket, &receipt.key).await.unwrap();
    assert_eq!(stored, local);

    // Queue message
    let messages = ctx.receive_at_least(&queue_url, 1).await.unwrap();
    assert_eq!(messages.len(), 1);

    let action = messages[0]
        .message_attributes()
        .and_then(|attrs| attrs.get(QUEUE_ACTION_ATTRIBUTE))
        .and_then(|value| value.string_value());
    assert_eq!(action, Some(UPLOAD_FILE_ACTION));

    let body: UploadNotification =
        serde_json::from_str(messages[0].body().unwrap_or_default()).unwrap();
    assert_eq!(body.transaction_id, receipt.transaction_id);
    assert_eq!(body.s3_key_path, receipt.key);
    assert_eq!(body.filename, SENSOR_FILE);
    assert_eq!(body.sensor_id, "1112223333-STEPS");
    assert_eq!(body.file_size_in_bytes, receipt.bytes);
    assert_eq!(body.participant_code, "P001");
    assert_eq!(body.origin, "SDK_IOS");
    assert_eq!(body.sensor_metadata.sensor_type, "iPhone-STEPS-iOSx9x1");
    assert_eq!(body.sensor_metadata.study_id, Some(42));
    assert_eq!(body.sensor_metadata.mhealth_type, "sensor");

    ctx.delete_queue(&queue_url).await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_upload_removes_original_when_configured() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = unique_name("sp-uploads");
    let queue_name = unique_name("sp-files");
    ctx.create_bucket(&bucket).await.unwrap();
    let queue_url = ctx.create_queue(&queue_name).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = write_mhealth_file(dir.path(), EVENT_FILE, 5);

    let config = ctx
        .upload_config(&bucket, &queue_name)
        .with_remove_original(true);
    let uploader = Uploader::from_config(config).await.unwrap();
    uploader.upload_file(&sample_user(), &path).await.unwrap();

    assert!(!path.exists());

    ctx.delete_queue(&queue_url).await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_missing_queue_fails_after_store() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = unique_name("sp-uploads");
    ctx.create_bucket(&bucket).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = write_mhealth_file(dir.path(), SENSOR_FILE, 5);

    let config = ctx
        .upload_config(&bucket, &unique_name("sp-absent"))
        .with_remove_original(true);
    let uploader = Uploader::from_config(config).await.unwrap();
    let err = uploader
        .upload_file(&sample_user(), &path)
        .await
        .unwrap_err();

    assert!(matches!(err, SpError::Queue(QueueError::QueueUrl(_))));
    // stored but not announced, and the original is kept
    assert!(path.exists());
    let keys = ctx
        .list_objects(&bucket, "development/UPLOADS/42/")
        .await
        .unwrap();
    assert_eq!(keys.len(), 1);
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_upload_filtered_directory() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = unique_name("sp-uploads");
    let queue_name = unique_name("sp-files");
    ctx.create_bucket(&bucket).await.unwrap();
    let queue_url = ctx.create_queue(&queue_name).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    write_mhealth_file(dir.path(), SENSOR_FILE, 5);
    write_mhealth_file(dir.path(), EVENT_FILE, 5);
    std::fs::write(dir.path().join("notes.txt"), "not mHealth").unwrap();

    let filter = FilenameFilter::new().with_kind(FileKind::Sensor);
    let files = collect_candidates(dir.path(), &filter).await.unwrap();
    assert_eq!(files.len(), 1);

    let uploader = Uploader::from_config(ctx.upload_config(&bucket, &queue_name))
        .await
        .unwrap();
    for file in &files {
        uploader.upload_file(&sample_user(), file).await.unwrap();
    }

    let keys = ctx
        .list_objects(&bucket, "development/UPLOADS/42/")
        .await
        .unwrap();
    assert_eq!(keys, vec![format!("development/UPLOADS/42/{SENSOR_FILE}")]);

    let messages = ctx.receive_at_least(&queue_url, 1).await.unwrap();
    assert_eq!(messages.len(), 1);

    ctx.delete_queue(&queue_url).await.ok();
}
