//! CLI argument definitions for sp-demo.

use clap::{Parser, ValueEnum};
use sp_cli_common::LogLevel;
use std::path::PathBuf;

use crate::session::DemoState;

/// Enroll a device with the mHealth platform and upload a data file.
///
/// Runs the enrollment steps in order (verify installation, log in,
/// register sensors, register a push key, fetch protocols) and finishes
/// with a verified upload. Stops at the first failed step.
///
/// ## Examples
///
/// Enrollment only:
///   sp-demo --platform-url https://platform.example.org \
///       --phone-number 1112223333 --install-token NDI= --until protocol-one-fetched
///
/// Upload every sensor file in a directory to LocalStack:
///   sp-demo --platform-url http://localhost:8080 \
///       --phone-number 1112223333 --install-token NDI= \
///       --upload-path ./SampleFiles --kind sensor \
///       -b mhealth-uploads -q mhealth-files --endpoint http://localhost:4566
#[derive(Parser, Debug)]
#[command(name = "sp-demo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === Platform ===
    /// Base URL of the platform API
    #[arg(long, env = "SP_PLATFORM_URL")]
    pub platform_url: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "SP_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    // === Device ===
    /// Participant's phone number
    #[arg(long, env = "SP_PHONE_NUMBER")]
    pub phone_number: String,

    /// Install token handed out by the platform
    #[arg(long, env = "SP_INSTALL_TOKEN")]
    pub install_token: String,

    /// Push notification key to register
    #[arg(long, env = "SP_PUSH_KEY", default_value = "testPushKey")]
    pub push_key: String,

    /// Protocol fetched individually
    #[arg(long, default_value = "1")]
    pub protocol_id: u64,

    // === Upload ===
    /// mHealth file, or directory of files, to upload
    #[arg(long, env = "SP_UPLOAD_PATH")]
    pub upload_path: Option<PathBuf>,

    /// Glob over file names when uploading a directory
    #[arg(long, default_value = "*")]
    pub pattern: String,

    /// Allowed file kinds (can be specified multiple times; default all)
    #[arg(long = "kind", value_enum)]
    pub kinds: Vec<FileKindArg>,

    /// Delete each local file once its upload is verified
    #[arg(long)]
    pub remove_original: bool,

    // === AWS ===
    /// S3 bucket receiving uploads
    #[arg(short, long, env = "SP_S3_BUCKET")]
    pub bucket: Option<String>,

    /// SQS queue name notified after each upload
    #[arg(short, long, env = "SP_SQS_QUEUE_NAME")]
    pub queue_name: Option<String>,

    /// Platform environment (selects the upload prefix)
    #[arg(long, value_enum, env = "SP_ENVIRONMENT", default_value = "development")]
    pub environment: EnvironmentArg,

    /// AWS region
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Custom AWS endpoint URL (for LocalStack)
    #[arg(long, env = "SP_AWS_ENDPOINT")]
    pub endpoint: Option<String>,

    /// AWS access key ID
    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    pub access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY")]
    pub secret_key: Option<String>,

    // === Run ===
    /// Stop once this state is reached
    #[arg(long, value_enum, default_value = "file-uploaded")]
    pub until: DemoState,

    // === Logging ===
    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Platform environment argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EnvironmentArg {
    Development,
    Production,
}

impl From<EnvironmentArg> for sp_types::Environment {
    fn from(arg: EnvironmentArg) -> Self {
        match arg {
            EnvironmentArg::Development => sp_types::Environment::Development,
            EnvironmentArg::Production => sp_types::Environment::Production,
        }
    }
}

/// File kind argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FileKindArg {
    Sensor,
    Annotation,
    Event,
}

impl From<FileKindArg> for sp_mhealth::FileKind {
    fn from(arg: FileKindArg) -> Self {
        match arg {
            FileKindArg::Sensor => sp_mhealth::FileKind::Sensor,
            FileKindArg::Annotation => sp_mhealth::FileKind::Annotation,
            FileKindArg::Event => sp_mhealth::FileKind::Event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 7] = [
        "sp-demo",
        "--platform-url",
        "http://localhost:8080",
        "--phone-number",
        "1112223333",
        "--install-token",
        "NDI=",
    ];

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(REQUIRED).unwrap();

        assert_eq!(cli.push_key, "testPushKey");
        assert_eq!(cli.protocol_id, 1);
        assert_eq!(cli.until, DemoState::FileUploaded);
        assert_eq!(cli.pattern, "*");
        assert!(cli.kinds.is_empty());
        assert!(!cli.remove_original);
    }

    #[test]
    fn test_upload_options() {
        let args = REQUIRED.iter().copied().chain([
            "--upload-path",
            "samples",
            "--kind",
            "sensor",
            "--kind",
            "event",
            "-b",
            "uploads",
            "-q",
            "files",
            "--environment",
            "production",
            "--until",
            "logged-in",
        ]);
        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.upload_path, Some(PathBuf::from("samples")));
        assert_eq!(cli.kinds.len(), 2);
        assert_eq!(cli.bucket.as_deref(), Some("uploads"));
        assert_eq!(cli.queue_name.as_deref(), Some("files"));
        assert!(matches!(cli.environment, EnvironmentArg::Production));
        assert_eq!(cli.until, DemoState::LoggedIn);
    }
}
