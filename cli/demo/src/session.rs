//! Step-by-step enrollment and upload session.

use clap::ValueEnum;
use serde_json::Value;
use sp_client::PlatformClient;
use sp_error::{ClientError, OperationStage, Result, SpError, StorageError};
use sp_mhealth::FilenameFilter;
use sp_types::{MetadataType, MobileUser};
use sp_uploader::{collect_candidates, FileStore, UploadNotifier, UploadReceipt, Uploader};
use std::path::PathBuf;
use tracing::{debug, info};

/// Progress of a device through the demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum DemoState {
    Unknown,
    InstallationVerified,
    LoggedIn,
    SensorsRegistered,
    PushKeyRegistered,
    ProtocolAllFetched,
    ProtocolOneFetched,
    FileUploaded,
}

impl DemoState {
    /// Operation performed to leave this state; `None` once done.
    pub fn stage(&self) -> Option<OperationStage> {
        match self {
            Self::Unknown => Some(OperationStage::Authenticate),
            Self::InstallationVerified => Some(OperationStage::Login),
            Self::LoggedIn => Some(OperationStage::RegisterSensors),
            Self::SensorsRegistered => Some(OperationStage::RegisterPushKey),
            Self::PushKeyRegistered | Self::ProtocolAllFetched => {
                Some(OperationStage::FetchProtocol)
            }
            Self::ProtocolOneFetched => Some(OperationStage::Upload),
            Self::FileUploaded => None,
        }
    }
}

impl std::fmt::Display for DemoState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unknown => "UNKNOWN",
            Self::InstallationVerified => "INSTALLATION_VERIFIED",
            Self::LoggedIn => "LOGGED_IN",
            Self::SensorsRegistered => "SENSORS_REGISTERED",
            Self::PushKeyRegistered => "PUSHKEY_REGISTERED",
            Self::ProtocolAllFetched => "PROTOCOL_ALL_FETCHED",
            Self::ProtocolOneFetched => "PROTOCOL_ONE_FETCHED",
            Self::FileUploaded => "FILE_UPLOADED",
        };
        f.write_str(name)
    }
}

/// Inputs for a demo session.
#[derive(Debug, Clone)]
pub struct DemoSettings {
    pub phone_number: String,
    pub install_token: String,
    pub push_key: String,

    /// Protocol fetched on its own after listing all protocols
    pub protocol_id: u64,

    /// File, or directory of files, to upload
    pub upload_path: Option<PathBuf>,

    /// Selects files when `upload_path` is a directory
    pub filter: FilenameFilter,
}

/// A device session advancing one platform call at a time.
pub struct DemoSession<S, N> {
    client: PlatformClient,
    uploader: Option<Uploader<S, N>>,
    settings: DemoSettings,
    state: DemoState,
    user: Option<MobileUser>,
    access_token: Option<String>,
    protocols: Vec<Value>,
    receipts: Vec<UploadReceipt>,
}

impl<S: FileStore, N: UploadNotifier> DemoSession<S, N> {
    /// Start a session in [`DemoState::Unknown`].
    ///
    /// Without an uploader the session stops at the upload step.
    pub fn new(
        client: PlatformClient,
        uploader: Option<Uploader<S, N>>,
        settings: DemoSettings,
    ) -> Self {
        Self {
            client,
            uploader,
            settings,
            state: DemoState::Unknown,
            user: None,
            access_token: None,
            protocols: Vec::new(),
            receipts: Vec::new(),
        }
    }

    pub fn state(&self) -> DemoState {
        self.state
    }

    /// Protocol documents fetched so far.
    pub fn protocols(&self) -> &[Value] {
        &self.protocols
    }

    /// Receipts of uploaded files.
    pub fn receipts(&self) -> &[UploadReceipt] {
        &self.receipts
    }

    /// Perform the step for the current state.
    ///
    /// The state moves forward only when the step succeeds. Advancing a
    /// finished session does nothing.
    pub async fn advance(&mut self) -> Result<DemoState> {
        let next = match self.state {
            DemoState::Unknown => {
                let user = self
                    .client
                    .authenticate_installation(
                        &self.settings.phone_number,
                        &self.settings.install_token,
                    )
                    .await?;
                info!(participant = %user.participant_id, "App installation verified");
                self.user = Some(user);
                DemoState::InstallationVerified
            }
            DemoState::InstallationVerified => {
                let user = self.user()?;
                let token = self.client.login(&user.username, &user.password).await?;
                info!("User logged in");
                self.access_token = Some(token);
                DemoState::LoggedIn
            }
            DemoState::LoggedIn => {
                let sensors = self
                    .client
                    .register_sensors(self.user()?, self.token()?)
                    .await?;
                info!(count = sensors.len(), "Sensors registered");
                DemoState::SensorsRegistered
            }
            DemoState::SensorsRegistered => {
                self.client
                    .register_push_key(self.user()?, self.token()?, &self.settings.push_key)
                    .await?;
                info!("Push notification key registered");
                DemoState::PushKeyRegistered
            }
            DemoState::PushKeyRegistered => {
                let protocols = self
                    .client
                    .fetch_protocol(
                        self.user()?,
                        self.token()?,
                        None,
                        MetadataType::SensorSerialNumber,
                    )
                    .await?;
                info!("All protocols fetched");
                debug!(%protocols, "Protocols");
                self.protocols.push(protocols);
                DemoState::ProtocolAllFetched
            }
            DemoState::ProtocolAllFetched => {
                let protocol_id = self.settings.protocol_id;
                let protocol = self
                    .client
                    .fetch_protocol(
                        self.user()?,
                        self.token()?,
                        Some(protocol_id),
                        MetadataType::ParticipantCode,
                    )
                    .await?;
                info!(protocol_id, "Protocol fetched");
                debug!(%protocol, "Protocol");
                self.protocols.push(protocol);
                DemoState::ProtocolOneFetched
            }
            DemoState::ProtocolOneFetched => {
                let files = self.upload().await?;
                info!(files, "Upload complete");
                DemoState::FileUploaded
            }
            DemoState::FileUploaded => DemoState::FileUploaded,
        };

        self.state = next;
        Ok(next)
    }

    /// Upload the configured file or directory, recording each receipt as
    /// it completes. Returns the number of files uploaded.
    async fn upload(&mut self) -> Result<usize> {
        let uploader = self
            .uploader
            .as_ref()
            .ok_or_else(|| StorageError::InvalidConfig("no upload settings".to_string()))?;
        let path = self
            .settings
            .upload_path
            .as_ref()
            .ok_or_else(|| SpError::Config("no upload path configured".to_string()))?;
        let user = self
            .user
            .as_ref()
            .ok_or(ClientError::AppNotAuthenticated)?;

        let files = if path.is_dir() {
            let files = collect_candidates(path, &self.settings.filter).await?;
            if files.is_empty() {
                return Err(StorageError::NotFound(format!(
                    "no files matching {} in {}",
                    self.settings.filter.description(),
                    path.display()
                ))
                .into());
            }
            files
        } else {
            vec![path.clone()]
        };

        for file in &files {
            let receipt = uploader.upload_file(user, file).await?;
            self.receipts.push(receipt);
        }
        Ok(files.len())
    }

    fn user(&self) -> Result<&MobileUser> {
        self.user
            .as_ref()
            .ok_or_else(|| ClientError::AppNotAuthenticated.into())
    }

    fn token(&self) -> Result<&str> {
        self.access_token
            .as_deref()
            .ok_or_else(|| ClientError::Unauthorized.into())
    }
}
