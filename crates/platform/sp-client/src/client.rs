//! Platform REST client.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use sp_error::{ClientError, Result, SpError};
use sp_types::{MetadataType, MobileUser, ResponseCode, SensorKind, SensorRegistration};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::PlatformConfig;
use crate::payload::{
    json_count, AuthResponse, LoginRequest, LoginResponse, PushKeyResponse,
    RegisterSensorsRequest, RegisterSensorsResponse,
};

/// Header carrying the access token on authenticated calls.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Sensor type the platform reports for a phone registered for push.
pub const PUSH_SENSOR_TYPE: &str = "IPHONE";

/// Client for the platform REST API.
///
/// Responses are decoded from their JSON body whatever the HTTP status, as
/// the platform reports most failures in the body; a body that is not the
/// expected JSON is a [`ClientError::Failed`].
#[derive(Debug, Clone)]
pub struct PlatformClient {
    client: Client,
    config: PlatformConfig,
}

impl PlatformClient {
    /// Create a client for the configured platform.
    pub fn new(config: PlatformConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SpError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Verify that the app is installed on a participant's phone.
    ///
    /// Returns the device's credentials when the platform answers `OK`.
    pub async fn authenticate_installation(
        &self,
        phone_number: &str,
        install_token: &str,
    ) -> Result<MobileUser> {
        info!("Authenticating app installation with platform");
        self.ensure_configured()?;

        let request = self
            .client
            .get(self.config.url("/mobile/auth"))
            .query(&[("number", phone_number), ("token", install_token)]);
        let body: AuthResponse = self.send_json(request).await?;

        let code = body
            .result
            .ok_or_else(|| ClientError::Failed("response has no result code".to_string()))?;
        if code != ResponseCode::Success.as_str() {
            warn!(result = %code, "Installation authentication rejected");
            return Err(ClientError::Rejected(code).into());
        }

        match (body.username, body.password, body.participant_id) {
            (Some(username), Some(password), Some(participant_id)) => Ok(MobileUser {
                username,
                password,
                participant_id,
                phone_number: phone_number.to_string(),
                install_token: install_token.to_string(),
            }),
            _ => Err(ClientError::ServerResponse(
                "authentication response is missing username, password or participantId"
                    .to_string(),
            )
            .into()),
        }
    }

    /// Log in as the mobile user, returning an access token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        info!("Logging in user with platform");
        self.ensure_configured()?;

        if username.is_empty() || password.is_empty() {
            return Err(ClientError::AppNotAuthenticated.into());
        }

        let request = self
            .client
            .post(self.config.url("/api/login"))
            .json(&LoginRequest { username, password });
        let body: LoginResponse = self.send_json(request).await?;

        body.access_token
            .ok_or_else(|| ClientError::Credentials.into())
    }

    /// Register every supported phone sensor for the user's study.
    ///
    /// Returns the registrations that were sent.
    pub async fn register_sensors(
        &self,
        user: &MobileUser,
        access_token: &str,
    ) -> Result<Vec<SensorRegistration>> {
        info!("Registering sensors with platform");
        self.ensure_configured()?;
        ensure_token(access_token)?;

        let study_id = user
            .study_id()
            .filter(|_| !user.phone_number.is_empty() && !user.participant_id.is_empty())
            .ok_or(ClientError::AppNotAuthenticated)?;

        let start_date = chrono::Utc::now().timestamp();
        let sensors: Vec<SensorRegistration> = SensorKind::ALL
            .iter()
            .map(|kind| {
                SensorRegistration::new(*kind, &user.participant_id, &user.phone_number, start_date)
            })
            .collect();

        let body = RegisterSensorsRequest {
            id: study_id.parse().ok(),
            upload_sensors: &sensors,
        };
        let request = self
            .client
            .put(self.config.url(&format!("/api/studies/{study_id}/addSensors")))
            .header(AUTH_TOKEN_HEADER, access_token)
            .json(&body);
        let response: RegisterSensorsResponse = self.send_json(request).await?;

        if json_count(&response.errors) > 0 {
            return Err(ClientError::InvalidSensors(response.errors.to_string()).into());
        }

        let registered = json_count(&response.records);
        if registered != sensors.len() {
            return Err(ClientError::Unknown(format!(
                "registered {registered} of {} sensors",
                sensors.len()
            ))
            .into());
        }

        debug!(count = registered, study_id = %study_id, "Sensors registered");
        Ok(sensors)
    }

    /// Register a push notification key for the device.
    pub async fn register_push_key(
        &self,
        user: &MobileUser,
        access_token: &str,
        push_key: &str,
    ) -> Result<()> {
        info!("Registering device for push notifications with platform");
        self.ensure_configured()?;
        ensure_token(access_token)?;

        let study_id = user
            .study_id()
            .filter(|_| !user.phone_number.is_empty())
            .ok_or(ClientError::AppNotAuthenticated)?;

        if push_key.is_empty() {
            return Err(ClientError::GcmNotRegistered.into());
        }

        let request = self
            .client
            .get(self.config.url("/api/sensor/register"))
            .query(&[
                ("serialNumber", user.phone_number.as_str()),
                ("pushNotificationKey", push_key),
            ])
            .header(AUTH_TOKEN_HEADER, access_token);
        let body: PushKeyResponse = self.send_json(request).await?;

        let (Some(id), Some(serial), Some(sensor_type), Some(key)) = (
            body.id,
            body.serial_number,
            body.sensor_type,
            body.push_notification_key,
        ) else {
            return Err(ClientError::ServerResponse(
                "push registration response is missing fields".to_string(),
            )
            .into());
        };

        let matches = study_id.parse::<i64>().ok() == Some(id)
            && serial == user.phone_number
            && sensor_type == PUSH_SENSOR_TYPE
            && key == push_key;
        if !matches {
            warn!(
                id,
                serial = %serial,
                sensor_type = %sensor_type,
                "Push registration echo does not match request"
            );
            return Err(ClientError::Failed("push registration echo mismatch".to_string()).into());
        }

        Ok(())
    }

    /// Fetch protocols for the device.
    ///
    /// With `protocol_id`, fetches that protocol in mobile format keyed on
    /// the participant code; without it, lists every protocol keyed on the
    /// phone number. `metadata` names the query parameter and decides which
    /// identity must be present.
    pub async fn fetch_protocol(
        &self,
        user: &MobileUser,
        access_token: &str,
        protocol_id: Option<u64>,
        metadata: MetadataType,
    ) -> Result<Value> {
        info!(?protocol_id, ?metadata, "Fetching protocol(s) from platform");
        self.ensure_configured()?;
        ensure_token(access_token)?;

        let identity_missing = match metadata {
            MetadataType::SensorSerialNumber => user.phone_number.is_empty(),
            MetadataType::ParticipantCode => user.participant_id.is_empty(),
        };
        let study_id = user
            .study_id()
            .filter(|_| !identity_missing)
            .ok_or(ClientError::AppNotAuthenticated)?;

        let request = match protocol_id {
            Some(id) => self
                .client
                .get(
                    self.config
                        .url(&format!("/api/studies/{study_id}/protocols/{id}")),
                )
                .query(&[
                    ("version", "1.0"),
                    ("format", "mobile"),
                    (metadata.param(), user.participant_id.as_str()),
                ]),
            None => self
                .client
                .get(
                    self.config
                        .url(&format!("/api/studies/{study_id}/participants/-1/protocols")),
                )
                .query(&[
                    ("version", "1.0"),
                    (metadata.param(), user.phone_number.as_str()),
                ]),
        };

        self.send_json(request.header(AUTH_TOKEN_HEADER, access_token))
            .await
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.config.is_configured() {
            Ok(())
        } else {
            Err(ClientError::InvalidApiUrl.into())
        }
    }

    /// Send a request and decode its JSON body.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Platform request failed");
            ClientError::Failed(format!("request failed: {e}"))
        })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Failed(format!("failed to read response: {e}")))?;

        debug!(status = %status, bytes = bytes.len(), "Platform responded");

        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(status = %status, error = %e, "Platform response is not the expected JSON");
            ClientError::Failed(format!("status {status}: invalid JSON body: {e}")).into()
        })
    }
}

fn ensure_token(access_token: &str) -> Result<()> {
    if access_token.is_empty() {
        Err(ClientError::Unauthorized.into())
    } else {
        Ok(())
    }
}
