//! Request and response bodies exchanged with the platform.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sp_types::SensorRegistration;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthResponse {
    pub username: Option<String>,
    pub password: Option<String>,
    pub participant_id: Option<String>,
    pub result: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub access_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterSensorsRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub upload_sensors: &'a [SensorRegistration],
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RegisterSensorsResponse {
    #[serde(default)]
    pub errors: Value,
    #[serde(default)]
    pub records: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PushKeyResponse {
    pub id: Option<i64>,
    pub serial_number: Option<String>,
    pub sensor_type: Option<String>,
    pub push_notification_key: Option<String>,
}

/// Element count of a JSON array or object; zero for anything else.
pub(crate) fn json_count(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => 0,
    }
}
