//! Platform result codes.

use serde::{Deserialize, Serialize};
use sp_error::{ClientError, QueueError, SpError, StorageError};
use std::str::FromStr;

/// Result code carried in the `result` field of platform responses.
///
/// Every [`SpError`] maps onto exactly one code, so callers that only care
/// about the platform's vocabulary can convert with `ResponseCode::from(&err)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseCode {
    #[serde(rename = "OK")]
    Success,
    #[serde(rename = "APP_NOT_AUTHENTICATED")]
    AppNotAuthenticated,
    #[serde(rename = "CREDENTIALS_ERROR")]
    CredentialsError,
    #[serde(rename = "FAILED")]
    Failed,
    #[serde(rename = "FILE_NOT_EXIST")]
    FileNotExist,
    #[serde(rename = "GCM_NOT_REGISTERED")]
    GcmNotRegistered,
    #[serde(rename = "INVALID_API_URL")]
    InvalidApiUrl,
    #[serde(rename = "INVALID_AWS_INFO")]
    InvalidAwsInfo,
    #[serde(rename = "INVALID_MHEALTH_FILE")]
    InvalidMhealthFile,
    #[serde(rename = "INVALID_SENSORS")]
    InvalidSensors,
    #[serde(rename = "INVALID_REQUEST_PARAMS")]
    InvalidParams,
    #[serde(rename = "PARTICIPANT_NOT_FOUND")]
    ParticipantNotFound,
    #[serde(rename = "SERVER_RESPONSE_ERROR")]
    ServerResponseError,
    #[serde(rename = "UNAUTHORIZED")]
    Unauthorized,
    #[serde(rename = "UNKNOWN_ERROR")]
    UnknownError,
}

impl ResponseCode {
    /// Wire representation of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::AppNotAuthenticated => "APP_NOT_AUTHENTICATED",
            Self::CredentialsError => "CREDENTIALS_ERROR",
            Self::Failed => "FAILED",
            Self::FileNotExist => "FILE_NOT_EXIST",
            Self::GcmNotRegistered => "GCM_NOT_REGISTERED",
            Self::InvalidApiUrl => "INVALID_API_URL",
            Self::InvalidAwsInfo => "INVALID_AWS_INFO",
            Self::InvalidMhealthFile => "INVALID_MHEALTH_FILE",
            Self::InvalidSensors => "INVALID_SENSORS",
            Self::InvalidParams => "INVALID_REQUEST_PARAMS",
            Self::ParticipantNotFound => "PARTICIPANT_NOT_FOUND",
            Self::ServerResponseError => "SERVER_RESPONSE_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// Whether this is the success code.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl std::fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseCode {
    type Err = SpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = match s {
            "OK" => Self::Success,
            "APP_NOT_AUTHENTICATED" => Self::AppNotAuthenticated,
            "CREDENTIALS_ERROR" => Self::CredentialsError,
            "FAILED" => Self::Failed,
            "FILE_NOT_EXIST" => Self::FileNotExist,
            "GCM_NOT_REGISTERED" => Self::GcmNotRegistered,
            "INVALID_API_URL" => Self::InvalidApiUrl,
            "INVALID_AWS_INFO" => Self::InvalidAwsInfo,
            "INVALID_MHEALTH_FILE" => Self::InvalidMhealthFile,
            "INVALID_SENSORS" => Self::InvalidSensors,
            "INVALID_REQUEST_PARAMS" => Self::InvalidParams,
            "PARTICIPANT_NOT_FOUND" => Self::ParticipantNotFound,
            "SERVER_RESPONSE_ERROR" => Self::ServerResponseError,
            "UNAUTHORIZED" => Self::Unauthorized,
            "UNKNOWN_ERROR" => Self::UnknownError,
            other => {
                return Err(SpError::Client(ClientError::ServerResponse(format!(
                    "unknown result code '{other}'"
                ))))
            }
        };
        Ok(code)
    }
}

impl From<&SpError> for ResponseCode {
    fn from(error: &SpError) -> Self {
        match error {
            SpError::Client(e) => match e {
                ClientError::InvalidApiUrl => Self::InvalidApiUrl,
                ClientError::AppNotAuthenticated => Self::AppNotAuthenticated,
                ClientError::Credentials => Self::CredentialsError,
                ClientError::Unauthorized => Self::Unauthorized,
                ClientError::InvalidSensors(_) => Self::InvalidSensors,
                ClientError::GcmNotRegistered => Self::GcmNotRegistered,
                ClientError::ServerResponse(_) => Self::ServerResponseError,
                ClientError::Rejected(code) => code.parse().unwrap_or(Self::UnknownError),
                ClientError::Failed(_) => Self::Failed,
                ClientError::Unknown(_) => Self::UnknownError,
            },
            SpError::Storage(e) => match e {
                StorageError::InvalidConfig(_) => Self::InvalidAwsInfo,
                StorageError::NotFound(_) => Self::FileNotExist,
                StorageError::Io(_)
                | StorageError::Upload(_)
                | StorageError::IntegrityMismatch { .. } => Self::Failed,
            },
            SpError::Queue(QueueError::Serialize(_)) => Self::UnknownError,
            SpError::Queue(_) => Self::Failed,
            SpError::Filename(_) => Self::InvalidMhealthFile,
            SpError::Config(_) => Self::InvalidParams,
            SpError::Other(_) => Self::UnknownError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sp_error::FilenameError;

    #[test]
    fn test_wire_names_round_trip_through_serde() {
        let json = serde_json::to_string(&ResponseCode::InvalidParams).unwrap();
        assert_eq!(json, "\"INVALID_REQUEST_PARAMS\"");

        let code: ResponseCode = serde_json::from_str("\"OK\"").unwrap();
        assert!(code.is_success());
    }

    #[test]
    fn test_from_str_matches_as_str() {
        for code in [
            ResponseCode::Success,
            ResponseCode::GcmNotRegistered,
            ResponseCode::ParticipantNotFound,
            ResponseCode::UnknownError,
        ] {
            assert_eq!(code.as_str().parse::<ResponseCode>().unwrap(), code);
        }
    }

    #[test]
    fn test_unknown_code_is_an_error() {
        assert!("NOT_A_CODE".parse::<ResponseCode>().is_err());
    }

    #[test]
    fn test_error_mapping() {
        let err = SpError::Filename(FilenameError::MissingSuffix);
        assert_eq!(ResponseCode::from(&err), ResponseCode::InvalidMhealthFile);

        let err = SpError::Client(ClientError::Rejected("PARTICIPANT_NOT_FOUND".to_string()));
        assert_eq!(ResponseCode::from(&err), ResponseCode::ParticipantNotFound);

        let err = SpError::Storage(StorageError::NotFound("x".to_string()));
        assert_eq!(ResponseCode::from(&err), ResponseCode::FileNotExist);
    }
}
