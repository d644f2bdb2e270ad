//! Mobile user identity.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// A participant's device, as returned by installation authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobileUser {
    /// Platform username for the device
    pub username: String,

    /// Platform password for the device
    pub password: String,

    /// Participant code within the study
    pub participant_id: String,

    /// Phone number, also used as the app's serial number
    pub phone_number: String,

    /// Install token handed out by the platform
    pub install_token: String,
}

impl MobileUser {
    /// Study id encoded in the install token.
    pub fn study_id(&self) -> Option<String> {
        study_id_from_token(&self.install_token)
    }
}

/// Decode the study id carried by an install token.
///
/// The token is the base64 encoding of the study id. Returns `None` for an
/// empty token or one that is not valid base64 / UTF-8.
pub fn study_id_from_token(token: &str) -> Option<String> {
    if token.is_empty() {
        return None;
    }
    let bytes = STANDARD.decode(token).ok()?;
    String::from_utf8(bytes).ok()
}
