//! sp-client - REST client for the mHealth collection platform.
//!
//! Wraps the platform calls a participant's device makes:
//!
//! - installation authentication (phone number + install token)
//! - user login (access token)
//! - sensor registration for the participant's study
//! - push notification key registration
//! - protocol fetches
//!
//! The platform location is an explicit [`PlatformConfig`] owned by the
//! client. Every call is `async` and resolves to a single `Result`.
//!
//! # Example
//!
//! ```ignore
//! use sp_client::{PlatformClient, PlatformConfig};
//!
//! let client = PlatformClient::new(PlatformConfig::new("https://platform.example.com"))?;
//! let user = client.authenticate_installation("1112223333", &install_token).await?;
//! let token = client.login(&user.username, &user.password).await?;
//! client.register_sensors(&user, &token).await?;
//! ```

pub mod client;
pub mod config;
mod payload;

pub use client::{PlatformClient, AUTH_TOKEN_HEADER, PUSH_SENSOR_TYPE};
pub use config::{PlatformConfig, DEFAULT_TIMEOUT_SECS};
