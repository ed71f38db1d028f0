//! # Session Configuration
//!
//! Credentials and endpoint settings shared read-only by every object bound to a session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "https://api.e-conomic.com/secure/api1/EconomicWebservice.asmx";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Connection settings for one agreement.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub agreement_number: u64,

    pub user_name: String,

    #[serde(default, skip_serializing)]
    pub password: String,

    /// Service endpoint the transport connects to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout the transport should impose, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl SessionConfig {
    pub fn new(agreement_number: u64, user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            agreement_number,
            user_name: user_name.into(),
            password: password.into(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("agreement_number", &self.agreement_number)
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
