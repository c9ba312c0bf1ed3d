//! Client configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer; every field has a
//! default so an absent or partial file is fine.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TOKEN_PATH: &str = "/api/token";
pub const DEFAULT_PASSWORD_PATH: &str = "/api/verify-password";
pub const DEFAULT_ANALYZE_PATH: &str = "/api/analyze";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct LensConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub access: AccessConfig,
}

/// Backend endpoints.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_token_path")]
    pub token_path: String,
    #[serde(default = "default_password_path")]
    pub password_path: String,
    #[serde(default = "default_analyze_path")]
    pub analyze_path: String,
    /// Transport-level timeout. `None` leaves requests unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_path: default_token_path(),
            password_path: default_password_path(),
            analyze_path: default_analyze_path(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// Joins the base URL and an endpoint path without doubling slashes.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Shared-password gate.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AccessConfig {
    #[serde(default = "default_access_enabled")]
    pub enabled: bool,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            enabled: default_access_enabled(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_token_path() -> String {
    DEFAULT_TOKEN_PATH.to_string()
}

fn default_password_path() -> String {
    DEFAULT_PASSWORD_PATH.to_string()
}

fn default_analyze_path() -> String {
    DEFAULT_ANALYZE_PATH.to_string()
}

fn default_access_enabled() -> bool {
    true
}
