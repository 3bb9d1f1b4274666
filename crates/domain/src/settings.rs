//! Application settings
//!
//! Defines the tunables for the Khabari API client. Loaded by the
//! infrastructure layer from defaults, an optional config file and the
//! environment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::request::Headers;

/// Runtime settings for the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Maximum number of history entries to keep.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Total request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Maximum number of redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// User-Agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whether a non-empty body must be valid JSON before sending.
    #[serde(default = "default_validate_json_body")]
    pub validate_json_body: bool,

    /// Headers every new tab starts with.
    #[serde(default = "default_headers")]
    pub default_headers: Headers,

    /// Directory for persisted state; the platform data dir when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_history_limit() -> usize {
    50
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    concat!("Khabari/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_validate_json_body() -> bool {
    true
}

fn default_headers() -> Headers {
    [("Accept", "application/json"), ("Content-Type", "application/json")]
        .into_iter()
        .collect()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            request_timeout_ms: default_request_timeout_ms(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            validate_json_body: default_validate_json_body(),
            default_headers: default_headers(),
            data_dir: None,
            log_level: default_log_level(),
        }
    }
}
