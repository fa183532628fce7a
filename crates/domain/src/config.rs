//! Configuration structures
//!
//! Loaded by the infrastructure layer from environment variables or a
//! JSON/TOML file; every tuning knob has a default so a minimal config
//! only needs the API base URL and token.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EXCLUDED_USERS, DEFAULT_MIN_FREE_DISK_MB};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub retry: RetryTuning,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Remote API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the project-management API, e.g.
    /// `https://cloud.example.com/rest-api`.
    pub base_url: String,

    /// Authorization scheme placed before the token, e.g. `Bearer`.
    #[serde(default = "default_auth_scheme")]
    pub auth_scheme: String,

    /// Opaque auth token; lifecycle management is out of scope here.
    pub auth_token: String,

    /// Per-request timeout. Timeouts classify as transient failures.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Tuning for the retry executor wrapped around every API call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryTuning {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub backoff_factor: f64,
    pub max_delay_ms: u64,
}

impl Default for RetryTuning {
    fn default() -> Self {
        Self { max_attempts: 5, initial_delay_ms: 1500, backoff_factor: 2.0, max_delay_ms: 60_000 }
    }
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory receiving the JSON report artifacts.
    pub output_dir: PathBuf,

    /// Usernames whose work is excluded from every aggregate
    /// (case-insensitive match).
    pub excluded_users: Vec<String>,

    /// Free-disk low-water mark for the preflight check, megabytes.
    pub min_free_disk_mb: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("reports"),
            excluded_users: DEFAULT_EXCLUDED_USERS.iter().map(|u| (*u).to_string()).collect(),
            min_free_disk_mb: DEFAULT_MIN_FREE_DISK_MB,
        }
    }
}

fn default_auth_scheme() -> String {
    "Bearer".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
