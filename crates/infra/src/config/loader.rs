//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `TRANSTAT_BASE_URL`: API base URL (required)
//! - `TRANSTAT_AUTH_TOKEN`: API auth token (required)
//! - `TRANSTAT_AUTH_SCHEME`: Authorization scheme (default "Bearer")
//! - `TRANSTAT_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `TRANSTAT_MAX_ATTEMPTS`: Retry attempt budget
//! - `TRANSTAT_INITIAL_DELAY_MS`: First backoff delay
//! - `TRANSTAT_BACKOFF_FACTOR`: Backoff multiplier
//! - `TRANSTAT_MAX_DELAY_MS`: Backoff cap
//! - `TRANSTAT_OUTPUT_DIR`: Report artifact directory
//! - `TRANSTAT_EXCLUDED_USERS`: Comma-separated exclusion list
//! - `TRANSTAT_MIN_FREE_DISK_MB`: Preflight disk low-water mark
//!
//! ## File Locations
//! The loader probes `config.{json,toml}` and `transtat.{json,toml}` in
//! the working directory, up to two parent directories, and next to the
//! executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use transtat_domain::{ApiConfig, Config, ReportConfig, ReportError, Result, RetryTuning};
use url::Url;

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `ReportError::Config` if configuration cannot be loaded from
/// either source, or validation fails.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `TRANSTAT_BASE_URL` and `TRANSTAT_AUTH_TOKEN` must be present; every
/// other variable falls back to its default.
///
/// # Errors
/// Returns `ReportError::Config` if required variables are missing or
/// any variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var("TRANSTAT_BASE_URL")?;
    let auth_token = env_var("TRANSTAT_AUTH_TOKEN")?;

    let defaults = RetryTuning::default();
    let report_defaults = ReportConfig::default();

    let config = Config {
        api: ApiConfig {
            base_url,
            auth_scheme: std::env::var("TRANSTAT_AUTH_SCHEME")
                .unwrap_or_else(|_| "Bearer".to_string()),
            auth_token,
            timeout_secs: env_parse("TRANSTAT_TIMEOUT_SECS", 30)?,
        },
        retry: RetryTuning {
            max_attempts: env_parse("TRANSTAT_MAX_ATTEMPTS", defaults.max_attempts)?,
            initial_delay_ms: env_parse("TRANSTAT_INITIAL_DELAY_MS", defaults.initial_delay_ms)?,
            backoff_factor: env_parse("TRANSTAT_BACKOFF_FACTOR", defaults.backoff_factor)?,
            max_delay_ms: env_parse("TRANSTAT_MAX_DELAY_MS", defaults.max_delay_ms)?,
        },
        report: ReportConfig {
            output_dir: std::env::var("TRANSTAT_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(report_defaults.output_dir),
            excluded_users: match std::env::var("TRANSTAT_EXCLUDED_USERS") {
                Ok(list) => list
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
                    .collect(),
                Err(_) => report_defaults.excluded_users,
            },
            min_free_disk_mb: env_parse(
                "TRANSTAT_MIN_FREE_DISK_MB",
                report_defaults.min_free_disk_mb,
            )?,
        },
    };

    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ReportError::Config` if no file is found, the format is
/// invalid, or validation fails.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ReportError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ReportError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ReportError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ReportError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ReportError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(ReportError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    let names = ["config.json", "config.toml", "transtat.json", "transtat.toml"];

    if let Ok(cwd) = std::env::current_dir() {
        for prefix in ["", "../", "../../"] {
            for name in names {
                candidates.push(cwd.join(format!("{prefix}{name}")));
            }
        }
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            for name in names {
                candidates.push(exe_dir.join(name));
            }
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Cross-field validation applied to every loading path.
fn validate(config: &Config) -> Result<()> {
    Url::parse(&config.api.base_url)
        .map_err(|e| ReportError::Config(format!("Invalid base URL: {e}")))?;

    if config.api.auth_token.trim().is_empty() {
        return Err(ReportError::Config("auth_token must not be empty".to_string()));
    }

    if config.retry.max_attempts == 0 {
        return Err(ReportError::Config("retry.max_attempts must be at least 1".to_string()));
    }

    Ok(())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| ReportError::Config(format!("Missing required environment variable: {key}")))
}

/// Parse an optional environment variable, falling back to `default`.
fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|e| ReportError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}
