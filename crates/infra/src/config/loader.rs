//! Configuration loader
//!
//! Loads SDK configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `DEVICEPLAT_CLIENT_ID`: OAuth client id (required)
//! - `DEVICEPLAT_BASE_URL`: API base URL
//! - `DEVICEPLAT_TIMEOUT_MS`: Per-request timeout in milliseconds
//! - `DEVICEPLAT_MAX_RETRIES`: Retries after the first attempt
//! - `DEVICEPLAT_RETRY_BASE_DELAY_MS`, `DEVICEPLAT_RETRY_MAX_JITTER_MS`,
//!   `DEVICEPLAT_RETRY_MAX_DELAY_MS`: Backoff tuning
//! - `DEVICEPLAT_AUTH_BASE_URL`: Authorization server base URL
//! - `DEVICEPLAT_AUDIENCE`: API identifier requested as `audience`
//! - `DEVICEPLAT_SCOPES`: Space- or comma-separated scopes
//! - `DEVICEPLAT_REDIRECT_URI`: Redirect URI for the browser flow
//! - `DEVICEPLAT_AUTH_TIMEOUT_MS`: Timeout for authorization server calls
//! - `DEVICEPLAT_CONFIG`: Explicit config file, used by [`load`] when the
//!   environment is incomplete
//!
//! Unset optional variables keep their defaults.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./deviceplat.json` or `./deviceplat.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use deviceplat_domain::{DevicePlatError, Result, SdkConfig};

const CONFIG_PATH_VAR: &str = "DEVICEPLAT_CONFIG";

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If required
/// variables are missing, falls back to `DEVICEPLAT_CONFIG` or a probed
/// config file.
///
/// # Errors
/// Returns `DevicePlatError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
pub fn load() -> Result<SdkConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from))
        }
    }
}

/// Load configuration from the process environment
///
/// # Errors
/// Returns `DevicePlatError::Config` if `DEVICEPLAT_CLIENT_ID` is missing
/// or a numeric variable does not parse.
pub fn load_from_env() -> Result<SdkConfig> {
    load_from_env_with(|key| std::env::var(key).ok())
}

/// Load configuration through an arbitrary variable lookup
///
/// # Errors
/// Same as [`load_from_env`].
pub fn load_from_env_with<F>(lookup: F) -> Result<SdkConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let env = Env(lookup);
    let mut config = SdkConfig::default();

    config.auth.client_id = env.required("DEVICEPLAT_CLIENT_ID")?;
    if let Some(url) = env.string("DEVICEPLAT_AUTH_BASE_URL") {
        config.auth.auth_base_url = url;
    }
    if let Some(audience) = env.string("DEVICEPLAT_AUDIENCE") {
        config.auth.audience = audience;
    }
    if let Some(scopes) = env.string("DEVICEPLAT_SCOPES") {
        config.auth.scopes = scopes
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }
    config.auth.redirect_uri = env.string("DEVICEPLAT_REDIRECT_URI");
    if let Some(timeout) = env.parsed("DEVICEPLAT_AUTH_TIMEOUT_MS")? {
        config.auth.timeout_ms = timeout;
    }

    if let Some(url) = env.string("DEVICEPLAT_BASE_URL") {
        config.api.base_url = url;
    }
    if let Some(timeout) = env.parsed("DEVICEPLAT_TIMEOUT_MS")? {
        config.api.timeout_ms = timeout;
    }
    if let Some(retries) = env.parsed("DEVICEPLAT_MAX_RETRIES")? {
        config.api.max_retries = retries;
    }
    if let Some(delay) = env.parsed("DEVICEPLAT_RETRY_BASE_DELAY_MS")? {
        config.api.retry.base_delay_ms = delay;
    }
    if let Some(jitter) = env.parsed("DEVICEPLAT_RETRY_MAX_JITTER_MS")? {
        config.api.retry.max_jitter_ms = jitter;
    }
    if let Some(max) = env.parsed("DEVICEPLAT_RETRY_MAX_DELAY_MS")? {
        config.api.retry.max_delay_ms = max;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
/// Missing fields take their defaults.
///
/// # Errors
/// Returns `DevicePlatError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<SdkConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DevicePlatError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DevicePlatError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DevicePlatError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<SdkConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DevicePlatError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DevicePlatError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(DevicePlatError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("deviceplat.json"),
        dir.join("deviceplat.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Variable lookup with the loader's parsing rules.
struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Non-empty, trimmed value.
    fn string(&self, key: &str) -> Option<String> {
        (self.0)(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.string(key).ok_or_else(|| {
            DevicePlatError::Config(format!("Missing required environment variable: {}", key))
        })
    }

    fn parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.string(key)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|e| DevicePlatError::Config(format!("Invalid {}: {}", key, e)))
            })
            .transpose()
    }
}
