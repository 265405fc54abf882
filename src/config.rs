//! Runtime configuration: credential, endpoint, and session limits.
//!
//! Values come from an optional JSON config file and the environment, with the
//! environment taking priority. A missing credential is not an error here; the
//! gateway reports it as a recoverable failure.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";
pub const DEFAULT_FREE_LIMIT: u32 = 3;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const ENDPOINT_ENV: &str = "COMPASS_GEMINI_ENDPOINT";
pub const CONFIG_PATH_ENV: &str = "COMPASS_CONFIG";

/// On-disk config file shape. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub free_limit: Option<u32>,
}

/// Resolved settings used by the gateway and the session loop.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub free_limit: u32,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("free_limit", &self.free_limit)
            .finish()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            free_limit: DEFAULT_FREE_LIMIT,
        }
    }
}

/// Default config file location under the user config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("compass").join("config.json"))
}

/// Load settings from the config file (explicit path, `COMPASS_CONFIG`, or the
/// default location) and overlay the environment.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let file = match explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
    {
        Some(path) => Some(read_config_file(&path)?),
        None => match default_config_path() {
            Some(path) if path.is_file() => Some(read_config_file(&path)?),
            _ => None,
        },
    };
    let settings = resolve_settings(
        file.unwrap_or_default(),
        env::var(API_KEY_ENV).ok(),
        env::var(ENDPOINT_ENV).ok(),
    );
    tracing::debug!(?settings, "settings resolved");
    Ok(settings)
}

/// Read and validate a config file.
pub fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: ConfigFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config JSON {}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(endpoint) = config.endpoint.as_deref() {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(anyhow!(
                "endpoint must be an http(s) URL (got {endpoint:?})"
            ));
        }
    }
    if config.free_limit == Some(0) {
        return Err(anyhow!("free_limit must be at least 1"));
    }
    Ok(())
}

/// Merge file values with environment values; environment wins.
pub fn resolve_settings(
    file: ConfigFile,
    env_api_key: Option<String>,
    env_endpoint: Option<String>,
) -> Settings {
    let api_key = non_blank(env_api_key).or_else(|| non_blank(file.api_key));
    let endpoint = non_blank(env_endpoint)
        .or_else(|| non_blank(file.endpoint))
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    Settings {
        api_key,
        endpoint,
        free_limit: file.free_limit.unwrap_or(DEFAULT_FREE_LIMIT),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
