//! Client configuration.
//!
//! Priority (highest to lowest):
//!   1. CLI / env — passed as `Some(value)` from clap
//!   2. TOML file at `{data_dir}/config.toml`
//!   3. Built-in defaults

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

const DEFAULT_API_BASE_URL: &str = "https://api.vochub.app";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the remote VoC API.
    pub api_base_url: String,
    /// Log filter (trace, debug, info, warn, error).
    pub log: String,
    /// Directory holding `config.toml`.
    pub data_dir: PathBuf,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

/// The `config.toml` layer. Every field optional — only what the user set.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TomlConfig {
    api_base_url: Option<String>,
    log: Option<String>,
    timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Build config from CLI/env args + optional TOML file.
    pub fn new(
        api_base_url: Option<String>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        // Load TOML as the lowest-priority override layer
        let toml = load_toml(&data_dir).unwrap_or_default();

        Self {
            api_base_url: api_base_url
                .or(toml.api_base_url)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            log: log.or(toml.log).unwrap_or_else(|| "info".to_string()),
            timeout_secs: toml.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            data_dir,
        }
    }
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    if !path.exists() {
        return None;
    }
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), err = %e, "could not read config.toml");
            return None;
        }
    };
    match toml::from_str(&raw) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            // A malformed file must not brick the client — fall through to
            // defaults and tell the user.
            warn!(path = %path.display(), err = %e, "ignoring malformed config.toml");
            None
        }
    }
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/vocc
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("vocc");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_DATA_HOME/vocc or ~/.local/share/vocc
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("vocc");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("vocc");
        }
    }
    #[cfg(target_os = "windows")]
    {
        // %APPDATA%\vocc
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("vocc");
        }
    }
    // Fallback
    PathBuf::from(".vocc")
}
