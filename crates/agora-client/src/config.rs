//! Client configuration.

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Service origin used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
/// Directory name for data storage under the home directory.
pub const DATA_DIR: &str = ".agora";

const API_PREFIX: &str = "api/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid base URL {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("Cannot get home directory")]
    NoHomeDirectory,

    #[error("Failed to create data directory: {0}")]
    DataDirectory(#[from] std::io::Error),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service origin, e.g. `http://127.0.0.1:8000`
    pub base_url: String,
    pub timeout_secs: u64,
    /// Where the session token is kept; `~/.agora` when unset
    pub data_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            data_dir: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Default::default() }
    }

    /// Defaults overridden by `AGORA_URL`, `AGORA_TIMEOUT_SECS` and `AGORA_DATA_DIR`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("AGORA_URL") {
            config.base_url = url;
        }
        if let Some(secs) = std::env::var("AGORA_TIMEOUT_SECS").ok().and_then(|s| s.parse().ok()) {
            config.timeout_secs = secs;
        }
        if let Ok(dir) = std::env::var("AGORA_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }
        config
    }

    /// Root every endpoint path is resolved against (`<base_url>/api/`).
    pub fn api_root(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            message: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                message: "not a hierarchical URL".to_string(),
            });
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.join(API_PREFIX).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            message: e.to_string(),
        })
    }

    /// Turn a media reference from the server into a URL the view can load.
    ///
    /// Absolute `http(s)` references pass through; relative ones are prefixed with the
    /// service origin.
    pub fn resolve_media_url(&self, reference: Option<&str>) -> Option<String> {
        let reference = reference.map(str::trim).filter(|r| !r.is_empty())?;
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return Some(reference.to_string());
        }
        let origin = self.base_url.trim_end_matches('/');
        if reference.starts_with('/') {
            Some(format!("{origin}{reference}"))
        } else {
            Some(format!("{origin}/{reference}"))
        }
    }

    /// Get the data directory path, creating it if needed.
    ///
    /// Priority:
    /// 1. `data_dir` (set from `AGORA_DATA_DIR` by [`ClientConfig::from_env`])
    /// 2. `~/.agora`
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        let dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?.join(DATA_DIR),
        };
        if !dir.exists() {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(dir)
    }
}
