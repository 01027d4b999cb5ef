//! User configuration: where documents live and how to reach the API.
//!
//! Read from `<config_dir>/inkboard/config.toml`, then overridden by
//! `INKBOARD_*` environment variables.

use crate::store::{CanvasStore, FileStore, HttpStore, StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default API root.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

pub const ENV_API_URL: &str = "INKBOARD_API_URL";
pub const ENV_TOKEN: &str = "INKBOARD_TOKEN";
pub const ENV_CHANNEL_ID: &str = "INKBOARD_CHANNEL_ID";
pub const ENV_BACKEND: &str = "INKBOARD_BACKEND";
pub const ENV_DATA_DIR: &str = "INKBOARD_DATA_DIR";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid URL {0:?}: {1}")]
    InvalidUrl(String, url::ParseError),
    #[error("Unknown backend {0:?} (expected \"remote\" or \"local\")")]
    InvalidBackend(String),
}

/// Where documents are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// The `/canvas` HTTP API.
    #[default]
    Remote,
    /// JSON files on this machine.
    Local,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(Backend::Remote),
            "local" => Ok(Backend::Local),
            _ => Err(ConfigError::InvalidBackend(s.to_string())),
        }
    }
}

fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("default API URL is valid")
}

fn default_timeout_secs() -> u64 {
    30
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API root; documents live under `{api_url}/canvas`.
    pub api_url: Url,
    /// Bearer token. Without one the remote backend is unusable.
    pub token: Option<String>,
    /// Sent as `X-Channel-Id` when set.
    pub channel_id: Option<String>,
    pub backend: Backend,
    /// Directory for the local backend.
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
            channel_id: None,
            backend: Backend::default(),
            data_dir: None,
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// `<config_dir>/inkboard/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("inkboard").join("config.toml"))
    }

    /// Load from the default path and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load a specific file, without environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Apply `INKBOARD_*` overrides. Empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_API_URL) {
            self.api_url = Url::parse(&url).map_err(|e| ConfigError::InvalidUrl(url, e))?;
        }
        if let Some(token) = get(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Some(channel) = get(ENV_CHANNEL_ID) {
            self.channel_id = Some(channel);
        }
        if let Some(backend) = get(ENV_BACKEND) {
            self.backend = backend.parse()?;
        }
        if let Some(dir) = get(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    /// True when a non-empty token is configured.
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Directory for the local backend.
    pub fn local_dir(&self) -> StoreResult<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => FileStore::default_dir(),
        }
    }

    /// Open the configured backend.
    pub fn open_store(&self) -> StoreResult<Box<dyn CanvasStore>> {
        match self.backend {
            Backend::Remote => {
                if !self.is_authenticated() {
                    return Err(StoreError::Unauthorized);
                }
                log::info!("Using remote documents at {}", self.api_url);
                Ok(Box::new(HttpStore::from_config(self)?))
            }
            Backend::Local => {
                let dir = self.local_dir()?;
                log::info!("Using local documents in {}", dir.display());
                Ok(Box::new(FileStore::new(dir)?))
            }
        }
    }
}
