use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use catalog_core::DEFAULT_PAGE_SIZE;
use catalog_engine::FetchSettings;
use catalog_logging::catalog_info;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILENAME: &str = "catalog.ron";
pub const API_BASE_ENV: &str = "CATALOG_API_BASE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid api base url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub batch_timeout_ms: u64,
    pub max_body_bytes: u64,
    pub provider_page_size: usize,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            connect_timeout_ms: 5_000,
            request_timeout_ms: 10_000,
            batch_timeout_ms: 15_000,
            max_body_bytes: 2 * 1024 * 1024,
            provider_page_size: DEFAULT_PAGE_SIZE,
            log_destination: LogDestination::default(),
        }
    }
}

impl AppConfig {
    /// Loads `explicit` if given, else `./catalog.ron` when present, else
    /// defaults. `CATALOG_API_BASE` overrides the base URL.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILENAME);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_base_override(std::env::var(API_BASE_ENV).ok());
        config.fetch_settings()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        catalog_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn apply_base_override(&mut self, value: Option<String>) {
        if let Some(base) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            self.api_base_url = base;
        }
    }

    pub fn fetch_settings(&self) -> Result<FetchSettings, ConfigError> {
        let base_url =
            Url::parse(&self.api_base_url).map_err(|source| ConfigError::InvalidBaseUrl {
                url: self.api_base_url.clone(),
                source,
            })?;
        Ok(FetchSettings {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            batch_timeout: Duration::from_millis(self.batch_timeout_ms),
            max_bytes: self.max_body_bytes,
            ..FetchSettings::new(base_url)
        })
    }
}
