//! Configuration loaded from `~/.config/medici/config.toml`.
//!
//! Every section is optional; missing keys fall back to their defaults.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "MEDICI_API_URL";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file is not valid TOML for [`Config`].
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Root application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub application: ApplicationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Origin serving the `/api/...` endpoints.
    pub base_url: String,
    /// Per-request transport timeout for submissions.
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a lookup fires.
    pub debounce_ms: u64,
    /// Deadline for a single institution lookup.
    pub lookup_timeout_ms: u64,
    /// Shortest query, in characters, that triggers a lookup.
    pub min_query_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Smallest amount a student may request, in USD.
    pub minimum_amount: u64,
    /// Country preselected on a fresh form.
    pub default_country: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            request_timeout_ms: 15_000,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            lookup_timeout_ms: 5_000,
            min_query_chars: 3,
        }
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            minimum_amount: 1_000,
            default_country: "US".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

impl Config {
    /// Returns the default config file location, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("medici").join("config.toml"))
    }

    /// Loads configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// tried and defaults are used if nothing is there. The result has the
    /// `MEDICI_API_URL` override applied and is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => {
                    debug!("no config file found, using defaults");
                    Self::default()
                }
            },
        };
        if let Ok(url) = env::var(API_URL_ENV) {
            info!("{API_URL_ENV} set, overriding api.base_url");
            config.api.base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Parses a config file without applying overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded config");
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.api.base_url).map_err(|e| {
            ConfigError::Invalid(format!("api.base_url {:?}: {e}", self.api.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "api.base_url must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.api.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "api.request_timeout_ms must be positive".into(),
            ));
        }
        if self.search.debounce_ms == 0 {
            return Err(ConfigError::Invalid(
                "search.debounce_ms must be positive".into(),
            ));
        }
        if self.search.lookup_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "search.lookup_timeout_ms must be positive".into(),
            ));
        }
        if self.search.min_query_chars == 0 {
            return Err(ConfigError::Invalid(
                "search.min_query_chars must be at least 1".into(),
            ));
        }
        if self.application.minimum_amount == 0 {
            return Err(ConfigError::Invalid(
                "application.minimum_amount must be positive".into(),
            ));
        }
        Ok(())
    }
}
