//! Configuration loading for the SPELLKIT command line.
//!
//! All fields are required unless explicitly marked optional. The API key is
//! never stored in the file; the file names the environment variable that
//! holds it.

use serde::Deserialize;
use spellkit_core::{EngineConfig, GuardrailConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "SPELLKIT_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    pub provider: ProviderSection,
    pub dictionary: DictionarySection,
    /// Directory holding persisted usage counters and cached responses
    pub state_dir: PathBuf,
    pub log_format: LogFormat,
    pub guardrail: GuardrailConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSection {
    pub model: String,
    /// Name of the environment variable carrying the API key
    pub api_key_env: String,
    pub base_url: Option<String>,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DictionarySection {
    pub url: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or SPELLKIT_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("Environment variable {0} is not set")]
    MissingApiKey(String),
}

impl CliConfig {
    /// Load from `explicit`, falling back to `SPELLKIT_CONFIG`.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(config_path_from_env)
            .ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "provider.model",
                reason: "must not be empty".to_string(),
            });
        }
        if self.provider.api_key_env.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "provider.api_key_env",
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(url) = &self.provider.base_url {
            if !is_http_url(url) {
                return Err(ConfigError::InvalidValue {
                    field: "provider.base_url",
                    reason: "must start with http:// or https://".to_string(),
                });
            }
        }
        if self.provider.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "provider.timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if !is_http_url(&self.dictionary.url) {
            return Err(ConfigError::InvalidValue {
                field: "dictionary.url",
                reason: "must start with http:// or https://".to_string(),
            });
        }
        if self.dictionary.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dictionary.timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.state_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "state_dir",
                reason: "must not be empty".to_string(),
            });
        }
        if let Err(err) = self.guardrail.validate() {
            return Err(ConfigError::InvalidValue {
                field: "guardrail",
                reason: err.to_string(),
            });
        }
        if let Err(err) = self.engine.validate() {
            return Err(ConfigError::InvalidValue {
                field: "engine",
                reason: err.to_string(),
            });
        }
        Ok(())
    }

    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        match std::env::var(&self.provider.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey(self.provider.api_key_env.clone())),
        }
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider.timeout_ms)
    }

    pub fn dictionary_timeout(&self) -> Duration {
        Duration::from_millis(self.dictionary.timeout_ms)
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV).ok().map(PathBuf::from)
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
