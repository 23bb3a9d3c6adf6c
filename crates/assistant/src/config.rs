use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid value for {name}: '{value}'")]
    InvalidEnv { name: &'static str, value: String },
}

/// Settings for the text-generation capability. Without an API key the
/// assistant runs on rules alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub api_key: Option<String>,
    /// Model for expense parsing and the direct question prompt.
    pub model: String,
    /// Model for the retrieval question prompt.
    pub retrieval_model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash".to_string(),
            retrieval_model: "gemini-2.0-flash-exp".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: 20,
        }
    }
}

impl AssistantConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Applies `GEMINI_API_KEY`, `HISAB_MODEL`, `HISAB_RETRIEVAL_MODEL` and
    /// `HISAB_TIMEOUT_SECS` from the process environment.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("GEMINI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(model) = get("HISAB_MODEL") {
            self.model = model;
        }
        if let Some(model) = get("HISAB_RETRIEVAL_MODEL") {
            self.retrieval_model = model;
        }
        if let Some(raw) = get("HISAB_TIMEOUT_SECS") {
            self.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: "HISAB_TIMEOUT_SECS",
                value: raw,
            })?;
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}
