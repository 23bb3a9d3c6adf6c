use std::path::{Path, PathBuf};

use hisab_assistant::{AssistantConfig, ConfigError};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Bunyan,
}

/// Server settings. Read from the TOML file named by `HISAB_CONFIG` when
/// set, then overridden from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    /// Optional TOML file replacing the built-in category keyword tables.
    pub category_rules: Option<PathBuf>,
    pub body_limit_bytes: usize,
    pub assistant: AssistantConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_format: LogFormat::Plain,
            category_rules: None,
            body_limit_bytes: 2 * 1024 * 1024,
            assistant: AssistantConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("HISAB_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(path.trim()))?,
            _ => Self::default(),
        };
        base.with_overrides(|name| std::env::var(name).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// `HOST`, `PORT`, `HISAB_LOG_FORMAT`, `HISAB_CATEGORY_RULES`, plus the
    /// assistant's own variables.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(host) = get("HOST") {
            self.host = host;
        }
        if let Some(port) = get("PORT") {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { name: "PORT", value: port })?;
        }
        if let Some(format) = get("HISAB_LOG_FORMAT") {
            self.log_format = match format.to_lowercase().as_str() {
                "plain" => LogFormat::Plain,
                "bunyan" | "json" => LogFormat::Bunyan,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        name: "HISAB_LOG_FORMAT",
                        value: format,
                    })
                }
            };
        }
        if let Some(path) = get("HISAB_CATEGORY_RULES") {
            self.category_rules = Some(PathBuf::from(path));
        }
        self.assistant = self.assistant.with_overrides(&lookup)?;
        Ok(self)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
