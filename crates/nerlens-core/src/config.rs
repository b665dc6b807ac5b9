//! nerlens Configuration Management
//!
//! Handles configuration from environment variables and config files
//! with sensible defaults for development.
//!
//! Author: hephaex@gmail.com

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the model bundled with the extractor
pub const DEFAULT_MODEL: &str = "en_rules_sm";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// NER model selection
    pub model: ModelConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Only keys that are present are applied, so file values survive
    /// when the environment is silent.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(host) = lookup("API_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("API_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_PORT".to_string(),
                value: port,
            })?;
        }

        // Model
        if let Some(name) = lookup("NER_MODEL") {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "NER_MODEL".to_string(),
                    value: name,
                });
            }
            self.model.name = name;
        }
        if let Some(dir) = lookup("NER_MODEL_DIR") {
            self.model.model_dir = Some(PathBuf::from(dir));
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = lookup("LOG_JSON") {
            self.logging.json_format = parse_bool(&json).ok_or(ConfigError::InvalidValue {
                key: "LOG_JSON".to_string(),
                value: json,
            })?;
        }

        Ok(self)
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// NER model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model name, resolved against `model_dir` and then the bundled models
    pub name: String,

    /// Directory holding `<name>.toml` model definitions
    pub model_dir: Option<PathBuf>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.to_string(),
            model_dir: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.model.name, DEFAULT_MODEL);
        assert!(config.model.model_dir.is_none());
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::default()
            .apply_env(lookup_from(&[
                ("API_HOST", "127.0.0.1"),
                ("API_PORT", "9000"),
                ("NER_MODEL", "custom"),
                ("NER_MODEL_DIR", "/opt/models"),
                ("LOG_JSON", "true"),
            ]))
            .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.model.name, "custom");
        assert_eq!(config.model.model_dir, Some(PathBuf::from("/opt/models")));
        assert!(config.logging.json_format);
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result = AppConfig::default().apply_env(lookup_from(&[("API_PORT", "http")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "API_PORT"
        ));
    }

    #[test]
    fn test_blank_model_name_rejected() {
        let result = AppConfig::default().apply_env(lookup_from(&[("NER_MODEL", "  ")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[model]\nname = \"en_rules_custom\"").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.model.name, "en_rules_custom");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_missing_file() {
        let result = AppConfig::from_file("/nonexistent/nerlens.toml");
        assert!(matches!(result, Err(ConfigError::FileReadError { .. })));
    }
}
