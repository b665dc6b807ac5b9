//! nerlens Core - shared error types and configuration
//!
//! This crate defines the pieces every other nerlens crate depends on:
//! - The common error type for model loading and text analysis
//! - Configuration management (defaults, TOML file, environment)

pub mod config;

pub use config::{AppConfig, ConfigError, LoggingConfig, ModelConfig, ServerConfig};

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for nerlens operations
#[derive(Error, Debug)]
pub enum NerError {
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Invalid model: {0}")]
    Model(String),

    #[error("Text of length {length} exceeds maximum of {max_length}")]
    TextTooLong { length: usize, max_length: usize },

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, NerError>;
