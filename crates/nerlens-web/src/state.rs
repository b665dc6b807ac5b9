//! Application state management
//!
//! Author: hephaex@gmail.com

use nerlens_core::AppConfig;
use nerlens_extractor::{ModelHandle, TextAnalyzer};

use crate::page::PageRenderer;

/// Application state shared across handlers.
///
/// Immutable after construction, so handlers share it without locking.
#[derive(Debug)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Adapter over the model loaded at startup
    pub analyzer: TextAnalyzer,
    /// Compiled page templates
    pub pages: PageRenderer,
}

impl AppState {
    /// Create application state around an already loaded model handle
    pub fn new(config: AppConfig, handle: ModelHandle) -> Result<Self, minijinja::Error> {
        Ok(Self {
            config,
            analyzer: TextAnalyzer::new(handle),
            pages: PageRenderer::new()?,
        })
    }

    /// Load the configured model and build the state
    pub fn load(config: AppConfig) -> Result<Self, minijinja::Error> {
        let handle = ModelHandle::load(&config.model);
        Self::new(config, handle)
    }

    /// Check if analysis can succeed
    pub fn model_available(&self) -> bool {
        self.analyzer.handle().is_available()
    }
}
