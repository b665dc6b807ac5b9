//! Model definitions and loading
//!
//! A model is identified by name. Loading resolves the name against the
//! configured model directory (`<model_dir>/<name>.toml`) and then against
//! the models bundled with this crate.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ner::RuleBasedNer;
use crate::EntityRecognizer;
use nerlens_core::config::DEFAULT_MODEL;
use nerlens_core::{ModelConfig, NerError, Result};

/// Source of the bundled English rule model
const BUILTIN_EN_RULES_SM: &str = include_str!("../models/en_rules_sm.toml");

/// Default maximum text length in characters
const DEFAULT_MAX_LENGTH: usize = 1_000_000;

// ============================================================================
// Definition format
// ============================================================================

/// Serialized rule model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDefinition {
    pub meta: ModelMeta,
    #[serde(default)]
    pub persons: Option<PersonRules>,
    #[serde(default)]
    pub patterns: Vec<PatternRule>,
    #[serde(default)]
    pub gazetteer: Vec<GazetteerEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMeta {
    pub name: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default)]
    pub version: String,
    /// Maximum text length in characters
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

/// Regex rule producing spans of one label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternRule {
    pub label: String,
    pub regex: String,
    #[serde(default = "default_pattern_confidence")]
    pub confidence: f32,
}

/// Known surface forms of one label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GazetteerEntry {
    pub label: String,
    pub terms: Vec<String>,
    #[serde(default = "default_gazetteer_confidence")]
    pub confidence: f32,
}

/// Person name heuristics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRules {
    #[serde(default = "default_person_label")]
    pub label: String,
    #[serde(default)]
    pub given_names: Vec<String>,
    /// Honorifics preceding a name ("Dr", "President", ...)
    #[serde(default)]
    pub titles: Vec<String>,
    #[serde(default = "default_pattern_confidence")]
    pub confidence: f32,
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_pattern_confidence() -> f32 {
    0.85
}

fn default_gazetteer_confidence() -> f32 {
    0.95
}

fn default_person_label() -> String {
    "PERSON".to_string()
}

impl ModelDefinition {
    /// Parse a definition from TOML source
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| NerError::Model(e.to_string()))
    }

    /// Read a definition from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| NerError::Model(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml(&source)
    }

    /// The bundled `en_rules_sm` definition
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN_EN_RULES_SM)
    }

    /// Look up a bundled definition by name
    pub fn bundled(name: &str) -> Option<Result<Self>> {
        (name == DEFAULT_MODEL).then(Self::builtin)
    }
}

// ============================================================================
// Loading
// ============================================================================

fn model_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.toml"))
}

/// Resolve and compile the configured model
pub fn load_model(config: &ModelConfig) -> Result<Arc<dyn EntityRecognizer>> {
    let name = config.name.trim();

    let definition = match config.model_dir.as_deref().map(|dir| model_path(dir, name)) {
        Some(path) if path.is_file() => {
            tracing::debug!(path = %path.display(), "Loading model definition from file");
            ModelDefinition::from_file(&path)?
        }
        _ => ModelDefinition::bundled(name)
            .ok_or_else(|| NerError::ModelNotFound(name.to_string()))??,
    };

    if definition.meta.name != name {
        tracing::warn!(
            requested = name,
            declared = %definition.meta.name,
            "Model declares a different name"
        );
    }

    let model = RuleBasedNer::from_definition(&definition)?;
    Ok(Arc::new(model))
}

/// The process-wide model, or the reason it could not be loaded.
///
/// Built once at startup and injected into whatever serves requests.
#[derive(Clone)]
pub enum ModelHandle {
    Available(Arc<dyn EntityRecognizer>),
    Unavailable { model: String, reason: String },
}

impl ModelHandle {
    /// Load the configured model. Failure is logged and recorded, never fatal.
    pub fn load(config: &ModelConfig) -> Self {
        tracing::debug!(model = %config.name, "Loading NER model...");

        match load_model(config) {
            Ok(model) => {
                tracing::info!(model = %config.name, "NER model loaded successfully");
                Self::Available(model)
            }
            Err(e) => {
                tracing::error!(model = %config.name, error = %e, "Error loading NER model");
                Self::Unavailable {
                    model: config.name.clone(),
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn available(model: Arc<dyn EntityRecognizer>) -> Self {
        Self::Available(model)
    }

    pub fn unavailable(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            model: model.into(),
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn model(&self) -> Option<&Arc<dyn EntityRecognizer>> {
        match self {
            Self::Available(model) => Some(model),
            Self::Unavailable { .. } => None,
        }
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(model) => f.debug_tuple("Available").field(&model.name()).finish(),
            Self::Unavailable { model, reason } => f
                .debug_struct("Unavailable")
                .field("model", model)
                .field("reason", reason)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY_MODEL: &str = r#"
[meta]
name = "tiny"

[[gazetteer]]
label = "GPE"
terms = ["Atlantis"]
"#;

    #[test]
    fn test_builtin_definition_parses() {
        let def = ModelDefinition::builtin().unwrap();
        assert_eq!(def.meta.name, DEFAULT_MODEL);
        assert_eq!(def.meta.max_length, 1_000_000);
        assert!(def.persons.is_some());
        assert!(!def.patterns.is_empty());
        assert!(def.gazetteer.iter().any(|g| g.label == "GPE"));
    }

    #[test]
    fn test_definition_defaults() {
        let def = ModelDefinition::from_toml(TINY_MODEL).unwrap();
        assert_eq!(def.meta.lang, "en");
        assert_eq!(def.meta.max_length, DEFAULT_MAX_LENGTH);
        assert_eq!(def.gazetteer[0].confidence, 0.95);
        assert!(def.persons.is_none());
    }

    #[test]
    fn test_malformed_definition() {
        let err = ModelDefinition::from_toml("[meta]\nlang = 3").unwrap_err();
        assert!(matches!(err, NerError::Model(_)));
    }

    #[test]
    fn test_load_default_model() {
        let model = load_model(&ModelConfig::default()).unwrap();
        assert_eq!(model.name(), DEFAULT_MODEL);
        assert_eq!(model.lang(), "en");
    }

    #[test]
    fn test_load_unknown_model() {
        let config = ModelConfig {
            name: "xx_missing".to_string(),
            model_dir: None,
        };
        let err = load_model(&config).err().unwrap();
        assert!(matches!(err, NerError::ModelNotFound(ref name) if name == "xx_missing"));
    }

    #[test]
    fn test_load_from_model_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tiny.toml"), TINY_MODEL).unwrap();

        let config = ModelConfig {
            name: "tiny".to_string(),
            model_dir: Some(dir.path().to_path_buf()),
        };
        let model = load_model(&config).unwrap();
        let doc = model.process("The lost city of Atlantis.").unwrap();

        assert_eq!(model.name(), "tiny");
        assert_eq!(doc.entities().len(), 1);
        assert_eq!(doc.entities()[0].label, "GPE");
    }

    #[test]
    fn test_model_dir_falls_back_to_bundled() {
        let dir = tempfile::tempdir().unwrap();
        let config = ModelConfig {
            name: DEFAULT_MODEL.to_string(),
            model_dir: Some(dir.path().to_path_buf()),
        };
        assert!(load_model(&config).is_ok());
    }

    #[test]
    fn test_handle_load_failure_is_recorded() {
        let config = ModelConfig {
            name: "xx_missing".to_string(),
            model_dir: None,
        };
        let handle = ModelHandle::load(&config);

        assert!(!handle.is_available());
        assert!(handle.model().is_none());
        match handle {
            ModelHandle::Unavailable { model, reason } => {
                assert_eq!(model, "xx_missing");
                assert!(reason.contains("xx_missing"));
            }
            ModelHandle::Available(_) => panic!("expected unavailable handle"),
        }
    }

    #[test]
    fn test_handle_load_success() {
        let handle = ModelHandle::load(&ModelConfig::default());
        assert!(handle.is_available());
        assert!(format!("{handle:?}").contains(DEFAULT_MODEL));
    }
}
