//! Text analysis adapter
//!
//! Turns a model handle into the two-outcome [`AnalysisResult`]. Errors and
//! panics raised by the model or the renderer stop here.

use std::panic::{self, AssertUnwindSafe};

use nerlens_core::Result;

use crate::model::ModelHandle;
use crate::render::render_entities;
use crate::{Entity, EntityRecognizer};

/// Rendered markup highlighting the entities of an analysed text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visualization(String);

impl Visualization {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Visualization {
    fn from(markup: String) -> Self {
        Self(markup)
    }
}

/// Outcome of one analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult {
    Success {
        entities: Vec<Entity>,
        artifact: Visualization,
    },
    Failure,
}

impl AnalysisResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Adapter between callers and the loaded model
#[derive(Debug, Clone)]
pub struct TextAnalyzer {
    handle: ModelHandle,
}

impl TextAnalyzer {
    pub fn new(handle: ModelHandle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &ModelHandle {
        &self.handle
    }

    /// Extract entities and render their visualization.
    ///
    /// One attempt per call. Every failure, including a missing model,
    /// is logged and reported as [`AnalysisResult::Failure`].
    pub fn extract(&self, text: &str) -> AnalysisResult {
        tracing::debug!("Starting NER extraction...");

        let model = match &self.handle {
            ModelHandle::Available(model) => model,
            ModelHandle::Unavailable { model, reason } => {
                tracing::error!(model = %model, reason = %reason, "NER model is not loaded");
                return AnalysisResult::Failure;
            }
        };

        tracing::debug!(text = %text, "Processing text");

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| analyze(model.as_ref(), text)));

        match outcome {
            Ok(Ok((entities, artifact))) => {
                tracing::debug!(?entities, "Named entities extracted");
                tracing::debug!(bytes = artifact.as_str().len(), "Visualization generated");
                AnalysisResult::Success { entities, artifact }
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Error in entity extraction");
                AnalysisResult::Failure
            }
            Err(payload) => {
                tracing::error!(
                    panic = panic_message(payload.as_ref()),
                    "Entity extraction panicked"
                );
                AnalysisResult::Failure
            }
        }
    }
}

fn analyze(model: &dyn EntityRecognizer, text: &str) -> Result<(Vec<Entity>, Visualization)> {
    let doc = model.process(text)?;
    let entities = doc.entities();
    let artifact = Visualization(render_entities(&doc, model.lang())?);
    Ok((entities, artifact))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic"
    }
}
