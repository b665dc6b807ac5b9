//! nerlens Extractor - named entity recognition and visualization
//!
//! Wraps an entity recognition model behind [`EntityRecognizer`] and exposes
//! the single adapter operation [`TextAnalyzer::extract`], which never fails
//! with an error: every problem is absorbed into [`AnalysisResult::Failure`].

use nerlens_core::{NerError, Result};
use serde::Serialize;

pub mod analyzer;
pub mod model;
pub mod ner;
pub mod render;

pub use analyzer::{AnalysisResult, TextAnalyzer, Visualization};
pub use model::{load_model, ModelDefinition, ModelHandle};
pub use ner::RuleBasedNer;
pub use render::render_entities;

/// Recognized entity: surface text and category label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
}

impl Entity {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Labelled byte range of an analysed text
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub confidence: f32,
}

/// Analysed text with its recognized spans.
///
/// Spans are non-empty, lie on character boundaries, do not overlap and
/// are sorted by start offset.
#[derive(Debug, Clone)]
pub struct Doc {
    text: String,
    spans: Vec<Span>,
}

impl Doc {
    /// Build a document, rejecting spans that break the ordering invariants
    pub fn new(text: impl Into<String>, spans: Vec<Span>) -> Result<Self> {
        let text = text.into();
        let mut previous_end = 0;

        for span in &spans {
            if span.start >= span.end || span.end > text.len() {
                return Err(NerError::Processing(format!(
                    "span {}..{} out of bounds for text of {} bytes",
                    span.start,
                    span.end,
                    text.len()
                )));
            }
            if !text.is_char_boundary(span.start) || !text.is_char_boundary(span.end) {
                return Err(NerError::Processing(format!(
                    "span {}..{} is not on a character boundary",
                    span.start, span.end
                )));
            }
            if span.start < previous_end {
                return Err(NerError::Processing(format!(
                    "span {}..{} overlaps or precedes an earlier span",
                    span.start, span.end
                )));
            }
            previous_end = span.end;
        }

        Ok(Self { text, spans })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Literal text covered by a span of this document
    pub fn span_text(&self, span: &Span) -> &str {
        &self.text[span.start..span.end]
    }

    /// Entities in source order
    pub fn entities(&self) -> Vec<Entity> {
        self.spans
            .iter()
            .map(|span| Entity::new(self.span_text(span), span.label.clone()))
            .collect()
    }
}

/// Trait for entity recognition models
pub trait EntityRecognizer: Send + Sync {
    /// Name the model was loaded under
    fn name(&self) -> &str;

    /// Language code used when rendering
    fn lang(&self) -> &str {
        "en"
    }

    /// Run recognition over a text
    fn process(&self, text: &str) -> Result<Doc>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize, label: &str) -> Span {
        Span {
            start,
            end,
            label: label.to_string(),
            confidence: 1.0,
        }
    }

    #[test]
    fn test_doc_entities() {
        let doc = Doc::new(
            "Ada lives in Paris",
            vec![span(0, 3, "PERSON"), span(13, 18, "GPE")],
        )
        .unwrap();

        assert_eq!(
            doc.entities(),
            vec![Entity::new("Ada", "PERSON"), Entity::new("Paris", "GPE")]
        );
    }

    #[test]
    fn test_doc_rejects_overlap() {
        let result = Doc::new("abcdef", vec![span(0, 4, "A"), span(3, 5, "B")]);
        assert!(matches!(result, Err(NerError::Processing(_))));
    }

    #[test]
    fn test_doc_rejects_out_of_bounds() {
        assert!(Doc::new("abc", vec![span(1, 4, "A")]).is_err());
        assert!(Doc::new("abc", vec![span(2, 2, "A")]).is_err());
    }

    #[test]
    fn test_doc_rejects_split_character() {
        // "é" is two bytes
        assert!(Doc::new("é", vec![span(0, 1, "A")]).is_err());
    }
}
