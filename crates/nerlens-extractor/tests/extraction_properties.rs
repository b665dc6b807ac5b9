//! Property tests for the text analysis adapter

use nerlens_core::ModelConfig;
use nerlens_extractor::{AnalysisResult, EntityRecognizer, ModelHandle, TextAnalyzer};
use proptest::prelude::*;
use std::sync::OnceLock;

/// Compiled once; the model is read-only after loading
fn analyzer() -> &'static TextAnalyzer {
    static ANALYZER: OnceLock<TextAnalyzer> = OnceLock::new();
    ANALYZER.get_or_init(|| TextAnalyzer::new(ModelHandle::load(&ModelConfig::default())))
}

/// Sentences mixing recognizable names, places and filler words
fn sentence() -> impl Strategy<Value = String> {
    let words = prop::sample::select(vec![
        "Barack Obama",
        "Hawaii",
        "visited",
        "the",
        "Paris",
        "on",
        "Monday",
        "with",
        "Dr. Smith",
        "$5 million",
        "and",
        "Google",
        "in",
        "1999",
        "12%",
        "New York City",
        "quietly",
        "\n",
    ]);
    prop::collection::vec(words, 0..24).prop_map(|w| w.join(" "))
}

proptest! {
    #[test]
    fn entities_follow_source_order(text in sentence()) {
        let model = analyzer().handle().model().unwrap();
        let doc = model.process(&text).unwrap();

        let mut previous_end = 0;
        for span in doc.spans() {
            prop_assert!(span.start >= previous_end);
            prop_assert!(span.start < span.end);
            previous_end = span.end;
        }
    }

    #[test]
    fn entity_texts_come_from_input(text in sentence()) {
        match analyzer().extract(&text) {
            AnalysisResult::Success { entities, artifact } => {
                prop_assert!(!artifact.as_str().is_empty());
                for entity in entities {
                    prop_assert!(text.contains(&entity.text));
                    prop_assert!(!entity.label.is_empty());
                }
            }
            AnalysisResult::Failure => prop_assert!(false, "unexpected failure"),
        }
    }

    #[test]
    fn arbitrary_text_never_fails(text in "\\PC{0,200}") {
        prop_assert!(analyzer().extract(&text).is_success());
    }

    #[test]
    fn extract_is_idempotent(text in sentence()) {
        let analyzer = analyzer();
        prop_assert_eq!(analyzer.extract(&text), analyzer.extract(&text));
    }

    #[test]
    fn unavailable_model_always_fails(text in "\\PC{0,64}") {
        let analyzer = TextAnalyzer::new(ModelHandle::unavailable("en_rules_sm", "missing"));
        prop_assert_eq!(analyzer.extract(&text), AnalysisResult::Failure);
    }
}
