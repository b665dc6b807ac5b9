//! Rule-based Named Entity Recognition
//!
//! Recognizes entities with three strategies, all compiled from a
//! [`ModelDefinition`]:
//! - Patterns: regexes for dates, money, percentages, numbers, ...
//! - Gazetteer: case-sensitive matching of known surface forms
//! - Person rules: known given names or honorific titles followed by
//!   capitalized tokens

use regex::Regex;

use crate::model::{GazetteerEntry, ModelDefinition, PersonRules};
use crate::{Doc, EntityRecognizer, Span};
use nerlens_core::{NerError, Result};

/// Capitalized name token (e.g. "Obama", "O'Neil", "Smith-Jones")
const NAME_TOKEN: &str = r"\p{Lu}[\p{L}'-]+";

/// A compiled matching rule
#[derive(Debug)]
struct Rule {
    regex: Regex,
    label: String,
    confidence: f32,
    /// Capture group holding the entity, 0 for the whole match
    group: usize,
}

impl Rule {
    fn compile(pattern: &str, label: &str, confidence: f32, group: usize) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| NerError::Model(format!("invalid pattern for {label}: {e}")))?;

        Ok(Self {
            regex,
            label: label.to_string(),
            confidence,
            group,
        })
    }

    fn find_spans(&self, text: &str, out: &mut Vec<Span>) {
        for caps in self.regex.captures_iter(text) {
            let Some(mat) = caps.get(self.group) else {
                continue;
            };
            if mat.is_empty() {
                continue;
            }
            out.push(Span {
                start: mat.start(),
                end: mat.end(),
                label: self.label.clone(),
                confidence: self.confidence,
            });
        }
    }
}

/// Rule-based NER model
#[derive(Debug)]
pub struct RuleBasedNer {
    name: String,
    lang: String,
    /// Maximum accepted text length in characters
    max_length: usize,
    rules: Vec<Rule>,
}

impl RuleBasedNer {
    /// Compile a model from its definition
    pub fn from_definition(definition: &ModelDefinition) -> Result<Self> {
        let mut rules = Vec::new();

        for pattern in &definition.patterns {
            rules.push(Rule::compile(
                &pattern.regex,
                &pattern.label,
                pattern.confidence,
                0,
            )?);
        }

        for entry in &definition.gazetteer {
            if let Some(rule) = Self::compile_gazetteer(entry)? {
                rules.push(rule);
            }
        }

        if let Some(persons) = &definition.persons {
            rules.extend(Self::compile_person_rules(persons)?);
        }

        Ok(Self {
            name: definition.meta.name.clone(),
            lang: definition.meta.lang.clone(),
            max_length: definition.meta.max_length,
            rules,
        })
    }

    /// Build one alternation for all terms of a gazetteer entry.
    ///
    /// Terms are ordered longest first so the leftmost-first alternation
    /// prefers "New York City" over "New York".
    fn compile_gazetteer(entry: &GazetteerEntry) -> Result<Option<Rule>> {
        let mut terms: Vec<&str> = entry
            .terms
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if terms.is_empty() {
            return Ok(None);
        }
        terms.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        terms.dedup();

        let alternatives: Vec<String> = terms.iter().map(|t| bounded_literal(t)).collect();
        let pattern = format!("(?:{})", alternatives.join("|"));

        Rule::compile(&pattern, &entry.label, entry.confidence, 0).map(Some)
    }

    fn compile_person_rules(persons: &PersonRules) -> Result<Vec<Rule>> {
        let mut rules = Vec::new();

        let given = escaped_alternation(&persons.given_names);
        if !given.is_empty() {
            let pattern = format!(r"\b(?:{given})(?:[ \t]+{NAME_TOKEN})*\b");
            rules.push(Rule::compile(&pattern, &persons.label, persons.confidence, 0)?);
        }

        let titles = escaped_alternation(&persons.titles);
        if !titles.is_empty() {
            // The title itself is not part of the name
            let pattern =
                format!(r"\b(?:{titles})\.?[ \t]+({NAME_TOKEN}(?:[ \t]+{NAME_TOKEN})*)");
            rules.push(Rule::compile(&pattern, &persons.label, persons.confidence, 1)?);
        }

        Ok(rules)
    }

    /// Remove overlapping spans.
    ///
    /// Candidates are ranked by start, then length (longer first), then
    /// confidence. A candidate is kept when it does not overlap any span
    /// kept before it.
    fn resolve_overlaps(mut spans: Vec<Span>) -> Vec<Span> {
        spans.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then((b.end - b.start).cmp(&(a.end - a.start)))
                .then(b.confidence.total_cmp(&a.confidence))
        });

        let mut result: Vec<Span> = Vec::with_capacity(spans.len());
        let mut covered_until = 0;

        for span in spans {
            if span.start >= covered_until {
                covered_until = span.end;
                result.push(span);
            }
        }

        result
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

impl EntityRecognizer for RuleBasedNer {
    fn name(&self) -> &str {
        &self.name
    }

    fn lang(&self) -> &str {
        &self.lang
    }

    fn process(&self, text: &str) -> Result<Doc> {
        let length = text.chars().count();
        if length > self.max_length {
            return Err(NerError::TextTooLong {
                length,
                max_length: self.max_length,
            });
        }

        let mut candidates = Vec::new();
        for rule in &self.rules {
            rule.find_spans(text, &mut candidates);
        }

        Doc::new(text, Self::resolve_overlaps(candidates))
    }
}

/// Escape a literal and add word boundaries where the term has word
/// characters at its edges ("U.S." cannot end on a boundary).
fn bounded_literal(term: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut out = String::new();

    if term.chars().next().is_some_and(is_word) {
        out.push_str(r"\b");
    }
    out.push_str(&regex::escape(term));
    if term.chars().last().is_some_and(is_word) {
        out.push_str(r"\b");
    }

    out
}

fn escaped_alternation(words: &[String]) -> String {
    let mut words: Vec<&str> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .collect();
    words.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    words.dedup();

    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

// ============================================================================
// Tests
// ============================================================================
