//! Entity visualizer
//!
//! Renders a [`Doc`] as a standalone HTML page with every entity
//! highlighted in a labelled `<mark>`.

use std::sync::OnceLock;

use minijinja::{context, Environment};
use nerlens_core::{NerError, Result};
use serde::Serialize;

use crate::Doc;

const ENTITIES_TEMPLATE: &str = "entities.html";

/// Background used for labels without an assigned colour
const DEFAULT_COLOR: &str = "#ddd";

/// Background colour for an entity label
pub fn label_color(label: &str) -> &'static str {
    match label {
        "PERSON" => "#aa9cfc",
        "NORP" => "#c887fb",
        "FAC" => "#9cc9cc",
        "ORG" => "#7aecec",
        "GPE" => "#feca74",
        "LOC" => "#ff9561",
        "PRODUCT" => "#bfeeb7",
        "EVENT" => "#ffeb80",
        "WORK_OF_ART" => "#f0d0ff",
        "LAW" | "LANGUAGE" => "#ff8197",
        "DATE" | "TIME" => "#bfe1d9",
        "MONEY" | "QUANTITY" | "ORDINAL" | "CARDINAL" | "PERCENT" => "#e4e7d2",
        _ => DEFAULT_COLOR,
    }
}

/// A run of plain text or one entity, split on newlines so the template
/// can join the lines with `<br>`
#[derive(Debug, Serialize)]
struct Segment<'a> {
    lines: Vec<&'a str>,
    label: Option<&'a str>,
    color: Option<&'static str>,
}

impl<'a> Segment<'a> {
    fn text(text: &'a str) -> Self {
        Self {
            lines: text.split('\n').collect(),
            label: None,
            color: None,
        }
    }

    fn entity(text: &'a str, label: &'a str) -> Self {
        Self {
            lines: text.split('\n').collect(),
            label: Some(label),
            color: Some(label_color(label)),
        }
    }
}

fn segments(doc: &Doc) -> Vec<Segment<'_>> {
    let text = doc.text();
    let mut segments = Vec::with_capacity(doc.spans().len() * 2 + 1);
    let mut offset = 0;

    for span in doc.spans() {
        if offset < span.start {
            segments.push(Segment::text(&text[offset..span.start]));
        }
        segments.push(Segment::entity(doc.span_text(span), &span.label));
        offset = span.end;
    }
    if offset < text.len() {
        segments.push(Segment::text(&text[offset..]));
    }
    segments
}

fn environment() -> &'static Environment<'static> {
    static ENV: OnceLock<Environment<'static>> = OnceLock::new();
    ENV.get_or_init(|| {
        let mut env = Environment::new();
        if let Err(e) = env.add_template(
            ENTITIES_TEMPLATE,
            include_str!("../templates/entities.html"),
        ) {
            // Surfaces as a missing template on every render
            tracing::error!(error = %e, "Visualization template failed to compile");
        }
        env
    })
}

/// Render a document as a full highlighted HTML page
pub fn render_entities(doc: &Doc, lang: &str) -> Result<String> {
    environment()
        .get_template(ENTITIES_TEMPLATE)
        .and_then(|template| {
            template.render(context! {
                lang => lang,
                segments => segments(doc),
            })
        })
        .map_err(|e| NerError::Render(format!("failed to render visualization: {e}")))
}
