//! Index page rendering

use minijinja::Environment;
use nerlens_extractor::{AnalysisResult, Entity};
use serde::Serialize;

const INDEX_TEMPLATE: &str = "index.html";

/// Label of the placeholder entity shown when analysis fails
pub const ERROR_LABEL: &str = "Error";

/// Text of the placeholder entity shown when analysis fails
pub const ERROR_TEXT: &str = "Unable to process the text.";

/// Placeholder entity rendered in place of results after a failure.
///
/// Legacy page convention: the failure is shown as an entity row. It is
/// never used as an error value. Earlier versions of the page stored the
/// pair the other way round (text `"Error"`, label carrying the message),
/// so their list read "Error (Unable to process the text.)".
pub fn processing_error_entity() -> Entity {
    Entity::new(ERROR_TEXT, ERROR_LABEL)
}

/// Template context of the index page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexPage {
    /// `None` hides the results section entirely
    pub named_entities: Option<Vec<Entity>>,
    /// Highlighted markup, embedded unescaped
    pub visualization: Option<String>,
}

impl IndexPage {
    /// Initial form state
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_analysis(result: AnalysisResult) -> Self {
        match result {
            AnalysisResult::Success { entities, artifact } => Self {
                named_entities: Some(entities),
                visualization: Some(artifact.into_string()),
            },
            AnalysisResult::Failure => Self {
                named_entities: Some(vec![processing_error_entity()]),
                visualization: None,
            },
        }
    }
}

/// Compiled page templates
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(INDEX_TEMPLATE, include_str!("../templates/index.html"))?;
        Ok(Self { env })
    }

    pub fn render_index(&self, page: &IndexPage) -> Result<String, minijinja::Error> {
        self.env.get_template(INDEX_TEMPLATE)?.render(page)
    }
}

impl std::fmt::Debug for PageRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRenderer").finish_non_exhaustive()
    }
}
