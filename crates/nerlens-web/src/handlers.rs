//! Request handlers for the index route
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    response::Html,
    Form,
};
use nerlens_extractor::AnalysisResult;

use crate::error::AppError;
use crate::page::IndexPage;
use crate::state::AppState;

/// Name of the text field in the index form
pub const USER_INPUT_FIELD: &str = "user_input";

/// Submitted form
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AnalyzeForm {
    /// Free text to analyze
    pub user_input: Option<String>,
}

impl AnalyzeForm {
    /// Pick the text field out of the raw pairs. A repeated field keeps its
    /// first value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let user_input = pairs
            .into_iter()
            .find(|(name, _)| name == USER_INPUT_FIELD)
            .map(|(_, value)| value);
        Self { user_input }
    }
}

fn render(state: &AppState, page: &IndexPage) -> Result<Html<String>, AppError> {
    Ok(Html(state.pages.render_index(page)?))
}

/// GET / - empty form
pub async fn index_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    render(&state, &IndexPage::empty())
}

/// POST / - analyze the submitted text
pub async fn analyze_text(
    State(state): State<Arc<AppState>>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Html<String>, AppError> {
    let form = match form {
        Ok(Form(pairs)) => AnalyzeForm::from_pairs(pairs),
        Err(rejection @ FormRejection::BytesRejection(_)) => {
            return Err(AppError::Request {
                status: rejection.status(),
                message: rejection.body_text(),
            });
        }
        Err(rejection) => {
            // Undecodable forms read as "no input", like a missing field
            tracing::debug!(%rejection, "Ignoring unreadable form");
            AnalyzeForm::default()
        }
    };

    let Some(text) = form
        .user_input
        .filter(|text| !text.is_empty())
    else {
        return render(&state, &IndexPage::empty());
    };

    tracing::debug!(input = %text, "Received input");

    let analyzer = state.analyzer.clone();
    let result = tokio::task::spawn_blocking(move || analyzer.extract(&text))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Analysis task did not complete");
            AnalysisResult::Failure
        });

    render(&state, &IndexPage::from_analysis(result))
}
