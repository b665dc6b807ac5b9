//! Web error handling
//!
//! Author: hephaex@gmail.com

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Application error type.
///
/// Analysis failures never reach this type; they are rendered on the page.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request body could not be read
    #[error("{message}")]
    Request { status: StatusCode, message: String },

    /// The page template failed to render
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Request { status, message } => {
                tracing::warn!(%status, %message, "Rejected request");
                (status, message).into_response()
            }
            AppError::Template(err) => {
                tracing::error!(error = %err, "Failed to render page");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
                    .into_response()
            }
        }
    }
}
