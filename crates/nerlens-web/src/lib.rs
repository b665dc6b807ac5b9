//! nerlens Web - HTML front-end for entity recognition
//!
//! Serves a single page at `/`: GET shows the input form, POST analyzes the
//! submitted text and renders the entities with their visualization.
//!
//! Author: hephaex@gmail.com

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod page;
pub mod state;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::security_headers_middleware;
use crate::state::AppState;

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let max_body_size = state.config.server.max_body_size;

    Router::new()
        .route("/", get(handlers::index_page).post(handlers::analyze_text))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
