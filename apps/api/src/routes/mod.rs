pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::report::handlers;
use crate::state::AppState;

/// Room for the non-file form fields on top of the resume itself.
const FORM_OVERHEAD_BYTES: usize = 256 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // HTML front end
        .route("/", get(handlers::handle_index))
        .route("/analyze", post(handlers::handle_analyze_page))
        .route("/analyze/full", post(handlers::handle_full_report_page))
        // JSON API
        .route("/api/v1/analyze", post(handlers::handle_analyze_api))
        .route(
            "/api/v1/analyze/text",
            post(handlers::handle_analyze_text_api),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
