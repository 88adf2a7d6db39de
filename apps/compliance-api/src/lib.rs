//! Compliance API server library.
//!
//! The binary in `main.rs` wires environment configuration into
//! [`state::AppState`] and serves [`router`]; tests construct the same
//! router with mock capabilities.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

pub mod error;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod state;

use state::AppState;

/// Uploads above this size are rejected before extraction.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Build the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Service info and health
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Upload pipeline
        .route("/upload", post(handlers::upload))
        // Dashboard reads
        .route("/api/dashboard/overview", get(handlers::dashboard_overview))
        .route("/api/dashboard/documents", get(handlers::dashboard_documents))
        .route(
            "/api/dashboard/documents/:id",
            delete(handlers::delete_document),
        )
        .route(
            "/api/dashboard/analysis/:id",
            get(handlers::document_analysis),
        )
        .route(
            "/api/dashboard/analyze/:id",
            get(handlers::reanalyze_document),
        )
        .route(
            "/api/dashboard/notifications",
            get(handlers::dashboard_notifications),
        )
        .route("/api/dashboard/timeline", get(handlers::dashboard_timeline))
        .route(
            "/api/dashboard/analytics",
            get(handlers::dashboard_analytics),
        )
        .route("/api/dashboard/clear-all", post(handlers::clear_all))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
