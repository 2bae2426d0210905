use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::engine::SearchEngine;

use super::handlers;

/// Application state shared across all handlers
pub struct AppState {
    pub engine: Arc<SearchEngine>,
}

/// Create the HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/documents", post(handlers::insert_document))
        .route("/documents/batch", post(handlers::batch_insert))
        .route("/documents/:id", get(handlers::get_document))
        .route("/documents/:id", put(handlers::update_document))
        .route("/documents/:id", delete(handlers::delete_document))
        .route("/search", get(handlers::search))
        .route("/stats", get(handlers::stats))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
