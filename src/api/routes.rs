//! API route configuration.

use crate::api::handlers::{create_link_handler, get_link_handler, health_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes nested under `/api`.
///
/// # Endpoints
///
/// - `POST /id`             - Create a short link
/// - `GET  /id/{short_id}`  - Look up the original URL
/// - `GET  /health`         - Database and storage health
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/id", post(create_link_handler))
        .route("/id/{short_id}", get(get_link_handler))
        .route("/health", get(health_handler))
}
