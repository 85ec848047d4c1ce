//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{short}`  - Short link resolution: redirect or file stream
//! - `POST /files`    - Multipart batch upload
//! - `/api/*`         - JSON API: link creation, lookup, health
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Body limit** - `MAX_UPLOAD_BYTES` on uploads
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{files_handler, redirect_handler};
use crate::api::middleware::rate_limit::{self, ClientIp};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower::Layer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application with all routes and middleware, trimming
/// trailing slashes before routing.
pub fn app_router(state: AppState, client_ip: Option<ClientIp>) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state, client_ip))
}

/// Constructs the router without path normalization.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `client_ip` - rate limit key source; `None` disables rate limiting.
///   [`ClientIp::Peer`] requires the server to provide `ConnectInfo<SocketAddr>`.
pub fn router(state: AppState, client_ip: Option<ClientIp>) -> Router {
    let uploads = Router::new()
        .route("/files", post(files_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(state.max_upload_bytes));

    let public = Router::new()
        .route("/{short}", get(redirect_handler))
        .nest("/api", api::routes::api_routes());

    let (public, uploads) = match client_ip {
        Some(ip) => (
            rate_limit::apply(public, ip, rate_limit::PUBLIC),
            rate_limit::apply(uploads, ip, rate_limit::UPLOADS),
        ),
        None => (public, uploads),
    };

    Router::new()
        .merge(public)
        .merge(uploads)
        .with_state(state)
        .layer(tracing::layer())
}
