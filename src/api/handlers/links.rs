//! Handlers for link creation and lookup.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, LinkResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for a URL.
///
/// # Endpoint
///
/// `POST /api/id`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com", "custom_id": "promo" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "url": "https://example.com", "short_link": "http://localhost:3000/promo" }
/// ```
///
/// Shortening a URL that is already stored returns the existing link.
///
/// # Errors
///
/// - 400 if the body is missing, `url` is absent or invalid, or `custom_id`
///   is not 1-16 letters/digits
/// - 409 if `custom_id` is reserved, taken, or differs from the code the URL
///   already has
pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let Json(payload) = payload.map_err(|e| {
        tracing::debug!(error = %e, "Rejected link request body");
        AppError::bad_request("Missing request body")
    })?;

    payload.validate()?;

    let url = payload.url.unwrap_or_default();

    let link = state
        .link_service
        .create_link(&url, payload.custom_id.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse {
            short_link: Some(state.short_link(&link.short_code)),
            url: link.original,
        }),
    ))
}

/// Returns the original URL behind a short code.
///
/// # Endpoint
///
/// `GET /api/id/{short_id}`
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown.
pub async fn get_link_handler(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(&short_id).await?;

    Ok(Json(LinkResponse {
        url: link.original,
        short_link: None,
    }))
}
