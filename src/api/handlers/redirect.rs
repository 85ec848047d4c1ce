//! Handler for short link resolution.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::application::services::Resolution;
use crate::domain::storage::RemoteObject;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves a short code.
///
/// # Endpoint
///
/// `GET /{short}`
///
/// # Behavior
///
/// - URL link: `302 Found` with `Location` set to the original URL
/// - File link: `200 OK` relaying the stored bytes as they arrive from
///   storage. `Content-Type` defaults to `application/octet-stream`;
///   `Content-Length` and `Content-Disposition` are set only when storage
///   provides them.
///
/// # Errors
///
/// - 404 Not Found if the code is unknown
/// - 502 Bad Gateway if storage fails before the first byte is sent
pub async fn redirect_handler(
    Path(short): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    match state.resolve_service.resolve(&short).await? {
        Resolution::Redirect(target) => {
            Ok((StatusCode::FOUND, [(header::LOCATION, target)]).into_response())
        }
        Resolution::Stream(object) => stream_response(object),
    }
}

fn stream_response(object: RemoteObject) -> Result<Response, AppError> {
    let content_type = object
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type);

    if let Some(length) = object.content_length {
        builder = builder.header(header::CONTENT_LENGTH, length);
    }

    if let Some(disposition) = object.content_disposition {
        builder = builder.header(header::CONTENT_DISPOSITION, disposition);
    }

    builder
        .body(Body::from_stream(object.body))
        .map_err(|e| AppError::internal(format!("Failed to build response: {e}")))
}
