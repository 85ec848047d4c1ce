//! Handler for batch file upload.

use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{Field, MultipartError},
    },
};

use crate::api::dto::files::FilesResponse;
use crate::domain::entities::FileItem;
use crate::error::AppError;
use crate::state::AppState;

/// Multipart field carrying the uploaded files.
pub const FILES_FIELD: &str = "files";

/// Uploads files to storage and creates a short link for each stored one.
///
/// # Endpoint
///
/// `POST /files` (`multipart/form-data`, field `files`, repeatable)
///
/// # Batch Processing
///
/// Files are processed independently. A failed upload is reported in its
/// item and does not affect the others. Items follow submission order;
/// parts without a file name are skipped.
///
/// # Response
///
/// ```json
/// {
///   "summary": { "total": 2, "successful": 1, "failed": 1 },
///   "items": [
///     { "filename": "a.pdf", "code": "Ab3dE9", "short_link": "http://localhost:3000/Ab3dE9" },
///     { "filename": "b.pdf", "error": "b.pdf was not uploaded: ..." }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the body is not valid multipart, exceeds the
/// upload limit, or has no `files` part.
pub async fn files_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<FilesResponse>, AppError> {
    let mut files = Vec::new();
    let mut has_files_field = false;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }

        has_files_field = true;
        files.push(read_file(field).await?);
    }

    if !has_files_field {
        return Err(AppError::bad_request("Field \"files\" is required"));
    }

    tracing::info!(files = files.len(), "Received upload batch");

    let items = state.file_service.share_batch(files).await?;

    Ok(Json(FilesResponse::from_items(&state, items)))
}

async fn read_file(field: Field<'_>) -> Result<FileItem, AppError> {
    let filename = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);

    let data = field.bytes().await.map_err(multipart_error)?;

    let file = FileItem::new(filename, data);

    Ok(match content_type {
        Some(ct) => file.with_content_type(ct),
        None => file,
    })
}

fn multipart_error(e: MultipartError) -> AppError {
    tracing::debug!(error = %e, "Rejected multipart body");
    AppError::bad_request(e.body_text())
}
