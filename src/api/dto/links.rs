//! DTOs for the link creation and lookup endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for `POST /api/id`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// The URL to shorten.
    #[validate(
        required(message = "\"url\" is a required field!"),
        length(max = 512, message = "URL must be at most 512 characters")
    )]
    pub url: Option<String>,

    /// Optional custom short code; blank means "generate one".
    pub custom_id: Option<String>,
}

/// A link as returned by the API.
///
/// `short_link` is present on creation only.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_link: Option<String>,
}
