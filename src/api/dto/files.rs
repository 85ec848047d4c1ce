//! DTOs for the file upload endpoint.

use serde::Serialize;

use crate::application::services::FileShareItem;
use crate::state::AppState;

/// Response of `POST /files`.
#[derive(Debug, Serialize)]
pub struct FilesResponse {
    pub summary: BatchSummary,
    pub items: Vec<FileResultItem>,
}

impl FilesResponse {
    /// Builds the report, keeping the order of `items`.
    pub fn from_items(state: &AppState, items: Vec<FileShareItem>) -> Self {
        let total = items.len();
        let successful = items.iter().filter(|i| i.is_created()).count();

        let items = items
            .into_iter()
            .map(|item| match item {
                FileShareItem::Created { filename, link } => FileResultItem::Success {
                    filename,
                    short_link: state.short_link(&link.short_code),
                    code: link.short_code,
                },
                FileShareItem::Failed { filename, error } => {
                    FileResultItem::Error { filename, error }
                }
            })
            .collect();

        Self {
            summary: BatchSummary {
                total,
                successful,
                failed: total - successful,
            },
            items,
        }
    }
}

/// Per-file result. Untagged, so the JSON carries no discriminator field.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FileResultItem {
    Success {
        filename: String,
        code: String,
        short_link: String,
    },
    Error {
        filename: String,
        error: String,
    },
}

#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}
