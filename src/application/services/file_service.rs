//! Turns uploaded files into file-backed short links.

use std::collections::HashSet;
use std::sync::Arc;

use crate::application::services::link_service::{
    DUPLICATE_FILE_MSG, FILE_NAME_TOO_LONG_MSG, LinkService, MAX_ORIGINAL_LENGTH,
};
use crate::application::services::upload_service::UploadService;
use crate::domain::entities::{FileItem, Link};
use crate::error::AppError;

/// Per-file result of [`FileShareService::share_batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileShareItem {
    Created { filename: String, link: Link },
    Failed { filename: String, error: String },
}

impl FileShareItem {
    fn failed(filename: &str, reason: impl std::fmt::Display) -> Self {
        FileShareItem::Failed {
            filename: filename.to_string(),
            error: format!("{filename} was not uploaded: {reason}"),
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            FileShareItem::Created { filename, .. } | FileShareItem::Failed { filename, .. } => {
                filename
            }
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, FileShareItem::Created { .. })
    }
}

/// Uploads a batch of files and creates a short link for each stored one.
///
/// Files are rejected before any network call when their extension is not
/// allowed, their name does not fit a link's original, or a file link with
/// the same name already exists. No link is
/// created for a file whose upload or download check failed.
pub struct FileShareService {
    uploads: Arc<UploadService>,
    links: Arc<LinkService>,
    allowed_extensions: Vec<String>,
}

impl FileShareService {
    /// Creates a new file share service.
    ///
    /// An empty `allowed_extensions` list accepts every file.
    pub fn new(
        uploads: Arc<UploadService>,
        links: Arc<LinkService>,
        allowed_extensions: Vec<String>,
    ) -> Self {
        let allowed_extensions = allowed_extensions
            .into_iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        Self {
            uploads,
            links,
            allowed_extensions,
        }
    }

    fn is_allowed(&self, file: &FileItem) -> bool {
        if self.allowed_extensions.is_empty() {
            return true;
        }

        file.extension()
            .is_some_and(|ext| self.allowed_extensions.contains(&ext))
    }

    /// Processes a batch, returning one item per named file in submission order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] only if the duplicate lookup itself
    /// fails; per-file failures are reported as [`FileShareItem::Failed`].
    pub async fn share_batch(&self, files: Vec<FileItem>) -> Result<Vec<FileShareItem>, AppError> {
        let mut seen = HashSet::new();
        let named: Vec<FileItem> = files
            .into_iter()
            .filter(|f| f.name().is_some_and(|n| seen.insert(n.to_string())))
            .collect();

        let names: Vec<String> = named
            .iter()
            .filter_map(|f| f.name().map(str::to_string))
            .collect();

        let existing: HashSet<String> = self
            .links
            .existing_file_names(&names)
            .await?
            .into_iter()
            .collect();

        let mut rejected: Vec<(String, String)> = Vec::new();
        let mut to_upload = Vec::with_capacity(named.len());

        for file in named {
            let name = file.name().map(str::to_string).unwrap_or_default();

            if !self.is_allowed(&file) {
                rejected.push((name, "file extension is not allowed".to_string()));
            } else if name.chars().count() > MAX_ORIGINAL_LENGTH {
                rejected.push((name, FILE_NAME_TOO_LONG_MSG.to_string()));
            } else if existing.contains(&name) {
                rejected.push((name, DUPLICATE_FILE_MSG.to_string()));
            } else {
                to_upload.push(file);
            }
        }

        let mut outcomes = self.uploads.upload_batch(to_upload).await;

        let mut items = Vec::with_capacity(names.len());

        for name in names {
            if let Some((_, reason)) = rejected.iter().find(|(n, _)| *n == name) {
                items.push(FileShareItem::failed(&name, reason));
                continue;
            }

            let item = match outcomes.remove(&name) {
                Some(Ok(stored)) => match self.links.create_file_link(&stored).await {
                    Ok(link) => FileShareItem::Created {
                        filename: name,
                        link,
                    },
                    Err(e) => FileShareItem::failed(&name, e),
                },
                Some(Err(e)) => FileShareItem::failed(&name, e),
                None => continue,
            };

            items.push(item);
        }

        Ok(items)
    }
}
