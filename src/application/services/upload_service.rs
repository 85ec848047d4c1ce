//! Concurrent batch upload to the remote storage provider.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::{StreamExt, stream};
use tracing::Instrument;

use crate::domain::entities::FileItem;
use crate::domain::storage::{StorageClient, StorageError};

/// Result of uploading one file: the stored object name, or the failure.
pub type UploadOutcome = Result<String, StorageError>;

/// Default number of files uploaded at the same time.
pub const DEFAULT_UPLOAD_CONCURRENCY: usize = 4;

/// Orchestrates uploads of file batches.
///
/// Each file runs its own pipeline (upload link, byte transfer, download link
/// check) in that order. Pipelines are independent: a failure is captured as
/// that file's outcome and never affects the rest of the batch. Every stage is
/// attempted exactly once.
pub struct UploadService {
    storage: Arc<dyn StorageClient>,
    concurrency: usize,
}

impl UploadService {
    /// Creates a new upload service.
    ///
    /// `concurrency` of 1 uploads files sequentially.
    pub fn new(storage: Arc<dyn StorageClient>, concurrency: usize) -> Self {
        Self {
            storage,
            concurrency: concurrency.max(1),
        }
    }

    /// Uploads a batch of files.
    ///
    /// Files without a name are skipped and do not appear in the result.
    /// Completion order is not preserved; the result is keyed by file name.
    pub async fn upload_batch(&self, files: Vec<FileItem>) -> HashMap<String, UploadOutcome> {
        let span = tracing::info_span!("upload_batch", files = files.len());

        async move {
            let results: HashMap<String, UploadOutcome> = stream::iter(files)
                .filter_map(|file| async move {
                    let name = file.name()?.to_string();
                    Some((name, file))
                })
                .map(|(name, file)| async move {
                    let outcome = self.upload_single(&name, file).await;
                    (name, outcome)
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

            let failed = results.values().filter(|o| o.is_err()).count();
            tracing::info!(
                uploaded = results.len() - failed,
                failed,
                "Upload batch finished"
            );

            results
        }
        .instrument(span)
        .await
    }

    /// Runs the three-stage pipeline for one file.
    async fn upload_single(&self, name: &str, file: FileItem) -> UploadOutcome {
        let outcome: UploadOutcome = async {
            let upload_url = self.storage.request_upload_link(name).await?;
            self.storage.put_bytes(&upload_url, file.data).await?;
            self.storage.request_download_link(name).await?;
            Ok::<_, StorageError>(name.to_string())
        }
        .await;

        match &outcome {
            Ok(_) => {
                tracing::debug!(file = %name, "File uploaded");
                metrics::counter!("file_uploads_total", "outcome" => "ok").increment(1);
            }
            Err(e) => {
                tracing::warn!(file = %name, error = %e, "File upload failed");
                let outcome = if e.is_protocol() {
                    "protocol_error"
                } else {
                    "error"
                };
                metrics::counter!("file_uploads_total", "outcome" => outcome).increment(1);
            }
        }

        outcome
    }
}
