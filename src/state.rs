//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{FileShareService, LinkService, ResolveService, UploadService};
use crate::domain::repositories::LinkRepository;
use crate::domain::storage::StorageClient;

/// Runtime knobs the services are built with.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Prefix of every short link, without trailing slash.
    pub base_url: String,
    pub upload_concurrency: usize,
    /// Empty list accepts every extension.
    pub allowed_file_extensions: Vec<String>,
    pub max_upload_bytes: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub file_service: Arc<FileShareService>,
    pub resolve_service: Arc<ResolveService>,
    pub storage: Arc<dyn StorageClient>,
    pub base_url: Arc<str>,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Wires the services on top of a link store and a storage client.
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        storage: Arc<dyn StorageClient>,
        settings: ServiceSettings,
    ) -> Self {
        let link_service = Arc::new(LinkService::new(repository));
        let upload_service = Arc::new(UploadService::new(
            storage.clone(),
            settings.upload_concurrency,
        ));
        let file_service = Arc::new(FileShareService::new(
            upload_service,
            link_service.clone(),
            settings.allowed_file_extensions,
        ));
        let resolve_service = Arc::new(ResolveService::new(link_service.clone(), storage.clone()));

        Self {
            link_service,
            file_service,
            resolve_service,
            storage,
            base_url: settings.base_url.trim_end_matches('/').into(),
            max_upload_bytes: settings.max_upload_bytes,
        }
    }

    /// Full short link for `code`.
    pub fn short_link(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}
