//! Contract of the remote object-storage provider.
//!
//! Every call is a single request that either succeeds or returns a tagged
//! [`StorageError`]. Clients never retry on their own.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use std::fmt;
use thiserror::Error;

/// Failure of a single storage provider call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// Network failure, timeout, or an unreadable response body.
    #[error("storage transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("storage responded with status {status}")]
    Status { status: u16 },

    /// The provider answered without the expected `href` field.
    #[error("storage response has no link for {path}")]
    LinkMissing { path: String },
}

impl StorageError {
    /// True for protocol errors (the provider answered, but not as expected).
    pub fn is_protocol(&self) -> bool {
        matches!(self, StorageError::LinkMissing { .. })
    }
}

/// A remote object opened for streaming.
///
/// Only the headers relayed to clients are kept; the body is consumed lazily,
/// and dropping it releases the upstream connection.
pub struct RemoteObject {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub content_disposition: Option<String>,
    pub body: BoxStream<'static, Result<Bytes, StorageError>>,
}

impl fmt::Debug for RemoteObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteObject")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .field("content_disposition", &self.content_disposition)
            .finish_non_exhaustive()
    }
}

/// Client for the remote storage provider.
///
/// # Implementations
///
/// - [`crate::infrastructure::storage::DiskClient`] - REST client over reqwest
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Requests a one-off URL the bytes of `filename` can be PUT to.
    async fn request_upload_link(&self, filename: &str) -> Result<String, StorageError>;

    /// Transfers `payload` to an upload URL.
    async fn put_bytes(&self, url: &str, payload: Bytes) -> Result<(), StorageError>;

    /// Requests a URL the stored object `filename` can be downloaded from.
    async fn request_download_link(&self, filename: &str) -> Result<String, StorageError>;

    /// Opens a download URL as a byte stream.
    async fn fetch(&self, url: &str) -> Result<RemoteObject, StorageError>;

    /// Checks that the provider is reachable and the credentials are accepted.
    async fn health_check(&self) -> bool;
}
