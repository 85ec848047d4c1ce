//! Short code resolution: redirect or storage-backed byte relay.

use std::sync::Arc;

use crate::application::services::link_service::LinkService;
use crate::domain::storage::{RemoteObject, StorageClient};
use crate::error::AppError;

/// What a resolved short code turns into.
#[derive(Debug)]
pub enum Resolution {
    /// Redirect the client to the original URL.
    Redirect(String),
    /// Relay the bytes of a stored file.
    Stream(RemoteObject),
}

/// Resolves short codes for browser-facing requests.
///
/// URL links resolve to a redirect. File links resolve to a download link
/// requested from storage, then opened as a stream. Upstream failures are
/// returned as [`AppError::Upstream`] and never retried.
pub struct ResolveService {
    links: Arc<LinkService>,
    storage: Arc<dyn StorageClient>,
}

impl ResolveService {
    pub fn new(links: Arc<LinkService>, storage: Arc<dyn StorageClient>) -> Self {
        Self { links, storage }
    }

    /// Resolves `short_code`.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code is unknown
    /// - [`AppError::Upstream`] if the download link or the fetch fails
    pub async fn resolve(&self, short_code: &str) -> Result<Resolution, AppError> {
        let link = self.links.get_link(short_code).await?;

        if !link.is_file {
            metrics::counter!("resolutions_total", "kind" => "redirect").increment(1);
            return Ok(Resolution::Redirect(link.original));
        }

        let href = self
            .storage
            .request_download_link(&link.original)
            .await
            .inspect_err(|e| {
                tracing::warn!(code = %short_code, file = %link.original, error = %e, "Download link request failed");
            })?;

        let object = self.storage.fetch(&href).await.inspect_err(|e| {
            tracing::warn!(code = %short_code, file = %link.original, error = %e, "Upstream fetch failed");
        })?;

        metrics::counter!("resolutions_total", "kind" => "stream").increment(1);
        tracing::debug!(code = %short_code, file = %link.original, "Streaming stored file");

        Ok(Resolution::Stream(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Link;
    use crate::domain::repositories::MockLinkRepository;
    use crate::domain::storage::{MockStorageClient, StorageError};
    use bytes::Bytes;
    use chrono::Utc;
    use futures_util::{StreamExt, stream};

    fn repo_with(link: Option<Link>) -> MockLinkRepository {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_short_code()
            .returning(move |_| Ok(link.clone()));
        repo
    }

    fn service(repo: MockLinkRepository, storage: MockStorageClient) -> ResolveService {
        let links = Arc::new(LinkService::new(Arc::new(repo)));
        ResolveService::new(links, Arc::new(storage))
    }

    #[tokio::test]
    async fn test_resolve_url_link_redirects() {
        let link = Link::new(
            1,
            "abc".to_string(),
            "https://example.com/x".to_string(),
            false,
            Utc::now(),
        );

        let mut storage = MockStorageClient::new();
        storage.expect_request_download_link().times(0);

        let resolution = service(repo_with(Some(link)), storage)
            .resolve("abc")
            .await
            .unwrap();

        match resolution {
            Resolution::Redirect(target) => assert_eq!(target, "https://example.com/x"),
            other => panic!("unexpected resolution: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_unknown_code() {
        let result = service(repo_with(None), MockStorageClient::new())
            .resolve("nope")
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_resolve_file_link_streams() {
        let link = Link::new(
            2,
            "f1".to_string(),
            "doc.pdf".to_string(),
            true,
            Utc::now(),
        );

        let mut storage = MockStorageClient::new();
        storage
            .expect_request_download_link()
            .withf(|name| name == "doc.pdf")
            .times(1)
            .returning(|_| Ok("https://download.test/doc.pdf".to_string()));
        storage
            .expect_fetch()
            .withf(|url| url == "https://download.test/doc.pdf")
            .times(1)
            .returning(|_| {
                Ok(RemoteObject {
                    content_type: Some("application/pdf".to_string()),
                    content_length: Some(6),
                    content_disposition: None,
                    body: stream::iter(vec![
                        Ok(Bytes::from_static(b"abc")),
                        Ok(Bytes::from_static(b"def")),
                    ])
                    .boxed(),
                })
            });

        let resolution = service(repo_with(Some(link)), storage)
            .resolve("f1")
            .await
            .unwrap();

        let Resolution::Stream(object) = resolution else {
            panic!("expected a stream");
        };

        assert_eq!(object.content_type.as_deref(), Some("application/pdf"));
        let chunks: Vec<_> = object.body.collect().await;
        let bytes: Vec<u8> = chunks
            .into_iter()
            .flat_map(|c| c.unwrap().to_vec())
            .collect();
        assert_eq!(bytes, b"abcdef");
    }

    #[tokio::test]
    async fn test_resolve_file_link_download_link_failure() {
        let link = Link::new(
            3,
            "f2".to_string(),
            "gone.pdf".to_string(),
            true,
            Utc::now(),
        );

        let mut storage = MockStorageClient::new();
        storage
            .expect_request_download_link()
            .times(1)
            .returning(|_| Err(StorageError::Status { status: 404 }));
        storage.expect_fetch().times(0);

        let result = service(repo_with(Some(link)), storage).resolve("f2").await;

        assert!(matches!(result, Err(AppError::Upstream { .. })));
    }

    #[tokio::test]
    async fn test_resolve_file_link_fetch_failure_not_retried() {
        let link = Link::new(
            4,
            "f3".to_string(),
            "flaky.pdf".to_string(),
            true,
            Utc::now(),
        );

        let mut storage = MockStorageClient::new();
        storage
            .expect_request_download_link()
            .times(1)
            .returning(|_| Ok("https://download.test/flaky.pdf".to_string()));
        storage
            .expect_fetch()
            .times(1)
            .returning(|_| Err(StorageError::Transport("timed out".to_string())));

        let result = service(repo_with(Some(link)), storage).resolve("f3").await;

        assert!(matches!(result, Err(AppError::Upstream { .. })));
    }
}
