//! REST client for the cloud disk storage provider.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::storage::{RemoteObject, StorageClient, StorageError};

/// Connection settings for [`DiskClient`].
#[derive(Debug, Clone)]
pub struct DiskSettings {
    /// Base URL of the disk REST API, e.g. `https://cloud-api.yandex.net/v1/disk`.
    pub api_url: String,
    /// OAuth token sent with every API call.
    pub token: String,
    /// Directory on the disk that uploaded files are stored in.
    pub files_dir: String,
    /// Bound applied to every outbound call.
    pub timeout: Duration,
}

/// Response of the upload/download link endpoints.
#[derive(Debug, Deserialize)]
struct LinkResponse {
    href: Option<String>,
}

/// Storage client talking to the disk REST API.
///
/// The underlying [`reqwest::Client`] pools connections and is shared by all
/// requests, including every pipeline of an upload batch.
///
/// # Protocol
///
/// - `GET {api}/resources/upload?path=..&overwrite=true` -> `{ "href": .. }`
/// - `PUT {href}` with the file bytes
/// - `GET {api}/resources/download?path=..` -> `{ "href": .. }`
/// - `GET {href}` streamed back to the client
pub struct DiskClient {
    http: Client,
    settings: DiskSettings,
}

impl DiskClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transport`] if the HTTP client cannot be built.
    pub fn new(mut settings: DiskSettings) -> Result<Self, StorageError> {
        settings.api_url = settings.api_url.trim_end_matches('/').to_string();

        let http = Client::builder()
            .connect_timeout(settings.timeout)
            .read_timeout(settings.timeout)
            .build()
            .map_err(transport)?;

        Ok(Self { http, settings })
    }

    /// Full object path of `filename` on the disk.
    pub fn object_path(&self, filename: &str) -> String {
        format!("{}{}", self.settings.files_dir, filename)
    }

    fn auth_header(&self) -> String {
        format!("OAuth {}", self.settings.token)
    }

    async fn request_link(
        &self,
        endpoint: &str,
        filename: &str,
        overwrite: bool,
    ) -> Result<String, StorageError> {
        let path = self.object_path(filename);

        let mut query = vec![("path", path.as_str())];
        if overwrite {
            query.push(("overwrite", "true"));
        }

        let response = self
            .http
            .get(format!("{}/resources/{}", self.settings.api_url, endpoint))
            .header(AUTHORIZATION, self.auth_header())
            .query(&query)
            .timeout(self.settings.timeout)
            .send()
            .await
            .map_err(transport)?;

        let body: LinkResponse = check_status(response)?
            .json()
            .await
            .map_err(transport)?;

        body.href
            .filter(|href| !href.is_empty())
            .ok_or(StorageError::LinkMissing { path })
    }
}

fn transport(e: reqwest::Error) -> StorageError {
    if e.is_timeout() {
        return StorageError::Transport("request timed out".to_string());
    }
    // Signed upload/download URLs must not leak into user-facing messages.
    StorageError::Transport(e.without_url().to_string())
}

fn check_status(response: Response) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(StorageError::Status {
            status: status.as_u16(),
        })
    }
}

fn header_string(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[async_trait]
impl StorageClient for DiskClient {
    async fn request_upload_link(&self, filename: &str) -> Result<String, StorageError> {
        self.request_link("upload", filename, true).await
    }

    async fn put_bytes(&self, url: &str, payload: Bytes) -> Result<(), StorageError> {
        let response = self
            .http
            .put(url)
            .timeout(self.settings.timeout)
            .body(payload)
            .send()
            .await
            .map_err(transport)?;

        check_status(response)?;
        Ok(())
    }

    async fn request_download_link(&self, filename: &str) -> Result<String, StorageError> {
        self.request_link("download", filename, false).await
    }

    async fn fetch(&self, url: &str) -> Result<RemoteObject, StorageError> {
        // Bounded until headers arrive; the body is then limited per read by
        // the client's read timeout rather than in total.
        let response = tokio::time::timeout(self.settings.timeout, self.http.get(url).send())
            .await
            .map_err(|_| StorageError::Transport("request timed out".to_string()))?
            .map_err(transport)?;

        let response = check_status(response)?;
        let headers = response.headers();

        let content_type = header_string(headers, CONTENT_TYPE);
        let content_disposition = header_string(headers, CONTENT_DISPOSITION);
        let content_length =
            header_string(headers, CONTENT_LENGTH).and_then(|v| v.trim().parse::<u64>().ok());

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(transport))
            .boxed();

        Ok(RemoteObject {
            content_type,
            content_length,
            content_disposition,
            body,
        })
    }

    async fn health_check(&self) -> bool {
        let result = self
            .http
            .get(&self.settings.api_url)
            .header(AUTHORIZATION, self.auth_header())
            .timeout(self.settings.timeout)
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("Storage health check failed: {}", e.without_url());
                false
            }
        }
    }
}
