mod common;

use bytes::Bytes;
use common::{FAIL_PUT, FAIL_UPLOAD_LINK, FakeDisk, NO_HREF};
use file_shortener::domain::storage::{StorageClient, StorageError};
use file_shortener::infrastructure::storage::{DiskClient, DiskSettings};
use futures_util::StreamExt;
use std::time::Duration;

#[tokio::test]
async fn test_full_upload_and_fetch_cycle() {
    let disk = FakeDisk::spawn().await;
    let client = disk.client();

    let upload_url = client.request_upload_link("cycle.txt").await.unwrap();
    client
        .put_bytes(&upload_url, Bytes::from_static(b"cycle bytes"))
        .await
        .unwrap();

    let download_url = client.request_download_link("cycle.txt").await.unwrap();
    let object = client.fetch(&download_url).await.unwrap();

    assert_eq!(object.content_type.as_deref(), Some("text/plain"));
    assert_eq!(object.content_length, Some(11));
    assert_eq!(
        object.content_disposition.as_deref(),
        Some("attachment; filename=\"cycle.txt\"")
    );

    let mut body = Vec::new();
    let mut stream = object.body;
    while let Some(chunk) = stream.next().await {
        body.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(body, b"cycle bytes");
}

#[tokio::test]
async fn test_upload_link_without_href() {
    let disk = FakeDisk::spawn().await;
    let name = format!("{NO_HREF}.txt");

    let result = disk.client().request_upload_link(&name).await;

    assert_eq!(
        result,
        Err(StorageError::LinkMissing {
            path: format!("disk:/Uploader/{name}")
        })
    );
}

#[tokio::test]
async fn test_upload_link_error_status() {
    let disk = FakeDisk::spawn().await;

    let result = disk
        .client()
        .request_upload_link(&format!("{FAIL_UPLOAD_LINK}.txt"))
        .await;

    assert_eq!(result, Err(StorageError::Status { status: 500 }));
}

#[tokio::test]
async fn test_put_error_status() {
    let disk = FakeDisk::spawn().await;
    let client = disk.client();
    let name = format!("{FAIL_PUT}.txt");

    let upload_url = client.request_upload_link(&name).await.unwrap();
    let result = client
        .put_bytes(&upload_url, Bytes::from_static(b"x"))
        .await;

    assert_eq!(result, Err(StorageError::Status { status: 507 }));
}

#[tokio::test]
async fn test_download_link_for_missing_object() {
    let disk = FakeDisk::spawn().await;

    let result = disk.client().request_download_link("absent.txt").await;

    assert_eq!(result, Err(StorageError::Status { status: 404 }));
}

#[tokio::test]
async fn test_unreachable_storage_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = DiskClient::new(DiskSettings {
        api_url: format!("http://{addr}/v1/disk"),
        token: "t".to_string(),
        files_dir: "disk:/Uploader/".to_string(),
        timeout: Duration::from_secs(2),
    })
    .unwrap();

    let result = client.request_upload_link("a.txt").await;

    assert!(matches!(result, Err(StorageError::Transport(_))));
    assert!(!client.health_check().await);
}

#[tokio::test]
async fn test_health_check() {
    let disk = FakeDisk::spawn().await;

    assert!(disk.client().health_check().await);

    let mut settings = disk.settings();
    settings.token = "wrong".to_string();
    assert!(!DiskClient::new(settings).unwrap().health_check().await);
}
