mod common;

use axum::http::{StatusCode, header};
use common::{FakeDisk, NO_DISPOSITION, create_test_server, create_test_state};
use serde_json::Value;

#[tokio::test]
async fn test_redirect_url_link() {
    let disk = FakeDisk::spawn().await;
    let state = create_test_state(&disk);
    let link = state
        .link_service
        .create_link("https://example.com/target", Some("go"))
        .await
        .unwrap();
    let server = create_test_server(state);

    let response = server.get(&format!("/{}", link.short_code)).await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://example.com/target"
    );
}

#[tokio::test]
async fn test_redirect_unknown_code() {
    let disk = FakeDisk::spawn().await;
    let server = create_test_server(create_test_state(&disk));

    let response = server.get("/nothing").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(response.json::<Value>()["message"].is_string());
}

#[tokio::test]
async fn test_file_link_streams_bytes_and_headers() {
    let disk = FakeDisk::spawn().await;
    disk.insert("report.pdf", b"%PDF-1.4 fake report");

    let state = create_test_state(&disk);
    let link = state
        .link_service
        .create_file_link("report.pdf")
        .await
        .unwrap();
    let server = create_test_server(state);

    let response = server.get(&format!("/{}", link.short_code)).await;

    response.assert_status_ok();
    let headers = response.headers();
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/pdf");
    assert_eq!(headers.get(header::CONTENT_LENGTH).unwrap(), "20");
    assert_eq!(
        headers.get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"report.pdf\""
    );
    assert_eq!(response.as_bytes().as_ref(), b"%PDF-1.4 fake report");
}

#[tokio::test]
async fn test_file_link_without_disposition() {
    let disk = FakeDisk::spawn().await;
    let name = format!("{NO_DISPOSITION}.txt");
    disk.insert(&name, b"plain");

    let state = create_test_state(&disk);
    let link = state.link_service.create_file_link(&name).await.unwrap();
    let server = create_test_server(state);

    let response = server.get(&format!("/{}", link.short_code)).await;

    response.assert_status_ok();
    assert!(response.headers().get(header::CONTENT_DISPOSITION).is_none());
    assert_eq!(response.text(), "plain");
}

#[tokio::test]
async fn test_file_link_missing_on_storage() {
    let disk = FakeDisk::spawn().await;

    let state = create_test_state(&disk);
    let link = state
        .link_service
        .create_file_link("vanished.pdf")
        .await
        .unwrap();
    let server = create_test_server(state);

    let response = server.get(&format!("/{}", link.short_code)).await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    assert!(response.json::<Value>()["message"].is_string());
}
