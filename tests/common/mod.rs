#![allow(dead_code)]

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use axum_test::TestServer;
use file_shortener::infrastructure::persistence::InMemoryLinkRepository;
use file_shortener::infrastructure::storage::{DiskClient, DiskSettings};
use file_shortener::routes::router;
use file_shortener::state::{AppState, ServiceSettings};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

pub const TOKEN: &str = "test-token";
pub const FILES_DIR: &str = "disk:/Uploader/";
pub const BASE_URL: &str = "http://short.test";

/// File names containing these markers make the fake disk misbehave.
pub const FAIL_UPLOAD_LINK: &str = "fail-link";
pub const NO_HREF: &str = "no-href";
pub const FAIL_PUT: &str = "fail-put";
pub const NO_DISPOSITION: &str = "nodisp";

#[derive(Clone, Default)]
struct DiskState {
    base: String,
    objects: Arc<Mutex<HashMap<String, Bytes>>>,
    puts: Arc<AtomicUsize>,
}

/// In-process stand-in for the disk REST API, served on an ephemeral port.
pub struct FakeDisk {
    pub base: String,
    objects: Arc<Mutex<HashMap<String, Bytes>>>,
    puts: Arc<AtomicUsize>,
}

impl FakeDisk {
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let state = DiskState {
            base: base.clone(),
            ..Default::default()
        };

        let app = Router::new()
            .route("/v1/disk", get(disk_root))
            .route("/v1/disk/resources/upload", get(upload_link))
            .route("/v1/disk/resources/download", get(download_link))
            .route("/put/{name}", put(store_object))
            .route("/get/{name}", get(serve_object))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base,
            objects: state.objects,
            puts: state.puts,
        }
    }

    pub fn api_url(&self) -> String {
        format!("{}/v1/disk", self.base)
    }

    pub fn settings(&self) -> DiskSettings {
        DiskSettings {
            api_url: self.api_url(),
            token: TOKEN.to_string(),
            files_dir: FILES_DIR.to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn client(&self) -> DiskClient {
        DiskClient::new(self.settings()).unwrap()
    }

    /// Places an object on the disk without going through the upload flow.
    pub fn insert(&self, name: &str, data: &'static [u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(name.to_string(), Bytes::from_static(data));
    }

    pub fn object(&self, name: &str) -> Option<Bytes> {
        self.objects.lock().unwrap().get(name).cloned()
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[derive(Deserialize)]
struct PathQuery {
    path: String,
    overwrite: Option<String>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(format!("OAuth {TOKEN}").as_str())
}

fn object_name(path: &str) -> Option<&str> {
    path.strip_prefix(FILES_DIR)
}

async fn disk_root(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({"total_space": 1024, "used_space": 0})).into_response()
}

async fn upload_link(
    State(state): State<DiskState>,
    headers: HeaderMap,
    Query(query): Query<PathQuery>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Some(name) = object_name(&query.path) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    if query.overwrite.as_deref() != Some("true") {
        return StatusCode::CONFLICT.into_response();
    }
    if name.contains(FAIL_UPLOAD_LINK) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if name.contains(NO_HREF) {
        return Json(json!({"method": "PUT"})).into_response();
    }

    Json(json!({"href": format!("{}/put/{}", state.base, name), "method": "PUT"})).into_response()
}

async fn store_object(
    State(state): State<DiskState>,
    Path(name): Path<String>,
    body: Bytes,
) -> StatusCode {
    state.puts.fetch_add(1, Ordering::SeqCst);

    if name.contains(FAIL_PUT) {
        return StatusCode::INSUFFICIENT_STORAGE;
    }

    state.objects.lock().unwrap().insert(name, body);
    StatusCode::CREATED
}

async fn download_link(
    State(state): State<DiskState>,
    headers: HeaderMap,
    Query(query): Query<PathQuery>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Some(name) = object_name(&query.path) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    if !state.objects.lock().unwrap().contains_key(name) {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "DiskNotFoundError"})),
        )
            .into_response();
    }

    Json(json!({"href": format!("{}/get/{}", state.base, name), "method": "GET"})).into_response()
}

async fn serve_object(State(state): State<DiskState>, Path(name): Path<String>) -> Response {
    let Some(data) = state.objects.lock().unwrap().get(&name).cloned() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let content_type = if name.ends_with(".pdf") {
        "application/pdf"
    } else {
        "text/plain"
    };

    if name.contains(NO_DISPOSITION) {
        return ([(header::CONTENT_TYPE, content_type.to_string())], data).into_response();
    }

    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{name}\""),
            ),
        ],
        data,
    )
        .into_response()
}

pub fn settings(allowed_file_extensions: &[&str]) -> ServiceSettings {
    ServiceSettings {
        base_url: BASE_URL.to_string(),
        upload_concurrency: 4,
        allowed_file_extensions: allowed_file_extensions
            .iter()
            .map(|e| e.to_string())
            .collect(),
        max_upload_bytes: 1024 * 1024,
    }
}

/// Application state over an in-memory link store and the fake disk.
pub fn create_test_state(disk: &FakeDisk) -> AppState {
    create_test_state_with(disk, settings(&[]))
}

pub fn create_test_state_with(disk: &FakeDisk, settings: ServiceSettings) -> AppState {
    AppState::new(
        Arc::new(InMemoryLinkRepository::new()),
        Arc::new(disk.client()),
        settings,
    )
}

pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(router(state, None)).unwrap()
}
