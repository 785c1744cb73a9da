//! Integration tests for the DocBay HTTP surface
//!
//! These tests drive the full router (upload, index, static serving,
//! delete) against a store rooted in a temporary directory.

use std::io::{Cursor, Write};
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{Request, StatusCode};
use axum::Router;
use docbay::{build_router, AppState, Config};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const BOUNDARY: &str = "docbay-test-boundary";

/// Create a router over a store rooted in a fresh temp directory.
fn test_app() -> (TempDir, Router) {
    let root = TempDir::new().expect("temp dir");
    let config = Config {
        data_dir: root.path().join("docbay"),
        ..Config::default()
    };
    let state = Arc::new(AppState::new(config).expect("state"));
    (root, build_router(state))
}

/// Build a ZIP archive in memory from (name, content) pairs.
fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        writer.start_file(*name, options).expect("start file");
        writer.write_all(content.as_bytes()).expect("write entry");
    }
    writer.finish().expect("finish").into_inner()
}

/// Build a multipart upload request; omitted fields are left out of the
/// form entirely.
fn upload_request(
    project: Option<&str>,
    version: Option<&str>,
    archive: Option<&[u8]>,
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in [("project", project), ("version", version)] {
        if let Some(value) = value {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; \
                     name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
    }
    if let Some(archive) = archive {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; \
                 name=\"content\"; filename=\"docs.zip\"\r\n\
                 Content-Type: application/zip\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(archive);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/_/upload")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

async fn upload(app: &Router, project: &str, version: &str, entries: &[(&str, &str)]) {
    let archive = zip_bytes(entries);
    let response = app
        .clone()
        .oneshot(upload_request(Some(project), Some(version), Some(&archive)))
        .await
        .expect("upload");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");
}

#[tokio::test]
async fn health_returns_ok() {
    let (_root, app) = test_app();

    let response = app.oneshot(get("/health")).await.expect("health");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("healthy"));
}

#[tokio::test]
async fn upload_then_serve_round_trip() {
    let (_root, app) = test_app();
    upload(&app, "proj0", "v1", &[("index.html", "proj0-v1")]).await;

    let response = app
        .clone()
        .oneshot(get("/proj0/v1/index.html"))
        .await
        .expect("serve");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await.trim(), "proj0-v1");

    // A directory request is answered with its index.html.
    let response = app.oneshot(get("/proj0/v1/")).await.expect("serve dir");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await.trim(), "proj0-v1");
}

#[tokio::test]
async fn serves_nested_files() {
    let (_root, app) = test_app();
    upload(
        &app,
        "proj0",
        "v1",
        &[("assets/style.css", "body { margin: 0 }")],
    )
    .await;

    let response = app
        .oneshot(get("/proj0/v1/assets/style.css"))
        .await
        .expect("serve");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("margin"));
}

#[tokio::test]
async fn index_lists_uploaded_versions() {
    let (_root, app) = test_app();
    upload(&app, "proj0", "v1", &[("index.html", "hello")]).await;
    upload(&app, "proj0", "v2", &[("index.html", "hello")]).await;

    let response = app.oneshot(get("/")).await.expect("index");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("proj0"));
    assert!(body.contains("<a href=\"/proj0/v1/\">v1</a>"));
    assert!(body.contains("<a href=\"/proj0/v2/\">v2</a>"));
}

#[tokio::test]
async fn reupload_replaces_served_contents() {
    let (_root, app) = test_app();
    upload(
        &app,
        "proj0",
        "v1",
        &[("index.html", "old"), ("stale.html", "stale")],
    )
    .await;
    upload(&app, "proj0", "v1", &[("index.html", "new")]).await;

    let response = app
        .clone()
        .oneshot(get("/proj0/v1/index.html"))
        .await
        .expect("serve");
    assert_eq!(body_string(response).await.trim(), "new");

    let response = app
        .oneshot(get("/proj0/v1/stale.html"))
        .await
        .expect("serve");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_missing_fields_is_bad_request() {
    let (_root, app) = test_app();
    let archive = zip_bytes(&[("index.html", "hello")]);

    let response = app
        .clone()
        .oneshot(upload_request(Some("proj0"), None, Some(&archive)))
        .await
        .expect("upload");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(upload_request(None, Some("v1"), Some(&archive)))
        .await
        .expect("upload");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(upload_request(Some("proj0"), Some("v1"), None))
        .await
        .expect("upload");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_corrupt_archive_is_server_error() {
    let (_root, app) = test_app();

    let response = app
        .oneshot(upload_request(Some("proj0"), Some("v1"), Some(b"not a zip")))
        .await
        .expect("upload");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_string(response).await;
    assert!(body.contains("STORE_ERROR"));
}

#[tokio::test]
async fn unknown_documents_are_not_found() {
    let (_root, app) = test_app();
    upload(&app, "proj0", "v1", &[("index.html", "hello")]).await;

    // Unknown project/version resolves to a missing directory.
    let response = app
        .clone()
        .oneshot(get("/nope/v1/index.html"))
        .await
        .expect("serve");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Known version, unknown file.
    let response = app
        .clone()
        .oneshot(get("/proj0/v1/missing.html"))
        .await
        .expect("serve");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Known project, unknown version.
    let response = app.oneshot(get("/proj0/v9/")).await.expect("serve");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn project_redirects_to_latest() {
    let (_root, app) = test_app();

    let response = app.clone().oneshot(get("/proj0")).await.expect("redirect");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/proj0/latest/");

    let response = app.oneshot(get("/proj0/")).await.expect("redirect");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/proj0/latest/");
}

#[tokio::test]
async fn version_without_trailing_slash_redirects() {
    let (_root, app) = test_app();
    upload(&app, "proj0", "v1", &[("index.html", "hello")]).await;

    let response = app.oneshot(get("/proj0/v1")).await.expect("redirect");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/proj0/v1/");
}

#[tokio::test]
async fn delete_removes_version_and_is_idempotent() {
    let (_root, app) = test_app();
    upload(&app, "proj0", "v1", &[("index.html", "hello")]).await;

    let response = app
        .clone()
        .oneshot(get("/_/delete?project=proj0&version=v1"))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");

    let response = app
        .clone()
        .oneshot(get("/proj0/v1/index.html"))
        .await
        .expect("serve");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Deleting an absent version is still a success.
    let response = app
        .oneshot(get("/_/delete?project=proj0&version=v1"))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn delete_missing_params_is_bad_request() {
    let (_root, app) = test_app();

    let response = app
        .clone()
        .oneshot(get("/_/delete?project=proj0"))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get("/_/delete")).await.expect("delete");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
