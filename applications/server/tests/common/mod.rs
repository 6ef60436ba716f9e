//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use setlist_core::policy::OwnerPolicy;
use setlist_server::{api, state::AppState};
use setlist_storage::LocalStorageContext;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Router over a fresh, migrated SQLite file
///
/// Keep the `TempDir` alive for as long as the router is used.
pub async fn create_test_app(owner_policy: OwnerPolicy) -> (Router, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_url = format!("sqlite://{}", temp_dir.path().join("api.db").display());

    let pool = setlist_storage::create_pool(&db_url, 5)
        .await
        .expect("Failed to create pool");
    setlist_storage::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let storage = Arc::new(LocalStorageContext::new(pool));
    let app = api::router(AppState::new(storage, owner_policy));

    (app, temp_dir)
}

/// Send a request and decode the JSON response body
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).expect("Response body is not JSON")
    };

    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "PUT", uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "DELETE", uri, None).await
}

/// Create a track and return its id
pub async fn create_track(app: &Router, title: &str, artist: &str) -> String {
    let (status, body) = post(
        app,
        "/tracks",
        serde_json::json!({ "title": title, "artist": artist }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create track failed: {body}");
    body["id"].as_str().unwrap().to_string()
}

/// Create a playlist and return its id
pub async fn create_playlist(app: &Router, name: &str) -> String {
    let (status, body) = post(app, "/playlists", serde_json::json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CREATED, "create playlist failed: {body}");
    body["id"].as_str().unwrap().to_string()
}
