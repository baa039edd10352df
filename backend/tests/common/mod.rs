//! Common test utilities for integration tests
//!
//! The application runs over the in-memory store, which tests seed directly.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;
use vitality_backend::{
    config::AppConfig, repositories::InMemoryStore, routes, state::AppState,
};

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub store: Arc<InMemoryStore>,
    pub user_id: Uuid,
}

impl TestApp {
    /// Create a new test application with an empty in-memory store
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::new(store.clone(), AppConfig::default());
        let app = routes::create_router(state);

        Self {
            app,
            store,
            user_id: Uuid::new_v4(),
        }
    }

    /// Path under the test user's API scope
    pub fn user_path(&self, path: &str) -> String {
        format!("/api/v1/users/{}{}", self.user_id, path)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.send_json("POST", path, body).await
    }

    /// Make a PUT request with JSON body
    pub async fn put(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.send_json("PUT", path, body).await
    }

    /// GET expecting 200 and a JSON body
    pub async fn get_json(&self, path: &str) -> Value {
        let (status, body) = self.get(path).await;
        assert_eq!(status, StatusCode::OK, "GET {} failed: {}", path, body);
        serde_json::from_str(&body).unwrap()
    }

    async fn send_json(&self, method: &str, path: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn days_ago(n: i64) -> NaiveDate {
    today() - Duration::days(n)
}
