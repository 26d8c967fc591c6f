//! Router harness for handler tests

use crate::storage::Database;
use crate::AppState;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// A router over a fresh database file that lives as long as the harness.
pub struct TestApp {
    pub db: Arc<Database>,
    router: Router,
    _dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("ledger.db");
        let db = Database::connect(&path.to_string_lossy())
            .await
            .expect("failed to open database");
        db.init_schema().await.expect("failed to create schema");

        let db = Arc::new(db);
        let router = crate::router(AppState { db: db.clone() });

        Self {
            db,
            router,
            _dir: dir,
        }
    }

    /// Send one request and decode the JSON response body.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}
