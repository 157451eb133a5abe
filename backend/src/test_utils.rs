//! Test harness that drives the full router against temporary storage.
//! The temp directory lives as long as the `TestApp`.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::config::Environment;
use crate::domain::CertificateService;
use crate::storage::{DbConnection, JsonConnection};
use crate::{create_router, AppState};

pub struct TestApp {
    _temp_dir: TempDir,
    pub db: DbConnection,
    router: Router,
}

impl TestApp {
    /// App backed by a live SQLite database
    pub async fn connected() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db = DbConnection::init_test(temp_dir.path())
            .await
            .expect("Failed to init test DB");
        Self::build(temp_dir, db)
    }

    /// App with no database, serving from the JSON file
    pub async fn fallback() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        Self::build(temp_dir, DbConnection::disconnected())
    }

    fn build(temp_dir: TempDir, db: DbConnection) -> Self {
        let json = JsonConnection::new(temp_dir.path().join("data"), false)
            .expect("Failed to init JSON storage");
        let state = AppState {
            certificate_service: CertificateService::from_connections(db.clone(), json),
            environment: Environment::Development,
        };
        Self {
            _temp_dir: temp_dir,
            db,
            router: create_router(state),
        }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let body = body.map(|b| b.to_string()).unwrap_or_default();
        self.send_raw(method, uri, &body).await
    }

    pub async fn send_raw(&self, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        self.dispatch(method, uri, "application/json", body).await
    }

    /// Send a URL-encoded form body
    pub async fn send_form(&self, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        self.dispatch(method, uri, "application/x-www-form-urlencoded", body)
            .await
    }

    async fn dispatch(
        &self,
        method: Method,
        uri: &str,
        content_type: &str,
        body: &str,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}
