#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use portfolio_core::{get_database_pool, mail::MailError, models::NewMessage, run_migrations, Mailer};
use sqlx::SqlitePool;
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tower::ServiceExt;

/// The temp file must outlive the pool, so both are returned.
pub async fn setup_test_database() -> (SqlitePool, NamedTempFile) {
    let temp_file = NamedTempFile::new().unwrap();
    let pool = get_database_pool(&database_url(&temp_file)).await.unwrap();
    run_migrations(pool.clone()).await.unwrap();

    (pool, temp_file)
}

pub fn database_url(file: &NamedTempFile) -> String {
    format!("sqlite:{}", file.path().display())
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<NewMessage>>,
    pub failure: Option<String>,
}

impl RecordingMailer {
    pub fn failing(reason: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(reason.to_string()),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_contact_notification(&self, message: &NewMessage) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(message.clone());
        match &self.failure {
            Some(reason) => Err(MailError::Build(reason.clone())),
            None => Ok(()),
        }
    }
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_str(&body).unwrap())
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_contact(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/contact")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
