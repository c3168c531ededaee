//! HTTP route handlers for the catalog and contact endpoints

use crate::{
    error::{ContactError, Result},
    extractors::ContactJson,
    handlers::health::handle_health,
    models::{ContactRequest, ContactResponse},
    AppState,
};
use axum::{
    extract::State,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

pub const LANDING_PAGE: &str = "<h1>API Server is Running</h1><p>Try accessing the <a href='/api/projects'>/api/projects</a> endpoint.</p>";

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/api/projects", get(handle_list_projects))
        .route("/api/contact", post(handle_contact))
}

async fn handle_root() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

async fn handle_list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<serde_json::Value>>> {
    let projects = state.catalog.list_projects().await?;

    info!(source = %state.catalog.source(), count = projects.len(), "GET /api/projects");

    Ok(Json(projects))
}

async fn handle_contact(
    State(state): State<AppState>,
    ContactJson(payload): ContactJson<ContactRequest>,
) -> std::result::Result<Json<ContactResponse>, ContactError> {
    let outcome = state.contact_service.submit(payload).await?;

    info!(message_id = outcome.message().id, "POST /api/contact - message stored");

    Ok(Json(outcome.to_response()))
}
