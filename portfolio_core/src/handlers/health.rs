//! Health probe

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::warn;

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let mut status_code = StatusCode::OK;

    let database_status = match &state.db_manager {
        Some(db_manager) => match db_manager.health_check().await {
            Ok(()) => "healthy",
            Err(e) => {
                warn!("Health check found the database unhealthy: {}", e);
                status_code = StatusCode::SERVICE_UNAVAILABLE;
                "unhealthy"
            }
        },
        None => "not_configured",
    };

    let body = serde_json::json!({
        "status": if status_code == StatusCode::OK { "healthy" } else { "unhealthy" },
        "app": state.app_name,
        "version": state.version,
        "database": database_status,
        "catalog_source": state.catalog.source().to_string(),
        "mail_enabled": state.contact_service.is_mail_enabled(),
        "timestamp": chrono::Utc::now().timestamp(),
    });

    (status_code, Json(body))
}
