//! CORS (Cross-Origin Resource Sharing) middleware configuration

use tower_http::cors::{Any, CorsLayer as TowerCorsLayer};
use axum::http::{HeaderName, HeaderValue, Method};
use tracing::warn;
use crate::config::CorsConfig;

/// Any origin may call the API. The portfolio front end is usually served
/// from a different host than this backend.
pub fn cors_layer_permissive() -> TowerCorsLayer {
    TowerCorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600))
}

pub fn cors_layer_for_origins(allowed_origins: &[String]) -> TowerCorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    TowerCorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("x-requested-with"),
        ])
        .max_age(std::time::Duration::from_secs(3600))
}

pub fn cors_layer_from_config(config: &CorsConfig) -> TowerCorsLayer {
    if config.allowed_origins.is_empty() {
        cors_layer_permissive()
    } else {
        cors_layer_for_origins(&config.allowed_origins)
    }
}
