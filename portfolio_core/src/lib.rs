//! Core library containing the portfolio API: project catalog, contact
//! intake, storage and mail notification.

pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod mail;
pub mod middleware;
pub mod models;
pub mod seed;
pub mod services;

pub use catalog::{ProjectCatalog, StaticFileCatalog};
pub use config::{AppConfig, CatalogSource};
pub use database::{
    get_database_pool, get_database_pool_with_config, run_migrations, DatabaseManager,
    MessageRepository, MessageStore, ProjectRepository, SeedReport,
};
pub use error::{AppError, ContactError, Result};
pub use handlers::routes::create_routes;
pub use mail::{MailError, Mailer, SmtpMailer};
pub use middleware::cors::cors_layer_from_config;
pub use seed::seed_projects;
pub use services::{ContactOutcome, ContactService};

use axum::{middleware as axum_middleware, Router};
use sqlx::SqlitePool;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::info;

/// Everything a request handler may touch. Built explicitly at startup and
/// cloned into each request; tests assemble it from fakes.
#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub db_manager: Option<DatabaseManager>,
    pub catalog: Arc<dyn ProjectCatalog>,
    pub contact_service: ContactService,
}

impl AppState {
    pub fn new(catalog: Arc<dyn ProjectCatalog>, messages: Arc<dyn MessageStore>) -> Self {
        Self {
            app_name: "Portfolio API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            db_manager: None,
            catalog,
            contact_service: ContactService::new(messages),
        }
    }

    /// Wires the SQLite repositories, the catalog selected by
    /// `config.catalog.source` and, when enabled, the SMTP mailer.
    pub fn from_config(pool: SqlitePool, config: &AppConfig) -> Result<Self> {
        let catalog: Arc<dyn ProjectCatalog> = match config.catalog.source {
            CatalogSource::Database => Arc::new(ProjectRepository::new(pool.clone())),
            CatalogSource::StaticFile => {
                Arc::new(StaticFileCatalog::new(config.catalog.fixture_path.clone()))
            }
        };

        let mut state = Self::new(catalog, Arc::new(MessageRepository::new(pool.clone())))
            .with_database(DatabaseManager::new(pool));

        if config.mail.enabled {
            let mailer = SmtpMailer::from_config(&config.mail)
                .map_err(|e| AppError::Config(format!("Failed to configure mailer: {}", e)))?;
            state = state.with_mailer(Arc::new(mailer));
        }

        Ok(state)
    }

    pub fn with_database(mut self, db_manager: DatabaseManager) -> Self {
        self.db_manager = Some(db_manager);
        self
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.contact_service = self.contact_service.with_mailer(mailer);
        self
    }
}

pub fn create_app(state: AppState) -> Router {
    create_app_with_config(state, &AppConfig::default())
}

pub fn create_app_with_config(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(middleware::cors::cors_layer_from_config(&config.cors))
        .layer(axum_middleware::from_fn(middleware::logging::log_request))
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
