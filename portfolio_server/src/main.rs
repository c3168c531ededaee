//! Main entry point for the portfolio API server binary

use anyhow::Result;
use portfolio_core::{
    create_app_with_config, get_database_pool_with_config, run_migrations, run_server, AppConfig,
    AppState,
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal outside development.
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    info!("Configuration loaded successfully");
    info!("Server will bind to: {}", config.bind_address());
    info!("Database URL: {}", config.database.url);
    info!("Catalog source: {}", config.catalog.source);
    info!("Mail notifications: {}", if config.mail.enabled { "enabled" } else { "disabled" });

    let addr: SocketAddr = config.bind_address().parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    let pool = get_database_pool_with_config(&config.database).await
        .map_err(|e| anyhow::anyhow!("Failed to create database pool: {}", e))?;

    if config.database.migrate_on_start {
        run_migrations(pool.clone()).await
            .map_err(|e| anyhow::anyhow!("Failed to run database migrations: {}", e))?;
    }

    let state = AppState::from_config(pool, &config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize application state: {}", e))?;

    info!("App: {} v{}", state.app_name, state.version);

    let app = create_app_with_config(state, &config);

    run_server(app, addr).await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            let default_level = if cfg!(debug_assertions) {
                "debug"
            } else {
                "info"
            };

            default_directives(default_level).into()
        });

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let is_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    if is_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .init();
    }
}

/// Filter used when `RUST_LOG` is unset. Events from this binary carry the
/// `server` target (the bin name), library events `portfolio_core`.
fn default_directives(level: &str) -> String {
    format!(
        "{}={level},portfolio_core={level},tower_http=debug,axum=debug",
        env!("CARGO_CRATE_NAME"),
        level = level
    )
}
