use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    Row, SqlitePool,
};
use std::{str::FromStr, time::Duration};
use tracing::{error, info};
use crate::config::DatabaseConfig;
use crate::error::{AppError, Result};

#[derive(Clone)]
pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn health_check(&self) -> Result<()> {
        let row = sqlx::query("SELECT 1 as test")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database health check failed: {}", e);
                AppError::from(e)
            })?;

        let test_value: i32 = row.try_get("test")
            .map_err(AppError::from)?;

        if test_value == 1 {
            Ok(())
        } else {
            Err(AppError::from(sqlx::Error::RowNotFound))
        }
    }
}

pub async fn get_database_pool(database_url: &str) -> Result<SqlitePool> {
    get_database_pool_with_config(&DatabaseConfig {
        url: database_url.to_string(),
        ..DatabaseConfig::default()
    })
    .await
}

pub async fn get_database_pool_with_config(config: &DatabaseConfig) -> Result<SqlitePool> {
    info!("Connecting to database: {}", config.url);

    let in_memory = config.url.contains(":memory:");

    let mut options = SqliteConnectOptions::from_str(&config.url)
        .map_err(AppError::from)?
        .create_if_missing(true)
        .foreign_keys(true)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(30));

    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    // Every connection to `:memory:` opens its own empty database, so the
    // pool must hold exactly one connection and never recycle it.
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(1800))
    };

    let pool = pool_options
        .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
        .test_before_acquire(true)
        .connect_with(options)
        .await
        .map_err(|e| {
            error!("Failed to create database pool: {}", e);
            AppError::from(e)
        })?;

    info!("Database connection pool created successfully");
    Ok(pool)
}
