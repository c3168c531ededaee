use sqlx::SqlitePool;
use tracing::{error, info};
use crate::error::{AppError, Result};

/// Schema steps, applied in order. A version is never edited once shipped;
/// changes go into a new entry.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_project_table",
        sql_statements: &[
            r#"
            CREATE TABLE project (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                image_url TEXT,
                project_url TEXT,
                github_url TEXT
            )
            "#,
            "CREATE INDEX idx_project_title ON project(title)",
        ],
    },
    Migration {
        version: 2,
        name: "create_message_table",
        sql_statements: &[
            r#"
            CREATE TABLE message (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                message TEXT NOT NULL
            )
            "#,
        ],
    },
];

struct Migration {
    version: i64,
    name: &'static str,
    sql_statements: &'static [&'static str],
}

pub struct MigrationManager {
    pool: SqlitePool,
}

impl MigrationManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Applies every migration newer than the recorded schema version. Each
    /// one runs in its own transaction together with its `_migrations` row.
    pub async fn run_migrations(&self) -> Result<()> {
        self.create_migrations_table().await?;

        let current_version = self.current_version().await?;
        info!(current_version, "Starting database migrations");

        let pending: Vec<&Migration> = MIGRATIONS
            .iter()
            .filter(|m| m.version > current_version)
            .collect();

        for migration in &pending {
            info!("Applying migration {}: {}", migration.version, migration.name);
            self.apply_migration(migration).await?;
        }

        if pending.is_empty() {
            info!("No new migrations to apply");
        } else {
            info!("Applied {} migrations successfully", pending.len());
        }

        Ok(())
    }

    async fn create_migrations_table(&self) -> Result<()> {
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
        "#)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(())
    }

    async fn current_version(&self) -> Result<i64> {
        let version: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(version)
    }

    async fn apply_migration(&self, migration: &Migration) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        for statement in migration.sql_statements {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    error!(version = migration.version, "Failed to execute migration statement: {}", e);
                    AppError::from(e)
                })?;
        }

        sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
            .bind(migration.version)
            .bind(migration.name)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;

        tx.commit().await.map_err(AppError::from)?;
        Ok(())
    }
}

pub async fn run_migrations(pool: SqlitePool) -> Result<()> {
    MigrationManager::new(pool).run_migrations().await
}
