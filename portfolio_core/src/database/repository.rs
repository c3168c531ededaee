use async_trait::async_trait;
use serde::Serialize;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, error, info};
use crate::error::{AppError, Result};
use crate::models::{Message, NewMessage, NewProject, Project};

/// Durable sink for contact submissions.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persists one message atomically; nothing is written on error.
    async fn save_message(&self, message: &NewMessage) -> Result<Message>;
}

#[derive(Clone)]
pub struct ProjectRepository {
    pool: SqlitePool,
}

/// Outcome of one seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

impl ProjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(r#"
            SELECT id, title, description, image_url, project_url, github_url
            FROM project
            ORDER BY id
        "#)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(projects)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM project")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(count)
    }

    /// Inserts every project whose title is not stored yet, committing once
    /// at the end. Any failure rolls the whole batch back.
    pub async fn seed(&self, projects: &[NewProject]) -> Result<SeedReport> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;
        let mut report = SeedReport::default();

        for input in projects {
            if Self::find_by_title_in(&mut *tx, &input.title).await?.is_some() {
                debug!(title = %input.title, "Project already exists, skipping");
                report.skipped += 1;
                continue;
            }

            let project = Self::insert_in(&mut tx, input).await?;
            debug!(id = project.id, title = %project.title, "Inserted project");
            report.inserted += 1;
        }

        tx.commit().await.map_err(|e| {
            error!("Failed to commit seeded projects: {}", e);
            AppError::from(e)
        })?;

        info!(inserted = report.inserted, skipped = report.skipped, "Project seeding committed");
        Ok(report)
    }

    async fn find_by_title_in(
        conn: &mut sqlx::SqliteConnection,
        title: &str,
    ) -> Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(r#"
            SELECT id, title, description, image_url, project_url, github_url
            FROM project
            WHERE title = ?
            LIMIT 1
        "#)
        .bind(title)
        .fetch_optional(&mut *conn)
        .await
        .map_err(AppError::from)?;

        Ok(project)
    }

    async fn insert_in(tx: &mut Transaction<'_, Sqlite>, input: &NewProject) -> Result<Project> {
        let project = sqlx::query_as::<_, Project>(r#"
            INSERT INTO project (title, description, image_url, project_url, github_url)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, title, description, image_url, project_url, github_url
        "#)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.image_url)
        .bind(&input.project_url)
        .bind(&input.github_url)
        .fetch_one(&mut **tx)
        .await
        .map_err(AppError::from)?;

        Ok(project)
    }
}

#[derive(Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM message")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(count)
    }

    pub async fn list(&self) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT id, name, email, message FROM message ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(messages)
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    async fn save_message(&self, input: &NewMessage) -> Result<Message> {
        // Dropping `tx` on any early return rolls the insert back.
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        let message = sqlx::query_as::<_, Message>(r#"
            INSERT INTO message (name, email, message)
            VALUES (?, ?, ?)
            RETURNING id, name, email, message
        "#)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.message)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::from)?;

        tx.commit().await.map_err(AppError::from)?;

        Ok(message)
    }
}
