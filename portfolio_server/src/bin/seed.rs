//! Loads the projects fixture into the database. Safe to re-run: projects
//! whose title already exists are skipped.

use anyhow::Result;
use clap::Parser;
use portfolio_core::{
    get_database_pool_with_config, run_migrations, seed_projects, AppConfig, ProjectRepository,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(author, version, about = "Seed the project table from a JSON fixture")]
struct Args {
    /// Path to the projects fixture (defaults to the configured catalog fixture)
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Database URL (defaults to the configured database)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let mut config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    if let Some(url) = args.database_url {
        config.database.url = url;
    }
    let fixture = args.fixture.unwrap_or_else(|| config.catalog.fixture_path.clone());

    info!(database = %config.database.url, fixture = %fixture.display(), "Seeding projects");

    let pool = get_database_pool_with_config(&config.database).await?;
    run_migrations(pool.clone()).await?;

    let repository = ProjectRepository::new(pool.clone());
    let report = seed_projects(&repository, &fixture).await?;

    info!(
        inserted = report.inserted,
        skipped = report.skipped,
        total = repository.count().await?,
        "Seeding complete"
    );

    pool.close().await;
    Ok(())
}
