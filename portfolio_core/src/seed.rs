//! Populates the `project` table from the JSON fixture.

use std::path::Path;
use tracing::info;
use crate::catalog::load_fixture;
use crate::database::{ProjectRepository, SeedReport};
use crate::error::Result;

/// Loads `fixture` and inserts every project whose title is not stored yet.
/// The fixture is fully parsed and validated before the store is touched.
pub async fn seed_projects(repository: &ProjectRepository, fixture: &Path) -> Result<SeedReport> {
    let projects = load_fixture(fixture).await?;
    info!(path = %fixture.display(), entries = projects.len(), "Loaded project fixture");

    repository.seed(&projects).await
}
