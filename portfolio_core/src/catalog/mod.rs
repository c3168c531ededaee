//! Read side of the project catalog.
//!
//! `GET /api/projects` is served by whichever [`ProjectCatalog`] the
//! application state was built with: the `project` table through
//! [`ProjectRepository`], or the JSON fixture through [`StaticFileCatalog`].

pub mod static_file;

pub use static_file::{load_fixture, StaticFileCatalog};

use async_trait::async_trait;
use crate::config::CatalogSource;
use crate::database::ProjectRepository;
use crate::error::Result;

#[async_trait]
pub trait ProjectCatalog: Send + Sync {
    /// All projects as JSON objects, in store order.
    async fn list_projects(&self) -> Result<Vec<serde_json::Value>>;

    fn source(&self) -> CatalogSource;
}

#[async_trait]
impl ProjectCatalog for ProjectRepository {
    async fn list_projects(&self) -> Result<Vec<serde_json::Value>> {
        let projects = self.list().await?;
        projects
            .iter()
            .map(|project| serde_json::to_value(project).map_err(Into::into))
            .collect()
    }

    fn source(&self) -> CatalogSource {
        CatalogSource::Database
    }
}
