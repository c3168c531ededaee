use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::catalog::ProjectCatalog;
use crate::config::CatalogSource;
use crate::error::{AppError, Result};
use crate::models::NewProject;

/// Serves the fixture file as-is. The file is read on every request so
/// edits show up without a restart.
#[derive(Debug, Clone)]
pub struct StaticFileCatalog {
    path: PathBuf,
}

impl StaticFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProjectCatalog for StaticFileCatalog {
    async fn list_projects(&self) -> Result<Vec<serde_json::Value>> {
        debug!(path = %self.path.display(), "Reading static project catalog");

        let raw = tokio::fs::read_to_string(&self.path).await?;
        let value: serde_json::Value = serde_json::from_str(&raw)?;

        match value {
            serde_json::Value::Array(projects) => Ok(projects),
            _ => Err(AppError::Fixture(format!(
                "{} does not contain a JSON array",
                self.path.display()
            ))),
        }
    }

    fn source(&self) -> CatalogSource {
        CatalogSource::StaticFile
    }
}

/// Reads and validates the seeding fixture. Any unreadable file, malformed
/// JSON or invalid entry fails the whole load.
pub async fn load_fixture(path: &Path) -> Result<Vec<NewProject>> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::Fixture(format!("cannot read {}: {}", path.display(), e))
    })?;

    let projects: Vec<NewProject> = serde_json::from_str(&raw).map_err(|e| {
        AppError::Fixture(format!("cannot parse {}: {}", path.display(), e))
    })?;

    for (index, project) in projects.iter().enumerate() {
        project
            .validate()
            .map_err(|e| AppError::Fixture(format!("entry {}: {}", index, e)))?;
    }

    Ok(projects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fixture(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_static_catalog_returns_file_contents() {
        let file = fixture(r#"[{"id": 7, "title": "Demo", "description": "d", "extra": true}]"#);
        let catalog = StaticFileCatalog::new(file.path());

        let projects = catalog.list_projects().await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0]["title"], "Demo");
        assert_eq!(projects[0]["extra"], true);
        assert_eq!(catalog.source(), CatalogSource::StaticFile);
    }

    #[tokio::test]
    async fn test_static_catalog_missing_file_is_error() {
        let catalog = StaticFileCatalog::new("/nonexistent/projects.json");
        assert!(matches!(catalog.list_projects().await, Err(AppError::IoError(_))));
    }

    #[tokio::test]
    async fn test_static_catalog_rejects_non_array() {
        let file = fixture(r#"{"title": "Demo"}"#);
        let catalog = StaticFileCatalog::new(file.path());
        assert!(matches!(catalog.list_projects().await, Err(AppError::Fixture(_))));
    }

    #[tokio::test]
    async fn test_load_fixture() {
        let file = fixture(r#"[
            {"title": "Demo", "description": "A demo", "github_url": "https://github.com/me/demo"},
            {"title": "Other", "description": "Another"}
        ]"#);

        let projects = load_fixture(file.path()).await.unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].github_url.as_deref(), Some("https://github.com/me/demo"));
    }

    #[tokio::test]
    async fn test_load_fixture_rejects_invalid_entries() {
        let missing_description = fixture(r#"[{"title": "Demo"}]"#);
        assert!(load_fixture(missing_description.path()).await.is_err());

        let blank_title = fixture(r#"[{"title": " ", "description": "d"}]"#);
        assert!(load_fixture(blank_title.path()).await.is_err());

        let malformed = fixture("[{");
        assert!(load_fixture(malformed.path()).await.is_err());
    }
}
