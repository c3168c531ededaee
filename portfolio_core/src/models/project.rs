//! Project records served by the catalog and loaded by the seeder

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
}

/// One entry of the projects fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub project_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
}

impl NewProject {
    /// Title and description are the only required attributes.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("project title cannot be empty".to_string());
        }
        if self.description.trim().is_empty() {
            return Err(format!("project '{}' has an empty description", self.title));
        }
        Ok(())
    }
}
