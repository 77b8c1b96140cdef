//! Project metadata

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::atomic;
use crate::error::Result;

/// Metadata describing one review project, persisted as `metadata.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMeta {
    /// Display name of the project
    pub name: String,

    /// Project directory, as given at creation
    pub path: String,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

impl ProjectMeta {
    /// Create metadata for a new project
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            created_at: Utc::now(),
        }
    }

    /// Load metadata from a file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Persist metadata with an atomic overwrite
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        atomic::overwrite(path, &contents)
    }
}
