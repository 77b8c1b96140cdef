//! The alignment store
//!
//! One JSON file maps requirement-unit ids to their full alignment record.
//! Writes are last-writer-wins whole-file overwrites; there is no
//! versioning.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use traceline_core::RequirementUnit;

use crate::atomic;
use crate::error::Result;

/// Full alignment state of one requirement unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentRecord {
    /// The unit with its associated code fragments
    pub unit: RequirementUnit,

    /// Narrative review text, once reviewed
    #[serde(default)]
    pub review_process: Option<String>,

    /// Issue list text, once reviewed
    #[serde(default)]
    pub issues: Option<String>,

    /// When this record was last written
    pub updated_at: DateTime<Utc>,
}

impl AlignmentRecord {
    /// Create an unreviewed record for a unit
    pub fn new(unit: RequirementUnit) -> Self {
        Self {
            unit,
            review_process: None,
            issues: None,
            updated_at: Utc::now(),
        }
    }
}

/// File-backed map from requirement-unit id to alignment record
#[derive(Debug)]
pub struct AlignmentStore {
    path: PathBuf,
    records: BTreeMap<String, AlignmentRecord>,
}

impl AlignmentStore {
    /// Load the store at `path`, or start empty when the file is missing
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), records = records.len(), "Loaded alignment store");
        Ok(Self { path, records })
    }

    /// The file this store reads and writes
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a record by unit id
    pub fn get(&self, id: &str) -> Option<&AlignmentRecord> {
        self.records.get(id)
    }

    /// Insert or overwrite a record, keyed by its unit id
    ///
    /// Stamps the record's `updated_at`.
    pub fn put(&mut self, mut record: AlignmentRecord) {
        record.updated_at = Utc::now();
        self.records.insert(record.unit.id.clone(), record);
    }

    /// Remove a record by unit id
    pub fn remove(&mut self, id: &str) -> Option<AlignmentRecord> {
        self.records.remove(id)
    }

    /// Iterate records in id order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AlignmentRecord)> {
        self.records.iter()
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Persist the store with an atomic overwrite
    pub fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.records)?;
        atomic::overwrite(&self.path, &contents)?;
        debug!(path = %self.path.display(), records = self.records.len(), "Saved alignment store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use traceline_core::{RequirementUnit, UnitContent, UnitKind};

    fn unit(id: &str) -> RequirementUnit {
        RequirementUnit::new(
            id,
            UnitKind::Text,
            UnitContent::Text("body".to_string()),
            vec!["Title".to_string()],
        )
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = AlignmentStore::load(dir.path().join("alignments.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alignments.json");

        let mut store = AlignmentStore::load(&path).unwrap();
        store.put(AlignmentRecord::new(unit("text_0")));
        store.put(AlignmentRecord::new(unit("text_1")));
        store.save().unwrap();

        let reloaded = AlignmentStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("text_0").unwrap().unit.id, "text_0");
        assert!(reloaded.get("text_0").unwrap().review_process.is_none());
    }

    #[test]
    fn test_put_overwrites_existing_record() {
        let dir = TempDir::new().unwrap();
        let mut store = AlignmentStore::load(dir.path().join("alignments.json")).unwrap();

        store.put(AlignmentRecord::new(unit("text_0")));
        let mut updated = AlignmentRecord::new(unit("text_0"));
        updated.issues = Some("one issue".to_string());
        store.put(updated);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("text_0").unwrap().issues.as_deref(), Some("one issue"));
    }

    #[test]
    fn test_records_serialize_in_id_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alignments.json");

        let mut store = AlignmentStore::load(&path).unwrap();
        store.put(AlignmentRecord::new(unit("text_2")));
        store.put(AlignmentRecord::new(unit("text_0")));
        store.save().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.find("text_0").unwrap() < contents.find("text_2").unwrap());
    }

    #[test]
    fn test_remove() {
        let dir = TempDir::new().unwrap();
        let mut store = AlignmentStore::load(dir.path().join("alignments.json")).unwrap();

        store.put(AlignmentRecord::new(unit("text_0")));
        assert!(store.remove("text_0").is_some());
        assert!(store.remove("text_0").is_none());
        assert!(store.is_empty());
    }
}
