//! Atomic whole-file overwrite

use std::fs;
use std::path::Path;

use crate::error::Result;

/// Write `contents` to `path` through a temp file in the same directory
///
/// The rename publishes the file in one step: a reader sees either the old
/// contents or the new, never a partial write.
pub(crate) fn overwrite(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_overwrite_replaces_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");

        overwrite(&path, "first").unwrap();
        overwrite(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_overwrite_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");

        overwrite(&path, "x").unwrap();
        assert!(!dir.path().join("data.tmp").exists());
    }

    #[test]
    fn test_overwrite_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("data.json");

        overwrite(&path, "x").unwrap();
        assert!(path.exists());
    }
}
