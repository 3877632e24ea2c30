//! Key-value backends for the persisted workout log.

use crate::dlog;
use crate::error::{Error, Result};
use crate::surface::Storage;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A JSON object on disk mapping keys to string values. Every `set` rewrites
/// the whole file through a temp file in the same directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&text).map_err(|e| Error::StorageFile {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, entries)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_entries() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), err = %e, "storage file unreadable");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // Only a file that reads but does not parse is replaced; anything the
        // OS refuses to read is left alone.
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(e @ Error::StorageFile { .. }) => {
                tracing::warn!(path = %self.path.display(), err = %e, "overwriting unparsable storage file");
                BTreeMap::new()
            }
            Err(e) => {
                return Err(Error::StorageWrite {
                    key: key.to_string(),
                    reason: e.to_string(),
                });
            }
        };
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).map_err(|e| Error::StorageWrite {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        dlog!("storage write path={} key={key} bytes={}", self.path.display(), value.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_round_trips_and_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let mut storage = FileStorage::new(&path);

        assert_eq!(storage.get("workouts"), None);
        storage.set("workouts", "[]").unwrap();
        storage.set("theme", "dark").unwrap();
        storage.set("workouts", "[1]").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("workouts").as_deref(), Some("[1]"));
        assert_eq!(reopened.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn corrupt_file_reads_as_absent_and_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "garbage").unwrap();

        let mut storage = FileStorage::new(&path);
        assert_eq!(storage.get("workouts"), None);
        storage.set("workouts", "[]").unwrap();
        assert_eq!(storage.get("workouts").as_deref(), Some("[]"));
    }

    #[test]
    fn unreadable_path_fails_the_write_and_leaves_it_untouched() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("keep.txt"), "x").unwrap();

        let mut storage = FileStorage::new(dir.path());
        let err = storage.set("workouts", "[]").unwrap_err();
        assert!(matches!(err, Error::StorageWrite { ref key, .. } if key == "workouts"));

        assert!(dir.path().is_dir());
        assert_eq!(fs::read_to_string(dir.path().join("keep.txt")).unwrap(), "x");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
