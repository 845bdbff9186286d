//=========================================================================
// Snapshot
//=========================================================================
//
// The persisted set of part records and the file it lives in.
//
// On disk the snapshot is a pretty-printed JSON array:
//
// ```text
// [
//   { "key": "v8_engine_1", "value": "True|0|0.73|0|0|0" },
//   { "key": "water_tank_2", "value": "False|6||0.25|-0.1|0.5" }
// ]
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::error::PersistenceError;

//=== Snapshot ============================================================

/// One persisted record: instance identity → encoded part record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub key: String,
    pub value: String,
}

/// Ordered key → record mapping.
///
/// Insertion order is kept so the file reads in spawn order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: Vec<SnapshotEntry>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the record stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.value = value,
            None => self.entries.push(SnapshotEntry { key, value }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SnapshotEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Splits an entry key into `(registry key, instance id)` at the last `_`.
///
/// Registry keys may contain underscores themselves, the id never does.
/// Returns `None` if there is no `_` or the suffix is not an id.
pub fn split_entry_key(key: &str) -> Option<(&str, u64)> {
    let (name, id) = key.rsplit_once('_')?;
    Some((name, id.parse().ok()?))
}

//=== SnapshotStore =======================================================

/// The snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: impl AsRef<Path>, file_name: &str) -> Self {
        Self::new(dir.as_ref().join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Overwrites the file with `snapshot`, creating the directory if needed.
    pub fn write(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, json)?;

        info!(target: "persistence", "Wrote {} records to {}", snapshot.len(), self.path.display());
        Ok(())
    }

    /// Reads the file. A missing file reads as `None`.
    pub fn read(&self) -> Result<Option<Snapshot>, PersistenceError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(target: "persistence", "No snapshot at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot: Snapshot = serde_json::from_str(&json)?;
        debug!(target: "persistence", "Read {} records from {}", snapshot.len(), self.path.display());
        Ok(Some(snapshot))
    }

    /// Removes the file. Returns whether there was one.
    pub fn delete(&self) -> Result<bool, PersistenceError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(target: "persistence", "Deleted {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
