// Local store persisted as a single JSON object on disk.
//
// Responsibilities
// - Load the whole object when opened, serve reads from memory.
// - Rewrite the file on every set through a temp file and a rename, so a crash
//   leaves either the old or the new content behind.

use crate::shared::infrastructure::local_store::{LocalStore, LocalStoreError};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

pub struct JsonFileLocalStore {
    path: PathBuf,
    items: RwLock<BTreeMap<String, String>>,
}

impl JsonFileLocalStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LocalStoreError> {
        let path = path.into();
        let items = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| LocalStoreError::Corrupt(format!("{}: {e}", path.display())))?,
            Err(error) if error.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => return Err(error.into()),
        };
        Ok(Self {
            path,
            items: RwLock::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, items: &BTreeMap<String, String>) -> Result<(), LocalStoreError> {
        let content = serde_json::to_string_pretty(items)
            .map_err(|e| LocalStoreError::Corrupt(e.to_string()))?;
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, content)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl LocalStore for JsonFileLocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        let items = self
            .items
            .read()
            .map_err(|_| LocalStoreError::Unavailable("Local store lock poisoned".into()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        let mut items = self
            .items
            .write()
            .map_err(|_| LocalStoreError::Unavailable("Local store lock poisoned".into()))?;
        let previous = items.insert(key.to_string(), value.to_string());
        if let Err(error) = self.persist(&items) {
            // Keep memory and disk in agreement.
            match previous {
                Some(previous) => items.insert(key.to_string(), previous),
                None => items.remove(key),
            };
            return Err(error);
        }
        Ok(())
    }
}

#[cfg(test)]
mod json_file_local_store_tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn dir() -> TempDir {
        tempfile::tempdir().expect("tempdir failed")
    }

    #[rstest]
    fn it_should_start_empty_when_the_file_does_not_exist(dir: TempDir) {
        let store = JsonFileLocalStore::open(dir.path().join("history.json")).unwrap();
        assert_eq!(store.get_item("history.1.42").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[rstest]
    fn it_should_persist_values_across_reopen(dir: TempDir) {
        let path = dir.path().join("history.json");
        let store = JsonFileLocalStore::open(&path).unwrap();
        store.set_item("history.1.42", "1700000000").unwrap();
        store.set_item("history.1.43", "1700000100").unwrap();
        drop(store);

        let reopened = JsonFileLocalStore::open(&path).unwrap();
        assert_eq!(
            reopened.get_item("history.1.42").unwrap(),
            Some("1700000000".into())
        );
        assert_eq!(
            reopened.get_item("history.1.43").unwrap(),
            Some("1700000100".into())
        );
    }

    #[rstest]
    fn it_should_reject_a_corrupt_file(dir: TempDir) {
        let path = dir.path().join("history.json");
        fs::write(&path, "not-json").unwrap();
        let result = JsonFileLocalStore::open(&path);
        assert!(matches!(result, Err(LocalStoreError::Corrupt(_))));
    }

    #[rstest]
    fn it_should_roll_back_memory_when_the_write_fails(dir: TempDir) {
        let path = dir.path().join("missing-dir").join("history.json");
        let store = JsonFileLocalStore::open(&path).unwrap();
        let result = store.set_item("history.1.42", "1700000000");
        assert!(matches!(result, Err(LocalStoreError::Io(_))));
        assert_eq!(store.get_item("history.1.42").unwrap(), None);
    }
}
