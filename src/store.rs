//! Host key-value persistence.
//!
//! The revision store only needs whole-value reads and writes per key. Each
//! [`OptionStore::set`] replaces one aggregate atomically; there is no
//! multi-key transaction.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{Error, Result};

/// A persistent map from option names to JSON values.
pub trait OptionStore {
    /// Reads `key`, `None` if it was never written or has been deleted.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replaces the value of `key`.
    fn set(&mut self, key: &str, value: Value) -> Result<()>;

    /// Removes `key`. Deleting a missing key succeeds.
    fn delete(&mut self, key: &str) -> Result<()>;
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-process store, used by tests and the live preview.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl OptionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

// ============================================================================
// JsonFileStore
// ============================================================================

/// One pretty-printed `<key>.json` file per option in a directory.
///
/// Writes go to `<key>.json.tmp` first and are renamed over the target, so a
/// reader never observes a half-written value.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens (and creates if needed) the store directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| Error::storage(dir.display().to_string(), e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(Error::storage(key, "option names may only contain [A-Za-z0-9_-]"));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl OptionStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::storage(key, e)),
        };
        let value = serde_json::from_str(&text).map_err(|e| Error::storage(key, e))?;
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let path = self.path_for(key)?;
        let temp = path.with_extension("json.tmp");
        let text = serde_json::to_string_pretty(&value)?;

        fs::write(&temp, text).map_err(|e| Error::storage(key, e))?;
        fs::rename(&temp, &path).map_err(|e| Error::storage(key, e))?;
        tracing::trace!(key, path = %path.display(), "option written");
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::storage(key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn memory_store_basics() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("fsm_status").unwrap(), None);

        store.set("fsm_status", json!("draft")).unwrap();
        assert_eq!(store.get("fsm_status").unwrap(), Some(json!("draft")));

        store.delete("fsm_status").unwrap();
        store.delete("fsm_status").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::open(dir.path().join("options")).unwrap();
        store.set("fsm_history", json!([{"id": "a"}])).unwrap();

        let reopened = JsonFileStore::open(dir.path().join("options")).unwrap();
        assert_eq!(reopened.get("fsm_history").unwrap(), Some(json!([{"id": "a"}])));
        assert_eq!(reopened.get("fsm_items").unwrap(), None);
    }

    #[test]
    fn file_store_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::open(dir.path()).unwrap();
        store.set("fsm_has_draft", json!(true)).unwrap();
        store.set("fsm_has_draft", json!(false)).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["fsm_has_draft.json".to_string()]);
        assert_eq!(store.get("fsm_has_draft").unwrap(), Some(json!(false)));
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.set("../escape", json!(1)),
            Err(Error::Storage { .. })
        ));
        assert!(store.get("").is_err());
    }

    #[test]
    fn file_store_delete() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::open(dir.path()).unwrap();
        store.set("fsm_settings_draft", json!({})).unwrap();
        store.delete("fsm_settings_draft").unwrap();
        store.delete("fsm_settings_draft").unwrap();
        assert_eq!(store.get("fsm_settings_draft").unwrap(), None);
    }
}
