//! String-keyed persistence.
//!
//! The planner only needs a key-value store of strings. `FileStore` keeps the
//! whole map in a single JSON object on disk and rewrites it atomically on
//! every `set`.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, warn};

use crate::error::PlannerError;

/// A key-value store of strings.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, PlannerError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PlannerError>;
}

/// JSON-file backed store: `{ "key": "value", ... }`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store. A file that is not a JSON object of
    /// strings is moved aside to `<file>.<timestamp>.corrupt` and the store
    /// starts empty.
    pub fn open(path: &Path) -> Result<Self, PlannerError> {
        let entries = match fs::read_to_string(path) {
            Ok(buf) if buf.trim().is_empty() => BTreeMap::new(),
            Ok(buf) => match serde_json::from_str(&buf) {
                Ok(entries) => entries,
                Err(e) => {
                    let aside = corrupt_path(path);
                    warn!(
                        path = %path.display(),
                        aside = %aside.display(),
                        error = %e,
                        "store file is unreadable, moving it aside"
                    );
                    fs::rename(path, &aside)?;
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), keys = entries.len(), "opened store");
        Ok(FileStore {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Write the whole map using temp file + rename.
    fn flush(&self) -> Result<(), PlannerError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(&self.entries)?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PlannerError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PlannerError> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush() {
            // Keep memory in step with what is on disk.
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}

/// `<file>.<timestamp>.corrupt`, with a counter if that name is taken.
fn corrupt_path(path: &Path) -> PathBuf {
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "store.json".to_string());
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let mut aside = path.with_file_name(format!("{file}.{timestamp}.corrupt"));
    let mut n = 1;
    while aside.exists() {
        aside = path.with_file_name(format!("{file}.{timestamp}-{n}.corrupt"));
        n += 1;
    }
    aside
}

/// In-memory store with an optional write failure switch.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub entries: BTreeMap<String, String>,
    pub fail_writes: bool,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with(key: &str, value: &str) -> Self {
        let mut store = MemoryStore::default();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

#[cfg(test)]
impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PlannerError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PlannerError> {
        if self.fail_writes {
            return Err(std::io::Error::new(ErrorKind::PermissionDenied, "store is read-only").into());
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(&dir.path().join("store.json")).unwrap();
        assert_eq!(store.get("tasks").unwrap(), None);
    }

    #[test]
    fn test_set_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let mut store = FileStore::open(&path).unwrap();
        store.set("tasks", "[]").unwrap();
        store.set("other", "x").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("tasks").unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("x"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_failed_set_keeps_previous_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = FileStore::open(&path).unwrap();
        store.set("tasks", "[]").unwrap();

        // A directory where the temp file goes makes every flush fail.
        fs::create_dir(path.with_extension("json.tmp")).unwrap();
        assert!(store.set("tasks", "[1]").is_err());
        assert!(store.set("fresh", "x").is_err());

        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("fresh").unwrap(), None);
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("tasks").unwrap().as_deref(), Some("[]"));
    }

    fn corrupt_files(dir: &Path) -> Vec<String> {
        let mut found: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "corrupt"))
            .map(|p| fs::read_to_string(p).unwrap())
            .collect();
        found.sort();
        found
    }

    #[test]
    fn test_unreadable_file_is_moved_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json at all").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("tasks").unwrap(), None);
        assert!(!path.exists());
        assert_eq!(corrupt_files(dir.path()), vec!["not json at all"]);
    }

    #[test]
    fn test_second_corruption_keeps_first_copy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "first").unwrap();
        FileStore::open(&path).unwrap();
        fs::write(&path, "second").unwrap();
        FileStore::open(&path).unwrap();

        assert_eq!(corrupt_files(dir.path()), vec!["first", "second"]);
    }

    #[test]
    fn test_memory_store_write_failure() {
        let mut store = MemoryStore {
            fail_writes: true,
            ..MemoryStore::default()
        };
        assert!(store.set("tasks", "[]").is_err());
        assert_eq!(store.get("tasks").unwrap(), None);
    }
}
