//! Durable key-value storage for the issued token.
//!
//! The browser binding uses `localStorage`; native callers persist a single
//! JSON object on disk. Stored values are credentials: never log them.

use crate::errors::BridgeError;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

#[cfg(not(target_arch = "wasm32"))]
use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
#[cfg(not(target_arch = "wasm32"))]
use tracing::debug;

#[cfg(not(target_arch = "wasm32"))]
const STORAGE_DIR: &str = "formbridge";
#[cfg(not(target_arch = "wasm32"))]
const STORAGE_FILE: &str = "storage.json";

/// A string key-value store that survives restarts.
pub trait DurableStorage {
    /// # Errors
    /// Returns `BridgeError::Storage` if the backing store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, BridgeError>;

    /// # Errors
    /// Returns `BridgeError::Storage` if the backing store cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), BridgeError>;

    /// Removes `key`; removing an absent key is not an error.
    ///
    /// # Errors
    /// Returns `BridgeError::Storage` if the backing store cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), BridgeError>;
}

/// Process-local storage, used by tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl DurableStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, BridgeError> {
        Ok(self
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), BridgeError> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), BridgeError> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// Storage persisted as one JSON object in a file.
///
/// Each write goes to a fresh temporary file in the same directory which is
/// then renamed over the target, so readers never observe a partially written
/// file. On unix the result is always mode `0600`.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `formbridge/storage.json` under the platform data directory.
    ///
    /// # Errors
    /// Returns `BridgeError::Config` if the platform has no data directory.
    pub fn default_path() -> Result<PathBuf, BridgeError> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| BridgeError::Config("could not find a data directory".to_string()))?;
        Ok(data_dir.join(STORAGE_DIR).join(STORAGE_FILE))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, BridgeError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => {
                return Err(BridgeError::Storage(format!(
                    "failed to read {}: {err}",
                    self.path.display()
                )))
            }
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw).map_err(|err| {
            BridgeError::Storage(format!("corrupt storage file {}: {err}", self.path.display()))
        })
    }

    fn persist(&self, items: &BTreeMap<String, String>) -> Result<(), BridgeError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|err| {
            BridgeError::Storage(format!("failed to create {}: {err}", parent.display()))
        })?;

        let payload = serde_json::to_vec_pretty(items)
            .map_err(|err| BridgeError::Storage(format!("failed to encode storage: {err}")))?;

        let write_error =
            |err: std::io::Error| BridgeError::Storage(format!("failed to write storage: {err}"));

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_error)?;
        restrict_permissions(tmp.as_file()).map_err(write_error)?;
        tmp.write_all(&payload).map_err(write_error)?;
        tmp.as_file().sync_all().map_err(write_error)?;
        tmp.persist(&self.path).map_err(|err| {
            BridgeError::Storage(format!(
                "failed to replace {}: {}",
                self.path.display(),
                err.error
            ))
        })?;

        debug!(path = %self.path.display(), "storage persisted");
        Ok(())
    }
}

#[cfg(all(unix, not(target_arch = "wasm32")))]
fn restrict_permissions(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(fs::Permissions::from_mode(0o600))
}

#[cfg(all(not(unix), not(target_arch = "wasm32")))]
fn restrict_permissions(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
impl DurableStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, BridgeError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), BridgeError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());
        self.persist(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), BridgeError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.load()?;
        if items.remove(key).is_some() {
            self.persist(&items)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty());
        storage.set_item("jwt", "abc123").unwrap();
        assert_eq!(storage.get_item("jwt").unwrap().as_deref(), Some("abc123"));
        storage.remove_item("jwt").unwrap();
        assert_eq!(storage.get_item("jwt").unwrap(), None);
        storage.remove_item("jwt").unwrap();
    }

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        FileStorage::new(&path).set_item("jwt", "abc123").unwrap();
        FileStorage::new(&path).set_item("theme", "dark").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get_item("jwt").unwrap().as_deref(), Some("abc123"));
        assert_eq!(reopened.get_item("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("absent.json"));
        assert_eq!(storage.get_item("jwt").unwrap(), None);
        storage.remove_item("jwt").unwrap();
        assert!(!storage.path().exists());
    }

    #[test]
    fn file_storage_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(storage.get_item("jwt"), Err(BridgeError::Storage(_))));
        assert!(matches!(
            storage.set_item("jwt", "abc123"),
            Err(BridgeError::Storage(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn file_storage_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        FileStorage::new(&path).set_item("jwt", "abc123").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn file_storage_tightens_loose_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let stale = path.with_extension("json.tmp");
        fs::write(&path, "{}").unwrap();
        fs::write(&stale, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        fs::set_permissions(&stale, fs::Permissions::from_mode(0o644)).unwrap();

        FileStorage::new(&path).set_item("jwt", "abc123").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(
            FileStorage::new(&path).get_item("jwt").unwrap().as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn file_storage_leaves_no_temporary_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let storage = FileStorage::new(&path);
        storage.set_item("jwt", "abc123").unwrap();
        storage.remove_item("jwt").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("storage.json")]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn default_path_follows_data_dir() {
        temp_env::with_vars(
            [
                ("XDG_DATA_HOME", Some("/data")),
                ("HOME", Some("/home/alice")),
            ],
            || {
                assert_eq!(
                    FileStorage::default_path().unwrap(),
                    PathBuf::from("/data/formbridge/storage.json")
                );
            },
        );
        temp_env::with_vars(
            [("XDG_DATA_HOME", None), ("HOME", Some("/home/alice"))],
            || {
                assert_eq!(
                    FileStorage::default_path().unwrap(),
                    PathBuf::from("/home/alice/.local/share/formbridge/storage.json")
                );
            },
        );
    }
}
