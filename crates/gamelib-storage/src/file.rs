//! File-backed store: one file per key inside a data directory

use crate::{KeyValueStore, StorageError, validate_key};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const VALUE_EXTENSION: &str = "json";

/// Durable key-value store rooted at a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();

        if root.exists() && !root.is_dir() {
            return Err(StorageError::NotADirectory(root));
        }

        fs::create_dir_all(&root)?;
        tracing::debug!("Key-value store opened at {}", root.display());

        Ok(Self { root })
    }

    /// Data directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.{}", key, VALUE_EXTENSION)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension(format!("{}.tmp", VALUE_EXTENSION));

        // Write then rename so readers never see a half-written blob
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        tracing::trace!("Stored {} bytes under {}", value.len(), key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("data").join("gamelib");

        let store = FileStore::open(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(store.root(), root.as_path());
    }

    #[test]
    fn test_open_rejects_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("not-a-dir");
        fs::write(&file, b"x").unwrap();

        assert!(matches!(
            FileStore::open(&file),
            Err(StorageError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_set_get_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();

        assert_eq!(store.get("gamelib-library").unwrap(), None);

        store.set("gamelib-library", "{\"a\":1}").unwrap();
        store.set("gamelib-library", "{}").unwrap();
        assert_eq!(store.get("gamelib-library").unwrap(), Some("{}".to_string()));

        let path = store.path_for("gamelib-library").unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        FileStore::open(temp_dir.path())
            .unwrap()
            .set("recentSearches", "[\"halo\"]")
            .unwrap();

        let reopened = FileStore::open(temp_dir.path()).unwrap();
        assert_eq!(
            reopened.get("recentSearches").unwrap().as_deref(),
            Some("[\"halo\"]")
        );
    }

    #[test]
    fn test_remove_absent_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();

        store.remove("missing").unwrap();
        store.set("present", "1").unwrap();
        store.remove("present").unwrap();
        assert!(!store.contains("present").unwrap());
    }

    #[test]
    fn test_key_cannot_escape_root() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();

        assert!(matches!(
            store.set("../outside", "x"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
