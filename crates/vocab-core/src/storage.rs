//! Key-value persistence backends.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key holding the JSON array of sections.
pub const SECTIONS_KEY: &str = "sections";
/// Key holding the theme as a JSON string.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A persistent string store addressed by key.
pub trait StorageAdapter {
    /// Backend name, for diagnostics.
    fn name(&self) -> &str;

    /// Read a value; `Ok(None)` when the key was never written.
    fn load(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn save(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

/// In-process storage, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    fail_saves: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose writes always fail.
    pub fn failing() -> Self {
        Self {
            entries: HashMap::new(),
            fail_saves: true,
        }
    }

    /// Pre-populate a key.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl StorageAdapter for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if self.fail_saves {
            return Err(StorageError::Backend("writes are disabled".to_string()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StorageAdapter for FileStorage {
    fn name(&self) -> &str {
        "file"
    }

    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> StorageResult<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.load("k").unwrap(), None);
        storage.save("k", "v").unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("v"));
        storage.save("k", "w").unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("w"));
    }

    #[test]
    fn test_memory_failing() {
        let mut storage = MemoryStorage::failing().with_entry("k", "v");
        assert!(storage.save("k", "x").is_err());
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_file_storage() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested");
        let mut storage = FileStorage::new(&dir);

        assert_eq!(storage.load(SECTIONS_KEY).unwrap(), None);
        storage.save(SECTIONS_KEY, "[]").unwrap();
        storage.save(THEME_KEY, "\"dark\"").unwrap();

        assert!(dir.join("sections.json").exists());
        let reopened = FileStorage::new(&dir);
        assert_eq!(reopened.load(SECTIONS_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.load(THEME_KEY).unwrap().as_deref(), Some("\"dark\""));
    }
}
