//! Durable local cache for note content.
//!
//! Mirrors browser local storage: string values under string keys, scoped
//! to one origin. The link notepad keeps a single entry under
//! [`STORAGE_KEY`](crate::constants::STORAGE_KEY).

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::error::CacheError;

/// Key-value text cache.
pub trait LocalCache: Send + Sync {
    /// Read an entry, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Create or overwrite an entry.
    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Remove an entry. Removing a missing entry is not an error.
    fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// In-memory cache. Lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl LocalCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// File-backed cache: one file per key under a directory.
///
/// Writes go to a sibling temp file and are renamed into place, so a crash
/// mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Open a cache rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf, CacheError> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !valid {
            return Err(CacheError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid cache key: {key:?}"),
            )));
        }
        Ok(self.dir.join(format!("{key}.txt")))
    }
}

impl LocalCache for FileCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.entry_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => String::from_utf8(bytes).map(Some).map_err(|_| CacheError::NotText {
                key: key.to_string(),
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let path = self.entry_path(key)?;
        let tmp = path.with_extension("txt.tmp");
        fs::write(&tmp, value.as_bytes())?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        let path = self.entry_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(cache: &dyn LocalCache) {
        assert_eq!(cache.get("notepad_content").unwrap(), None);

        cache.set("notepad_content", "첫 메모 📝").unwrap();
        assert_eq!(
            cache.get("notepad_content").unwrap().as_deref(),
            Some("첫 메모 📝")
        );

        cache.set("notepad_content", "second").unwrap();
        assert_eq!(cache.get("notepad_content").unwrap().as_deref(), Some("second"));

        cache.remove("notepad_content").unwrap();
        assert_eq!(cache.get("notepad_content").unwrap(), None);

        // Removing twice is fine.
        cache.remove("notepad_content").unwrap();
    }

    #[test]
    fn test_memory_cache() {
        let cache = MemoryCache::new();
        exercise(&cache);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_file_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::open(dir.path().join("origin")).unwrap();
        exercise(&cache);
    }

    #[test]
    fn test_file_cache_persists_across_handles() {
        let dir = tempfile::tempdir().unwrap();
        FileCache::open(dir.path())
            .unwrap()
            .set("notepad_content", "kept")
            .unwrap();

        let reopened = FileCache::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get("notepad_content").unwrap().as_deref(),
            Some("kept")
        );
    }

    #[test]
    fn test_file_cache_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::open(dir.path()).unwrap();
        assert!(cache.set("../escape", "x").is_err());
        assert!(cache.get("").is_err());
    }

    #[test]
    fn test_file_cache_non_utf8_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::open(dir.path()).unwrap();
        std::fs::write(dir.path().join("bad.txt"), [0xff, 0xfe]).unwrap();
        assert!(matches!(cache.get("bad"), Err(CacheError::NotText { .. })));
    }
}
