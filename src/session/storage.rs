//! Session storage backends
//!
//! The store only needs the three `localStorage` calls, so every backend
//! exposes exactly those. Browser clients implement the trait over
//! `window.localStorage`; native clients use [`FileStorage`].

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors raised by a storage backend
#[derive(Error, Debug)]
pub enum SessionError {
    /// Filesystem operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend cannot be reached (no window, storage disabled, ...)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected the operation (quota exceeded, poisoned lock, ...)
    #[error("Storage error: {0}")]
    Backend(String),
}

/// Key/value persistence with `localStorage` semantics
pub trait SessionStorage {
    /// Read a value; a missing key is `Ok(None)`
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Write a value, replacing any previous one
    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Delete a value; deleting a missing key succeeds
    fn remove_item(&self, key: &str) -> Result<(), SessionError>;
}

impl<T: SessionStorage + ?Sized> SessionStorage for &T {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        (**self).remove_item(key)
    }
}

/// In-process storage. Clones share the same map, so a clone handed to a
/// second store behaves like the same browser profile after a reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value for a key, bypassing the trait
    pub fn peek(&self, key: &str) -> Option<String> {
        self.items.lock().ok().and_then(|items| items.get(key).cloned())
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        let items = self
            .items
            .lock()
            .map_err(|e| SessionError::Backend(e.to_string()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut items = self
            .items
            .lock()
            .map_err(|e| SessionError::Backend(e.to_string()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        let mut items = self
            .items
            .lock()
            .map_err(|e| SessionError::Backend(e.to_string()))?;
        items.remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory
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
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

impl SessionStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        std::fs::create_dir_all(&self.dir)?;

        // Write then rename so a crash never leaves a half-written session
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
