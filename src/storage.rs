use std::{
    collections::HashMap,
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use log::{debug, error, trace};
use tempfile::NamedTempFile;

use crate::{NotesError, Result};

/// A named-slot key-value store holding string values.
///
/// Each key is one independent slot; `set_item` replaces the whole value.
pub trait KeyValueStorage {
    /// Retrieve the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the slot does not exist.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace the value stored under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove the slot. Succeeds even if it did not exist.
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// Stores every slot as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a storage rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the slot files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Helper method to get the file path for a slot
    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.contains("..") {
            return Err(NotesError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key)?;
        trace!("Reading slot {} from {}", key, path.display());

        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Slot file does not exist: {}", path.display());
                Ok(None)
            }
            Err(e) => {
                error!("Failed to read slot file {}: {}", path.display(), e);
                Err(NotesError::Io(e))
            }
        }
    }

    /// Writes through a temporary file in the same directory and renames it
    /// over the slot, so readers never observe a partial value.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key)?;

        if !self.dir.exists() {
            debug!("Creating storage directory: {}", self.dir.display());
            fs::create_dir_all(&self.dir).map_err(|e| {
                error!("Failed to create directory {}: {}", self.dir.display(), e);
                NotesError::DirectoryError {
                    path: self.dir.clone(),
                }
            })?;
        }

        let mut temp_file = NamedTempFile::new_in(&self.dir).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            NotesError::Io(e)
        })?;

        trace!("Writing {} bytes to temporary file", value.len());
        temp_file.write_all(value.as_bytes())?;
        temp_file.flush()?;

        debug!("Performing atomic move of temporary file to {}", path.display());
        temp_file.persist(&path).map_err(|e| {
            error!("Failed to persist file {}: {}", path.display(), e.error);
            NotesError::Io(e.error)
        })?;

        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed slot file {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(NotesError::Io(e)),
        }
    }
}

/// Volatile storage, useful for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.slots.remove(key);
        Ok(())
    }
}
