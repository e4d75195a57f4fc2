//! Single-file JSON store
//!
//! The whole record list lives in one pretty-printed JSON array. Every
//! mutation is a read-modify-write of that file, written to a sibling
//! temporary file first and renamed into place.

use super::{append_to, remove_from, ApiStore, HistoryEntry, StorageError, StoredApi};
use crate::output::ApiDescriptor;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens (lazily) the store at `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn load(&self) -> Result<Vec<StoredApi>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Store file missing, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, apis: &[StoredApi]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let content = serde_json::to_string_pretty(apis)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn update<T>(
        &self,
        mutate: impl FnOnce(&mut Vec<StoredApi>) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut apis = self.load()?;
        let result = mutate(&mut apis)?;
        self.save(&apis)?;
        Ok(result)
    }
}

impl ApiStore for JsonFileStore {
    fn create(&self, descriptor: ApiDescriptor) -> Result<StoredApi, StorageError> {
        let api = StoredApi::new(descriptor);
        self.update(|apis| {
            apis.push(api.clone());
            Ok(())
        })?;
        info!(id = %api.id, name = %api.descriptor.name, path = %self.path.display(), "API stored");
        Ok(api)
    }

    fn list(&self) -> Result<Vec<StoredApi>, StorageError> {
        self.load()
    }

    fn append_history(&self, id: &str, entry: HistoryEntry) -> Result<StoredApi, StorageError> {
        self.update(|apis| append_to(apis, id, entry))
    }

    fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.update(|apis| remove_from(apis, id))?;
        info!(id = %id, "API deleted");
        Ok(())
    }
}
