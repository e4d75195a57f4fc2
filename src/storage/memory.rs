use super::{append_to, remove_from, ApiStore, HistoryEntry, StorageError, StoredApi};
use crate::output::ApiDescriptor;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    apis: Mutex<Vec<StoredApi>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn apis(&self) -> MutexGuard<'_, Vec<StoredApi>> {
        self.apis.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ApiStore for MemoryStore {
    fn create(&self, descriptor: ApiDescriptor) -> Result<StoredApi, StorageError> {
        let api = StoredApi::new(descriptor);
        self.apis().push(api.clone());
        info!(id = %api.id, name = %api.descriptor.name, "API stored");
        Ok(api)
    }

    fn list(&self) -> Result<Vec<StoredApi>, StorageError> {
        Ok(self.apis().clone())
    }

    fn append_history(&self, id: &str, entry: HistoryEntry) -> Result<StoredApi, StorageError> {
        append_to(&mut self.apis(), id, entry)
    }

    fn delete(&self, id: &str) -> Result<(), StorageError> {
        remove_from(&mut self.apis(), id)?;
        info!(id = %id, "API deleted");
        Ok(())
    }
}
