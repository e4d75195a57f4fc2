//! Persistence of accepted API descriptors and their call history
//!
//! The `ApiStore` trait is the seam between the extraction core and whatever
//! keeps records around. Two implementations ship with the crate:
//!
//! - [`MemoryStore`]: process-local, used by tests and embedders
//! - [`JsonFileStore`]: a single JSON document on disk, used by the CLI
//!
//! Stores assign identity (UUID v4), timestamps and an empty history when a
//! descriptor is created. History is kept most-recent-first and capped at
//! [`HISTORY_LIMIT`] entries.

pub mod json;
pub mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use crate::output::{ApiDescriptor, HttpMethod};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Maximum number of history entries retained per API
pub const HISTORY_LIMIT: usize = 20;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("API not found: {0}")]
    NotFound(String),

    #[error("Failed to access store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store contents are not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Success,
    Error,
}

/// One recorded test call against a stored API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub method: HttpMethod,
    pub endpoint: String,
    pub status: CallStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HistoryEntry {
    /// Entry for a call that produced an HTTP response
    pub fn completed(
        method: HttpMethod,
        endpoint: impl Into<String>,
        status_code: u16,
        response: Option<serde_json::Value>,
    ) -> Self {
        let status = if (200..300).contains(&status_code) {
            CallStatus::Success
        } else {
            CallStatus::Error
        };

        Self {
            timestamp: Utc::now(),
            method,
            endpoint: endpoint.into(),
            status,
            status_code: Some(status_code),
            response,
            error: None,
        }
    }

    /// Entry for a call that never produced a response
    pub fn failed(method: HttpMethod, endpoint: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            method,
            endpoint: endpoint.into(),
            status: CallStatus::Error,
            status_code: None,
            response: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == CallStatus::Success
    }
}

/// A descriptor accepted into storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredApi {
    pub id: String,
    #[serde(flatten)]
    pub descriptor: ApiDescriptor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub status: ApiStatus,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl StoredApi {
    pub fn new(descriptor: ApiDescriptor) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            descriptor,
            created_at: now,
            updated_at: now,
            status: ApiStatus::Active,
            history: Vec::new(),
        }
    }

    /// Prepends `entry`, drops anything beyond [`HISTORY_LIMIT`] and bumps `updated_at`
    pub fn record(&mut self, entry: HistoryEntry) {
        self.history.insert(0, entry);
        self.history.truncate(HISTORY_LIMIT);
        self.updated_at = Utc::now();
    }

    /// Case-insensitive substring match over name, description, endpoint and method
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        let d = &self.descriptor;
        [d.name.as_str(), d.description.as_str(), d.endpoint.as_str(), d.method.as_str()]
            .iter()
            .any(|text| text.to_lowercase().contains(&term))
    }
}

/// Dashboard counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreStats {
    pub total: usize,
    pub active: usize,
    pub calls: usize,
}

pub trait ApiStore: Send + Sync {
    /// Persists a new record for `descriptor` and returns it
    fn create(&self, descriptor: ApiDescriptor) -> Result<StoredApi, StorageError>;

    /// All records in creation order
    fn list(&self) -> Result<Vec<StoredApi>, StorageError>;

    fn append_history(&self, id: &str, entry: HistoryEntry) -> Result<StoredApi, StorageError>;

    fn delete(&self, id: &str) -> Result<(), StorageError>;

    fn get(&self, id: &str) -> Result<StoredApi, StorageError> {
        self.list()?
            .into_iter()
            .find(|api| api.id == id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    fn search(&self, term: &str) -> Result<Vec<StoredApi>, StorageError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|api| api.matches(term))
            .collect())
    }

    fn stats(&self) -> Result<StoreStats, StorageError> {
        let apis = self.list()?;
        Ok(StoreStats {
            total: apis.len(),
            active: apis.iter().filter(|a| a.status == ApiStatus::Active).count(),
            calls: apis.iter().map(|a| a.history.len()).sum(),
        })
    }
}

/// Applies a history append to an in-memory record list
pub(crate) fn append_to(
    apis: &mut [StoredApi],
    id: &str,
    entry: HistoryEntry,
) -> Result<StoredApi, StorageError> {
    let api = apis
        .iter_mut()
        .find(|api| api.id == id)
        .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
    api.record(entry);
    Ok(api.clone())
}

/// Removes the record with `id` from an in-memory record list
pub(crate) fn remove_from(apis: &mut Vec<StoredApi>, id: &str) -> Result<(), StorageError> {
    let before = apis.len();
    apis.retain(|api| api.id != id);
    if apis.len() == before {
        return Err(StorageError::NotFound(id.to_string()));
    }
    Ok(())
}
