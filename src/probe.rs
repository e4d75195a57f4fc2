//! Live test calls against stored APIs
//!
//! The probe is the only asynchronous part of the crate. Each call is bounded
//! by a timeout and can additionally be abandoned through a caller-supplied
//! cancellation future. Whatever happens on the wire is folded into a
//! [`HistoryEntry`]; transport failures and timeouts become `error` entries
//! rather than errors.
//!
//! # Example
//!
//! ```no_run
//! use apiscope::probe::ApiProbe;
//! use apiscope::storage::{ApiStore, MemoryStore};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//! let api = store.create(apiscope::extract("curl https://api.example.com/health"))?;
//!
//! let probe = ApiProbe::new(Duration::from_secs(10))?;
//! let entry = probe.probe(&api).await;
//! store.append_history(&api.id, entry)?;
//! # Ok(())
//! # }
//! ```

use crate::output::{ApiDescriptor, HttpMethod};
use crate::storage::{HistoryEntry, StoredApi};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Header carrying the descriptor's auth key unless configured otherwise
pub const DEFAULT_AUTH_HEADER: &str = "api_key";

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid auth header name '{0}'")]
    InvalidAuthHeader(String),
}

pub struct ApiProbe {
    client: Client,
    timeout: Duration,
    auth_header: HeaderName,
}

impl ApiProbe {
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        Self::with_auth_header(timeout, DEFAULT_AUTH_HEADER)
    }

    pub fn with_auth_header(timeout: Duration, auth_header: &str) -> Result<Self, ProbeError> {
        let auth_header = HeaderName::from_bytes(auth_header.as_bytes())
            .map_err(|_| ProbeError::InvalidAuthHeader(auth_header.to_string()))?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            timeout,
            auth_header,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Descriptor headers, then the auth key, then `Content-Type: application/json`
    ///
    /// Later entries override earlier ones; headers that are not valid HTTP
    /// are skipped.
    pub fn request_headers(&self, descriptor: &ApiDescriptor) -> HeaderMap {
        let mut headers = HeaderMap::new();

        for (key, value) in &descriptor.headers {
            match (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %key, "Skipping header that is not valid HTTP"),
            }
        }

        if !descriptor.auth_key.is_empty() {
            match HeaderValue::from_str(&descriptor.auth_key) {
                Ok(value) => {
                    headers.insert(self.auth_header.clone(), value);
                }
                Err(_) => warn!("Auth key is not a valid header value, sending without it"),
            }
        }

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Calls the stored endpoint once and describes the outcome
    pub async fn probe(&self, api: &StoredApi) -> HistoryEntry {
        let descriptor = &api.descriptor;
        debug!(id = %api.id, method = %descriptor.method, endpoint = %descriptor.endpoint, "Probing API");

        let entry = match tokio::time::timeout(self.timeout, self.send(descriptor)).await {
            Ok(entry) => entry,
            Err(_) => HistoryEntry::failed(
                descriptor.method,
                &descriptor.endpoint,
                format!("Request timed out after {}s", self.timeout.as_secs_f64()),
            ),
        };

        info!(
            id = %api.id,
            status = ?entry.status,
            status_code = ?entry.status_code,
            "Probe finished"
        );
        entry
    }

    /// Like [`probe`](Self::probe), but gives up as soon as `cancel` completes
    ///
    /// Returns `None` when the call was cancelled; nothing should be recorded then.
    pub async fn probe_until<F>(&self, api: &StoredApi, cancel: F) -> Option<HistoryEntry>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            entry = self.probe(api) => Some(entry),
            _ = cancel => {
                warn!(id = %api.id, "Probe cancelled");
                None
            }
        }
    }

    async fn send(&self, descriptor: &ApiDescriptor) -> HistoryEntry {
        let request = self
            .client
            .request(to_reqwest_method(descriptor.method), &descriptor.endpoint)
            .headers(self.request_headers(descriptor));

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                return HistoryEntry::failed(descriptor.method, &descriptor.endpoint, e.to_string())
            }
        };

        let status_code = response.status().as_u16();
        let body = match response.text().await {
            Ok(text) => parse_body(&text),
            Err(e) => {
                warn!(error = %e, "Failed to read response body");
                None
            }
        };

        HistoryEntry::completed(descriptor.method, &descriptor.endpoint, status_code, body)
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Head => Method::HEAD,
        HttpMethod::Options => Method::OPTIONS,
    }
}

/// JSON bodies are kept structured, anything else as a string
fn parse_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}
