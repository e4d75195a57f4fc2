//! apiscope - heuristic API descriptor extraction
//!
//! This library reads a pasted snippet of HTTP client code (fetch, axios,
//! requests, curl and similar) and recovers a structured description of the
//! API it calls: endpoint, verb, auth key, headers and candidate payload
//! fields. Descriptors can then be validated, stored and test-called.
//!
//! # Core Concepts
//!
//! - **Extraction**: ordered cascades of regex matchers over the raw text.
//!   Extraction never fails; anything unrecognised falls back to a default.
//! - **Validation**: an ordered list of rules that turns a user-edited
//!   [`ApiDraft`] back into a normalized [`ApiDescriptor`].
//! - **Storage**: the [`ApiStore`] trait with in-memory and JSON-file
//!   implementations, keeping a capped call history per API.
//!
//! # Example Usage
//!
//! ```
//! use apiscope::{extract, validate, HttpMethod};
//!
//! let descriptor = extract(
//!     r#"fetch('https://api.example.com/v1/users', {method:'POST', headers:{api_key:"abc123"}})"#,
//! );
//! assert_eq!(descriptor.endpoint, "https://api.example.com/v1/users");
//! assert_eq!(descriptor.method, HttpMethod::Post);
//! assert_eq!(descriptor.name, "Users API");
//!
//! let accepted = validate(descriptor.clone()).unwrap();
//! assert_eq!(accepted, descriptor);
//! ```
//!
//! # Project Structure
//!
//! - [`extractors`]: endpoint, method, auth, header, field and name heuristics
//! - [`validation`]: validation rules and normalization
//! - [`storage`]: persisted APIs and their call history
//! - [`probe`]: live test calls
//! - [`access`]: secret masking for non-privileged viewers

pub mod access;
pub mod cli;
pub mod config;
pub mod extractors;
pub mod output;
pub mod probe;
pub mod storage;
pub mod util;
pub mod validation;

pub use access::{AccessControl, Viewer};
pub use config::{ApiscopeConfig, ConfigError};
pub use extractors::{extract, ApiExtractor};
pub use output::{ApiDescriptor, HttpMethod, NoiseField};
pub use probe::{ApiProbe, ProbeError};
pub use storage::{ApiStore, HistoryEntry, JsonFileStore, MemoryStore, StorageError, StoredApi};
pub use util::{init_logging, LoggingConfig};
pub use validation::{normalize, validate, ApiDraft, HeaderInput, ValidationError, Validator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
