// Heuristic extraction of API descriptors from pasted code
//
// Extractors scan an arbitrary snippet (fetch/axios calls, curl commands,
// Python requests code, TypeScript interfaces, ...) and recover the endpoint,
// verb, credentials, headers and payload field names without executing or
// parsing it. Every matcher is a pure function over the whole input; a miss
// simply leaves the corresponding descriptor field at its default.

pub mod auth;
pub mod fields;
pub mod headers;
pub mod method;
pub mod name;
mod patterns;
pub mod url;

use crate::output::ApiDescriptor;
use tracing::debug;

pub use fields::DEFAULT_MAX_SPAN_LEN;

/// Description attached to descriptors whose endpoint was recovered
pub const DISCOVERED_DESCRIPTION: &str = "API endpoint discovered from code analysis";

/// Runs every extraction rule over a snippet and assembles the descriptor
#[derive(Debug, Clone)]
pub struct ApiExtractor {
    max_span_len: usize,
}

impl Default for ApiExtractor {
    fn default() -> Self {
        Self {
            max_span_len: DEFAULT_MAX_SPAN_LEN,
        }
    }
}

impl ApiExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds the size of brace-delimited spans considered during field discovery
    pub fn with_max_span_len(max_span_len: usize) -> Self {
        Self { max_span_len }
    }

    pub fn max_span_len(&self) -> usize {
        self.max_span_len
    }

    /// Extracts a best-effort descriptor. Never fails; absent signals stay empty.
    pub fn extract(&self, text: &str) -> ApiDescriptor {
        let endpoint = url::detect_url(text).unwrap_or_default();
        let method = method::detect_method(text);
        let auth_key = auth::detect_auth_key(text).unwrap_or_default();
        let headers = headers::detect_headers(text);
        let fields = fields::discover_fields(text, self.max_span_len);
        let name = name::derive_name(&endpoint);

        let description = if endpoint.is_empty() {
            String::new()
        } else {
            DISCOVERED_DESCRIPTION.to_string()
        };

        debug!(
            endpoint = %endpoint,
            method = %method,
            has_auth_key = !auth_key.is_empty(),
            headers = headers.len(),
            fields = fields.len(),
            "Extraction finished"
        );

        ApiDescriptor {
            name,
            description,
            endpoint,
            method,
            auth_key,
            headers,
            fields,
            sample_code: text.to_string(),
        }
    }
}

/// Extracts a descriptor using the default extractor settings
pub fn extract(text: &str) -> ApiDescriptor {
    ApiExtractor::default().extract(text)
}
