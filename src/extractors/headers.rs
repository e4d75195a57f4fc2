//! Header map detection
//!
//! A `headers` assignment followed by a `{...}` or `[...]` block is the primary
//! source. When the snippet has no such block but is a curl command, its
//! `-H 'Name: value'` flags are used instead.

use super::patterns;
use std::collections::BTreeMap;
use tracing::debug;

type HeaderMatcher = fn(&str) -> Option<BTreeMap<String, String>>;

const MATCHERS: &[(&str, HeaderMatcher)] = &[
    ("headers-block", from_headers_block),
    ("curl-header-flags", from_curl_flags),
];

pub fn detect_headers(text: &str) -> BTreeMap<String, String> {
    for (rule, matcher) in MATCHERS {
        if let Some(headers) = matcher(text) {
            debug!(rule = *rule, count = headers.len(), "Headers detected");
            return headers;
        }
    }
    BTreeMap::new()
}

/// Parses the body of the first `headers: {...}` / `headers = [...]` block
pub fn from_headers_block(text: &str) -> Option<BTreeMap<String, String>> {
    let block = patterns::headers_block().captures(text)?.get(1)?.as_str();
    Some(parse_header_pairs(block))
}

/// Collects `-H` / `--header` flags of a curl command
pub fn from_curl_flags(text: &str) -> Option<BTreeMap<String, String>> {
    if !patterns::curl_command().is_match(text) {
        return None;
    }

    let headers: BTreeMap<String, String> = patterns::curl_header()
        .captures_iter(text)
        .filter_map(|cap| {
            let key = cap.get(1)?.as_str();
            let value = cap.get(2)?.as_str().trim();
            (!value.is_empty()).then(|| (key.to_string(), value.to_string()))
        })
        .collect();

    (!headers.is_empty()).then_some(headers)
}

/// Collects `key: value` / `key = value` pairs from the inside of a header block
pub fn parse_header_pairs(block: &str) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    for cap in patterns::header_pair().captures_iter(block) {
        let (Some(key), Some(value)) = (cap.get(1), cap.get(2)) else {
            continue;
        };
        let value = value.as_str().trim();
        if value.is_empty() {
            continue;
        }
        headers.insert(key.as_str().to_string(), value.to_string());
    }

    headers
}
