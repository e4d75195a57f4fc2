//! Field/schema discovery
//!
//! Unlike the other rules this one never short-circuits: the field set is the
//! union of every sub-scan, because no particular syntax can be assumed.
//!
//! - brace spans parsed as JSON objects (top-level keys)
//! - brace spans that are not JSON, scanned for `key:` tokens
//! - TypeScript `interface` member declarations
//! - object destructuring patterns (`const { a, b } = ...`)

use super::patterns;
use crate::output::NoiseField;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Largest brace-delimited span (in bytes) considered for field discovery
pub const DEFAULT_MAX_SPAN_LEN: usize = 4096;

pub fn discover_fields(text: &str, max_span_len: usize) -> BTreeSet<String> {
    let mut candidates = Vec::new();

    for span in brace_spans(text, max_span_len) {
        match json_object_keys(span) {
            Some(keys) => candidates.extend(keys),
            None => candidates.extend(object_keys(span)),
        }
    }
    candidates.extend(interface_members(text));
    candidates.extend(destructured_names(text));

    candidates
        .into_iter()
        .filter(|name| !name.is_empty() && !NoiseField::is_noise(name))
        .collect()
}

/// Every balanced `{...}` span no longer than `max_len` bytes, outermost first
///
/// Braces are paired in a single pass with a stack of open positions, so
/// unclosed input costs linear time regardless of the bound.
pub fn brace_spans(text: &str, max_len: usize) -> Vec<&str> {
    let mut open = Vec::new();
    let mut pairs = Vec::new();

    for (index, byte) in text.bytes().enumerate() {
        match byte {
            b'{' => open.push(index),
            b'}' => {
                if let Some(start) = open.pop() {
                    if index - start < max_len {
                        pairs.push((start, index));
                    }
                }
            }
            _ => {}
        }
    }

    pairs.sort_unstable();
    pairs
        .into_iter()
        .map(|(start, end)| &text[start..=end])
        .collect()
}

/// Top-level keys of `span` when it is a well-formed JSON object
pub fn json_object_keys(span: &str) -> Option<Vec<String>> {
    let object: Map<String, Value> = serde_json::from_str(span).ok()?;
    Some(object.into_iter().map(|(key, _)| key).collect())
}

/// Identifiers written as `key:` / `"key":`, skipping URL schemes and `::` paths
pub fn object_keys(span: &str) -> Vec<String> {
    patterns::object_key()
        .captures_iter(span)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let rest = &span[whole.end()..];
            if rest.starts_with("//") || rest.starts_with(':') {
                return None;
            }
            cap.get(1).map(|key| key.as_str().to_string())
        })
        .collect()
}

/// Member names of `interface Name { ... }` declarations
pub fn interface_members(text: &str) -> Vec<String> {
    let member = patterns::interface_member();

    patterns::interface_block()
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .flat_map(|body| body.as_str().split([';', ',', '\n']))
        .filter_map(|declaration| {
            let cap = member.captures(declaration.trim())?;
            cap.get(1).map(|name| name.as_str().to_string())
        })
        .collect()
}

/// Property names bound by `const|let|var { ... } =` patterns
pub fn destructured_names(text: &str) -> Vec<String> {
    let ident = patterns::leading_identifier();

    patterns::destructuring()
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .flat_map(|body| body.as_str().split(','))
        .map(str::trim)
        .filter(|binding| !binding.starts_with("..."))
        .filter_map(|binding| {
            ident
                .captures(binding)
                .and_then(|cap| cap.get(1))
                .map(|name| name.as_str().to_string())
        })
        .collect()
}
