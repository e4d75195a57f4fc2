//! Editable descriptor form
//!
//! An `ApiDraft` is what a user hands back after reviewing an extracted
//! descriptor: every field is raw text, so it may contain anything until the
//! validator has accepted it.

use crate::output::ApiDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Header map either already structured or typed by the user as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderInput {
    Parsed(BTreeMap<String, String>),
    /// A flat JSON object, e.g. `{"Accept": "application/json"}`
    Raw(String),
}

impl Default for HeaderInput {
    fn default() -> Self {
        HeaderInput::Parsed(BTreeMap::new())
    }
}

impl HeaderInput {
    /// Resolves the input to a header map with trimmed keys and values
    pub fn resolve(&self) -> Result<BTreeMap<String, String>, String> {
        let headers = match self {
            HeaderInput::Parsed(map) => map.clone(),
            HeaderInput::Raw(text) => parse_raw_headers(text)?,
        };

        let mut resolved = BTreeMap::new();
        for (key, value) in headers {
            let key = key.trim();
            if !is_header_name(key) {
                return Err(format!("'{}' is not a valid header name", key));
            }
            resolved.insert(key.to_string(), value.trim().to_string());
        }
        Ok(resolved)
    }
}

/// Parses user-entered header text; blank text means no headers
pub fn parse_raw_headers(text: &str) -> Result<BTreeMap<String, String>, String> {
    if text.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    let object: Map<String, Value> = serde_json::from_str(text)
        .map_err(|e| format!("expected a JSON object of string values ({})", e))?;

    object
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(s) => Ok((key, s)),
            other => Err(format!(
                "value of '{}' must be a string, got {}",
                key,
                json_kind(&other)
            )),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn is_header_name(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDraft {
    pub name: String,
    pub description: String,
    pub endpoint: String,
    pub method: String,
    pub auth_key: String,
    pub headers: HeaderInput,
    pub fields: Vec<String>,
    pub sample_code: String,
}

impl From<ApiDescriptor> for ApiDraft {
    fn from(descriptor: ApiDescriptor) -> Self {
        Self {
            name: descriptor.name,
            description: descriptor.description,
            endpoint: descriptor.endpoint,
            method: descriptor.method.to_string(),
            auth_key: descriptor.auth_key,
            headers: HeaderInput::Parsed(descriptor.headers),
            fields: descriptor.fields.into_iter().collect(),
            sample_code: descriptor.sample_code,
        }
    }
}
