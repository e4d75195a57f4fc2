//! API descriptor schema
//!
//! This module defines the `ApiDescriptor` value object produced by the
//! extractors and accepted by the validator, together with the closed sets it
//! relies on: the HTTP verbs (`HttpMethod`) and the denylisted noise field
//! names (`NoiseField`).

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// HTTP verbs a descriptor may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the supported verbs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown HTTP method '{}'", self.0)
    }
}

impl std::error::Error for UnknownMethod {}

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    /// Parses a verb case-insensitively, ignoring surrounding whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        HttpMethod::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

/// Generic field names that carry no schema signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseField {
    Id,
    Data,
    Result,
    Response,
}

impl NoiseField {
    pub const ALL: [NoiseField; 4] = [
        NoiseField::Id,
        NoiseField::Data,
        NoiseField::Result,
        NoiseField::Response,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NoiseField::Id => "id",
            NoiseField::Data => "data",
            NoiseField::Result => "result",
            NoiseField::Response => "response",
        }
    }

    /// Returns the denylist entry matching `name`, compared case-insensitively
    pub fn lookup(name: &str) -> Option<NoiseField> {
        NoiseField::ALL
            .iter()
            .copied()
            .find(|n| n.as_str().eq_ignore_ascii_case(name))
    }

    pub fn is_noise(name: &str) -> bool {
        Self::lookup(name).is_some()
    }
}

/// Structured summary of an HTTP API recovered from a code snippet
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDescriptor {
    /// Human label, e.g. "Users API"
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub description: String,
    /// Best-guess absolute URL, empty when none was found
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub endpoint: String,
    #[serde(default)]
    pub method: HttpMethod,
    /// Best-guess API key or bearer value, never checked for validity
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub auth_key: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub headers: BTreeMap<String, String>,
    /// Candidate payload field names
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub fields: BTreeSet<String>,
    /// The pasted snippet this descriptor was derived from
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub sample_code: String,
}

impl ApiDescriptor {
    /// The descriptor returned when nothing in the input could be recognised
    pub fn empty(sample_code: impl Into<String>) -> Self {
        Self {
            name: "API".to_string(),
            sample_code: sample_code.into(),
            ..Default::default()
        }
    }

    pub fn has_endpoint(&self) -> bool {
        !self.endpoint.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_case_insensitive() {
        assert_eq!("post".parse::<HttpMethod>(), Ok(HttpMethod::Post));
        assert_eq!(" Delete ".parse::<HttpMethod>(), Ok(HttpMethod::Delete));
        assert_eq!("OPTIONS".parse::<HttpMethod>(), Ok(HttpMethod::Options));
    }

    #[test]
    fn test_method_parse_rejects_unknown() {
        let err = "FETCH".parse::<HttpMethod>().unwrap_err();
        assert_eq!(err, UnknownMethod("FETCH".to_string()));
        assert!("".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_method_default_is_get() {
        assert_eq!(HttpMethod::default(), HttpMethod::Get);
        assert_eq!(HttpMethod::Get.to_string(), "GET");
    }

    #[test]
    fn test_noise_field_lookup() {
        assert_eq!(NoiseField::lookup("id"), Some(NoiseField::Id));
        assert_eq!(NoiseField::lookup("Response"), Some(NoiseField::Response));
        assert!(NoiseField::is_noise("DATA"));
        assert!(!NoiseField::is_noise("email"));
    }

    #[test]
    fn test_descriptor_serializes_camel_case() {
        let mut descriptor = ApiDescriptor::empty("curl x");
        descriptor.auth_key = "secret".to_string();
        descriptor.method = HttpMethod::Patch;

        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["authKey"], "secret");
        assert_eq!(json["sampleCode"], "curl x");
        assert_eq!(json["method"], "PATCH");
        assert_eq!(json["name"], "API");
    }

    #[test]
    fn test_descriptor_deserializes_nulls_as_defaults() {
        let descriptor: ApiDescriptor = serde_json::from_str(
            r#"{"name": "Users API", "endpoint": null, "headers": null, "method": "PUT"}"#,
        )
        .unwrap();

        assert_eq!(descriptor.name, "Users API");
        assert!(descriptor.endpoint.is_empty());
        assert!(descriptor.headers.is_empty());
        assert_eq!(descriptor.method, HttpMethod::Put);
        assert!(!descriptor.has_endpoint());
    }
}
