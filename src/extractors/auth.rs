//! Authentication key detection

use super::patterns;

/// Returns the value of the first credential-looking key assigned a quoted string
///
/// Recognised keys (case-insensitive, optionally quoted): `api_key`, `apiKey`,
/// `apikey`, `authorization`, `bearer`, `token`. Both `key: "value"` and
/// `key = "value"` forms match. The value is returned verbatim.
pub fn detect_auth_key(text: &str) -> Option<String> {
    let captures = patterns::auth_key().captures(text)?;
    captures.get(2).map(|value| value.as_str().to_string())
}
