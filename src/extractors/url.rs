//! Endpoint URL detection

use super::patterns;
use crate::validation::rules::check_endpoint;

const QUOTES: &[char] = &['\'', '"', '`'];

/// Returns the first http(s) URL token in `text`, stripped of wrapping quotes
///
/// Tokens that are not usable endpoints, such as template literals that
/// interpolate the host or port, are skipped in favour of the next one.
pub fn detect_url(text: &str) -> Option<String> {
    patterns::url()
        .find_iter(text)
        .map(|found| found.as_str().trim_matches(QUOTES))
        .find(|url| check_endpoint(url).is_ok())
        .map(str::to_string)
}
