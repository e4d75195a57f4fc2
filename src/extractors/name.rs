//! Human-readable names derived from endpoint URLs

/// Name used when no endpoint (or no usable path segment) is available
pub const FALLBACK_NAME: &str = "API";

/// Derives a label such as "Users API" from the last meaningful URL segment
///
/// Query string and fragment are ignored, as are empty segments and the
/// scheme. `-` and `_` become spaces and every word is capitalised.
pub fn derive_name(endpoint: &str) -> String {
    let path = endpoint.split(['?', '#']).next().unwrap_or(endpoint);

    let label = path
        .split('/')
        .filter(|segment| !segment.is_empty() && !is_scheme(segment))
        .last()
        .map(humanize)
        .unwrap_or_default();

    if label.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        format!("{} {}", label, FALLBACK_NAME)
    }
}

fn is_scheme(segment: &str) -> bool {
    segment.eq_ignore_ascii_case("http:") || segment.eq_ignore_ascii_case("https:")
}

fn humanize(segment: &str) -> String {
    segment
        .replace(['-', '_'], " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
