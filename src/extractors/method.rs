//! HTTP method detection
//!
//! Matchers run from most to least specific; the first one that recognises a
//! verb decides. Input that names no verb yields `GET`.

use super::patterns;
use crate::output::HttpMethod;
use regex::Regex;
use tracing::debug;

type MethodMatcher = fn(&str) -> Option<HttpMethod>;

const MATCHERS: &[(&str, MethodMatcher)] = &[
    ("method-key", from_method_key),
    ("call-suffix", from_call_suffix),
    ("curl-flag", from_curl_flag),
];

pub fn detect_method(text: &str) -> HttpMethod {
    for (rule, matcher) in MATCHERS {
        if let Some(method) = matcher(text) {
            debug!(rule = *rule, method = %method, "HTTP method detected");
            return method;
        }
    }
    HttpMethod::default()
}

/// `method: 'POST'`, `"method": "put"`, `method="DELETE"`
pub fn from_method_key(text: &str) -> Option<HttpMethod> {
    first_verb(patterns::method_key(), text)
}

/// `axios.get(`, `requests.post(`, `http.delete(`
pub fn from_call_suffix(text: &str) -> Option<HttpMethod> {
    first_verb(patterns::method_call(), text)
}

/// `curl -X PATCH ...`, `curl --request=PUT ...`
pub fn from_curl_flag(text: &str) -> Option<HttpMethod> {
    first_verb(patterns::method_curl(), text)
}

fn first_verb(re: &Regex, text: &str) -> Option<HttpMethod> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}
