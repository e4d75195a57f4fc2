//! Compiled regular expressions shared by the extractors
//!
//! Patterns are literals, so compilation cannot fail at runtime; each one is
//! built on first use and reused by every later call.

use regex::Regex;
use std::sync::OnceLock;

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("valid regex"))
}

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        pub(crate) fn $name() -> &'static Regex {
            static CELL: OnceLock<Regex> = OnceLock::new();
            cached(&CELL, $re)
        }
    };
}

// URL token: scheme, then anything up to whitespace or a quote
pattern!(url, r#"(?i)https?://[^\s'"`]+"#);

pattern!(
    method_key,
    r#"(?i)\bmethod['"]?\s*[:=]\s*['"`](GET|POST|PUT|DELETE|PATCH|HEAD|OPTIONS)['"`]"#
);
pattern!(
    method_call,
    r"(?i)\.(get|post|put|delete|patch|head|options)\("
);
pattern!(
    method_curl,
    r#"(?s)\bcurl\b.*?(?:-X|--request)[\s=]*['"]?((?i:GET|POST|PUT|DELETE|PATCH|HEAD|OPTIONS))\b"#
);

pattern!(
    auth_key,
    r#"(?i)['"]?\b(api_key|apikey|authorization|bearer|token)['"]?\s*[:=]\s*['"`]([^'"`]+)['"`]"#
);

pattern!(
    headers_block,
    r#"(?s)\bheaders['"]?\s*[:=]\s*[\{\[]([^\}\]]*)[\}\]]"#
);
pattern!(
    header_pair,
    r#"['"]?([A-Za-z0-9_-]+)['"]?\s*[:=]\s*['"`]?([^'"`,\}\]\n]+)"#
);
pattern!(curl_command, r"\bcurl\b");
pattern!(
    curl_header,
    r#"(?:-H|--header)\s+['"]([A-Za-z0-9_-]+)\s*:\s*([^'"]*)['"]"#
);

pattern!(object_key, r#"['"]?([A-Za-z_]\w*)['"]?\s*:"#);
pattern!(
    interface_block,
    r"(?s)\binterface\s+[A-Za-z_]\w*(?:\s*<[^>{]*>)?(?:\s+extends\s+[^{]+)?\s*\{([^}]*)\}"
);
pattern!(interface_member, r"^(?:readonly\s+)?([A-Za-z_]\w*)\??\s*:");
pattern!(
    destructuring,
    r"\b(?:const|let|var)\s*\{([^{}]*)\}\s*="
);
pattern!(leading_identifier, r"^([A-Za-z_]\w*)");
