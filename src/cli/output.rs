//! Output formatting for multiple formats
//!
//! This module provides formatters for JSON, YAML and human-readable text.
//! Every value that carries an auth key passes through the formatter's
//! [`AccessControl`] before it is rendered, so non-privileged viewers only
//! ever see masked secrets.
//!
//! # Example
//!
//! ```
//! use apiscope::access::Viewer;
//! use apiscope::cli::output::{OutputFormat, OutputFormatter};
//!
//! let descriptor = apiscope::extract("curl -X DELETE https://svc.io/items/42");
//! let formatter = OutputFormatter::new(OutputFormat::Json).with_viewer(Viewer::regular());
//! let output = formatter.format_descriptor(&descriptor).unwrap();
//! assert!(output.contains("\"DELETE\""));
//! ```

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::access::{AccessControl, Viewer};
use crate::config::ApiscopeConfig;
use crate::output::ApiDescriptor;
use crate::storage::{CallStatus, HistoryEntry, StoreStats, StoredApi};

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Longest response preview shown in human output, in characters
const RESPONSE_PREVIEW_CHARS: usize = 200;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-friendly, version-control friendly)
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Output formatter for descriptors, stored APIs and store metadata
pub struct OutputFormatter {
    format: OutputFormat,
    access: Box<dyn AccessControl>,
}

impl OutputFormatter {
    /// Creates a formatter that masks secrets as for a regular viewer
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            access: Box::new(Viewer::regular()),
        }
    }

    pub fn with_viewer(mut self, access: impl AccessControl + 'static) -> Self {
        self.access = Box::new(access);
        self
    }

    pub fn format_descriptor(&self, descriptor: &ApiDescriptor) -> Result<String> {
        let masked = self.mask_descriptor(descriptor);
        match self.format {
            OutputFormat::Json => to_json(&masked, "descriptor"),
            OutputFormat::Yaml => to_yaml(&masked, "descriptor"),
            OutputFormat::Human => Ok(self.format_descriptor_human(&masked)),
        }
    }

    /// Formats one stored API including its call history
    pub fn format_api(&self, api: &StoredApi) -> Result<String> {
        let masked = self.mask_api(api);
        match self.format {
            OutputFormat::Json => to_json(&masked, "stored API"),
            OutputFormat::Yaml => to_yaml(&masked, "stored API"),
            OutputFormat::Human => Ok(self.format_api_human(&masked)),
        }
    }

    pub fn format_api_list(&self, apis: &[StoredApi]) -> Result<String> {
        let masked: Vec<StoredApi> = apis.iter().map(|api| self.mask_api(api)).collect();
        match self.format {
            OutputFormat::Json => to_json(&masked, "API list"),
            OutputFormat::Yaml => to_yaml(&masked, "API list"),
            OutputFormat::Human => Ok(self.format_api_list_human(&masked)),
        }
    }

    /// Formats the outcome of a single test call
    pub fn format_history_entry(&self, entry: &HistoryEntry) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(entry, "history entry"),
            OutputFormat::Yaml => to_yaml(entry, "history entry"),
            OutputFormat::Human => Ok(format_entry_human(entry)),
        }
    }

    pub fn format_stats(&self, stats: &StoreStats) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(stats, "store stats"),
            OutputFormat::Yaml => to_yaml(stats, "store stats"),
            OutputFormat::Human => {
                let mut output = String::new();
                output.push_str("API Store\n");
                output.push_str(RULE);
                output.push_str("\n\n");
                output.push_str(&format!("Total APIs:    {}\n", stats.total));
                output.push_str(&format!("Active APIs:   {}\n", stats.active));
                output.push_str(&format!("Recorded Calls: {}\n", stats.calls));
                Ok(output)
            }
        }
    }

    /// Formats configuration display
    pub fn format_config(&self, config: &ApiscopeConfig) -> Result<String> {
        let config_map: BTreeMap<String, String> = config.to_display_map().into_iter().collect();
        match self.format {
            OutputFormat::Json => to_json(&config_map, "config"),
            OutputFormat::Yaml => to_yaml(&config_map, "config"),
            OutputFormat::Human => {
                let mut output = String::new();
                output.push_str("apiscope Configuration\n");
                output.push_str(RULE);
                output.push_str("\n\n");

                output.push_str("Storage:\n");
                push_entry(&mut output, &config_map, "store_path", "Path", "");

                output.push_str("\nExtraction:\n");
                push_entry(&mut output, &config_map, "max_input_size", "Max Input", " bytes");
                push_entry(&mut output, &config_map, "max_span_len", "Max Span", " bytes");

                output.push_str("\nTest Calls:\n");
                push_entry(&mut output, &config_map, "request_timeout_secs", "Timeout", "s");
                push_entry(&mut output, &config_map, "auth_header", "Auth Header", "");

                output.push_str("\nAccess:\n");
                push_entry(&mut output, &config_map, "admin", "Admin", "");
                push_entry(&mut output, &config_map, "log_level", "Log Level", "");

                Ok(output)
            }
        }
    }

    /// Masks the auth key, including any header that carries it verbatim
    fn mask_descriptor(&self, descriptor: &ApiDescriptor) -> ApiDescriptor {
        let secret = descriptor.auth_key.as_str();
        let masked = self.access.mask_secret(secret);
        let redact = |text: &str| {
            if secret.is_empty() || masked == secret {
                text.to_string()
            } else {
                text.replace(secret, &masked)
            }
        };

        ApiDescriptor {
            headers: descriptor
                .headers
                .iter()
                .map(|(name, value)| (name.clone(), redact(value)))
                .collect(),
            sample_code: redact(&descriptor.sample_code),
            auth_key: masked.clone(),
            ..descriptor.clone()
        }
    }

    fn mask_api(&self, api: &StoredApi) -> StoredApi {
        StoredApi {
            descriptor: self.mask_descriptor(&api.descriptor),
            ..api.clone()
        }
    }

    // Human-readable formatting methods

    fn format_descriptor_human(&self, descriptor: &ApiDescriptor) -> String {
        let mut output = String::new();

        if descriptor.has_endpoint() {
            output.push_str(&format!("\u{2713} {}\n", descriptor.name));
        } else {
            output.push_str(&format!("\u{26A0} {} (no endpoint found)\n", descriptor.name));
        }
        output.push_str(RULE);
        output.push_str("\n\n");

        if !descriptor.description.is_empty() {
            output.push_str(&format!("{}\n\n", descriptor.description));
        }

        output.push_str("Request:\n");
        output.push_str(&format!(
            "\u{251C}\u{2500} Method:    {}\n",
            descriptor.method
        ));
        output.push_str(&format!(
            "\u{251C}\u{2500} Endpoint:  {}\n",
            or_placeholder(&descriptor.endpoint)
        ));
        output.push_str(&format!(
            "\u{2514}\u{2500} Auth Key:  {}\n\n",
            or_placeholder(&descriptor.auth_key)
        ));

        if descriptor.headers.is_empty() {
            output.push_str("Headers: (none)\n");
        } else {
            output.push_str("Headers:\n");
            for (name, value) in &descriptor.headers {
                output.push_str(&format!("  {}: {}\n", name, value));
            }
        }

        if descriptor.fields.is_empty() {
            output.push_str("Fields:  (none)\n");
        } else {
            let fields: Vec<&str> = descriptor.fields.iter().map(String::as_str).collect();
            output.push_str(&format!("Fields:  {}\n", fields.join(", ")));
        }

        output
    }

    fn format_api_human(&self, api: &StoredApi) -> String {
        let mut output = self.format_descriptor_human(&api.descriptor);

        output.push_str(&format!("\nID:      {}\n", api.id));
        output.push_str(&format!("Status:  {:?}\n", api.status));
        output.push_str(&format!("Created: {}\n", api.created_at.to_rfc3339()));
        output.push_str(&format!("Updated: {}\n", api.updated_at.to_rfc3339()));

        if api.history.is_empty() {
            output.push_str("\nNo test calls recorded\n");
        } else {
            output.push_str(&format!("\nRecent Calls ({}):\n", api.history.len()));
            for entry in &api.history {
                output.push_str(&format!("  {}\n", entry_summary(entry)));
            }
        }

        output
    }

    fn format_api_list_human(&self, apis: &[StoredApi]) -> String {
        if apis.is_empty() {
            return "No APIs stored\n".to_string();
        }

        let mut output = String::new();
        output.push_str(&format!("Stored APIs ({})\n", apis.len()));
        output.push_str(RULE);
        output.push_str("\n\n");

        for api in apis {
            output.push_str(&format!(
                "{}  {:<7} {}  {}\n",
                api.id,
                api.descriptor.method,
                api.descriptor.name,
                or_placeholder(&api.descriptor.endpoint)
            ));
        }

        output
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String> {
    serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {} to JSON", what))
}

fn to_yaml<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String> {
    serde_yaml::to_string(value).with_context(|| format!("Failed to serialize {} to YAML", what))
}

fn push_entry(
    output: &mut String,
    map: &BTreeMap<String, String>,
    key: &str,
    label: &str,
    suffix: &str,
) {
    if let Some(value) = map.get(key) {
        output.push_str(&format!("  {}: {}{}\n", label, value, suffix));
    }
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() {
        "(not found)"
    } else {
        value
    }
}

fn entry_summary(entry: &HistoryEntry) -> String {
    let symbol = match entry.status {
        CallStatus::Success => "\u{2713}",
        CallStatus::Error => "\u{2717}",
    };
    let outcome = match (entry.status_code, &entry.error) {
        (Some(code), _) => code.to_string(),
        (None, Some(error)) => error.clone(),
        (None, None) => "-".to_string(),
    };
    format!(
        "{} {} {} {} ({})",
        symbol,
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.method,
        entry.endpoint,
        outcome
    )
}

fn format_entry_human(entry: &HistoryEntry) -> String {
    let mut output = entry_summary(entry);
    output.push('\n');

    if let Some(response) = &entry.response {
        let body = match response {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        let preview: String = body.chars().take(RESPONSE_PREVIEW_CHARS).collect();
        output.push_str("\nResponse:\n");
        output.push_str(&preview);
        if body.chars().count() > RESPONSE_PREVIEW_CHARS {
            output.push_str("... (truncated)");
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::HttpMethod;

    fn create_test_descriptor() -> ApiDescriptor {
        let mut descriptor = ApiDescriptor::empty("fetch(...)");
        descriptor.name = "Users API".to_string();
        descriptor.endpoint = "https://api.example.com/v1/users".to_string();
        descriptor.method = HttpMethod::Post;
        descriptor.auth_key = "sk_live_1234567890".to_string();
        descriptor.fields.insert("email".to_string());
        descriptor
            .headers
            .insert("X-Team".to_string(), "core".to_string());
        descriptor
    }

    #[test]
    fn test_json_format_masks_secret() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter
            .format_descriptor(&create_test_descriptor())
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["authKey"], "sk_live_**********");
        assert_eq!(parsed["method"], "POST");
        assert_eq!(parsed["name"], "Users API");
    }

    #[test]
    fn test_header_carrying_secret_is_masked() {
        let mut descriptor = create_test_descriptor();
        descriptor
            .headers
            .insert("api_key".to_string(), descriptor.auth_key.clone());

        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter.format_descriptor(&descriptor).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["headers"]["api_key"], "sk_live_**********");
        assert_eq!(parsed["headers"]["X-Team"], "core");
    }

    #[test]
    fn test_sample_code_secret_is_masked_in_every_format() {
        let code = r#"fetch('https://api.example.com/v1/users', { headers: { api_key: "sk_live_SUPERSECRET99" } })"#;
        let descriptor = crate::extract(code);
        assert_eq!(descriptor.auth_key, "sk_live_SUPERSECRET99");

        for format in [OutputFormat::Json, OutputFormat::Yaml, OutputFormat::Human] {
            let output = OutputFormatter::new(format)
                .format_descriptor(&descriptor)
                .unwrap();
            assert!(!output.contains("SUPERSECRET99"), "{:?} output leaks the key", format);
        }

        let json = OutputFormatter::new(OutputFormat::Json)
            .format_descriptor(&descriptor)
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["sampleCode"]
            .as_str()
            .unwrap()
            .contains(r#"api_key: "sk_live_*************""#));
    }

    #[test]
    fn test_privileged_viewer_sees_secret() {
        let formatter = OutputFormatter::new(OutputFormat::Json).with_viewer(Viewer::privileged());
        let output = formatter
            .format_descriptor(&create_test_descriptor())
            .unwrap();
        assert!(output.contains("sk_live_1234567890"));
    }

    #[test]
    fn test_yaml_format() {
        let formatter = OutputFormatter::new(OutputFormat::Yaml);
        let output = formatter
            .format_descriptor(&create_test_descriptor())
            .unwrap();

        assert!(output.contains("endpoint: https://api.example.com/v1/users"));
        assert!(output.contains("authKey: sk_live_**********"));
    }

    #[test]
    fn test_human_format() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let output = formatter
            .format_descriptor(&create_test_descriptor())
            .unwrap();

        assert!(output.contains("Users API"));
        assert!(output.contains("Method:    POST"));
        assert!(output.contains("X-Team: core"));
        assert!(output.contains("Fields:  email"));
        assert!(!output.contains("1234567890"));
    }

    #[test]
    fn test_human_format_without_endpoint() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let output = formatter
            .format_descriptor(&ApiDescriptor::empty("hello"))
            .unwrap();

        assert!(output.contains("no endpoint found"));
        assert!(output.contains("(not found)"));
    }

    #[test]
    fn test_api_list_masks_every_record() {
        let apis = vec![
            StoredApi::new(create_test_descriptor()),
            StoredApi::new(create_test_descriptor()),
        ];
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter.format_api_list(&apis).unwrap();

        let parsed: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed.iter().all(|api| api["authKey"] == "sk_live_**********"));
    }

    #[test]
    fn test_empty_list_human() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        assert_eq!(formatter.format_api_list(&[]).unwrap(), "No APIs stored\n");
    }

    #[test]
    fn test_api_human_shows_history() {
        let mut api = StoredApi::new(create_test_descriptor());
        api.record(HistoryEntry::failed(
            HttpMethod::Post,
            "https://api.example.com/v1/users",
            "connection refused",
        ));

        let formatter = OutputFormatter::new(OutputFormat::Human);
        let output = formatter.format_api(&api).unwrap();
        assert!(output.contains("Recent Calls (1)"));
        assert!(output.contains("connection refused"));
        assert!(output.contains(&api.id));
    }

    #[test]
    fn test_history_entry_truncates_response() {
        let entry = HistoryEntry::completed(
            HttpMethod::Get,
            "https://svc.io",
            200,
            Some(serde_json::Value::String("x".repeat(500))),
        );
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let output = formatter.format_history_entry(&entry).unwrap();
        assert!(output.contains("(200)"));
        assert!(output.contains("... (truncated)"));
    }

    #[test]
    fn test_stats_json() {
        let stats = StoreStats {
            total: 3,
            active: 2,
            calls: 7,
        };
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let parsed: serde_json::Value =
            serde_json::from_str(&formatter.format_stats(&stats).unwrap()).unwrap();
        assert_eq!(parsed["total"], 3);
        assert_eq!(parsed["calls"], 7);
    }
}
