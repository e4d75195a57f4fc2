//! Command handlers
//!
//! Each handler returns a process exit code. Failures are logged through
//! `tracing` and summarised on stderr; results go to stdout.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, error, warn};

use super::commands::{
    AddArgs, CliArgs, Commands, DeleteArgs, ExtractArgs, FormatArgs, ListArgs, OutputFormatArg,
    ShowArgs, TestArgs,
};
use super::output::OutputFormatter;
use crate::config::ApiscopeConfig;
use crate::probe::ApiProbe;
use crate::storage::{ApiStore, StorageError};
use crate::validation::{ApiDraft, HeaderInput, Validator};

/// Exit code for a call interrupted by Ctrl-C
const EXIT_INTERRUPTED: i32 = 130;

/// Runs the selected subcommand against configuration loaded from the environment
pub async fn dispatch(args: &CliArgs) -> i32 {
    let mut config = ApiscopeConfig::default();
    if let Some(store) = &args.store {
        debug!("Store path overridden to: {}", store.display());
        config.store_path = store.clone();
    }

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        eprintln!("\nPlease check your APISCOPE_* environment variables.");
        return 1;
    }

    match &args.command {
        Commands::Extract(extract_args) => handle_extract(extract_args, &config),
        Commands::Add(add_args) => handle_add(add_args, &config),
        Commands::List(list_args) => handle_list(list_args, &config),
        Commands::Show(show_args) => handle_show(show_args, &config),
        Commands::Delete(delete_args) => handle_delete(delete_args, &config),
        Commands::Test(test_args) => handle_test(test_args, &config).await,
        Commands::Stats(format_args) => handle_stats(format_args, &config),
        Commands::Config(format_args) => handle_config(format_args, &config),
    }
}

pub fn handle_extract(args: &ExtractArgs, config: &ApiscopeConfig) -> i32 {
    report(run_extract(args, config))
}

fn run_extract(args: &ExtractArgs, config: &ApiscopeConfig) -> Result<()> {
    let text = read_input(args.input.as_deref(), config.max_input_size)?;
    let mut descriptor = config.create_extractor().extract(&text);

    if let Some(name) = &args.name {
        descriptor.name = name.clone();
    }
    if let Some(description) = &args.description {
        descriptor.description = description.clone();
    }

    let formatter = formatter_for(args.format, config);
    println!("{}", formatter.format_descriptor(&descriptor)?);
    Ok(())
}

pub fn handle_add(args: &AddArgs, config: &ApiscopeConfig) -> i32 {
    report(run_add(args, config))
}

fn run_add(args: &AddArgs, config: &ApiscopeConfig) -> Result<()> {
    let text = read_input(args.input.as_deref(), config.max_input_size)?;
    let extracted = config.create_extractor().extract(&text);

    let draft = apply_overrides(ApiDraft::from(extracted), args);
    let descriptor = Validator::default()
        .validate(draft)
        .context("Descriptor was rejected")?;

    let store = config.create_store();
    let api = store.create(descriptor)?;

    let formatter = formatter_for(args.format, config);
    println!("{}", formatter.format_api(&api)?);
    Ok(())
}

/// Replaces extracted values with whatever the user supplied on the command line
fn apply_overrides(mut draft: ApiDraft, args: &AddArgs) -> ApiDraft {
    if let Some(name) = &args.name {
        draft.name = name.clone();
    }
    if let Some(description) = &args.description {
        draft.description = description.clone();
    }
    if let Some(endpoint) = &args.endpoint {
        draft.endpoint = endpoint.clone();
    }
    if let Some(method) = &args.method {
        draft.method = method.clone();
    }
    if let Some(auth_key) = &args.auth_key {
        draft.auth_key = auth_key.clone();
    }
    if let Some(headers) = &args.headers {
        draft.headers = HeaderInput::Raw(headers.clone());
    }
    if let Some(fields) = &args.fields {
        draft.fields = fields.clone();
    }
    draft
}

pub fn handle_list(args: &ListArgs, config: &ApiscopeConfig) -> i32 {
    report(run_list(args, config))
}

fn run_list(args: &ListArgs, config: &ApiscopeConfig) -> Result<()> {
    let store = config.create_store();
    let apis = match &args.filter {
        Some(term) => store.search(term)?,
        None => store.list()?,
    };
    debug!("Listing {} APIs", apis.len());

    let formatter = formatter_for(args.format, config);
    println!("{}", formatter.format_api_list(&apis)?);
    Ok(())
}

pub fn handle_show(args: &ShowArgs, config: &ApiscopeConfig) -> i32 {
    report(run_show(args, config))
}

fn run_show(args: &ShowArgs, config: &ApiscopeConfig) -> Result<()> {
    let api = config.create_store().get(&args.id)?;
    let formatter = formatter_for(args.format, config);
    println!("{}", formatter.format_api(&api)?);
    Ok(())
}

pub fn handle_delete(args: &DeleteArgs, config: &ApiscopeConfig) -> i32 {
    report(run_delete(args, config))
}

fn run_delete(args: &DeleteArgs, config: &ApiscopeConfig) -> Result<()> {
    config.create_store().delete(&args.id)?;
    println!("Deleted {}", args.id);
    Ok(())
}

pub async fn handle_test(args: &TestArgs, config: &ApiscopeConfig) -> i32 {
    match run_test(args, config).await {
        Ok(Some(true)) => 0,
        Ok(Some(false)) => 1,
        Ok(None) => {
            warn!("Test call cancelled");
            EXIT_INTERRUPTED
        }
        Err(e) => report(Err(e)),
    }
}

/// Returns whether the call succeeded, or `None` when it was interrupted
async fn run_test(args: &TestArgs, config: &ApiscopeConfig) -> Result<Option<bool>> {
    let store = config.create_store();
    let api = store.get(&args.id)?;
    if !api.descriptor.has_endpoint() {
        bail!("API {} has no endpoint to call", api.id);
    }

    let probe = probe_for(args, config)?;

    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let Some(entry) = probe.probe_until(&api, interrupted).await else {
        return Ok(None);
    };

    let updated = store.append_history(&api.id, entry.clone())?;
    debug!(id = %updated.id, history = updated.history.len(), "Recorded test call");

    let formatter = formatter_for(args.format, config);
    println!("{}", formatter.format_history_entry(&entry)?);
    Ok(Some(entry.is_success()))
}

/// Builds the configured probe, honouring a per-call `--timeout`
fn probe_for(args: &TestArgs, config: &ApiscopeConfig) -> Result<ApiProbe> {
    let mut config = config.clone();
    if let Some(secs) = args.timeout {
        config.request_timeout_secs = secs;
    }
    config
        .create_probe()
        .context("Failed to initialize HTTP client")
}

pub fn handle_stats(args: &FormatArgs, config: &ApiscopeConfig) -> i32 {
    report(run_stats(args, config))
}

fn run_stats(args: &FormatArgs, config: &ApiscopeConfig) -> Result<()> {
    let stats = config.create_store().stats()?;
    println!("{}", formatter_for(args.format, config).format_stats(&stats)?);
    Ok(())
}

pub fn handle_config(args: &FormatArgs, config: &ApiscopeConfig) -> i32 {
    report(
        formatter_for(args.format, config)
            .format_config(config)
            .map(|output| println!("{}", output)),
    )
}

fn formatter_for(format: OutputFormatArg, config: &ApiscopeConfig) -> OutputFormatter {
    OutputFormatter::new(format.into()).with_viewer(config.viewer())
}

fn report(result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            if let Some(StorageError::NotFound(id)) = e.downcast_ref::<StorageError>() {
                error!("No API with id {}", id);
            } else {
                error!("{:#}", e);
            }
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

/// Reads the snippet from `path`, or from stdin when `path` is absent or `-`
///
/// Input larger than `max_size` bytes is refused.
pub fn read_input(path: Option<&Path>, max_size: usize) -> Result<String> {
    let text = match path {
        Some(p) if p != Path::new("-") => {
            let file =
                File::open(p).with_context(|| format!("Failed to open {}", p.display()))?;
            read_limited(file, max_size)
                .with_context(|| format!("Failed to read {}", p.display()))?
        }
        _ => {
            if atty::is(atty::Stream::Stdin) {
                eprintln!("Reading snippet from stdin (end with Ctrl-D)...");
            }
            read_limited(io::stdin().lock(), max_size).context("Failed to read stdin")?
        }
    };

    debug!("Read {} bytes of input", text.len());
    Ok(text)
}

fn read_limited(reader: impl Read, max_size: usize) -> Result<String> {
    let mut buffer = Vec::new();
    reader
        .take(max_size as u64 + 1)
        .read_to_end(&mut buffer)?;

    if buffer.len() > max_size {
        bail!("Input exceeds the maximum size of {} bytes", max_size);
    }

    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn add_args() -> AddArgs {
        AddArgs {
            input: None,
            name: None,
            description: None,
            endpoint: None,
            method: None,
            auth_key: None,
            headers: None,
            fields: None,
            format: OutputFormatArg::Json,
        }
    }

    #[test]
    fn test_read_input_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "curl -X DELETE https://svc.io/items/42").unwrap();

        let text = read_input(Some(file.path()), 1024).unwrap();
        assert_eq!(text, "curl -X DELETE https://svc.io/items/42");
    }

    #[test]
    fn test_read_input_rejects_oversized_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[b'a'; 2048]).unwrap();

        let err = read_input(Some(file.path()), 1024).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"));
        assert_eq!(
            err.root_cause().to_string(),
            "Input exceeds the maximum size of 1024 bytes"
        );
        assert!(format!("{:#}", err).contains("1024 bytes"));
    }

    #[test]
    fn test_read_input_missing_file() {
        assert!(read_input(Some(Path::new("/nonexistent/snippet.js")), 1024).is_err());
    }

    #[test]
    fn test_read_limited_at_boundary() {
        assert_eq!(read_limited(&b"abcd"[..], 4).unwrap(), "abcd");
        assert!(read_limited(&b"abcde"[..], 4).is_err());
    }

    #[test]
    #[serial]
    fn test_probe_for_applies_timeout_override() {
        let config = ApiscopeConfig {
            request_timeout_secs: 30,
            ..Default::default()
        };
        let mut args = TestArgs {
            id: "any".to_string(),
            timeout: None,
            format: OutputFormatArg::Human,
        };

        assert_eq!(probe_for(&args, &config).unwrap().timeout(), Duration::from_secs(30));

        args.timeout = Some(3);
        assert_eq!(probe_for(&args, &config).unwrap().timeout(), Duration::from_secs(3));
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_apply_overrides() {
        let extracted = crate::extract("curl -X DELETE https://svc.io/items/42");
        let args = AddArgs {
            name: Some("Items".to_string()),
            method: Some("put".to_string()),
            headers: Some(r#"{"X-Team": "core"}"#.to_string()),
            fields: Some(vec!["sku".to_string()]),
            ..add_args()
        };

        let draft = apply_overrides(ApiDraft::from(extracted), &args);
        assert_eq!(draft.name, "Items");
        assert_eq!(draft.method, "put");
        assert_eq!(draft.endpoint, "https://svc.io/items/42");
        assert_eq!(draft.headers, HeaderInput::Raw(r#"{"X-Team": "core"}"#.to_string()));
        assert_eq!(draft.fields, vec!["sku".to_string()]);
    }

    #[test]
    fn test_apply_no_overrides_keeps_extraction() {
        let extracted = crate::extract("curl -X DELETE https://svc.io/items/42");
        let draft = apply_overrides(ApiDraft::from(extracted.clone()), &add_args());
        assert_eq!(Validator::default().validate(draft).unwrap(), extracted);
    }
}
