//! Logging setup for apiscope
//!
//! `RUST_LOG` always wins when it is set. Otherwise the level comes from the
//! command line, then `APISCOPE_LOG_LEVEL`, and the HTTP stack underneath the
//! probe is held at `warn`. Everything is written to stderr so command output
//! on stdout stays machine-readable.
//!
//! ```no_run
//! use apiscope::util::{init_logging, LoggingConfig};
//!
//! let config = LoggingConfig::from_env().with_overrides(Some("debug"), false, false);
//! init_logging(config);
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Targets that are noisy at debug level and held at `warn`
const HTTP_TARGETS: [&str; 3] = ["h2", "hyper", "reqwest"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Minimum level for apiscope's own events
    pub level: Level,
    /// Emit one JSON object per event instead of the console format
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Reads `APISCOPE_LOG_LEVEL` and `APISCOPE_LOG_JSON`
    pub fn from_env() -> Self {
        let level = env::var("APISCOPE_LOG_LEVEL")
            .map(|value| parse_level(&value))
            .unwrap_or(Level::INFO);
        let json = env::var("APISCOPE_LOG_JSON")
            .ok()
            .and_then(|value| value.parse::<bool>().ok())
            .unwrap_or(false);

        Self { level, json }
    }

    /// Applies command-line flags: an explicit level beats `-v`, which beats `-q`
    pub fn with_overrides(mut self, level: Option<&str>, verbose: bool, quiet: bool) -> Self {
        self.level = match level {
            Some(level) => parse_level(level),
            None if verbose => Level::DEBUG,
            None if quiet => Level::ERROR,
            None => self.level,
        };
        self
    }

    /// Filter used when `RUST_LOG` is absent
    pub fn filter(&self) -> EnvFilter {
        HTTP_TARGETS.iter().fold(
            EnvFilter::new("error").add_directive(crate_directive(self.level)),
            |filter, target| filter.add_directive(target_directive(target, Level::WARN)),
        )
    }
}

/// Parses a level name case-insensitively, falling back to `INFO`
pub fn parse_level(level_str: &str) -> Level {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Builds the `apiscope=<level>` filter directive
pub fn crate_directive(level: Level) -> Directive {
    target_directive("apiscope", level)
}

fn target_directive(target: &str, level: Level) -> Directive {
    format!("{}={}", target, level)
        .parse()
        .unwrap_or_else(|_| LevelFilter::from_level(level).into())
}

/// Installs the global subscriber; later calls are ignored
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = if env::var_os("RUST_LOG").is_some() {
            EnvFilter::from_default_env()
        } else {
            config.filter()
        };

        if config.json {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
                .init();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("Debug"), Level::DEBUG);
        assert_eq!(parse_level(" WARN "), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
        assert_eq!(parse_level("loud"), Level::INFO);
    }

    #[test]
    fn test_overrides_precedence() {
        let base = LoggingConfig {
            level: Level::WARN,
            json: true,
        };

        assert_eq!(base.clone().with_overrides(None, false, false).level, Level::WARN);
        assert_eq!(base.clone().with_overrides(None, true, false).level, Level::DEBUG);
        assert_eq!(base.clone().with_overrides(None, false, true).level, Level::ERROR);
        assert_eq!(base.clone().with_overrides(Some("trace"), true, false).level, Level::TRACE);
        assert!(base.with_overrides(None, true, false).json);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        env::set_var("APISCOPE_LOG_LEVEL", "debug");
        env::set_var("APISCOPE_LOG_JSON", "true");
        let config = LoggingConfig::from_env();
        env::remove_var("APISCOPE_LOG_LEVEL");
        env::remove_var("APISCOPE_LOG_JSON");

        assert_eq!(
            config,
            LoggingConfig {
                level: Level::DEBUG,
                json: true
            }
        );
        assert_eq!(LoggingConfig::from_env(), LoggingConfig::default());
    }

    #[test]
    fn test_filter_quiets_http_stack() {
        let filter = LoggingConfig::default()
            .with_overrides(Some("debug"), false, false)
            .filter()
            .to_string()
            .to_lowercase();

        assert!(filter.contains("apiscope=debug"));
        for target in HTTP_TARGETS {
            assert!(filter.contains(&format!("{}=warn", target)));
        }
    }

    #[test]
    fn test_crate_directive() {
        let directive = crate_directive(Level::DEBUG).to_string();
        assert!(directive.eq_ignore_ascii_case("apiscope=debug"));
    }
}
