//! Utility modules for apiscope
//!
//! Currently this holds the structured logging setup shared by the binary
//! and by library consumers that want the same output format.

pub mod logging;

pub use logging::{init_logging, parse_level, LoggingConfig};
