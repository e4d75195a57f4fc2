pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, OutputFormatArg};
pub use handlers::dispatch;
pub use output::{OutputFormat, OutputFormatter};
