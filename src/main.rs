use apiscope::cli::{dispatch, CliArgs};
use apiscope::util::{init_logging, LoggingConfig};
use apiscope::{NAME, VERSION};

use clap::Parser;
use std::process;
use tracing::debug;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging(
        LoggingConfig::from_env().with_overrides(args.log_level.as_deref(), args.verbose, args.quiet),
    );

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = dispatch(&args).await;

    process::exit(exit_code);
}
