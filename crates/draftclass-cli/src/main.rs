//! Draft class tool binary entry point.
//!
//! Thin wrapper around the `draftclass-cli` library that parses arguments,
//! initializes logging and dispatches the subcommand.

use anyhow::Result;
use clap::Parser;
use draftclass_cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so that `export` can stream JSON to stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_filter())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    draftclass_cli::run(&cli, &mut out)
}
