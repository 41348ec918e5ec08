//! Gavel CLI binary.
//!
//! Entry point for the `gavel` command-line tool. It initializes logging via
//! `tracing`, parses arguments with `clap`, and dispatches to the command
//! handlers.

mod cli;
mod commands;

use miette::Result;

/// Filter used with `--verbose` when `RUST_LOG` is not set.
const VERBOSE_FILTER: &str =
    "warn,gavel_core=debug,gavel_maven=debug,gavel_resolver=debug,gavel_ops=debug";

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::parse();

    let default_filter = if args.verbose { VERBOSE_FILTER } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    commands::dispatch(args).await
}
