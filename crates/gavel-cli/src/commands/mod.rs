//! Command dispatch and handler modules.

mod path;
mod resolve;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Resolve {
            config,
            input,
            output,
            overrides,
        } => resolve::exec(config, input, output, overrides.into()).await,
        Command::Path {
            coordinate,
            config,
            overrides,
        } => path::exec(&coordinate, &config, &overrides.into()),
    }
}
