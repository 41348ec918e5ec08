//! Handler for `gavel resolve`.

use std::path::PathBuf;

use gavel_core::config::ConfigOverrides;
use gavel_ops::ops_resolve::{self, ResolveRequest};
use miette::Result;

pub async fn exec(
    config: PathBuf,
    input: PathBuf,
    output: PathBuf,
    overrides: ConfigOverrides,
) -> Result<()> {
    let request = ResolveRequest {
        config,
        input,
        output,
        overrides,
    };
    ops_resolve::resolve(&request).await?;
    Ok(())
}
