//! Handler for `gavel path`.

use std::path::Path;

use console::Style;
use gavel_core::config::ConfigOverrides;
use miette::Result;

pub fn exec(coordinate: &str, config: &Path, overrides: &ConfigOverrides) -> Result<()> {
    let location = gavel_ops::ops_path::locate(coordinate, Some(config), overrides)?;
    let bold = Style::new().bold();
    println!("{} {}", bold.apply_to("path:"), location.path);
    println!("{} {}", bold.apply_to("url: "), location.url);
    Ok(())
}
