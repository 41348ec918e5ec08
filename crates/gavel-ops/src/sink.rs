//! Result sink: the resolved coordinates, one per line.

use std::io::Write;
use std::path::Path;

use gavel_util::errors::GavelError;
use gavel_util::fs::ensure_parent_dir;

/// Destination name that means standard output.
pub const STDOUT: &str = "-";

/// Render coordinates sorted lexicographically, each followed by a newline.
pub fn render<I, S>(coordinates: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lines: Vec<String> = coordinates
        .into_iter()
        .map(|c| c.as_ref().to_string())
        .collect();
    lines.sort();
    lines.dedup();

    let mut out = String::new();
    for line in &lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Write `coordinates` to `destination`, or to stdout when it is `-`.
///
/// Parent directories of a file destination are created.
pub fn write_coordinates<I, S>(coordinates: I, destination: &Path) -> miette::Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let content = render(coordinates);
    if destination.as_os_str() == STDOUT {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(content.as_bytes()).map_err(GavelError::Io)?;
        stdout.flush().map_err(GavelError::Io)?;
        return Ok(());
    }

    ensure_parent_dir(destination).map_err(GavelError::Io)?;
    std::fs::write(destination, content).map_err(|e| GavelError::Generic {
        message: format!("Failed to write {}: {e}", destination.display()),
    })?;
    tracing::debug!("Wrote {}", destination.display());
    Ok(())
}
