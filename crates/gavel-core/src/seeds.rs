//! Seed input: one `group:artifact:version` per line.

use std::path::Path;

use gavel_util::errors::GavelError;

use crate::coordinate::Coordinate;

/// Coordinates accepted from a seed file and the lines that were rejected.
#[derive(Debug, Default)]
pub struct SeedInput {
    pub coordinates: Vec<Coordinate>,
    pub rejected: Vec<GavelError>,
}

/// Read seeds from `path`.
pub fn read_seeds(path: &Path) -> miette::Result<SeedInput> {
    let content = std::fs::read_to_string(path).map_err(|e| GavelError::Config {
        message: format!("Failed to read input {}: {e}", path.display()),
    })?;
    Ok(parse_seeds(&content))
}

/// Parse seed file content.
///
/// Blank lines and `#` comments are skipped. A line must contain exactly two
/// `:` separators and three non-empty parts; anything else is rejected as
/// [`GavelError::MalformedCoordinate`] without stopping the rest.
pub fn parse_seeds(content: &str) -> SeedInput {
    let mut input = SeedInput::default();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.matches(':').count() != 2 {
            input.rejected.push(GavelError::MalformedCoordinate {
                input: line.to_string(),
            });
            continue;
        }
        match Coordinate::parse(line) {
            Ok(coordinate) => input.coordinates.push(coordinate),
            Err(e) => input.rejected.push(e),
        }
    }
    input
}
