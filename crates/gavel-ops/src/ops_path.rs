//! Operation: show where a coordinate lives in the repository.

use std::path::Path;

use gavel_core::config::{Config, ConfigOverrides};
use gavel_core::coordinate::Coordinate;
use gavel_maven::repository::Repository;
use gavel_util::errors::GavelResult;

/// Repository-relative path and full descriptor URL of one coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateLocation {
    pub path: String,
    pub url: String,
}

/// Locate `coordinate` against the configured repository.
///
/// The config file is optional here; without it the defaults plus
/// `overrides` apply.
pub fn locate(
    coordinate: &str,
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> GavelResult<CoordinateLocation> {
    let coordinate = Coordinate::parse(coordinate)?;
    let mut config = match config_path {
        Some(path) if path.is_file() => Config::load(path)?.config,
        _ => Config::default(),
    };
    config.apply(overrides);

    let repo = Repository::from_config(&config);
    Ok(CoordinateLocation {
        path: format!("{}.pom", coordinate.repository_path()),
        url: repo.descriptor_url(&coordinate),
    })
}
