//! Operation: resolve seed coordinates and write the transitive closure.

use std::path::PathBuf;
use std::sync::Arc;

use gavel_core::config::{Config, ConfigOverrides};
use gavel_core::seeds::read_seeds;
use gavel_maven::fetch::RepositoryFetcher;
use gavel_resolver::resolver::{Resolution, ResolveOptions, Resolver};
use gavel_util::errors::GavelError;
use gavel_util::progress::{status, status_error, status_info, status_warn};

use crate::sink;

/// Where to read from and write to, plus command-line overrides.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub config: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    pub overrides: ConfigOverrides,
}

impl Default for ResolveRequest {
    fn default() -> Self {
        Self {
            config: PathBuf::from("config.txt"),
            input: PathBuf::from("input.txt"),
            output: PathBuf::from("output.txt"),
            overrides: ConfigOverrides::default(),
        }
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveSummary {
    pub seeds: usize,
    pub resolved: usize,
    pub failures: usize,
}

/// Load config and seeds, resolve, and write the result.
///
/// The successful part of the resolution is always written. Recorded
/// failures make the call return an error after writing; in fail-fast mode
/// the first failure is returned and nothing is written.
pub async fn resolve(request: &ResolveRequest) -> miette::Result<ResolveSummary> {
    let loaded = Config::load(&request.config)?;
    for warning in &loaded.warnings {
        status_warn("Warning", &warning.to_string());
    }
    let mut config = loaded.config;
    config.apply(&request.overrides);
    tracing::debug!("Effective config: {config:?}");

    let seeds = read_seeds(&request.input)?;
    for rejected in &seeds.rejected {
        status_warn("Warning", &describe_rejected(rejected));
    }
    status_info(
        "Resolving",
        &format!("{} seeds against {}", seeds.coordinates.len(), config.repo_url),
    );

    let resolution = run(&config, seeds.coordinates.iter().cloned()).await?;

    sink::write_coordinates(resolution.resolved.keys(), &request.output)?;

    let summary = ResolveSummary {
        seeds: seeds.coordinates.len(),
        resolved: resolution.resolved.len(),
        failures: resolution.failures.len(),
    };
    report(&resolution, &summary);

    if !resolution.is_complete() {
        return Err(GavelError::Generic {
            message: format!(
                "{} coordinate(s) could not be resolved; partial results written to {}",
                summary.failures,
                request.output.display()
            ),
        }
        .into());
    }
    Ok(summary)
}

/// Resolve `seeds` against the repository described by `config`.
pub async fn run(
    config: &Config,
    seeds: impl IntoIterator<Item = gavel_core::coordinate::Coordinate>,
) -> miette::Result<Resolution> {
    let fetcher = RepositoryFetcher::from_config(config)?;
    if fetcher.repository().has_auth() {
        tracing::debug!("Using credentials for {}", fetcher.repository().url);
    }
    let resolver = Arc::new(Resolver::new(fetcher, ResolveOptions::from(config)));
    resolver.resolve_all(seeds).await?;
    Ok(resolver.resolution())
}

fn describe_rejected(error: &GavelError) -> String {
    match error {
        GavelError::MalformedCoordinate { input } => format!("Invalid GAV coordinate: {input}"),
        other => other.to_string(),
    }
}

fn report(resolution: &Resolution, summary: &ResolveSummary) {
    for failure in &resolution.failures {
        status_error("Failed", &format!("{}: {}", failure.coordinate, failure.error));
    }
    status(
        "Resolved",
        &format!(
            "{} coordinates from {} seeds",
            summary.resolved, summary.seeds
        ),
    );
}
