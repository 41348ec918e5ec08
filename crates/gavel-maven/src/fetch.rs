//! Descriptor fetching: coordinate in, parsed [`Descriptor`] out.

use std::future::Future;

use gavel_core::config::Config;
use gavel_core::coordinate::Coordinate;
use gavel_core::descriptor::Descriptor;
use gavel_util::errors::GavelError;
use gavel_util::progress::status;
use reqwest::Client;

use crate::download;
use crate::pom;
use crate::repository::Repository;

/// Produces the descriptor for a coordinate.
///
/// The resolver calls this at most once per distinct coordinate.
pub trait DescriptorFetcher: Send + Sync + 'static {
    fn fetch(
        &self,
        coordinate: &Coordinate,
    ) -> impl Future<Output = Result<Descriptor, GavelError>> + Send;
}

/// Fetches POMs from a single Maven repository over HTTP or `file://`.
#[derive(Debug, Clone)]
pub struct RepositoryFetcher {
    client: Client,
    repo: Repository,
}

impl RepositoryFetcher {
    pub fn new(client: Client, repo: Repository) -> Self {
        Self { client, repo }
    }

    /// Build a fetcher (and its HTTP client) from a run configuration.
    pub fn from_config(config: &Config) -> Result<Self, GavelError> {
        let client = download::build_client(config.timeout)?;
        Ok(Self::new(client, Repository::from_config(config)))
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }
}

impl DescriptorFetcher for RepositoryFetcher {
    async fn fetch(&self, coordinate: &Coordinate) -> Result<Descriptor, GavelError> {
        let url = self.repo.descriptor_url(coordinate);
        status("Fetching", &url);

        let bytes = match self.repo.local_descriptor_path(coordinate) {
            Some(path) => download::read_local(&path, &url).await?,
            None => download::download_bytes(&self.client, &self.repo, &url).await?,
        };
        tracing::debug!("Fetched {} bytes for {coordinate}", bytes.len());

        pom::parse_descriptor(coordinate, &bytes)
    }
}
