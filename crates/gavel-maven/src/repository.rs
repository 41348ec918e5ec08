//! Maven repository abstraction: URL layout and credentials.

use std::path::PathBuf;

use gavel_core::config::Config;
use gavel_core::coordinate::Coordinate;

use crate::auth::Credentials;

/// Prefix of base URLs that point at a repository on the local filesystem.
pub const FILE_SCHEME: &str = "file://";

/// A configured Maven repository with optional credentials.
#[derive(Debug, Clone)]
pub struct Repository {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Repository {
    /// A repository without credentials.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            username: None,
            password: None,
        }
    }

    /// Build the repository described by a run configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            url: config.repo_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }

    /// URL of the POM for a coordinate.
    ///
    /// `com.example:app:1.0` becomes `<base>/com/example/app/1.0/app-1.0.pom`.
    pub fn descriptor_url(&self, coordinate: &Coordinate) -> String {
        format!("{}/{}.pom", self.url, coordinate.repository_path())
    }

    /// Filesystem path of a coordinate's POM for `file://` repositories.
    pub fn local_descriptor_path(&self, coordinate: &Coordinate) -> Option<PathBuf> {
        let root = self.url.strip_prefix(FILE_SCHEME)?;
        Some(PathBuf::from(format!(
            "{root}/{}.pom",
            coordinate.repository_path()
        )))
    }

    /// Whether this repository has authentication configured.
    pub fn has_auth(&self) -> bool {
        Credentials::of(self) != Credentials::Anonymous
    }
}
