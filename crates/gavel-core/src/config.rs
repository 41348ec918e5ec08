//! Run configuration loaded from a `name = value` file.
//!
//! ```text
//! repourl  = https://repo.maven.apache.org/maven2
//! username = deploy
//! password = secret
//! timeout  = 30
//! jobs     = 8
//! maxdepth = 64
//! failfast = false
//! ```
//!
//! Names are case-insensitive. Unknown names are reported as
//! [`GavelError::InvalidConfigProperty`] warnings and otherwise ignored.

use std::path::Path;
use std::time::Duration;

use gavel_util::errors::GavelError;

/// Repository used when the config file does not name one.
pub const DEFAULT_REPO_URL: &str = "https://repo.maven.apache.org/maven2";

/// Default per-fetch timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of descriptor fetches in flight at once.
pub const DEFAULT_JOBS: usize = 8;

/// Everything a resolution run needs besides its seeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub repo_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
    pub jobs: usize,
    pub max_depth: Option<usize>,
    pub fail_fast: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo_url: DEFAULT_REPO_URL.to_string(),
            username: None,
            password: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            jobs: DEFAULT_JOBS,
            max_depth: None,
            fail_fast: false,
        }
    }
}

/// A parsed config plus the non-fatal problems found while reading it.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    pub warnings: Vec<GavelError>,
}

/// Values given on the command line; `Some` wins over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub repo_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: Option<u64>,
    pub jobs: Option<usize>,
    pub max_depth: Option<usize>,
    pub fail_fast: bool,
}

impl Config {
    /// Load and parse the config file at `path`.
    pub fn load(path: &Path) -> miette::Result<LoadedConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| GavelError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Ok(Self::parse(&content)?)
    }

    /// Parse config file content.
    ///
    /// Unknown names and lines that are not `name = value` become warnings;
    /// a known name with an unusable value is an error.
    pub fn parse(content: &str) -> Result<LoadedConfig, GavelError> {
        let mut config = Config::default();
        let mut warnings = Vec::new();

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((name, value)) = trimmed.split_once('=') else {
                warnings.push(GavelError::Config {
                    message: format!("Expected name = value, read {trimmed}"),
                });
                continue;
            };
            let name = name.trim().to_lowercase();
            let value = value.trim();

            match name.as_str() {
                "repourl" => config.repo_url = value.trim_end_matches('/').to_string(),
                "username" => config.username = non_empty(value),
                "password" => config.password = non_empty(value),
                "timeout" => config.timeout = Duration::from_secs(parse_number(&name, value)?),
                "jobs" => config.jobs = parse_number::<usize>(&name, value)?.max(1),
                "maxdepth" => config.max_depth = Some(parse_number(&name, value)?),
                "failfast" => config.fail_fast = parse_bool(&name, value)?,
                _ => warnings.push(GavelError::InvalidConfigProperty { key: name }),
            }
        }

        Ok(LoadedConfig { config, warnings })
    }

    /// Apply command-line overrides on top of file values.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref url) = overrides.repo_url {
            self.repo_url = url.trim_end_matches('/').to_string();
        }
        if overrides.username.is_some() {
            self.username = overrides.username.clone();
        }
        if overrides.password.is_some() {
            self.password = overrides.password.clone();
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(jobs) = overrides.jobs {
            self.jobs = jobs.max(1);
        }
        if overrides.max_depth.is_some() {
            self.max_depth = overrides.max_depth;
        }
        if overrides.fail_fast {
            self.fail_fast = true;
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, GavelError> {
    value.parse().map_err(|_| GavelError::Config {
        message: format!("`{name}` expects a non-negative number, read `{value}`"),
    })
}

fn parse_bool(name: &str, value: &str) -> Result<bool, GavelError> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(GavelError::Config {
            message: format!("`{name}` expects true or false, read `{value}`"),
        }),
    }
}
