use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all gavel operations.
#[derive(Debug, Error, Diagnostic)]
pub enum GavelError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Text that should be a `group:artifact:version` coordinate is not one.
    #[error("Malformed coordinate: {input}")]
    #[diagnostic(help("Coordinates are written as group:artifact:version with no empty part"))]
    MalformedCoordinate { input: String },

    /// The descriptor could not be retrieved from the repository.
    #[error("Fetch failed for {url}: {message}")]
    FetchFailed { url: String, message: String },

    /// The retrieved descriptor is not valid POM XML.
    #[error("Parse failed for {coordinate}: {message}")]
    ParseFailed { coordinate: String, message: String },

    /// A config file line names a property gavel does not know.
    #[error("Unrecognized config property: {key}")]
    InvalidConfigProperty { key: String },

    /// A coordinate was reached through more edges than the configured ceiling.
    #[error("Resolution too deep at {coordinate} (depth {depth})")]
    #[diagnostic(help("Raise `maxdepth` in the config or pass a larger --max-depth"))]
    ResolutionTooDeep { coordinate: String, depth: usize },

    /// Invalid configuration value.
    #[error("Config error: {message}")]
    #[diagnostic(help("Check your config file for `name = value` lines"))]
    Config { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

impl GavelError {
    /// Whether this error belongs to a single coordinate (and can be skipped)
    /// rather than to the run as a whole.
    pub fn is_per_coordinate(&self) -> bool {
        matches!(
            self,
            Self::MalformedCoordinate { .. }
                | Self::FetchFailed { .. }
                | Self::ParseFailed { .. }
                | Self::ResolutionTooDeep { .. }
        )
    }
}

/// Convenience alias for `miette::Result<T>`.
pub type GavelResult<T> = miette::Result<T>;
