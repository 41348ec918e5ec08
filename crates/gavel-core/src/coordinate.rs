//! `group:artifact:version` coordinates.

use std::fmt;
use std::str::FromStr;

use gavel_util::errors::GavelError;

/// Identifies one artifact in a repository.
///
/// Equality and hashing use the exact triple, so two versions of the same
/// artifact are distinct coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl Coordinate {
    /// Build a coordinate from its parts, rejecting empty parts.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, GavelError> {
        let coordinate = Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        };
        if coordinate.is_complete() {
            Ok(coordinate)
        } else {
            Err(GavelError::MalformedCoordinate {
                input: coordinate.to_string(),
            })
        }
    }

    /// Parse `"group:artifact:version"`.
    ///
    /// Fails unless the text splits into exactly three non-empty segments.
    pub fn parse(text: &str) -> Result<Self, GavelError> {
        let malformed = || GavelError::MalformedCoordinate {
            input: text.to_string(),
        };
        let parts: Vec<&str> = text.split(':').collect();
        let [group, artifact, version] = parts.as_slice() else {
            return Err(malformed());
        };
        Self::new(*group, *artifact, *version).map_err(|_| malformed())
    }

    /// Whether all three parts are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.group.is_empty() && !self.artifact.is_empty() && !self.version.is_empty()
    }

    /// Repository-relative path of this artifact's files, without extension.
    ///
    /// `org.example:lib:1.0` becomes `org/example/lib/1.0/lib-1.0`.
    pub fn repository_path(&self) -> String {
        format!(
            "{}/{}/{}/{}-{}",
            self.group.replace('.', "/"),
            self.artifact,
            self.version,
            self.artifact,
            self.version
        )
    }

    /// Canonical `group:artifact:version` text, used as the resolved-set key.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Whether this coordinate names the given group and artifact.
    pub fn is(&self, group: &str, artifact: &str) -> bool {
        self.group == group && self.artifact == artifact
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

impl FromStr for Coordinate {
    type Err = GavelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
