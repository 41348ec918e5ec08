//! Parsed artifact metadata: parent reference, properties, dependency
//! declarations and the dependency-management table.

use std::collections::BTreeMap;

use crate::coordinate::Coordinate;
use crate::IMPORT_SCOPE;

/// One fetched and parsed descriptor (POM).
///
/// Identified by the coordinate used to fetch it and never mutated after the
/// resolver publishes it.
#[derive(Debug, Clone)]
pub struct Descriptor {
    /// Coordinate this descriptor was fetched for.
    pub coordinate: Coordinate,
    /// `<groupId>` as declared, if any (children often inherit it).
    pub declared_group: Option<String>,
    pub packaging: Option<String>,
    pub parent: Option<Coordinate>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<DependencyDecl>,
    pub managed_dependencies: Vec<DependencyDecl>,
}

impl Descriptor {
    /// An empty descriptor for `coordinate`.
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            declared_group: None,
            packaging: None,
            parent: None,
            properties: BTreeMap::new(),
            dependencies: Vec::new(),
            managed_dependencies: Vec::new(),
        }
    }

    /// Resolved-set key of this descriptor.
    pub fn key(&self) -> String {
        self.coordinate.to_text()
    }

    /// First dependency-management entry declared here for `group:artifact`.
    pub fn managed_entry(&self, group: &str, artifact: &str) -> Option<&DependencyDecl> {
        self.managed_dependencies
            .iter()
            .find(|d| d.is(group, artifact))
    }

    /// Managed entries with `import` scope, in declaration order.
    pub fn imports(&self) -> impl Iterator<Item = &DependencyDecl> {
        self.managed_dependencies.iter().filter(|d| d.is_import())
    }
}

/// A dependency as declared, either in `<dependencies>` or in
/// `<dependencyManagement>`.
///
/// Version and scope may be blank until defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyDecl {
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub scope: String,
    pub optional: bool,
    pub type_: Option<String>,
    pub classifier: Option<String>,
    pub exclusions: Vec<Exclusion>,
}

impl DependencyDecl {
    /// A declaration with only group, artifact and version filled in.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_exclusion(mut self, exclusion: Exclusion) -> Self {
        self.exclusions.push(exclusion);
        self
    }

    /// Whether this declaration names `group:artifact`.
    pub fn is(&self, group: &str, artifact: &str) -> bool {
        self.group == group && self.artifact == artifact
    }

    /// Whether this is a BOM import entry.
    pub fn is_import(&self) -> bool {
        self.scope == IMPORT_SCOPE
    }
}

/// A `(group, artifact)` pair that suppresses a transitive dependency.
///
/// An artifact of `*` or blank matches every artifact in the group, and a
/// group of `*` matches every group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Exclusion {
    pub group: String,
    pub artifact: String,
}

impl Exclusion {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
        }
    }

    pub fn matches(&self, group: &str, artifact: &str) -> bool {
        let group_matches = self.group == "*" || self.group == group;
        let artifact_matches =
            self.artifact.is_empty() || self.artifact == "*" || self.artifact == artifact;
        group_matches && artifact_matches
    }
}
