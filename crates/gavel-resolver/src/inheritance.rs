//! Dependency-management lookups along the parent chain.

use std::collections::HashSet;
use std::sync::Arc;

use gavel_core::descriptor::{DependencyDecl, Descriptor};

use crate::properties::{substitute, Properties};
use crate::resolved::DescriptorSource;

/// First managed entry for `group:artifact`, searching `start` and then each
/// ancestor in turn.
///
/// Ancestors that are not available end the search, as does a chain that
/// loops back on itself.
pub fn find_managed_entry<S>(
    group: &str,
    artifact: &str,
    start: &Descriptor,
    source: &S,
) -> Option<DependencyDecl>
where
    S: DescriptorSource + ?Sized,
{
    if let Some(entry) = start.managed_entry(group, artifact) {
        return Some(entry.clone());
    }

    let mut visited = HashSet::from([start.key()]);
    let mut next = start.parent.clone();
    while let Some(parent) = next.take() {
        if !visited.insert(parent.to_text()) {
            break;
        }
        let descriptor: Arc<Descriptor> = source.descriptor(&parent)?;
        if let Some(entry) = descriptor.managed_entry(group, artifact) {
            return Some(entry.clone());
        }
        next = descriptor.parent.clone();
    }
    None
}

/// Defaults (scope, version, optional, exclusions) that `owner`'s ancestry
/// declares for `group:artifact`.
///
/// The managed version is substituted with `owner_properties`. The returned
/// entry is a copy; nothing the caller declared is touched.
pub fn inherited_defaults<S>(
    group: &str,
    artifact: &str,
    owner: &Descriptor,
    owner_properties: &Properties,
    source: &S,
) -> Option<DependencyDecl>
where
    S: DescriptorSource + ?Sized,
{
    let mut entry = find_managed_entry(group, artifact, owner, source)?;
    if entry.version.contains("${") {
        entry.version = substitute(&entry.version, owner_properties);
    }
    Some(entry)
}
