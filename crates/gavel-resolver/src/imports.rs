//! BOM imports: managed entries with `import` scope pull in the managed
//! table of another descriptor.

use gavel_core::coordinate::Coordinate;
use gavel_core::descriptor::{DependencyDecl, Descriptor};
use gavel_util::errors::GavelError;

use crate::properties::{effective_properties, substitute, Properties};
use crate::resolved::DescriptorSource;

/// Coordinates of the BOMs `descriptor` imports, in declaration order.
///
/// Group and version are substituted with the importer's `properties`; an
/// import that still has an empty part is a `MalformedCoordinate`.
pub fn import_coordinates(
    descriptor: &Descriptor,
    properties: &Properties,
) -> Vec<Result<Coordinate, GavelError>> {
    descriptor
        .imports()
        .map(|entry| import_coordinate(entry, properties))
        .collect()
}

fn import_coordinate(
    entry: &DependencyDecl,
    properties: &Properties,
) -> Result<Coordinate, GavelError> {
    Coordinate::new(
        substitute(&entry.group, properties),
        entry.artifact.clone(),
        substitute(&entry.version, properties),
    )
}

/// Concatenate the managed tables of every imported BOM.
///
/// Imports contribute in declaration order, each with its entries in declared
/// order; duplicates are kept. Entries are substituted with the BOM's own
/// effective properties. BOMs that are not available contribute nothing.
pub fn merge_imports<S>(
    descriptor: &Descriptor,
    properties: &Properties,
    source: &S,
) -> Vec<DependencyDecl>
where
    S: DescriptorSource + ?Sized,
{
    let mut merged = Vec::new();
    for entry in descriptor.imports() {
        let Ok(coordinate) = import_coordinate(entry, properties) else {
            continue;
        };
        let Some(bom) = source.descriptor(&coordinate) else {
            tracing::debug!("Import {coordinate} of {} is not available", descriptor.key());
            continue;
        };
        let bom_properties = effective_properties(&bom, source);
        merged.extend(bom.managed_dependencies.iter().map(|managed| {
            let mut managed = managed.clone();
            managed.group = substitute(&managed.group, &bom_properties);
            managed.version = substitute(&managed.version, &bom_properties);
            managed
        }));
    }
    merged
}

/// First entry of an import table for `group:artifact`.
pub fn find_first_match<'a>(
    table: &'a [DependencyDecl],
    group: &str,
    artifact: &str,
) -> Option<&'a DependencyDecl> {
    table.iter().find(|d| d.is(group, artifact))
}
