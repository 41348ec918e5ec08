mod common;

use common::{dep, dep_full, MemoryRepository, Pom};
use gavel_core::coordinate::Coordinate;
use gavel_resolver::imports::{find_first_match, import_coordinates, merge_imports};
use gavel_resolver::properties::effective_properties;
use gavel_resolver::resolved::DescriptorSource;

fn repo() -> MemoryRepository {
    MemoryRepository::new()
        .with(
            "g:app:1",
            &Pom::new()
                .property("first.version", "1")
                .managed(dep_full("g", "bom-first", "${first.version}", "import", false, &[]))
                .managed(dep("g", "not-a-bom", "1"))
                .managed(dep_full("g", "bom-second", "2", "import", false, &[]))
                .xml(),
        )
        .with(
            "g:bom-first:1",
            &Pom::new()
                .property("lib.version", "1.1")
                .managed(dep("org.lib", "lib", "${lib.version}"))
                .xml(),
        )
        .with(
            "g:bom-second:2",
            &Pom::new()
                .managed(dep("org.lib", "lib", "2.2"))
                .managed(dep("org.other", "other", "${project.version}"))
                .xml(),
        )
}

#[test]
fn import_coordinates_are_substituted_in_order() {
    let descriptors = repo().descriptors();
    let app = descriptors
        .descriptor(&Coordinate::parse("g:app:1").unwrap())
        .unwrap();
    let props = effective_properties(&app, &descriptors);

    let imports: Vec<String> = import_coordinates(&app, &props)
        .into_iter()
        .map(|c| c.unwrap().to_text())
        .collect();
    assert_eq!(imports, vec!["g:bom-first:1", "g:bom-second:2"]);
}

#[test]
fn merged_table_keeps_order_and_duplicates() {
    let descriptors = repo().descriptors();
    let app = descriptors
        .descriptor(&Coordinate::parse("g:app:1").unwrap())
        .unwrap();
    let props = effective_properties(&app, &descriptors);

    let table = merge_imports(&app, &props, &descriptors);
    assert_eq!(table.len(), 3);
    assert_eq!(find_first_match(&table, "org.lib", "lib").unwrap().version, "1.1");
    assert_eq!(find_first_match(&table, "org.other", "other").unwrap().version, "2");
    assert!(find_first_match(&table, "g", "not-a-bom").is_none());
}

#[test]
fn unresolvable_import_is_malformed() {
    let descriptors = MemoryRepository::new()
        .with(
            "g:app:1",
            &Pom::new()
                .managed(dep_full("g", "bom", "${undefined}", "import", false, &[]))
                .xml(),
        )
        .descriptors();
    let app = descriptors
        .descriptor(&Coordinate::parse("g:app:1").unwrap())
        .unwrap();
    let props = effective_properties(&app, &descriptors);

    let imports = import_coordinates(&app, &props);
    assert_eq!(imports.len(), 1);
    assert!(imports[0].is_err());
    assert!(merge_imports(&app, &props, &descriptors).is_empty());
}
