//! Effective property tables and `${token}` substitution.
//!
//! Substitution is single-pass: text produced by replacing a placeholder is
//! never scanned again, so `${a}` where `a = ${b}` stays as whatever `a`
//! held after its own pass. Unknown keys are replaced with nothing.

use std::collections::{BTreeMap, HashSet};

use gavel_core::descriptor::Descriptor;

use crate::resolved::DescriptorSource;

/// Property name to value.
pub type Properties = BTreeMap<String, String>;

/// Build the property table in effect for `descriptor`.
///
/// Ancestors come first (nearest parent last, so it wins), then the
/// descriptor's own properties, then the `project.*` built-ins. A parent that
/// is not available contributes only `project.parent.*`. Each level gets one
/// substitution pass over its values.
pub fn effective_properties<S>(descriptor: &Descriptor, source: &S) -> Properties
where
    S: DescriptorSource + ?Sized,
{
    let mut visited = HashSet::new();
    collect(descriptor, source, &mut visited)
}

fn collect<S>(descriptor: &Descriptor, source: &S, visited: &mut HashSet<String>) -> Properties
where
    S: DescriptorSource + ?Sized,
{
    visited.insert(descriptor.key());

    let mut props = Properties::new();
    if let Some(ref parent) = descriptor.parent {
        // A parent chain that loops back stops here.
        if !visited.contains(&parent.to_text()) {
            if let Some(parent_descriptor) = source.descriptor(parent) {
                props = collect(&parent_descriptor, source, visited);
            }
        }
        props.insert("project.parent.version".to_string(), parent.version.clone());
        props.insert("project.parent.groupId".to_string(), parent.group.clone());
    }

    props.extend(
        descriptor
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );

    let coordinate = &descriptor.coordinate;
    let group = descriptor
        .declared_group
        .clone()
        .or_else(|| descriptor.parent.as_ref().map(|p| p.group.clone()))
        .unwrap_or_else(|| coordinate.group.clone());
    props.insert("project.groupId".to_string(), group);
    props.insert("project.artifactId".to_string(), coordinate.artifact.clone());
    props.insert("project.version".to_string(), coordinate.version.clone());

    substitute_values(&mut props);
    props
}

/// One substitution pass over every value, reading from the table as it was
/// before the pass.
fn substitute_values(props: &mut Properties) {
    let snapshot = props.clone();
    for value in props.values_mut() {
        if value.contains("${") {
            *value = substitute(value, &snapshot);
        }
    }
}

/// Replace every `${key}` in `text` with `properties[key]`, or nothing if the
/// key is unknown.
///
/// A `${` without a closing `}` is left as is.
pub fn substitute(text: &str, properties: &Properties) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        let key = &rest[start + 2..start + 2 + len];
        out.push_str(&rest[..start]);
        if let Some(value) = properties.get(key) {
            out.push_str(value);
        }
        rest = &rest[start + 2 + len + 1..];
    }
    out.push_str(rest);
    out
}
