//! POM reading: turns descriptor bytes into a [`Descriptor`].
//!
//! Only the parts the resolver consumes are kept: parent reference,
//! properties, dependencies and the dependency-management table.

use std::borrow::Cow;

use gavel_core::coordinate::Coordinate;
use gavel_core::descriptor::{DependencyDecl, Descriptor, Exclusion};
use gavel_util::errors::GavelError;
use quick_xml::events::Event;
use quick_xml::Reader;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Which list a `<dependency>` element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Dependencies,
    Managed,
}

/// Accumulators for elements that span several events.
#[derive(Default)]
struct ParseState {
    parent_group: String,
    parent_artifact: String,
    parent_version: String,
    dependency: Option<DependencyDecl>,
    exclusion: Option<Exclusion>,
}

/// Parse POM bytes fetched for `coordinate`.
pub fn parse_descriptor(coordinate: &Coordinate, bytes: &[u8]) -> Result<Descriptor, GavelError> {
    let xml = decode_document(bytes);
    parse_descriptor_str(coordinate, &xml)
}

/// Parse POM text fetched for `coordinate`.
pub fn parse_descriptor_str(
    coordinate: &Coordinate,
    xml: &str,
) -> Result<Descriptor, GavelError> {
    let parse_failed = |message: String| GavelError::ParseFailed {
        coordinate: coordinate.to_text(),
        message,
    };

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut descriptor = Descriptor::new(coordinate.clone());
    let mut state = ParseState::default();
    let mut path: Vec<String> = Vec::new();
    let mut text_buf = String::new();
    let mut saw_project = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if path.is_empty() {
                    if tag != "project" {
                        return Err(parse_failed(format!("expected <project>, found <{tag}>")));
                    }
                    saw_project = true;
                }
                path.push(tag);
                text_buf.clear();
                open_element(&path, &mut state);
            }
            Ok(Event::Empty(ref e)) => {
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if path.is_empty() {
                    if tag != "project" {
                        return Err(parse_failed(format!("expected <project>, found <{tag}/>")));
                    }
                    saw_project = true;
                    continue;
                }
                path.push(tag);
                open_element(&path, &mut state);
                close_element(&path, "", &mut state, &mut descriptor).map_err(parse_failed)?;
                path.pop();
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| parse_failed(format!("bad text content: {err}")))?;
                text_buf.push_str(&text);
            }
            Ok(Event::CData(e)) => {
                text_buf.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::End(_)) => {
                close_element(&path, text_buf.trim(), &mut state, &mut descriptor)
                    .map_err(parse_failed)?;
                path.pop();
                text_buf.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(parse_failed(format!(
                    "invalid XML at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    if !saw_project {
        return Err(parse_failed("no <project> element".to_string()));
    }
    Ok(descriptor)
}

/// Start accumulating dependencies and exclusions.
fn open_element(path: &[String], state: &mut ParseState) {
    if dependency_section(path).is_some() {
        state.dependency = Some(DependencyDecl::default());
    } else if is_exclusion(path) && state.dependency.is_some() {
        state.exclusion = Some(Exclusion::new("", ""));
    }
}

/// Store the text of a closing element.
///
/// Fails on a parent reference that names an artifact but lacks a group or
/// version.
fn close_element(
    path: &[String],
    text: &str,
    state: &mut ParseState,
    descriptor: &mut Descriptor,
) -> Result<(), String> {
    let depth = path.len();
    let Some(tag) = path.last().map(String::as_str) else {
        return Ok(());
    };
    let owner = &path[..depth - 1];

    // <project><properties><key>value</key></properties>
    if depth == 3 && path[1] == "properties" {
        descriptor
            .properties
            .insert(tag.to_string(), text.to_string());
        return Ok(());
    }

    if let Some(section) = dependency_section(path) {
        if let Some(dep) = state.dependency.take() {
            match section {
                Section::Dependencies => descriptor.dependencies.push(dep),
                Section::Managed => descriptor.managed_dependencies.push(dep),
            }
        }
        return Ok(());
    }

    if dependency_section(owner).is_some() {
        if let Some(ref mut dep) = state.dependency {
            match tag {
                "groupId" => dep.group = text.to_string(),
                "artifactId" => dep.artifact = text.to_string(),
                "version" => dep.version = text.to_string(),
                "scope" => dep.scope = text.to_string(),
                "optional" => dep.optional = text.eq_ignore_ascii_case("true"),
                "type" => dep.type_ = Some(text.to_string()),
                "classifier" => dep.classifier = Some(text.to_string()),
                _ => {}
            }
        }
        return Ok(());
    }

    if is_exclusion(path) {
        if let (Some(dep), Some(excl)) = (state.dependency.as_mut(), state.exclusion.take()) {
            dep.exclusions.push(excl);
        }
        return Ok(());
    }

    if is_exclusion(owner) {
        if let Some(ref mut excl) = state.exclusion {
            match tag {
                "groupId" => excl.group = text.to_string(),
                "artifactId" => excl.artifact = text.to_string(),
                _ => {}
            }
        }
        return Ok(());
    }

    match path_context(path).as_str() {
        "project>groupId" => descriptor.declared_group = Some(text.to_string()),
        "project>packaging" => descriptor.packaging = Some(text.to_string()),
        "project>parent>groupId" => state.parent_group = text.to_string(),
        "project>parent>artifactId" => state.parent_artifact = text.to_string(),
        "project>parent>version" => state.parent_version = text.to_string(),
        "project>parent" => {
            // An empty artifactId means there is no parent.
            if !state.parent_artifact.is_empty() {
                let parent = Coordinate::new(
                    std::mem::take(&mut state.parent_group),
                    std::mem::take(&mut state.parent_artifact),
                    std::mem::take(&mut state.parent_version),
                )
                .map_err(|e| format!("incomplete parent reference: {e}"))?;
                descriptor.parent = Some(parent);
            }
        }
        _ => {}
    }
    Ok(())
}

/// The list a `<dependency>` element at `path` belongs to, if it is one.
fn dependency_section(path: &[String]) -> Option<Section> {
    match path_context(path).as_str() {
        "project>dependencies>dependency" => Some(Section::Dependencies),
        "project>dependencyManagement>dependencies>dependency" => Some(Section::Managed),
        _ => None,
    }
}

/// Whether `path` is an `<exclusion>` inside a dependency.
fn is_exclusion(path: &[String]) -> bool {
    match path {
        [owner @ .., exclusions, exclusion] => {
            exclusions == "exclusions"
                && exclusion == "exclusion"
                && dependency_section(owner).is_some()
        }
        _ => false,
    }
}

/// Build a context string from the current XML path for matching.
fn path_context(path: &[String]) -> String {
    path.join(">")
}

/// Decode descriptor bytes to text according to the XML declaration.
///
/// UTF-8 and ASCII are read as UTF-8, the Latin-1 family is mapped byte to
/// char, and any other declared encoding is assumed to be UTF-8 compatible
/// instead of being rejected.
pub fn decode_document(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match declared_encoding(bytes) {
        Some(label) if is_latin1_family(&label) => {
            Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect())
        }
        Some(label) if !is_utf8_compatible(&label) => {
            tracing::debug!("Unrecognized encoding `{label}`, reading as UTF-8");
            String::from_utf8_lossy(bytes)
        }
        _ => String::from_utf8_lossy(bytes),
    }
}

/// The `encoding` pseudo-attribute of the XML declaration, lowercased.
fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let decl = head.strip_prefix("<?xml")?;
    let decl = &decl[..decl.find("?>")?];
    let rest = &decl[decl.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    let end = value.find(quote)?;
    Some(value[..end].trim().to_ascii_lowercase())
}

fn is_utf8_compatible(label: &str) -> bool {
    matches!(label, "utf-8" | "utf8" | "us-ascii" | "ascii")
}

fn is_latin1_family(label: &str) -> bool {
    matches!(
        label,
        "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" | "l1" | "windows-1252" | "cp1252"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinate() -> Coordinate {
        Coordinate::parse("org.example:my-lib:1.0.0").unwrap()
    }

    #[test]
    fn declared_encoding_is_read() {
        let xml = br#"<?xml version="1.0" encoding='ISO-8859-1'?><project/>"#;
        assert_eq!(declared_encoding(xml).as_deref(), Some("iso-8859-1"));
        assert_eq!(declared_encoding(b"<project/>"), None);
    }

    #[test]
    fn latin1_bytes_are_decoded() {
        let mut xml = br#"<?xml version="1.0" encoding="ISO-8859-1"?><project><name>Caf"#.to_vec();
        xml.push(0xE9);
        xml.extend_from_slice(b"</name></project>");
        assert!(decode_document(&xml).contains("Caf\u{e9}"));
    }

    #[test]
    fn unknown_encoding_reads_as_utf8() {
        let xml = br#"<?xml version="1.0" encoding="x-made-up"?>
<project><groupId>org.example</groupId></project>"#;
        let descriptor = parse_descriptor(&coordinate(), xml).unwrap();
        assert_eq!(descriptor.declared_group.as_deref(), Some("org.example"));
    }

    #[test]
    fn bom_prefix_is_skipped() {
        let mut xml = UTF8_BOM.to_vec();
        xml.extend_from_slice(b"<project><packaging>pom</packaging></project>");
        let descriptor = parse_descriptor(&coordinate(), &xml).unwrap();
        assert_eq!(descriptor.packaging.as_deref(), Some("pom"));
    }

    #[test]
    fn non_project_root_fails() {
        let err = parse_descriptor_str(&coordinate(), "<html></html>").unwrap_err();
        assert!(matches!(err, GavelError::ParseFailed { .. }));
    }

    #[test]
    fn empty_document_fails() {
        assert!(parse_descriptor_str(&coordinate(), "").is_err());
    }
}
