#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use gavel_core::coordinate::Coordinate;
use gavel_core::descriptor::Descriptor;
use gavel_maven::fetch::DescriptorFetcher;
use gavel_maven::pom::parse_descriptor_str;
use gavel_util::errors::GavelError;

/// In-memory repository serving POM text by coordinate and recording every
/// fetch. Clones share the fetch log.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    poms: HashMap<String, String>,
    fetches: Arc<Mutex<Vec<String>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, coordinate: &str, xml: &str) -> Self {
        self.poms.insert(coordinate.to_string(), xml.to_string());
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn fetch_count(&self, coordinate: &str) -> usize {
        self.fetched().iter().filter(|c| *c == coordinate).count()
    }

    /// Parse every POM into a lookup table for the pure resolver functions.
    pub fn descriptors(&self) -> HashMap<String, Arc<Descriptor>> {
        self.poms
            .iter()
            .map(|(key, xml)| {
                let coordinate = Coordinate::parse(key).unwrap();
                let descriptor = parse_descriptor_str(&coordinate, xml).unwrap();
                (key.clone(), Arc::new(descriptor))
            })
            .collect()
    }
}

impl DescriptorFetcher for MemoryRepository {
    async fn fetch(&self, coordinate: &Coordinate) -> Result<Descriptor, GavelError> {
        let key = coordinate.to_text();
        self.fetches.lock().unwrap().push(key.clone());
        tokio::task::yield_now().await;
        match self.poms.get(&key) {
            Some(xml) => parse_descriptor_str(coordinate, xml),
            None => Err(GavelError::FetchFailed {
                url: format!("mem://{}.pom", coordinate.repository_path()),
                message: "HTTP 404 Not Found".to_string(),
            }),
        }
    }
}

/// A `<dependency>` element.
pub fn dep(group: &str, artifact: &str, version: &str) -> String {
    dep_full(group, artifact, version, "", false, &[])
}

/// A `<dependency>` element with scope, optional flag and exclusions.
pub fn dep_full(
    group: &str,
    artifact: &str,
    version: &str,
    scope: &str,
    optional: bool,
    exclusions: &[(&str, &str)],
) -> String {
    let mut xml =
        format!("<dependency><groupId>{group}</groupId><artifactId>{artifact}</artifactId>");
    if !version.is_empty() {
        xml.push_str(&format!("<version>{version}</version>"));
    }
    if !scope.is_empty() {
        xml.push_str(&format!("<scope>{scope}</scope>"));
    }
    if optional {
        xml.push_str("<optional>true</optional>");
    }
    if !exclusions.is_empty() {
        xml.push_str("<exclusions>");
        for (g, a) in exclusions {
            xml.push_str(&format!(
                "<exclusion><groupId>{g}</groupId><artifactId>{a}</artifactId></exclusion>"
            ));
        }
        xml.push_str("</exclusions>");
    }
    xml.push_str("</dependency>");
    xml
}

/// Builder for a POM document.
#[derive(Default)]
pub struct Pom {
    parent: Option<String>,
    properties: BTreeMap<String, String>,
    dependencies: Vec<String>,
    managed: Vec<String>,
}

impl Pom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parent(mut self, coordinate: &str) -> Self {
        self.parent = Some(coordinate.to_string());
        self
    }

    pub fn property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }

    pub fn dependency(mut self, xml: String) -> Self {
        self.dependencies.push(xml);
        self
    }

    pub fn managed(mut self, xml: String) -> Self {
        self.managed.push(xml);
        self
    }

    pub fn xml(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\"?>\n<project>");
        if let Some(ref parent) = self.parent {
            let c = Coordinate::parse(parent).unwrap();
            xml.push_str(&format!(
                "<parent><groupId>{}</groupId><artifactId>{}</artifactId><version>{}</version></parent>",
                c.group, c.artifact, c.version
            ));
        }
        if !self.properties.is_empty() {
            xml.push_str("<properties>");
            for (k, v) in &self.properties {
                xml.push_str(&format!("<{k}>{v}</{k}>"));
            }
            xml.push_str("</properties>");
        }
        if !self.managed.is_empty() {
            xml.push_str("<dependencyManagement><dependencies>");
            for d in &self.managed {
                xml.push_str(d);
            }
            xml.push_str("</dependencies></dependencyManagement>");
        }
        if !self.dependencies.is_empty() {
            xml.push_str("<dependencies>");
            for d in &self.dependencies {
                xml.push_str(d);
            }
            xml.push_str("</dependencies>");
        }
        xml.push_str("</project>");
        xml
    }
}
