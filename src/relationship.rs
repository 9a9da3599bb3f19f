//! Belongs (faction ids) and the tolerance between them.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::IResult;
use crate::xml::{AttrValue, XmlSource, expect_root};

pub const ROOT_TAG: &str = "Relationships";

#[derive(Clone, Debug, Default)]
pub struct RelationshipTable {
    belongs: BTreeMap<i32, String>,
    tolerance: HashMap<(i32, i32), f32>,
}

fn ordered(a: i32, b: i32) -> (i32, i32) {
    if a <= b { (a, b) } else { (b, a) }
}

impl RelationshipTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file(path: &Path) -> IResult<Self> {
        let source = XmlSource::read(path)?;
        Self::from_source(&source)
    }

    pub fn from_source(source: &XmlSource) -> IResult<Self> {
        let doc = source.document()?;
        let root = expect_root(&doc, source.path(), ROOT_TAG)?;

        let mut table = Self::new();
        for node in root.children().filter(|c| c.is_element()) {
            match node.tag_name().name() {
                "Belong" => {
                    let id = node.attribute("Id").and_then(i32::parse_attr);
                    match (id, node.attribute("Name")) {
                        (Some(id), Some(name)) => table.add_belong(id, name),
                        _ => warn!("belong without a valid Id and Name skipped"),
                    }
                }
                "Tolerance" => {
                    let a = node.attribute("Belong1").and_then(i32::parse_attr);
                    let b = node.attribute("Belong2").and_then(i32::parse_attr);
                    let value = node.attribute("Value").and_then(f32::parse_attr);
                    match (a, b, value) {
                        (Some(a), Some(b), Some(value)) => table.set_tolerance(a, b, value),
                        _ => warn!("tolerance without valid Belong1, Belong2 and Value skipped"),
                    }
                }
                other => warn!(tag = other, "unexpected element in relationships"),
            }
        }
        debug!(
            file = %source.path().display(),
            belongs = table.belongs.len(),
            "loaded relationships"
        );
        Ok(table)
    }

    pub fn add_belong(&mut self, id: i32, name: &str) {
        if self.belongs.contains_key(&id) {
            warn!(id, name, "duplicate belong ignored");
            return;
        }
        self.belongs.insert(id, name.to_string());
    }

    pub fn set_tolerance(&mut self, a: i32, b: i32, value: f32) {
        for id in [a, b] {
            if !self.contains(id) {
                warn!(belong = id, "tolerance refers to an unknown belong");
            }
        }
        self.tolerance.insert(ordered(a, b), value);
    }

    pub fn contains(&self, id: i32) -> bool {
        self.belongs.contains_key(&id)
    }

    pub fn name_of(&self, id: i32) -> Option<&str> {
        self.belongs.get(&id).map(String::as_str)
    }

    /// Symmetric: `tolerance(a, b) == tolerance(b, a)`.
    pub fn tolerance(&self, a: i32, b: i32) -> Option<f32> {
        self.tolerance.get(&ordered(a, b)).copied()
    }

    pub fn belongs(&self) -> impl Iterator<Item = (i32, &str)> {
        self.belongs.iter().map(|(id, name)| (*id, name.as_str()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tolerance_is_symmetric() {
        let source = XmlSource::from_text(
            "relationships.xml",
            r#"<Relationships>
                <Belong Id="1" Name="player"/>
                <Belong Id="2" Name="bandits"/>
                <Tolerance Belong1="2" Belong2="1" Value="-10"/>
            </Relationships>"#
                .to_string(),
        );
        let table = RelationshipTable::from_source(&source).unwrap();

        assert!(table.contains(1));
        assert!(!table.contains(3));
        assert_eq!(table.name_of(2), Some("bandits"));
        assert_eq!(table.tolerance(1, 2), Some(-10.0));
        assert_eq!(table.tolerance(2, 1), Some(-10.0));
        assert_eq!(table.tolerance(1, 1), None);
        assert_eq!(table.belongs().count(), 2);
    }
}
