//! Affix groups: named prefix/suffix modifiers that vehicle parts and wares
//! can roll when `ApplyAffixes` is on.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::IResult;
use crate::xml::{XmlSource, child_elements, expect_root};

pub const ROOT_TAG: &str = "Affixes";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AffixKind {
    Prefix,
    Suffix,
}

impl AffixKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "prefix" => Some(Self::Prefix),
            "suffix" => Some(Self::Suffix),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Affix {
    pub name: String,
    pub kind: AffixKind,
    pub modifier: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AffixGroup {
    pub name: String,
    pub affixes: Vec<Affix>,
}

impl AffixGroup {
    pub fn affix(&self, name: &str) -> Option<&Affix> {
        self.affixes.iter().find(|a| a.name == name)
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &Affix> {
        self.affixes.iter().filter(|a| a.kind == AffixKind::Prefix)
    }

    pub fn suffixes(&self) -> impl Iterator<Item = &Affix> {
        self.affixes.iter().filter(|a| a.kind == AffixKind::Suffix)
    }
}

#[derive(Clone, Debug, Default)]
pub struct AffixRegistry {
    groups: Vec<AffixGroup>,
    by_name: HashMap<String, usize>,
}

impl AffixRegistry {
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

        let mut registry = Self::new();
        for group_node in child_elements(root, "AffixGroup") {
            let Some(group_name) = group_node.attribute("Name") else {
                warn!("affix group without a Name skipped");
                continue;
            };
            let mut group = AffixGroup {
                name: group_name.to_string(),
                affixes: Vec::new(),
            };
            for affix_node in child_elements(group_node, "Affix") {
                let name = affix_node.attribute("Name");
                let kind = affix_node.attribute("Type").and_then(AffixKind::from_name);
                match (name, kind) {
                    (Some(name), Some(kind)) => group.affixes.push(Affix {
                        name: name.to_string(),
                        kind,
                        modifier: affix_node.attribute("Modifier").map(str::to_string),
                    }),
                    _ => warn!(group = group_name, "affix without a valid Name and Type skipped"),
                }
            }
            registry.add_group(group);
        }
        debug!(
            file = %source.path().display(),
            groups = registry.groups.len(),
            "loaded affixes"
        );
        Ok(registry)
    }

    pub fn add_group(&mut self, group: AffixGroup) {
        if self.by_name.contains_key(&group.name) {
            warn!(group = %group.name, "duplicate affix group ignored");
            return;
        }
        self.by_name.insert(group.name.clone(), self.groups.len());
        self.groups.push(group);
    }

    pub fn group(&self, name: &str) -> Option<&AffixGroup> {
        self.by_name.get(name).map(|&i| &self.groups[i])
    }

    pub fn contains_group(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn groups(&self) -> &[AffixGroup] {
        &self.groups
    }
}
