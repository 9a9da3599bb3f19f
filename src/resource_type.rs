//! Resource type taxonomy.
//!
//! Resource types form a forest of named categories (`GUN` > `MACHINEGUN`,
//! `WARE` > `FOOD`, ...). Prototypes name one in their `ResourceType`
//! attribute and some classes expect it to sit under a fixed category.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::IResult;
use crate::xml::{Node, XmlSource, expect_root};

pub const ROOT_TAG: &str = "ResourceTypes";
const TYPE_TAG: &str = "Type";

/// Insertion index of a resource type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u32);

impl ResourceId {
    pub fn raw(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug)]
struct ResourceType {
    name: String,
    parent: Option<ResourceId>,
}

#[derive(Clone, Debug, Default)]
pub struct ResourceTypeRegistry {
    types: Vec<ResourceType>,
    by_name: HashMap<String, ResourceId>,
}

impl ResourceTypeRegistry {
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
        registry.load_children(root, None);
        debug!(
            file = %source.path().display(),
            count = registry.len(),
            "loaded resource types"
        );
        Ok(registry)
    }

    fn load_children(&mut self, node: Node<'_, '_>, parent: Option<ResourceId>) {
        for child in node.children().filter(|c| c.is_element()) {
            if !child.has_tag_name(TYPE_TAG) {
                warn!(tag = child.tag_name().name(), "unexpected element in resource types");
                continue;
            }
            let Some(name) = child.attribute("Name") else {
                warn!("resource type without a Name, subtree skipped");
                continue;
            };
            let id = self.add(name, parent);
            self.load_children(child, Some(id));
        }
    }

    /// Registers `name` under `parent`. A name that is already registered
    /// keeps its first definition.
    pub fn add(&mut self, name: &str, parent: Option<ResourceId>) -> ResourceId {
        if let Some(existing) = self.by_name.get(name) {
            warn!(name, "duplicate resource type ignored");
            return *existing;
        }
        let id = ResourceId(self.types.len() as u32);
        self.types.push(ResourceType {
            name: name.to_string(),
            parent,
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn id_of(&self, name: &str) -> Option<ResourceId> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: ResourceId) -> Option<&str> {
        self.types.get(id.index()).map(|t| t.name.as_str())
    }

    pub fn parent_of(&self, id: ResourceId) -> Option<ResourceId> {
        self.types.get(id.index()).and_then(|t| t.parent)
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: ResourceId) -> impl Iterator<Item = ResourceId> + '_ {
        std::iter::successors(self.parent_of(id), move |current| self.parent_of(*current))
    }

    /// `true` if `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: ResourceId, id: ResourceId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// `true` if `id` is `kind` or lies below it.
    pub fn is_kind_of(&self, id: ResourceId, kind: ResourceId) -> bool {
        id == kind || self.is_ancestor(kind, id)
    }

    pub fn children(&self, id: ResourceId) -> impl Iterator<Item = ResourceId> + '_ {
        self.ids().filter(move |child| self.parent_of(*child) == Some(id))
    }

    pub fn roots(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.ids().filter(move |id| self.parent_of(*id).is_none())
    }

    pub fn ids(&self) -> impl Iterator<Item = ResourceId> + '_ {
        (0..self.types.len() as u32).map(ResourceId)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
