use std::collections::HashMap;
use std::fmt;

use tracing::{error, warn};

use crate::prototypes::PrototypeClass;
use crate::xml::AttrValue;

/// Position of a prototype in its manager. Only stable within one load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrototypeId(u32);

impl PrototypeId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PrototypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A by-name link to another prototype.
///
/// Links are read as [`PrototypeRef::Pending`] and only bound to an id in
/// the post-load pass, once every file has been read. A name that does not
/// resolve is kept as [`PrototypeRef::Dangling`] so it can be reported and
/// saved back unchanged.
#[derive(Clone, Debug, Default)]
pub enum PrototypeRef {
    #[default]
    Unset,
    Pending(String),
    Resolved {
        name: String,
        id: PrototypeId,
    },
    Dangling(String),
}

impl PrototypeRef {
    pub fn pending(name: impl Into<String>) -> Self {
        PrototypeRef::Pending(name.into())
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            PrototypeRef::Unset => None,
            PrototypeRef::Pending(name)
            | PrototypeRef::Resolved { name, .. }
            | PrototypeRef::Dangling(name) => Some(name),
        }
    }

    pub fn id(&self) -> Option<PrototypeId> {
        match self {
            PrototypeRef::Resolved { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, PrototypeRef::Unset)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, PrototypeRef::Resolved { .. })
    }

    pub fn is_dangling(&self) -> bool {
        matches!(self, PrototypeRef::Dangling(_))
    }

    /// Binds the name against `index`.
    ///
    /// `expected` lists the classes the link may point at; an empty slice
    /// accepts any class. A target of another class is kept but warned
    /// about. Returns `false` when the name is unknown.
    pub fn resolve(
        &mut self,
        index: &NameIndex,
        owner: &str,
        field: &str,
        expected: &[PrototypeClass],
    ) -> bool {
        let Some(name) = self.name() else {
            return true;
        };
        let name = name.to_string();
        match index.get(&name) {
            Some((id, class)) => {
                if !expected.is_empty() && !expected.contains(&class) {
                    warn!(
                        prototype = owner,
                        field,
                        target = %name,
                        class = class.as_str(),
                        "reference points at a prototype of an unexpected class"
                    );
                }
                *self = PrototypeRef::Resolved { name, id };
                true
            }
            None => {
                error!(
                    prototype = owner,
                    field,
                    target = %name,
                    "unresolved prototype reference"
                );
                *self = PrototypeRef::Dangling(name);
                false
            }
        }
    }
}

/// Links compare by target name; the bound id is session state.
impl PartialEq for PrototypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for PrototypeRef {}

impl AttrValue for PrototypeRef {
    const KIND: &'static str = "prototype name";

    fn parse_attr(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            Some(PrototypeRef::Unset)
        } else {
            Some(PrototypeRef::pending(text))
        }
    }

    fn format_attr(&self) -> String {
        self.name().unwrap_or_default().to_string()
    }
}

/// Name lookup over every registered prototype.
#[derive(Debug, Default, Clone)]
pub struct NameIndex {
    by_name: HashMap<String, (PrototypeId, PrototypeClass)>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` and leaves the index untouched if the name is taken.
    pub fn insert(&mut self, name: &str, id: PrototypeId, class: PrototypeClass) -> bool {
        if self.by_name.contains_key(name) {
            return false;
        }
        self.by_name.insert(name.to_string(), (id, class));
        true
    }

    pub fn get(&self, name: &str) -> Option<(PrototypeId, PrototypeClass)> {
        self.by_name.get(name).copied()
    }

    pub fn id_of(&self, name: &str) -> Option<PrototypeId> {
        self.get(name).map(|(id, _)| id)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_name.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn index() -> NameIndex {
        let mut index = NameIndex::new();
        assert!(index.insert("rocket01", PrototypeId::new(0), PrototypeClass::Rocket));
        assert!(index.insert("truck", PrototypeId::new(1), PrototypeClass::Vehicle));
        index
    }

    #[test]
    fn duplicate_names_are_refused() {
        let mut index = index();
        assert!(!index.insert("truck", PrototypeId::new(7), PrototypeClass::Ware));
        assert_eq!(index.id_of("truck"), Some(PrototypeId::new(1)));
    }

    #[test]
    fn pending_links_resolve() {
        let mut link = PrototypeRef::parse_attr("rocket01").unwrap();
        assert!(!link.is_resolved());
        assert!(link.resolve(&index(), "launcher", "ShellPrototype", &[PrototypeClass::Rocket]));
        assert_eq!(link.id(), Some(PrototypeId::new(0)));
        assert_eq!(link.format_attr(), "rocket01");
    }

    #[test]
    fn unknown_names_dangle() {
        let mut link = PrototypeRef::pending("nope");
        assert!(!link.resolve(&index(), "launcher", "ShellPrototype", &[]));
        assert!(link.is_dangling());
        assert_eq!(link.name(), Some("nope"));
        assert_eq!(link.id(), None);
    }

    #[test]
    fn class_mismatch_still_binds() {
        let mut link = PrototypeRef::pending("truck");
        assert!(link.resolve(&index(), "launcher", "ShellPrototype", &[PrototypeClass::Rocket]));
        assert_eq!(link.id(), Some(PrototypeId::new(1)));
    }

    #[test]
    fn unset_links_stay_unset() {
        let mut link = PrototypeRef::parse_attr("  ").unwrap();
        assert!(link.resolve(&index(), "x", "ParentPrototype", &[]));
        assert!(!link.is_set());
    }

    #[test]
    fn equality_ignores_binding() {
        let resolved = PrototypeRef::Resolved {
            name: "truck".to_string(),
            id: PrototypeId::new(1),
        };
        assert_eq!(resolved, PrototypeRef::pending("truck"));
        assert_ne!(resolved, PrototypeRef::Unset);
    }
}
