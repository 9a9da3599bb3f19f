//! Child elements that point at other prototypes, e.g.
//! `<Ware Prototype="medkit" Count="3"/>`.

use crate::reference::PrototypeRef;
use crate::value::{AnnotatedValue, DisplayHint};
use crate::xml::{AttrError, Node, XmlElement, child_elements};

use super::{LoadError, PrototypeClass, Resolver, check_probability};

fn prototype_field() -> AnnotatedValue<PrototypeRef> {
    AnnotatedValue::new(PrototypeRef::Unset, "Prototype")
        .always()
        .hint(DisplayHint::Reference)
}

#[derive(Clone, Debug, PartialEq)]
pub struct CountedRef {
    pub prototype: AnnotatedValue<PrototypeRef>,
    pub count: AnnotatedValue<i32>,
}

impl Default for CountedRef {
    fn default() -> Self {
        Self {
            prototype: prototype_field(),
            count: AnnotatedValue::new(1, "Count"),
        }
    }
}

impl CountedRef {
    pub fn new(name: &str, count: i32) -> Self {
        let mut entry = Self::default();
        entry.prototype.value = PrototypeRef::pending(name);
        entry.count.value = count;
        entry
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProbableRef {
    pub prototype: AnnotatedValue<PrototypeRef>,
    pub probability: AnnotatedValue<f32>,
}

impl Default for ProbableRef {
    fn default() -> Self {
        Self {
            prototype: prototype_field(),
            probability: AnnotatedValue::new(1.0, "Probability").hint(DisplayHint::Probability),
        }
    }
}

impl ProbableRef {
    pub fn new(name: &str, probability: f32) -> Self {
        let mut entry = Self::default();
        entry.prototype.value = PrototypeRef::pending(name);
        entry.probability.value = probability;
        entry
    }
}

/// Entry types stored as repeated child elements.
pub(crate) trait Entry: Sized {
    fn from_xml(node: Node<'_, '_>) -> Result<Self, AttrError>;
    fn to_xml(&self, tag: &str) -> XmlElement;
    fn target(&mut self) -> &mut AnnotatedValue<PrototypeRef>;
}

impl Entry for CountedRef {
    fn from_xml(node: Node<'_, '_>) -> Result<Self, AttrError> {
        let mut entry = Self::default();
        entry.prototype.read_required(node)?;
        entry.count.read(node)?;
        Ok(entry)
    }

    fn to_xml(&self, tag: &str) -> XmlElement {
        let mut element = XmlElement::new(tag);
        self.prototype.write(&mut element);
        self.count.write(&mut element);
        element
    }

    fn target(&mut self) -> &mut AnnotatedValue<PrototypeRef> {
        &mut self.prototype
    }
}

impl Entry for ProbableRef {
    fn from_xml(node: Node<'_, '_>) -> Result<Self, AttrError> {
        let mut entry = Self::default();
        entry.prototype.read_required(node)?;
        entry.probability.read(node)?;
        check_probability(&entry.probability);
        Ok(entry)
    }

    fn to_xml(&self, tag: &str) -> XmlElement {
        let mut element = XmlElement::new(tag);
        self.prototype.write(&mut element);
        self.probability.write(&mut element);
        element
    }

    fn target(&mut self) -> &mut AnnotatedValue<PrototypeRef> {
        &mut self.prototype
    }
}

/// Reads every `<tag>` child of `node`. When the node has none, `entries`
/// keeps what it holds (typically the list inherited from a parent).
pub(crate) fn load_entries<T: Entry>(
    node: Node<'_, '_>,
    tag: &'static str,
    entries: &mut Vec<T>,
) -> Result<(), LoadError> {
    let mut children = child_elements(node, tag).peekable();
    if children.peek().is_none() {
        return Ok(());
    }
    *entries = children
        .map(|child| T::from_xml(child).map_err(|source| LoadError::Entry { tag, source }))
        .collect::<Result<_, _>>()?;
    Ok(())
}

pub(crate) fn write_entries<T: Entry>(element: &mut XmlElement, tag: &str, entries: &[T]) {
    for entry in entries {
        element.push(entry.to_xml(tag));
    }
}

pub(crate) fn resolve_entries<T: Entry>(
    resolver: &Resolver<'_>,
    entries: &mut [T],
    expected: &[PrototypeClass],
) {
    for entry in entries {
        resolver.resolve(entry.target(), expected);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn entries_replace_only_when_present() {
        let doc = roxmltree::Document::parse(
            r#"<P><Ware Prototype="medkit" Count="3"/><Ware Prototype="fuel"/></P>"#,
        )
        .unwrap();
        let mut wares = vec![CountedRef::new("old", 1)];
        load_entries(doc.root_element(), "Vehicle", &mut wares).unwrap();
        assert_eq!(wares, vec![CountedRef::new("old", 1)]);

        load_entries(doc.root_element(), "Ware", &mut wares).unwrap();
        assert_eq!(
            wares,
            vec![CountedRef::new("medkit", 3), CountedRef::new("fuel", 1)]
        );
    }

    #[test]
    fn entry_without_prototype_fails() {
        let doc = roxmltree::Document::parse(r#"<P><Vehicle Probability="0.5"/></P>"#).unwrap();
        let mut vehicles: Vec<ProbableRef> = Vec::new();
        assert_eq!(
            load_entries(doc.root_element(), "Vehicle", &mut vehicles),
            Err(LoadError::Entry {
                tag: "Vehicle",
                source: AttrError::missing("Prototype"),
            })
        );
    }

    #[test]
    fn default_count_is_omitted() {
        let mut element = XmlElement::new("Chest");
        write_entries(
            &mut element,
            "Ware",
            &[CountedRef::new("medkit", 1), CountedRef::new("fuel", 2)],
        );
        assert_eq!(
            element.children()[0].attributes(),
            &[("Prototype".to_string(), "medkit".to_string())]
        );
        assert_eq!(element.children()[1].attribute("Count"), Some("2"));
    }
}
