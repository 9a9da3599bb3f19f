//! Prototype field cells.
//!
//! Every serializable prototype field is an [`AnnotatedValue`]: the current
//! value together with the XML attribute it lives in and the default it was
//! constructed with. The save path uses [`should_serialize`] to drop fields
//! that still hold their default, which keeps regenerated files close to the
//! hand-written ones.

use crate::xml::{AttrError, AttrValue, Node, XmlElement};

/// Controls whether a field is written back on save.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SaveMode {
    /// Never written.
    Ignore,
    /// Written even when equal to the default.
    Always,
    /// Written only when different from the default.
    #[default]
    IfChanged,
    /// Stored in child elements that the owning prototype writes itself.
    SpecificChild,
}

/// How editing tools should present a field. Has no effect on load or save.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisplayHint {
    #[default]
    Plain,
    Hidden,
    ReadOnly,
    Angle,
    Speed,
    Probability,
    Reference,
    Model,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatedValue<T> {
    pub value: T,
    name: &'static str,
    default_value: T,
    hint: DisplayHint,
    mode: SaveMode,
}

impl<T: Clone> AnnotatedValue<T> {
    /// Creates a cell whose default is a copy of `value`.
    pub fn new(value: T, name: &'static str) -> Self {
        Self {
            default_value: value.clone(),
            value,
            name,
            hint: DisplayHint::Plain,
            mode: SaveMode::IfChanged,
        }
    }

    /// Creates a cell whose initial value differs from the default it is
    /// compared against on save.
    pub fn with_default(value: T, default_value: T, name: &'static str) -> Self {
        Self {
            value,
            name,
            default_value,
            hint: DisplayHint::Plain,
            mode: SaveMode::IfChanged,
        }
    }

    pub fn always(mut self) -> Self {
        self.mode = SaveMode::Always;
        self
    }

    pub fn ignored(mut self) -> Self {
        self.mode = SaveMode::Ignore;
        self
    }

    pub fn child(mut self) -> Self {
        self.mode = SaveMode::SpecificChild;
        self
    }

    pub fn hint(mut self, hint: DisplayHint) -> Self {
        self.hint = hint;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn default_value(&self) -> &T {
        &self.default_value
    }

    pub fn display_hint(&self) -> DisplayHint {
        self.hint
    }

    pub fn mode(&self) -> SaveMode {
        self.mode
    }

    pub fn reset(&mut self) {
        self.value = self.default_value.clone();
    }
}

impl<T: PartialEq> AnnotatedValue<T> {
    pub fn is_default(&self) -> bool {
        self.value == self.default_value
    }
}

impl<T: AttrValue + Clone + PartialEq> AnnotatedValue<T> {
    /// Overwrites the value from the attribute if the node carries it.
    /// A missing attribute keeps the current value.
    pub fn read(&mut self, node: Node<'_, '_>) -> Result<(), AttrError> {
        if let Some(text) = node.attribute(self.name) {
            self.value =
                T::parse_attr(text).ok_or_else(|| AttrError::invalid::<T>(self.name, text))?;
        }
        Ok(())
    }

    pub fn read_required(&mut self, node: Node<'_, '_>) -> Result<(), AttrError> {
        if node.attribute(self.name).is_none() {
            return Err(AttrError::missing(self.name));
        }
        self.read(node)
    }

    /// Adds the attribute to `element` if the field should be saved. An
    /// element built with [`XmlElement::with_defaults`] takes every field
    /// that is saved at all.
    pub fn write(&self, element: &mut XmlElement) {
        let wanted = match self.mode {
            SaveMode::Ignore | SaveMode::SpecificChild => false,
            SaveMode::Always | SaveMode::IfChanged => {
                element.keeps_defaults() || should_serialize(self)
            }
        };
        if wanted {
            element.set(self.name, self.value.format_attr());
        }
    }
}

pub fn should_serialize<T: PartialEq>(value: &AnnotatedValue<T>) -> bool {
    match value.mode {
        SaveMode::Always => true,
        SaveMode::Ignore => false,
        SaveMode::IfChanged | SaveMode::SpecificChild => value.value != value.default_value,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::units::Radians;

    #[test]
    fn default_is_a_snapshot() {
        let mut names = AnnotatedValue::new(vec!["a".to_string()], "Names");
        names.value.push("b".to_string());
        assert_eq!(names.default_value(), &vec!["a".to_string()]);
        assert!(!names.is_default());
        names.reset();
        assert!(names.is_default());
    }

    #[test]
    fn serialization_decision() {
        let mut price = AnnotatedValue::new(0, "Price");
        assert!(!should_serialize(&price));
        price.value = 5;
        assert!(should_serialize(&price));

        let always = AnnotatedValue::new(0, "Count").always();
        assert!(should_serialize(&always));

        let mut ignored = AnnotatedValue::new(0, "Runtime").ignored();
        ignored.value = 3;
        assert!(!should_serialize(&ignored));
    }

    #[test]
    fn read_keeps_value_when_absent() {
        let doc = roxmltree::Document::parse(r#"<P Price="100" Mass="x"/>"#).unwrap();
        let node = doc.root_element();

        let mut price = AnnotatedValue::new(0, "Price");
        price.read(node).unwrap();
        assert_eq!(price.value, 100);

        let mut weight = AnnotatedValue::new(2.5f32, "Weight");
        weight.read(node).unwrap();
        assert_eq!(weight.value, 2.5);
        assert_eq!(weight.read_required(node), Err(AttrError::missing("Weight")));

        let mut mass = AnnotatedValue::new(1.0f32, "Mass");
        assert!(matches!(mass.read(node), Err(AttrError::Invalid { .. })));
        assert_eq!(mass.value, 1.0);
    }

    #[test]
    fn write_skips_defaults_and_child_fields() {
        let mut el = XmlElement::new("Prototype");
        let mut angle = AnnotatedValue::new(Radians::default(), "TurningSpeed");
        angle.value = Radians::from_degrees(90.0);
        angle.write(&mut el);
        AnnotatedValue::new(false, "Export").write(&mut el);

        let mut zones = AnnotatedValue::new(Vec::<String>::new(), "Zones").child();
        zones.value.push("body".to_string());
        zones.write(&mut el);

        assert_eq!(
            el.attributes(),
            &[("TurningSpeed".to_string(), "90".to_string())]
        );
    }

    #[test]
    fn defaults_kept_on_request() {
        let mut el = XmlElement::with_defaults("Prototype");
        AnnotatedValue::new(false, "Export").write(&mut el);
        AnnotatedValue::new(0, "Runtime").ignored().write(&mut el);
        AnnotatedValue::new(Vec::<String>::new(), "Zones").child().write(&mut el);
        assert_eq!(
            el.attributes(),
            &[("Export".to_string(), "false".to_string())]
        );
    }
}
