use tracing::warn;

use crate::reference::{PrototypeId, PrototypeRef};
use crate::resource_type::ResourceId;
use crate::value::{AnnotatedValue, DisplayHint};
use crate::xml::{AttrError, Node, XmlElement, required_attr};

use super::{LoadContext, LoadError, PrototypeClass, Resolver};

/// Attributes that stay with a prototype and are never inherited.
pub(crate) const IDENTITY_ATTRIBUTES: &[&str] = &["Name", "Class", "ParentPrototype", "IsAbstract"];

/// Attributes shared by every prototype class.
#[derive(Clone, Debug, PartialEq)]
pub struct PrototypeInfo {
    class: PrototypeClass,
    name: String,
    id: Option<PrototypeId>,
    resource_id: Option<ResourceId>,
    pub parent: AnnotatedValue<PrototypeRef>,
    pub resource_type: AnnotatedValue<String>,
    pub is_abstract: AnnotatedValue<bool>,
    pub price: AnnotatedValue<i32>,
    pub is_updating: AnnotatedValue<bool>,
    pub visible_in_encyclopedia: AnnotatedValue<bool>,
    pub apply_affixes: AnnotatedValue<bool>,
}

impl PrototypeInfo {
    pub fn new(class: PrototypeClass, name: String) -> Self {
        Self {
            class,
            name,
            id: None,
            resource_id: None,
            parent: AnnotatedValue::new(PrototypeRef::Unset, "ParentPrototype")
                .hint(DisplayHint::Reference),
            resource_type: AnnotatedValue::new(String::new(), "ResourceType"),
            is_abstract: AnnotatedValue::new(false, "IsAbstract"),
            price: AnnotatedValue::new(0, "Price"),
            is_updating: AnnotatedValue::new(true, "IsUpdating"),
            visible_in_encyclopedia: AnnotatedValue::new(true, "VisibleInEncyclopedia"),
            apply_affixes: AnnotatedValue::new(false, "ApplyAffixes"),
        }
    }

    pub fn class(&self) -> PrototypeClass {
        self.class
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Option<PrototypeId> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: PrototypeId) {
        self.id = Some(id);
    }

    /// Registry id of `ResourceType`, if it named a known type.
    pub fn resource_id(&self) -> Option<ResourceId> {
        self.resource_id
    }

    /// Copies the inheritable fields. Identity (name, class, parent link,
    /// abstractness) stays with the child.
    pub(crate) fn inherit_from(&mut self, parent: &PrototypeInfo) {
        self.resource_type.value = parent.resource_type.value.clone();
        self.resource_id = parent.resource_id;
        self.price.value = parent.price.value;
        self.is_updating.value = parent.is_updating.value;
        self.visible_in_encyclopedia.value = parent.visible_in_encyclopedia.value;
        self.apply_affixes.value = parent.apply_affixes.value;
    }

    pub fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        let name = required_attr(node, "Name")?;
        let class = required_attr(node, "Class")?;
        if name != self.name {
            self.name = name.to_string();
        }
        if PrototypeClass::from_name(class) != Some(self.class) {
            return Err(AttrError::Invalid {
                attr: "Class".to_string(),
                value: class.to_string(),
                expected: self.class.as_str(),
            }
            .into());
        }

        self.parent.read(node)?;
        self.resource_type.read(node)?;
        self.is_abstract.read(node)?;
        self.price.read(node)?;
        self.is_updating.read(node)?;
        self.visible_in_encyclopedia.read(node)?;
        self.apply_affixes.read(node)?;

        if self.price.value < 0 {
            warn!(price = self.price.value, "negative price");
        }
        if node.attribute(self.resource_type.name()).is_some() {
            self.resource_id = self.check_resource_type(ctx);
        }
        Ok(())
    }

    fn check_resource_type(&self, ctx: &LoadContext<'_>) -> Option<ResourceId> {
        let registry = ctx.resource_types();
        let name = self.resource_type.value.as_str();
        if name.is_empty() {
            return None;
        }
        let Some(id) = registry.id_of(name) else {
            warn!(resource_type = name, "unknown resource type");
            return None;
        };
        if let Some(category) = self.class.resource_category()
            && let Some(category_id) = registry.id_of(category)
            && !registry.is_kind_of(id, category_id)
        {
            warn!(
                resource_type = name,
                category,
                "resource type is outside the category of its class"
            );
        }
        Some(id)
    }

    pub(crate) fn post_load(&mut self, resolver: &Resolver<'_>) {
        resolver.resolve(&mut self.parent, &[self.class]);
    }

    pub(crate) fn write_xml(&self, element: &mut XmlElement) {
        element.set("Name", self.name.as_str());
        element.set("Class", self.class.as_str());
        self.parent.write(element);
        self.resource_type.write(element);
        self.is_abstract.write(element);
        self.price.write(element);
        self.is_updating.write(element);
        self.visible_in_encyclopedia.write(element);
        self.apply_affixes.write(element);
    }
}
