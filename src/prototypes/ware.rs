//! Tradeable goods.

use crate::value::AnnotatedValue;
use crate::xml::{Node, XmlElement};

use super::{LoadContext, LoadError, PrototypeClass, PrototypeFields};

pub(crate) const WARE_CLASSES: &[PrototypeClass] = &[
    PrototypeClass::Ware,
    PrototypeClass::Gadget,
    PrototypeClass::QuestItem,
];

/// Whether towns trade the thing. `Export` means a town may sell it to the
/// player, `Import` that it buys it.
#[derive(Clone, Debug, PartialEq)]
pub struct SaleInfo {
    pub sellable: AnnotatedValue<bool>,
    pub buyable: AnnotatedValue<bool>,
}

impl Default for SaleInfo {
    fn default() -> Self {
        Self {
            sellable: AnnotatedValue::new(false, "Export"),
            buyable: AnnotatedValue::new(false, "Import"),
        }
    }
}

impl SaleInfo {
    pub(crate) fn load(&mut self, node: Node<'_, '_>) -> Result<(), LoadError> {
        self.sellable.read(node)?;
        self.buyable.read(node)?;
        Ok(())
    }

    pub(crate) fn write(&self, element: &mut XmlElement) {
        self.sellable.write(element);
        self.buyable.write(element);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WarePrototype {
    pub sale: SaleInfo,
    pub weight: AnnotatedValue<f32>,
    pub max_in_stack: AnnotatedValue<i32>,
}

impl Default for WarePrototype {
    fn default() -> Self {
        Self {
            sale: SaleInfo::default(),
            weight: AnnotatedValue::new(0.0, "Weight"),
            max_in_stack: AnnotatedValue::new(1, "MaxInStack"),
        }
    }
}

impl PrototypeFields for WarePrototype {
    fn load_from_xml(
        &mut self,
        _ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.sale.load(node)?;
        self.weight.read(node)?;
        self.max_in_stack.read(node)?;
        Ok(())
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.sale.write(element);
        self.weight.write(element);
        self.max_in_stack.write(element);
    }
}

/// Equipment the player installs for a stat bonus.
#[derive(Clone, Debug, PartialEq)]
pub struct GadgetPrototype {
    pub ware: WarePrototype,
    pub modifications: AnnotatedValue<String>,
    pub affix_group: AnnotatedValue<String>,
}

impl Default for GadgetPrototype {
    fn default() -> Self {
        Self {
            ware: WarePrototype::default(),
            modifications: AnnotatedValue::new(String::new(), "Modifications"),
            affix_group: AnnotatedValue::new(String::new(), "AffixGroup"),
        }
    }
}

impl PrototypeFields for GadgetPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.ware.load_from_xml(ctx, node)?;
        self.modifications.read(node)?;
        self.affix_group.read(node)?;
        ctx.check_affix_group(&self.affix_group);
        Ok(())
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.ware.write_xml(element);
        self.modifications.write(element);
        self.affix_group.write(element);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuestItemPrototype {
    pub ware: WarePrototype,
    pub is_unique: AnnotatedValue<bool>,
}

impl Default for QuestItemPrototype {
    fn default() -> Self {
        Self {
            ware: WarePrototype::default(),
            is_unique: AnnotatedValue::new(false, "IsUnique"),
        }
    }
}

impl PrototypeFields for QuestItemPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.ware.load_from_xml(ctx, node)?;
        self.is_unique.read(node)?;
        Ok(())
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.ware.write_xml(element);
        self.is_unique.write(element);
    }
}
