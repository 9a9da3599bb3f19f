//! Vehicles: a body assembled from part prototypes.

use crate::reference::PrototypeRef;
use crate::units::{MetersPerSecond, Radians};
use crate::value::{AnnotatedValue, DisplayHint};
use crate::xml::{AttrError, Node, XmlElement, child_elements};

use super::{
    LoadContext, LoadError, PhysicBodyFields, PrototypeClass, PrototypeFields, Resolver, SaleInfo,
};

const PART_TAG: &str = "VehiclePart";

/// Classes a vehicle slot may hold.
const PART_CLASSES: &[PrototypeClass] = &[
    PrototypeClass::Chassis,
    PrototypeClass::Cabin,
    PrototypeClass::Basket,
    PrototypeClass::BulletLauncher,
    PrototypeClass::NailLauncher,
    PrototypeClass::RocketLauncher,
    PrototypeClass::PlasmaBunchLauncher,
    PrototypeClass::ThunderboltLauncher,
    PrototypeClass::MineLauncher,
    PrototypeClass::MortarLauncher,
    PrototypeClass::TurboAccelerationPusher,
];

/// `<VehiclePart PartName="CABIN" Prototype="cabin01"/>`
#[derive(Clone, Debug, PartialEq)]
pub struct PartSlot {
    pub part_name: AnnotatedValue<String>,
    pub prototype: AnnotatedValue<PrototypeRef>,
}

impl PartSlot {
    pub fn new(part_name: &str, prototype: &str) -> Self {
        let mut slot = Self::empty();
        slot.part_name.value = part_name.to_string();
        slot.prototype.value = PrototypeRef::pending(prototype);
        slot
    }

    fn empty() -> Self {
        Self {
            part_name: AnnotatedValue::new(String::new(), "PartName").always(),
            prototype: AnnotatedValue::new(PrototypeRef::Unset, "Prototype")
                .always()
                .hint(DisplayHint::Reference),
        }
    }

    fn from_xml(node: Node<'_, '_>) -> Result<Self, AttrError> {
        let mut slot = Self::empty();
        slot.part_name.read_required(node)?;
        slot.prototype.read_required(node)?;
        Ok(slot)
    }

    fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new(PART_TAG);
        self.part_name.write(&mut element);
        self.prototype.write(&mut element);
        element
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VehiclePrototype {
    pub body: PhysicBodyFields,
    pub sale: SaleInfo,
    pub wheel_prototype: AnnotatedValue<PrototypeRef>,
    pub max_speed: AnnotatedValue<MetersPerSecond>,
    pub turning_speed: AnnotatedValue<Radians>,
    pub parts: Vec<PartSlot>,
}

impl Default for VehiclePrototype {
    fn default() -> Self {
        Self {
            body: PhysicBodyFields::default(),
            sale: SaleInfo::default(),
            wheel_prototype: AnnotatedValue::new(PrototypeRef::Unset, "WheelPrototype")
                .hint(DisplayHint::Reference),
            max_speed: AnnotatedValue::new(MetersPerSecond::default(), "MaxSpeed")
                .hint(DisplayHint::Speed),
            turning_speed: AnnotatedValue::new(Radians::default(), "TurningSpeed")
                .hint(DisplayHint::Angle),
            parts: Vec::new(),
        }
    }
}

impl VehiclePrototype {
    pub fn part(&self, part_name: &str) -> Option<&PrototypeRef> {
        self.parts
            .iter()
            .find(|slot| slot.part_name.value == part_name)
            .map(|slot| &slot.prototype.value)
    }

    /// Parts named in `node` replace the inherited slot of the same name
    /// and add new slots otherwise.
    fn load_parts(&mut self, node: Node<'_, '_>) -> Result<(), LoadError> {
        for child in child_elements(node, PART_TAG) {
            let slot = PartSlot::from_xml(child).map_err(|source| LoadError::Entry {
                tag: PART_TAG,
                source,
            })?;
            match self
                .parts
                .iter_mut()
                .find(|existing| existing.part_name.value == slot.part_name.value)
            {
                Some(existing) => *existing = slot,
                None => self.parts.push(slot),
            }
        }
        Ok(())
    }
}

impl PrototypeFields for VehiclePrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.body.load_from_xml(ctx, node)?;
        self.sale.load(node)?;
        self.wheel_prototype.read(node)?;
        self.max_speed.read(node)?;
        self.turning_speed.read(node)?;
        self.load_parts(node)
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.body.post_load(resolver);
        resolver.resolve(&mut self.wheel_prototype, &[PrototypeClass::Wheel]);
        for slot in &mut self.parts {
            resolver.resolve(&mut slot.prototype, PART_CLASSES);
        }
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.body.write_xml(element);
        self.sale.write(element);
        self.wheel_prototype.write(element);
        self.max_speed.write(element);
        self.turning_speed.write(element);
        for slot in &self.parts {
            element.push(slot.to_xml());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prototypes::{GUN_CLASSES, Prototype};
    use crate::prototypes::test::load_one;

    #[test]
    fn gun_classes_fit_in_slots() {
        assert!(GUN_CLASSES.iter().all(|class| PART_CLASSES.contains(class)));
    }

    #[test]
    fn parts_and_turning_speed() {
        let proto = load_one(
            r#"<Prototype Name="truck" Class="Vehicle" TurningSpeed="90" Mass="2000">
                <VehiclePart PartName="CABIN" Prototype="cabin01"/>
                <VehiclePart PartName="CHASSIS" Prototype="chassis01"/>
            </Prototype>"#,
        )
        .unwrap();
        let vehicle = proto.data.vehicle_ref().unwrap();
        assert_eq!(vehicle.parts.len(), 2);
        assert_eq!(vehicle.part("CABIN"), Some(&PrototypeRef::pending("cabin01")));

        let element = proto.to_xml();
        assert_eq!(element.attribute("TurningSpeed"), Some("90"));
        assert_eq!(element.children().len(), 2);
        assert_eq!(element.children()[1].attribute("Prototype"), Some("chassis01"));
    }

    #[test]
    fn child_slots_override_parent_slots() {
        let parent = load_one(
            r#"<Prototype Name="base" Class="Vehicle">
                <VehiclePart PartName="CABIN" Prototype="cabin01"/>
                <VehiclePart PartName="BASKET" Prototype="basket01"/>
            </Prototype>"#,
        )
        .unwrap();
        let doc = roxmltree::Document::parse(
            r#"<Prototype Name="truck" Class="Vehicle" ParentPrototype="base">
                <VehiclePart PartName="CABIN" Prototype="cabin02"/>
            </Prototype>"#,
        )
        .unwrap();
        let registry = crate::resource_type::ResourceTypeRegistry::new();
        let ctx = LoadContext::builder().resource_types(&registry).build();

        let mut child = Prototype::new(PrototypeClass::Vehicle, "truck");
        child.copy_from(&parent).unwrap();
        child.load_from_xml(&ctx, doc.root_element()).unwrap();
        let vehicle = child.data.vehicle_ref().unwrap();
        assert_eq!(vehicle.part("CABIN"), Some(&PrototypeRef::pending("cabin02")));
        assert_eq!(vehicle.part("BASKET"), Some(&PrototypeRef::pending("basket01")));
    }

    #[test]
    fn slot_without_prototype_fails() {
        let result = load_one(
            r#"<Prototype Name="truck" Class="Vehicle"><VehiclePart PartName="CABIN"/></Prototype>"#,
        );
        assert!(matches!(result, Err(LoadError::Entry { tag: "VehiclePart", .. })));
    }
}
