//! Vehicle parts: chassis, cabins, cargo baskets and wheels. Guns are parts
//! too and build on [`VehiclePartFields`] in `gun.rs`.

use crate::geometry::Vector2;
use crate::units::{MetersPerSecond, Radians};
use crate::value::{AnnotatedValue, DisplayHint};
use crate::xml::{Node, XmlElement};

use super::{
    LoadContext, LoadError, PhysicBodyFields, PhysicObjFields, PrototypeFields, Resolver,
    check_probability,
};

#[derive(Clone, Debug, PartialEq)]
pub struct VehiclePartFields {
    pub obj: PhysicObjFields,
    pub durability: AnnotatedValue<f32>,
    pub weight: AnnotatedValue<f32>,
    pub affix_group: AnnotatedValue<String>,
    /// Mount points this part offers to the parts attached to it.
    pub load_points: AnnotatedValue<Vec<String>>,
}

impl Default for VehiclePartFields {
    fn default() -> Self {
        Self {
            obj: PhysicObjFields::default(),
            durability: AnnotatedValue::new(100.0, "Durability"),
            weight: AnnotatedValue::new(0.0, "Weight"),
            affix_group: AnnotatedValue::new(String::new(), "AffixGroup"),
            load_points: AnnotatedValue::new(Vec::new(), "LoadPoints"),
        }
    }
}

impl PrototypeFields for VehiclePartFields {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.obj.load_from_xml(ctx, node)?;
        self.durability.read(node)?;
        self.weight.read(node)?;
        self.affix_group.read(node)?;
        self.load_points.read(node)?;
        ctx.check_affix_group(&self.affix_group);
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.obj.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.obj.write_xml(element);
        self.durability.write(element);
        self.weight.write(element);
        self.affix_group.write(element);
        self.load_points.write(element);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChassisPrototype {
    pub part: VehiclePartFields,
    pub max_speed: AnnotatedValue<MetersPerSecond>,
    pub max_fuel: AnnotatedValue<f32>,
    pub fuel_consumption: AnnotatedValue<f32>,
}

impl Default for ChassisPrototype {
    fn default() -> Self {
        Self {
            part: VehiclePartFields::default(),
            max_speed: AnnotatedValue::new(MetersPerSecond::default(), "MaxSpeed")
                .hint(DisplayHint::Speed),
            max_fuel: AnnotatedValue::new(100.0, "MaxFuel"),
            fuel_consumption: AnnotatedValue::new(0.0, "FuelConsumption"),
        }
    }
}

impl PrototypeFields for ChassisPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.part.load_from_xml(ctx, node)?;
        self.max_speed.read(node)?;
        self.max_fuel.read(node)?;
        self.fuel_consumption.read(node)?;
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.part.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.part.write_xml(element);
        self.max_speed.write(element);
        self.max_fuel.write(element);
        self.fuel_consumption.write(element);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CabinPrototype {
    pub part: VehiclePartFields,
    pub max_torque: AnnotatedValue<f32>,
    pub max_speed: AnnotatedValue<MetersPerSecond>,
}

impl Default for CabinPrototype {
    fn default() -> Self {
        Self {
            part: VehiclePartFields::default(),
            max_torque: AnnotatedValue::new(0.0, "MaxTorque"),
            max_speed: AnnotatedValue::new(MetersPerSecond::default(), "MaxSpeed")
                .hint(DisplayHint::Speed),
        }
    }
}

impl PrototypeFields for CabinPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.part.load_from_xml(ctx, node)?;
        self.max_torque.read(node)?;
        self.max_speed.read(node)?;
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.part.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.part.write_xml(element);
        self.max_torque.write(element);
        self.max_speed.write(element);
    }
}

/// Cargo space, measured in inventory cells.
#[derive(Clone, Debug, PartialEq)]
pub struct BasketPrototype {
    pub part: VehiclePartFields,
    pub repository_size: AnnotatedValue<Vector2>,
}

impl Default for BasketPrototype {
    fn default() -> Self {
        Self {
            part: VehiclePartFields::default(),
            repository_size: AnnotatedValue::new(Vector2::default(), "RepositorySize"),
        }
    }
}

impl PrototypeFields for BasketPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.part.load_from_xml(ctx, node)?;
        self.repository_size.read(node)?;
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.part.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.part.write_xml(element);
        self.repository_size.write(element);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WheelPrototype {
    pub body: PhysicBodyFields,
    pub suspension_range: AnnotatedValue<f32>,
    pub suspension_cfm: AnnotatedValue<f32>,
    pub suspension_erp: AnnotatedValue<f32>,
    pub max_steering_angle: AnnotatedValue<Radians>,
}

impl Default for WheelPrototype {
    fn default() -> Self {
        Self {
            body: PhysicBodyFields::default(),
            suspension_range: AnnotatedValue::new(0.5, "SuspensionRange"),
            suspension_cfm: AnnotatedValue::new(0.1, "SuspensionCFM"),
            suspension_erp: AnnotatedValue::new(0.5, "SuspensionERP")
                .hint(DisplayHint::Probability),
            max_steering_angle: AnnotatedValue::new(Radians::default(), "MaxSteeringAngle")
                .hint(DisplayHint::Angle),
        }
    }
}

impl PrototypeFields for WheelPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.body.load_from_xml(ctx, node)?;
        self.suspension_range.read(node)?;
        self.suspension_cfm.read(node)?;
        self.suspension_erp.read(node)?;
        self.max_steering_angle.read(node)?;
        check_probability(&self.suspension_erp);
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.body.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.body.write_xml(element);
        self.suspension_range.write(element);
        self.suspension_cfm.write(element);
        self.suspension_erp.write(element);
        self.max_steering_angle.write(element);
    }
}

#[cfg(test)]
mod test {
    use crate::prototypes::test::load_one;

    #[test]
    fn chassis_speed_round_trips() {
        let proto = load_one(
            r#"<Prototype Name="ch" Class="Chassis" MaxSpeed="120" LoadPoints="cabin basket"/>"#,
        )
        .unwrap();
        let chassis = proto.data.chassis_ref().unwrap();
        assert!((chassis.max_speed.value.value() - 33.333_336).abs() < 1e-4);
        assert_eq!(chassis.part.load_points.value, vec!["cabin", "basket"]);

        let element = proto.to_xml();
        assert_eq!(element.attribute("MaxSpeed"), Some("120"));
        assert_eq!(element.attribute("LoadPoints"), Some("cabin basket"));
        assert_eq!(element.attribute("MaxFuel"), None);
    }

    #[test]
    fn basket_size_is_a_short_vector() {
        let proto =
            load_one(r#"<Prototype Name="b" Class="Basket" RepositorySize="10 4"/>"#).unwrap();
        let basket = proto.data.basket_ref().unwrap();
        assert_eq!(basket.repository_size.value.x, 10.0);
        assert!(load_one(r#"<Prototype Name="b" Class="Basket" RepositorySize="10"/>"#).is_err());
    }

    #[test]
    fn wheel_steering_angle() {
        let proto = load_one(
            r#"<Prototype Name="w" Class="Wheel" MaxSteeringAngle="30" SuspensionERP="1.5"/>"#,
        )
        .unwrap();
        let wheel = proto.data.wheel_ref().unwrap();
        assert_eq!(wheel.suspension_erp.value, 1.5);
        assert_eq!(proto.to_xml().attribute("MaxSteeringAngle"), Some("30"));
    }
}
