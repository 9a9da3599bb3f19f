//! Projectiles fired by launchers, and the blast waves they leave behind.

use crate::units::{MetersPerSecond, Radians};
use crate::value::{AnnotatedValue, DisplayHint};
use crate::xml::{Node, XmlElement};

use super::{
    LoadContext, LoadError, PhysicBodyFields, PrototypeClass, PrototypeFields, Resolver,
    check_range,
};

pub const SHELL_CLASSES: &[PrototypeClass] = &[
    PrototypeClass::Rocket,
    PrototypeClass::PlasmaBunch,
    PrototypeClass::Mine,
    PrototypeClass::Thunderbolt,
    PrototypeClass::Mortar,
];

#[derive(Clone, Debug, PartialEq)]
pub struct ShellFields {
    pub body: PhysicBodyFields,
    pub damage: AnnotatedValue<f32>,
    pub velocity: AnnotatedValue<MetersPerSecond>,
    pub life_time: AnnotatedValue<f32>,
}

impl Default for ShellFields {
    fn default() -> Self {
        Self {
            body: PhysicBodyFields::default(),
            damage: AnnotatedValue::new(0.0, "Damage"),
            velocity: AnnotatedValue::new(MetersPerSecond::default(), "Velocity")
                .hint(DisplayHint::Speed),
            life_time: AnnotatedValue::new(10.0, "LifeTime"),
        }
    }
}

impl PrototypeFields for ShellFields {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.body.load_from_xml(ctx, node)?;
        self.damage.read(node)?;
        self.velocity.read(node)?;
        self.life_time.read(node)?;
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.body.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.body.write_xml(element);
        self.damage.write(element);
        self.velocity.write(element);
        self.life_time.write(element);
    }
}

/// Plasma bunches and thunderbolts carry nothing beyond the shell fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimpleShellPrototype {
    pub shell: ShellFields,
}

impl PrototypeFields for SimpleShellPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.shell.load_from_xml(ctx, node)
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.shell.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.shell.write_xml(element);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RocketPrototype {
    pub shell: ShellFields,
    pub acceleration: AnnotatedValue<f32>,
    pub turning_speed: AnnotatedValue<Radians>,
    pub is_homing: AnnotatedValue<bool>,
}

impl Default for RocketPrototype {
    fn default() -> Self {
        Self {
            shell: ShellFields::default(),
            acceleration: AnnotatedValue::new(0.0, "Acceleration"),
            turning_speed: AnnotatedValue::new(Radians::default(), "TurningSpeed")
                .hint(DisplayHint::Angle),
            is_homing: AnnotatedValue::new(false, "IsHoming"),
        }
    }
}

impl PrototypeFields for RocketPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.shell.load_from_xml(ctx, node)?;
        self.acceleration.read(node)?;
        self.turning_speed.read(node)?;
        self.is_homing.read(node)?;
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.shell.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.shell.write_xml(element);
        self.acceleration.write(element);
        self.turning_speed.write(element);
        self.is_homing.write(element);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MinePrototype {
    pub shell: ShellFields,
    pub activation_radius: AnnotatedValue<f32>,
    pub activation_delay: AnnotatedValue<f32>,
}

impl Default for MinePrototype {
    fn default() -> Self {
        Self {
            shell: ShellFields::default(),
            activation_radius: AnnotatedValue::new(5.0, "ActivationRadius"),
            activation_delay: AnnotatedValue::new(0.0, "ActivationDelay"),
        }
    }
}

impl PrototypeFields for MinePrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.shell.load_from_xml(ctx, node)?;
        self.activation_radius.read(node)?;
        self.activation_delay.read(node)?;
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.shell.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.shell.write_xml(element);
        self.activation_radius.write(element);
        self.activation_delay.write(element);
    }
}

/// Lobbed shell that falls under gravity and may burst into fragments.
#[derive(Clone, Debug, PartialEq)]
pub struct MortarPrototype {
    pub shell: ShellFields,
    pub gravity_factor: AnnotatedValue<f32>,
    pub split_count: AnnotatedValue<i32>,
}

impl Default for MortarPrototype {
    fn default() -> Self {
        Self {
            shell: ShellFields::default(),
            gravity_factor: AnnotatedValue::new(1.0, "GravityFactor"),
            split_count: AnnotatedValue::new(0, "SplitCount"),
        }
    }
}

impl PrototypeFields for MortarPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.shell.load_from_xml(ctx, node)?;
        self.gravity_factor.read(node)?;
        self.split_count.read(node)?;
        check_range(&self.gravity_factor, 0.0, 10.0);
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.shell.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.shell.write_xml(element);
        self.gravity_factor.write(element);
        self.split_count.write(element);
    }
}

/// Expanding damage sphere. Has no body of its own.
#[derive(Clone, Debug, PartialEq)]
pub struct BlastWavePrototype {
    pub max_radius: AnnotatedValue<f32>,
    pub damage: AnnotatedValue<f32>,
    pub force: AnnotatedValue<f32>,
    pub wave_speed: AnnotatedValue<MetersPerSecond>,
    pub effect: AnnotatedValue<String>,
}

impl Default for BlastWavePrototype {
    fn default() -> Self {
        Self {
            max_radius: AnnotatedValue::new(10.0, "MaxRadius"),
            damage: AnnotatedValue::new(0.0, "Damage"),
            force: AnnotatedValue::new(0.0, "Force"),
            wave_speed: AnnotatedValue::new(MetersPerSecond::default(), "WaveSpeed")
                .hint(DisplayHint::Speed),
            effect: AnnotatedValue::new(String::new(), "Effect"),
        }
    }
}

impl PrototypeFields for BlastWavePrototype {
    fn load_from_xml(
        &mut self,
        _ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.max_radius.read(node)?;
        self.damage.read(node)?;
        self.force.read(node)?;
        self.wave_speed.read(node)?;
        self.effect.read(node)?;
        Ok(())
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.max_radius.write(element);
        self.damage.write(element);
        self.force.write(element);
        self.wave_speed.write(element);
        self.effect.write(element);
    }
}

#[cfg(test)]
mod test {
    use crate::prototypes::test::load_one;

    #[test]
    fn rocket_fields_stack_on_shell_fields() {
        let proto = load_one(
            r#"<Prototype Name="r" Class="Rocket" Damage="40" Velocity="360" IsHoming="1"
                BlastWavePrototype="boom"/>"#,
        )
        .unwrap();
        let rocket = proto.data.rocket_ref().unwrap();
        assert_eq!(rocket.shell.damage.value, 40.0);
        assert!((rocket.shell.velocity.value.value() - 100.0).abs() < 1e-3);
        assert!(rocket.is_homing.value);

        let element = proto.to_xml();
        assert_eq!(element.attribute("Velocity"), Some("360"));
        assert_eq!(element.attribute("IsHoming"), Some("true"));
        assert_eq!(element.attribute("BlastWavePrototype"), Some("boom"));
    }

    #[test]
    fn blast_wave_defaults_are_omitted() {
        let proto =
            load_one(r#"<Prototype Name="boom" Class="BlastWave" MaxRadius="10" Damage="5"/>"#)
                .unwrap();
        let element = proto.to_xml();
        assert_eq!(element.attribute("MaxRadius"), None);
        assert_eq!(element.attribute("Damage"), Some("5"));
    }

    #[test]
    fn mortar_is_a_shell() {
        let proto = load_one(
            r#"<Prototype Name="lob" Class="Mortar" Damage="80" GravityFactor="0.5" SplitCount="3"/>"#,
        )
        .unwrap();
        let mortar = proto.data.mortar_ref().unwrap();
        assert_eq!(mortar.shell.damage.value, 80.0);
        assert_eq!(mortar.split_count.value, 3);
        assert!(super::SHELL_CLASSES.contains(&proto.class()));
        assert_eq!(proto.to_xml().attribute("GravityFactor"), Some("0.5"));
    }
}
