//! Guns. Projectile launchers name the shell they fire and must do so.

use crate::reference::PrototypeRef;
use crate::units::Radians;
use crate::value::{AnnotatedValue, DisplayHint};
use crate::xml::{Node, XmlElement};

use super::{
    LoadContext, LoadError, PrototypeClass, PrototypeFields, Resolver, VehiclePartFields,
};

pub const GUN_CLASSES: &[PrototypeClass] = &[
    PrototypeClass::BulletLauncher,
    PrototypeClass::NailLauncher,
    PrototypeClass::RocketLauncher,
    PrototypeClass::PlasmaBunchLauncher,
    PrototypeClass::ThunderboltLauncher,
    PrototypeClass::MineLauncher,
    PrototypeClass::MortarLauncher,
    PrototypeClass::TurboAccelerationPusher,
];

#[derive(Clone, Debug, PartialEq)]
pub struct GunFields {
    pub part: VehiclePartFields,
    pub damage: AnnotatedValue<f32>,
    pub firing_rate: AnnotatedValue<f32>,
    pub firing_range: AnnotatedValue<f32>,
    pub turning_speed: AnnotatedValue<Radians>,
    pub recoil_force: AnnotatedValue<f32>,
}

impl Default for GunFields {
    fn default() -> Self {
        Self {
            part: VehiclePartFields::default(),
            damage: AnnotatedValue::new(0.0, "Damage"),
            firing_rate: AnnotatedValue::new(1.0, "FiringRate"),
            firing_range: AnnotatedValue::new(100.0, "FiringRange"),
            turning_speed: AnnotatedValue::new(Radians::default(), "TurningSpeed")
                .hint(DisplayHint::Angle),
            recoil_force: AnnotatedValue::new(0.0, "RecoilForce"),
        }
    }
}

impl PrototypeFields for GunFields {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.part.load_from_xml(ctx, node)?;
        self.damage.read(node)?;
        self.firing_rate.read(node)?;
        self.firing_range.read(node)?;
        self.turning_speed.read(node)?;
        self.recoil_force.read(node)?;
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.part.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.part.write_xml(element);
        self.damage.write(element);
        self.firing_rate.write(element);
        self.firing_range.write(element);
        self.turning_speed.write(element);
        self.recoil_force.write(element);
    }
}

/// Machine guns and nail guns: hitscan weapons.
#[derive(Clone, Debug, PartialEq)]
pub struct BulletLauncherPrototype {
    pub gun: GunFields,
    pub bullets_per_shot: AnnotatedValue<i32>,
    pub spread: AnnotatedValue<Radians>,
}

impl Default for BulletLauncherPrototype {
    fn default() -> Self {
        Self {
            gun: GunFields::default(),
            bullets_per_shot: AnnotatedValue::new(1, "BulletsPerShot"),
            spread: AnnotatedValue::new(Radians::default(), "Spread").hint(DisplayHint::Angle),
        }
    }
}

impl PrototypeFields for BulletLauncherPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.gun.load_from_xml(ctx, node)?;
        self.bullets_per_shot.read(node)?;
        self.spread.read(node)?;
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.gun.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.gun.write_xml(element);
        self.bullets_per_shot.write(element);
        self.spread.write(element);
    }
}

/// Launchers that fire a shell prototype of one fixed class.
#[derive(Clone, Debug, PartialEq)]
pub struct ShellLauncherPrototype {
    pub gun: GunFields,
    pub shell_prototype: AnnotatedValue<PrototypeRef>,
    pub shells_pool_size: AnnotatedValue<i32>,
    shell_class: PrototypeClass,
}

impl ShellLauncherPrototype {
    pub fn new(shell_class: PrototypeClass) -> Self {
        Self {
            gun: GunFields::default(),
            shell_prototype: AnnotatedValue::new(PrototypeRef::Unset, "ShellPrototype")
                .always()
                .hint(DisplayHint::Reference),
            shells_pool_size: AnnotatedValue::new(10, "ShellsPoolSize"),
            shell_class,
        }
    }

    /// Class the shell prototype is expected to have.
    pub fn shell_class(&self) -> PrototypeClass {
        self.shell_class
    }
}

impl PrototypeFields for ShellLauncherPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.gun.load_from_xml(ctx, node)?;
        if self.shell_prototype.value.is_set() {
            self.shell_prototype.read(node)?;
        } else {
            self.shell_prototype.read_required(node)?;
        }
        self.shells_pool_size.read(node)?;
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.gun.post_load(resolver);
        resolver.resolve(&mut self.shell_prototype, &[self.shell_class]);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.gun.write_xml(element);
        self.shell_prototype.write(element);
        self.shells_pool_size.write(element);
    }
}

/// Nitro-style booster mounted in a gun slot.
#[derive(Clone, Debug, PartialEq)]
pub struct TurboAccelerationPusherPrototype {
    pub gun: GunFields,
    pub acceleration: AnnotatedValue<f32>,
    pub duration: AnnotatedValue<f32>,
}

impl Default for TurboAccelerationPusherPrototype {
    fn default() -> Self {
        Self {
            gun: GunFields::default(),
            acceleration: AnnotatedValue::new(0.0, "Acceleration"),
            duration: AnnotatedValue::new(0.0, "Duration"),
        }
    }
}

impl PrototypeFields for TurboAccelerationPusherPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.gun.load_from_xml(ctx, node)?;
        self.acceleration.read(node)?;
        self.duration.read(node)?;
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.gun.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.gun.write_xml(element);
        self.acceleration.write(element);
        self.duration.write(element);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prototypes::Prototype;
    use crate::prototypes::test::load_one;
    use crate::xml::AttrError;

    #[test]
    fn launchers_require_a_shell() {
        let result = load_one(r#"<Prototype Name="rl" Class="RocketLauncher" Damage="10"/>"#);
        assert_eq!(
            result,
            Err(LoadError::Attr(AttrError::missing("ShellPrototype")))
        );

        let proto = load_one(
            r#"<Prototype Name="rl" Class="RocketLauncher" ShellPrototype="rocket01"/>"#,
        )
        .unwrap();
        let launcher = proto.data.rocket_launcher_ref().unwrap();
        assert_eq!(launcher.shell_class(), PrototypeClass::Rocket);
        assert_eq!(launcher.shell_prototype.value, PrototypeRef::pending("rocket01"));

        let result = load_one(r#"<Prototype Name="ml" Class="MortarLauncher"/>"#);
        assert!(result.is_err());
        let proto =
            load_one(r#"<Prototype Name="ml" Class="MortarLauncher" ShellPrototype="lob"/>"#)
                .unwrap();
        let launcher = proto.data.mortar_launcher_ref().unwrap();
        assert_eq!(launcher.shell_class(), PrototypeClass::Mortar);
    }

    #[test]
    fn inherited_shell_satisfies_requirement() {
        let parent = load_one(
            r#"<Prototype Name="rl" Class="RocketLauncher" ShellPrototype="rocket01"/>"#,
        )
        .unwrap();
        let doc = roxmltree::Document::parse(
            r#"<Prototype Name="rl2" Class="RocketLauncher" ParentPrototype="rl" Damage="12"/>"#,
        )
        .unwrap();
        let registry = crate::resource_type::ResourceTypeRegistry::new();
        let ctx = LoadContext::builder().resource_types(&registry).build();

        let mut child = Prototype::new(PrototypeClass::RocketLauncher, "rl2");
        child.copy_from(&parent).unwrap();
        child.load_from_xml(&ctx, doc.root_element()).unwrap();
        let launcher = child.data.rocket_launcher_ref().unwrap();
        assert_eq!(launcher.shell_prototype.value, PrototypeRef::pending("rocket01"));
        assert_eq!(launcher.gun.damage.value, 12.0);
    }

    #[test]
    fn bullet_launcher_needs_no_shell() {
        let proto = load_one(
            r#"<Prototype Name="mg" Class="NailLauncher" TurningSpeed="90" Spread="2.5"/>"#,
        )
        .unwrap();
        let gun = proto.data.nail_launcher_ref().unwrap();
        assert!((gun.gun.turning_speed.value.value() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        let element = proto.to_xml();
        assert_eq!(element.attribute("TurningSpeed"), Some("90"));
        assert_eq!(element.attribute("Spread"), Some("2.5"));
    }
}
