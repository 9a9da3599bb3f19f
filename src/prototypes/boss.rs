//! Bosses: large armed structures with movable gun arms.

use tracing::warn;

use crate::reference::PrototypeRef;
use crate::units::Radians;
use crate::value::{AnnotatedValue, DisplayHint};
use crate::xml::{Node, XmlElement};

use super::entries::{load_entries, resolve_entries, write_entries};
use super::gun::GUN_CLASSES;
use super::{
    CountedRef, LoadContext, LoadError, PhysicBodyFields, PrototypeClass, PrototypeFields,
    Resolver, SettlementFields, check_probability,
};

pub(crate) const BOSS_CLASSES: &[PrototypeClass] = &[
    PrototypeClass::Boss01,
    PrototypeClass::Boss02,
    PrototypeClass::Boss03,
    PrototypeClass::Boss04,
];

const GUN_TAG: &str = "Gun";

/// A rotating arm that carries one gun.
#[derive(Clone, Debug, PartialEq)]
pub struct BossArmPrototype {
    pub body: PhysicBodyFields,
    pub gun_prototype: AnnotatedValue<PrototypeRef>,
    pub turning_speed: AnnotatedValue<Radians>,
    pub max_angle: AnnotatedValue<Radians>,
}

impl Default for BossArmPrototype {
    fn default() -> Self {
        Self {
            body: PhysicBodyFields::default(),
            gun_prototype: AnnotatedValue::new(PrototypeRef::Unset, "GunPrototype")
                .hint(DisplayHint::Reference),
            turning_speed: AnnotatedValue::new(Radians::default(), "TurningSpeed")
                .hint(DisplayHint::Angle),
            max_angle: AnnotatedValue::new(Radians::default(), "MaxAngle")
                .hint(DisplayHint::Angle),
        }
    }
}

impl PrototypeFields for BossArmPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.body.load_from_xml(ctx, node)?;
        self.gun_prototype.read(node)?;
        self.turning_speed.read(node)?;
        self.max_angle.read(node)?;
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.body.post_load(resolver);
        resolver.resolve(&mut self.gun_prototype, GUN_CLASSES);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.body.write_xml(element);
        self.gun_prototype.write(element);
        self.turning_speed.write(element);
        self.max_angle.write(element);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BossPrototype {
    pub settlement: SettlementFields,
    pub arm_prototype: AnnotatedValue<PrototypeRef>,
    pub max_arms: AnnotatedValue<i32>,
    pub turning_speed: AnnotatedValue<Radians>,
    /// Health fraction at which the boss moves on to its next phase.
    pub next_phase_health: AnnotatedValue<f32>,
    pub guns: Vec<CountedRef>,
}

impl Default for BossPrototype {
    fn default() -> Self {
        Self {
            settlement: SettlementFields::default(),
            arm_prototype: AnnotatedValue::new(PrototypeRef::Unset, "ArmPrototype")
                .hint(DisplayHint::Reference),
            max_arms: AnnotatedValue::new(2, "MaxArms"),
            turning_speed: AnnotatedValue::new(Radians::default(), "TurningSpeed")
                .hint(DisplayHint::Angle),
            next_phase_health: AnnotatedValue::new(0.5, "NextPhaseHealth")
                .hint(DisplayHint::Probability),
            guns: Vec::new(),
        }
    }
}

impl PrototypeFields for BossPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.settlement.load_from_xml(ctx, node)?;
        self.arm_prototype.read(node)?;
        self.max_arms.read(node)?;
        self.turning_speed.read(node)?;
        self.next_phase_health.read(node)?;
        check_probability(&self.next_phase_health);
        if self.max_arms.value < 0 {
            warn!(max_arms = self.max_arms.value, "negative arm count");
        }
        load_entries(node, GUN_TAG, &mut self.guns)
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.settlement.post_load(resolver);
        resolver.resolve(&mut self.arm_prototype, &[PrototypeClass::BossArm]);
        resolve_entries(resolver, &mut self.guns, GUN_CLASSES);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.settlement.write_xml(element);
        self.arm_prototype.write(element);
        self.max_arms.write(element);
        self.turning_speed.write(element);
        self.next_phase_health.write(element);
        write_entries(element, GUN_TAG, &self.guns);
    }
}
