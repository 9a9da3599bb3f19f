//! Vehicle roles: how an AI driver fights. All roles share one field set and
//! differ in their defaults.

use crate::units::MetersPerSecond;
use crate::value::{AnnotatedValue, DisplayHint};
use crate::xml::{Node, XmlElement};

use super::{LoadContext, LoadError, PrototypeClass, PrototypeFields, check_probability};

pub(crate) const ROLE_CLASSES: &[PrototypeClass] = &[
    PrototypeClass::VehicleRoleSniper,
    PrototypeClass::VehicleRoleCheater,
    PrototypeClass::VehicleRoleMeat,
    PrototypeClass::VehicleRoleOppressor,
    PrototypeClass::VehicleRoleCoward,
    PrototypeClass::VehicleRoleBarrier,
    PrototypeClass::VehicleRolePendulum,
];

#[derive(Clone, Debug, PartialEq)]
pub struct VehicleRolePrototype {
    /// Distance kept to the target while attacking.
    pub attack_distance: AnnotatedValue<f32>,
    /// Health fraction below which the vehicle breaks off.
    pub retreat_health: AnnotatedValue<f32>,
    pub attack_probability: AnnotatedValue<f32>,
    pub max_speed: AnnotatedValue<MetersPerSecond>,
}

impl VehicleRolePrototype {
    fn new(attack_distance: f32, retreat_health: f32) -> Self {
        Self {
            attack_distance: AnnotatedValue::new(attack_distance, "AttackDistance"),
            retreat_health: AnnotatedValue::new(retreat_health, "RetreatHealth")
                .hint(DisplayHint::Probability),
            attack_probability: AnnotatedValue::new(1.0, "AttackProbability")
                .hint(DisplayHint::Probability),
            max_speed: AnnotatedValue::new(MetersPerSecond::default(), "MaxSpeed")
                .hint(DisplayHint::Speed),
        }
    }

    /// Shoots from afar.
    pub fn sniper() -> Self {
        Self::new(150.0, 0.3)
    }

    /// Circles the target and strikes from behind.
    pub fn cheater() -> Self {
        Self::new(60.0, 0.2)
    }

    /// Rams and never retreats.
    pub fn meat() -> Self {
        Self::new(20.0, 0.0)
    }

    pub fn oppressor() -> Self {
        Self::new(40.0, 0.1)
    }

    pub fn coward() -> Self {
        Self::new(80.0, 0.7)
    }

    /// Blocks the target's way.
    pub fn barrier() -> Self {
        Self::new(30.0, 0.2)
    }

    /// Swings in and out of firing range.
    pub fn pendulum() -> Self {
        Self::new(50.0, 0.4)
    }
}

impl PrototypeFields for VehicleRolePrototype {
    fn load_from_xml(
        &mut self,
        _ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.attack_distance.read(node)?;
        self.retreat_health.read(node)?;
        self.attack_probability.read(node)?;
        self.max_speed.read(node)?;
        check_probability(&self.retreat_health);
        check_probability(&self.attack_probability);
        Ok(())
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.attack_distance.write(element);
        self.retreat_health.write(element);
        self.attack_probability.write(element);
        self.max_speed.write(element);
    }
}
