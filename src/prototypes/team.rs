//! AI: teams, their formations and vehicle generators, infection zones and
//! non-player characters.

use crate::geometry::Vector2;
use crate::reference::PrototypeRef;
use crate::value::{AnnotatedValue, DisplayHint};
use crate::xml::{AttrValue, Node, XmlElement, child_elements, parse_required_attr};

use super::entries::{load_entries, resolve_entries, write_entries};
use super::role::ROLE_CLASSES;
use super::ware::WARE_CLASSES;
use super::{
    CountedRef, LoadContext, LoadError, ProbableRef, PrototypeClass, PrototypeFields, Resolver,
};

pub(crate) const TEAM_CLASSES: &[PrototypeClass] = &[
    PrototypeClass::Team,
    PrototypeClass::CaravanTeam,
    PrototypeClass::InfectionTeam,
    PrototypeClass::VagabondTeam,
];

#[derive(Clone, Debug, PartialEq)]
pub struct TeamPrototype {
    pub formation_prototype: AnnotatedValue<PrototypeRef>,
    pub vehicles_generator_prototype: AnnotatedValue<PrototypeRef>,
    /// Driving role given to the team's vehicles.
    pub vehicle_role_prototype: AnnotatedValue<PrototypeRef>,
    pub belong: AnnotatedValue<i32>,
    pub max_vehicles: AnnotatedValue<i32>,
    pub remove_when_empty: AnnotatedValue<bool>,
    pub decision_matrix: AnnotatedValue<String>,
}

impl Default for TeamPrototype {
    fn default() -> Self {
        Self {
            formation_prototype: AnnotatedValue::new(PrototypeRef::Unset, "FormationPrototype")
                .always()
                .hint(DisplayHint::Reference),
            vehicles_generator_prototype: AnnotatedValue::new(
                PrototypeRef::Unset,
                "VehiclesGeneratorPrototype",
            )
            .hint(DisplayHint::Reference),
            vehicle_role_prototype: AnnotatedValue::new(
                PrototypeRef::Unset,
                "VehicleRolePrototype",
            )
            .hint(DisplayHint::Reference),
            belong: AnnotatedValue::new(0, "Belong"),
            max_vehicles: AnnotatedValue::new(1, "MaxVehicles"),
            remove_when_empty: AnnotatedValue::new(true, "RemoveWhenEmpty"),
            decision_matrix: AnnotatedValue::new(String::new(), "DecisionMatrix"),
        }
    }
}

impl PrototypeFields for TeamPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        if self.formation_prototype.value.is_set() {
            self.formation_prototype.read(node)?;
        } else {
            self.formation_prototype.read_required(node)?;
        }
        self.vehicles_generator_prototype.read(node)?;
        self.vehicle_role_prototype.read(node)?;
        self.belong.read(node)?;
        self.max_vehicles.read(node)?;
        self.remove_when_empty.read(node)?;
        self.decision_matrix.read(node)?;
        ctx.check_belong(node, &self.belong);
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        resolver.resolve(&mut self.formation_prototype, &[PrototypeClass::Formation]);
        resolver.resolve(
            &mut self.vehicles_generator_prototype,
            &[PrototypeClass::VehiclesGenerator],
        );
        resolver.resolve(&mut self.vehicle_role_prototype, ROLE_CLASSES);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.formation_prototype.write(element);
        self.vehicles_generator_prototype.write(element);
        self.vehicle_role_prototype.write(element);
        self.belong.write(element);
        self.max_vehicles.write(element);
        self.remove_when_empty.write(element);
        self.decision_matrix.write(element);
    }
}

/// Trade convoy: carries wares and may be escorted.
#[derive(Clone, Debug, PartialEq)]
pub struct CaravanTeamPrototype {
    pub team: TeamPrototype,
    pub guard_team_prototype: AnnotatedValue<PrototypeRef>,
    pub wares: Vec<CountedRef>,
}

impl Default for CaravanTeamPrototype {
    fn default() -> Self {
        Self {
            team: TeamPrototype::default(),
            guard_team_prototype: AnnotatedValue::new(PrototypeRef::Unset, "GuardTeamPrototype")
                .hint(DisplayHint::Reference),
            wares: Vec::new(),
        }
    }
}

impl PrototypeFields for CaravanTeamPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.team.load_from_xml(ctx, node)?;
        self.guard_team_prototype.read(node)?;
        load_entries(node, "Ware", &mut self.wares)
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.team.post_load(resolver);
        resolver.resolve(&mut self.guard_team_prototype, &[PrototypeClass::Team]);
        resolve_entries(resolver, &mut self.wares, WARE_CLASSES);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.team.write_xml(element);
        self.guard_team_prototype.write(element);
        write_entries(element, "Ware", &self.wares);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InfectionTeamPrototype {
    pub team: TeamPrototype,
    pub vehicles: Vec<CountedRef>,
}

impl PrototypeFields for InfectionTeamPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.team.load_from_xml(ctx, node)?;
        load_entries(node, "Vehicle", &mut self.vehicles)
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.team.post_load(resolver);
        resolve_entries(resolver, &mut self.vehicles, &[PrototypeClass::Vehicle]);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.team.write_xml(element);
        write_entries(element, "Vehicle", &self.vehicles);
    }
}

/// Team that roams around its spawn point instead of following a route.
#[derive(Clone, Debug, PartialEq)]
pub struct VagabondTeamPrototype {
    pub team: TeamPrototype,
    pub wander_radius: AnnotatedValue<f32>,
    pub stay_time: AnnotatedValue<f32>,
}

impl Default for VagabondTeamPrototype {
    fn default() -> Self {
        Self {
            team: TeamPrototype::default(),
            wander_radius: AnnotatedValue::new(500.0, "WanderRadius"),
            stay_time: AnnotatedValue::new(0.0, "StayTime"),
        }
    }
}

impl PrototypeFields for VagabondTeamPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.team.load_from_xml(ctx, node)?;
        self.wander_radius.read(node)?;
        self.stay_time.read(node)?;
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.team.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.team.write_xml(element);
        self.wander_radius.write(element);
        self.stay_time.write(element);
    }
}

const POINT_TAG: &str = "Point";

/// Slot layout of a moving team. Points are offsets from the leader.
#[derive(Clone, Debug, PartialEq)]
pub struct FormationPrototype {
    pub max_vehicles: AnnotatedValue<i32>,
    pub lines_distance: AnnotatedValue<f32>,
    pub vehicles_distance: AnnotatedValue<f32>,
    pub points: Vec<Vector2>,
}

impl Default for FormationPrototype {
    fn default() -> Self {
        Self {
            max_vehicles: AnnotatedValue::new(5, "MaxVehicles"),
            lines_distance: AnnotatedValue::new(10.0, "LinesDistance"),
            vehicles_distance: AnnotatedValue::new(10.0, "VehiclesDistance"),
            points: Vec::new(),
        }
    }
}

impl PrototypeFields for FormationPrototype {
    fn load_from_xml(
        &mut self,
        _ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.max_vehicles.read(node)?;
        self.lines_distance.read(node)?;
        self.vehicles_distance.read(node)?;

        let mut points = child_elements(node, POINT_TAG).peekable();
        if points.peek().is_some() {
            self.points = points
                .map(|point| {
                    parse_required_attr::<Vector2>(point, "Pos").map_err(|source| {
                        LoadError::Entry {
                            tag: POINT_TAG,
                            source,
                        }
                    })
                })
                .collect::<Result<_, _>>()?;
        }
        Ok(())
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.max_vehicles.write(element);
        self.lines_distance.write(element);
        self.vehicles_distance.write(element);
        for point in &self.points {
            element.push(XmlElement::new(POINT_TAG).with_attr("Pos", point.format_attr()));
        }
    }
}

/// Weighted pool of vehicles a team is filled from.
#[derive(Clone, Debug, PartialEq)]
pub struct VehiclesGeneratorPrototype {
    pub desired_count: AnnotatedValue<i32>,
    pub vehicles: Vec<ProbableRef>,
}

impl Default for VehiclesGeneratorPrototype {
    fn default() -> Self {
        Self {
            desired_count: AnnotatedValue::new(1, "DesiredCount"),
            vehicles: Vec::new(),
        }
    }
}

impl PrototypeFields for VehiclesGeneratorPrototype {
    fn load_from_xml(
        &mut self,
        _ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.desired_count.read(node)?;
        load_entries(node, "Vehicle", &mut self.vehicles)
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        resolve_entries(resolver, &mut self.vehicles, &[PrototypeClass::Vehicle]);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.desired_count.write(element);
        write_entries(element, "Vehicle", &self.vehicles);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InfectionZonePrototype {
    pub team_prototype: AnnotatedValue<PrototypeRef>,
    pub radius: AnnotatedValue<f32>,
    pub max_teams: AnnotatedValue<i32>,
    pub respawn_time: AnnotatedValue<f32>,
}

impl Default for InfectionZonePrototype {
    fn default() -> Self {
        Self {
            team_prototype: AnnotatedValue::new(PrototypeRef::Unset, "TeamPrototype")
                .hint(DisplayHint::Reference),
            radius: AnnotatedValue::new(100.0, "Radius"),
            max_teams: AnnotatedValue::new(1, "MaxTeams"),
            respawn_time: AnnotatedValue::new(60.0, "RespawnTime"),
        }
    }
}

impl PrototypeFields for InfectionZonePrototype {
    fn load_from_xml(
        &mut self,
        _ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.team_prototype.read(node)?;
        self.radius.read(node)?;
        self.max_teams.read(node)?;
        self.respawn_time.read(node)?;
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        resolver.resolve(&mut self.team_prototype, TEAM_CLASSES);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.team_prototype.write(element);
        self.radius.write(element);
        self.max_teams.write(element);
        self.respawn_time.write(element);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NpcPrototype {
    pub model_name: AnnotatedValue<String>,
    pub npc_type: AnnotatedValue<String>,
    pub belong: AnnotatedValue<i32>,
    pub skin: AnnotatedValue<i32>,
}

impl Default for NpcPrototype {
    fn default() -> Self {
        Self {
            model_name: AnnotatedValue::new(String::new(), "ModelName").hint(DisplayHint::Model),
            npc_type: AnnotatedValue::new(String::new(), "NpcType"),
            belong: AnnotatedValue::new(0, "Belong"),
            skin: AnnotatedValue::new(0, "Skin"),
        }
    }
}

impl PrototypeFields for NpcPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.model_name.read(node)?;
        self.npc_type.read(node)?;
        self.belong.read(node)?;
        self.skin.read(node)?;
        ctx.check_belong(node, &self.belong);
        Ok(())
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.model_name.write(element);
        self.npc_type.write(element);
        self.belong.write(element);
        self.skin.write(element);
    }
}
