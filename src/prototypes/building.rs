//! Buildings and settlements.

use tracing::debug;

use crate::reference::PrototypeRef;
use crate::units::Radians;
use crate::value::{AnnotatedValue, DisplayHint};
use crate::xml::{AttrError, Node, XmlElement, child_elements};

use super::entries::{load_entries, resolve_entries, write_entries};
use super::gun::GUN_CLASSES;
use super::team::TEAM_CLASSES;
use super::ware::WARE_CLASSES;
use super::{
    CountedRef, LoadContext, LoadError, PhysicBodyFields, ProbableRef, PrototypeClass,
    PrototypeFields, Resolver, check_probability, check_range,
};

const HEALTH_ZONE_TAG: &str = "HealthZone";

/// Separately damageable part of a building.
#[derive(Clone, Debug, PartialEq)]
pub struct HealthZone {
    pub name: AnnotatedValue<String>,
    pub max_health: AnnotatedValue<f32>,
}

impl HealthZone {
    pub fn new(name: impl Into<String>) -> Self {
        let mut zone = Self {
            name: AnnotatedValue::new(String::new(), "Name")
                .always()
                .hint(DisplayHint::ReadOnly),
            max_health: AnnotatedValue::new(0.0, "MaxHealth"),
        };
        zone.name.value = name.into();
        zone
    }

    fn from_xml(node: Node<'_, '_>) -> Result<Self, AttrError> {
        let mut zone = Self::new("");
        zone.name.read_required(node)?;
        zone.max_health.read(node)?;
        Ok(zone)
    }

    fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new(HEALTH_ZONE_TAG);
        self.name.write(&mut element);
        self.max_health.write(&mut element);
        element
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BuildingPrototype {
    pub body: PhysicBodyFields,
    pub destroyed_model_file: AnnotatedValue<String>,
    pub health_zones: Vec<HealthZone>,
    /// Zones came from the model file rather than the XML; they are not
    /// written back.
    zones_from_model: bool,
}

impl Default for BuildingPrototype {
    fn default() -> Self {
        Self {
            body: PhysicBodyFields::default(),
            destroyed_model_file: AnnotatedValue::new(String::new(), "DestroyedModelFile")
                .hint(DisplayHint::Model),
            health_zones: Vec::new(),
            zones_from_model: false,
        }
    }
}

impl BuildingPrototype {
    pub fn zones_from_model(&self) -> bool {
        self.zones_from_model
    }

    fn load_health_zones(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        let mut explicit = child_elements(node, HEALTH_ZONE_TAG).peekable();
        if explicit.peek().is_some() {
            self.health_zones = explicit
                .map(|child| {
                    HealthZone::from_xml(child).map_err(|source| LoadError::Entry {
                        tag: HEALTH_ZONE_TAG,
                        source,
                    })
                })
                .collect::<Result<_, _>>()?;
            self.zones_from_model = false;
            return Ok(());
        }

        // Zones written out for a parent stay; model zones follow the model.
        if !self.health_zones.is_empty() && !self.zones_from_model {
            return Ok(());
        }
        let model_file = &self.body.obj.model_file.value;
        if model_file.is_empty() {
            return Ok(());
        }
        if let Some(names) = ctx.health_zone_names(model_file) {
            debug!(model = %model_file, zones = names.len(), "health zones taken from model");
            self.health_zones = names.into_iter().map(HealthZone::new).collect();
            self.zones_from_model = true;
        }
        Ok(())
    }
}

impl PrototypeFields for BuildingPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.body.load_from_xml(ctx, node)?;
        self.destroyed_model_file.read(node)?;
        self.load_health_zones(ctx, node)
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.body.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.body.write_xml(element);
        self.destroyed_model_file.write(element);
        if !self.zones_from_model {
            for zone in &self.health_zones {
                element.push(zone.to_xml());
            }
        }
    }
}

/// Road block that may or may not be spawned.
#[derive(Clone, Debug, PartialEq)]
pub struct BarricadePrototype {
    pub building: BuildingPrototype,
    pub probability: AnnotatedValue<f32>,
}

impl Default for BarricadePrototype {
    fn default() -> Self {
        Self {
            building: BuildingPrototype::default(),
            probability: AnnotatedValue::new(1.0, "Probability").hint(DisplayHint::Probability),
        }
    }
}

impl PrototypeFields for BarricadePrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.building.load_from_xml(ctx, node)?;
        self.probability.read(node)?;
        check_probability(&self.probability);
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.building.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.building.write_xml(element);
        self.probability.write(element);
    }
}

/// Building owned by a belong and guarded by a team.
#[derive(Clone, Debug, PartialEq)]
pub struct SettlementFields {
    pub building: BuildingPrototype,
    pub belong: AnnotatedValue<i32>,
    pub guard_team_prototype: AnnotatedValue<PrototypeRef>,
}

impl Default for SettlementFields {
    fn default() -> Self {
        Self {
            building: BuildingPrototype::default(),
            belong: AnnotatedValue::new(0, "Belong"),
            guard_team_prototype: AnnotatedValue::new(PrototypeRef::Unset, "GuardTeamPrototype")
                .hint(DisplayHint::Reference),
        }
    }
}

impl PrototypeFields for SettlementFields {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.building.load_from_xml(ctx, node)?;
        self.belong.read(node)?;
        self.guard_team_prototype.read(node)?;
        ctx.check_belong(node, &self.belong);
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.building.post_load(resolver);
        resolver.resolve(&mut self.guard_team_prototype, TEAM_CLASSES);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.building.write_xml(element);
        self.belong.write(element);
        self.guard_team_prototype.write(element);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TownPrototype {
    pub settlement: SettlementFields,
    pub price_coefficient: AnnotatedValue<f32>,
    pub wares: Vec<CountedRef>,
    pub vehicles: Vec<CountedRef>,
}

impl Default for TownPrototype {
    fn default() -> Self {
        Self {
            settlement: SettlementFields::default(),
            price_coefficient: AnnotatedValue::new(0.0, "PriceCoefficient"),
            wares: Vec::new(),
            vehicles: Vec::new(),
        }
    }
}

impl PrototypeFields for TownPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.settlement.load_from_xml(ctx, node)?;
        self.price_coefficient.read(node)?;
        check_range(&self.price_coefficient, -25.0, 25.0);
        load_entries(node, "Ware", &mut self.wares)?;
        load_entries(node, "Vehicle", &mut self.vehicles)
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.settlement.post_load(resolver);
        resolve_entries(resolver, &mut self.wares, WARE_CLASSES);
        resolve_entries(resolver, &mut self.vehicles, &[PrototypeClass::Vehicle]);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.settlement.write_xml(element);
        self.price_coefficient.write(element);
        write_entries(element, "Ware", &self.wares);
        write_entries(element, "Vehicle", &self.vehicles);
    }
}

/// Bandit camp that keeps a number of teams alive.
#[derive(Clone, Debug, PartialEq)]
pub struct LairPrototype {
    pub settlement: SettlementFields,
    pub max_teams: AnnotatedValue<i32>,
    pub respawn_time: AnnotatedValue<f32>,
    pub teams: Vec<ProbableRef>,
}

impl Default for LairPrototype {
    fn default() -> Self {
        Self {
            settlement: SettlementFields::default(),
            max_teams: AnnotatedValue::new(1, "MaxTeams"),
            respawn_time: AnnotatedValue::new(0.0, "RespawnTime"),
            teams: Vec::new(),
        }
    }
}

impl PrototypeFields for LairPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.settlement.load_from_xml(ctx, node)?;
        self.max_teams.read(node)?;
        self.respawn_time.read(node)?;
        load_entries(node, "Team", &mut self.teams)
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.settlement.post_load(resolver);
        resolve_entries(resolver, &mut self.teams, TEAM_CLASSES);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.settlement.write_xml(element);
        self.max_teams.write(element);
        self.respawn_time.write(element);
        write_entries(element, "Team", &self.teams);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InfectionLairPrototype {
    pub settlement: SettlementFields,
    pub infection_zone_prototype: AnnotatedValue<PrototypeRef>,
}

impl Default for InfectionLairPrototype {
    fn default() -> Self {
        Self {
            settlement: SettlementFields::default(),
            infection_zone_prototype: AnnotatedValue::new(
                PrototypeRef::Unset,
                "InfectionZonePrototype",
            )
            .hint(DisplayHint::Reference),
        }
    }
}

impl PrototypeFields for InfectionLairPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.settlement.load_from_xml(ctx, node)?;
        self.infection_zone_prototype.read(node)?;
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.settlement.post_load(resolver);
        resolver.resolve(
            &mut self.infection_zone_prototype,
            &[PrototypeClass::InfectionZone],
        );
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.settlement.write_xml(element);
        self.infection_zone_prototype.write(element);
    }
}

/// Turret fixed to the ground.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticAutoGunPrototype {
    pub building: BuildingPrototype,
    pub gun_prototype: AnnotatedValue<PrototypeRef>,
    pub turning_speed: AnnotatedValue<Radians>,
    pub belong: AnnotatedValue<i32>,
}

impl Default for StaticAutoGunPrototype {
    fn default() -> Self {
        Self {
            building: BuildingPrototype::default(),
            gun_prototype: AnnotatedValue::new(PrototypeRef::Unset, "GunPrototype")
                .hint(DisplayHint::Reference),
            turning_speed: AnnotatedValue::new(Radians::default(), "TurningSpeed")
                .hint(DisplayHint::Angle),
            belong: AnnotatedValue::new(0, "Belong"),
        }
    }
}

impl PrototypeFields for StaticAutoGunPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.building.load_from_xml(ctx, node)?;
        self.gun_prototype.read(node)?;
        self.turning_speed.read(node)?;
        self.belong.read(node)?;
        ctx.check_belong(node, &self.belong);
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.building.post_load(resolver);
        resolver.resolve(&mut self.gun_prototype, GUN_CLASSES);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.building.write_xml(element);
        self.gun_prototype.write(element);
        self.turning_speed.write(element);
        self.belong.write(element);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::models::StaticModels;
    use crate::prototypes::test::{load_one, load_with};
    use crate::resource_type::ResourceTypeRegistry;

    #[test]
    fn explicit_health_zones() {
        let proto = load_one(
            r#"<Prototype Name="hangar" Class="Building" ModelFile="hangar.mdl">
                <HealthZone Name="roof" MaxHealth="50"/>
                <HealthZone Name="walls"/>
            </Prototype>"#,
        )
        .unwrap();
        let building = proto.data.building_ref().unwrap();
        assert_eq!(building.health_zones.len(), 2);
        assert_eq!(building.health_zones[0].max_health.value, 50.0);
        assert!(!building.zones_from_model());
        assert_eq!(proto.to_xml().children().len(), 2);
    }

    #[test]
    fn health_zones_from_model_are_not_saved() {
        let registry = ResourceTypeRegistry::new();
        let models = StaticModels::new().with_zones("hangar.mdl", ["roof", "walls", "door"]);
        let ctx = LoadContext::builder()
            .resource_types(&registry)
            .models(&models)
            .build();
        let proto = load_with(
            &ctx,
            r#"<Prototype Name="hangar" Class="Building" ModelFile="hangar.mdl"/>"#,
        )
        .unwrap();
        let building = proto.data.building_ref().unwrap();
        assert_eq!(building.health_zones.len(), 3);
        assert_eq!(building.health_zones[2].name.value, "door");
        assert!(building.zones_from_model());
        assert!(proto.to_xml().children().is_empty());
    }

    #[test]
    fn health_zone_without_name_fails() {
        let result = load_one(
            r#"<Prototype Name="hangar" Class="Building"><HealthZone MaxHealth="1"/></Prototype>"#,
        );
        assert!(matches!(
            result,
            Err(LoadError::Entry {
                tag: "HealthZone",
                ..
            })
        ));
    }

    #[test]
    fn town_price_coefficient_out_of_range_is_kept() {
        let proto = load_one(
            r#"<Prototype Name="bridgetown" Class="Town" PriceCoefficient="40" Belong="3">
                <Ware Prototype="medkit"/>
                <Vehicle Prototype="truck" Count="2"/>
            </Prototype>"#,
        )
        .unwrap();
        let town = proto.data.town_ref().unwrap();
        assert_eq!(town.price_coefficient.value, 40.0);
        assert_eq!(town.settlement.belong.value, 3);
        assert_eq!(town.wares.len(), 1);
        assert_eq!(town.vehicles[0].count.value, 2);
    }

    #[test]
    fn barricade_probability() {
        let proto =
            load_one(r#"<Prototype Name="block" Class="Barricade" Probability="0.25"/>"#).unwrap();
        assert_eq!(proto.data.barricade_ref().unwrap().probability.value, 0.25);
        assert_eq!(proto.to_xml().attribute("Probability"), Some("0.25"));
    }
}
