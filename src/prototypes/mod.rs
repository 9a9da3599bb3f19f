//! Prototype classes.
//!
//! A prototype is a named template for one kind of game object. The
//! attributes every class shares live in [`PrototypeInfo`]; the rest is held
//! by one [`PrototypeData`] variant per class. Classes are built from shared
//! field levels by composition (a `Town` holds settlement fields, which hold
//! building fields, which hold physical body fields, ...). Each level loads
//! its base first and stops at the first failure.

mod boss;
mod building;
mod entries;
mod gun;
mod info;
mod physic;
mod quest;
mod role;
mod shell;
mod team;
mod vehicle;
mod vehicle_part;
mod ware;

pub use boss::{BossArmPrototype, BossPrototype};
pub use building::{
    BarricadePrototype, BuildingPrototype, HealthZone, InfectionLairPrototype, LairPrototype,
    SettlementFields, StaticAutoGunPrototype, TownPrototype,
};
pub use entries::{CountedRef, ProbableRef};
pub use gun::{
    BulletLauncherPrototype, GUN_CLASSES, GunFields, ShellLauncherPrototype,
    TurboAccelerationPusherPrototype,
};
pub use info::PrototypeInfo;
pub use physic::{
    AnimatedComplexObjPrototype, ChestPrototype, DummyObjectPrototype, GeometryFields,
    JointedObjPrototype, LampPrototype, LightObjPrototype, PhysicBodyFields, PhysicObjFields,
    SimplePhysicObjPrototype,
};
pub use quest::{DynamicQuestFields, DynamicQuestPrototype};
pub use role::VehicleRolePrototype;
pub use shell::{
    BlastWavePrototype, MinePrototype, MortarPrototype, RocketPrototype, SHELL_CLASSES,
    ShellFields, SimpleShellPrototype,
};
pub use team::{
    CaravanTeamPrototype, FormationPrototype, InfectionTeamPrototype, InfectionZonePrototype,
    NpcPrototype, TeamPrototype, VagabondTeamPrototype, VehiclesGeneratorPrototype,
};
pub use vehicle::{PartSlot, VehiclePrototype};
pub use vehicle_part::{
    BasketPrototype, CabinPrototype, ChassisPrototype, VehiclePartFields, WheelPrototype,
};
pub use ware::{GadgetPrototype, QuestItemPrototype, SaleInfo, WarePrototype};

use bon::Builder;
use thiserror::Error;
use tracing::warn;
use variantly::Variantly;

use self::info::IDENTITY_ATTRIBUTES;

use crate::affix::AffixRegistry;
use crate::models::ModelLookup;
use crate::reference::{NameIndex, PrototypeId, PrototypeRef};
use crate::relationship::RelationshipTable;
use crate::resource_type::ResourceTypeRegistry;
use crate::value::AnnotatedValue;
use crate::xml::{AttrError, Node, XmlElement};

pub const PROTOTYPE_TAG: &str = "Prototype";

/// Reason a single prototype was rejected. The manager logs it and moves on
/// to the next node.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoadError {
    #[error(transparent)]
    Attr(#[from] AttrError),
    #[error("parent prototype {parent:?} is a {found}, expected {expected}")]
    ParentClassMismatch {
        parent: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("invalid <{tag}> entry: {source}")]
    Entry {
        tag: &'static str,
        #[source]
        source: AttrError,
    },
}

/// Registries a prototype may consult while loading.
#[derive(Builder, Clone, Copy)]
pub struct LoadContext<'a> {
    resource_types: &'a ResourceTypeRegistry,
    affixes: Option<&'a AffixRegistry>,
    relationships: Option<&'a RelationshipTable>,
    models: Option<&'a dyn ModelLookup>,
}

impl<'a> LoadContext<'a> {
    pub fn resource_types(&self) -> &'a ResourceTypeRegistry {
        self.resource_types
    }

    pub fn affixes(&self) -> Option<&'a AffixRegistry> {
        self.affixes
    }

    pub fn relationships(&self) -> Option<&'a RelationshipTable> {
        self.relationships
    }

    pub fn health_zone_names(&self, model_file: &str) -> Option<Vec<String>> {
        self.models?.health_zone_names(model_file)
    }

    /// Warns if a `Belong` attribute present on `node` is not a known belong.
    pub(crate) fn check_belong(&self, node: Node<'_, '_>, belong: &AnnotatedValue<i32>) {
        if node.attribute(belong.name()).is_none() {
            return;
        }
        if let Some(table) = self.relationships
            && !table.contains(belong.value)
        {
            warn!(field = belong.name(), belong = belong.value, "unknown belong");
        }
    }

    pub(crate) fn check_affix_group(&self, group: &AnnotatedValue<String>) {
        if group.value.is_empty() {
            return;
        }
        if let Some(affixes) = self.affixes
            && !affixes.contains_group(&group.value)
        {
            warn!(field = group.name(), group = %group.value, "unknown affix group");
        }
    }
}

/// Second-pass view handed to `post_load`.
pub struct Resolver<'a> {
    index: &'a NameIndex,
    owner: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a NameIndex, owner: &'a str) -> Self {
        Self { index, owner }
    }

    pub fn resolve(&self, field: &mut AnnotatedValue<PrototypeRef>, expected: &[PrototypeClass]) {
        let name = field.name();
        field.value.resolve(self.index, self.owner, name, expected);
    }
}

/// One level of prototype fields.
pub trait PrototypeFields {
    /// Reads this level's attributes. Implementations call their base
    /// level first and return its failure unchanged.
    fn load_from_xml(&mut self, ctx: &LoadContext<'_>, node: Node<'_, '_>)
    -> Result<(), LoadError>;

    /// Binds by-name references once every prototype is registered.
    fn post_load(&mut self, _resolver: &Resolver<'_>) {}

    fn write_xml(&self, element: &mut XmlElement);
}

pub(crate) fn check_range(field: &AnnotatedValue<f32>, min: f32, max: f32) {
    if !(min..=max).contains(&field.value) {
        warn!(
            field = field.name(),
            value = field.value,
            min,
            max,
            "value out of range"
        );
    }
}

pub(crate) fn check_probability(field: &AnnotatedValue<f32>) {
    check_range(field, 0.0, 1.0);
}

/// Broad grouping of classes, used for resource checks and listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassFamily {
    Physic,
    Building,
    VehiclePart,
    Gun,
    Shell,
    Vehicle,
    Ware,
    Ai,
    Quest,
}

impl ClassFamily {
    /// Resource type every prototype of this family must fall under, when
    /// the registry defines it.
    pub fn resource_category(self) -> Option<&'static str> {
        match self {
            ClassFamily::Gun => Some("GUN"),
            ClassFamily::Ware => Some("WARE"),
            ClassFamily::VehiclePart => Some("VEHICLE_PART"),
            _ => None,
        }
    }
}

macro_rules! prototype_classes {
    ($($class:ident => $family:ident, $data:ty, $ctor:expr;)*) => {
        /// Every class the `Class` attribute may name.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum PrototypeClass {
            $($class,)*
        }

        impl PrototypeClass {
            pub const ALL: &'static [PrototypeClass] = &[$(PrototypeClass::$class,)*];

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($class) => Some(Self::$class),)*
                    _ => None,
                }
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$class => stringify!($class),)*
                }
            }

            pub fn family(self) -> ClassFamily {
                match self {
                    $(Self::$class => ClassFamily::$family,)*
                }
            }

            /// Fields of this class at their defaults.
            pub fn instantiate(self) -> PrototypeData {
                match self {
                    $(Self::$class => PrototypeData::$class($ctor),)*
                }
            }
        }

        #[derive(Clone, Debug, PartialEq, Variantly)]
        pub enum PrototypeData {
            $($class($data),)*
        }

        impl PrototypeData {
            pub fn class(&self) -> PrototypeClass {
                match self {
                    $(Self::$class(_) => PrototypeClass::$class,)*
                }
            }

            fn fields(&self) -> &dyn PrototypeFields {
                match self {
                    $(Self::$class(data) => data,)*
                }
            }

            fn fields_mut(&mut self) -> &mut dyn PrototypeFields {
                match self {
                    $(Self::$class(data) => data,)*
                }
            }
        }
    };
}

prototype_classes! {
    SimplePhysicObj => Physic, SimplePhysicObjPrototype, SimplePhysicObjPrototype::default();
    DummyObject => Physic, DummyObjectPrototype, DummyObjectPrototype::default();
    Chest => Physic, ChestPrototype, ChestPrototype::default();
    LightObj => Physic, LightObjPrototype, LightObjPrototype::default();
    Lamp => Physic, LampPrototype, LampPrototype::default();
    JointedObj => Physic, JointedObjPrototype, JointedObjPrototype::default();
    AnimatedComplexObj => Physic, AnimatedComplexObjPrototype, AnimatedComplexObjPrototype::default();
    BossArm => Physic, BossArmPrototype, BossArmPrototype::default();

    Building => Building, BuildingPrototype, BuildingPrototype::default();
    Barricade => Building, BarricadePrototype, BarricadePrototype::default();
    Town => Building, TownPrototype, TownPrototype::default();
    Lair => Building, LairPrototype, LairPrototype::default();
    InfectionLair => Building, InfectionLairPrototype, InfectionLairPrototype::default();
    StaticAutoGun => Building, StaticAutoGunPrototype, StaticAutoGunPrototype::default();
    Boss01 => Building, BossPrototype, BossPrototype::default();
    Boss02 => Building, BossPrototype, BossPrototype::default();
    Boss03 => Building, BossPrototype, BossPrototype::default();
    Boss04 => Building, BossPrototype, BossPrototype::default();

    Chassis => VehiclePart, ChassisPrototype, ChassisPrototype::default();
    Cabin => VehiclePart, CabinPrototype, CabinPrototype::default();
    Basket => VehiclePart, BasketPrototype, BasketPrototype::default();
    Wheel => VehiclePart, WheelPrototype, WheelPrototype::default();

    BulletLauncher => Gun, BulletLauncherPrototype, BulletLauncherPrototype::default();
    NailLauncher => Gun, BulletLauncherPrototype, BulletLauncherPrototype::default();
    RocketLauncher => Gun, ShellLauncherPrototype, ShellLauncherPrototype::new(PrototypeClass::Rocket);
    PlasmaBunchLauncher => Gun, ShellLauncherPrototype, ShellLauncherPrototype::new(PrototypeClass::PlasmaBunch);
    ThunderboltLauncher => Gun, ShellLauncherPrototype, ShellLauncherPrototype::new(PrototypeClass::Thunderbolt);
    MineLauncher => Gun, ShellLauncherPrototype, ShellLauncherPrototype::new(PrototypeClass::Mine);
    MortarLauncher => Gun, ShellLauncherPrototype, ShellLauncherPrototype::new(PrototypeClass::Mortar);
    TurboAccelerationPusher => Gun, TurboAccelerationPusherPrototype, TurboAccelerationPusherPrototype::default();

    Rocket => Shell, RocketPrototype, RocketPrototype::default();
    PlasmaBunch => Shell, SimpleShellPrototype, SimpleShellPrototype::default();
    Mine => Shell, MinePrototype, MinePrototype::default();
    Thunderbolt => Shell, SimpleShellPrototype, SimpleShellPrototype::default();
    Mortar => Shell, MortarPrototype, MortarPrototype::default();
    BlastWave => Shell, BlastWavePrototype, BlastWavePrototype::default();

    Vehicle => Vehicle, VehiclePrototype, VehiclePrototype::default();

    Ware => Ware, WarePrototype, WarePrototype::default();
    Gadget => Ware, GadgetPrototype, GadgetPrototype::default();
    QuestItem => Ware, QuestItemPrototype, QuestItemPrototype::default();

    Team => Ai, TeamPrototype, TeamPrototype::default();
    CaravanTeam => Ai, CaravanTeamPrototype, CaravanTeamPrototype::default();
    InfectionTeam => Ai, InfectionTeamPrototype, InfectionTeamPrototype::default();
    VagabondTeam => Ai, VagabondTeamPrototype, VagabondTeamPrototype::default();
    Formation => Ai, FormationPrototype, FormationPrototype::default();
    VehiclesGenerator => Ai, VehiclesGeneratorPrototype, VehiclesGeneratorPrototype::default();
    InfectionZone => Ai, InfectionZonePrototype, InfectionZonePrototype::default();
    NPC => Ai, NpcPrototype, NpcPrototype::default();
    VehicleRoleSniper => Ai, VehicleRolePrototype, VehicleRolePrototype::sniper();
    VehicleRoleCheater => Ai, VehicleRolePrototype, VehicleRolePrototype::cheater();
    VehicleRoleMeat => Ai, VehicleRolePrototype, VehicleRolePrototype::meat();
    VehicleRoleOppressor => Ai, VehicleRolePrototype, VehicleRolePrototype::oppressor();
    VehicleRoleCoward => Ai, VehicleRolePrototype, VehicleRolePrototype::coward();
    VehicleRoleBarrier => Ai, VehicleRolePrototype, VehicleRolePrototype::barrier();
    VehicleRolePendulum => Ai, VehicleRolePrototype, VehicleRolePrototype::pendulum();

    DynamicQuestConvoy => Quest, DynamicQuestPrototype, DynamicQuestPrototype::convoy();
    DynamicQuestDestroy => Quest, DynamicQuestPrototype, DynamicQuestPrototype::destroy();
    DynamicQuestHunt => Quest, DynamicQuestPrototype, DynamicQuestPrototype::hunt();
    DynamicQuestPeace => Quest, DynamicQuestPrototype, DynamicQuestPrototype::peace();
    DynamicQuestReach => Quest, DynamicQuestPrototype, DynamicQuestPrototype::reach();
}

impl PrototypeClass {
    pub fn resource_category(self) -> Option<&'static str> {
        self.family().resource_category()
    }

    /// Child element tags a prototype of this class may contain.
    pub fn child_tags(self) -> &'static [&'static str] {
        use PrototypeClass::*;
        match self {
            Chest | CaravanTeam => &["Ware"],
            Building | Barricade | InfectionLair | StaticAutoGun => &["HealthZone"],
            Town => &["HealthZone", "Ware", "Vehicle"],
            Lair => &["HealthZone", "Team"],
            Boss01 | Boss02 | Boss03 | Boss04 => &["HealthZone", "Gun"],
            Vehicle => &["VehiclePart"],
            InfectionTeam | VehiclesGenerator => &["Vehicle"],
            Formation => &["Point"],
            _ => &[],
        }
    }
}

impl std::fmt::Display for PrototypeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Prototype {
    pub info: PrototypeInfo,
    pub data: PrototypeData,
}

impl Prototype {
    pub fn new(class: PrototypeClass, name: impl Into<String>) -> Self {
        Self {
            info: PrototypeInfo::new(class, name.into()),
            data: class.instantiate(),
        }
    }

    pub fn class(&self) -> PrototypeClass {
        self.info.class()
    }

    pub fn name(&self) -> &str {
        self.info.name()
    }

    pub fn id(&self) -> Option<PrototypeId> {
        self.info.id()
    }

    pub fn is_abstract(&self) -> bool {
        self.info.is_abstract.value
    }

    pub fn price(&self) -> i32 {
        self.info.price.value
    }

    pub fn parent(&self) -> &PrototypeRef {
        &self.info.parent.value
    }

    /// Takes over `parent`'s field values. The two must be of the same class.
    pub fn copy_from(&mut self, parent: &Prototype) -> Result<(), LoadError> {
        if parent.class() != self.class() {
            return Err(LoadError::ParentClassMismatch {
                parent: parent.name().to_string(),
                expected: self.class().as_str(),
                found: parent.class().as_str(),
            });
        }
        self.info.inherit_from(&parent.info);
        self.data = parent.data.clone();
        Ok(())
    }

    pub fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.info.load_from_xml(ctx, node)?;
        self.data.fields_mut().load_from_xml(ctx, node)
    }

    pub fn post_load(&mut self, index: &NameIndex) {
        let owner = self.name().to_string();
        let resolver = Resolver::new(index, &owner);
        self.info.post_load(&resolver);
        self.data.fields_mut().post_load(&resolver);
    }

    /// Element holding the fields that differ from the class defaults.
    pub fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new(PROTOTYPE_TAG);
        self.write_into(&mut element);
        element
    }

    fn to_xml_with_defaults(&self) -> XmlElement {
        let mut element = XmlElement::with_defaults(PROTOTYPE_TAG);
        self.write_into(&mut element);
        element
    }

    fn write_into(&self, element: &mut XmlElement) {
        self.info.write_xml(element);
        self.data.fields().write_xml(element);
    }

    /// Element for a prototype that inherits from `parent` on reload.
    ///
    /// Besides the fields [`Prototype::to_xml`] writes, every inheritable
    /// attribute whose text differs from the parent's is written, so a field
    /// set back to its class default is not replaced by the parent's value.
    /// Child lists are written whenever they are non-empty. An emptied list
    /// cannot be spelled in the file format and is reported.
    pub fn to_xml_over(&self, parent: &Prototype) -> XmlElement {
        let own = self.to_xml();
        let inherited = parent.to_xml_with_defaults();

        let mut element = XmlElement::new(PROTOTYPE_TAG);
        for (name, value) in self.to_xml_with_defaults().attributes() {
            let overrides = !IDENTITY_ATTRIBUTES.contains(&name.as_str())
                && inherited.attribute(name) != Some(value.as_str());
            if overrides || own.attribute(name).is_some() {
                element.set(name, value.as_str());
            }
        }
        for child in own.children() {
            element.push(child.clone());
        }

        for tag in self.class().child_tags() {
            let has = |e: &XmlElement| e.children().iter().any(|child| child.tag() == *tag);
            if !has(&own) && has(&inherited) {
                warn!(
                    prototype = self.name(),
                    parent = parent.name(),
                    tag = *tag,
                    "emptied list cannot be saved; a reload inherits the parent's entries"
                );
            }
        }
        element
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    pub(crate) fn load_one(xml: &str) -> Result<Prototype, LoadError> {
        let registry = ResourceTypeRegistry::new();
        let ctx = LoadContext::builder().resource_types(&registry).build();
        load_with(&ctx, xml)
    }

    pub(crate) fn load_with(ctx: &LoadContext<'_>, xml: &str) -> Result<Prototype, LoadError> {
        let doc = roxmltree::Document::parse(xml).unwrap();
        let node = doc.root_element();
        let class = PrototypeClass::from_name(node.attribute("Class").unwrap()).unwrap();
        let mut proto = Prototype::new(class, node.attribute("Name").unwrap_or_default());
        proto.load_from_xml(ctx, node)?;
        Ok(proto)
    }

    #[test]
    fn class_table_round_trips_names() {
        assert_eq!(PrototypeClass::ALL.len(), 60);
        for class in PrototypeClass::ALL {
            assert_eq!(PrototypeClass::from_name(class.as_str()), Some(*class));
            assert_eq!(class.instantiate().class(), *class);
        }
        assert_eq!(PrototypeClass::from_name("Spaceship"), None);
        assert_eq!(PrototypeClass::from_name("NPC"), Some(PrototypeClass::NPC));
    }

    #[test]
    fn resource_categories() {
        assert_eq!(PrototypeClass::RocketLauncher.resource_category(), Some("GUN"));
        assert_eq!(PrototypeClass::Gadget.resource_category(), Some("WARE"));
        assert_eq!(PrototypeClass::Cabin.resource_category(), Some("VEHICLE_PART"));
        assert_eq!(PrototypeClass::Team.resource_category(), None);
    }

    #[test]
    fn copy_from_requires_same_class() {
        let ware = Prototype::new(PrototypeClass::Ware, "medkit");
        let mut gadget = Prototype::new(PrototypeClass::Gadget, "scanner");
        assert_eq!(
            gadget.copy_from(&ware),
            Err(LoadError::ParentClassMismatch {
                parent: "medkit".to_string(),
                expected: "Gadget",
                found: "Ware",
            })
        );
    }

    #[test]
    fn inheritance_keeps_identity() {
        let mut parent =
            load_one(r#"<Prototype Name="base" Class="Ware" Price="40" IsAbstract="true" Weight="3"/>"#)
                .unwrap();
        parent.info.set_id(PrototypeId::new(0));

        let mut child = Prototype::new(PrototypeClass::Ware, "derived");
        child.copy_from(&parent).unwrap();
        assert_eq!(child.name(), "derived");
        assert!(!child.is_abstract());
        assert_eq!(child.price(), 40);
        assert_eq!(child.id(), None);
        assert_eq!(child.data.ware_ref().map(|w| w.weight.value), Some(3.0));
    }

    #[test]
    fn failed_level_stops_loading() {
        let result = load_one(r#"<Prototype Name="bad" Class="Ware" Price="cheap" Weight="2"/>"#);
        assert!(matches!(
            result,
            Err(LoadError::Attr(AttrError::Invalid { .. }))
        ));
    }
}
