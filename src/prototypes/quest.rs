//! Randomly generated quests. Every quest class carries the same reward
//! fields plus one link to the prototype it is about.

use tracing::warn;

use crate::reference::PrototypeRef;
use crate::value::{AnnotatedValue, DisplayHint};
use crate::xml::{Node, XmlElement};

use super::team::TEAM_CLASSES;
use super::{LoadContext, LoadError, PrototypeClass, PrototypeFields, Resolver};

#[derive(Clone, Debug, PartialEq)]
pub struct DynamicQuestFields {
    pub min_reward: AnnotatedValue<i32>,
    pub max_reward: AnnotatedValue<i32>,
    pub time_limit: AnnotatedValue<f32>,
    pub reputation: AnnotatedValue<i32>,
}

impl Default for DynamicQuestFields {
    fn default() -> Self {
        Self {
            min_reward: AnnotatedValue::new(0, "MinReward"),
            max_reward: AnnotatedValue::new(0, "MaxReward"),
            time_limit: AnnotatedValue::new(0.0, "TimeLimit"),
            reputation: AnnotatedValue::new(0, "Reputation"),
        }
    }
}

impl PrototypeFields for DynamicQuestFields {
    fn load_from_xml(
        &mut self,
        _ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.min_reward.read(node)?;
        self.max_reward.read(node)?;
        self.time_limit.read(node)?;
        self.reputation.read(node)?;
        if self.min_reward.value > self.max_reward.value {
            warn!(
                min = self.min_reward.value,
                max = self.max_reward.value,
                "minimum reward exceeds maximum reward"
            );
        }
        Ok(())
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.min_reward.write(element);
        self.max_reward.write(element);
        self.time_limit.write(element);
        self.reputation.write(element);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DynamicQuestPrototype {
    pub quest: DynamicQuestFields,
    pub target: AnnotatedValue<PrototypeRef>,
    target_classes: &'static [PrototypeClass],
}

impl DynamicQuestPrototype {
    fn new(target_attr: &'static str, target_classes: &'static [PrototypeClass]) -> Self {
        Self {
            quest: DynamicQuestFields::default(),
            target: AnnotatedValue::new(PrototypeRef::Unset, target_attr)
                .hint(DisplayHint::Reference),
            target_classes,
        }
    }

    /// Escort a caravan.
    pub fn convoy() -> Self {
        Self::new(
            "ConvoyTeamPrototype",
            &[PrototypeClass::CaravanTeam, PrototypeClass::Team],
        )
    }

    /// Destroy a building.
    pub fn destroy() -> Self {
        Self::new(
            "TargetPrototype",
            &[
                PrototypeClass::Building,
                PrototypeClass::Barricade,
                PrototypeClass::Lair,
                PrototypeClass::InfectionLair,
                PrototypeClass::StaticAutoGun,
                PrototypeClass::Boss01,
                PrototypeClass::Boss02,
                PrototypeClass::Boss03,
                PrototypeClass::Boss04,
            ],
        )
    }

    /// Hunt down a team.
    pub fn hunt() -> Self {
        Self::new("VictimTeamPrototype", TEAM_CLASSES)
    }

    /// Make peace with a hostile team.
    pub fn peace() -> Self {
        Self::new("EnemyTeamPrototype", TEAM_CLASSES)
    }

    /// Reach a town.
    pub fn reach() -> Self {
        Self::new("DestinationPrototype", &[PrototypeClass::Town])
    }
}

impl PrototypeFields for DynamicQuestPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.quest.load_from_xml(ctx, node)?;
        self.target.read(node)?;
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        resolver.resolve(&mut self.target, self.target_classes);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.quest.write_xml(element);
        self.target.write(element);
    }
}

#[cfg(test)]
mod test {
    use crate::prototypes::test::load_one;

    #[test]
    fn target_attribute_depends_on_class() {
        let proto = load_one(
            r#"<Prototype Name="q" Class="DynamicQuestHunt" MinReward="500" MaxReward="100"
                VictimTeamPrototype="raiders"/>"#,
        )
        .unwrap();
        let quest = proto.data.dynamic_quest_hunt_ref().unwrap();
        assert_eq!(quest.target.value.name(), Some("raiders"));
        assert_eq!(quest.quest.min_reward.value, 500);

        let reach = load_one(
            r#"<Prototype Name="r" Class="DynamicQuestReach" VictimTeamPrototype="raiders"
                DestinationPrototype="bridgetown"/>"#,
        )
        .unwrap();
        let element = reach.to_xml();
        assert_eq!(element.attribute("DestinationPrototype"), Some("bridgetown"));
        assert_eq!(element.attribute("VictimTeamPrototype"), None);
    }
}
