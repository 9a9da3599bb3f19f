//! Composition root: builds the registries in dependency order and owns them.

use std::path::Path;

use tracing::info;

use crate::affix::AffixRegistry;
use crate::config::ServerConfig;
use crate::error::IResult;
use crate::manager::{LoadSummary, PrototypeManager, PrototypeProvider};
use crate::models::ModelLookup;
use crate::prototypes::{LoadContext, Prototype};
use crate::reference::PrototypeId;
use crate::relationship::RelationshipTable;
use crate::resource_type::ResourceTypeRegistry;

pub struct Server {
    config: ServerConfig,
    resource_types: ResourceTypeRegistry,
    affixes: Option<AffixRegistry>,
    relationships: Option<RelationshipTable>,
    prototypes: PrototypeManager,
    summary: LoadSummary,
}

impl Server {
    pub fn load(config: &ServerConfig) -> IResult<Self> {
        Self::load_with_models(config, None)
    }

    /// Like [`Server::load`], with a model collaborator for the classes that
    /// pull defaults out of model files.
    pub fn load_with_models(
        config: &ServerConfig,
        models: Option<&dyn ModelLookup>,
    ) -> IResult<Self> {
        let resource_types = ResourceTypeRegistry::load_from_file(&config.resource_types_path())?;
        info!(count = resource_types.len(), "resource types loaded");

        let affixes = config
            .affixes_path()
            .map(|path| AffixRegistry::load_from_file(&path))
            .transpose()?;
        let relationships = config
            .relationships_path()
            .map(|path| RelationshipTable::load_from_file(&path))
            .transpose()?;

        let ctx = LoadContext::builder()
            .resource_types(&resource_types)
            .maybe_affixes(affixes.as_ref())
            .maybe_relationships(relationships.as_ref())
            .maybe_models(models)
            .build();
        let mut prototypes = PrototypeManager::new();
        let summary = prototypes.load_from_xml_file(&ctx, &config.prototypes_path())?;

        Ok(Self {
            config: config.clone(),
            resource_types,
            affixes,
            relationships,
            prototypes,
            summary,
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn resource_types(&self) -> &ResourceTypeRegistry {
        &self.resource_types
    }

    pub fn affixes(&self) -> Option<&AffixRegistry> {
        self.affixes.as_ref()
    }

    pub fn relationships(&self) -> Option<&RelationshipTable> {
        self.relationships.as_ref()
    }

    pub fn prototype_manager(&self) -> &PrototypeManager {
        &self.prototypes
    }

    pub fn prototype_manager_mut(&mut self) -> &mut PrototypeManager {
        &mut self.prototypes
    }

    pub fn load_summary(&self) -> LoadSummary {
        self.summary
    }

    /// Writes the prototype tree under `dir`, keeping the root file's path
    /// relative to the data directory.
    pub fn save_prototypes(&self, dir: &Path) -> IResult<()> {
        self.prototypes.save_to_xml(&dir.join(&self.config.prototypes))
    }
}

impl PrototypeProvider for Server {
    fn get_prototype_id(&self, name: &str) -> Option<PrototypeId> {
        self.prototypes.get_prototype_id(name)
    }

    fn prototype(&self, name: &str) -> Option<&Prototype> {
        self.prototypes.prototype(name)
    }

    fn prototype_by_id(&self, id: PrototypeId) -> Option<&Prototype> {
        self.prototypes.prototype_by_id(id)
    }

    fn prototypes(&self) -> &[Prototype] {
        self.prototypes.prototypes()
    }
}
