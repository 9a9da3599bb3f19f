//! The prototype registry.
//!
//! Loading runs in two phases. [`PrototypeManager::parse_file`] walks the
//! `<Prototypes>` document tree, instantiates every prototype node, copies
//! parent values and registers the result under a positional id. Links to
//! other prototypes stay pending by name. [`PrototypeManager::resolve`] then
//! binds every pending link against the complete name index. No prototype
//! looks another one up by reference during the first phase, so files may
//! refer forward freely.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use convert_case::{Case, Casing};
use itertools::Itertools;
use tracing::{debug, debug_span, error, info, warn};

use crate::error::{ErrorKind, IResult, failure_from_kind, io_error};
use crate::prototypes::{ClassFamily, LoadContext, Prototype, PrototypeClass};
use crate::reference::{NameIndex, PrototypeId};
use crate::xml::{Node, XmlElement, XmlSource, expect_root, warn_unexpected_children, write_document};

pub const ROOT_TAG: &str = "Prototypes";
const FOLDER_TAG: &str = "Folder";
const COMMENT_TAG: &str = "comment";

/// Read access to a set of loaded prototypes.
pub trait PrototypeProvider {
    fn get_prototype_id(&self, name: &str) -> Option<PrototypeId>;
    fn prototype(&self, name: &str) -> Option<&Prototype>;
    fn prototype_by_id(&self, id: PrototypeId) -> Option<&Prototype>;
    fn prototypes(&self) -> &[Prototype];
}

/// Outcome counters of one load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Prototypes registered.
    pub loaded: usize,
    /// Prototype nodes rejected while loading their fields.
    pub failed: usize,
    /// Nodes that were not prototypes of a known class.
    pub skipped: usize,
}

/// Per-walk state: the registries handed to prototypes, counters and the
/// chain of files currently being read.
struct Walk<'w, 'c> {
    ctx: &'w LoadContext<'c>,
    summary: LoadSummary,
    files: Vec<PathBuf>,
}

#[derive(Debug, Default)]
pub struct PrototypeManager {
    prototypes: Vec<Prototype>,
    index: NameIndex,
    /// Distinct classes in first-seen order.
    classes: Vec<PrototypeClass>,
}

impl PrototypeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops everything loaded so far. Ids restart at zero.
    pub fn clear(&mut self) {
        self.prototypes.clear();
        self.index.clear();
        self.classes.clear();
    }

    /// Replaces the registry contents with the tree rooted at `path` and
    /// resolves all references.
    pub fn load_from_xml_file(
        &mut self,
        ctx: &LoadContext<'_>,
        path: &Path,
    ) -> IResult<LoadSummary> {
        self.clear();
        let summary = self.parse_file(ctx, path)?;
        self.resolve();
        info!(
            file = %path.display(),
            loaded = summary.loaded,
            failed = summary.failed,
            skipped = summary.skipped,
            classes = self.classes.len(),
            "prototypes loaded"
        );
        Ok(summary)
    }

    /// First phase over a file on disk. Prototypes are appended to those
    /// already registered.
    pub fn parse_file(&mut self, ctx: &LoadContext<'_>, path: &Path) -> IResult<LoadSummary> {
        let mut walk = Walk {
            ctx,
            summary: LoadSummary::default(),
            files: Vec::new(),
        };
        self.walk_file(path, &mut walk)?;
        Ok(walk.summary)
    }

    /// First phase over an already decoded document. `Folder` includes are
    /// looked up relative to the source's path.
    pub fn parse_source(
        &mut self,
        ctx: &LoadContext<'_>,
        source: &XmlSource,
    ) -> IResult<LoadSummary> {
        let mut walk = Walk {
            ctx,
            summary: LoadSummary::default(),
            files: vec![include_key(source.path())],
        };
        self.walk_source(source, &mut walk)?;
        Ok(walk.summary)
    }

    /// Second phase: binds every pending link, in load order.
    pub fn resolve(&mut self) {
        for proto in &mut self.prototypes {
            proto.post_load(&self.index);
        }
    }

    fn walk_file(&mut self, path: &Path, walk: &mut Walk<'_, '_>) -> IResult<()> {
        let key = include_key(path);
        if walk.files.contains(&key) {
            return Err(failure_from_kind(ErrorKind::IncludeCycle {
                path: path.to_path_buf(),
            }));
        }
        let source = XmlSource::read(path)?;
        walk.files.push(key);
        let result = self.walk_source(&source, walk);
        walk.files.pop();
        result
    }

    fn walk_source(&mut self, source: &XmlSource, walk: &mut Walk<'_, '_>) -> IResult<()> {
        let doc = source.document()?;
        let root = expect_root(&doc, source.path(), ROOT_TAG)?;
        debug!(file = %source.path().display(), "reading prototypes");
        self.walk_children(root, source.path(), walk)
    }

    fn walk_children(
        &mut self,
        node: Node<'_, '_>,
        file: &Path,
        walk: &mut Walk<'_, '_>,
    ) -> IResult<()> {
        for child in node.children() {
            if child.is_comment() {
                debug!(file = %file.display(), text = child.text().unwrap_or_default().trim(), "comment");
                continue;
            }
            if !child.is_element() {
                continue;
            }
            match child.tag_name().name() {
                FOLDER_TAG => self.walk_folder(child, file, walk)?,
                COMMENT_TAG => {
                    debug!(file = %file.display(), text = child.text().unwrap_or_default().trim(), "comment");
                }
                tag => match child.attribute("Class") {
                    Some(class) => self.load_prototype(child, class, file, walk)?,
                    None => {
                        warn!(
                            file = %file.display(),
                            tag,
                            name = child.attribute("Name").unwrap_or_default(),
                            "element is neither a folder nor a prototype, skipped"
                        );
                        walk.summary.skipped += 1;
                    }
                },
            }
        }
        Ok(())
    }

    fn walk_folder(
        &mut self,
        folder: Node<'_, '_>,
        file: &Path,
        walk: &mut Walk<'_, '_>,
    ) -> IResult<()> {
        let name = folder.attribute("Name").unwrap_or_default();
        match folder.attribute("File") {
            Some(include) => {
                let dir = file.parent().unwrap_or_else(|| Path::new(""));
                let path = dir.join(include);
                debug!(folder = name, file = %path.display(), "entering folder file");
                self.walk_file(&path, walk)
            }
            None => {
                debug!(folder = name, file = %file.display(), "entering folder");
                self.walk_children(folder, file, walk)
            }
        }
    }

    fn load_prototype(
        &mut self,
        node: Node<'_, '_>,
        class_name: &str,
        file: &Path,
        walk: &mut Walk<'_, '_>,
    ) -> IResult<()> {
        let name = node.attribute("Name").unwrap_or_default();
        let span = debug_span!("prototype", prototype = name, class = class_name);
        let _enter = span.enter();

        let Some(class) = PrototypeClass::from_name(class_name) else {
            error!(file = %file.display(), "unknown prototype class, node skipped");
            walk.summary.skipped += 1;
            return Ok(());
        };
        warn_unexpected_children(node, class.child_tags());

        let mut proto = Prototype::new(class, name);
        if let Some(parent_name) = node.attribute("ParentPrototype")
            && !parent_name.is_empty()
        {
            match self.prototype(parent_name) {
                Some(parent) => {
                    if let Err(err) = proto.copy_from(parent) {
                        error!(file = %file.display(), %err, "cannot inherit, prototype skipped");
                        walk.summary.failed += 1;
                        return Ok(());
                    }
                }
                None => error!(
                    file = %file.display(),
                    parent = parent_name,
                    "parent prototype is not loaded yet, nothing inherited"
                ),
            }
        }

        if let Err(err) = proto.load_from_xml(walk.ctx, node) {
            error!(file = %file.display(), %err, "failed to load prototype");
            walk.summary.failed += 1;
            return Ok(());
        }

        self.register(proto, file)?;
        walk.summary.loaded += 1;
        Ok(())
    }

    fn register(&mut self, mut proto: Prototype, file: &Path) -> IResult<PrototypeId> {
        let id = PrototypeId::new(self.prototypes.len() as u32);
        if !self.index.insert(proto.name(), id, proto.class()) {
            return Err(failure_from_kind(ErrorKind::DuplicatePrototype {
                name: proto.name().to_string(),
                path: file.to_path_buf(),
            }));
        }
        proto.info.set_id(id);
        if !self.classes.contains(&proto.class()) {
            self.classes.push(proto.class());
        }
        self.prototypes.push(proto);
        Ok(id)
    }

    pub fn prototype_mut(&mut self, name: &str) -> Option<&mut Prototype> {
        let id = self.index.id_of(name)?;
        self.prototypes.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prototype> {
        self.prototypes.iter()
    }

    pub fn of_class(&self, class: PrototypeClass) -> impl Iterator<Item = &Prototype> {
        self.prototypes
            .iter()
            .filter(move |proto| proto.class() == class)
    }

    /// Distinct classes, in the order they were first loaded.
    pub fn classes(&self) -> &[PrototypeClass] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    /// Writes `root_file` and one file per class beside it.
    pub fn save_to_xml(&self, root_file: &Path) -> IResult<()> {
        let dir = root_file.parent().unwrap_or_else(|| Path::new(""));
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(|err| io_error(dir, err))?;
        }
        write_document(root_file, &self.root_document())?;
        for class in &self.classes {
            let path = dir.join(class_file_name(*class));
            write_document(&path, &self.class_document(*class))?;
            debug!(class = class.as_str(), file = %path.display(), "class file written");
        }
        info!(
            file = %root_file.display(),
            prototypes = self.prototypes.len(),
            classes = self.classes.len(),
            "prototypes saved"
        );
        Ok(())
    }

    /// `<Prototypes>` with one `Folder` per class.
    pub fn root_document(&self) -> XmlElement {
        let mut root = XmlElement::new(ROOT_TAG);
        for class in &self.classes {
            root.push(
                XmlElement::new(FOLDER_TAG)
                    .with_attr("Name", class.as_str())
                    .with_attr("File", class_file_name(*class)),
            );
        }
        root
    }

    /// `<Prototypes>` holding every prototype of `class` in save order.
    pub fn class_document(&self, class: PrototypeClass) -> XmlElement {
        let mut root = XmlElement::new(ROOT_TAG);
        for proto in self.save_order(class) {
            let element = match self.saved_parent(proto) {
                Some(parent) => proto.to_xml_over(parent),
                None => proto.to_xml(),
            };
            root.push(element);
        }
        root
    }

    /// The prototype a reload of `proto` will inherit from.
    fn saved_parent(&self, proto: &Prototype) -> Option<&Prototype> {
        let name = proto.parent().name()?;
        self.prototype(name)
            .filter(|parent| parent.class() == proto.class() && parent.name() != proto.name())
    }

    /// Wares go by price, vehicles abstract first, everything else by
    /// name. A parent is then pulled in front of its children so a reload
    /// can inherit from it.
    fn save_order(&self, class: PrototypeClass) -> Vec<&Prototype> {
        let sorted = match class.family() {
            ClassFamily::Ware => self
                .of_class(class)
                .sorted_by(|a, b| a.price().cmp(&b.price()).then_with(|| a.name().cmp(b.name())))
                .collect_vec(),
            ClassFamily::Vehicle => self
                .of_class(class)
                .sorted_by(|a, b| {
                    b.is_abstract()
                        .cmp(&a.is_abstract())
                        .then_with(|| a.name().cmp(b.name()))
                })
                .collect_vec(),
            _ => self
                .of_class(class)
                .sorted_by(|a, b| a.name().cmp(b.name()))
                .collect_vec(),
        };
        parents_first(sorted)
    }
}

impl PrototypeProvider for PrototypeManager {
    fn get_prototype_id(&self, name: &str) -> Option<PrototypeId> {
        self.index.id_of(name)
    }

    fn prototype(&self, name: &str) -> Option<&Prototype> {
        self.prototype_by_id(self.index.id_of(name)?)
    }

    fn prototype_by_id(&self, id: PrototypeId) -> Option<&Prototype> {
        self.prototypes.get(id.index())
    }

    fn prototypes(&self) -> &[Prototype] {
        &self.prototypes
    }
}

/// `VehiclesGenerator` -> `vehicles_generator.xml`
pub fn class_file_name(class: PrototypeClass) -> String {
    format!("{}.xml", class.as_str().to_case(Case::Snake))
}

fn include_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Stable reorder that emits each prototype's parent (when it is in the
/// same list) before the prototype itself.
fn parents_first(sorted: Vec<&Prototype>) -> Vec<&Prototype> {
    let by_name: HashMap<&str, &Prototype> =
        sorted.iter().map(|proto| (proto.name(), *proto)).collect();
    let mut emitted = HashSet::new();
    let mut out = Vec::with_capacity(sorted.len());

    for proto in &sorted {
        let mut chain = vec![*proto];
        let mut seen: HashSet<&str> = HashSet::from([proto.name()]);
        let mut current = *proto;
        while let Some(parent) = current.parent().name().and_then(|name| by_name.get(name))
            && !emitted.contains(parent.name())
            && seen.insert(parent.name())
        {
            chain.push(*parent);
            current = *parent;
        }
        for proto in chain.into_iter().rev() {
            if emitted.insert(proto.name()) {
                out.push(proto);
            }
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::resource_type::ResourceTypeRegistry;

    fn parse(xml: &str) -> IResult<(PrototypeManager, LoadSummary)> {
        let registry = ResourceTypeRegistry::new();
        let ctx = LoadContext::builder().resource_types(&registry).build();
        let mut manager = PrototypeManager::new();
        let source = XmlSource::from_text("memory/prototypes.xml", xml.to_string());
        let summary = manager.parse_source(&ctx, &source)?;
        manager.resolve();
        Ok((manager, summary))
    }

    #[test]
    fn medkit_scenario() {
        let (manager, summary) = parse(
            r#"<Prototypes><Prototype Class="Ware" Name="medkit" Price="100" Export="true" Import="false"/></Prototypes>"#,
        )
        .unwrap();
        assert_eq!(summary.loaded, 1);
        let medkit = manager.prototype("medkit").unwrap();
        assert_eq!(medkit.id(), Some(PrototypeId::new(0)));
        assert_eq!(medkit.price(), 100);
        assert_eq!(manager.get_prototype_id("medkit"), Some(PrototypeId::new(0)));
        assert_eq!(manager.get_prototype_id("bandage"), None);
        assert_eq!(manager.classes(), &[PrototypeClass::Ware]);
    }

    #[test]
    fn ids_are_positional() {
        let (manager, _) = parse(
            r#"<Prototypes>
                <Prototype Class="Ware" Name="a"/>
                <Folder Name="more">
                    <Prototype Class="Formation" Name="b"/>
                    <comment>grouped for the editor</comment>
                </Folder>
                <Prototype Class="Ware" Name="c"/>
            </Prototypes>"#,
        )
        .unwrap();
        assert_eq!(manager.len(), 3);
        for (k, proto) in manager.prototypes().iter().enumerate() {
            assert_eq!(proto.id(), Some(PrototypeId::new(k as u32)));
        }
        assert_eq!(manager.prototype_by_id(PrototypeId::new(1)).unwrap().name(), "b");
        assert_eq!(
            manager.classes(),
            &[PrototypeClass::Ware, PrototypeClass::Formation]
        );
    }

    #[test]
    fn duplicate_names_abort_across_classes() {
        let err = parse(
            r#"<Prototypes>
                <Prototype Class="Ware" Name="thing"/>
                <Prototype Class="Formation" Name="thing"/>
            </Prototypes>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err.kind,
            ErrorKind::DuplicatePrototype { ref name, .. } if name == "thing"
        ));
    }

    #[test]
    fn forward_references_resolve() {
        let (manager, _) = parse(
            r#"<Prototypes>
                <Prototype Class="Team" Name="raiders" FormationPrototype="wedge"/>
                <Prototype Class="Formation" Name="wedge"/>
            </Prototypes>"#,
        )
        .unwrap();
        let team = manager.prototype("raiders").unwrap().data.team_ref().unwrap();
        assert_eq!(team.formation_prototype.value.id(), Some(PrototypeId::new(1)));
    }

    #[test]
    fn unresolved_reference_does_not_abort() {
        let (manager, summary) = parse(
            r#"<Prototypes><Prototype Class="Team" Name="raiders" FormationPrototype="nowhere"/></Prototypes>"#,
        )
        .unwrap();
        assert_eq!(summary.loaded, 1);
        let team = manager.prototype("raiders").unwrap().data.team_ref().unwrap();
        assert!(team.formation_prototype.value.is_dangling());
    }

    #[test]
    fn one_bad_prototype_among_ten() {
        let mut xml = String::from("<Prototypes>");
        for i in 0..9 {
            xml.push_str(&format!(r#"<Prototype Class="Ware" Name="w{i}" Price="{i}"/>"#));
        }
        xml.push_str(r#"<Prototype Class="Ware" Price="5"/>"#);
        xml.push_str("</Prototypes>");

        let (manager, summary) = parse(&xml).unwrap();
        assert_eq!(manager.len(), 9);
        assert_eq!(
            summary,
            LoadSummary {
                loaded: 9,
                failed: 1,
                skipped: 0
            }
        );
    }

    #[test]
    fn unknown_class_skips_node_only() {
        let (manager, summary) = parse(
            r#"<Prototypes>
                <Prototype Class="Spaceship" Name="ufo"/>
                <Prototype Class="Ware" Name="fuel"/>
                <Stray Name="x"/>
            </Prototypes>"#,
        )
        .unwrap();
        assert_eq!(manager.len(), 1);
        assert_eq!(summary.skipped, 2);
    }

    #[test]
    fn inheritance_copies_then_overrides() {
        let (manager, _) = parse(
            r#"<Prototypes>
                <Prototype Class="Ware" Name="base" Weight="5" IsAbstract="true"/>
                <Prototype Class="Ware" Name="plain" ParentPrototype="base"/>
                <Prototype Class="Ware" Name="heavy" ParentPrototype="base" Weight="7"/>
            </Prototypes>"#,
        )
        .unwrap();
        let weight = |name| {
            manager
                .prototype(name)
                .and_then(|p| p.data.ware_ref())
                .map(|w| w.weight.value)
        };
        assert_eq!(weight("plain"), Some(5.0));
        assert_eq!(weight("heavy"), Some(7.0));
        let plain = manager.prototype("plain").unwrap();
        assert!(!plain.is_abstract());
        assert_eq!(plain.parent().id(), Some(PrototypeId::new(0)));
    }

    #[test]
    fn parent_loaded_later_gives_defaults() {
        let (manager, summary) = parse(
            r#"<Prototypes>
                <Prototype Class="Ware" Name="child" ParentPrototype="base"/>
                <Prototype Class="Ware" Name="base" Weight="5"/>
            </Prototypes>"#,
        )
        .unwrap();
        assert_eq!(summary.loaded, 2);
        let child = manager.prototype("child").unwrap();
        assert_eq!(child.data.ware_ref().map(|w| w.weight.value), Some(0.0));
    }

    #[test]
    fn parent_of_other_class_skips_child() {
        let (manager, summary) = parse(
            r#"<Prototypes>
                <Prototype Class="Ware" Name="base"/>
                <Prototype Class="Gadget" Name="child" ParentPrototype="base"/>
            </Prototypes>"#,
        )
        .unwrap();
        assert_eq!(summary.failed, 1);
        assert!(manager.prototype("child").is_none());
    }

    #[test]
    fn save_order_per_class() {
        let (manager, _) = parse(
            r#"<Prototypes>
                <Prototype Class="Ware" Name="b" Price="10"/>
                <Prototype Class="Ware" Name="a" Price="50"/>
                <Prototype Class="Ware" Name="c" Price="10"/>
                <Prototype Class="Vehicle" Name="truck"/>
                <Prototype Class="Vehicle" Name="zbase" IsAbstract="true"/>
                <Prototype Class="Formation" Name="y"/>
                <Prototype Class="Formation" Name="x"/>
            </Prototypes>"#,
        )
        .unwrap();
        let names = |class| {
            manager
                .class_document(class)
                .children()
                .iter()
                .filter_map(|el| el.attribute("Name").map(str::to_string))
                .collect_vec()
        };
        assert_eq!(names(PrototypeClass::Ware), ["b", "c", "a"]);
        assert_eq!(names(PrototypeClass::Vehicle), ["zbase", "truck"]);
        assert_eq!(names(PrototypeClass::Formation), ["x", "y"]);

        let root = manager.root_document();
        assert_eq!(root.children().len(), 3);
        assert_eq!(root.children()[1].attribute("File"), Some("vehicle.xml"));
    }

    #[test]
    fn parents_saved_before_children() {
        let (manager, _) = parse(
            r#"<Prototypes>
                <Prototype Class="Formation" Name="zeta"/>
                <Prototype Class="Formation" Name="beta" ParentPrototype="zeta"/>
                <Prototype Class="Formation" Name="alpha" ParentPrototype="beta"/>
            </Prototypes>"#,
        )
        .unwrap();
        let names = manager
            .class_document(PrototypeClass::Formation)
            .children()
            .iter()
            .filter_map(|el| el.attribute("Name").map(str::to_string))
            .collect_vec();
        assert_eq!(names, ["zeta", "beta", "alpha"]);
    }

    fn reparse_class(manager: &PrototypeManager, class: PrototypeClass) -> PrototypeManager {
        let text = crate::xml::to_pretty_string(&manager.class_document(class));
        parse(&text).unwrap().0
    }

    #[test]
    fn child_reset_to_default_survives_save() {
        let (manager, _) = parse(
            r#"<Prototypes>
                <Prototype Class="Ware" Name="base" Weight="5" Price="40" Export="true"/>
                <Prototype Class="Ware" Name="light" ParentPrototype="base" Weight="0" Price="0"/>
                <Prototype Class="Ware" Name="same" ParentPrototype="base"/>
            </Prototypes>"#,
        )
        .unwrap();
        let document = manager.class_document(PrototypeClass::Ware);
        let light = document
            .children()
            .iter()
            .find(|el| el.attribute("Name") == Some("light"))
            .unwrap();
        assert_eq!(light.attribute("Weight"), Some("0"));
        assert_eq!(light.attribute("Price"), Some("0"));
        assert_eq!(light.attribute("IsAbstract"), None);
        let same = document
            .children()
            .iter()
            .find(|el| el.attribute("Name") == Some("same"))
            .unwrap();
        assert_eq!(same, &manager.prototype("same").unwrap().to_xml());

        let reloaded = reparse_class(&manager, PrototypeClass::Ware);
        for name in ["base", "light", "same"] {
            assert_eq!(
                reloaded.prototype(name).unwrap().data,
                manager.prototype(name).unwrap().data,
                "{name}"
            );
        }
        let light = reloaded.prototype("light").unwrap();
        assert_eq!(light.price(), 0);
        assert_eq!(light.data.ware_ref().map(|w| w.weight.value), Some(0.0));
    }

    #[test]
    fn child_of_later_parent_keeps_its_defaults() {
        let (manager, _) = parse(
            r#"<Prototypes>
                <Prototype Class="Ware" Name="child" ParentPrototype="base"/>
                <Prototype Class="Ware" Name="base" Weight="5" MaxInStack="3"/>
            </Prototypes>"#,
        )
        .unwrap();
        let reloaded = reparse_class(&manager, PrototypeClass::Ware);
        let child = reloaded.prototype("child").unwrap();
        assert_eq!(child.data, manager.prototype("child").unwrap().data);
        assert_eq!(child.data.ware_ref().map(|w| w.max_in_stack.value), Some(1));
    }

    #[test]
    fn child_lists_differing_from_parent_are_saved() {
        let (manager, _) = parse(
            r#"<Prototypes>
                <Prototype Class="Chest" Name="loot"><Ware Prototype="medkit" Count="2"/></Prototype>
                <Prototype Class="Chest" Name="more" ParentPrototype="loot">
                    <Ware Prototype="fuel"/>
                </Prototype>
            </Prototypes>"#,
        )
        .unwrap();
        let reloaded = reparse_class(&manager, PrototypeClass::Chest);
        let more = reloaded.prototype("more").unwrap().data.chest_ref().unwrap();
        assert_eq!(more.wares.len(), 1);
        assert_eq!(more.wares[0].prototype.value.name(), Some("fuel"));
    }

    #[test]
    fn file_names() {
        assert_eq!(
            class_file_name(PrototypeClass::VehiclesGenerator),
            "vehicles_generator.xml"
        );
        assert_eq!(class_file_name(PrototypeClass::NPC), "npc.xml");
        assert_eq!(
            class_file_name(PrototypeClass::DynamicQuestConvoy),
            "dynamic_quest_convoy.xml"
        );
    }

    #[test]
    fn wrong_root_is_fatal() {
        let err = parse("<Things/>").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MissingRootTag { .. }));
    }
}
