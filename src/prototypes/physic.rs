//! Physical objects: the field levels shared by everything that exists in
//! the world, and the simple classes built directly on them.

use tracing::warn;

use crate::geometry::{GeomType, GeometryInfo, Quaternion, Vector3};
use crate::reference::PrototypeRef;
use crate::units::MetersPerSecond;
use crate::value::{AnnotatedValue, DisplayHint};
use crate::xml::{Node, XmlElement};

use super::entries::{load_entries, resolve_entries, write_entries};
use super::{
    CountedRef, LoadContext, LoadError, PrototypeClass, PrototypeFields, Resolver,
    check_probability,
};

/// Anything with a model and hit points.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicObjFields {
    pub model_file: AnnotatedValue<String>,
    pub max_health: AnnotatedValue<f32>,
    pub visibility: AnnotatedValue<f32>,
    pub blast_wave_prototype: AnnotatedValue<PrototypeRef>,
    pub explosion_effect: AnnotatedValue<String>,
}

impl Default for PhysicObjFields {
    fn default() -> Self {
        Self {
            model_file: AnnotatedValue::new(String::new(), "ModelFile").hint(DisplayHint::Model),
            max_health: AnnotatedValue::new(100.0, "MaxHealth"),
            visibility: AnnotatedValue::new(1.0, "Visibility"),
            blast_wave_prototype: AnnotatedValue::new(PrototypeRef::Unset, "BlastWavePrototype")
                .hint(DisplayHint::Reference),
            explosion_effect: AnnotatedValue::new(String::new(), "ExplosionEffect"),
        }
    }
}

impl PrototypeFields for PhysicObjFields {
    fn load_from_xml(
        &mut self,
        _ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.model_file.read(node)?;
        self.max_health.read(node)?;
        self.visibility.read(node)?;
        self.blast_wave_prototype.read(node)?;
        self.explosion_effect.read(node)?;
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        resolver.resolve(&mut self.blast_wave_prototype, &[PrototypeClass::BlastWave]);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.model_file.write(element);
        self.max_health.write(element);
        self.visibility.write(element);
        self.blast_wave_prototype.write(element);
        self.explosion_effect.write(element);
    }
}

/// Collision shape parameters and the geometry records built from them.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryFields {
    pub geom_type: AnnotatedValue<GeomType>,
    pub size: AnnotatedValue<Vector3>,
    pub radius: AnnotatedValue<f32>,
    pub length: AnnotatedValue<f32>,
    pub direction: AnnotatedValue<Vector3>,
    geometries: Vec<GeometryInfo>,
}

impl Default for GeometryFields {
    fn default() -> Self {
        Self {
            geom_type: AnnotatedValue::new(GeomType::FromModel, "GeomType"),
            size: AnnotatedValue::new(Vector3::ONE, "Size"),
            radius: AnnotatedValue::new(1.0, "Radius"),
            length: AnnotatedValue::new(1.0, "Length"),
            direction: AnnotatedValue::new(Vector3::new(0.0, 0.0, 1.0), "Direction"),
            geometries: Vec::new(),
        }
    }
}

impl GeometryFields {
    /// Appends a geometry record of `kind` filled from this level's shape
    /// fields. `FROM_MODEL` leaves the shape to the model and adds nothing.
    pub fn set_geom_type(&mut self, kind: GeomType) {
        let Some(code) = kind.code() else {
            return;
        };
        self.geometries.push(
            GeometryInfo::builder()
                .geom_type(code)
                .size(self.size.value)
                .radius(self.radius.value)
                .length(self.length.value)
                .direction(self.direction.value)
                .build(),
        );
    }

    pub fn geometries(&self) -> &[GeometryInfo] {
        &self.geometries
    }
}

impl PrototypeFields for GeometryFields {
    fn load_from_xml(
        &mut self,
        _ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.geom_type.read(node)?;
        self.size.read(node)?;
        self.radius.read(node)?;
        self.length.read(node)?;
        self.direction.read(node)?;

        // Records inherited from a parent are rebuilt from the final values.
        self.geometries.clear();
        self.set_geom_type(self.geom_type.value);
        Ok(())
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.geom_type.write(element);
        self.size.write(element);
        self.radius.write(element);
        self.length.write(element);
        self.direction.write(element);
    }
}

/// A physical object that takes part in the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicBodyFields {
    pub obj: PhysicObjFields,
    pub mass: AnnotatedValue<f32>,
    pub mass_center: AnnotatedValue<Vector3>,
    pub geometry: GeometryFields,
}

impl Default for PhysicBodyFields {
    fn default() -> Self {
        Self {
            obj: PhysicObjFields::default(),
            mass: AnnotatedValue::new(1.0, "Mass"),
            mass_center: AnnotatedValue::new(Vector3::ZERO, "MassCenter"),
            geometry: GeometryFields::default(),
        }
    }
}

impl PrototypeFields for PhysicBodyFields {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.obj.load_from_xml(ctx, node)?;
        self.mass.read(node)?;
        self.mass_center.read(node)?;
        if self.mass.value <= 0.0 {
            warn!(mass = self.mass.value, "non-positive mass");
        }
        self.geometry.load_from_xml(ctx, node)
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.obj.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.obj.write_xml(element);
        self.mass.write(element);
        self.mass_center.write(element);
        self.geometry.write_xml(element);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimplePhysicObjPrototype {
    pub body: PhysicBodyFields,
}

impl PrototypeFields for SimplePhysicObjPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.body.load_from_xml(ctx, node)
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.body.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.body.write_xml(element);
    }
}

/// Static scenery placed with a fixed orientation.
#[derive(Clone, Debug, PartialEq)]
pub struct DummyObjectPrototype {
    pub body: PhysicBodyFields,
    pub rotation: AnnotatedValue<Quaternion>,
    pub is_solid: AnnotatedValue<bool>,
}

impl Default for DummyObjectPrototype {
    fn default() -> Self {
        Self {
            body: PhysicBodyFields::default(),
            rotation: AnnotatedValue::new(Quaternion::IDENTITY, "Rotation"),
            is_solid: AnnotatedValue::new(true, "IsSolid"),
        }
    }
}

impl PrototypeFields for DummyObjectPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.body.load_from_xml(ctx, node)?;
        self.rotation.read(node)?;
        self.is_solid.read(node)?;
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.body.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.body.write_xml(element);
        self.rotation.write(element);
        self.is_solid.write(element);
    }
}

/// Loot container dropped into the world.
#[derive(Clone, Debug, PartialEq)]
pub struct ChestPrototype {
    pub body: PhysicBodyFields,
    pub life_time: AnnotatedValue<f32>,
    pub wares: Vec<CountedRef>,
}

impl Default for ChestPrototype {
    fn default() -> Self {
        Self {
            body: PhysicBodyFields::default(),
            life_time: AnnotatedValue::new(0.0, "LifeTime"),
            wares: Vec::new(),
        }
    }
}

impl PrototypeFields for ChestPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.body.load_from_xml(ctx, node)?;
        self.life_time.read(node)?;
        load_entries(node, "Ware", &mut self.wares)
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.body.post_load(resolver);
        resolve_entries(resolver, &mut self.wares, super::ware::WARE_CLASSES);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.body.write_xml(element);
        self.life_time.write(element);
        write_entries(element, "Ware", &self.wares);
    }
}

/// Light source.
#[derive(Clone, Debug, PartialEq)]
pub struct LightObjPrototype {
    pub obj: PhysicObjFields,
    pub intensity: AnnotatedValue<f32>,
    pub color: AnnotatedValue<Vector3>,
    pub range: AnnotatedValue<f32>,
    pub is_dynamic: AnnotatedValue<bool>,
}

impl Default for LightObjPrototype {
    fn default() -> Self {
        Self {
            obj: PhysicObjFields::default(),
            intensity: AnnotatedValue::new(1.0, "Intensity").hint(DisplayHint::Probability),
            color: AnnotatedValue::new(Vector3::ONE, "Color"),
            range: AnnotatedValue::new(10.0, "Range"),
            is_dynamic: AnnotatedValue::new(false, "IsDynamic"),
        }
    }
}

impl PrototypeFields for LightObjPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.obj.load_from_xml(ctx, node)?;
        self.intensity.read(node)?;
        self.color.read(node)?;
        self.range.read(node)?;
        self.is_dynamic.read(node)?;
        check_probability(&self.intensity);
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.obj.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.obj.write_xml(element);
        self.intensity.write(element);
        self.color.write(element);
        self.range.write(element);
        self.is_dynamic.write(element);
    }
}

/// Breakable lamp post carrying a light.
#[derive(Clone, Debug, PartialEq)]
pub struct LampPrototype {
    pub body: PhysicBodyFields,
    pub light_prototype: AnnotatedValue<PrototypeRef>,
    pub break_speed: AnnotatedValue<MetersPerSecond>,
}

impl Default for LampPrototype {
    fn default() -> Self {
        Self {
            body: PhysicBodyFields::default(),
            light_prototype: AnnotatedValue::new(PrototypeRef::Unset, "LightPrototype")
                .hint(DisplayHint::Reference),
            break_speed: AnnotatedValue::new(MetersPerSecond::default(), "BreakSpeed")
                .hint(DisplayHint::Speed),
        }
    }
}

impl PrototypeFields for LampPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.body.load_from_xml(ctx, node)?;
        self.light_prototype.read(node)?;
        self.break_speed.read(node)?;
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.body.post_load(resolver);
        resolver.resolve(&mut self.light_prototype, &[PrototypeClass::LightObj]);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.body.write_xml(element);
        self.light_prototype.write(element);
        self.break_speed.write(element);
    }
}

/// Body hinged to the world at one point, such as a gate or a boom.
#[derive(Clone, Debug, PartialEq)]
pub struct JointedObjPrototype {
    pub body: PhysicBodyFields,
    pub joint_anchor: AnnotatedValue<Vector3>,
    pub joint_axis: AnnotatedValue<Vector3>,
    /// Force that tears the joint; zero never breaks.
    pub break_force: AnnotatedValue<f32>,
}

impl Default for JointedObjPrototype {
    fn default() -> Self {
        Self {
            body: PhysicBodyFields::default(),
            joint_anchor: AnnotatedValue::new(Vector3::ZERO, "JointAnchor"),
            joint_axis: AnnotatedValue::new(Vector3::new(0.0, 1.0, 0.0), "JointAxis"),
            break_force: AnnotatedValue::new(0.0, "BreakForce"),
        }
    }
}

impl PrototypeFields for JointedObjPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.body.load_from_xml(ctx, node)?;
        self.joint_anchor.read(node)?;
        self.joint_axis.read(node)?;
        self.break_force.read(node)?;
        if self.joint_axis.value == Vector3::ZERO {
            warn!(field = self.joint_axis.name(), "zero joint axis");
        }
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.body.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.body.write_xml(element);
        self.joint_anchor.write(element);
        self.joint_axis.write(element);
        self.break_force.write(element);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimatedComplexObjPrototype {
    pub body: PhysicBodyFields,
    pub animation_file: AnnotatedValue<String>,
    pub animation_speed: AnnotatedValue<f32>,
    pub is_looped: AnnotatedValue<bool>,
}

impl Default for AnimatedComplexObjPrototype {
    fn default() -> Self {
        Self {
            body: PhysicBodyFields::default(),
            animation_file: AnnotatedValue::new(String::new(), "AnimationFile")
                .hint(DisplayHint::Model),
            animation_speed: AnnotatedValue::new(1.0, "AnimationSpeed"),
            is_looped: AnnotatedValue::new(false, "IsLooped"),
        }
    }
}

impl PrototypeFields for AnimatedComplexObjPrototype {
    fn load_from_xml(
        &mut self,
        ctx: &LoadContext<'_>,
        node: Node<'_, '_>,
    ) -> Result<(), LoadError> {
        self.body.load_from_xml(ctx, node)?;
        self.animation_file.read(node)?;
        self.animation_speed.read(node)?;
        self.is_looped.read(node)?;
        Ok(())
    }

    fn post_load(&mut self, resolver: &Resolver<'_>) {
        self.body.post_load(resolver);
    }

    fn write_xml(&self, element: &mut XmlElement) {
        self.body.write_xml(element);
        self.animation_file.write(element);
        self.animation_speed.write(element);
        self.is_looped.write(element);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prototypes::test::load_one;
    use crate::xml::AttrError;

    #[test]
    fn sphere_geometry_takes_own_radius() {
        let proto = load_one(
            r#"<Prototype Name="ball" Class="SimplePhysicObj" GeomType="SPHERE" Radius="2.5"/>"#,
        )
        .unwrap();
        let body = &proto.data.simple_physic_obj_ref().unwrap().body;
        let geometries = body.geometry.geometries();
        assert_eq!(geometries.len(), 1);
        assert_eq!(geometries[0].geom_type(), GeomType::Sphere.code().unwrap());
        assert_eq!(geometries[0].radius(), 2.5);
    }

    #[test]
    fn from_model_adds_no_geometry() {
        let proto = load_one(
            r#"<Prototype Name="rock" Class="SimplePhysicObj" GeomType="FROM_MODEL"/>"#,
        )
        .unwrap();
        let body = &proto.data.simple_physic_obj_ref().unwrap().body;
        assert!(body.geometry.geometries().is_empty());
    }

    #[test]
    fn box_geometry_uses_size() {
        let mut geometry = GeometryFields::default();
        geometry.size.value = Vector3::new(2.0, 3.0, 4.0);
        geometry.set_geom_type(GeomType::Box);
        geometry.set_geom_type(GeomType::FromModel);
        assert_eq!(geometry.geometries().len(), 1);
        assert_eq!(geometry.geometries()[0].geom_type(), 1);
        assert_eq!(geometry.geometries()[0].size(), Vector3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn bad_geometry_keyword_fails() {
        let result =
            load_one(r#"<Prototype Name="x" Class="SimplePhysicObj" GeomType="CONE"/>"#);
        assert!(matches!(
            result,
            Err(LoadError::Attr(AttrError::Invalid { .. }))
        ));
    }

    #[test]
    fn malformed_vector_fails() {
        let result = load_one(r#"<Prototype Name="x" Class="DummyObject" Rotation="0 0 1"/>"#);
        assert!(result.is_err());
    }

    #[test]
    fn out_of_range_intensity_is_kept() {
        let proto =
            load_one(r#"<Prototype Name="sun" Class="LightObj" Intensity="3"/>"#).unwrap();
        assert_eq!(proto.data.light_obj_ref().unwrap().intensity.value, 3.0);
    }

    #[test]
    fn chest_writes_wares_as_children() {
        let proto = load_one(
            r#"<Prototype Name="loot" Class="Chest" Mass="5">
                <Ware Prototype="medkit" Count="2"/>
            </Prototype>"#,
        )
        .unwrap();
        let element = proto.to_xml();
        assert_eq!(element.attribute("Mass"), Some("5"));
        assert_eq!(element.children().len(), 1);
        assert_eq!(element.children()[0].tag(), "Ware");
        assert_eq!(element.children()[0].attribute("Count"), Some("2"));
    }

    #[test]
    fn joint_defaults_to_vertical_axis() {
        let proto = load_one(
            r#"<Prototype Name="gate" Class="JointedObj" JointAnchor="1 0 2" BreakForce="500"/>"#,
        )
        .unwrap();
        let joint = proto.data.jointed_obj_ref().unwrap();
        assert_eq!(joint.joint_axis.value, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(joint.joint_anchor.value, Vector3::new(1.0, 0.0, 2.0));
        let element = proto.to_xml();
        assert_eq!(element.attribute("JointAnchor"), Some("1 0 2"));
        assert_eq!(element.attribute("JointAxis"), None);
    }

    #[test]
    fn animation_fields_written_when_changed() {
        let proto = load_one(
            r#"<Prototype Name="mill" Class="AnimatedComplexObj" AnimationFile="mill.anm" IsLooped="true"/>"#,
        )
        .unwrap();
        let element = proto.to_xml();
        assert_eq!(element.attribute("AnimationFile"), Some("mill.anm"));
        assert_eq!(element.attribute("IsLooped"), Some("true"));
        assert_eq!(element.attribute("AnimationSpeed"), None);
    }
}
