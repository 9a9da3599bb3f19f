//! Vector attribute types and collision geometry descriptors.

use bon::Builder;

use crate::xml::{AttrValue, format_floats, parse_floats};

/// `"x y"` in XML.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

/// `"x y z"` in XML.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// `"x y z w"` in XML.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vector2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);
    pub const ONE: Vector3 = Vector3::new(1.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AttrValue for Vector2 {
    const KIND: &'static str = "vector \"x y\"";

    fn parse_attr(text: &str) -> Option<Self> {
        let [x, y] = parse_floats(text)?;
        Some(Self { x, y })
    }

    fn format_attr(&self) -> String {
        format_floats(&[self.x, self.y])
    }
}

impl AttrValue for Vector3 {
    const KIND: &'static str = "vector \"x y z\"";

    fn parse_attr(text: &str) -> Option<Self> {
        let [x, y, z] = parse_floats(text)?;
        Some(Self { x, y, z })
    }

    fn format_attr(&self) -> String {
        format_floats(&[self.x, self.y, self.z])
    }
}

impl AttrValue for Quaternion {
    const KIND: &'static str = "quaternion \"x y z w\"";

    fn parse_attr(text: &str) -> Option<Self> {
        let [x, y, z, w] = parse_floats(text)?;
        Some(Self { x, y, z, w })
    }

    fn format_attr(&self) -> String {
        format_floats(&[self.x, self.y, self.z, self.w])
    }
}

/// Collision shape keyword from the `GeomType` attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GeomType {
    Box,
    Sphere,
    Cylinder,
    Ray,
    Trimesh,
    /// Shape comes from the model file; no descriptor is produced.
    #[default]
    FromModel,
}

impl GeomType {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim() {
            "BOX" => Some(Self::Box),
            "SPHERE" => Some(Self::Sphere),
            "CYLINDER" => Some(Self::Cylinder),
            "RAY" => Some(Self::Ray),
            "TRIMESH" => Some(Self::Trimesh),
            "FROM_MODEL" => Some(Self::FromModel),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Box => "BOX",
            Self::Sphere => "SPHERE",
            Self::Cylinder => "CYLINDER",
            Self::Ray => "RAY",
            Self::Trimesh => "TRIMESH",
            Self::FromModel => "FROM_MODEL",
        }
    }

    /// Physics-engine geometry class number (ODE `dXxxClass`).
    pub fn code(self) -> Option<u8> {
        match self {
            Self::Sphere => Some(0),
            Self::Box => Some(1),
            Self::Cylinder => Some(3),
            Self::Ray => Some(5),
            Self::Trimesh => Some(8),
            Self::FromModel => None,
        }
    }
}

impl AttrValue for GeomType {
    const KIND: &'static str = "geometry keyword";

    fn parse_attr(text: &str) -> Option<Self> {
        Self::from_keyword(text)
    }

    fn format_attr(&self) -> String {
        self.keyword().to_string()
    }
}

/// One filled collision geometry record.
#[derive(Builder, Clone, Debug, PartialEq)]
pub struct GeometryInfo {
    geom_type: u8,
    #[builder(default = Vector3::ONE)]
    size: Vector3,
    #[builder(default)]
    radius: f32,
    #[builder(default)]
    length: f32,
    #[builder(default = Vector3::new(0.0, 0.0, 1.0))]
    direction: Vector3,
}

impl GeometryInfo {
    pub fn geom_type(&self) -> u8 {
        self.geom_type
    }

    pub fn size(&self) -> Vector3 {
        self.size
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn direction(&self) -> Vector3 {
        self.direction
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn vectors_require_exact_token_count() {
        assert_eq!(
            Vector3::parse_attr("1 2.5 -3"),
            Some(Vector3::new(1.0, 2.5, -3.0))
        );
        assert_eq!(Vector3::parse_attr("1 2"), None);
        assert_eq!(Vector2::parse_attr("1 2 3"), None);
        assert_eq!(Quaternion::parse_attr("0 0 0"), None);
        assert_eq!(
            Quaternion::parse_attr(" 0 0 0 1 "),
            Some(Quaternion::IDENTITY)
        );
    }

    #[test]
    fn vectors_format_compactly() {
        assert_eq!(Vector3::new(1.0, 0.5, 0.0).format_attr(), "1 0.5 0");
        assert_eq!(Vector2::new(-2.0, 3.25).format_attr(), "-2 3.25");
    }

    #[test]
    fn geometry_keywords() {
        assert_eq!(GeomType::from_keyword("SPHERE"), Some(GeomType::Sphere));
        assert_eq!(GeomType::Sphere.code(), Some(0));
        assert_eq!(GeomType::Box.code(), Some(1));
        assert_eq!(GeomType::FromModel.code(), None);
        assert_eq!(GeomType::from_keyword("CONE"), None);
        assert_eq!(GeomType::Trimesh.format_attr(), "TRIMESH");
    }
}
