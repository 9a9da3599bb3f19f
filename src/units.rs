//! Unit-carrying field types.
//!
//! Several prototype fields are authored in one unit and used in another:
//! angles are written in degrees but kept in radians, speeds are written in
//! km/h but kept in m/s. The newtypes below do the conversion while reading
//! and undo it while writing, so the prototype code never multiplies by hand.

use std::ops::Mul;

use crate::xml::{AttrValue, format_converted};

/// Degrees to radians as the game defines it. Slightly off `PI / 180`.
pub const DEGREES_TO_RADIANS: f32 = 0.017453292;

/// km/h to m/s, as the game spells it.
pub const KMH_TO_METERS_PER_SECOND: f32 = 0.27777779;

/// Angle in radians; degrees in XML.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Radians(f32);

/// Speed in m/s; km/h in XML.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct MetersPerSecond(f32);

impl Radians {
    pub const fn new(v: f32) -> Self {
        Self(v)
    }

    pub fn from_degrees(degrees: f32) -> Self {
        Self(degrees * DEGREES_TO_RADIANS)
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn to_degrees(self) -> f64 {
        self.0 as f64 / DEGREES_TO_RADIANS as f64
    }
}

impl MetersPerSecond {
    pub const fn new(v: f32) -> Self {
        Self(v)
    }

    pub fn from_kmh(kmh: f32) -> Self {
        Self(kmh * KMH_TO_METERS_PER_SECOND)
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn to_kmh(self) -> f64 {
        self.0 as f64 / KMH_TO_METERS_PER_SECOND as f64
    }
}

impl From<f32> for Radians {
    fn from(v: f32) -> Self {
        Self(v)
    }
}

impl From<f32> for MetersPerSecond {
    fn from(v: f32) -> Self {
        Self(v)
    }
}

impl Mul<f32> for Radians {
    type Output = Radians;
    fn mul(self, rhs: f32) -> Radians {
        Radians(self.0 * rhs)
    }
}

impl Mul<f32> for MetersPerSecond {
    type Output = MetersPerSecond;
    fn mul(self, rhs: f32) -> MetersPerSecond {
        MetersPerSecond(self.0 * rhs)
    }
}

impl AttrValue for Radians {
    const KIND: &'static str = "angle in degrees";

    fn parse_attr(text: &str) -> Option<Self> {
        f32::parse_attr(text).map(Radians::from_degrees)
    }

    fn format_attr(&self) -> String {
        format_converted(self.to_degrees(), |text| {
            Radians::parse_attr(text) == Some(*self)
        })
    }
}

impl AttrValue for MetersPerSecond {
    const KIND: &'static str = "speed in km/h";

    fn parse_attr(text: &str) -> Option<Self> {
        f32::parse_attr(text).map(MetersPerSecond::from_kmh)
    }

    fn format_attr(&self) -> String {
        format_converted(self.to_kmh(), |text| {
            MetersPerSecond::parse_attr(text) == Some(*self)
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn right_angle_round_trips() {
        let angle = Radians::parse_attr("90").unwrap();
        assert!((angle.value() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(angle.format_attr(), "90");
    }

    #[test]
    fn awkward_angles_round_trip() {
        for text in [
            "0",
            "1",
            "0.5",
            "33.3",
            "-45",
            "179.99",
            "360",
            "7.125",
            "1234.567",
            "0.1234567",
        ] {
            let angle = Radians::parse_attr(text).unwrap();
            assert_eq!(angle.format_attr(), text);
            assert_eq!(Radians::parse_attr(&angle.format_attr()), Some(angle));
        }
    }

    #[test]
    fn speeds_round_trip() {
        let speed = MetersPerSecond::parse_attr("36").unwrap();
        assert!((speed.value() - 10.0).abs() < 1e-4);
        for text in ["36", "120", "0.1", "250.5", "1000", "12.34567", "33.33333"] {
            let speed = MetersPerSecond::parse_attr(text).unwrap();
            assert_eq!(speed.format_attr(), text);
            assert_eq!(MetersPerSecond::parse_attr(&speed.format_attr()), Some(speed));
        }
    }

    #[test]
    fn bad_text_is_rejected() {
        assert_eq!(Radians::parse_attr("ninety"), None);
        assert_eq!(MetersPerSecond::parse_attr(""), None);
    }
}
