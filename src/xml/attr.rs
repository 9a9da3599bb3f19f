//! Text codec for attribute values.
//!
//! Nearly all prototype data lives in XML attributes, numbers and vectors
//! included, so every field type knows how to read itself from (and write
//! itself back to) a single attribute string.

use thiserror::Error;

/// Failure to read one attribute.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttrError {
    #[error("missing required attribute {attr}")]
    Missing { attr: String },
    #[error("attribute {attr}={value:?} is not a valid {expected}")]
    Invalid {
        attr: String,
        value: String,
        expected: &'static str,
    },
}

impl AttrError {
    pub fn missing(attr: &str) -> Self {
        AttrError::Missing {
            attr: attr.to_string(),
        }
    }

    pub fn invalid<T: AttrValue>(attr: &str, value: &str) -> Self {
        AttrError::Invalid {
            attr: attr.to_string(),
            value: value.to_string(),
            expected: T::KIND,
        }
    }
}

pub trait AttrValue: Sized {
    /// Human readable type name used in error messages.
    const KIND: &'static str;

    fn parse_attr(text: &str) -> Option<Self>;

    fn format_attr(&self) -> String;
}

/// Formats a float the way the game's files spell numbers: no trailing
/// `.0` for integral values and the shortest text that reads back
/// to the same `f32`.
pub fn format_float(value: f32) -> String {
    if value == 0.0 {
        // Avoid writing "-0".
        return "0".to_string();
    }
    format!("{value}")
}

/// Most decimals tried when looking for the text of a converted value.
const CONVERTED_MAX_DECIMALS: usize = 9;

/// Formats a value that was divided back out of an internal unit.
///
/// The conversion constants are approximations and the internal value is an
/// `f32`, so the quotient carries noise in its last bits. The shortest
/// decimal for which `reads_back` holds is written, which is the authored
/// text whenever the value came from a file.
pub fn format_converted(value: f64, reads_back: impl Fn(&str) -> bool) -> String {
    if value == 0.0 || !value.is_finite() {
        return format_float(value as f32);
    }
    for decimals in 0..=CONVERTED_MAX_DECIMALS {
        let text = trim_decimals(format!("{value:.decimals$}"));
        if reads_back(&text) {
            return text;
        }
    }
    format_float(value as f32)
}

fn trim_decimals(mut text: String) -> String {
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text.remove(0);
    }
    text
}

impl AttrValue for bool {
    const KIND: &'static str = "boolean";

    fn parse_attr(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("true") || text == "1" || text.eq_ignore_ascii_case("yes") {
            Some(true)
        } else if text.eq_ignore_ascii_case("false")
            || text == "0"
            || text.eq_ignore_ascii_case("no")
        {
            Some(false)
        } else {
            None
        }
    }

    fn format_attr(&self) -> String {
        if *self { "true" } else { "false" }.to_string()
    }
}

impl AttrValue for i32 {
    const KIND: &'static str = "integer";

    fn parse_attr(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }

    fn format_attr(&self) -> String {
        self.to_string()
    }
}

impl AttrValue for f32 {
    const KIND: &'static str = "number";

    fn parse_attr(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }

    fn format_attr(&self) -> String {
        format_float(*self)
    }
}

impl AttrValue for String {
    const KIND: &'static str = "string";

    fn parse_attr(text: &str) -> Option<Self> {
        Some(text.to_string())
    }

    fn format_attr(&self) -> String {
        self.clone()
    }
}

/// Whitespace separated list of names, e.g. `LoadPoints="gun1 gun2"`.
impl AttrValue for Vec<String> {
    const KIND: &'static str = "name list";

    fn parse_attr(text: &str) -> Option<Self> {
        Some(text.split_whitespace().map(str::to_string).collect())
    }

    fn format_attr(&self) -> String {
        self.join(" ")
    }
}

/// Splits `text` into exactly `N` floats.
pub(crate) fn parse_floats<const N: usize>(text: &str) -> Option<[f32; N]> {
    let mut out = [0.0; N];
    let mut tokens = text.split_whitespace();
    for slot in out.iter_mut() {
        *slot = tokens.next()?.parse().ok()?;
    }
    if tokens.next().is_some() {
        return None;
    }
    Some(out)
}

pub(crate) fn format_floats(values: &[f32]) -> String {
    values
        .iter()
        .map(|v| format_float(*v))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bool_spellings() {
        assert_eq!(bool::parse_attr("true"), Some(true));
        assert_eq!(bool::parse_attr(" TRUE "), Some(true));
        assert_eq!(bool::parse_attr("0"), Some(false));
        assert_eq!(bool::parse_attr("maybe"), None);
        assert_eq!(false.format_attr(), "false");
    }

    #[test]
    fn numbers_are_trimmed_and_strict() {
        assert_eq!(i32::parse_attr(" 100 "), Some(100));
        assert_eq!(i32::parse_attr("10.5"), None);
        assert_eq!(f32::parse_attr("abc"), None);
        assert_eq!(f32::parse_attr("2.5"), Some(2.5));
    }

    #[test]
    fn float_formatting() {
        assert_eq!(format_float(100.0), "100");
        assert_eq!(format_float(0.5), "0.5");
        assert_eq!(format_float(-0.0), "0");
        assert_eq!(format_float(0.1), "0.1");
    }

    #[test]
    fn converted_values_take_shortest_text() {
        let near = |target: f64| move |text: &str| {
            text.parse::<f64>()
                .is_ok_and(|parsed| (parsed - target).abs() < 1e-9)
        };
        assert_eq!(format_converted(90.000_000_2, near(90.0)), "90");
        assert_eq!(format_converted(12.499_999_8, near(12.5)), "12.5");
        assert_eq!(format_converted(-45.0, near(-45.0)), "-45");
        assert_eq!(format_converted(0.123_456_7, near(0.123_456_7)), "0.1234567");
        assert_eq!(format_converted(0.0, |_| false), "0");
    }

    #[test]
    fn converted_values_fall_back_to_plain_float() {
        assert_eq!(format_converted(2.5, |_| false), "2.5");
    }

    #[test]
    fn decimals_are_trimmed() {
        assert_eq!(trim_decimals("90.000".to_string()), "90");
        assert_eq!(trim_decimals("0.250".to_string()), "0.25");
        assert_eq!(trim_decimals("-0".to_string()), "0");
        assert_eq!(trim_decimals("120".to_string()), "120");
    }

    #[test]
    fn fixed_float_groups() {
        assert_eq!(parse_floats::<3>("1 2 3"), Some([1.0, 2.0, 3.0]));
        assert_eq!(parse_floats::<3>("1 2"), None);
        assert_eq!(parse_floats::<3>("1 2 3 4"), None);
        assert_eq!(parse_floats::<2>("1 x"), None);
        assert_eq!(format_floats(&[1.0, 0.25]), "1 0.25");
    }

    #[test]
    fn name_lists() {
        let names = Vec::<String>::parse_attr("  a b\tc ").unwrap();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(names.format_attr(), "a b c");
    }
}
