//! Output side: a minimal element tree and the pretty-printer that
//! reproduces the layout of the game's hand-edited files.
//!
//! The layout is part of the file format as far as the game's tooling is
//! concerned, so it is fixed here rather than configurable:
//!
//! * one tab of indentation per nesting level,
//! * elements with more than [`ATTRIBUTE_SPLIT_THRESHOLD`] attributes put
//!   every attribute on its own line and close the start tag on a line of
//!   its own,
//! * an empty line follows the first child of any element that has more
//!   than one child.

use std::path::Path;

use crate::error::{IResult, io_error};

use super::source::encode_windows_1251;

pub const ATTRIBUTE_SPLIT_THRESHOLD: usize = 2;

pub const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="windows-1251" standalone="yes" ?>"#;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlElement {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    keep_defaults: bool,
}

impl XmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        XmlElement {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// An element that also collects fields still at their default. Used to
    /// compare a prototype's values with its parent's; never written out.
    pub fn with_defaults(tag: impl Into<String>) -> Self {
        XmlElement {
            tag: tag.into(),
            keep_defaults: true,
            ..Default::default()
        }
    }

    pub fn keeps_defaults(&self) -> bool {
        self.keep_defaults
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Sets an attribute, keeping its original position if already present.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn push(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push_str(name);
    out.push_str("=\"");
    escape_attr(value, out);
    out.push('"');
}

fn write_element(out: &mut String, element: &XmlElement, depth: usize) {
    indent(out, depth);
    out.push('<');
    out.push_str(&element.tag);

    let has_children = !element.children.is_empty();
    if element.attributes.len() > ATTRIBUTE_SPLIT_THRESHOLD {
        for (name, value) in &element.attributes {
            out.push('\n');
            indent(out, depth + 1);
            push_attribute(out, name, value);
        }
        out.push('\n');
        indent(out, depth);
    } else {
        for (name, value) in &element.attributes {
            out.push(' ');
            push_attribute(out, name, value);
        }
    }

    if !has_children {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");

    for (i, child) in element.children.iter().enumerate() {
        write_element(out, child, depth + 1);
        if i == 0 && element.children.len() > 1 {
            out.push('\n');
        }
    }

    indent(out, depth);
    out.push_str("</");
    out.push_str(&element.tag);
    out.push_str(">\n");
}

/// Renders `root` without the XML declaration.
pub fn to_pretty_string(root: &XmlElement) -> String {
    let mut out = String::new();
    write_element(&mut out, root, 0);
    out
}

/// Renders a complete document: declaration line followed by `root`.
pub fn render_document(root: &XmlElement) -> String {
    let mut out = String::from(XML_DECLARATION);
    out.push('\n');
    write_element(&mut out, root, 0);
    out
}

pub fn write_document(path: &Path, root: &XmlElement) -> IResult<()> {
    let text = render_document(root);
    std::fs::write(path, encode_windows_1251(&text)).map_err(|err| io_error(path, err))
}
