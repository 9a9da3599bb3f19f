/// Attribute text codec
mod attr;
/// Decoding and repairing input files
mod source;
/// Element tree and pretty-printer for output files
mod writer;

pub use attr::{AttrError, AttrValue, format_converted, format_float};
pub(crate) use attr::{format_floats, parse_floats};
pub use source::{XmlSource, decode_text, encode_windows_1251, expect_root, repair_markup};
pub use writer::{
    ATTRIBUTE_SPLIT_THRESHOLD, XML_DECLARATION, XmlElement, render_document, to_pretty_string,
    write_document,
};

use tracing::warn;

pub type Node<'a, 'input> = roxmltree::Node<'a, 'input>;

/// Element children of `node` with the given tag.
pub fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |child| child.is_element() && child.has_tag_name(tag))
}

pub fn required_attr<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str, AttrError> {
    node.attribute(name).ok_or_else(|| AttrError::missing(name))
}

pub fn parse_attr<T: AttrValue>(node: Node<'_, '_>, name: &str) -> Result<Option<T>, AttrError> {
    match node.attribute(name) {
        Some(text) => T::parse_attr(text)
            .map(Some)
            .ok_or_else(|| AttrError::invalid::<T>(name, text)),
        None => Ok(None),
    }
}

pub fn parse_required_attr<T: AttrValue>(node: Node<'_, '_>, name: &str) -> Result<T, AttrError> {
    parse_attr(node, name)?.ok_or_else(|| AttrError::missing(name))
}

/// Warns about element children whose tag is not in `allowed`. The
/// unexpected children are otherwise ignored.
pub fn warn_unexpected_children(node: Node<'_, '_>, allowed: &[&str]) {
    for child in node.children().filter(|c| c.is_element()) {
        let tag = child.tag_name().name();
        if !allowed.contains(&tag) {
            warn!(
                parent = node.tag_name().name(),
                child = tag,
                "unexpected child element ignored"
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn optional_and_required_attributes() {
        let doc = roxmltree::Document::parse(r#"<A Count="3" Bad="x"/>"#).unwrap();
        let node = doc.root_element();

        assert_eq!(parse_attr::<i32>(node, "Count"), Ok(Some(3)));
        assert_eq!(parse_attr::<i32>(node, "Missing"), Ok(None));
        assert_eq!(
            parse_required_attr::<i32>(node, "Missing"),
            Err(AttrError::missing("Missing"))
        );
        assert!(matches!(
            parse_attr::<i32>(node, "Bad"),
            Err(AttrError::Invalid { expected: "integer", .. })
        ));
        assert_eq!(required_attr(node, "Bad"), Ok("x"));
    }

    #[test]
    fn filters_children_by_tag() {
        let doc =
            roxmltree::Document::parse("<A><B N=\"1\"/><C/><B N=\"2\"/>text</A>").unwrap();
        let names: Vec<_> = child_elements(doc.root_element(), "B")
            .filter_map(|b| b.attribute("N"))
            .collect();
        assert_eq!(names, vec!["1", "2"]);
    }
}
