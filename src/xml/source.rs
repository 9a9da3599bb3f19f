//! Reading game XML from disk: windows-1251 decoding and a recovery pass for
//! the files that ship slightly malformed.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1251;
use tracing::debug;

use crate::error::{ErrorKind, IResult, failure_from_kind, io_error};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decodes raw file bytes.
///
/// Game files are windows-1251. A UTF-8 byte order mark or an explicit
/// `encoding="utf-8"` declaration switches to UTF-8 instead.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        return String::from_utf8_lossy(rest);
    }
    if declares_utf8(bytes) {
        return String::from_utf8_lossy(bytes);
    }
    let (text, _had_errors) = WINDOWS_1251.decode_without_bom_handling(bytes);
    text
}

fn declares_utf8(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(128)];
    let Some(end) = head.windows(2).position(|w| w == b"?>") else {
        return false;
    };
    let prolog = String::from_utf8_lossy(&head[..end]).to_ascii_lowercase();
    prolog.starts_with("<?xml")
        && (prolog.contains("encoding=\"utf-8\"") || prolog.contains("encoding='utf-8'"))
}

/// Encodes output text as windows-1251. Characters outside the code page
/// become numeric character references.
pub fn encode_windows_1251(text: &str) -> Cow<'_, [u8]> {
    let (bytes, _encoding, _unmappable) = WINDOWS_1251.encode(text);
    bytes
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// Predefined entity or numeric character reference following a `&`.
fn starts_entity(rest: &str) -> bool {
    let Some(end) = rest.find(';') else {
        return false;
    };
    let body = &rest[..end];
    if let Some(hex) = body.strip_prefix("#x") {
        return !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    if let Some(dec) = body.strip_prefix('#') {
        return !dec.is_empty() && dec.chars().all(|c| c.is_ascii_digit());
    }
    matches!(body, "lt" | "gt" | "amp" | "apos" | "quot")
}

/// Rewrites text that a strict parser rejects into something it accepts.
///
/// Handles the defects seen in shipped data: stray `&`, `<` inside attribute
/// values, attributes glued together without whitespace, control
/// characters, and trailing garbage after the root element.
pub fn repair_markup(text: &str) -> String {
    let text = text.trim_start_matches('\u{feff}');
    let mut out = String::with_capacity(text.len() + 16);
    let mut chars = text.char_indices().peekable();
    let mut in_tag = false;
    let mut in_comment = false;
    let mut quote: Option<char> = None;

    while let Some((i, c)) = chars.next() {
        if !is_xml_char(c) {
            continue;
        }
        if in_comment {
            out.push(c);
            if c == '>' && out.ends_with("-->") {
                in_comment = false;
            }
            continue;
        }
        match c {
            '<' if quote.is_some() => out.push_str("&lt;"),
            '<' => {
                if text[i..].starts_with("<!--") {
                    in_comment = true;
                } else {
                    in_tag = true;
                }
                out.push(c);
            }
            '>' if quote.is_none() => {
                in_tag = false;
                out.push(c);
            }
            '"' | '\'' if in_tag => {
                out.push(c);
                match quote {
                    None => quote = Some(c),
                    Some(open) if open == c => {
                        quote = None;
                        if matches!(chars.peek(), Some((_, next)) if next.is_alphabetic() || *next == '_')
                        {
                            out.push(' ');
                        }
                    }
                    Some(_) => {}
                }
            }
            '&' if !starts_entity(&text[i + 1..]) => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }

    truncate_after_root(out)
}

fn truncate_after_root(mut text: String) -> String {
    let bytes = text.as_bytes();
    let mut start = None;
    for (i, pair) in bytes.windows(2).enumerate() {
        if pair[0] == b'<' && (pair[1].is_ascii_alphabetic() || pair[1] == b'_') {
            start = Some(i + 1);
            break;
        }
    }
    let Some(start) = start else {
        return text;
    };
    let name_len = text[start..]
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(text.len() - start);
    let closing = format!("</{}>", &text[start..start + name_len]);
    if let Some(pos) = text.rfind(&closing) {
        text.truncate(pos + closing.len());
        text.push('\n');
    }
    text
}

/// One decoded XML file, kept alive so `roxmltree` documents can borrow it.
#[derive(Debug, Clone)]
pub struct XmlSource {
    path: PathBuf,
    text: String,
    repaired: bool,
}

impl XmlSource {
    pub fn read(path: &Path) -> IResult<Self> {
        let bytes = std::fs::read(path).map_err(|err| io_error(path, err))?;
        Ok(Self::from_bytes(path, &bytes))
    }

    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8]) -> Self {
        Self::from_text(path, decode_text(bytes).into_owned())
    }

    /// Wraps already decoded text, running the recovery pass if a strict
    /// parse fails.
    pub fn from_text(path: impl Into<PathBuf>, text: String) -> Self {
        let path = path.into();
        if roxmltree::Document::parse_with_options(&text, parsing_options()).is_ok() {
            return XmlSource {
                path,
                text,
                repaired: false,
            };
        }
        debug!(file = %path.display(), "strict parse failed, repairing markup");
        let text = repair_markup(&text);
        XmlSource {
            path,
            text,
            repaired: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn was_repaired(&self) -> bool {
        self.repaired
    }

    pub fn document(&self) -> IResult<roxmltree::Document<'_>> {
        roxmltree::Document::parse_with_options(&self.text, parsing_options()).map_err(|err| {
            failure_from_kind(ErrorKind::MalformedXml {
                path: self.path.clone(),
                detail: err.to_string(),
            })
        })
    }
}

fn parsing_options() -> roxmltree::ParsingOptions {
    roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    }
}

/// Returns the root element if its tag is `expected`; anything else is fatal.
pub fn expect_root<'a, 'input>(
    doc: &'a roxmltree::Document<'input>,
    path: &Path,
    expected: &'static str,
) -> IResult<roxmltree::Node<'a, 'input>> {
    let root = doc.root_element();
    if root.has_tag_name(expected) {
        Ok(root)
    } else {
        Err(failure_from_kind(ErrorKind::MissingRootTag {
            path: path.to_path_buf(),
            expected,
            found: root.tag_name().name().to_string(),
        }))
    }
}
