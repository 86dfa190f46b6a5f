//! Small helpers over the quick-xml event stream.
//!
//! Parts are patched by splicing text at byte offsets reported by the
//! reader, so everything outside the inserted fragment is kept byte for byte.

use quick_xml::escape::unescape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::PresentationError;

/// Unescaped text of an attribute value (`&amp;` becomes `&`).
fn attribute_text(attr: &Attribute) -> Result<String, PresentationError> {
    let raw = String::from_utf8_lossy(&attr.value);
    let text = unescape(&raw).map_err(quick_xml::Error::from)?;
    Ok(text.into_owned())
}

/// Value of the attribute whose qualified name is exactly `key`.
pub(crate) fn attribute(
    element: &BytesStart,
    key: &[u8],
) -> Result<Option<String>, PresentationError> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| attribute_text(&attr))
        .transpose()
}

/// Value of a namespace-prefixed attribute with the given local name (e.g. `r:id`).
pub(crate) fn prefixed_attribute(
    element: &BytesStart,
    local_name: &[u8],
) -> Result<Option<String>, PresentationError> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.prefix().is_some() && attr.key.local_name().as_ref() == local_name)
        .map(|attr| attribute_text(&attr))
        .transpose()
}

/// Parse an attribute as an integer.
pub(crate) fn integer_attribute(
    element: &BytesStart,
    key: &[u8],
) -> Result<Option<i64>, PresentationError> {
    attribute(element, key)?
        .map(|value| {
            value.trim().parse::<i64>().map_err(|_| {
                PresentationError::malformed(format!(
                    "attribute {} is not an integer: '{}'",
                    String::from_utf8_lossy(key),
                    value
                ))
            })
        })
        .transpose()
}

pub(crate) fn splice(xml: &str, at: usize, fragment: &str) -> String {
    let mut out = String::with_capacity(xml.len() + fragment.len());
    out.push_str(&xml[..at]);
    out.push_str(fragment);
    out.push_str(&xml[at..]);
    out
}

/// Append `fragment` as the last child of the document's root element.
///
/// A self-closing root (`<Relationships .../>`) is expanded first.
pub(crate) fn append_to_root(xml: &str, fragment: &str) -> Result<String, PresentationError> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;

    loop {
        let before = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 1 => return Ok(splice(xml, before, fragment)),
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Empty(e) if depth == 0 => {
                let after = reader.buffer_position() as usize;
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let open = xml[before..after].trim_end_matches("/>");
                return Ok(format!(
                    "{}{}>{}</{}>{}",
                    &xml[..before],
                    open,
                    fragment,
                    name,
                    &xml[after..]
                ));
            }
            Event::Eof => {
                return Err(PresentationError::malformed(
                    "XML part has no root element",
                ))
            }
            _ => {}
        }
    }
}
