//! `[Content_Types].xml` handling.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::xml::{append_to_root, attribute};
use super::PresentationError;

pub(crate) const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Whether a `Default` entry already covers `extension` (case-insensitive).
pub(crate) fn has_default(xml: &str, extension: &str) -> Result<bool, PresentationError> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Default" => {
                if attribute(&e, b"Extension")?
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
                {
                    return Ok(true);
                }
            }
            Event::Eof => return Ok(false),
            _ => {}
        }
    }
}

/// Register a `Default` content type for `extension` unless one exists.
///
/// Returns `None` when the part is already up to date.
pub(crate) fn ensure_default(
    xml: &str,
    extension: &str,
    content_type: &str,
) -> Result<Option<String>, PresentationError> {
    if has_default(xml, extension)? {
        return Ok(None);
    }
    let element = format!(
        r#"<Default Extension="{}" ContentType="{}"/>"#,
        extension, content_type
    );
    append_to_root(xml, &element).map(Some)
}
