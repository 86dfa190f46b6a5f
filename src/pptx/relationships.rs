//! Package relationship parts (`*.rels`).

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::xml::{append_to_root, attribute};
use super::PresentationError;

pub(crate) const RELATIONSHIPS_NAMESPACE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";

pub(crate) const IMAGE_RELATIONSHIP: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// Both the transitional and strict relationship URIs end with this segment.
const OFFICE_DOCUMENT_SUFFIX: &str = "/officeDocument";
const SLIDE_SUFFIX: &str = "/slide";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

impl Relationship {
    pub fn is_office_document(&self) -> bool {
        self.rel_type.ends_with(OFFICE_DOCUMENT_SUFFIX)
    }

    pub fn is_slide(&self) -> bool {
        self.rel_type.ends_with(SLIDE_SUFFIX)
    }
}

/// Read every `Relationship` element of a rels part.
pub(crate) fn parse_relationships(xml: &str) -> Result<Vec<Relationship>, PresentationError> {
    let mut reader = Reader::from_str(xml);
    let mut relationships = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let (Some(id), Some(target)) = (attribute(&e, b"Id")?, attribute(&e, b"Target")?)
                else {
                    return Err(PresentationError::malformed(
                        "relationship without Id or Target",
                    ));
                };
                relationships.push(Relationship {
                    id,
                    rel_type: attribute(&e, b"Type")?.unwrap_or_default(),
                    target,
                    external: attribute(&e, b"TargetMode")?.as_deref() == Some("External"),
                });
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(relationships)
}

/// `rIdN` one past the highest numbered id in use.
pub(crate) fn next_relationship_id(
    relationships: &[Relationship],
) -> Result<String, PresentationError> {
    let max = relationships
        .iter()
        .filter_map(|rel| rel.id.strip_prefix("rId"))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    let next = max
        .checked_add(1)
        .ok_or_else(|| PresentationError::malformed("no free relationship id"))?;
    Ok(format!("rId{}", next))
}

/// Add an internal relationship to a rels part, creating the part when absent.
pub(crate) fn add_relationship(
    existing: Option<&str>,
    id: &str,
    rel_type: &str,
    target: &str,
) -> Result<String, PresentationError> {
    let element = format!(
        r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
        escape(id),
        escape(rel_type),
        escape(target)
    );

    match existing {
        Some(xml) => append_to_root(xml, &element),
        None => Ok(format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
             <Relationships xmlns=\"{}\">{}</Relationships>",
            RELATIONSHIPS_NAMESPACE, element
        )),
    }
}
