//! Picture insertion into a slide's shape tree.

use std::io::Cursor;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use super::xml::{attribute, splice};
use super::PresentationError;
use crate::constants::ANGLE_UNITS_PER_DEGREE;
use crate::watermark::{Layering, Placement};

const DRAWINGML_NAMESPACE: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const RELATIONSHIPS_NAMESPACE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Offsets and ids found while scanning a slide.
#[derive(Debug, Default, PartialEq, Eq)]
struct ShapeTree {
    /// Qualified-name prefix of `spTree`, e.g. `p`
    prefix: Option<String>,
    /// Highest `cNvPr` id anywhere in the slide
    max_shape_id: u32,
    /// Byte offset just after the start tag of `spTree`
    after_tree_start: usize,
    /// Byte offset just after `grpSpPr` (the first slot for shapes)
    after_group_properties: Option<usize>,
    /// Byte offset of `</spTree>`
    before_tree_end: usize,
}

fn scan_shape_tree(xml: &str) -> Result<ShapeTree, PresentationError> {
    let mut reader = Reader::from_str(xml);
    let mut tree = ShapeTree::default();
    let mut depth = 0usize;
    // Depth of the spTree element once entered, None before and after
    let mut tree_depth: Option<usize> = None;
    let mut tree_closed = false;

    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event()?;
        let after = reader.buffer_position() as usize;

        match event {
            Event::Start(e) => {
                depth += 1;
                track_shape_id(&e, &mut tree)?;
                if e.local_name().as_ref() == b"spTree" && tree_depth.is_none() && !tree_closed {
                    tree_depth = Some(depth);
                    tree.after_tree_start = after;
                    tree.prefix = e
                        .name()
                        .prefix()
                        .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned());
                }
            }
            Event::Empty(e) => {
                track_shape_id(&e, &mut tree)?;
                if tree_depth == Some(depth)
                    && e.local_name().as_ref() == b"grpSpPr"
                    && tree.after_group_properties.is_none()
                {
                    tree.after_group_properties = Some(after);
                }
            }
            Event::End(e) => {
                if let Some(td) = tree_depth {
                    let name = e.local_name();
                    if depth == td + 1
                        && name.as_ref() == b"grpSpPr"
                        && tree.after_group_properties.is_none()
                    {
                        tree.after_group_properties = Some(after);
                    } else if depth == td && name.as_ref() == b"spTree" {
                        tree.before_tree_end = before;
                        tree_depth = None;
                        tree_closed = true;
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !tree_closed {
        return Err(PresentationError::malformed("slide has no shape tree"));
    }
    Ok(tree)
}

fn track_shape_id(element: &BytesStart, tree: &mut ShapeTree) -> Result<(), PresentationError> {
    if element.local_name().as_ref() != b"cNvPr" {
        return Ok(());
    }
    if let Some(id) = attribute(element, b"id")?.and_then(|v| v.trim().parse::<u32>().ok()) {
        tree.max_shape_id = tree.max_shape_id.max(id);
    }
    Ok(())
}

/// Convert a placement coordinate to integer EMU.
fn to_emu(value: f64) -> i64 {
    value.round() as i64
}

/// Build the `pic` element for a placed watermark.
fn picture_element(
    prefix: Option<&str>,
    shape_id: u32,
    rel_id: &str,
    placement: &Placement,
) -> Result<String, PresentationError> {
    let p = |local: &str| match prefix {
        Some(prefix) => format!("{}:{}", prefix, local),
        None => local.to_string(),
    };

    let id = shape_id.to_string();
    let name = format!("Watermark {}", shape_id);
    let x = to_emu(placement.x).to_string();
    let y = to_emu(placement.y).to_string();
    let cx = to_emu(placement.width).to_string();
    let cy = to_emu(placement.height).to_string();
    // Angles are truncated toward zero
    let rot = (placement.rotation_degrees * ANGLE_UNITS_PER_DEGREE) as i64;
    let rot = rot.to_string();

    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Start(BytesStart::new(p("pic")).with_attributes([
        ("xmlns:a", DRAWINGML_NAMESPACE),
        ("xmlns:r", RELATIONSHIPS_NAMESPACE),
    ])))?;

    writer.write_event(Event::Start(BytesStart::new(p("nvPicPr"))))?;
    writer.write_event(Event::Empty(BytesStart::new(p("cNvPr")).with_attributes([
        ("id", id.as_str()),
        ("name", name.as_str()),
    ])))?;
    writer.write_event(Event::Start(BytesStart::new(p("cNvPicPr"))))?;
    writer.write_event(Event::Empty(
        BytesStart::new("a:picLocks").with_attributes([("noChangeAspect", "1")]),
    ))?;
    writer.write_event(Event::End(BytesEnd::new(p("cNvPicPr"))))?;
    writer.write_event(Event::Empty(BytesStart::new(p("nvPr"))))?;
    writer.write_event(Event::End(BytesEnd::new(p("nvPicPr"))))?;

    writer.write_event(Event::Start(BytesStart::new(p("blipFill"))))?;
    writer.write_event(Event::Empty(
        BytesStart::new("a:blip").with_attributes([("r:embed", rel_id)]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("a:stretch")))?;
    writer.write_event(Event::Empty(BytesStart::new("a:fillRect")))?;
    writer.write_event(Event::End(BytesEnd::new("a:stretch")))?;
    writer.write_event(Event::End(BytesEnd::new(p("blipFill"))))?;

    writer.write_event(Event::Start(BytesStart::new(p("spPr"))))?;
    let mut xfrm = BytesStart::new("a:xfrm");
    if placement.is_rotated() && rot != "0" {
        xfrm.push_attribute(("rot", rot.as_str()));
    }
    writer.write_event(Event::Start(xfrm))?;
    writer.write_event(Event::Empty(
        BytesStart::new("a:off").with_attributes([("x", x.as_str()), ("y", y.as_str())]),
    ))?;
    writer.write_event(Event::Empty(
        BytesStart::new("a:ext").with_attributes([("cx", cx.as_str()), ("cy", cy.as_str())]),
    ))?;
    writer.write_event(Event::End(BytesEnd::new("a:xfrm")))?;
    writer.write_event(Event::Start(
        BytesStart::new("a:prstGeom").with_attributes([("prst", "rect")]),
    ))?;
    writer.write_event(Event::Empty(BytesStart::new("a:avLst")))?;
    writer.write_event(Event::End(BytesEnd::new("a:prstGeom")))?;
    writer.write_event(Event::End(BytesEnd::new(p("spPr"))))?;

    writer.write_event(Event::End(BytesEnd::new(p("pic"))))?;

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| PresentationError::malformed(e.to_string()))
}

/// Insert a picture referencing `rel_id` into the slide's shape tree.
///
/// Returns the patched slide XML and the new shape id.
pub(crate) fn insert_picture(
    xml: &str,
    rel_id: &str,
    placement: &Placement,
) -> Result<(String, u32), PresentationError> {
    let tree = scan_shape_tree(xml)?;
    let shape_id = tree
        .max_shape_id
        .checked_add(1)
        .ok_or_else(|| PresentationError::malformed("no free shape id on slide"))?;
    let element = picture_element(tree.prefix.as_deref(), shape_id, rel_id, placement)?;

    let at = match placement.layering {
        Layering::AboveContent => tree.before_tree_end,
        Layering::BelowContent => tree
            .after_group_properties
            .unwrap_or(tree.after_tree_start),
    };

    Ok((splice(xml, at, &element), shape_id))
}
