//! PowerPoint (`.pptx`) package access.
//!
//! A presentation is an Office Open XML zip package. This module reads the
//! whole package into memory, exposes the slide size and slide list, and
//! inserts one picture on every slide.
//!
//! Only the parts that need to change are rewritten:
//! - `[Content_Types].xml` gains a `png` default when missing
//! - each slide gains a `p:pic` element and an image relationship
//! - a single media part holds the watermark PNG
//!
//! Everything else is copied through untouched.

mod content_types;
pub mod error;
mod package;
mod part_name;
mod relationships;
mod slide;
mod xml;

use std::io::Cursor;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use rayon::prelude::*;

use crate::watermark::{Placement, SlideCanvas};
use content_types::{ensure_default, CONTENT_TYPES_PART};
use package::Package;
pub use package::PackageLimits;
use part_name::{rels_part_for, relative_target, resolve_target};
use relationships::{
    add_relationship, next_relationship_id, parse_relationships, IMAGE_RELATIONSHIP,
};
use slide::insert_picture;
use xml::{integer_attribute, prefixed_attribute};

pub use error::PresentationError;

const PACKAGE_RELS_PART: &str = "_rels/.rels";
const DEFAULT_PRESENTATION_PART: &str = "ppt/presentation.xml";
const WATERMARK_MEDIA_STEM: &str = "slidemark_watermark";

/// Changes computed for one slide, applied only once every slide succeeded.
struct SlidePatch {
    slide_part: String,
    slide_xml: String,
    rels_part: String,
    rels_xml: String,
}

/// An opened presentation held in memory.
#[derive(Debug, Clone)]
pub struct Presentation {
    package: Package,
    presentation_part: String,
    canvas: SlideCanvas,
    slides: Vec<String>,
}

impl Presentation {
    /// Open a `.pptx` file with the default package limits.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PresentationError> {
        Self::open_with_limits(path, &PackageLimits::default())
    }

    /// Open a `.pptx` file, rejecting packages larger than `limits` allow.
    pub fn open_with_limits(
        path: impl AsRef<Path>,
        limits: &PackageLimits,
    ) -> Result<Self, PresentationError> {
        let path = path.as_ref();
        // A compressed file can only be smaller than its contents
        if std::fs::metadata(path)?.len() > limits.max_package_size {
            return Err(PresentationError::PackageTooLarge {
                limit: limits.max_package_size,
            });
        }
        let data = std::fs::read(path)?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "Read presentation");
        Self::from_bytes_with_limits(data, limits)
    }

    /// Parse a `.pptx` package from memory with the default package limits.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Result<Self, PresentationError> {
        Self::from_bytes_with_limits(data, &PackageLimits::default())
    }

    /// Parse a `.pptx` package from memory.
    pub fn from_bytes_with_limits(
        data: impl Into<Vec<u8>>,
        limits: &PackageLimits,
    ) -> Result<Self, PresentationError> {
        let package = Package::read(Cursor::new(data.into()), limits)?;

        let presentation_part = locate_presentation_part(&package)?;
        let presentation_xml = package.require_xml(&presentation_part)?;
        let (canvas, slide_rel_ids) = parse_presentation(presentation_xml)?;

        let rels_part = rels_part_for(&presentation_part);
        let relationships = match package.get(&rels_part) {
            Some(_) => parse_relationships(package.require_xml(&rels_part)?)?,
            None if slide_rel_ids.is_empty() => Vec::new(),
            None => return Err(PresentationError::MissingPart(rels_part)),
        };

        let slides = slide_rel_ids
            .iter()
            .map(|rel_id| {
                let rel = relationships
                    .iter()
                    .find(|rel| &rel.id == rel_id && !rel.external)
                    .ok_or_else(|| {
                        PresentationError::malformed(format!(
                            "slide relationship '{}' not found in {}",
                            rel_id, rels_part
                        ))
                    })?;
                if !rel.is_slide() {
                    return Err(PresentationError::malformed(format!(
                        "relationship '{}' in {} is not a slide",
                        rel_id, rels_part
                    )));
                }
                Ok(resolve_target(&presentation_part, &rel.target))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for slide in &slides {
            if !package.contains(slide) {
                return Err(PresentationError::MissingPart(slide.clone()));
            }
        }

        tracing::debug!(
            presentation_part = %presentation_part,
            slide_width = canvas.width,
            slide_height = canvas.height,
            slides = slides.len(),
            "Parsed presentation"
        );

        Ok(Self {
            package,
            presentation_part,
            canvas,
            slides,
        })
    }

    /// Slide size in EMU. Every slide of a presentation shares it.
    pub fn slide_canvas(&self) -> SlideCanvas {
        self.canvas
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Slide part names in presentation order.
    pub fn slide_paths(&self) -> &[String] {
        &self.slides
    }

    /// Raw bytes of a package part.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.package.get(name)
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.package.names()
    }

    /// Insert the same picture on every slide.
    ///
    /// The PNG is stored once and referenced from each slide. Nothing is
    /// modified unless every slide can be patched. Returns the number of
    /// slides modified.
    pub fn add_picture_to_all_slides(
        &mut self,
        png: &[u8],
        placement: &Placement,
    ) -> Result<usize, PresentationError> {
        if self.slides.is_empty() {
            tracing::warn!("Presentation has no slides, nothing to watermark");
            return Ok(0);
        }

        let media_part = self.next_media_part();
        let content_types = ensure_default(
            self.package.require_xml(CONTENT_TYPES_PART)?,
            "png",
            "image/png",
        )?;

        let package = &self.package;
        let patches = self
            .slides
            .par_iter()
            .map(|slide| patch_slide(package, slide, &media_part, placement))
            .collect::<Result<Vec<_>, _>>()?;

        self.package.put(media_part.clone(), png.to_vec());
        if let Some(content_types) = content_types {
            self.package
                .put(CONTENT_TYPES_PART, content_types.into_bytes());
        }
        let modified = patches.len();
        for patch in patches {
            self.package.put(patch.slide_part, patch.slide_xml.into_bytes());
            self.package.put(patch.rels_part, patch.rels_xml.into_bytes());
        }

        tracing::debug!(media_part = %media_part, slides = modified, "Inserted watermark picture");
        Ok(modified)
    }

    /// Serialize the package to zip bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PresentationError> {
        Ok(self.package.write(Cursor::new(Vec::new()))?.into_inner())
    }

    /// Write the package to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PresentationError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        std::fs::write(path, &bytes)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Saved presentation");
        Ok(())
    }

    /// First free `slidemark_watermarkN.png` next to the presentation part.
    fn next_media_part(&self) -> String {
        let media_dir = match self.presentation_part.rsplit_once('/') {
            Some((dir, _)) => format!("{}/media", dir),
            None => "media".to_string(),
        };
        (1u32..)
            .map(|n| format!("{}/{}{}.png", media_dir, WATERMARK_MEDIA_STEM, n))
            .find(|name| !self.package.contains(name))
            .unwrap_or_else(|| format!("{}/{}.png", media_dir, WATERMARK_MEDIA_STEM))
    }
}

fn patch_slide(
    package: &Package,
    slide_part: &str,
    media_part: &str,
    placement: &Placement,
) -> Result<SlidePatch, PresentationError> {
    let slide_xml = package.require_xml(slide_part)?;
    let rels_part = rels_part_for(slide_part);
    let existing_rels = match package.get(&rels_part) {
        Some(_) => Some(package.require_xml(&rels_part)?),
        None => None,
    };

    let relationships = match existing_rels {
        Some(xml) => parse_relationships(xml)?,
        None => Vec::new(),
    };
    let rel_id = next_relationship_id(&relationships)?;
    let rels_xml = add_relationship(
        existing_rels,
        &rel_id,
        IMAGE_RELATIONSHIP,
        &relative_target(slide_part, media_part),
    )?;

    let (slide_xml, shape_id) = insert_picture(slide_xml, &rel_id, placement)?;
    tracing::debug!(slide = %slide_part, rel_id = %rel_id, shape_id, "Patched slide");

    Ok(SlidePatch {
        slide_part: slide_part.to_string(),
        slide_xml,
        rels_part,
        rels_xml,
    })
}

/// Find the main presentation part through the package relationships.
fn locate_presentation_part(package: &Package) -> Result<String, PresentationError> {
    if package.contains(PACKAGE_RELS_PART) {
        let relationships = parse_relationships(package.require_xml(PACKAGE_RELS_PART)?)?;
        if let Some(rel) = relationships.iter().find(|rel| rel.is_office_document()) {
            return Ok(resolve_target("", &rel.target));
        }
    }
    Ok(DEFAULT_PRESENTATION_PART.to_string())
}

/// Read the slide size and the ordered slide relationship ids.
fn parse_presentation(xml: &str) -> Result<(SlideCanvas, Vec<String>), PresentationError> {
    let mut reader = Reader::from_str(xml);
    let mut size: Option<(i64, i64)> = None;
    let mut slide_ids = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"sldSz" => {
                    let cx = integer_attribute(&e, b"cx")?;
                    let cy = integer_attribute(&e, b"cy")?;
                    match (cx, cy) {
                        (Some(cx), Some(cy)) if cx > 0 && cy > 0 => size = Some((cx, cy)),
                        _ => {
                            return Err(PresentationError::malformed(
                                "slide size must have positive cx and cy",
                            ))
                        }
                    }
                }
                b"sldId" => {
                    let rel_id = prefixed_attribute(&e, b"id")?.ok_or_else(|| {
                        PresentationError::malformed("slide id without relationship id")
                    })?;
                    slide_ids.push(rel_id);
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    let (cx, cy) =
        size.ok_or_else(|| PresentationError::malformed("presentation has no slide size"))?;
    Ok((SlideCanvas::new(cx as f64, cy as f64), slide_ids))
}
