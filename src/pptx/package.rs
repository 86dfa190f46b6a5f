//! In-memory zip package.
//!
//! Every entry is held as raw bytes in archive order so the package can be
//! written back with only the patched parts changed.

use std::io::{Read, Seek, Write};

use serde::{Deserialize, Serialize};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::PresentationError;
use crate::constants::{DEFAULT_MAX_PACKAGE_SIZE, DEFAULT_MAX_PART_SIZE};

/// Upper bound on the buffer preallocated from a zip header's declared size.
const CAPACITY_HINT_LIMIT: u64 = 16 * 1024 * 1024;

fn default_max_part_size() -> u64 {
    DEFAULT_MAX_PART_SIZE
}

fn default_max_package_size() -> u64 {
    DEFAULT_MAX_PACKAGE_SIZE
}

/// Safety limits for presentation packages, measured on decompressed bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageLimits {
    /// Maximum size of one part in bytes (default: 256MB)
    #[serde(default = "default_max_part_size")]
    pub max_part_size: u64,

    /// Maximum size of all parts together in bytes (default: 1GB)
    #[serde(default = "default_max_package_size")]
    pub max_package_size: u64,
}

impl Default for PackageLimits {
    fn default() -> Self {
        Self {
            max_part_size: default_max_part_size(),
            max_package_size: default_max_package_size(),
        }
    }
}

/// One named entry of the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Part {
    pub name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Package {
    parts: Vec<Part>,
}

impl Package {
    /// Read every file entry of a zip archive. Directory entries are dropped.
    ///
    /// Sizes are enforced on the bytes actually decompressed; the sizes
    /// declared in the zip headers are only used as a bounded capacity hint.
    pub fn read<R: Read + Seek>(
        reader: R,
        limits: &PackageLimits,
    ) -> Result<Self, PresentationError> {
        let mut archive = ZipArchive::new(reader)?;
        let mut parts = Vec::with_capacity(archive.len());
        let mut total: u64 = 0;

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().trim_start_matches('/').to_string();

            let remaining = limits.max_package_size.saturating_sub(total);
            let budget = limits.max_part_size.min(remaining);
            let hint = entry.size().min(budget).min(CAPACITY_HINT_LIMIT);
            let mut data = Vec::with_capacity(hint as usize);
            entry
                .by_ref()
                .take(budget.saturating_add(1))
                .read_to_end(&mut data)?;

            let size = data.len() as u64;
            if size > limits.max_part_size {
                return Err(PresentationError::PartTooLarge {
                    part: name,
                    limit: limits.max_part_size,
                });
            }
            total += size;
            if total > limits.max_package_size {
                return Err(PresentationError::PackageTooLarge {
                    limit: limits.max_package_size,
                });
            }
            parts.push(Part { name, data });
        }

        Ok(Self { parts })
    }

    /// Write all parts, deflate-compressed, in their current order.
    pub fn write<W: Write + Seek>(&self, writer: W) -> Result<W, PresentationError> {
        let mut zip = ZipWriter::new(writer);

        for part in &self.parts {
            let options =
                FileOptions::<()>::default().compression_method(CompressionMethod::Deflated);
            zip.start_file(part.name.as_str(), options)?;
            zip.write_all(&part.data)?;
        }

        Ok(zip.finish()?)
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|part| part.name == name)
            .map(|part| part.data.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn require(&self, name: &str) -> Result<&[u8], PresentationError> {
        self.get(name)
            .ok_or_else(|| PresentationError::MissingPart(name.to_string()))
    }

    /// Fetch a part that must be UTF-8 XML.
    pub fn require_xml(&self, name: &str) -> Result<&str, PresentationError> {
        let data = self.require(name)?;
        std::str::from_utf8(data)
            .map(|xml| xml.trim_start_matches('\u{feff}'))
            .map_err(|e| PresentationError::malformed(format!("{} is not UTF-8: {}", name, e)))
    }

    /// Replace a part in place, or append it when new.
    pub fn put(&mut self, name: impl Into<String>, data: Vec<u8>) {
        let name = name.into();
        match self.parts.iter_mut().find(|part| part.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(Part { name, data }),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|part| part.name.as_str())
    }
}
