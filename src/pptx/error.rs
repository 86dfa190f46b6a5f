//! Presentation package error types.

use thiserror::Error;

/// Errors that can occur while reading, patching or writing a `.pptx` package.
#[derive(Error, Debug)]
pub enum PresentationError {
    /// Failed to read or write the presentation file
    #[error("Presentation I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a readable zip archive
    #[error("Invalid presentation archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A package part is not well-formed XML
    #[error("Invalid XML in presentation: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A part the package must contain is absent
    #[error("Presentation is missing part '{0}'")]
    MissingPart(String),

    /// A single part decompresses past the part limit
    #[error("Part '{part}' exceeds the {limit} byte part size limit")]
    PartTooLarge { part: String, limit: u64 },

    /// The package decompresses past the package limit
    #[error("Presentation exceeds the {limit} byte package size limit")]
    PackageTooLarge { limit: u64 },

    /// A part exists but does not have the expected structure
    #[error("Malformed presentation: {0}")]
    Malformed(String),
}

impl PresentationError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        PresentationError::Malformed(message.into())
    }
}
