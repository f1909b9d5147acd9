//! Error types for OOXML package generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating a package.
#[derive(Error, Debug)]
pub enum Error {
    /// Two parts were registered at the same archive path.
    #[error("Duplicate part in package: {0}")]
    DuplicatePartError(String),

    /// The archive could not be assembled or written.
    #[error("Packaging error: {0}")]
    PackagingError(String),

    /// Input text is not valid UTF-8 or cannot be represented in XML.
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// The XML writer failed while rendering a part.
    #[error("XML writing error: {0}")]
    XmlError(String),

    /// Failed to read input or persist output.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
