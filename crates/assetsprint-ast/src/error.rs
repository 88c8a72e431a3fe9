//! Error types for the asset model

use thiserror::Error;

/// Errors raised by asset model operations
#[derive(Error, Debug)]
pub enum AstError {
    /// The cover image is not a `data:` URI carrying a base64 payload
    #[error("Malformed image data URI: {0}")]
    MalformedDataUri(String),

    /// The base64 payload could not be decoded
    #[error("Image payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes do not match the format named in the data URI
    #[error("Image bytes are not a valid {0}")]
    SignatureMismatch(&'static str),

    /// A chapter edit addressed an index outside the chapter list
    #[error("Chapter index {index} out of range ({len} chapters)")]
    ChapterOutOfRange {
        /// Requested index
        index: usize,
        /// Number of chapters in the package
        len: usize,
    },
}

/// Result type for asset model operations
pub type Result<T> = std::result::Result<T, AstError>;
