//! Error types for PDF export

use thiserror::Error;

/// Errors that can occur during PDF export
#[derive(Error, Debug)]
pub enum PdfError {
    /// Page geometry leaves no room for content
    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),

    /// Error compressing a stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for PDF export
pub type Result<T> = std::result::Result<T, PdfError>;
