//! Error types for core operations

use thiserror::Error;

/// Errors that can occur in core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Error reading input or settings files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Asset JSON could not be parsed
    #[error("Invalid asset JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings TOML could not be parsed
    #[error("Invalid settings: {0}")]
    Config(#[from] toml::de::Error),

    /// Asset model error
    #[error(transparent)]
    Asset(#[from] assetsprint_ast::AstError),

    /// A required generation step failed
    #[error("Generation failed during {phase}: {source}")]
    Generation {
        /// Phase the pipeline was in
        phase: &'static str,
        /// Underlying generator error
        source: GeneratorError,
    },
}

/// Errors reported by a content generator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// The service could not be reached or refused the call
    #[error("Generator unavailable: {0}")]
    Unavailable(String),

    /// The service answered with nothing usable
    #[error("Empty response from {0}")]
    EmptyResponse(&'static str),

    /// The response did not match the expected schema
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
