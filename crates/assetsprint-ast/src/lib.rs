//! assetsprint-ast - Asset package and document model definitions
//!
//! This crate provides the types shared by every assetsprint crate:
//!
//! - [`AssetPackage`] and its parts: the generated deliverable for one keyword
//! - [`ContentBlock`]: a translated line of chapter markup
//! - [`FlowDocument`]: the flow-layout document handed to the DOCX writer

pub mod asset;
pub mod block;
pub mod cover;
pub mod document;
pub mod error;

pub use asset::{AssetPackage, Bonus, Chapter, Oto, ValueStack, Workbook};
pub use block::ContentBlock;
pub use cover::{CoverImage, DecodedImage, ImageFormat};
pub use document::{Alignment, FlowBlock, FlowDocument, FlowPart, HeadingStyle, ImageBox, PartKind};
pub use error::{AstError, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
