//! assetsprint-ooxml - flow-layout export
//!
//! Two stages:
//!
//! 1. [`compose`] maps an [`AssetPackage`](assetsprint_ast::AssetPackage)
//!    onto a [`FlowDocument`](assetsprint_ast::FlowDocument): ordered parts
//!    of styled paragraphs, bullets, one image box and forced page breaks.
//! 2. [`DocxWriter`] serializes the flow document into a WordprocessingML
//!    package built from a fixed template (styles, bullet numbering, running
//!    header and a page-number footer).
//!
//! Pagination is left entirely to the word processor.

pub mod archive;
pub mod compose;
pub mod error;
pub mod image;
pub mod relationships;
pub mod template;
pub mod writer;

pub use archive::OoxmlArchive;
pub use compose::compose;
pub use error::{OoxmlError, Result};
pub use relationships::Relationships;
pub use writer::DocxWriter;

use assetsprint_ast::AssetPackage;
use assetsprint_core::config::DocxSettings;

/// Compose and serialize an asset in one step
pub fn export_docx(asset: &AssetPackage, settings: &DocxSettings) -> Result<Vec<u8>> {
    let doc = compose(asset, settings);
    DocxWriter::write(&doc)
}
