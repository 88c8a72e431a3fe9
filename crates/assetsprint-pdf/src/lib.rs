//! assetsprint-pdf - paginated export
//!
//! Export runs in two stages:
//!
//! 1. [`paginate`] computes a [`Layout`]: every page, every wrapped line and
//!    every decoration, positioned in millimetres on a top-left origin. The
//!    layout is a pure function of the asset and the [`PageGeometry`], so the
//!    page count is known before anything is written.
//! 2. [`render`] writes the layout as PDF with the standard Helvetica fonts.
//!
//! ```ignore
//! use assetsprint_pdf::{export_pdf, PageGeometry};
//!
//! let bytes = export_pdf(&asset, &PageGeometry::default())?;
//! ```

pub mod error;
pub mod geometry;
pub mod layout;
pub mod metrics;
pub mod render;

pub use error::{PdfError, Result};
pub use geometry::PageGeometry;
pub use layout::{paginate, DrawOp, Layout, Page, PageKind};
pub use metrics::Font;
pub use render::render;

use assetsprint_ast::AssetPackage;

/// Paginate and render an asset in one step
pub fn export_pdf(asset: &AssetPackage, geometry: &PageGeometry) -> Result<Vec<u8>> {
    let layout = paginate(asset, geometry);
    render(&layout)
}
