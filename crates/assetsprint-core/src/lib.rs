//! assetsprint-core - shared logic for every exporter
//!
//! - [`markup`]: chapter markup to [`ContentBlock`](assetsprint_ast::ContentBlock)s
//! - [`ingest`]: loose generated content to a fully populated
//!   [`AssetPackage`](assetsprint_ast::AssetPackage)
//! - [`pipeline`]: the generation sequence as an explicit state machine
//! - [`text`]: the plain-text fallback export
//! - [`naming`]: output formats and file names
//! - [`config`]: TOML settings
//!
//! # Example
//!
//! ```
//! use assetsprint_ast::ContentBlock;
//! use assetsprint_core::markup::translate;
//!
//! let blocks = translate("## Why\n- **Fast** results\nPlain text");
//! assert_eq!(blocks[0], ContentBlock::heading(2, "Why"));
//! assert_eq!(blocks[1], ContentBlock::bullet("Fast results"));
//! assert_eq!(blocks[2], ContentBlock::paragraph("Plain text"));
//! ```

pub mod config;
pub mod error;
pub mod ingest;
pub mod markup;
pub mod naming;
pub mod pipeline;
pub mod text;

pub use config::Settings;
pub use error::{CoreError, GeneratorError, Result};
pub use ingest::{load_asset, parse_asset, GeneratedAsset};
pub use markup::translate;
pub use naming::{sanitize_keyword, ExportFormat};
pub use pipeline::{ContentGenerator, GenerationPhase, Pipeline};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
