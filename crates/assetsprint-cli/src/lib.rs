//! assetsprint CLI - Command-line interface library
//!
//! This library provides the CLI functionality for assetsprint:
//! - Export: write an asset package as PDF, DOCX and/or plain text
//! - Blocks: show how chapter markup is translated
//! - Layout: show the computed PDF page layout
//!
//! # Library Usage
//!
//! ```ignore
//! use assetsprint_cli::{export_command, FormatArg};
//!
//! let written = export_command(&input, Some(FormatArg::All), Some(&out_dir), None)?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Export PDF and DOCX (or whatever assetsprint.toml lists)
//! assetsprint export asset.json --output dist/
//!
//! # Export one format
//! assetsprint export asset.json --format txt
//!
//! # Inspect translated blocks of the second chapter
//! assetsprint blocks asset.json --chapter 1
//!
//! # Page-by-page layout summary
//! assetsprint layout asset.json --format json
//! ```

pub mod app;
pub mod export;
pub mod logging;

pub use app::{blocks_command, chapter_blocks, export_command, layout_command};
pub use app::{run_cli, ChapterBlocks, FormatArg, OutputFormat};
pub use export::{render_format, write_atomic, ExportSession};
