//! Configuration settings
//!
//! Loaded from an optional `assetsprint.toml`:
//!
//! ```toml
//! [pdf]
//! page_width_mm = 210.0
//! page_height_mm = 297.0
//! margin_mm = 20.0
//! line_pitch_mm = 6.0
//!
//! [docx]
//! cover_width_px = 500
//! cover_height_px = 660
//!
//! [export]
//! output_dir = "."
//! formats = ["pdf", "docx"]
//! ```
//!
//! Every section and key is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::naming::ExportFormat;

/// Default settings file name, looked up in the working directory
pub const SETTINGS_FILE: &str = "assetsprint.toml";

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Paginated export geometry
    pub pdf: PdfSettings,
    /// Flow export settings
    pub docx: DocxSettings,
    /// Delivery settings
    pub export: ExportSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }

    /// Load `path` if given, else `assetsprint.toml` in `dir` if present, else defaults
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let candidate = dir.join(SETTINGS_FILE);
        if candidate.is_file() {
            log::debug!("Loading settings from {}", candidate.display());
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}

/// Page geometry for the paginated export, in millimetres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfSettings {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    /// Vertical advance per body line
    pub line_pitch_mm: f32,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 20.0,
            line_pitch_mm: 6.0,
        }
    }
}

/// Flow export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocxSettings {
    /// Cover image box width in pixels
    pub cover_width_px: u32,
    /// Cover image box height in pixels
    pub cover_height_px: u32,
}

impl Default for DocxSettings {
    fn default() -> Self {
        Self {
            cover_width_px: 500,
            cover_height_px: 660,
        }
    }
}

/// Where and what to export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Target directory
    pub output_dir: PathBuf,
    /// Formats produced when none are requested explicitly
    pub formats: Vec<ExportFormat>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            formats: vec![ExportFormat::Pdf, ExportFormat::Docx],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.pdf.page_width_mm, 210.0);
        assert_eq!(settings.pdf.margin_mm, 20.0);
        assert_eq!(settings.docx.cover_width_px, 500);
        assert_eq!(
            settings.export.formats,
            vec![ExportFormat::Pdf, ExportFormat::Docx]
        );
    }

    #[test]
    fn test_empty_toml_is_default() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_sections() {
        let settings = Settings::from_toml_str(
            r#"
[pdf]
margin_mm = 15.0

[export]
formats = ["txt"]
"#,
        )
        .unwrap();
        assert_eq!(settings.pdf.margin_mm, 15.0);
        assert_eq!(settings.pdf.page_height_mm, 297.0);
        assert_eq!(settings.export.formats, vec![ExportFormat::Txt]);
        assert_eq!(settings.docx, DocxSettings::default());
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Settings::from_toml_str("[export]\nformats = [\"odt\"]").is_err());
    }

    #[test]
    fn test_discover_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::discover(None, dir.path()).unwrap();
        assert_eq!(settings, Settings::default());

        std::fs::write(dir.path().join(SETTINGS_FILE), "[docx]\ncover_width_px = 320\n").unwrap();
        let settings = Settings::discover(None, dir.path()).unwrap();
        assert_eq!(settings.docx.cover_width_px, 320);
    }
}
