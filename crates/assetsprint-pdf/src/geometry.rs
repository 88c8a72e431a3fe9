//! Page geometry
//!
//! All layout positions are millimetres measured from the top-left corner.
//! Points only appear when the layout is written out.

use assetsprint_core::config::PdfSettings;

use crate::error::{PdfError, Result};

/// Millimetres per PDF point
const MM_PER_PT: f32 = 25.4 / 72.0;

/// Fixed page dimensions and spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
    /// Vertical advance per body line
    pub line_pitch_mm: f32,
}

impl Default for PageGeometry {
    /// A4 portrait, 20 mm margins, 6 mm body pitch
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 20.0,
            line_pitch_mm: 6.0,
        }
    }
}

impl PageGeometry {
    /// Build from settings, rejecting geometries with no usable content area
    pub fn from_settings(settings: &PdfSettings) -> Result<Self> {
        let geometry = Self {
            width_mm: settings.page_width_mm,
            height_mm: settings.page_height_mm,
            margin_mm: settings.margin_mm,
            line_pitch_mm: settings.line_pitch_mm,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    fn validate(&self) -> Result<()> {
        if self.margin_mm < 0.0 || self.line_pitch_mm <= 0.0 {
            return Err(PdfError::InvalidGeometry(format!(
                "margin {} mm, line pitch {} mm",
                self.margin_mm, self.line_pitch_mm
            )));
        }
        if self.content_width() <= 0.0 || self.break_threshold() <= crate::layout::RESUME_Y {
            return Err(PdfError::InvalidGeometry(format!(
                "{} x {} mm page with {} mm margins has no content area",
                self.width_mm, self.height_mm, self.margin_mm
            )));
        }
        Ok(())
    }

    /// Usable line width between the margins
    pub fn content_width(&self) -> f32 {
        self.width_mm - 2.0 * self.margin_mm
    }

    /// A cursor below this starts a new page before the next line
    pub fn break_threshold(&self) -> f32 {
        self.height_mm - self.margin_mm - 10.0
    }

    /// Horizontal centre of the page
    pub fn center_x(&self) -> f32 {
        self.width_mm / 2.0
    }
}

/// Convert millimetres to PDF points
pub fn mm_to_pt(mm: f32) -> f32 {
    mm / MM_PER_PT
}

/// Convert PDF points to millimetres
pub fn pt_to_mm(pt: f32) -> f32 {
    pt * MM_PER_PT
}
