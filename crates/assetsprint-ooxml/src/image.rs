//! Inline images for WordprocessingML
//!
//! Images are embedded as `<w:drawing><wp:inline>` runs referencing a media
//! part through a relationship ID:
//!
//! ```xml
//! <w:drawing>
//!   <wp:inline>
//!     <wp:extent cx="..." cy="..."/>           <!-- Dimensions in EMUs -->
//!     <wp:docPr id="..." name="..."/>
//!     <a:graphic>
//!       <a:graphicData uri="...picture">
//!         <pic:pic>
//!           <pic:blipFill><a:blip r:embed="rIdNN"/></pic:blipFill>
//!         </pic:pic>
//!       </a:graphicData>
//!     </a:graphic>
//!   </wp:inline>
//! </w:drawing>
//! ```
//!
//! OOXML measures in EMUs: 914400 per inch, 9525 per pixel at 96 DPI.

use crate::template::escape_xml;

/// EMUs per inch (914400)
pub const EMU_PER_INCH: i64 = 914400;

/// EMUs per pixel at 96 DPI (9525)
pub const EMU_PER_PIXEL: i64 = 9525;

/// Convert pixels (96 DPI) to EMUs
pub fn pixels_to_emu(pixels: i64) -> i64 {
    pixels * EMU_PER_PIXEL
}

/// An image placed inline in a paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// Drawing ID, unique within the document
    pub id: u32,
    /// Relationship ID of the media part
    pub rel_id: String,
    /// Display name
    pub name: String,
    pub width_px: u32,
    pub height_px: u32,
}

impl InlineImage {
    /// Serialize as a `<w:r><w:drawing>` run
    pub fn to_run_xml(&self) -> String {
        let cx = pixels_to_emu(self.width_px as i64);
        let cy = pixels_to_emu(self.height_px as i64);
        let name = escape_xml(&self.name);

        let mut xml = String::new();
        xml.push_str("<w:r>\n<w:drawing>\n");
        xml.push_str(r#"<wp:inline distT="0" distB="0" distL="0" distR="0">"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<wp:extent cx="{}" cy="{}"/>"#, cx, cy));
        xml.push_str(r#"<wp:effectExtent l="0" t="0" r="0" b="0"/>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<wp:docPr id="{}" name="{}" descr="{}"/>"#,
            self.id, name, name
        ));
        xml.push_str(r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr>"#);
        xml.push('\n');
        xml.push_str(r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#);
        xml.push('\n');
        xml.push_str("<pic:pic>");
        xml.push_str(&format!(
            r#"<pic:nvPicPr><pic:cNvPr id="{}" name="{}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
            self.id, name
        ));
        xml.push_str(&format!(
            r#"<pic:blipFill><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
            escape_xml(&self.rel_id)
        ));
        xml.push_str(&format!(
            r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
            cx, cy
        ));
        xml.push_str("</pic:pic>\n");
        xml.push_str("</a:graphicData></a:graphic>\n");
        xml.push_str("</wp:inline>\n");
        xml.push_str("</w:drawing>\n</w:r>\n");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_conversion() {
        assert_eq!(pixels_to_emu(96), EMU_PER_INCH);
        assert_eq!(pixels_to_emu(500), 4_762_500);
    }

    #[test]
    fn test_run_xml() {
        let image = InlineImage {
            id: 1,
            rel_id: "rId5".to_string(),
            name: "Cover".to_string(),
            width_px: 500,
            height_px: 660,
        };
        let xml = image.to_run_xml();
        assert!(xml.contains(r#"<wp:extent cx="4762500" cy="6286500"/>"#));
        assert!(xml.contains(r#"r:embed="rId5""#));
        assert!(xml.starts_with("<w:r>"));
    }
}
