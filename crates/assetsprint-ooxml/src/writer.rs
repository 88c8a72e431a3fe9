//! DOCX writer
//!
//! Serializes a [`FlowDocument`] into a complete WordprocessingML package.
//! The body is built as a string, part by part, and the fixed parts come
//! from [`crate::template`].

use assetsprint_ast::{Alignment, FlowBlock, FlowDocument, HeadingStyle, ImageBox, PartKind};

use crate::archive::OoxmlArchive;
use crate::error::Result;
use crate::image::InlineImage;
use crate::relationships::Relationships;
use crate::template::{self, escape_xml, BULLET_NUM_ID, REL_NS, WORDML_NS};

// A4 in twentieths of a point, one-inch margins
const PAGE_WIDTH_TWIPS: u32 = 11906;
const PAGE_HEIGHT_TWIPS: u32 = 16838;
const PAGE_MARGIN_TWIPS: u32 = 1440;
const HEADER_FOOTER_TWIPS: u32 = 708;

/// DOCX writer state for a single document
pub struct DocxWriter {
    /// Body XML under construction
    output: String,
    /// Relationships of word/document.xml
    relationships: Relationships,
    /// Media parts to add: (archive path, bytes)
    media_files: Vec<(String, Vec<u8>)>,
    next_drawing_id: u32,
    header_rel_id: String,
    footer_rel_id: String,
}

impl DocxWriter {
    fn new() -> Self {
        let mut relationships = Relationships::new();
        relationships.add("styles.xml", Relationships::TYPE_STYLES);
        relationships.add("numbering.xml", Relationships::TYPE_NUMBERING);
        let header_rel_id = relationships.add("header1.xml", Relationships::TYPE_HEADER);
        let footer_rel_id = relationships.add("footer1.xml", Relationships::TYPE_FOOTER);

        Self {
            output: String::new(),
            relationships,
            media_files: Vec::new(),
            next_drawing_id: 1,
            header_rel_id,
            footer_rel_id,
        }
    }

    /// Write a flow document as DOCX bytes
    pub fn write(doc: &FlowDocument) -> Result<Vec<u8>> {
        let mut writer = Self::new();
        let document_xml = writer.generate_document_xml(doc);

        let mut archive = OoxmlArchive::new();
        let extensions: Vec<&str> = writer
            .media_files
            .iter()
            .filter_map(|(path, _)| path.rsplit('.').next())
            .collect();
        archive.set_string("[Content_Types].xml", template::content_types_xml(&extensions));
        archive.set_string("_rels/.rels", template::package_rels_xml());
        archive.set_string(
            "docProps/core.xml",
            template::core_xml(&doc.title, &doc.keyword, &doc.created_at),
        );
        archive.set_string("word/document.xml", document_xml);
        archive.set_string("word/styles.xml", template::styles_xml());
        archive.set_string("word/numbering.xml", template::numbering_xml());
        archive.set_string("word/header1.xml", template::header_xml(&doc.title));
        archive.set_string("word/footer1.xml", template::footer_xml());
        archive.set_string("word/_rels/document.xml.rels", writer.relationships.to_xml());
        for (path, data) in writer.media_files {
            archive.set(path, data);
        }

        let bytes = archive.to_bytes()?;
        log::debug!("Wrote DOCX package: {} parts, {} bytes", doc.parts.len(), bytes.len());
        Ok(bytes)
    }

    fn generate_document_xml(&mut self, doc: &FlowDocument) -> String {
        self.output.clear();

        self.output
            .push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        self.output.push('\n');
        self.output.push_str(&format!(
            concat!(
                r#"<w:document xmlns:w="{}" xmlns:r="{}" "#,
                r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
                r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
                r#"xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#
            ),
            WORDML_NS, REL_NS
        ));
        self.output.push('\n');
        self.output.push_str("<w:body>\n");

        for part in &doc.parts {
            for block in &part.blocks {
                self.generate_block(part.kind, block);
            }
        }

        self.generate_section_properties();
        self.output.push_str("</w:body>\n");
        self.output.push_str("</w:document>");

        std::mem::take(&mut self.output)
    }

    fn generate_block(&mut self, kind: PartKind, block: &FlowBlock) {
        match block {
            FlowBlock::Image(image_box) => self.generate_image(kind, image_box),
            FlowBlock::Heading { style, text, align } => {
                let style_id = match style {
                    HeadingStyle::Title => "Title".to_string(),
                    HeadingStyle::Level(level) => format!("Heading{}", (*level).clamp(1, 6)),
                };
                self.generate_paragraph(Some(&style_id), *align, text);
            }
            FlowBlock::Paragraph { text, align } => self.generate_paragraph(None, *align, text),
            FlowBlock::Bullet(text) => self.generate_bullet(text),
            FlowBlock::PageBreak => {
                self.output.push_str("<w:p>\n<w:r>\n");
                self.output.push_str(r#"<w:br w:type="page"/>"#);
                self.output.push('\n');
                self.output.push_str("</w:r>\n</w:p>\n");
            }
        }
    }

    fn generate_paragraph(&mut self, style: Option<&str>, align: Alignment, text: &str) {
        self.output.push_str("<w:p>\n");
        if style.is_some() || align != Alignment::Left {
            self.output.push_str("<w:pPr>\n");
            if let Some(style) = style {
                self.output
                    .push_str(&format!("<w:pStyle w:val=\"{}\"/>\n", escape_xml(style)));
            }
            if let Some(jc) = justification(align) {
                self.output.push_str(&format!("<w:jc w:val=\"{}\"/>\n", jc));
            }
            self.output.push_str("</w:pPr>\n");
        }
        self.generate_run(text);
        self.output.push_str("</w:p>\n");
    }

    fn generate_bullet(&mut self, text: &str) {
        self.output.push_str("<w:p>\n<w:pPr>\n");
        self.output.push_str("<w:pStyle w:val=\"ListParagraph\"/>\n");
        self.output.push_str("<w:numPr>\n<w:ilvl w:val=\"0\"/>\n");
        self.output
            .push_str(&format!("<w:numId w:val=\"{}\"/>\n", BULLET_NUM_ID));
        self.output.push_str("</w:numPr>\n</w:pPr>\n");
        self.generate_run(text);
        self.output.push_str("</w:p>\n");
    }

    fn generate_run(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.output.push_str(&format!(
            "<w:r>\n<w:t xml:space=\"preserve\">{}</w:t>\n</w:r>\n",
            escape_xml(text)
        ));
    }

    /// A centred paragraph holding the image, or nothing when there is no image
    fn generate_image(&mut self, kind: PartKind, image_box: &ImageBox) {
        self.output.push_str("<w:p>\n<w:pPr>\n<w:jc w:val=\"center\"/>\n</w:pPr>\n");

        if let Some(image) = &image_box.image {
            let id = self.next_drawing_id;
            self.next_drawing_id += 1;

            let stem = match kind {
                PartKind::Cover => "cover".to_string(),
                _ => format!("image{}", id),
            };
            let file_name = format!("{}.{}", stem, image.format.extension());
            let rel_id = self
                .relationships
                .add(format!("media/{}", file_name), Relationships::TYPE_IMAGE);
            self.media_files
                .push((format!("word/media/{}", file_name), image.data.clone()));

            let inline = InlineImage {
                id,
                rel_id,
                name: stem,
                width_px: image_box.width_px,
                height_px: image_box.height_px,
            };
            self.output.push_str(&inline.to_run_xml());
        }

        self.output.push_str("</w:p>\n");
    }

    fn generate_section_properties(&mut self) {
        self.output.push_str("<w:sectPr>\n");
        self.output.push_str(&format!(
            "<w:headerReference w:type=\"default\" r:id=\"{}\"/>\n",
            self.header_rel_id
        ));
        self.output.push_str(&format!(
            "<w:footerReference w:type=\"default\" r:id=\"{}\"/>\n",
            self.footer_rel_id
        ));
        self.output.push_str(&format!(
            "<w:pgSz w:w=\"{}\" w:h=\"{}\"/>\n",
            PAGE_WIDTH_TWIPS, PAGE_HEIGHT_TWIPS
        ));
        self.output.push_str(&format!(
            "<w:pgMar w:top=\"{m}\" w:right=\"{m}\" w:bottom=\"{m}\" w:left=\"{m}\" w:header=\"{hf}\" w:footer=\"{hf}\" w:gutter=\"0\"/>\n",
            m = PAGE_MARGIN_TWIPS,
            hf = HEADER_FOOTER_TWIPS
        ));
        self.output.push_str("</w:sectPr>\n");
    }
}

fn justification(align: Alignment) -> Option<&'static str> {
    match align {
        Alignment::Left => None,
        Alignment::Center => Some("center"),
        Alignment::Right => Some("right"),
    }
}
