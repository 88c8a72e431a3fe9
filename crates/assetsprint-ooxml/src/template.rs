//! Built-in package template
//!
//! Every generated package shares the same fixed parts: content types,
//! package relationships, a style sheet (Normal, Title, Heading1-6,
//! ListParagraph), one bullet list definition, the running header and the
//! page-number footer. Only the document body, core properties, header text
//! and media vary per asset.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::relationships::Relationships;

pub const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Numbering definition used for bullet items
pub const BULLET_NUM_ID: u32 = 1;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Escape special XML characters
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// `[Content_Types].xml`, declaring a default for every media extension used
pub fn content_types_xml(media_extensions: &[&str]) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push('\n');
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push('\n');
    xml.push_str(r#"  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push('\n');
    xml.push_str(r#"  <Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push('\n');

    let mut extensions: Vec<&str> = media_extensions.to_vec();
    extensions.sort_unstable();
    extensions.dedup();
    for ext in extensions {
        xml.push_str(&format!(
            "  <Default Extension=\"{}\" ContentType=\"{}\"/>\n",
            ext,
            content_type_for_extension(ext)
        ));
    }

    let overrides = [
        ("/word/document.xml", "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"),
        ("/word/styles.xml", "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"),
        ("/word/numbering.xml", "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"),
        ("/word/header1.xml", "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml"),
        ("/word/footer1.xml", "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml"),
        ("/docProps/core.xml", "application/vnd.openxmlformats-package.core-properties+xml"),
    ];
    for (part, content_type) in overrides {
        xml.push_str(&format!(
            "  <Override PartName=\"{}\" ContentType=\"{}\"/>\n",
            part, content_type
        ));
    }

    xml.push_str("</Types>");
    xml
}

/// MIME type for a media extension
pub fn content_type_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// `_rels/.rels`
pub fn package_rels_xml() -> String {
    let mut rels = Relationships::new();
    rels.add("word/document.xml", Relationships::TYPE_OFFICE_DOCUMENT);
    rels.add("docProps/core.xml", Relationships::TYPE_CORE_PROPERTIES);
    rels.to_xml()
}

/// `docProps/core.xml`
pub fn core_xml(title: &str, keyword: &str, created_at: &DateTime<Utc>) -> String {
    let created = created_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push('\n');
    xml.push_str(concat!(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
        r#"xmlns:dc="http://purl.org/dc/elements/1.1/" "#,
        r#"xmlns:dcterms="http://purl.org/dc/terms/" "#,
        r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
    ));
    xml.push('\n');
    xml.push_str(&format!("<dc:title>{}</dc:title>\n", escape_xml(title)));
    xml.push_str(&format!("<cp:keywords>{}</cp:keywords>\n", escape_xml(keyword)));
    xml.push_str(&format!(
        "<dcterms:created xsi:type=\"dcterms:W3CDTF\">{}</dcterms:created>\n",
        created
    ));
    xml.push_str(&format!(
        "<dcterms:modified xsi:type=\"dcterms:W3CDTF\">{}</dcterms:modified>\n",
        created
    ));
    xml.push_str("</cp:coreProperties>");
    xml
}

/// `word/styles.xml`
pub fn styles_xml() -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push('\n');
    xml.push_str(&format!(r#"<w:styles xmlns:w="{}">"#, WORDML_NS));
    xml.push('\n');
    xml.push_str(concat!(
        r#"<w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/>"#,
        r#"<w:sz w:val="22"/></w:rPr></w:rPrDefault>"#,
        r#"<w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults>"#
    ));
    xml.push('\n');
    xml.push_str(r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#);
    xml.push('\n');
    xml.push_str(concat!(
        r#"<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/>"#,
        r#"<w:next w:val="Normal"/><w:qFormat/><w:pPr><w:spacing w:after="240"/></w:pPr>"#,
        r#"<w:rPr><w:b/><w:sz w:val="56"/></w:rPr></w:style>"#
    ));
    xml.push('\n');

    // Heading sizes in half-points
    let sizes = [32, 28, 26, 24, 22, 22];
    for (i, size) in sizes.iter().enumerate() {
        let level = i + 1;
        xml.push_str(&format!(
            concat!(
                r#"<w:style w:type="paragraph" w:styleId="Heading{level}"><w:name w:val="heading {level}"/>"#,
                r#"<w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>"#,
                r#"<w:pPr><w:keepNext/><w:spacing w:before="240" w:after="120"/><w:outlineLvl w:val="{outline}"/></w:pPr>"#,
                r#"<w:rPr><w:b/><w:sz w:val="{size}"/></w:rPr></w:style>"#
            ),
            level = level,
            outline = i,
            size = size
        ));
        xml.push('\n');
    }

    xml.push_str(concat!(
        r#"<w:style w:type="paragraph" w:styleId="ListParagraph"><w:name w:val="List Paragraph"/>"#,
        r#"<w:basedOn w:val="Normal"/><w:qFormat/><w:pPr><w:ind w:left="720"/></w:pPr></w:style>"#
    ));
    xml.push('\n');
    xml.push_str("</w:styles>");
    xml
}

/// `word/numbering.xml` with a single bullet list
pub fn numbering_xml() -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push('\n');
    xml.push_str(&format!(r#"<w:numbering xmlns:w="{}">"#, WORDML_NS));
    xml.push('\n');
    xml.push_str(concat!(
        r#"<w:abstractNum w:abstractNumId="0"><w:multiLevelType w:val="singleLevel"/>"#,
        r#"<w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="•"/>"#,
        r#"<w:lvlJc w:val="left"/><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl>"#,
        r#"</w:abstractNum>"#
    ));
    xml.push('\n');
    xml.push_str(&format!(
        r#"<w:num w:numId="{}"><w:abstractNumId w:val="0"/></w:num>"#,
        BULLET_NUM_ID
    ));
    xml.push('\n');
    xml.push_str("</w:numbering>");
    xml
}

/// `word/header1.xml`: the asset title, 9 pt grey, right-aligned
pub fn header_xml(title: &str) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push('\n');
    xml.push_str(&format!(r#"<w:hdr xmlns:w="{}">"#, WORDML_NS));
    xml.push('\n');
    xml.push_str(r#"<w:p><w:pPr><w:jc w:val="right"/></w:pPr>"#);
    xml.push_str(r#"<w:r><w:rPr><w:color w:val="888888"/><w:sz w:val="18"/></w:rPr>"#);
    xml.push_str(&format!(
        "<w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>\n",
        escape_xml(title)
    ));
    xml.push_str("</w:hdr>");
    xml
}

/// `word/footer1.xml`: centred "Page " followed by a PAGE field
pub fn footer_xml() -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push('\n');
    xml.push_str(&format!(r#"<w:ftr xmlns:w="{}">"#, WORDML_NS));
    xml.push('\n');
    xml.push_str(r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr>"#);
    xml.push_str(r#"<w:r><w:t xml:space="preserve">Page </w:t></w:r>"#);
    xml.push_str(r#"<w:r><w:fldChar w:fldCharType="begin"/></w:r>"#);
    xml.push_str(r#"<w:r><w:instrText xml:space="preserve"> PAGE </w:instrText></w:r>"#);
    xml.push_str(r#"<w:r><w:fldChar w:fldCharType="separate"/></w:r>"#);
    xml.push_str(r#"<w:r><w:t>1</w:t></w:r>"#);
    xml.push_str(r#"<w:r><w:fldChar w:fldCharType="end"/></w:r></w:p>"#);
    xml.push('\n');
    xml.push_str("</w:ftr>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("Hello & World"), "Hello &amp; World");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_xml("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn test_content_types_media_defaults() {
        let xml = content_types_xml(&["png", "png"]);
        assert_eq!(xml.matches(r#"Extension="png""#).count(), 1);
        assert!(xml.contains("image/png"));
        assert!(!xml.contains("image/jpeg"));
        assert!(xml.contains("/word/footer1.xml"));
    }

    #[test]
    fn test_core_properties() {
        let created = Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap();
        let xml = core_xml("Fish & Chips", "cooking", &created);
        assert!(xml.contains("<dc:title>Fish &amp; Chips</dc:title>"));
        assert!(xml.contains("<cp:keywords>cooking</cp:keywords>"));
        assert!(xml.contains("2024-06-10T08:00:00Z"));
    }

    #[test]
    fn test_header_and_footer() {
        let header = header_xml("My Book");
        assert!(header.contains(r#"<w:jc w:val="right"/>"#));
        assert!(header.contains(r#"<w:color w:val="888888"/>"#));
        assert!(header.contains(r#"<w:sz w:val="18"/>"#));
        assert!(header.contains("My Book"));

        let footer = footer_xml();
        assert!(footer.contains(r#"<w:jc w:val="center"/>"#));
        assert!(footer.contains(" PAGE "));
    }

    #[test]
    fn test_styles_define_every_heading() {
        let styles = styles_xml();
        for level in 1..=6 {
            assert!(styles.contains(&format!(r#"w:styleId="Heading{}""#, level)));
        }
        assert!(styles.contains(r#"w:styleId="Title""#));
        assert!(styles.contains(r#"w:styleId="ListParagraph""#));
    }
}
