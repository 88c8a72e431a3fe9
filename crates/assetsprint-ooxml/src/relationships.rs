//! Relationship parts (`*.rels`)
//!
//! OOXML maps relationship IDs to part targets in `_rels/*.rels` files.
//! IDs are generated in insertion order (`rId1`, `rId2`, ...) so the
//! serialized output is deterministic.

use crate::template::escape_xml;

/// OOXML namespace for relationships
pub const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Relationship type URIs used by the generated package
impl Relationships {
    pub const TYPE_OFFICE_DOCUMENT: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const TYPE_CORE_PROPERTIES: &'static str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const TYPE_IMAGE: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const TYPE_STYLES: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const TYPE_NUMBERING: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
    pub const TYPE_HEADER: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
    pub const TYPE_FOOTER: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
}

/// An ordered set of relationships
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    /// `(id, target)` in insertion order
    entries: Vec<(String, RelationshipTarget)>,
}

/// A relationship target with its type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipTarget {
    /// Target part path, relative to the source part
    pub target: String,
    /// Relationship type URI
    pub rel_type: String,
}

impl Relationships {
    /// Create an empty relationship set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relationship and return the generated ID
    pub fn add(&mut self, target: impl Into<String>, rel_type: &str) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push((
            id.clone(),
            RelationshipTarget {
                target: target.into(),
                rel_type: rel_type.to_string(),
            },
        ));
        id
    }

    /// Serialize to a `.rels` part
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, RELATIONSHIPS_NS));
        xml.push('\n');

        for (id, rel) in self.iter() {
            xml.push_str(&format!(
                "  <Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"/>\n",
                escape_xml(id),
                escape_xml(&rel.rel_type),
                escape_xml(&rel.target)
            ));
        }

        xml.push_str("</Relationships>");
        xml
    }

    /// Iterate over relationships in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RelationshipTarget)> {
        self.entries.iter().map(|(id, rel)| (id.as_str(), rel))
    }
}
