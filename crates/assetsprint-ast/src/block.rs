//! Content blocks translated from chapter markup
//!
//! Chapter bodies use a deliberately small markup subset. Each non-empty
//! line becomes exactly one block; there is no nesting.

use serde::{Deserialize, Serialize};

/// A single translated line of chapter content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentBlock {
    /// A heading line (`## Title`)
    Heading {
        /// Heading level (1-6, taken from the number of `#`)
        level: u8,
        /// Heading text with the marker removed
        text: String,
    },
    /// A bullet item (`- item` or `* item`)
    Bullet {
        /// Item text with the marker removed
        text: String,
    },
    /// A plain paragraph
    Paragraph {
        /// Paragraph text
        text: String,
    },
}

impl ContentBlock {
    /// Create a heading block
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::Heading {
            level,
            text: text.into(),
        }
    }

    /// Create a bullet block
    pub fn bullet(text: impl Into<String>) -> Self {
        Self::Bullet { text: text.into() }
    }

    /// Create a paragraph block
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph { text: text.into() }
    }

    /// The visible text of the block
    pub fn text(&self) -> &str {
        match self {
            Self::Heading { text, .. } | Self::Bullet { text } | Self::Paragraph { text } => text,
        }
    }

    /// Check if this block is a heading
    pub fn is_heading(&self) -> bool {
        matches!(self, Self::Heading { .. })
    }

    /// Check if this block is a bullet item
    pub fn is_bullet(&self) -> bool {
        matches!(self, Self::Bullet { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_accessor() {
        let heading = ContentBlock::heading(2, "Why");
        assert_eq!(heading.text(), "Why");
        assert!(heading.is_heading());

        let bullet = ContentBlock::bullet("Point");
        assert_eq!(bullet.text(), "Point");
        assert!(bullet.is_bullet());
        assert!(!bullet.is_heading());
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&ContentBlock::heading(2, "Why")).unwrap();
        assert_eq!(json, r#"{"kind":"heading","level":2,"text":"Why"}"#);

        let json = serde_json::to_string(&ContentBlock::paragraph("Body")).unwrap();
        assert_eq!(json, r#"{"kind":"paragraph","text":"Body"}"#);
    }
}
