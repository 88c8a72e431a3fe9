//! Flow document model
//!
//! A [`FlowDocument`] is the word-processor view of an asset package: an
//! ordered list of [`FlowPart`]s, each a logical unit (cover, title, one
//! chapter, one bonus, ...) holding the blocks that render it. The document
//! never computes page positions; pagination is left to the word processor
//! and the only layout instruction is [`FlowBlock::PageBreak`].

use chrono::{DateTime, Utc};

use crate::cover::DecodedImage;

/// A complete flow-layout document
#[derive(Debug, Clone, PartialEq)]
pub struct FlowDocument {
    /// Title shown in the running header and document properties
    pub title: String,
    /// Source keyword, stored as a document keyword
    pub keyword: String,
    /// Creation timestamp for document properties
    pub created_at: DateTime<Utc>,
    /// Logical parts in reading order
    pub parts: Vec<FlowPart>,
}

/// One logical unit of the document
#[derive(Debug, Clone, PartialEq)]
pub struct FlowPart {
    /// What this part represents
    pub kind: PartKind,
    /// Blocks in order
    pub blocks: Vec<FlowBlock>,
}

/// Logical part kinds, in the order the composer emits them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Cover,
    Title,
    Subtitle,
    DreamOutcome,
    /// Chapter at the given outline index
    Chapter(usize),
    ValueStackHeading,
    Workbook,
    /// Bonus at the given index
    Bonus(usize),
    Oto,
}

/// A block-level element of a flow document
#[derive(Debug, Clone, PartialEq)]
pub enum FlowBlock {
    /// A fixed-size image box; `image` is `None` when there is nothing to embed
    Image(ImageBox),
    /// A heading paragraph
    Heading {
        style: HeadingStyle,
        text: String,
        align: Alignment,
    },
    /// A body paragraph
    Paragraph { text: String, align: Alignment },
    /// A first-level bullet item
    Bullet(String),
    /// A forced break; the next block starts on a new page
    PageBreak,
}

/// A fixed-size image box
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBox {
    /// Decoded image, if any
    pub image: Option<DecodedImage>,
    /// Box width in pixels (96 DPI)
    pub width_px: u32,
    /// Box height in pixels (96 DPI)
    pub height_px: u32,
}

/// Heading styles available to the composer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingStyle {
    /// Document title (largest)
    Title,
    /// Numbered heading level (1-6)
    Level(u8),
}

/// Paragraph alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl FlowDocument {
    /// Create an empty document
    pub fn new(title: impl Into<String>, keyword: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            keyword: keyword.into(),
            created_at,
            parts: Vec::new(),
        }
    }

    /// Append a part
    pub fn push(&mut self, kind: PartKind, blocks: Vec<FlowBlock>) {
        self.parts.push(FlowPart { kind, blocks });
    }

    /// Part kinds in order
    pub fn part_kinds(&self) -> Vec<PartKind> {
        self.parts.iter().map(|p| p.kind).collect()
    }

    /// Find the first part of a kind
    pub fn part(&self, kind: PartKind) -> Option<&FlowPart> {
        self.parts.iter().find(|p| p.kind == kind)
    }

    /// Iterate over every block in document order
    pub fn blocks(&self) -> impl Iterator<Item = &FlowBlock> {
        self.parts.iter().flat_map(|p| p.blocks.iter())
    }
}

impl FlowPart {
    /// Visible text of every block in the part, in order
    pub fn texts(&self) -> Vec<&str> {
        self.blocks.iter().filter_map(FlowBlock::text).collect()
    }
}

impl FlowBlock {
    /// Create a heading
    pub fn heading(style: HeadingStyle, text: impl Into<String>) -> Self {
        Self::Heading {
            style,
            text: text.into(),
            align: Alignment::Left,
        }
    }

    /// Create a centred heading
    pub fn centered_heading(style: HeadingStyle, text: impl Into<String>) -> Self {
        Self::Heading {
            style,
            text: text.into(),
            align: Alignment::Center,
        }
    }

    /// Create a left-aligned paragraph
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph {
            text: text.into(),
            align: Alignment::Left,
        }
    }

    /// Visible text, `None` for images and breaks
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Heading { text, .. } | Self::Paragraph { text, .. } | Self::Bullet(text) => {
                Some(text)
            }
            Self::Image(_) | Self::PageBreak => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_part_bookkeeping() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut doc = FlowDocument::new("Title", "kw", created);
        doc.push(
            PartKind::Title,
            vec![FlowBlock::centered_heading(HeadingStyle::Title, "Title")],
        );
        doc.push(
            PartKind::Chapter(0),
            vec![
                FlowBlock::heading(HeadingStyle::Level(1), "One"),
                FlowBlock::paragraph("Body"),
                FlowBlock::PageBreak,
            ],
        );

        assert_eq!(doc.part_kinds(), vec![PartKind::Title, PartKind::Chapter(0)]);
        assert_eq!(doc.blocks().count(), 4);
        assert_eq!(
            doc.part(PartKind::Chapter(0)).unwrap().texts(),
            vec!["One", "Body"]
        );
    }
}
