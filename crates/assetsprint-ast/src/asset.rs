//! The asset package and its parts
//!
//! An [`AssetPackage`] is created once per generation run and owned by the
//! editing session. Edit actions mutate it in place; exporters only ever
//! borrow it immutably.
//!
//! The serde representation uses camelCase keys so that packages produced by
//! the generation pipeline can be loaded directly:
//!
//! ```json
//! {
//!   "id": "1718000000000",
//!   "keyword": "Wedding Photography",
//!   "title": "Shoot Weddings Like a Pro",
//!   "coverImageBase64": "data:image/jpeg;base64,...",
//!   "chapters": [{ "title": "Introduction", "content": "## Why\n- Point" }],
//!   "valueStack": { "bonuses": [], "workbook": { ... }, "oto": { ... } },
//!   "createdAt": "2024-06-10T08:00:00Z"
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cover::{deserialize_optional_cover, CoverImage};
use crate::error::{AstError, Result};

/// The complete generated deliverable for one keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPackage {
    /// Run identifier
    pub id: String,
    /// Source keyword the run was started from
    pub keyword: String,
    /// Ebook title
    pub title: String,
    /// Ebook subtitle
    pub subtitle: String,
    /// Who the ebook is written for
    #[serde(default)]
    pub target_audience: String,
    /// Market pain points found during research
    #[serde(default)]
    pub pain_points: Vec<String>,
    /// Dream outcome promised by the offer
    #[serde(default)]
    pub dream_outcome: String,
    /// Cover image, absent when generation failed or was skipped
    #[serde(
        rename = "coverImageBase64",
        default,
        deserialize_with = "deserialize_optional_cover"
    )]
    pub cover_image: Option<CoverImage>,
    /// Prompt the cover image was generated from
    #[serde(default)]
    pub cover_image_prompt: String,
    /// Chapters in outline order
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    /// Commercial add-ons
    #[serde(default)]
    pub value_stack: ValueStack,
    /// Start of the generation run
    pub created_at: DateTime<Utc>,
}

/// A single chapter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter heading
    pub title: String,
    /// Body in light markup (`## heading`, `- bullet`, `**bold**`)
    #[serde(default)]
    pub content: String,
}

/// Bundled commercial add-ons attached to an asset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueStack {
    /// Bonus items (typically 3-5)
    pub bonuses: Vec<Bonus>,
    /// Companion workbook
    pub workbook: Workbook,
    /// One-time offer
    pub oto: Oto,
}

/// A companion workbook
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workbook {
    pub title: String,
    pub description: String,
    /// Icon tag used by the presentation layer
    pub icon: String,
    /// Monetary value, preformatted (e.g. `$47`)
    pub value: String,
    /// Section labels in order
    pub sections: Vec<String>,
}

/// A bonus item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bonus {
    pub title: String,
    pub description: String,
    /// Icon tag used by the presentation layer
    pub icon: String,
    /// Monetary value, preformatted
    pub value: String,
}

/// A one-time offer (upsell)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Oto {
    pub title: String,
    pub description: String,
    /// Icon tag used by the presentation layer
    pub icon: String,
    /// Discounted price, preformatted
    pub price: String,
    /// Regular price, preformatted
    pub original_price: String,
    /// Supporting claims in order
    pub bullets: Vec<String>,
}

impl AssetPackage {
    /// Create an empty package for a keyword
    pub fn new(keyword: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: created_at.timestamp_millis().to_string(),
            keyword: keyword.into(),
            title: String::new(),
            subtitle: String::new(),
            target_audience: String::new(),
            pain_points: Vec::new(),
            dream_outcome: String::new(),
            cover_image: None,
            cover_image_prompt: String::new(),
            chapters: Vec::new(),
            value_stack: ValueStack::default(),
            created_at,
        }
    }

    /// Rewrite the title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replace the body of the chapter at `index`
    ///
    /// Chapters are addressed positionally only; their order never changes.
    pub fn replace_chapter_content(&mut self, index: usize, content: impl Into<String>) -> Result<()> {
        let len = self.chapters.len();
        let chapter = self
            .chapters
            .get_mut(index)
            .ok_or(AstError::ChapterOutOfRange { index, len })?;
        chapter.content = content.into();
        Ok(())
    }

    /// Replace (or remove) the cover image
    pub fn replace_cover(&mut self, cover: Option<CoverImage>) {
        self.cover_image = cover;
    }

    /// Check whether the package carries a cover image
    pub fn has_cover(&self) -> bool {
        self.cover_image.is_some()
    }
}

impl Oto {
    /// "Price: X (Regular: Y)", without the parenthetical when there is no regular price
    pub fn price_line(&self) -> String {
        if self.original_price.is_empty() {
            format!("Price: {}", self.price)
        } else {
            format!("Price: {} (Regular: {})", self.price, self.original_price)
        }
    }
}

impl Chapter {
    /// Create a chapter
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}
