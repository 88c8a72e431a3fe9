//! Ingestion of generated content
//!
//! Generated content is loose: any field may be missing, blank or `null`.
//! [`GeneratedAsset::into_package`] applies the defaulting policy exactly
//! once and yields a fully populated [`AssetPackage`]; exporters never
//! substitute defaults themselves. Files that already hold a complete
//! package skip the policy, see [`parse_asset`].
//!
//! | Field | Default | Condition |
//! |-------|---------|-----------|
//! | `title` | `Untitled Asset` | missing or blank |
//! | `subtitle` | `A Complete Guide` | missing or blank |
//! | `targetAudience` | dream outcome, else `General Audience` | missing |
//! | `dreamOutcome` | empty | missing |
//! | `painPoints` | empty list | missing |
//! | `coverImagePrompt` | `Minimalist cover for <title>, <keyword>` | missing or blank |
//! | chapter `content` | `Content generation failed.` | missing or blank |
//! | `valueStack` | see [`default_value_stack`] | missing |
//! | `createdAt` | run start | missing |
//! | `id` | run start in epoch milliseconds | missing |

use std::path::Path;

use assetsprint_ast::{
    AssetPackage, Bonus, Chapter, CoverImage, Oto, ValueStack, Workbook,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_TITLE: &str = "Untitled Asset";
pub const DEFAULT_SUBTITLE: &str = "A Complete Guide";
pub const DEFAULT_AUDIENCE: &str = "General Audience";
pub const FAILED_CHAPTER_CONTENT: &str = "Content generation failed.";

/// When a default replaces the supplied value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Field absent or `null`
    Missing,
    /// Field absent, `null`, or whitespace only
    MissingOrBlank,
}

impl Condition {
    fn applies(self, value: Option<&str>) -> bool {
        match (self, value) {
            (_, None) => true,
            (Condition::Missing, Some(_)) => false,
            (Condition::MissingOrBlank, Some(v)) => v.trim().is_empty(),
        }
    }
}

/// One row of the defaulting policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultRule {
    /// Field name as it appears in generated JSON
    pub field: &'static str,
    /// Default value description
    pub default: &'static str,
    pub condition: Condition,
}

/// The defaulting policy, in application order
pub const DEFAULT_POLICY: &[DefaultRule] = &[
    DefaultRule { field: "title", default: DEFAULT_TITLE, condition: Condition::MissingOrBlank },
    DefaultRule { field: "subtitle", default: DEFAULT_SUBTITLE, condition: Condition::MissingOrBlank },
    DefaultRule { field: "dreamOutcome", default: "", condition: Condition::Missing },
    DefaultRule { field: "targetAudience", default: "dream outcome, else General Audience", condition: Condition::Missing },
    DefaultRule { field: "painPoints", default: "[]", condition: Condition::Missing },
    DefaultRule { field: "coverImagePrompt", default: "Minimalist cover for <title>, <keyword>", condition: Condition::MissingOrBlank },
    DefaultRule { field: "chapters[].content", default: FAILED_CHAPTER_CONTENT, condition: Condition::MissingOrBlank },
    DefaultRule { field: "valueStack", default: "Bonus Workbook / VIP Upgrade", condition: Condition::Missing },
    DefaultRule { field: "createdAt", default: "run start", condition: Condition::Missing },
    DefaultRule { field: "id", default: "run start in epoch milliseconds", condition: Condition::Missing },
];

/// Loosely typed generated content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratedAsset {
    pub id: Option<String>,
    pub keyword: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub target_audience: Option<String>,
    pub pain_points: Option<Vec<String>>,
    pub dream_outcome: Option<String>,
    pub cover_image_base64: Option<String>,
    pub cover_image_prompt: Option<String>,
    pub chapters: Option<Vec<GeneratedChapter>>,
    pub value_stack: Option<GeneratedValueStack>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A chapter as drafted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedChapter {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// A value stack as generated; absent parts fall back individually
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedValueStack {
    pub bonuses: Option<Vec<Bonus>>,
    pub workbook: Option<Workbook>,
    pub oto: Option<Oto>,
}

impl GeneratedAsset {
    /// Parse generated JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply the defaulting policy
    ///
    /// `run_start` stands in for a missing `createdAt` and `id`.
    pub fn into_package(self, run_start: DateTime<Utc>) -> AssetPackage {
        let created_at = self.created_at.unwrap_or(run_start);
        let keyword = self.keyword.unwrap_or_default();
        let title = text_or(self.title, Condition::MissingOrBlank, || DEFAULT_TITLE.to_string());
        let subtitle = text_or(self.subtitle, Condition::MissingOrBlank, || {
            DEFAULT_SUBTITLE.to_string()
        });

        let dream_outcome = self.dream_outcome.unwrap_or_default();
        let target_audience = text_or(self.target_audience, Condition::Missing, || {
            if dream_outcome.is_empty() {
                DEFAULT_AUDIENCE.to_string()
            } else {
                dream_outcome.clone()
            }
        });
        let cover_image_prompt = text_or(self.cover_image_prompt, Condition::MissingOrBlank, || {
            default_cover_prompt(&title, &keyword)
        });

        let chapters: Vec<Chapter> = self
            .chapters
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, chapter)| {
                let title = chapter
                    .title
                    .unwrap_or_else(|| format!("Chapter {}", index + 1));
                let content = text_or(chapter.content, Condition::MissingOrBlank, || {
                    log::warn!("Chapter {} has no content, using fallback", index + 1);
                    FAILED_CHAPTER_CONTENT.to_string()
                });
                Chapter::new(title, content)
            })
            .collect();

        let value_stack = match self.value_stack {
            Some(stack) => stack.into_value_stack(),
            None => default_value_stack(),
        };

        let cover_image = self
            .cover_image_base64
            .filter(|uri| !uri.trim().is_empty())
            .map(CoverImage::from_data_uri);

        AssetPackage {
            id: self
                .id
                .unwrap_or_else(|| created_at.timestamp_millis().to_string()),
            keyword,
            title,
            subtitle,
            target_audience,
            pain_points: self.pain_points.unwrap_or_default(),
            dream_outcome,
            cover_image,
            cover_image_prompt,
            chapters,
            value_stack,
            created_at,
        }
    }
}

impl GeneratedValueStack {
    fn into_value_stack(self) -> ValueStack {
        let fallback = default_value_stack();
        ValueStack {
            bonuses: self.bonuses.unwrap_or_default(),
            workbook: self.workbook.unwrap_or(fallback.workbook),
            oto: self.oto.unwrap_or(fallback.oto),
        }
    }
}

fn text_or(value: Option<String>, condition: Condition, default: impl FnOnce() -> String) -> String {
    match value {
        Some(v) if !condition.applies(Some(&v)) => v,
        _ => default(),
    }
}

/// Cover prompt used when none was generated
pub fn default_cover_prompt(title: &str, keyword: &str) -> String {
    format!("Minimalist cover for {}, {}", title, keyword)
}

/// Value stack used when generation fails
pub fn default_value_stack() -> ValueStack {
    ValueStack {
        bonuses: Vec::new(),
        workbook: Workbook {
            title: "Bonus Workbook".to_string(),
            description: String::new(),
            icon: "FileText".to_string(),
            value: "$47".to_string(),
            sections: Vec::new(),
        },
        oto: Oto {
            title: "VIP Upgrade".to_string(),
            description: String::new(),
            icon: "Crown".to_string(),
            price: "$97".to_string(),
            original_price: "$197".to_string(),
            bullets: Vec::new(),
        },
    }
}

/// Parse asset JSON
///
/// A complete [`AssetPackage`] is taken as is. Anything else is read as
/// loose generated content and normalised with [`GeneratedAsset::into_package`].
pub fn parse_asset(json: &str, run_start: DateTime<Utc>) -> Result<AssetPackage> {
    match serde_json::from_str::<AssetPackage>(json) {
        Ok(asset) => Ok(asset),
        Err(e) => {
            log::debug!("Not a complete asset package ({}), applying defaults", e);
            Ok(GeneratedAsset::from_json_str(json)?.into_package(run_start))
        }
    }
}

/// Load an asset file, normalising loose content on the way in
pub fn load_asset(path: &Path, run_start: DateTime<Utc>) -> Result<AssetPackage> {
    let json = std::fs::read_to_string(path)?;
    let asset = parse_asset(&json, run_start)?;
    log::debug!(
        "Loaded asset '{}' with {} chapters from {}",
        asset.title,
        asset.chapters.len(),
        path.display()
    );
    Ok(asset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn run_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_complete_package_kept_verbatim() {
        let json = r#"{
            "id": "42",
            "keyword": "Bonsai",
            "title": "",
            "subtitle": "Small trees",
            "createdAt": "2023-01-02T03:04:05Z",
            "chapters": [{ "title": "Draft Chapter", "content": "" }]
        }"#;
        let asset = parse_asset(json, run_start()).unwrap();

        assert_eq!(asset.id, "42");
        assert_eq!(asset.title, "");
        assert_eq!(asset.chapters[0].content, "");
        assert_eq!(asset.target_audience, "");
        assert_eq!(asset.value_stack, ValueStack::default());
        assert_ne!(asset.created_at, run_start());
    }

    #[test]
    fn test_loose_content_falls_back_to_defaults() {
        let json = r#"{ "keyword": "Bonsai", "chapters": [{ "title": "Wiring" }] }"#;
        let asset = parse_asset(json, run_start()).unwrap();
        assert_eq!(asset.title, DEFAULT_TITLE);
        assert_eq!(asset.chapters[0].content, FAILED_CHAPTER_CONTENT);
        assert_eq!(asset.created_at, run_start());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(parse_asset("{ nope", run_start()).is_err());
    }

    #[test]
    fn test_empty_object_gets_every_default() {
        let asset = GeneratedAsset::from_json_str("{}")
            .unwrap()
            .into_package(run_start());

        assert_eq!(asset.title, DEFAULT_TITLE);
        assert_eq!(asset.subtitle, DEFAULT_SUBTITLE);
        assert_eq!(asset.target_audience, DEFAULT_AUDIENCE);
        assert_eq!(asset.dream_outcome, "");
        assert!(asset.pain_points.is_empty());
        assert_eq!(asset.cover_image_prompt, "Minimalist cover for Untitled Asset, ");
        assert!(asset.chapters.is_empty());
        assert_eq!(asset.value_stack, default_value_stack());
        assert_eq!(asset.created_at, run_start());
        assert_eq!(asset.id, run_start().timestamp_millis().to_string());
        assert!(asset.cover_image.is_none());
    }

    #[test]
    fn test_blank_title_defaults_but_blank_audience_kept() {
        let asset = GeneratedAsset {
            title: Some("   ".to_string()),
            target_audience: Some(String::new()),
            ..Default::default()
        }
        .into_package(run_start());

        assert_eq!(asset.title, DEFAULT_TITLE);
        // Audience only defaults when missing
        assert_eq!(asset.target_audience, "");
    }

    #[test]
    fn test_audience_falls_back_to_dream_outcome() {
        let asset = GeneratedAsset {
            dream_outcome: Some("Lose 10kg".to_string()),
            ..Default::default()
        }
        .into_package(run_start());
        assert_eq!(asset.target_audience, "Lose 10kg");
    }

    #[test]
    fn test_failed_chapter_content() {
        let json = r#"{
            "chapters": [
                { "title": "Intro", "content": "Hello" },
                { "title": "Broken", "content": null },
                { "title": "Blank", "content": "  " }
            ]
        }"#;
        let asset = GeneratedAsset::from_json_str(json)
            .unwrap()
            .into_package(run_start());

        assert_eq!(asset.chapters.len(), 3);
        assert_eq!(asset.chapters[0].content, "Hello");
        assert_eq!(asset.chapters[1].content, FAILED_CHAPTER_CONTENT);
        assert_eq!(asset.chapters[2].content, FAILED_CHAPTER_CONTENT);
        assert_eq!(asset.chapters[1].title, "Broken");
    }

    #[test]
    fn test_partial_value_stack() {
        let json = r#"{
            "valueStack": {
                "bonuses": [{ "title": "Checklist", "value": "$27" }],
                "oto": { "title": "Coaching", "price": "$297", "originalPrice": "$497" }
            }
        }"#;
        let asset = GeneratedAsset::from_json_str(json)
            .unwrap()
            .into_package(run_start());

        assert_eq!(asset.value_stack.bonuses.len(), 1);
        assert_eq!(asset.value_stack.bonuses[0].title, "Checklist");
        assert_eq!(asset.value_stack.workbook.title, "Bonus Workbook");
        assert_eq!(asset.value_stack.oto.title, "Coaching");
        assert_eq!(asset.value_stack.oto.original_price, "$497");
    }

    #[test]
    fn test_supplied_values_preserved() {
        let json = r#"{
            "id": "42",
            "keyword": "Keto",
            "title": "Keto Made Simple",
            "subtitle": "Eat well",
            "coverImagePrompt": "A plate",
            "coverImageBase64": "data:image/png;base64,AAAA",
            "createdAt": "2023-01-01T00:00:00Z"
        }"#;
        let asset = GeneratedAsset::from_json_str(json)
            .unwrap()
            .into_package(run_start());

        assert_eq!(asset.id, "42");
        assert_eq!(asset.title, "Keto Made Simple");
        assert_eq!(asset.cover_image_prompt, "A plate");
        assert!(asset.has_cover());
        assert_eq!(asset.created_at, Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_policy_table_covers_titles() {
        let rule = DEFAULT_POLICY.iter().find(|r| r.field == "title").unwrap();
        assert_eq!(rule.default, DEFAULT_TITLE);
        assert_eq!(rule.condition, Condition::MissingOrBlank);
    }
}
