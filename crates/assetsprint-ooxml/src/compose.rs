//! Flow composer
//!
//! Maps an asset onto an ordered [`FlowDocument`]. The part sequence is
//! fixed:
//!
//! ```text
//! Cover, Title, Subtitle, [DreamOutcome], Chapter(0..n),
//! ValueStackHeading, Workbook, Bonus(0..m), Oto
//! ```
//!
//! `DreamOutcome` is present only when the asset has one. The "Exclusive
//! Bonuses" heading opens `Bonus(0)`. Forced page breaks close the cover,
//! the front matter, every chapter and the value-stack heading, and open
//! the OTO.

use assetsprint_ast::{
    AssetPackage, Alignment, ContentBlock, FlowBlock, FlowDocument, HeadingStyle, ImageBox,
    PartKind,
};
use assetsprint_core::config::DocxSettings;
use assetsprint_core::markup::translate;

/// Heading text of the value-stack section
pub const VALUE_STACK_HEADING: &str = "COMMERCIAL VALUE STACK";
/// Heading text opening the bonus list
pub const BONUSES_HEADING: &str = "Exclusive Bonuses";

/// Compose the flow document for an asset
///
/// The asset is only borrowed; a cover that fails to decode is logged and
/// replaced by an empty image box.
pub fn compose(asset: &AssetPackage, settings: &DocxSettings) -> FlowDocument {
    let mut doc = FlowDocument::new(&asset.title, &asset.keyword, asset.created_at);

    doc.push(PartKind::Cover, vec![cover_box(asset, settings), FlowBlock::PageBreak]);
    doc.push(
        PartKind::Title,
        vec![FlowBlock::centered_heading(HeadingStyle::Title, &asset.title)],
    );

    let mut subtitle = vec![FlowBlock::centered_heading(
        HeadingStyle::Level(2),
        &asset.subtitle,
    )];
    if asset.dream_outcome.is_empty() {
        subtitle.push(FlowBlock::PageBreak);
        doc.push(PartKind::Subtitle, subtitle);
    } else {
        doc.push(PartKind::Subtitle, subtitle);
        doc.push(
            PartKind::DreamOutcome,
            vec![
                FlowBlock::centered_heading(
                    HeadingStyle::Level(3),
                    format!("Dream Outcome: {}", asset.dream_outcome),
                ),
                FlowBlock::PageBreak,
            ],
        );
    }

    for (index, chapter) in asset.chapters.iter().enumerate() {
        let mut blocks = vec![FlowBlock::heading(HeadingStyle::Level(1), &chapter.title)];
        blocks.extend(translate(&chapter.content).into_iter().map(body_block));
        blocks.push(FlowBlock::PageBreak);
        doc.push(PartKind::Chapter(index), blocks);
    }

    doc.push(
        PartKind::ValueStackHeading,
        vec![
            FlowBlock::centered_heading(HeadingStyle::Level(1), VALUE_STACK_HEADING),
            FlowBlock::PageBreak,
        ],
    );

    let stack = &asset.value_stack;
    let workbook = &stack.workbook;
    let mut blocks = vec![FlowBlock::heading(
        HeadingStyle::Level(2),
        format!("Workbook: {}", workbook.title),
    )];
    if !workbook.description.is_empty() {
        blocks.push(FlowBlock::paragraph(&workbook.description));
    }
    blocks.push(FlowBlock::paragraph(format!("Valued at: {}", workbook.value)));
    blocks.extend(workbook.sections.iter().cloned().map(FlowBlock::Bullet));
    doc.push(PartKind::Workbook, blocks);

    for (index, bonus) in stack.bonuses.iter().enumerate() {
        let mut blocks = Vec::new();
        if index == 0 {
            blocks.push(FlowBlock::heading(HeadingStyle::Level(2), BONUSES_HEADING));
        }
        blocks.push(FlowBlock::heading(
            HeadingStyle::Level(3),
            format!("{} ({})", bonus.title, bonus.value),
        ));
        if !bonus.description.is_empty() {
            blocks.push(FlowBlock::paragraph(&bonus.description));
        }
        doc.push(PartKind::Bonus(index), blocks);
    }

    let oto = &stack.oto;
    let mut blocks = vec![
        FlowBlock::PageBreak,
        FlowBlock::heading(
            HeadingStyle::Level(1),
            format!("One-Time Offer (OTO): {}", oto.title),
        ),
    ];
    if !oto.description.is_empty() {
        blocks.push(FlowBlock::paragraph(&oto.description));
    }
    blocks.push(FlowBlock::paragraph(oto.price_line()));
    blocks.extend(oto.bullets.iter().cloned().map(FlowBlock::Bullet));
    doc.push(PartKind::Oto, blocks);

    log::debug!(
        "Composed flow document with {} parts ({} chapters, {} bonuses)",
        doc.parts.len(),
        asset.chapters.len(),
        stack.bonuses.len()
    );
    doc
}

fn cover_box(asset: &AssetPackage, settings: &DocxSettings) -> FlowBlock {
    let image = asset
        .cover_image
        .as_ref()
        .and_then(|cover| match cover.decode() {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                log::warn!("Cover image could not be decoded, omitting it: {}", e);
                None
            }
        });

    FlowBlock::Image(ImageBox {
        image,
        width_px: settings.cover_width_px,
        height_px: settings.cover_height_px,
    })
}

/// Chapter body blocks: headings shift below the chapter heading (Heading2-6)
fn body_block(block: ContentBlock) -> FlowBlock {
    match block {
        ContentBlock::Heading { level, text } => FlowBlock::Heading {
            style: HeadingStyle::Level(level.clamp(2, 6)),
            text,
            align: Alignment::Left,
        },
        ContentBlock::Bullet { text } => FlowBlock::Bullet(text),
        ContentBlock::Paragraph { text } => FlowBlock::paragraph(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetsprint_ast::{Bonus, Chapter, CoverImage};
    use chrono::{TimeZone, Utc};

    fn asset() -> AssetPackage {
        let created = Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap();
        let mut asset = AssetPackage::new("Keto", created);
        asset.title = "Keto Made Simple".to_string();
        asset.subtitle = "Eat well".to_string();
        asset
    }

    #[test]
    fn test_body_headings_start_at_level_two() {
        assert_eq!(
            body_block(ContentBlock::heading(1, "Top")),
            FlowBlock::heading(HeadingStyle::Level(2), "Top")
        );
        assert_eq!(
            body_block(ContentBlock::heading(4, "Deep")),
            FlowBlock::heading(HeadingStyle::Level(4), "Deep")
        );
    }

    #[test]
    fn test_minimal_part_order() {
        let doc = compose(&asset(), &DocxSettings::default());
        assert_eq!(
            doc.part_kinds(),
            vec![
                PartKind::Cover,
                PartKind::Title,
                PartKind::Subtitle,
                PartKind::ValueStackHeading,
                PartKind::Workbook,
                PartKind::Oto,
            ]
        );
    }

    #[test]
    fn test_dream_outcome_part_only_when_present() {
        let mut asset = asset();
        asset.dream_outcome = "Lose weight".to_string();
        let doc = compose(&asset, &DocxSettings::default());

        let part = doc.part(PartKind::DreamOutcome).unwrap();
        assert_eq!(part.texts(), vec!["Dream Outcome: Lose weight"]);
        // The break moves from the subtitle to the dream outcome
        assert_ne!(
            doc.part(PartKind::Subtitle).unwrap().blocks.last(),
            Some(&FlowBlock::PageBreak)
        );
    }

    #[test]
    fn test_chapter_blocks() {
        let mut asset = asset();
        asset.chapters = vec![Chapter::new("Intro", "## Why\n- **Fast**\nBody")];
        let doc = compose(&asset, &DocxSettings::default());

        let blocks = &doc.part(PartKind::Chapter(0)).unwrap().blocks;
        assert_eq!(
            blocks,
            &vec![
                FlowBlock::heading(HeadingStyle::Level(1), "Intro"),
                FlowBlock::heading(HeadingStyle::Level(2), "Why"),
                FlowBlock::Bullet("Fast".to_string()),
                FlowBlock::paragraph("Body"),
                FlowBlock::PageBreak,
            ]
        );
    }

    #[test]
    fn test_bonus_heading_opens_first_bonus() {
        let mut asset = asset();
        asset.value_stack.bonuses = vec![
            Bonus {
                title: "Checklist".to_string(),
                value: "$27".to_string(),
                ..Default::default()
            },
            Bonus {
                title: "Templates".to_string(),
                value: "$37".to_string(),
                ..Default::default()
            },
        ];
        let doc = compose(&asset, &DocxSettings::default());

        assert_eq!(
            doc.part(PartKind::Bonus(0)).unwrap().texts(),
            vec![BONUSES_HEADING, "Checklist ($27)"]
        );
        assert_eq!(
            doc.part(PartKind::Bonus(1)).unwrap().texts(),
            vec!["Templates ($37)"]
        );
    }

    #[test]
    fn test_undecodable_cover_gives_empty_box() {
        let mut asset = asset();
        asset.replace_cover(Some(CoverImage::from_data_uri("data:image/png;base64,!!!")));
        let doc = compose(&asset, &DocxSettings::default());

        match &doc.part(PartKind::Cover).unwrap().blocks[0] {
            FlowBlock::Image(image_box) => {
                assert!(image_box.image.is_none());
                assert_eq!((image_box.width_px, image_box.height_px), (500, 660));
            }
            other => panic!("Expected image box, got {:?}", other),
        }
    }
}
