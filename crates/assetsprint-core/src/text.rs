//! Plain-text export
//!
//! The simplest deliverable: title, subtitle, then every chapter heading
//! followed by its raw markup body, chapters separated by blank lines.

use std::fmt::Write;

use assetsprint_ast::AssetPackage;

/// Render an asset as plain text
pub fn render(asset: &AssetPackage) -> String {
    let mut output = String::new();

    writeln!(output, "{}", asset.title).unwrap();
    writeln!(output, "{}", asset.subtitle).unwrap();

    for chapter in &asset.chapters {
        writeln!(output).unwrap();
        writeln!(output, "{}", chapter.title).unwrap();
        let body = chapter.content.trim_end();
        if !body.is_empty() {
            writeln!(output, "{}", body).unwrap();
        }
    }

    log::debug!(
        "Rendered {} chapters as plain text ({} bytes)",
        asset.chapters.len(),
        output.len()
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetsprint_ast::Chapter;
    use chrono::{TimeZone, Utc};

    fn asset() -> AssetPackage {
        let created = Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap();
        let mut asset = AssetPackage::new("Keto", created);
        asset.title = "Keto Made Simple".to_string();
        asset.subtitle = "Eat well".to_string();
        asset
    }

    #[test]
    fn test_title_and_subtitle_only() {
        assert_eq!(render(&asset()), "Keto Made Simple\nEat well\n");
    }

    #[test]
    fn test_chapters_separated_by_blank_lines() {
        let mut asset = asset();
        asset.chapters = vec![
            Chapter::new("Intro", "## Why\n- **Fast**"),
            Chapter::new("Meals", "Eggs.\n"),
        ];

        let text = render(&asset);
        assert_eq!(
            text,
            "Keto Made Simple\nEat well\n\nIntro\n## Why\n- **Fast**\n\nMeals\nEggs.\n"
        );
    }

    #[test]
    fn test_empty_chapter_body() {
        let mut asset = asset();
        asset.chapters = vec![Chapter::new("Empty", "")];
        assert!(render(&asset).ends_with("\n\nEmpty\n"));
    }
}
