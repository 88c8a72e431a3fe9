//! Chapter markup translator
//!
//! Chapter bodies arrive as a light, line-oriented markup:
//!
//! - `## Heading` (one to six `#` followed by whitespace)
//! - `- bullet` or `* bullet`
//! - anything else is a paragraph
//!
//! Generated chapters mostly use `## `, but any run of one to six `#` is
//! read as a heading of that level rather than falling through to a
//! paragraph. The DOCX composer shifts these below the chapter heading.
//!
//! Each line is trimmed first and empty lines are dropped. Literal `**`
//! emphasis markers are removed from every block, so the same markup
//! renders identically in every exporter. There is no nesting and no
//! inline formatting.

use std::sync::OnceLock;

use assetsprint_ast::ContentBlock;
use regex::Regex;

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("valid heading regex"))
}

fn bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-*]\s+(.*)$").expect("valid bullet regex"))
}

/// Translate chapter markup into a flat list of blocks
///
/// Pure and order-preserving: the nth block comes from the nth non-empty
/// line. Blank input yields no blocks.
pub fn translate(text: &str) -> Vec<ContentBlock> {
    // Normalize line endings
    let text = text.replace("\r\n", "\n");

    text.lines().filter_map(translate_line).collect()
}

/// Translate a single line, `None` for blank lines
pub fn translate_line(line: &str) -> Option<ContentBlock> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(caps) = heading_re().captures(line) {
        let level = caps[1].len() as u8;
        return Some(ContentBlock::heading(level, strip_emphasis(&caps[2])));
    }

    if let Some(caps) = bullet_re().captures(line) {
        return Some(ContentBlock::bullet(strip_emphasis(&caps[1])));
    }

    Some(ContentBlock::paragraph(strip_emphasis(line)))
}

/// Remove literal `**` emphasis markers
pub fn strip_emphasis(text: &str) -> String {
    text.replace("**", "")
}
