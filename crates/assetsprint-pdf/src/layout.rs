//! Fixed-page layout
//!
//! [`paginate`] walks the asset top to bottom with a vertical cursor and
//! produces a [`Layout`]: a list of pages, each a list of [`DrawOp`]s in
//! millimetres from the top-left corner. Page breaks are decided here and
//! nowhere else, so the page count and the lines on each page are known
//! before any PDF object is written.
//!
//! Page sequence:
//!
//! - page 1: the cover, unnumbered and undecorated
//! - one page per chapter, plus continuation pages when a chapter overflows
//! - the value stack, plus continuation pages
//!
//! Every content page carries a running header (title, rule) and a centred
//! `Page N` footer; numbering starts at 2. Before each wrapped line the
//! cursor is checked against [`PageGeometry::break_threshold`] and a new
//! decorated page is started at [`RESUME_Y`] when it has passed it.

use assetsprint_ast::{AssetPackage, ContentBlock, DecodedImage};
use assetsprint_core::markup::translate;
use serde::Serialize;

use crate::geometry::{pt_to_mm, PageGeometry};
use crate::metrics::{wrap_text, Font};

/// Baseline of the running header text
pub const HEADER_Y: f32 = 15.0;
/// Position of the header rule
pub const RULE_Y: f32 = 18.0;
/// Distance of the footer baseline from the bottom edge
pub const FOOTER_OFFSET: f32 = 10.0;
/// Baseline of a chapter title
pub const CHAPTER_TITLE_Y: f32 = 40.0;
/// Cursor position on a continuation page
pub const RESUME_Y: f32 = 30.0;
/// Characters of the title shown in the running header
pub const HEADER_TITLE_CHARS: usize = 50;
/// First number given to a content page
pub const FIRST_PAGE_NUMBER: u32 = 2;

/// Cover background when there is no usable image
pub const COVER_FALLBACK: Rgb = Rgb(23, 32, 51);

const WHITE: Rgb = Rgb(255, 255, 255);
const BLACK: Rgb = Rgb(0, 0, 0);
const BODY: Rgb = Rgb(40, 40, 40);
const DECORATION_TEXT: Rgb = Rgb(150, 150, 150);
const DECORATION_RULE: Rgb = Rgb(200, 200, 200);
const CALLOUT: Rgb = Rgb(99, 102, 241);

const TITLE_PITCH: f32 = 10.0;
const BULLET_INDENT: f32 = 5.0;
const CALLOUT_MIN_HEIGHT: f32 = 60.0;

/// An sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Components scaled to 0.0..=1.0
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

/// A computed layout
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub geometry: PageGeometry,
    /// Document title, for PDF metadata
    pub title: String,
    pub pages: Vec<Page>,
}

/// One page of a layout
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub kind: PageKind,
    /// Footer number; `None` for the cover
    pub number: Option<u32>,
    pub ops: Vec<DrawOp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Cover,
    Content,
}

/// A positioned drawing operation; coordinates in millimetres, y downwards
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Full-bleed cover art: the image under a 50% black overlay, or the
    /// fallback colour when there is no image or it cannot be drawn
    CoverArt {
        image: Option<DecodedImage>,
        fallback: Rgb,
    },
    /// A single line of text; `y` is the baseline
    Text {
        x: f32,
        y: f32,
        text: String,
        font: Font,
        size_pt: f32,
        color: Rgb,
    },
    /// A straight line
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Rgb,
    },
    /// A stroked, unfilled rectangle; (x, y) is the top-left corner
    Frame {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        line_width: f32,
        color: Rgb,
    },
}

/// Per-page summary of a layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSummary<'a> {
    pub index: usize,
    pub kind: PageKind,
    pub number: Option<u32>,
    pub lines: Vec<&'a str>,
}

impl Layout {
    /// Number of pages
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Pages with their text lines, in order
    pub fn summary(&self) -> Vec<PageSummary<'_>> {
        self.pages
            .iter()
            .enumerate()
            .map(|(index, page)| PageSummary {
                index,
                kind: page.kind,
                number: page.number,
                lines: page.lines(),
            })
            .collect()
    }
}

impl Page {
    /// Text of every text op, in drawing order
    pub fn lines(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Text lines excluding the running header and footer
    pub fn body_lines(&self) -> Vec<&str> {
        let lines = self.lines();
        match self.kind {
            PageKind::Cover => lines,
            // Header first, footer second
            PageKind::Content => lines.into_iter().skip(2).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    font: Font,
    size_pt: f32,
    color: Rgb,
}

impl TextStyle {
    const fn new(font: Font, size_pt: f32, color: Rgb) -> Self {
        Self {
            font,
            size_pt,
            color,
        }
    }
}

const COVER_TITLE: TextStyle = TextStyle::new(Font::Bold, 32.0, WHITE);
const COVER_SUBTITLE: TextStyle = TextStyle::new(Font::Regular, 16.0, WHITE);
const DECORATION: TextStyle = TextStyle::new(Font::Regular, 9.0, DECORATION_TEXT);
const CHAPTER_TITLE: TextStyle = TextStyle::new(Font::Bold, 22.0, BLACK);
const BODY_TEXT: TextStyle = TextStyle::new(Font::Regular, 11.0, BODY);
const BODY_HEADING: TextStyle = TextStyle::new(Font::Bold, 11.0, BLACK);
const STACK_TITLE: TextStyle = TextStyle::new(Font::Bold, 24.0, BLACK);
const STACK_HEADING: TextStyle = TextStyle::new(Font::Bold, 16.0, BLACK);
const STACK_TEXT: TextStyle = TextStyle::new(Font::Regular, 12.0, BLACK);
const STACK_EMPHASIS: TextStyle = TextStyle::new(Font::Bold, 12.0, BLACK);
const BONUS_TEXT: TextStyle = TextStyle::new(Font::Regular, 10.0, BLACK);
const OTO_TITLE: TextStyle = TextStyle::new(Font::Bold, 14.0, BLACK);

/// Lay out an asset on fixed pages
pub fn paginate(asset: &AssetPackage, geometry: &PageGeometry) -> Layout {
    let mut paginator = Paginator::new(*geometry, &asset.title);

    paginator.cover(asset);
    for chapter in &asset.chapters {
        paginator.chapter(&chapter.title, &chapter.content);
    }
    paginator.value_stack(asset);

    log::debug!(
        "Paginated '{}' into {} pages ({} chapters)",
        asset.title,
        paginator.pages.len(),
        asset.chapters.len()
    );

    Layout {
        geometry: *geometry,
        title: asset.title.clone(),
        pages: paginator.pages,
    }
}

struct Paginator {
    geometry: PageGeometry,
    header_title: String,
    pages: Vec<Page>,
    cursor: f32,
    next_number: u32,
}

impl Paginator {
    fn new(geometry: PageGeometry, title: &str) -> Self {
        Self {
            geometry,
            header_title: title.chars().take(HEADER_TITLE_CHARS).collect(),
            pages: Vec::new(),
            cursor: RESUME_Y,
            next_number: FIRST_PAGE_NUMBER,
        }
    }

    fn cover(&mut self, asset: &AssetPackage) {
        let image = asset
            .cover_image
            .as_ref()
            .and_then(|cover| match cover.decode() {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    log::warn!("Cover image could not be decoded, using plain cover: {}", e);
                    None
                }
            });

        self.pages.push(Page {
            kind: PageKind::Cover,
            number: None,
            ops: vec![DrawOp::CoverArt {
                image,
                fallback: COVER_FALLBACK,
            }],
        });

        let g = self.geometry;
        let width = g.width_mm - 40.0;
        self.centered_block(&asset.title, COVER_TITLE, g.height_mm / 2.0 - 20.0, width);
        self.centered_block(&asset.subtitle, COVER_SUBTITLE, g.height_mm / 2.0 + 20.0, width);
    }

    /// Wrapped lines centred on the page, first baseline at `y`
    fn centered_block(&mut self, text: &str, style: TextStyle, y: f32, width: f32) {
        let line_height = pt_to_mm(style.size_pt * 1.15);
        let center = self.geometry.center_x();

        for (i, line) in wrap_text(text, style.font, style.size_pt, width)
            .into_iter()
            .enumerate()
        {
            let x = center - style.font.text_width_mm(&line, style.size_pt) / 2.0;
            self.text(x, y + i as f32 * line_height, line, style);
        }
    }

    fn chapter(&mut self, title: &str, content: &str) {
        let g = self.geometry;
        self.new_content_page();
        self.cursor = CHAPTER_TITLE_Y;

        self.flow(title, CHAPTER_TITLE, g.margin_mm, g.content_width(), TITLE_PITCH);
        self.cursor += 5.0;

        for block in translate(content) {
            match block {
                ContentBlock::Heading { text, .. } => {
                    self.flow(&text, BODY_HEADING, g.margin_mm, g.content_width(), g.line_pitch_mm);
                }
                ContentBlock::Paragraph { text } => {
                    self.flow(&text, BODY_TEXT, g.margin_mm, g.content_width(), g.line_pitch_mm);
                }
                ContentBlock::Bullet { text } => self.bullet(&text),
            }
        }
    }

    fn bullet(&mut self, text: &str) {
        let g = self.geometry;
        let x = g.margin_mm + BULLET_INDENT;
        let width = g.content_width() - BULLET_INDENT;

        let lines = wrap_text(text, BODY_TEXT.font, BODY_TEXT.size_pt, width);
        for (i, line) in lines.into_iter().enumerate() {
            if i == 0 {
                self.ensure_room();
                self.text(g.margin_mm, self.cursor, "•".to_string(), BODY_TEXT);
            }
            self.flow_line(x, line, BODY_TEXT, g.line_pitch_mm);
        }
    }

    fn value_stack(&mut self, asset: &AssetPackage) {
        let g = self.geometry;
        let margin = g.margin_mm;
        let width = g.content_width();
        let stack = &asset.value_stack;

        self.new_content_page();
        self.text(margin, CHAPTER_TITLE_Y, "The Value Stack".to_string(), STACK_TITLE);
        self.cursor = CHAPTER_TITLE_Y + 20.0;

        let workbook = &stack.workbook;
        self.flow(
            &format!("Workbook: {}", workbook.title),
            STACK_HEADING,
            margin,
            width,
            10.0,
        );
        self.flow(&workbook.description, STACK_TEXT, margin, width, g.line_pitch_mm);
        self.cursor += 9.0;
        self.flow(
            &format!("Valued at: {}", workbook.value),
            STACK_EMPHASIS,
            margin,
            width,
            15.0,
        );

        self.flow("Bonuses:", STACK_HEADING, margin, width, 10.0);
        for bonus in &stack.bonuses {
            self.flow(
                &format!("• {} ({})", bonus.title, bonus.value),
                STACK_EMPHASIS,
                margin + 5.0,
                width - 5.0,
                7.0,
            );
            self.flow(&bonus.description, BONUS_TEXT, margin + 10.0, width - 10.0, 5.0);
            self.cursor += 5.0;
        }

        self.oto_callout(asset);
    }

    fn oto_callout(&mut self, asset: &AssetPackage) {
        let g = self.geometry;
        let oto = &asset.value_stack.oto;
        let pitch = g.line_pitch_mm;
        let inner_x = g.margin_mm + 5.0;
        let inner_width = g.content_width() - 10.0;

        let title_lines = wrap_text(
            &format!("OTO: {}", oto.title),
            OTO_TITLE.font,
            OTO_TITLE.size_pt,
            inner_width,
        );
        let description_lines =
            wrap_text(&oto.description, STACK_TEXT.font, STACK_TEXT.size_pt, inner_width);

        let extra = title_lines.len().saturating_sub(1) as f32 * pitch;
        let needed = CALLOUT_MIN_HEIGHT
            .max(38.0 + extra + description_lines.len().saturating_sub(1) as f32 * pitch);
        let page_bottom = g.height_mm - g.margin_mm;

        self.cursor += 10.0;
        if self.cursor + needed.min(page_bottom - RESUME_Y) > page_bottom {
            self.new_content_page();
        }

        let top = self.cursor;
        self.push(DrawOp::Frame {
            x: g.margin_mm,
            y: top,
            width: g.content_width(),
            height: needed.min(page_bottom - top),
            line_width: 1.0,
            color: CALLOUT,
        });

        for (i, line) in title_lines.into_iter().enumerate() {
            self.text(inner_x, top + 10.0 + i as f32 * pitch, line, OTO_TITLE);
        }
        self.text(inner_x, top + 20.0 + extra, oto.price_line(), STACK_EMPHASIS);

        self.cursor = top + 30.0 + extra;
        for line in description_lines {
            self.flow_line(inner_x, line, STACK_TEXT, pitch);
        }
    }

    /// Wrap and draw text at the cursor, one `advance` per line
    fn flow(&mut self, text: &str, style: TextStyle, x: f32, width: f32, advance: f32) {
        for line in wrap_text(text, style.font, style.size_pt, width) {
            self.flow_line(x, line, style, advance);
        }
    }

    /// Draw one line at the cursor, breaking the page first if needed
    fn flow_line(&mut self, x: f32, line: String, style: TextStyle, advance: f32) {
        self.ensure_room();
        self.text(x, self.cursor, line, style);
        self.cursor += advance;
    }

    fn ensure_room(&mut self) {
        if self.cursor > self.geometry.break_threshold() {
            self.new_content_page();
        }
    }

    fn new_content_page(&mut self) {
        let g = self.geometry;
        let number = self.next_number;
        self.next_number += 1;

        self.pages.push(Page {
            kind: PageKind::Content,
            number: Some(number),
            ops: Vec::new(),
        });

        self.text(g.margin_mm, HEADER_Y, self.header_title.clone(), DECORATION);
        let footer = format!("Page {}", number);
        let footer_x = g.center_x() - DECORATION.font.text_width_mm(&footer, DECORATION.size_pt) / 2.0;
        self.text(footer_x, g.height_mm - FOOTER_OFFSET, footer, DECORATION);
        self.push(DrawOp::Line {
            from: (g.margin_mm, RULE_Y),
            to: (g.width_mm - g.margin_mm, RULE_Y),
            width: 0.1,
            color: DECORATION_RULE,
        });

        self.cursor = RESUME_Y;
    }

    fn text(&mut self, x: f32, y: f32, text: String, style: TextStyle) {
        self.push(DrawOp::Text {
            x,
            y,
            text,
            font: style.font,
            size_pt: style.size_pt,
            color: style.color,
        });
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }
}
