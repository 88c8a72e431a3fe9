//! PDF output
//!
//! Writes a computed [`Layout`] with pdf-writer. Text uses the two standard
//! Helvetica fonts with WinAnsi encoding, so no font program is embedded.
//! Page content streams and the cover raster are flate-compressed.

use std::io::Write;

use assetsprint_ast::{DecodedImage, ImageFormat};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::error::Result;
use crate::geometry::mm_to_pt;
use crate::layout::{DrawOp, Layout, Page, Rgb};
use crate::metrics::{encode_win_ansi, Font};

const REGULAR_FONT: Name<'static> = Name(b"F1");
const BOLD_FONT: Name<'static> = Name(b"F2");
const COVER_IMAGE: Name<'static> = Name(b"Im1");
const OVERLAY_STATE: Name<'static> = Name(b"GS1");

/// Opacity of the black overlay drawn over a cover image
const OVERLAY_ALPHA: f32 = 0.5;

/// Objects a cover page refers to
struct CoverResources {
    image: Ref,
    overlay: Ref,
}

/// Render a layout to PDF bytes
pub fn render(layout: &Layout) -> Result<Vec<u8>> {
    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let page_tree_id = alloc.bump();
    let regular_id = alloc.bump();
    let bold_id = alloc.bump();
    let info_id = alloc.bump();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    for (id, font) in [(regular_id, Font::Regular), (bold_id, Font::Bold)] {
        pdf.type1_font(id)
            .base_font(Name(font.base_name()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }
    pdf.document_info(info_id)
        .title(TextStr(&layout.title))
        .producer(TextStr(concat!("assetsprint ", env!("CARGO_PKG_VERSION"))));

    let (width_pt, height_pt) = (
        mm_to_pt(layout.geometry.width_mm),
        mm_to_pt(layout.geometry.height_mm),
    );

    let mut page_ids = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let page_id = alloc.bump();
        let content_id = alloc.bump();
        page_ids.push(page_id);

        let cover = embed_cover(&mut pdf, &mut alloc, page)?;
        let content = PageCanvas::new(layout, cover.is_some()).draw(page);
        let compressed = deflate(&content)?;
        pdf.stream(content_id, &compressed)
            .filter(Filter::FlateDecode);

        let mut page_writer = pdf.page(page_id);
        page_writer
            .media_box(Rect::new(0.0, 0.0, width_pt, height_pt))
            .parent(page_tree_id)
            .contents(content_id);
        let mut resources = page_writer.resources();
        resources
            .fonts()
            .pair(REGULAR_FONT, regular_id)
            .pair(BOLD_FONT, bold_id);
        if let Some(cover) = &cover {
            resources.x_objects().pair(COVER_IMAGE, cover.image);
            resources.ext_g_states().pair(OVERLAY_STATE, cover.overlay);
        }
        resources.finish();
        page_writer.finish();
    }

    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    log::debug!("Rendered {} PDF pages", page_ids.len());
    Ok(pdf.finish())
}

/// Write the cover raster and overlay state if the page shows a decodable image
fn embed_cover(pdf: &mut Pdf, alloc: &mut Ref, page: &Page) -> Result<Option<CoverResources>> {
    let Some(cover) = page.ops.iter().find_map(|op| match op {
        DrawOp::CoverArt {
            image: Some(cover), ..
        } => Some(cover),
        _ => None,
    }) else {
        return Ok(None);
    };

    let (width, height, pixels) = match decode_rgb(cover) {
        Ok(decoded) => decoded,
        Err(e) => {
            log::warn!("Cover image pixels could not be decoded, using plain cover: {}", e);
            return Ok(None);
        }
    };

    let image_id = alloc.bump();
    let overlay_id = alloc.bump();

    let compressed = deflate(&pixels)?;
    let mut xobject = pdf.image_xobject(image_id, &compressed);
    xobject.filter(Filter::FlateDecode);
    xobject.width(width as i32);
    xobject.height(height as i32);
    xobject.color_space().device_rgb();
    xobject.bits_per_component(8);
    xobject.finish();

    pdf.ext_graphics(overlay_id).non_stroking_alpha(OVERLAY_ALPHA);

    Ok(Some(CoverResources {
        image: image_id,
        overlay: overlay_id,
    }))
}

/// Decode an encoded cover to raw RGB8 samples
fn decode_rgb(cover: &DecodedImage) -> std::result::Result<(u32, u32, Vec<u8>), image::ImageError> {
    let format = match cover.format {
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
    };
    let rgb = image::load_from_memory_with_format(&cover.data, format)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok((width, height, rgb.into_raw()))
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Content stream builder for one page, converting millimetres to points
struct PageCanvas {
    content: Content,
    width_pt: f32,
    height_mm: f32,
    has_image: bool,
}

impl PageCanvas {
    fn new(layout: &Layout, has_image: bool) -> Self {
        Self {
            content: Content::new(),
            width_pt: mm_to_pt(layout.geometry.width_mm),
            height_mm: layout.geometry.height_mm,
            has_image,
        }
    }

    fn draw(mut self, page: &Page) -> Vec<u8> {
        for op in &page.ops {
            match op {
                DrawOp::CoverArt { fallback, .. } => self.cover_art(*fallback),
                DrawOp::Text {
                    x,
                    y,
                    text,
                    font,
                    size_pt,
                    color,
                } => self.text(*x, *y, text, *font, *size_pt, *color),
                DrawOp::Line {
                    from,
                    to,
                    width,
                    color,
                } => self.line(*from, *to, *width, *color),
                DrawOp::Frame {
                    x,
                    y,
                    width,
                    height,
                    line_width,
                    color,
                } => self.frame(*x, *y, *width, *height, *line_width, *color),
            }
        }
        self.content.finish()
    }

    fn cover_art(&mut self, fallback: Rgb) {
        let (w, h) = (self.width_pt, mm_to_pt(self.height_mm));

        if self.has_image {
            self.content.save_state();
            self.content.transform([w, 0.0, 0.0, h, 0.0, 0.0]);
            self.content.x_object(COVER_IMAGE);
            self.content.restore_state();

            self.content.save_state();
            self.content.set_parameters(OVERLAY_STATE);
            self.content.set_fill_rgb(0.0, 0.0, 0.0);
            self.content.rect(0.0, 0.0, w, h);
            self.content.fill_nonzero();
            self.content.restore_state();
        } else {
            let (r, g, b) = fallback.to_unit();
            self.content.set_fill_rgb(r, g, b);
            self.content.rect(0.0, 0.0, w, h);
            self.content.fill_nonzero();
        }
    }

    fn text(&mut self, x: f32, y: f32, text: &str, font: Font, size_pt: f32, color: Rgb) {
        let name = match font {
            Font::Regular => REGULAR_FONT,
            Font::Bold => BOLD_FONT,
        };
        let (r, g, b) = color.to_unit();
        let encoded = encode_win_ansi(text);

        self.content.set_fill_rgb(r, g, b);
        self.content.begin_text();
        self.content.set_font(name, size_pt);
        self.content.next_line(mm_to_pt(x), self.flip(y));
        self.content.show(Str(&encoded));
        self.content.end_text();
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb) {
        let (r, g, b) = color.to_unit();
        self.content.set_stroke_rgb(r, g, b);
        self.content.set_line_width(mm_to_pt(width));
        self.content.move_to(mm_to_pt(from.0), self.flip(from.1));
        self.content.line_to(mm_to_pt(to.0), self.flip(to.1));
        self.content.stroke();
    }

    fn frame(&mut self, x: f32, y: f32, width: f32, height: f32, line_width: f32, color: Rgb) {
        let (r, g, b) = color.to_unit();
        self.content.set_stroke_rgb(r, g, b);
        self.content.set_line_width(mm_to_pt(line_width));
        self.content.rect(
            mm_to_pt(x),
            self.flip(y + height),
            mm_to_pt(width),
            mm_to_pt(height),
        );
        self.content.stroke();
    }

    /// Top-left millimetres to bottom-left points
    fn flip(&self, y: f32) -> f32 {
        mm_to_pt(self.height_mm - y)
    }
}
