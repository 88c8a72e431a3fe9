//! Helvetica font metrics and text wrapping
//!
//! Widths are the standard AFM advance widths (units per 1000 em) of
//! Helvetica and Helvetica-Bold for printable ASCII. Text is written with
//! WinAnsiEncoding; characters outside it become `?`.

use serde::Serialize;

use crate::geometry::pt_to_mm;

/// The two standard fonts used by the paginator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    /// PostScript base font name
    pub fn base_name(self) -> &'static [u8] {
        match self {
            Font::Regular => b"Helvetica",
            Font::Bold => b"Helvetica-Bold",
        }
    }

    /// Width of an encoded WinAnsi byte, in 1/1000 em
    pub fn glyph_width(self, byte: u8) -> u16 {
        match byte {
            32..=126 => {
                let table = match self {
                    Font::Regular => &HELVETICA,
                    Font::Bold => &HELVETICA_BOLD,
                };
                table[(byte - 32) as usize]
            }
            0x95 => 350,
            0x96 => 556,
            0x85 | 0x97 => 1000,
            0x91 | 0x92 => match self {
                Font::Regular => 222,
                Font::Bold => 278,
            },
            0x93 | 0x94 => match self {
                Font::Regular => 333,
                Font::Bold => 500,
            },
            _ => 556,
        }
    }

    /// Width of a string in millimetres at the given size
    pub fn text_width_mm(self, text: &str, size_pt: f32) -> f32 {
        let units: u32 = encode_win_ansi(text)
            .into_iter()
            .map(|b| self.glyph_width(b) as u32)
            .sum();
        pt_to_mm(units as f32 * size_pt / 1000.0)
    }
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Encode text as WinAnsi bytes
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\t' => b' ',
        '€' => 0x80,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
        _ => b'?',
    }
}

/// Greedy word wrap to a maximum width in millimetres
///
/// Words wider than the line are broken between characters. Existing line
/// breaks are kept. Empty text yields no lines.
pub fn wrap_text(text: &str, font: Font, size_pt: f32, max_width_mm: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for source_line in text.lines() {
        let mut current = String::new();

        for word in source_line.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if font.text_width_mm(&candidate, size_pt) <= max_width_mm {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if font.text_width_mm(word, size_pt) <= max_width_mm {
                current = word.to_string();
            } else {
                let mut pieces = break_word(word, font, size_pt, max_width_mm);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

fn break_word(word: &str, font: Font, size_pt: f32, max_width_mm: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for c in word.chars() {
        current.push(c);
        if current.chars().count() > 1 && font.text_width_mm(&current, size_pt) > max_width_mm {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}
