//! Output formats and file naming

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Formats the exporters can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Paginated, print-ready PDF
    Pdf,
    /// Flow-layout word-processor document
    Docx,
    /// Plain text
    Txt,
}

impl ExportFormat {
    /// Every format, in export order
    pub const ALL: [ExportFormat; 3] = [Self::Pdf, Self::Docx, Self::Txt];

    /// File name for an asset with the given keyword
    pub fn file_name(self, keyword: &str) -> String {
        let stem = sanitize_keyword(keyword);
        match self {
            Self::Pdf => format!("{}_full_package.pdf", stem),
            Self::Docx => format!("{}_package.docx", stem),
            Self::Txt => format!("{}_package.txt", stem),
        }
    }

    /// File extension without the dot
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" | "text" => Ok(Self::Txt),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

/// Replace every character outside `[A-Za-z0-9]` with `_`
///
/// Operates per character, so multi-byte characters become a single `_`.
pub fn sanitize_keyword(keyword: &str) -> String {
    keyword
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keyword() {
        assert_eq!(sanitize_keyword("Wedding Photography"), "Wedding_Photography");
        assert_eq!(sanitize_keyword("keto/diet: 101!"), "keto_diet__101_");
        assert_eq!(sanitize_keyword("café"), "caf_");
        assert_eq!(sanitize_keyword(""), "");
    }

    #[test]
    fn test_sanitized_output_is_safe() {
        let out = sanitize_keyword("../../etc/passwd \u{0}");
        assert!(out.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            ExportFormat::Pdf.file_name("Keto Diet"),
            "Keto_Diet_full_package.pdf"
        );
        assert_eq!(ExportFormat::Docx.file_name("Keto Diet"), "Keto_Diet_package.docx");
        assert_eq!(ExportFormat::Txt.file_name("Keto Diet"), "Keto_Diet_package.txt");
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Txt);
        assert!("odt".parse::<ExportFormat>().is_err());
    }
}
