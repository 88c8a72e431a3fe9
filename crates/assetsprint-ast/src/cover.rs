//! Cover image handling
//!
//! Cover images travel through the pipeline as data URIs:
//!
//! ```text
//! data:image/png;base64,iVBORw0KGgo...
//! data:image/jpeg;base64,/9j/4AAQSkZJRg...
//! ```
//!
//! The format is recovered with a literal prefix check: anything that does
//! not start with `data:image/png` is treated as JPEG. Only PNG and JPEG are
//! supported. Decoding is deferred until export so that a broken image never
//! prevents the rest of the package from loading.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AstError, Result};

const PNG_PREFIX: &str = "data:image/png";
const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Raster formats a cover image may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Portable Network Graphics
    Png,
    /// JPEG / JFIF
    Jpeg,
}

impl ImageFormat {
    /// File extension used when the image is stored in a package
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }

    /// MIME content type
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    fn signature(self) -> &'static [u8] {
        match self {
            Self::Png => PNG_SIGNATURE,
            Self::Jpeg => JPEG_SIGNATURE,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
        }
    }
}

/// A cover image held as its original data URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    data_uri: String,
}

/// Raw image bytes recovered from a [`CoverImage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Format inferred from the data URI prefix
    pub format: ImageFormat,
    /// Encoded file bytes (PNG or JPEG stream)
    pub data: Vec<u8>,
}

impl CoverImage {
    /// Wrap a data URI. Nothing is validated until [`CoverImage::decode`].
    pub fn from_data_uri(data_uri: impl Into<String>) -> Self {
        Self {
            data_uri: data_uri.into(),
        }
    }

    /// Build a data URI from raw image bytes
    pub fn from_bytes(format: ImageFormat, data: &[u8]) -> Self {
        Self {
            data_uri: format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(data)),
        }
    }

    /// The data URI as received
    pub fn as_data_uri(&self) -> &str {
        &self.data_uri
    }

    /// Format inferred from the literal URI prefix
    pub fn format(&self) -> ImageFormat {
        if self.data_uri.starts_with(PNG_PREFIX) {
            ImageFormat::Png
        } else {
            ImageFormat::Jpeg
        }
    }

    /// Decode the base64 payload and check it against the inferred format
    pub fn decode(&self) -> Result<DecodedImage> {
        let (header, payload) = self
            .data_uri
            .split_once(',')
            .ok_or_else(|| AstError::MalformedDataUri(self.preview()))?;

        if !header.starts_with("data:") || !header.ends_with(";base64") {
            return Err(AstError::MalformedDataUri(self.preview()));
        }

        let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let data = STANDARD.decode(payload.as_bytes())?;

        let format = self.format();
        if !data.starts_with(format.signature()) {
            return Err(AstError::SignatureMismatch(format.label()));
        }

        Ok(DecodedImage { format, data })
    }

    fn preview(&self) -> String {
        self.data_uri.chars().take(32).collect()
    }
}

impl Serialize for CoverImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.data_uri)
    }
}

impl<'de> Deserialize<'de> for CoverImage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from_data_uri)
    }
}

/// Deserialize an optional cover, treating `null` and `""` alike as "no image"
pub fn deserialize_optional_cover<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<CoverImage>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|uri| !uri.trim().is_empty())
        .map(CoverImage::from_data_uri))
}
