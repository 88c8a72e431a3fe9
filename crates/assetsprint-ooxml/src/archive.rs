//! Archive handling for DOCX packages
//!
//! A DOCX file is a ZIP archive of XML parts and media. The package is only
//! ever written; reading back is limited to unit tests.

use std::collections::HashMap;
use std::io::{Cursor, Seek, Write};

use zip::write::ZipWriter;
use zip::CompressionMethod;

use crate::error::Result;

/// An in-memory OOXML package
#[derive(Debug, Default)]
pub struct OoxmlArchive {
    /// All parts in the package, keyed by path
    files: HashMap<String, Vec<u8>>,
}

impl OoxmlArchive {
    /// Create an empty package
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or update a part's contents
    pub fn set(&mut self, path: impl Into<String>, contents: Vec<u8>) {
        self.files.insert(path.into(), contents);
    }

    /// Set a part's contents from a string
    pub fn set_string(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into().into_bytes());
    }

    /// Write the package to any writer
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        // [Content_Types].xml first, then sorted for deterministic output
        let mut paths: Vec<_> = self.files.keys().collect();
        paths.sort_by_key(|p| (p.as_str() != "[Content_Types].xml", p.as_str()));

        for path in paths {
            zip.start_file(path.as_str(), options)?;
            zip.write_all(&self.files[path])?;
        }

        zip.finish()?;
        Ok(())
    }

    /// Write the package to a byte vector
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_to(&mut buffer)?;
        Ok(buffer.into_inner())
    }
}

#[cfg(test)]
impl OoxmlArchive {
    /// Unpack from bytes
    pub(crate) fn from_bytes(bytes: &[u8]) -> Result<Self> {
        use std::io::Read;

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        let mut files = HashMap::new();
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            files.insert(file.name().to_string(), contents);
        }
        Ok(Self { files })
    }

    pub(crate) fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(|v| v.as_slice())
    }

    pub(crate) fn get_string(&self, path: &str) -> Option<String> {
        self.get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// All part paths, sorted
    pub(crate) fn file_list(&self) -> Vec<&str> {
        let mut paths: Vec<_> = self.files.keys().map(|s| s.as_str()).collect();
        paths.sort_unstable();
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::ZipArchive;

    #[test]
    fn test_file_operations() {
        let mut archive = OoxmlArchive::new();

        archive.set_string("test.xml", "<root/>");
        archive.set_string("test.xml", "<replaced/>");
        assert_eq!(archive.get_string("test.xml"), Some("<replaced/>".to_string()));
        assert!(archive.get("missing.xml").is_none());
    }

    #[test]
    fn test_roundtrip_through_zip() {
        let mut archive = OoxmlArchive::new();
        archive.set_string("word/document.xml", "<w:document/>");
        archive.set_string("[Content_Types].xml", "<Types/>");
        archive.set("word/media/cover.png", vec![1, 2, 3]);

        let bytes = archive.to_bytes().unwrap();
        let restored = OoxmlArchive::from_bytes(&bytes).unwrap();

        assert_eq!(
            restored.file_list(),
            vec!["[Content_Types].xml", "word/document.xml", "word/media/cover.png"]
        );
        assert_eq!(restored.get("word/media/cover.png"), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn test_output_is_deterministic() {
        let mut archive = OoxmlArchive::new();
        archive.set_string("b.xml", "<b/>");
        archive.set_string("a.xml", "<a/>");
        assert_eq!(archive.to_bytes().unwrap(), archive.to_bytes().unwrap());
    }

    #[test]
    fn test_content_types_written_first() {
        let mut archive = OoxmlArchive::new();
        archive.set_string("_rels/.rels", "<Relationships/>");
        archive.set_string("[Content_Types].xml", "<Types/>");

        let bytes = archive.to_bytes().unwrap();
        let mut zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(zip.by_index(0).unwrap().name(), "[Content_Types].xml");
    }
}
