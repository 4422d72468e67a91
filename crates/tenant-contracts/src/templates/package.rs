//! Narrow archive capability used by extraction and filling.
//!
//! DOCX files are ZIP archives of XML parts. Everything outside this module
//! sees them only through [`DocumentPackage`], so the codec can change
//! without touching substitution logic.

use super::error::TemplateError;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Archive member holding the visible document body of a DOCX file.
pub const MAIN_DOCUMENT_PART: &str = "word/document.xml";

/// Inflated size cap for a single part when no limit is configured.
pub const DEFAULT_MAX_PART_BYTES: usize = 32 * 1024 * 1024;

/// Named-part access to a container document.
pub trait DocumentPackage {
    fn list_parts(&self) -> Vec<String>;
    fn read_part(&mut self, name: &str) -> Result<Option<Vec<u8>>, TemplateError>;
    fn write_part(&mut self, name: &str, contents: Vec<u8>) -> Result<(), TemplateError>;
}

/// ZIP-backed package over a borrowed input buffer.
///
/// Writes are staged in memory; the input is never modified and
/// [`ZipPackage::into_bytes`] produces a fresh archive.
pub struct ZipPackage<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
    staged: BTreeMap<String, Vec<u8>>,
    max_part_bytes: usize,
}

impl<'a> ZipPackage<'a> {
    pub fn open(bytes: &'a [u8]) -> Result<Self, TemplateError> {
        let archive = ZipArchive::new(Cursor::new(bytes)).map_err(corrupt)?;
        Ok(Self {
            archive,
            staged: BTreeMap::new(),
            max_part_bytes: DEFAULT_MAX_PART_BYTES,
        })
    }

    /// Caps how many inflated bytes [`DocumentPackage::read_part`] accepts per part.
    pub fn with_part_limit(mut self, max_part_bytes: usize) -> Self {
        self.max_part_bytes = max_part_bytes;
        self
    }

    /// Repacks the archive, raw-copying every part that was not rewritten.
    pub fn into_bytes(mut self) -> Result<Vec<u8>, TemplateError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for index in 0..self.archive.len() {
            let entry = self.archive.by_index_raw(index).map_err(corrupt)?;
            let rewritten = self.staged.remove(entry.name());
            match rewritten {
                Some(contents) => {
                    let name = entry.name().to_string();
                    let method = match entry.compression() {
                        CompressionMethod::Stored => CompressionMethod::Stored,
                        _ => CompressionMethod::Deflated,
                    };
                    drop(entry);
                    write_entry(&mut writer, name, method, &contents)?;
                }
                None => writer.raw_copy_file(entry).map_err(corrupt)?,
            }
        }

        for (name, contents) in std::mem::take(&mut self.staged) {
            write_entry(&mut writer, name, CompressionMethod::Deflated, &contents)?;
        }

        let cursor = writer.finish().map_err(corrupt)?;
        Ok(cursor.into_inner())
    }
}

impl DocumentPackage for ZipPackage<'_> {
    fn list_parts(&self) -> Vec<String> {
        let mut parts: Vec<String> = self.archive.file_names().map(str::to_string).collect();
        for name in self.staged.keys() {
            if !parts.contains(name) {
                parts.push(name.clone());
            }
        }
        parts
    }

    fn read_part(&mut self, name: &str) -> Result<Option<Vec<u8>>, TemplateError> {
        if let Some(contents) = self.staged.get(name) {
            return Ok(Some(contents.clone()));
        }

        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(err) => return Err(corrupt(err)),
        };

        let limit = self.max_part_bytes;
        let too_large = || TemplateError::PartTooLarge {
            part: name.to_string(),
            limit,
        };
        if entry.size() > limit as u64 {
            return Err(too_large());
        }

        // The declared size is untrusted; the read itself is bounded.
        let mut contents = Vec::new();
        entry
            .by_ref()
            .take(limit as u64 + 1)
            .read_to_end(&mut contents)
            .map_err(|err| TemplateError::CorruptArchive(format!("{name}: {err}")))?;
        if contents.len() > limit {
            return Err(too_large());
        }
        Ok(Some(contents))
    }

    fn write_part(&mut self, name: &str, contents: Vec<u8>) -> Result<(), TemplateError> {
        self.staged.insert(name.to_string(), contents);
        Ok(())
    }
}

fn write_entry<W: Write + std::io::Seek>(
    writer: &mut ZipWriter<W>,
    name: String,
    method: CompressionMethod,
    contents: &[u8],
) -> Result<(), TemplateError> {
    let options = SimpleFileOptions::default().compression_method(method);
    writer.start_file(name, options).map_err(corrupt)?;
    writer
        .write_all(contents)
        .map_err(|err| TemplateError::CorruptArchive(err.to_string()))
}

fn corrupt(err: ZipError) -> TemplateError {
    TemplateError::CorruptArchive(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive(entries: &[(&str, &[u8], CompressionMethod)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents, method) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default().compression_method(*method))
                .expect("start entry");
            writer.write_all(contents).expect("write entry");
        }
        writer.finish().expect("finish archive").into_inner()
    }

    const CONTENT_TYPES: &[u8] = b"<Types/>";
    const BODY: &[u8] = b"<w:document>{{a}}</w:document>";
    const IMAGE: &[u8] = &[0x89, b'P', b'N', b'G', 0, 1, 2, 3];

    fn sample() -> Vec<u8> {
        archive(&[
            ("[Content_Types].xml", CONTENT_TYPES, CompressionMethod::Deflated),
            (MAIN_DOCUMENT_PART, BODY, CompressionMethod::Deflated),
            ("word/media/image1.png", IMAGE, CompressionMethod::Stored),
        ])
    }

    #[test]
    fn read_part_stops_at_the_part_limit() {
        let bloated = vec![b'a'; 64 * 1024];
        let bytes = archive(&[(MAIN_DOCUMENT_PART, &bloated, CompressionMethod::Deflated)]);
        assert!(bytes.len() < 4 * 1024);

        let mut package = ZipPackage::open(&bytes)
            .expect("opens")
            .with_part_limit(16 * 1024);
        assert_eq!(
            package.read_part(MAIN_DOCUMENT_PART),
            Err(TemplateError::PartTooLarge {
                part: MAIN_DOCUMENT_PART.to_string(),
                limit: 16 * 1024,
            })
        );

        let mut package = ZipPackage::open(&bytes)
            .expect("opens")
            .with_part_limit(64 * 1024);
        assert_eq!(
            package.read_part(MAIN_DOCUMENT_PART).expect("fits"),
            Some(bloated)
        );
    }

    #[test]
    fn lists_parts_in_archive_order() {
        let bytes = sample();
        let package = ZipPackage::open(&bytes).expect("opens");
        assert_eq!(
            package.list_parts(),
            vec!["[Content_Types].xml", MAIN_DOCUMENT_PART, "word/media/image1.png"]
        );
    }

    #[test]
    fn read_part_returns_none_for_missing_members() {
        let bytes = sample();
        let mut package = ZipPackage::open(&bytes).expect("opens");
        assert!(package.read_part("word/missing.xml").expect("read").is_none());
        assert_eq!(
            package.read_part(MAIN_DOCUMENT_PART).expect("read"),
            Some(BODY.to_vec())
        );
    }

    #[test]
    fn repack_replaces_written_part_and_keeps_the_rest() {
        let bytes = sample();
        let mut package = ZipPackage::open(&bytes).expect("opens");
        package
            .write_part(MAIN_DOCUMENT_PART, b"<w:document>A</w:document>".to_vec())
            .expect("write");
        let repacked = package.into_bytes().expect("repacks");

        let mut reopened = ZipPackage::open(&repacked).expect("reopens");
        assert_eq!(
            reopened.list_parts(),
            vec!["[Content_Types].xml", MAIN_DOCUMENT_PART, "word/media/image1.png"]
        );
        assert_eq!(
            reopened.read_part(MAIN_DOCUMENT_PART).expect("read"),
            Some(b"<w:document>A</w:document>".to_vec())
        );
        assert_eq!(
            reopened.read_part("word/media/image1.png").expect("read"),
            Some(IMAGE.to_vec())
        );
    }

    #[test]
    fn new_parts_are_appended() {
        let bytes = sample();
        let mut package = ZipPackage::open(&bytes).expect("opens");
        package
            .write_part("word/comments.xml", b"<w:comments/>".to_vec())
            .expect("write");
        assert_eq!(package.list_parts().len(), 4);

        let repacked = package.into_bytes().expect("repacks");
        let reopened = ZipPackage::open(&repacked).expect("reopens");
        assert_eq!(reopened.list_parts().last().map(String::as_str), Some("word/comments.xml"));
    }

    #[test]
    fn rejects_non_zip_input() {
        let result = ZipPackage::open(b"definitely not a zip archive");
        assert!(matches!(result, Err(TemplateError::CorruptArchive(_))));
    }
}
