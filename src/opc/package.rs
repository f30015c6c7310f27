//! Physical package handling: reading and writing OPC ZIP archives.
//!
//! The whole archive is materialized into a part map so that parts the editor
//! does not understand survive a load-mutate-store cycle verbatim.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use zip::write::{SimpleFileOptions, ZipWriter};

/// An OPC package held fully in memory.
///
/// Part names use forward slashes and no leading slash, exactly as stored in
/// the archive (`word/document.xml`, `_rels/.rels`, ...). A `BTreeMap` keeps
/// entry order deterministic across encode calls.
#[derive(Debug, Clone, Default)]
pub struct OpcPackage {
    parts: BTreeMap<String, Vec<u8>>,
}

impl OpcPackage {
    /// Create an empty package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize a package from archive bytes.
    ///
    /// Fails with [`Error::MalformedPackage`] when the bytes are not a valid
    /// ZIP archive.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::MalformedPackage(format!("not a ZIP archive: {e}")))?;

        let mut parts = BTreeMap::new();
        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| Error::MalformedPackage(format!("unreadable entry: {e}")))?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut content = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut content)?;
            parts.insert(name, content);
        }

        Ok(Self { parts })
    }

    /// Get the binary content of a part by name.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts.get(name).map(|v| v.as_slice())
    }

    /// Check whether a part exists.
    pub fn has_part(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    /// Insert or replace a part.
    pub fn set_part(&mut self, name: impl Into<String>, content: Vec<u8>) {
        self.parts.insert(name.into(), content);
    }

    /// Iterate over all part names.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(|s| s.as_str())
    }

    /// Number of parts in the package.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the package holds no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Ensure `[Content_Types].xml` declares a default content type for the
    /// given file extension.
    ///
    /// Existing declarations are left untouched; a missing one is spliced in
    /// before the closing tag.
    pub fn ensure_default_content_type(&mut self, extension: &str, mime: &str) -> Result<()> {
        let name = super::CONTENT_TYPES_PART;
        let xml = self
            .parts
            .get(name)
            .ok_or_else(|| Error::MalformedPackage(format!("missing {name}")))?;
        let xml = std::str::from_utf8(xml)
            .map_err(|_| Error::MalformedPackage(format!("{name} is not UTF-8")))?;

        let needle = format!("Extension=\"{extension}\"");
        if xml.contains(&needle) {
            return Ok(());
        }

        let close = "</Types>";
        let Some(at) = xml.rfind(close) else {
            return Err(Error::MalformedPackage(format!("{name} has no Types element")));
        };
        let mut updated = String::with_capacity(xml.len() + 96);
        updated.push_str(&xml[..at]);
        updated.push_str(&format!(
            "<Default Extension=\"{extension}\" ContentType=\"{mime}\"/>"
        ));
        updated.push_str(&xml[at..]);
        self.parts.insert(name.to_string(), updated.into_bytes());
        Ok(())
    }

    /// Serialize the package back into archive bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for (name, content) in &self.parts {
            writer
                .start_file(name.as_str(), options)
                .map_err(|e| Error::Io(std::io::Error::other(e)))?;
            writer.write_all(content)?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_package() -> OpcPackage {
        let mut pkg = OpcPackage::new();
        pkg.set_part(
            "[Content_Types].xml",
            br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#.to_vec(),
        );
        pkg.set_part("word/document.xml", b"<w:document/>".to_vec());
        pkg
    }

    #[test]
    fn round_trips_parts() {
        let pkg = sample_package();
        let bytes = pkg.to_bytes().unwrap();
        let reopened = OpcPackage::from_bytes(&bytes).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.part("word/document.xml"), Some(&b"<w:document/>"[..]));
    }

    #[test]
    fn rejects_garbage_bytes() {
        let err = OpcPackage::from_bytes(b"this is not a zip").unwrap_err();
        assert!(matches!(err, Error::MalformedPackage(_)));
    }

    #[test]
    fn content_type_default_added_once() {
        let mut pkg = sample_package();
        pkg.ensure_default_content_type("png", "image/png").unwrap();
        pkg.ensure_default_content_type("png", "image/png").unwrap();
        let xml = String::from_utf8(pkg.part("[Content_Types].xml").unwrap().to_vec()).unwrap();
        assert_eq!(xml.matches("Extension=\"png\"").count(), 1);
        assert!(xml.ends_with("</Types>"));
    }
}
