//! Bidirectional codec between package bytes and the document tree.

use super::document::Document;
use super::paragraph::RunContent;
use super::section::Section;
use super::styles::StyleSheet;
use super::template;
use super::{parse, write};
use crate::error::{Error, Result};
use crate::opc::{
    DOCUMENT_PART, DOCUMENT_RELS_PART, OpcPackage, REL_TYPE_IMAGE, Relationships, STYLES_PART,
};

/// Decoder/encoder for the .docx container.
///
/// Stateless; both directions borrow everything they need from the package or
/// the tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxCodec;

impl DocxCodec {
    pub fn new() -> Self {
        Self
    }

    /// Decode package bytes into a document tree.
    ///
    /// The main document part is required; a missing stylesheet or
    /// relationships part degrades to an empty one so documents produced by
    /// minimal writers still open.
    pub fn decode(&self, bytes: &[u8]) -> Result<Document> {
        let package = OpcPackage::from_bytes(bytes)?;

        let document_xml = package
            .part(DOCUMENT_PART)
            .ok_or_else(|| Error::MalformedPackage(format!("missing {DOCUMENT_PART}")))?
            .to_vec();

        let rels = match package.part(DOCUMENT_RELS_PART) {
            Some(xml) => Relationships::parse(xml)?,
            None => Relationships::new(),
        };

        let styles = match package.part(STYLES_PART) {
            Some(xml) => StyleSheet::parse(xml)?,
            None => StyleSheet::new(),
        };

        let (blocks, final_section) = parse::parse_document(&document_xml, &rels, &package)?;
        Ok(Document::from_parts(blocks, final_section, styles, package))
    }

    /// Encode a document tree back into package bytes.
    ///
    /// Takes the document mutably: images added since decode get their media
    /// part and relationship allocated here, and the assigned IDs are written
    /// back into the tree before the body is serialized.
    pub fn encode(&self, document: &mut Document) -> Result<Vec<u8>> {
        let mut package = document.package.clone();

        let mut rels = match package.part(DOCUMENT_RELS_PART) {
            Some(xml) => Relationships::parse(xml)?,
            None => Relationships::new(),
        };

        self.anchor_images(document, &mut package, &mut rels)?;

        let body_xml = write::write_document(&document.blocks, &document.final_section)?;
        package.set_part(DOCUMENT_PART, body_xml.into_bytes());
        package.set_part(DOCUMENT_RELS_PART, rels.to_xml()?.into_bytes());

        package.to_bytes()
    }

    /// Write every inline image into the package.
    ///
    /// An image that already carries a relationship overwrites its existing
    /// media part in place. A new image gets the next free `media/imageN`
    /// part, a fresh relationship, and a content-type default.
    fn anchor_images(
        &self,
        document: &mut Document,
        package: &mut OpcPackage,
        rels: &mut Relationships,
    ) -> Result<()> {
        for block in &mut document.blocks {
            let super::document::Block::Paragraph(para) = block else {
                continue;
            };
            for run in &mut para.runs {
                let RunContent::Image(img) = &mut run.content else {
                    continue;
                };

                let part_name = match &img.rel_id {
                    Some(id) => {
                        let rel = rels.get(id).ok_or_else(|| {
                            Error::MalformedPackage(format!("dangling image relationship {id}"))
                        })?;
                        format!("word/{}", rel.target.trim_start_matches('/'))
                    },
                    None => {
                        let target = next_media_target(package, img.format().extension());
                        let id = rels.add(REL_TYPE_IMAGE, &target);
                        img.rel_id = Some(id);
                        format!("word/{target}")
                    },
                };

                package.set_part(part_name, img.data().to_vec());
                package.ensure_default_content_type(
                    img.format().extension(),
                    img.format().mime_type(),
                )?;
            }
        }
        Ok(())
    }
}

/// Allocate a fresh `media/imageN.{ext}` part name, one past the highest
/// number in use across every media extension.
fn next_media_target(package: &OpcPackage, extension: &str) -> String {
    let highest = package
        .part_names()
        .filter_map(|name| name.strip_prefix("word/media/image"))
        .filter_map(|rest| rest.split('.').next())
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("media/image{}.{extension}", highest + 1)
}

impl Document {
    /// A fresh, empty document built from the template part set.
    pub fn new() -> Self {
        let package = template::base_package();
        let styles = StyleSheet::parse(template::STYLES_XML.as_bytes())
            .unwrap_or_else(|_| StyleSheet::new());
        Document::from_parts(Vec::new(), Section::default(), styles, package)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
