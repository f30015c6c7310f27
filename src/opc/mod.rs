//! Open Packaging Conventions (OPC) container layer.
//!
//! A .docx file is a ZIP archive of XML parts plus binary media, tied together
//! by `[Content_Types].xml` and relationship parts. This module handles the
//! physical container only; it has no knowledge of WordprocessingML.

pub mod package;
pub mod rels;

pub use package::OpcPackage;
pub use rels::{Relationship, Relationships};

/// Relationship type URI for embedded images.
pub const REL_TYPE_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// Part name of the main document part.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Part name of the stylesheet part.
pub const STYLES_PART: &str = "word/styles.xml";

/// Part name of the main document's relationships.
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// Part name of the content types stream.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
