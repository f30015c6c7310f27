//! WordprocessingML document model and codec.
//!
//! The tree models exactly what the editing surface touches: body paragraphs,
//! runs, tables, inline images, and section properties. Everything else in
//! the package rides along untouched via [`crate::opc::OpcPackage`].

mod codec;
mod document;
mod image;
mod paragraph;
pub(crate) mod parse;
mod section;
mod styles;
mod table;
pub(crate) mod template;
pub(crate) mod write;

pub use codec::DocxCodec;
#[cfg(test)]
pub(crate) use image::test_png_header;
pub use document::{Block, Document};
pub use image::{EMU_PER_INCH, ImageFormat, InlineImage};
pub use paragraph::{Alignment, HyperlinkRef, Paragraph, Run, RunContent, RunProperties};
pub use section::{Section, TWIPS_PER_INCH, inches_to_twips, twips_to_inches};
pub use styles::{StyleDef, StyleSheet, StyleType};
pub use table::{Cell, Row, Table};
