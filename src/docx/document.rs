//! The in-memory document tree.

use super::image::InlineImage;
use super::paragraph::Paragraph;
use super::section::Section;
use super::styles::StyleSheet;
use super::table::Table;
use crate::opc::OpcPackage;

/// A block-level node. Order within the document is significant and preserved
/// on every mutation except explicit insert.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// The root of the document tree.
///
/// Lives only for the duration of one call: constructed from decoded bytes,
/// dropped after re-encoding. The originating package is retained so parts the
/// editor does not model (settings, fonts, themes, headers) round-trip
/// untouched.
#[derive(Debug, Clone)]
pub struct Document {
    /// Ordered block sequence of the body
    pub blocks: Vec<Block>,
    /// The body-final section properties
    pub final_section: Section,
    /// Styles available for resolution
    pub styles: StyleSheet,
    /// The container this document was decoded from
    pub(crate) package: OpcPackage,
}

impl Document {
    pub(crate) fn from_parts(
        blocks: Vec<Block>,
        final_section: Section,
        styles: StyleSheet,
        package: OpcPackage,
    ) -> Self {
        Self {
            blocks,
            final_section,
            styles,
            package,
        }
    }

    /// Body-level paragraphs, in order. Matches the flat paragraph index the
    /// operation surface exposes; paragraphs inside table cells are not
    /// included.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    /// Body-level paragraphs, mutably.
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.blocks.iter_mut().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    /// Number of body-level paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs().count()
    }

    /// Body-level tables, in order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        })
    }

    /// The `index`-th body-level table, mutably.
    pub fn table_mut(&mut self, index: usize) -> Option<&mut Table> {
        self.blocks
            .iter_mut()
            .filter_map(|b| match b {
                Block::Table(t) => Some(t),
                Block::Paragraph(_) => None,
            })
            .nth(index)
    }

    /// Number of body-level tables.
    pub fn table_count(&self) -> usize {
        self.tables().count()
    }

    /// All sections: paragraph section breaks in document order, then the
    /// body-final section.
    pub fn sections(&self) -> Vec<&Section> {
        let mut out: Vec<&Section> = self
            .paragraphs()
            .filter_map(|p| p.section_break.as_ref())
            .collect();
        out.push(&self.final_section);
        out
    }

    /// All sections, mutably.
    pub fn sections_mut(&mut self) -> Vec<&mut Section> {
        let mut out: Vec<&mut Section> = Vec::new();
        for block in &mut self.blocks {
            if let Block::Paragraph(p) = block
                && let Some(section) = p.section_break.as_mut()
            {
                out.push(section);
            }
        }
        out.push(&mut self.final_section);
        out
    }

    /// Inline images anchored in body paragraphs, in document order.
    pub fn images(&self) -> Vec<&InlineImage> {
        let mut out = Vec::new();
        for para in self.paragraphs() {
            for run in &para.runs {
                if let super::paragraph::RunContent::Image(img) = &run.content {
                    out.push(img);
                }
            }
        }
        out
    }

    /// Inline images, mutably.
    pub fn images_mut(&mut self) -> Vec<&mut InlineImage> {
        let mut out = Vec::new();
        for block in &mut self.blocks {
            if let Block::Paragraph(p) = block {
                for run in &mut p.runs {
                    if let super::paragraph::RunContent::Image(img) = &mut run.content {
                        out.push(img);
                    }
                }
            }
        }
        out
    }

    /// Map a paragraph index to its position in the block sequence.
    pub(crate) fn block_index_of_paragraph(&self, paragraph_index: usize) -> Option<usize> {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| matches!(b, Block::Paragraph(_)))
            .nth(paragraph_index)
            .map(|(i, _)| i)
    }
}
