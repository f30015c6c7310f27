//! Read-only projection of the document tree into a plain snapshot.

use crate::docx::Document;
use serde::Serialize;

/// Structured, serializable view of a document.
///
/// Unset attributes serialize as `null` rather than a default, so a reader
/// can distinguish "inherits" from "explicitly off".
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSnapshot {
    pub paragraphs: Vec<ParagraphSnapshot>,
    pub tables: Vec<TableSnapshot>,
    pub sections: Vec<SectionSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParagraphSnapshot {
    pub text: String,
    pub style: Option<String>,
    pub alignment: Option<&'static str>,
    pub runs: Vec<RunSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSnapshot {
    pub text: String,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub font_size_points: Option<f64>,
    pub font_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSnapshot {
    pub table_index: usize,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionSnapshot {
    pub page_width_inches: f64,
    pub page_height_inches: f64,
    pub margin_left_inches: f64,
    pub margin_right_inches: f64,
    pub margin_top_inches: f64,
    pub margin_bottom_inches: f64,
}

/// Project the tree into a snapshot. Never mutates.
pub fn snapshot(doc: &Document) -> DocumentSnapshot {
    let paragraphs = doc
        .paragraphs()
        .map(|para| ParagraphSnapshot {
            text: para.text(),
            style: para.style.clone(),
            alignment: para.alignment.map(|a| a.name()),
            runs: para
                .runs
                .iter()
                .map(|run| RunSnapshot {
                    text: run.text_content().to_string(),
                    bold: run.properties.bold,
                    italic: run.properties.italic,
                    underline: run.properties.underline,
                    font_size_points: run.properties.size_points(),
                    font_name: run.properties.font_name.clone(),
                })
                .collect(),
        })
        .collect();

    let tables = doc
        .tables()
        .enumerate()
        .map(|(table_index, table)| TableSnapshot {
            table_index,
            rows: table
                .rows()
                .iter()
                .map(|row| row.cells.iter().map(|cell| cell.text()).collect())
                .collect(),
        })
        .collect();

    let sections = doc
        .sections()
        .into_iter()
        .map(|section| SectionSnapshot {
            page_width_inches: section.page_width_inches(),
            page_height_inches: section.page_height_inches(),
            margin_left_inches: crate::docx::twips_to_inches(section.margin_left),
            margin_right_inches: crate::docx::twips_to_inches(section.margin_right),
            margin_top_inches: crate::docx::twips_to_inches(section.margin_top),
            margin_bottom_inches: crate::docx::twips_to_inches(section.margin_bottom),
        })
        .collect();

    DocumentSnapshot {
        paragraphs,
        tables,
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::{Alignment, Block, Paragraph, Table};

    #[test]
    fn snapshot_reports_structure_and_geometry() {
        let mut doc = Document::new();
        let mut para = Paragraph::with_text("hello");
        para.style = Some("Heading1".to_string());
        para.alignment = Some(Alignment::Justify);
        para.runs[0].properties.bold = Some(true);
        para.runs[0].properties.set_size_points(12.0);
        doc.blocks.push(Block::Paragraph(para));

        let mut table = Table::new(1, 2);
        table.cell_mut(0, 1).unwrap().set_text("cell");
        doc.blocks.push(Block::Table(table));

        let snap = snapshot(&doc);
        assert_eq!(snap.paragraphs.len(), 1);
        assert_eq!(snap.paragraphs[0].text, "hello");
        assert_eq!(snap.paragraphs[0].alignment, Some("justify"));
        assert_eq!(snap.paragraphs[0].runs[0].bold, Some(true));
        assert_eq!(snap.paragraphs[0].runs[0].font_size_points, Some(12.0));
        assert_eq!(snap.tables[0].rows, vec![vec!["".to_string(), "cell".to_string()]]);
        assert_eq!(snap.sections.len(), 1);
        assert_eq!(snap.sections[0].page_width_inches, 8.5);
        assert_eq!(snap.sections[0].margin_left_inches, 1.0);
    }

    #[test]
    fn unset_attributes_serialize_as_null() {
        let mut doc = Document::new();
        doc.blocks.push(Block::Paragraph(Paragraph::with_text("x")));
        let json = serde_json::to_value(snapshot(&doc)).unwrap();
        let run = &json["paragraphs"][0]["runs"][0];
        assert!(run["bold"].is_null());
        assert!(run["font_name"].is_null());
        assert!(json["paragraphs"][0]["alignment"].is_null());
    }
}
