//! Structural edit operations on the document tree.
//!
//! Every operation is atomic: validation and style resolution happen before
//! the first mutation, so a failed call leaves the tree as it was.

use super::address::{Position, block_insert_index};
use crate::docx::{Block, Document, InlineImage, Paragraph, Run, RunProperties, Table};
use crate::error::{Error, Result};

/// Whether an upsert edited an existing node or inserted a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    Edited(usize),
    Inserted,
}

/// Insert a paragraph holding `text` as a single run at the resolved
/// position, optionally styled.
///
/// The style reference is resolved against the document stylesheet by name
/// first, then by ID; an unknown reference fails before anything is inserted.
pub fn insert_paragraph(
    doc: &mut Document,
    text: &str,
    position: Position,
    index: Option<usize>,
    style: Option<&str>,
) -> Result<()> {
    let style_id = match style {
        Some(reference) => Some(doc.styles.resolve(reference)?.style_id.clone()),
        None => None,
    };

    let mut para = Paragraph::with_text(text);
    para.style = style_id;

    let at = position.resolve(index, doc.paragraph_count());
    let block_at = block_insert_index(doc, at);
    doc.blocks.insert(block_at, Block::Paragraph(para));
    Ok(())
}

/// Replace the text of the paragraph at a strict index.
///
/// With `preserve_formatting`, the first existing run's bold, italic, font
/// name, and font size carry over onto the single replacement run; underline
/// and color deliberately do not. Without it the replacement run is unstyled.
pub fn edit_paragraph(
    doc: &mut Document,
    paragraph_index: usize,
    new_text: &str,
    preserve_formatting: bool,
) -> Result<()> {
    let len = doc.paragraph_count();
    let Some(para) = doc.paragraphs_mut().nth(paragraph_index) else {
        return Err(Error::IndexOutOfRange {
            what: "paragraph",
            index: paragraph_index,
            len,
        });
    };

    let properties = if preserve_formatting {
        para.runs
            .first()
            .map(|first| RunProperties {
                bold: first.properties.bold,
                italic: first.properties.italic,
                font_name: first.properties.font_name.clone(),
                size_half_points: first.properties.size_half_points,
                ..RunProperties::default()
            })
            .unwrap_or_default()
    } else {
        RunProperties::default()
    };

    let mut run = Run::text(new_text);
    run.properties = properties;
    para.runs = vec![run];
    Ok(())
}

/// Insert a new table from a grid of strings, or overwrite an existing one.
///
/// The grid must be rectangular and non-empty. When editing, missing rows
/// are appended and existing cells are overwritten only where input data
/// exists; the table is never truncated, and grid columns beyond a row's
/// width are dropped.
pub fn upsert_table(
    doc: &mut Document,
    grid: &[Vec<String>],
    table_index: Option<usize>,
    position: Position,
    style: Option<&str>,
) -> Result<UpsertAction> {
    validate_grid(grid)?;

    if let Some(index) = table_index
        && index < doc.table_count()
    {
        // Just bounds-checked.
        let table = doc.table_mut(index).unwrap();
        fill_table(table, grid);
        return Ok(UpsertAction::Edited(index));
    }

    let style_id = match style {
        Some(reference) => Some(doc.styles.resolve(reference)?.style_id.clone()),
        None => None,
    };

    let mut table = Table::new(grid.len(), grid[0].len());
    table.style = style_id;
    fill_table(&mut table, grid);

    match position {
        Position::Start => doc.blocks.insert(0, Block::Table(table)),
        _ => doc.blocks.push(Block::Table(table)),
    }
    Ok(UpsertAction::Inserted)
}

fn validate_grid(grid: &[Vec<String>]) -> Result<()> {
    let Some(first) = grid.first() else {
        return Err(Error::InvalidTableShape("table data has no rows".to_string()));
    };
    let cols = first.len();
    if cols == 0 {
        return Err(Error::InvalidTableShape("table rows have no columns".to_string()));
    }
    for (i, row) in grid.iter().enumerate() {
        if row.len() != cols {
            return Err(Error::InvalidTableShape(format!(
                "row {i} has {} columns, expected {cols}",
                row.len()
            )));
        }
    }
    Ok(())
}

fn fill_table(table: &mut Table, grid: &[Vec<String>]) {
    for (r, row_data) in grid.iter().enumerate() {
        if r >= table.row_count() {
            table.add_row();
        }
        for (c, text) in row_data.iter().enumerate() {
            if let Some(cell) = table.cell_mut(r, c) {
                cell.set_text(text);
            }
        }
    }
}

/// Replace the image at a strict index, or anchor a new one in a fresh
/// paragraph at the resolved position.
///
/// The display height is derived from the payload's own aspect ratio during
/// embedding; only the width is caller-controlled.
pub fn upsert_image(
    doc: &mut Document,
    data: Vec<u8>,
    width_inches: f64,
    image_index: Option<usize>,
    position: Position,
    index: Option<usize>,
) -> Result<UpsertAction> {
    if let Some(i) = image_index {
        let mut images = doc.images_mut();
        if i < images.len() {
            images[i].replace_with(data, width_inches)?;
            return Ok(UpsertAction::Edited(i));
        }
    }

    let image = InlineImage::from_bytes(data, width_inches)?;
    let mut para = Paragraph::new();
    para.runs.push(Run::image(image));

    let at = position.resolve(index, doc.paragraph_count());
    let block_at = block_insert_index(doc, at);
    doc.blocks.insert(block_at, Block::Paragraph(para));
    Ok(UpsertAction::Inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::test_png_header;

    fn doc_with_texts(texts: &[&str]) -> Document {
        let mut doc = Document::new();
        for t in texts {
            doc.blocks.push(Block::Paragraph(Paragraph::with_text(*t)));
        }
        doc
    }

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn insert_at_start_and_end() {
        let mut doc = doc_with_texts(&["b"]);
        insert_paragraph(&mut doc, "a", Position::Start, None, None).unwrap();
        insert_paragraph(&mut doc, "c", Position::End, None, None).unwrap();
        let texts: Vec<String> = doc.paragraphs().map(|p| p.text()).collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }

    #[test]
    fn insert_at_huge_index_appends() {
        let mut doc = doc_with_texts(&["a", "b", "c"]);
        insert_paragraph(&mut doc, "last", Position::AtIndex, Some(1000), None).unwrap();
        assert_eq!(doc.paragraph_count(), 4);
        assert_eq!(doc.paragraphs().last().unwrap().text(), "last");
    }

    #[test]
    fn insert_with_style_resolves_by_name() {
        let mut doc = Document::new();
        insert_paragraph(&mut doc, "Title", Position::End, None, Some("Heading 1")).unwrap();
        assert_eq!(
            doc.paragraphs().next().unwrap().style.as_deref(),
            Some("Heading1")
        );
    }

    #[test]
    fn unknown_style_fails_without_inserting() {
        let mut doc = doc_with_texts(&["a"]);
        let err =
            insert_paragraph(&mut doc, "x", Position::End, None, Some("NoSuchStyle")).unwrap_err();
        assert!(matches!(err, Error::UnknownStyle(_)));
        assert_eq!(doc.paragraph_count(), 1);
    }

    #[test]
    fn edit_preserves_first_run_formatting() {
        let mut doc = doc_with_texts(&["old"]);
        {
            let para = doc.paragraphs_mut().next().unwrap();
            para.runs[0].properties.bold = Some(true);
            para.runs[0].properties.underline = Some(true);
            para.runs.push(Run::text(" tail"));
        }
        edit_paragraph(&mut doc, 0, "new", true).unwrap();
        let para = doc.paragraphs().next().unwrap();
        assert_eq!(para.runs.len(), 1);
        assert_eq!(para.text(), "new");
        assert_eq!(para.runs[0].properties.bold, Some(true));
        // Underline is not part of the preserved set.
        assert_eq!(para.runs[0].properties.underline, None);
    }

    #[test]
    fn edit_without_preservation_is_unstyled() {
        let mut doc = doc_with_texts(&["old"]);
        doc.paragraphs_mut().next().unwrap().runs[0].properties.bold = Some(true);
        edit_paragraph(&mut doc, 0, "new", false).unwrap();
        let para = doc.paragraphs().next().unwrap();
        assert_eq!(para.runs[0].properties, RunProperties::default());
    }

    #[test]
    fn edit_out_of_range_is_an_error() {
        let mut doc = doc_with_texts(&["only"]);
        let err = edit_paragraph(&mut doc, 5, "x", true).unwrap_err();
        assert!(matches!(
            err,
            Error::IndexOutOfRange {
                what: "paragraph",
                index: 5,
                len: 1
            }
        ));
        assert_eq!(doc.paragraphs().next().unwrap().text(), "only");
    }

    #[test]
    fn new_table_matches_grid() {
        let mut doc = Document::new();
        let action = upsert_table(
            &mut doc,
            &grid(&[&["a", "b"], &["c", "d"]]),
            None,
            Position::End,
            None,
        )
        .unwrap();
        assert_eq!(action, UpsertAction::Inserted);
        let table = doc.tables().next().unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.col_count(), 2);
        assert_eq!(table.cell(1, 0).unwrap().text(), "c");
    }

    #[test]
    fn ragged_grid_rejected() {
        let mut doc = Document::new();
        let err = upsert_table(
            &mut doc,
            &grid(&[&["a", "b"], &["c"]]),
            None,
            Position::End,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidTableShape(_)));
        assert_eq!(doc.table_count(), 0);
    }

    #[test]
    fn growing_table_preserves_existing_cells() {
        let mut doc = Document::new();
        upsert_table(&mut doc, &grid(&[&["keep", "x"]]), None, Position::End, None).unwrap();
        doc.table_mut(0).unwrap().cell_mut(0, 0).unwrap().set_text("kept");

        upsert_table(
            &mut doc,
            &grid(&[&["kept", "x2"], &["new", "row"]]),
            Some(0),
            Position::End,
            None,
        )
        .unwrap();
        let table = doc.tables().next().unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(1, 1).unwrap().text(), "row");
    }

    #[test]
    fn smaller_grid_never_truncates() {
        let mut doc = Document::new();
        upsert_table(
            &mut doc,
            &grid(&[&["a", "b", "c"], &["d", "e", "f"]]),
            None,
            Position::End,
            None,
        )
        .unwrap();
        upsert_table(&mut doc, &grid(&[&["A"]]), Some(0), Position::End, None).unwrap();
        let table = doc.tables().next().unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, 0).unwrap().text(), "A");
        assert_eq!(table.cell(0, 1).unwrap().text(), "b");
        assert_eq!(table.cell(1, 2).unwrap().text(), "f");
    }

    #[test]
    fn stale_table_index_inserts_instead() {
        let mut doc = Document::new();
        let action =
            upsert_table(&mut doc, &grid(&[&["a"]]), Some(9), Position::End, None).unwrap();
        assert_eq!(action, UpsertAction::Inserted);
        assert_eq!(doc.table_count(), 1);
    }

    #[test]
    fn image_replace_by_index() {
        let mut doc = Document::new();
        upsert_image(
            &mut doc,
            test_png_header(10, 10),
            2.0,
            None,
            Position::End,
            None,
        )
        .unwrap();
        let action = upsert_image(
            &mut doc,
            test_png_header(20, 10),
            1.0,
            Some(0),
            Position::End,
            None,
        )
        .unwrap();
        assert_eq!(action, UpsertAction::Edited(0));
        assert_eq!(doc.images().len(), 1);
        assert_eq!(
            doc.images()[0].width_emu(),
            (1.0 * crate::docx::EMU_PER_INCH) as i64
        );
    }

    #[test]
    fn bad_image_payload_rejected() {
        let mut doc = Document::new();
        let err = upsert_image(
            &mut doc,
            b"definitely not an image".to_vec(),
            3.0,
            None,
            Position::End,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidImageData(_)));
        assert_eq!(doc.paragraph_count(), 0);
    }

    mod grid_properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rectangular_grids_build_exact_tables(
                rows in 1usize..6,
                cols in 1usize..6,
                seed in any::<u64>(),
            ) {
                let grid: Vec<Vec<String>> = (0..rows)
                    .map(|r| (0..cols).map(|c| format!("{seed}-{r}-{c}")).collect())
                    .collect();
                let mut doc = Document::new();
                upsert_table(&mut doc, &grid, None, Position::End, None).unwrap();
                let table = doc.tables().next().unwrap();
                prop_assert_eq!(table.row_count(), rows);
                prop_assert_eq!(table.col_count(), cols);
                for (r, row) in grid.iter().enumerate() {
                    for (c, text) in row.iter().enumerate() {
                        prop_assert_eq!(&table.cell(r, c).unwrap().text(), text);
                    }
                }
            }
        }
    }
}
