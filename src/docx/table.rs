//! Table, row, and cell model.

use super::document::Block;
use super::paragraph::Paragraph;

/// A table cell: a miniature block sequence with a flattened text view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub blocks: Vec<Block>,
}

impl Cell {
    /// Create an empty cell holding one empty paragraph, the shape Word
    /// itself produces for fresh cells.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::Paragraph(Paragraph::new())],
        }
    }

    /// Flattened text of the cell: paragraph texts joined with newlines.
    pub fn text(&self) -> String {
        let mut parts = Vec::new();
        for block in &self.blocks {
            if let Block::Paragraph(p) = block {
                parts.push(p.text());
            }
        }
        parts.join("\n")
    }

    /// Replace the cell content with a single paragraph of plain text.
    pub fn set_text(&mut self, text: &str) {
        self.blocks = vec![Block::Paragraph(Paragraph::with_text(text))];
    }
}

/// One table row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    /// Create a row of `cols` empty cells.
    pub fn new(cols: usize) -> Self {
        Self {
            cells: (0..cols).map(|_| Cell::new()).collect(),
        }
    }
}

/// A 2-D grid of cells addressed by (row, column), 0-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub(crate) rows: Vec<Row>,
    /// Column count declared at creation; appended rows use this width
    pub(crate) cols: usize,
    /// Table style ID from the stylesheet
    pub style: Option<String>,
}

impl Table {
    /// Create a table of empty cells with the given shape.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: (0..rows).map(|_| Row::new(cols)).collect(),
            cols,
            style: None,
        }
    }

    /// Reconstruct a table from decoded rows.
    pub(crate) fn from_rows(rows: Vec<Row>, style: Option<String>) -> Self {
        let cols = rows.first().map(|r| r.cells.len()).unwrap_or(0);
        Self { rows, cols, style }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Declared column count.
    pub fn col_count(&self) -> usize {
        self.cols
    }

    /// Rows, in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Append a row of empty cells at the declared width, preserving all
    /// existing cell content.
    pub fn add_row(&mut self) -> &mut Row {
        self.rows.push(Row::new(self.cols));
        // Just pushed, so the vector is non-empty.
        self.rows.last_mut().unwrap()
    }

    /// Get a cell by position.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row)?.cells.get(col)
    }

    /// Get a cell mutably by position.
    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.rows.get_mut(row)?.cells.get_mut(col)
    }
}
