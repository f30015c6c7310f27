//! Logical position resolution for insert operations.

use crate::docx::Document;

/// A caller-supplied insertion position.
///
/// `AtIndex` is best-effort, not a strict structural reference: an index at
/// or past the end falls back to append instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    Start,
    #[default]
    End,
    AtIndex,
}

impl Position {
    /// Parse a position name, case-insensitively. Anything unrecognized is
    /// treated as `End`.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "start" => Self::Start,
            "at_index" | "atindex" => Self::AtIndex,
            _ => Self::End,
        }
    }

    /// Resolve to a paragraph insertion point in `[0, len]`: the new
    /// paragraph lands before the paragraph currently at the returned index.
    pub fn resolve(&self, index: Option<usize>, len: usize) -> usize {
        match self {
            Self::Start => 0,
            Self::End => len,
            Self::AtIndex => match index {
                Some(i) if i < len => i,
                _ => len,
            },
        }
    }
}

/// Map a paragraph insertion point to a position in the block sequence.
///
/// Index `len` (append) maps past the last block; anything else maps to the
/// block holding that paragraph, so the insert lands before it.
pub(crate) fn block_insert_index(doc: &Document, paragraph_index: usize) -> usize {
    doc.block_index_of_paragraph(paragraph_index)
        .unwrap_or(doc.blocks.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive_and_lenient() {
        assert_eq!(Position::parse("Start"), Position::Start);
        assert_eq!(Position::parse("AT_INDEX"), Position::AtIndex);
        assert_eq!(Position::parse("end"), Position::End);
        assert_eq!(Position::parse("middle"), Position::End);
    }

    #[test]
    fn at_index_past_end_falls_back_to_append() {
        assert_eq!(Position::AtIndex.resolve(Some(1000), 3), 3);
        assert_eq!(Position::AtIndex.resolve(None, 3), 3);
        assert_eq!(Position::AtIndex.resolve(Some(1), 3), 1);
    }

    #[test]
    fn start_and_end_ignore_index() {
        assert_eq!(Position::Start.resolve(Some(2), 3), 0);
        assert_eq!(Position::End.resolve(Some(0), 3), 3);
    }
}
