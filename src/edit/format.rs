//! Sparse formatting merge over paragraphs and sections.

use crate::docx::{Alignment, Document};
use serde::Deserialize;

/// A sparse formatting request: every field is optional, and an absent field
/// leaves the corresponding attribute untouched everywhere.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct FormatRequest {
    /// Target one paragraph by index; `None` selects every paragraph
    pub paragraph_index: Option<usize>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub font_name: Option<String>,
    pub font_size_points: Option<f64>,
    /// Font color as an RGB triple; channel values are not validated
    pub color_rgb: Option<[u8; 3]>,
    /// One of `left`, `center`, `right`, `justify`, case-insensitive.
    /// Unrecognized names are a silent no-op.
    pub alignment: Option<String>,
    pub margin_left_inches: Option<f64>,
    pub margin_right_inches: Option<f64>,
    pub margin_top_inches: Option<f64>,
    pub margin_bottom_inches: Option<f64>,
}

impl FormatRequest {
    fn touches_runs(&self) -> bool {
        self.bold.is_some()
            || self.italic.is_some()
            || self.underline.is_some()
            || self.font_name.is_some()
            || self.font_size_points.is_some()
            || self.color_rgb.is_some()
    }
}

/// Merge the requested attributes into the document.
///
/// Run attributes and alignment apply to the selected paragraphs (one by
/// index, or all); margins apply to every section. An out-of-range
/// `paragraph_index` selects nothing and is not an error. Never fails.
pub fn apply_format(doc: &mut Document, request: &FormatRequest) {
    let alignment = request
        .alignment
        .as_deref()
        .and_then(Alignment::parse_request);
    let color_hex = request
        .color_rgb
        .map(|[r, g, b]| format!("{r:02X}{g:02X}{b:02X}"));
    let touches_runs = request.touches_runs();

    for (i, para) in doc.paragraphs_mut().enumerate() {
        if let Some(target) = request.paragraph_index
            && i != target
        {
            continue;
        }

        if let Some(alignment) = alignment {
            para.alignment = Some(alignment);
        }

        if !touches_runs {
            continue;
        }
        for run in &mut para.runs {
            if let Some(bold) = request.bold {
                run.properties.bold = Some(bold);
            }
            if let Some(italic) = request.italic {
                run.properties.italic = Some(italic);
            }
            if let Some(underline) = request.underline {
                run.properties.underline = Some(underline);
            }
            if let Some(ref font_name) = request.font_name {
                run.properties.font_name = Some(font_name.clone());
            }
            if let Some(points) = request.font_size_points {
                run.properties.set_size_points(points);
            }
            if let Some(ref hex) = color_hex {
                run.properties.color = Some(hex.clone());
            }
        }
    }

    for section in doc.sections_mut() {
        section.merge_margins_inches(
            request.margin_left_inches,
            request.margin_right_inches,
            request.margin_top_inches,
            request.margin_bottom_inches,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::{Block, Paragraph};

    fn doc_with_texts(texts: &[&str]) -> Document {
        let mut doc = Document::new();
        for t in texts {
            doc.blocks.push(Block::Paragraph(Paragraph::with_text(*t)));
        }
        doc
    }

    #[test]
    fn bold_merge_keeps_existing_italic() {
        let mut doc = doc_with_texts(&["a", "b", "c"]);
        doc.paragraphs_mut().nth(2).unwrap().runs[0].properties.italic = Some(true);

        apply_format(
            &mut doc,
            &FormatRequest {
                paragraph_index: Some(2),
                bold: Some(true),
                ..FormatRequest::default()
            },
        );

        let target = doc.paragraphs().nth(2).unwrap();
        assert_eq!(target.runs[0].properties.bold, Some(true));
        assert_eq!(target.runs[0].properties.italic, Some(true));
        for para in doc.paragraphs().take(2) {
            assert_eq!(para.runs[0].properties.bold, None);
        }
    }

    #[test]
    fn all_paragraphs_selected_when_index_absent() {
        let mut doc = doc_with_texts(&["a", "b"]);
        apply_format(
            &mut doc,
            &FormatRequest {
                font_size_points: Some(14.0),
                ..FormatRequest::default()
            },
        );
        for para in doc.paragraphs() {
            assert_eq!(para.runs[0].properties.size_half_points, Some(28));
        }
    }

    #[test]
    fn color_triple_becomes_hex() {
        let mut doc = doc_with_texts(&["a"]);
        apply_format(
            &mut doc,
            &FormatRequest {
                color_rgb: Some([255, 0, 16]),
                ..FormatRequest::default()
            },
        );
        assert_eq!(
            doc.paragraphs().next().unwrap().runs[0].properties.color.as_deref(),
            Some("FF0010")
        );
    }

    #[test]
    fn unrecognized_alignment_is_a_noop() {
        let mut doc = doc_with_texts(&["a"]);
        apply_format(
            &mut doc,
            &FormatRequest {
                alignment: Some("diagonal".to_string()),
                ..FormatRequest::default()
            },
        );
        assert_eq!(doc.paragraphs().next().unwrap().alignment, None);
    }

    #[test]
    fn alignment_applies_even_to_runless_paragraphs() {
        let mut doc = Document::new();
        doc.blocks.push(Block::Paragraph(Paragraph::new()));
        apply_format(
            &mut doc,
            &FormatRequest {
                alignment: Some("Center".to_string()),
                bold: Some(true),
                ..FormatRequest::default()
            },
        );
        assert_eq!(
            doc.paragraphs().next().unwrap().alignment,
            Some(Alignment::Center)
        );
    }

    #[test]
    fn out_of_range_index_selects_nothing() {
        let mut doc = doc_with_texts(&["a"]);
        apply_format(
            &mut doc,
            &FormatRequest {
                paragraph_index: Some(10),
                bold: Some(true),
                ..FormatRequest::default()
            },
        );
        assert_eq!(doc.paragraphs().next().unwrap().runs[0].properties.bold, None);
    }

    #[test]
    fn margins_apply_to_every_section() {
        let mut doc = doc_with_texts(&["a"]);
        apply_format(
            &mut doc,
            &FormatRequest {
                margin_left_inches: Some(0.5),
                margin_top_inches: Some(0.0),
                ..FormatRequest::default()
            },
        );
        let section = doc.sections()[0];
        assert_eq!(section.margin_left, 720);
        assert_eq!(section.margin_top, 0);
        assert_eq!(section.margin_right, 1440);
    }
}
