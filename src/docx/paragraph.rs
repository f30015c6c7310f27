//! Paragraph and run model.

use super::image::InlineImage;
use super::section::Section;

/// Paragraph alignment options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// WordprocessingML `w:jc` value.
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "both",
        }
    }

    /// Parse a `w:jc` value from document XML.
    pub(crate) fn from_xml(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" | "end" => Some(Self::Right),
            "both" | "justify" | "distribute" => Some(Self::Justify),
            _ => None,
        }
    }

    /// Match a caller-supplied alignment name, case-insensitively, against the
    /// fixed enumeration. Unrecognized names yield `None` (callers treat that
    /// as a silent no-op).
    pub fn parse_request(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            "justify" => Some(Self::Justify),
            _ => None,
        }
    }

    /// Name reported to callers.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        }
    }
}

/// Optional style overrides on a run.
///
/// An absent attribute means "inherit from paragraph/document default",
/// never "false".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunProperties {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    /// Font family name applied to ASCII and high-ANSI ranges
    pub font_name: Option<String>,
    /// Font size in half-points (24 = 12pt)
    pub size_half_points: Option<u32>,
    /// Font color as hex RGB (e.g. "FF0000")
    pub color: Option<String>,
    /// Property elements the model does not understand (`w:strike`,
    /// `w:highlight`, `w:rStyle`, ...), kept as raw XML so they survive
    /// re-encode untouched
    pub(crate) extra: Vec<String>,
}

impl RunProperties {
    pub(crate) fn has_properties(&self) -> bool {
        self.bold.is_some()
            || self.italic.is_some()
            || self.underline.is_some()
            || self.font_name.is_some()
            || self.size_half_points.is_some()
            || self.color.is_some()
            || !self.extra.is_empty()
    }

    /// Font size in points, when set.
    pub fn size_points(&self) -> Option<f64> {
        self.size_half_points.map(|hp| hp as f64 / 2.0)
    }

    /// Set the font size from points.
    pub fn set_size_points(&mut self, points: f64) {
        self.size_half_points = Some((points * 2.0) as u32);
    }
}

/// Content of a run: a text span or an anchored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunContent {
    Text(String),
    Image(InlineImage),
}

/// A hyperlink wrapper around one or more runs: the relationship ID for
/// external targets, the anchor name for in-document targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperlinkRef {
    pub rel_id: Option<String>,
    pub anchor: Option<String>,
}

/// A contiguous span sharing one set of style overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub content: RunContent,
    pub properties: RunProperties,
    /// The hyperlink this run sits inside, when any; consecutive runs
    /// sharing one reference re-serialize under a single wrapper
    pub hyperlink: Option<HyperlinkRef>,
    /// Run children the model does not understand (`w:fldChar`,
    /// `w:instrText`, ...), kept as raw XML for re-encode
    pub(crate) extra: Vec<String>,
}

impl Run {
    /// Create a plain text run with no overrides.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: RunContent::Text(text.into()),
            properties: RunProperties::default(),
            hyperlink: None,
            extra: Vec::new(),
        }
    }

    /// Create an image run with no overrides.
    pub fn image(image: InlineImage) -> Self {
        Self {
            content: RunContent::Image(image),
            properties: RunProperties::default(),
            hyperlink: None,
            extra: Vec::new(),
        }
    }

    /// The run's text; empty for image runs.
    pub fn text_content(&self) -> &str {
        match &self.content {
            RunContent::Text(t) => t,
            RunContent::Image(_) => "",
        }
    }
}

/// A paragraph: style, alignment, and an ordered sequence of runs.
///
/// Invariant: the paragraph's plain text is the concatenation of its run
/// texts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    /// Style ID from the document stylesheet
    pub style: Option<String>,
    pub alignment: Option<Alignment>,
    pub runs: Vec<Run>,
    /// A section break ending at this paragraph, when present
    pub section_break: Option<Section>,
    /// Paragraph property elements the model does not understand
    /// (`w:numPr`, `w:ind`, `w:spacing`, ...), kept as raw XML
    pub(crate) extra_properties: Vec<String>,
}

impl Paragraph {
    /// Create an empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph holding the given text as a single run.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Run::text(text)],
            ..Self::default()
        }
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for run in &self.runs {
            out.push_str(run.text_content());
        }
        out
    }
}
