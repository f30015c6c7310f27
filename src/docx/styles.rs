//! Document stylesheet: the styles defined in `word/styles.xml`.
//!
//! The stylesheet is an explicit lookup table handed to the mutation engine,
//! so style resolution is testable in isolation and never ambient state.

use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Style categories defined by WordprocessingML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleType {
    #[default]
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleType {
    fn from_xml(value: &str) -> Option<Self> {
        match value {
            "paragraph" => Some(Self::Paragraph),
            "character" => Some(Self::Character),
            "table" => Some(Self::Table),
            "numbering" => Some(Self::Numbering),
            _ => None,
        }
    }
}

/// One style definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDef {
    /// The `w:styleId` used in paragraph/table properties
    pub style_id: String,
    /// Human-readable name ("Heading 1"), when declared
    pub name: Option<String>,
    pub style_type: StyleType,
}

/// The set of styles available in a document.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    styles: Vec<StyleDef>,
}

impl StyleSheet {
    /// An empty stylesheet (documents without a styles part).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `word/styles.xml` part.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut styles = Vec::new();
        let mut current: Option<StyleDef> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) if e.local_name().as_ref() == b"style" => {
                    let mut style_id = None;
                    let mut style_type = StyleType::default();
                    for attr in e.attributes().flatten() {
                        let Ok(value) = attr.decode_and_unescape_value(reader.decoder()) else {
                            continue;
                        };
                        match attr.key.local_name().as_ref() {
                            b"styleId" => style_id = Some(value.to_string()),
                            b"type" => {
                                style_type = StyleType::from_xml(&value).unwrap_or_default();
                            },
                            _ => {},
                        }
                    }
                    if let Some(style_id) = style_id {
                        current = Some(StyleDef {
                            style_id,
                            name: None,
                            style_type,
                        });
                    }
                },
                Ok(Event::Empty(e))
                    if e.local_name().as_ref() == b"name" && current.is_some() =>
                {
                    for attr in e.attributes().flatten() {
                        if attr.key.local_name().as_ref() == b"val"
                            && let Ok(value) = attr.decode_and_unescape_value(reader.decoder())
                            && let Some(style) = current.as_mut()
                        {
                            style.name = Some(value.to_string());
                        }
                    }
                },
                Ok(Event::End(e)) if e.local_name().as_ref() == b"style" => {
                    if let Some(style) = current.take() {
                        styles.push(style);
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(e.into()),
                _ => {},
            }
        }

        Ok(Self { styles })
    }

    /// Number of defined styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Whether no styles are defined.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Look up a style by its ID.
    pub fn get_by_id(&self, style_id: &str) -> Option<&StyleDef> {
        self.styles.iter().find(|s| s.style_id == style_id)
    }

    /// Look up a style by its declared name.
    pub fn get_by_name(&self, name: &str) -> Option<&StyleDef> {
        self.styles.iter().find(|s| s.name.as_deref() == Some(name))
    }

    /// Resolve a caller-supplied style reference: declared name first, style
    /// ID second. Unknown references are [`Error::UnknownStyle`].
    pub fn resolve(&self, reference: &str) -> Result<&StyleDef> {
        self.get_by_name(reference)
            .or_else(|| self.get_by_id(reference))
            .ok_or_else(|| Error::UnknownStyle(reference.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = br#"<?xml version="1.0"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="Heading 1"/></w:style>
  <w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/></w:style>
</w:styles>"#;

    #[test]
    fn parses_styles_with_names() {
        let sheet = StyleSheet::parse(SAMPLE).unwrap();
        assert_eq!(sheet.len(), 3);
        assert_eq!(
            sheet.get_by_id("Heading1").unwrap().name.as_deref(),
            Some("Heading 1")
        );
        assert_eq!(
            sheet.get_by_name("Table Grid").unwrap().style_type,
            StyleType::Table
        );
    }

    #[test]
    fn resolves_by_name_then_id() {
        let sheet = StyleSheet::parse(SAMPLE).unwrap();
        assert_eq!(sheet.resolve("Heading 1").unwrap().style_id, "Heading1");
        assert_eq!(sheet.resolve("Heading1").unwrap().style_id, "Heading1");
        assert!(matches!(
            sheet.resolve("No Such Style"),
            Err(Error::UnknownStyle(_))
        ));
    }
}
