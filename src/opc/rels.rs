//! Relationship parts (`*.rels`) parsing and serialization.

use crate::error::Result;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fmt::Write as FmtWrite;

/// A single relationship entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (`rId1`, `rId2`, ...)
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target part, relative to the source part's directory
    pub target: String,
}

/// The relationships of one source part.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    rels: Vec<Relationship>,
}

impl Relationships {
    /// Create an empty relationship set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a relationships part.
    ///
    /// Unknown attributes (e.g. `TargetMode`) are ignored; entries missing an
    /// ID or target are skipped rather than failing the whole part.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut rels = Vec::new();
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = None;
                    let mut rel_type = None;
                    let mut target = None;
                    for attr in e.attributes().flatten() {
                        let Ok(value) = attr.decode_and_unescape_value(reader.decoder()) else {
                            continue;
                        };
                        match attr.key.local_name().as_ref() {
                            b"Id" => id = Some(value.to_string()),
                            b"Type" => rel_type = Some(value.to_string()),
                            b"Target" => target = Some(value.to_string()),
                            _ => {},
                        }
                    }
                    if let (Some(id), Some(rel_type), Some(target)) = (id, rel_type, target) {
                        rels.push(Relationship {
                            id,
                            rel_type,
                            target,
                        });
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(e.into()),
                _ => {},
            }
        }

        Ok(Self { rels })
    }

    /// Look up a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|r| r.id == id)
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Add a relationship with a freshly allocated ID and return that ID.
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let id = self.next_id();
        self.rels.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
        });
        id
    }

    /// Allocate the next unused `rIdN` identifier.
    fn next_id(&self) -> String {
        let max = self
            .rels
            .iter()
            .filter_map(|r| r.id.strip_prefix("rId"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("rId{}", max + 1)
    }

    /// Serialize back into a relationships part.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(256 + self.rels.len() * 128);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for rel in &self.rels {
            write!(
                xml,
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                rel.id, rel.rel_type, rel.target
            )?;
        }
        xml.push_str("</Relationships>");
        Ok(xml)
    }
}
