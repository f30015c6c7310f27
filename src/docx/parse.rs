//! Streaming parse of `word/document.xml` into the document tree.

use super::document::Block;
use super::image::{ImageFormat, InlineImage};
use super::paragraph::{Alignment, HyperlinkRef, Paragraph, Run, RunContent, RunProperties};
use super::section::Section;
use super::table::{Cell, Row, Table};
use crate::error::{Error, Result};
use crate::opc::{OpcPackage, Relationships};
use quick_xml::Reader;
use quick_xml::events::{BytesRef, BytesStart, Event};

/// Parse the main document part.
///
/// Returns the body block sequence and the body-final section properties.
/// Content controls (`w:sdt`) and tracked insertions (`w:ins`) are unwrapped
/// so their paragraphs and runs join the sequence; paragraph and run
/// properties the tree does not model ride along as raw XML.
pub(crate) fn parse_document(
    xml: &[u8],
    rels: &Relationships,
    package: &OpcPackage,
) -> Result<(Vec<Block>, Section)> {
    let mut reader = Reader::from_reader(xml);
    let mut blocks = Vec::new();
    let mut final_section = Section::default();
    let mut in_body = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"body" => in_body = true,
                b"p" if in_body => {
                    blocks.push(Block::Paragraph(parse_paragraph(&mut reader, rels, package)?));
                },
                b"tbl" if in_body => {
                    blocks.push(Block::Table(parse_table(&mut reader, rels, package)?));
                },
                b"sectPr" if in_body => {
                    final_section = parse_sect_pr(&mut reader)?;
                },
                // Unwrap content controls; their blocks join the sequence
                b"sdt" | b"sdtContent" if in_body => {},
                b"sdtPr" | b"sdtEndPr" if in_body => skip_element(&mut reader, &e)?,
                b"document" => {},
                _ => skip_element(&mut reader, &e)?,
            },
            Ok(Event::Empty(e)) if in_body && e.local_name().as_ref() == b"p" => {
                blocks.push(Block::Paragraph(Paragraph::new()));
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"body" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {},
        }
    }

    Ok((blocks, final_section))
}

/// Consume an element the model does not understand.
fn skip_element(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<()> {
    let end = start.to_end().into_owned();
    reader.read_to_end(end.name())?;
    Ok(())
}

/// Append a raw opening (or self-closing) tag, attributes verbatim.
fn raw_tag(out: &mut String, e: &BytesStart<'_>, self_closing: bool) {
    out.push('<');
    out.push_str(&String::from_utf8_lossy(e.name().as_ref()));
    for attr in e.attributes().flatten() {
        out.push(' ');
        out.push_str(&String::from_utf8_lossy(attr.key.as_ref()));
        out.push_str("=\"");
        out.push_str(&String::from_utf8_lossy(&attr.value));
        out.push('"');
    }
    if self_closing {
        out.push_str("/>");
    } else {
        out.push('>');
    }
}

/// Reconstruct a self-closing element as raw XML.
fn capture_empty(e: &BytesStart<'_>) -> String {
    let mut out = String::new();
    raw_tag(&mut out, e, true);
    out
}

/// Reconstruct an element and its whole subtree as raw XML, consuming it
/// from the reader. Attribute and text content stay escaped, so the captured
/// string can be re-emitted verbatim.
fn capture_element(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<String> {
    let mut out = String::new();
    raw_tag(&mut out, start, false);
    let mut depth = 1usize;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                raw_tag(&mut out, &e, false);
                depth += 1;
            },
            Ok(Event::Empty(e)) => raw_tag(&mut out, &e, true),
            Ok(Event::Text(t)) => {
                out.push_str(
                    std::str::from_utf8(t.as_ref()).map_err(|e| Error::Xml(e.to_string()))?,
                );
            },
            Ok(Event::GeneralRef(r)) => {
                out.push('&');
                out.push_str(&r.decode().map_err(|e| Error::Xml(e.to_string()))?);
                out.push(';');
            },
            Ok(Event::End(e)) => {
                out.push_str("</");
                out.push_str(&String::from_utf8_lossy(e.name().as_ref()));
                out.push('>');
                depth -= 1;
                if depth == 0 {
                    break;
                }
            },
            Ok(Event::Eof) => {
                return Err(Error::Xml("unexpected EOF inside retained element".to_string()));
            },
            Err(e) => return Err(e.into()),
            _ => {},
        }
    }
    Ok(out)
}

/// Read a `w:val`-style attribute from an element.
fn attr_value(reader: &Reader<&[u8]>, e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == name
            && let Ok(value) = attr.decode_and_unescape_value(reader.decoder())
        {
            return Some(value.to_string());
        }
    }
    None
}

/// Resolve a general entity reference to its character: numeric references
/// first, then the five predefined XML entities. Unknown entities dissolve.
fn resolve_reference(r: &BytesRef<'_>) -> Result<Option<char>> {
    if let Some(ch) = r
        .resolve_char_ref()
        .map_err(|e| Error::Xml(e.to_string()))?
    {
        return Ok(Some(ch));
    }
    let name = r.decode().map_err(|e| Error::Xml(e.to_string()))?;
    Ok(match name.as_ref() {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    })
}

/// Interpret an on/off property value (`w:b`, `w:i`): absent value means on.
fn toggle_value(value: Option<String>) -> bool {
    match value.as_deref() {
        Some("0") | Some("false") | Some("none") => false,
        _ => true,
    }
}

fn parse_paragraph(
    reader: &mut Reader<&[u8]>,
    rels: &Relationships,
    package: &OpcPackage,
) -> Result<Paragraph> {
    let mut para = Paragraph::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"pPr" => parse_paragraph_properties(reader, &mut para)?,
                b"r" => para.runs.push(parse_run(reader, rels, package)?),
                b"hyperlink" => parse_hyperlink(reader, &e, rels, package, &mut para.runs)?,
                // Unwrap tracked insertions and inline content controls
                b"ins" | b"sdt" | b"sdtContent" => {},
                b"sdtPr" | b"sdtEndPr" => skip_element(reader, &e)?,
                _ => skip_element(reader, &e)?,
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"p" => break,
            Ok(Event::Eof) => {
                return Err(Error::Xml("unexpected EOF inside paragraph".to_string()));
            },
            Err(e) => return Err(e.into()),
            _ => {},
        }
    }

    Ok(para)
}

/// Parse a `w:hyperlink` wrapper, tagging every contained run with the link's
/// relationship ID and anchor so the wrapper re-serializes intact.
fn parse_hyperlink(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    rels: &Relationships,
    package: &OpcPackage,
    runs: &mut Vec<Run>,
) -> Result<()> {
    let link = HyperlinkRef {
        rel_id: attr_value(reader, e, b"id"),
        anchor: attr_value(reader, e, b"anchor"),
    };

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"r" => {
                    let mut run = parse_run(reader, rels, package)?;
                    run.hyperlink = Some(link.clone());
                    runs.push(run);
                },
                _ => skip_element(reader, &e)?,
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"hyperlink" => break,
            Ok(Event::Eof) => {
                return Err(Error::Xml("unexpected EOF inside hyperlink".to_string()));
            },
            Err(e) => return Err(e.into()),
            _ => {},
        }
    }
    Ok(())
}

fn parse_paragraph_properties(reader: &mut Reader<&[u8]>, para: &mut Paragraph) -> Result<()> {
    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"pStyle" => para.style = attr_value(reader, &e, b"val"),
                b"jc" => {
                    para.alignment = attr_value(reader, &e, b"val")
                        .as_deref()
                        .and_then(Alignment::from_xml);
                },
                _ => para.extra_properties.push(capture_empty(&e)),
            },
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"pStyle" => para.style = attr_value(reader, &e, b"val"),
                b"jc" => {
                    para.alignment = attr_value(reader, &e, b"val")
                        .as_deref()
                        .and_then(Alignment::from_xml);
                },
                b"sectPr" => para.section_break = Some(parse_sect_pr(reader)?),
                _ => para.extra_properties.push(capture_element(reader, &e)?),
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"pPr" => break,
            Ok(Event::Eof) => {
                return Err(Error::Xml("unexpected EOF inside pPr".to_string()));
            },
            Err(e) => return Err(e.into()),
            _ => {},
        }
    }
    Ok(())
}

fn parse_run(
    reader: &mut Reader<&[u8]>,
    rels: &Relationships,
    package: &OpcPackage,
) -> Result<Run> {
    let mut properties = RunProperties::default();
    let mut text = String::new();
    let mut image: Option<InlineImage> = None;
    let mut extra = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"rPr" => parse_run_properties(reader, &mut properties)?,
                b"t" => in_text = true,
                b"drawing" => {
                    image = parse_drawing(reader, rels, package)?;
                },
                _ => extra.push(capture_element(reader, &e)?),
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"br" => text.push('\n'),
                b"tab" => text.push('\t'),
                b"t" => {},
                _ => extra.push(capture_empty(&e)),
            },
            Ok(Event::Text(t)) if in_text => {
                let raw = std::str::from_utf8(t.as_ref())
                    .map_err(|e| Error::Xml(e.to_string()))?;
                text.push_str(raw);
            },
            // Entity references arrive as their own events, outside Text
            Ok(Event::GeneralRef(r)) if in_text => {
                if let Some(ch) = resolve_reference(&r)? {
                    text.push(ch);
                }
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"r" => break,
                _ => {},
            },
            Ok(Event::Eof) => {
                return Err(Error::Xml("unexpected EOF inside run".to_string()));
            },
            Err(e) => return Err(e.into()),
            _ => {},
        }
    }

    let content = match image {
        Some(img) => RunContent::Image(img),
        None => RunContent::Text(text),
    };
    Ok(Run {
        content,
        properties,
        hyperlink: None,
        extra,
    })
}

fn parse_run_properties(reader: &mut Reader<&[u8]>, props: &mut RunProperties) -> Result<()> {
    fn modeled(
        reader: &Reader<&[u8]>,
        e: &BytesStart<'_>,
        props: &mut RunProperties,
    ) -> bool {
        match e.local_name().as_ref() {
            b"b" => props.bold = Some(toggle_value(attr_value(reader, e, b"val"))),
            b"i" => props.italic = Some(toggle_value(attr_value(reader, e, b"val"))),
            b"u" => props.underline = Some(toggle_value(attr_value(reader, e, b"val"))),
            b"sz" => {
                props.size_half_points = attr_value(reader, e, b"val")
                    .and_then(|v| v.parse::<u32>().ok());
            },
            b"rFonts" => {
                props.font_name = attr_value(reader, e, b"ascii")
                    .or_else(|| attr_value(reader, e, b"hAnsi"));
            },
            b"color" => {
                props.color = attr_value(reader, e, b"val").filter(|v| v != "auto");
            },
            _ => return false,
        }
        true
    }

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) => {
                if !modeled(reader, &e, props) {
                    props.extra.push(capture_empty(&e));
                }
            },
            Ok(Event::Start(e)) => {
                if !modeled(reader, &e, props) {
                    props.extra.push(capture_element(reader, &e)?);
                }
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"rPr" => break,
            Ok(Event::Eof) => {
                return Err(Error::Xml("unexpected EOF inside rPr".to_string()));
            },
            Err(e) => return Err(e.into()),
            _ => {},
        }
    }
    Ok(())
}

/// Parse a `w:drawing`, resolving the blip relationship against the package's
/// media parts. Unresolvable or unrecognized images dissolve into an empty
/// run rather than failing the whole decode.
fn parse_drawing(
    reader: &mut Reader<&[u8]>,
    rels: &Relationships,
    package: &OpcPackage,
) -> Result<Option<InlineImage>> {
    let mut width_emu: i64 = 914400;
    let mut height_emu: i64 = 914400;
    let mut embed_id: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"extent" => {
                    if let Some(cx) = attr_value(reader, &e, b"cx")
                        && let Ok(cx) = cx.parse::<i64>()
                    {
                        width_emu = cx;
                    }
                    if let Some(cy) = attr_value(reader, &e, b"cy")
                        && let Ok(cy) = cy.parse::<i64>()
                    {
                        height_emu = cy;
                    }
                },
                b"blip" => {
                    if embed_id.is_none() {
                        embed_id = attr_value(reader, &e, b"embed");
                    }
                },
                _ => {},
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"drawing" => break,
            Ok(Event::Eof) => {
                return Err(Error::Xml("unexpected EOF inside drawing".to_string()));
            },
            Err(e) => return Err(e.into()),
            _ => {},
        }
    }

    let Some(embed_id) = embed_id else {
        return Ok(None);
    };
    let Some(rel) = rels.get(&embed_id) else {
        return Ok(None);
    };
    let part_name = format!("word/{}", rel.target.trim_start_matches("/"));
    let Some(data) = package.part(&part_name) else {
        return Ok(None);
    };
    let Some(format) = ImageFormat::detect_from_bytes(data) else {
        return Ok(None);
    };

    Ok(Some(InlineImage::from_package(
        data.to_vec(),
        format,
        width_emu,
        height_emu,
        embed_id,
    )))
}

fn parse_table(
    reader: &mut Reader<&[u8]>,
    rels: &Relationships,
    package: &OpcPackage,
) -> Result<Table> {
    let mut rows = Vec::new();
    let mut style = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"tblPr" => style = parse_table_style(reader)?,
                b"tr" => rows.push(parse_row(reader, rels, package)?),
                _ => skip_element(reader, &e)?,
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"tbl" => break,
            Ok(Event::Eof) => {
                return Err(Error::Xml("unexpected EOF inside table".to_string()));
            },
            Err(e) => return Err(e.into()),
            _ => {},
        }
    }

    Ok(Table::from_rows(rows, style))
}

fn parse_table_style(reader: &mut Reader<&[u8]>) -> Result<Option<String>> {
    let mut style = None;
    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.local_name().as_ref() == b"tblStyle" =>
            {
                style = attr_value(reader, &e, b"val");
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"tblPr" => break,
            Ok(Event::Eof) => {
                return Err(Error::Xml("unexpected EOF inside tblPr".to_string()));
            },
            Err(e) => return Err(e.into()),
            _ => {},
        }
    }
    Ok(style)
}

fn parse_row(
    reader: &mut Reader<&[u8]>,
    rels: &Relationships,
    package: &OpcPackage,
) -> Result<Row> {
    let mut cells = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"tc" => cells.push(parse_cell(reader, rels, package)?),
                _ => skip_element(reader, &e)?,
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"tr" => break,
            Ok(Event::Eof) => {
                return Err(Error::Xml("unexpected EOF inside table row".to_string()));
            },
            Err(e) => return Err(e.into()),
            _ => {},
        }
    }
    Ok(Row { cells })
}

fn parse_cell(
    reader: &mut Reader<&[u8]>,
    rels: &Relationships,
    package: &OpcPackage,
) -> Result<Cell> {
    let mut blocks = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => blocks.push(Block::Paragraph(parse_paragraph(reader, rels, package)?)),
                b"tbl" => blocks.push(Block::Table(parse_table(reader, rels, package)?)),
                b"sdt" | b"sdtContent" => {},
                b"sdtPr" | b"sdtEndPr" => skip_element(reader, &e)?,
                _ => skip_element(reader, &e)?,
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"p" => {
                blocks.push(Block::Paragraph(Paragraph::new()));
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"tc" => break,
            Ok(Event::Eof) => {
                return Err(Error::Xml("unexpected EOF inside table cell".to_string()));
            },
            Err(e) => return Err(e.into()),
            _ => {},
        }
    }
    if blocks.is_empty() {
        blocks.push(Block::Paragraph(Paragraph::new()));
    }
    Ok(Cell { blocks })
}

fn parse_sect_pr(reader: &mut Reader<&[u8]>) -> Result<Section> {
    let mut section = Section::default();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"pgSz" => {
                    if let Some(w) = attr_value(reader, &e, b"w")
                        && let Ok(w) = w.parse::<u32>()
                    {
                        section.page_width = w;
                    }
                    if let Some(h) = attr_value(reader, &e, b"h")
                        && let Ok(h) = h.parse::<u32>()
                    {
                        section.page_height = h;
                    }
                },
                b"pgMar" => {
                    for (attr, slot) in [
                        (b"top".as_slice(), &mut section.margin_top),
                        (b"bottom".as_slice(), &mut section.margin_bottom),
                        (b"left".as_slice(), &mut section.margin_left),
                        (b"right".as_slice(), &mut section.margin_right),
                    ] {
                        if let Some(v) = attr_value(reader, &e, attr)
                            && let Ok(v) = v.parse::<u32>()
                        {
                            *slot = v;
                        }
                    }
                },
                _ => {},
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"sectPr" => break,
            Ok(Event::Eof) => {
                return Err(Error::Xml("unexpected EOF inside sectPr".to_string()));
            },
            Err(e) => return Err(e.into()),
            _ => {},
        }
    }
    Ok(section)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> (Vec<Block>, Section) {
        parse_document(xml.as_bytes(), &Relationships::new(), &OpcPackage::new()).unwrap()
    }

    const NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

    #[test]
    fn parses_paragraphs_with_runs() {
        let xml = format!(
            r#"<w:document {NS}><w:body>
              <w:p><w:pPr><w:pStyle w:val="Heading1"/><w:jc w:val="center"/></w:pPr>
                <w:r><w:rPr><w:b/><w:sz w:val="28"/></w:rPr><w:t>Bold </w:t></w:r>
                <w:r><w:t xml:space="preserve">and plain</w:t></w:r>
              </w:p>
            </w:body></w:document>"#
        );
        let (blocks, _) = parse(&xml);
        assert_eq!(blocks.len(), 1);
        let Block::Paragraph(para) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(para.style.as_deref(), Some("Heading1"));
        assert_eq!(para.alignment, Some(Alignment::Center));
        assert_eq!(para.runs.len(), 2);
        assert_eq!(para.runs[0].properties.bold, Some(true));
        assert_eq!(para.runs[0].properties.size_half_points, Some(28));
        assert_eq!(para.text(), "Bold and plain");
    }

    #[test]
    fn unescapes_text_entities() {
        let xml = format!(
            r#"<w:document {NS}><w:body><w:p><w:r><w:t>a &amp; b &lt;c&gt;</w:t></w:r></w:p></w:body></w:document>"#
        );
        let (blocks, _) = parse(&xml);
        let Block::Paragraph(para) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(para.text(), "a & b <c>");
    }

    #[test]
    fn parses_tables_with_cells() {
        let xml = format!(
            r#"<w:document {NS}><w:body>
              <w:tbl>
                <w:tblPr><w:tblStyle w:val="TableGrid"/></w:tblPr>
                <w:tr><w:tc><w:p><w:r><w:t>r0c0</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>r0c1</w:t></w:r></w:p></w:tc></w:tr>
                <w:tr><w:tc><w:p><w:r><w:t>r1c0</w:t></w:r></w:p></w:tc><w:tc><w:p/></w:tc></w:tr>
              </w:tbl>
            </w:body></w:document>"#
        );
        let (blocks, _) = parse(&xml);
        let Block::Table(table) = &blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.col_count(), 2);
        assert_eq!(table.style.as_deref(), Some("TableGrid"));
        assert_eq!(table.cell(0, 1).unwrap().text(), "r0c1");
        assert_eq!(table.cell(1, 1).unwrap().text(), "");
    }

    #[test]
    fn parses_body_section() {
        let xml = format!(
            r#"<w:document {NS}><w:body>
              <w:p><w:r><w:t>x</w:t></w:r></w:p>
              <w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="720" w:right="720" w:bottom="720" w:left="720"/></w:sectPr>
            </w:body></w:document>"#
        );
        let (_, section) = parse(&xml);
        assert_eq!(section.page_width, 11906);
        assert_eq!(section.margin_left, 720);
    }

    #[test]
    fn off_toggle_values_parse_as_false() {
        let xml = format!(
            r#"<w:document {NS}><w:body><w:p>
              <w:r><w:rPr><w:b w:val="0"/><w:u w:val="none"/></w:rPr><w:t>t</w:t></w:r>
            </w:p></w:body></w:document>"#
        );
        let (blocks, _) = parse(&xml);
        let Block::Paragraph(para) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(para.runs[0].properties.bold, Some(false));
        assert_eq!(para.runs[0].properties.underline, Some(false));
    }

    #[test]
    fn hyperlink_runs_keep_their_reference() {
        let xml = format!(
            r#"<w:document {NS} xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body><w:p>
              <w:r><w:t>see </w:t></w:r>
              <w:hyperlink r:id="rId9"><w:r><w:t>linked</w:t></w:r></w:hyperlink>
            </w:p></w:body></w:document>"#
        );
        let (blocks, _) = parse(&xml);
        let Block::Paragraph(para) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(para.text(), "see linked");
        assert_eq!(para.runs[0].hyperlink, None);
        let link = para.runs[1].hyperlink.as_ref().unwrap();
        assert_eq!(link.rel_id.as_deref(), Some("rId9"));
        assert_eq!(link.anchor, None);
    }

    #[test]
    fn content_control_paragraphs_join_the_body() {
        let xml = format!(
            r#"<w:document {NS}><w:body>
              <w:p><w:r><w:t>before</w:t></w:r></w:p>
              <w:sdt>
                <w:sdtPr><w:alias w:val="Title"/></w:sdtPr>
                <w:sdtContent><w:p><w:r><w:t>wrapped</w:t></w:r></w:p></w:sdtContent>
              </w:sdt>
              <w:p><w:r><w:t>after</w:t></w:r></w:p>
            </w:body></w:document>"#
        );
        let (blocks, _) = parse(&xml);
        let texts: Vec<String> = blocks
            .iter()
            .map(|b| match b {
                Block::Paragraph(p) => p.text(),
                Block::Table(_) => panic!("expected paragraphs only"),
            })
            .collect();
        assert_eq!(texts, ["before", "wrapped", "after"]);
    }

    #[test]
    fn tracked_insertions_are_unwrapped() {
        let xml = format!(
            r#"<w:document {NS}><w:body><w:p>
              <w:ins w:id="1" w:author="a"><w:r><w:t>inserted</w:t></w:r></w:ins>
            </w:p></w:body></w:document>"#
        );
        let (blocks, _) = parse(&xml);
        let Block::Paragraph(para) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(para.text(), "inserted");
    }

    #[test]
    fn unmodeled_properties_are_retained_raw() {
        let xml = format!(
            r#"<w:document {NS}><w:body><w:p>
              <w:pPr><w:ind w:left="720"/><w:numPr><w:ilvl w:val="0"/><w:numId w:val="2"/></w:numPr></w:pPr>
              <w:r><w:rPr><w:strike/><w:highlight w:val="yellow"/></w:rPr><w:t>marked</w:t></w:r>
            </w:p></w:body></w:document>"#
        );
        let (blocks, _) = parse(&xml);
        let Block::Paragraph(para) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(para.extra_properties.len(), 2);
        assert_eq!(para.extra_properties[0], r#"<w:ind w:left="720"/>"#);
        assert!(para.extra_properties[1].starts_with("<w:numPr>"));
        assert!(para.extra_properties[1].contains(r#"<w:numId w:val="2"/>"#));
        let extra = &para.runs[0].properties.extra;
        assert_eq!(extra.len(), 2);
        assert_eq!(extra[0], "<w:strike/>");
        assert_eq!(extra[1], r#"<w:highlight w:val="yellow"/>"#);
    }
}
