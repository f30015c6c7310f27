//! Serialization of the document tree back into `word/document.xml`.

use super::document::Block;
use super::paragraph::{Paragraph, Run, RunContent};
use super::section::Section;
use super::table::{Cell, Table};
use crate::error::{Error, Result};
use std::fmt::Write as FmtWrite;

/// Escape XML special characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Serialize the body into a complete main document part.
///
/// Every anchored image must carry a relationship ID by the time this runs;
/// the codec assigns them before serializing.
pub(crate) fn write_document(blocks: &[Block], final_section: &Section) -> Result<String> {
    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(concat!(
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
        r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
        r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">"#,
    ));
    xml.push_str("<w:body>");

    let mut drawing_id: u32 = 1;
    for block in blocks {
        match block {
            Block::Paragraph(para) => write_paragraph(&mut xml, para, &mut drawing_id)?,
            Block::Table(table) => write_table(&mut xml, table, &mut drawing_id)?,
        }
    }

    write_sect_pr(&mut xml, final_section)?;
    xml.push_str("</w:body>");
    xml.push_str("</w:document>");
    Ok(xml)
}

fn write_paragraph(xml: &mut String, para: &Paragraph, drawing_id: &mut u32) -> Result<()> {
    xml.push_str("<w:p>");

    let has_props = para.style.is_some()
        || para.alignment.is_some()
        || para.section_break.is_some()
        || !para.extra_properties.is_empty();
    if has_props {
        xml.push_str("<w:pPr>");
        if let Some(ref style) = para.style {
            write!(xml, r#"<w:pStyle w:val="{}"/>"#, escape_xml(style))?;
        }
        for raw in &para.extra_properties {
            xml.push_str(raw);
        }
        if let Some(alignment) = para.alignment {
            write!(xml, r#"<w:jc w:val="{}"/>"#, alignment.as_str())?;
        }
        if let Some(ref section) = para.section_break {
            write_sect_pr(xml, section)?;
        }
        xml.push_str("</w:pPr>");
    }

    // Consecutive runs carrying the same hyperlink reference re-serialize
    // under one wrapper element.
    let mut runs = para.runs.iter().peekable();
    while let Some(run) = runs.next() {
        let Some(link) = &run.hyperlink else {
            write_run(xml, run, drawing_id)?;
            continue;
        };
        xml.push_str("<w:hyperlink");
        if let Some(ref id) = link.rel_id {
            write!(xml, r#" r:id="{}""#, escape_xml(id))?;
        }
        if let Some(ref anchor) = link.anchor {
            write!(xml, r#" w:anchor="{}""#, escape_xml(anchor))?;
        }
        xml.push('>');
        write_run(xml, run, drawing_id)?;
        while let Some(next) = runs.peek() {
            if next.hyperlink.as_ref() != Some(link) {
                break;
            }
            write_run(xml, runs.next().unwrap(), drawing_id)?;
        }
        xml.push_str("</w:hyperlink>");
    }

    xml.push_str("</w:p>");
    Ok(())
}

fn write_run(xml: &mut String, run: &Run, drawing_id: &mut u32) -> Result<()> {
    xml.push_str("<w:r>");

    if run.properties.has_properties() {
        xml.push_str("<w:rPr>");
        if let Some(ref font_name) = run.properties.font_name {
            let name = escape_xml(font_name);
            write!(xml, r#"<w:rFonts w:ascii="{name}" w:hAnsi="{name}"/>"#)?;
        }
        if let Some(bold) = run.properties.bold {
            if bold {
                xml.push_str("<w:b/>");
            } else {
                xml.push_str(r#"<w:b w:val="0"/>"#);
            }
        }
        if let Some(italic) = run.properties.italic {
            if italic {
                xml.push_str("<w:i/>");
            } else {
                xml.push_str(r#"<w:i w:val="0"/>"#);
            }
        }
        if let Some(ref color) = run.properties.color {
            write!(xml, r#"<w:color w:val="{}"/>"#, escape_xml(color))?;
        }
        if let Some(size) = run.properties.size_half_points {
            write!(xml, r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#)?;
        }
        if let Some(underline) = run.properties.underline {
            if underline {
                xml.push_str(r#"<w:u w:val="single"/>"#);
            } else {
                xml.push_str(r#"<w:u w:val="none"/>"#);
            }
        }
        for raw in &run.properties.extra {
            xml.push_str(raw);
        }
        xml.push_str("</w:rPr>");
    }

    match &run.content {
        RunContent::Text(text) => write_text(xml, text)?,
        RunContent::Image(img) => {
            let rel_id = img.rel_id.as_deref().ok_or_else(|| {
                Error::Xml("image run serialized before relationship assignment".to_string())
            })?;
            write_drawing(xml, rel_id, img.width_emu(), img.height_emu(), *drawing_id)?;
            *drawing_id += 1;
        },
    }

    for raw in &run.extra {
        xml.push_str(raw);
    }

    xml.push_str("</w:r>");
    Ok(())
}

/// Emit run text, turning newlines back into `w:br` and tabs into `w:tab`.
fn write_text(xml: &mut String, text: &str) -> Result<()> {
    let mut rest = text;
    while let Some(at) = rest.find(['\n', '\t']) {
        let (chunk, tail) = rest.split_at(at);
        if !chunk.is_empty() {
            write!(xml, r#"<w:t xml:space="preserve">{}</w:t>"#, escape_xml(chunk))?;
        }
        let mut chars = tail.chars();
        match chars.next() {
            Some('\t') => xml.push_str("<w:tab/>"),
            _ => xml.push_str("<w:br/>"),
        }
        rest = chars.as_str();
    }
    if !rest.is_empty() {
        write!(xml, r#"<w:t xml:space="preserve">{}</w:t>"#, escape_xml(rest))?;
    }
    Ok(())
}

fn write_drawing(
    xml: &mut String,
    rel_id: &str,
    width_emu: i64,
    height_emu: i64,
    id: u32,
) -> Result<()> {
    write!(
        xml,
        concat!(
            r#"<w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0">"#,
            r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
            r#"<wp:effectExtent l="0" t="0" r="0" b="0"/>"#,
            r#"<wp:docPr id="{id}" name="Picture {id}"/>"#,
            r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr>"#,
            r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:nvPicPr><pic:cNvPr id="{id}" name="Picture {id}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
            r#"<pic:blipFill><a:blip r:embed="{rid}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
            r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
            r#"</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>"#,
        ),
        cx = width_emu,
        cy = height_emu,
        id = id,
        rid = rel_id,
    )?;
    Ok(())
}

fn write_table(xml: &mut String, table: &Table, drawing_id: &mut u32) -> Result<()> {
    xml.push_str("<w:tbl>");

    xml.push_str("<w:tblPr>");
    if let Some(ref style) = table.style {
        write!(xml, r#"<w:tblStyle w:val="{}"/>"#, escape_xml(style))?;
    }
    xml.push_str(r#"<w:tblW w:w="0" w:type="auto"/>"#);
    xml.push_str("</w:tblPr>");

    xml.push_str("<w:tblGrid>");
    for _ in 0..table.col_count() {
        xml.push_str("<w:gridCol/>");
    }
    xml.push_str("</w:tblGrid>");

    for row in table.rows() {
        xml.push_str("<w:tr>");
        for cell in &row.cells {
            write_cell(xml, cell, drawing_id)?;
        }
        xml.push_str("</w:tr>");
    }

    xml.push_str("</w:tbl>");
    Ok(())
}

fn write_cell(xml: &mut String, cell: &Cell, drawing_id: &mut u32) -> Result<()> {
    xml.push_str("<w:tc>");
    // A cell must hold at least one paragraph to be a valid WordprocessingML
    if cell.blocks.is_empty() {
        xml.push_str("<w:p/>");
    }
    for block in &cell.blocks {
        match block {
            Block::Paragraph(para) => write_paragraph(xml, para, drawing_id)?,
            Block::Table(table) => write_table(xml, table, drawing_id)?,
        }
    }
    xml.push_str("</w:tc>");
    Ok(())
}

fn write_sect_pr(xml: &mut String, section: &Section) -> Result<()> {
    xml.push_str("<w:sectPr>");
    write!(
        xml,
        r#"<w:pgSz w:w="{}" w:h="{}"/>"#,
        section.page_width, section.page_height
    )?;
    write!(
        xml,
        r#"<w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="720" w:footer="720" w:gutter="0"/>"#,
        section.margin_top, section.margin_right, section.margin_bottom, section.margin_left
    )?;
    xml.push_str("</w:sectPr>");
    Ok(())
}
