//! XLSX package serializer
//!
//! Turns a finished in-memory [`Workbook`] into the bytes of an
//! OOXML-compatible `.xlsx` container: one worksheet part per sheet plus
//! the workbook, relationship, styles and shared-strings parts, zipped
//! with deflate.

use std::fmt::Write as FmtWrite;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::domain::{MerkurError, Result};

use super::escape_xml;
use super::strings::SharedStrings;
use super::styles::StylesBuilder;
use super::workbook::{column_to_letters, CellScalar, Workbook, Worksheet};

/// Serialize a workbook into `.xlsx` bytes
///
/// # Errors
///
/// Returns an error if the workbook has no worksheets or the container
/// cannot be written.
pub fn write_workbook(workbook: &Workbook) -> Result<Vec<u8>> {
    if workbook.is_empty() {
        return Err(MerkurError::Document(
            "workbook has no worksheets".to_string(),
        ));
    }

    let mut strings = SharedStrings::new();
    let mut styles = StylesBuilder::new();

    // Sheet XML fills the shared-strings and styles tables as a side
    // effect, so these parts must be generated first
    let sheet_xmls: Vec<String> = workbook
        .worksheets()
        .iter()
        .enumerate()
        .map(|(index, ws)| worksheet_xml(ws, index == 0, &mut strings, &mut styles))
        .collect();

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let add_part = |zip: &mut ZipWriter<Cursor<Vec<u8>>>, name: &str, content: &str| {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(name, options)
            .map_err(|e| MerkurError::Document(format!("Failed to start part {name}: {e}")))?;
        zip.write_all(content.as_bytes())
            .map_err(|e| MerkurError::Document(format!("Failed to write part {name}: {e}")))
    };

    add_part(&mut zip, "[Content_Types].xml", &content_types_xml(workbook))?;
    add_part(&mut zip, "_rels/.rels", PACKAGE_RELS)?;
    add_part(&mut zip, "xl/workbook.xml", &workbook_xml(workbook))?;
    add_part(
        &mut zip,
        "xl/_rels/workbook.xml.rels",
        &workbook_rels_xml(workbook),
    )?;
    for (index, sheet_xml) in sheet_xmls.iter().enumerate() {
        add_part(
            &mut zip,
            &format!("xl/worksheets/sheet{}.xml", index + 1),
            sheet_xml,
        )?;
    }
    add_part(&mut zip, "xl/styles.xml", &styles.to_xml())?;
    add_part(&mut zip, "xl/sharedStrings.xml", &strings.to_xml())?;

    let cursor = zip
        .finish()
        .map_err(|e| MerkurError::Document(format!("Failed to finish container: {e}")))?;
    Ok(cursor.into_inner())
}

const PACKAGE_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    r#"</Relationships>"#
);

fn content_types_xml(workbook: &Workbook) -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    for index in 0..workbook.worksheet_count() {
        let _ = write!(
            xml,
            r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            index + 1
        );
    }
    xml.push_str(r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#);
    xml.push_str("</Types>");
    xml
}

fn workbook_xml(workbook: &Workbook) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);
    xml.push_str("<sheets>");
    for (index, ws) in workbook.worksheets().iter().enumerate() {
        let _ = write!(
            xml,
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape_xml(ws.name()),
            index + 1,
            index + 1
        );
    }
    xml.push_str("</sheets></workbook>");
    xml
}

fn workbook_rels_xml(workbook: &Workbook) -> String {
    let sheet_count = workbook.worksheet_count();
    let mut xml = String::with_capacity(512);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    for index in 0..sheet_count {
        let _ = write!(
            xml,
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            index + 1,
            index + 1
        );
    }
    let _ = write!(
        xml,
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
        sheet_count + 1
    );
    let _ = write!(
        xml,
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
        sheet_count + 2
    );
    xml.push_str("</Relationships>");
    xml
}

/// Serialize one worksheet part
fn worksheet_xml(
    ws: &Worksheet,
    is_first: bool,
    strings: &mut SharedStrings,
    styles: &mut StylesBuilder,
) -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);

    // Dimension, 1-based references
    if let Some((min_row, min_col, max_row, max_col)) = ws.used_range() {
        let _ = write!(
            xml,
            r#"<dimension ref="{}{}:{}{}"/>"#,
            column_to_letters(min_col + 1),
            min_row + 1,
            column_to_letters(max_col + 1),
            max_row + 1
        );
    } else {
        xml.push_str(r#"<dimension ref="A1"/>"#);
    }

    // Sheet view with optional frozen header rows
    xml.push_str(r#"<sheetViews><sheetView workbookViewId="0""#);
    if is_first {
        xml.push_str(r#" tabSelected="1""#);
    }
    let frozen = ws.frozen_rows();
    if frozen > 0 {
        let top_left = format!("A{}", frozen + 1);
        let _ = write!(
            xml,
            r#"><pane ySplit="{frozen}" topLeftCell="{top_left}" activePane="bottomLeft" state="frozen"/><selection pane="bottomLeft" activeCell="{top_left}" sqref="{top_left}"/></sheetView>"#
        );
    } else {
        xml.push_str("/>");
    }
    xml.push_str("</sheetViews>");
    xml.push_str(r#"<sheetFormatPr defaultRowHeight="15"/>"#);

    // Column widths
    let mut widths = ws.column_widths().peekable();
    if widths.peek().is_some() {
        xml.push_str("<cols>");
        for (&col, &width) in widths {
            let _ = write!(
                xml,
                r#"<col min="{0}" max="{0}" width="{1}" customWidth="1"/>"#,
                col + 1,
                width
            );
        }
        xml.push_str("</cols>");
    }

    // Sheet data; cells iterate in (row, col) order
    xml.push_str("<sheetData>");
    let mut current_row: Option<u32> = None;
    for (&(row, col), cell) in ws.cells() {
        if current_row != Some(row) {
            if current_row.is_some() {
                xml.push_str("</row>");
            }
            let _ = write!(xml, r#"<row r="{}""#, row + 1);
            if let Some(height) = ws.row_height(row) {
                let _ = write!(xml, r#" ht="{height}" customHeight="1""#);
            }
            xml.push('>');
            current_row = Some(row);
        }

        let cell_ref = format!("{}{}", column_to_letters(col + 1), row + 1);
        let style_attr = match &cell.style {
            Some(style) => format!(r#" s="{}""#, styles.add_style(style)),
            None => String::new(),
        };
        match &cell.value {
            CellScalar::Text(text) => {
                let _ = write!(
                    xml,
                    r#"<c r="{}"{} t="s"><v>{}</v></c>"#,
                    cell_ref,
                    style_attr,
                    strings.add_string(text)
                );
            }
            CellScalar::Number(value) => {
                let _ = write!(xml, r#"<c r="{cell_ref}"{style_attr}><v>{value}</v></c>"#);
            }
            CellScalar::Bool(value) => {
                let _ = write!(
                    xml,
                    r#"<c r="{}"{} t="b"><v>{}</v></c>"#,
                    cell_ref,
                    style_attr,
                    if *value { 1 } else { 0 }
                );
            }
            CellScalar::Blank => {
                let _ = write!(xml, r#"<c r="{cell_ref}"{style_attr}/>"#);
            }
        }
    }
    if current_row.is_some() {
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData>");

    xml.push_str(r#"<pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>"#);
    xml.push_str("</worksheet>");
    xml
}
