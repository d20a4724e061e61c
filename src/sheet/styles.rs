//! styles.xml generator
//!
//! Collects the unique fonts, fills, number formats and cell formats
//! used across all worksheets, assigns indices, and generates the
//! complete styles.xml content. Style descriptors are plain data; the
//! builder deduplicates them so identical descriptors share one xf
//! record.

use std::collections::HashMap;
use std::fmt::Write as FmtWrite;

use super::escape_xml;

/// Font properties for a cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Font {
    pub bold: bool,
    pub color: Option<String>,
}

/// Fill pattern kinds used by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternType {
    None,
    Gray125,
    Solid,
}

impl PatternType {
    fn as_str(self) -> &'static str {
        match self {
            PatternType::None => "none",
            PatternType::Gray125 => "gray125",
            PatternType::Solid => "solid",
        }
    }
}

/// Fill properties for a cell (`fg_color` is ARGB hex)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fill {
    pub pattern_type: PatternType,
    pub fg_color: Option<String>,
}

impl Fill {
    pub fn solid(argb: impl Into<String>) -> Self {
        Self {
            pattern_type: PatternType::Solid,
            fg_color: Some(argb.into()),
        }
    }
}

/// Horizontal cell alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

impl HorizontalAlign {
    fn as_str(self) -> &'static str {
        match self {
            HorizontalAlign::Left => "left",
            HorizontalAlign::Center => "center",
            HorizontalAlign::Right => "right",
        }
    }
}

/// Vertical cell alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    Top,
    Center,
}

impl VerticalAlign {
    fn as_str(self) -> &'static str {
        match self {
            VerticalAlign::Top => "top",
            VerticalAlign::Center => "center",
        }
    }
}

/// Alignment properties of a cell format
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Alignment {
    pub horizontal: Option<HorizontalAlign>,
    pub vertical: Option<VerticalAlign>,
    pub wrap_text: bool,
    pub indent: u32,
}

impl Alignment {
    fn is_default(&self) -> bool {
        *self == Alignment::default()
    }
}

/// Declarative cell style descriptor
///
/// A pure value: the renderer derives one from (column type, row role)
/// and the builder maps equal descriptors onto one style index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CellStyle {
    pub font: Option<Font>,
    pub fill: Option<Fill>,
    pub number_format: Option<String>,
    pub alignment: Option<Alignment>,
}

impl CellStyle {
    pub fn bold() -> Self {
        Self {
            font: Some(Font {
                bold: true,
                color: None,
            }),
            ..Default::default()
        }
    }
}

/// Cell format record: indices into the dedup tables
#[derive(Debug, Clone, PartialEq)]
struct Xf {
    font_id: usize,
    fill_id: usize,
    num_fmt_id: usize,
    alignment: Option<Alignment>,
}

/// Builder for generating styles.xml content
#[derive(Debug)]
pub struct StylesBuilder {
    fonts: Vec<Font>,
    font_map: HashMap<Font, usize>,
    fills: Vec<Fill>,
    fill_map: HashMap<Fill, usize>,
    number_formats: Vec<String>,
    number_format_map: HashMap<String, usize>,
    cell_formats: Vec<Xf>,
    cell_format_map: HashMap<CellStyle, usize>,
}

impl StylesBuilder {
    /// Create a new builder preloaded with the formats Excel requires
    pub fn new() -> Self {
        let default_font = Font::default();
        let none_fill = Fill {
            pattern_type: PatternType::None,
            fg_color: None,
        };
        let gray_fill = Fill {
            pattern_type: PatternType::Gray125,
            fg_color: None,
        };

        let mut builder = Self {
            fonts: vec![default_font.clone()],
            font_map: HashMap::from([(default_font, 0)]),
            // The first two fills are fixed by the format
            fills: vec![none_fill.clone(), gray_fill.clone()],
            fill_map: HashMap::from([(none_fill, 0), (gray_fill, 1)]),
            number_formats: Vec::new(),
            number_format_map: HashMap::new(),
            cell_formats: Vec::new(),
            cell_format_map: HashMap::new(),
        };

        // Style index 0: the default cell format
        builder.cell_formats.push(Xf {
            font_id: 0,
            fill_id: 0,
            num_fmt_id: 0,
            alignment: None,
        });
        builder.cell_format_map.insert(CellStyle::default(), 0);

        builder
    }

    /// Add a style descriptor and return its style index
    ///
    /// Equal descriptors always map to the same index.
    pub fn add_style(&mut self, style: &CellStyle) -> usize {
        if let Some(&index) = self.cell_format_map.get(style) {
            return index;
        }

        let font_id = match &style.font {
            Some(font) => self.add_font(font),
            None => 0,
        };
        let fill_id = match &style.fill {
            Some(fill) => self.add_fill(fill),
            None => 0,
        };
        let num_fmt_id = match &style.number_format {
            Some(mask) => self.add_number_format(mask),
            None => 0,
        };
        let alignment = style.alignment.clone().filter(|a| !a.is_default());

        let index = self.cell_formats.len();
        self.cell_formats.push(Xf {
            font_id,
            fill_id,
            num_fmt_id,
            alignment,
        });
        self.cell_format_map.insert(style.clone(), index);
        index
    }

    fn add_font(&mut self, font: &Font) -> usize {
        if let Some(&index) = self.font_map.get(font) {
            return index;
        }
        let index = self.fonts.len();
        self.fonts.push(font.clone());
        self.font_map.insert(font.clone(), index);
        index
    }

    fn add_fill(&mut self, fill: &Fill) -> usize {
        if let Some(&index) = self.fill_map.get(fill) {
            return index;
        }
        let index = self.fills.len();
        self.fills.push(fill.clone());
        self.fill_map.insert(fill.clone(), index);
        index
    }

    fn add_number_format(&mut self, mask: &str) -> usize {
        if let Some(&index) = self.number_format_map.get(mask) {
            return index;
        }
        // Custom number formats start at index 164
        let index = 164 + self.number_formats.len();
        self.number_formats.push(mask.to_string());
        self.number_format_map.insert(mask.to_string(), index);
        index
    }

    /// Generate the complete styles.xml content
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if !self.number_formats.is_empty() {
            let _ = write!(xml, r#"<numFmts count="{}">"#, self.number_formats.len());
            for (i, mask) in self.number_formats.iter().enumerate() {
                let _ = write!(
                    xml,
                    r#"<numFmt numFmtId="{}" formatCode="{}"/>"#,
                    164 + i,
                    escape_xml(mask)
                );
            }
            xml.push_str("</numFmts>");
        }

        let _ = write!(xml, r#"<fonts count="{}">"#, self.fonts.len());
        for font in &self.fonts {
            xml.push_str("<font>");
            if font.bold {
                xml.push_str("<b/>");
            }
            xml.push_str(r#"<sz val="11"/>"#);
            if let Some(color) = &font.color {
                let _ = write!(xml, r#"<color rgb="{}"/>"#, escape_xml(color));
            }
            xml.push_str(r#"<name val="Calibri"/></font>"#);
        }
        xml.push_str("</fonts>");

        let _ = write!(xml, r#"<fills count="{}">"#, self.fills.len());
        for fill in &self.fills {
            let _ = write!(
                xml,
                r#"<fill><patternFill patternType="{}">"#,
                fill.pattern_type.as_str()
            );
            if let Some(fg) = &fill.fg_color {
                let _ = write!(xml, r#"<fgColor rgb="{}"/>"#, escape_xml(fg));
            }
            xml.push_str("</patternFill></fill>");
        }
        xml.push_str("</fills>");

        // The engine styles cells with fills and fonts only; a single
        // default border record satisfies the format
        xml.push_str(r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#);

        xml.push_str(r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);

        let _ = write!(xml, r#"<cellXfs count="{}">"#, self.cell_formats.len());
        for xf in &self.cell_formats {
            let _ = write!(
                xml,
                r#"<xf numFmtId="{}" fontId="{}" fillId="{}" borderId="0""#,
                xf.num_fmt_id, xf.font_id, xf.fill_id
            );
            if xf.font_id != 0 {
                xml.push_str(r#" applyFont="1""#);
            }
            if xf.fill_id != 0 {
                xml.push_str(r#" applyFill="1""#);
            }
            if xf.num_fmt_id != 0 {
                xml.push_str(r#" applyNumberFormat="1""#);
            }
            match &xf.alignment {
                Some(alignment) => {
                    xml.push_str(r#" applyAlignment="1">"#);
                    xml.push_str("<alignment");
                    if let Some(horizontal) = alignment.horizontal {
                        let _ = write!(xml, r#" horizontal="{}""#, horizontal.as_str());
                    }
                    if let Some(vertical) = alignment.vertical {
                        let _ = write!(xml, r#" vertical="{}""#, vertical.as_str());
                    }
                    if alignment.wrap_text {
                        xml.push_str(r#" wrapText="1""#);
                    }
                    if alignment.indent > 0 {
                        let _ = write!(xml, r#" indent="{}""#, alignment.indent);
                    }
                    xml.push_str("/></xf>");
                }
                None => xml.push_str("/>"),
            }
        }
        xml.push_str("</cellXfs>");

        xml.push_str(r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#);
        xml.push_str("</styleSheet>");
        xml
    }
}

impl Default for StylesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
