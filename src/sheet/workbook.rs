//! In-memory workbook and worksheet model
//!
//! The renderer mutates this model only; nothing touches disk or the
//! network until the workbook is serialized. Rows and columns are
//! 0-based here and converted to Excel's 1-based references at
//! serialization time.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

use super::styles::CellStyle;

/// A raw cell value before XML encoding
#[derive(Debug, Clone, PartialEq)]
pub enum CellScalar {
    Text(String),
    Number(f64),
    Bool(bool),
    /// No value, but the cell still carries its style (fills on padded
    /// group rows)
    Blank,
}

/// One cell: value plus optional style descriptor
#[derive(Debug, Clone)]
pub struct Cell {
    pub value: CellScalar,
    pub style: Option<CellStyle>,
}

/// A single worksheet under construction
#[derive(Debug, Default)]
pub struct Worksheet {
    name: String,
    cells: BTreeMap<(u32, u32), Cell>,
    col_widths: BTreeMap<u32, f64>,
    row_heights: BTreeMap<u32, f64>,
    freeze_rows: u32,
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set a cell value without styling
    pub fn set_cell(&mut self, row: u32, col: u32, value: CellScalar) {
        self.cells.insert((row, col), Cell { value, style: None });
    }

    /// Set a cell value with a style descriptor
    pub fn set_cell_styled(&mut self, row: u32, col: u32, value: CellScalar, style: CellStyle) {
        self.cells.insert(
            (row, col),
            Cell {
                value,
                style: Some(style),
            },
        );
    }

    /// Set the display width of a column (Excel character units)
    pub fn set_column_width(&mut self, col: u32, width: f64) {
        self.col_widths.insert(col, width);
    }

    /// Set an explicit row height in points
    pub fn set_row_height(&mut self, row: u32, height: f64) {
        self.row_heights.insert(row, height);
    }

    /// Freeze the top `rows` rows
    pub fn freeze_rows(&mut self, rows: u32) {
        self.freeze_rows = rows;
    }

    pub fn frozen_rows(&self) -> u32 {
        self.freeze_rows
    }

    /// Cells in (row, col) order
    pub fn cells(&self) -> impl Iterator<Item = (&(u32, u32), &Cell)> {
        self.cells.iter()
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn column_widths(&self) -> impl Iterator<Item = (&u32, &f64)> {
        self.col_widths.iter()
    }

    pub fn row_height(&self, row: u32) -> Option<f64> {
        self.row_heights.get(&row).copied()
    }

    /// Bounding box of the used cells as (min_row, min_col, max_row, max_col)
    pub fn used_range(&self) -> Option<(u32, u32, u32, u32)> {
        let mut range: Option<(u32, u32, u32, u32)> = None;
        for &(row, col) in self.cells.keys() {
            range = Some(match range {
                None => (row, col, row, col),
                Some((min_r, min_c, max_r, max_c)) => (
                    min_r.min(row),
                    min_c.min(col),
                    max_r.max(row),
                    max_c.max(col),
                ),
            });
        }
        range
    }
}

/// The in-memory document handed from the renderer to the serializer
///
/// Exclusively owned by a single export call for its entire lifetime.
#[derive(Debug, Default)]
pub struct Workbook {
    worksheets: Vec<Worksheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new worksheet and return it for filling
    pub fn add_worksheet(&mut self, name: impl Into<String>) -> &mut Worksheet {
        self.worksheets.push(Worksheet::new(name));
        self.worksheets.last_mut().expect("just pushed")
    }

    pub fn worksheets(&self) -> &[Worksheet] {
        &self.worksheets
    }

    pub fn worksheet_count(&self) -> usize {
        self.worksheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }
}

/// Convert a 1-based column number to Excel letters (1 → A, 27 → AA)
pub fn column_to_letters(mut col: u32) -> String {
    let mut letters = String::new();
    while col > 0 {
        let rem = ((col - 1) % 26) as u8;
        letters.insert(0, (b'A' + rem) as char);
        col = (col - 1) / 26;
    }
    letters
}

/// Excel serial date value for a UTC timestamp
///
/// Excel counts days since 1899-12-30; the time of day is the
/// fractional part.
pub fn date_serial(ts: &DateTime<Utc>) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .expect("valid epoch date")
        .and_hms_opt(0, 0, 0)
        .expect("valid epoch time");
    let seconds = (ts.naive_utc() - epoch).num_seconds();
    seconds as f64 / 86_400.0
}

/// Excel serial date value for a calendar date
pub fn naive_date_serial(date: &NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).expect("valid epoch date");
    (*date - epoch).num_days() as f64
}
