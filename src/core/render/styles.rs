//! Cell style selection
//!
//! Styling is a pure function from (column semantic type, row structural
//! role) to a declarative style descriptor; the writer deduplicates the
//! descriptors into style indices. Formatting logic stays decoupled from
//! value writing.

use crate::domain::export_row::RowRole;
use crate::registry::ColumnType;
use crate::sheet::styles::{
    Alignment, CellStyle, Fill, Font, HorizontalAlign, VerticalAlign,
};

/// Header row fill
pub const HEADER_FILL: &str = "FFD9D9D9";
/// Highlight fill for group parent rows
pub const PARENT_FILL: &str = "FFFFE699";
/// Lighter fill for group child rows
pub const CHILD_FILL: &str = "FFF2F2F2";
/// Fill for separator rows on the product detail sheet
pub const SEPARATOR_FILL: &str = "FFBDD7EE";

/// Fixed display masks (German locale)
pub const CURRENCY_FORMAT: &str = "#,##0.00 \"€\"";
pub const NUMBER_FORMAT: &str = "#,##0";
pub const DATETIME_FORMAT: &str = "dd.mm.yyyy hh:mm";
pub const DATE_FORMAT: &str = "dd.mm.yyyy";

/// Style of the frozen header row
pub fn header_style() -> CellStyle {
    CellStyle {
        font: Some(Font {
            bold: true,
            color: None,
        }),
        fill: Some(Fill::solid(HEADER_FILL)),
        ..Default::default()
    }
}

/// Style of one data cell
///
/// `is_label_column` marks the dataset's primary label column, which
/// carries the indent (child rows) and wrap/top-align treatment (compact
/// rows).
pub fn cell_style(column_type: ColumnType, role: RowRole, is_label_column: bool) -> CellStyle {
    let mut style = CellStyle::default();
    let mut alignment = Alignment::default();

    match column_type {
        ColumnType::Currency => {
            style.number_format = Some(CURRENCY_FORMAT.to_string());
            alignment.horizontal = Some(HorizontalAlign::Right);
        }
        ColumnType::Number => {
            style.number_format = Some(NUMBER_FORMAT.to_string());
            alignment.horizontal = Some(HorizontalAlign::Right);
        }
        ColumnType::DateTime => {
            style.number_format = Some(DATETIME_FORMAT.to_string());
        }
        ColumnType::Date => {
            style.number_format = Some(DATE_FORMAT.to_string());
        }
        ColumnType::Boolean => {
            alignment.horizontal = Some(HorizontalAlign::Center);
        }
        ColumnType::Text => {}
    }

    match role {
        RowRole::Parent => {
            style.font = Some(Font {
                bold: true,
                color: None,
            });
            style.fill = Some(Fill::solid(PARENT_FILL));
        }
        RowRole::Child => {
            style.fill = Some(Fill::solid(CHILD_FILL));
            // Child rows keep right alignment only on value-bearing
            // columns
            if column_type == ColumnType::Number {
                alignment.horizontal = None;
            }
            if is_label_column {
                alignment.indent = 1;
            }
        }
        RowRole::Compact => {
            if is_label_column {
                alignment.wrap_text = true;
                alignment.vertical = Some(VerticalAlign::Top);
            }
        }
        RowRole::Standalone => {}
    }

    if alignment != Alignment::default() {
        style.alignment = Some(alignment);
    }
    style
}

/// Row height of a compact row with the given number of label lines
pub fn compact_row_height(line_count: usize) -> f64 {
    (line_count as f64 * 15.0).clamp(60.0, 150.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_parent_cells_bold_and_highlighted() {
        let style = cell_style(ColumnType::Text, RowRole::Parent, false);
        assert!(style.font.as_ref().unwrap().bold);
        assert_eq!(style.fill.as_ref().unwrap().fg_color.as_deref(), Some(PARENT_FILL));
    }

    #[test]
    fn test_child_label_column_indented() {
        let style = cell_style(ColumnType::Text, RowRole::Child, true);
        assert_eq!(style.alignment.as_ref().unwrap().indent, 1);
        assert_eq!(style.fill.as_ref().unwrap().fg_color.as_deref(), Some(CHILD_FILL));
    }

    #[test]
    fn test_child_number_column_loses_right_alignment() {
        let number = cell_style(ColumnType::Number, RowRole::Child, false);
        assert!(number
            .alignment
            .as_ref()
            .map(|a| a.horizontal.is_none())
            .unwrap_or(true));

        // Value-bearing columns keep it
        let currency = cell_style(ColumnType::Currency, RowRole::Child, false);
        assert_eq!(
            currency.alignment.as_ref().unwrap().horizontal,
            Some(HorizontalAlign::Right)
        );
    }

    #[test]
    fn test_compact_label_wraps_top_aligned() {
        let style = cell_style(ColumnType::Text, RowRole::Compact, true);
        let alignment = style.alignment.as_ref().unwrap();
        assert!(alignment.wrap_text);
        assert_eq!(alignment.vertical, Some(VerticalAlign::Top));

        // Other compact cells stay untouched
        let other = cell_style(ColumnType::Text, RowRole::Compact, false);
        assert!(other.alignment.is_none());
    }

    #[test]
    fn test_boolean_centered() {
        let style = cell_style(ColumnType::Boolean, RowRole::Standalone, false);
        assert_eq!(
            style.alignment.as_ref().unwrap().horizontal,
            Some(HorizontalAlign::Center)
        );
    }

    #[test_case(1, 60.0; "single line clamps up to minimum")]
    #[test_case(3, 60.0; "three lines still at minimum")]
    #[test_case(6, 90.0; "six lines scale linearly")]
    #[test_case(20, 150.0; "many lines clamp at maximum")]
    fn test_compact_row_height(lines: usize, expected: f64) {
        assert_eq!(compact_row_height(lines), expected);
    }
}
