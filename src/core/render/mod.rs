//! Spreadsheet rendering
//!
//! Turns selected columns plus transformed rows into a styled worksheet
//! with a frozen header row. Only the in-memory workbook is mutated; no
//! I/O happens here.

pub mod details;
pub mod styles;

use crate::domain::export_row::{ExportRow, FieldValue, RowRole};
use crate::registry::{ColumnDefinition, ColumnType, DatasetDefinition};
use crate::sheet::workbook::{date_serial, CellScalar, Workbook};

pub use details::render_product_details;
use styles::{cell_style, compact_row_height, header_style};

/// Render one dataset worksheet into the workbook
///
/// One row per export row, in the order the transformer emitted them.
pub fn render_dataset_sheet(
    workbook: &mut Workbook,
    dataset: &DatasetDefinition,
    columns: &[&ColumnDefinition],
    rows: &[ExportRow],
) {
    let ws = workbook.add_worksheet(dataset.label);
    ws.freeze_rows(1);

    for (index, column) in columns.iter().enumerate() {
        ws.set_column_width(index as u32, column.width);
        ws.set_cell_styled(
            0,
            index as u32,
            CellScalar::Text(column.label.to_string()),
            header_style(),
        );
    }

    for (row_index, row) in rows.iter().enumerate() {
        let sheet_row = row_index as u32 + 1;

        for (col_index, column) in columns.iter().enumerate() {
            let value = row.values.get(column.id).unwrap_or(&FieldValue::Null);
            let is_label_column = column.id == dataset.label_column;
            let scalar = coerce(value, column.column_type);
            let style = cell_style(column.column_type, row.role, is_label_column);
            ws.set_cell_styled(sheet_row, col_index as u32, scalar, style);
        }

        if row.role == RowRole::Compact {
            let lines = row
                .values
                .get(dataset.label_column)
                .and_then(|value| match value {
                    FieldValue::Text(text) => Some(text.lines().count()),
                    _ => None,
                })
                .unwrap_or(1);
            ws.set_row_height(sheet_row, compact_row_height(lines));
        }
    }
}

/// Coerce a field value into its cell scalar per the column semantic type
fn coerce(value: &FieldValue, column_type: ColumnType) -> CellScalar {
    if value.is_null() {
        return CellScalar::Blank;
    }

    match column_type {
        ColumnType::Currency => match value {
            FieldValue::Currency(cents) => CellScalar::Number(*cents as f64 / 100.0),
            FieldValue::Number(n) => CellScalar::Number(*n),
            other => text_scalar(other),
        },
        ColumnType::Number => match value {
            FieldValue::Number(n) => CellScalar::Number(*n),
            FieldValue::Currency(cents) => CellScalar::Number(*cents as f64 / 100.0),
            other => text_scalar(other),
        },
        ColumnType::DateTime | ColumnType::Date => match value {
            FieldValue::Timestamp(ts) => CellScalar::Number(date_serial(ts)),
            other => text_scalar(other),
        },
        ColumnType::Boolean => match value {
            FieldValue::Bool(b) => CellScalar::Bool(*b),
            other => text_scalar(other),
        },
        ColumnType::Text => text_scalar(value),
    }
}

/// Default coercion: stringify whatever is left
fn text_scalar(value: &FieldValue) -> CellScalar {
    match value {
        FieldValue::Text(text) => CellScalar::Text(text.clone()),
        FieldValue::Number(n) => CellScalar::Text(n.to_string()),
        FieldValue::Currency(cents) => {
            CellScalar::Text(crate::domain::export_row::format_eur(*cents))
        }
        FieldValue::Bool(b) => CellScalar::Text(if *b { "Ja" } else { "Nein" }.to_string()),
        FieldValue::Timestamp(ts) => CellScalar::Text(ts.to_rfc3339()),
        FieldValue::Null => CellScalar::Blank,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::export_row::ExportRow;
    use crate::registry;
    use std::collections::HashMap;

    fn submissions_columns(ids: &[&str]) -> Vec<&'static ColumnDefinition> {
        ids.iter()
            .map(|id| registry::column_def("submissions", id).unwrap())
            .collect()
    }

    #[test]
    fn test_header_and_freeze() {
        let dataset = registry::dataset("submissions").unwrap();
        let columns = submissions_columns(&["created_at", "artikel"]);
        let rows = vec![];

        let mut workbook = Workbook::new();
        render_dataset_sheet(&mut workbook, dataset, &columns, &rows);

        let ws = &workbook.worksheets()[0];
        assert_eq!(ws.name(), "Einreichungen");
        assert_eq!(ws.frozen_rows(), 1);
        assert_eq!(
            ws.cell(0, 1).unwrap().value,
            CellScalar::Text("Artikel".to_string())
        );
    }

    #[test]
    fn test_currency_cell_value_in_euros() {
        let dataset = registry::dataset("submissions").unwrap();
        let columns = submissions_columns(&["gesamtwert"]);
        let rows = vec![ExportRow::new(
            RowRole::Standalone,
            HashMap::from([("gesamtwert".to_string(), FieldValue::Currency(1350))]),
        )];

        let mut workbook = Workbook::new();
        render_dataset_sheet(&mut workbook, dataset, &columns, &rows);

        let ws = &workbook.worksheets()[0];
        assert_eq!(ws.cell(1, 0).unwrap().value, CellScalar::Number(13.5));
    }

    #[test]
    fn test_null_values_render_blank() {
        let dataset = registry::dataset("submissions").unwrap();
        let columns = submissions_columns(&["created_at", "einzelwert", "artikel"]);
        let rows = vec![ExportRow::new(
            RowRole::Standalone,
            HashMap::from([
                ("created_at".to_string(), FieldValue::Null),
                ("einzelwert".to_string(), FieldValue::Null),
                ("artikel".to_string(), FieldValue::Text(String::new())),
            ]),
        )];

        let mut workbook = Workbook::new();
        render_dataset_sheet(&mut workbook, dataset, &columns, &rows);

        let ws = &workbook.worksheets()[0];
        for col in 0..3 {
            assert_eq!(ws.cell(1, col).unwrap().value, CellScalar::Blank);
        }
    }

    #[test]
    fn test_compact_row_height_follows_label_lines() {
        let dataset = registry::dataset("submissions").unwrap();
        let columns = submissions_columns(&["artikel"]);
        let label = (0..7).map(|i| format!("└ P{i}")).collect::<Vec<_>>().join("\n");
        let rows = vec![ExportRow::grouped(
            RowRole::Compact,
            "grp-1".to_string(),
            HashMap::from([("artikel".to_string(), FieldValue::Text(label))]),
        )];

        let mut workbook = Workbook::new();
        render_dataset_sheet(&mut workbook, dataset, &columns, &rows);

        let ws = &workbook.worksheets()[0];
        // 7 lines × 15 = 105, inside the clamp range
        assert_eq!(ws.row_height(1), Some(105.0));
    }

    #[test]
    fn test_boolean_coercion() {
        assert_eq!(coerce(&FieldValue::Bool(true), ColumnType::Boolean), CellScalar::Bool(true));
        assert_eq!(
            coerce(&FieldValue::Bool(false), ColumnType::Text),
            CellScalar::Text("Nein".to_string())
        );
    }

    #[test]
    fn test_datetime_coercion_is_serial() {
        let ts = "1900-01-01T12:00:00Z".parse().unwrap();
        assert_eq!(
            coerce(&FieldValue::Timestamp(ts), ColumnType::DateTime),
            CellScalar::Number(2.5)
        );
    }
}
