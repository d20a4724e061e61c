//! Secondary "Produktdetails" worksheet
//!
//! Collects every compact row's product details, sorts them, and renders
//! one data row per product with a highlighted separator whenever the
//! (container, location) pair changes.

use crate::domain::export_row::{ProductDetail, RowRole};
use crate::registry::ColumnType;
use crate::sheet::styles::{CellStyle, Fill, Font};
use crate::sheet::workbook::{date_serial, CellScalar, Workbook};

use super::styles::{cell_style, header_style, SEPARATOR_FILL};

/// Fixed column layout of the detail sheet
const DETAIL_COLUMNS: &[(&str, f64, ColumnType)] = &[
    ("Datum", 12.0, ColumnType::Date),
    ("Gebietsleiter", 22.0, ColumnType::Text),
    ("Markt", 24.0, ColumnType::Text),
    ("Welle", 18.0, ColumnType::Text),
    ("Palette/Kiste", 18.0, ColumnType::Text),
    ("Produkt", 32.0, ColumnType::Text),
    ("Menge", 10.0, ColumnType::Number),
    ("Einzelwert", 13.0, ColumnType::Currency),
    ("Gesamtwert", 13.0, ColumnType::Currency),
];

/// Render the product detail sheet into the workbook
///
/// Does nothing when there are no details to show.
pub fn render_product_details(workbook: &mut Workbook, details: &[ProductDetail]) {
    if details.is_empty() {
        return;
    }

    let mut sorted: Vec<&ProductDetail> = details.iter().collect();
    sorted.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.owner_name.cmp(&b.owner_name))
            .then_with(|| a.location_name.cmp(&b.location_name))
            .then_with(|| a.container_name.cmp(&b.container_name))
    });

    let ws = workbook.add_worksheet("Produktdetails");
    ws.freeze_rows(1);

    for (col, (label, width, _)) in DETAIL_COLUMNS.iter().enumerate() {
        ws.set_column_width(col as u32, *width);
        ws.set_cell_styled(
            0,
            col as u32,
            CellScalar::Text((*label).to_string()),
            header_style(),
        );
    }

    let separator_style = CellStyle {
        font: Some(Font {
            bold: true,
            color: None,
        }),
        fill: Some(Fill::solid(SEPARATOR_FILL)),
        ..Default::default()
    };

    let mut row = 1u32;
    let mut previous_break: Option<(String, String)> = None;

    for detail in sorted {
        let break_key = (detail.container_name.clone(), detail.location_name.clone());
        if previous_break.as_ref() != Some(&break_key) {
            ws.set_cell_styled(
                row,
                0,
                CellScalar::Text(format!(
                    "{} / {}",
                    detail.container_name, detail.location_name
                )),
                separator_style.clone(),
            );
            for col in 1..DETAIL_COLUMNS.len() as u32 {
                ws.set_cell_styled(row, col, CellScalar::Blank, separator_style.clone());
            }
            previous_break = Some(break_key);
            row += 1;
        }

        let scalars = [
            CellScalar::Number(date_serial(&detail.date)),
            CellScalar::Text(detail.owner_name.clone()),
            CellScalar::Text(detail.location_name.clone()),
            CellScalar::Text(detail.wave_name.clone()),
            CellScalar::Text(detail.container_name.clone()),
            CellScalar::Text(detail.product_name.clone()),
            CellScalar::Number(detail.quantity as f64),
            CellScalar::Number(detail.unit_value_cents as f64 / 100.0),
            CellScalar::Number(detail.line_total_cents as f64 / 100.0),
        ];

        for (col, (scalar, (_, _, column_type))) in
            scalars.into_iter().zip(DETAIL_COLUMNS.iter()).enumerate()
        {
            ws.set_cell_styled(
                row,
                col as u32,
                scalar,
                cell_style(*column_type, RowRole::Standalone, false),
            );
        }
        row += 1;
    }
}
