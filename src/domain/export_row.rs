//! Transformed export rows
//!
//! `ExportRow` is the unit handed from the Row Transformer to the
//! Spreadsheet Renderer. It carries the caller-selected column values
//! plus structural metadata describing how the row participates in a
//! grouped container submission. Never persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Structural role of an export row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowRole {
    /// A record that is not part of any container group
    Standalone,
    /// Group header row in expanded mode (one per container)
    Parent,
    /// Group member row in expanded mode
    Child,
    /// Whole group collapsed into a single multi-line row
    Compact,
}

/// A single cell value before spreadsheet coercion
///
/// The semantic type lives on the column definition; this enum only
/// distinguishes the value shapes the renderer has to handle. Currency
/// is integer cents so group sums stay exact.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Currency(i64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Whether the renderer should leave the cell empty
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
            || matches!(self, FieldValue::Text(s) if s.is_empty())
    }
}

/// Format integer cents as a Euro amount, e.g. `€13.50`
pub fn format_eur(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!("{sign}€{}.{:02}", cents / 100, cents % 100)
}

/// Denormalized per-product contribution to a container group
///
/// Feeds only the secondary "Produktdetails" worksheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDetail {
    pub date: DateTime<Utc>,
    pub owner_name: String,
    pub location_name: String,
    pub wave_name: String,
    pub container_name: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_value_cents: i64,
    pub line_total_cents: i64,
}

/// One flattened, role-tagged output row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    /// Structural metadata, always present regardless of column selection
    pub role: RowRole,
    /// Group membership, `None` for standalone rows
    pub group_id: Option<String>,
    /// Exactly the caller-selected columns, keyed by column id
    pub values: HashMap<String, FieldValue>,
    /// Per-member details, only on compact rows of the submissions dataset
    pub product_details: Vec<ProductDetail>,
}

impl ExportRow {
    /// Create a row with no group membership and no details
    pub fn new(role: RowRole, values: HashMap<String, FieldValue>) -> Self {
        Self {
            role,
            group_id: None,
            values,
            product_details: Vec::new(),
        }
    }

    /// Create a row belonging to a group
    pub fn grouped(role: RowRole, group_id: String, values: HashMap<String, FieldValue>) -> Self {
        Self {
            role,
            group_id: Some(group_id),
            values,
            product_details: Vec::new(),
        }
    }

    /// Attach the per-member product details (compact submissions rows)
    pub fn with_details(mut self, details: Vec<ProductDetail>) -> Self {
        self.product_details = details;
        self
    }
}
