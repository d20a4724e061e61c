//! Dataset registry
//!
//! Static, versioned-with-the-code catalog of every exportable dataset:
//! its label, backing relation, join requirement and ordered column
//! definitions. Pure lookups, no I/O; unknown ids yield `None`/empty
//! results, never an error.

use serde::Serialize;

/// Semantic type of an export column, drives cell coercion and styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Number,
    Currency,
    DateTime,
    Date,
    Boolean,
}

impl ColumnType {
    /// Numeric columns get right alignment and a fixed display mask
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Number | ColumnType::Currency)
    }
}

/// Immutable column configuration
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ColumnDefinition {
    pub id: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Display width hint in Excel character units
    pub width: f64,
    /// Selected when the caller does not pick columns explicitly
    #[serde(rename = "default")]
    pub default_selected: bool,
}

/// Immutable dataset configuration
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DatasetDefinition {
    pub id: &'static str,
    pub label: &'static str,
    /// Backing relation in the data source
    pub relation: &'static str,
    /// Whether rows must be joined against foreign entities
    pub requires_join: bool,
    /// Column that carries the item/name label; receives the indent,
    /// wrap and row-height treatment for grouped rows
    pub label_column: &'static str,
    pub columns: &'static [ColumnDefinition],
}

const SUBMISSIONS_COLUMNS: &[ColumnDefinition] = &[
    ColumnDefinition { id: "created_at", label: "Datum", column_type: ColumnType::DateTime, width: 18.0, default_selected: true },
    ColumnDefinition { id: "gebietsleiter", label: "Gebietsleiter", column_type: ColumnType::Text, width: 22.0, default_selected: true },
    ColumnDefinition { id: "markt", label: "Markt", column_type: ColumnType::Text, width: 24.0, default_selected: true },
    ColumnDefinition { id: "markt_ort", label: "Ort", column_type: ColumnType::Text, width: 16.0, default_selected: false },
    ColumnDefinition { id: "welle", label: "Welle", column_type: ColumnType::Text, width: 18.0, default_selected: true },
    ColumnDefinition { id: "artikel", label: "Artikel", column_type: ColumnType::Text, width: 42.0, default_selected: true },
    ColumnDefinition { id: "menge", label: "Menge", column_type: ColumnType::Number, width: 10.0, default_selected: true },
    ColumnDefinition { id: "einzelwert", label: "Einzelwert", column_type: ColumnType::Currency, width: 13.0, default_selected: true },
    ColumnDefinition { id: "gesamtwert", label: "Gesamtwert", column_type: ColumnType::Currency, width: 13.0, default_selected: true },
    ColumnDefinition { id: "fotos", label: "Fotos", column_type: ColumnType::Number, width: 8.0, default_selected: false },
];

const GEBIETSLEITER_COLUMNS: &[ColumnDefinition] = &[
    ColumnDefinition { id: "name", label: "Name", column_type: ColumnType::Text, width: 24.0, default_selected: true },
    ColumnDefinition { id: "email", label: "E-Mail", column_type: ColumnType::Text, width: 28.0, default_selected: true },
    ColumnDefinition { id: "telefon", label: "Telefon", column_type: ColumnType::Text, width: 18.0, default_selected: true },
    ColumnDefinition { id: "region", label: "Region", column_type: ColumnType::Text, width: 16.0, default_selected: true },
    ColumnDefinition { id: "aktiv", label: "Aktiv", column_type: ColumnType::Boolean, width: 9.0, default_selected: true },
    ColumnDefinition { id: "created_at", label: "Angelegt am", column_type: ColumnType::DateTime, width: 18.0, default_selected: false },
];

const MAERKTE_COLUMNS: &[ColumnDefinition] = &[
    ColumnDefinition { id: "name", label: "Name", column_type: ColumnType::Text, width: 26.0, default_selected: true },
    ColumnDefinition { id: "strasse", label: "Straße", column_type: ColumnType::Text, width: 26.0, default_selected: true },
    ColumnDefinition { id: "plz", label: "PLZ", column_type: ColumnType::Text, width: 8.0, default_selected: true },
    ColumnDefinition { id: "ort", label: "Ort", column_type: ColumnType::Text, width: 18.0, default_selected: true },
    ColumnDefinition { id: "region", label: "Region", column_type: ColumnType::Text, width: 16.0, default_selected: false },
    ColumnDefinition { id: "aktiv", label: "Aktiv", column_type: ColumnType::Boolean, width: 9.0, default_selected: true },
    ColumnDefinition { id: "created_at", label: "Angelegt am", column_type: ColumnType::DateTime, width: 18.0, default_selected: false },
];

const WELLEN_COLUMNS: &[ColumnDefinition] = &[
    ColumnDefinition { id: "name", label: "Name", column_type: ColumnType::Text, width: 24.0, default_selected: true },
    ColumnDefinition { id: "beginn", label: "Beginn", column_type: ColumnType::Date, width: 12.0, default_selected: true },
    ColumnDefinition { id: "ende", label: "Ende", column_type: ColumnType::Date, width: 12.0, default_selected: true },
    ColumnDefinition { id: "aktiv", label: "Aktiv", column_type: ColumnType::Boolean, width: 9.0, default_selected: true },
    ColumnDefinition { id: "created_at", label: "Angelegt am", column_type: ColumnType::DateTime, width: 18.0, default_selected: false },
];

const DATASETS: &[DatasetDefinition] = &[
    DatasetDefinition {
        id: "submissions",
        label: "Einreichungen",
        relation: "submissions",
        requires_join: true,
        label_column: "artikel",
        columns: SUBMISSIONS_COLUMNS,
    },
    DatasetDefinition {
        id: "gebietsleiter",
        label: "Gebietsleiter",
        relation: "gebietsleiter",
        requires_join: false,
        label_column: "name",
        columns: GEBIETSLEITER_COLUMNS,
    },
    DatasetDefinition {
        id: "maerkte",
        label: "Märkte",
        relation: "maerkte",
        requires_join: false,
        label_column: "name",
        columns: MAERKTE_COLUMNS,
    },
    DatasetDefinition {
        id: "wellen",
        label: "Wellen",
        relation: "wellen",
        requires_join: false,
        label_column: "name",
        columns: WELLEN_COLUMNS,
    },
];

/// All registered datasets, in catalog order
pub fn all_datasets() -> &'static [DatasetDefinition] {
    DATASETS
}

/// Look up one dataset by id
pub fn dataset(dataset_id: &str) -> Option<&'static DatasetDefinition> {
    DATASETS.iter().find(|d| d.id == dataset_id)
}

/// All columns of a dataset; empty for an unknown id
pub fn all_columns(dataset_id: &str) -> &'static [ColumnDefinition] {
    dataset(dataset_id).map(|d| d.columns).unwrap_or(&[])
}

/// Default-selected columns of a dataset; empty for an unknown id
pub fn default_columns(dataset_id: &str) -> Vec<&'static ColumnDefinition> {
    all_columns(dataset_id)
        .iter()
        .filter(|c| c.default_selected)
        .collect()
}

/// Look up one column definition
pub fn column_def(dataset_id: &str, column_id: &str) -> Option<&'static ColumnDefinition> {
    all_columns(dataset_id).iter().find(|c| c.id == column_id)
}
