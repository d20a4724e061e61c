//! Records fetched from the relational store
//!
//! Every raw and join-resolved record is an explicit structure with
//! nullable foreign-key fields. Rows arrive from the data source as
//! field-keyed JSON objects and are decoded here in one place, so a
//! malformed row always surfaces as a `SourceError::InvalidRow` naming
//! its relation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::errors::SourceError;

/// A field-keyed row as returned by the relational data source
pub type SourceRow = serde_json::Value;

/// Decode one source row into a typed record
pub fn decode_row<T: DeserializeOwned>(relation: &str, row: &SourceRow) -> Result<T, SourceError> {
    serde_json::from_value(row.clone()).map_err(|e| SourceError::invalid_row(relation, e.to_string()))
}

/// Decode a batch of source rows into typed records
pub fn decode_rows<T: DeserializeOwned>(
    relation: &str,
    rows: &[SourceRow],
) -> Result<Vec<T>, SourceError> {
    rows.iter().map(|row| decode_row(relation, row)).collect()
}

/// Kind of a submitted promotional item
///
/// `Palette` and `Kiste` are physical containers: several records
/// submitted together under one of these form a single grouped
/// submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// Single promotional product
    #[default]
    Produkt,
    /// Point-of-sale display, submitted standalone
    Display,
    /// Pallet container
    Palette,
    /// Crate container
    Kiste,
}

impl ItemType {
    /// Whether this item type bundles several products into one container
    pub fn carries_container(self) -> bool {
        matches!(self, ItemType::Palette | ItemType::Kiste)
    }

    /// Human-readable label, also the container-name fallback of last resort
    pub fn label(self) -> &'static str {
        match self {
            ItemType::Produkt => "Produkt",
            ItemType::Display => "Display",
            ItemType::Palette => "Palette",
            ItemType::Kiste => "Kiste",
        }
    }
}

/// One unit of a promotional item submitted by a Gebietsleiter at a
/// Markt within a Welle
///
/// Fetched read-only; never mutated. Monetary values are integer cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSubmissionRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub owner_id: Option<i64>,
    pub location_id: Option<i64>,
    pub wave_id: Option<i64>,
    #[serde(default)]
    pub item_type: ItemType,
    pub item_id: Option<i64>,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub unit_value_cents: i64,
    #[serde(default)]
    pub photo_refs: Vec<String>,
}

fn default_quantity() -> i64 {
    1
}

/// Field agent (territory manager) master record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gebietsleiter {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub telefon: Option<String>,
    pub region: Option<String>,
    #[serde(default = "default_true")]
    pub aktiv: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// Retail site master record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Markt {
    pub id: i64,
    pub name: String,
    pub strasse: Option<String>,
    pub plz: Option<String>,
    pub ort: Option<String>,
    pub region: Option<String>,
    #[serde(default = "default_true")]
    pub aktiv: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// Time-boxed promotional campaign master record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Welle {
    pub id: i64,
    pub name: String,
    pub beginn: Option<NaiveDate>,
    pub ende: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub aktiv: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// Catalog entry of a Welle: a promotional item that can be submitted
///
/// Container-kind entries carry the container label under which their
/// product submissions are grouped. `unit_value_cents` is the
/// catalog-declared value, which takes precedence over the value stored
/// on the individual record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveItem {
    pub id: i64,
    pub wave_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub kind: ItemType,
    pub container: Option<String>,
    pub unit_value_cents: Option<i64>,
}

fn default_true() -> bool {
    true
}
