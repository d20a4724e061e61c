//! Export request wire types
//!
//! The request shape the platform sends (and the CLI builds). JSON uses
//! camelCase field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single export request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    /// Dataset ids in the order their worksheets should appear
    pub datasets: Vec<String>,

    /// Selected column ids per dataset. A dataset missing from this map
    /// falls back to its registry default columns; a dataset mapped to an
    /// empty list is skipped with a warning.
    #[serde(default)]
    pub columns: HashMap<String, Vec<String>>,

    /// Row filters, applied server-side by the data source
    #[serde(default)]
    pub filters: ExportFilters,

    /// Rendering options
    #[serde(default)]
    pub options: ExportOptions,
}

impl ExportRequest {
    /// Validate the request shape before any fetch happens
    ///
    /// # Errors
    ///
    /// Returns a message describing the first malformed field.
    pub fn validate(&self) -> Result<(), String> {
        if self.datasets.is_empty() {
            return Err("at least one dataset must be requested".to_string());
        }
        if self.datasets.iter().any(|id| id.trim().is_empty()) {
            return Err("dataset ids must not be blank".to_string());
        }
        // Worksheet names are unique per document, so a dataset can only
        // be requested once
        let mut seen = std::collections::HashSet::new();
        for id in &self.datasets {
            if !seen.insert(id.as_str()) {
                return Err(format!("dataset '{id}' requested more than once"));
            }
        }
        for (dataset_id, column_ids) in &self.columns {
            if dataset_id.trim().is_empty() {
                return Err("columns map contains a blank dataset id".to_string());
            }
            if column_ids.iter().any(|c| c.trim().is_empty()) {
                return Err(format!(
                    "columns for dataset '{dataset_id}' contain a blank column id"
                ));
            }
        }
        if let Some(range) = &self.filters.date_range {
            if range.end < range.start {
                return Err("dateRange end precedes start".to_string());
            }
        }
        Ok(())
    }
}

/// Server-side row filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFilters {
    pub date_range: Option<DateRange>,
    pub owner_ids: Option<Vec<i64>>,
    pub wave_ids: Option<Vec<i64>>,
}

/// Inclusive creation-time range
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Rendering options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    /// Expand container groups into parent + child rows instead of one
    /// compact multi-line row
    #[serde(default)]
    pub expand_palette_products: bool,

    /// Output filename; derived from the current date when absent
    pub file_name: Option<String>,
}
