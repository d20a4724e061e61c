//! Export summary and reporting
//!
//! Tracks what happened to each requested dataset so the caller can see
//! what was rendered and what was skipped (and why).

use std::time::Duration;

/// Why a requested dataset produced no worksheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Dataset id absent from the registry
    UnknownDataset,
    /// Zero columns selected for the dataset
    NoColumns,
    /// The filtered record set was empty
    NoRows,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::UnknownDataset => "unknown dataset",
            SkipReason::NoColumns => "no columns selected",
            SkipReason::NoRows => "no rows",
        }
    }
}

/// Outcome of one requested dataset
#[derive(Debug, Clone)]
pub enum DatasetOutcome {
    /// Worksheet rendered with this many data rows
    Rendered { rows: usize },
    /// Dataset skipped, export continued
    Skipped { reason: SkipReason },
}

/// Summary of an export operation
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Per-dataset outcomes in request order
    pub datasets: Vec<(String, DatasetOutcome)>,

    /// Number of worksheets in the produced document (including the
    /// product detail sheet)
    pub worksheets: usize,

    /// Size of the serialized document in bytes
    pub document_bytes: usize,

    /// Duration of the export
    pub duration: Duration,
}

impl ExportSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn add_rendered(&mut self, dataset_id: &str, rows: usize) {
        self.datasets
            .push((dataset_id.to_string(), DatasetOutcome::Rendered { rows }));
    }

    pub fn add_skipped(&mut self, dataset_id: &str, reason: SkipReason) {
        self.datasets
            .push((dataset_id.to_string(), DatasetOutcome::Skipped { reason }));
    }

    /// Number of datasets that produced a worksheet
    pub fn rendered_count(&self) -> usize {
        self.datasets
            .iter()
            .filter(|(_, outcome)| matches!(outcome, DatasetOutcome::Rendered { .. }))
            .count()
    }

    /// Number of datasets that were skipped
    pub fn skipped_count(&self) -> usize {
        self.datasets.len() - self.rendered_count()
    }

    /// Total data rows across all rendered datasets
    pub fn total_rows(&self) -> usize {
        self.datasets
            .iter()
            .map(|(_, outcome)| match outcome {
                DatasetOutcome::Rendered { rows } => *rows,
                DatasetOutcome::Skipped { .. } => 0,
            })
            .sum()
    }
}
