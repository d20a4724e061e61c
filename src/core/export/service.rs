//! Export orchestrator
//!
//! Validates the request, drives fetch → transform → render per
//! requested dataset, serializes the finished workbook, and reports a
//! summary. Per-dataset transforms run concurrently; worksheets are
//! written in the caller-specified order because sheet order is part of
//! the external contract.

use futures::future;
use std::sync::Arc;
use std::time::Instant;

use crate::adapters::source::RelationalSource;
use crate::core::render::{render_dataset_sheet, render_product_details};
use crate::core::transform::{transform_dataset, DEFAULT_GROUPING_TOLERANCE_SECS};
use crate::domain::export_row::{ExportRow, ProductDetail};
use crate::domain::request::ExportRequest;
use crate::domain::{MerkurError, Result};
use crate::registry::{self, ColumnDefinition, DatasetDefinition};
use crate::sheet::{write_workbook, Workbook};

use super::summary::{ExportSummary, SkipReason};

/// Engine settings that are not part of an individual request
#[derive(Debug, Clone)]
pub struct ExportSettings {
    /// Tolerance window for container grouping, in seconds
    pub grouping_tolerance_secs: i64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            grouping_tolerance_secs: DEFAULT_GROUPING_TOLERANCE_SECS,
        }
    }
}

/// The serialized spreadsheet handed back to the caller
#[derive(Debug, Clone)]
pub struct ExportDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Result of a successful export call
#[derive(Debug)]
pub struct ExportOutcome {
    pub document: ExportDocument,
    pub summary: ExportSummary,
}

/// One requested dataset after request-level resolution
struct DatasetPlan {
    dataset: &'static DatasetDefinition,
    column_ids: Vec<String>,
    columns: Vec<&'static ColumnDefinition>,
}

/// Export orchestrator
///
/// Each export call is an independent unit of work: it owns its workbook
/// exclusively and borrows data source connections only while reading.
pub struct ExportService {
    source: Arc<dyn RelationalSource>,
    settings: ExportSettings,
}

impl ExportService {
    pub fn new(source: Arc<dyn RelationalSource>, settings: ExportSettings) -> Self {
        Self { source, settings }
    }

    /// Execute one export request
    ///
    /// # Errors
    ///
    /// `Validation` for a malformed request, `EmptyResult` when every
    /// requested dataset was skipped or empty, and any data source
    /// failure aborts the whole export immediately.
    pub async fn execute(&self, request: &ExportRequest) -> Result<ExportOutcome> {
        let start = Instant::now();
        let export_id = uuid::Uuid::new_v4();
        request.validate().map_err(MerkurError::Validation)?;

        let mut summary = ExportSummary::new();
        let plans = self.resolve_plans(request, &mut summary);

        tracing::info!(
            export_id = %export_id,
            requested = request.datasets.len(),
            planned = plans.len(),
            expand_mode = request.options.expand_palette_products,
            "Starting export"
        );

        // Transforms are independent per dataset and run concurrently;
        // the first data source failure aborts everything
        let transforms = plans.iter().map(|plan| {
            transform_dataset(
                self.source.as_ref(),
                plan.dataset.id,
                &plan.column_ids,
                &request.filters,
                request.options.expand_palette_products,
                self.settings.grouping_tolerance_secs,
            )
        });
        let row_sets: Vec<Vec<ExportRow>> = future::try_join_all(transforms).await?;

        // Rendering happens strictly in request order
        let mut workbook = Workbook::new();
        for (plan, rows) in plans.iter().zip(&row_sets) {
            if rows.is_empty() {
                tracing::warn!(dataset = plan.dataset.id, "Dataset yielded no rows, skipping");
                summary.add_skipped(plan.dataset.id, SkipReason::NoRows);
                continue;
            }

            render_dataset_sheet(&mut workbook, plan.dataset, &plan.columns, rows);
            summary.add_rendered(plan.dataset.id, rows.len());
            tracing::info!(
                dataset = plan.dataset.id,
                rows = rows.len(),
                "Rendered worksheet"
            );

            if plan.dataset.id == "submissions" {
                let details: Vec<ProductDetail> = rows
                    .iter()
                    .flat_map(|row| row.product_details.iter().cloned())
                    .collect();
                if !details.is_empty() {
                    render_product_details(&mut workbook, &details);
                    tracing::info!(details = details.len(), "Rendered product detail sheet");
                }
            }
        }

        if workbook.is_empty() {
            return Err(MerkurError::EmptyResult);
        }

        let bytes = write_workbook(&workbook)?;
        summary.worksheets = workbook.worksheet_count();
        summary.document_bytes = bytes.len();

        let document = ExportDocument {
            file_name: resolve_file_name(request.options.file_name.as_deref()),
            bytes,
        };

        tracing::info!(
            export_id = %export_id,
            worksheets = summary.worksheets,
            bytes = summary.document_bytes,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Export finished"
        );

        Ok(ExportOutcome {
            document,
            summary: summary.with_duration(start.elapsed()),
        })
    }

    /// Resolve request datasets against the registry, recording skips
    fn resolve_plans(&self, request: &ExportRequest, summary: &mut ExportSummary) -> Vec<DatasetPlan> {
        let mut plans = Vec::new();

        for dataset_id in &request.datasets {
            let Some(dataset) = registry::dataset(dataset_id) else {
                tracing::warn!(dataset = %dataset_id, "Unknown dataset requested, skipping");
                summary.add_skipped(dataset_id, SkipReason::UnknownDataset);
                continue;
            };

            // Missing entry falls back to registry defaults; an explicit
            // empty selection skips the dataset
            let column_ids: Vec<String> = match request.columns.get(dataset_id) {
                Some(ids) => ids.clone(),
                None => registry::default_columns(dataset_id)
                    .iter()
                    .map(|c| c.id.to_string())
                    .collect(),
            };

            let columns: Vec<&'static ColumnDefinition> = column_ids
                .iter()
                .filter_map(|column_id| {
                    let def = registry::column_def(dataset_id, column_id);
                    if def.is_none() {
                        tracing::warn!(
                            dataset = %dataset_id,
                            column = %column_id,
                            "Unknown column requested, dropping"
                        );
                    }
                    def
                })
                .collect();

            if columns.is_empty() {
                tracing::warn!(dataset = %dataset_id, "No columns selected, skipping dataset");
                summary.add_skipped(dataset_id, SkipReason::NoColumns);
                continue;
            }

            plans.push(DatasetPlan {
                dataset,
                column_ids,
                columns,
            });
        }

        plans
    }
}

/// Caller-supplied name (with `.xlsx` ensured) or a date-derived default
fn resolve_file_name(requested: Option<&str>) -> String {
    match requested {
        Some(name) if !name.trim().is_empty() => {
            if name.ends_with(".xlsx") {
                name.to_string()
            } else {
                format!("{name}.xlsx")
            }
        }
        _ => format!("merkur-export_{}.xlsx", chrono::Utc::now().format("%Y-%m-%d")),
    }
}
