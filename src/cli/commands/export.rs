//! Export command implementation
//!
//! Builds an export request from a JSON file and/or CLI flags, runs the
//! export engine against the configured PostgreSQL source, and writes
//! the resulting `.xlsx` document.

use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

use crate::adapters::source::{PostgresClient, PostgresSource};
use crate::config::load_config;
use crate::core::export::{DatasetOutcome, ExportService, ExportSettings};
use crate::domain::request::{DateRange, ExportRequest};
use crate::registry;

use super::exit_code_for;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Read the export request from a JSON file (flags below override it)
    #[arg(long, value_name = "FILE")]
    pub request: Option<PathBuf>,

    /// Dataset id(s) to export (comma-separated); defaults to every
    /// registered dataset
    #[arg(long)]
    pub datasets: Option<String>,

    /// Column selection per dataset, e.g. --columns submissions=created_at,artikel
    /// (repeatable)
    #[arg(long, value_name = "DATASET=COLS")]
    pub columns: Vec<String>,

    /// Lower creation-date bound (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub from: Option<String>,

    /// Upper creation-date bound (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub to: Option<String>,

    /// Restrict to these Gebietsleiter ids (comma-separated)
    #[arg(long)]
    pub owners: Option<String>,

    /// Restrict to these Welle ids (comma-separated)
    #[arg(long)]
    pub waves: Option<String>,

    /// Expand container groups into parent and child rows
    #[arg(long)]
    pub expand: bool,

    /// Output file path; defaults to the request filename in the
    /// current directory
    #[arg(short, long)]
    pub output: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let request = match self.build_request() {
            Ok(request) => request,
            Err(message) => {
                eprintln!("❌ Invalid request: {message}");
                return Ok(2);
            }
        };

        let client = match PostgresClient::new(config.database.clone()) {
            Ok(client) => client,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(exit_code_for(&e));
            }
        };
        let source = PostgresSource::new(client);

        let service = ExportService::new(
            Arc::new(source),
            ExportSettings {
                grouping_tolerance_secs: config.export.grouping_tolerance_secs,
            },
        );

        let outcome = match service.execute(&request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("❌ Export failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        // Caller went away mid-call: stop cleanly, write nothing
        if *shutdown_signal.borrow() {
            tracing::warn!("Shutdown requested, discarding export result");
            println!("⚠️  Export aborted before the document was written");
            return Ok(1);
        }

        let output_path = self
            .output
            .clone()
            .unwrap_or_else(|| outcome.document.file_name.clone());
        std::fs::write(&output_path, &outcome.document.bytes)?;

        println!("✅ Export written to {output_path}");
        println!(
            "   {} worksheet(s), {} row(s), {} bytes in {:.2}s",
            outcome.summary.worksheets,
            outcome.summary.total_rows(),
            outcome.summary.document_bytes,
            outcome.summary.duration.as_secs_f64()
        );
        for (dataset_id, result) in &outcome.summary.datasets {
            match result {
                DatasetOutcome::Rendered { rows } => {
                    println!("   - {dataset_id}: {rows} row(s)");
                }
                DatasetOutcome::Skipped { reason } => {
                    println!("   - {dataset_id}: skipped ({})", reason.as_str());
                }
            }
        }

        Ok(0)
    }

    /// Merge the JSON request file (if any) with CLI flag overrides
    fn build_request(&self) -> Result<ExportRequest, String> {
        let mut request = match &self.request {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
                serde_json::from_str(&contents)
                    .map_err(|e| format!("cannot parse {}: {e}", path.display()))?
            }
            None => ExportRequest::default(),
        };

        if let Some(datasets) = &self.datasets {
            request.datasets = split_csv(datasets);
        }
        if request.datasets.is_empty() {
            // Bare `merkur export` exports the whole catalog
            request.datasets = registry::all_datasets()
                .iter()
                .map(|d| d.id.to_string())
                .collect();
        }

        if !self.columns.is_empty() {
            let mut columns: HashMap<String, Vec<String>> = HashMap::new();
            for spec in &self.columns {
                let (dataset_id, column_list) = spec
                    .split_once('=')
                    .ok_or_else(|| format!("--columns expects DATASET=COLS, got '{spec}'"))?;
                columns.insert(dataset_id.trim().to_string(), split_csv(column_list));
            }
            request.columns = columns;
        }

        let mut filters = request.filters.clone();
        match (&self.from, &self.to) {
            (None, None) => {}
            (from, to) => {
                let start = match from {
                    Some(s) => parse_date_bound(s, false)?,
                    None => DateTime::<Utc>::MIN_UTC,
                };
                let end = match to {
                    Some(s) => parse_date_bound(s, true)?,
                    None => DateTime::<Utc>::MAX_UTC,
                };
                filters.date_range = Some(DateRange { start, end });
            }
        }
        if let Some(owners) = &self.owners {
            filters.owner_ids = Some(parse_id_csv(owners)?);
        }
        if let Some(waves) = &self.waves {
            filters.wave_ids = Some(parse_id_csv(waves)?);
        }
        request.filters = filters;

        if self.expand {
            request.options.expand_palette_products = true;
        }
        if let Some(output) = &self.output {
            request.options.file_name = Some(output.clone());
        }

        Ok(request)
    }
}

fn split_csv(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_id_csv(input: &str) -> Result<Vec<i64>, String> {
    split_csv(input)
        .iter()
        .map(|s| s.parse().map_err(|_| format!("invalid id '{s}'")))
        .collect()
}

/// Accept RFC 3339 timestamps or plain dates; a plain date expands to
/// the start or end of that day
fn parse_date_bound(input: &str, end_of_day: bool) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = input.parse::<DateTime<Utc>>() {
        return Ok(ts);
    }
    let date: NaiveDate = input
        .parse()
        .map_err(|_| format!("invalid date '{input}', expected YYYY-MM-DD or RFC 3339"))?;
    let time = if end_of_day {
        date.and_hms_opt(23, 59, 59).expect("valid time")
    } else {
        date.and_hms_opt(0, 0, 0).expect("valid time")
    };
    Ok(time.and_utc())
}
