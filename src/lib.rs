// Merkur - Field-Sales Export Engine
// Copyright (c) 2025 Merkur Contributors
// Licensed under the MIT License

//! # Merkur - Field-Sales Export Engine
//!
//! Merkur is the export engine of a field-sales management platform:
//! it reads filtered submission and master data out of a relational
//! store, reconstructs multi-item container submissions from flat
//! timestamped records, and renders styled, multi-sheet XLSX documents.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Fetching** filtered rows and batched foreign-entity lookups from
//!   PostgreSQL
//! - **Transforming** flat records into role-tagged export rows,
//!   grouping pallet/crate submissions by a tolerance-bucketed key
//! - **Rendering** worksheets with role-driven styling plus a secondary
//!   product detail sheet
//! - **Serializing** the in-memory workbook into an OOXML `.xlsx`
//!   container
//!
//! ## Architecture
//!
//! Merkur follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (transform, render, export orchestration)
//! - [`adapters`] - External integrations (relational data source)
//! - [`registry`] - Static dataset and column catalog
//! - [`sheet`] - In-memory workbook model and XLSX writer
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use merkur::adapters::source::{PostgresClient, PostgresSource};
//! use merkur::config::load_config;
//! use merkur::core::export::{ExportService, ExportSettings};
//! use merkur::domain::ExportRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("merkur.toml")?;
//!
//!     let client = PostgresClient::new(config.database.clone())?;
//!     let service = ExportService::new(
//!         Arc::new(PostgresSource::new(client)),
//!         ExportSettings {
//!             grouping_tolerance_secs: config.export.grouping_tolerance_secs,
//!         },
//!     );
//!
//!     let request: ExportRequest = serde_json::from_str(
//!         r#"{ "datasets": ["submissions", "gebietsleiter"] }"#,
//!     )?;
//!
//!     let outcome = service.execute(&request).await?;
//!     std::fs::write(&outcome.document.file_name, &outcome.document.bytes)?;
//!     println!("Exported {} worksheets", outcome.summary.worksheets);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Merkur uses the [`domain::MerkurError`] type for all errors:
//!
//! ```rust,no_run
//! use merkur::domain::MerkurError;
//!
//! fn example() -> Result<(), MerkurError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = merkur::config::load_config("merkur.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Merkur uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting export");
//! warn!(dataset = "gebietsleiter", "No columns selected, skipping dataset");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod registry;
pub mod sheet;
