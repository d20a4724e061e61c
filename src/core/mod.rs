//! Core business logic for Merkur.
//!
//! This module contains the transform-and-render pipeline and its
//! orchestration.
//!
//! # Modules
//!
//! - [`transform`] - Row transformation (joins, container grouping,
//!   column projection)
//! - [`render`] - Spreadsheet rendering (worksheets, styling, product
//!   detail sheet)
//! - [`export`] - Export orchestration and summary reporting
//!
//! # Export Workflow
//!
//! The pipeline per requested dataset:
//!
//! 1. **Validate**: Reject a malformed request before any fetch
//! 2. **Fetch**: Filtered rows from the relational source
//! 3. **Resolve**: Batched foreign-entity lookups into id-keyed maps
//! 4. **Group**: Reconstruct multi-item container submissions
//! 5. **Render**: One styled worksheet per non-empty dataset, in request
//!    order, plus the product detail sheet for submissions
//! 6. **Serialize**: Package the workbook as an `.xlsx` document
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use merkur::adapters::source::MemorySource;
//! use merkur::core::export::{ExportService, ExportSettings};
//! use merkur::domain::ExportRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = Arc::new(MemorySource::new());
//! let service = ExportService::new(source, ExportSettings::default());
//!
//! let request: ExportRequest = serde_json::from_str(
//!     r#"{ "datasets": ["submissions"] }"#,
//! )?;
//!
//! let outcome = service.execute(&request).await?;
//! println!("{} worksheets", outcome.summary.worksheets);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod render;
pub mod transform;
