//! Export orchestration

pub mod service;
pub mod summary;

pub use service::{ExportDocument, ExportOutcome, ExportService, ExportSettings};
pub use summary::{DatasetOutcome, ExportSummary, SkipReason};
