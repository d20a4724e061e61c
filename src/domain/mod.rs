//! Domain models and types for Merkur.
//!
//! This module contains the core domain models, types, and business rules
//! of the export engine: the records read from the relational store, the
//! role-tagged rows the transformer emits, the request wire types, and
//! the error hierarchy.
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, MerkurError>`]:
//!
//! ```rust
//! use merkur::domain::{MerkurError, Result};
//!
//! fn example() -> Result<()> {
//!     // Errors are automatically converted using the ? operator
//!     let config = merkur::config::load_config("merkur.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod export_row;
pub mod records;
pub mod request;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{MerkurError, SourceError};
pub use export_row::{format_eur, ExportRow, FieldValue, ProductDetail, RowRole};
pub use records::{
    decode_row, decode_rows, Gebietsleiter, ItemType, Markt, RawSubmissionRecord, SourceRow,
    WaveItem, Welle,
};
pub use request::{DateRange, ExportFilters, ExportOptions, ExportRequest};
pub use result::Result;
