//! Domain error types
//!
//! This module defines the error hierarchy for Merkur. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Merkur error type
///
/// This is the primary error type used throughout the engine. It wraps
/// specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum MerkurError {
    /// Malformed export request, rejected before any fetch
    #[error("Validation error: {0}")]
    Validation(String),

    /// Dataset id not present in the registry
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    /// Data source errors
    #[error("Data source error: {0}")]
    Source(#[from] SourceError),

    /// Every requested dataset was skipped or yielded no rows
    #[error("Nothing to export: every requested dataset was skipped or empty")]
    EmptyResult,

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Workbook construction/serialization errors
    #[error("Document error: {0}")]
    Document(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Relational data source errors
///
/// Errors that occur when reading from the backing relational store.
/// These errors don't expose the underlying driver types.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to connect to the data source
    #[error("Failed to connect to data source: {0}")]
    ConnectionFailed(String),

    /// Query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Named relation does not exist in the store
    #[error("Relation not found: {0}")]
    RelationNotFound(String),

    /// A fetched row could not be decoded into its record type
    #[error("Invalid row in relation '{relation}': {message}")]
    InvalidRow { relation: String, message: String },

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl SourceError {
    /// Shorthand for an invalid-row error
    pub fn invalid_row(relation: impl Into<String>, message: impl Into<String>) -> Self {
        SourceError::InvalidRow {
            relation: relation.into(),
            message: message.into(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for MerkurError {
    fn from(err: std::io::Error) -> Self {
        MerkurError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for MerkurError {
    fn from(err: serde_json::Error) -> Self {
        MerkurError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for MerkurError {
    fn from(err: toml::de::Error) -> Self {
        MerkurError::Configuration(format!("TOML parse error: {err}"))
    }
}
