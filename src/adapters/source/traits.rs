//! Relational data source abstraction
//!
//! This module defines the trait the export engine reads through. The
//! store must expose a filtered range/select over a named relation and a
//! batched "rows where id ∈ set" select; nothing else is assumed about
//! it.

use crate::domain::records::SourceRow;
use crate::domain::request::ExportFilters;
use crate::domain::SourceError;
use async_trait::async_trait;

/// Read-only access to the backing relational store
///
/// One implementation instance is owned per export call so no state is
/// shared across requests. Implementations never retry; a failed read is
/// returned as-is and aborts the export.
#[async_trait]
pub trait RelationalSource: Send + Sync {
    /// Fetch rows of a named relation with server-side filters applied
    ///
    /// The date range applies to the relation's `created_at`; the owner
    /// and wave id sets apply to the relation's matching foreign key (or
    /// its own id, for the respective master relation). Submissions come
    /// back newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the relation is unknown or the read fails.
    async fn fetch_filtered(
        &self,
        relation: &str,
        filters: &ExportFilters,
    ) -> Result<Vec<SourceRow>, SourceError>;

    /// Fetch rows of a named relation whose id is in the given set
    ///
    /// Used for bulk foreign-entity resolution; an empty id set yields an
    /// empty result without touching the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the relation is unknown or the read fails.
    async fn fetch_by_ids(&self, relation: &str, ids: &[i64]) -> Result<Vec<SourceRow>, SourceError>;
}
