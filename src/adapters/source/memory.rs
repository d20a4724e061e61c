//! In-memory data source
//!
//! Backs the engine's tests with a fixed set of rows per relation,
//! applying the same filter semantics as the real adapter. Can be armed
//! to fail a relation to exercise abort paths.

use crate::domain::records::SourceRow;
use crate::domain::request::ExportFilters;
use crate::domain::SourceError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::traits::RelationalSource;

/// Fixed-content `RelationalSource` implementation
#[derive(Debug, Default)]
pub struct MemorySource {
    relations: HashMap<String, Vec<SourceRow>>,
    failing: Option<String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rows of one relation
    pub fn with_relation(mut self, relation: &str, rows: Vec<SourceRow>) -> Self {
        self.relations.insert(relation.to_string(), rows);
        self
    }

    /// Arm the source to fail every read of the given relation
    pub fn failing_relation(mut self, relation: &str) -> Self {
        self.failing = Some(relation.to_string());
        self
    }

    fn check_failure(&self, relation: &str) -> Result<(), SourceError> {
        if self.failing.as_deref() == Some(relation) {
            return Err(SourceError::QueryFailed(format!(
                "simulated failure reading '{relation}'"
            )));
        }
        Ok(())
    }

    fn rows(&self, relation: &str) -> Result<&[SourceRow], SourceError> {
        self.relations
            .get(relation)
            .map(|rows| rows.as_slice())
            .ok_or_else(|| SourceError::RelationNotFound(relation.to_string()))
    }
}

fn row_i64(row: &SourceRow, field: &str) -> Option<i64> {
    row.get(field).and_then(|v| v.as_i64())
}

fn row_created_at(row: &SourceRow) -> Option<DateTime<Utc>> {
    row.get("created_at")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
}

/// The field an owner id-set filter matches, if the relation carries one
/// (same semantics as the PostgreSQL adapter)
fn owner_filter_field(relation: &str) -> Option<&'static str> {
    match relation {
        "submissions" => Some("owner_id"),
        "gebietsleiter" => Some("id"),
        _ => None,
    }
}

fn wave_filter_field(relation: &str) -> Option<&'static str> {
    match relation {
        "submissions" => Some("wave_id"),
        "wellen" => Some("id"),
        _ => None,
    }
}

#[async_trait]
impl RelationalSource for MemorySource {
    async fn fetch_filtered(
        &self,
        relation: &str,
        filters: &ExportFilters,
    ) -> Result<Vec<SourceRow>, SourceError> {
        self.check_failure(relation)?;

        let mut rows: Vec<SourceRow> = self
            .rows(relation)?
            .iter()
            .filter(|row| {
                if let Some(range) = &filters.date_range {
                    match row_created_at(row) {
                        Some(ts) if ts >= range.start && ts <= range.end => {}
                        _ => return false,
                    }
                }
                if let (Some(owner_ids), Some(field)) =
                    (&filters.owner_ids, owner_filter_field(relation))
                {
                    match row_i64(row, field) {
                        Some(id) if owner_ids.contains(&id) => {}
                        _ => return false,
                    }
                }
                if let (Some(wave_ids), Some(field)) =
                    (&filters.wave_ids, wave_filter_field(relation))
                {
                    match row_i64(row, field) {
                        Some(id) if wave_ids.contains(&id) => {}
                        _ => return false,
                    }
                }
                true
            })
            .cloned()
            .collect();

        // Same ordering contract as the real store: newest first
        rows.sort_by(|a, b| row_created_at(b).cmp(&row_created_at(a)));
        Ok(rows)
    }

    async fn fetch_by_ids(&self, relation: &str, ids: &[i64]) -> Result<Vec<SourceRow>, SourceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.check_failure(relation)?;

        Ok(self
            .rows(relation)?
            .iter()
            .filter(|row| row_i64(row, "id").map(|id| ids.contains(&id)).unwrap_or(false))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::DateRange;
    use serde_json::json;

    fn sample_source() -> MemorySource {
        MemorySource::new().with_relation(
            "submissions",
            vec![
                json!({"id": 1, "created_at": "2025-03-10T10:00:00Z", "owner_id": 3, "wave_id": 1}),
                json!({"id": 2, "created_at": "2025-03-12T09:00:00Z", "owner_id": 4, "wave_id": 1}),
                json!({"id": 3, "created_at": "2025-03-14T11:00:00Z", "owner_id": 3, "wave_id": 2}),
            ],
        )
    }

    #[tokio::test]
    async fn test_filters_and_ordering() {
        let source = sample_source();
        let filters = ExportFilters {
            owner_ids: Some(vec![3]),
            ..Default::default()
        };

        let rows = source.fetch_filtered("submissions", &filters).await.unwrap();
        assert_eq!(rows.len(), 2);
        // Newest first
        assert_eq!(rows[0]["id"], 3);
        assert_eq!(rows[1]["id"], 1);
    }

    #[tokio::test]
    async fn test_date_range_filter() {
        let source = sample_source();
        let filters = ExportFilters {
            date_range: Some(DateRange {
                start: "2025-03-11T00:00:00Z".parse().unwrap(),
                end: "2025-03-13T00:00:00Z".parse().unwrap(),
            }),
            ..Default::default()
        };

        let rows = source.fetch_filtered("submissions", &filters).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], 2);
    }

    #[tokio::test]
    async fn test_fetch_by_ids_empty_set_short_circuits() {
        let source = MemorySource::new();
        let rows = source.fetch_by_ids("maerkte", &[]).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_relation() {
        let source = MemorySource::new();
        let err = source
            .fetch_filtered("umsatz", &ExportFilters::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::RelationNotFound(_)));
    }

    #[tokio::test]
    async fn test_failing_relation() {
        let source = sample_source().failing_relation("submissions");
        let err = source
            .fetch_filtered("submissions", &ExportFilters::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::QueryFailed(_)));
    }
}
