//! PostgreSQL implementation of the relational source
//!
//! Issues the filtered range/select and id-set batch reads the engine
//! needs and converts driver rows into the field-keyed records the
//! domain layer decodes. Monetary NUMERIC columns are converted to
//! integer cents inside the query so exactness never depends on float
//! round-tripping.

use crate::domain::records::SourceRow;
use crate::domain::request::ExportFilters;
use crate::domain::SourceError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;

use super::super::traits::RelationalSource;
use super::client::PostgresClient;

/// `RelationalSource` backed by PostgreSQL
pub struct PostgresSource {
    client: PostgresClient,
}

impl PostgresSource {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }

    /// Access the underlying client (connection tests, status reporting)
    pub fn client(&self) -> &PostgresClient {
        &self.client
    }
}

/// Read one typed column, reporting the relation on failure
fn col<'r, T: tokio_postgres::types::FromSql<'r>>(
    row: &'r Row,
    relation: &str,
    name: &str,
) -> Result<T, SourceError> {
    row.try_get(name)
        .map_err(|e| SourceError::invalid_row(relation, format!("column '{name}': {e}")))
}

fn submission_json(row: &Row) -> Result<SourceRow, SourceError> {
    const REL: &str = "submissions";
    let created_at: DateTime<Utc> = col(row, REL, "created_at")?;
    let photo_refs: Option<Vec<String>> = col(row, REL, "photo_refs")?;
    Ok(json!({
        "id": col::<i64>(row, REL, "id")?,
        "created_at": created_at,
        "owner_id": col::<Option<i64>>(row, REL, "owner_id")?,
        "location_id": col::<Option<i64>>(row, REL, "location_id")?,
        "wave_id": col::<Option<i64>>(row, REL, "wave_id")?,
        "item_type": col::<Option<String>>(row, REL, "item_type")?.unwrap_or_else(|| "produkt".to_string()),
        "item_id": col::<Option<i64>>(row, REL, "item_id")?,
        "quantity": col::<i64>(row, REL, "quantity")?,
        "unit_value_cents": col::<Option<i64>>(row, REL, "unit_value_cents")?.unwrap_or(0),
        "photo_refs": photo_refs.unwrap_or_default(),
    }))
}

fn gebietsleiter_json(row: &Row) -> Result<SourceRow, SourceError> {
    const REL: &str = "gebietsleiter";
    let created_at: Option<DateTime<Utc>> = col(row, REL, "created_at")?;
    Ok(json!({
        "id": col::<i64>(row, REL, "id")?,
        "name": col::<String>(row, REL, "name")?,
        "email": col::<Option<String>>(row, REL, "email")?,
        "telefon": col::<Option<String>>(row, REL, "telefon")?,
        "region": col::<Option<String>>(row, REL, "region")?,
        "aktiv": col::<bool>(row, REL, "aktiv")?,
        "created_at": created_at,
    }))
}

fn markt_json(row: &Row) -> Result<SourceRow, SourceError> {
    const REL: &str = "maerkte";
    let created_at: Option<DateTime<Utc>> = col(row, REL, "created_at")?;
    Ok(json!({
        "id": col::<i64>(row, REL, "id")?,
        "name": col::<String>(row, REL, "name")?,
        "strasse": col::<Option<String>>(row, REL, "strasse")?,
        "plz": col::<Option<String>>(row, REL, "plz")?,
        "ort": col::<Option<String>>(row, REL, "ort")?,
        "region": col::<Option<String>>(row, REL, "region")?,
        "aktiv": col::<bool>(row, REL, "aktiv")?,
        "created_at": created_at,
    }))
}

fn welle_json(row: &Row) -> Result<SourceRow, SourceError> {
    const REL: &str = "wellen";
    let beginn: Option<NaiveDate> = col(row, REL, "beginn")?;
    let ende: Option<NaiveDate> = col(row, REL, "ende")?;
    let created_at: Option<DateTime<Utc>> = col(row, REL, "created_at")?;
    Ok(json!({
        "id": col::<i64>(row, REL, "id")?,
        "name": col::<String>(row, REL, "name")?,
        "beginn": beginn,
        "ende": ende,
        "aktiv": col::<bool>(row, REL, "aktiv")?,
        "created_at": created_at,
    }))
}

fn wave_item_json(row: &Row) -> Result<SourceRow, SourceError> {
    const REL: &str = "wave_items";
    Ok(json!({
        "id": col::<i64>(row, REL, "id")?,
        "wave_id": col::<Option<i64>>(row, REL, "wave_id")?,
        "name": col::<String>(row, REL, "name")?,
        "kind": col::<Option<String>>(row, REL, "kind")?.unwrap_or_else(|| "produkt".to_string()),
        "container": col::<Option<String>>(row, REL, "container")?,
        "unit_value_cents": col::<Option<i64>>(row, REL, "unit_value_cents")?,
    }))
}

/// Select list per relation; NUMERIC money becomes BIGINT cents here
fn select_list(relation: &str) -> Option<&'static str> {
    match relation {
        "submissions" => Some(
            "SELECT id, created_at, owner_id, location_id, wave_id, item_type, item_id, \
             quantity, (value_per_unit * 100)::BIGINT AS unit_value_cents, photo_refs \
             FROM submissions",
        ),
        "gebietsleiter" => {
            Some("SELECT id, name, email, telefon, region, aktiv, created_at FROM gebietsleiter")
        }
        "maerkte" => Some(
            "SELECT id, name, strasse, plz, ort, region, aktiv, created_at FROM maerkte",
        ),
        "wellen" => Some("SELECT id, name, beginn, ende, aktiv, created_at FROM wellen"),
        "wave_items" => Some(
            "SELECT id, wave_id, name, kind, container, \
             (unit_value * 100)::BIGINT AS unit_value_cents \
             FROM wave_items",
        ),
        _ => None,
    }
}

fn row_converter(relation: &str) -> Option<fn(&Row) -> Result<SourceRow, SourceError>> {
    match relation {
        "submissions" => Some(submission_json),
        "gebietsleiter" => Some(gebietsleiter_json),
        "maerkte" => Some(markt_json),
        "wellen" => Some(welle_json),
        "wave_items" => Some(wave_item_json),
        _ => None,
    }
}

/// The column an owner id-set filter matches, if the relation carries
/// one: submissions by foreign key, the Gebietsleiter master by its own
/// id. Other relations ignore the filter.
fn owner_filter_column(relation: &str) -> Option<&'static str> {
    match relation {
        "submissions" => Some("owner_id"),
        "gebietsleiter" => Some("id"),
        _ => None,
    }
}

fn wave_filter_column(relation: &str) -> Option<&'static str> {
    match relation {
        "submissions" => Some("wave_id"),
        "wellen" => Some("id"),
        _ => None,
    }
}

fn order_clause(relation: &str) -> &'static str {
    match relation {
        "submissions" => " ORDER BY created_at DESC, id DESC",
        _ => " ORDER BY name ASC",
    }
}

#[async_trait]
impl RelationalSource for PostgresSource {
    async fn fetch_filtered(
        &self,
        relation: &str,
        filters: &ExportFilters,
    ) -> Result<Vec<SourceRow>, SourceError> {
        let base = select_list(relation)
            .ok_or_else(|| SourceError::RelationNotFound(relation.to_string()))?;
        let convert = row_converter(relation)
            .ok_or_else(|| SourceError::RelationNotFound(relation.to_string()))?;

        let mut sql = base.to_string();
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();

        if let Some(range) = &filters.date_range {
            params.push(&range.start);
            clauses.push(format!("created_at >= ${}", params.len()));
            params.push(&range.end);
            clauses.push(format!("created_at <= ${}", params.len()));
        }
        if let Some(owner_ids) = &filters.owner_ids {
            if let Some(column) = owner_filter_column(relation) {
                params.push(owner_ids);
                clauses.push(format!("{column} = ANY(${})", params.len()));
            }
        }
        if let Some(wave_ids) = &filters.wave_ids {
            if let Some(column) = wave_filter_column(relation) {
                params.push(wave_ids);
                clauses.push(format!("{column} = ANY(${})", params.len()));
            }
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(order_clause(relation));

        tracing::debug!(relation, clauses = clauses.len(), "Fetching filtered rows");

        let rows = self.client.query(&sql, &params).await?;
        rows.iter().map(convert).collect()
    }

    async fn fetch_by_ids(&self, relation: &str, ids: &[i64]) -> Result<Vec<SourceRow>, SourceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let base = select_list(relation)
            .ok_or_else(|| SourceError::RelationNotFound(relation.to_string()))?;
        let convert = row_converter(relation)
            .ok_or_else(|| SourceError::RelationNotFound(relation.to_string()))?;

        let sql = format!("{base} WHERE id = ANY($1)");
        let id_vec: Vec<i64> = ids.to_vec();
        let params: [&(dyn ToSql + Sync); 1] = [&id_vec];

        tracing::debug!(relation, ids = ids.len(), "Fetching rows by id set");

        let rows = self.client.query(&sql, &params).await?;
        rows.iter().map(convert).collect()
    }
}
