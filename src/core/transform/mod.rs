//! Row transformation pipeline
//!
//! Per dataset: fetch filtered raw rows, resolve every foreign reference
//! through pre-built id-keyed maps, reconstruct multi-item container
//! submissions, and emit a role-tagged sequence of export rows projected
//! down to the caller-selected columns. The pipeline is pure and
//! synchronous after the reads complete; it never retries.

pub mod grouping;
pub mod resolve;

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{HashMap, HashSet};

use crate::adapters::source::RelationalSource;
use crate::domain::export_row::{format_eur, ExportRow, FieldValue, ProductDetail, RowRole};
use crate::domain::records::{decode_rows, Gebietsleiter, Markt, RawSubmissionRecord, Welle};
use crate::domain::request::ExportFilters;
use crate::domain::{MerkurError, Result};
use crate::registry;

use grouping::{bucket_candidates, group_membership, partition_records, Group};
use resolve::{resolve_container_name, resolve_member, Lookups, ResolvedMember};

pub use grouping::DEFAULT_GROUPING_TOLERANCE_SECS;

/// Transform one dataset into its export row sequence
///
/// Row order matches the underlying query order (newest first for
/// submissions). An empty filtered record set yields an empty sequence.
///
/// # Errors
///
/// `MerkurError::UnknownDataset` if the registry does not know the id;
/// any data source failure propagates unchanged.
pub async fn transform_dataset(
    source: &dyn RelationalSource,
    dataset_id: &str,
    selected_columns: &[String],
    filters: &ExportFilters,
    expand_mode: bool,
    tolerance_secs: i64,
) -> Result<Vec<ExportRow>> {
    let dataset = registry::dataset(dataset_id)
        .ok_or_else(|| MerkurError::UnknownDataset(dataset_id.to_string()))?;

    let rows = source.fetch_filtered(dataset.relation, filters).await?;
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let selected: HashSet<&str> = selected_columns.iter().map(String::as_str).collect();

    if dataset.requires_join {
        let records: Vec<RawSubmissionRecord> = decode_rows(dataset.relation, &rows)?;
        transform_submissions(source, records, &selected, expand_mode, tolerance_secs).await
    } else {
        transform_master(dataset.id, dataset.relation, &rows, &selected)
    }
}

/// Submissions: bulk-resolve, partition, group, emit
async fn transform_submissions(
    source: &dyn RelationalSource,
    records: Vec<RawSubmissionRecord>,
    selected: &HashSet<&str>,
    expand_mode: bool,
    tolerance_secs: i64,
) -> Result<Vec<ExportRow>> {
    let lookups = Lookups::fetch(source, &records).await?;

    let (standalone, candidates) = partition_records(&records);
    debug_assert_eq!(standalone.len() + candidates.len(), records.len());

    let groups = bucket_candidates(&candidates, tolerance_secs, |record| {
        resolve_container_name(record, lookups.item(record.item_id))
    });
    let membership = group_membership(&groups);

    tracing::debug!(
        records = records.len(),
        standalone = standalone.len(),
        groups = groups.len(),
        expand_mode,
        "Transforming submissions"
    );

    // Walk the original query order; every record is consumed exactly
    // once: a group is emitted at its first member's position, later
    // members of the same group are already covered by it.
    let mut out = Vec::with_capacity(records.len());
    let mut emitted = vec![false; groups.len()];
    let mut group_seq = 0usize;

    for record in &records {
        match membership.get(&record.id) {
            None => out.push(standalone_row(record, &lookups, selected)),
            Some(&index) => {
                if emitted[index] {
                    continue;
                }
                emitted[index] = true;
                group_seq += 1;
                let group_id = format!("grp-{group_seq}");
                emit_group(&groups[index], group_id, &lookups, selected, expand_mode, &mut out);
            }
        }
    }

    Ok(out)
}

fn emit_group(
    group: &Group<'_>,
    group_id: String,
    lookups: &Lookups,
    selected: &HashSet<&str>,
    expand_mode: bool,
    out: &mut Vec<ExportRow>,
) {
    let members: Vec<ResolvedMember<'_>> = group
        .members
        .iter()
        .map(|&record| resolve_member(record, lookups))
        .collect();
    let total_cents: i64 = members.iter().map(|m| m.line_total_cents).sum();
    let first = group.members[0];

    if expand_mode {
        out.push(parent_row(
            first,
            &group.key.container,
            total_cents,
            &members,
            group_id.clone(),
            lookups,
            selected,
        ));
        for member in &members {
            out.push(child_row(member, group_id.clone(), lookups, selected));
        }
    } else {
        let details: Vec<ProductDetail> = members
            .iter()
            .map(|member| member_detail(member, &group.key.container, lookups))
            .collect();

        let mut values = base_values(first, lookups);
        values.insert(
            "artikel".to_string(),
            FieldValue::Text(compact_label(&members, total_cents)),
        );
        values.insert(
            "menge".to_string(),
            FieldValue::Number(members.iter().map(|m| m.record.quantity).sum::<i64>() as f64),
        );
        values.insert("einzelwert".to_string(), FieldValue::Null);
        values.insert("gesamtwert".to_string(), FieldValue::Currency(total_cents));
        values.insert(
            "fotos".to_string(),
            FieldValue::Number(
                members.iter().map(|m| m.record.photo_refs.len()).sum::<usize>() as f64,
            ),
        );

        out.push(
            ExportRow::grouped(RowRole::Compact, group_id, project(values, selected))
                .with_details(details),
        );
    }
}

/// The join-resolved context fields shared by every submissions row
fn base_values(record: &RawSubmissionRecord, lookups: &Lookups) -> HashMap<String, FieldValue> {
    let mut values = HashMap::new();
    values.insert("created_at".to_string(), FieldValue::Timestamp(record.created_at));
    values.insert(
        "gebietsleiter".to_string(),
        opt_text(lookups.owner(record.owner_id).map(|o| o.name.clone())),
    );
    values.insert(
        "markt".to_string(),
        opt_text(lookups.location(record.location_id).map(|m| m.name.clone())),
    );
    values.insert(
        "markt_ort".to_string(),
        opt_text(lookups.location(record.location_id).and_then(|m| m.ort.clone())),
    );
    values.insert(
        "welle".to_string(),
        opt_text(lookups.wave(record.wave_id).map(|w| w.name.clone())),
    );
    values
}

fn standalone_row(
    record: &RawSubmissionRecord,
    lookups: &Lookups,
    selected: &HashSet<&str>,
) -> ExportRow {
    let member = resolve_member(record, lookups);

    let mut values = base_values(record, lookups);
    values.insert("artikel".to_string(), FieldValue::Text(member.product_name.clone()));
    values.insert("menge".to_string(), FieldValue::Number(record.quantity as f64));
    values.insert("einzelwert".to_string(), FieldValue::Currency(member.unit_value_cents));
    values.insert("gesamtwert".to_string(), FieldValue::Currency(member.line_total_cents));
    values.insert("fotos".to_string(), FieldValue::Number(record.photo_refs.len() as f64));

    ExportRow::new(RowRole::Standalone, project(values, selected))
}

#[allow(clippy::too_many_arguments)]
fn parent_row(
    first: &RawSubmissionRecord,
    container: &str,
    total_cents: i64,
    members: &[ResolvedMember<'_>],
    group_id: String,
    lookups: &Lookups,
    selected: &HashSet<&str>,
) -> ExportRow {
    let mut values = base_values(first, lookups);
    values.insert("artikel".to_string(), FieldValue::Text(container.to_string()));
    values.insert("menge".to_string(), FieldValue::Number(1.0));
    values.insert("einzelwert".to_string(), FieldValue::Currency(total_cents));
    values.insert("gesamtwert".to_string(), FieldValue::Currency(total_cents));
    values.insert(
        "fotos".to_string(),
        FieldValue::Number(members.iter().map(|m| m.record.photo_refs.len()).sum::<usize>() as f64),
    );

    ExportRow::grouped(RowRole::Parent, group_id, project(values, selected))
}

fn child_row(
    member: &ResolvedMember<'_>,
    group_id: String,
    lookups: &Lookups,
    selected: &HashSet<&str>,
) -> ExportRow {
    let record = member.record;
    let mut values = base_values(record, lookups);
    values.insert(
        "artikel".to_string(),
        FieldValue::Text(format!("└ {}", member.product_name)),
    );
    values.insert("menge".to_string(), FieldValue::Number(record.quantity as f64));
    values.insert("einzelwert".to_string(), FieldValue::Currency(member.unit_value_cents));
    values.insert("gesamtwert".to_string(), FieldValue::Currency(member.line_total_cents));
    values.insert("fotos".to_string(), FieldValue::Number(record.photo_refs.len() as f64));

    ExportRow::grouped(RowRole::Child, group_id, project(values, selected))
}

/// Multi-line rendering of a compact group: one line per member, then
/// the group total
fn compact_label(members: &[ResolvedMember<'_>], total_cents: i64) -> String {
    let mut lines: Vec<String> = members
        .iter()
        .map(|m| {
            format!(
                "└ {} ({}×) - {}",
                m.product_name,
                m.record.quantity,
                format_eur(m.line_total_cents)
            )
        })
        .collect();
    lines.push(format!("Total: {}", format_eur(total_cents)));
    lines.join("\n")
}

fn member_detail(
    member: &ResolvedMember<'_>,
    container: &str,
    lookups: &Lookups,
) -> ProductDetail {
    let record = member.record;
    ProductDetail {
        date: record.created_at,
        owner_name: lookups
            .owner(record.owner_id)
            .map(|o| o.name.clone())
            .unwrap_or_default(),
        location_name: lookups
            .location(record.location_id)
            .map(|m| m.name.clone())
            .unwrap_or_default(),
        wave_name: lookups
            .wave(record.wave_id)
            .map(|w| w.name.clone())
            .unwrap_or_default(),
        container_name: container.to_string(),
        product_name: member.product_name.clone(),
        quantity: record.quantity,
        unit_value_cents: member.unit_value_cents,
        line_total_cents: member.line_total_cents,
    }
}

/// Master datasets map 1:1 to standalone rows, no joins involved
fn transform_master(
    dataset_id: &str,
    relation: &str,
    rows: &[crate::domain::records::SourceRow],
    selected: &HashSet<&str>,
) -> Result<Vec<ExportRow>> {
    let value_maps: Vec<HashMap<String, FieldValue>> = match dataset_id {
        "gebietsleiter" => decode_rows::<Gebietsleiter>(relation, rows)?
            .iter()
            .map(gebietsleiter_values)
            .collect(),
        "maerkte" => decode_rows::<Markt>(relation, rows)?
            .iter()
            .map(markt_values)
            .collect(),
        "wellen" => decode_rows::<Welle>(relation, rows)?
            .iter()
            .map(welle_values)
            .collect(),
        other => return Err(MerkurError::UnknownDataset(other.to_string())),
    };

    Ok(value_maps
        .into_iter()
        .map(|values| ExportRow::new(RowRole::Standalone, project(values, selected)))
        .collect())
}

fn gebietsleiter_values(record: &Gebietsleiter) -> HashMap<String, FieldValue> {
    HashMap::from([
        ("name".to_string(), FieldValue::Text(record.name.clone())),
        ("email".to_string(), opt_text(record.email.clone())),
        ("telefon".to_string(), opt_text(record.telefon.clone())),
        ("region".to_string(), opt_text(record.region.clone())),
        ("aktiv".to_string(), FieldValue::Bool(record.aktiv)),
        ("created_at".to_string(), opt_timestamp(record.created_at)),
    ])
}

fn markt_values(record: &Markt) -> HashMap<String, FieldValue> {
    HashMap::from([
        ("name".to_string(), FieldValue::Text(record.name.clone())),
        ("strasse".to_string(), opt_text(record.strasse.clone())),
        ("plz".to_string(), opt_text(record.plz.clone())),
        ("ort".to_string(), opt_text(record.ort.clone())),
        ("region".to_string(), opt_text(record.region.clone())),
        ("aktiv".to_string(), FieldValue::Bool(record.aktiv)),
        ("created_at".to_string(), opt_timestamp(record.created_at)),
    ])
}

fn welle_values(record: &Welle) -> HashMap<String, FieldValue> {
    HashMap::from([
        ("name".to_string(), FieldValue::Text(record.name.clone())),
        ("beginn".to_string(), opt_date(record.beginn)),
        ("ende".to_string(), opt_date(record.ende)),
        ("aktiv".to_string(), FieldValue::Bool(record.aktiv)),
        ("created_at".to_string(), opt_timestamp(record.created_at)),
    ])
}

fn opt_text(value: Option<String>) -> FieldValue {
    value.map(FieldValue::Text).unwrap_or(FieldValue::Null)
}

fn opt_timestamp(value: Option<DateTime<Utc>>) -> FieldValue {
    value.map(FieldValue::Timestamp).unwrap_or(FieldValue::Null)
}

fn opt_date(value: Option<NaiveDate>) -> FieldValue {
    value
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| FieldValue::Timestamp(naive.and_utc()))
        .unwrap_or(FieldValue::Null)
}

/// Project a full value map down to the caller-selected column set
fn project(
    mut values: HashMap<String, FieldValue>,
    selected: &HashSet<&str>,
) -> HashMap<String, FieldValue> {
    values.retain(|column_id, _| selected.contains(column_id.as_str()));
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::ItemType;

    fn raw(quantity: i64, unit_cents: i64) -> RawSubmissionRecord {
        RawSubmissionRecord {
            id: 1,
            created_at: "2025-03-10T10:00:00Z".parse().unwrap(),
            owner_id: None,
            location_id: None,
            wave_id: None,
            item_type: ItemType::Palette,
            item_id: None,
            quantity,
            unit_value_cents: unit_cents,
            photo_refs: Vec::new(),
        }
    }

    #[test]
    fn test_compact_label_layout() {
        let r1 = raw(3, 200);
        let r2 = raw(5, 150);
        let members = vec![
            ResolvedMember {
                record: &r1,
                product_name: "Schokoriegel".to_string(),
                unit_value_cents: 200,
                line_total_cents: 600,
            },
            ResolvedMember {
                record: &r2,
                product_name: "Müsliriegel".to_string(),
                unit_value_cents: 150,
                line_total_cents: 750,
            },
        ];

        let label = compact_label(&members, 1350);
        let lines: Vec<&str> = label.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "└ Schokoriegel (3×) - €6.00");
        assert_eq!(lines[1], "└ Müsliriegel (5×) - €7.50");
        assert_eq!(lines[2], "Total: €13.50");
    }

    #[test]
    fn test_project_drops_unselected_columns() {
        let values = HashMap::from([
            ("name".to_string(), FieldValue::Text("M1".to_string())),
            ("plz".to_string(), FieldValue::Text("50667".to_string())),
        ]);
        let selected: HashSet<&str> = ["name"].into_iter().collect();

        let projected = project(values, &selected);
        assert_eq!(projected.len(), 1);
        assert!(projected.contains_key("name"));
    }

    #[test]
    fn test_opt_date_midnight() {
        let value = opt_date(Some(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
        match value {
            FieldValue::Timestamp(ts) => assert_eq!(ts.to_rfc3339(), "2025-03-01T00:00:00+00:00"),
            other => panic!("expected timestamp, got {other:?}"),
        }
        assert_eq!(opt_date(None), FieldValue::Null);
    }
}
