//! Bulk foreign-entity resolution
//!
//! All foreign references of a fetched record set are resolved up front:
//! the distinct ids are collected, one batched fetch per entity kind is
//! issued (concurrently), and the results become id-keyed maps. Row
//! transformation then never touches the data source again, and every
//! "not found" default lives in one of the resolution functions below.

use std::collections::{BTreeSet, HashMap};

use crate::adapters::source::RelationalSource;
use crate::domain::records::{
    decode_rows, Gebietsleiter, Markt, RawSubmissionRecord, WaveItem, Welle,
};
use crate::domain::Result;

/// Id-keyed lookup maps for one dataset's transform run
#[derive(Debug, Default)]
pub struct Lookups {
    pub owners: HashMap<i64, Gebietsleiter>,
    pub locations: HashMap<i64, Markt>,
    pub waves: HashMap<i64, Welle>,
    pub items: HashMap<i64, WaveItem>,
}

impl Lookups {
    /// Fetch all foreign entities referenced by `records` in four batched
    /// reads issued concurrently
    ///
    /// # Errors
    ///
    /// Any failed read is returned unchanged; no partial lookup state is
    /// kept.
    pub async fn fetch(
        source: &dyn RelationalSource,
        records: &[RawSubmissionRecord],
    ) -> Result<Self> {
        let owner_ids = distinct(records.iter().map(|r| r.owner_id));
        let location_ids = distinct(records.iter().map(|r| r.location_id));
        let wave_ids = distinct(records.iter().map(|r| r.wave_id));
        let item_ids = distinct(records.iter().map(|r| r.item_id));

        let (owner_rows, location_rows, wave_rows, item_rows) = tokio::try_join!(
            source.fetch_by_ids("gebietsleiter", &owner_ids),
            source.fetch_by_ids("maerkte", &location_ids),
            source.fetch_by_ids("wellen", &wave_ids),
            source.fetch_by_ids("wave_items", &item_ids),
        )?;

        Ok(Self {
            owners: keyed(decode_rows("gebietsleiter", &owner_rows)?, |o: &Gebietsleiter| o.id),
            locations: keyed(decode_rows("maerkte", &location_rows)?, |m: &Markt| m.id),
            waves: keyed(decode_rows("wellen", &wave_rows)?, |w: &Welle| w.id),
            items: keyed(decode_rows("wave_items", &item_rows)?, |i: &WaveItem| i.id),
        })
    }

    pub fn owner(&self, id: Option<i64>) -> Option<&Gebietsleiter> {
        id.and_then(|id| self.owners.get(&id))
    }

    pub fn location(&self, id: Option<i64>) -> Option<&Markt> {
        id.and_then(|id| self.locations.get(&id))
    }

    pub fn wave(&self, id: Option<i64>) -> Option<&Welle> {
        id.and_then(|id| self.waves.get(&id))
    }

    pub fn item(&self, id: Option<i64>) -> Option<&WaveItem> {
        id.and_then(|id| self.items.get(&id))
    }
}

fn distinct(ids: impl Iterator<Item = Option<i64>>) -> Vec<i64> {
    ids.flatten().collect::<BTreeSet<i64>>().into_iter().collect()
}

fn keyed<T, F: Fn(&T) -> i64>(
    items: Vec<T>,
    key: F,
) -> HashMap<i64, T> {
    items.into_iter().map(|item| (key(&item), item)).collect()
}

/// A group member with its join-resolved display fields and value
#[derive(Debug, Clone)]
pub struct ResolvedMember<'a> {
    pub record: &'a RawSubmissionRecord,
    pub product_name: String,
    pub unit_value_cents: i64,
    pub line_total_cents: i64,
}

/// Resolve the unit value of a record
///
/// Priority: catalog-declared value → the record's own stored value → 0
/// (the record decode already defaults a missing stored value to 0).
pub fn resolve_unit_value(record: &RawSubmissionRecord, item: Option<&WaveItem>) -> i64 {
    item.and_then(|i| i.unit_value_cents)
        .unwrap_or(record.unit_value_cents)
}

/// Resolve the container name a candidate record is grouped under
///
/// Priority: catalog container label → catalog item name → the item-type
/// label.
pub fn resolve_container_name(record: &RawSubmissionRecord, item: Option<&WaveItem>) -> String {
    item.and_then(|i| i.container.clone())
        .or_else(|| item.map(|i| i.name.clone()))
        .unwrap_or_else(|| record.item_type.label().to_string())
}

/// Resolve the product name shown for a record
pub fn resolve_product_name(record: &RawSubmissionRecord, item: Option<&WaveItem>) -> String {
    item.map(|i| i.name.clone())
        .or_else(|| record.item_id.map(|id| format!("Artikel {id}")))
        .unwrap_or_else(|| "Unbekannter Artikel".to_string())
}

/// Resolve one record into its member view
pub fn resolve_member<'a>(
    record: &'a RawSubmissionRecord,
    lookups: &Lookups,
) -> ResolvedMember<'a> {
    let item = lookups.item(record.item_id);
    let unit_value_cents = resolve_unit_value(record, item);
    ResolvedMember {
        record,
        product_name: resolve_product_name(record, item),
        unit_value_cents,
        line_total_cents: record.quantity * unit_value_cents,
    }
}
