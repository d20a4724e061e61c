//! Container submission grouping
//!
//! Several records submitted together under one physical container
//! (pallet/crate) arrive as flat timestamped rows. They are recognized by
//! a composite key: the creation timestamp truncated to a tolerance
//! window, the location, and the resolved container name. Truncation is
//! fixed-bucket: two records straddling a bucket boundary do not merge
//! even when they are seconds apart.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::domain::records::RawSubmissionRecord;

/// Default tolerance window for the timestamp bucket, in seconds
pub const DEFAULT_GROUPING_TOLERANCE_SECS: i64 = 60;

/// Composite key identifying one physical container submission
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    /// Timestamp truncated to the tolerance window
    pub bucket: i64,
    pub location_id: Option<i64>,
    pub container: String,
}

impl GroupKey {
    pub fn new(
        created_at: &DateTime<Utc>,
        tolerance_secs: i64,
        location_id: Option<i64>,
        container: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket_timestamp(created_at, tolerance_secs),
            location_id,
            container: container.into(),
        }
    }
}

/// Truncate a timestamp to its tolerance bucket
pub fn bucket_timestamp(ts: &DateTime<Utc>, tolerance_secs: i64) -> i64 {
    let tolerance = tolerance_secs.max(1);
    ts.timestamp().div_euclid(tolerance)
}

/// One bucketed container group, members in query order
#[derive(Debug)]
pub struct Group<'a> {
    pub key: GroupKey,
    pub members: Vec<&'a RawSubmissionRecord>,
}

/// Split records once into standalone records and grouping candidates
///
/// The partition is computed a single time up front; emission later walks
/// the original order, so no record can be consumed twice or dropped.
pub fn partition_records(
    records: &[RawSubmissionRecord],
) -> (Vec<&RawSubmissionRecord>, Vec<&RawSubmissionRecord>) {
    records
        .iter()
        .partition(|record| !record.item_type.carries_container())
}

/// Bucket grouping candidates by their group key
///
/// Groups come back in first-seen order; each group's members keep the
/// order they had in the candidate list (query order).
pub fn bucket_candidates<'a, F>(
    candidates: &[&'a RawSubmissionRecord],
    tolerance_secs: i64,
    container_of: F,
) -> Vec<Group<'a>>
where
    F: Fn(&RawSubmissionRecord) -> String,
{
    let mut groups: Vec<Group<'a>> = Vec::new();
    let mut index_by_key: HashMap<GroupKey, usize> = HashMap::new();

    for &record in candidates {
        let key = GroupKey::new(
            &record.created_at,
            tolerance_secs,
            record.location_id,
            container_of(record),
        );

        match index_by_key.get(&key) {
            Some(&index) => groups[index].members.push(record),
            None => {
                index_by_key.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    members: vec![record],
                });
            }
        }
    }

    groups
}

/// Map record id → group index for the emission walk
pub fn group_membership(groups: &[Group<'_>]) -> HashMap<i64, usize> {
    let mut membership = HashMap::new();
    for (index, group) in groups.iter().enumerate() {
        for member in &group.members {
            membership.insert(member.id, index);
        }
    }
    membership
}
