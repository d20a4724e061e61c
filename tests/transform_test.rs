//! Row transformer integration tests
//!
//! Exercises the transform pipeline against an in-memory source:
//! grouping behavior, the exactly-once coverage guarantee, value
//! resolution, projection and ordering.

mod common;

use merkur::core::transform::transform_dataset;
use merkur::domain::export_row::{ExportRow, FieldValue, RowRole};
use merkur::domain::request::ExportFilters;
use merkur::domain::MerkurError;

use common::{master_source, palette_pair, submission};

const TOLERANCE: i64 = 60;

fn all_submission_columns() -> Vec<String> {
    merkur::registry::all_columns("submissions")
        .iter()
        .map(|c| c.id.to_string())
        .collect()
}

async fn transform(
    source: &merkur::adapters::source::MemorySource,
    expand: bool,
) -> Vec<ExportRow> {
    transform_dataset(
        source,
        "submissions",
        &all_submission_columns(),
        &ExportFilters::default(),
        expand,
        TOLERANCE,
    )
    .await
    .unwrap()
}

fn currency(row: &ExportRow, column: &str) -> i64 {
    match row.values.get(column) {
        Some(FieldValue::Currency(cents)) => *cents,
        other => panic!("expected currency in '{column}', got {other:?}"),
    }
}

fn text<'a>(row: &'a ExportRow, column: &str) -> &'a str {
    match row.values.get(column) {
        Some(FieldValue::Text(text)) => text,
        other => panic!("expected text in '{column}', got {other:?}"),
    }
}

#[tokio::test]
async fn scenario_a_minute_bucket_truncation() {
    // Same location, same container: 10:00:00 and 10:00:40 share the
    // 10:00 bucket; 10:01:10 starts its own group.
    let source = master_source().with_relation(
        "submissions",
        vec![
            submission(1, "2025-03-10T10:00:00Z", 1, 1, 1, "palette", 10, 1, 0),
            submission(2, "2025-03-10T10:00:40Z", 1, 1, 1, "palette", 11, 1, 0),
            submission(3, "2025-03-10T10:01:10Z", 1, 1, 1, "palette", 10, 1, 0),
        ],
    );

    let rows = transform(&source, false).await;

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.role == RowRole::Compact));
    // Query order is newest first, so the single-member 10:01 group
    // comes before the 10:00 pair
    assert_eq!(rows[0].product_details.len(), 1);
    assert_eq!(rows[1].product_details.len(), 2);
    assert_ne!(rows[0].group_id, rows[1].group_id);
}

#[tokio::test]
async fn scenario_c_compact_row_label_and_total() {
    let source = master_source().with_relation("submissions", palette_pair());

    let rows = transform(&source, false).await;
    assert_eq!(rows.len(), 1);

    let row = &rows[0];
    assert_eq!(row.role, RowRole::Compact);
    assert_eq!(currency(row, "gesamtwert"), 1350);

    let label = text(row, "artikel");
    let lines: Vec<&str> = label.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("(5×)"), "newest member first: {label}");
    assert!(lines.iter().any(|l| l.contains("Schokoriegel 24er (3×)")));
    assert!(lines.iter().any(|l| l.contains("Müsliriegel 12er (5×)")));
    assert_eq!(*lines.last().unwrap(), "Total: €13.50");

    // Full join-resolved context rides along for the detail sheet
    assert_eq!(row.product_details.len(), 2);
    let detail = &row.product_details[1];
    assert_eq!(detail.owner_name, "Anna Schmidt");
    assert_eq!(detail.location_name, "Markt M1");
    assert_eq!(detail.wave_name, "Frühjahr 2025");
    assert_eq!(detail.container_name, "Palette A");
    assert_eq!(detail.line_total_cents, 600);
}

#[tokio::test]
async fn expand_mode_emits_parent_then_children() {
    let source = master_source().with_relation("submissions", palette_pair());

    let rows = transform(&source, true).await;
    assert_eq!(rows.len(), 3);

    let parent = &rows[0];
    assert_eq!(parent.role, RowRole::Parent);
    assert_eq!(text(parent, "artikel"), "Palette A");
    assert_eq!(parent.values.get("menge"), Some(&FieldValue::Number(1.0)));
    assert_eq!(currency(parent, "einzelwert"), 1350);
    assert_eq!(currency(parent, "gesamtwert"), 1350);

    for child in &rows[1..] {
        assert_eq!(child.role, RowRole::Child);
        assert!(text(child, "artikel").starts_with("└ "));
        assert_eq!(child.group_id, parent.group_id);
    }
    // Children carry their own quantities and values
    assert_eq!(currency(&rows[1], "gesamtwert"), 750);
    assert_eq!(currency(&rows[2], "gesamtwert"), 600);
}

#[tokio::test]
async fn sum_invariant_holds_in_both_modes() {
    let source = master_source().with_relation("submissions", palette_pair());

    let compact = transform(&source, false).await;
    let expanded = transform(&source, true).await;

    let compact_total = currency(&compact[0], "gesamtwert");
    let parent_total = currency(&expanded[0], "gesamtwert");
    let children_total: i64 = expanded[1..]
        .iter()
        .map(|row| currency(row, "gesamtwert"))
        .sum();

    assert_eq!(compact_total, 1350);
    assert_eq!(parent_total, compact_total);
    assert_eq!(children_total, compact_total);

    let details_total: i64 = compact[0]
        .product_details
        .iter()
        .map(|d| d.line_total_cents)
        .sum();
    assert_eq!(details_total, compact_total);
}

#[tokio::test]
async fn coverage_invariant_every_record_exactly_once() {
    // A mix: a palette pair, a second palette pair plus a lone kiste at
    // the same market and minute, one display, one plain product
    let source = master_source().with_relation(
        "submissions",
        vec![
            submission(1, "2025-03-10T10:00:00Z", 1, 1, 1, "palette", 10, 3, 0),
            submission(2, "2025-03-10T10:00:20Z", 1, 1, 1, "palette", 11, 5, 0),
            submission(3, "2025-03-10T11:30:00Z", 2, 2, 1, "palette", 10, 2, 0),
            submission(4, "2025-03-10T11:30:10Z", 2, 2, 1, "palette", 11, 2, 0),
            submission(5, "2025-03-10T11:30:20Z", 2, 2, 1, "kiste", 99, 1, 0),
            submission(6, "2025-03-11T09:00:00Z", 1, 1, 1, "display", 12, 1, 0),
            submission(7, "2025-03-11T09:05:00Z", 1, 2, 2, "produkt", 13, 4, 75),
        ],
    );
    let record_count = 7;

    // Compact mode: standalone rows count one record, compact rows their
    // group size
    let compact = transform(&source, false).await;
    let covered: usize = compact
        .iter()
        .map(|row| match row.role {
            RowRole::Standalone => 1,
            RowRole::Compact => row.product_details.len(),
            other => panic!("unexpected role {other:?} in compact mode"),
        })
        .sum();
    assert_eq!(covered, record_count);

    // Expand mode: standalone and child rows each stand for one record
    let expanded = transform(&source, true).await;
    let covered: usize = expanded
        .iter()
        .filter(|row| matches!(row.role, RowRole::Standalone | RowRole::Child))
        .count();
    assert_eq!(covered, record_count);

    // The kiste record resolves to a different container name and must
    // not merge into the palette group despite identical bucket and
    // location
    let kiste_groups = expanded
        .iter()
        .filter(|row| row.role == RowRole::Parent)
        .filter(|row| text(row, "artikel").contains("Kiste"))
        .count();
    assert_eq!(kiste_groups, 1);
}

#[tokio::test]
async fn bulk_coverage_and_sum_invariants_randomized() {
    use fake::Fake;

    // 40 palette records with arbitrary quantities spread over ~11
    // minutes; whatever the grouping comes out as, nothing may be lost
    // or counted twice and the money must add up exactly
    let base: chrono::DateTime<chrono::Utc> = "2025-03-10T08:00:00Z".parse().unwrap();
    let mut rows = Vec::new();
    let mut expected_total: i64 = 0;

    for i in 0..40i64 {
        let quantity: i64 = (1..9i64).fake();
        let item_id = if i % 3 == 0 { 11 } else { 10 };
        let unit_cents = if item_id == 11 { 150 } else { 200 };
        expected_total += quantity * unit_cents;

        let ts = base + chrono::Duration::seconds(i * 17);
        rows.push(submission(
            i + 1,
            &ts.to_rfc3339(),
            1,
            if i % 2 == 0 { 1 } else { 2 },
            1,
            "palette",
            item_id,
            quantity,
            0,
        ));
    }

    let source = master_source().with_relation("submissions", rows);
    let compact = transform(&source, false).await;

    let covered: usize = compact.iter().map(|row| row.product_details.len()).sum();
    assert_eq!(covered, 40);

    let total: i64 = compact.iter().map(|row| currency(row, "gesamtwert")).sum();
    assert_eq!(total, expected_total);

    // Group ids are unique per emitted group
    let mut ids: Vec<&String> = compact.iter().filter_map(|r| r.group_id.as_ref()).collect();
    let emitted = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), emitted);
}

#[tokio::test]
async fn idempotence_same_input_same_output() {
    let source = master_source().with_relation(
        "submissions",
        vec![
            submission(1, "2025-03-10T10:00:00Z", 1, 1, 1, "palette", 10, 3, 0),
            submission(2, "2025-03-10T10:00:20Z", 1, 1, 1, "palette", 11, 5, 0),
            submission(3, "2025-03-11T09:00:00Z", 1, 1, 1, "display", 12, 1, 0),
        ],
    );

    let first = transform(&source, false).await;
    let second = transform(&source, false).await;
    assert_eq!(first, second);

    let first_expanded = transform(&source, true).await;
    let second_expanded = transform(&source, true).await;
    assert_eq!(first_expanded, second_expanded);
}

#[tokio::test]
async fn column_projection_never_leaks_unselected_columns() {
    let source = master_source().with_relation("submissions", palette_pair());
    let selected = vec!["created_at".to_string(), "gesamtwert".to_string()];

    let rows = transform_dataset(
        &source,
        "submissions",
        &selected,
        &ExportFilters::default(),
        false,
        TOLERANCE,
    )
    .await
    .unwrap();

    for row in &rows {
        for key in row.values.keys() {
            assert!(selected.contains(key), "unselected column '{key}' leaked");
        }
        // Structural metadata stays regardless of the selection
        assert!(row.group_id.is_some());
        assert_eq!(row.role, RowRole::Compact);
    }
}

#[tokio::test]
async fn unit_value_resolution_priority() {
    let source = master_source().with_relation(
        "submissions",
        vec![
            // Catalog declares 2.00, record claims 9.99: catalog wins
            submission(1, "2025-03-10T10:00:00Z", 1, 1, 1, "produkt", 10, 1, 999),
            // Catalog has no value: the record's own value applies
            submission(2, "2025-03-09T10:00:00Z", 1, 1, 2, "produkt", 13, 2, 75),
        ],
    );

    let rows = transform(&source, false).await;
    assert_eq!(currency(&rows[0], "einzelwert"), 200);
    assert_eq!(currency(&rows[1], "einzelwert"), 75);
    assert_eq!(currency(&rows[1], "gesamtwert"), 150);
}

#[tokio::test]
async fn empty_record_set_yields_empty_sequence() {
    let source = master_source().with_relation("submissions", vec![]);
    let rows = transform(&source, false).await;
    assert!(rows.is_empty());
}

#[tokio::test]
async fn unknown_dataset_is_an_error() {
    let source = master_source();
    let err = transform_dataset(
        &source,
        "umsatz",
        &[],
        &ExportFilters::default(),
        false,
        TOLERANCE,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, MerkurError::UnknownDataset(_)));
}

#[tokio::test]
async fn source_failure_in_lookup_aborts_transform() {
    let source = master_source()
        .with_relation("submissions", palette_pair())
        .failing_relation("wellen");

    let result = transform_dataset(
        &source,
        "submissions",
        &all_submission_columns(),
        &ExportFilters::default(),
        false,
        TOLERANCE,
    )
    .await;

    assert!(matches!(result, Err(MerkurError::Source(_))));
}

#[tokio::test]
async fn master_dataset_rows_are_standalone() {
    let source = master_source();
    let selected = vec!["name".to_string(), "aktiv".to_string()];

    let rows = transform_dataset(
        &source,
        "gebietsleiter",
        &selected,
        &ExportFilters::default(),
        false,
        TOLERANCE,
    )
    .await
    .unwrap();

    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.role, RowRole::Standalone);
        assert!(row.group_id.is_none());
        assert!(row.product_details.is_empty());
    }
    let names: Vec<&str> = rows.iter().map(|r| text(r, "name")).collect();
    assert!(names.contains(&"Anna Schmidt"));
    assert_eq!(
        rows.iter()
            .filter(|r| r.values.get("aktiv") == Some(&FieldValue::Bool(false)))
            .count(),
        1
    );
}

#[tokio::test]
async fn owner_filter_reaches_the_source() {
    let source = master_source().with_relation(
        "submissions",
        vec![
            submission(1, "2025-03-10T10:00:00Z", 1, 1, 1, "produkt", 13, 1, 50),
            submission(2, "2025-03-10T11:00:00Z", 2, 1, 1, "produkt", 13, 1, 50),
        ],
    );
    let filters = ExportFilters {
        owner_ids: Some(vec![2]),
        ..Default::default()
    };

    let rows = transform_dataset(
        &source,
        "submissions",
        &all_submission_columns(),
        &filters,
        false,
        TOLERANCE,
    )
    .await
    .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(text(&rows[0], "gebietsleiter"), "Jonas Weber");
}
