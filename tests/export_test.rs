//! Export orchestrator integration tests
//!
//! Runs whole export calls against the in-memory source and checks the
//! skip policy, abort semantics, worksheet ordering and the produced
//! OOXML container.

mod common;

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::Arc;

use merkur::adapters::source::MemorySource;
use merkur::core::export::{DatasetOutcome, ExportService, ExportSettings, SkipReason};
use merkur::domain::request::{ExportOptions, ExportRequest};
use merkur::domain::MerkurError;
use zip::ZipArchive;

use common::{master_source, palette_pair, submission};

fn service(source: MemorySource) -> ExportService {
    ExportService::new(Arc::new(source), ExportSettings::default())
}

fn request(datasets: &[&str]) -> ExportRequest {
    ExportRequest {
        datasets: datasets.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

/// Read one part of the produced container as text
fn part(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

#[tokio::test]
async fn scenario_b_zero_columns_skips_dataset_but_export_succeeds() {
    let source = master_source().with_relation("submissions", palette_pair());
    let mut request = request(&["gebietsleiter", "submissions"]);
    request.columns.insert("gebietsleiter".to_string(), vec![]);

    let outcome = service(source).execute(&request).await.unwrap();

    assert!(matches!(
        outcome.summary.datasets[0].1,
        DatasetOutcome::Skipped {
            reason: SkipReason::NoColumns
        }
    ));
    assert_eq!(outcome.summary.rendered_count(), 1);

    let workbook = part(&outcome.document.bytes, "xl/workbook.xml");
    assert!(workbook.contains("Einreichungen"));
    assert!(!workbook.contains("Gebietsleiter"));
}

#[tokio::test]
async fn scenario_d_all_datasets_empty_is_empty_result() {
    let source = master_source()
        .with_relation("submissions", vec![])
        .with_relation("gebietsleiter", vec![]);

    let err = service(source)
        .execute(&request(&["submissions", "gebietsleiter"]))
        .await
        .unwrap_err();

    assert!(matches!(err, MerkurError::EmptyResult));
}

#[tokio::test]
async fn unknown_dataset_skipped_with_warning_not_fatal() {
    let source = master_source().with_relation("submissions", palette_pair());

    let outcome = service(source)
        .execute(&request(&["umsatz", "submissions"]))
        .await
        .unwrap();

    assert!(matches!(
        outcome.summary.datasets[0].1,
        DatasetOutcome::Skipped {
            reason: SkipReason::UnknownDataset
        }
    ));
    assert_eq!(outcome.summary.rendered_count(), 1);
}

#[tokio::test]
async fn worksheets_follow_request_order() {
    let source = master_source().with_relation("submissions", palette_pair());

    let outcome = service(source)
        .execute(&request(&["wellen", "submissions", "gebietsleiter"]))
        .await
        .unwrap();

    let workbook = part(&outcome.document.bytes, "xl/workbook.xml");
    let wellen = workbook.find("Wellen").unwrap();
    let submissions = workbook.find("Einreichungen").unwrap();
    let owners = workbook.find(r#""Gebietsleiter""#).unwrap();
    assert!(wellen < submissions);
    assert!(submissions < owners);
}

#[tokio::test]
async fn product_details_sheet_appended_after_submissions() {
    let source = master_source().with_relation("submissions", palette_pair());

    let outcome = service(source)
        .execute(&request(&["submissions", "wellen"]))
        .await
        .unwrap();

    let workbook = part(&outcome.document.bytes, "xl/workbook.xml");
    let submissions = workbook.find("Einreichungen").unwrap();
    let details = workbook.find("Produktdetails").unwrap();
    let wellen = workbook.find("Wellen").unwrap();
    assert!(submissions < details);
    assert!(details < wellen, "detail sheet sits right after submissions");

    // 3 dataset sheets + the detail sheet... wellen + submissions +
    // details here
    assert_eq!(outcome.summary.worksheets, 3);
}

#[tokio::test]
async fn expand_mode_has_no_product_details_sheet() {
    let source = master_source().with_relation("submissions", palette_pair());
    let mut request = request(&["submissions"]);
    request.options = ExportOptions {
        expand_palette_products: true,
        file_name: None,
    };

    let outcome = service(source).execute(&request).await.unwrap();

    let workbook = part(&outcome.document.bytes, "xl/workbook.xml");
    assert!(!workbook.contains("Produktdetails"));
    assert_eq!(outcome.summary.worksheets, 1);
}

#[tokio::test]
async fn source_failure_aborts_whole_export() {
    // gebietsleiter would render fine on its own; the submissions read
    // failing must take the entire export down
    let source = master_source()
        .with_relation("submissions", palette_pair())
        .failing_relation("submissions");

    let err = service(source)
        .execute(&request(&["gebietsleiter", "submissions"]))
        .await
        .unwrap_err();

    assert!(matches!(err, MerkurError::Source(_)));
}

#[tokio::test]
async fn validation_rejects_empty_request_before_any_fetch() {
    // The failing source proves nothing was fetched: validation fires
    // first
    let source = master_source().failing_relation("submissions");

    let err = service(source)
        .execute(&ExportRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, MerkurError::Validation(_)));
}

#[tokio::test]
async fn caller_filename_and_derived_default() {
    let source = master_source().with_relation("submissions", palette_pair());
    let mut named = request(&["submissions"]);
    named.options.file_name = Some("maerz-bericht".to_string());

    let outcome = service(source).execute(&named).await.unwrap();
    assert_eq!(outcome.document.file_name, "maerz-bericht.xlsx");

    let source = master_source().with_relation("submissions", palette_pair());
    let outcome = service(source)
        .execute(&request(&["submissions"]))
        .await
        .unwrap();
    assert!(outcome.document.file_name.starts_with("merkur-export_"));
    assert!(outcome.document.file_name.ends_with(".xlsx"));
}

#[tokio::test]
async fn default_columns_used_when_selection_missing() {
    let source = master_source().with_relation(
        "submissions",
        vec![submission(
            1,
            "2025-03-10T10:00:00Z",
            1,
            1,
            1,
            "produkt",
            13,
            2,
            75,
        )],
    );

    let outcome = service(source)
        .execute(&request(&["submissions"]))
        .await
        .unwrap();

    let sheet = part(&outcome.document.bytes, "xl/worksheets/sheet1.xml");
    let strings = part(&outcome.document.bytes, "xl/sharedStrings.xml");
    // Default selection includes the headline columns
    for header in ["Datum", "Artikel", "Menge", "Gesamtwert"] {
        assert!(strings.contains(header), "missing header {header}");
    }
    // The non-default photo column stays out
    assert!(!strings.contains("Fotos"));
    assert!(sheet.contains(r#"<pane ySplit="1""#), "header row frozen");
}

#[tokio::test]
async fn unknown_columns_dropped_known_ones_survive() {
    let source = master_source().with_relation("submissions", palette_pair());
    let mut req = request(&["submissions"]);
    req.columns.insert(
        "submissions".to_string(),
        vec![
            "artikel".to_string(),
            "does_not_exist".to_string(),
            "gesamtwert".to_string(),
        ],
    );

    let outcome = service(source).execute(&req).await.unwrap();
    let strings = part(&outcome.document.bytes, "xl/sharedStrings.xml");
    assert!(strings.contains("Artikel"));
    assert!(strings.contains("Gesamtwert"));
    assert!(!strings.contains("does_not_exist"));
}

#[tokio::test]
async fn dataset_with_rows_renders_even_when_others_are_empty() {
    let source = master_source().with_relation("submissions", vec![]);

    let outcome = service(source)
        .execute(&request(&["submissions", "maerkte"]))
        .await
        .unwrap();

    let outcomes: HashMap<&str, &DatasetOutcome> = outcome
        .summary
        .datasets
        .iter()
        .map(|(id, o)| (id.as_str(), o))
        .collect();

    assert!(matches!(
        outcomes["submissions"],
        DatasetOutcome::Skipped {
            reason: SkipReason::NoRows
        }
    ));
    assert!(matches!(
        outcomes["maerkte"],
        DatasetOutcome::Rendered { rows: 2 }
    ));
    assert_eq!(outcome.summary.worksheets, 1);
}
