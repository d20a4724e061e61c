//! Shared fixtures for integration tests

use merkur::adapters::source::MemorySource;
use merkur::domain::records::SourceRow;
use serde_json::json;

/// Build one submissions row
///
/// `unit_value_cents` is the record's own stored value; the catalog may
/// override it.
#[allow(clippy::too_many_arguments)]
pub fn submission(
    id: i64,
    created_at: &str,
    owner_id: i64,
    location_id: i64,
    wave_id: i64,
    item_type: &str,
    item_id: i64,
    quantity: i64,
    unit_value_cents: i64,
) -> SourceRow {
    json!({
        "id": id,
        "created_at": created_at,
        "owner_id": owner_id,
        "location_id": location_id,
        "wave_id": wave_id,
        "item_type": item_type,
        "item_id": item_id,
        "quantity": quantity,
        "unit_value_cents": unit_value_cents,
        "photo_refs": []
    })
}

/// Memory source preloaded with master data and the wave-item catalog
///
/// Catalog layout:
/// - 10 Schokoriegel 24er  (palette, container "Palette A", 2.00 €)
/// - 11 Müsliriegel 12er   (palette, container "Palette A", 1.50 €)
/// - 12 Aufsteller Deluxe  (display, 49.90 €)
/// - 13 Kaugummi Box       (produkt, no catalog value)
pub fn master_source() -> MemorySource {
    MemorySource::new()
        .with_relation(
            "gebietsleiter",
            vec![
                json!({"id": 1, "name": "Anna Schmidt", "email": "anna@example.de", "telefon": "+49 170 1111111", "region": "Nord", "aktiv": true, "created_at": "2024-06-01T08:00:00Z"}),
                json!({"id": 2, "name": "Jonas Weber", "email": null, "telefon": null, "region": "Süd", "aktiv": false, "created_at": "2024-07-15T08:00:00Z"}),
            ],
        )
        .with_relation(
            "maerkte",
            vec![
                json!({"id": 1, "name": "Markt M1", "strasse": "Hohe Str. 1", "plz": "50667", "ort": "Köln", "region": "Nord", "aktiv": true, "created_at": "2024-01-10T09:00:00Z"}),
                json!({"id": 2, "name": "Markt M2", "strasse": "Sternstr. 5", "plz": "53111", "ort": "Bonn", "region": "Nord", "aktiv": true, "created_at": "2024-02-20T09:00:00Z"}),
            ],
        )
        .with_relation(
            "wellen",
            vec![
                json!({"id": 1, "name": "Frühjahr 2025", "beginn": "2025-03-01", "ende": "2025-04-15", "aktiv": true, "created_at": "2025-01-05T10:00:00Z"}),
                json!({"id": 2, "name": "Ostern 2025", "beginn": "2025-04-01", "ende": "2025-04-21", "aktiv": true, "created_at": "2025-02-01T10:00:00Z"}),
            ],
        )
        .with_relation(
            "wave_items",
            vec![
                json!({"id": 10, "wave_id": 1, "name": "Schokoriegel 24er", "kind": "palette", "container": "Palette A", "unit_value_cents": 200}),
                json!({"id": 11, "wave_id": 1, "name": "Müsliriegel 12er", "kind": "palette", "container": "Palette A", "unit_value_cents": 150}),
                json!({"id": 12, "wave_id": 1, "name": "Aufsteller Deluxe", "kind": "display", "container": null, "unit_value_cents": 4990}),
                json!({"id": 13, "wave_id": 2, "name": "Kaugummi Box", "kind": "produkt", "container": null, "unit_value_cents": null}),
            ],
        )
}

/// The Scenario C record pair: one "Palette A" submission of
/// 3 × 2.00 € + 5 × 1.50 € at Markt M1
pub fn palette_pair() -> Vec<SourceRow> {
    vec![
        submission(1, "2025-03-10T10:00:00Z", 1, 1, 1, "palette", 10, 3, 0),
        submission(2, "2025-03-10T10:00:20Z", 1, 1, 1, "palette", 11, 5, 0),
    ]
}
