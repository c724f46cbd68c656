use std::fs;
use tempfile::tempdir;
use wayfarer_core::{Catalog, CatalogError};

#[test]
fn loads_csv_with_standard_headers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("travel_dataset.csv");
    fs::write(
        &path,
        "City,Country,Description,Avg_Cost,Best_Time_to_Travel\n\
         Goa,India,\"Sunny beaches, nightlife and seafood\",100,Nov-Feb\n\
         Paris,France,Romantic city of art,200,Apr-Jun\n",
    )
    .unwrap();
    let c = Catalog::load(&path).unwrap();
    assert_eq!(c.len(), 2);
    let goa = c.get(0).unwrap();
    assert_eq!(goa.description, "Sunny beaches, nightlife and seafood");
    assert_eq!(goa.avg_cost, 100.0);
    assert_eq!(goa.best_time, "Nov-Feb");
}

#[test]
fn csv_missing_column_fails_fast() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "City,Country,Description,Best_Time_to_Travel\nGoa,India,beach,Nov\n").unwrap();
    assert!(matches!(Catalog::load(&path), Err(CatalogError::Csv { .. })));
}

#[test]
fn csv_unparsable_cost_fails_fast() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "City,Country,Description,Avg_Cost,Best_Time_to_Travel\nGoa,India,beach,cheap,Nov\n").unwrap();
    assert!(matches!(Catalog::load(&path), Err(CatalogError::Csv { .. })));
}

#[test]
fn loads_jsonl_and_skips_blank_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.jsonl");
    fs::write(
        &path,
        r#"{"city":"Pokhara","country":"Nepal","description":"lakes and treks","avg_cost":60,"best_time":"Oct"}

{"City":"Kandy","Country":"Sri Lanka","Description":"tea hills","Avg_Cost":70,"Best_Time_to_Travel":"Jan"}
"#,
    )
    .unwrap();
    let c = Catalog::load(&path).unwrap();
    assert_eq!(c.len(), 2);
    assert_eq!(c.get(1).unwrap().country, "Sri Lanka");
}

#[test]
fn jsonl_reports_line_of_bad_row() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.jsonl");
    fs::write(
        &path,
        "{\"city\":\"Pokhara\",\"country\":\"Nepal\",\"description\":\"lakes\",\"avg_cost\":60,\"best_time\":\"Oct\"}\n{\"city\":\"Kandy\"}\n",
    )
    .unwrap();
    assert!(matches!(Catalog::load(&path), Err(CatalogError::Json { line: 2, .. })));
}

#[test]
fn loads_json_array() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(
        &path,
        r#"[{"city":"Cusco","country":"Peru","description":"inca ruins","avg_cost":90,"best_time":"May"}]"#,
    )
    .unwrap();
    assert_eq!(Catalog::load(&path).unwrap().get(0).unwrap().city, "Cusco");
}

#[test]
fn json_array_reports_element_of_bad_row() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(
        &path,
        r#"[{"city":"Cusco","country":"Peru","description":"inca ruins","avg_cost":90,"best_time":"May"},{"city":"Lima"}]"#,
    )
    .unwrap();
    let err = Catalog::load(&path).unwrap_err();
    assert!(matches!(err, CatalogError::JsonElement { element: 1, .. }));
    assert!(err.to_string().contains("element 1"));

    fs::write(&path, "[{").unwrap();
    assert!(matches!(Catalog::load(&path), Err(CatalogError::JsonDocument { .. })));
}

#[test]
fn rejects_unknown_extension_and_missing_file() {
    assert!(matches!(Catalog::load("catalog.xlsx"), Err(CatalogError::UnsupportedFormat(_))));
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.jsonl");
    assert!(matches!(Catalog::load(&missing), Err(CatalogError::Io { .. })));
}

#[test]
fn bundled_sample_catalog_is_valid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/travel_dataset.csv");
    let c = Catalog::load(path).unwrap();
    assert!(c.len() >= 10);
}
