//! Integration tests for the parse, store, compare and search pipeline

use std::fs;

use indoc::indoc;
use pretty_assertions::assert_eq;
use schdiff_compare::{
    CompareError, DiffStatus, SchemaComparator, SearchFilter, read_report, write_report,
};
use schdiff_core::SchParser;
use schdiff_storage::{LiveDatabase, SchemaStore};
use tempfile::tempdir;

const STORED: &str = indoc! {"
    customer^id^INT^4^1^
    customer^name^VARCHAR^64^2^
    customer^age^INT^8^3^
"};

const CURRENT: &str = indoc! {"
    customer^id^INT^4^1^
    customer^name^VARCHAR^64^2^
    customer^age^INT^4^3^
    customer^email^VARCHAR^255^4^
"};

#[test]
fn test_full_pipeline_round_trip() {
    let dir = tempdir().unwrap();
    let stored_path = dir.path().join("old.sch");
    let current_path = dir.path().join("ds.sch");
    let db_path = dir.path().join("schema.db");
    let report_path = dir.path().join("schema_differences.json");
    fs::write(&stored_path, STORED).unwrap();
    fs::write(&current_path, CURRENT).unwrap();

    // Parser step
    {
        let parsed = SchParser::new().parse_file(&stored_path).unwrap();
        let mut store = SchemaStore::open(&db_path).unwrap();
        store.replace(&parsed.schema).unwrap();
    }

    // Comparer step
    let current = SchParser::new().parse_file(&current_path).unwrap().schema;
    let store = SchemaStore::open_read_only(&db_path).unwrap();
    let report = SchemaComparator::new()
        .compare_with(&current, &store)
        .unwrap();
    write_report(&report_path, report.records()).unwrap();

    let raw = fs::read_to_string(&report_path).unwrap();
    assert!(raw.starts_with("[\n  {\n    \"status\": \"different\""));
    assert!(raw.contains("\"db_info\": null"));

    // Searcher step
    let records = read_report(&report_path).unwrap();
    assert_eq!(records, report.clone().into_records());

    let sizes = SearchFilter::size_mismatches().apply(&records);
    assert_eq!(sizes.len(), 1);
    assert_eq!(sizes[0].column, "age");

    let missing = SearchFilter::new()
        .with_status(DiffStatus::MissingInDb)
        .apply(&records);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].column, "email");
    assert!(missing[0].db_info.is_none());
}

#[test]
fn test_parse_store_and_read_back_is_identical() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("schema.db");
    let schema = SchParser::new().parse_str(CURRENT).unwrap().schema;

    SchemaStore::open(&db_path).unwrap().save(&schema).unwrap();
    let loaded = SchemaStore::open_read_only(&db_path).unwrap().load().unwrap();

    let mut expected: Vec<_> = schema.entries().collect();
    let mut actual: Vec<_> = loaded.entries().collect();
    expected.sort();
    actual.sort();
    assert_eq!(actual, expected);
}

#[test]
fn test_compare_against_live_database_tables() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("app.db");
    {
        let conn = rusqlite_fixture(&db_path);
        drop(conn);
    }

    let file = SchParser::new()
        .parse_str("customer^id^INTEGER^^1^\ncustomer^name^VARCHAR^64^2^\ncustomer^age^INT^^4^\n")
        .unwrap()
        .schema;
    let live = LiveDatabase::open(&db_path).unwrap();
    let report = SchemaComparator::new().compare_with(&file, &live).unwrap();

    assert_eq!(report.len(), 1);
    let record = &report.records()[0];
    assert_eq!(record.column, "age");
    assert_eq!(record.status, DiffStatus::Different);
    assert_eq!(record.db_info.as_ref().unwrap().position, "3");
}

#[test]
fn test_read_report_errors_name_the_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    assert!(matches!(
        read_report(&missing),
        Err(CompareError::ReportNotFound(_))
    ));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{not json").unwrap();
    let err = read_report(&broken).unwrap_err();
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn test_empty_report_writes_empty_array() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("none.json");
    write_report(&path, &[]).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
}

fn rusqlite_fixture(path: &std::path::Path) -> rusqlite::Connection {
    let conn = rusqlite::Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE customer (
            id INTEGER PRIMARY KEY,
            name VARCHAR(64),
            age INT
        );",
    )
    .unwrap();
    conn
}
