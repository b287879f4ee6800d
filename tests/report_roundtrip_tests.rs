//! Writing a report and reading it back preserves the data rows

use pricectl::aggregate::Totals;
use pricectl::inventory::read_inventory;
use pricectl::report::try_write_report;
use pricectl::table::{Cell, Table};
use tempfile::TempDir;

fn priced_table() -> Table {
    let mut table = Table::new(
        ["inst_type", "count", "environment", "hourly_price", "monthly_price", "total_monthly"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );
    table.push_row(vec![
        "t3.micro".into(),
        5.0.into(),
        "prod".into(),
        0.0104.into(),
        7.488.into(),
        37.44.into(),
    ]);
    table.push_row(vec![
        "m5.large".into(),
        Cell::Empty,
        "dev".into(),
        0.096.into(),
        69.12.into(),
        "Invalid count".into(),
    ]);
    table.push_row(vec![
        "x9.mega".into(),
        1.0.into(),
        Cell::Empty,
        "Not found".into(),
        "Not found".into(),
        "Not found".into(),
    ]);
    table
}

fn totals() -> Totals {
    Totals {
        groups: vec![("prod".into(), 37.44)],
        grand_total: Some(37.44),
    }
}

fn assert_data_rows_survive(extension: &str) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(format!("report.{}", extension));
    let table = priced_table();

    try_write_report(&table, Some(&totals()), &path).unwrap();
    let reread = read_inventory(&path).unwrap();

    assert_eq!(reread.headers(), table.headers());
    assert!(reread.len() > table.len());
    for (r, row) in table.rows().iter().enumerate() {
        assert_eq!(&reread.rows()[r], row, "row {} differs", r);
    }
}

#[test]
fn test_csv_roundtrip() {
    assert_data_rows_survive("csv");
}

#[test]
fn test_xlsx_roundtrip() {
    assert_data_rows_survive("xlsx");
}

#[test]
fn test_unsupported_output_extension() {
    let dir = TempDir::new().unwrap();
    let err = try_write_report(&priced_table(), None, &dir.path().join("report.json")).unwrap_err();
    assert!(err.to_string().contains("Unsupported output format"));
    assert!(!dir.path().join("report.json").exists());
}
