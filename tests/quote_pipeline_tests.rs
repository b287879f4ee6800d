//! End-to-end pipeline: inventory file in, report file out, fake price list

mod common;

use common::FakePriceList;
use pricectl::inventory::read_inventory;
use pricectl::pricing::LookupParams;
use pricectl::quote::{run_quote, TOTAL_MONTHLY_COLUMN};
use pricectl::report::{write_report, GRAND_TOTAL_LABEL, GROUP_TOTALS_MARKER};
use pricectl::table::Cell;
use std::fs;
use tempfile::TempDir;

fn write_inventory(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("inventory.csv");
    fs::write(&path, contents).unwrap();
    path
}

fn fake() -> FakePriceList {
    FakePriceList::new()
        .with_price("t3.micro", "0.0104000000")
        .with_price("t3.small", "0.0166666667")
        .with_price("m5.large", "0.0960000000")
}

#[tokio::test]
async fn test_full_run_with_environments() {
    let dir = TempDir::new().unwrap();
    let input = write_inventory(
        &dir,
        "inst_type,count,environment,owner\n\
         t3.micro,5,prod,alice\n\
         m5.large,1,dev,bob\n\
         ,2,dev,carol\n\
         x9.mega,1,qa,dave\n",
    );
    let source = fake();
    let table = read_inventory(&input).unwrap();

    let run = run_quote(&source, table, &LookupParams::new("US East (N. Virginia)"))
        .await
        .unwrap();

    // Blank instance type never reaches the price list
    assert_eq!(source.calls(), 3);
    assert!(run.prices_found());
    assert_eq!(run.errors.len(), 2);
    assert_eq!(
        run.table.headers(),
        &[
            "inst_type",
            "count",
            "environment",
            "owner",
            "hourly_price",
            "monthly_price",
            "total_monthly",
        ]
    );
    // Pass-through column is untouched
    assert_eq!(run.table.get(1, 3), &Cell::Text("bob".into()));
    assert_eq!(run.table.get(2, 4), &Cell::Text("Invalid instance type".into()));
    assert_eq!(run.table.get(3, 6), &Cell::Text("Not found".into()));

    let totals = run.totals.as_ref().unwrap();
    assert!((totals.group("prod").unwrap() - 37.44).abs() < 1e-9);
    assert!((totals.group("dev").unwrap() - 69.12).abs() < 1e-9);
    assert_eq!(totals.group("qa"), None);
    assert!((totals.grand_total.unwrap() - 106.56).abs() < 1e-9);
}

#[tokio::test]
async fn test_run_without_count_column_has_no_totals() {
    let dir = TempDir::new().unwrap();
    let input = write_inventory(&dir, "inst_type\nt3.micro\nt3.small\n");

    let table = read_inventory(&input).unwrap();
    let run = run_quote(&fake(), table, &LookupParams::new("EU (Ireland)"))
        .await
        .unwrap();

    assert!(run.totals.is_none());
    assert!(!run.table.has_column(TOTAL_MONTHLY_COLUMN));
    assert!(run.errors.is_empty());
}

#[tokio::test]
async fn test_run_where_nothing_is_priced() {
    let dir = TempDir::new().unwrap();
    let input = write_inventory(&dir, "inst_type,count\nz1.tiny,1\nz2.tiny,2\n");

    let table = read_inventory(&input).unwrap();
    let run = run_quote(&fake(), table, &LookupParams::new("Unknown region: xx-nowhere-1"))
        .await
        .unwrap();

    assert!(!run.prices_found());
    let totals = run.totals.unwrap();
    assert!(totals.groups.is_empty());
    assert_eq!(totals.grand_total, None);
}

#[tokio::test]
async fn test_report_file_contains_summary_block() {
    let dir = TempDir::new().unwrap();
    let input = write_inventory(
        &dir,
        "inst_type,count,environment\nt3.micro,5,prod\nm5.large,1,dev\n",
    );
    let output = dir.path().join("report.csv");

    let table = read_inventory(&input).unwrap();
    let run = run_quote(&fake(), table, &LookupParams::new("US East (N. Virginia)"))
        .await
        .unwrap();
    assert!(write_report(&run.table, run.totals.as_ref(), &output));

    let report = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    // header, 2 data rows, 2 blanks, marker, dev, prod, blank, grand total
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[3], ",,,,,");
    assert_eq!(lines[4], ",,,,,");
    assert!(lines[5].starts_with(GROUP_TOTALS_MARKER));
    assert!(lines[6].starts_with("dev,"));
    assert!(lines[7].starts_with("prod,"));
    assert!(lines[9].starts_with(GRAND_TOTAL_LABEL));
}

#[tokio::test]
async fn test_spreadsheet_report_is_written() {
    let dir = TempDir::new().unwrap();
    let input = write_inventory(&dir, "inst_type,count\nt3.micro,2\n");
    let output = dir.path().join("report.xlsx");

    let table = read_inventory(&input).unwrap();
    let run = run_quote(&fake(), table, &LookupParams::new("US East (N. Virginia)"))
        .await
        .unwrap();
    assert!(write_report(&run.table, run.totals.as_ref(), &output));

    let reread = read_inventory(&output).unwrap();
    assert_eq!(reread.get(0, 0), &Cell::Text("t3.micro".into()));
    assert_eq!(reread.get(0, 2), &Cell::Number(0.0104));
}
