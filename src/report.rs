//! Report rendering and output
//!
//! The report is the processed inventory table followed by a summary block:
//! two blank rows, the per-group subtotals under a marker row, one more blank
//! row and the grand total. Subtotals sit in the `total_monthly` column so
//! spreadsheet users can sum or compare them in place.

use crate::aggregate::Totals;
use crate::error::{OutputError, Result};
use crate::inventory::{extension, COUNT_COLUMN, ENVIRONMENT_COLUMN, INSTANCE_TYPE_COLUMN};
use crate::quote::{HOURLY_PRICE_COLUMN, MONTHLY_PRICE_COLUMN, TOTAL_MONTHLY_COLUMN};
use crate::table::{Cell, Table};
use comfy_table::{presets::UTF8_FULL, Table as ConsoleTable};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const GROUP_TOTALS_MARKER: &str = "=== Environment Totals ===";
pub const GRAND_TOTAL_LABEL: &str = "GRAND TOTAL";

/// Output formats recognised by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Xlsx,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = extension(path);
        match ext.as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "xlsx" => Ok(OutputFormat::Xlsx),
            _ => Err(OutputError::UnsupportedFormat(format!(".{}", ext)).into()),
        }
    }
}

/// Check that `path` can be written before any price is fetched
pub fn check_destination(path: &Path) -> Result<OutputFormat> {
    let format = OutputFormat::from_path(path)?;
    let dir = parent_dir(path);
    if !dir.is_dir() {
        return Err(OutputError::DirectoryMissing(dir).into());
    }
    Ok(format)
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Copy of `table` with the summary block appended
pub fn with_summary_rows(table: &Table, totals: Option<&Totals>) -> Table {
    let mut report = table.clone();
    let Some(totals) = totals else {
        return report;
    };
    if totals.groups.is_empty() && totals.grand_total.is_none() {
        return report;
    }

    let width = report.width();
    let total_col = report
        .column(TOTAL_MONTHLY_COLUMN)
        .unwrap_or(width.saturating_sub(1));
    let labelled = |label: &str, value: Option<f64>| {
        let mut row = vec![Cell::Empty; width];
        if let Some(value) = value {
            row[total_col] = Cell::Number(value);
        }
        // Label wins when the table has a single column
        row[0] = Cell::Text(label.to_string());
        row
    };

    report.push_blank_row();
    report.push_blank_row();

    if !totals.groups.is_empty() {
        report.push_row(labelled(GROUP_TOTALS_MARKER, None));
        for (group, subtotal) in &totals.groups {
            report.push_row(labelled(group, Some(*subtotal)));
        }
    }

    if let Some(grand_total) = totals.grand_total {
        report.push_blank_row();
        report.push_row(labelled(GRAND_TOTAL_LABEL, Some(grand_total)));
    }

    report
}

pub fn render_csv(table: &Table) -> Result<Vec<u8>> {
    let to_output = |e: csv::Error| OutputError::Write {
        path: PathBuf::from("<csv>"),
        reason: e.to_string(),
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.headers()).map_err(to_output)?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|c| c.to_string()))
            .map_err(to_output)?;
    }
    writer.into_inner().map_err(|e| {
        OutputError::Write {
            path: PathBuf::from("<csv>"),
            reason: e.to_string(),
        }
        .into()
    })
}

pub fn render_xlsx(table: &Table) -> Result<Vec<u8>> {
    render_workbook(table).map_err(|e| {
        OutputError::Write {
            path: PathBuf::from("<xlsx>"),
            reason: e.to_string(),
        }
        .into()
    })
}

fn render_workbook(table: &Table) -> std::result::Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Pricing")?;
        for (col, header) in table.headers().iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, header, &bold)?;
        }
        for (r, row) in table.rows().iter().enumerate() {
            let r = (r + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Empty => {}
                    Cell::Text(text) => {
                        sheet.write_string(r, col as u16, text)?;
                    }
                    Cell::Number(n) => {
                        sheet.write_number(r, col as u16, *n)?;
                    }
                }
            }
        }
    }
    workbook.save_to_buffer()
}

/// Write `bytes` to `destination` through a temporary file in the same
/// directory, so readers never observe a partial report.
fn write_atomically(destination: &Path, bytes: &[u8]) -> Result<()> {
    let dir = parent_dir(destination);
    if !dir.is_dir() {
        return Err(OutputError::DirectoryMissing(dir).into());
    }
    let to_output = |e: std::io::Error| -> OutputError {
        if e.kind() == ErrorKind::PermissionDenied {
            OutputError::PermissionDenied(destination.to_path_buf())
        } else {
            OutputError::Write {
                path: destination.to_path_buf(),
                reason: e.to_string(),
            }
        }
    };

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(to_output)?;
    tmp.write_all(bytes).map_err(to_output)?;
    tmp.flush().map_err(to_output)?;
    tmp.persist(destination).map_err(|e| to_output(e.error))?;
    Ok(())
}

/// Render the report with its summary block and write it to `destination`
pub fn try_write_report(table: &Table, totals: Option<&Totals>, destination: &Path) -> Result<()> {
    let format = OutputFormat::from_path(destination)?;
    let report = with_summary_rows(table, totals);
    let bytes = match format {
        OutputFormat::Csv => render_csv(&report)?,
        OutputFormat::Xlsx => render_xlsx(&report)?,
    };
    debug!(
        "Writing {} rows ({} bytes) to {}",
        report.len(),
        bytes.len(),
        destination.display()
    );
    write_atomically(destination, &bytes)
}

/// `try_write_report` that reports failures instead of returning them
pub fn write_report(table: &Table, totals: Option<&Totals>, destination: &Path) -> bool {
    match try_write_report(table, totals, destination) {
        Ok(()) => true,
        Err(e) => {
            debug!("Report write failed: {:?}", e);
            eprintln!("Error: {}", e);
            false
        }
    }
}

/// Console rendering of the key columns, used when no output file is given
pub fn console_summary(table: &Table) -> ConsoleTable {
    let wanted = [
        INSTANCE_TYPE_COLUMN,
        ENVIRONMENT_COLUMN,
        HOURLY_PRICE_COLUMN,
        MONTHLY_PRICE_COLUMN,
        COUNT_COLUMN,
        TOTAL_MONTHLY_COLUMN,
    ];
    let columns: Vec<(&str, usize)> = wanted
        .iter()
        .filter_map(|name| table.column(name).map(|idx| (*name, idx)))
        .collect();

    let mut console = ConsoleTable::new();
    console.load_preset(UTF8_FULL);
    console.set_header(columns.iter().map(|(name, _)| *name));
    for (r, _) in table.rows().iter().enumerate() {
        console.add_row(columns.iter().map(|(name, idx)| {
            let cell = table.get(r, *idx);
            match (cell, *name) {
                (Cell::Number(n), HOURLY_PRICE_COLUMN) => format!("{:.4}", n),
                (Cell::Number(n), MONTHLY_PRICE_COLUMN | TOTAL_MONTHLY_COLUMN) => {
                    format!("{:.2}", n)
                }
                _ => cell.to_string(),
            }
        }));
    }
    console
}
