//! Inventory loading
//!
//! Reads the inventory table from CSV or a spreadsheet and exposes the
//! columns the quote pipeline cares about as typed `InventoryRow`s. Every
//! other column is carried through untouched to the report.

use crate::error::{InputError, Result};
use crate::table::{Cell, Table};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{debug, warn};

pub const INSTANCE_TYPE_COLUMN: &str = "inst_type";
pub const COUNT_COLUMN: &str = "count";
pub const ENVIRONMENT_COLUMN: &str = "environment";

/// Input formats recognised by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Spreadsheet,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = extension(path);
        match ext.as_str() {
            "csv" => Ok(InputFormat::Csv),
            "xlsx" | "xls" | "xlsm" | "ods" => Ok(InputFormat::Spreadsheet),
            _ => Err(InputError::UnsupportedFormat(format!(".{}", ext)).into()),
        }
    }
}

pub(crate) fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Read the inventory table, failing on anything that should stop the run
/// before prices are fetched.
pub fn read_inventory(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()).into());
    }

    let table = match InputFormat::from_path(path)? {
        InputFormat::Csv => read_csv(path)?,
        InputFormat::Spreadsheet => read_spreadsheet(path)?,
    };

    if table.width() == 0 {
        return Err(InputError::Empty(path.to_path_buf()).into());
    }
    if !table.has_column(INSTANCE_TYPE_COLUMN) {
        return Err(InputError::MissingColumn(INSTANCE_TYPE_COLUMN.to_string()).into());
    }
    if table.is_empty() {
        warn!("Input file '{}' is empty", path.display());
    }

    debug!(
        "Loaded {} rows with columns [{}] from {}",
        table.len(),
        table.headers().join(", "),
        path.display()
    );
    Ok(table)
}

fn read_csv(path: &Path) -> Result<Table> {
    let parse_err = |e: csv::Error| InputError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    // Short rows are padded to the header width by `Table::push_row`
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(parse_err)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(parse_err)?
        .iter()
        .map(str::to_string)
        .collect();

    // A header row made of nothing is an empty file
    if headers.iter().all(|h| h.is_empty()) {
        return Ok(Table::default());
    }

    let mut table = Table::new(headers);
    for record in reader.records() {
        let record = record.map_err(parse_err)?;
        table.push_row(record.iter().map(Cell::parse).collect());
    }
    Ok(table)
}

fn read_spreadsheet(path: &Path) -> Result<Table> {
    let parse_err = |reason: String| InputError::Parse {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| parse_err(e.to_string()))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| parse_err(e.to_string()))?,
        None => return Ok(Table::default()),
    };

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|c| cell_from_sheet(c).to_string()).collect(),
        None => return Ok(Table::default()),
    };

    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row.iter().map(cell_from_sheet).collect());
    }
    Ok(table)
}

fn cell_from_sheet(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.trim().to_string()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        other => Cell::Text(other.to_string()),
    }
}

/// Positions of the columns the pipeline reads
#[derive(Debug, Clone, Copy)]
pub struct InventoryColumns {
    pub instance_type: usize,
    pub count: Option<usize>,
    pub environment: Option<usize>,
}

impl InventoryColumns {
    pub fn locate(table: &Table) -> Result<Self> {
        let instance_type = table
            .column(INSTANCE_TYPE_COLUMN)
            .ok_or_else(|| InputError::MissingColumn(INSTANCE_TYPE_COLUMN.to_string()))?;
        Ok(Self {
            instance_type,
            count: table.column(COUNT_COLUMN),
            environment: table.column(ENVIRONMENT_COLUMN),
        })
    }
}

/// Typed view of one inventory line
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRow {
    /// Present only for non-blank text cells
    pub instance_type: Option<String>,
    /// Raw count cell; `None` when the table has no count column
    pub count: Option<Cell>,
    pub environment: Option<String>,
}

impl InventoryRow {
    pub fn new(instance_type: &str) -> Self {
        let instance_type = Some(instance_type.to_string()).filter(|s| !s.trim().is_empty());
        Self {
            instance_type,
            count: None,
            environment: None,
        }
    }

    pub fn with_count(mut self, count: impl Into<Cell>) -> Self {
        self.count = Some(count.into());
        self
    }

    pub fn with_environment(mut self, environment: &str) -> Self {
        self.environment = Some(environment.to_string());
        self
    }

    pub fn from_table(table: &Table, row: usize, columns: &InventoryColumns) -> Self {
        let instance_type = table
            .get(row, columns.instance_type)
            .as_text()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string);
        let count = columns.count.map(|col| table.get(row, col).clone());
        let environment = columns
            .environment
            .map(|col| table.get(row, col))
            .filter(|cell| !cell.is_empty())
            .map(|cell| cell.to_string());

        Self {
            instance_type,
            count,
            environment,
        }
    }
}
