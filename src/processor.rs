//! Per-row validation, lookup and cost derivation

use crate::error::LookupError;
use crate::inventory::InventoryRow;
use crate::pricing::{log_lookup_failure, lookup_price, LookupParams, PriceListSource};
use crate::table::Cell;
use std::fmt;

/// Hours billed per month. A fixed 30-day month, not calendar accurate.
pub const HOURS_PER_MONTH: f64 = 24.0 * 30.0;

/// Why a price field carries no number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorTag {
    NotFound,
    InvalidInstanceType,
    InvalidCount,
    Error,
}

impl ErrorTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorTag::NotFound => "Not found",
            ErrorTag::InvalidInstanceType => "Invalid instance type",
            ErrorTag::InvalidCount => "Invalid count",
            ErrorTag::Error => "Error",
        }
    }
}

impl fmt::Display for ErrorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A price field: either a number or the reason it is missing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Priced {
    Value(f64),
    Tag(ErrorTag),
}

impl Priced {
    pub fn value(&self) -> Option<f64> {
        match self {
            Priced::Value(v) => Some(*v),
            Priced::Tag(_) => None,
        }
    }

    pub fn to_cell(&self) -> Cell {
        match self {
            Priced::Value(v) => Cell::Number(*v),
            Priced::Tag(tag) => Cell::Text(tag.as_str().to_string()),
        }
    }
}

/// Prices derived for one inventory row
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub hourly_price: Priced,
    pub monthly_price: Priced,
    /// `None` when the inventory has no count column
    pub total_monthly: Option<Priced>,
}

impl PriceQuote {
    fn tagged(tag: ErrorTag, with_total: bool) -> Self {
        Self {
            hourly_price: Priced::Tag(tag),
            monthly_price: Priced::Tag(tag),
            total_monthly: with_total.then_some(Priced::Tag(tag)),
        }
    }

    pub fn is_priced(&self) -> bool {
        self.hourly_price.value().is_some()
    }
}

/// Result of processing one row: the quote, messages for the error summary,
/// and the line shown to the user
#[derive(Debug, Clone)]
pub struct RowOutcome {
    pub quote: PriceQuote,
    pub errors: Vec<String>,
    pub summary: String,
}

enum CountCheck {
    Absent,
    Valid(u64),
    Invalid(String),
}

fn check_count(count: Option<&Cell>) -> CountCheck {
    let Some(cell) = count else {
        return CountCheck::Absent;
    };
    let parsed = match cell {
        Cell::Number(n) if n.fract() == 0.0 => Some(*n as i64),
        Cell::Text(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n > 0 => CountCheck::Valid(n as u64),
        Some(_) => CountCheck::Invalid(format!(
            "Count must be a positive integer, found: {}",
            cell
        )),
        None => CountCheck::Invalid(format!("Count must be a number, found: {}", cell)),
    }
}

/// Price one inventory row.
///
/// `index` is the zero-based data row index; messages use 1-based row numbers.
pub async fn process_row(
    source: &dyn PriceListSource,
    index: usize,
    row: &InventoryRow,
    params: &LookupParams,
) -> RowOutcome {
    let has_count = row.count.is_some();
    let row_no = index + 1;

    let Some(instance_type) = row.instance_type.as_deref() else {
        return RowOutcome {
            quote: PriceQuote::tagged(ErrorTag::InvalidInstanceType, has_count),
            errors: vec![format!("Row {}: Invalid or empty instance type", row_no)],
            summary: format!("Row {}: invalid instance type, skipped", row_no),
        };
    };

    let mut errors = Vec::new();
    let count = match check_count(row.count.as_ref()) {
        CountCheck::Absent => 0,
        CountCheck::Valid(n) => n,
        CountCheck::Invalid(reason) => {
            errors.push(format!("Row {}: {}", row_no, reason));
            0
        }
    };

    let hourly = match lookup_price(source, instance_type, params).await {
        Ok(price) => price,
        Err(e) => {
            log_lookup_failure(instance_type, params, &e);
            let tag = match e {
                LookupError::Service(_) => ErrorTag::Error,
                LookupError::NotFound { .. } | LookupError::Schema(_) => ErrorTag::NotFound,
            };
            errors.push(format!("Row {}: {}", row_no, e));
            return RowOutcome {
                quote: PriceQuote::tagged(tag, has_count),
                errors,
                summary: format!("{}: {}", instance_type, tag),
            };
        }
    };

    let monthly = hourly * HOURS_PER_MONTH;
    let env_label = row
        .environment
        .as_deref()
        .map(|env| format!(" [{}]", env))
        .unwrap_or_default();

    let (total_monthly, summary) = if count > 0 {
        let total = monthly * count as f64;
        (
            Some(Priced::Value(total)),
            format!(
                "{}: ${:.4}/hr (${:.2}/mo) × {} = ${:.2}{}",
                instance_type, hourly, monthly, count, total, env_label
            ),
        )
    } else {
        (
            has_count.then_some(Priced::Tag(ErrorTag::InvalidCount)),
            format!(
                "{}: ${:.4}/hr (${:.2}/mo){}",
                instance_type, hourly, monthly, env_label
            ),
        )
    };

    RowOutcome {
        quote: PriceQuote {
            hourly_price: Priced::Value(hourly),
            monthly_price: Priced::Value(monthly),
            total_monthly,
        },
        errors,
        summary,
    }
}
