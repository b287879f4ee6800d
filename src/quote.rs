//! The quote pipeline: inventory table in, priced table and totals out

use crate::aggregate::{aggregate, AggregateInput, Totals};
use crate::error::Result;
use crate::inventory::{InventoryColumns, InventoryRow};
use crate::pricing::{LookupParams, PriceListSource};
use crate::processor::{process_row, PriceQuote};
use crate::table::Table;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

pub const HOURLY_PRICE_COLUMN: &str = "hourly_price";
pub const MONTHLY_PRICE_COLUMN: &str = "monthly_price";
pub const TOTAL_MONTHLY_COLUMN: &str = "total_monthly";

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct QuoteRun {
    /// Input table with the price columns filled in
    pub table: Table,
    pub quotes: Vec<PriceQuote>,
    pub errors: Vec<String>,
    /// `None` when the inventory has no count column
    pub totals: Option<Totals>,
}

impl QuoteRun {
    pub fn prices_found(&self) -> bool {
        self.quotes.iter().any(PriceQuote::is_priced)
    }
}

/// Price every row of `table` in order.
///
/// Per-row failures are tagged in the table and collected in `errors`;
/// nothing here aborts the batch once the columns are located.
pub async fn run_quote(
    source: &dyn PriceListSource,
    mut table: Table,
    params: &LookupParams,
) -> Result<QuoteRun> {
    let columns = InventoryColumns::locate(&table)?;
    let hourly_col = table.ensure_column(HOURLY_PRICE_COLUMN);
    let monthly_col = table.ensure_column(MONTHLY_PRICE_COLUMN);
    let total_col = columns
        .count
        .map(|_| table.ensure_column(TOTAL_MONTHLY_COLUMN));

    println!(
        "Fetching prices for {} instance types in {}...",
        table.len(),
        params.location
    );

    let pb = ProgressBar::new(table.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut quotes = Vec::with_capacity(table.len());
    let mut errors = Vec::new();
    let mut rows = Vec::with_capacity(table.len());

    for index in 0..table.len() {
        let row = InventoryRow::from_table(&table, index, &columns);
        pb.set_message(row.instance_type.clone().unwrap_or_default());

        let outcome = process_row(source, index, &row, params).await;
        pb.suspend(|| println!("{}", outcome.summary));
        pb.inc(1);

        table.set(index, hourly_col, outcome.quote.hourly_price.to_cell());
        table.set(index, monthly_col, outcome.quote.monthly_price.to_cell());
        if let (Some(col), Some(total)) = (total_col, outcome.quote.total_monthly) {
            table.set(index, col, total.to_cell());
        }

        errors.extend(outcome.errors);
        quotes.push(outcome.quote);
        rows.push(row);
    }
    pb.finish_and_clear();

    let totals = total_col.map(|_| {
        aggregate(
            quotes.iter().zip(&rows).map(|(quote, row)| AggregateInput {
                total_monthly: quote.total_monthly.and_then(|t| t.value()),
                group: row.environment.as_deref(),
            }),
            columns.environment.is_some(),
        )
    });

    info!(
        "Priced {}/{} rows with {} errors",
        quotes.iter().filter(|q| q.is_priced()).count(),
        quotes.len(),
        errors.len()
    );

    Ok(QuoteRun {
        table,
        quotes,
        errors,
        totals,
    })
}

/// Print the error summary and totals the way the report shows them
pub fn print_run_summary(run: &QuoteRun) {
    if !run.errors.is_empty() {
        println!("\n{}", style("The following rows had errors:").yellow().bold());
        for error in &run.errors {
            println!("  - {}", error);
        }
    }

    if !run.prices_found() {
        println!(
            "\n{} No pricing information was found for any instance type.",
            style("Warning:").yellow().bold()
        );
        println!(
            "Please check your region, instance types, operating system, and tenancy settings."
        );
    }

    let Some(totals) = &run.totals else {
        return;
    };

    if !totals.groups.is_empty() {
        println!("\n{}", style("=== Totals by Environment ===").bold());
        for (group, total) in &totals.groups {
            println!("{}: ${:.2}/month", group, total);
        }
    }

    if let Some(grand_total) = totals.grand_total {
        println!(
            "\n{} ${:.2}/month",
            style("Grand Total:").green().bold(),
            grand_total
        );
        println!("(Note: Rows with errors are excluded from the totals)");
    }
}
