//! `pricectl storage`: S3 on-demand storage tiers for one region

use crate::error::Result;
use crate::pricing::{fetch_storage_prices, PriceListSource, StoragePrice};
use comfy_table::{presets::UTF8_FULL, Table as ConsoleTable};
use console::style;

/// Fetch and print every storage tier for `location`
pub async fn show_storage_prices(
    source: &dyn PriceListSource,
    location: &str,
    volume_type: &str,
    currency: &str,
    max_results: i32,
) -> Result<Vec<StoragePrice>> {
    println!(
        "Fetching S3 {} storage prices in {}...",
        volume_type, location
    );
    let prices =
        fetch_storage_prices(source, location, volume_type, currency, max_results).await?;

    println!("\n{}", style(format!("S3 storage prices ({})", location)).bold());
    println!("{}", storage_table(&prices, currency));
    Ok(prices)
}

// Top tiers are open-ended
fn format_end_range(value: Option<f64>) -> String {
    value.map_or_else(|| "Inf".to_string(), |v| v.to_string())
}

pub fn storage_table(prices: &[StoragePrice], currency: &str) -> ConsoleTable {
    let mut table = ConsoleTable::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Storage class".to_string(),
        "Tier".to_string(),
        "From".to_string(),
        "To".to_string(),
        format!("Price ({})", currency),
        "Unit".to_string(),
    ]);
    for price in prices {
        table.add_row(vec![
            price.storage_class.clone().unwrap_or_else(|| "-".to_string()),
            price.description.clone(),
            format!("{}", price.begin_range.unwrap_or(0.0)),
            format_end_range(price.end_range),
            format!("{:.4}", price.price),
            price.unit.clone(),
        ]);
    }
    table
}
