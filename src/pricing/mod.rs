//! Price lookups against the AWS Price List service
//!
//! Lookups go through the `PriceListSource` trait so the pipeline receives
//! its client explicitly and tests can substitute a canned price list.

mod client;
pub mod document;
pub mod filters;

pub use client::AwsPricingClient;
pub use document::PriceListItem;
pub use filters::{Ec2FilterBuilder, StorageFilterBuilder};

use crate::error::{LookupError, ServiceError};
use async_trait::async_trait;
use tracing::{debug, warn};

/// One `TERM_MATCH` filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermFilter {
    pub field: String,
    pub value: String,
}

impl TermFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// A single `GetProducts` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub service_code: String,
    pub filters: Vec<TermFilter>,
    pub max_results: i32,
}

impl ProductQuery {
    pub fn filter_value(&self, field: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.value.as_str())
    }
}

/// Anything that can answer a `GetProducts` query with raw price documents
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceListSource: Send + Sync {
    /// Issue one query and return the serialized product documents, in
    /// service order, capped at `query.max_results`
    async fn get_products(&self, query: &ProductQuery) -> Result<Vec<String>, ServiceError>;
}

/// What to price: everything but the instance type
#[derive(Debug, Clone)]
pub struct LookupParams {
    /// Price List location name, e.g. "EU (Ireland)"
    pub location: String,
    pub operating_system: String,
    pub tenancy: String,
    pub currency: String,
    pub max_results: i32,
}

impl LookupParams {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            operating_system: "Linux".to_string(),
            tenancy: "Shared".to_string(),
            currency: "USD".to_string(),
            max_results: 10,
        }
    }
}

/// Look up the on-demand hourly price of one instance type.
///
/// Only the first returned product is considered; see `document` for the
/// single-term/single-dimension assumption.
pub async fn lookup_price(
    source: &dyn PriceListSource,
    instance_type: &str,
    params: &LookupParams,
) -> Result<f64, LookupError> {
    let query = Ec2FilterBuilder::new(
        &params.location,
        instance_type,
        &params.operating_system,
        &params.tenancy,
    )
    .to_query(params.max_results);

    debug!(
        "Querying {} price for {} in {}",
        query.service_code, instance_type, params.location
    );
    let products = source.get_products(&query).await?;

    let first = products.first().ok_or_else(|| LookupError::NotFound {
        instance_type: instance_type.to_string(),
        location: params.location.clone(),
    })?;

    let price = PriceListItem::parse(first)
        .and_then(|item| item.on_demand_unit_price(&params.currency))
        .map_err(|e| {
            warn!(
                "Error parsing price for {}: {} (item: {})",
                instance_type, e, first
            );
            e
        })?;

    debug!(
        "{} in {}: {} {}/hr",
        instance_type, params.location, price, params.currency
    );
    Ok(price)
}

/// `lookup_price` with every failure logged and flattened to `None`
pub async fn fetch_price(
    source: &dyn PriceListSource,
    instance_type: &str,
    params: &LookupParams,
) -> Option<f64> {
    match lookup_price(source, instance_type, params).await {
        Ok(price) => Some(price),
        Err(e) => {
            log_lookup_failure(instance_type, params, &e);
            None
        }
    }
}

pub(crate) fn log_lookup_failure(
    instance_type: &str,
    params: &LookupParams,
    error: &LookupError,
) {
    match error {
        LookupError::NotFound { .. } => warn!(
            "No prices found for {} in {}; the instance type may not be offered there, \
             or the operating system ({}) or tenancy ({}) is incorrect",
            instance_type, params.location, params.operating_system, params.tenancy
        ),
        // Already logged with the offending item
        LookupError::Schema(e) => {
            debug!("Unexpected pricing schema for {}: {}", instance_type, e)
        }
        LookupError::Service(e) => match e.hint() {
            Some(hint) => warn!("{} for {}. {}", e, instance_type, hint),
            None => warn!("{} for {}", e, instance_type),
        },
    }
}

/// One S3 storage price tier
#[derive(Debug, Clone, PartialEq)]
pub struct StoragePrice {
    pub storage_class: Option<String>,
    pub description: String,
    pub unit: String,
    pub begin_range: Option<f64>,
    pub end_range: Option<f64>,
    pub price: f64,
}

/// All on-demand S3 storage prices for a location and volume type, cheapest
/// tier boundaries first
pub async fn fetch_storage_prices(
    source: &dyn PriceListSource,
    location: &str,
    volume_type: &str,
    currency: &str,
    max_results: i32,
) -> Result<Vec<StoragePrice>, LookupError> {
    let query = StorageFilterBuilder {
        location: location.to_string(),
        volume_type: volume_type.to_string(),
    }
    .to_query(max_results);

    let products = source.get_products(&query).await?;
    if products.is_empty() {
        return Err(LookupError::NotFound {
            instance_type: format!("S3 {}", volume_type),
            location: location.to_string(),
        });
    }

    let mut prices = Vec::new();
    for raw in &products {
        let item = match PriceListItem::parse(raw) {
            Ok(item) => item,
            Err(e) => {
                warn!("Skipping unparseable storage price document: {}", e);
                continue;
            }
        };
        let storage_class = item.attribute("storageClass").map(str::to_string);
        for dimension in item.price_dimensions() {
            match dimension.price(currency) {
                Ok(price) => prices.push(StoragePrice {
                    storage_class: storage_class.clone(),
                    description: dimension.description.clone(),
                    unit: dimension.unit.clone(),
                    begin_range: dimension.begin_range.as_deref().and_then(parse_range),
                    end_range: dimension.end_range.as_deref().and_then(parse_range),
                    price,
                }),
                Err(e) => warn!("Skipping storage price dimension: {}", e),
            }
        }
    }

    prices.sort_by(|a, b| {
        a.storage_class
            .cmp(&b.storage_class)
            .then(a.begin_range.unwrap_or(0.0).total_cmp(&b.begin_range.unwrap_or(0.0)))
    });
    Ok(prices)
}

// "Inf" marks an open-ended top tier
fn parse_range(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}
