//! Typed view of a Price List product document
//!
//! Each entry of a `GetProducts` price list is a JSON document of the form
//!
//! ```text
//! { "product": {...},
//!   "terms": { "OnDemand": { "<offer-term-code>": {
//!       "priceDimensions": { "<rate-code>": {
//!           "unit": "Hrs", "pricePerUnit": { "USD": "0.0104000000" } } } } } }
//! ```
//!
//! The term and rate codes are opaque keys. For an on-demand EC2 query
//! narrowed to one instance type, OS, tenancy, pre-installed software and
//! capacity status, the service returns exactly one OnDemand term with
//! exactly one price dimension. `on_demand_unit_price` relies on that and
//! refuses documents where either level holds anything other than a single
//! entry. S3 storage is tiered, so `price_dimensions` returns every dimension
//! instead.

use crate::error::SchemaError;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct PriceListItem {
    #[serde(default)]
    pub product: Product,
    pub terms: Terms,
}

#[derive(Debug, Default, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct Terms {
    #[serde(rename = "OnDemand", default)]
    pub on_demand: HashMap<String, OfferTerm>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferTerm {
    #[serde(default)]
    pub price_dimensions: HashMap<String, PriceDimension>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDimension {
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub description: String,
    pub begin_range: Option<String>,
    pub end_range: Option<String>,
    #[serde(default)]
    pub price_per_unit: HashMap<String, String>,
}

impl PriceDimension {
    pub fn price(&self, currency: &str) -> Result<f64, SchemaError> {
        let raw = self
            .price_per_unit
            .get(currency)
            .ok_or_else(|| SchemaError::MissingCurrency {
                currency: currency.to_string(),
            })?;
        match raw.trim().parse::<f64>() {
            Ok(price) if price.is_finite() => Ok(price),
            _ => Err(SchemaError::InvalidPrice(raw.clone())),
        }
    }
}

impl PriceListItem {
    pub fn parse(raw: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(raw).map_err(|e| SchemaError::Malformed(e.to_string()))
    }

    /// The single on-demand dimension of a single-term, single-rate product
    pub fn single_on_demand_dimension(&self) -> Result<&PriceDimension, SchemaError> {
        let term = exactly_one(&self.terms.on_demand, "terms.OnDemand")?;
        exactly_one(&term.price_dimensions, "OnDemand.priceDimensions")
    }

    pub fn on_demand_unit_price(&self, currency: &str) -> Result<f64, SchemaError> {
        self.single_on_demand_dimension()?.price(currency)
    }

    /// Every on-demand price dimension across all terms
    pub fn price_dimensions(&self) -> impl Iterator<Item = &PriceDimension> {
        self.terms
            .on_demand
            .values()
            .flat_map(|term| term.price_dimensions.values())
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.product.attributes.get(name).map(String::as_str)
    }
}

fn exactly_one<'a, V>(
    map: &'a HashMap<String, V>,
    level: &'static str,
) -> Result<&'a V, SchemaError> {
    let mut values = map.values();
    match (values.next(), values.next()) {
        (Some(only), None) => Ok(only),
        _ => Err(SchemaError::EntryCount {
            level,
            found: map.len(),
        }),
    }
}
