//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use pricectl::error::ServiceError;
use pricectl::pricing::{PriceListSource, ProductQuery};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A single-term, single-dimension on-demand product document
pub fn on_demand_document(instance_type: &str, usd_per_hour: &str) -> String {
    format!(
        r#"{{
            "product": {{"attributes": {{"instanceType": "{instance_type}"}}}},
            "terms": {{"OnDemand": {{"SKU.TERM": {{"priceDimensions": {{"SKU.TERM.DIM": {{
                "unit": "Hrs",
                "description": "On Demand {instance_type}",
                "pricePerUnit": {{"USD": "{usd_per_hour}"}}
            }}}}}}}}}}
        }}"#
    )
}

/// In-memory price list keyed by instance type
#[derive(Default)]
pub struct FakePriceList {
    prices: HashMap<String, String>,
    failures: HashMap<String, ServiceError>,
    calls: AtomicUsize,
    queries: Mutex<Vec<ProductQuery>>,
}

impl FakePriceList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, instance_type: &str, usd_per_hour: &str) -> Self {
        self.prices
            .insert(instance_type.to_string(), usd_per_hour.to_string());
        self
    }

    pub fn with_failure(mut self, instance_type: &str, code: &str) -> Self {
        self.failures.insert(
            instance_type.to_string(),
            ServiceError::new(code, "simulated failure"),
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<ProductQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceListSource for FakePriceList {
    async fn get_products(&self, query: &ProductQuery) -> Result<Vec<String>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());

        let instance_type = query.filter_value("instanceType").unwrap_or_default();
        if let Some(err) = self.failures.get(instance_type) {
            return Err(err.clone());
        }
        Ok(self
            .prices
            .get(instance_type)
            .map(|price| vec![on_demand_document(instance_type, price)])
            .unwrap_or_default())
    }
}
