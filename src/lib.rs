//! pricectl library
//!
//! Prices an EC2 inventory against the AWS Price List service and produces
//! a cost report.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod interrupt;
pub mod inventory;
pub mod pricing;
pub mod processor;
pub mod quote;
pub mod regions;
pub mod report;
pub mod storage;
pub mod table;

// Re-export commonly used types
pub use error::{PricectlError, Result};
pub use pricing::{AwsPricingClient, LookupParams, PriceListSource};
pub use quote::{run_quote, QuoteRun};
pub use table::{Cell, Table};
