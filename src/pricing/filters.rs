//! Filter builders for Price List queries

use super::{ProductQuery, TermFilter};

pub const EC2_SERVICE_CODE: &str = "AmazonEC2";
pub const S3_SERVICE_CODE: &str = "AmazonS3";

/// Exact-match filters selecting one on-demand EC2 instance price
#[derive(Debug, Clone)]
pub struct Ec2FilterBuilder {
    pub location: String,
    pub instance_type: String,
    pub operating_system: String,
    pub tenancy: String,
}

impl Ec2FilterBuilder {
    pub fn new(
        location: impl Into<String>,
        instance_type: impl Into<String>,
        operating_system: impl Into<String>,
        tenancy: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            instance_type: instance_type.into(),
            operating_system: operating_system.into(),
            tenancy: tenancy.into(),
        }
    }

    pub fn to_filters(&self) -> Vec<TermFilter> {
        vec![
            TermFilter::new("tenancy", &self.tenancy),
            TermFilter::new("operatingSystem", &self.operating_system),
            // Without these two the query also matches SQL/other bundles and
            // reserved/unused capacity reservations
            TermFilter::new("preInstalledSw", "NA"),
            TermFilter::new("instanceType", &self.instance_type),
            TermFilter::new("location", &self.location),
            TermFilter::new("capacitystatus", "Used"),
        ]
    }

    pub fn to_query(&self, max_results: i32) -> ProductQuery {
        ProductQuery {
            service_code: EC2_SERVICE_CODE.to_string(),
            filters: self.to_filters(),
            max_results,
        }
    }
}

/// Filters selecting S3 storage prices for one volume type in one location
#[derive(Debug, Clone)]
pub struct StorageFilterBuilder {
    pub location: String,
    pub volume_type: String,
}

impl StorageFilterBuilder {
    pub fn to_filters(&self) -> Vec<TermFilter> {
        vec![
            TermFilter::new("location", &self.location),
            TermFilter::new("productFamily", "Storage"),
            TermFilter::new("volumeType", &self.volume_type),
        ]
    }

    pub fn to_query(&self, max_results: i32) -> ProductQuery {
        ProductQuery {
            service_code: S3_SERVICE_CODE.to_string(),
            filters: self.to_filters(),
            max_results,
        }
    }
}
