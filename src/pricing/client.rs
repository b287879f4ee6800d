use super::{PriceListSource, ProductQuery};
use crate::error::{ConfigError, Result, ServiceError};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_pricing::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_pricing::types::{Filter, FilterType};
use aws_sdk_pricing::Client;
use tracing::{debug, info};

/// Price List client bound to one set of resolved credentials
#[derive(Clone, Debug)]
pub struct AwsPricingClient {
    client: Client,
}

impl AwsPricingClient {
    /// Resolve credentials for `profile` (or the default chain) and build a
    /// client against the `endpoint_region` Price List endpoint.
    ///
    /// Credentials are fetched eagerly so a missing profile or expired
    /// session fails here, before any inventory row is processed.
    pub async fn connect(profile: Option<&str>, endpoint_region: &str) -> Result<Self> {
        let profile_label = profile.unwrap_or("default chain").to_string();
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(endpoint_region.to_string()));
        if let Some(name) = profile {
            debug!("Loading AWS config using profile '{}'", name);
            loader = loader.profile_name(name);
        }
        let sdk_config = loader.load().await;

        let provider = sdk_config
            .credentials_provider()
            .ok_or_else(|| ConfigError::Credentials {
                profile: profile_label.clone(),
                reason: "AWS credentials not found".to_string(),
            })?;
        provider
            .provide_credentials()
            .await
            .map_err(|e| ConfigError::Credentials {
                profile: profile_label.clone(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        info!(
            "Resolved AWS credentials using {} (pricing endpoint {})",
            profile_label, endpoint_region
        );
        Ok(Self::from_client(Client::new(&sdk_config)))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

fn to_sdk_filters(query: &ProductQuery) -> std::result::Result<Vec<Filter>, ServiceError> {
    query
        .filters
        .iter()
        .map(|f| {
            Filter::builder()
                .r#type(FilterType::TermMatch)
                .field(&f.field)
                .value(&f.value)
                .build()
                .map_err(|e| ServiceError::new("InvalidFilter", e.to_string()))
        })
        .collect()
}

#[async_trait]
impl PriceListSource for AwsPricingClient {
    async fn get_products(
        &self,
        query: &ProductQuery,
    ) -> std::result::Result<Vec<String>, ServiceError> {
        let filters = to_sdk_filters(query)?;
        let output = self
            .client
            .get_products()
            .service_code(&query.service_code)
            .set_filters(Some(filters))
            .max_results(query.max_results)
            .send()
            .await
            .map_err(|e| {
                ServiceError::new(
                    e.code().unwrap_or("Unknown"),
                    e.message()
                        .map(str::to_string)
                        .unwrap_or_else(|| DisplayErrorContext(&e).to_string()),
                )
            })?;

        Ok(output.price_list().to_vec())
    }
}
