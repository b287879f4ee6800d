use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Region whose Price List endpoint is queried. The API is only served from
/// a couple of regions and returns prices for every location from each.
pub const DEFAULT_PRICING_ENDPOINT: &str = "us-east-1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub aws: AwsConfig,
    pub quote: QuoteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Region code to price (not the endpoint region)
    pub region: String,
    /// Named profile from ~/.aws/config; `AWS_PROFILE` and `--profile` override it
    pub profile: Option<String>,
    pub pricing_endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    pub operating_system: String,
    pub tenancy: String,
    /// Result ceiling for each GetProducts call
    pub max_results: i32,
    pub currency: String,
    pub storage_volume_type: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aws: AwsConfig {
                region: "me-south-1".to_string(),
                profile: None,
                pricing_endpoint: DEFAULT_PRICING_ENDPOINT.to_string(),
            },
            quote: QuoteConfig {
                operating_system: "Linux".to_string(),
                tenancy: "Shared".to_string(),
                max_results: 10,
                currency: "USD".to_string(),
                storage_volume_type: "Standard".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            // Try .pricectl.toml in current dir, then ~/.config/pricectl/config.toml
            let local = PathBuf::from(".pricectl.toml");
            if local.exists() {
                local
            } else {
                dirs::config_dir()
                    .map(|d| d.join("pricectl").join("config.toml"))
                    .unwrap_or_else(|| PathBuf::from(".pricectl.toml"))
            }
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                ConfigError::ParseError(format!(
                    "{}: {}\n  Tip: Run 'pricectl init' to create a new config file",
                    config_path.display(),
                    e
                ))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            // Use defaults but warn if user explicitly provided a path
            if path.is_some() {
                eprintln!("WARNING: Config file not found: {}", config_path.display());
                eprintln!(
                    "   Using default configuration. Run 'pricectl init' to create a config file."
                );
            }
            Ok(Config::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("aws.region", &self.aws.region),
            ("aws.pricing_endpoint", &self.aws.pricing_endpoint),
            ("quote.operating_system", &self.quote.operating_system),
            ("quote.tenancy", &self.quote.tenancy),
            ("quote.currency", &self.quote.currency),
            ("quote.storage_volume_type", &self.quote.storage_volume_type),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must not be empty".to_string(),
                }
                .into());
            }
        }

        if !(1..=100).contains(&self.quote.max_results) {
            return Err(ConfigError::InvalidValue {
                field: "quote.max_results".to_string(),
                reason: format!("must be between 1 and 100, got {}", self.quote.max_results),
            }
            .into());
        }

        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

pub fn init_config(output: &Path) -> Result<()> {
    let config = Config::default();
    config.save(output)?;
    println!("Created config file: {}", output.display());
    Ok(())
}
