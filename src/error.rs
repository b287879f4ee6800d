//! Error types for pricectl
//!
//! Errors are split along the stages of a run so the CLI can decide what is
//! fatal and which exit code to use.
//!
//! ## Error Handling Philosophy
//!
//! Library code uses `crate::error::Result<T>` which returns `PricectlError`.
//! CLI code uses `anyhow::Result<T>` for top-level error handling and maps the
//! underlying `PricectlError` to an exit code in `exit_codes.rs`.
//!
//! ## When to Use Which Error
//!
//! - `ConfigError`: config file parsing, invalid values, credential/profile
//!   resolution. Always fatal, raised before any price lookup.
//!
//! - `InputError`: the inventory file is missing, unreadable, in an
//!   unsupported format or lacks the `inst_type` column. Always fatal.
//!
//! - `OutputError`: the report destination is unusable. Fatal when detected
//!   up front, reported-but-not-fatal when it happens at write time.
//!
//! - `LookupError`: a single price lookup failed. Never fatal; the row gets
//!   an error tag and the batch continues.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pricectl
#[derive(Error, Debug)]
pub enum PricectlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Price lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Operation cancelled by user")]
    Interrupted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("AWS profile '{profile}' could not be used: {reason}")]
    Credentials { profile: String, reason: String },
}

/// Errors raised while loading the inventory table
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Input file '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported file format: {0}. Supported formats: .csv, .xlsx, .xls, .ods")]
    UnsupportedFormat(String),

    #[error("Input file '{}' is empty or has no valid data", .0.display())]
    Empty(PathBuf),

    #[error("Input file must contain an '{0}' column")]
    MissingColumn(String),

    #[error("Unable to parse '{}': {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
}

/// Errors raised while writing the report
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Output directory '{}' does not exist", .0.display())]
    DirectoryMissing(PathBuf),

    #[error("Unsupported output format: {0}. Supported formats: .csv, .xlsx")]
    UnsupportedFormat(String),

    #[error("Permission denied when writing to '{}'", .0.display())]
    PermissionDenied(PathBuf),

    #[error("Failed to write '{}': {reason}", path.display())]
    Write { path: PathBuf, reason: String },
}

/// Why a single price lookup produced no price
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("no prices found for {instance_type} in {location}")]
    NotFound {
        instance_type: String,
        location: String,
    },

    #[error("unexpected pricing schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("{0}")]
    Service(#[from] ServiceError),
}

/// The price document did not have the shape the extraction expects
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("malformed price document: {0}")]
    Malformed(String),

    #[error("expected exactly one entry in {level}, found {found}")]
    EntryCount { level: &'static str, found: usize },

    #[error("no {currency} price in pricePerUnit")]
    MissingCurrency { currency: String },

    #[error("price '{0}' is not a number")]
    InvalidPrice(String),
}

/// A failure reported by the pricing service itself
#[derive(Error, Debug, Clone, PartialEq)]
#[error("AWS API error: {code} - {message}")]
pub struct ServiceError {
    pub code: String,
    pub message: String,
}

impl ServiceError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_access_denied(&self) -> bool {
        self.code == "AccessDeniedException"
    }

    /// Actionable follow-up for the user, when the code has one
    pub fn hint(&self) -> Option<&'static str> {
        match self.code.as_str() {
            "AccessDeniedException" => Some(
                "Check your AWS credentials and ensure you have pricing:GetProducts permission.",
            ),
            "ThrottlingException" => {
                Some("The Price List API is throttling requests; try again later.")
            }
            "InvalidParameterException" => {
                Some("Check the region, operating system and tenancy values.")
            }
            _ => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PricectlError>;
