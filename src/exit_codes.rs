//! Exit code standardization for pricectl
//!
//! ## Exit Code Convention
//!
//! - `0` = Success (even when some rows could not be priced)
//! - `1` = User error (missing input, bad format, missing column, bad destination)
//! - `2` = System error (I/O, unexpected service failure)
//! - `3` = Configuration error (config parse error, invalid credentials/profile)
//! - `130` = Cancelled by the user (Ctrl-C)

use crate::error::PricectlError;

/// Standard exit codes for pricectl
pub mod codes {
    /// User error (invalid input, bad destination)
    pub const USER_ERROR: i32 = 1;
    /// System error (I/O, AWS API failure)
    pub const SYSTEM_ERROR: i32 = 2;
    /// Configuration error (missing config, invalid credentials)
    pub const CONFIG_ERROR: i32 = 3;
    /// Interrupted by SIGINT
    pub const INTERRUPTED: i32 = 130;
}

/// Map a PricectlError to an appropriate exit code
pub fn exit_code_for_error(error: &PricectlError) -> i32 {
    use PricectlError::*;
    match error {
        Config(_) => codes::CONFIG_ERROR,

        Input(_) => codes::USER_ERROR,
        Output(_) => codes::USER_ERROR,

        Interrupted => codes::INTERRUPTED,

        Lookup(_) => codes::SYSTEM_ERROR,
        Io(_) => codes::SYSTEM_ERROR,
    }
}

/// Exit code for an error that reached `main`
///
/// Errors that are not a `PricectlError` (clap, context-only anyhow errors)
/// count as system errors.
pub fn exit_code_for_anyhow(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<PricectlError>()
        .map(exit_code_for_error)
        .unwrap_or(codes::SYSTEM_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, InputError, LookupError, OutputError};
    use crate::pricing::PriceListItem;
    use std::path::PathBuf;

    #[test]
    fn test_input_errors_are_user_errors() {
        let err = PricectlError::Input(InputError::MissingColumn("inst_type".into()));
        assert_eq!(exit_code_for_error(&err), codes::USER_ERROR);

        let err = PricectlError::Output(OutputError::DirectoryMissing(PathBuf::from("/nope")));
        assert_eq!(exit_code_for_error(&err), codes::USER_ERROR);
    }

    #[test]
    fn test_credential_errors_are_config_errors() {
        let err = PricectlError::Config(ConfigError::Credentials {
            profile: "lab".into(),
            reason: "profile not found".into(),
        });
        assert_eq!(exit_code_for_error(&err), codes::CONFIG_ERROR);
    }

    #[test]
    fn test_malformed_price_document_is_system_error() {
        let schema = PriceListItem::parse("{not json").unwrap_err();
        let err = PricectlError::Lookup(LookupError::Schema(schema));
        assert!(err.to_string().contains("malformed price document"));
        assert_eq!(exit_code_for_error(&err), codes::SYSTEM_ERROR);
    }

    #[test]
    fn test_anyhow_wrapping_keeps_code() {
        let err = anyhow::Error::from(PricectlError::Interrupted).context("while quoting");
        assert_eq!(exit_code_for_anyhow(&err), codes::INTERRUPTED);

        let plain = anyhow::anyhow!("something else");
        assert_eq!(exit_code_for_anyhow(&plain), codes::SYSTEM_ERROR);
    }
}
