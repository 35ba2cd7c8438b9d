//! Semantic configuration checks.

use alloy::primitives::Address;
use thiserror::Error;
use url::Url;

use crate::config::schema::EngineConfig;

/// A single failed configuration check.
#[derive(Debug, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

fn err(field: &'static str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field,
        message: message.into(),
    }
}

/// Validate everything serde cannot: address formats, URL syntax, sane
/// intervals. Collects all failures instead of stopping at the first.
pub fn validate_config(config: &EngineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.chain.rpc_url.parse::<Url>().is_err() {
        errors.push(err("chain.rpc_url", "not a valid URL"));
    }
    if config.chain.token_address.parse::<Address>().is_err() {
        errors.push(err("chain.token_address", "not a valid address"));
    }
    if config.chain.vault_address.parse::<Address>().is_err() {
        errors.push(err("chain.vault_address", "not a valid address"));
    }
    if config.chain.rpc_timeout_secs == 0 {
        errors.push(err("chain.rpc_timeout_secs", "must be at least 1"));
    }
    if config.chain.receipt_timeout_secs < config.chain.rpc_timeout_secs {
        errors.push(err(
            "chain.receipt_timeout_secs",
            "must not be shorter than the RPC timeout",
        ));
    }
    if config.reader.vault_poll_interval_secs == 0 {
        errors.push(err("reader.vault_poll_interval_secs", "must be at least 1"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.chain.vault_address = "0x0000000000000000000000000000000000000002".into();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_default_vault_address_rejected() {
        // The default config deliberately leaves the vault address unset.
        let errors = validate_config(&EngineConfig::default()).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "chain.vault_address"));
    }

    #[test]
    fn test_all_failures_collected() {
        let mut config = valid_config();
        config.chain.rpc_url = "not a url".into();
        config.chain.token_address = "nope".into();
        config.reader.vault_poll_interval_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
