//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Root configuration for the vault engine.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// RPC endpoint and contract addresses.
    pub chain: ChainConfig,

    /// Cache refresh behaviour.
    pub reader: ReaderConfig,
}

/// Chain boundary configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Expected chain id (Celo Alfajores by default).
    pub chain_id: u64,

    /// Per-call RPC timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// How long a submitted write may wait for its receipt.
    pub receipt_timeout_secs: u64,

    /// ERC-20 token contract address.
    pub token_address: String,

    /// Vault contract address.
    pub vault_address: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://alfajores-forno.celo-testnet.org".to_string(),
            chain_id: 44_787,
            rpc_timeout_secs: 10,
            receipt_timeout_secs: 180,
            token_address: "0x9F6fc2403352748E35b7c55fF1b7E2D46927A326".to_string(),
            vault_address: String::new(),
        }
    }
}

/// Chain Reader refresh configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Interval between per-vault record polls, in seconds.
    pub vault_poll_interval_secs: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            vault_poll_interval_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.chain.chain_id, 44_787);
        assert_eq!(config.chain.rpc_timeout_secs, 10);
        assert_eq!(config.reader.vault_poll_interval_secs, 5);
    }

    #[test]
    fn test_minimal_toml() {
        let config: EngineConfig = toml::from_str(
            r#"
            [chain]
            vault_address = "0x0000000000000000000000000000000000000002"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.chain.vault_address,
            "0x0000000000000000000000000000000000000002"
        );
        // Unspecified sections fall back to defaults.
        assert_eq!(config.reader.vault_poll_interval_secs, 5);
    }
}
