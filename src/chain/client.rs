//! RPC-backed implementation of the contract boundary.
//!
//! # Responsibilities
//! - Hold the provider and the two contract addresses
//! - Wrap every call in the configured timeout
//! - Poll for receipts until a submitted write resolves

use std::future::{Future, IntoFuture};
use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider};
use tokio::time::{interval, timeout};

use crate::chain::boundary::VaultChain;
use crate::chain::contracts::{LockVault, WildToken};
use crate::chain::types::{ChainError, ChainResult, TxOutcome, VaultRecord};
use crate::config::schema::ChainConfig;

/// How often the receipt wait re-queries for a pending transaction.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Contract boundary backed by a JSON-RPC provider.
///
/// The provider may carry a signer installed by the caller; read-only
/// providers work for everything except the write operations.
#[derive(Clone)]
pub struct RpcVaultChain {
    provider: DynProvider,
    token_address: Address,
    vault_address: Address,
    rpc_timeout: Duration,
    receipt_timeout: Duration,
}

impl RpcVaultChain {
    /// Build the boundary from a provider and the chain configuration.
    pub fn new(provider: impl Provider + 'static, config: &ChainConfig) -> ChainResult<Self> {
        let token_address: Address = config
            .token_address
            .parse()
            .map_err(|_| ChainError::InvalidAddress(config.token_address.clone()))?;
        let vault_address: Address = config
            .vault_address
            .parse()
            .map_err(|_| ChainError::InvalidAddress(config.vault_address.clone()))?;

        tracing::info!(
            rpc_url = %config.rpc_url,
            token = %token_address,
            vault = %vault_address,
            "chain boundary initialized"
        );

        Ok(Self {
            provider: provider.erased(),
            token_address,
            vault_address,
            rpc_timeout: Duration::from_secs(config.rpc_timeout_secs),
            receipt_timeout: Duration::from_secs(config.receipt_timeout_secs),
        })
    }

    /// Address of the vault contract, the spender for approvals.
    pub fn vault_address(&self) -> Address {
        self.vault_address
    }

    fn token(&self) -> WildToken::WildTokenInstance<DynProvider> {
        WildToken::new(self.token_address, self.provider.clone())
    }

    fn vault_contract(&self) -> LockVault::LockVaultInstance<DynProvider> {
        LockVault::new(self.vault_address, self.provider.clone())
    }

    async fn read<T, F>(&self, fut: F) -> ChainResult<T>
    where
        F: IntoFuture<Output = Result<T, alloy::contract::Error>>,
    {
        match timeout(self.rpc_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ChainError::Rpc(e.to_string())),
            Err(_) => Err(ChainError::Timeout(self.rpc_timeout.as_secs())),
        }
    }

    async fn submit<F>(&self, fut: F) -> ChainResult<TxHash>
    where
        F: Future<
            Output = Result<
                alloy::providers::PendingTransactionBuilder<alloy::network::Ethereum>,
                alloy::contract::Error,
            >,
        >,
    {
        match timeout(self.rpc_timeout, fut).await {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) => Err(ChainError::Rpc(e.to_string())),
            Err(_) => Err(ChainError::Timeout(self.rpc_timeout.as_secs())),
        }
    }
}

impl VaultChain for RpcVaultChain {
    async fn decimals(&self) -> ChainResult<u8> {
        self.read(self.token().decimals().call()).await
    }

    async fn balance_of(&self, account: Address) -> ChainResult<U256> {
        self.read(self.token().balanceOf(account).call()).await
    }

    async fn vault_count(&self, account: Address) -> ChainResult<u64> {
        let count = self
            .read(self.vault_contract().vaultCount(account).call())
            .await?;
        Ok(count.saturating_to::<u64>())
    }

    async fn user_vaults(&self, account: Address) -> ChainResult<Vec<u64>> {
        let ids = self
            .read(self.vault_contract().getUserVaults(account).call())
            .await?;
        Ok(ids.into_iter().map(|id| id.saturating_to::<u64>()).collect())
    }

    async fn vault(&self, account: Address, vault_id: u64) -> ChainResult<VaultRecord> {
        let raw = self
            .read(
                self.vault_contract()
                    .getVault(account, U256::from(vault_id))
                    .call(),
            )
            .await?;
        Ok(VaultRecord {
            amount: raw.amount,
            unlock_time: raw.unlockTime.saturating_to::<u64>(),
            withdrawn: raw.withdrawn,
            is_unlocked: raw.isUnlocked,
        })
    }

    async fn approve(&self, spender: Address, amount: U256) -> ChainResult<TxHash> {
        self.submit(self.token().approve(spender, amount).send())
            .await
    }

    async fn create_vault(&self, amount: U256, unlock_time: u64) -> ChainResult<TxHash> {
        self.submit(
            self.vault_contract()
                .createVault(amount, U256::from(unlock_time))
                .send(),
        )
        .await
    }

    async fn withdraw(&self, vault_id: u64) -> ChainResult<TxHash> {
        self.submit(self.vault_contract().withdraw(U256::from(vault_id)).send())
            .await
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> ChainResult<TxOutcome> {
        let result = timeout(self.receipt_timeout, async {
            let mut ticker = interval(RECEIPT_POLL_INTERVAL);

            loop {
                ticker.tick().await;

                let receipt = match self.provider.get_transaction_receipt(tx_hash).await {
                    Ok(Some(r)) => r,
                    Ok(None) => {
                        tracing::debug!(tx_hash = %tx_hash, "transaction pending");
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!(tx_hash = %tx_hash, error = %e, "receipt query failed");
                        continue;
                    }
                };

                if receipt.status() {
                    return TxOutcome::Confirmed {
                        block_number: receipt.block_number.unwrap_or_default(),
                    };
                }
                return TxOutcome::Failed("transaction reverted".to_string());
            }
        })
        .await;

        match result {
            Ok(outcome) => Ok(outcome),
            Err(_) => Err(ChainError::ConfirmationTimeout(
                self.receipt_timeout.as_secs(),
            )),
        }
    }
}

impl std::fmt::Debug for RpcVaultChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcVaultChain")
            .field("token", &self.token_address)
            .field("vault", &self.vault_address)
            .field("rpc_timeout", &self.rpc_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::providers::ProviderBuilder;

    fn test_config() -> ChainConfig {
        ChainConfig {
            token_address: "0x9F6fc2403352748E35b7c55fF1b7E2D46927A326".into(),
            vault_address: "0x0000000000000000000000000000000000000001".into(),
            ..ChainConfig::default()
        }
    }

    #[test]
    fn test_client_creation() {
        let provider = ProviderBuilder::new().connect_http("http://localhost:8545".parse().unwrap());
        let chain = RpcVaultChain::new(provider, &test_config()).unwrap();
        assert_eq!(
            chain.vault_address().to_string().to_lowercase(),
            "0x0000000000000000000000000000000000000001"
        );
    }

    #[test]
    fn test_invalid_address_rejected() {
        let provider = ProviderBuilder::new().connect_http("http://localhost:8545".parse().unwrap());
        let mut config = test_config();
        config.vault_address = "not-an-address".into();

        let result = RpcVaultChain::new(provider, &config);
        assert!(matches!(result, Err(ChainError::InvalidAddress(_))));
    }
}
