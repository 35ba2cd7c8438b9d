//! The contract surface the engine orchestrates against.

use std::future::Future;

use alloy::primitives::{Address, TxHash, U256};

use crate::chain::types::{ChainResult, TxOutcome, VaultRecord};

/// Black-box read/write boundary to the token and vault contracts.
///
/// The engine owns no signing keys and never inspects call data; it only
/// issues these operations and reconciles their results. Production code
/// uses [`crate::chain::RpcVaultChain`]; tests substitute a scripted chain.
pub trait VaultChain: Send + Sync + 'static {
    /// Token decimals. Immutable once read.
    fn decimals(&self) -> impl Future<Output = ChainResult<u8>> + Send;

    /// Raw token balance of `account`.
    fn balance_of(&self, account: Address) -> impl Future<Output = ChainResult<U256>> + Send;

    /// Number of vaults ever created by `account`.
    fn vault_count(&self, account: Address) -> impl Future<Output = ChainResult<u64>> + Send;

    /// Ids of all vaults owned by `account`.
    fn user_vaults(&self, account: Address) -> impl Future<Output = ChainResult<Vec<u64>>> + Send;

    /// One vault record.
    fn vault(
        &self,
        account: Address,
        vault_id: u64,
    ) -> impl Future<Output = ChainResult<VaultRecord>> + Send;

    /// Grant `spender` an allowance of `amount` raw units.
    fn approve(
        &self,
        spender: Address,
        amount: U256,
    ) -> impl Future<Output = ChainResult<TxHash>> + Send;

    /// Lock `amount` raw units until `unlock_time` (epoch seconds).
    fn create_vault(
        &self,
        amount: U256,
        unlock_time: u64,
    ) -> impl Future<Output = ChainResult<TxHash>> + Send;

    /// Withdraw an unlocked vault.
    fn withdraw(&self, vault_id: u64) -> impl Future<Output = ChainResult<TxHash>> + Send;

    /// Await the receipt for a submitted write.
    fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = ChainResult<TxOutcome>> + Send;
}
