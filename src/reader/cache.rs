//! Last-known-value cache for contract reads.

use std::sync::{Arc, OnceLock};

use alloy::primitives::{Address, U256};
use dashmap::DashMap;

use crate::chain::types::VaultRecord;

/// One map per query signature, keyed by the query's arguments.
///
/// Single-writer discipline: only the [`crate::reader::ChainReader`] writes
/// here, and only from query completions or explicit invalidations. Everyone
/// else gets clones of the last successful value. A failed read never clears
/// an entry.
#[derive(Clone, Default)]
pub struct ChainCache {
    /// decimals() — immutable once read.
    decimals: Arc<OnceLock<u8>>,
    /// balanceOf(account).
    balances: Arc<DashMap<Address, U256>>,
    /// vaultCount(account).
    vault_counts: Arc<DashMap<Address, u64>>,
    /// getUserVaults(account).
    vault_ids: Arc<DashMap<Address, Vec<u64>>>,
    /// getVault(account, id).
    vaults: Arc<DashMap<(Address, u64), VaultRecord>>,
}

impl ChainCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decimals(&self) -> Option<u8> {
        self.decimals.get().copied()
    }

    pub(crate) fn set_decimals(&self, decimals: u8) {
        let _ = self.decimals.set(decimals);
    }

    pub fn balance(&self, account: Address) -> Option<U256> {
        self.balances.get(&account).map(|r| *r.value())
    }

    pub(crate) fn set_balance(&self, account: Address, balance: U256) {
        self.balances.insert(account, balance);
    }

    pub fn vault_count(&self, account: Address) -> Option<u64> {
        self.vault_counts.get(&account).map(|r| *r.value())
    }

    pub(crate) fn set_vault_count(&self, account: Address, count: u64) {
        self.vault_counts.insert(account, count);
    }

    pub fn vault_ids(&self, account: Address) -> Option<Vec<u64>> {
        self.vault_ids.get(&account).map(|r| r.value().clone())
    }

    pub(crate) fn set_vault_ids(&self, account: Address, ids: Vec<u64>) {
        self.vault_ids.insert(account, ids);
    }

    pub fn vault(&self, account: Address, vault_id: u64) -> Option<VaultRecord> {
        self.vaults.get(&(account, vault_id)).map(|r| r.value().clone())
    }

    pub(crate) fn set_vault(&self, account: Address, vault_id: u64, record: VaultRecord) {
        self.vaults.insert((account, vault_id), record);
    }
}

impl std::fmt::Debug for ChainCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainCache")
            .field("decimals", &self.decimals.get())
            .field("balances", &self.balances.len())
            .field("vault_ids", &self.vault_ids.len())
            .field("vaults", &self.vaults.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimals_immutable_once_set() {
        let cache = ChainCache::new();
        assert!(cache.decimals().is_none());

        cache.set_decimals(18);
        cache.set_decimals(6);
        assert_eq!(cache.decimals(), Some(18));
    }

    #[test]
    fn test_per_account_entries() {
        let cache = ChainCache::new();
        let account = Address::ZERO;

        assert!(cache.balance(account).is_none());
        cache.set_balance(account, U256::from(42));
        assert_eq!(cache.balance(account), Some(U256::from(42)));

        cache.set_vault_ids(account, vec![0, 1]);
        assert_eq!(cache.vault_ids(account), Some(vec![0, 1]));
    }

    #[test]
    fn test_vault_record_replaced_not_merged() {
        let cache = ChainCache::new();
        let account = Address::ZERO;
        let record = VaultRecord {
            amount: U256::from(100),
            unlock_time: 1_000,
            withdrawn: false,
            is_unlocked: false,
        };
        cache.set_vault(account, 0, record.clone());

        let updated = VaultRecord {
            withdrawn: true,
            ..record
        };
        cache.set_vault(account, 0, updated.clone());
        assert_eq!(cache.vault(account, 0), Some(updated));
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = ChainCache::new();
        let view = cache.clone();
        cache.set_decimals(18);
        assert_eq!(view.decimals(), Some(18));
    }
}
