//! Chain Reader subsystem.
//!
//! # Data Flow
//! ```text
//! VaultChain queries
//!     → refresh_* (issue read, store last successful value)
//!     → cache.rs (typed per-query maps, single writer)
//!     → view model / engine snapshot (read-only clones)
//!
//! Confirmed write
//!     → invalidate_after_* (re-read the affected queries, never before)
//!
//! poller.rs
//!     → refresh_vault for every known id on a bounded interval
//! ```
//!
//! # Design Decisions
//! - A failed read keeps the previous cached value; it is only visible to
//!   the user when nothing was cached yet
//! - Account-scoped refreshes are no-ops while no wallet is connected
//! - `vault_count` is a consistency check against the id list, never a
//!   second source of truth

pub mod cache;
pub mod poller;

use std::sync::Arc;

use crate::chain::boundary::VaultChain;
use crate::chain::session::AccountSession;

pub use cache::ChainCache;
pub use poller::VaultPoller;

/// Issues reads against the contract boundary and owns the cache writes.
pub struct ChainReader<C: VaultChain> {
    chain: Arc<C>,
    session: AccountSession,
    cache: ChainCache,
}

impl<C: VaultChain> Clone for ChainReader<C> {
    fn clone(&self) -> Self {
        Self {
            chain: self.chain.clone(),
            session: self.session.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<C: VaultChain> ChainReader<C> {
    pub fn new(chain: Arc<C>, session: AccountSession) -> Self {
        Self {
            chain,
            session,
            cache: ChainCache::new(),
        }
    }

    /// Read-only view of the cached query results.
    pub fn cache(&self) -> &ChainCache {
        &self.cache
    }

    pub fn session(&self) -> &AccountSession {
        &self.session
    }

    /// Fetch token decimals once; retried by the poller until it succeeds.
    pub async fn refresh_decimals(&self) {
        if self.cache.decimals().is_some() {
            return;
        }
        match self.chain.decimals().await {
            Ok(decimals) => self.cache.set_decimals(decimals),
            Err(e) => tracing::warn!(error = %e, "decimals query failed"),
        }
    }

    pub async fn refresh_balance(&self) {
        let Some(account) = self.session.account() else {
            tracing::debug!("balanceOf skipped, no wallet connected");
            return;
        };
        match self.chain.balance_of(account).await {
            Ok(balance) => self.cache.set_balance(account, balance),
            Err(e) => {
                tracing::warn!(account = %account, error = %e, "balanceOf query failed, keeping cached value");
            }
        }
    }

    pub async fn refresh_vault_count(&self) {
        let Some(account) = self.session.account() else {
            tracing::debug!("vaultCount skipped, no wallet connected");
            return;
        };
        match self.chain.vault_count(account).await {
            Ok(count) => {
                self.cache.set_vault_count(account, count);
                self.check_count_consistency(account);
            }
            Err(e) => {
                tracing::warn!(account = %account, error = %e, "vaultCount query failed, keeping cached value");
            }
        }
    }

    pub async fn refresh_vault_ids(&self) {
        let Some(account) = self.session.account() else {
            tracing::debug!("getUserVaults skipped, no wallet connected");
            return;
        };
        match self.chain.user_vaults(account).await {
            Ok(ids) => {
                self.cache.set_vault_ids(account, ids);
                self.check_count_consistency(account);
            }
            Err(e) => {
                tracing::warn!(account = %account, error = %e, "getUserVaults query failed, keeping cached value");
            }
        }
    }

    pub async fn refresh_vault(&self, vault_id: u64) {
        let Some(account) = self.session.account() else {
            tracing::debug!("getVault skipped, no wallet connected");
            return;
        };
        match self.chain.vault(account, vault_id).await {
            Ok(record) => self.cache.set_vault(account, vault_id, record),
            Err(e) => {
                tracing::warn!(account = %account, vault_id, error = %e, "getVault query failed, keeping cached value");
            }
        }
    }

    /// Initial population: decimals, balance, count, id list, then every
    /// per-vault record.
    pub async fn refresh_all(&self) {
        self.refresh_decimals().await;
        self.refresh_balance().await;
        self.refresh_vault_count().await;
        self.refresh_vault_ids().await;
        self.refresh_known_vaults().await;
    }

    /// Re-read the record of every vault id currently in the cache.
    pub async fn refresh_known_vaults(&self) {
        let Some(account) = self.session.account() else {
            return;
        };
        let Some(ids) = self.cache.vault_ids(account) else {
            return;
        };
        for id in ids {
            self.refresh_vault(id).await;
        }
    }

    /// Re-reads after a confirmed CreateVault: the id list grew and the
    /// balance shrank. Also fetches records for any ids seen for the first
    /// time so the new vault renders without waiting a poll period.
    pub async fn invalidate_after_create(&self) {
        self.refresh_vault_count().await;
        self.refresh_vault_ids().await;
        self.refresh_balance().await;
        self.refresh_known_vaults().await;
    }

    /// Re-reads after a confirmed Withdraw: the id list and balance change,
    /// and the withdrawn vault's own record flips its flag.
    pub async fn invalidate_after_withdraw(&self, vault_id: u64) {
        self.refresh_vault_ids().await;
        self.refresh_balance().await;
        self.refresh_vault(vault_id).await;
    }

    fn check_count_consistency(&self, account: alloy::primitives::Address) {
        if let (Some(count), Some(ids)) = (
            self.cache.vault_count(account),
            self.cache.vault_ids(account),
        ) {
            if count as usize != ids.len() {
                tracing::warn!(
                    account = %account,
                    vault_count = count,
                    id_list_len = ids.len(),
                    "vaultCount disagrees with getUserVaults, trusting the id list"
                );
            }
        }
    }
}

impl<C: VaultChain> std::fmt::Debug for ChainReader<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainReader")
            .field("session", &self.session)
            .field("cache", &self.cache)
            .finish()
    }
}
