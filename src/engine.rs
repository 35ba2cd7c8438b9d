//! Engine facade tying the subsystems together.
//!
//! Owns the session, reader, orchestrator, notification surface and the
//! vault-creation draft, and renders them into one snapshot per tick for
//! whatever presentation sits on top.

use std::sync::{Arc, Mutex, PoisonError};

use alloy::primitives::Address;
use chrono::{Local, TimeZone};

use crate::chain::boundary::VaultChain;
use crate::chain::session::AccountSession;
use crate::clock::ClockHandle;
use crate::notify::{Notification, NotificationCenter};
use crate::reader::ChainReader;
use crate::tx::{EngineError, OpKind, TxOrchestrator};
use crate::view::format::{format_amount, truncate_address, AMOUNT_PLACEHOLDER};
use crate::view::status::{vault_status, VaultStatus};

/// The create-vault form as typed so far. Cleared when a CreateVault
/// confirms, exactly like the dashboard inputs.
#[derive(Clone, Default)]
pub struct VaultDraft {
    inner: Arc<Mutex<DraftFields>>,
}

#[derive(Clone, Debug, Default)]
struct DraftFields {
    amount: String,
    unlock: String,
}

impl VaultDraft {
    pub fn set_amount(&self, text: impl Into<String>) {
        self.lock().amount = text.into();
    }

    pub fn set_unlock(&self, text: impl Into<String>) {
        self.lock().unlock = text.into();
    }

    pub fn amount(&self) -> String {
        self.lock().amount.clone()
    }

    pub fn unlock(&self) -> String {
        self.lock().unlock.clone()
    }

    pub fn clear(&self) {
        *self.lock() = DraftFields::default();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DraftFields> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One vault as the presentation layer sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultCard {
    pub vault_id: u64,
    pub amount_label: String,
    /// Unlock instant in epoch seconds.
    pub unlock_time: u64,
    /// Unlock instant rendered as a local datetime.
    pub unlock_label: String,
    pub status: VaultStatus,
    /// Unlocked, not withdrawn, and no withdrawal currently in flight.
    pub can_withdraw: bool,
}

/// Everything the presentation needs, computed from cached reads and the
/// clock with no chain I/O.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub account: Option<Address>,
    /// `0x1234...abcd` form of the account for headers and logs.
    pub account_label: Option<String>,
    pub formatted_balance: String,
    pub vaults: Vec<VaultCard>,
    pub notifications: Vec<Notification>,
    pub in_flight: Vec<OpKind>,
}

/// The Vault Transaction & State Synchronization Core.
pub struct VaultEngine<C: VaultChain> {
    session: AccountSession,
    reader: ChainReader<C>,
    txs: TxOrchestrator<C>,
    notices: NotificationCenter,
    clock: ClockHandle,
    draft: VaultDraft,
}

impl<C: VaultChain> VaultEngine<C> {
    /// Wire the subsystems around one chain boundary.
    ///
    /// `vault_address` is the approval spender: the vault contract itself.
    pub fn new(chain: Arc<C>, vault_address: Address, clock: ClockHandle) -> Self {
        let session = AccountSession::new();
        let reader = ChainReader::new(chain.clone(), session.clone());
        let notices = NotificationCenter::new();
        let draft = VaultDraft::default();
        let txs = TxOrchestrator::new(
            chain,
            reader.clone(),
            notices.clone(),
            clock.clone(),
            vault_address,
            draft.clone(),
        );

        Self {
            session,
            reader,
            txs,
            notices,
            clock,
            draft,
        }
    }

    pub fn session(&self) -> &AccountSession {
        &self.session
    }

    pub fn reader(&self) -> &ChainReader<C> {
        &self.reader
    }

    pub fn draft(&self) -> &VaultDraft {
        &self.draft
    }

    pub fn transactions(&self) -> &TxOrchestrator<C> {
        &self.txs
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notices
    }

    /// Grant the vault contract its one-time allowance.
    pub async fn approve(&self) -> Result<alloy::primitives::TxHash, EngineError> {
        self.txs.approve().await
    }

    /// Submit a CreateVault from the current draft.
    pub async fn create_vault_from_draft(
        &self,
    ) -> Result<alloy::primitives::TxHash, EngineError> {
        let amount = self.draft.amount();
        let unlock = self.draft.unlock();
        self.txs.create_vault(&amount, &unlock).await
    }

    /// Withdraw an unlocked vault.
    pub async fn withdraw(
        &self,
        vault_id: u64,
    ) -> Result<alloy::primitives::TxHash, EngineError> {
        self.txs.withdraw(vault_id).await
    }

    /// Compose the current cache and clock into one render-ready view.
    pub fn snapshot(&self) -> DashboardSnapshot {
        let now_ms = self.clock.now_ms();
        let account = self.session.account();
        let cache = self.reader.cache();
        let decimals = cache.decimals();

        let formatted_balance = match (account.and_then(|a| cache.balance(a)), decimals) {
            (Some(raw), Some(decimals)) => format_amount(raw, decimals),
            _ => AMOUNT_PLACEHOLDER.to_string(),
        };

        let withdraw_busy = self.txs.is_in_flight(OpKind::Withdraw);
        let vaults = account
            .map(|account| {
                cache
                    .vault_ids(account)
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|vault_id| {
                        // A record that has not arrived renders nothing yet.
                        let record = cache.vault(account, vault_id)?;
                        let status = vault_status(&record, now_ms);
                        Some(VaultCard {
                            vault_id,
                            amount_label: decimals
                                .map(|d| format_amount(record.amount, d))
                                .unwrap_or_else(|| AMOUNT_PLACEHOLDER.to_string()),
                            unlock_time: record.unlock_time,
                            unlock_label: unlock_label(record.unlock_time),
                            can_withdraw: status == VaultStatus::Unlocked && !withdraw_busy,
                            status,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        DashboardSnapshot {
            account,
            account_label: account.as_ref().map(truncate_address),
            formatted_balance,
            vaults,
            notifications: self.notices.active(now_ms),
            in_flight: self.txs.in_flight(),
        }
    }
}

fn unlock_label(unlock_time: u64) -> String {
    Local
        .timestamp_opt(unlock_time as i64, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}
