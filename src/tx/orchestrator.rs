//! Submission, exclusivity and confirmation handling for vault writes.

use std::sync::Arc;

use alloy::primitives::utils::parse_units;
use alloy::primitives::{Address, TxHash};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::chain::boundary::VaultChain;
use crate::chain::types::TxOutcome;
use crate::clock::ClockHandle;
use crate::engine::VaultDraft;
use crate::notify::{NotificationCenter, ERROR_TTL, VALIDATION_TTL};
use crate::reader::ChainReader;
use crate::tx::{parse_unlock_text, EngineError, OpKind, PendingOp, APPROVE_ALLOWANCE_TOKENS};
use crate::view::status::is_unlocked;

/// Decimals assumed while the real value has not been read yet. Matches the
/// token deployed with the vault contract.
const FALLBACK_DECIMALS: u8 = 18;

/// Tracks every write from submission to its terminal outcome.
pub struct TxOrchestrator<C: VaultChain> {
    chain: Arc<C>,
    reader: ChainReader<C>,
    notices: NotificationCenter,
    clock: ClockHandle,
    /// Spender for approvals: the vault contract.
    vault_address: Address,
    draft: VaultDraft,
    in_flight: Arc<DashMap<OpKind, PendingOp>>,
}

impl<C: VaultChain> Clone for TxOrchestrator<C> {
    fn clone(&self) -> Self {
        Self {
            chain: self.chain.clone(),
            reader: self.reader.clone(),
            notices: self.notices.clone(),
            clock: self.clock.clone(),
            vault_address: self.vault_address,
            draft: self.draft.clone(),
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<C: VaultChain> TxOrchestrator<C> {
    pub fn new(
        chain: Arc<C>,
        reader: ChainReader<C>,
        notices: NotificationCenter,
        clock: ClockHandle,
        vault_address: Address,
        draft: VaultDraft,
    ) -> Self {
        Self {
            chain,
            reader,
            notices,
            clock,
            vault_address,
            draft,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Kinds currently between submission and receipt.
    pub fn in_flight(&self) -> Vec<OpKind> {
        self.in_flight.iter().map(|r| *r.key()).collect()
    }

    pub fn is_in_flight(&self, kind: OpKind) -> bool {
        self.in_flight.contains_key(&kind)
    }

    /// Grant the vault contract its one-time allowance.
    pub async fn approve(&self) -> Result<TxHash, EngineError> {
        let result = self.try_approve().await;
        if let Err(e) = &result {
            self.notify_failure(OpKind::Approve, e);
        }
        result
    }

    async fn try_approve(&self) -> Result<TxHash, EngineError> {
        self.reader
            .session()
            .account()
            .ok_or(EngineError::NoAccount)?;
        let decimals = self.reader.cache().decimals().unwrap_or(FALLBACK_DECIMALS);
        let allowance = parse_units(APPROVE_ALLOWANCE_TOKENS, decimals)
            .map_err(|_| EngineError::InvalidAmount)?
            .get_absolute();

        self.reserve(OpKind::Approve)?;
        match self.chain.approve(self.vault_address, allowance).await {
            Ok(tx_hash) => {
                self.track(OpKind::Approve, tx_hash, None);
                Ok(tx_hash)
            }
            Err(e) => {
                self.release(OpKind::Approve);
                Err(e.into())
            }
        }
    }

    /// Lock the drafted amount until the drafted unlock instant.
    pub async fn create_vault(
        &self,
        amount_text: &str,
        unlock_text: &str,
    ) -> Result<TxHash, EngineError> {
        let result = self.try_create_vault(amount_text, unlock_text).await;
        if let Err(e) = &result {
            self.notify_failure(OpKind::CreateVault, e);
        }
        result
    }

    async fn try_create_vault(
        &self,
        amount_text: &str,
        unlock_text: &str,
    ) -> Result<TxHash, EngineError> {
        self.reader
            .session()
            .account()
            .ok_or(EngineError::NoAccount)?;

        let decimals = self.reader.cache().decimals().unwrap_or(FALLBACK_DECIMALS);
        let amount_text = amount_text.trim();
        if amount_text.is_empty() || amount_text.starts_with('-') {
            return Err(EngineError::InvalidAmount);
        }
        let amount = parse_units(amount_text, decimals)
            .map_err(|_| EngineError::InvalidAmount)?
            .get_absolute();
        if amount.is_zero() {
            return Err(EngineError::InvalidAmount);
        }

        let unlock_time =
            parse_unlock_text(unlock_text).ok_or(EngineError::InvalidUnlockDate)?;
        let now_secs = self.clock.now_ms() / 1000;
        if unlock_time <= now_secs {
            return Err(EngineError::UnlockInPast);
        }

        self.reserve(OpKind::CreateVault)?;
        match self.chain.create_vault(amount, unlock_time).await {
            Ok(tx_hash) => {
                self.track(OpKind::CreateVault, tx_hash, None);
                Ok(tx_hash)
            }
            Err(e) => {
                self.release(OpKind::CreateVault);
                Err(e.into())
            }
        }
    }

    /// Withdraw an unlocked vault belonging to the connected account.
    pub async fn withdraw(&self, vault_id: u64) -> Result<TxHash, EngineError> {
        let result = self.try_withdraw(vault_id).await;
        if let Err(e) = &result {
            self.notify_failure(OpKind::Withdraw, e);
        }
        result
    }

    async fn try_withdraw(&self, vault_id: u64) -> Result<TxHash, EngineError> {
        let account = self
            .reader
            .session()
            .account()
            .ok_or(EngineError::NoAccount)?;

        let ids = self
            .reader
            .cache()
            .vault_ids(account)
            .ok_or(EngineError::UnknownVault(vault_id))?;
        if !ids.contains(&vault_id) {
            return Err(EngineError::UnknownVault(vault_id));
        }
        let record = self
            .reader
            .cache()
            .vault(account, vault_id)
            .ok_or(EngineError::UnknownVault(vault_id))?;
        if record.withdrawn {
            return Err(EngineError::AlreadyWithdrawn(vault_id));
        }
        if !is_unlocked(record.unlock_time, self.clock.now_ms()) {
            return Err(EngineError::VaultLocked(vault_id));
        }

        self.reserve(OpKind::Withdraw)?;
        match self.chain.withdraw(vault_id).await {
            Ok(tx_hash) => {
                self.track(OpKind::Withdraw, tx_hash, Some(vault_id));
                Ok(tx_hash)
            }
            Err(e) => {
                self.release(OpKind::Withdraw);
                Err(e.into())
            }
        }
    }

    /// Claim the per-kind slot before touching the network. The slot is
    /// released on submission failure and on terminal outcomes.
    fn reserve(&self, kind: OpKind) -> Result<(), EngineError> {
        match self.in_flight.entry(kind) {
            Entry::Occupied(_) => Err(EngineError::OperationInFlight(kind)),
            Entry::Vacant(slot) => {
                slot.insert(PendingOp {
                    kind,
                    submitted_at_ms: self.clock.now_ms(),
                    tx_hash: TxHash::ZERO,
                    vault_id: None,
                });
                Ok(())
            }
        }
    }

    fn release(&self, kind: OpKind) {
        self.in_flight.remove(&kind);
    }

    /// Record the accepted submission and spawn its receipt wait.
    fn track(&self, kind: OpKind, tx_hash: TxHash, vault_id: Option<u64>) {
        if let Some(mut op) = self.in_flight.get_mut(&kind) {
            op.tx_hash = tx_hash;
            op.vault_id = vault_id;
        }
        tracing::info!(op = %kind, tx_hash = %tx_hash, "transaction submitted");

        let this = self.clone();
        tokio::spawn(async move {
            this.finish(kind, tx_hash, vault_id).await;
        });
    }

    /// Await the receipt and apply the per-(kind, outcome) effects.
    async fn finish(self, kind: OpKind, tx_hash: TxHash, vault_id: Option<u64>) {
        let outcome = self.chain.wait_for_receipt(tx_hash).await;
        self.release(kind);

        match outcome {
            Ok(TxOutcome::Confirmed { block_number }) => {
                tracing::info!(op = %kind, tx_hash = %tx_hash, block_number, "transaction confirmed");
                match kind {
                    OpKind::Approve => {
                        // Allowance is not rendered anywhere; nothing to re-read.
                        self.notices.success(
                            "Tokens approved! You can now create vaults.",
                            self.clock.now_ms(),
                        );
                    }
                    OpKind::CreateVault => {
                        self.reader.invalidate_after_create().await;
                        self.draft.clear();
                        self.notices
                            .success("Vault created successfully!", self.clock.now_ms());
                    }
                    OpKind::Withdraw => {
                        if let Some(id) = vault_id {
                            self.reader.invalidate_after_withdraw(id).await;
                        }
                        self.notices
                            .success("Tokens withdrawn successfully!", self.clock.now_ms());
                    }
                }
            }
            Ok(TxOutcome::Failed(reason)) => {
                tracing::warn!(op = %kind, tx_hash = %tx_hash, reason = %reason, "transaction failed");
                self.notices.error(
                    format!("{}{}", failure_prefix(kind), reason),
                    ERROR_TTL,
                    self.clock.now_ms(),
                );
            }
            Err(e) => {
                tracing::warn!(op = %kind, tx_hash = %tx_hash, error = %e, "receipt wait failed");
                self.notices.error(
                    format!("{}{}", failure_prefix(kind), e),
                    ERROR_TTL,
                    self.clock.now_ms(),
                );
            }
        }
    }

    fn notify_failure(&self, kind: OpKind, error: &EngineError) {
        let now = self.clock.now_ms();
        if error.is_validation() {
            self.notices.error(error.to_string(), VALIDATION_TTL, now);
        } else {
            self.notices
                .error(format!("{}{}", failure_prefix(kind), error), ERROR_TTL, now);
        }
    }
}

fn failure_prefix(kind: OpKind) -> &'static str {
    match kind {
        OpKind::Approve => "Approval failed: ",
        OpKind::CreateVault => "Failed to create vault: ",
        OpKind::Withdraw => "Withdrawal failed: ",
    }
}

impl<C: VaultChain> std::fmt::Debug for TxOrchestrator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxOrchestrator")
            .field("vault_address", &self.vault_address)
            .field("in_flight", &self.in_flight())
            .finish()
    }
}
