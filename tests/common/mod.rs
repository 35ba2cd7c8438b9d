//! Shared test utilities: a scripted, programmable chain boundary.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;

use alloy::primitives::{Address, TxHash, B256, U256};
use tokio::sync::Notify;

use lockfi_engine::chain::types::{ChainError, ChainResult, TxOutcome, VaultRecord};
use lockfi_engine::chain::VaultChain;

enum PendingWrite {
    Approve,
    Create { amount: U256, unlock_time: u64 },
    Withdraw { vault_id: u64 },
}

struct ChainState {
    balance: U256,
    vaults: BTreeMap<u64, VaultRecord>,
    next_vault_id: u64,
    pending: BTreeMap<TxHash, PendingWrite>,
    next_tx: u64,
}

/// In-memory chain with injectable failures and receipts that can be held
/// back to keep operations in the Submitted state.
pub struct MockChain {
    decimals: u8,
    state: Mutex<ChainState>,
    write_count: AtomicU32,
    fail_reads: AtomicBool,
    fail_submits: AtomicBool,
    revert_receipts: AtomicBool,
    hold_receipts: AtomicBool,
    release: Notify,
    next_block: AtomicU64,
}

#[allow(dead_code)]
impl MockChain {
    pub fn new(decimals: u8, balance: U256) -> Self {
        Self {
            decimals,
            state: Mutex::new(ChainState {
                balance,
                vaults: BTreeMap::new(),
                next_vault_id: 0,
                pending: BTreeMap::new(),
                next_tx: 1,
            }),
            write_count: AtomicU32::new(0),
            fail_reads: AtomicBool::new(false),
            fail_submits: AtomicBool::new(false),
            revert_receipts: AtomicBool::new(false),
            hold_receipts: AtomicBool::new(false),
            release: Notify::new(),
            next_block: AtomicU64::new(1),
        }
    }

    /// Insert a vault directly, as if created out-of-band.
    pub fn seed_vault(&self, unlock_time: u64, amount: U256) -> u64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_vault_id;
        state.next_vault_id += 1;
        state.vaults.insert(
            id,
            VaultRecord {
                amount,
                unlock_time,
                withdrawn: false,
                is_unlocked: false,
            },
        );
        id
    }

    /// Number of accepted write submissions.
    pub fn writes_submitted(&self) -> u32 {
        self.write_count.load(Ordering::SeqCst)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_submits(&self, fail: bool) {
        self.fail_submits.store(fail, Ordering::SeqCst);
    }

    pub fn set_revert_receipts(&self, revert: bool) {
        self.revert_receipts.store(revert, Ordering::SeqCst);
    }

    /// Hold every receipt so submitted operations stay in flight.
    pub fn hold_receipts(&self) {
        self.hold_receipts.store(true, Ordering::SeqCst);
    }

    /// Resolve all held receipts.
    pub fn release_receipts(&self) {
        self.hold_receipts.store(false, Ordering::SeqCst);
        self.release.notify_waiters();
    }

    fn check_reads(&self) -> ChainResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ChainError::Rpc("injected read failure".into()));
        }
        Ok(())
    }

    fn submit(&self, write: PendingWrite) -> ChainResult<TxHash> {
        if self.fail_submits.load(Ordering::SeqCst) {
            return Err(ChainError::Rpc("user rejected signing".into()));
        }
        self.write_count.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state.lock().unwrap();
        let tx_hash = B256::from(U256::from(state.next_tx));
        state.next_tx += 1;
        state.pending.insert(tx_hash, write);
        Ok(tx_hash)
    }
}

impl VaultChain for MockChain {
    async fn decimals(&self) -> ChainResult<u8> {
        self.check_reads()?;
        Ok(self.decimals)
    }

    async fn balance_of(&self, _account: Address) -> ChainResult<U256> {
        self.check_reads()?;
        Ok(self.state.lock().unwrap().balance)
    }

    async fn vault_count(&self, _account: Address) -> ChainResult<u64> {
        self.check_reads()?;
        Ok(self.state.lock().unwrap().vaults.len() as u64)
    }

    async fn user_vaults(&self, _account: Address) -> ChainResult<Vec<u64>> {
        self.check_reads()?;
        Ok(self.state.lock().unwrap().vaults.keys().copied().collect())
    }

    async fn vault(&self, _account: Address, vault_id: u64) -> ChainResult<VaultRecord> {
        self.check_reads()?;
        self.state
            .lock()
            .unwrap()
            .vaults
            .get(&vault_id)
            .cloned()
            .ok_or_else(|| ChainError::Rpc(format!("no vault {vault_id}")))
    }

    async fn approve(&self, _spender: Address, _amount: U256) -> ChainResult<TxHash> {
        self.submit(PendingWrite::Approve)
    }

    async fn create_vault(&self, amount: U256, unlock_time: u64) -> ChainResult<TxHash> {
        self.submit(PendingWrite::Create {
            amount,
            unlock_time,
        })
    }

    async fn withdraw(&self, vault_id: u64) -> ChainResult<TxHash> {
        self.submit(PendingWrite::Withdraw { vault_id })
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> ChainResult<TxOutcome> {
        // Park until released; no lock is held across the await.
        loop {
            if !self.hold_receipts.load(Ordering::SeqCst) {
                break;
            }
            let notified = self.release.notified();
            if !self.hold_receipts.load(Ordering::SeqCst) {
                break;
            }
            notified.await;
        }

        let mut state = self.state.lock().unwrap();
        let write = state
            .pending
            .remove(&tx_hash)
            .ok_or_else(|| ChainError::Rpc("unknown transaction".into()))?;

        if self.revert_receipts.load(Ordering::SeqCst) {
            return Ok(TxOutcome::Failed("execution reverted".into()));
        }

        match write {
            PendingWrite::Approve => {}
            PendingWrite::Create {
                amount,
                unlock_time,
            } => {
                let id = state.next_vault_id;
                state.next_vault_id += 1;
                state.vaults.insert(
                    id,
                    VaultRecord {
                        amount,
                        unlock_time,
                        withdrawn: false,
                        is_unlocked: false,
                    },
                );
                state.balance = state.balance.saturating_sub(amount);
            }
            PendingWrite::Withdraw { vault_id } => {
                if let Some(record) = state.vaults.get_mut(&vault_id) {
                    record.withdrawn = true;
                    let amount = record.amount;
                    state.balance = state.balance.saturating_add(amount);
                }
            }
        }

        Ok(TxOutcome::Confirmed {
            block_number: self.next_block.fetch_add(1, Ordering::SeqCst),
        })
    }
}
