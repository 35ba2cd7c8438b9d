//! Transaction Orchestrator subsystem.
//!
//! # Data Flow
//! ```text
//! User intent (approve / create vault / withdraw)
//!     → client-side validation (no network on failure)
//!     → per-kind exclusivity reservation
//!     → VaultChain write → tx hash recorded as Submitted
//!     → spawned receipt wait → Confirmed | Failed (terminal)
//!         Confirmed → invalidation set re-read + success notification
//!         Failed    → error notification, nothing invalidated
//! ```
//!
//! # Design Decisions
//! - One in-flight operation per kind; a second submit of the same kind is
//!   rejected before any network call
//! - Re-reads happen strictly after confirmation, never speculatively
//! - The approval allowance is one large fixed grant so repeated vault
//!   creations need no repeated approvals

pub mod orchestrator;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use thiserror::Error;

use crate::chain::types::ChainError;

pub use orchestrator::TxOrchestrator;

/// Whole tokens granted by a single approval, scaled by the token decimals
/// at submit time.
pub const APPROVE_ALLOWANCE_TOKENS: &str = "1000000";

/// The three write operations the engine submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Approve,
    CreateVault,
    Withdraw,
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpKind::Approve => write!(f, "Approval"),
            OpKind::CreateVault => write!(f, "Vault creation"),
            OpKind::Withdraw => write!(f, "Withdrawal"),
        }
    }
}

/// One submitted, not yet resolved operation.
#[derive(Debug, Clone)]
pub struct PendingOp {
    pub kind: OpKind,
    pub submitted_at_ms: u64,
    /// Zero until the write boundary has accepted the submission.
    pub tx_hash: alloy::primitives::TxHash,
    /// The target vault for withdrawals.
    pub vault_id: Option<u64>,
}

/// Everything that can go wrong between user intent and confirmation.
///
/// All variants except `Chain` are client-side validation rejections raised
/// before any network call.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No wallet connected")]
    NoAccount,

    #[error("Please enter a valid amount")]
    InvalidAmount,

    #[error("Please select an unlock date")]
    InvalidUnlockDate,

    #[error("Unlock date must be in the future")]
    UnlockInPast,

    #[error("Unknown vault #{0}")]
    UnknownVault(u64),

    #[error("Vault #{0} is still locked")]
    VaultLocked(u64),

    #[error("Vault #{0} was already withdrawn")]
    AlreadyWithdrawn(u64),

    #[error("{0} already in progress")]
    OperationInFlight(OpKind),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl EngineError {
    /// Client-side rejection, raised before any network call.
    pub fn is_validation(&self) -> bool {
        !matches!(self, EngineError::Chain(_))
    }
}

/// Parse an unlock datetime as entered in the form into epoch seconds.
///
/// Accepts RFC 3339 and the `datetime-local` input shapes; naive values are
/// interpreted in the local timezone, matching what the dashboard submits.
pub fn parse_unlock_text(text: &str) -> Option<u64> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return u64::try_from(dt.timestamp()).ok();
    }

    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M"))
        .ok()?;
    let local = Local.from_local_datetime(&naive).single()?;
    u64::try_from(local.timestamp()).ok()
}
