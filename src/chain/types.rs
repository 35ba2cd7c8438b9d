//! Chain-facing types and error definitions.

use alloy::primitives::U256;
use thiserror::Error;

/// Errors crossing the contract boundary.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was reverted on-chain.
    #[error("transaction reverted: {0}")]
    Reverted(String),

    /// No receipt arrived within the configured window.
    #[error("no receipt after {0} seconds")]
    ConfirmationTimeout(u64),

    /// A configured contract or account address did not parse.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Result type for boundary operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// One on-chain vault, exactly as `getVault` returns it.
///
/// Never mutated locally; the cache only ever replaces a record with the
/// result of a fresh authoritative read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultRecord {
    /// Locked amount in raw token units.
    pub amount: U256,
    /// Unlock instant, seconds since the Unix epoch.
    pub unlock_time: u64,
    /// True once a withdraw for this vault has been confirmed.
    pub withdrawn: bool,
    /// The contract's own view of the unlock state at read time. Display
    /// derives lock state from the clock instead; this flag is carried for
    /// diagnostics only.
    pub is_unlocked: bool,
}

/// Terminal outcome of a submitted write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxOutcome {
    /// Receipt arrived with success status.
    Confirmed { block_number: u64 },
    /// Receipt arrived with failure status, or the submission was dropped.
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChainError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = ChainError::Reverted("vault locked".into());
        assert!(err.to_string().contains("vault locked"));
    }

    #[test]
    fn test_outcome_equality() {
        assert_eq!(
            TxOutcome::Confirmed { block_number: 7 },
            TxOutcome::Confirmed { block_number: 7 }
        );
        assert_ne!(
            TxOutcome::Confirmed { block_number: 7 },
            TxOutcome::Failed("reverted".into())
        );
    }
}
