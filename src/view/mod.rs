//! Vault View Model.
//!
//! Pure composition of cached chain state with the clock: no I/O, no shared
//! mutation, safe to re-run on every tick.

pub mod format;
pub mod status;

pub use format::{format_amount, truncate_address, AMOUNT_PLACEHOLDER};
pub use status::{derive_statuses, is_unlocked, time_remaining_label, vault_status, DerivedVaultStatus, VaultStatus};
