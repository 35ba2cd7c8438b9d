//! Derived unlock state and time-remaining labels.

use crate::chain::types::VaultRecord;
use crate::reader::ChainCache;
use alloy::primitives::Address;

const MINUTE_MS: u64 = 60 * 1000;
const HOUR_MS: u64 = 60 * MINUTE_MS;
const DAY_MS: u64 = 24 * HOUR_MS;

/// Display state of one vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultStatus {
    /// Funds already withdrawn; takes precedence over unlock state.
    Withdrawn,
    /// Unlock instant reached, withdrawal available.
    Unlocked,
    /// Still locked; label counts down the remaining time.
    Locked { label: String },
}

/// Status derived for one vault id; recomputed every tick, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedVaultStatus {
    pub vault_id: u64,
    pub status: VaultStatus,
}

/// A vault unlocks at exactly `unlock_time * 1000` milliseconds, never
/// before.
pub fn is_unlocked(unlock_time: u64, now_ms: u64) -> bool {
    now_ms >= unlock_time.saturating_mul(1000)
}

/// Countdown label for a still-locked vault: days, hours and minutes when
/// days remain, hours and minutes below a day, bare minutes below an hour.
pub fn time_remaining_label(unlock_time: u64, now_ms: u64) -> String {
    let diff = unlock_time.saturating_mul(1000).saturating_sub(now_ms);

    let days = diff / DAY_MS;
    let hours = (diff % DAY_MS) / HOUR_MS;
    let minutes = (diff % HOUR_MS) / MINUTE_MS;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Compose one cached record with the clock. Pure; identical inputs yield
/// identical output.
pub fn vault_status(record: &VaultRecord, now_ms: u64) -> VaultStatus {
    if record.withdrawn {
        VaultStatus::Withdrawn
    } else if is_unlocked(record.unlock_time, now_ms) {
        VaultStatus::Unlocked
    } else {
        VaultStatus::Locked {
            label: time_remaining_label(record.unlock_time, now_ms),
        }
    }
}

/// Statuses for every id whose record has already arrived. Ids without a
/// cached record are skipped: not-yet-loaded, not absent.
pub fn derive_statuses(
    ids: &[u64],
    cache: &ChainCache,
    account: Address,
    now_ms: u64,
) -> Vec<DerivedVaultStatus> {
    ids.iter()
        .filter_map(|&vault_id| {
            cache.vault(account, vault_id).map(|record| DerivedVaultStatus {
                vault_id,
                status: vault_status(&record, now_ms),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    fn record(unlock_time: u64, withdrawn: bool) -> VaultRecord {
        VaultRecord {
            amount: U256::from(100),
            unlock_time,
            withdrawn,
            is_unlocked: false,
        }
    }

    #[test]
    fn test_unlock_boundary_is_exact() {
        let unlock = 1_700_000_000u64;
        let boundary_ms = unlock * 1000;

        assert!(!is_unlocked(unlock, boundary_ms - 1));
        assert!(is_unlocked(unlock, boundary_ms));
        assert!(is_unlocked(unlock, boundary_ms + 1));
    }

    #[test]
    fn test_label_units() {
        // 2d 3h 11m ahead.
        let now_ms = 1_000_000_000_000u64;
        let unlock = (now_ms + 2 * DAY_MS + 3 * HOUR_MS + 11 * MINUTE_MS) / 1000;
        assert_eq!(time_remaining_label(unlock, now_ms), "2d 3h 11m");

        // Below a day: hours + minutes.
        let unlock = (now_ms + 5 * HOUR_MS + 30 * MINUTE_MS) / 1000;
        assert_eq!(time_remaining_label(unlock, now_ms), "5h 30m");

        // Below an hour: minutes only.
        let unlock = (now_ms + 59 * MINUTE_MS) / 1000;
        assert_eq!(time_remaining_label(unlock, now_ms), "59m");
    }

    #[test]
    fn test_one_hour_vault_shows_59m_after_a_second() {
        let now_ms = 1_000_000_000_000u64;
        let unlock = now_ms / 1000 + 3600;

        // One second after creation the countdown reads 59 minutes.
        assert_eq!(time_remaining_label(unlock, now_ms + 1_000), "59m");
        // At the unlock instant the vault flips to Unlocked.
        assert_eq!(
            vault_status(&record(unlock, false), unlock * 1000),
            VaultStatus::Unlocked
        );
    }

    #[test]
    fn test_withdrawn_takes_precedence() {
        // Unlocked and withdrawn: display Withdrawn.
        assert_eq!(vault_status(&record(0, true), 1_000), VaultStatus::Withdrawn);
    }

    #[test]
    fn test_idempotent() {
        let now_ms = 1_000_000_000_000u64;
        let unlock = now_ms / 1000 + 500;
        let a = vault_status(&record(unlock, false), now_ms);
        let b = vault_status(&record(unlock, false), now_ms);
        assert_eq!(a, b);
    }

    #[test]
    fn test_unloaded_records_are_skipped() {
        let cache = ChainCache::new();
        let account = Address::ZERO;
        cache.set_vault(account, 1, record(u64::MAX / 2000, false));

        // Id 0 has no record yet; only id 1 renders.
        let statuses = derive_statuses(&[0, 1], &cache, account, 0);
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].vault_id, 1);
    }
}
