//! Periodic per-vault record refresh.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::interval;

use crate::chain::boundary::VaultChain;
use crate::reader::ChainReader;

/// Refreshes every known vault record on a bounded interval, independent of
/// user action, so unlock transitions and out-of-band withdrawals surface
/// without a manual refresh. Balance and id-list queries are deliberately
/// excluded; those refresh only on explicit invalidation.
pub struct VaultPoller<C: VaultChain> {
    reader: ChainReader<C>,
    period: Duration,
}

impl<C: VaultChain> VaultPoller<C> {
    pub fn new(reader: ChainReader<C>, poll_interval_secs: u64) -> Self {
        Self {
            reader,
            period: Duration::from_secs(poll_interval_secs),
        }
    }

    /// Run until the shutdown signal fires.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(period_secs = self.period.as_secs(), "vault poller started");
        let mut ticker = interval(self.period);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => self.poll_once().await,
                _ = shutdown.recv() => {
                    tracing::debug!("vault poller stopping");
                    break;
                }
            }
        }
    }

    async fn poll_once(&self) {
        // First read of decimals may have failed at startup; keep retrying.
        self.reader.refresh_decimals().await;
        self.reader.refresh_known_vaults().await;
    }
}
