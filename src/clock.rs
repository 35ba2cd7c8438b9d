//! Wall-clock ticker driving all derived time state.
//!
//! One process-wide task publishes epoch milliseconds once per second over a
//! watch channel. Vault statuses and notification expiry are recomputed from
//! the published value; nothing else in the engine asks the OS for the time
//! while rendering.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::{broadcast, watch};
use tokio::time::interval;

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Handle to the ticking clock. Cheap to clone; reads never block.
#[derive(Clone, Debug)]
pub struct ClockHandle {
    rx: watch::Receiver<u64>,
    /// Keeps the sender alive for fixed-time handles; None for the live clock.
    _keepalive: Option<std::sync::Arc<watch::Sender<u64>>>,
}

impl ClockHandle {
    /// Latest published time in epoch milliseconds.
    pub fn now_ms(&self) -> u64 {
        *self.rx.borrow()
    }

    /// Wait for the next tick. Errors once the clock task has stopped.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.rx.changed().await
    }

    /// A handle carrying a fixed time, for pure computations in tests.
    pub fn fixed(now_ms: u64) -> Self {
        let (tx, rx) = watch::channel(now_ms);
        Self {
            rx,
            _keepalive: Some(std::sync::Arc::new(tx)),
        }
    }
}

/// Spawn the 1 Hz clock task.
///
/// The task exits when the shutdown signal fires or when every handle has
/// been dropped, releasing its interval timer either way.
pub fn spawn(mut shutdown: broadcast::Receiver<()>) -> ClockHandle {
    let (tx, rx) = watch::channel(epoch_ms());

    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(1));
        // The first tick of a tokio interval completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if tx.send(epoch_ms()).is_err() {
                        break;
                    }
                }
                _ = shutdown.recv() => {
                    tracing::debug!("clock task stopping");
                    break;
                }
            }
        }
    });

    rx.into()
}

impl From<watch::Receiver<u64>> for ClockHandle {
    fn from(rx: watch::Receiver<u64>) -> Self {
        Self {
            rx,
            _keepalive: None,
        }
    }
}
