//! Connected-account state, supplied by the external wallet session.

use std::sync::Arc;

use alloy::primitives::Address;
use arc_swap::ArcSwapOption;

/// The connected wallet address, if any.
///
/// Set and cleared from outside the engine; every account-scoped query is
/// disabled while no address is present. Cloning shares the same slot.
#[derive(Clone, Default)]
pub struct AccountSession {
    inner: Arc<ArcSwapOption<Address>>,
}

impl AccountSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly connected wallet address.
    pub fn connect(&self, account: Address) {
        tracing::info!(account = %account, "wallet connected");
        self.inner.store(Some(Arc::new(account)));
    }

    /// Clear the connected address; the engine goes inert.
    pub fn disconnect(&self) {
        tracing::info!("wallet disconnected");
        self.inner.store(None);
    }

    /// Currently connected address.
    pub fn account(&self) -> Option<Address> {
        self.inner.load().as_deref().copied()
    }
}

impl std::fmt::Debug for AccountSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountSession")
            .field("account", &self.account())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_disconnect() {
        let session = AccountSession::new();
        assert!(session.account().is_none());

        session.connect(Address::ZERO);
        assert_eq!(session.account(), Some(Address::ZERO));

        session.disconnect();
        assert!(session.account().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let a = AccountSession::new();
        let b = a.clone();
        a.connect(Address::ZERO);
        assert_eq!(b.account(), Some(Address::ZERO));
    }
}
