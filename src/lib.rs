//! Lock-fi vault engine.
//!
//! Client-side core for a time-locked token vault: tracks approve /
//! create-vault / withdraw transactions through their asynchronous
//! lifecycle, keeps a cached view of on-chain state consistent with
//! confirmed writes, and derives a ticking unlocked/time-remaining view
//! without re-querying the chain every second.

pub mod chain;
pub mod clock;
pub mod config;
pub mod engine;
pub mod lifecycle;
pub mod notify;
pub mod reader;
pub mod tx;
pub mod view;

pub use chain::{AccountSession, ChainError, RpcVaultChain, VaultChain};
pub use config::EngineConfig;
pub use engine::{DashboardSnapshot, VaultEngine};
pub use lifecycle::Shutdown;
pub use tx::EngineError;
