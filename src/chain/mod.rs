//! Contract boundary subsystem.
//!
//! # Data Flow
//! ```text
//! External wallet session (address, signer)
//!     → session.rs (connected account, queries disabled while absent)
//!     → client.rs (RPC provider with per-call timeouts)
//!     → contracts.rs (token + vault call bindings)
//!     → boundary.rs (the trait the rest of the engine sees)
//! ```
//!
//! # Design Decisions
//! - The engine never signs anything itself; the provider it is handed may
//!   carry a signer, but that is the caller's concern
//! - Every RPC call has a configurable timeout
//! - The boundary is a trait so tests run against a scripted chain

pub mod boundary;
pub mod client;
pub mod contracts;
pub mod session;
pub mod types;

pub use boundary::VaultChain;
pub use client::RpcVaultChain;
pub use session::AccountSession;
pub use types::{ChainError, ChainResult, TxOutcome, VaultRecord};
