//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build chain boundary → Spawn clock + poller
//!
//! Shutdown (shutdown.rs):
//!     Ctrl-C → broadcast → clock and poller tasks exit → timers released
//! ```
//!
//! # Design Decisions
//! - Every periodic task subscribes to the shutdown broadcast; none may
//!   outlive it (a leaked ticking timer keeps the process alive)

pub mod shutdown;

pub use shutdown::Shutdown;
