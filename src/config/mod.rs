//! Configuration management.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → EngineConfig (validated, immutable)
//!     → shared by value at startup
//! ```
//!
//! # Design Decisions
//! - Every field has a default so a minimal config file works
//! - Validation separates syntactic (serde) from semantic checks
//! - Config is immutable once loaded

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::{ChainConfig, EngineConfig, ReaderConfig};
