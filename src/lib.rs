//! Plasma Vault SDK
//!
//! A library for compiling abstract financial operations into ABI-encoded
//! calldata for a plasma vault's batch-execute entry point. Callers describe
//! *what* should happen (supply, withdraw, swap, manage a liquidity
//! position, claim rewards) against protocol markets; the library resolves
//! each operation to the protocol adapter responsible for that market and
//! produces the complete calldata the vault contract expects.
//!
//! # Architecture Overview
//!
//! The library is organized into several key modules:
//!
//! - **`market`**: Market identifiers pairing a protocol with a market tag
//! - **`operation`**: Abstract operation values, one variant per intent
//! - **`fuse`**: Protocol adapters ("fuses") that encode operations into
//!   per-contract calls, and the fuse set that resolves markets to adapters
//! - **`compiler`**: The batch compiler assembling the final execute call
//! - **`encoding`**: Function selectors and packed swap-path encoding
//! - **`config`**: Per-network deployment configuration and validation
//! - **`errors`**: Comprehensive error handling and reporting
//!
//! # Core Concepts
//!
//! - **Market**: A protocol instance the vault can interact with,
//!   identified by a protocol id and a market tag
//! - **Fuse**: The on-chain adapter contract the vault delegates to for one
//!   protocol, mirrored here by an encoder that produces its calldata
//! - **Fuse Action**: One `(fuse address, calldata)` pair; the unit the
//!   vault's `execute` function consumes
//! - **Batch Compilation**: Resolving an ordered operation list to fuses
//!   and flattening their actions into a single encoded call
//!
//! # Thread Safety
//!
//! Compilation is pure computation over immutable values. A [`FuseSet`] and
//! the [`ExecuteCallFactory`] built from it can be shared freely across
//! threads.

pub mod compiler;
pub mod config;
pub mod encoding;
pub mod errors;
pub mod fuse;
pub mod market;
pub mod operation;

// Re-export the main Result type and error enum for convenience
pub use errors::{Result, SdkError};

// Re-export the core compilation surface
pub use compiler::ExecuteCallFactory;
pub use fuse::{Fuse, FuseAction, FuseSet};
pub use market::MarketId;
pub use operation::Operation;

// Module-specific result types for better ergonomics
pub type OperationResult<T> = std::result::Result<T, errors::OperationError>;
pub type FuseResult<T> = std::result::Result<T, errors::FuseError>;
pub type CompileResult<T> = std::result::Result<T, errors::CompileError>;
pub type ConfigResult<T> = std::result::Result<T, errors::ConfigError>;
