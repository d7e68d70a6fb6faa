//! Error handling and reporting for the plasma vault SDK.
//!
//! This module provides a hierarchical error system with fine-grained error
//! types for each major component of the library:
//!
//! - **`OperationError`**: malformed operation or market construction input
//! - **`FuseError`**: fuse construction, fuse-set assembly, and missing
//!   protocol capabilities
//! - **`CompileError`**: market resolution and dispatch failures during
//!   batch compilation
//! - **`ConfigError`**: deployment configuration loading and validation
//!
//! The `SdkError` enum serves as the top-level error type, with automatic
//! conversion from all domain-specific errors. All failures in the
//! compilation core are local, synchronous, and non-recoverable: there is
//! no I/O inside the core, so there is never anything to retry. Errors
//! carry the offending market identifier or operation variant so a failure
//! can be diagnosed without re-running the batch.

pub mod compile;
pub mod config;
pub mod fuse;
pub mod operation;

// Re-export all error types for convenience
pub use compile::CompileError;
pub use config::ConfigError;
pub use fuse::FuseError;
pub use operation::OperationError;

/// Main result type for the library
pub type Result<T> = std::result::Result<T, SdkError>;

/// Top-level error enum that encompasses all possible errors in the SDK.
///
/// Compilation either fully succeeds or fails with one of these before any
/// bytes are produced; a partial batch is never returned.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// Malformed operation or market construction input.
    #[error("Operation error: {0}")]
    Operation(#[from] OperationError),

    /// Fuse construction or capability failure.
    #[error("Fuse error: {0}")]
    Fuse(#[from] FuseError),

    /// Market resolution or dispatch failure during compilation.
    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    /// Deployment configuration failure.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generic error for cases not covered by specific error types.
    #[error("Generic error: {0}")]
    Other(#[from] anyhow::Error),
}
