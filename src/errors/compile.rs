//! Batch compilation and dispatch errors.

use crate::market::MarketId;

/// Errors raised while compiling an operation batch into calldata.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// No registered fuse claims the operation's market. The caller must
    /// register the right fuse or fix the market identifier.
    #[error("no fuse supports market {market}")]
    UnsupportedMarket { market: MarketId },

    /// The fuse resolved for the market lacks the capability the operation
    /// variant requires. Indicates a fuse/operation mismatch introduced by
    /// an incomplete extension of the fuse set.
    #[error("operation {operation} is not supported by the fuse for market {market}")]
    UnsupportedOperation { operation: &'static str, market: MarketId },
}
