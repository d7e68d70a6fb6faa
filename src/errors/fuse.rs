//! Fuse construction and capability errors.

use crate::market::MarketId;

/// Errors raised by fuse construction and fuse-set assembly.
#[derive(Debug, thiserror::Error)]
pub enum FuseError {
    /// A fuse was asked to encode an action its protocol has no notion of,
    /// e.g. a reward claim on a plain ERC-4626 vault.
    #[error("fuse {fuse} does not support {action}")]
    UnsupportedAction { fuse: &'static str, action: &'static str },

    /// Two fuses in one set claimed the same market. Resolution would be
    /// insertion-order dependent, so the set is rejected at construction.
    #[error("duplicate fuse registration for market {market}")]
    DuplicateMarket { market: MarketId },

    /// A fuse set was built with no fuses at all.
    #[error("fuse set must contain at least one fuse")]
    EmptyFuseSet,
}
