//! Market identification for fuse resolution.
//!
//! A [`MarketId`] names one external liquidity venue as a (protocol, market)
//! pair. It is the sole lookup key used when resolving an operation to the
//! fuse that can encode it: supply-style fuses claim the market of the asset
//! or vault token they serve, while Uniswap-style fuses claim fixed tags such
//! as `swap` or `new-position`.

use std::fmt;

use alloy::primitives::Address;

use crate::errors::OperationError;

/// Identifier of one supported protocol market.
///
/// Immutable after construction; equality and hashing are structural, so two
/// identifiers built from the same strings always resolve to the same fuse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarketId {
    protocol_id: String,
    market_id: String,
}

impl MarketId {
    /// Create a new market identifier.
    ///
    /// # Errors
    ///
    /// Fails if either field is empty; a blank protocol or market tag can
    /// never match a registered fuse and indicates a caller-side bug.
    pub fn new(protocol_id: impl Into<String>, market_id: impl Into<String>) -> Result<Self, OperationError> {
        let protocol_id = protocol_id.into();
        let market_id = market_id.into();

        if protocol_id.is_empty() {
            return Err(OperationError::FieldRequired { field: "protocol_id" });
        }
        if market_id.is_empty() {
            return Err(OperationError::FieldRequired { field: "market_id" });
        }

        Ok(Self { protocol_id, market_id })
    }

    /// Create a market identifier whose market tag is a token or vault
    /// address, rendered in its canonical checksummed form.
    ///
    /// Fuses that are bound to a deployed asset address publish their claimed
    /// market through this constructor, so callers using the same helper are
    /// guaranteed a byte-identical key.
    pub fn for_address(protocol_id: impl Into<String>, address: Address) -> Result<Self, OperationError> {
        Self::new(protocol_id, address.to_checksum(None))
    }

    /// Constructor for fuse-published markets whose fields are known
    /// non-empty constants (protocol tags and checksummed addresses).
    pub(crate) fn known(protocol_id: impl Into<String>, market_id: impl Into<String>) -> Self {
        Self { protocol_id: protocol_id.into(), market_id: market_id.into() }
    }

    /// The protocol tag, e.g. `aave-v3` or `uniswap-v3`.
    pub fn protocol_id(&self) -> &str {
        &self.protocol_id
    }

    /// The market tag within the protocol: an asset address for supply
    /// markets, a fixed capability tag for DEX fuses.
    pub fn market_id(&self) -> &str {
        &self.market_id
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.protocol_id, self.market_id)
    }
}
