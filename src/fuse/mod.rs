//! Capability adapters ("fuses") translating operations into encoded calls.
//!
//! A fuse is a stateless adapter for one external protocol integration. It
//! holds the deployed adapter address(es) it targets and the market(s) it
//! serves, and knows how to turn an operation's parameters into one or more
//! ordered [`FuseAction`]s against that protocol. Fuses are constructed once
//! from configuration and never mutated afterwards, so a [`FuseSet`] can be
//! shared freely across threads.
//!
//! The required [`Fuse`] trait covers what every adapter can do: claim
//! markets, move funds in, move funds out. Protocol-specific capabilities
//! such as reward claims or position management live in extension traits
//! that only the fuses actually supporting them implement. The base trait
//! exposes the extensions through `as_*` accessors defaulting to `None`,
//! which keeps a runtime error path for capabilities decided dynamically by
//! configuration while letting concrete code require a capability at
//! compile time.

mod aave_v3;
mod erc4626;
mod fluid_instadapp;
mod gearbox;
mod ramses;
mod uniswap_v3;

pub use aave_v3::AaveV3SupplyFuse;
pub use erc4626::Erc4626SupplyFuse;
pub use fluid_instadapp::FluidInstadappSupplyFuse;
pub use gearbox::GearboxSupplyFuse;
pub use ramses::RamsesClaimFuse;
pub use uniswap_v3::{
    UniswapV3CollectFuse, UniswapV3ModifyPositionFuse, UniswapV3NewPositionFuse, UniswapV3SwapFuse,
};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};

use crate::errors::{CompileError, FuseError};
use crate::market::MarketId;
use crate::operation::{
    ClaimOperation, ClosePositionOperation, CollectOperation, DecreasePositionOperation,
    IncreasePositionOperation, NewPositionOperation, SwapOperation,
};

/// Sentinel amount meaning "everything available".
///
/// Composite fuses use this instead of a previously read balance so the
/// hand-off between two contracts tolerates balance growth between the
/// read and the on-chain execution.
pub const MAX_AMOUNT: U256 = U256::MAX;

/// One unit of execution: a target contract and the opaque calldata to
/// send it.
///
/// Actions are produced only by fuses and consumed only by the batch
/// compiler; they have no lifecycle beyond one compile call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuseAction {
    /// Address of the deployed fuse contract to delegate to.
    pub fuse: Address,
    /// Complete calldata for the fuse contract, selector included.
    pub data: Bytes,
}

impl FuseAction {
    pub fn new(fuse: Address, data: Vec<u8>) -> Self {
        Self { fuse, data: Bytes::from(data) }
    }
}

/// Required contract of every protocol adapter.
pub trait Fuse: fmt::Debug + Send + Sync {
    /// Stable adapter name used in errors and tracing output.
    fn name(&self) -> &'static str;

    /// Every market this fuse claims. Used to index the fuse set; two
    /// fuses in one set must not claim the same market.
    fn markets(&self) -> Vec<MarketId>;

    /// Whether this fuse can encode operations for `market`.
    fn supports(&self, market: &MarketId) -> bool {
        self.markets().iter().any(|m| m == market)
    }

    /// Encode the ordered action(s) that move `amount` into the protocol.
    fn enter(&self, market: &MarketId, amount: U256) -> Result<Vec<FuseAction>, FuseError>;

    /// Encode the ordered action(s) that move `amount` out of the protocol.
    ///
    /// For composite fuses the returned sequence is the exact reverse of
    /// [`Fuse::enter`]: the stake must be unwound before the underlying
    /// pool withdrawal, or the receipt tokens are still held by the farm
    /// contract when the withdrawal executes.
    fn exit(&self, market: &MarketId, amount: U256) -> Result<Vec<FuseAction>, FuseError>;

    /// Reward-claim capability, if this protocol has one.
    fn as_claimable(&self) -> Option<&dyn ClaimableFuse> {
        None
    }

    /// Swap capability, if this protocol has one.
    fn as_swap(&self) -> Option<&dyn SwapFuse> {
        None
    }

    /// Position-minting capability, if this protocol has one.
    fn as_new_position(&self) -> Option<&dyn NewPositionFuse> {
        None
    }

    /// Position-resizing capability, if this protocol has one.
    fn as_modify_position(&self) -> Option<&dyn ModifyPositionFuse> {
        None
    }

    /// Fee-collection capability, if this protocol has one.
    fn as_collect(&self) -> Option<&dyn CollectFuse> {
        None
    }
}

/// Reward-claim extension, implemented by fuses whose protocol pays
/// rewards.
pub trait ClaimableFuse: Fuse {
    fn claim(&self, claim: &ClaimOperation) -> Vec<FuseAction>;
}

/// Swap extension.
pub trait SwapFuse: Fuse {
    fn swap(&self, swap: &SwapOperation) -> Vec<FuseAction>;
}

/// Position-minting extension. Closing runs through the same adapter that
/// minted the position.
pub trait NewPositionFuse: Fuse {
    fn new_position(&self, position: &NewPositionOperation) -> Vec<FuseAction>;

    fn close_position(&self, close: &ClosePositionOperation) -> Vec<FuseAction>;
}

/// Position-resizing extension.
pub trait ModifyPositionFuse: Fuse {
    fn increase_position(&self, increase: &IncreasePositionOperation) -> Vec<FuseAction>;

    fn decrease_position(&self, decrease: &DecreasePositionOperation) -> Vec<FuseAction>;
}

/// Fee-collection extension.
pub trait CollectFuse: Fuse {
    fn collect(&self, collect: &CollectOperation) -> Vec<FuseAction>;
}

/// An immutable set of fuses indexed by the markets they claim.
///
/// The set is built once at startup. Every market claimed by a member fuse
/// becomes a map key at construction, and a second fuse claiming an
/// already-indexed market fails the whole construction instead of silently
/// winning or losing by insertion order. Resolution is therefore a
/// deterministic map lookup.
#[derive(Debug, Clone)]
pub struct FuseSet {
    fuses: Vec<Arc<dyn Fuse>>,
    by_market: HashMap<MarketId, usize>,
}

impl FuseSet {
    /// Build a fuse set from the given adapters.
    ///
    /// # Errors
    ///
    /// Fails if `fuses` is empty or if two fuses claim the same market.
    pub fn new(fuses: Vec<Arc<dyn Fuse>>) -> Result<Self, FuseError> {
        if fuses.is_empty() {
            return Err(FuseError::EmptyFuseSet);
        }

        let mut by_market = HashMap::new();
        for (index, fuse) in fuses.iter().enumerate() {
            for market in fuse.markets() {
                if by_market.insert(market.clone(), index).is_some() {
                    return Err(FuseError::DuplicateMarket { market });
                }
            }
        }

        tracing::debug!(
            fuse_count = fuses.len(),
            market_count = by_market.len(),
            "Fuse set constructed"
        );

        Ok(Self { fuses, by_market })
    }

    /// Resolve the fuse claiming `market`.
    ///
    /// # Errors
    ///
    /// Fails if no registered fuse supports the market.
    pub fn resolve(&self, market: &MarketId) -> Result<&dyn Fuse, CompileError> {
        self.by_market
            .get(market)
            .map(|&index| self.fuses[index].as_ref())
            .ok_or_else(|| CompileError::UnsupportedMarket { market: market.clone() })
    }

    /// Number of fuses in the set.
    pub fn len(&self) -> usize {
        self.fuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fuses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct StubFuse {
        market: MarketId,
        address: Address,
    }

    impl StubFuse {
        fn new(protocol: &str, market: &str, address: Address) -> Self {
            Self { market: MarketId::new(protocol, market).unwrap(), address }
        }
    }

    impl Fuse for StubFuse {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn markets(&self) -> Vec<MarketId> {
            vec![self.market.clone()]
        }

        fn enter(&self, _market: &MarketId, _amount: U256) -> Result<Vec<FuseAction>, FuseError> {
            Ok(vec![FuseAction::new(self.address, vec![0x01])])
        }

        fn exit(&self, _market: &MarketId, _amount: U256) -> Result<Vec<FuseAction>, FuseError> {
            Ok(vec![FuseAction::new(self.address, vec![0x02])])
        }
    }

    #[test]
    fn test_fuse_set_rejects_duplicate_market() {
        let fuses: Vec<Arc<dyn Fuse>> = vec![
            Arc::new(StubFuse::new("aave-v3", "0x1234", Address::repeat_byte(0x01))),
            Arc::new(StubFuse::new("aave-v3", "0x1234", Address::repeat_byte(0x02))),
        ];

        let result = FuseSet::new(fuses);
        assert!(matches!(result, Err(FuseError::DuplicateMarket { .. })));
    }

    #[test]
    fn test_fuse_set_rejects_empty() {
        assert!(matches!(FuseSet::new(vec![]), Err(FuseError::EmptyFuseSet)));
    }

    #[test]
    fn test_resolve_finds_claiming_fuse() {
        let target = Address::repeat_byte(0x0a);
        let fuses: Vec<Arc<dyn Fuse>> = vec![
            Arc::new(StubFuse::new("aave-v3", "0x1234", Address::repeat_byte(0x01))),
            Arc::new(StubFuse::new("gearbox-v3", "0x5678", target)),
        ];
        let set = FuseSet::new(fuses).unwrap();

        let market = MarketId::new("gearbox-v3", "0x5678").unwrap();
        let fuse = set.resolve(&market).unwrap();
        assert!(fuse.supports(&market));

        let actions = fuse.enter(&market, U256::from(1u64)).unwrap();
        assert_eq!(actions[0].fuse, target);
    }

    #[test]
    fn test_resolve_unknown_market_fails() {
        let fuses: Vec<Arc<dyn Fuse>> =
            vec![Arc::new(StubFuse::new("aave-v3", "0x1234", Address::repeat_byte(0x01)))];
        let set = FuseSet::new(fuses).unwrap();

        let unknown = MarketId::new("compound-v3", "0x9999").unwrap();
        assert!(matches!(
            set.resolve(&unknown),
            Err(CompileError::UnsupportedMarket { .. })
        ));
    }
}
