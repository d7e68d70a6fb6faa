//! Abstract financial intents compiled into vault calldata.
//!
//! An [`Operation`] describes *what* should happen against one market
//! (supply funds, withdraw them, swap, or manage a concentrated-liquidity
//! position) without saying anything about how the target protocol
//! encodes it. The batch compiler resolves each operation to a fuse and
//! dispatches on the variant with an exhaustive match, so adding a new
//! variant without extending the dispatch fails to compile instead of
//! failing at runtime.
//!
//! Operations are pure values: immutable once constructed, built and
//! discarded per call-site, safe to share across threads. Each one is
//! associated with exactly one [`MarketId`].

use alloy::primitives::{
    aliases::{I24, U24},
    Address, U256,
};

use crate::errors::OperationError;
use crate::market::MarketId;

/// One abstract intent against one market.
///
/// The set of variants is closed; the compiler's dispatch is an exhaustive
/// match over it. `Claim` is carried here for completeness but compiles
/// through the dedicated reward-claim entry point, not the execute batch.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Move funds into a supply market.
    Supply(SupplyOperation),
    /// Move funds out of a supply market.
    Withdraw(WithdrawOperation),
    /// Exact-input swap along a fee-tier path.
    Swap(SwapOperation),
    /// Mint a new concentrated-liquidity position.
    NewPosition(NewPositionOperation),
    /// Add liquidity to an existing position.
    IncreasePosition(IncreasePositionOperation),
    /// Remove liquidity from an existing position.
    DecreasePosition(DecreasePositionOperation),
    /// Collect accrued fees for a set of positions.
    Collect(CollectOperation),
    /// Burn positions that have been fully exited.
    ClosePosition(ClosePositionOperation),
    /// Claim protocol rewards for a set of positions.
    Claim(ClaimOperation),
}

impl Operation {
    /// The market this operation acts on.
    pub fn market_id(&self) -> &MarketId {
        match self {
            Operation::Supply(op) => &op.market_id,
            Operation::Withdraw(op) => &op.market_id,
            Operation::Swap(op) => &op.market_id,
            Operation::NewPosition(op) => &op.market_id,
            Operation::IncreasePosition(op) => &op.market_id,
            Operation::DecreasePosition(op) => &op.market_id,
            Operation::Collect(op) => &op.market_id,
            Operation::ClosePosition(op) => &op.market_id,
            Operation::Claim(op) => &op.market_id,
        }
    }

    /// Stable variant name used in errors and tracing output.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Supply(_) => "supply",
            Operation::Withdraw(_) => "withdraw",
            Operation::Swap(_) => "swap",
            Operation::NewPosition(_) => "new-position",
            Operation::IncreasePosition(_) => "increase-position",
            Operation::DecreasePosition(_) => "decrease-position",
            Operation::Collect(_) => "collect",
            Operation::ClosePosition(_) => "close-position",
            Operation::Claim(_) => "claim",
        }
    }
}

/// Supply `amount` of the market's asset into the protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplyOperation {
    pub market_id: MarketId,
    pub amount: U256,
}

impl SupplyOperation {
    pub fn new(market_id: MarketId, amount: U256) -> Self {
        Self { market_id, amount }
    }
}

/// Withdraw `amount` of the market's asset from the protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawOperation {
    pub market_id: MarketId,
    pub amount: U256,
}

impl WithdrawOperation {
    pub fn new(market_id: MarketId, amount: U256) -> Self {
        Self { market_id, amount }
    }
}

/// Exact-input single-hop swap through one fee tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOperation {
    pub market_id: MarketId,
    pub token_in: Address,
    pub token_out: Address,
    pub fee: U24,
    pub amount_in: U256,
    pub min_amount_out: U256,
}

impl SwapOperation {
    pub fn new(
        market_id: MarketId,
        token_in: Address,
        token_out: Address,
        fee: U24,
        amount_in: U256,
        min_amount_out: U256,
    ) -> Self {
        Self { market_id, token_in, token_out, fee, amount_in, min_amount_out }
    }
}

/// Mint a new position over a tick range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPositionOperation {
    pub market_id: MarketId,
    pub token0: Address,
    pub token1: Address,
    pub fee: U24,
    pub tick_lower: I24,
    pub tick_upper: I24,
    pub amount0_desired: U256,
    pub amount1_desired: U256,
    pub amount0_min: U256,
    pub amount1_min: U256,
    pub deadline: U256,
}

impl NewPositionOperation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        market_id: MarketId,
        token0: Address,
        token1: Address,
        fee: U24,
        tick_lower: I24,
        tick_upper: I24,
        amount0_desired: U256,
        amount1_desired: U256,
        amount0_min: U256,
        amount1_min: U256,
        deadline: U256,
    ) -> Self {
        Self {
            market_id,
            token0,
            token1,
            fee,
            tick_lower,
            tick_upper,
            amount0_desired,
            amount1_desired,
            amount0_min,
            amount1_min,
            deadline,
        }
    }
}

/// Add liquidity to the position identified by `token_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncreasePositionOperation {
    pub market_id: MarketId,
    pub token0: Address,
    pub token1: Address,
    pub token_id: U256,
    pub amount0_desired: U256,
    pub amount1_desired: U256,
    pub amount0_min: U256,
    pub amount1_min: U256,
    pub deadline: U256,
}

impl IncreasePositionOperation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        market_id: MarketId,
        token0: Address,
        token1: Address,
        token_id: U256,
        amount0_desired: U256,
        amount1_desired: U256,
        amount0_min: U256,
        amount1_min: U256,
        deadline: U256,
    ) -> Self {
        Self {
            market_id,
            token0,
            token1,
            token_id,
            amount0_desired,
            amount1_desired,
            amount0_min,
            amount1_min,
            deadline,
        }
    }
}

/// Remove `liquidity` from the position identified by `token_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecreasePositionOperation {
    pub market_id: MarketId,
    pub token_id: U256,
    pub liquidity: u128,
    pub amount0_min: U256,
    pub amount1_min: U256,
    pub deadline: U256,
}

impl DecreasePositionOperation {
    pub fn new(
        market_id: MarketId,
        token_id: U256,
        liquidity: u128,
        amount0_min: U256,
        amount1_min: U256,
        deadline: U256,
    ) -> Self {
        Self { market_id, token_id, liquidity, amount0_min, amount1_min, deadline }
    }
}

/// Collect accrued fees for the given position ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectOperation {
    pub market_id: MarketId,
    pub token_ids: Vec<U256>,
}

impl CollectOperation {
    /// # Errors
    ///
    /// Fails if `token_ids` is empty; a collect over no positions is a
    /// caller-side bug, not a no-op.
    pub fn new(market_id: MarketId, token_ids: Vec<U256>) -> Result<Self, OperationError> {
        if token_ids.is_empty() {
            return Err(OperationError::EmptyField { field: "token_ids" });
        }
        Ok(Self { market_id, token_ids })
    }
}

/// Burn the fully-exited positions identified by `token_ids`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosePositionOperation {
    pub market_id: MarketId,
    pub token_ids: Vec<U256>,
}

impl ClosePositionOperation {
    /// # Errors
    ///
    /// Fails if `token_ids` is empty.
    pub fn new(market_id: MarketId, token_ids: Vec<U256>) -> Result<Self, OperationError> {
        if token_ids.is_empty() {
            return Err(OperationError::EmptyField { field: "token_ids" });
        }
        Ok(Self { market_id, token_ids })
    }
}

/// Claim protocol rewards.
///
/// `token_rewards` lists, per position, the reward tokens to claim; supply
/// protocols whose claim fuse takes no arguments ignore both lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimOperation {
    pub market_id: MarketId,
    pub token_ids: Vec<U256>,
    pub token_rewards: Vec<Vec<Address>>,
}

impl ClaimOperation {
    pub fn new(market_id: MarketId, token_ids: Vec<U256>, token_rewards: Vec<Vec<Address>>) -> Self {
        Self { market_id, token_ids, token_rewards }
    }
}
