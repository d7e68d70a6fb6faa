//! Ramses V2 reward-claim adapter.

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolValue;

use crate::encoding;
use crate::errors::FuseError;
use crate::market::MarketId;
use crate::operation::ClaimOperation;

use super::{ClaimableFuse, Fuse, FuseAction};

// Two plain parameters, not a wrapped struct: the deployed claim fuse
// takes the position ids and a per-position reward-token matrix.
const CLAIM_SIGNATURE: &str = "claim(uint256[],address[][])";

/// Claim adapter for Ramses V2 concentrated-liquidity rewards.
///
/// Claims the fixed market `(ramses-v2, claim)`. This fuse only claims;
/// it has no funds to move, so enter/exit report an unsupported action.
#[derive(Debug, Clone)]
pub struct RamsesClaimFuse {
    fuse_address: Address,
}

impl RamsesClaimFuse {
    pub const PROTOCOL_ID: &'static str = "ramses-v2";
    pub const MARKET_ID: &'static str = "claim";

    pub fn new(fuse_address: Address) -> Self {
        Self { fuse_address }
    }
}

impl Fuse for RamsesClaimFuse {
    fn name(&self) -> &'static str {
        "RamsesClaimFuse"
    }

    fn markets(&self) -> Vec<MarketId> {
        vec![MarketId::known(Self::PROTOCOL_ID, Self::MARKET_ID)]
    }

    fn enter(&self, _market: &MarketId, _amount: U256) -> Result<Vec<FuseAction>, FuseError> {
        Err(FuseError::UnsupportedAction { fuse: self.name(), action: "enter" })
    }

    fn exit(&self, _market: &MarketId, _amount: U256) -> Result<Vec<FuseAction>, FuseError> {
        Err(FuseError::UnsupportedAction { fuse: self.name(), action: "exit" })
    }

    fn as_claimable(&self) -> Option<&dyn ClaimableFuse> {
        Some(self)
    }
}

impl ClaimableFuse for RamsesClaimFuse {
    fn claim(&self, claim: &ClaimOperation) -> Vec<FuseAction> {
        let args = (claim.token_ids.clone(), claim.token_rewards.clone()).abi_encode_params();

        vec![FuseAction::new(self.fuse_address, encoding::function_call(CLAIM_SIGNATURE, &args))]
    }
}
