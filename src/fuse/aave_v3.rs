//! Aave V3 supply adapter.

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolValue;

use crate::encoding;
use crate::errors::FuseError;
use crate::market::MarketId;

use super::{Fuse, FuseAction};

const ENTER_SIGNATURE: &str = "enter((address,uint256,uint256))";
const EXIT_SIGNATURE: &str = "exit((address,uint256))";

/// Supply adapter for one Aave V3 asset market.
///
/// Claims the market `(aave-v3, <asset address>)`. Entering pins the
/// vault's efficiency-mode category to [`AaveV3SupplyFuse::E_MODE_CATEGORY_ID`];
/// Aave has no claim step, so the fuse exposes no claim capability.
#[derive(Debug, Clone)]
pub struct AaveV3SupplyFuse {
    fuse_address: Address,
    asset_address: Address,
}

impl AaveV3SupplyFuse {
    pub const PROTOCOL_ID: &'static str = "aave-v3";

    /// Efficiency-mode category passed with every supply.
    pub const E_MODE_CATEGORY_ID: u64 = 300;

    pub fn new(fuse_address: Address, asset_address: Address) -> Self {
        Self { fuse_address, asset_address }
    }
}

impl Fuse for AaveV3SupplyFuse {
    fn name(&self) -> &'static str {
        "AaveV3SupplyFuse"
    }

    fn markets(&self) -> Vec<MarketId> {
        vec![MarketId::known(Self::PROTOCOL_ID, self.asset_address.to_checksum(None))]
    }

    fn enter(&self, _market: &MarketId, amount: U256) -> Result<Vec<FuseAction>, FuseError> {
        let args = (self.asset_address, amount, U256::from(Self::E_MODE_CATEGORY_ID)).abi_encode();
        Ok(vec![FuseAction::new(
            self.fuse_address,
            encoding::function_call(ENTER_SIGNATURE, &args),
        )])
    }

    fn exit(&self, _market: &MarketId, amount: U256) -> Result<Vec<FuseAction>, FuseError> {
        let args = (self.asset_address, amount).abi_encode();
        Ok(vec![FuseAction::new(
            self.fuse_address,
            encoding::function_call(EXIT_SIGNATURE, &args),
        )])
    }
}
