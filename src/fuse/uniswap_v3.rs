//! Uniswap V3 adapters: swap, position minting, position resizing, and
//! fee collection.
//!
//! Unlike supply fuses, these claim fixed capability tags (`swap`,
//! `new-position`, `modify-position`, `collect`) rather than asset
//! addresses: one deployed adapter serves every pool of the protocol.
//! None of them move funds through the generic enter/exit path, so those
//! trait methods report an unsupported action.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolValue;

use crate::encoding::{self, SwapPath};
use crate::errors::FuseError;
use crate::market::MarketId;
use crate::operation::{
    ClosePositionOperation, CollectOperation, DecreasePositionOperation,
    IncreasePositionOperation, NewPositionOperation, SwapOperation,
};

use super::{CollectFuse, Fuse, FuseAction, ModifyPositionFuse, NewPositionFuse, SwapFuse};

pub(crate) const PROTOCOL_ID: &str = "uniswap-v3";

const SWAP_SIGNATURE: &str = "enter((uint256,uint256,bytes))";
const NEW_POSITION_SIGNATURE: &str =
    "enter((address,address,uint24,int24,int24,uint256,uint256,uint256,uint256,uint256))";
const CLOSE_POSITION_SIGNATURE: &str = "exit((uint256[]))";
const INCREASE_SIGNATURE: &str =
    "enter((address,address,uint256,uint256,uint256,uint256,uint256,uint256))";
const DECREASE_SIGNATURE: &str = "exit((uint256,uint128,uint256,uint256,uint256))";
const COLLECT_SIGNATURE: &str = "enter((uint256[]))";

fn unsupported(fuse: &'static str, action: &'static str) -> FuseError {
    FuseError::UnsupportedAction { fuse, action }
}

/// Exact-input swap adapter.
///
/// The token-in/fee/token-out route is packed (20 + 3 + 20 bytes, no
/// padding) and embedded as an opaque `bytes` argument inside the padded
/// outer tuple; see [`crate::encoding`] for why the two schemes must stay
/// separate.
#[derive(Debug, Clone)]
pub struct UniswapV3SwapFuse {
    fuse_address: Address,
}

impl UniswapV3SwapFuse {
    pub const MARKET_ID: &'static str = "swap";

    pub fn new(fuse_address: Address) -> Self {
        Self { fuse_address }
    }
}

impl Fuse for UniswapV3SwapFuse {
    fn name(&self) -> &'static str {
        "UniswapV3SwapFuse"
    }

    fn markets(&self) -> Vec<MarketId> {
        vec![MarketId::known(PROTOCOL_ID, Self::MARKET_ID)]
    }

    fn enter(&self, _market: &MarketId, _amount: U256) -> Result<Vec<FuseAction>, FuseError> {
        Err(unsupported(self.name(), "enter"))
    }

    fn exit(&self, _market: &MarketId, _amount: U256) -> Result<Vec<FuseAction>, FuseError> {
        Err(unsupported(self.name(), "exit"))
    }

    fn as_swap(&self) -> Option<&dyn SwapFuse> {
        Some(self)
    }
}

impl SwapFuse for UniswapV3SwapFuse {
    fn swap(&self, swap: &SwapOperation) -> Vec<FuseAction> {
        let path = SwapPath::single(swap.token_in, swap.fee, swap.token_out);
        let args =
            (swap.amount_in, swap.min_amount_out, Bytes::from(path.into_bytes())).abi_encode();

        vec![FuseAction::new(self.fuse_address, encoding::function_call(SWAP_SIGNATURE, &args))]
    }
}

/// Position-minting adapter; also burns positions it minted.
#[derive(Debug, Clone)]
pub struct UniswapV3NewPositionFuse {
    fuse_address: Address,
}

impl UniswapV3NewPositionFuse {
    pub const MARKET_ID: &'static str = "new-position";

    pub fn new(fuse_address: Address) -> Self {
        Self { fuse_address }
    }
}

impl Fuse for UniswapV3NewPositionFuse {
    fn name(&self) -> &'static str {
        "UniswapV3NewPositionFuse"
    }

    fn markets(&self) -> Vec<MarketId> {
        vec![MarketId::known(PROTOCOL_ID, Self::MARKET_ID)]
    }

    fn enter(&self, _market: &MarketId, _amount: U256) -> Result<Vec<FuseAction>, FuseError> {
        Err(unsupported(self.name(), "enter"))
    }

    fn exit(&self, _market: &MarketId, _amount: U256) -> Result<Vec<FuseAction>, FuseError> {
        Err(unsupported(self.name(), "exit"))
    }

    fn as_new_position(&self) -> Option<&dyn NewPositionFuse> {
        Some(self)
    }
}

impl NewPositionFuse for UniswapV3NewPositionFuse {
    fn new_position(&self, position: &NewPositionOperation) -> Vec<FuseAction> {
        let args = (
            position.token0,
            position.token1,
            position.fee,
            position.tick_lower,
            position.tick_upper,
            position.amount0_desired,
            position.amount1_desired,
            position.amount0_min,
            position.amount1_min,
            position.deadline,
        )
            .abi_encode();

        vec![FuseAction::new(
            self.fuse_address,
            encoding::function_call(NEW_POSITION_SIGNATURE, &args),
        )]
    }

    fn close_position(&self, close: &ClosePositionOperation) -> Vec<FuseAction> {
        let args = (close.token_ids.clone(),).abi_encode();

        vec![FuseAction::new(
            self.fuse_address,
            encoding::function_call(CLOSE_POSITION_SIGNATURE, &args),
        )]
    }
}

/// Position-resizing adapter: add liquidity on enter, remove on exit.
#[derive(Debug, Clone)]
pub struct UniswapV3ModifyPositionFuse {
    fuse_address: Address,
}

impl UniswapV3ModifyPositionFuse {
    pub const MARKET_ID: &'static str = "modify-position";

    pub fn new(fuse_address: Address) -> Self {
        Self { fuse_address }
    }
}

impl Fuse for UniswapV3ModifyPositionFuse {
    fn name(&self) -> &'static str {
        "UniswapV3ModifyPositionFuse"
    }

    fn markets(&self) -> Vec<MarketId> {
        vec![MarketId::known(PROTOCOL_ID, Self::MARKET_ID)]
    }

    fn enter(&self, _market: &MarketId, _amount: U256) -> Result<Vec<FuseAction>, FuseError> {
        Err(unsupported(self.name(), "enter"))
    }

    fn exit(&self, _market: &MarketId, _amount: U256) -> Result<Vec<FuseAction>, FuseError> {
        Err(unsupported(self.name(), "exit"))
    }

    fn as_modify_position(&self) -> Option<&dyn ModifyPositionFuse> {
        Some(self)
    }
}

impl ModifyPositionFuse for UniswapV3ModifyPositionFuse {
    fn increase_position(&self, increase: &IncreasePositionOperation) -> Vec<FuseAction> {
        let args = (
            increase.token0,
            increase.token1,
            increase.token_id,
            increase.amount0_desired,
            increase.amount1_desired,
            increase.amount0_min,
            increase.amount1_min,
            increase.deadline,
        )
            .abi_encode();

        vec![FuseAction::new(self.fuse_address, encoding::function_call(INCREASE_SIGNATURE, &args))]
    }

    fn decrease_position(&self, decrease: &DecreasePositionOperation) -> Vec<FuseAction> {
        let args = (
            decrease.token_id,
            decrease.liquidity,
            decrease.amount0_min,
            decrease.amount1_min,
            decrease.deadline,
        )
            .abi_encode();

        vec![FuseAction::new(self.fuse_address, encoding::function_call(DECREASE_SIGNATURE, &args))]
    }
}

/// Fee-collection adapter.
#[derive(Debug, Clone)]
pub struct UniswapV3CollectFuse {
    fuse_address: Address,
}

impl UniswapV3CollectFuse {
    pub const MARKET_ID: &'static str = "collect";

    pub fn new(fuse_address: Address) -> Self {
        Self { fuse_address }
    }
}

impl Fuse for UniswapV3CollectFuse {
    fn name(&self) -> &'static str {
        "UniswapV3CollectFuse"
    }

    fn markets(&self) -> Vec<MarketId> {
        vec![MarketId::known(PROTOCOL_ID, Self::MARKET_ID)]
    }

    fn enter(&self, _market: &MarketId, _amount: U256) -> Result<Vec<FuseAction>, FuseError> {
        Err(unsupported(self.name(), "enter"))
    }

    fn exit(&self, _market: &MarketId, _amount: U256) -> Result<Vec<FuseAction>, FuseError> {
        Err(unsupported(self.name(), "exit"))
    }

    fn as_collect(&self) -> Option<&dyn CollectFuse> {
        Some(self)
    }
}

impl CollectFuse for UniswapV3CollectFuse {
    fn collect(&self, collect: &CollectOperation) -> Vec<FuseAction> {
        let args = (collect.token_ids.clone(),).abi_encode();

        vec![FuseAction::new(self.fuse_address, encoding::function_call(COLLECT_SIGNATURE, &args))]
    }
}
