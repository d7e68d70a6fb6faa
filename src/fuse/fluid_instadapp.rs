//! Fluid (Instadapp) composite supply adapter.
//!
//! Supplying into Fluid is a two-contract hand-off: funds enter the
//! ERC-4626 pool, then the pool receipt token is staked into a separate
//! staking contract. Exiting unwinds the same two steps in reverse.

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolValue;

use crate::encoding;
use crate::errors::FuseError;
use crate::market::MarketId;
use crate::operation::ClaimOperation;

use super::{ClaimableFuse, Erc4626SupplyFuse, Fuse, FuseAction, MAX_AMOUNT};

const STAKE_SIGNATURE: &str = "enter((uint256,address))";
const UNSTAKE_SIGNATURE: &str = "exit((uint256,address))";

/// Composite supply adapter for a Fluid lending pool with staking.
#[derive(Debug, Clone)]
pub struct FluidInstadappSupplyFuse {
    /// ERC-4626 pool token; doubles as the claimed market tag.
    pool_token_address: Address,
    /// Fuse executing the pool supply/withdraw leg.
    erc4626_fuse_address: Address,
    /// Staking contract holding the pool receipt tokens.
    staking_contract_address: Address,
    /// Fuse executing the stake/unstake leg.
    staking_fuse_address: Address,
    /// Fuse claiming staking rewards; takes no arguments.
    claim_fuse_address: Address,
}

impl FluidInstadappSupplyFuse {
    pub const PROTOCOL_ID: &'static str = "fluid-instadapp";

    pub fn new(
        pool_token_address: Address,
        erc4626_fuse_address: Address,
        staking_contract_address: Address,
        staking_fuse_address: Address,
        claim_fuse_address: Address,
    ) -> Self {
        Self {
            pool_token_address,
            erc4626_fuse_address,
            staking_contract_address,
            staking_fuse_address,
            claim_fuse_address,
        }
    }

    fn stake_call(amount: U256, staking_contract: Address) -> Vec<u8> {
        encoding::function_call(STAKE_SIGNATURE, &(amount, staking_contract).abi_encode())
    }

    fn unstake_call(amount: U256, staking_contract: Address) -> Vec<u8> {
        encoding::function_call(UNSTAKE_SIGNATURE, &(amount, staking_contract).abi_encode())
    }
}

impl Fuse for FluidInstadappSupplyFuse {
    fn name(&self) -> &'static str {
        "FluidInstadappSupplyFuse"
    }

    fn markets(&self) -> Vec<MarketId> {
        vec![MarketId::known(Self::PROTOCOL_ID, self.pool_token_address.to_checksum(None))]
    }

    /// Supply `amount` into the pool, then stake every receipt token the
    /// vault holds. The stake leg uses the max sentinel because the share
    /// amount minted by the supply is not known at encode time.
    fn enter(&self, _market: &MarketId, amount: U256) -> Result<Vec<FuseAction>, FuseError> {
        Ok(vec![
            FuseAction::new(
                self.erc4626_fuse_address,
                Erc4626SupplyFuse::enter_call(self.pool_token_address, amount),
            ),
            FuseAction::new(
                self.staking_fuse_address,
                Self::stake_call(MAX_AMOUNT, self.staking_contract_address),
            ),
        ])
    }

    /// Unstake `amount`, then withdraw everything from the pool. Order is
    /// load-bearing: the pool receipt tokens sit in the staking contract
    /// until unstaked, so withdrawing first would revert on-chain.
    fn exit(&self, _market: &MarketId, amount: U256) -> Result<Vec<FuseAction>, FuseError> {
        Ok(vec![
            FuseAction::new(
                self.staking_fuse_address,
                Self::unstake_call(amount, self.staking_contract_address),
            ),
            FuseAction::new(
                self.erc4626_fuse_address,
                Erc4626SupplyFuse::exit_call(self.pool_token_address, MAX_AMOUNT),
            ),
        ])
    }

    fn as_claimable(&self) -> Option<&dyn ClaimableFuse> {
        Some(self)
    }
}

impl ClaimableFuse for FluidInstadappSupplyFuse {
    /// The staking claim fuse claims everything; no calldata beyond the
    /// selector-less empty payload is needed.
    fn claim(&self, _claim: &ClaimOperation) -> Vec<FuseAction> {
        vec![FuseAction::new(self.claim_fuse_address, Vec::new())]
    }
}
