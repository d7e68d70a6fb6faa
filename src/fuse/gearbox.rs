//! Gearbox V3 composite supply adapter.
//!
//! Same two-contract shape as the Fluid adapter: supply into the passive
//! dToken pool (a standard ERC-4626 vault), then stake the dTokens into
//! the farming contract for extra rewards.

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolValue;

use crate::encoding;
use crate::errors::FuseError;
use crate::market::MarketId;
use crate::operation::ClaimOperation;

use super::{ClaimableFuse, Erc4626SupplyFuse, Fuse, FuseAction, MAX_AMOUNT};

const FARM_ENTER_SIGNATURE: &str = "enter((uint256,address))";
const FARM_EXIT_SIGNATURE: &str = "exit((uint256,address))";

/// Composite supply adapter for a Gearbox V3 passive pool with farming.
#[derive(Debug, Clone)]
pub struct GearboxSupplyFuse {
    /// Pool dToken; doubles as the claimed market tag.
    d_token_address: Address,
    /// Fuse executing the pool supply/withdraw leg.
    erc4626_fuse_address: Address,
    /// Farm token received for staked dTokens.
    farm_d_token_address: Address,
    /// Fuse executing the farm stake/unstake leg.
    farm_fuse_address: Address,
    /// Fuse claiming farming rewards; takes no arguments.
    claim_fuse_address: Address,
}

impl GearboxSupplyFuse {
    pub const PROTOCOL_ID: &'static str = "gearbox-v3";

    pub fn new(
        d_token_address: Address,
        erc4626_fuse_address: Address,
        farm_d_token_address: Address,
        farm_fuse_address: Address,
        claim_fuse_address: Address,
    ) -> Self {
        Self {
            d_token_address,
            erc4626_fuse_address,
            farm_d_token_address,
            farm_fuse_address,
            claim_fuse_address,
        }
    }

    fn farm_enter_call(d_token_amount: U256, farm_d_token: Address) -> Vec<u8> {
        encoding::function_call(FARM_ENTER_SIGNATURE, &(d_token_amount, farm_d_token).abi_encode())
    }

    fn farm_exit_call(d_token_amount: U256, farm_d_token: Address) -> Vec<u8> {
        encoding::function_call(FARM_EXIT_SIGNATURE, &(d_token_amount, farm_d_token).abi_encode())
    }
}

impl Fuse for GearboxSupplyFuse {
    fn name(&self) -> &'static str {
        "GearboxSupplyFuse"
    }

    fn markets(&self) -> Vec<MarketId> {
        vec![MarketId::known(Self::PROTOCOL_ID, self.d_token_address.to_checksum(None))]
    }

    fn enter(&self, _market: &MarketId, amount: U256) -> Result<Vec<FuseAction>, FuseError> {
        Ok(vec![
            FuseAction::new(
                self.erc4626_fuse_address,
                Erc4626SupplyFuse::enter_call(self.d_token_address, amount),
            ),
            FuseAction::new(
                self.farm_fuse_address,
                Self::farm_enter_call(MAX_AMOUNT, self.farm_d_token_address),
            ),
        ])
    }

    /// Unstake from the farm first; the dTokens only return to the vault
    /// once unstaked, so the pool withdrawal must run second.
    fn exit(&self, _market: &MarketId, amount: U256) -> Result<Vec<FuseAction>, FuseError> {
        Ok(vec![
            FuseAction::new(
                self.farm_fuse_address,
                Self::farm_exit_call(amount, self.farm_d_token_address),
            ),
            FuseAction::new(
                self.erc4626_fuse_address,
                Erc4626SupplyFuse::exit_call(self.d_token_address, MAX_AMOUNT),
            ),
        ])
    }

    fn as_claimable(&self) -> Option<&dyn ClaimableFuse> {
        Some(self)
    }
}

impl ClaimableFuse for GearboxSupplyFuse {
    fn claim(&self, _claim: &ClaimOperation) -> Vec<FuseAction> {
        vec![FuseAction::new(self.claim_fuse_address, Vec::new())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fuse() -> GearboxSupplyFuse {
        GearboxSupplyFuse::new(
            Address::repeat_byte(0xd0),
            Address::repeat_byte(0xd1),
            Address::repeat_byte(0xd2),
            Address::repeat_byte(0xd3),
            Address::repeat_byte(0xd4),
        )
    }

    fn market() -> MarketId {
        MarketId::for_address("gearbox-v3", Address::repeat_byte(0xd0)).unwrap()
    }

    #[test]
    fn test_enter_supplies_pool_then_farms_max() {
        let actions = fuse().enter(&market(), U256::from(500u64)).unwrap();

        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].fuse, Address::repeat_byte(0xd1));
        assert_eq!(actions[1].fuse, Address::repeat_byte(0xd3));
        assert_eq!(U256::from_be_slice(&actions[1].data[4..36]), U256::MAX);
    }

    #[test]
    fn test_exit_round_trip_reverses_targets() {
        let f = fuse();
        let enter = f.enter(&market(), U256::from(500u64)).unwrap();
        let exit = f.exit(&market(), U256::from(500u64)).unwrap();

        assert_eq!(exit.len(), 2);
        assert_eq!(exit[0].fuse, enter[1].fuse);
        assert_eq!(exit[1].fuse, enter[0].fuse);
        assert_eq!(U256::from_be_slice(&exit[0].data[4..36]), U256::from(500u64));
        assert_eq!(U256::from_be_slice(&exit[1].data[36..68]), U256::MAX);
    }

    #[test]
    fn test_is_claimable() {
        assert!(fuse().as_claimable().is_some());
    }
}
