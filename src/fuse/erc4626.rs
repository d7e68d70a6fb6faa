//! Generic ERC-4626 vault supply adapter.

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolValue;

use crate::encoding;
use crate::errors::FuseError;
use crate::market::MarketId;

use super::{Fuse, FuseAction};

const ENTER_SIGNATURE: &str = "enter((address,uint256))";
const EXIT_SIGNATURE: &str = "exit((address,uint256))";

/// Supply adapter for any plain ERC-4626 vault.
///
/// The protocol tag is configurable because several integrations are
/// thin wrappers over the same standard. A plain ERC-4626 vault pays no
/// rewards, so the fuse exposes no claim capability.
#[derive(Debug, Clone)]
pub struct Erc4626SupplyFuse {
    fuse_address: Address,
    protocol_id: String,
    vault_address: Address,
}

impl Erc4626SupplyFuse {
    /// # Errors
    ///
    /// Fails if `protocol_id` is empty.
    pub fn new(
        fuse_address: Address,
        protocol_id: impl Into<String>,
        vault_address: Address,
    ) -> Result<Self, crate::errors::OperationError> {
        let protocol_id = protocol_id.into();
        if protocol_id.is_empty() {
            return Err(crate::errors::OperationError::FieldRequired { field: "protocol_id" });
        }
        Ok(Self { fuse_address, protocol_id, vault_address })
    }

    /// Calldata supplying `amount` into `vault`. Shared with the composite
    /// fuses that layer staking on top of an ERC-4626 pool.
    pub(crate) fn enter_call(vault: Address, amount: U256) -> Vec<u8> {
        encoding::function_call(ENTER_SIGNATURE, &(vault, amount).abi_encode())
    }

    /// Calldata withdrawing `amount` from `vault`.
    pub(crate) fn exit_call(vault: Address, amount: U256) -> Vec<u8> {
        encoding::function_call(EXIT_SIGNATURE, &(vault, amount).abi_encode())
    }
}

impl Fuse for Erc4626SupplyFuse {
    fn name(&self) -> &'static str {
        "Erc4626SupplyFuse"
    }

    fn markets(&self) -> Vec<MarketId> {
        vec![MarketId::known(self.protocol_id.clone(), self.vault_address.to_checksum(None))]
    }

    fn enter(&self, _market: &MarketId, amount: U256) -> Result<Vec<FuseAction>, FuseError> {
        Ok(vec![FuseAction::new(
            self.fuse_address,
            Self::enter_call(self.vault_address, amount),
        )])
    }

    fn exit(&self, _market: &MarketId, amount: U256) -> Result<Vec<FuseAction>, FuseError> {
        Ok(vec![FuseAction::new(
            self.fuse_address,
            Self::exit_call(self.vault_address, amount),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_protocol_id() {
        let result =
            Erc4626SupplyFuse::new(Address::repeat_byte(0x01), "", Address::repeat_byte(0x02));
        assert!(result.is_err());
    }

    #[test]
    fn test_enter_and_exit_target_configured_fuse() {
        let fuse_address = Address::repeat_byte(0xf2);
        let vault = Address::repeat_byte(0x4d);
        let fuse = Erc4626SupplyFuse::new(fuse_address, "morpho", vault).unwrap();
        let market = MarketId::for_address("morpho", vault).unwrap();

        assert!(fuse.supports(&market));

        let enter = fuse.enter(&market, U256::from(7u64)).unwrap();
        assert_eq!(enter.len(), 1);
        assert_eq!(enter[0].fuse, fuse_address);
        assert_eq!(&enter[0].data[..4], &encoding::selector("enter((address,uint256))"));
        assert_eq!(enter[0].data.len(), 4 + 2 * 32);

        let exit = fuse.exit(&market, U256::from(7u64)).unwrap();
        assert_eq!(&exit[0].data[..4], &encoding::selector("exit((address,uint256))"));
        assert_eq!(exit[0].data.len(), 4 + 2 * 32);
    }
}
