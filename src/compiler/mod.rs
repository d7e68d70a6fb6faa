//! Batch compilation of operations into one vault execute call.
//!
//! The [`ExecuteCallFactory`] is the single place where intents meet
//! encoders. For each operation, in input order, it resolves the fuse
//! claiming the operation's market, dispatches on the variant to the
//! matching fuse capability, and appends the actions the fuse returns.
//! The flattened action list is then ABI-encoded as `(address,bytes)[]`
//! and prefixed with the selector of the vault's batch-execute function.
//!
//! Compilation is a pure, synchronous computation over immutable values:
//! no I/O, no clock, no randomness. Identical inputs always produce
//! byte-identical output, and a factory can be shared across threads
//! without synchronization.

use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolValue;

use crate::encoding;
use crate::errors::{CompileError, OperationError, Result};
use crate::fuse::{FuseAction, FuseSet};
use crate::operation::{ClaimOperation, Operation};

/// Canonical signature of the vault's batch-execute function.
pub const EXECUTE_SIGNATURE: &str = "execute((address,bytes)[])";

/// Canonical signature of the rewards manager's claim function.
pub const CLAIM_REWARDS_SIGNATURE: &str = "claimRewards((address,bytes)[])";

/// Compiles ordered operation lists into encoded vault calls.
#[derive(Debug, Clone)]
pub struct ExecuteCallFactory {
    fuses: FuseSet,
}

impl ExecuteCallFactory {
    pub fn new(fuses: FuseSet) -> Self {
        Self { fuses }
    }

    /// Compile an ordered operation batch into complete execute calldata.
    ///
    /// Both orders are preserved: operations are encoded in input order,
    /// and the actions each fuse returns keep their relative order (the
    /// composite fuses depend on this to sequence two-contract hand-offs).
    ///
    /// # Errors
    ///
    /// - empty `operations`
    /// - a market no registered fuse claims
    /// - an operation variant the resolved fuse has no capability for
    ///   (`Claim` always falls in this category here: reward claims have
    ///   their own entry point, [`ExecuteCallFactory::compile_claims`])
    pub fn compile(&self, operations: &[Operation]) -> Result<Vec<u8>> {
        if operations.is_empty() {
            return Err(OperationError::EmptyOperations.into());
        }

        tracing::debug!(operation_count = operations.len(), "Compiling execute batch");

        let mut actions = Vec::with_capacity(operations.len());
        for operation in operations {
            let operation_actions = self.encode_operation(operation)?;

            tracing::trace!(
                operation = operation.name(),
                market = %operation.market_id(),
                action_count = operation_actions.len(),
                "Operation encoded"
            );

            actions.extend(operation_actions);
        }

        tracing::debug!(action_count = actions.len(), "Execute batch compiled");

        Ok(Self::encode_call(EXECUTE_SIGNATURE, &actions))
    }

    /// Compile a single operation into execute calldata.
    pub fn compile_one(&self, operation: &Operation) -> Result<Vec<u8>> {
        self.compile(std::slice::from_ref(operation))
    }

    /// Compile a reward-claim batch.
    ///
    /// Same resolve/dispatch/encode shape as [`ExecuteCallFactory::compile`],
    /// but the outer function is the rewards manager's `claimRewards`, and
    /// every request must resolve to a fuse with the claim capability.
    pub fn compile_claims(&self, claims: &[ClaimOperation]) -> Result<Vec<u8>> {
        if claims.is_empty() {
            return Err(OperationError::EmptyClaims.into());
        }

        tracing::debug!(claim_count = claims.len(), "Compiling claim batch");

        let mut actions = Vec::with_capacity(claims.len());
        for claim in claims {
            let fuse = self.fuses.resolve(&claim.market_id)?;
            let claimable = fuse.as_claimable().ok_or_else(|| {
                crate::errors::FuseError::UnsupportedAction { fuse: fuse.name(), action: "claim" }
            })?;

            actions.extend(claimable.claim(claim));
        }

        Ok(Self::encode_call(CLAIM_REWARDS_SIGNATURE, &actions))
    }

    /// Resolve one operation to its fuse and dispatch on the variant.
    ///
    /// The match is exhaustive over the closed operation set: adding a
    /// variant without a dispatch arm is a compile error, not a silent
    /// skip. A resolved fuse lacking the required capability is the
    /// remaining runtime mismatch and reports the variant and market.
    fn encode_operation(&self, operation: &Operation) -> Result<Vec<FuseAction>> {
        let market = operation.market_id();
        let fuse = self.fuses.resolve(market)?;

        let unsupported = || CompileError::UnsupportedOperation {
            operation: operation.name(),
            market: market.clone(),
        };

        let actions = match operation {
            Operation::Supply(supply) => fuse.enter(market, supply.amount)?,
            Operation::Withdraw(withdraw) => fuse.exit(market, withdraw.amount)?,
            Operation::Swap(swap) => fuse.as_swap().ok_or_else(unsupported)?.swap(swap),
            Operation::NewPosition(position) => {
                fuse.as_new_position().ok_or_else(unsupported)?.new_position(position)
            }
            Operation::IncreasePosition(increase) => {
                fuse.as_modify_position().ok_or_else(unsupported)?.increase_position(increase)
            }
            Operation::DecreasePosition(decrease) => {
                fuse.as_modify_position().ok_or_else(unsupported)?.decrease_position(decrease)
            }
            Operation::Collect(collect) => {
                fuse.as_collect().ok_or_else(unsupported)?.collect(collect)
            }
            Operation::ClosePosition(close) => {
                fuse.as_new_position().ok_or_else(unsupported)?.close_position(close)
            }
            // Reward claims compile through compile_claims against the
            // rewards manager, never through the execute batch.
            Operation::Claim(_) => return Err(unsupported().into()),
        };

        Ok(actions)
    }

    /// ABI-encode the flattened action list and prefix the outer selector.
    fn encode_call(signature: &str, actions: &[FuseAction]) -> Vec<u8> {
        let items: Vec<(Address, Bytes)> =
            actions.iter().map(|action| (action.fuse, action.data.clone())).collect();

        encoding::function_call(signature, &items.abi_encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use alloy::primitives::{aliases::U24, Address, U256};

    use crate::errors::SdkError;
    use crate::fuse::{
        AaveV3SupplyFuse, Erc4626SupplyFuse, FluidInstadappSupplyFuse, Fuse, GearboxSupplyFuse,
        RamsesClaimFuse, UniswapV3SwapFuse,
    };
    use crate::market::MarketId;
    use crate::operation::{SupplyOperation, SwapOperation, WithdrawOperation};

    const USDC: Address = Address::repeat_byte(0xa1);
    const AAVE_FUSE: Address = Address::repeat_byte(0xf1);

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn aave_factory() -> ExecuteCallFactory {
        let fuses: Vec<Arc<dyn Fuse>> = vec![Arc::new(AaveV3SupplyFuse::new(AAVE_FUSE, USDC))];
        ExecuteCallFactory::new(FuseSet::new(fuses).unwrap())
    }

    fn aave_market() -> MarketId {
        MarketId::for_address("aave-v3", USDC).unwrap()
    }

    #[test]
    fn test_compile_rejects_empty_batch() {
        let result = aave_factory().compile(&[]);
        assert!(matches!(result, Err(SdkError::Operation(OperationError::EmptyOperations))));
    }

    #[test]
    fn test_compile_unknown_market_fails() {
        let op = Operation::Supply(SupplyOperation::new(
            MarketId::new("compound-v3", "0x9999").unwrap(),
            U256::from(1u64),
        ));

        let result = aave_factory().compile(&[op]);
        assert!(matches!(
            result,
            Err(SdkError::Compile(CompileError::UnsupportedMarket { .. }))
        ));
    }

    #[test]
    fn test_compile_is_deterministic() {
        init_tracing();
        let factory = aave_factory();
        let ops = vec![
            Operation::Supply(SupplyOperation::new(aave_market(), U256::from(100u64))),
            Operation::Withdraw(WithdrawOperation::new(aave_market(), U256::from(50u64))),
        ];

        let first = factory.compile(&ops).unwrap();
        let second = factory.compile(&ops).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_outer_selector_is_execute() {
        let factory = aave_factory();
        let op = Operation::Supply(SupplyOperation::new(aave_market(), U256::from(1u64)));

        let calldata = factory.compile_one(&op).unwrap();
        assert_eq!(&calldata[..4], &encoding::selector(EXECUTE_SIGNATURE));
        // Known value for execute((address,bytes)[]).
        assert_eq!(&calldata[..4], &hex::decode("baae8abf").unwrap()[..]);
    }

    #[test]
    fn test_concrete_aave_supply_scenario() {
        // Supply 100 USDC (6 decimals) into Aave V3: the compiled bytes
        // must equal selector || abi_encode([(fuse, enter calldata)]),
        // with the e-mode constant 300 in the inner payload.
        let factory = aave_factory();
        let op =
            Operation::Supply(SupplyOperation::new(aave_market(), U256::from(100_000000u64)));

        let calldata = factory.compile(&[op]).unwrap();

        let enter_args =
            (USDC, U256::from(100_000000u64), U256::from(300u64)).abi_encode();
        let enter_call =
            encoding::function_call("enter((address,uint256,uint256))", &enter_args);
        let expected = encoding::function_call(
            "execute((address,bytes)[])",
            &vec![(AAVE_FUSE, Bytes::from(enter_call))].abi_encode(),
        );

        assert_eq!(calldata, expected);
    }

    #[test]
    fn test_order_preservation_across_operations() {
        let gearbox_pool = Address::repeat_byte(0xd0);
        let fluid_pool = Address::repeat_byte(0x10);

        let fluid = FluidInstadappSupplyFuse::new(
            fluid_pool,
            Address::repeat_byte(0x20),
            Address::repeat_byte(0x30),
            Address::repeat_byte(0x40),
            Address::repeat_byte(0x50),
        );
        let gearbox = GearboxSupplyFuse::new(
            gearbox_pool,
            Address::repeat_byte(0xd1),
            Address::repeat_byte(0xd2),
            Address::repeat_byte(0xd3),
            Address::repeat_byte(0xd4),
        );

        let fuses: Vec<Arc<dyn Fuse>> = vec![Arc::new(fluid), Arc::new(gearbox)];
        let factory = ExecuteCallFactory::new(FuseSet::new(fuses).unwrap());

        let amount = U256::from(11_000_000000u64);
        let withdraw = Operation::Withdraw(WithdrawOperation::new(
            MarketId::for_address("fluid-instadapp", fluid_pool).unwrap(),
            amount,
        ));
        let supply = Operation::Supply(SupplyOperation::new(
            MarketId::for_address("gearbox-v3", gearbox_pool).unwrap(),
            amount,
        ));

        let calldata = factory.compile(&[withdraw, supply]).unwrap();

        // Rebuild the expected action sequence by hand: the Fluid exit's
        // two actions, then the Gearbox enter's two, in that order.
        let first_unstake = Address::repeat_byte(0x40);
        let first_withdraw = Address::repeat_byte(0x20);
        let then_supply = Address::repeat_byte(0xd1);
        let then_farm = Address::repeat_byte(0xd3);

        let expected_targets = [first_unstake, first_withdraw, then_supply, then_farm];

        // Each target address appears as a padded word in the encoded
        // array, in order; verify by scanning the calldata.
        let mut cursor = 0;
        for target in expected_targets {
            let word: Vec<u8> = [vec![0u8; 12], target.to_vec()].concat();
            let position = calldata[cursor..]
                .windows(32)
                .position(|w| w == word.as_slice())
                .expect("target address present in order");
            cursor += position + 32;
        }
    }

    #[test]
    fn test_swap_dispatch_requires_capability() {
        // An Aave-only fuse set cannot encode a swap; a swap against its
        // own market is an operation/fuse mismatch.
        let fuses: Vec<Arc<dyn Fuse>> = vec![Arc::new(AaveV3SupplyFuse::new(AAVE_FUSE, USDC))];
        let factory = ExecuteCallFactory::new(FuseSet::new(fuses).unwrap());

        let swap = Operation::Swap(SwapOperation::new(
            aave_market(),
            USDC,
            Address::repeat_byte(0xa2),
            U24::from(100),
            U256::from(1u64),
            U256::ZERO,
        ));

        let result = factory.compile(&[swap]);
        assert!(matches!(
            result,
            Err(SdkError::Compile(CompileError::UnsupportedOperation { .. }))
        ));
    }

    #[test]
    fn test_swap_compiles_through_swap_fuse() {
        let swap_fuse = Address::repeat_byte(0xee);
        let fuses: Vec<Arc<dyn Fuse>> = vec![Arc::new(UniswapV3SwapFuse::new(swap_fuse))];
        let factory = ExecuteCallFactory::new(FuseSet::new(fuses).unwrap());

        let swap = Operation::Swap(SwapOperation::new(
            MarketId::new("uniswap-v3", "swap").unwrap(),
            Address::repeat_byte(0x01),
            Address::repeat_byte(0x02),
            U24::from(500),
            U256::from(1_000u64),
            U256::from(990u64),
        ));

        let calldata = factory.compile(&[swap]).unwrap();
        assert_eq!(&calldata[..4], &encoding::selector(EXECUTE_SIGNATURE));
    }

    #[test]
    fn test_claim_operation_rejected_by_execute_batch() {
        let factory = aave_factory();
        let claim = Operation::Claim(ClaimOperation::new(aave_market(), vec![], vec![]));

        let result = factory.compile(&[claim]);
        assert!(matches!(
            result,
            Err(SdkError::Compile(CompileError::UnsupportedOperation { .. }))
        ));
    }

    #[test]
    fn test_compile_claims_ramses() {
        let claim_fuse = Address::repeat_byte(0xcf);
        let fuses: Vec<Arc<dyn Fuse>> = vec![Arc::new(RamsesClaimFuse::new(claim_fuse))];
        let factory = ExecuteCallFactory::new(FuseSet::new(fuses).unwrap());

        let claim = ClaimOperation::new(
            MarketId::new("ramses-v2", "claim").unwrap(),
            vec![U256::from(7u64)],
            vec![vec![Address::repeat_byte(0x0a)]],
        );

        let calldata = factory.compile_claims(&[claim]).unwrap();
        assert_eq!(&calldata[..4], &encoding::selector(CLAIM_REWARDS_SIGNATURE));
        // Known value for claimRewards((address,bytes)[]).
        assert_eq!(&calldata[..4], &hex::decode("e3efd95f").unwrap()[..]);
    }

    #[test]
    fn test_compile_claims_requires_claim_capability() {
        // Aave has no claim step; asking for one is an unsupported fuse
        // action, not an unsupported market.
        let factory = aave_factory();
        let claim = ClaimOperation::new(aave_market(), vec![], vec![]);

        let result = factory.compile_claims(&[claim]);
        assert!(matches!(
            result,
            Err(SdkError::Fuse(crate::errors::FuseError::UnsupportedAction { .. }))
        ));
    }

    #[test]
    fn test_compile_claims_rejects_empty() {
        let result = aave_factory().compile_claims(&[]);
        assert!(matches!(result, Err(SdkError::Operation(OperationError::EmptyClaims))));
    }

    #[test]
    fn test_composite_erc4626_and_aave_share_no_market() {
        // Two different protocols over distinct vault addresses coexist.
        let erc4626 = Erc4626SupplyFuse::new(
            Address::repeat_byte(0x60),
            "morpho",
            Address::repeat_byte(0x61),
        )
        .unwrap();
        let fuses: Vec<Arc<dyn Fuse>> = vec![
            Arc::new(erc4626),
            Arc::new(AaveV3SupplyFuse::new(AAVE_FUSE, USDC)),
        ];

        assert!(FuseSet::new(fuses).is_ok());
    }
}
