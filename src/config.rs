//! Deployment configuration for fuse adapters.
//!
//! This module provides configuration loading and validation for fuse
//! deployments, replacing hard-coded contract addresses with per-network,
//! environment-based configuration. A deployment document describes the
//! on-chain fuse contracts for one or more networks; selecting a network
//! yields a typed [`Deployments`] value from which a ready-to-use
//! [`FuseSet`] can be built.

use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use std::sync::Arc;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, Result};
use crate::fuse::{
    AaveV3SupplyFuse, Erc4626SupplyFuse, FluidInstadappSupplyFuse, Fuse, FuseSet,
    GearboxSupplyFuse, RamsesClaimFuse, UniswapV3CollectFuse, UniswapV3ModifyPositionFuse,
    UniswapV3NewPositionFuse, UniswapV3SwapFuse,
};

/// Environment variable holding the deployment document as JSON.
pub const DEPLOYMENTS_VAR: &str = "PLASMA_DEPLOYMENTS_JSON";
/// Environment variable selecting the network within the document.
pub const NETWORK_VAR: &str = "PLASMA_NETWORK";

/// Raw multi-network deployment document, as serialized in JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentDocument {
    /// Deployment sections keyed by network name (e.g. `arbitrum`).
    pub networks: HashMap<String, RawDeployments>,
}

/// One network's fuse deployments with addresses still in string form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDeployments {
    #[serde(default)]
    pub aave_v3: Vec<RawAaveV3Deployment>,
    #[serde(default)]
    pub erc4626: Vec<RawErc4626Deployment>,
    #[serde(default)]
    pub fluid_instadapp: Vec<RawCompositeDeployment>,
    #[serde(default)]
    pub gearbox: Vec<RawCompositeDeployment>,
    #[serde(default)]
    pub uniswap_v3: Option<RawUniswapV3Deployment>,
    #[serde(default)]
    pub ramses_v2: Option<RawRamsesDeployment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAaveV3Deployment {
    pub fuse: String,
    pub asset: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawErc4626Deployment {
    pub fuse: String,
    pub protocol_id: String,
    pub vault: String,
}

/// Shared shape for the two-contract supply protocols (Fluid, Gearbox):
/// a pool leg, a staking/farming leg, and a rewards claim fuse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCompositeDeployment {
    pub pool_token: String,
    pub erc4626_fuse: String,
    pub staking_token: String,
    pub staking_fuse: String,
    pub claim_fuse: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawUniswapV3Deployment {
    pub swap_fuse: String,
    pub new_position_fuse: String,
    pub modify_position_fuse: String,
    pub collect_fuse: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRamsesDeployment {
    pub claim_fuse: String,
}

impl DeploymentDocument {
    /// Parse a deployment document from its JSON serialization.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        Ok(document)
    }

    /// Validate and extract the deployments for one network.
    pub fn network(&self, network: &str) -> Result<Deployments> {
        let raw = self.networks.get(network).ok_or_else(|| ConfigError::UnknownNetwork {
            network: network.to_string(),
        })?;

        Deployments::from_raw(network, raw)
    }
}

/// Validated fuse deployments for one network.
#[derive(Debug, Clone)]
pub struct Deployments {
    pub aave_v3: Vec<AaveV3Deployment>,
    pub erc4626: Vec<Erc4626Deployment>,
    pub fluid_instadapp: Vec<CompositeDeployment>,
    pub gearbox: Vec<CompositeDeployment>,
    pub uniswap_v3: Option<UniswapV3Deployment>,
    pub ramses_v2: Option<RamsesDeployment>,
}

#[derive(Debug, Clone)]
pub struct AaveV3Deployment {
    pub fuse: Address,
    pub asset: Address,
}

#[derive(Debug, Clone)]
pub struct Erc4626Deployment {
    pub fuse: Address,
    pub protocol_id: String,
    pub vault: Address,
}

#[derive(Debug, Clone)]
pub struct CompositeDeployment {
    pub pool_token: Address,
    pub erc4626_fuse: Address,
    pub staking_token: Address,
    pub staking_fuse: Address,
    pub claim_fuse: Address,
}

#[derive(Debug, Clone)]
pub struct UniswapV3Deployment {
    pub swap_fuse: Address,
    pub new_position_fuse: Address,
    pub modify_position_fuse: Address,
    pub collect_fuse: Address,
}

#[derive(Debug, Clone)]
pub struct RamsesDeployment {
    pub claim_fuse: Address,
}

impl Deployments {
    /// Load the deployments for a network from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PLASMA_DEPLOYMENTS_JSON`: the deployment document as JSON (required)
    /// - `PLASMA_NETWORK`: the network to select from the document (required)
    ///
    /// # Errors
    ///
    /// Returns an error if either variable is missing, the JSON does not
    /// parse, the network is not present in the document, or any address
    /// fails validation.
    pub fn from_env() -> Result<Self> {
        tracing::info!("Loading fuse deployments from environment");

        let json = env::var(DEPLOYMENTS_VAR)
            .map_err(|_| ConfigError::MissingVariable { name: DEPLOYMENTS_VAR })?;
        let network =
            env::var(NETWORK_VAR).map_err(|_| ConfigError::MissingVariable { name: NETWORK_VAR })?;

        let deployments = DeploymentDocument::from_json(&json)?.network(&network)?;

        tracing::info!(
            network = %network,
            fuse_count = deployments.fuse_count(),
            "Fuse deployments loaded successfully"
        );

        Ok(deployments)
    }

    fn from_raw(network: &str, raw: &RawDeployments) -> Result<Self> {
        tracing::debug!(network = network, "Validating deployment addresses");

        let aave_v3 = raw
            .aave_v3
            .iter()
            .enumerate()
            .map(|(i, d)| {
                Ok(AaveV3Deployment {
                    fuse: parse_address(&field_name("aave_v3", i, "fuse"), &d.fuse)?,
                    asset: parse_address(&field_name("aave_v3", i, "asset"), &d.asset)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let erc4626 = raw
            .erc4626
            .iter()
            .enumerate()
            .map(|(i, d)| {
                Ok(Erc4626Deployment {
                    fuse: parse_address(&field_name("erc4626", i, "fuse"), &d.fuse)?,
                    protocol_id: d.protocol_id.clone(),
                    vault: parse_address(&field_name("erc4626", i, "vault"), &d.vault)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let fluid_instadapp = parse_composites("fluid_instadapp", &raw.fluid_instadapp)?;
        let gearbox = parse_composites("gearbox", &raw.gearbox)?;

        let uniswap_v3 = raw
            .uniswap_v3
            .as_ref()
            .map(|d| -> Result<UniswapV3Deployment> {
                Ok(UniswapV3Deployment {
                    swap_fuse: parse_address("uniswap_v3.swap_fuse", &d.swap_fuse)?,
                    new_position_fuse: parse_address(
                        "uniswap_v3.new_position_fuse",
                        &d.new_position_fuse,
                    )?,
                    modify_position_fuse: parse_address(
                        "uniswap_v3.modify_position_fuse",
                        &d.modify_position_fuse,
                    )?,
                    collect_fuse: parse_address("uniswap_v3.collect_fuse", &d.collect_fuse)?,
                })
            })
            .transpose()?;

        let ramses_v2 = raw
            .ramses_v2
            .as_ref()
            .map(|d| -> Result<RamsesDeployment> {
                Ok(RamsesDeployment {
                    claim_fuse: parse_address("ramses_v2.claim_fuse", &d.claim_fuse)?,
                })
            })
            .transpose()?;

        Ok(Self { aave_v3, erc4626, fluid_instadapp, gearbox, uniswap_v3, ramses_v2 })
    }

    /// Assemble the configured fuses into a [`FuseSet`].
    ///
    /// # Errors
    ///
    /// Fails if no fuses are configured, two deployments claim the same
    /// market, or an ERC-4626 deployment has an empty protocol id.
    pub fn fuse_set(&self) -> Result<FuseSet> {
        let mut fuses: Vec<Arc<dyn Fuse>> = Vec::with_capacity(self.fuse_count());

        for d in &self.aave_v3 {
            fuses.push(Arc::new(AaveV3SupplyFuse::new(d.fuse, d.asset)));
        }

        for d in &self.erc4626 {
            fuses.push(Arc::new(Erc4626SupplyFuse::new(d.fuse, d.protocol_id.clone(), d.vault)?));
        }

        for d in &self.fluid_instadapp {
            fuses.push(Arc::new(FluidInstadappSupplyFuse::new(
                d.pool_token,
                d.erc4626_fuse,
                d.staking_token,
                d.staking_fuse,
                d.claim_fuse,
            )));
        }

        for d in &self.gearbox {
            fuses.push(Arc::new(GearboxSupplyFuse::new(
                d.pool_token,
                d.erc4626_fuse,
                d.staking_token,
                d.staking_fuse,
                d.claim_fuse,
            )));
        }

        if let Some(d) = &self.uniswap_v3 {
            fuses.push(Arc::new(UniswapV3SwapFuse::new(d.swap_fuse)));
            fuses.push(Arc::new(UniswapV3NewPositionFuse::new(d.new_position_fuse)));
            fuses.push(Arc::new(UniswapV3ModifyPositionFuse::new(d.modify_position_fuse)));
            fuses.push(Arc::new(UniswapV3CollectFuse::new(d.collect_fuse)));
        }

        if let Some(d) = &self.ramses_v2 {
            fuses.push(Arc::new(RamsesClaimFuse::new(d.claim_fuse)));
        }

        tracing::debug!(fuse_count = fuses.len(), "Assembling fuse set from deployments");

        Ok(FuseSet::new(fuses)?)
    }

    fn fuse_count(&self) -> usize {
        self.aave_v3.len()
            + self.erc4626.len()
            + self.fluid_instadapp.len()
            + self.gearbox.len()
            + self.uniswap_v3.as_ref().map_or(0, |_| 4)
            + self.ramses_v2.as_ref().map_or(0, |_| 1)
    }
}

fn field_name(section: &str, index: usize, field: &str) -> String {
    format!("{}[{}].{}", section, index, field)
}

fn parse_composites(section: &str, raw: &[RawCompositeDeployment]) -> Result<Vec<CompositeDeployment>> {
    raw.iter()
        .enumerate()
        .map(|(i, d)| {
            Ok(CompositeDeployment {
                pool_token: parse_address(&field_name(section, i, "pool_token"), &d.pool_token)?,
                erc4626_fuse: parse_address(
                    &field_name(section, i, "erc4626_fuse"),
                    &d.erc4626_fuse,
                )?,
                staking_token: parse_address(
                    &field_name(section, i, "staking_token"),
                    &d.staking_token,
                )?,
                staking_fuse: parse_address(
                    &field_name(section, i, "staking_fuse"),
                    &d.staking_fuse,
                )?,
                claim_fuse: parse_address(&field_name(section, i, "claim_fuse"), &d.claim_fuse)?,
            })
        })
        .collect()
}

/// Parse and validate an Ethereum address from its configured string form.
fn parse_address(name: &str, value: &str) -> Result<Address> {
    Address::from_str(value).map_err(|_| {
        tracing::error!(field = name, value = value, "Invalid address in deployment config");
        ConfigError::InvalidAddress { name: name.to_string(), value: value.to_string() }.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment-variable tests share process state; serialize them.
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    const DOCUMENT: &str = r#"{
        "networks": {
            "arbitrum": {
                "aave_v3": [{
                    "fuse": "0x9339acf0b66a9e66ba460e33552a7ad5b10cfbca",
                    "asset": "0xaf88d065e77c8cC2239327C5EDb3A432268e5831"
                }],
                "uniswap_v3": {
                    "swap_fuse": "0x84c5ab008c66d664681698a9e4536d942b916f89",
                    "new_position_fuse": "0x0ce06c57e3199f83e9a3d6790c24fe6ac211b994",
                    "modify_position_fuse": "0xba503b6f2b95a4a47ee9884bbbdd12ec771e1d2c",
                    "collect_fuse": "0x75781ab6cdce9c505dbd0848f4ad8a97c68f53c1"
                },
                "ramses_v2": {
                    "claim_fuse": "0x6f292d12a2966c9b796247cca65a6a0b0e70dc63"
                }
            }
        }
    }"#;

    #[test]
    fn test_document_round_trips_and_builds_fuse_set() {
        let document = DeploymentDocument::from_json(DOCUMENT).unwrap();
        let deployments = document.network("arbitrum").unwrap();

        assert_eq!(deployments.aave_v3.len(), 1);
        assert!(deployments.uniswap_v3.is_some());
        assert!(deployments.gearbox.is_empty());

        // 1 aave + 4 uniswap + 1 ramses
        let fuse_set = deployments.fuse_set().unwrap();
        assert_eq!(fuse_set.len(), 6);
    }

    #[test]
    fn test_unknown_network_is_rejected() {
        let document = DeploymentDocument::from_json(DOCUMENT).unwrap();
        let result = document.network("base");

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("unknown network"));
    }

    #[test]
    fn test_invalid_address_names_offending_field() {
        let json = r#"{
            "networks": {
                "arbitrum": {
                    "aave_v3": [{ "fuse": "not-an-address", "asset": "0x0000000000000000000000000000000000000001" }]
                }
            }
        }"#;

        let result = DeploymentDocument::from_json(json).unwrap().network("arbitrum");
        let message = result.unwrap_err().to_string();
        assert!(message.contains("aave_v3[0].fuse"));
        assert!(message.contains("not-an-address"));
    }

    #[test]
    fn test_invalid_address_in_optional_section_is_rejected() {
        let json = r#"{
            "networks": {
                "arbitrum": {
                    "uniswap_v3": {
                        "swap_fuse": "0x84c5ab008c66d664681698a9e4536d942b916f89",
                        "new_position_fuse": "bogus",
                        "modify_position_fuse": "0xba503b6f2b95a4a47ee9884bbbdd12ec771e1d2c",
                        "collect_fuse": "0x75781ab6cdce9c505dbd0848f4ad8a97c68f53c1"
                    },
                    "ramses_v2": { "claim_fuse": "also-bogus" }
                }
            }
        }"#;

        let result = DeploymentDocument::from_json(json).unwrap().network("arbitrum");
        let message = result.unwrap_err().to_string();
        assert!(message.contains("uniswap_v3.new_position_fuse"));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        assert!(DeploymentDocument::from_json("{").is_err());
    }

    #[test]
    fn test_from_env_missing_variables() {
        let _guard = TEST_MUTEX.lock().unwrap();

        env::remove_var(DEPLOYMENTS_VAR);
        env::remove_var(NETWORK_VAR);

        let result = Deployments::from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains(DEPLOYMENTS_VAR));
    }

    #[test]
    fn test_from_env_valid() {
        let _guard = TEST_MUTEX.lock().unwrap();

        env::set_var(DEPLOYMENTS_VAR, DOCUMENT);
        env::set_var(NETWORK_VAR, "arbitrum");

        let result = Deployments::from_env();
        assert!(result.is_ok(), "Deployment loading failed: {:?}", result.err());
        assert_eq!(result.unwrap().aave_v3.len(), 1);

        env::remove_var(DEPLOYMENTS_VAR);
        env::remove_var(NETWORK_VAR);
    }
}
