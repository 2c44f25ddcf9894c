//! Relaying client configuration.
//!
//! [`EnvelopingConfig`] holds the raw, possibly incomplete overrides read from
//! the environment. [`EnvelopingConfig::resolve`] turns it into a
//! [`RelayingConfig`] in which every required contract address is present.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Contract addresses as configured. `None` means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractAddresses {
    pub relay_hub: Option<Address>,
    pub relay_verifier: Option<Address>,
    pub deploy_verifier: Option<Address>,
    pub smart_wallet_factory: Option<Address>,
    pub smart_wallet: Option<Address>,
    pub token: Option<Address>,
    pub relay_worker: Option<Address>,
    pub penalizer: Option<Address>,
    pub custom_smart_wallet: Option<Address>,
    pub custom_smart_wallet_factory: Option<Address>,
    pub custom_smart_wallet_deploy_verifier: Option<Address>,
    pub custom_smart_wallet_relay_verifier: Option<Address>,
    pub sample_recipient: Option<Address>,
}

/// Raw relaying client settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvelopingConfig {
    pub chain_id: Option<u64>,
    pub gas_price_factor_percent: Option<u32>,
    pub relay_lookup_window_blocks: Option<u64>,
    pub preferred_relays: Vec<String>,
    pub contracts: ContractAddresses,
}

/// Addresses the SDK accepts but does not require.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionalContracts {
    pub smart_wallet: Option<Address>,
    pub penalizer: Option<Address>,
    pub custom_smart_wallet: Option<Address>,
    pub custom_smart_wallet_factory: Option<Address>,
    pub custom_smart_wallet_deploy_verifier: Option<Address>,
    pub custom_smart_wallet_relay_verifier: Option<Address>,
    pub sample_recipient: Option<Address>,
}

/// Validated configuration handed to the relaying SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayingConfig {
    pub chain_id: u64,
    pub gas_price_factor_percent: Option<u32>,
    pub relay_lookup_window_blocks: Option<u64>,
    pub preferred_relays: Vec<String>,
    pub relay_hub: Address,
    pub relay_verifier: Address,
    pub deploy_verifier: Address,
    pub smart_wallet_factory: Address,
    pub token: Address,
    pub relay_worker: Option<Address>,
    pub optional: OptionalContracts,
}

impl EnvelopingConfig {
    pub fn expected_chain_id(&self) -> Result<u64, AppError> {
        self.chain_id
            .ok_or_else(|| AppError::SdkInit("RIF_RELAY_CHAIN_ID is not configured".to_owned()))
    }

    /// Fails with every missing required address named, never with a
    /// zero-address placeholder standing in for one.
    pub fn resolve(&self) -> Result<RelayingConfig, AppError> {
        let chain_id = self.expected_chain_id()?;
        let c = &self.contracts;

        let mut missing = Vec::new();
        let mut require = |value: Option<Address>, name: &'static str| -> Address {
            match value.filter(|a| !a.is_zero()) {
                Some(a) => a,
                None => {
                    missing.push(name);
                    Address::ZERO
                }
            }
        };
        let relay_hub = require(c.relay_hub, "CONTRACTS_RELAY_HUB");
        let relay_verifier = require(c.relay_verifier, "CONTRACTS_RELAY_VERIFIER");
        let deploy_verifier = require(c.deploy_verifier, "CONTRACTS_DEPLOY_VERIFIER");
        let smart_wallet_factory =
            require(c.smart_wallet_factory, "CONTRACTS_SMART_WALLET_FACTORY");
        let token = require(c.token, "CONTRACTS_RIF_TOKEN");

        if !missing.is_empty() {
            return Err(AppError::SdkInit(format!(
                "missing required contract address: {}",
                missing.join(", ")
            )));
        }

        let non_zero = |a: Option<Address>| a.filter(|x| !x.is_zero());
        Ok(RelayingConfig {
            chain_id,
            gas_price_factor_percent: self.gas_price_factor_percent,
            relay_lookup_window_blocks: self.relay_lookup_window_blocks,
            preferred_relays: self.preferred_relays.clone(),
            relay_hub,
            relay_verifier,
            deploy_verifier,
            smart_wallet_factory,
            token,
            relay_worker: non_zero(c.relay_worker),
            optional: OptionalContracts {
                smart_wallet: non_zero(c.smart_wallet),
                penalizer: non_zero(c.penalizer),
                custom_smart_wallet: non_zero(c.custom_smart_wallet),
                custom_smart_wallet_factory: non_zero(c.custom_smart_wallet_factory),
                custom_smart_wallet_deploy_verifier: non_zero(
                    c.custom_smart_wallet_deploy_verifier,
                ),
                custom_smart_wallet_relay_verifier: non_zero(c.custom_smart_wallet_relay_verifier),
                sample_recipient: non_zero(c.sample_recipient),
            },
        })
    }
}
