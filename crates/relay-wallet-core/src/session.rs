use alloy::primitives::Address;

use crate::config::{EnvelopingConfig, RelayingConfig};
use crate::error::AppError;
use crate::ports::RelaySdkPort;

/// An initialized relaying client. Relay, estimate and deploy operations take
/// a `&ProviderSession`, so none of them can run before initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSession {
    config: RelayingConfig,
}

impl ProviderSession {
    /// Checks the wallet network and the configuration, then initializes the
    /// SDK. Neither failure reaches the SDK.
    pub async fn initialize<R: RelaySdkPort>(
        sdk: &R,
        settings: &EnvelopingConfig,
        wallet_chain_id: u64,
    ) -> Result<Self, AppError> {
        let expected = settings.expected_chain_id()?;
        if wallet_chain_id != expected {
            tracing::error!(
                "Wrong network ID {wallet_chain_id}, it must be {expected}"
            );
            return Err(AppError::MisconfiguredNetwork {
                expected,
                actual: wallet_chain_id,
            });
        }

        let config = settings.resolve().inspect_err(|e| {
            tracing::error!(error = %e, "relaying configuration incomplete");
        })?;

        sdk.initialize(&config)
            .await
            .map_err(|e| AppError::SdkInit(e.message()))?;

        tracing::info!(
            chain_id = config.chain_id,
            relay_hub = %config.relay_hub,
            preferred_relays = config.preferred_relays.len(),
            "relaying client initialized"
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &RelayingConfig {
        &self.config
    }

    pub fn token(&self) -> Address {
        self.config.token
    }

    pub fn relay_worker(&self) -> Result<Address, AppError> {
        self.config.relay_worker.ok_or_else(|| {
            AppError::SdkInit("CONTRACTS_RELAY_WORKER is not configured".to_owned())
        })
    }
}
