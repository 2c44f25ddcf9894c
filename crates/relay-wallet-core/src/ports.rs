use std::sync::Arc;

use alloy::primitives::{Address, Bytes, B256, U256};
use serde_json::Value;
use thiserror::Error;

use crate::config::RelayingConfig;
use crate::domain::{CallRequest, ProviderEvent, RelayCall, RelayReceipt, RelayWallet, SmartWalletRef};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("policy error: {0}")]
    Policy(String),
    #[error("request rejected: {0}")]
    Rejected(String),
}

impl PortError {
    /// Human readable reason without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            PortError::NotImplemented(what) => format!("{what} is not available"),
            PortError::Transport(m)
            | PortError::Validation(m)
            | PortError::NotFound(m)
            | PortError::Policy(m)
            | PortError::Rejected(m) => m.clone(),
        }
    }
}

/// Browser wallet provider (EIP-1193).
#[allow(async_fn_in_trait)]
pub trait WalletProviderPort {
    async fn request_accounts(&self) -> Result<Vec<Address>, PortError>;
    async fn accounts(&self) -> Result<Vec<Address>, PortError>;
    async fn chain_id(&self) -> Result<u64, PortError>;
    async fn get_transaction(&self, hash: B256) -> Result<Option<Value>, PortError>;
    async fn native_balance(&self, account: Address) -> Result<U256, PortError>;
    async fn call(&self, request: &CallRequest) -> Result<Bytes, PortError>;
    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, PortError>;
    async fn send_transaction(&self, request: &CallRequest) -> Result<B256, PortError>;
    fn drain_events(&self) -> Result<Vec<ProviderEvent>, PortError>;
}

/// Relaying SDK client.
#[allow(async_fn_in_trait)]
pub trait RelaySdkPort {
    async fn initialize(&self, config: &RelayingConfig) -> Result<(), PortError>;
    async fn generate_smart_wallet(
        &self,
        owner: Address,
        index: u32,
    ) -> Result<SmartWalletRef, PortError>;
    async fn deploy_smart_wallet(
        &self,
        wallet: &SmartWalletRef,
        token_address: Address,
        fee: U256,
    ) -> Result<RelayReceipt, PortError>;
    async fn relay_transaction(
        &self,
        call: &RelayCall,
        wallet: &RelayWallet,
        fee: U256,
    ) -> Result<RelayReceipt, PortError>;
    async fn estimate_max_possible_relay_gas_with_linear_fit(
        &self,
        destination: Address,
        smart_wallet: Address,
        value: U256,
        data: &Bytes,
        relay_worker: Address,
    ) -> Result<U256, PortError>;
}

pub trait AbiPort {
    fn selector(&self, signature: &str) -> Result<[u8; 4], PortError>;
    /// Encodes `name(type,...)` with comma separated `values` into calldata.
    fn encode_function_call(&self, signature: &str, values: &str) -> Result<Bytes, PortError>;
}

/// Shared handles to the external collaborators. Cloning is cheap, so a copy
/// can be moved into each background task.
pub struct Ports<W, R, A> {
    pub wallet: Arc<W>,
    pub sdk: Arc<R>,
    pub abi: Arc<A>,
}

impl<W, R, A> Ports<W, R, A> {
    pub fn new(wallet: W, sdk: R, abi: A) -> Self {
        Self {
            wallet: Arc::new(wallet),
            sdk: Arc::new(sdk),
            abi: Arc::new(abi),
        }
    }
}

impl<W, R, A> Clone for Ports<W, R, A> {
    fn clone(&self) -> Self {
        Self {
            wallet: Arc::clone(&self.wallet),
            sdk: Arc::clone(&self.sdk),
            abi: Arc::clone(&self.abi),
        }
    }
}
