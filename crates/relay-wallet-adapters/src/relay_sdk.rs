use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use alloy::sol_types::SolEvent;
use serde::de::DeserializeOwned;
use serde_json::Value;

use relay_wallet_core::contracts::IRelayHub;
use relay_wallet_core::domain::ReceiptLog;
use relay_wallet_core::{
    PortError, RelayCall, RelayReceipt, RelaySdkPort, RelayWallet, RelayingConfig, SmartWalletRef,
};

use crate::AdapterConfig;

/// Linear-fit estimate returned in deterministic mode, in native base units.
pub const DEFAULT_RELAY_COST_ESTIMATE: u64 = 60_000_000_000_000;

#[derive(Debug, Clone)]
pub struct RelaySdkAdapter {
    mode: SdkMode,
    state: Arc<Mutex<SdkState>>,
}

#[derive(Debug, Clone)]
enum SdkMode {
    Disabled(String),
    Deterministic,
    Bridge(BridgeRuntime),
}

#[derive(Debug, Clone)]
struct BridgeRuntime {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Clone)]
struct SdkState {
    config: Option<RelayingConfig>,
    deployed: HashSet<Address>,
    relay_estimate: U256,
    emit_relayed_event: bool,
    fail_next: Option<PortError>,
    call_log: Vec<String>,
    relayed: Vec<(RelayCall, RelayWallet, U256)>,
}

impl Default for SdkState {
    fn default() -> Self {
        Self {
            config: None,
            deployed: HashSet::new(),
            relay_estimate: U256::from(DEFAULT_RELAY_COST_ESTIMATE),
            emit_relayed_event: true,
            fail_next: None,
            call_log: Vec::new(),
            relayed: Vec::new(),
        }
    }
}

impl Default for RelaySdkAdapter {
    fn default() -> Self {
        Self::with_config(AdapterConfig::from_env())
    }
}

impl RelaySdkAdapter {
    pub fn with_config(config: AdapterConfig) -> Self {
        let mode = if let Some(ref base_url) = config.sdk_bridge_url {
            match build_client(config.request_timeout_ms) {
                Ok(client) => SdkMode::Bridge(BridgeRuntime {
                    base_url: base_url.clone(),
                    client,
                }),
                Err(e) if config.deterministic_fallback() => {
                    tracing::warn!(error = %e, "relaying SDK bridge unavailable, using deterministic client");
                    SdkMode::Deterministic
                }
                Err(e) => SdkMode::Disabled(format!(
                    "failed to initialize relaying SDK bridge client: {e}"
                )),
            }
        } else if config.deterministic_fallback() {
            SdkMode::Deterministic
        } else {
            SdkMode::Disabled("relaying SDK bridge URL not configured".to_owned())
        };
        Self::with_mode(mode)
    }

    pub fn deterministic() -> Self {
        Self::with_mode(SdkMode::Deterministic)
    }

    fn with_mode(mode: SdkMode) -> Self {
        Self {
            mode,
            state: Arc::new(Mutex::new(SdkState::default())),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SdkState>, PortError> {
        self.state
            .lock()
            .map_err(|e| PortError::Transport(format!("relaying SDK lock poisoned: {e}")))
    }

    /// Logs the call and fails when the client is disabled, a failure was
    /// queued, or (unless initializing) the client was never initialized.
    fn enter(&self, method: &str, requires_init: bool) -> Result<(), PortError> {
        if let SdkMode::Disabled(reason) = &self.mode {
            return Err(PortError::Policy(reason.clone()));
        }
        let mut g = self.lock()?;
        g.call_log.push(method.to_owned());
        if let Some(err) = g.fail_next.take() {
            return Err(err);
        }
        if requires_init && g.config.is_none() {
            return Err(PortError::Policy(
                "relaying client used before initialization".to_owned(),
            ));
        }
        Ok(())
    }

    fn config(&self) -> Result<RelayingConfig, PortError> {
        self.lock()?
            .config
            .clone()
            .ok_or_else(|| PortError::Policy("relaying client used before initialization".to_owned()))
    }

    /// SDK methods invoked so far, in order.
    pub fn call_log(&self) -> Result<Vec<String>, PortError> {
        Ok(self.lock()?.call_log.clone())
    }

    pub fn initialized_config(&self) -> Result<Option<RelayingConfig>, PortError> {
        Ok(self.lock()?.config.clone())
    }

    pub fn relayed_calls(&self) -> Result<Vec<(RelayCall, RelayWallet, U256)>, PortError> {
        Ok(self.lock()?.relayed.clone())
    }

    pub fn debug_set_relay_estimate(&self, cost: U256) -> Result<(), PortError> {
        self.lock()?.relay_estimate = cost;
        Ok(())
    }

    pub fn debug_mark_deployed(&self, smart_wallet: Address) -> Result<(), PortError> {
        self.lock()?.deployed.insert(smart_wallet);
        Ok(())
    }

    /// Relay receipts stop carrying the `TransactionRelayed` log.
    pub fn debug_omit_relayed_event(&self) -> Result<(), PortError> {
        self.lock()?.emit_relayed_event = false;
        Ok(())
    }

    pub fn debug_fail_next(&self, err: PortError) -> Result<(), PortError> {
        self.lock()?.fail_next = Some(err);
        Ok(())
    }
}

impl RelaySdkPort for RelaySdkAdapter {
    async fn initialize(&self, config: &RelayingConfig) -> Result<(), PortError> {
        self.enter("initialize", false)?;
        if let SdkMode::Bridge(bridge) = &self.mode {
            bridge.call::<Value>("relay_initialize", serde_json::json!([config])).await?;
        }
        self.lock()?.config = Some(config.clone());
        Ok(())
    }

    async fn generate_smart_wallet(
        &self,
        owner: Address,
        index: u32,
    ) -> Result<SmartWalletRef, PortError> {
        self.enter("generate_smart_wallet", true)?;
        if let SdkMode::Bridge(bridge) = &self.mode {
            return bridge
                .call("relay_generateSmartWallet", serde_json::json!([owner, index]))
                .await;
        }

        let factory = self.config()?.smart_wallet_factory;
        let address = derive_smart_wallet(factory, owner, index);
        let deployed = self.lock()?.deployed.contains(&address);
        Ok(SmartWalletRef {
            address,
            index,
            deployed,
        })
    }

    async fn deploy_smart_wallet(
        &self,
        wallet: &SmartWalletRef,
        token_address: Address,
        fee: U256,
    ) -> Result<RelayReceipt, PortError> {
        self.enter("deploy_smart_wallet", true)?;
        if let SdkMode::Bridge(bridge) = &self.mode {
            return bridge
                .call(
                    "relay_deploySmartWallet",
                    serde_json::json!([wallet, token_address, fee]),
                )
                .await;
        }

        let mut g = self.lock()?;
        if !g.deployed.insert(wallet.address) {
            return Err(PortError::Validation(format!(
                "smart wallet {} is already deployed",
                wallet.address
            )));
        }
        let transaction_hash = receipt_hash(b"deploy", wallet.address, fee, g.call_log.len());
        Ok(RelayReceipt {
            transaction_hash,
            block_hash: Some(keccak256(transaction_hash)),
            logs: Vec::new(),
        })
    }

    async fn relay_transaction(
        &self,
        call: &RelayCall,
        wallet: &RelayWallet,
        fee: U256,
    ) -> Result<RelayReceipt, PortError> {
        self.enter("relay_transaction", true)?;
        if let SdkMode::Bridge(bridge) = &self.mode {
            return bridge
                .call("relay_relayTransaction", serde_json::json!([call, wallet, fee]))
                .await;
        }

        let relay_hub = self.config()?.relay_hub;
        let mut g = self.lock()?;
        if !wallet.deployed && !g.deployed.contains(&wallet.address) {
            return Err(PortError::Validation(format!(
                "smart wallet {} is not deployed",
                wallet.address
            )));
        }
        g.relayed.push((call.clone(), *wallet, fee));
        let transaction_hash = receipt_hash(b"relay", wallet.address, fee, g.call_log.len());

        let mut logs = Vec::new();
        if g.emit_relayed_event {
            let event = IRelayHub::TransactionRelayed {
                relayManager: Address::repeat_byte(0x22),
                relayWorker: Address::repeat_byte(0x33),
                relayRequestSigHash: keccak256(&call.data),
                relayedCallReturnValue: Bytes::new(),
            };
            let data = event.encode_log_data();
            logs.push(ReceiptLog {
                address: relay_hub,
                topics: data.topics().to_vec(),
                data: data.data,
            });
        }
        Ok(RelayReceipt {
            transaction_hash,
            block_hash: Some(keccak256(transaction_hash)),
            logs,
        })
    }

    async fn estimate_max_possible_relay_gas_with_linear_fit(
        &self,
        destination: Address,
        smart_wallet: Address,
        value: U256,
        data: &Bytes,
        relay_worker: Address,
    ) -> Result<U256, PortError> {
        self.enter("estimate_max_possible_relay_gas_with_linear_fit", true)?;
        if let SdkMode::Bridge(bridge) = &self.mode {
            return bridge
                .call(
                    "relay_estimateMaxPossibleRelayGasWithLinearFit",
                    serde_json::json!([destination, smart_wallet, value, data, relay_worker]),
                )
                .await;
        }
        Ok(self.lock()?.relay_estimate)
    }
}

impl BridgeRuntime {
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, PortError> {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = self
            .client
            .post(&self.base_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PortError::Transport(format!("relaying SDK bridge request failed: {e}")))?;
        let status = response.status();
        let body: Value = response.json().await.map_err(|e| {
            PortError::Transport(format!("relaying SDK bridge json decode failed: {e}"))
        })?;
        if let Some(err) = body.get("error") {
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| err.to_string());
            return Err(PortError::Transport(format!("{method}: {message}")));
        }
        if !status.is_success() {
            return Err(PortError::Transport(format!(
                "relaying SDK bridge status {status}: {body}"
            )));
        }
        let result = body
            .get("result")
            .cloned()
            .ok_or_else(|| PortError::Transport("relaying SDK bridge missing result".to_owned()))?;
        serde_json::from_value(result)
            .map_err(|e| PortError::Validation(format!("{method}: unexpected result: {e}")))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_client(timeout_ms: u64) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_millis(timeout_ms))
        .build()
}

// The fetch-backed client has no request timeout.
#[cfg(target_arch = "wasm32")]
fn build_client(_timeout_ms: u64) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().build()
}

/// Counterfactual address of the `index`-th wallet of `owner`.
fn derive_smart_wallet(factory: Address, owner: Address, index: u32) -> Address {
    let mut seed = Vec::with_capacity(44);
    seed.extend_from_slice(factory.as_slice());
    seed.extend_from_slice(owner.as_slice());
    seed.extend_from_slice(&index.to_be_bytes());
    Address::from_slice(&keccak256(seed)[12..])
}

fn receipt_hash(kind: &[u8], wallet: Address, fee: U256, nonce: usize) -> B256 {
    let mut seed = kind.to_vec();
    seed.extend_from_slice(wallet.as_slice());
    seed.extend_from_slice(&fee.to_be_bytes::<32>());
    seed.extend_from_slice(&(nonce as u64).to_be_bytes());
    keccak256(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_depends_on_owner_and_index() {
        let factory = Address::repeat_byte(4);
        let owner = Address::repeat_byte(1);
        let a = derive_smart_wallet(factory, owner, 0);
        assert_eq!(a, derive_smart_wallet(factory, owner, 0));
        assert_ne!(a, derive_smart_wallet(factory, owner, 1));
        assert_ne!(a, derive_smart_wallet(factory, Address::repeat_byte(2), 0));
    }
}
