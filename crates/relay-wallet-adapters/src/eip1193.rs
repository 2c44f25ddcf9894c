use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use alloy::sol_types::SolCall;
use serde::Deserialize;
use serde_json::Value;

use relay_wallet_core::contracts::IERC20;
use relay_wallet_core::{
    CallRequest, PortError, ProviderEvent, ProviderEventKind, WalletProviderPort,
};

use crate::AdapterConfig;

/// EIP-1193 error code for a request the user declined.
pub const USER_REJECTED_CODE: i64 = 4001;

pub const DEFAULT_GAS_ESTIMATE: u64 = 100_000;

const DETERMINISTIC_CHAIN_ID: u64 = 33;
const DETERMINISTIC_TOKEN_DECIMALS: u8 = 18;

#[derive(Debug, Clone)]
pub struct Eip1193Adapter {
    mode: ProviderMode,
    state: Arc<Mutex<ProviderState>>,
    #[cfg(target_arch = "wasm32")]
    hooks: Arc<Mutex<BrowserHooks>>,
}

#[derive(Debug, Clone)]
enum ProviderMode {
    Disabled(String),
    Deterministic,
    #[cfg(not(target_arch = "wasm32"))]
    Proxy(ProxyRuntime),
    #[cfg(target_arch = "wasm32")]
    Browser,
}

#[derive(Debug, Clone)]
#[cfg(not(target_arch = "wasm32"))]
struct ProxyRuntime {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Clone, Default)]
struct ProviderState {
    accounts: Vec<Address>,
    chain_id: u64,
    event_seq: u64,
    events: Vec<ProviderEvent>,
    chain: DeterministicChain,
}

/// In-memory node answering requests in deterministic mode.
#[derive(Debug, Clone, Default)]
struct DeterministicChain {
    native_balances: HashMap<Address, U256>,
    token_balances: HashMap<(Address, Address), U256>,
    token_decimals: HashMap<Address, u8>,
    call_results: HashMap<(Address, Bytes), Bytes>,
    gas_estimate: Option<u64>,
    reject_next: Option<String>,
    sent: Vec<CallRequest>,
    transactions: HashMap<B256, Value>,
    request_log: Vec<String>,
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
struct BrowserHooks {
    accounts_changed: Option<wasm_bindgen::closure::Closure<dyn FnMut(wasm_bindgen::JsValue)>>,
    chain_changed: Option<wasm_bindgen::closure::Closure<dyn FnMut(wasm_bindgen::JsValue)>>,
}

/// Transaction object of `eth_call` / `eth_estimateGas` / `eth_sendTransaction`.
#[derive(Debug, Deserialize)]
struct RpcTransaction {
    #[serde(default)]
    from: Option<Address>,
    to: Address,
    #[serde(default, alias = "input")]
    data: Option<Bytes>,
    #[serde(default)]
    value: Option<U256>,
}

impl Default for Eip1193Adapter {
    fn default() -> Self {
        Self::with_config(AdapterConfig::from_env())
    }
}

impl Eip1193Adapter {
    pub fn with_config(config: AdapterConfig) -> Self {
        #[cfg(target_arch = "wasm32")]
        let mode = if browser_provider_available() {
            ProviderMode::Browser
        } else if config.deterministic_fallback() {
            ProviderMode::Deterministic
        } else {
            ProviderMode::Disabled("no EIP-1193 browser provider found".to_owned())
        };

        #[cfg(not(target_arch = "wasm32"))]
        let mode = if let Some(ref base_url) = config.eip1193_proxy_url {
            let timeout = std::time::Duration::from_millis(config.request_timeout_ms);
            match reqwest::Client::builder().timeout(timeout).build() {
                Ok(client) => ProviderMode::Proxy(ProxyRuntime {
                    base_url: base_url.clone(),
                    client,
                }),
                Err(e) if config.deterministic_fallback() => {
                    tracing::warn!(error = %e, "EIP-1193 proxy unavailable, using deterministic provider");
                    ProviderMode::Deterministic
                }
                Err(e) => ProviderMode::Disabled(format!(
                    "failed to initialize EIP-1193 proxy client: {e}"
                )),
            }
        } else if config.deterministic_fallback() {
            ProviderMode::Deterministic
        } else {
            ProviderMode::Disabled("EIP-1193 proxy URL not configured".to_owned())
        };

        Self::with_mode(mode, config.enveloping.chain_id)
    }

    /// In-memory provider with a single account, for demos and tests.
    pub fn deterministic(chain_id: u64) -> Self {
        Self::with_mode(ProviderMode::Deterministic, Some(chain_id))
    }

    fn with_mode(mode: ProviderMode, chain_id: Option<u64>) -> Self {
        let mut state = ProviderState::default();
        if matches!(mode, ProviderMode::Deterministic) {
            state.accounts = vec![deterministic_account()];
            state.chain_id = chain_id.unwrap_or(DETERMINISTIC_CHAIN_ID);
        }
        tracing::debug!(mode = mode.name(), "EIP-1193 provider adapter ready");
        Self {
            mode,
            state: Arc::new(Mutex::new(state)),
            #[cfg(target_arch = "wasm32")]
            hooks: Arc::new(Mutex::new(BrowserHooks::default())),
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.mode, ProviderMode::Disabled(_))
    }

    pub fn mode_name(&self) -> &'static str {
        self.mode.name()
    }

    fn check_mode(&self) -> Result<(), PortError> {
        if let ProviderMode::Disabled(reason) = &self.mode {
            return Err(PortError::Policy(reason.clone()));
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, ProviderState>, PortError> {
        self.state
            .lock()
            .map_err(|e| PortError::Transport(format!("provider lock poisoned: {e}")))
    }

    fn record_event(&self, kind: ProviderEventKind, value: String) -> Result<(), PortError> {
        let mut g = self.lock()?;
        push_event(&mut g, kind, value);
        Ok(())
    }

    pub fn debug_inject_accounts_changed(&self, accounts: Vec<Address>) -> Result<(), PortError> {
        let payload = accounts_payload(&accounts);
        let mut g = self.lock()?;
        g.accounts = accounts;
        push_event(&mut g, ProviderEventKind::AccountsChanged, payload);
        Ok(())
    }

    pub fn debug_inject_chain_changed(&self, chain_id: u64) -> Result<(), PortError> {
        let mut g = self.lock()?;
        g.chain_id = chain_id;
        push_event(&mut g, ProviderEventKind::ChainChanged, format!("{chain_id:#x}"));
        Ok(())
    }

    pub fn debug_set_accounts(&self, accounts: Vec<Address>) -> Result<(), PortError> {
        self.lock()?.accounts = accounts;
        Ok(())
    }

    pub fn debug_set_chain_id(&self, chain_id: u64) -> Result<(), PortError> {
        self.lock()?.chain_id = chain_id;
        Ok(())
    }

    pub fn debug_set_native_balance(&self, account: Address, balance: U256) -> Result<(), PortError> {
        self.lock()?.chain.native_balances.insert(account, balance);
        Ok(())
    }

    pub fn debug_set_token_balance(
        &self,
        token: Address,
        holder: Address,
        balance: U256,
    ) -> Result<(), PortError> {
        self.lock()?
            .chain
            .token_balances
            .insert((token, holder), balance);
        Ok(())
    }

    pub fn debug_set_token_decimals(&self, token: Address, decimals: u8) -> Result<(), PortError> {
        self.lock()?.chain.token_decimals.insert(token, decimals);
        Ok(())
    }

    /// Exact `eth_call` response for `to` and `data`.
    pub fn debug_set_call_result(&self, to: Address, data: Bytes, result: Bytes) -> Result<(), PortError> {
        self.lock()?.chain.call_results.insert((to, data), result);
        Ok(())
    }

    pub fn debug_set_gas_estimate(&self, gas: u64) -> Result<(), PortError> {
        self.lock()?.chain.gas_estimate = Some(gas);
        Ok(())
    }

    /// The next request fails as if the user declined it in the wallet.
    pub fn debug_reject_next_request(&self, reason: &str) -> Result<(), PortError> {
        self.lock()?.chain.reject_next = Some(reason.to_owned());
        Ok(())
    }

    pub fn sent_transactions(&self) -> Result<Vec<CallRequest>, PortError> {
        Ok(self.lock()?.chain.sent.clone())
    }

    /// RPC methods answered in deterministic mode, in order.
    pub fn request_log(&self) -> Result<Vec<String>, PortError> {
        Ok(self.lock()?.chain.request_log.clone())
    }

    /// Sends one EIP-1193 request through the active runtime.
    pub async fn request(&self, method: &str, params: Value) -> Result<Value, PortError> {
        self.check_mode()?;
        tracing::trace!(method, "provider request");

        #[cfg(not(target_arch = "wasm32"))]
        if let ProviderMode::Proxy(proxy) = &self.mode {
            return proxy.call(method, params).await;
        }

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            return wasm_request(method, params).await;
        }

        let mut g = self.lock()?;
        deterministic_request(&mut g, method, &params)
    }

    #[cfg(target_arch = "wasm32")]
    fn register_browser_hooks(&self) -> Result<(), PortError> {
        use wasm_bindgen::{closure::Closure, JsCast, JsValue};

        let provider = browser_provider()?;
        let on_fn = get_prop(&provider, "on")
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
            .or_else(|| {
                get_prop(&provider, "addListener")
                    .ok()
                    .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
            })
            .ok_or(PortError::NotImplemented(
                "provider does not expose on/addListener",
            ))?;

        let mut hooks = self
            .hooks
            .lock()
            .map_err(|e| PortError::Transport(format!("provider hooks lock poisoned: {e}")))?;
        if hooks.accounts_changed.is_some() && hooks.chain_changed.is_some() {
            return Ok(());
        }

        let state_for_accounts = Arc::clone(&self.state);
        let accounts_cb = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            let mut accounts = Vec::new();
            if js_sys::Array::is_array(&value) {
                for item in js_sys::Array::from(&value).iter() {
                    if let Some(addr) = item.as_string().and_then(|raw| raw.parse().ok()) {
                        accounts.push(addr);
                    }
                }
            }
            if let Ok(mut g) = state_for_accounts.lock() {
                let payload = accounts_payload(&accounts);
                g.accounts = accounts;
                push_event(&mut g, ProviderEventKind::AccountsChanged, payload);
            }
        });

        let state_for_chain = Arc::clone(&self.state);
        let chain_cb = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            if let Ok(chain_id) = js_chain_id_to_u64(value) {
                if let Ok(mut g) = state_for_chain.lock() {
                    g.chain_id = chain_id;
                    push_event(&mut g, ProviderEventKind::ChainChanged, format!("{chain_id:#x}"));
                }
            }
        });

        on_fn
            .call2(
                &provider,
                &JsValue::from_str("accountsChanged"),
                accounts_cb.as_ref().unchecked_ref(),
            )
            .map_err(|e| PortError::Transport(format!("register accountsChanged failed: {e:?}")))?;
        on_fn
            .call2(
                &provider,
                &JsValue::from_str("chainChanged"),
                chain_cb.as_ref().unchecked_ref(),
            )
            .map_err(|e| PortError::Transport(format!("register chainChanged failed: {e:?}")))?;

        hooks.accounts_changed = Some(accounts_cb);
        hooks.chain_changed = Some(chain_cb);
        Ok(())
    }
}

impl ProviderMode {
    fn name(&self) -> &'static str {
        match self {
            ProviderMode::Disabled(_) => "disabled",
            ProviderMode::Deterministic => "deterministic",
            #[cfg(not(target_arch = "wasm32"))]
            ProviderMode::Proxy(_) => "proxy",
            #[cfg(target_arch = "wasm32")]
            ProviderMode::Browser => "browser",
        }
    }
}

impl WalletProviderPort for Eip1193Adapter {
    async fn request_accounts(&self) -> Result<Vec<Address>, PortError> {
        let result = self.request("eth_requestAccounts", serde_json::json!([])).await?;
        let accounts = parse_accounts(&result, "eth_requestAccounts")?;

        let changed = {
            let mut g = self.lock()?;
            let changed = g.accounts != accounts;
            g.accounts = accounts.clone();
            changed
        };
        if changed && !matches!(self.mode, ProviderMode::Deterministic) {
            self.record_event(ProviderEventKind::AccountsChanged, accounts_payload(&accounts))?;
        }

        // Registered only once access was granted; an eager provider.on(...)
        // at startup can leave eth_requestAccounts pending without a prompt.
        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            if let Err(e) = self.register_browser_hooks() {
                tracing::warn!(error = %e, "account change listener not registered");
            }
        }

        Ok(accounts)
    }

    async fn accounts(&self) -> Result<Vec<Address>, PortError> {
        let result = self.request("eth_accounts", serde_json::json!([])).await?;
        parse_accounts(&result, "eth_accounts")
    }

    async fn chain_id(&self) -> Result<u64, PortError> {
        let result = self.request("eth_chainId", serde_json::json!([])).await?;
        let chain_id = json_chain_id_to_u64(&result)?;
        self.lock()?.chain_id = chain_id;
        Ok(chain_id)
    }

    async fn get_transaction(&self, hash: B256) -> Result<Option<Value>, PortError> {
        let result = self
            .request("eth_getTransactionByHash", serde_json::json!([hash]))
            .await?;
        Ok((!result.is_null()).then_some(result))
    }

    async fn native_balance(&self, account: Address) -> Result<U256, PortError> {
        let result = self
            .request("eth_getBalance", serde_json::json!([account, "latest"]))
            .await?;
        json_quantity(&result, "eth_getBalance")
    }

    async fn call(&self, request: &CallRequest) -> Result<Bytes, PortError> {
        let result = self
            .request("eth_call", serde_json::json!([tx_json(request), "latest"]))
            .await?;
        let raw = result
            .as_str()
            .ok_or_else(|| PortError::Transport("eth_call must return hex data".to_owned()))?;
        raw.parse()
            .map_err(|e| PortError::Validation(format!("invalid eth_call result: {e}")))
    }

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, PortError> {
        let result = self
            .request("eth_estimateGas", serde_json::json!([tx_json(request)]))
            .await?;
        let gas = json_quantity(&result, "eth_estimateGas")?;
        u64::try_from(gas).map_err(|e| PortError::Validation(format!("gas estimate too large: {e}")))
    }

    async fn send_transaction(&self, request: &CallRequest) -> Result<B256, PortError> {
        let result = self
            .request("eth_sendTransaction", serde_json::json!([tx_json(request)]))
            .await?;
        let hash = result.as_str().ok_or_else(|| {
            PortError::Transport("eth_sendTransaction must return tx hash".to_owned())
        })?;
        hash.parse()
            .map_err(|e| PortError::Validation(format!("invalid tx hash: {e}")))
    }

    fn drain_events(&self) -> Result<Vec<ProviderEvent>, PortError> {
        self.check_mode()?;
        let mut g = self.lock()?;
        Ok(std::mem::take(&mut g.events))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ProxyRuntime {
    async fn call(&self, method: &str, params: Value) -> Result<Value, PortError> {
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
            .map_err(|e| PortError::Transport(format!("eip1193 proxy request failed: {e}")))?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| PortError::Transport(format!("eip1193 proxy json decode failed: {e}")))?;
        if let Some(err) = body.get("error") {
            return Err(rpc_error(err));
        }
        if !status.is_success() {
            return Err(PortError::Transport(format!(
                "eip1193 proxy status {status}: {body}"
            )));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| PortError::Transport("eip1193 proxy missing result".to_owned()))
    }
}

fn deterministic_request(
    state: &mut ProviderState,
    method: &str,
    params: &Value,
) -> Result<Value, PortError> {
    if let Some(reason) = state.chain.reject_next.take() {
        return Err(PortError::Rejected(reason));
    }
    state.chain.request_log.push(method.to_owned());

    match method {
        "eth_requestAccounts" | "eth_accounts" => Ok(serde_json::json!(state
            .accounts
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>())),
        "eth_chainId" => Ok(Value::String(format!("{:#x}", state.chain_id))),
        "eth_getBalance" => {
            let account: Address = param(params, 0, method)?;
            let balance = state
                .chain
                .native_balances
                .get(&account)
                .copied()
                .unwrap_or_default();
            Ok(Value::String(format!("0x{balance:x}")))
        }
        "eth_call" => {
            let tx: RpcTransaction = param(params, 0, method)?;
            let data = tx.data.unwrap_or_default();
            Ok(Value::String(state.chain.answer_call(tx.to, &data).to_string()))
        }
        "eth_estimateGas" => {
            let _tx: RpcTransaction = param(params, 0, method)?;
            let gas = state.chain.gas_estimate.unwrap_or(DEFAULT_GAS_ESTIMATE);
            Ok(Value::String(format!("{gas:#x}")))
        }
        "eth_sendTransaction" => {
            let tx: RpcTransaction = param(params, 0, method)?;
            let request = CallRequest {
                from: tx.from,
                to: tx.to,
                data: tx.data.unwrap_or_default(),
                value: tx.value.unwrap_or_default(),
            };
            let nonce = state.chain.sent.len() as u64;
            let mut seed = serde_json::to_vec(&params[0])
                .map_err(|e| PortError::Validation(format!("tx serialization failed: {e}")))?;
            seed.extend_from_slice(&nonce.to_be_bytes());
            let hash = keccak256(seed);

            let mut record = params[0].clone();
            if let Some(obj) = record.as_object_mut() {
                obj.insert("hash".to_owned(), serde_json::json!(hash));
                obj.insert("nonce".to_owned(), Value::String(format!("{nonce:#x}")));
            }
            state.chain.transactions.insert(hash, record);
            state.chain.sent.push(request);
            Ok(serde_json::json!(hash))
        }
        "eth_getTransactionByHash" => {
            let hash: B256 = param(params, 0, method)?;
            Ok(state
                .chain
                .transactions
                .get(&hash)
                .cloned()
                .unwrap_or(Value::Null))
        }
        other => Err(PortError::Validation(format!(
            "unsupported method in deterministic provider: {other}"
        ))),
    }
}

impl DeterministicChain {
    fn answer_call(&self, to: Address, data: &Bytes) -> Bytes {
        if let Some(result) = self.call_results.get(&(to, data.clone())) {
            return result.clone();
        }
        let selector = data.get(..4).unwrap_or_default();
        if selector == &IERC20::decimalsCall::SELECTOR[..] {
            let decimals = self
                .token_decimals
                .get(&to)
                .copied()
                .unwrap_or(DETERMINISTIC_TOKEN_DECIMALS);
            return word(U256::from(decimals));
        }
        if selector == &IERC20::balanceOfCall::SELECTOR[..] {
            if let Ok(call) = IERC20::balanceOfCall::abi_decode(data, true) {
                let balance = self
                    .token_balances
                    .get(&(to, call.account))
                    .copied()
                    .unwrap_or_default();
                return word(balance);
            }
        }
        Bytes::new()
    }
}

fn word(value: U256) -> Bytes {
    Bytes::from(value.to_be_bytes::<32>().to_vec())
}

fn param<T: serde::de::DeserializeOwned>(params: &Value, index: usize, method: &str) -> Result<T, PortError> {
    let raw = params
        .get(index)
        .cloned()
        .ok_or_else(|| PortError::Validation(format!("{method}: missing parameter {index}")))?;
    serde_json::from_value(raw)
        .map_err(|e| PortError::Validation(format!("{method}: invalid parameter {index}: {e}")))
}

fn push_event(state: &mut ProviderState, kind: ProviderEventKind, value: String) {
    state.event_seq = state.event_seq.saturating_add(1);
    let sequence = state.event_seq;
    state.events.push(ProviderEvent {
        sequence,
        kind,
        value,
    });
}

fn accounts_payload(accounts: &[Address]) -> String {
    serde_json::to_string(&accounts.iter().map(|a| a.to_string()).collect::<Vec<_>>())
        .unwrap_or_else(|_| "[]".to_owned())
}

fn deterministic_account() -> Address {
    Address::repeat_byte(0x10)
}

fn tx_json(request: &CallRequest) -> Value {
    let mut tx = serde_json::json!({
        "to": request.to,
        "data": request.data,
        "value": format!("0x{:x}", request.value),
    });
    if let (Some(from), Some(obj)) = (request.from, tx.as_object_mut()) {
        obj.insert("from".to_owned(), serde_json::json!(from));
    }
    tx
}

fn parse_accounts(value: &Value, method: &str) -> Result<Vec<Address>, PortError> {
    let arr = value
        .as_array()
        .ok_or_else(|| PortError::Transport(format!("{method}: array expected")))?;
    arr.iter()
        .map(|item| {
            let raw = item
                .as_str()
                .ok_or_else(|| PortError::Transport(format!("{method}: string expected")))?;
            raw.parse()
                .map_err(|e| PortError::Validation(format!("invalid account address: {e}")))
        })
        .collect()
}

fn rpc_error(err: &Value) -> PortError {
    let message = err
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| err.to_string());
    match err.get("code").and_then(Value::as_i64) {
        Some(USER_REJECTED_CODE) => PortError::Rejected(message),
        _ => PortError::Transport(format!("provider returned error: {message}")),
    }
}

fn json_quantity(value: &Value, what: &str) -> Result<U256, PortError> {
    if let Some(n) = value.as_u64() {
        return Ok(U256::from(n));
    }
    let raw = value
        .as_str()
        .ok_or_else(|| PortError::Validation(format!("{what}: quantity must be string or number")))?;
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => U256::from_str_radix(hex, 16),
        None => U256::from_str_radix(raw, 10),
    }
    .map_err(|e| PortError::Validation(format!("{what}: invalid quantity: {e}")))
}

fn json_chain_id_to_u64(value: &Value) -> Result<u64, PortError> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    let s = value
        .as_str()
        .ok_or_else(|| PortError::Validation("chain id must be string or number".to_owned()))?;
    parse_chain_id_str(s)
}

fn parse_chain_id_str(raw: &str) -> Result<u64, PortError> {
    if raw.starts_with("0x") || raw.starts_with("0X") {
        u64::from_str_radix(raw.trim_start_matches("0x").trim_start_matches("0X"), 16)
            .map_err(|e| PortError::Validation(format!("invalid hex chain id: {e}")))
    } else {
        raw.parse()
            .map_err(|e| PortError::Validation(format!("invalid chain id: {e}")))
    }
}

#[cfg(target_arch = "wasm32")]
async fn wasm_request(method: &str, params: Value) -> Result<Value, PortError> {
    use wasm_bindgen::JsCast;

    let provider = browser_provider()?;
    let request_fn = get_prop(&provider, "request")
        .ok()
        .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
        .ok_or(PortError::NotImplemented(
            "window.ethereum.request is unavailable",
        ))?;

    let request = serde_json::json!({
        "method": method,
        "params": params,
    });
    let request_js = serde_wasm_bindgen::to_value(&request)
        .map_err(|e| PortError::Transport(format!("failed to encode wasm request: {e}")))?;
    let promise_js = request_fn
        .call1(&provider, &request_js)
        .map_err(|e| PortError::Transport(format!("provider request dispatch failed: {e:?}")))?;
    let promise = promise_js
        .dyn_into::<js_sys::Promise>()
        .map_err(|_| PortError::Transport("provider request did not return Promise".to_owned()))?;
    let result_js = wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map_err(|e| {
            let code = get_prop(&e, "code").ok().and_then(|c| c.as_f64());
            let message = get_prop(&e, "message")
                .ok()
                .and_then(|m| m.as_string())
                .unwrap_or_else(|| format!("{e:?}"));
            if code == Some(USER_REJECTED_CODE as f64) {
                PortError::Rejected(message)
            } else {
                PortError::Transport(format!("provider request rejected: {message}"))
            }
        })?;
    serde_wasm_bindgen::from_value(result_js)
        .map_err(|e| PortError::Transport(format!("failed to decode wasm response: {e}")))
}

#[cfg(target_arch = "wasm32")]
fn browser_provider_available() -> bool {
    browser_provider().is_ok()
}

#[cfg(target_arch = "wasm32")]
fn browser_provider() -> Result<wasm_bindgen::JsValue, PortError> {
    let window =
        web_sys::window().ok_or_else(|| PortError::Transport("missing window".to_owned()))?;
    let provider = get_prop(&window.into(), "ethereum")?;
    if provider.is_null() || provider.is_undefined() {
        return Err(PortError::NotFound("window.ethereum missing".to_owned()));
    }
    Ok(provider)
}

#[cfg(target_arch = "wasm32")]
fn get_prop(target: &wasm_bindgen::JsValue, key: &str) -> Result<wasm_bindgen::JsValue, PortError> {
    js_sys::Reflect::get(target, &wasm_bindgen::JsValue::from_str(key))
        .map_err(|e| PortError::Transport(format!("read provider property {key} failed: {e:?}")))
}

#[cfg(target_arch = "wasm32")]
fn js_chain_id_to_u64(value: wasm_bindgen::JsValue) -> Result<u64, PortError> {
    if let Some(s) = value.as_string() {
        return parse_chain_id_str(&s);
    }
    if let Some(num) = value.as_f64() {
        return Ok(num as u64);
    }
    Err(PortError::Validation("invalid JS chain id".to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities_accept_hex_and_decimal() {
        assert_eq!(json_quantity(&serde_json::json!("0x10"), "q").unwrap(), U256::from(16u8));
        assert_eq!(json_quantity(&serde_json::json!("42"), "q").unwrap(), U256::from(42u8));
        assert_eq!(json_quantity(&serde_json::json!(7), "q").unwrap(), U256::from(7u8));
        assert!(json_quantity(&serde_json::json!(true), "q").is_err());
    }

    #[test]
    fn user_rejection_code_is_classified() {
        let err = rpc_error(&serde_json::json!({"code": 4001, "message": "User rejected"}));
        assert_eq!(err, PortError::Rejected("User rejected".to_owned()));
        let err = rpc_error(&serde_json::json!({"code": -32000, "message": "boom"}));
        assert!(matches!(err, PortError::Transport(_)));
    }

    #[test]
    fn tx_json_omits_missing_sender() {
        let request = CallRequest::read(Address::repeat_byte(1), Bytes::new());
        let tx = tx_json(&request);
        assert!(tx.get("from").is_none());
        assert_eq!(tx["value"], "0x0");
    }
}
