use alloy::primitives::Address;

use relay_wallet_core::{ContractAddresses, EnvelopingConfig, DEFAULT_TOKEN_PRICE_NATIVE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeProfile {
    /// Adapters without a real backend are disabled.
    #[default]
    Production,
    /// In-memory provider and relaying client stand in for missing backends.
    /// Only ever chosen explicitly.
    Deterministic,
}

impl RuntimeProfile {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(RuntimeProfile::Production),
            "deterministic" => Some(RuntimeProfile::Deterministic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub runtime_profile: RuntimeProfile,
    pub eip1193_proxy_url: Option<String>,
    pub sdk_bridge_url: Option<String>,
    pub request_timeout_ms: u64,
    pub token_price_native: String,
    pub enveloping: EnvelopingConfig,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            runtime_profile: RuntimeProfile::Production,
            eip1193_proxy_url: None,
            sdk_bridge_url: None,
            request_timeout_ms: 15_000,
            token_price_native: DEFAULT_TOKEN_PRICE_NATIVE.to_owned(),
            enveloping: EnvelopingConfig::default(),
        }
    }
}

impl AdapterConfig {
    /// Process environment on native; values baked in at build time on wasm.
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        return Self::from_lookup(|key| std::env::var(key).ok());

        #[cfg(target_arch = "wasm32")]
        return Self::from_lookup(build_time_var);
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let runtime_profile = match var("RELAY_WALLET_RUNTIME_PROFILE") {
            Some(raw) => RuntimeProfile::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "unknown runtime profile, using production");
                RuntimeProfile::Production
            }),
            None => defaults.runtime_profile,
        };

        Self {
            runtime_profile,
            eip1193_proxy_url: var("RELAY_WALLET_EIP1193_PROXY_URL"),
            sdk_bridge_url: var("RELAY_WALLET_SDK_BRIDGE_URL"),
            request_timeout_ms: parse_var(&var, "RELAY_WALLET_REQUEST_TIMEOUT_MS")
                .unwrap_or(defaults.request_timeout_ms),
            token_price_native: var("RELAY_WALLET_TOKEN_PRICE_NATIVE")
                .unwrap_or(defaults.token_price_native),
            enveloping: enveloping_config_from_lookup(&var),
        }
    }

    /// Whether a missing backend is replaced by an in-memory one.
    pub fn deterministic_fallback(&self) -> bool {
        self.runtime_profile == RuntimeProfile::Deterministic
    }
}

/// Relaying client overrides. Unparseable values are logged and left unset.
pub fn enveloping_config_from_lookup<F>(lookup: F) -> EnvelopingConfig
where
    F: Fn(&str) -> Option<String>,
{
    let address = |key: &str| -> Option<Address> {
        let raw = lookup(key)?;
        match raw.trim().parse() {
            Ok(a) => Some(a),
            Err(e) => {
                tracing::warn!(key, value = %raw, error = %e, "ignoring invalid address");
                None
            }
        }
    };

    let preferred_relays = lookup("RIF_RELAY_PREFERRED_RELAYS")
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    EnvelopingConfig {
        chain_id: parse_var(&lookup, "RIF_RELAY_CHAIN_ID"),
        gas_price_factor_percent: parse_var(&lookup, "RIF_RELAY_GAS_PRICE_FACTOR_PERCENT"),
        relay_lookup_window_blocks: parse_var(&lookup, "RIF_RELAY_LOOKUP_WINDOW_BLOCKS"),
        preferred_relays,
        contracts: ContractAddresses {
            relay_hub: address("CONTRACTS_RELAY_HUB"),
            relay_verifier: address("CONTRACTS_RELAY_VERIFIER"),
            deploy_verifier: address("CONTRACTS_DEPLOY_VERIFIER"),
            smart_wallet_factory: address("CONTRACTS_SMART_WALLET_FACTORY"),
            smart_wallet: address("CONTRACTS_SMART_WALLET"),
            token: address("CONTRACTS_RIF_TOKEN"),
            relay_worker: address("CONTRACTS_RELAY_WORKER"),
            penalizer: address("CONTRACTS_PENALIZER"),
            custom_smart_wallet: address("CONTRACTS_CUSTOM_SMART_WALLET"),
            custom_smart_wallet_factory: address("CONTRACTS_CUSTOM_SMART_WALLET_FACTORY"),
            custom_smart_wallet_deploy_verifier: address(
                "CONTRACTS_CUSTOM_SMART_WALLET_DEPLOY_VERIFIER",
            ),
            custom_smart_wallet_relay_verifier: address(
                "CONTRACTS_CUSTOM_SMART_WALLET_RELAY_VERIFIER",
            ),
            sample_recipient: address("CONTRACTS_SAMPLE_RECIPIENT"),
        },
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "ignoring invalid setting");
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn build_time_var(key: &str) -> Option<String> {
    let value = match key {
        "RIF_RELAY_CHAIN_ID" => option_env!("RIF_RELAY_CHAIN_ID"),
        "RIF_RELAY_GAS_PRICE_FACTOR_PERCENT" => option_env!("RIF_RELAY_GAS_PRICE_FACTOR_PERCENT"),
        "RIF_RELAY_LOOKUP_WINDOW_BLOCKS" => option_env!("RIF_RELAY_LOOKUP_WINDOW_BLOCKS"),
        "RIF_RELAY_PREFERRED_RELAYS" => option_env!("RIF_RELAY_PREFERRED_RELAYS"),
        "CONTRACTS_RELAY_HUB" => option_env!("CONTRACTS_RELAY_HUB"),
        "CONTRACTS_RELAY_VERIFIER" => option_env!("CONTRACTS_RELAY_VERIFIER"),
        "CONTRACTS_DEPLOY_VERIFIER" => option_env!("CONTRACTS_DEPLOY_VERIFIER"),
        "CONTRACTS_SMART_WALLET_FACTORY" => option_env!("CONTRACTS_SMART_WALLET_FACTORY"),
        "CONTRACTS_SMART_WALLET" => option_env!("CONTRACTS_SMART_WALLET"),
        "CONTRACTS_RIF_TOKEN" => option_env!("CONTRACTS_RIF_TOKEN"),
        "CONTRACTS_RELAY_WORKER" => option_env!("CONTRACTS_RELAY_WORKER"),
        "CONTRACTS_PENALIZER" => option_env!("CONTRACTS_PENALIZER"),
        "CONTRACTS_CUSTOM_SMART_WALLET" => option_env!("CONTRACTS_CUSTOM_SMART_WALLET"),
        "CONTRACTS_CUSTOM_SMART_WALLET_FACTORY" => {
            option_env!("CONTRACTS_CUSTOM_SMART_WALLET_FACTORY")
        }
        "CONTRACTS_CUSTOM_SMART_WALLET_DEPLOY_VERIFIER" => {
            option_env!("CONTRACTS_CUSTOM_SMART_WALLET_DEPLOY_VERIFIER")
        }
        "CONTRACTS_CUSTOM_SMART_WALLET_RELAY_VERIFIER" => {
            option_env!("CONTRACTS_CUSTOM_SMART_WALLET_RELAY_VERIFIER")
        }
        "CONTRACTS_SAMPLE_RECIPIENT" => option_env!("CONTRACTS_SAMPLE_RECIPIENT"),
        "RELAY_WALLET_TOKEN_PRICE_NATIVE" => option_env!("RELAY_WALLET_TOKEN_PRICE_NATIVE"),
        "RELAY_WALLET_SDK_BRIDGE_URL" => option_env!("RELAY_WALLET_SDK_BRIDGE_URL"),
        "RELAY_WALLET_RUNTIME_PROFILE" => option_env!("RELAY_WALLET_RUNTIME_PROFILE"),
        "RELAY_WALLET_REQUEST_TIMEOUT_MS" => option_env!("RELAY_WALLET_REQUEST_TIMEOUT_MS"),
        _ => None,
    };
    value.map(str::to_owned)
}
