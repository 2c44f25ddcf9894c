pub mod abi;
pub mod config;
pub mod eip1193;
pub mod relay_sdk;

pub use abi::AbiAdapter;
pub use config::{enveloping_config_from_lookup, AdapterConfig, RuntimeProfile};
pub use eip1193::Eip1193Adapter;
pub use relay_sdk::RelaySdkAdapter;

use relay_wallet_core::Ports;

/// The port bundle wired to the real adapters.
pub type AppPorts = Ports<Eip1193Adapter, RelaySdkAdapter, AbiAdapter>;

pub fn ports_from_config(config: &AdapterConfig) -> AppPorts {
    Ports::new(
        Eip1193Adapter::with_config(config.clone()),
        RelaySdkAdapter::with_config(config.clone()),
        AbiAdapter,
    )
}
