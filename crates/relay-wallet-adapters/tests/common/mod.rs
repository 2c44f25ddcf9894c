#![allow(dead_code)]

use alloy::primitives::{Address, U256};

use relay_wallet_adapters::{AbiAdapter, AppPorts, Eip1193Adapter, RelaySdkAdapter};
use relay_wallet_core::modals::ModalTarget;
use relay_wallet_core::{ContractAddresses, Coordinator, EnvelopingConfig, Ports, RelaySdkPort};

pub const CHAIN_ID: u64 = 33;

pub fn relay_hub() -> Address {
    "0x66Fa9FEAfB8Db66Fe2160ca7aEAc7FC24e254387"
        .parse()
        .expect("relay hub")
}

pub fn token() -> Address {
    "0x1Af2844A588759D0DE58abD568ADD96BB8B3B6D8"
        .parse()
        .expect("token")
}

pub fn relay_worker() -> Address {
    "0x74105590d404df3f384a099c2e55135281ec6b0f"
        .parse()
        .expect("relay worker")
}

pub fn recipient() -> Address {
    "0x000000000000000000000000000000000000dEaD"
        .parse()
        .expect("recipient")
}

pub fn destination() -> Address {
    "0x000000000000000000000000000000000000CAFE"
        .parse()
        .expect("destination")
}

/// The single account of the deterministic provider.
pub fn owner() -> Address {
    Address::repeat_byte(0x10)
}

pub fn settings() -> EnvelopingConfig {
    EnvelopingConfig {
        chain_id: Some(CHAIN_ID),
        gas_price_factor_percent: Some(0),
        relay_lookup_window_blocks: Some(1_000),
        preferred_relays: vec!["http://localhost:8090".to_owned()],
        contracts: ContractAddresses {
            relay_hub: Some(relay_hub()),
            relay_verifier: Some(Address::repeat_byte(0x02)),
            deploy_verifier: Some(Address::repeat_byte(0x03)),
            smart_wallet_factory: Some(Address::repeat_byte(0x04)),
            token: Some(token()),
            relay_worker: Some(relay_worker()),
            ..ContractAddresses::default()
        },
    }
}

pub fn new_ports() -> AppPorts {
    Ports::new(
        Eip1193Adapter::deterministic(CHAIN_ID),
        RelaySdkAdapter::deterministic(),
        AbiAdapter,
    )
}

pub async fn connected_coordinator(ports: &AppPorts) -> Coordinator {
    let mut coordinator = Coordinator::new(settings(), "0.00005");
    coordinator.connect(ports).await;
    assert!(coordinator.session().provider_ready, "{:?}", coordinator.last_error());
    coordinator.run_pending(ports).await;
    coordinator
}

/// Connects, lists one new smart wallet and selects it.
pub async fn coordinator_with_wallet(ports: &AppPorts) -> Coordinator {
    let mut coordinator = connected_coordinator(ports).await;
    coordinator.request_new_wallet();
    coordinator.run_pending(ports).await;
    let address = coordinator.wallets().records()[0].address;
    assert!(coordinator.select_wallet(address));
    coordinator
}

pub fn target(coordinator: &Coordinator) -> ModalTarget {
    coordinator.modal_target().expect("modal target")
}

/// Marks the `index`-th wallet of the owner deployed in the deterministic SDK.
pub async fn deploy_index(ports: &AppPorts, index: u32) -> Address {
    let derived = ports
        .sdk
        .generate_smart_wallet(owner(), index)
        .await
        .expect("derive");
    ports
        .sdk
        .debug_mark_deployed(derived.address)
        .expect("mark deployed");
    derived.address
}

pub fn fund_tokens(ports: &AppPorts, holder: Address, amount: U256) {
    ports
        .wallet
        .debug_set_token_balance(token(), holder, amount)
        .expect("set token balance");
}
