use alloy::primitives::{address, Address};
use relay_wallet_core::{AppError, ContractAddresses, EnvelopingConfig};

fn complete_settings() -> EnvelopingConfig {
    EnvelopingConfig {
        chain_id: Some(33),
        gas_price_factor_percent: Some(10),
        relay_lookup_window_blocks: Some(1000),
        preferred_relays: vec!["http://localhost:8090".to_owned()],
        contracts: ContractAddresses {
            relay_hub: Some(address!("0000000000000000000000000000000000000001")),
            relay_verifier: Some(address!("0000000000000000000000000000000000000002")),
            deploy_verifier: Some(address!("0000000000000000000000000000000000000003")),
            smart_wallet_factory: Some(address!("0000000000000000000000000000000000000004")),
            token: Some(address!("0000000000000000000000000000000000000005")),
            ..ContractAddresses::default()
        },
    }
}

#[test]
fn complete_settings_resolve() {
    let config = complete_settings().resolve().expect("resolves");
    assert_eq!(config.chain_id, 33);
    assert_eq!(config.token, address!("0000000000000000000000000000000000000005"));
    assert_eq!(config.relay_worker, None);
    assert_eq!(config.optional.penalizer, None);
}

#[test]
fn every_missing_address_is_named() {
    let mut settings = complete_settings();
    settings.contracts.relay_hub = None;
    settings.contracts.token = Some(Address::ZERO);
    let err = settings.resolve().expect_err("must fail");
    match err {
        AppError::SdkInit(message) => {
            assert!(message.contains("CONTRACTS_RELAY_HUB"));
            assert!(message.contains("CONTRACTS_RIF_TOKEN"));
            assert!(!message.contains("CONTRACTS_RELAY_VERIFIER"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_chain_id_is_an_init_error() {
    let mut settings = complete_settings();
    settings.chain_id = None;
    assert!(matches!(settings.resolve(), Err(AppError::SdkInit(_))));
}

#[test]
fn optional_addresses_pass_through_only_when_set() {
    let mut settings = complete_settings();
    settings.contracts.penalizer = Some(address!("00000000000000000000000000000000000000aa"));
    settings.contracts.sample_recipient = Some(Address::ZERO);
    let config = settings.resolve().expect("resolves");
    assert_eq!(
        config.optional.penalizer,
        Some(address!("00000000000000000000000000000000000000aa"))
    );
    assert_eq!(config.optional.sample_recipient, None);
    let json = serde_json::to_value(&config).expect("serializes");
    assert!(json["optional"]["penalizer"].is_string());
}
