mod common;

use alloy::primitives::{Address, U256};
use relay_wallet_core::{
    load_wallets_flow, AppError, CoordinatorTask, PortError, RefreshPhase,
};

use common::{connected_coordinator, coordinator_with_wallet, deploy_index, new_ports, owner};

#[tokio::test]
async fn refresh_clears_then_reloads_after_acknowledgement() {
    let ports = new_ports();
    let mut coordinator = coordinator_with_wallet(&ports).await;
    assert_eq!(coordinator.wallets().records().len(), 1);

    coordinator.refresh_signal().request();
    assert!(coordinator.poll().is_none());
    assert_eq!(coordinator.wallets().phase(), RefreshPhase::Clearing);
    assert!(coordinator.wallets().records().is_empty());
    assert!(!coordinator.session().connected);
    assert!(coordinator.selected_wallet().is_none());

    // Nothing is fetched until the views confirm the cleared state.
    assert!(coordinator.poll().is_none());
    assert!(!coordinator.session().connected);

    coordinator.acknowledge_cleared();
    assert!(coordinator.session().connected);
    let request = match coordinator.poll() {
        Some(CoordinatorTask::LoadWallets(request)) => request,
        None => panic!("reload should be dispatched"),
    };
    assert!(coordinator.poll().is_none(), "reload dispatched twice");

    let result = load_wallets_flow(&ports, &request).await;
    coordinator.apply_wallets(&request, result);
    assert_eq!(coordinator.wallets().phase(), RefreshPhase::Idle);
    assert_eq!(coordinator.wallets().records().len(), 1);
    assert!(coordinator.session().connected);
}

#[tokio::test]
async fn listing_includes_deployed_wallets_past_the_tracked_count() {
    let ports = new_ports();
    let mut coordinator = connected_coordinator(&ports).await;
    assert!(coordinator.wallets().records().is_empty());

    let first = deploy_index(&ports, 0).await;
    let second = deploy_index(&ports, 1).await;
    coordinator.refresh_signal().request();
    coordinator.run_pending(&ports).await;

    let records = coordinator.wallets().records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].address, first);
    assert_eq!(records[1].address, second);
    assert!(records.iter().all(|r| r.deployed));
    assert_eq!(coordinator.wallets().token_decimals(), Some(18));
}

#[tokio::test]
async fn new_wallet_adds_one_undeployed_index() {
    let ports = new_ports();
    let mut coordinator = connected_coordinator(&ports).await;
    deploy_index(&ports, 0).await;
    coordinator.refresh_signal().request();
    coordinator.run_pending(&ports).await;
    assert_eq!(coordinator.wallets().records().len(), 1);

    coordinator.request_new_wallet();
    coordinator.run_pending(&ports).await;

    let records = coordinator.wallets().records();
    assert_eq!(records.len(), 2);
    assert!(records[0].deployed);
    assert!(!records[1].deployed);
    assert_eq!(records[1].index, 1);
}

#[tokio::test]
async fn balances_are_read_for_every_wallet() {
    let ports = new_ports();
    let mut coordinator = connected_coordinator(&ports).await;
    let wallet = deploy_index(&ports, 0).await;
    common::fund_tokens(&ports, wallet, U256::from(5_000u64));
    ports
        .wallet
        .debug_set_native_balance(wallet, U256::from(7u64))
        .expect("native balance");

    coordinator.refresh_signal().request();
    coordinator.run_pending(&ports).await;

    let record = &coordinator.wallets().records()[0];
    assert_eq!(record.token_balance, U256::from(5_000u64));
    assert_eq!(record.native_balance, U256::from(7u64));
}

#[tokio::test]
async fn failed_listing_leaves_an_empty_collection() {
    let ports = new_ports();
    let mut coordinator = coordinator_with_wallet(&ports).await;

    ports
        .sdk
        .debug_fail_next(PortError::Transport("relay server unreachable".to_owned()))
        .expect("queue failure");
    coordinator.refresh_signal().request();
    coordinator.run_pending(&ports).await;

    assert!(coordinator.wallets().records().is_empty());
    assert_eq!(coordinator.wallets().phase(), RefreshPhase::Idle);
    assert!(matches!(coordinator.last_error(), Some(AppError::Query(_))));
}

#[tokio::test]
async fn account_change_drops_collection_and_schedules_reload() {
    let ports = new_ports();
    let mut coordinator = coordinator_with_wallet(&ports).await;
    let other = Address::repeat_byte(0x20);

    ports
        .wallet
        .debug_inject_accounts_changed(vec![other])
        .expect("inject accounts");
    coordinator.sync_provider_events(&*ports.wallet);

    assert_eq!(coordinator.session().account, Some(other));
    assert!(coordinator.wallets().records().is_empty());
    assert!(coordinator.selected_wallet().is_none());
    assert!(coordinator.refresh_signal().is_raised());

    coordinator.run_pending(&ports).await;
    assert_eq!(coordinator.wallets().phase(), RefreshPhase::Idle);
    assert!(coordinator.session().connected);
}

#[tokio::test]
async fn listing_for_a_previous_account_is_discarded() {
    let ports = new_ports();
    let mut coordinator = connected_coordinator(&ports).await;
    deploy_index(&ports, 0).await;

    coordinator.refresh_signal().request();
    coordinator.poll();
    coordinator.acknowledge_cleared();
    let Some(CoordinatorTask::LoadWallets(request)) = coordinator.poll() else {
        panic!("reload should be dispatched");
    };

    ports
        .wallet
        .debug_inject_accounts_changed(vec![Address::repeat_byte(0x20)])
        .expect("inject accounts");
    coordinator.sync_provider_events(&*ports.wallet);

    let result = load_wallets_flow(&ports, &request).await;
    coordinator.apply_wallets(&request, result);
    assert!(coordinator.wallets().records().is_empty());
}

#[tokio::test]
async fn switching_to_another_chain_invalidates_the_session() {
    let ports = new_ports();
    let mut coordinator = coordinator_with_wallet(&ports).await;

    ports.wallet.debug_inject_chain_changed(30).expect("inject chain");
    coordinator.sync_provider_events(&*ports.wallet);

    assert!(!coordinator.session().provider_ready);
    assert!(coordinator.modal_target().is_none());
    assert!(matches!(
        coordinator.last_error(),
        Some(AppError::MisconfiguredNetwork {
            expected: 33,
            actual: 30
        })
    ));
}

fn dispatched(coordinator: &mut relay_wallet_core::Coordinator) -> relay_wallet_core::LoadRequest {
    match coordinator.poll() {
        Some(CoordinatorTask::LoadWallets(request)) => request,
        None => panic!("reload should be dispatched"),
    }
}

#[tokio::test]
async fn earlier_listing_for_the_same_owner_is_discarded() {
    let ports = new_ports();
    let mut coordinator = connected_coordinator(&ports).await;
    deploy_index(&ports, 0).await;

    coordinator.refresh_signal().request();
    coordinator.poll();
    coordinator.acknowledge_cleared();
    let first = dispatched(&mut coordinator);

    // Away and back again: the first listing now belongs to an abandoned reload.
    for accounts in [vec![Address::repeat_byte(0x20)], vec![owner()]] {
        ports
            .wallet
            .debug_inject_accounts_changed(accounts)
            .expect("inject accounts");
        coordinator.sync_provider_events(&*ports.wallet);
    }
    coordinator.poll();
    coordinator.acknowledge_cleared();
    let second = dispatched(&mut coordinator);
    assert!(second.generation > first.generation);

    let stale = load_wallets_flow(&ports, &first).await;
    coordinator.apply_wallets(&first, stale);
    assert_eq!(coordinator.wallets().phase(), RefreshPhase::Reloading);
    assert!(coordinator.poll().is_none(), "second listing is still pending");

    let current = load_wallets_flow(&ports, &second).await;
    coordinator.apply_wallets(&second, current);
    assert_eq!(coordinator.wallets().phase(), RefreshPhase::Idle);
    assert_eq!(coordinator.wallets().records().len(), 1);

    coordinator.refresh_signal().request();
    coordinator.run_pending(&ports).await;
    assert_eq!(coordinator.wallets().phase(), RefreshPhase::Idle);
    assert_eq!(coordinator.wallets().records().len(), 1);
}

#[tokio::test]
async fn listing_that_never_ran_ends_the_reload() {
    let ports = new_ports();
    let mut coordinator = connected_coordinator(&ports).await;
    deploy_index(&ports, 0).await;

    coordinator.refresh_signal().request();
    coordinator.poll();
    coordinator.acknowledge_cleared();
    let request = dispatched(&mut coordinator);

    coordinator.apply_wallets(&request, Err(AppError::Query("could not start".to_owned())));
    assert_eq!(coordinator.wallets().phase(), RefreshPhase::Idle);
    assert!(matches!(coordinator.last_error(), Some(AppError::Query(_))));

    coordinator.refresh_signal().request();
    coordinator.run_pending(&ports).await;
    assert_eq!(coordinator.wallets().records().len(), 1);
}

#[tokio::test]
async fn account_loss_while_clearing_restores_connected() {
    let ports = new_ports();
    let mut coordinator = coordinator_with_wallet(&ports).await;

    coordinator.refresh_signal().request();
    coordinator.poll();
    assert_eq!(coordinator.wallets().phase(), RefreshPhase::Clearing);
    assert!(!coordinator.session().connected);

    ports
        .wallet
        .debug_inject_accounts_changed(Vec::new())
        .expect("inject accounts");
    coordinator.sync_provider_events(&*ports.wallet);

    assert_eq!(coordinator.session().account, None);
    assert!(coordinator.session().connected);
    assert_eq!(coordinator.wallets().phase(), RefreshPhase::Idle);
    assert!(coordinator.poll().is_none());
}

#[tokio::test]
async fn chain_switch_while_clearing_invalidates_the_session() {
    let ports = new_ports();
    let mut coordinator = coordinator_with_wallet(&ports).await;

    coordinator.refresh_signal().request();
    coordinator.poll();
    ports.wallet.debug_inject_chain_changed(30).expect("inject chain");
    coordinator.sync_provider_events(&*ports.wallet);

    assert!(!coordinator.session().provider_ready);
    assert!(coordinator.session().connected);
    assert_eq!(coordinator.wallets().phase(), RefreshPhase::Idle);
    assert!(coordinator.poll().is_none());
}
