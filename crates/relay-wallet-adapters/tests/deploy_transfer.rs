mod common;

use alloy::primitives::U256;

use relay_wallet_core::contracts::{direct_execute_data, transfer_data};
use relay_wallet_core::modals::deploy::run_deploy;
use relay_wallet_core::modals::{
    DeployField, DeployModal, ReceiveModal, TransferField, TransferModal,
};
use relay_wallet_core::ExecuteMode;

use common::{coordinator_with_wallet, new_ports, recipient, target, token};

#[tokio::test]
async fn deploy_marks_the_wallet_deployed_after_refresh() {
    let ports = new_ports();
    let mut coordinator = coordinator_with_wallet(&ports).await;
    let address = coordinator.selected_wallet().expect("selected").address;

    let mut modal = DeployModal::new(coordinator.refresh_signal());
    modal.update(DeployField::Fees("0".to_owned()));
    let feedback = modal.submit_deploy(&ports, &target(&coordinator)).await;
    assert!(!feedback.is_error(), "{}", feedback.message);
    assert!(feedback.close);
    assert!(coordinator.refresh_signal().is_raised());

    coordinator.run_pending(&ports).await;
    let record = coordinator.wallets().find(address).expect("listed");
    assert!(record.deployed);
    assert!(ports
        .sdk
        .call_log()
        .expect("log")
        .contains(&"deploy_smart_wallet".to_owned()));
}

#[tokio::test]
async fn deploying_twice_is_rejected_client_side() {
    let ports = new_ports();
    let mut coordinator = coordinator_with_wallet(&ports).await;
    let address = coordinator.selected_wallet().expect("selected").address;
    let mut modal = DeployModal::new(coordinator.refresh_signal());
    modal.submit_deploy(&ports, &target(&coordinator)).await;
    coordinator.run_pending(&ports).await;
    assert!(coordinator.select_wallet(address));

    let feedback = modal.submit_deploy(&ports, &target(&coordinator)).await;
    assert!(feedback.is_error());
    assert!(feedback.message.contains("already deployed"));
    let deploys = ports
        .sdk
        .call_log()
        .expect("log")
        .iter()
        .filter(|m| *m == "deploy_smart_wallet")
        .count();
    assert_eq!(deploys, 1);
}

#[tokio::test]
async fn relayed_transfer_calls_the_token_contract() {
    let ports = new_ports();
    let mut coordinator = coordinator_with_wallet(&ports).await;
    let address = common::deploy_index(&ports, 0).await;
    coordinator.refresh_signal().request();
    coordinator.run_pending(&ports).await;
    assert!(coordinator.select_wallet(address));

    let mut modal = TransferModal::new(coordinator.refresh_signal());
    modal.update(TransferField::Recipient(recipient().to_string()));
    modal.update(TransferField::Amount("1.5".to_owned()));
    modal.update(TransferField::Fees("0.1".to_owned()));
    let feedback = modal.submit_transfer(&ports, &target(&coordinator)).await;
    assert!(!feedback.is_error(), "{}", feedback.message);
    assert!(coordinator.refresh_signal().is_raised());
    assert_eq!(modal.form().amount, "");

    let relayed = ports.sdk.relayed_calls().expect("relayed");
    assert_eq!(relayed.len(), 1);
    let (call, wallet, fee) = &relayed[0];
    assert_eq!(call.to, token());
    assert_eq!(
        call.data,
        transfer_data(recipient(), U256::from(1_500_000_000_000_000_000u64))
    );
    assert_eq!(wallet.address, address);
    assert_eq!(*fee, U256::from(100_000_000_000_000_000u64));
}

#[tokio::test]
async fn direct_transfer_goes_through_direct_execute() {
    let ports = new_ports();
    let coordinator = coordinator_with_wallet(&ports).await;
    ports
        .wallet
        .debug_set_token_decimals(token(), 6)
        .expect("decimals");
    let target = target(&coordinator);

    let mut modal = TransferModal::new(coordinator.refresh_signal());
    modal.update(TransferField::Recipient(recipient().to_string()));
    modal.update(TransferField::Amount("2".to_owned()));
    modal.update(TransferField::Mode(ExecuteMode::Direct));
    let feedback = modal.submit_transfer(&ports, &target).await;
    assert!(!feedback.is_error(), "{}", feedback.message);

    let sent = ports.wallet.sent_transactions().expect("sent");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, target.wallet.address);
    assert_eq!(
        sent[0].data,
        direct_execute_data(token(), transfer_data(recipient(), U256::from(2_000_000u64)))
    );
    assert!(ports.sdk.relayed_calls().expect("relayed").is_empty());
}

#[tokio::test]
async fn zero_amount_transfer_is_rejected() {
    let ports = new_ports();
    let coordinator = coordinator_with_wallet(&ports).await;
    let mut modal = TransferModal::new(coordinator.refresh_signal());
    modal.update(TransferField::Recipient(recipient().to_string()));
    modal.update(TransferField::Amount("0".to_owned()));

    let feedback = modal.submit_transfer(&ports, &target(&coordinator)).await;
    assert!(feedback.is_error());
    assert!(feedback.message.contains("greater than zero"));
    assert_eq!(modal.form().amount, "0");
    assert!(!coordinator.refresh_signal().is_raised());
}

#[tokio::test]
async fn receive_shows_the_checksummed_address() {
    let ports = new_ports();
    let coordinator = coordinator_with_wallet(&ports).await;
    let wallet = coordinator.selected_wallet().expect("selected");

    let mut modal = ReceiveModal::default();
    modal.open(wallet);
    let view = modal.view().expect("view");
    assert_eq!(view.address, wallet.address.to_checksum(None));
    assert!(!view.deployed);
    assert!(modal.shows(wallet.address));

    modal.close();
    assert!(modal.view().is_none());
}

#[tokio::test]
async fn deploy_landing_after_close_keeps_the_reopened_form() {
    let ports = new_ports();
    let coordinator = coordinator_with_wallet(&ports).await;
    let target = target(&coordinator);
    let mut modal = DeployModal::new(coordinator.refresh_signal());
    modal.update(DeployField::Fees("0".to_owned()));

    let submission = modal.begin_deploy().expect("deploy");
    modal.close();
    modal.update(DeployField::Fees("3".to_owned()));
    let result = run_deploy(&ports, &target, &submission.form).await;
    let feedback = modal.finish_deploy(&submission, result);

    assert!(!feedback.is_error(), "{}", feedback.message);
    assert!(!feedback.close);
    assert_eq!(modal.form().fees, "3");
    assert!(coordinator.refresh_signal().is_raised());
}
