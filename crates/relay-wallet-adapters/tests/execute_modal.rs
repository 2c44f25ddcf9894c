mod common;

use alloy::primitives::U256;

use relay_wallet_core::contracts::direct_execute_data;
use relay_wallet_core::modals::execute::{run_estimate, run_execute};
use relay_wallet_core::modals::{ExecuteField, ExecuteForm, ExecuteModal};
use relay_wallet_core::{AbiPort, AppError, ButtonState, ExecuteMode};

use common::{coordinator_with_wallet, destination, fund_tokens, new_ports, target};

const RELAYED_ESTIMATE: &str = "estimate_max_possible_relay_gas_with_linear_fit";

fn fill_call(modal: &mut ExecuteModal) {
    modal.update(ExecuteField::Contract(destination().to_string()));
    modal.update(ExecuteField::Function("setValue(uint256)".to_owned()));
    modal.update(ExecuteField::Values("42".to_owned()));
}

#[tokio::test]
async fn token_estimate_without_balance_keeps_fees() {
    let ports = new_ports();
    let coordinator = coordinator_with_wallet(&ports).await;
    let mut modal = ExecuteModal::new(coordinator.refresh_signal());
    fill_call(&mut modal);
    modal.update(ExecuteField::Fees("1.5".to_owned()));

    let feedback = modal
        .submit_estimate(&ports, &target(&coordinator), coordinator.token_price_native())
        .await;

    assert!(feedback.is_error());
    assert_eq!(feedback.message, AppError::InsufficientBalance.to_string());
    assert_eq!(modal.form().fees, "1.5");
    assert_eq!(modal.estimate_state(), ButtonState::Idle);
    assert!(!ports
        .sdk
        .call_log()
        .expect("log")
        .contains(&RELAYED_ESTIMATE.to_owned()));
}

#[tokio::test]
async fn native_estimate_sets_fees_to_the_gas_estimate() {
    let ports = new_ports();
    let coordinator = coordinator_with_wallet(&ports).await;
    ports.wallet.debug_set_gas_estimate(54_321).expect("gas");
    let mut modal = ExecuteModal::new(coordinator.refresh_signal());
    fill_call(&mut modal);
    modal.update(ExecuteField::Mode(ExecuteMode::Direct));

    let feedback = modal
        .submit_estimate(&ports, &target(&coordinator), coordinator.token_price_native())
        .await;

    assert!(!feedback.is_error(), "{}", feedback.message);
    assert_eq!(modal.form().fees, "54321");
    assert!(!ports
        .sdk
        .call_log()
        .expect("log")
        .contains(&RELAYED_ESTIMATE.to_owned()));
}

#[tokio::test]
async fn token_estimate_converts_native_cost_with_the_token_price() {
    let ports = new_ports();
    let coordinator = coordinator_with_wallet(&ports).await;
    let smart_wallet = coordinator.selected_wallet().expect("selected").address;
    fund_tokens(&ports, smart_wallet, U256::from(10u64).pow(U256::from(18u64)));
    // 0.001 native
    ports
        .sdk
        .debug_set_relay_estimate(U256::from(1_000_000_000_000_000u64))
        .expect("estimate");
    let mut modal = ExecuteModal::new(coordinator.refresh_signal());
    fill_call(&mut modal);

    let feedback = modal
        .submit_estimate(&ports, &target(&coordinator), "0.5")
        .await;

    assert!(!feedback.is_error(), "{}", feedback.message);
    assert_eq!(modal.form().fees, "0.002000000000000000");
}

#[tokio::test]
async fn direct_execution_never_touches_the_relay() {
    let ports = new_ports();
    let coordinator = coordinator_with_wallet(&ports).await;
    let target = target(&coordinator);
    let mut modal = ExecuteModal::new(coordinator.refresh_signal());
    fill_call(&mut modal);
    modal.update(ExecuteField::Mode(ExecuteMode::Direct));

    let feedback = modal.submit_execute(&ports, &target).await;
    assert!(!feedback.is_error(), "{}", feedback.message);
    assert!(feedback.close);

    let sent = ports.wallet.sent_transactions().expect("sent");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].from, Some(common::owner()));
    assert_eq!(sent[0].to, target.wallet.address);
    let inner = ports
        .abi
        .encode_function_call("setValue(uint256)", "42")
        .expect("encode");
    assert_eq!(sent[0].data, direct_execute_data(destination(), inner));

    let log = ports.sdk.call_log().expect("log");
    assert!(!log.contains(&"relay_transaction".to_owned()));
    assert!(!log.contains(&RELAYED_ESTIMATE.to_owned()));
    assert!(coordinator.refresh_signal().is_raised());
}

#[tokio::test]
async fn relayed_execution_confirms_the_relayed_event() {
    let ports = new_ports();
    let mut coordinator = coordinator_with_wallet(&ports).await;
    common::deploy_index(&ports, 0).await;
    coordinator.refresh_signal().request();
    coordinator.run_pending(&ports).await;
    let address = coordinator.wallets().records()[0].address;
    assert!(coordinator.select_wallet(address));
    let target = target(&coordinator);

    let mut modal = ExecuteModal::new(coordinator.refresh_signal());
    fill_call(&mut modal);
    modal.update(ExecuteField::Fees("0.25".to_owned()));
    let feedback = modal.submit_execute(&ports, &target).await;
    assert!(!feedback.is_error(), "{}", feedback.message);
    assert!(feedback.close);
    assert!(coordinator.refresh_signal().is_raised());
    assert_eq!(modal.form().contract, "");

    let relayed = ports.sdk.relayed_calls().expect("relayed");
    assert_eq!(relayed.len(), 1);
    let (call, wallet, fee) = &relayed[0];
    assert_eq!(call.to, destination());
    assert_eq!(wallet.token_address, common::token());
    assert_eq!(wallet.address, address);
    assert_eq!(*fee, U256::from(250_000_000_000_000_000u64));
    assert!(ports.wallet.sent_transactions().expect("sent").is_empty());
}

#[tokio::test]
async fn show_return_data_keeps_the_modal_open() {
    let ports = new_ports();
    let coordinator = coordinator_with_wallet(&ports).await;
    let mut modal = ExecuteModal::new(coordinator.refresh_signal());
    fill_call(&mut modal);
    modal.update(ExecuteField::Mode(ExecuteMode::Direct));
    modal.update(ExecuteField::ShowReturnData(true));

    let feedback = modal.submit_execute(&ports, &target(&coordinator)).await;
    assert!(!feedback.is_error(), "{}", feedback.message);
    assert!(!feedback.close);
    assert!(modal.results().expect("results").contains("transactionHash"));
    assert!(!coordinator.refresh_signal().is_raised());

    modal.close();
    assert!(modal.results().is_none());
    assert_eq!(modal.form(), &ExecuteForm::default());
}

#[tokio::test]
async fn second_submit_while_in_flight_is_busy() {
    let ports = new_ports();
    let coordinator = coordinator_with_wallet(&ports).await;
    let mut modal = ExecuteModal::new(coordinator.refresh_signal());
    fill_call(&mut modal);

    modal.begin_execute().expect("first submit");
    assert_eq!(modal.execute_state(), ButtonState::InFlight);
    assert_eq!(modal.begin_execute(), Err(AppError::Busy("execute")));
    // The estimate button has its own flag.
    assert!(modal.begin_estimate().is_ok());
}

#[tokio::test]
async fn invalid_contract_address_is_a_validation_error() {
    let ports = new_ports();
    let coordinator = coordinator_with_wallet(&ports).await;
    let mut modal = ExecuteModal::new(coordinator.refresh_signal());
    fill_call(&mut modal);
    modal.update(ExecuteField::Contract("0x1234".to_owned()));

    let feedback = modal.submit_execute(&ports, &target(&coordinator)).await;
    assert!(feedback.is_error());
    assert!(feedback.message.starts_with("invalid input"));
    assert!(ports.sdk.relayed_calls().expect("relayed").is_empty());
}

#[tokio::test]
async fn estimate_finishing_after_close_leaves_the_new_form_alone() {
    let ports = new_ports();
    let coordinator = coordinator_with_wallet(&ports).await;
    ports.wallet.debug_set_gas_estimate(54_321).expect("gas");
    let target = target(&coordinator);
    let mut modal = ExecuteModal::new(coordinator.refresh_signal());
    fill_call(&mut modal);
    modal.update(ExecuteField::Mode(ExecuteMode::Direct));

    let submission = modal.begin_estimate().expect("estimate");
    modal.close();
    fill_call(&mut modal);
    let result = run_estimate(&ports, &target, &submission.form, "0.5").await;
    let feedback = modal.finish_estimate(&submission, result);

    assert!(!feedback.is_error());
    assert!(!feedback.close);
    assert_eq!(modal.form().fees, "");
    assert_eq!(modal.estimate_state(), ButtonState::Idle);
}

#[tokio::test]
async fn execute_follows_the_return_data_choice_made_at_submit() {
    let ports = new_ports();
    let coordinator = coordinator_with_wallet(&ports).await;
    let target = target(&coordinator);
    let mut modal = ExecuteModal::new(coordinator.refresh_signal());
    fill_call(&mut modal);
    modal.update(ExecuteField::Mode(ExecuteMode::Direct));
    modal.update(ExecuteField::ShowReturnData(true));

    let submission = modal.begin_execute().expect("execute");
    modal.update(ExecuteField::ShowReturnData(false));
    let result = run_execute(&ports, &target, &submission.form).await;
    let feedback = modal.finish_execute(&submission, result);

    assert!(!feedback.close);
    assert!(modal.results().is_some());
    assert!(!coordinator.refresh_signal().is_raised());
}

#[tokio::test]
async fn execute_finishing_after_close_only_refreshes() {
    let ports = new_ports();
    let coordinator = coordinator_with_wallet(&ports).await;
    let target = target(&coordinator);
    let mut modal = ExecuteModal::new(coordinator.refresh_signal());
    fill_call(&mut modal);
    modal.update(ExecuteField::Mode(ExecuteMode::Direct));
    modal.update(ExecuteField::ShowReturnData(true));

    let submission = modal.begin_execute().expect("execute");
    modal.close();
    let result = run_execute(&ports, &target, &submission.form).await;
    let feedback = modal.finish_execute(&submission, result);

    assert!(!feedback.is_error(), "{}", feedback.message);
    assert!(!feedback.close);
    assert!(modal.results().is_none());
    assert_eq!(modal.form(), &ExecuteForm::default());
    assert!(coordinator.refresh_signal().is_raised());
    assert_eq!(modal.execute_state(), ButtonState::Idle);
}
