use relay_wallet_core::{
    button_transition, refresh_transition, AppError, ButtonAction, ButtonState, RefreshAction,
    RefreshPhase, RefreshSignal,
};

#[test]
fn button_submit_complete_path() {
    let (s1, t1) = button_transition(ButtonState::Idle, ButtonAction::Submit, "execute")
        .expect("idle -> in flight");
    assert_eq!(s1, ButtonState::InFlight);
    assert_eq!(t1.from, ButtonState::Idle);
    let (s2, _) =
        button_transition(s1, ButtonAction::Complete, "execute").expect("in flight -> idle");
    assert_eq!(s2, ButtonState::Idle);
}

#[test]
fn second_submit_while_in_flight_is_busy() {
    let err = button_transition(ButtonState::InFlight, ButtonAction::Submit, "estimate")
        .expect_err("must fail");
    assert_eq!(err, AppError::Busy("estimate"));
    assert_eq!(err.to_string(), "estimate is already in progress");
}

#[test]
fn button_complete_without_submit_is_rejected() {
    let err = button_transition(ButtonState::Idle, ButtonAction::Complete, "deploy")
        .expect_err("must fail");
    assert!(err.to_string().contains("illegal button transition"));
}

#[test]
fn refresh_cycle_transitions() {
    let (s1, _) =
        refresh_transition(RefreshPhase::Idle, RefreshAction::Request).expect("idle -> clearing");
    assert_eq!(s1, RefreshPhase::Clearing);
    let (s2, _) = refresh_transition(s1, RefreshAction::AcknowledgeCleared)
        .expect("clearing -> reloading");
    assert_eq!(s2, RefreshPhase::Reloading);
    let (s3, t3) = refresh_transition(s2, RefreshAction::Loaded).expect("reloading -> idle");
    assert_eq!(s3, RefreshPhase::Idle);
    assert_eq!(t3.reason, "collection replaced");
}

#[test]
fn initial_load_skips_the_clear_phase() {
    let (s1, _) = refresh_transition(RefreshPhase::Idle, RefreshAction::StartLoad)
        .expect("idle -> reloading");
    assert_eq!(s1, RefreshPhase::Reloading);
}

#[test]
fn reload_before_acknowledgement_is_rejected() {
    let err = refresh_transition(RefreshPhase::Clearing, RefreshAction::Loaded)
        .expect_err("must fail");
    assert!(err.to_string().contains("illegal refresh transition"));
    let err = refresh_transition(RefreshPhase::Reloading, RefreshAction::Request)
        .expect_err("must fail");
    assert!(err.to_string().contains("illegal refresh transition"));
}

#[test]
fn refresh_signal_is_shared_and_edge_triggered() {
    let signal = RefreshSignal::default();
    let handed_to_modal = signal.clone();
    assert!(!signal.take());
    handed_to_modal.request();
    assert!(signal.is_raised());
    assert!(signal.take());
    assert!(!signal.take());
    assert!(!handed_to_modal.is_raised());
}
