use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::AppError;

/// In-flight flag of a single modal button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Idle,
    InFlight,
}

impl ButtonState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, ButtonState::InFlight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Submit,
    Complete,
}

/// Phases of the smart wallet list refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPhase {
    #[default]
    Idle,
    /// Collection emptied, waiting for the views to confirm they dropped it.
    Clearing,
    /// Views confirmed; the collection is being reloaded.
    Reloading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshAction {
    Request,
    AcknowledgeCleared,
    /// First load after connecting; nothing is displayed yet so no clear phase.
    StartLoad,
    Loaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition<S> {
    pub from: S,
    pub to: S,
    pub reason: &'static str,
}

/// `label` names the button in the `Busy` error.
pub fn button_transition(
    state: ButtonState,
    action: ButtonAction,
    label: &'static str,
) -> Result<(ButtonState, StateTransition<ButtonState>), AppError> {
    let (to, reason) = match (state, action) {
        (ButtonState::Idle, ButtonAction::Submit) => (ButtonState::InFlight, "submitted"),
        (ButtonState::InFlight, ButtonAction::Complete) => (ButtonState::Idle, "completed"),
        (ButtonState::InFlight, ButtonAction::Submit) => return Err(AppError::Busy(label)),
        (ButtonState::Idle, ButtonAction::Complete) => {
            return Err(illegal("button", state, action));
        }
    };
    Ok((
        to,
        StateTransition {
            from: state,
            to,
            reason,
        },
    ))
}

pub fn refresh_transition(
    phase: RefreshPhase,
    action: RefreshAction,
) -> Result<(RefreshPhase, StateTransition<RefreshPhase>), AppError> {
    use RefreshAction as A;
    use RefreshPhase as P;

    let (to, reason) = match (phase, action) {
        (P::Idle, A::Request) => (P::Clearing, "refresh requested"),
        (P::Idle, A::StartLoad) => (P::Reloading, "initial load"),
        (P::Clearing, A::AcknowledgeCleared) => (P::Reloading, "views cleared"),
        (P::Reloading, A::Loaded) => (P::Idle, "collection replaced"),
        _ => return Err(illegal("refresh", phase, action)),
    };
    Ok((
        to,
        StateTransition {
            from: phase,
            to,
            reason,
        },
    ))
}

fn illegal(machine: &str, state: impl Debug, action: impl Debug) -> AppError {
    AppError::Validation(format!(
        "illegal {machine} transition: {state:?} -> {action:?}"
    ))
}

/// Edge-triggered request for a smart wallet list reload. Clones share the
/// same flag, so modals can raise it without knowing how the list is fetched.
#[derive(Debug, Clone, Default)]
pub struct RefreshSignal {
    raised: Arc<AtomicBool>,
}

impl RefreshSignal {
    pub fn request(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Consumes the signal, returning whether it was raised.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::SeqCst)
    }
}
