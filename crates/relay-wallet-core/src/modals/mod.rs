//! Action dialogs. Each keeps its form and per-button in-flight flags; the
//! async work runs in free `run_*` functions so the shell can move it onto a
//! background task and hand the result back with `finish_*`.

pub mod deploy;
pub mod execute;
pub mod receive;
pub mod transfer;

pub use deploy::{DeployField, DeployForm, DeployModal};
pub use execute::{ExecuteField, ExecuteForm, ExecuteModal, ExecuteOutcome};
pub use receive::{ReceiveModal, ReceiveView};
pub use transfer::{TransferField, TransferForm, TransferModal};

use alloy::primitives::Address;

use crate::domain::SmartWalletRecord;
use crate::error::AppError;
use crate::session::ProviderSession;
use crate::state_machine::{button_transition, ButtonAction, ButtonState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Deploy,
    Receive,
    Transfer,
    Execute,
}

impl ModalKind {
    pub fn title(&self) -> &'static str {
        match self {
            ModalKind::Deploy => "Deploy Smart Wallet",
            ModalKind::Receive => "Receive",
            ModalKind::Transfer => "Transfer",
            ModalKind::Execute => "Execute",
        }
    }
}

/// Everything a modal operation acts on, captured when it is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalTarget {
    pub session: ProviderSession,
    pub wallet: SmartWalletRecord,
    pub account: Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

/// What the shell should show after an operation completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalFeedback {
    pub kind: FeedbackKind,
    pub message: String,
    pub close: bool,
}

impl ModalFeedback {
    pub fn success(message: impl Into<String>, close: bool) -> Self {
        Self {
            kind: FeedbackKind::Success,
            message: message.into(),
            close,
        }
    }

    pub fn error(err: &AppError) -> Self {
        Self {
            kind: FeedbackKind::Error,
            message: err.to_string(),
            close: false,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == FeedbackKind::Error
    }
}

/// Form contents captured when a button is pressed. `opened` identifies the
/// opening of the modal it came from; closing the modal starts a new one, so
/// a late result can tell that its form is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission<F> {
    pub form: F,
    pub opened: u64,
}

/// Superficial address check of a form field.
pub fn parse_address_input(input: &str, field: &str) -> Result<Address, AppError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    trimmed
        .parse()
        .map_err(|e| AppError::Validation(format!("{field} is not a valid address: {e}")))
}

fn submit(state: &mut ButtonState, label: &'static str) -> Result<(), AppError> {
    let (next, _) = button_transition(*state, ButtonAction::Submit, label)?;
    *state = next;
    Ok(())
}

fn complete(state: &mut ButtonState, label: &'static str) {
    match button_transition(*state, ButtonAction::Complete, label) {
        Ok((next, _)) => *state = next,
        Err(e) => tracing::warn!(error = %e, "completion without submit"),
    }
}
