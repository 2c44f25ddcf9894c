//! Shell-side state of the modal windows.

use alloy::primitives::B256;

use relay_wallet_core::modals::{
    DeployForm, DeployModal, ExecuteForm, ExecuteModal, ExecuteOutcome, ReceiveModal,
    Submission, TransferForm, TransferModal,
};
use relay_wallet_core::{AppError, ModalFeedback, ModalKind, ModalTarget, RefreshSignal, RelayReceipt};

use crate::tasks::TaskSlot;

/// A finished modal operation with the submission it ran for.
pub type Finished<F, T> = (Submission<F>, Result<T, AppError>);

/// Result slots of the modal operations.
#[derive(Default)]
pub struct ModalTasks {
    pub deploy: TaskSlot<Finished<DeployForm, RelayReceipt>>,
    pub transfer: TaskSlot<Finished<TransferForm, B256>>,
    pub execute: TaskSlot<Finished<ExecuteForm, ExecuteOutcome>>,
    pub estimate: TaskSlot<Finished<ExecuteForm, String>>,
    pub paste: TaskSlot<Option<String>>,
}

pub struct ModalsState {
    pub open: Option<ModalKind>,
    /// Wallet and session the open modal acts on, captured when it opened.
    pub target: Option<ModalTarget>,
    pub feedback: Option<ModalFeedback>,
    pub paste_warning: Option<String>,
    pub deploy: DeployModal,
    pub transfer: TransferModal,
    pub execute: ExecuteModal,
    pub receive: ReceiveModal,
    pub tasks: ModalTasks,
}

impl ModalsState {
    pub fn new(refresh: RefreshSignal) -> Self {
        Self {
            open: None,
            target: None,
            feedback: None,
            paste_warning: None,
            deploy: DeployModal::new(refresh.clone()),
            transfer: TransferModal::new(refresh.clone()),
            execute: ExecuteModal::new(refresh),
            receive: ReceiveModal::default(),
            tasks: ModalTasks::default(),
        }
    }

    pub fn open(&mut self, kind: ModalKind, target: ModalTarget) {
        if self.open.is_some() {
            self.close();
        }
        if kind == ModalKind::Receive {
            self.receive.open(&target.wallet);
        }
        tracing::debug!(modal = kind.title(), wallet = %target.wallet.address, "modal opened");
        self.open = Some(kind);
        self.target = Some(target);
    }

    /// Closing a modal resets its form.
    pub fn close(&mut self) {
        match self.open.take() {
            Some(ModalKind::Deploy) => self.deploy.close(),
            Some(ModalKind::Transfer) => self.transfer.close(),
            Some(ModalKind::Execute) => self.execute.close(),
            Some(ModalKind::Receive) => self.receive.close(),
            None => {}
        }
        self.target = None;
        self.feedback = None;
        self.paste_warning = None;
    }

    /// Whether any operation of the open modal is still running.
    pub fn in_flight(&self) -> bool {
        match self.open {
            Some(ModalKind::Deploy) => self.deploy.deploy_state().is_in_flight(),
            Some(ModalKind::Transfer) => self.transfer.transfer_state().is_in_flight(),
            Some(ModalKind::Execute) => {
                self.execute.execute_state().is_in_flight()
                    || self.execute.estimate_state().is_in_flight()
            }
            Some(ModalKind::Receive) | None => false,
        }
    }

    /// Shows the outcome of an operation started from `kind`. Closes the
    /// modal only if it is still the one on screen.
    pub fn show_feedback(&mut self, kind: ModalKind, feedback: ModalFeedback) {
        if feedback.close && self.open == Some(kind) {
            self.close();
        }
        self.feedback = Some(feedback);
    }
}
