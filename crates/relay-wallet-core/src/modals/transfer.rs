use alloy::primitives::B256;

use crate::contracts::{direct_execute_request, token_decimals, transfer_data};
use crate::domain::{ExecuteMode, RelayCall};
use crate::error::AppError;
use crate::modals::{complete, parse_address_input, submit, ModalFeedback, ModalTarget, Submission};
use crate::ports::{Ports, RelaySdkPort, WalletProviderPort};
use crate::state_machine::{ButtonState, RefreshSignal};
use crate::units::parse_amount;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForm {
    pub recipient: String,
    /// Decimal token amount.
    pub amount: String,
    pub fees: String,
    pub mode: ExecuteMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferField {
    Recipient(String),
    Amount(String),
    Fees(String),
    Mode(ExecuteMode),
}

impl TransferForm {
    pub fn apply(&mut self, field: TransferField) {
        match field {
            TransferField::Recipient(v) => self.recipient = v,
            TransferField::Amount(v) => self.amount = v,
            TransferField::Fees(v) => self.fees = v,
            TransferField::Mode(v) => self.mode = v,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransferModal {
    form: TransferForm,
    transfer: ButtonState,
    opened: u64,
    refresh: RefreshSignal,
}

impl TransferModal {
    pub fn new(refresh: RefreshSignal) -> Self {
        Self {
            form: TransferForm::default(),
            transfer: ButtonState::Idle,
            opened: 0,
            refresh,
        }
    }

    pub fn form(&self) -> &TransferForm {
        &self.form
    }

    pub fn update(&mut self, field: TransferField) {
        self.form.apply(field);
    }

    pub fn transfer_state(&self) -> ButtonState {
        self.transfer
    }

    pub fn begin_transfer(&mut self) -> Result<Submission<TransferForm>, AppError> {
        submit(&mut self.transfer, "transfer")?;
        Ok(Submission {
            form: self.form.clone(),
            opened: self.opened,
        })
    }

    pub fn finish_transfer(
        &mut self,
        submission: &Submission<TransferForm>,
        result: Result<B256, AppError>,
    ) -> ModalFeedback {
        complete(&mut self.transfer, "transfer");
        match result {
            Ok(hash) => {
                self.refresh.request();
                let current = submission.opened == self.opened;
                if current {
                    self.close();
                }
                ModalFeedback::success(format!("Transfer sent in {hash}"), current)
            }
            Err(e) => {
                tracing::error!(error = %e, "transfer failed");
                ModalFeedback::error(&e)
            }
        }
    }

    pub fn close(&mut self) {
        self.form = TransferForm::default();
        self.opened += 1;
    }

    pub async fn submit_transfer<W, R, A>(
        &mut self,
        ports: &Ports<W, R, A>,
        target: &ModalTarget,
    ) -> ModalFeedback
    where
        W: WalletProviderPort,
        R: RelaySdkPort,
    {
        let submission = match self.begin_transfer() {
            Ok(submission) => submission,
            Err(e) => return ModalFeedback::error(&e),
        };
        let result = run_transfer(ports, target, &submission.form).await;
        self.finish_transfer(&submission, result)
    }
}

/// Sends `amount` tokens from the smart wallet to the recipient and returns
/// the transaction hash.
pub async fn run_transfer<W, R, A>(
    ports: &Ports<W, R, A>,
    target: &ModalTarget,
    form: &TransferForm,
) -> Result<B256, AppError>
where
    W: WalletProviderPort,
    R: RelaySdkPort,
{
    let recipient = parse_address_input(&form.recipient, "recipient")?;
    let token = target.session.token();
    let decimals = token_decimals(&*ports.wallet, token)
        .await
        .map_err(AppError::transaction)?;
    let amount = parse_amount(&form.amount, decimals)?;
    if amount.is_zero() {
        return Err(AppError::Validation(
            "amount must be greater than zero".to_owned(),
        ));
    }
    let data = transfer_data(recipient, amount);

    match form.mode {
        ExecuteMode::Direct => {
            let request = direct_execute_request(target.account, target.wallet.address, token, data);
            ports
                .wallet
                .send_transaction(&request)
                .await
                .map_err(AppError::transaction)
        }
        ExecuteMode::Relayed => {
            let fee = parse_amount(&form.fees, decimals)?;
            let receipt = ports
                .sdk
                .relay_transaction(
                    &RelayCall { to: token, data },
                    &target.wallet.relay_wallet(token),
                    fee,
                )
                .await
                .map_err(AppError::transaction)?;
            Ok(receipt.transaction_hash)
        }
    }
}
