use alloy::primitives::{Address, Bytes, B256, U256};

use crate::contracts::{direct_execute_request, find_transaction_relayed, token_balance, token_decimals};
use crate::domain::{ExecuteMode, RelayCall, RelayReceipt};
use crate::error::AppError;
use crate::modals::{
    complete, parse_address_input, submit, ModalFeedback, ModalTarget, Submission,
};
use crate::ports::{AbiPort, PortError, Ports, RelaySdkPort, WalletProviderPort};
use crate::state_machine::{ButtonState, RefreshSignal};
use crate::units::{native_cost_to_token, parse_amount};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteForm {
    pub contract: String,
    /// `name(type,type,...)`
    pub function: String,
    /// Comma separated argument values.
    pub values: String,
    pub fees: String,
    pub mode: ExecuteMode,
    pub show_return_data: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteField {
    Contract(String),
    Function(String),
    Values(String),
    Fees(String),
    Mode(ExecuteMode),
    ShowReturnData(bool),
}

impl ExecuteForm {
    pub fn apply(&mut self, field: ExecuteField) {
        match field {
            ExecuteField::Contract(v) => self.contract = v,
            ExecuteField::Function(v) => self.function = v,
            ExecuteField::Values(v) => self.values = v,
            ExecuteField::Fees(v) => self.fees = v,
            ExecuteField::Mode(v) => self.mode = v,
            ExecuteField::ShowReturnData(v) => self.show_return_data = v,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteOutcome {
    Direct {
        transaction_hash: B256,
    },
    Relayed {
        receipt: RelayReceipt,
        relayed_event: bool,
    },
}

#[derive(Debug, Clone)]
pub struct ExecuteModal {
    form: ExecuteForm,
    execute: ButtonState,
    estimate: ButtonState,
    results: Option<String>,
    opened: u64,
    refresh: RefreshSignal,
}

impl ExecuteModal {
    pub fn new(refresh: RefreshSignal) -> Self {
        Self {
            form: ExecuteForm::default(),
            execute: ButtonState::Idle,
            estimate: ButtonState::Idle,
            results: None,
            opened: 0,
            refresh,
        }
    }

    pub fn form(&self) -> &ExecuteForm {
        &self.form
    }

    pub fn update(&mut self, field: ExecuteField) {
        self.form.apply(field);
    }

    pub fn execute_state(&self) -> ButtonState {
        self.execute
    }

    pub fn estimate_state(&self) -> ButtonState {
        self.estimate
    }

    /// Serialized outcome, kept when "show return data" is on.
    pub fn results(&self) -> Option<&str> {
        self.results.as_deref()
    }

    fn submission(&self) -> Submission<ExecuteForm> {
        Submission {
            form: self.form.clone(),
            opened: self.opened,
        }
    }

    pub fn begin_execute(&mut self) -> Result<Submission<ExecuteForm>, AppError> {
        submit(&mut self.execute, "execute")?;
        Ok(self.submission())
    }

    /// Follows the return data choice made at submit time. A result for a
    /// closed form only refreshes the list.
    pub fn finish_execute(
        &mut self,
        submission: &Submission<ExecuteForm>,
        result: Result<ExecuteOutcome, AppError>,
    ) -> ModalFeedback {
        complete(&mut self.execute, "execute");
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "execute failed");
                return ModalFeedback::error(&e);
            }
        };

        if submission.opened != self.opened {
            self.refresh.request();
            return ModalFeedback::success("Transaction executed", false);
        }
        if submission.form.show_return_data {
            self.results = Some(render_outcome(&outcome));
            return ModalFeedback::success("Transaction executed", false);
        }
        self.refresh.request();
        self.close();
        ModalFeedback::success("Transaction executed", true)
    }

    pub fn begin_estimate(&mut self) -> Result<Submission<ExecuteForm>, AppError> {
        submit(&mut self.estimate, "estimate")?;
        Ok(self.submission())
    }

    /// On success the estimate replaces `fees`; on failure `fees` is kept.
    /// An estimate for a closed form is dropped.
    pub fn finish_estimate(
        &mut self,
        submission: &Submission<ExecuteForm>,
        result: Result<String, AppError>,
    ) -> ModalFeedback {
        complete(&mut self.estimate, "estimate");
        if submission.opened != self.opened {
            tracing::debug!("discarding fee estimate for a closed form");
            return ModalFeedback::success("Fee estimate discarded: its form was closed", false);
        }
        match result {
            Ok(fees) => {
                self.form.fees = fees;
                ModalFeedback::success(format!("Estimated fees: {}", self.form.fees), false)
            }
            Err(e) => {
                tracing::error!(error = %e, "fee estimation failed");
                ModalFeedback::error(&e)
            }
        }
    }

    pub fn close(&mut self) {
        self.form = ExecuteForm::default();
        self.results = None;
        self.opened += 1;
    }

    pub async fn submit_execute<W, R, A>(
        &mut self,
        ports: &Ports<W, R, A>,
        target: &ModalTarget,
    ) -> ModalFeedback
    where
        W: WalletProviderPort,
        R: RelaySdkPort,
        A: AbiPort,
    {
        let submission = match self.begin_execute() {
            Ok(submission) => submission,
            Err(e) => return ModalFeedback::error(&e),
        };
        let result = run_execute(ports, target, &submission.form).await;
        self.finish_execute(&submission, result)
    }

    pub async fn submit_estimate<W, R, A>(
        &mut self,
        ports: &Ports<W, R, A>,
        target: &ModalTarget,
        token_price_in_native: &str,
    ) -> ModalFeedback
    where
        W: WalletProviderPort,
        R: RelaySdkPort,
        A: AbiPort,
    {
        let submission = match self.begin_estimate() {
            Ok(submission) => submission,
            Err(e) => return ModalFeedback::error(&e),
        };
        let result = run_estimate(ports, target, &submission.form, token_price_in_native).await;
        self.finish_estimate(&submission, result)
    }
}

fn render_outcome(outcome: &ExecuteOutcome) -> String {
    match outcome {
        ExecuteOutcome::Direct { transaction_hash } => {
            serde_json::json!({ "transactionHash": transaction_hash }).to_string()
        }
        ExecuteOutcome::Relayed { receipt, .. } => serde_json::to_string(receipt)
            .unwrap_or_else(|e| format!("receipt serialization failed: {e}")),
    }
}

/// Destination and calldata of the form's function call.
pub fn encode_call<A: AbiPort>(abi: &A, form: &ExecuteForm) -> Result<(Address, Bytes), AppError> {
    let destination = parse_address_input(&form.contract, "contract address")?;
    let signature = form.function.trim();
    if signature.is_empty() {
        return Err(AppError::Validation("contract function is required".to_owned()));
    }
    let data = abi
        .encode_function_call(signature, &form.values)
        .map_err(|e| match e {
            PortError::Validation(m) => AppError::Validation(m),
            other => AppError::Validation(other.message()),
        })?;
    Ok((destination, data))
}

pub async fn run_execute<W, R, A>(
    ports: &Ports<W, R, A>,
    target: &ModalTarget,
    form: &ExecuteForm,
) -> Result<ExecuteOutcome, AppError>
where
    W: WalletProviderPort,
    R: RelaySdkPort,
    A: AbiPort,
{
    let (destination, data) = encode_call(&*ports.abi, form)?;
    let smart_wallet = target.wallet.address;

    match form.mode {
        ExecuteMode::Direct => {
            let request = direct_execute_request(target.account, smart_wallet, destination, data);
            let transaction_hash = ports
                .wallet
                .send_transaction(&request)
                .await
                .map_err(AppError::transaction)?;
            tracing::info!(%transaction_hash, "direct execution sent");
            match ports.wallet.get_transaction(transaction_hash).await {
                Ok(tx) => tracing::debug!(?tx, "direct execution transaction"),
                Err(e) => tracing::warn!(error = %e, "transaction lookup failed"),
            }
            Ok(ExecuteOutcome::Direct { transaction_hash })
        }
        ExecuteMode::Relayed => {
            let token = target.session.token();
            let decimals = token_decimals(&*ports.wallet, token)
                .await
                .map_err(AppError::transaction)?;
            let fee = parse_amount(&form.fees, decimals)?;
            let receipt = ports
                .sdk
                .relay_transaction(
                    &RelayCall {
                        to: destination,
                        data,
                    },
                    &target.wallet.relay_wallet(token),
                    fee,
                )
                .await
                .map_err(AppError::transaction)?;

            let relayed_event = find_transaction_relayed(&receipt.logs).is_some();
            if relayed_event {
                tracing::info!(transaction_hash = %receipt.transaction_hash, "transaction relayed");
            } else {
                tracing::warn!(
                    transaction_hash = %receipt.transaction_hash,
                    "receipt has no TransactionRelayed event"
                );
            }
            Ok(ExecuteOutcome::Relayed {
                receipt,
                relayed_event,
            })
        }
    }
}

/// Fee estimate for the form's call: gas units in direct mode, a token
/// amount rounded to the token's decimals in relayed mode.
pub async fn run_estimate<W, R, A>(
    ports: &Ports<W, R, A>,
    target: &ModalTarget,
    form: &ExecuteForm,
    token_price_in_native: &str,
) -> Result<String, AppError>
where
    W: WalletProviderPort,
    R: RelaySdkPort,
    A: AbiPort,
{
    let (destination, data) = encode_call(&*ports.abi, form)?;
    let smart_wallet = target.wallet.address;

    match form.mode {
        ExecuteMode::Direct => {
            let request = direct_execute_request(target.account, smart_wallet, destination, data);
            let gas = ports
                .wallet
                .estimate_gas(&request)
                .await
                .map_err(AppError::transaction)?;
            tracing::info!(gas, "estimated direct execution cost");
            Ok(gas.to_string())
        }
        ExecuteMode::Relayed => {
            let token = target.session.token();
            let balance = token_balance(&*ports.wallet, token, smart_wallet)
                .await
                .map_err(AppError::query)?;
            if balance.is_zero() {
                return Err(AppError::InsufficientBalance);
            }
            let relay_worker = target.session.relay_worker()?;
            let cost = ports
                .sdk
                .estimate_max_possible_relay_gas_with_linear_fit(
                    destination,
                    smart_wallet,
                    U256::ZERO,
                    &data,
                    relay_worker,
                )
                .await
                .map_err(AppError::transaction)?;
            let decimals = token_decimals(&*ports.wallet, token)
                .await
                .map_err(AppError::query)?;
            let fees = native_cost_to_token(cost, token_price_in_native, decimals)?;
            tracing::info!(%cost, %fees, "estimated relay cost");
            Ok(fees)
        }
    }
}
