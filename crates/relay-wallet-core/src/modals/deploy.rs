use crate::contracts::token_decimals;
use crate::domain::RelayReceipt;
use crate::error::AppError;
use crate::modals::{complete, submit, ModalFeedback, ModalTarget, Submission};
use crate::ports::{Ports, RelaySdkPort, WalletProviderPort};
use crate::state_machine::{ButtonState, RefreshSignal};
use crate::units::parse_amount;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployForm {
    /// Token amount paid to the relay.
    pub fees: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployField {
    Fees(String),
}

impl DeployForm {
    pub fn apply(&mut self, field: DeployField) {
        match field {
            DeployField::Fees(v) => self.fees = v,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeployModal {
    form: DeployForm,
    deploy: ButtonState,
    opened: u64,
    refresh: RefreshSignal,
}

impl DeployModal {
    pub fn new(refresh: RefreshSignal) -> Self {
        Self {
            form: DeployForm::default(),
            deploy: ButtonState::Idle,
            opened: 0,
            refresh,
        }
    }

    pub fn form(&self) -> &DeployForm {
        &self.form
    }

    pub fn update(&mut self, field: DeployField) {
        self.form.apply(field);
    }

    pub fn deploy_state(&self) -> ButtonState {
        self.deploy
    }

    pub fn begin_deploy(&mut self) -> Result<Submission<DeployForm>, AppError> {
        submit(&mut self.deploy, "deploy")?;
        Ok(Submission {
            form: self.form.clone(),
            opened: self.opened,
        })
    }

    /// A deployment that lands after its modal was closed still refreshes
    /// the list but leaves the current form alone.
    pub fn finish_deploy(
        &mut self,
        submission: &Submission<DeployForm>,
        result: Result<RelayReceipt, AppError>,
    ) -> ModalFeedback {
        complete(&mut self.deploy, "deploy");
        match result {
            Ok(receipt) => {
                self.refresh.request();
                let current = submission.opened == self.opened;
                if current {
                    self.close();
                }
                ModalFeedback::success(
                    format!("Smart wallet deployed in {}", receipt.transaction_hash),
                    current,
                )
            }
            Err(e) => {
                tracing::error!(error = %e, "deploy failed");
                ModalFeedback::error(&e)
            }
        }
    }

    pub fn close(&mut self) {
        self.form = DeployForm::default();
        self.opened += 1;
    }

    pub async fn submit_deploy<W, R, A>(
        &mut self,
        ports: &Ports<W, R, A>,
        target: &ModalTarget,
    ) -> ModalFeedback
    where
        W: WalletProviderPort,
        R: RelaySdkPort,
    {
        let submission = match self.begin_deploy() {
            Ok(submission) => submission,
            Err(e) => return ModalFeedback::error(&e),
        };
        let result = run_deploy(ports, target, &submission.form).await;
        self.finish_deploy(&submission, result)
    }
}

/// Deploys the target smart wallet through the relay, paying `fees` in the token.
pub async fn run_deploy<W, R, A>(
    ports: &Ports<W, R, A>,
    target: &ModalTarget,
    form: &DeployForm,
) -> Result<RelayReceipt, AppError>
where
    W: WalletProviderPort,
    R: RelaySdkPort,
{
    if target.wallet.deployed {
        return Err(AppError::Validation(format!(
            "smart wallet {} is already deployed",
            target.wallet.address
        )));
    }
    let token = target.session.token();
    let decimals = token_decimals(&*ports.wallet, token)
        .await
        .map_err(AppError::transaction)?;
    let fee = parse_amount(&form.fees, decimals)?;

    let receipt = ports
        .sdk
        .deploy_smart_wallet(&target.wallet.wallet_ref(), token, fee)
        .await
        .map_err(AppError::transaction)?;
    tracing::info!(
        smart_wallet = %target.wallet.address,
        index = target.wallet.index,
        transaction_hash = %receipt.transaction_hash,
        "smart wallet deployed"
    );
    Ok(receipt)
}
