use thiserror::Error;

use crate::ports::PortError;

/// Failures surfaced to the user at the modal or coordinator boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("no wallet provider detected: {0}")]
    NoProviderDetected(String),
    #[error("wallet connection declined: {0}")]
    UserRejected(String),
    #[error("wrong network: wallet is on chain {actual}, expected {expected}")]
    MisconfiguredNetwork { expected: u64, actual: u64 },
    #[error("relaying client not initialized: {0}")]
    SdkInit(String),
    #[error("smart wallet query failed: {0}")]
    Query(String),
    #[error("you don't have any token balance")]
    InsufficientBalance,
    #[error("{0}")]
    Transaction(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("{0} is already in progress")]
    Busy(&'static str),
}

impl AppError {
    /// Only a missing provider is unrecoverable within the running session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::NoProviderDetected(_))
    }

    /// Classifies a failure of the account access request.
    pub fn from_access(err: PortError) -> Self {
        match err {
            PortError::NotFound(reason) | PortError::Policy(reason) => {
                AppError::NoProviderDetected(reason)
            }
            PortError::NotImplemented(what) => AppError::NoProviderDetected(what.to_owned()),
            PortError::Rejected(reason) => AppError::UserRejected(reason),
            PortError::Transport(reason) | PortError::Validation(reason) => {
                AppError::UserRejected(reason)
            }
        }
    }

    pub fn transaction(err: PortError) -> Self {
        AppError::Transaction(err.message())
    }

    pub fn query(err: PortError) -> Self {
        AppError::Query(err.message())
    }
}
