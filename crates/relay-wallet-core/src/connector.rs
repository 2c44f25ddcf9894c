//! Account access and provider notifications.

use alloy::primitives::Address;

use crate::domain::{ProviderEvent, ProviderEventKind};
use crate::error::AppError;
use crate::ports::WalletProviderPort;

/// Asks the provider for account access and returns the active account.
pub async fn request_access<W: WalletProviderPort>(wallet: &W) -> Result<Address, AppError> {
    let accounts = wallet.request_accounts().await.map_err(|e| {
        let err = AppError::from_access(e);
        tracing::error!(error = %err, "account access failed");
        err
    })?;
    accounts
        .first()
        .copied()
        .ok_or_else(|| AppError::UserRejected("no account was authorized".to_owned()))
}

/// What a batch of provider notifications changes, latest event winning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderUpdate {
    /// `Some(None)` when the wallet reported an empty account list.
    pub account: Option<Option<Address>>,
    pub chain_id: Option<u64>,
}

impl ProviderUpdate {
    pub fn is_empty(&self) -> bool {
        self.account.is_none() && self.chain_id.is_none()
    }
}

pub fn summarize_events(events: &[ProviderEvent]) -> ProviderUpdate {
    let mut ordered: Vec<&ProviderEvent> = events.iter().collect();
    ordered.sort_by_key(|e| e.sequence);

    let mut update = ProviderUpdate::default();
    for event in ordered {
        match event.kind {
            ProviderEventKind::AccountsChanged => {
                update.account = Some(event.accounts().first().copied());
            }
            ProviderEventKind::ChainChanged => match parse_chain_id(&event.value) {
                Some(id) => update.chain_id = Some(id),
                None => tracing::warn!(value = %event.value, "unparseable chainChanged payload"),
            },
        }
    }
    update
}

/// Accepts `0x`-prefixed hex (EIP-1193) or plain decimal, optionally JSON quoted.
pub fn parse_chain_id(raw: &str) -> Option<u64> {
    let value = raw.trim().trim_matches('"');
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}
