use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// Connection state of the page, owned by the coordinator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub connected: bool,
    pub account: Option<Address>,
    pub provider_ready: bool,
}

/// SDK-facing identity of a smart wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartWalletRef {
    pub address: Address,
    pub index: u32,
    pub deployed: bool,
}

/// Snapshot of one smart wallet with its balances. Never patched in place;
/// a refresh replaces the whole collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartWalletRecord {
    pub address: Address,
    pub index: u32,
    pub deployed: bool,
    pub token_balance: U256,
    pub native_balance: U256,
}

impl SmartWalletRecord {
    pub fn wallet_ref(&self) -> SmartWalletRef {
        SmartWalletRef {
            address: self.address,
            index: self.index,
            deployed: self.deployed,
        }
    }

    pub fn relay_wallet(&self, token_address: Address) -> RelayWallet {
        RelayWallet {
            token_address,
            address: self.address,
            index: self.index,
            deployed: self.deployed,
        }
    }
}

/// Smart wallet parameters of a relay request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayWallet {
    pub token_address: Address,
    pub address: Address,
    pub index: u32,
    pub deployed: bool,
}

/// Destination and calldata of a relayed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayCall {
    pub to: Address,
    pub data: Bytes,
}

/// A provider-level call, gas estimate or transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Option<Address>,
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

impl CallRequest {
    pub fn read(to: Address, data: Bytes) -> Self {
        Self {
            from: None,
            to,
            data,
            value: U256::ZERO,
        }
    }

    pub fn from_account(from: Address, to: Address, data: Bytes) -> Self {
        Self {
            from: Some(from),
            to,
            data,
            value: U256::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// Receipt returned by the relaying SDK once a relayed transaction is mined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayReceipt {
    pub transaction_hash: B256,
    pub block_hash: Option<B256>,
    #[serde(default)]
    pub logs: Vec<ReceiptLog>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderEventKind {
    AccountsChanged,
    ChainChanged,
}

/// Notification queued by the wallet provider until the coordinator drains it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEvent {
    pub sequence: u64,
    pub kind: ProviderEventKind,
    pub value: String,
}

impl ProviderEvent {
    /// Accounts carried by an `AccountsChanged` event, in wallet order.
    pub fn accounts(&self) -> Vec<Address> {
        if self.kind != ProviderEventKind::AccountsChanged {
            return Vec::new();
        }
        serde_json::from_str::<Vec<String>>(&self.value)
            .unwrap_or_default()
            .iter()
            .filter_map(|raw| raw.parse().ok())
            .collect()
    }
}

/// Fee payment path of a smart wallet call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecuteMode {
    /// Through a relay, fee paid in the token.
    #[default]
    Relayed,
    /// `directExecute` from the connected account, gas paid natively.
    Direct,
}

impl ExecuteMode {
    pub fn label(&self) -> &'static str {
        match self {
            ExecuteMode::Relayed => "Token (relayed)",
            ExecuteMode::Direct => "Native (direct)",
        }
    }
}
