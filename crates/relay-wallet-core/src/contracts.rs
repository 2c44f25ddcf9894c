//! On-chain interfaces consumed by the modals and the wallet list.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::{SolCall, SolEvent};

use crate::domain::{CallRequest, ReceiptLog};
use crate::ports::{PortError, WalletProviderPort};

sol! {
    /// Call forwarding entry point of a smart wallet.
    interface IForwarder {
        function directExecute(address to, bytes calldata data)
            external
            payable
            returns (bool success, bytes memory ret);
    }

    interface IERC20 {
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }

    interface IRelayHub {
        event TransactionRelayed(
            address indexed relayManager,
            address relayWorker,
            bytes32 relayRequestSigHash,
            bytes relayedCallReturnValue
        );
    }
}

pub fn direct_execute_data(to: Address, data: Bytes) -> Bytes {
    IForwarder::directExecuteCall { to, data }.abi_encode().into()
}

pub fn transfer_data(to: Address, amount: U256) -> Bytes {
    IERC20::transferCall { to, amount }.abi_encode().into()
}

/// `directExecute(to, data)` sent from the connected account to the smart wallet.
pub fn direct_execute_request(
    account: Address,
    smart_wallet: Address,
    to: Address,
    data: Bytes,
) -> CallRequest {
    CallRequest::from_account(account, smart_wallet, direct_execute_data(to, data))
}

pub async fn token_balance<W: WalletProviderPort>(
    wallet: &W,
    token: Address,
    holder: Address,
) -> Result<U256, PortError> {
    let data: Bytes = IERC20::balanceOfCall { account: holder }.abi_encode().into();
    let raw = wallet.call(&CallRequest::read(token, data)).await?;
    first_word(&raw, "balanceOf")
}

pub async fn token_decimals<W: WalletProviderPort>(
    wallet: &W,
    token: Address,
) -> Result<u8, PortError> {
    let data: Bytes = IERC20::decimalsCall {}.abi_encode().into();
    let raw = wallet.call(&CallRequest::read(token, data)).await?;
    let word = first_word(&raw, "decimals")?;
    if word > U256::from(u8::MAX) {
        return Err(PortError::Validation(format!(
            "token decimals out of range: {word}"
        )));
    }
    Ok(word.to::<u8>())
}

/// Whether any log in the receipt is a relay hub `TransactionRelayed` event.
pub fn find_transaction_relayed(logs: &[ReceiptLog]) -> Option<&ReceiptLog> {
    logs.iter()
        .find(|log| log.topics.first() == Some(&IRelayHub::TransactionRelayed::SIGNATURE_HASH))
}

fn first_word(raw: &[u8], what: &str) -> Result<U256, PortError> {
    if raw.len() < 32 {
        return Err(PortError::Validation(format!(
            "{what} returned {} bytes, expected at least 32",
            raw.len()
        )));
    }
    Ok(U256::from_be_slice(&raw[..32]))
}
