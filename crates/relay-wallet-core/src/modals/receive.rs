use alloy::primitives::Address;

use crate::domain::SmartWalletRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveView {
    /// EIP-55 checksummed.
    pub address: String,
    pub index: u32,
    pub deployed: bool,
}

impl ReceiveView {
    pub fn for_wallet(wallet: &SmartWalletRecord) -> Self {
        Self {
            address: wallet.address.to_checksum(None),
            index: wallet.index,
            deployed: wallet.deployed,
        }
    }
}

/// Shows where to send tokens. Holds no SDK state.
#[derive(Debug, Clone, Default)]
pub struct ReceiveModal {
    view: Option<ReceiveView>,
}

impl ReceiveModal {
    pub fn open(&mut self, wallet: &SmartWalletRecord) {
        self.view = Some(ReceiveView::for_wallet(wallet));
    }

    pub fn view(&self) -> Option<&ReceiveView> {
        self.view.as_ref()
    }

    pub fn shows(&self, address: Address) -> bool {
        self.view
            .as_ref()
            .is_some_and(|v| v.address.eq_ignore_ascii_case(&address.to_string()))
    }

    pub fn close(&mut self) {
        self.view = None;
    }
}
