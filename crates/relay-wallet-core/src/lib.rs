pub mod config;
pub mod connector;
pub mod contracts;
pub mod coordinator;
pub mod domain;
pub mod error;
pub mod modals;
pub mod ports;
pub mod session;
pub mod state_machine;
pub mod units;
pub mod wallet_list;

pub use config::{ContractAddresses, EnvelopingConfig, RelayingConfig};
pub use coordinator::{
    connect_flow, load_wallets_flow, ConnectOutcome, Coordinator, CoordinatorTask, LoadRequest,
    DEFAULT_TOKEN_PRICE_NATIVE,
};
pub use domain::{
    CallRequest, ExecuteMode, ProviderEvent, ProviderEventKind, RelayCall, RelayReceipt,
    RelayWallet, Session, SmartWalletRecord, SmartWalletRef,
};
pub use error::AppError;
pub use modals::{ModalFeedback, ModalKind, ModalTarget};
pub use ports::{AbiPort, PortError, Ports, RelaySdkPort, WalletProviderPort};
pub use session::ProviderSession;
pub use state_machine::{
    button_transition, refresh_transition, ButtonAction, ButtonState, RefreshAction,
    RefreshPhase, RefreshSignal, StateTransition,
};
pub use wallet_list::{SmartWalletList, WalletListing};
