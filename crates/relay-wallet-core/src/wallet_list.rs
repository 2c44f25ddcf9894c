//! Smart wallet collection and its clear-then-reload refresh cycle.

use alloy::primitives::Address;

use crate::contracts::{token_balance, token_decimals};
use crate::domain::SmartWalletRecord;
use crate::error::AppError;
use crate::ports::{RelaySdkPort, WalletProviderPort};
use crate::session::ProviderSession;
use crate::state_machine::{refresh_transition, RefreshAction, RefreshPhase};

/// Upper bound on derivation indices scanned past the tracked count.
pub const DISCOVERY_LIMIT: u32 = 64;

/// Result of one wallet listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletListing {
    pub records: Vec<SmartWalletRecord>,
    pub token_decimals: u8,
}

#[derive(Debug, Clone, Default)]
pub struct SmartWalletList {
    records: Vec<SmartWalletRecord>,
    phase: RefreshPhase,
    load_dispatched: bool,
    /// Id of the most recently dispatched listing. Survives `reset`.
    load_generation: u64,
    tracked_count: u32,
    token_decimals: Option<u8>,
}

impl SmartWalletList {
    pub fn records(&self) -> &[SmartWalletRecord] {
        &self.records
    }

    pub fn phase(&self) -> RefreshPhase {
        self.phase
    }

    pub fn token_decimals(&self) -> Option<u8> {
        self.token_decimals
    }

    pub fn tracked_count(&self) -> u32 {
        self.tracked_count
    }

    pub fn find(&self, address: Address) -> Option<&SmartWalletRecord> {
        self.records.iter().find(|r| r.address == address)
    }

    /// Makes the next listing include one more derivation index.
    pub fn track_new_wallet(&mut self) {
        let next = self
            .records
            .iter()
            .map(|r| r.index + 1)
            .max()
            .unwrap_or(0)
            .max(self.tracked_count);
        self.tracked_count = next.saturating_add(1);
    }

    /// Phase one: drop the displayed collection.
    pub fn begin_refresh(&mut self) -> Result<(), AppError> {
        self.step(RefreshAction::Request)?;
        self.records = Vec::new();
        Ok(())
    }

    /// Phase two: the views confirmed they no longer reference old records.
    pub fn acknowledge_cleared(&mut self) -> Result<(), AppError> {
        self.step(RefreshAction::AcknowledgeCleared)
    }

    pub fn start_initial_load(&mut self) -> Result<(), AppError> {
        self.records = Vec::new();
        self.step(RefreshAction::StartLoad)
    }

    /// Returns the id of the listing to start, exactly once per reload.
    pub fn claim_load(&mut self) -> Option<u64> {
        if self.phase == RefreshPhase::Reloading && !self.load_dispatched {
            self.load_dispatched = true;
            self.load_generation += 1;
            return Some(self.load_generation);
        }
        None
    }

    /// Whether `generation` is the listing this reload is waiting for.
    pub fn awaits_load(&self, generation: u64) -> bool {
        self.phase == RefreshPhase::Reloading
            && self.load_dispatched
            && generation == self.load_generation
    }

    /// Replaces the collection wholesale. A failed listing leaves it empty.
    pub fn finish_load(&mut self, result: Result<WalletListing, AppError>) -> Result<(), AppError> {
        self.step(RefreshAction::Loaded)?;
        self.load_dispatched = false;
        match result {
            Ok(listing) => {
                self.records = listing.records;
                self.token_decimals = Some(listing.token_decimals);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "smart wallet listing failed");
                self.records = Vec::new();
                Err(e)
            }
        }
    }

    /// Forgets everything, e.g. when the connected account changes.
    pub fn reset(&mut self) {
        *self = Self {
            load_generation: self.load_generation,
            ..Self::default()
        };
    }

    fn step(&mut self, action: RefreshAction) -> Result<(), AppError> {
        let (next, transition) = refresh_transition(self.phase, action)?;
        tracing::debug!(
            from = ?transition.from,
            to = ?transition.to,
            reason = transition.reason,
            "wallet list transition"
        );
        self.phase = next;
        Ok(())
    }
}

/// Lists the smart wallets derived from `owner`: every index below
/// `tracked_count`, then onwards while the derived wallet is deployed.
pub async fn fetch_smart_wallets<W, R>(
    wallet: &W,
    sdk: &R,
    session: &ProviderSession,
    owner: Address,
    tracked_count: u32,
) -> Result<WalletListing, AppError>
where
    W: WalletProviderPort,
    R: RelaySdkPort,
{
    let token = session.token();
    let decimals = token_decimals(wallet, token).await.map_err(AppError::query)?;

    let mut records = Vec::new();
    let limit = tracked_count.saturating_add(DISCOVERY_LIMIT);
    for index in 0..limit {
        let derived = sdk
            .generate_smart_wallet(owner, index)
            .await
            .map_err(AppError::query)?;
        if index >= tracked_count && !derived.deployed {
            break;
        }
        let token_balance = token_balance(wallet, token, derived.address)
            .await
            .map_err(AppError::query)?;
        let native_balance = wallet
            .native_balance(derived.address)
            .await
            .map_err(AppError::query)?;
        records.push(SmartWalletRecord {
            address: derived.address,
            index: derived.index,
            deployed: derived.deployed,
            token_balance,
            native_balance,
        });
    }

    tracing::info!(%owner, count = records.len(), "smart wallets listed");
    Ok(WalletListing {
        records,
        token_decimals: decimals,
    })
}
