use alloy::primitives::Address;

use crate::config::EnvelopingConfig;
use crate::connector::{request_access, summarize_events};
use crate::domain::{ProviderEvent, Session, SmartWalletRecord};
use crate::error::AppError;
use crate::modals::ModalTarget;
use crate::ports::{Ports, RelaySdkPort, WalletProviderPort};
use crate::session::ProviderSession;
use crate::state_machine::{RefreshPhase, RefreshSignal};
use crate::wallet_list::{fetch_smart_wallets, SmartWalletList, WalletListing};

/// Token price used for fee conversion until the user edits it.
pub const DEFAULT_TOKEN_PRICE_NATIVE: &str = "0.00005";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOutcome {
    pub account: Address,
    /// A failed initialization still leaves the account connected.
    pub session: Result<ProviderSession, AppError>,
}

/// Parameters of one smart wallet listing, captured when it is dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Distinguishes this listing from earlier ones for the same owner.
    pub generation: u64,
    pub session: ProviderSession,
    pub owner: Address,
    pub tracked_count: u32,
}

/// Background work the shell must run and hand back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorTask {
    LoadWallets(LoadRequest),
}

/// Requests account access, then validates the network and initializes the
/// relaying client.
pub async fn connect_flow<W, R, A>(
    ports: &Ports<W, R, A>,
    settings: &EnvelopingConfig,
) -> Result<ConnectOutcome, AppError>
where
    W: WalletProviderPort,
    R: RelaySdkPort,
{
    let account = request_access(&*ports.wallet).await?;
    tracing::info!(%account, "wallet connected");

    let session = match ports.wallet.chain_id().await {
        Ok(chain_id) => ProviderSession::initialize(&*ports.sdk, settings, chain_id).await,
        Err(e) => Err(AppError::SdkInit(format!(
            "could not read wallet chain id: {}",
            e.message()
        ))),
    };
    Ok(ConnectOutcome { account, session })
}

pub async fn load_wallets_flow<W, R, A>(
    ports: &Ports<W, R, A>,
    request: &LoadRequest,
) -> Result<WalletListing, AppError>
where
    W: WalletProviderPort,
    R: RelaySdkPort,
{
    fetch_smart_wallets(
        &*ports.wallet,
        &*ports.sdk,
        &request.session,
        request.owner,
        request.tracked_count,
    )
    .await
}

/// Single owner of the session, the smart wallet collection, the selection
/// and the refresh signal.
#[derive(Debug, Clone)]
pub struct Coordinator {
    session: Session,
    provider_session: Option<ProviderSession>,
    wallets: SmartWalletList,
    selected: Option<Address>,
    refresh: RefreshSignal,
    settings: EnvelopingConfig,
    token_price_native: String,
    last_error: Option<AppError>,
}

impl Coordinator {
    pub fn new(settings: EnvelopingConfig, token_price_native: impl Into<String>) -> Self {
        Self {
            session: Session::default(),
            provider_session: None,
            wallets: SmartWalletList::default(),
            selected: None,
            refresh: RefreshSignal::default(),
            settings,
            token_price_native: token_price_native.into(),
            last_error: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn provider_session(&self) -> Option<&ProviderSession> {
        self.provider_session.as_ref()
    }

    pub fn wallets(&self) -> &SmartWalletList {
        &self.wallets
    }

    pub fn settings(&self) -> &EnvelopingConfig {
        &self.settings
    }

    /// Handed to every modal.
    pub fn refresh_signal(&self) -> RefreshSignal {
        self.refresh.clone()
    }

    pub fn token_price_native(&self) -> &str {
        &self.token_price_native
    }

    pub fn token_price_native_mut(&mut self) -> &mut String {
        &mut self.token_price_native
    }

    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    pub fn apply_connect(&mut self, result: Result<ConnectOutcome, AppError>) {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                self.last_error = Some(e);
                return;
            }
        };

        self.session.connected = true;
        self.session.account = Some(outcome.account);
        self.selected = None;
        self.wallets.reset();
        match outcome.session {
            Ok(provider_session) => {
                self.session.provider_ready = true;
                self.provider_session = Some(provider_session);
                self.last_error = None;
                if let Err(e) = self.wallets.start_initial_load() {
                    tracing::warn!(error = %e, "initial load not started");
                }
            }
            Err(e) => {
                self.session.provider_ready = false;
                self.provider_session = None;
                self.last_error = Some(e);
            }
        }
    }

    /// Applies queued provider notifications. A new account drops the
    /// collection and schedules a reload; a chain switch away from the
    /// configured network invalidates the relaying session.
    pub fn apply_provider_events(&mut self, events: &[ProviderEvent]) {
        let update = summarize_events(events);
        if update.is_empty() {
            return;
        }

        if let Some(account) = update.account {
            if account != self.session.account {
                tracing::info!(?account, "active account changed");
                self.session.account = account;
                self.abandon_listing();
                if account.is_some() && self.provider_session.is_some() {
                    self.refresh.request();
                }
            }
        }

        if let Some(chain_id) = update.chain_id {
            let expected = self.settings.chain_id;
            // `connected` is lowered while a refresh is clearing the list.
            let attached =
                self.session.connected || self.wallets.phase() == RefreshPhase::Clearing;
            if attached && expected != Some(chain_id) {
                tracing::error!(chain_id, ?expected, "wallet switched to an unexpected network");
                self.provider_session = None;
                self.session.provider_ready = false;
                self.abandon_listing();
                if let Some(expected) = expected {
                    self.last_error = Some(AppError::MisconfiguredNetwork {
                        expected,
                        actual: chain_id,
                    });
                }
            }
        }
    }

    pub fn sync_provider_events<W: WalletProviderPort>(&mut self, wallet: &W) {
        match wallet.drain_events() {
            Ok(events) => self.apply_provider_events(&events),
            Err(e) => tracing::warn!(error = %e, "provider event drain failed"),
        }
    }

    /// Advances the refresh cycle. Called once per frame; returns the listing
    /// to run when one is due.
    pub fn poll(&mut self) -> Option<CoordinatorTask> {
        let (Some(provider_session), Some(owner)) =
            (self.provider_session.as_ref(), self.session.account)
        else {
            return None;
        };

        if self.wallets.phase() == RefreshPhase::Idle && self.refresh.take() {
            match self.wallets.begin_refresh() {
                Ok(()) => {
                    self.session.connected = false;
                    self.selected = None;
                }
                Err(e) => tracing::warn!(error = %e, "refresh not started"),
            }
        }

        if let Some(generation) = self.wallets.claim_load() {
            return Some(CoordinatorTask::LoadWallets(LoadRequest {
                generation,
                session: provider_session.clone(),
                owner,
                tracked_count: self.wallets.tracked_count(),
            }));
        }
        None
    }

    /// The views rendered the cleared collection; the reload may start.
    pub fn acknowledge_cleared(&mut self) {
        if self.wallets.phase() != RefreshPhase::Clearing {
            return;
        }
        match self.wallets.acknowledge_cleared() {
            Ok(()) => self.session.connected = true,
            Err(e) => tracing::warn!(error = %e, "clear acknowledgement rejected"),
        }
    }

    /// Only the listing the current reload dispatched is applied; results for
    /// a previous account or an abandoned reload are dropped.
    pub fn apply_wallets(&mut self, request: &LoadRequest, result: Result<WalletListing, AppError>) {
        if self.session.account != Some(request.owner) {
            tracing::debug!(owner = %request.owner, "discarding listing for a previous account");
            return;
        }
        if !self.wallets.awaits_load(request.generation) {
            tracing::debug!(generation = request.generation, "discarding stale listing");
            return;
        }
        if let Err(e) = self.wallets.finish_load(result) {
            self.last_error = Some(e);
        }
    }

    /// Drops the collection and any reload in progress. The session counts
    /// as connected again if the cycle was interrupted while cleared.
    fn abandon_listing(&mut self) {
        if self.wallets.phase() == RefreshPhase::Clearing {
            self.session.connected = true;
        }
        self.selected = None;
        self.wallets.reset();
    }

    pub fn select_wallet(&mut self, address: Address) -> bool {
        if self.wallets.find(address).is_some() {
            self.selected = Some(address);
            return true;
        }
        false
    }

    pub fn selected_wallet(&self) -> Option<&SmartWalletRecord> {
        self.selected.and_then(|a| self.wallets.find(a))
    }

    pub fn modal_target(&self) -> Option<ModalTarget> {
        Some(ModalTarget {
            session: self.provider_session.clone()?,
            wallet: self.selected_wallet()?.clone(),
            account: self.session.account?,
        })
    }

    /// Footer "new smart wallet": lists one more derivation index.
    pub fn request_new_wallet(&mut self) {
        self.wallets.track_new_wallet();
        self.refresh.request();
    }

    pub async fn connect<W, R, A>(&mut self, ports: &Ports<W, R, A>)
    where
        W: WalletProviderPort,
        R: RelaySdkPort,
    {
        let result = connect_flow(ports, &self.settings).await;
        self.apply_connect(result);
    }

    /// Runs the refresh cycle to completion, acknowledging the cleared state
    /// immediately. For callers without a render loop.
    pub async fn run_pending<W, R, A>(&mut self, ports: &Ports<W, R, A>)
    where
        W: WalletProviderPort,
        R: RelaySdkPort,
    {
        loop {
            if let Some(CoordinatorTask::LoadWallets(request)) = self.poll() {
                let result = load_wallets_flow(ports, &request).await;
                self.apply_wallets(&request, result);
                continue;
            }
            if self.wallets.phase() == RefreshPhase::Clearing {
                self.acknowledge_cleared();
                continue;
            }
            break;
        }
    }
}
