//! Main application state and update loop

use std::time::Duration;

use eframe::egui;

use relay_wallet_adapters::{ports_from_config, AdapterConfig, AppPorts};
use relay_wallet_core::modals::{
    deploy::run_deploy, execute, transfer::run_transfer, ExecuteField, Submission,
};
use relay_wallet_core::{
    connect_flow, load_wallets_flow, AppError, ConnectOutcome, Coordinator, CoordinatorTask,
    LoadRequest, ModalFeedback, ModalKind, RefreshPhase, WalletListing,
};

use crate::modals::{self, ModalAction};
use crate::state::{Finished, ModalsState};
use crate::tasks::{spawn_task, MaybeSend, TaskSlot};
use crate::ui::{self, AddressValidation};
use crate::wallet_list;

/// How often provider notifications are polled while idle.
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(500);

pub struct App {
    ports: AppPorts,
    coordinator: Coordinator,
    modals: ModalsState,
    /// Set when no wallet provider exists in this runtime.
    startup_error: Option<AppError>,
    connecting: bool,
    connect_result: TaskSlot<Result<ConnectOutcome, AppError>>,
    load_result: TaskSlot<(LoadRequest, Result<WalletListing, AppError>)>,
}

impl App {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AdapterConfig) -> Self {
        let ports = ports_from_config(&config);
        let startup_error = (!ports.wallet.is_available()).then(|| {
            AppError::NoProviderDetected(format!(
                "no EIP-1193 provider is available in the {:?} runtime profile",
                config.runtime_profile
            ))
        });
        if let Some(e) = &startup_error {
            tracing::error!(error = %e, "startup failed");
        }
        tracing::info!(provider = ports.wallet.mode_name(), "adapters ready");

        let coordinator = Coordinator::new(config.enveloping, config.token_price_native);
        let modals = ModalsState::new(coordinator.refresh_signal());
        Self {
            ports,
            coordinator,
            modals,
            startup_error,
            connecting: false,
            connect_result: TaskSlot::default(),
            load_result: TaskSlot::default(),
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());

        if let Some(e) = &self.startup_error {
            let message = e.to_string();
            egui::CentralPanel::default().show(ctx, |ui| render_fatal(ui, &message));
            return;
        }

        self.check_connect_result();
        self.check_load_result();
        self.check_modal_results();

        self.coordinator.sync_provider_events(&*self.ports.wallet);
        if let Some(CoordinatorTask::LoadWallets(request)) = self.coordinator.poll() {
            self.spawn_load(ctx, request);
        }
        if self.modals.open.is_some()
            && !self.modals.in_flight()
            && self.coordinator.selected_wallet().is_none()
        {
            self.modals.close();
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(8.0);
            self.render_header(ui, ctx);
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.add_space(6.0);
            self.render_footer(ui);
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(10.0);
                self.render_body(ui);
                ui.add_space(20.0);
            });
        });

        let action = modals::show(ctx, &mut self.modals, self.coordinator.wallets().token_decimals());
        self.handle_modal_action(ctx, action);

        // The cleared list has been drawn this frame; the reload may start.
        if self.coordinator.wallets().phase() == RefreshPhase::Clearing {
            self.coordinator.acknowledge_cleared();
            ctx.request_repaint();
        }
        ctx.request_repaint_after(EVENT_POLL_INTERVAL);
    }
}

impl App {
    fn render_header(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            ui.heading(
                egui::RichText::new("⛓ Relay Wallet")
                    .size(22.0)
                    .color(ui::ACCENT),
            );
            ui.add_space(30.0);
            ui.separator();
            ui.add_space(10.0);

            let session = self.coordinator.session().clone();
            match session.account {
                Some(account) => {
                    ui.label("Account:");
                    ui::copyable_address(ui, &account.to_checksum(None));
                    if !session.provider_ready {
                        ui.label(egui::RichText::new("relaying unavailable").color(ui::WARNING_YELLOW));
                    }
                }
                None => {
                    let label = if self.connecting { "Connecting..." } else { "Connect" };
                    if ui::primary_button_enabled(ui, label, !self.connecting).clicked() {
                        self.connect(ctx);
                    }
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui::number_input(ui, self.coordinator.token_price_native_mut(), "0.00005")
                    .on_hover_text("Token price in native currency, used for fee estimates");
                ui.label("Token price:");
            });
        });
    }

    fn render_footer(&mut self, ui: &mut egui::Ui) {
        let session = self.coordinator.session();
        let ready = session.connected
            && session.provider_ready
            && self.coordinator.wallets().phase() == RefreshPhase::Idle;
        ui.horizontal(|ui| {
            if ui::primary_button_enabled(ui, "New Smart Wallet", ready).clicked() {
                self.coordinator.request_new_wallet();
            }
            if ui
                .add_enabled(ready, egui::Button::new("⟳ Refresh"))
                .clicked()
            {
                self.coordinator.refresh_signal().request();
            }
        });
    }

    fn render_body(&mut self, ui: &mut egui::Ui) {
        ui::styled_heading(ui, "Smart Wallets");
        ui.add_space(6.0);

        if let Some(e) = self.coordinator.last_error() {
            if e.is_fatal() {
                render_fatal(ui, &e.to_string());
                return;
            }
            let message = e.to_string();
            let mut dismiss = false;
            ui::card(ui, |ui| {
                ui::error_message(ui, &message);
                dismiss = ui.small_button("Dismiss").clicked();
            });
            if dismiss {
                self.coordinator.dismiss_error();
            }
            ui.add_space(6.0);
        }

        if self.modals.open.is_none() {
            if let Some(feedback) = self.modals.feedback.clone() {
                ui.horizontal(|ui| {
                    ui::feedback_message(ui, &feedback);
                    if ui.small_button("✖").clicked() {
                        self.modals.feedback = None;
                    }
                });
                ui.add_space(6.0);
            }
        }

        let session = self.coordinator.session();
        if session.account.is_none() {
            ui.label("Connect a wallet to list its smart wallets.");
            return;
        }
        if self.coordinator.provider_session().is_none() {
            ui.label("The relaying client is not initialized.");
            return;
        }

        if let Some((address, kind)) = wallet_list::render(ui, self.coordinator.wallets()) {
            if self.coordinator.select_wallet(address) {
                if let Some(target) = self.coordinator.modal_target() {
                    self.modals.open(kind, target);
                }
            }
        }
    }

    fn connect(&mut self, ctx: &egui::Context) {
        if self.connecting {
            return;
        }
        self.connecting = true;
        self.coordinator.dismiss_error();
        let ports = self.ports.clone();
        let settings = self.coordinator.settings().clone();
        let started = spawn_task(&self.connect_result, ctx, move || async move {
            connect_flow(&ports, &settings).await
        });
        if let Err(e) = started {
            self.connecting = false;
            self.coordinator.apply_connect(Err(AppError::Transaction(e)));
        }
    }

    fn check_connect_result(&mut self) {
        if let Some(result) = self.connect_result.take() {
            self.connecting = false;
            self.coordinator.apply_connect(result);
        }
    }

    fn spawn_load(&mut self, ctx: &egui::Context, request: LoadRequest) {
        let ports = self.ports.clone();
        let task_request = request.clone();
        let started = spawn_task(&self.load_result, ctx, move || async move {
            let result = load_wallets_flow(&ports, &task_request).await;
            (task_request, result)
        });
        if let Err(e) = started {
            self.coordinator.apply_wallets(&request, Err(AppError::Query(e)));
        }
    }

    /// Listings of abandoned reloads may finish together with the current
    /// one; the coordinator keeps only the one it waits for.
    fn check_load_result(&mut self) {
        while let Some((request, result)) = self.load_result.take() {
            self.coordinator.apply_wallets(&request, result);
        }
    }

    fn check_modal_results(&mut self) {
        while let Some((submission, result)) = self.modals.tasks.deploy.take() {
            let feedback = self.modals.deploy.finish_deploy(&submission, result);
            self.modals.show_feedback(ModalKind::Deploy, feedback);
        }
        while let Some((submission, result)) = self.modals.tasks.transfer.take() {
            let feedback = self.modals.transfer.finish_transfer(&submission, result);
            self.modals.show_feedback(ModalKind::Transfer, feedback);
        }
        while let Some((submission, result)) = self.modals.tasks.execute.take() {
            let feedback = self.modals.execute.finish_execute(&submission, result);
            self.modals.show_feedback(ModalKind::Execute, feedback);
        }
        while let Some((submission, result)) = self.modals.tasks.estimate.take() {
            let feedback = self.modals.execute.finish_estimate(&submission, result);
            self.modals.show_feedback(ModalKind::Execute, feedback);
        }
        while let Some(text) = self.modals.tasks.paste.take() {
            self.apply_paste(text);
        }
    }

    /// Fills the contract field only with a well-formed address.
    fn apply_paste(&mut self, text: Option<String>) {
        let warning = match text.as_deref().map(ui::validate_address) {
            Some(AddressValidation::Valid(address)) => {
                self.modals
                    .execute
                    .update(ExecuteField::Contract(address.to_checksum(None)));
                None
            }
            Some(AddressValidation::ChecksumMismatch) => {
                Some("Clipboard address has an invalid checksum")
            }
            Some(AddressValidation::Invalid) => Some("Clipboard does not contain an address"),
            None => Some("Clipboard is empty or unavailable"),
        };
        self.modals.paste_warning = warning.map(str::to_owned);
    }

    fn handle_modal_action(&mut self, ctx: &egui::Context, action: ModalAction) {
        let (Some(kind), Some(target)) = (self.modals.open, self.modals.target.clone()) else {
            return;
        };
        let ports = self.ports.clone();

        match action {
            ModalAction::None => {}
            ModalAction::Close => self.modals.close(),
            ModalAction::Paste => ui::request_paste(&self.modals.tasks.paste, ctx),
            ModalAction::Estimate => match self.modals.execute.begin_estimate() {
                Ok(submission) => {
                    self.modals.feedback = None;
                    let price = self.coordinator.token_price_native().to_owned();
                    let slot = &self.modals.tasks.estimate;
                    run_modal_task(slot, ctx, submission, move |form| async move {
                        execute::run_estimate(&ports, &target, &form, &price).await
                    });
                }
                Err(e) => self.show_error(kind, &e),
            },
            ModalAction::Submit => {
                self.modals.feedback = None;
                let tasks = &self.modals.tasks;
                let started = match kind {
                    ModalKind::Deploy => self.modals.deploy.begin_deploy().map(|submission| {
                        run_modal_task(&tasks.deploy, ctx, submission, move |form| async move {
                            run_deploy(&ports, &target, &form).await
                        });
                    }),
                    ModalKind::Transfer => self.modals.transfer.begin_transfer().map(|submission| {
                        run_modal_task(&tasks.transfer, ctx, submission, move |form| async move {
                            run_transfer(&ports, &target, &form).await
                        });
                    }),
                    ModalKind::Execute => self.modals.execute.begin_execute().map(|submission| {
                        run_modal_task(&tasks.execute, ctx, submission, move |form| async move {
                            execute::run_execute(&ports, &target, &form).await
                        });
                    }),
                    ModalKind::Receive => Ok(()),
                };
                if let Err(e) = started {
                    self.show_error(kind, &e);
                }
            }
        }
    }

    fn show_error(&mut self, kind: ModalKind, e: &AppError) {
        self.modals.show_feedback(kind, ModalFeedback::error(e));
    }
}

/// Runs `run` on a background task and hands its result back together with
/// the submission. A task that cannot start reports a failed result at once,
/// so the button leaves its in-flight state.
fn run_modal_task<F, T, R, Fut>(
    slot: &TaskSlot<Finished<F, T>>,
    ctx: &egui::Context,
    submission: Submission<F>,
    run: R,
) where
    F: Clone + MaybeSend + 'static,
    T: MaybeSend + 'static,
    R: FnOnce(F) -> Fut + MaybeSend + 'static,
    Fut: std::future::Future<Output = Result<T, AppError>> + 'static,
{
    let task_submission = submission.clone();
    let started = spawn_task(slot, ctx, move || async move {
        let result = run(task_submission.form.clone()).await;
        (task_submission, result)
    });
    if let Err(e) = started {
        slot.put((submission, Err(AppError::Transaction(e))));
    }
}

fn render_fatal(ui: &mut egui::Ui, message: &str) {
    ui.add_space(40.0);
    ui.vertical_centered(|ui| {
        ui::styled_heading(ui, "Wallet provider required");
        ui.add_space(10.0);
        ui::error_message(ui, message);
        ui.label("Install or enable an EIP-1193 wallet and reload the page.");
    });
}
