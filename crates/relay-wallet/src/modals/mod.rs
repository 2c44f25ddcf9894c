//! Modal windows. Each renderer edits its form through typed field updates
//! and reports which button was pressed; the app runs the operation.

mod deploy;
mod execute;
mod receive;
mod transfer;

use eframe::egui;

use relay_wallet_core::ModalKind;

use crate::state::ModalsState;
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    None,
    Submit,
    Estimate,
    Paste,
    Close,
}

/// Draws the open modal, if any.
pub fn show(ctx: &egui::Context, modals: &mut ModalsState, token_decimals: Option<u8>) -> ModalAction {
    let Some(kind) = modals.open else {
        return ModalAction::None;
    };
    let Some(target) = modals.target.clone() else {
        return ModalAction::Close;
    };

    let mut window_open = true;
    let mut action = ModalAction::None;
    egui::Window::new(kind.title())
        .open(&mut window_open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.set_min_width(460.0);
            ui.label(egui::RichText::new(format!("Smart wallet #{}", target.wallet.index)).strong());
            ui::copyable_address(ui, &target.wallet.address.to_checksum(None));
            ui.separator();

            action = match kind {
                ModalKind::Deploy => deploy::render(ui, &mut modals.deploy),
                ModalKind::Receive => receive::render(ui, &modals.receive),
                ModalKind::Transfer => transfer::render(ui, &mut modals.transfer, token_decimals),
                ModalKind::Execute => execute::render(ui, &mut modals.execute, modals.paste_warning.as_deref()),
            };

            if let Some(feedback) = &modals.feedback {
                ui.add_space(6.0);
                ui::feedback_message(ui, feedback);
            }
        });

    if !window_open {
        return ModalAction::Close;
    }
    action
}

/// Submit and close buttons shared by the modals.
fn submit_row(ui: &mut egui::Ui, label: &str, in_flight: bool) -> ModalAction {
    let mut action = ModalAction::None;
    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui::primary_button_enabled(ui, label, !in_flight).clicked() {
            action = ModalAction::Submit;
        }
        if in_flight {
            ui.spinner();
        }
        if ui::secondary_button(ui, "Close").clicked() {
            action = ModalAction::Close;
        }
    });
    action
}
