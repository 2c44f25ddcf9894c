use eframe::egui;

use relay_wallet_core::modals::ReceiveModal;

use super::ModalAction;
use crate::ui;

pub fn render(ui: &mut egui::Ui, modal: &ReceiveModal) -> ModalAction {
    let Some(view) = modal.view() else {
        return ModalAction::Close;
    };
    ui.label("Send tokens to this address:");
    ui::card(ui, |ui| ui::copyable_address(ui, &view.address));
    if !view.deployed {
        ui::warning_message(ui, "This smart wallet is not deployed yet.");
    }
    ui.add_space(8.0);
    if ui::secondary_button(ui, "Close").clicked() {
        return ModalAction::Close;
    }
    ModalAction::None
}
