use eframe::egui;

use relay_wallet_core::modals::{DeployField, DeployModal};

use super::{submit_row, ModalAction};
use crate::ui;

pub fn render(ui: &mut egui::Ui, modal: &mut DeployModal) -> ModalAction {
    ui.label("Deploys this smart wallet through the relay. The fee is paid in tokens.");
    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.label("Fees:");
        if let Some(v) = ui::edited(&modal.form().fees, |v| ui::number_input(ui, v, "0")) {
            modal.update(DeployField::Fees(v));
        }
    });
    submit_row(ui, "Deploy", modal.deploy_state().is_in_flight())
}
