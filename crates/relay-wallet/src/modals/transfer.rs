use eframe::egui;

use relay_wallet_core::modals::{TransferField, TransferModal};
use relay_wallet_core::ExecuteMode;

use super::{submit_row, ModalAction};
use crate::ui;

pub fn render(ui: &mut egui::Ui, modal: &mut TransferModal, token_decimals: Option<u8>) -> ModalAction {
    egui::Grid::new("transfer_form")
        .num_columns(2)
        .spacing([10.0, 6.0])
        .show(ui, |ui| {
            ui.label("Recipient:");
            if let Some(v) = ui::edited(&modal.form().recipient, |v| ui::address_input(ui, v)) {
                modal.update(TransferField::Recipient(v));
            }
            ui.end_row();

            ui.label("Amount:");
            if let Some(v) = ui::edited(&modal.form().amount, |v| ui::number_input(ui, v, "0.0")) {
                modal.update(TransferField::Amount(v));
            }
            ui.end_row();

            ui.label("Pay with:");
            ui.horizontal(|ui| {
                let mode = modal.form().mode;
                for option in [ExecuteMode::Relayed, ExecuteMode::Direct] {
                    if ui.selectable_label(mode == option, option.label()).clicked() {
                        modal.update(TransferField::Mode(option));
                    }
                }
            });
            ui.end_row();

            if modal.form().mode == ExecuteMode::Relayed {
                ui.label("Fees:");
                if let Some(v) = ui::edited(&modal.form().fees, |v| ui::number_input(ui, v, "0")) {
                    modal.update(TransferField::Fees(v));
                }
                ui.end_row();
            }
        });

    if let Some(decimals) = token_decimals {
        ui.label(egui::RichText::new(format!("Token amounts use {decimals} decimals.")).weak());
    }
    submit_row(ui, "Transfer", modal.transfer_state().is_in_flight())
}
