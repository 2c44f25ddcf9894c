use eframe::egui;

use relay_wallet_core::modals::{ExecuteField, ExecuteModal};
use relay_wallet_core::ExecuteMode;

use super::{submit_row, ModalAction};
use crate::ui;

pub fn render(ui: &mut egui::Ui, modal: &mut ExecuteModal, paste_warning: Option<&str>) -> ModalAction {
    let mut action = ModalAction::None;

    egui::Grid::new("execute_form")
        .num_columns(2)
        .spacing([10.0, 6.0])
        .show(ui, |ui| {
            ui.label("Contract:");
            ui.horizontal(|ui| {
                if let Some(v) = ui::edited(&modal.form().contract, |v| ui::address_input(ui, v)) {
                    modal.update(ExecuteField::Contract(v));
                }
                if ui.small_button("📥").on_hover_text("Paste address").clicked() {
                    action = ModalAction::Paste;
                }
            });
            ui.end_row();

            ui.label("Function:");
            if let Some(v) = ui::edited(&modal.form().function, |v| {
                ui.add(
                    egui::TextEdit::singleline(v)
                        .hint_text("transfer(address,uint256)")
                        .desired_width(400.0)
                        .font(egui::TextStyle::Monospace),
                )
            }) {
                modal.update(ExecuteField::Function(v));
            }
            ui.end_row();

            ui.label("Values:");
            if let Some(v) = ui::edited(&modal.form().values, |v| {
                ui.add(
                    egui::TextEdit::singleline(v)
                        .hint_text("0x...,100")
                        .desired_width(400.0)
                        .font(egui::TextStyle::Monospace),
                )
            }) {
                modal.update(ExecuteField::Values(v));
            }
            ui.end_row();

            ui.label("Pay with:");
            ui.horizontal(|ui| {
                let mode = modal.form().mode;
                for option in [ExecuteMode::Relayed, ExecuteMode::Direct] {
                    if ui.selectable_label(mode == option, option.label()).clicked() {
                        modal.update(ExecuteField::Mode(option));
                    }
                }
            });
            ui.end_row();

            ui.label("Fees:");
            ui.horizontal(|ui| {
                if let Some(v) = ui::edited(&modal.form().fees, |v| ui::number_input(ui, v, "0")) {
                    modal.update(ExecuteField::Fees(v));
                }
                let estimating = modal.estimate_state().is_in_flight();
                if ui.add_enabled(!estimating, egui::Button::new("Estimate")).clicked() {
                    action = ModalAction::Estimate;
                }
                if estimating {
                    ui.spinner();
                }
            });
            ui.end_row();
        });

    if let Some(warning) = paste_warning {
        ui::warning_message(ui, warning);
    }

    let mut show_return_data = modal.form().show_return_data;
    if ui.checkbox(&mut show_return_data, "Show return data").changed() {
        modal.update(ExecuteField::ShowReturnData(show_return_data));
    }

    if let Some(results) = modal.results() {
        ui::section_header(ui, "Result");
        let mut text = results.to_owned();
        ui.add(
            egui::TextEdit::multiline(&mut text)
                .desired_width(f32::INFINITY)
                .desired_rows(4)
                .font(egui::TextStyle::Monospace)
                .interactive(false),
        );
    }

    match submit_row(ui, "Execute", modal.execute_state().is_in_flight()) {
        ModalAction::None => action,
        pressed => pressed,
    }
}
