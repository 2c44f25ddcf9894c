//! Smart wallet table.

use alloy::primitives::Address;
use eframe::egui;

use relay_wallet_core::units::NATIVE_DECIMALS;
use relay_wallet_core::{ModalKind, RefreshPhase, SmartWalletList};

use crate::ui;

/// Renders the collection and returns the action button pressed, if any.
pub fn render(ui: &mut egui::Ui, wallets: &SmartWalletList) -> Option<(Address, ModalKind)> {
    match wallets.phase() {
        RefreshPhase::Clearing | RefreshPhase::Reloading => {
            ui::loading_spinner(ui, "Loading smart wallets...");
            return None;
        }
        RefreshPhase::Idle => {}
    }

    if wallets.records().is_empty() {
        ui.label(
            egui::RichText::new("No smart wallets yet. Create one with \"New Smart Wallet\".")
                .weak(),
        );
        return None;
    }

    let decimals = wallets.token_decimals().unwrap_or(NATIVE_DECIMALS);
    let mut pressed = None;
    egui::Grid::new("smart_wallets")
        .num_columns(6)
        .striped(true)
        .spacing([16.0, 8.0])
        .show(ui, |ui| {
            for header in ["#", "Address", "Status", "Token", "Native", "Actions"] {
                ui.label(egui::RichText::new(header).strong());
            }
            ui.end_row();

            for record in wallets.records() {
                ui.label(record.index.to_string());
                ui.horizontal(|ui| {
                    let checksummed = record.address.to_checksum(None);
                    ui.label(egui::RichText::new(ui::short_address(record.address)).monospace())
                        .on_hover_text(&checksummed);
                    if ui.small_button("📋").on_hover_text("Copy address").clicked() {
                        ui::copy_to_clipboard(&checksummed);
                    }
                });
                if record.deployed {
                    ui.label(egui::RichText::new("Deployed").color(ui::ACCENT));
                } else {
                    ui.label(egui::RichText::new("Not deployed").color(ui::WARNING_YELLOW));
                }
                ui.label(egui::RichText::new(ui::format_balance(record.token_balance, decimals)).monospace());
                ui.label(
                    egui::RichText::new(ui::format_balance(record.native_balance, NATIVE_DECIMALS))
                        .monospace(),
                );
                ui.horizontal(|ui| {
                    let actions: &[ModalKind] = if record.deployed {
                        &[ModalKind::Receive, ModalKind::Transfer, ModalKind::Execute]
                    } else {
                        &[ModalKind::Deploy, ModalKind::Receive]
                    };
                    for kind in actions {
                        if ui.button(kind.title()).clicked() {
                            pressed = Some((record.address, *kind));
                        }
                    }
                });
                ui.end_row();
            }
        });
    pressed
}
