//! UI helper components

use alloy::primitives::{Address, U256};
use eframe::egui;

use relay_wallet_core::modals::{FeedbackKind, ModalFeedback};
use relay_wallet_core::units::format_display;

use crate::tasks::TaskSlot;

pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(0, 212, 170);
const ERROR_RED: egui::Color32 = egui::Color32::from_rgb(220, 80, 80);
const SUCCESS_GREEN: egui::Color32 = egui::Color32::from_rgb(80, 200, 120);
pub const WARNING_YELLOW: egui::Color32 = egui::Color32::from_rgb(220, 180, 50);

/// Styled heading with accent color
pub fn styled_heading(ui: &mut egui::Ui, text: &str) {
    ui.heading(egui::RichText::new(text).color(ACCENT));
}

/// Section header with separator
pub fn section_header(ui: &mut egui::Ui, text: &str) {
    ui.add_space(10.0);
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(text).strong().size(14.0));
    });
    ui.separator();
}

#[cfg(not(target_arch = "wasm32"))]
pub fn copy_to_clipboard(text: &str) {
    match arboard::Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(e) = clipboard.set_text(text) {
                tracing::warn!(error = %e, "clipboard write failed");
            }
        }
        Err(e) => tracing::warn!(error = %e, "clipboard unavailable"),
    }
}

#[cfg(target_arch = "wasm32")]
pub fn copy_to_clipboard(text: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.navigator().clipboard().write_text(text);
    }
}

/// Reads the clipboard into `slot`. Immediate on native; the browser
/// clipboard answers asynchronously.
#[cfg(not(target_arch = "wasm32"))]
pub fn request_paste(slot: &TaskSlot<Option<String>>, _ctx: &egui::Context) {
    let text = arboard::Clipboard::new()
        .and_then(|mut clipboard| clipboard.get_text())
        .map_err(|e| tracing::warn!(error = %e, "clipboard read failed"))
        .ok();
    slot.put(text);
}

#[cfg(target_arch = "wasm32")]
pub fn request_paste(slot: &TaskSlot<Option<String>>, ctx: &egui::Context) {
    let Some(window) = web_sys::window() else {
        slot.put(None);
        return;
    };
    let promise = window.navigator().clipboard().read_text();
    let started = crate::tasks::spawn_task(slot, ctx, move || async move {
        wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .ok()
            .and_then(|value| value.as_string())
    });
    if started.is_err() {
        slot.put(None);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressValidation {
    Valid(Address),
    ChecksumMismatch,
    Invalid,
}

/// Mixed-case input must carry a valid EIP-55 checksum; all-lower or
/// all-upper hex is accepted as is.
pub fn validate_address(input: &str) -> AddressValidation {
    let trimmed = input.trim();
    let Ok(address) = trimmed.parse::<Address>() else {
        return AddressValidation::Invalid;
    };
    let hex = trimmed.trim_start_matches("0x").trim_start_matches("0X");
    let mixed_case = hex.chars().any(|c| c.is_ascii_lowercase())
        && hex.chars().any(|c| c.is_ascii_uppercase());
    if mixed_case && Address::parse_checksummed(trimmed, None).is_err() {
        return AddressValidation::ChecksumMismatch;
    }
    AddressValidation::Valid(address)
}

/// Create a styled text edit for address input
pub fn address_input(ui: &mut egui::Ui, value: &mut String) -> egui::Response {
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text("0x...")
            .desired_width(400.0)
            .font(egui::TextStyle::Monospace),
    )
}

pub fn number_input(ui: &mut egui::Ui, value: &mut String, hint: &str) -> egui::Response {
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text(hint)
            .desired_width(150.0)
            .font(egui::TextStyle::Monospace),
    )
}

/// Edits a copy of `current` and returns the new text if it changed.
pub fn edited(current: &str, edit: impl FnOnce(&mut String) -> egui::Response) -> Option<String> {
    let mut value = current.to_owned();
    edit(&mut value).changed().then_some(value)
}

pub fn loading_spinner(ui: &mut egui::Ui, text: &str) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(text);
    });
}

pub fn error_message(ui: &mut egui::Ui, message: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("❌").size(16.0));
        ui.label(egui::RichText::new(message).color(ERROR_RED));
    });
}

pub fn success_message(ui: &mut egui::Ui, message: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("✅").size(16.0));
        ui.label(egui::RichText::new(message).color(SUCCESS_GREEN));
    });
}

pub fn warning_message(ui: &mut egui::Ui, message: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("⚠️").size(14.0));
        ui.label(egui::RichText::new(message).color(WARNING_YELLOW));
    });
}

pub fn feedback_message(ui: &mut egui::Ui, feedback: &ModalFeedback) {
    match feedback.kind {
        FeedbackKind::Success => success_message(ui, &feedback.message),
        FeedbackKind::Error => error_message(ui, &feedback.message),
    }
}

/// Monospace address with a copy button
pub fn copyable_address(ui: &mut egui::Ui, address: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(address).monospace());
        if ui
            .small_button("📋")
            .on_hover_text("Copy to clipboard")
            .clicked()
        {
            copy_to_clipboard(address);
        }
    });
}

pub fn primary_button_enabled(ui: &mut egui::Ui, text: &str, enabled: bool) -> egui::Response {
    let accent = egui::Color32::from_rgb(0, 180, 150);
    let btn = egui::Button::new(egui::RichText::new(text).size(14.0).color(egui::Color32::WHITE))
        .min_size(egui::vec2(130.0, 34.0))
        .fill(accent);
    ui.add_enabled(enabled, btn)
}

pub fn secondary_button(ui: &mut egui::Ui, text: &str) -> egui::Response {
    let btn = egui::Button::new(egui::RichText::new(text).size(14.0))
        .min_size(egui::vec2(90.0, 34.0));
    ui.add(btn)
}

/// Render content in a subtle card/frame
pub fn card(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .fill(ui.visuals().faint_bg_color)
        .rounding(6.0)
        .inner_margin(12.0)
        .show(ui, add_contents);
}

/// Balance for display: trailing zeros dropped, integer part grouped.
pub fn format_balance(amount: U256, decimals: u8) -> String {
    let plain = format_display(amount, decimals);
    match plain.split_once('.') {
        Some((int_part, frac)) => format!("{}.{frac}", add_thousand_separators(int_part)),
        None => add_thousand_separators(&plain),
    }
}

fn add_thousand_separators(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

pub fn short_address(address: Address) -> String {
    let full = address.to_checksum(None);
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}
