//! Relay Wallet: manage smart wallets that pay fees in tokens through a relay

mod app;
mod modals;
mod state;
mod tasks;
mod ui;
mod wallet_list;

use relay_wallet_adapters::AdapterConfig;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eyre::Result<()> {
    use eframe::egui;

    // A missing .env is normal; the process environment still applies.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env"),
    }

    let config = AdapterConfig::from_env();
    tracing::info!(profile = ?config.runtime_profile, "Starting Relay Wallet");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Relay Wallet")
            .with_inner_size([960.0, 680.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Relay Wallet",
        native_options,
        Box::new(|cc| Ok(Box::new(app::App::new(cc, config)))),
    )
    .map_err(|e| eyre::eyre!("failed to run the application: {e}"))
}

#[cfg(target_arch = "wasm32")]
fn main() {
    use wasm_bindgen::JsCast;

    tracing_wasm::set_as_global_default();

    let web_options = eframe::WebOptions::default();
    wasm_bindgen_futures::spawn_local(async {
        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("relay_wallet_canvas"))
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok());
        let Some(canvas) = canvas else {
            tracing::error!("canvas element 'relay_wallet_canvas' not found");
            return;
        };

        let config = AdapterConfig::from_env();
        let started = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(app::App::new(cc, config)))),
            )
            .await;
        if let Err(e) = started {
            tracing::error!(error = ?e, "failed to start the application");
        }
    });
}
