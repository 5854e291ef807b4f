mod api;
mod app;
mod components;
mod config;
mod logging;
mod models;
mod pages;
mod state;
mod storage;
mod util;

pub use app::App;

use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();

    let config = config::EnvConfig::new();
    if let Err(e) = logging::init_logging(&config.log_level) {
        // Fall back to the default level rather than running without logs.
        let _ = logging::init_logging(config::DEFAULT_LOG_LEVEL);
        log::warn!("{e}; using `{}`", config::DEFAULT_LOG_LEVEL);
    }
    log::info!("keep notes starting against {}", config.api_url);

    mount_to_body(App);
}
