//! `wasm-bindgen` entry points. Only compiled on `wasm32` targets.

mod dom;
mod host;
mod listeners;
mod storage;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Reflect;
use tracing::{Level, debug, error, info, warn};
use vama_core::Site;
use vama_core::error::BOOTSTRAP_FAILED_MESSAGE;
use vama_core::map_link::{self, MapFallback, OpenOutcome, WINDOW_FEATURES};
use vama_i18n::builtin_catalog;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Document, Window};

use crate::{bootstrap, logging};
use dom::Dom;
use host::Host;
use listeners::listen_once;
use storage::LocalStorage;

thread_local! {
    static HOST: RefCell<Option<host::Shared>> = const { RefCell::new(None) };
}

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn console_line(level: Level, line: &str) {
    let line = JsValue::from_str(line);
    match level {
        Level::ERROR => web_sys::console::error_1(&line),
        Level::WARN => web_sys::console::warn_1(&line),
        Level::INFO => web_sys::console::log_1(&line),
        _ => web_sys::console::debug_1(&line),
    }
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
    let Some(window) = web_sys::window() else {
        console_error("vama-web: no window, nothing to do");
        return;
    };
    let Some(document) = window.document() else {
        console_error("vama-web: no document, nothing to do");
        return;
    };
    if document.ready_state() == "loading" {
        if let Err(err) = listen_once(&document, "DOMContentLoaded", move || boot(&window)) {
            console_error(&format!("vama-web: cannot wait for DOMContentLoaded: {err:?}"));
        }
    } else {
        boot(&window);
    }
}

fn boot(window: &Window) {
    let Some(document) = window.document() else {
        return;
    };
    let raw = Dom::config_text(&document);
    let (config, config_err) = bootstrap::resolve_config(raw.as_deref());
    logging::init(&config.log_level, console_line);
    if let Some(err) = config_err {
        warn!(%err, "inline configuration ignored");
    }

    let catalog = match builtin_catalog() {
        Ok(catalog) => Rc::new(catalog),
        Err(err) => {
            error!(%err, "string catalog failed to load");
            fail(&document);
            return;
        }
    };

    let (dom, markup) = match Dom::bind(window.clone()) {
        Ok(bound) => bound,
        Err(err) => {
            error!(error = ?err, "page binding failed");
            fail(&document);
            return;
        }
    };

    let site = Site::new(&config, markup, catalog, LocalStorage);
    let host = Host::new(site, dom);
    if let Err(err) = host::start(&host, &config) {
        error!(error = ?err, "listener setup failed");
        host::bootstrap_failed(&host);
    }
    HOST.with(|slot| *slot.borrow_mut() = Some(host));
    info!("site ready");
}

fn fail(document: &Document) {
    if let Err(err) = dom::show_banner(document, BOOTSTRAP_FAILED_MESSAGE) {
        console_error(&format!("vama-web: banner unavailable: {err:?}"));
    }
}

/// Open the restaurant's location in a new tab, falling back to the
/// clipboard or a plain alert when the browser refuses.
#[wasm_bindgen(js_name = openMap)]
pub fn open_map() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let outcome = match map_link::map_url() {
        Ok(url) => match window.open_with_url_and_target_and_features(
            url.as_str(),
            "_blank",
            WINDOW_FEATURES,
        ) {
            Ok(Some(_)) => OpenOutcome::Handle,
            Ok(None) => OpenOutcome::NoHandle,
            Err(err) => {
                warn!(error = ?err, "map tab failed");
                OpenOutcome::Failed
            }
        },
        Err(err) => {
            error!(%err, "map url rejected");
            OpenOutcome::Failed
        }
    };
    debug!(?outcome, "map link followed");
    if outcome.needs_fallback() {
        map_fallback(&window);
    }
}

fn map_fallback(window: &Window) {
    let navigator = window.navigator();
    let clipboard_available =
        Reflect::has(&navigator, &JsValue::from_str("clipboard")).unwrap_or(false);
    match map_link::fallback_plan(clipboard_available) {
        MapFallback::CopyToClipboard { text, confirmation } => {
            let promise = navigator.clipboard().write_text(text);
            let window = window.clone();
            spawn_local(async move {
                let message = match JsFuture::from(promise).await {
                    Ok(_) => confirmation,
                    Err(err) => {
                        warn!(error = ?err, "clipboard write refused");
                        text
                    }
                };
                alert(&window, message);
            });
        }
        MapFallback::Alert(address) => alert(window, address),
    }
}

fn alert(window: &Window, message: &str) {
    if let Err(err) = window.alert_with_message(message) {
        warn!(error = ?err, "alert failed");
    }
}
