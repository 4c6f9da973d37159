//! DOM event listeners as [`Subscription`] guards.
//!
//! Dropping the guard removes the listener and frees the closure, so a
//! listener's lifetime is exactly the lifetime of whatever owns the guard.

use js_sys::Function;
use tracing::warn;
use vama_core::reactive::Subscription;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

/// Attach `handler` for `kind` events on `target`.
pub fn listen(
    target: &EventTarget,
    kind: &'static str,
    handler: impl FnMut(Event) + 'static,
) -> Result<Subscription, JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    let target = target.clone();
    Ok(Subscription::from_fn(move || {
        let callback: &Function = closure.as_ref().unchecked_ref();
        if let Err(err) = target.remove_event_listener_with_callback(kind, callback) {
            warn!(kind, error = ?err, "listener removal failed");
        }
    }))
}

/// Attach a handler that runs at most once and frees itself afterwards.
pub fn listen_once(
    target: &EventTarget,
    kind: &str,
    handler: impl FnOnce() + 'static,
) -> Result<(), JsValue> {
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    let callback = Closure::once_into_js(handler);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        kind,
        callback.unchecked_ref(),
        &options,
    )
}
