#![forbid(unsafe_code)]

//! Browser host for the VAMA9 site.
//!
//! Binds the page described by the DOM contract, feeds DOM events into
//! [`vama_core::Site`] and applies the returned effects through `web-sys`.
//! The module starts itself on load (`#[wasm_bindgen(start)]`) and exports
//! `openMap` for inline handlers.
//!
//! The DOM-free pieces (configuration lookup, selectors, console logging)
//! build natively and are tested there.

pub mod batch;
pub mod bootstrap;
pub mod logging;
pub mod selectors;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::open_map;
