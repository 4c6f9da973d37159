#![forbid(unsafe_code)]

//! Change-tracking primitives shared by the coordinators.
//!
//! - [`Observable`]: a shared, version-tracked value with change
//!   notification.
//! - [`Subscription`]: guard returned by every attach operation. Releasing it
//!   (explicitly with [`Subscription::unsubscribe`] or by dropping it) detaches
//!   the callback immediately.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that changes the value.
//! 2. Subscribers are notified in registration order.
//! 3. Setting a value equal to the current value is a no-op.
//! 4. A released [`Subscription`] is never invoked again, and its slot is
//!    removed from the subscriber list at release time, not lazily.

pub mod observable;

pub use observable::{Observable, Subscription};
