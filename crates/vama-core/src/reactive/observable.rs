#![forbid(unsafe_code)]

//! Observable value with eager unsubscription.
//!
//! # Design
//!
//! [`Observable<T>`] keeps its value and subscriber slots behind
//! `Rc<RefCell<..>>`. Each subscriber slot has a numeric id; the
//! [`Subscription`] handed back holds a weak reference to the slot list and
//! removes its own id when released, so the list never accumulates dead
//! entries.
//!
//! # Failure Modes
//!
//! - **Re-entrant set**: calling `set()` from inside a subscriber is allowed
//!   (no borrow is held while callbacks run) but the nested notification runs
//!   before the outer one finishes. Coordinators avoid this by only recording
//!   the change in their callbacks.
//! - **Observable dropped first**: releasing a subscription whose observable
//!   is gone is a no-op.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;

struct Slots<T> {
    value: T,
    version: u64,
    next_id: u64,
    subscribers: Vec<(u64, Callback<T>)>,
}

/// A shared, version-tracked value with change notification.
///
/// Cloning an `Observable` yields another handle to the **same** value.
pub struct Observable<T> {
    inner: Rc<RefCell<Slots<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Slots {
                value,
                version: 0,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Replace the value. Subscribers run only when it actually changed.
    pub fn set(&self, value: T) {
        let callbacks: Vec<Callback<T>> = {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
            inner
                .subscribers
                .iter()
                .map(|(_, cb)| Rc::clone(cb))
                .collect()
        };
        let value = self.get();
        for cb in &callbacks {
            cb(&value);
        }
    }

    /// Register a change callback.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Rc::new(callback)));
            id
        };
        let slots: Weak<RefCell<Slots<T>>> = Rc::downgrade(&self.inner);
        Subscription::from_fn(move || {
            if let Some(slots) = slots.upgrade() {
                slots.borrow_mut().subscribers.retain(|(sid, _)| *sid != id);
            }
        })
    }

    /// Number of value-changing mutations so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

/// Guard for an attached callback or listener.
///
/// Holds the detach action. It runs exactly once: on
/// [`unsubscribe`](Self::unsubscribe) or on drop, whichever comes first.
#[must_use = "dropping a Subscription detaches it immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap an arbitrary detach action.
    pub fn from_fn(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Detach now.
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    /// Whether the detach action has not run yet.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
