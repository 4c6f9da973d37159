//! Failure-tolerant preference store.
//!
//! [`StorageBackend`] is the raw, fallible key-value API (`localStorage` on
//! the web). [`Preferences`] wraps it so that callers only ever see "value or
//! absent" and "written or not": failures are logged at `warn` and never
//! propagated. There are no retries; storage either works for the session or
//! it doesn't.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use tracing::warn;

use crate::error::StorageError;

/// Synchronous key-value persistence.
pub trait StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory backend. Used natively and when the browser exposes no storage.
///
/// Failures can be injected to exercise the degraded paths.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, String>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with one stored pair.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage
            .values
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        storage
    }

    /// Make every subsequent read fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Raw view of a stored value, bypassing failure injection.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.get() {
            return Err(StorageError::Unavailable("reads disabled".into()));
        }
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::WriteRejected("quota exceeded".into()));
        }
        self.values
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

impl<B: StorageBackend + ?Sized> StorageBackend for std::rc::Rc<B> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Preference store that swallows backend failures.
pub struct Preferences {
    backend: Box<dyn StorageBackend>,
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences").finish_non_exhaustive()
    }
}

impl Preferences {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Stored value, or `None` when absent or unreadable.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "storage access failed");
                None
            }
        }
    }

    /// Store a value. Returns `false` (after logging) when the write failed.
    pub fn set(&self, key: &str, value: &str) -> bool {
        match self.backend.set(key, value) {
            Ok(()) => true,
            Err(err) => {
                warn!(key, error = %err, "storage write failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn round_trip() {
        let prefs = Preferences::new(MemoryStorage::new());
        assert_eq!(prefs.get("k"), None);
        assert!(prefs.set("k", "en"));
        assert_eq!(prefs.get("k"), Some("en".into()));
    }

    #[test]
    fn read_failure_is_absent() {
        let storage = Rc::new(MemoryStorage::with_value("k", "fr"));
        storage.fail_reads(true);
        let prefs = Preferences::new(Rc::clone(&storage));
        assert_eq!(prefs.get("k"), None);

        storage.fail_reads(false);
        assert_eq!(prefs.get("k"), Some("fr".into()));
    }

    #[test]
    fn write_failure_reports_false_and_keeps_old_value() {
        let storage = Rc::new(MemoryStorage::with_value("k", "ro"));
        storage.fail_writes(true);
        let prefs = Preferences::new(Rc::clone(&storage));
        assert!(!prefs.set("k", "en"));
        assert_eq!(storage.peek("k"), Some("ro".into()));
    }
}
