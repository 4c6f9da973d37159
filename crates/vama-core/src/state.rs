//! Application-wide state: active locale, error banner, live announcements.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, error, info};
use vama_i18n::{Locale, StringCatalog};

use crate::config::SiteConfig;
use crate::effect::{Effect, Timer};
use crate::error::{SiteError, UNCAUGHT_ERROR_MESSAGE, UNHANDLED_REJECTION_MESSAGE};
use crate::prefs::Preferences;
use crate::reactive::{Observable, Subscription};

/// Shared handle to the active locale.
///
/// Written by the language coordinator, read by anything that derives text
/// from the catalog. Clones observe the same value.
#[derive(Debug, Clone)]
pub struct LocaleState {
    inner: Observable<Locale>,
}

impl LocaleState {
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self {
            inner: Observable::new(locale),
        }
    }

    #[must_use]
    pub fn get(&self) -> Locale {
        self.inner.get()
    }

    pub fn set(&self, locale: Locale) {
        self.inner.set(locale);
    }

    /// Run `callback` after every locale change.
    pub fn subscribe(&self, callback: impl Fn(Locale) + 'static) -> Subscription {
        self.inner.subscribe(move |locale| callback(*locale))
    }

    /// Number of locale changes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version()
    }
}

/// Resolve the starting locale from the stored preference.
///
/// Absent, unreadable, unparsable, or uncatalogued values fall back to the
/// configured default.
pub fn initial_locale(config: &SiteConfig, prefs: &Preferences, catalog: &StringCatalog) -> Locale {
    let Some(stored) = prefs.get(&config.storage_key) else {
        return config.default_locale;
    };
    match stored.parse::<Locale>() {
        Ok(locale) if catalog.contains_locale(locale) => locale,
        _ => {
            debug!(stored = %stored, "ignoring unsupported stored locale");
            config.default_locale
        }
    }
}

/// Where an uncaught page-level failure came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// `window` `error` event.
    Uncaught(String),
    /// `window` `unhandledrejection` event.
    UnhandledRejection(String),
}

/// The single, shared, idempotent error banner.
///
/// Each report overwrites the previous message; nothing is queued.
#[derive(Debug, Default)]
pub struct ErrorBanner {
    message: Option<String>,
    updates: u64,
}

impl ErrorBanner {
    pub fn show(&mut self, message: &str) -> Effect {
        self.message = Some(message.to_owned());
        self.updates += 1;
        Effect::ShowBanner(message.to_owned())
    }

    /// Text currently displayed, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Number of times the banner was written.
    #[must_use]
    pub fn updates(&self) -> u64 {
        self.updates
    }
}

/// Issues screen-reader announcements with unique ids.
///
/// Cloned into every coordinator that announces; clones share the counter.
#[derive(Debug, Clone)]
pub struct Announcer {
    next_id: Rc<Cell<u64>>,
    lifetime: Duration,
}

impl Announcer {
    #[must_use]
    pub fn new(lifetime: Duration) -> Self {
        Self {
            next_id: Rc::new(Cell::new(0)),
            lifetime,
        }
    }

    /// Append an announcement and schedule its removal.
    pub fn announce(&self, text: impl Into<String>, out: &mut Vec<Effect>) {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        out.push(Effect::Announce {
            id,
            text: text.into(),
        });
        out.push(Effect::schedule(
            self.lifetime,
            Timer::RemoveAnnouncement(id),
        ));
    }
}

/// Locale handle plus the page-level error hook.
#[derive(Debug)]
pub struct AppState {
    locale: LocaleState,
    banner: ErrorBanner,
}

impl AppState {
    pub fn new(config: &SiteConfig, prefs: &Preferences, catalog: &StringCatalog) -> Self {
        let locale = initial_locale(config, prefs, catalog);
        info!(%locale, "starting locale");
        Self {
            locale: LocaleState::new(locale),
            banner: ErrorBanner::default(),
        }
    }

    /// Handle to share with coordinators.
    #[must_use]
    pub fn locale(&self) -> LocaleState {
        self.locale.clone()
    }

    #[must_use]
    pub fn banner(&self) -> &ErrorBanner {
        &self.banner
    }

    /// Log a rejected selection and surface it in the banner.
    pub fn report(&mut self, err: &SiteError) -> Effect {
        error!(error = %err, "selection rejected");
        self.banner.show(err.banner_message())
    }

    /// Log an uncaught page failure and surface it in the banner.
    pub fn report_page_error(&mut self, err: &PageError) -> Effect {
        match err {
            PageError::Uncaught(detail) => {
                error!(detail = %detail, "global error");
                self.banner.show(UNCAUGHT_ERROR_MESSAGE)
            }
            PageError::UnhandledRejection(detail) => {
                error!(detail = %detail, "unhandled promise rejection");
                self.banner.show(UNHANDLED_REJECTION_MESSAGE)
            }
        }
    }

    /// Show an arbitrary message (bootstrap failures).
    pub fn show_message(&mut self, message: &str) -> Effect {
        self.banner.show(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryStorage;
    use vama_i18n::builtin_catalog;

    fn prefs_with(value: Option<&str>) -> Preferences {
        match value {
            Some(v) => Preferences::new(MemoryStorage::with_value("vama9_language", v)),
            None => Preferences::new(MemoryStorage::new()),
        }
    }

    #[test]
    fn no_preference_uses_default() {
        let config = SiteConfig::default();
        let catalog = builtin_catalog().unwrap();
        assert_eq!(initial_locale(&config, &prefs_with(None), &catalog), Locale::Ro);
    }

    #[test]
    fn stored_preference_wins() {
        let config = SiteConfig::default();
        let catalog = builtin_catalog().unwrap();
        assert_eq!(
            initial_locale(&config, &prefs_with(Some("fr")), &catalog),
            Locale::Fr
        );
    }

    #[test]
    fn unsupported_preference_falls_back() {
        let config = SiteConfig::default();
        let catalog = builtin_catalog().unwrap();
        assert_eq!(
            initial_locale(&config, &prefs_with(Some("de")), &catalog),
            Locale::Ro
        );
    }

    #[test]
    fn uncatalogued_preference_falls_back() {
        let config = SiteConfig::default();
        let mut catalog = StringCatalog::new();
        catalog.add_locale(Locale::Ro, Default::default());
        assert_eq!(
            initial_locale(&config, &prefs_with(Some("en")), &catalog),
            Locale::Ro
        );
    }

    #[test]
    fn unreadable_storage_falls_back() {
        let config = SiteConfig::default();
        let catalog = builtin_catalog().unwrap();
        let storage = MemoryStorage::with_value("vama9_language", "en");
        storage.fail_reads(true);
        let prefs = Preferences::new(storage);
        assert_eq!(initial_locale(&config, &prefs, &catalog), Locale::Ro);
    }

    #[test]
    fn banner_overwrites_instead_of_stacking() {
        let mut state = AppState::new(
            &SiteConfig::default(),
            &prefs_with(None),
            &builtin_catalog().unwrap(),
        );
        state.report_page_error(&PageError::Uncaught("boom".into()));
        let effect = state.report_page_error(&PageError::UnhandledRejection("nope".into()));

        assert_eq!(effect, Effect::ShowBanner(UNHANDLED_REJECTION_MESSAGE.into()));
        assert_eq!(state.banner().message(), Some(UNHANDLED_REJECTION_MESSAGE));
        assert_eq!(state.banner().updates(), 2);
    }

    #[test]
    fn announcer_ids_are_unique_across_clones() {
        let a = Announcer::new(Duration::from_secs(1));
        let b = a.clone();
        let mut out = Vec::new();
        a.announce("one", &mut out);
        b.announce("two", &mut out);

        let ids: Vec<u64> = out
            .iter()
            .filter_map(|e| match e {
                Effect::Announce { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec![0, 1]);
        assert!(out.contains(&Effect::schedule(
            Duration::from_secs(1),
            Timer::RemoveAnnouncement(1)
        )));
    }

    #[test]
    fn locale_state_notifies_subscribers() {
        let state = LocaleState::new(Locale::Ro);
        let seen = Rc::new(Cell::new(Locale::Ro));
        let seen_cb = Rc::clone(&seen);
        let _sub = state.subscribe(move |l| seen_cb.set(l));

        state.clone().set(Locale::En);
        assert_eq!(seen.get(), Locale::En);
        assert_eq!(state.version(), 1);
    }
}
