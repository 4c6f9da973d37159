//! Language coordinator: locale switching and the language dropdown.
//!
//! Applying a locale rewrites every translatable node from the catalog,
//! updates the current-locale indicator and `<html lang>`, and announces the
//! change to screen readers. A key the catalog lacks for the target locale
//! leaves that node's text as it was.

use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info, warn};
use vama_i18n::{Locale, StringCatalog};

use crate::config::SiteConfig;
use crate::effect::{Effect, Target, Timer, Widget, aria_bool};
use crate::error::SiteError;
use crate::prefs::Preferences;
use crate::state::{Announcer, LocaleState};

/// Locale switching and dropdown state.
#[derive(Debug)]
pub struct LanguageCoordinator {
    catalog: Rc<StringCatalog>,
    locale: LocaleState,
    prefs: Preferences,
    announcer: Announcer,
    storage_key: String,
    focus_delay: Duration,
    /// `data-translate` key per translatable node.
    keys: Vec<String>,
    has_options: bool,
    dropdown_open: bool,
    ready: bool,
}

impl LanguageCoordinator {
    pub fn new(
        config: &SiteConfig,
        catalog: Rc<StringCatalog>,
        locale: LocaleState,
        prefs: Preferences,
        announcer: Announcer,
        keys: Vec<String>,
        lang_options: usize,
    ) -> Self {
        Self {
            catalog,
            locale,
            prefs,
            announcer,
            storage_key: config.storage_key.clone(),
            focus_delay: config.focus_delay(),
            keys,
            has_options: lang_options > 0,
            dropdown_open: false,
            ready: false,
        }
    }

    /// Close the dropdown and render the active locale. No-op once ready.
    pub fn init(&mut self) -> Vec<Effect> {
        if self.ready {
            return Vec::new();
        }
        let mut out = Vec::new();
        self.close_dropdown(&mut out);
        self.apply(self.locale.get(), &mut out);
        self.ready = true;
        out
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    #[must_use]
    pub fn dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    /// Switch to `code`, persist it, and close the dropdown.
    pub fn select_locale(&mut self, code: &str) -> Result<Vec<Effect>, SiteError> {
        let locale = code
            .parse::<Locale>()
            .ok()
            .filter(|l| self.catalog.contains_locale(*l))
            .ok_or_else(|| SiteError::UnknownLocale(code.to_owned()))?;

        let mut out = Vec::new();
        self.apply(locale, &mut out);
        if !self.prefs.set(&self.storage_key, locale.code()) {
            debug!(%locale, "locale not persisted");
        }
        self.close_dropdown(&mut out);
        Ok(out)
    }

    /// Click on the language switcher.
    pub fn toggle_dropdown(&mut self) -> Vec<Effect> {
        let mut out = Vec::new();
        if self.dropdown_open {
            self.close_dropdown(&mut out);
        } else {
            self.open_dropdown(&mut out);
        }
        out
    }

    /// Any click on the document. Clicks inside the dropdown are ignored.
    pub fn document_click(&mut self, inside_dropdown: bool) -> Vec<Effect> {
        let mut out = Vec::new();
        if !inside_dropdown && self.dropdown_open {
            self.close_dropdown(&mut out);
        }
        out
    }

    /// `Escape` closes an open dropdown.
    pub fn escape(&mut self) -> Vec<Effect> {
        let mut out = Vec::new();
        if self.dropdown_open {
            self.close_dropdown(&mut out);
        }
        out
    }

    /// Delayed focus into the options, skipped if the dropdown closed.
    pub fn focus_first_option(&self) -> Vec<Effect> {
        if self.dropdown_open && self.has_options {
            vec![Effect::Focus(Target::LangOption(0))]
        } else {
            Vec::new()
        }
    }

    fn apply(&mut self, locale: Locale, out: &mut Vec<Effect>) {
        // The handle is written first so anything deriving labels from it
        // during this dispatch sees the new locale.
        self.locale.set(locale);

        out.push(Effect::text(Widget::CurrentLang, locale.indicator()));

        let mut skipped = 0usize;
        for (index, key) in self.keys.iter().enumerate() {
            match self.catalog.get(locale, key) {
                Some(text) if !text.is_empty() => {
                    out.push(Effect::text(Target::Translatable(index), text));
                }
                _ => {
                    skipped += 1;
                    debug!(%locale, key = %key, "no translation, node left unchanged");
                }
            }
        }
        if skipped > 0 {
            warn!(%locale, skipped, "untranslated nodes kept their previous text");
        }

        out.push(Effect::SetDocumentLang(locale));
        self.announcer
            .announce(format!("Language changed to {locale}"), out);
        info!(%locale, "language applied");
    }

    fn open_dropdown(&mut self, out: &mut Vec<Effect>) {
        self.dropdown_open = true;
        out.push(Effect::class(Widget::LangDropdown, "active", true));
        out.push(Effect::class(Widget::LangMenu, "active", true));
        out.push(Effect::attr(Widget::LangSwitcher, "aria-expanded", aria_bool(true)));
        if self.has_options {
            out.push(Effect::schedule(self.focus_delay, Timer::FocusFirstLangOption));
        }
    }

    fn close_dropdown(&mut self, out: &mut Vec<Effect>) {
        self.dropdown_open = false;
        out.push(Effect::class(Widget::LangDropdown, "active", false));
        out.push(Effect::class(Widget::LangMenu, "active", false));
        out.push(Effect::attr(Widget::LangSwitcher, "aria-expanded", aria_bool(false)));
    }
}
