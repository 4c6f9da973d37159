//! Flat message catalog with per-locale coverage reporting.
//!
//! # Invariants
//!
//! 1. **Exact lookup**: `get()` consults only the requested locale. There is
//!    no fallback chain; a missing key returns `None` and the caller decides
//!    what to do (the language coordinator leaves the node untouched).
//!
//! 2. **Immutable after load**: the catalog is built once at startup and only
//!    read afterwards.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing key | Key not in the locale | Returns `None` |
//! | Missing locale | Locale never added | Returns `None`, `contains_locale` is false |
//! | Bad catalog file | Not a flat JSON object of strings | `I18nError::ParseError` |
//! | Incomplete locale | Keys present elsewhere but not here | Listed by `coverage_report()` |

use std::collections::{BTreeMap, HashMap};

use crate::locale::Locale;

/// Errors from i18n operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// A locale code is not one of the supported locales.
    InvalidLocale(String),
    /// A catalog file could not be parsed.
    ParseError { locale: Locale, message: String },
}

impl std::fmt::Display for I18nError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLocale(code) => write!(f, "invalid locale: {code:?}"),
            Self::ParseError { locale, message } => {
                write!(f, "parse error in '{locale}' catalog: {message}")
            }
        }
    }
}

impl std::error::Error for I18nError {}

/// Strings for a single locale.
#[derive(Debug, Clone, Default)]
pub struct LocaleStrings {
    strings: HashMap<String, String>,
}

impl LocaleStrings {
    /// Create an empty locale string set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a flat JSON object (`{"key": "text", ...}`).
    pub fn from_json(locale: Locale, json: &str) -> Result<Self, I18nError> {
        let strings: HashMap<String, String> =
            serde_json::from_str(json).map_err(|err| I18nError::ParseError {
                locale,
                message: err.to_string(),
            })?;
        Ok(Self { strings })
    }

    /// Insert a string, replacing any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings.insert(key.into(), value.into());
    }

    /// Look up a string by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the locale has no strings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Iterate over all keys in this locale.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.strings.keys().map(String::as_str)
    }
}

/// Message catalog keyed by [`Locale`].
///
/// # Example
///
/// ```
/// use vama_i18n::{Locale, LocaleStrings, StringCatalog};
///
/// let mut ro = LocaleStrings::new();
/// ro.insert("nav_home", "Acasă");
/// let mut catalog = StringCatalog::new();
/// catalog.add_locale(Locale::Ro, ro);
///
/// assert_eq!(catalog.get(Locale::Ro, "nav_home"), Some("Acasă"));
/// assert_eq!(catalog.get(Locale::En, "nav_home"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringCatalog {
    locales: BTreeMap<Locale, LocaleStrings>,
}

impl StringCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the strings for a locale.
    pub fn add_locale(&mut self, locale: Locale, strings: LocaleStrings) {
        self.locales.insert(locale, strings);
    }

    /// Whether `locale` has been loaded.
    #[must_use]
    pub fn contains_locale(&self, locale: Locale) -> bool {
        self.locales.contains_key(&locale)
    }

    /// Look up a string in exactly one locale.
    #[must_use]
    pub fn get(&self, locale: Locale, key: &str) -> Option<&str> {
        self.locales.get(&locale).and_then(|ls| ls.get(key))
    }

    /// Strings for one locale.
    #[must_use]
    pub fn strings(&self, locale: Locale) -> Option<&LocaleStrings> {
        self.locales.get(&locale)
    }

    /// All loaded locales, in [`Locale`] order.
    #[must_use]
    pub fn locales(&self) -> Vec<Locale> {
        self.locales.keys().copied().collect()
    }

    /// Collect all unique keys across every loaded locale, sorted.
    #[must_use]
    pub fn all_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .locales
            .values()
            .flat_map(|ls| ls.keys().map(String::from))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    /// Keys from `reference_keys` that `locale` does not provide, sorted.
    #[must_use]
    pub fn missing_keys(&self, locale: Locale, reference_keys: &[&str]) -> Vec<String> {
        let mut missing: Vec<String> = reference_keys
            .iter()
            .filter(|key| self.get(locale, key).is_none())
            .map(|key| (*key).to_owned())
            .collect();
        missing.sort_unstable();
        missing.dedup();
        missing
    }

    /// Coverage of every loaded locale against the union of all keys.
    #[must_use]
    pub fn coverage_report(&self) -> CoverageReport {
        let all = self.all_keys();
        let ref_keys: Vec<&str> = all.iter().map(String::as_str).collect();
        let total = ref_keys.len();

        let locales = self
            .locales
            .keys()
            .map(|&locale| {
                let missing = self.missing_keys(locale, &ref_keys);
                let present = total.saturating_sub(missing.len());
                let coverage_percent = if total == 0 {
                    100.0
                } else {
                    (present as f32 / total as f32) * 100.0
                };
                LocaleCoverage {
                    locale,
                    present,
                    missing,
                    coverage_percent,
                }
            })
            .collect();

        CoverageReport {
            total_keys: total,
            locales,
        }
    }
}

/// Coverage report for a string catalog.
#[derive(Debug, Clone)]
pub struct CoverageReport {
    /// Total number of unique keys across all locales.
    pub total_keys: usize,
    /// Per-locale coverage data, in [`Locale`] order.
    pub locales: Vec<LocaleCoverage>,
}

impl CoverageReport {
    /// Whether every locale provides every key.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.locales.iter().all(|lc| lc.missing.is_empty())
    }

    /// Locales with at least one missing key.
    pub fn incomplete(&self) -> impl Iterator<Item = &LocaleCoverage> {
        self.locales.iter().filter(|lc| !lc.missing.is_empty())
    }
}

/// Per-locale coverage statistics.
#[derive(Debug, Clone)]
pub struct LocaleCoverage {
    pub locale: Locale,
    /// Number of reference keys present.
    pub present: usize,
    /// Keys from the reference set that are missing.
    pub missing: Vec<String>,
    /// Coverage as a percentage (0.0–100.0).
    pub coverage_percent: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_catalog() -> StringCatalog {
        let mut catalog = StringCatalog::new();

        let mut ro = LocaleStrings::new();
        ro.insert("nav_home", "Acasă");
        ro.insert("nav_menu", "Meniu");
        ro.insert("menu_show_more", "Arată mai multe");
        catalog.add_locale(Locale::Ro, ro);

        let mut en = LocaleStrings::new();
        en.insert("nav_home", "Home");
        en.insert("nav_menu", "Menu");
        // "menu_show_more" missing in en
        catalog.add_locale(Locale::En, en);

        let mut fr = LocaleStrings::new();
        fr.insert("nav_home", "Accueil");
        // "nav_menu" and "menu_show_more" missing in fr
        catalog.add_locale(Locale::Fr, fr);

        catalog
    }

    #[test]
    fn simple_lookup() {
        let catalog = sample_catalog();
        assert_eq!(catalog.get(Locale::Ro, "nav_home"), Some("Acasă"));
        assert_eq!(catalog.get(Locale::En, "nav_home"), Some("Home"));
    }

    #[test]
    fn missing_key_does_not_fall_back() {
        let catalog = sample_catalog();
        assert_eq!(catalog.get(Locale::En, "menu_show_more"), None);
    }

    #[test]
    fn missing_locale_returns_none() {
        let mut catalog = StringCatalog::new();
        catalog.add_locale(Locale::Ro, LocaleStrings::new());
        assert!(!catalog.contains_locale(Locale::Fr));
        assert_eq!(catalog.get(Locale::Fr, "nav_home"), None);
    }

    #[test]
    fn locales_are_ordered() {
        let catalog = sample_catalog();
        assert_eq!(catalog.locales(), vec![Locale::Ro, Locale::En, Locale::Fr]);
    }

    #[test]
    fn from_json_parses_flat_object() {
        let strings = LocaleStrings::from_json(Locale::En, r#"{"a": "A", "b": "B"}"#).unwrap();
        assert_eq!(strings.len(), 2);
        assert_eq!(strings.get("b"), Some("B"));
    }

    #[test]
    fn from_json_rejects_nested_values() {
        let err = LocaleStrings::from_json(Locale::Fr, r#"{"a": {"b": "c"}}"#).unwrap_err();
        match err {
            I18nError::ParseError { locale, .. } => assert_eq!(locale, Locale::Fr),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(LocaleStrings::from_json(Locale::Ro, "not json").is_err());
    }

    #[test]
    fn all_keys_is_sorted_and_deduped() {
        let catalog = sample_catalog();
        assert_eq!(
            catalog.all_keys(),
            vec!["menu_show_more", "nav_home", "nav_menu"]
        );
    }

    #[test]
    fn missing_keys_lists_gaps() {
        let catalog = sample_catalog();
        let missing = catalog.missing_keys(Locale::Fr, &["nav_menu", "nav_home", "menu_show_more"]);
        assert_eq!(missing, vec!["menu_show_more", "nav_menu"]);
    }

    #[test]
    fn coverage_report_flags_incomplete_locales() {
        let catalog = sample_catalog();
        let report = catalog.coverage_report();

        assert_eq!(report.total_keys, 3);
        assert!(!report.is_complete());

        let incomplete: Vec<Locale> = report.incomplete().map(|lc| lc.locale).collect();
        assert_eq!(incomplete, vec![Locale::En, Locale::Fr]);

        let fr = report.locales.iter().find(|l| l.locale == Locale::Fr).unwrap();
        assert_eq!(fr.present, 1);
        assert!((fr.coverage_percent - 33.333_332).abs() < 0.01);
    }

    #[test]
    fn coverage_report_empty_catalog() {
        let report = StringCatalog::new().coverage_report();
        assert_eq!(report.total_keys, 0);
        assert!(report.locales.is_empty());
        assert!(report.is_complete());
    }

    #[test]
    fn error_display() {
        assert_eq!(
            I18nError::InvalidLocale("de".into()).to_string(),
            "invalid locale: \"de\""
        );
    }
}
