//! Catalog data shipped with the site, embedded at compile time.

use crate::catalog::{I18nError, LocaleStrings, StringCatalog};
use crate::locale::Locale;

const RO: &str = include_str!("../locales/ro.json");
const EN: &str = include_str!("../locales/en.json");
const FR: &str = include_str!("../locales/fr.json");

fn source(locale: Locale) -> &'static str {
    match locale {
        Locale::Ro => RO,
        Locale::En => EN,
        Locale::Fr => FR,
    }
}

/// Parse the embedded catalog for every supported locale.
pub fn builtin_catalog() -> Result<StringCatalog, I18nError> {
    let mut catalog = StringCatalog::new();
    for locale in Locale::ALL {
        catalog.add_locale(locale, LocaleStrings::from_json(locale, source(locale))?);
    }
    Ok(catalog)
}
