//! Supported locale codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::I18nError;

/// A locale the site ships translations for.
///
/// The wire form (storage value, `data-lang` attribute, document `lang`) is
/// the lower-case two-letter code.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Romanian, the site default.
    #[default]
    Ro,
    En,
    Fr,
}

impl Locale {
    /// Every supported locale, in menu order.
    pub const ALL: [Locale; 3] = [Locale::Ro, Locale::En, Locale::Fr];

    /// Two-letter code, e.g. `"ro"`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ro => "ro",
            Self::En => "en",
            Self::Fr => "fr",
        }
    }

    /// Label for the current-locale indicator (`"RO"`, `"EN"`, ...).
    #[must_use]
    pub const fn indicator(self) -> &'static str {
        match self {
            Self::Ro => "RO",
            Self::En => "EN",
            Self::Fr => "FR",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    /// Parse an exact two-letter code. Case and surrounding whitespace are
    /// not normalized: the stored preference and markup attributes are
    /// written by this crate, so anything else is treated as unknown.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|locale| locale.code() == s)
            .ok_or_else(|| I18nError::InvalidLocale(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_code() {
        for locale in Locale::ALL {
            assert_eq!(locale.code().parse::<Locale>().unwrap(), locale);
        }
    }

    #[test]
    fn rejects_unknown_and_non_canonical() {
        assert!("de".parse::<Locale>().is_err());
        assert!("EN".parse::<Locale>().is_err());
        assert!(" en".parse::<Locale>().is_err());
        assert!("".parse::<Locale>().is_err());
    }

    #[test]
    fn default_is_romanian() {
        assert_eq!(Locale::default(), Locale::Ro);
    }

    #[test]
    fn serde_uses_lowercase_code() {
        assert_eq!(serde_json::to_string(&Locale::Fr).unwrap(), "\"fr\"");
        let parsed: Locale = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(parsed, Locale::En);
    }

    #[test]
    fn indicator_is_upper_case_code() {
        for locale in Locale::ALL {
            assert_eq!(locale.indicator(), locale.code().to_uppercase());
        }
    }
}
