#![forbid(unsafe_code)]

//! Internationalization for the VAMA9 site.
//!
//! Provides the supported [`Locale`] codes, a flat key-based
//! [`StringCatalog`], a coverage report for detecting untranslated keys, and
//! the catalog data shipped with the site.

pub mod builtin;
pub mod catalog;
pub mod locale;

pub use builtin::builtin_catalog;
pub use catalog::{CoverageReport, I18nError, LocaleCoverage, LocaleStrings, StringCatalog};
pub use locale::Locale;
