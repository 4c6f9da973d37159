//! Error types surfaced at the coordinator boundary.
//!
//! Coordinators return [`SiteError`] for selections that arrive from a
//! malformed event source. The [`Site`](crate::site::Site) dispatcher logs
//! them and shows [`SiteError::banner_message`] in the shared error banner.
//! Storage problems never reach the visitor: [`StorageError`] is absorbed by
//! [`Preferences`](crate::prefs::Preferences).

/// Banner text for an uncaught page error.
pub const UNCAUGHT_ERROR_MESSAGE: &str =
    "A apărut o eroare neașteptată. Te rugăm să reîmprospătezi pagina.";
/// Banner text for an unhandled promise rejection.
pub const UNHANDLED_REJECTION_MESSAGE: &str = "Eroare de procesare. Te rugăm să încerci din nou.";
/// Banner text when bootstrap fails.
pub const BOOTSTRAP_FAILED_MESSAGE: &str =
    "Aplicația nu s-a putut inițializa corect. Te rugăm să reîmprospătezi pagina.";

/// A failed read or write against the preference backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Storage is disabled or inaccessible (private mode, sandboxed frame).
    Unavailable(String),
    /// The write was refused (quota exceeded, security error).
    WriteRejected(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
            Self::WriteRejected(msg) => write!(f, "storage write rejected: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// An invalid selection rejected by a coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteError {
    /// A locale code that is not in the message catalog.
    UnknownLocale(String),
    /// A menu category that no button or item carries.
    UnknownCategory(String),
    /// A gallery index outside the collected images.
    UnknownImage { index: usize, len: usize },
}

impl SiteError {
    /// Visitor-facing banner text (Romanian, the site's primary language).
    #[must_use]
    pub fn banner_message(&self) -> &'static str {
        match self {
            Self::UnknownLocale(_) => "Nu s-a putut schimba limba. Te rugăm să încerci din nou.",
            Self::UnknownCategory(_) => "Nu s-a putut filtra meniul. Te rugăm să încerci din nou.",
            Self::UnknownImage { .. } => {
                "Imaginea nu a putut fi deschisă. Te rugăm să încerci din nou."
            }
        }
    }
}

impl std::fmt::Display for SiteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLocale(code) => write!(f, "invalid language: {code:?}"),
            Self::UnknownCategory(cat) => write!(f, "invalid menu category: {cat:?}"),
            Self::UnknownImage { index, len } => {
                write!(f, "gallery index {index} out of range for {len} images")
            }
        }
    }
}

impl std::error::Error for SiteError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_offending_value() {
        assert_eq!(
            SiteError::UnknownLocale("de".into()).to_string(),
            "invalid language: \"de\""
        );
        assert_eq!(
            SiteError::UnknownImage { index: 7, len: 3 }.to_string(),
            "gallery index 7 out of range for 3 images"
        );
    }

    #[test]
    fn every_error_has_a_banner() {
        let errors = [
            SiteError::UnknownLocale("x".into()),
            SiteError::UnknownCategory("x".into()),
            SiteError::UnknownImage { index: 0, len: 0 },
        ];
        for err in errors {
            assert!(!err.banner_message().is_empty());
        }
    }
}
