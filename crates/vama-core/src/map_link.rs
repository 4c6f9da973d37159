//! Outbound map link for the restaurant address.

use url::Url;

/// Postal address opened in the map provider.
pub const RESTAURANT_ADDRESS: &str = "Strada Teplitei 66, 435500 Sighetu Marmației, România";

/// Alert shown after the address was copied instead of opened.
pub const COPIED_CONFIRMATION: &str = "Adresa a fost copiată în clipboard";

const MAP_SEARCH_BASE: &str = "https://www.google.com/maps/search/";

/// `window.open` features for the new browsing context.
pub const WINDOW_FEATURES: &str = "noopener,noreferrer";

/// Map search URL for `address`.
pub fn map_url_for(address: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(MAP_SEARCH_BASE, &[("api", "1"), ("query", address)])
}

/// Map search URL for the restaurant.
pub fn map_url() -> Result<Url, url::ParseError> {
    map_url_for(RESTAURANT_ADDRESS)
}

/// How `window.open` answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// Returned a window handle.
    Handle,
    /// Returned `null`. With `noopener` in the features this is the normal
    /// answer for a tab that did open.
    NoHandle,
    /// Threw, or the URL could not be built.
    Failed,
}

impl OpenOutcome {
    /// Whether the clipboard/alert fallback should run.
    #[must_use]
    pub const fn needs_fallback(self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// What to do when the map could not be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapFallback {
    /// Write `text` to the clipboard, then alert `confirmation`.
    CopyToClipboard {
        text: &'static str,
        confirmation: &'static str,
    },
    /// Alert the address itself.
    Alert(&'static str),
}

#[must_use]
pub fn fallback_plan(clipboard_available: bool) -> MapFallback {
    if clipboard_available {
        MapFallback::CopyToClipboard {
            text: RESTAURANT_ADDRESS,
            confirmation: COPIED_CONFIRMATION,
        }
    } else {
        MapFallback::Alert(RESTAURANT_ADDRESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encodes_address() {
        let url = map_url().unwrap();
        assert_eq!(url.host_str(), Some("www.google.com"));
        assert_eq!(url.path(), "/maps/search/");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("api".to_owned(), "1".to_owned()),
                ("query".to_owned(), RESTAURANT_ADDRESS.to_owned()),
            ]
        );
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn null_handle_is_not_a_failure() {
        assert!(WINDOW_FEATURES.contains("noopener"));
        assert!(!OpenOutcome::NoHandle.needs_fallback());
        assert!(!OpenOutcome::Handle.needs_fallback());
        assert!(OpenOutcome::Failed.needs_fallback());
    }

    #[test]
    fn fallback_depends_on_clipboard() {
        assert_eq!(
            fallback_plan(true),
            MapFallback::CopyToClipboard {
                text: RESTAURANT_ADDRESS,
                confirmation: COPIED_CONFIRMATION,
            }
        );
        assert_eq!(fallback_plan(false), MapFallback::Alert(RESTAURANT_ADDRESS));
    }
}
