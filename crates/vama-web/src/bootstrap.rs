//! Startup inputs that do not need the DOM.

use vama_core::{ConfigError, SiteConfig};

/// Configuration from the optional inline JSON block.
///
/// A missing or blank block yields the defaults. A block that fails to parse
/// or validate also yields the defaults, and the error is handed back so it
/// can be logged once logging is up.
pub fn resolve_config(raw: Option<&str>) -> (SiteConfig, Option<ConfigError>) {
    match raw.map(str::trim).filter(|json| !json.is_empty()) {
        None => (SiteConfig::default(), None),
        Some(json) => match SiteConfig::from_json(json) {
            Ok(config) => (config, None),
            Err(err) => (SiteConfig::default(), Some(err)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn absent_block_uses_defaults() {
        let (config, err) = resolve_config(None);
        assert_eq!(config, SiteConfig::default());
        assert!(err.is_none());

        let (_, err) = resolve_config(Some("  \n "));
        assert!(err.is_none());
    }

    #[test]
    fn partial_override_applies() {
        let (config, err) = resolve_config(Some(r#"{"log_level": "debug", "collapsed_item_limit": 6}"#));
        assert!(err.is_none());
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.collapsed_item_limit, 6);
        assert_eq!(config.storage_key, "vama9_language");
    }

    #[test]
    fn broken_block_falls_back_with_error() {
        let (config, err) = resolve_config(Some("{not json"));
        assert_eq!(config, SiteConfig::default());
        assert!(matches!(err, Some(ConfigError::Parse(_))));
    }
}
