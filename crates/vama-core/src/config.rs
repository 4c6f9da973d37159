//! Site configuration.
//!
//! Every tunable constant lives in [`SiteConfig`]. The defaults match the
//! published site; a page may override any subset by embedding a JSON object
//! (see [`SiteConfig::from_json`]), missing fields keep their defaults.

use std::time::Duration;

use serde::Deserialize;
use vama_i18n::Locale;

/// Errors from loading a configuration override.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The override was not valid JSON for [`SiteConfig`].
    Parse(String),
    /// A field holds a value the coordinators cannot work with.
    Invalid { field: &'static str, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Invalid { field, reason } => write!(f, "invalid config field `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Tuning knobs for the site coordinators.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Storage key of the persisted locale preference.
    pub storage_key: String,
    /// Locale used when nothing (or something unsupported) is stored.
    pub default_locale: Locale,

    /// Scroll offset past which the navbar gets the `scrolled` class.
    pub navbar_scrolled_px: f64,
    /// Distance below the viewport top used to pick the active section.
    pub section_probe_px: f64,
    /// Fixed header height subtracted from anchor scroll targets.
    pub header_offset_px: f64,
    /// Scroll offset past which the back-to-top control is visible.
    pub back_to_top_px: f64,

    /// Fade duration of menu item show/hide.
    pub animation_ms: u64,
    /// Lifetime of screen-reader announcements.
    pub announcement_ms: u64,
    /// Delay before moving focus into a freshly opened widget.
    pub focus_delay_ms: u64,
    /// Delay before the menu auto-selects the `all` category.
    pub initial_category_delay_ms: u64,
    /// How long the menu loading skeleton stays up.
    pub loading_skeleton_ms: u64,
    /// Minimum spacing between back-to-top scroll evaluations.
    pub scroll_throttle_ms: u64,

    /// Items shown per category before "show more" is needed.
    pub collapsed_item_limit: usize,

    /// Fraction of a block that must be visible before it is revealed.
    pub reveal_threshold: f64,
    /// Bottom root-margin shrink applied to the reveal observer.
    pub reveal_margin_px: f64,

    /// `tracing` filter directive for the browser console logger.
    pub log_level: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            storage_key: "vama9_language".to_owned(),
            default_locale: Locale::Ro,
            navbar_scrolled_px: 50.0,
            section_probe_px: 100.0,
            header_offset_px: 80.0,
            back_to_top_px: 500.0,
            animation_ms: 300,
            announcement_ms: 1000,
            focus_delay_ms: 100,
            initial_category_delay_ms: 100,
            loading_skeleton_ms: 500,
            scroll_throttle_ms: 16,
            collapsed_item_limit: 4,
            reveal_threshold: 0.1,
            reveal_margin_px: 50.0,
            log_level: "info".to_owned(),
        }
    }
}

impl SiteConfig {
    /// Parse a (partial) JSON override and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "storage_key",
                reason: "must not be empty".into(),
            });
        }
        if self.collapsed_item_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "collapsed_item_limit",
                reason: "must be at least 1".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(ConfigError::Invalid {
                field: "reveal_threshold",
                reason: format!("{} is outside 0.0..=1.0", self.reveal_threshold),
            });
        }
        let distances = [
            ("navbar_scrolled_px", self.navbar_scrolled_px),
            ("section_probe_px", self.section_probe_px),
            ("header_offset_px", self.header_offset_px),
            ("back_to_top_px", self.back_to_top_px),
            ("reveal_margin_px", self.reveal_margin_px),
        ];
        for (field, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} is not a non-negative distance"),
                });
            }
        }
        Ok(())
    }

    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }

    pub fn announcement(&self) -> Duration {
        Duration::from_millis(self.announcement_ms)
    }

    pub fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.focus_delay_ms)
    }

    pub fn initial_category_delay(&self) -> Duration {
        Duration::from_millis(self.initial_category_delay_ms)
    }

    pub fn loading_skeleton(&self) -> Duration {
        Duration::from_millis(self.loading_skeleton_ms)
    }

    pub fn scroll_throttle(&self) -> Duration {
        Duration::from_millis(self.scroll_throttle_ms)
    }

    /// CSS `rootMargin` for the reveal observer.
    #[must_use]
    pub fn reveal_root_margin(&self) -> String {
        format!("0px 0px -{}px 0px", self.reveal_margin_px)
    }
}
