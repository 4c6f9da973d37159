#![forbid(unsafe_code)]

//! Platform-independent interactivity for the VAMA9 site.
//!
//! Every coordinator is a plain state machine: it consumes a page event and
//! returns the [`Effect`]s the host must apply to the document. Nothing here
//! touches JS or the DOM, so the whole behavior is testable natively.
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`language`] | Locale switching and the language dropdown |
//! | [`navigation`] | Mobile menu, anchor scrolling, active-section highlight |
//! | [`menu`] | Category filter and "show more" |
//! | [`gallery`] | Image lightbox |
//! | [`scroll`] | Back-to-top control and reveal-on-scroll |
//! | [`site`] | Event routing and error reporting |

pub mod config;
pub mod effect;
pub mod error;
pub mod gallery;
pub mod keys;
pub mod language;
pub mod map_link;
pub mod markup;
pub mod menu;
pub mod navigation;
pub mod prefs;
pub mod reactive;
pub mod schedule;
pub mod scroll;
pub mod site;
pub mod state;
pub mod visibility;

pub use config::{ConfigError, SiteConfig};
pub use effect::{Display, Effect, Fade, FrameTask, Target, Timer, Widget};
pub use error::{SiteError, StorageError};
pub use gallery::LightboxHit;
pub use keys::Key;
pub use markup::{GalleryImage, PageMarkup, PageMetrics, SectionBounds};
pub use prefs::{MemoryStorage, Preferences, StorageBackend};
pub use site::{Site, SiteEvent};
pub use state::PageError;
