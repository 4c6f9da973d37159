//! The site dispatcher: one entry point for every page event.
//!
//! [`Site`] owns the coordinators and routes each [`SiteEvent`] to the ones
//! that care. Rejected selections are logged and turned into a banner
//! update here, so coordinators never touch the banner themselves.
//!
//! The host drives it:
//!
//! ```text
//! let mut site = Site::new(config, markup, catalog, storage);
//! apply(site.init());
//! // for each DOM event / timer / frame:
//! apply(site.handle(event));
//! ```

use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, warn};
use vama_i18n::StringCatalog;

use crate::config::SiteConfig;
use crate::effect::{Effect, FrameTask, Timer};
use crate::error::{BOOTSTRAP_FAILED_MESSAGE, SiteError};
use crate::gallery::{Lightbox, LightboxHit};
use crate::keys::Key;
use crate::language::LanguageCoordinator;
use crate::markup::{PageMarkup, PageMetrics};
use crate::menu::MenuFilter;
use crate::navigation::NavigationCoordinator;
use crate::prefs::{Preferences, StorageBackend};
use crate::scroll::{BackToTop, RevealTracker};
use crate::state::{Announcer, AppState, PageError};

/// Everything the host reports back.
#[derive(Debug, Clone, PartialEq)]
pub enum SiteEvent {
    LangSwitcherClicked,
    LangOptionSelected(String),
    /// Click anywhere on the document.
    DocumentClicked { inside_dropdown: bool },
    /// Document-level keydown.
    Key(Key),
    NavToggleClicked,
    NavLinkClicked,
    /// Click on a same-page anchor. `target_top` is `None` when nothing
    /// matches the `href`.
    AnchorClicked { href: String, target_top: Option<f64> },
    /// Window scroll at host time `now`.
    Scrolled { now: Duration },
    Frame { task: FrameTask, metrics: PageMetrics },
    TimerFired(Timer),
    CategorySelected(String),
    ShowMoreClicked,
    /// Click on a gallery image.
    GalleryActivated(usize),
    /// Keydown on a focused gallery image.
    GalleryKey { index: usize, key: Key },
    LightboxClicked(LightboxHit),
    /// Keydown delivered by the lightbox's own listener.
    LightboxKey(Key),
    /// The host could not build the overlay the lightbox asked for.
    LightboxFailed,
    BackToTopClicked,
    BlockIntersected { index: usize, intersecting: bool },
    PageError(PageError),
}

pub struct Site {
    state: AppState,
    language: LanguageCoordinator,
    navigation: NavigationCoordinator,
    menu: MenuFilter,
    lightbox: Lightbox,
    back_to_top: BackToTop,
    reveal: RevealTracker,
    /// Set by a switcher click until the next event; the document click
    /// bubbling from that same click must not close the dropdown again.
    switcher_echo: bool,
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("locale", &self.state.locale().get())
            .field("dropdown_open", &self.language.dropdown_open())
            .field("menu_open", &self.navigation.menu_open())
            .field("lightbox_open", &self.lightbox.is_open())
            .finish_non_exhaustive()
    }
}

impl Site {
    pub fn new(
        config: &SiteConfig,
        markup: PageMarkup,
        catalog: Rc<StringCatalog>,
        storage: impl StorageBackend + 'static,
    ) -> Self {
        warn_on_gaps(&catalog, &markup.translatable_keys);

        let prefs = Preferences::new(storage);
        let state = AppState::new(config, &prefs, &catalog);
        let announcer = Announcer::new(config.announcement());

        let PageMarkup {
            translatable_keys,
            lang_options,
            nav_links,
            category_buttons,
            menu_items,
            gallery,
            reveal_blocks,
            has_skip_nav,
        } = markup;

        let language = LanguageCoordinator::new(
            config,
            Rc::clone(&catalog),
            state.locale(),
            prefs,
            announcer.clone(),
            translatable_keys,
            lang_options,
        );
        let menu = MenuFilter::new(
            config,
            catalog,
            state.locale(),
            announcer,
            category_buttons,
            menu_items,
        );

        Self {
            language,
            navigation: NavigationCoordinator::new(config, nav_links),
            menu,
            lightbox: Lightbox::new(config, gallery),
            back_to_top: BackToTop::new(config, has_skip_nav),
            reveal: RevealTracker::new(reveal_blocks),
            state,
            switcher_echo: false,
        }
    }

    /// Initialize every coordinator. Idempotent.
    pub fn init(&mut self) -> Vec<Effect> {
        let mut out = self.language.init();
        out.extend(self.navigation.init());
        out.extend(self.menu.init());
        out.extend(self.reveal.init());
        self.finish(out)
    }

    pub fn handle(&mut self, event: SiteEvent) -> Vec<Effect> {
        let echo = std::mem::take(&mut self.switcher_echo);
        let out = match event {
            SiteEvent::LangSwitcherClicked => {
                self.switcher_echo = true;
                self.language.toggle_dropdown()
            }
            SiteEvent::LangOptionSelected(code) => {
                let result = self.language.select_locale(&code);
                self.or_report(result)
            }
            SiteEvent::DocumentClicked { .. } if echo => {
                debug!("switcher click reached the document, ignored");
                Vec::new()
            }
            SiteEvent::DocumentClicked { inside_dropdown } => {
                self.language.document_click(inside_dropdown)
            }
            SiteEvent::Key(Key::Escape) => {
                let mut out = self.language.escape();
                out.extend(self.navigation.escape());
                out
            }
            SiteEvent::Key(_) => Vec::new(),
            SiteEvent::NavToggleClicked => self.navigation.toggle_menu(),
            SiteEvent::NavLinkClicked => self.navigation.link_clicked(),
            SiteEvent::AnchorClicked { href, target_top } => {
                self.navigation.anchor_clicked(&href, target_top)
            }
            SiteEvent::Scrolled { now } => {
                let mut out = self.navigation.scrolled();
                out.extend(self.back_to_top.scrolled(now));
                out
            }
            SiteEvent::Frame { task, metrics } => self.frame(task, &metrics),
            SiteEvent::TimerFired(timer) => self.timer(timer),
            SiteEvent::CategorySelected(category) => {
                let result = self.menu.select_category(&category);
                self.or_report(result)
            }
            SiteEvent::ShowMoreClicked => self.menu.toggle_expansion(),
            SiteEvent::GalleryActivated(index) => self.open_image(index),
            SiteEvent::GalleryKey { index, key } if key.is_activation() => self.open_image(index),
            SiteEvent::GalleryKey { .. } => Vec::new(),
            SiteEvent::LightboxClicked(hit) => self.lightbox.clicked(hit),
            SiteEvent::LightboxKey(key) => self.lightbox.key(key),
            SiteEvent::LightboxFailed => {
                warn!("lightbox overlay could not be shown, closing");
                self.lightbox.close()
            }
            SiteEvent::BackToTopClicked => self.back_to_top.clicked(),
            SiteEvent::BlockIntersected {
                index,
                intersecting,
            } => self.reveal.intersected(index, intersecting),
            SiteEvent::PageError(err) => vec![self.state.report_page_error(&err)],
        };
        self.finish(out)
    }

    /// Banner update for a bootstrap that could not complete.
    pub fn bootstrap_failed(&mut self) -> Vec<Effect> {
        vec![self.state.show_message(BOOTSTRAP_FAILED_MESSAGE)]
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn language(&self) -> &LanguageCoordinator {
        &self.language
    }

    #[must_use]
    pub fn navigation(&self) -> &NavigationCoordinator {
        &self.navigation
    }

    #[must_use]
    pub fn menu(&self) -> &MenuFilter {
        &self.menu
    }

    #[must_use]
    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    #[must_use]
    pub fn back_to_top(&self) -> &BackToTop {
        &self.back_to_top
    }

    #[must_use]
    pub fn reveal(&self) -> &RevealTracker {
        &self.reveal
    }

    fn frame(&mut self, task: FrameTask, metrics: &PageMetrics) -> Vec<Effect> {
        match task {
            FrameTask::NavScroll => self.navigation.frame(metrics),
            FrameTask::BackToTop => self.back_to_top.frame(metrics.scroll_y),
            FrameTask::FadeInMenuItem { item, generation } => {
                self.menu.item_frame(item, generation)
            }
        }
    }

    fn timer(&mut self, timer: Timer) -> Vec<Effect> {
        match timer {
            Timer::RemoveAnnouncement(id) => vec![Effect::RemoveAnnouncement(id)],
            Timer::FocusFirstLangOption => self.language.focus_first_option(),
            Timer::FocusFirstNavLink => self.navigation.focus_first_link(),
            Timer::FocusLightboxClose => self.lightbox.focus_close(),
            Timer::FocusSkipNav => self.back_to_top.focus_skip_nav(),
            Timer::HideMenuItem { item, generation } => self.menu.item_timer(item, generation),
            Timer::HideMenuLoading => self.menu.hide_loading(),
            Timer::SelectInitialCategory => self.menu.select_initial(),
        }
    }

    fn open_image(&mut self, index: usize) -> Vec<Effect> {
        let result = self.lightbox.open(index);
        self.or_report(result)
    }

    fn or_report(&mut self, result: Result<Vec<Effect>, SiteError>) -> Vec<Effect> {
        result.unwrap_or_else(|err| vec![self.state.report(&err)])
    }

    /// Append effects derived from state changed during this dispatch.
    fn finish(&mut self, mut out: Vec<Effect>) -> Vec<Effect> {
        out.extend(self.menu.sync_locale());
        out
    }
}

/// Startup catalog check. Gaps are logged, never fatal.
fn warn_on_gaps(catalog: &StringCatalog, markup_keys: &[String]) {
    let report = catalog.coverage_report();
    for gap in report.incomplete() {
        warn!(
            locale = %gap.locale,
            missing = ?gap.missing,
            coverage = gap.coverage_percent,
            "incomplete locale"
        );
    }

    let keys: Vec<&str> = markup_keys.iter().map(String::as_str).collect();
    for locale in catalog.locales() {
        let missing = catalog.missing_keys(locale, &keys);
        if missing.is_empty() {
            debug!(%locale, "markup keys covered");
        } else {
            warn!(%locale, ?missing, "markup keys without translation");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::Widget;
    use crate::markup::GalleryImage;
    use crate::prefs::MemoryStorage;
    use vama_i18n::builtin_catalog;

    fn site() -> Site {
        let markup = PageMarkup {
            translatable_keys: vec!["nav_home".into()],
            lang_options: 3,
            nav_links: vec!["#home".into()],
            category_buttons: vec!["all".into(), "main".into()],
            menu_items: vec!["main".into(); 6],
            gallery: vec![
                GalleryImage::new("a.jpg", Some("A"), 1),
                GalleryImage::new("b.jpg", None, 2),
            ],
            reveal_blocks: 2,
            has_skip_nav: true,
        };
        Site::new(
            &SiteConfig::default(),
            markup,
            Rc::new(builtin_catalog().unwrap()),
            MemoryStorage::new(),
        )
    }

    #[test]
    fn init_is_idempotent() {
        let mut site = site();
        assert!(!site.init().is_empty());
        assert!(site.init().is_empty());
    }

    #[test]
    fn escape_closes_dropdown_and_menu() {
        let mut site = site();
        site.init();
        site.handle(SiteEvent::LangSwitcherClicked);
        site.handle(SiteEvent::NavToggleClicked);
        let effects = site.handle(SiteEvent::Key(Key::Escape));
        assert!(!site.language().dropdown_open());
        assert!(!site.navigation().menu_open());
        assert!(effects.contains(&Effect::Focus(Widget::NavToggle.into())));
    }

    #[test]
    fn switcher_click_survives_its_own_bubble() {
        let mut site = site();
        site.init();
        site.handle(SiteEvent::LangSwitcherClicked);
        assert!(site.handle(SiteEvent::DocumentClicked { inside_dropdown: false }).is_empty());
        assert!(site.language().dropdown_open());

        site.handle(SiteEvent::TimerFired(Timer::FocusFirstLangOption));
        site.handle(SiteEvent::DocumentClicked { inside_dropdown: false });
        assert!(!site.language().dropdown_open());
    }

    #[test]
    fn failed_overlay_closes_lightbox() {
        let mut site = site();
        site.handle(SiteEvent::GalleryActivated(1));
        assert!(site.lightbox().is_open());

        let effects = site.handle(SiteEvent::LightboxFailed);
        assert!(!site.lightbox().is_open());
        assert!(effects.contains(&Effect::LockScroll(false)));
        assert!(effects.contains(&Effect::ReleaseLightboxKeys));
        assert!(site.handle(SiteEvent::LightboxFailed).is_empty());
    }

    #[test]
    fn bad_gallery_index_reports_banner() {
        let mut site = site();
        let effects = site.handle(SiteEvent::GalleryActivated(9));
        assert!(matches!(effects.as_slice(), [Effect::ShowBanner(_)]));
        assert_eq!(site.state().banner().updates(), 1);
    }

    #[test]
    fn gallery_key_opens_only_on_activation() {
        let mut site = site();
        assert!(
            site.handle(SiteEvent::GalleryKey {
                index: 0,
                key: Key::Other
            })
            .is_empty()
        );
        site.handle(SiteEvent::GalleryKey {
            index: 1,
            key: Key::Space,
        });
        assert!(site.lightbox().is_open());
        assert_eq!(site.lightbox().current(), 1);
    }

    #[test]
    fn timers_route_to_owners() {
        let mut site = site();
        assert_eq!(
            site.handle(SiteEvent::TimerFired(Timer::RemoveAnnouncement(4))),
            vec![Effect::RemoveAnnouncement(4)]
        );
        assert!(!site.handle(SiteEvent::TimerFired(Timer::HideMenuLoading)).is_empty());
    }

    #[test]
    fn bootstrap_failure_uses_shared_banner() {
        let mut site = site();
        assert_eq!(
            site.bootstrap_failed(),
            vec![Effect::ShowBanner(BOOTSTRAP_FAILED_MESSAGE.into())]
        );
    }
}
