//! Property-based invariants of the site coordinators.
//!
//! 1. `all` with N items shows min(N, limit) and the toggle iff N > limit.
//! 2. Expanding shows every matching item; collapsing restores the short view.
//! 3. Any interleaving of filter clicks and timers leaves exactly the policy's
//!    items visible once pending work has drained.
//! 4. An unsupported locale code never changes the active locale.
//! 5. Lightbox navigation stays in range and wraps.

use std::rc::Rc;

use proptest::prelude::*;
use vama_core::{
    Display, Effect, GalleryImage, Key, MemoryStorage, PageMarkup, Site, SiteConfig, SiteEvent,
    Target, Timer, Widget,
};
use vama_i18n::{Locale, builtin_catalog};

const CATEGORIES: [&str; 3] = ["main", "dessert", "drinks"];

// ── Strategies ────────────────────────────────────────────────────────────

fn items_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(
        proptest::sample::select(CATEGORIES.to_vec()).prop_map(str::to_owned),
        0..14,
    )
}

#[derive(Debug, Clone)]
enum Step {
    Select(&'static str),
    Toggle,
    FireTimers,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        proptest::sample::select(vec!["all", "main", "dessert", "drinks"]).prop_map(Step::Select),
        Just(Step::Toggle),
        Just(Step::FireTimers),
    ]
}

// ── Harness ───────────────────────────────────────────────────────────────

struct Harness {
    site: Site,
    display: Vec<Option<Display>>,
    timers: Vec<Timer>,
    frames: Vec<vama_core::FrameTask>,
    toggle: Option<Display>,
}

impl Harness {
    fn new(items: Vec<String>, gallery: usize) -> Self {
        let count = items.len();
        let markup = PageMarkup {
            category_buttons: std::iter::once("all")
                .chain(CATEGORIES)
                .map(str::to_owned)
                .collect(),
            menu_items: items,
            gallery: (0..gallery)
                .map(|i| GalleryImage::new(format!("{i}.jpg"), None, i + 1))
                .collect(),
            ..PageMarkup::default()
        };
        let mut site = Site::new(
            &SiteConfig::default(),
            markup,
            Rc::new(builtin_catalog().unwrap()),
            MemoryStorage::new(),
        );
        let effects = site.init();
        let mut harness = Self {
            site,
            display: vec![None; count],
            timers: Vec::new(),
            frames: Vec::new(),
            toggle: None,
        };
        harness.apply(effects);
        harness
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SetDisplay {
                    target: Target::MenuItem(i),
                    display,
                } => self.display[i] = Some(display),
                Effect::SetDisplay {
                    target: Target::Widget(Widget::ShowMoreContainer),
                    display,
                } => self.toggle = Some(display),
                Effect::Schedule { timer, .. } => self.timers.push(timer),
                Effect::RequestFrame(task) => self.frames.push(task),
                _ => {}
            }
        }
    }

    fn send(&mut self, event: SiteEvent) {
        let effects = self.site.handle(event);
        self.apply(effects);
    }

    fn drain(&mut self) {
        while !self.timers.is_empty() || !self.frames.is_empty() {
            for task in std::mem::take(&mut self.frames) {
                self.send(SiteEvent::Frame {
                    task,
                    metrics: Default::default(),
                });
            }
            for timer in std::mem::take(&mut self.timers) {
                self.send(SiteEvent::TimerFired(timer));
            }
        }
    }

    fn visible(&self) -> Vec<usize> {
        self.display
            .iter()
            .enumerate()
            .filter(|(_, d)| **d != Some(Display::None))
            .map(|(i, _)| i)
            .collect()
    }
}

fn expected_visible(items: &[String], category: &str, expanded: bool, limit: usize) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, c)| category == "all" || c.as_str() == category)
        .map(|(i, _)| i)
        .enumerate()
        .filter(|(rank, _)| expanded || *rank < limit)
        .map(|(_, i)| i)
        .collect()
}

// ── Properties ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn all_shows_at_most_limit(items in items_strategy()) {
        let n = items.len();
        let mut h = Harness::new(items, 0);
        h.drain();

        prop_assert_eq!(h.visible().len(), n.min(4));
        let expected_toggle = if n > 4 { Display::Block } else { Display::None };
        prop_assert_eq!(h.toggle, Some(expected_toggle));
    }

    #[test]
    fn expand_then_collapse_round_trips(items in items_strategy()) {
        let n = items.len();
        let mut h = Harness::new(items, 0);
        h.drain();
        let collapsed = h.visible();

        h.send(SiteEvent::ShowMoreClicked);
        h.drain();
        prop_assert_eq!(h.visible().len(), n);

        h.send(SiteEvent::ShowMoreClicked);
        h.drain();
        prop_assert_eq!(h.visible(), collapsed);
    }

    #[test]
    fn settled_view_matches_policy(
        items in items_strategy(),
        steps in proptest::collection::vec(step_strategy(), 0..24),
    ) {
        let mut h = Harness::new(items.clone(), 0);
        for step in steps {
            match step {
                Step::Select(category) => h.send(SiteEvent::CategorySelected(category.into())),
                Step::Toggle => h.send(SiteEvent::ShowMoreClicked),
                Step::FireTimers => {
                    for timer in std::mem::take(&mut h.timers) {
                        h.send(SiteEvent::TimerFired(timer));
                    }
                }
            }
        }
        h.drain();

        let menu = h.site.menu();
        let expected = expected_visible(
            &items,
            menu.current_category().id(),
            menu.expanded(),
            4,
        );
        prop_assert_eq!(h.visible(), expected);
    }

    #[test]
    fn unsupported_locale_is_inert(code in "[a-z]{2,3}") {
        prop_assume!(code.parse::<Locale>().is_err());
        let mut h = Harness::new(Vec::new(), 0);
        let before = h.site.state().locale().get();
        h.send(SiteEvent::LangOptionSelected(code));
        prop_assert_eq!(h.site.state().locale().get(), before);
        prop_assert_eq!(h.site.state().banner().updates(), 1);
    }

    #[test]
    fn lightbox_cursor_stays_in_range(
        len in 1usize..8,
        start in 0usize..8,
        keys in proptest::collection::vec(
            proptest::sample::select(vec![Key::ArrowLeft, Key::ArrowRight]),
            0..32,
        ),
    ) {
        let start = start % len;
        let mut h = Harness::new(Vec::new(), len);
        h.send(SiteEvent::GalleryActivated(start));
        let mut expected = start;
        for key in keys {
            h.send(SiteEvent::LightboxKey(key));
            if len > 1 {
                expected = match key {
                    Key::ArrowLeft => (expected + len - 1) % len,
                    _ => (expected + 1) % len,
                };
            }
        }
        prop_assert!(h.site.lightbox().current() < len);
        prop_assert_eq!(h.site.lightbox().current(), expected);
    }
}
