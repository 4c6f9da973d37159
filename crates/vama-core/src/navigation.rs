//! Navigation coordinator: mobile menu, anchor scrolling, scroll highlighting.

use std::time::Duration;

use tracing::debug;

use crate::config::SiteConfig;
use crate::effect::{Effect, FrameTask, Target, Timer, Widget, aria_bool};
use crate::markup::PageMetrics;
use crate::schedule::FrameGate;

#[derive(Debug)]
pub struct NavigationCoordinator {
    /// `href` per `.nav-link`.
    links: Vec<String>,
    menu_open: bool,
    frame: FrameGate,
    /// Last applied `scrolled` state; `None` before the first frame.
    scrolled: Option<bool>,
    /// Section id currently highlighted.
    active_section: Option<String>,
    scrolled_threshold: f64,
    probe_offset: f64,
    header_offset: f64,
    focus_delay: Duration,
    ready: bool,
}

impl NavigationCoordinator {
    pub fn new(config: &SiteConfig, links: Vec<String>) -> Self {
        Self {
            links,
            menu_open: false,
            frame: FrameGate::new(),
            scrolled: None,
            active_section: None,
            scrolled_threshold: config.navbar_scrolled_px,
            probe_offset: config.section_probe_px,
            header_offset: config.header_offset_px,
            focus_delay: config.focus_delay(),
            ready: false,
        }
    }

    pub fn init(&mut self) -> Vec<Effect> {
        if self.ready {
            return Vec::new();
        }
        self.ready = true;
        vec![Effect::attr(Widget::NavToggle, "aria-expanded", aria_bool(false))]
    }

    #[must_use]
    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    #[must_use]
    pub fn active_section(&self) -> Option<&str> {
        self.active_section.as_deref()
    }

    pub fn toggle_menu(&mut self) -> Vec<Effect> {
        let mut out = Vec::new();
        if self.menu_open {
            self.close_menu(&mut out);
        } else {
            self.open_menu(&mut out);
        }
        out
    }

    /// A `.nav-link` was clicked. The anchor handler moves focus to the
    /// destination, so focus is not returned to the toggle here.
    pub fn link_clicked(&mut self) -> Vec<Effect> {
        let mut out = Vec::new();
        if self.menu_open {
            self.close_menu(&mut out);
        }
        out
    }

    /// `Escape` closes an open mobile menu and refocuses the toggle.
    pub fn escape(&mut self) -> Vec<Effect> {
        let mut out = Vec::new();
        if self.menu_open {
            self.close_menu(&mut out);
            out.push(Effect::Focus(Widget::NavToggle.into()));
        }
        out
    }

    /// Delayed focus into the menu, skipped if it closed meanwhile.
    pub fn focus_first_link(&self) -> Vec<Effect> {
        if self.menu_open && !self.links.is_empty() {
            vec![Effect::Focus(Target::NavLink(0))]
        } else {
            Vec::new()
        }
    }

    /// Same-page anchor click. `target_top` is the destination's
    /// `offsetTop`, or `None` when the `href` matched nothing.
    pub fn anchor_clicked(&mut self, href: &str, target_top: Option<f64>) -> Vec<Effect> {
        let Some(id) = href.strip_prefix('#').filter(|id| !id.is_empty()) else {
            return Vec::new();
        };
        let Some(top) = target_top else {
            debug!(href, "anchor target not found");
            return Vec::new();
        };
        vec![
            Effect::ScrollTo {
                top: (top - self.header_offset).max(0.0),
            },
            Effect::FocusTemporarily(Target::Element(id.to_owned())),
        ]
    }

    /// Scroll event: request at most one frame until it is delivered.
    pub fn scrolled(&mut self) -> Vec<Effect> {
        if self.frame.request() {
            vec![Effect::RequestFrame(FrameTask::NavScroll)]
        } else {
            Vec::new()
        }
    }

    /// The requested frame arrived.
    pub fn frame(&mut self, metrics: &PageMetrics) -> Vec<Effect> {
        self.frame.complete();
        let mut out = Vec::new();

        let scrolled = metrics.scroll_y > self.scrolled_threshold;
        if self.scrolled != Some(scrolled) {
            self.scrolled = Some(scrolled);
            out.push(Effect::class(Widget::Navbar, "scrolled", scrolled));
        }

        // Overlapping sections: the last one in document order wins. A probe
        // that falls in a gap keeps the previous highlight.
        let probe = metrics.scroll_y + self.probe_offset;
        let current = metrics
            .sections
            .iter()
            .filter(|section| section.contains(probe))
            .next_back()
            .map(|section| section.id.clone());

        if let Some(id) = current {
            if self.active_section.as_deref() != Some(id.as_str()) {
                self.highlight(&id, &mut out);
                self.active_section = Some(id);
            }
        }
        out
    }

    fn highlight(&self, section_id: &str, out: &mut Vec<Effect>) {
        for (index, href) in self.links.iter().enumerate() {
            let active = href.strip_prefix('#') == Some(section_id);
            out.push(Effect::class(Target::NavLink(index), "active", active));
            out.push(Effect::attr(
                Target::NavLink(index),
                "aria-current",
                if active { "page" } else { "false" },
            ));
        }
    }

    fn open_menu(&mut self, out: &mut Vec<Effect>) {
        self.menu_open = true;
        out.push(Effect::class(Widget::NavToggle, "active", true));
        out.push(Effect::class(Widget::NavMenu, "active", true));
        out.push(Effect::attr(Widget::NavToggle, "aria-expanded", aria_bool(true)));
        out.push(Effect::LockScroll(true));
        out.push(Effect::schedule(self.focus_delay, Timer::FocusFirstNavLink));
    }

    fn close_menu(&mut self, out: &mut Vec<Effect>) {
        self.menu_open = false;
        out.push(Effect::class(Widget::NavToggle, "active", false));
        out.push(Effect::class(Widget::NavMenu, "active", false));
        out.push(Effect::attr(Widget::NavToggle, "aria-expanded", aria_bool(false)));
        out.push(Effect::LockScroll(false));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::SectionBounds;

    fn nav() -> NavigationCoordinator {
        NavigationCoordinator::new(
            &SiteConfig::default(),
            vec!["#home".into(), "#about".into(), "#menu".into()],
        )
    }

    fn metrics(scroll_y: f64) -> PageMetrics {
        PageMetrics {
            scroll_y,
            sections: vec![
                SectionBounds::new("home", 0.0, 600.0),
                SectionBounds::new("about", 600.0, 800.0),
                SectionBounds::new("menu", 1400.0, 1000.0),
            ],
        }
    }

    fn active_links(effects: &[Effect]) -> Vec<usize> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::SetClass {
                    target: Target::NavLink(i),
                    class: "active",
                    on: true,
                } => Some(*i),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn init_sets_collapsed_aria_once() {
        let mut nav = nav();
        assert_eq!(nav.init().len(), 1);
        assert!(nav.init().is_empty());
    }

    #[test]
    fn open_locks_scroll_and_schedules_focus() {
        let mut nav = nav();
        let effects = nav.toggle_menu();
        assert!(nav.menu_open());
        assert!(effects.contains(&Effect::LockScroll(true)));
        assert!(effects.contains(&Effect::schedule(
            Duration::from_millis(100),
            Timer::FocusFirstNavLink
        )));
        assert_eq!(nav.focus_first_link(), vec![Effect::Focus(Target::NavLink(0))]);
    }

    #[test]
    fn escape_closes_and_returns_focus() {
        let mut nav = nav();
        nav.toggle_menu();
        let effects = nav.escape();
        assert!(!nav.menu_open());
        assert!(effects.contains(&Effect::LockScroll(false)));
        assert_eq!(effects.last(), Some(&Effect::Focus(Widget::NavToggle.into())));
        assert!(nav.escape().is_empty());
    }

    #[test]
    fn link_click_closes_menu() {
        let mut nav = nav();
        nav.toggle_menu();
        let effects = nav.link_clicked();
        assert!(effects.contains(&Effect::LockScroll(false)));
        assert!(nav.link_clicked().is_empty());
        assert!(nav.focus_first_link().is_empty());
    }

    #[test]
    fn anchor_scroll_subtracts_header() {
        let mut nav = nav();
        let effects = nav.anchor_clicked("#menu", Some(1400.0));
        assert_eq!(
            effects,
            vec![
                Effect::ScrollTo { top: 1320.0 },
                Effect::FocusTemporarily(Target::Element("menu".into())),
            ]
        );
        assert_eq!(
            nav.anchor_clicked("#home", Some(10.0))[0],
            Effect::ScrollTo { top: 0.0 }
        );
    }

    #[test]
    fn anchor_without_target_is_ignored() {
        let mut nav = nav();
        assert!(nav.anchor_clicked("#", Some(0.0)).is_empty());
        assert!(nav.anchor_clicked("#missing", None).is_empty());
    }

    #[test]
    fn scroll_is_coalesced_per_frame() {
        let mut nav = nav();
        assert_eq!(nav.scrolled(), vec![Effect::RequestFrame(FrameTask::NavScroll)]);
        assert!(nav.scrolled().is_empty());
        nav.frame(&metrics(0.0));
        assert_eq!(nav.scrolled().len(), 1);
    }

    #[test]
    fn highlights_section_under_probe() {
        let mut nav = nav();
        let effects = nav.frame(&metrics(550.0)); // probe 650 -> about
        assert_eq!(active_links(&effects), vec![1]);
        assert_eq!(nav.active_section(), Some("about"));
        assert!(effects.contains(&Effect::class(Widget::Navbar, "scrolled", true)));
        assert!(effects.contains(&Effect::attr(Target::NavLink(1), "aria-current", "page")));
        assert!(effects.contains(&Effect::attr(Target::NavLink(0), "aria-current", "false")));
    }

    #[test]
    fn unchanged_frame_emits_nothing() {
        let mut nav = nav();
        nav.frame(&metrics(550.0));
        assert!(nav.frame(&metrics(560.0)).is_empty());
    }

    #[test]
    fn scrolled_class_toggles_at_threshold() {
        let mut nav = nav();
        let effects = nav.frame(&metrics(50.0));
        assert!(effects.contains(&Effect::class(Widget::Navbar, "scrolled", false)));
        let effects = nav.frame(&metrics(51.0));
        assert!(effects.contains(&Effect::class(Widget::Navbar, "scrolled", true)));
    }

    #[test]
    fn overlap_last_section_wins() {
        let mut nav = nav();
        let overlapping = PageMetrics {
            scroll_y: 0.0,
            sections: vec![
                SectionBounds::new("home", 0.0, 500.0),
                SectionBounds::new("about", 50.0, 500.0),
            ],
        };
        let effects = nav.frame(&overlapping);
        assert_eq!(active_links(&effects), vec![1]);
    }

    #[test]
    fn gap_keeps_previous_highlight() {
        let mut nav = nav();
        nav.frame(&metrics(0.0));
        assert_eq!(nav.active_section(), Some("home"));
        let gap = PageMetrics {
            scroll_y: 5000.0,
            sections: metrics(0.0).sections,
        };
        let effects = nav.frame(&gap);
        assert!(active_links(&effects).is_empty());
        assert_eq!(nav.active_section(), Some("home"));
    }

    #[test]
    fn exactly_one_link_active_for_contiguous_sections() {
        let mut nav = nav();
        for y in (0..2400).step_by(37) {
            let effects = nav.frame(&metrics(f64::from(y)));
            let active = active_links(&effects);
            assert!(active.len() <= 1, "y={y}: {active:?}");
        }
    }
}
