//! Scroll effects: back-to-top control and reveal-on-scroll blocks.

use std::time::Duration;

use crate::config::SiteConfig;
use crate::effect::{Effect, FrameTask, Target, Timer, Widget};
use crate::schedule::{FrameGate, Throttle};

/// Back-to-top visibility, throttled then coalesced per frame.
#[derive(Debug)]
pub struct BackToTop {
    throttle: Throttle,
    frame: FrameGate,
    threshold: f64,
    visible: Option<bool>,
    has_skip_nav: bool,
    focus_delay: Duration,
}

impl BackToTop {
    pub fn new(config: &SiteConfig, has_skip_nav: bool) -> Self {
        Self {
            throttle: Throttle::new(config.scroll_throttle()),
            frame: FrameGate::new(),
            threshold: config.back_to_top_px,
            visible: None,
            has_skip_nav,
            focus_delay: config.focus_delay(),
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(false)
    }

    /// Scroll event at host time `now`.
    pub fn scrolled(&mut self, now: Duration) -> Vec<Effect> {
        if self.throttle.allow(now) && self.frame.request() {
            vec![Effect::RequestFrame(FrameTask::BackToTop)]
        } else {
            Vec::new()
        }
    }

    pub fn frame(&mut self, scroll_y: f64) -> Vec<Effect> {
        self.frame.complete();
        let visible = scroll_y > self.threshold;
        if self.visible == Some(visible) {
            return Vec::new();
        }
        self.visible = Some(visible);
        vec![Effect::class(Widget::BackToTop, "visible", visible)]
    }

    pub fn clicked(&self) -> Vec<Effect> {
        let mut out = vec![Effect::ScrollTo { top: 0.0 }];
        if self.has_skip_nav {
            out.push(Effect::schedule(self.focus_delay, Timer::FocusSkipNav));
        }
        out
    }

    pub fn focus_skip_nav(&self) -> Vec<Effect> {
        if self.has_skip_nav {
            vec![Effect::Focus(Widget::SkipNav.into())]
        } else {
            Vec::new()
        }
    }
}

/// One-shot reveal of blocks as they enter the viewport.
#[derive(Debug)]
pub struct RevealTracker {
    revealed: Vec<bool>,
    ready: bool,
}

impl RevealTracker {
    /// `blocks` is zero when the browser has no intersection observer.
    #[must_use]
    pub fn new(blocks: usize) -> Self {
        Self {
            revealed: vec![false; blocks],
            ready: false,
        }
    }

    pub fn init(&mut self) -> Vec<Effect> {
        if self.ready {
            return Vec::new();
        }
        self.ready = true;
        let mut out = Vec::with_capacity(self.revealed.len() * 2);
        for index in 0..self.revealed.len() {
            out.push(Effect::class(Target::RevealBlock(index), "animate-on-scroll", true));
            out.push(Effect::Observe(index));
        }
        out
    }

    /// Observer callback for one entry.
    pub fn intersected(&mut self, index: usize, intersecting: bool) -> Vec<Effect> {
        match self.revealed.get_mut(index) {
            Some(revealed) if intersecting && !*revealed => {
                *revealed = true;
                vec![
                    Effect::class(Target::RevealBlock(index), "animated", true),
                    Effect::Unobserve(index),
                ]
            }
            _ => Vec::new(),
        }
    }

    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.revealed.iter().filter(|r| **r).count()
    }
}
