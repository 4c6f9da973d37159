//! Two-phase animated visibility for a single element.
//!
//! Showing sets `display: block` immediately and fades in on the next
//! animation frame. Hiding fades out immediately and sets `display: none`
//! once the animation has run. Each transition bumps a generation counter;
//! the delayed phase carries the generation it was issued for and is ignored
//! if the element has moved on, so a stale hide can never force a re-shown
//! element out of view.
//!
//! ```text
//!            show()                frame(g)
//! Hidden ──────────────▶ Showing(g) ──────────▶ Shown
//!   ▲                        │ hide()             │ hide()
//!   │ timer(g)               ▼                    ▼
//!   └──────────────────── Hiding(g) ◀─────────────┘
//! ```

use std::time::Duration;

use crate::effect::{Display, Effect, Fade, FrameTask, Target, Timer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Shown,
    Showing,
    Hiding,
    Hidden,
}

/// Visibility state of one menu item.
#[derive(Debug, Clone)]
pub struct AnimatedVisibility {
    item: usize,
    phase: Phase,
    generation: u64,
}

impl AnimatedVisibility {
    /// Items start out rendered and visible.
    #[must_use]
    pub fn new(item: usize) -> Self {
        Self {
            item,
            phase: Phase::Shown,
            generation: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the item is visible or on its way to visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        matches!(self.phase, Phase::Shown | Phase::Showing)
    }

    pub fn show(&mut self, out: &mut Vec<Effect>) {
        if self.is_visible() {
            return;
        }
        self.generation += 1;
        self.phase = Phase::Showing;
        out.push(Effect::display(Target::MenuItem(self.item), Display::Block));
        out.push(Effect::RequestFrame(FrameTask::FadeInMenuItem {
            item: self.item,
            generation: self.generation,
        }));
    }

    pub fn hide(&mut self, animation: Duration, out: &mut Vec<Effect>) {
        if !self.is_visible() {
            return;
        }
        self.generation += 1;
        self.phase = Phase::Hiding;
        out.push(Effect::SetFade {
            target: Target::MenuItem(self.item),
            fade: Fade::Out,
        });
        out.push(Effect::schedule(
            animation,
            Timer::HideMenuItem {
                item: self.item,
                generation: self.generation,
            },
        ));
    }

    /// Fade-in frame for `generation`.
    pub fn frame(&mut self, generation: u64, out: &mut Vec<Effect>) {
        if self.phase == Phase::Showing && self.generation == generation {
            self.phase = Phase::Shown;
            out.push(Effect::SetFade {
                target: Target::MenuItem(self.item),
                fade: Fade::In,
            });
        }
    }

    /// Hide timer for `generation`.
    pub fn timer(&mut self, generation: u64, out: &mut Vec<Effect>) {
        if self.phase == Phase::Hiding && self.generation == generation {
            self.phase = Phase::Hidden;
            out.push(Effect::display(Target::MenuItem(self.item), Display::None));
        }
    }
}
