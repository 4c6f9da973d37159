//! Effects: the only way coordinators change the page.
//!
//! A coordinator reacts to a [`SiteEvent`](crate::site::SiteEvent) by
//! returning a list of [`Effect`]s. The host applies them in order. Delays and
//! animation frames are requested through [`Effect::Schedule`] and
//! [`Effect::RequestFrame`]; the host answers later with
//! `SiteEvent::TimerFired` / `SiteEvent::Frame`.
//!
//! Element references are indexes into the collections of the
//! [`PageMarkup`](crate::markup::PageMarkup) the host collected at startup.

use std::time::Duration;

use vama_i18n::Locale;

use crate::markup::GalleryImage;

/// Singleton elements of the DOM contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Widget {
    /// `#navbar`
    Navbar,
    /// `#nav-toggle`
    NavToggle,
    /// `#nav-menu`
    NavMenu,
    /// `#language-dropdown`
    LangDropdown,
    /// `#lang-switcher`
    LangSwitcher,
    /// `#language-menu`
    LangMenu,
    /// `#current-lang`
    CurrentLang,
    /// `#menu-show-more`
    ShowMoreContainer,
    /// `span` inside `#show-more-btn`
    ShowMoreLabel,
    /// `i` inside `#show-more-btn`
    ShowMoreIcon,
    /// `#menu-loading`
    MenuLoading,
    /// `#back-to-top`
    BackToTop,
    /// `.skip-nav`
    SkipNav,
    /// Close button of the open lightbox.
    LightboxClose,
}

/// Anything an effect can address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Widget(Widget),
    /// `[data-translate]` node, by collection index.
    Translatable(usize),
    /// `.lang-option`, by collection index.
    LangOption(usize),
    /// `.nav-link`, by collection index.
    NavLink(usize),
    /// `.category-btn`, by collection index.
    CategoryButton(usize),
    /// `.menu-item`, by collection index.
    MenuItem(usize),
    /// Reveal-on-scroll block, by collection index.
    RevealBlock(usize),
    /// Element with this `id` (anchor destinations).
    Element(String),
}

impl From<Widget> for Target {
    fn from(widget: Widget) -> Self {
        Self::Widget(widget)
    }
}

/// CSS `display` values the coordinators use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    None,
    Block,
    Flex,
    Grid,
}

impl Display {
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Block => "block",
            Self::Flex => "flex",
            Self::Grid => "grid",
        }
    }
}

/// Opacity/transform pair of a menu item's fade animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fade {
    /// `opacity: 1; transform: translateY(0)`
    In,
    /// `opacity: 0; transform: translateY(20px)`
    Out,
}

/// Delayed callbacks. Every handler re-checks state before acting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Timer {
    RemoveAnnouncement(u64),
    FocusFirstLangOption,
    FocusFirstNavLink,
    FocusLightboxClose,
    FocusSkipNav,
    /// Finish hiding a menu item if it is still in the same hide cycle.
    HideMenuItem { item: usize, generation: u64 },
    HideMenuLoading,
    SelectInitialCategory,
}

/// Work gated on the next animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameTask {
    /// Navbar `scrolled` class and active-link highlighting.
    NavScroll,
    /// Back-to-top visibility.
    BackToTop,
    /// Second phase of showing a menu item.
    FadeInMenuItem { item: usize, generation: u64 },
}

impl FrameTask {
    /// Whether the host must measure section bounds for this task.
    #[must_use]
    pub const fn needs_sections(self) -> bool {
        matches!(self, Self::NavScroll)
    }
}

/// A single page mutation or host request.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SetText {
        target: Target,
        text: String,
    },
    SetClass {
        target: Target,
        class: &'static str,
        on: bool,
    },
    SetAttr {
        target: Target,
        name: &'static str,
        value: String,
    },
    RemoveAttr {
        target: Target,
        name: &'static str,
    },
    SetDisplay {
        target: Target,
        display: Display,
    },
    SetFade {
        target: Target,
        fade: Fade,
    },
    /// `document.documentElement.lang`
    SetDocumentLang(Locale),
    /// Append a polite live region with this text.
    Announce {
        id: u64,
        text: String,
    },
    RemoveAnnouncement(u64),
    Focus(Target),
    /// Give the target `tabindex=-1`, focus it, drop the attribute on blur.
    FocusTemporarily(Target),
    /// Smooth `window.scrollTo`.
    ScrollTo {
        top: f64,
    },
    /// `document.body.style.overflow = hidden` (true) or cleared (false).
    LockScroll(bool),
    /// Overwrite the shared error banner and make it visible.
    ShowBanner(String),
    OpenLightbox {
        image: GalleryImage,
        navigable: bool,
    },
    ShowLightboxImage(GalleryImage),
    CloseLightbox,
    /// Attach the lightbox keyboard listener and keep its guard.
    AttachLightboxKeys,
    /// Drop the lightbox keyboard listener guard.
    ReleaseLightboxKeys,
    /// Start watching a reveal block.
    Observe(usize),
    /// Stop watching a reveal block.
    Unobserve(usize),
    Schedule {
        delay: Duration,
        timer: Timer,
    },
    RequestFrame(FrameTask),
}

impl Effect {
    pub fn class(target: impl Into<Target>, class: &'static str, on: bool) -> Self {
        Self::SetClass {
            target: target.into(),
            class,
            on,
        }
    }

    pub fn attr(target: impl Into<Target>, name: &'static str, value: impl Into<String>) -> Self {
        Self::SetAttr {
            target: target.into(),
            name,
            value: value.into(),
        }
    }

    pub fn text(target: impl Into<Target>, text: impl Into<String>) -> Self {
        Self::SetText {
            target: target.into(),
            text: text.into(),
        }
    }

    pub fn display(target: impl Into<Target>, display: Display) -> Self {
        Self::SetDisplay {
            target: target.into(),
            display,
        }
    }

    pub fn schedule(delay: Duration, timer: Timer) -> Self {
        Self::Schedule { delay, timer }
    }
}

/// Shorthand for `aria-*` boolean attributes.
pub(crate) fn aria_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
