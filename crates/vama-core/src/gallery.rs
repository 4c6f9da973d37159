//! Gallery lightbox: a modal image viewer.
//!
//! The keyboard listener is owned by the host as a subscription guard. The
//! lightbox asks for it with [`Effect::AttachLightboxKeys`] on open and
//! releases it with [`Effect::ReleaseLightboxKeys`] on close, so at most one
//! guard is alive at any time.

use std::time::Duration;

use tracing::debug;

use crate::config::SiteConfig;
use crate::effect::{Effect, Timer, Widget};
use crate::error::SiteError;
use crate::keys::Key;
use crate::markup::GalleryImage;

/// Part of the open overlay that received a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxHit {
    /// The overlay background around the image.
    Backdrop,
    Image,
    Close,
    Prev,
    Next,
}

#[derive(Debug)]
pub struct Lightbox {
    images: Vec<GalleryImage>,
    current: usize,
    open: bool,
    keys_attached: bool,
    focus_delay: Duration,
}

impl Lightbox {
    pub fn new(config: &SiteConfig, images: Vec<GalleryImage>) -> Self {
        Self {
            images,
            current: 0,
            open: false,
            keys_attached: false,
            focus_delay: config.focus_delay(),
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    /// Whether the host currently holds a keyboard listener guard.
    #[must_use]
    pub fn keys_attached(&self) -> bool {
        self.keys_attached
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Open at `index`. Opening while already open just switches the image.
    pub fn open(&mut self, index: usize) -> Result<Vec<Effect>, SiteError> {
        let image = self
            .images
            .get(index)
            .cloned()
            .ok_or(SiteError::UnknownImage {
                index,
                len: self.images.len(),
            })?;
        self.current = index;

        if self.open {
            return Ok(vec![Effect::ShowLightboxImage(image)]);
        }
        self.open = true;
        let mut out = vec![
            Effect::OpenLightbox {
                image,
                navigable: self.images.len() > 1,
            },
            Effect::LockScroll(true),
        ];
        if !self.keys_attached {
            self.keys_attached = true;
            out.push(Effect::AttachLightboxKeys);
        }
        out.push(Effect::schedule(self.focus_delay, Timer::FocusLightboxClose));
        debug!(index, "lightbox opened");
        Ok(out)
    }

    pub fn next(&mut self) -> Vec<Effect> {
        self.step(1)
    }

    pub fn previous(&mut self) -> Vec<Effect> {
        self.step(-1)
    }

    pub fn close(&mut self) -> Vec<Effect> {
        if !self.open {
            return Vec::new();
        }
        self.open = false;
        let mut out = vec![Effect::CloseLightbox, Effect::LockScroll(false)];
        if self.keys_attached {
            self.keys_attached = false;
            out.push(Effect::ReleaseLightboxKeys);
        }
        debug!("lightbox closed");
        out
    }

    pub fn clicked(&mut self, hit: LightboxHit) -> Vec<Effect> {
        match hit {
            LightboxHit::Backdrop | LightboxHit::Close => self.close(),
            LightboxHit::Image => Vec::new(),
            LightboxHit::Prev => self.previous(),
            LightboxHit::Next => self.next(),
        }
    }

    /// Key delivered by the lightbox's own listener.
    pub fn key(&mut self, key: Key) -> Vec<Effect> {
        match key {
            Key::Escape => self.close(),
            Key::ArrowLeft => self.previous(),
            Key::ArrowRight => self.next(),
            _ => Vec::new(),
        }
    }

    /// Delayed focus on the close button, skipped if already closed.
    pub fn focus_close(&self) -> Vec<Effect> {
        if self.open {
            vec![Effect::Focus(Widget::LightboxClose.into())]
        } else {
            Vec::new()
        }
    }

    fn step(&mut self, delta: isize) -> Vec<Effect> {
        let len = self.images.len();
        if !self.open || len <= 1 {
            return Vec::new();
        }
        self.current = if delta < 0 {
            (self.current + len - 1) % len
        } else {
            (self.current + 1) % len
        };
        vec![Effect::ShowLightboxImage(self.images[self.current].clone())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn images(n: usize) -> Vec<GalleryImage> {
        (0..n)
            .map(|i| GalleryImage::new(format!("img/{i}.jpg"), None, i + 1))
            .collect()
    }

    fn lightbox(n: usize) -> Lightbox {
        Lightbox::new(&SiteConfig::default(), images(n))
    }

    #[test]
    fn open_locks_scroll_attaches_keys_and_schedules_focus() {
        let mut lb = lightbox(3);
        let effects = lb.open(1).unwrap();
        assert_eq!(
            effects,
            vec![
                Effect::OpenLightbox {
                    image: GalleryImage::new("img/1.jpg", None, 2),
                    navigable: true,
                },
                Effect::LockScroll(true),
                Effect::AttachLightboxKeys,
                Effect::schedule(Duration::from_millis(100), Timer::FocusLightboxClose),
            ]
        );
        assert!(lb.keys_attached());
        assert_eq!(lb.focus_close(), vec![Effect::Focus(Widget::LightboxClose.into())]);
    }

    #[test]
    fn single_image_has_no_navigation() {
        let mut lb = lightbox(1);
        let effects = lb.open(0).unwrap();
        assert!(matches!(
            effects[0],
            Effect::OpenLightbox {
                navigable: false,
                ..
            }
        ));
        assert!(lb.next().is_empty());
        assert_eq!(lb.current(), 0);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut lb = lightbox(2);
        assert_eq!(
            lb.open(5).unwrap_err(),
            SiteError::UnknownImage { index: 5, len: 2 }
        );
        assert!(!lb.is_open());
    }

    #[test]
    fn close_paths_release_listener_once() {
        for hit in [LightboxHit::Backdrop, LightboxHit::Close] {
            let mut lb = lightbox(2);
            lb.open(0).unwrap();
            let effects = lb.clicked(hit);
            assert!(effects.contains(&Effect::ReleaseLightboxKeys));
            assert!(effects.contains(&Effect::LockScroll(false)));
            assert!(!lb.keys_attached());
            assert!(lb.close().is_empty());
        }

        let mut lb = lightbox(2);
        lb.open(0).unwrap();
        assert!(lb.key(Key::Escape).contains(&Effect::ReleaseLightboxKeys));
    }

    #[test]
    fn image_click_keeps_overlay_open() {
        let mut lb = lightbox(2);
        lb.open(0).unwrap();
        assert!(lb.clicked(LightboxHit::Image).is_empty());
        assert!(lb.is_open());
    }

    #[test]
    fn reopen_while_open_only_switches_image() {
        let mut lb = lightbox(3);
        lb.open(0).unwrap();
        let effects = lb.open(2).unwrap();
        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0], Effect::ShowLightboxImage(_)));
        assert!(lb.keys_attached());
    }

    #[test]
    fn arrows_navigate_and_wrap() {
        let mut lb = lightbox(3);
        lb.open(0).unwrap();
        lb.key(Key::ArrowLeft);
        assert_eq!(lb.current(), 2);
        lb.key(Key::ArrowRight);
        assert_eq!(lb.current(), 0);
    }

    #[test]
    fn closed_lightbox_ignores_navigation_and_focus() {
        let mut lb = lightbox(3);
        assert!(lb.next().is_empty());
        assert!(lb.focus_close().is_empty());
    }

    proptest! {
        #[test]
        fn next_len_times_returns_to_start(len in 2usize..12, start in 0usize..12) {
            let start = start % len;
            let mut lb = lightbox(len);
            lb.open(start).unwrap();
            for _ in 0..len {
                lb.next();
            }
            prop_assert_eq!(lb.current(), start);
        }

        #[test]
        fn previous_from_zero_is_last(len in 2usize..12) {
            let mut lb = lightbox(len);
            lb.open(0).unwrap();
            lb.previous();
            prop_assert_eq!(lb.current(), len - 1);
        }
    }
}
