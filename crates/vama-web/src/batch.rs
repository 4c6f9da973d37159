//! Applying one dispatch's effects in order.

use std::fmt;

use tracing::warn;
use vama_core::{Effect, SiteEvent};

/// Event that puts the core back in step when `effect` could not be applied.
fn recovery_for(effect: &Effect) -> Option<SiteEvent> {
    match effect {
        Effect::OpenLightbox { .. } => Some(SiteEvent::LightboxFailed),
        _ => None,
    }
}

/// Apply every effect through `apply_one`, logging failures.
///
/// The whole batch is applied even when an effect fails. The returned event,
/// if any, must be dispatched afterwards: effects later in the batch (the
/// scroll lock and key guard that follow an overlay) would otherwise undo
/// its cleanup.
pub fn apply_batch<E: fmt::Debug>(
    effects: Vec<Effect>,
    mut apply_one: impl FnMut(Effect) -> Result<(), E>,
) -> Option<SiteEvent> {
    let mut follow_up = None;
    for effect in effects {
        let recovery = recovery_for(&effect);
        if let Err(err) = apply_one(effect) {
            warn!(error = ?err, "effect failed");
            if follow_up.is_none() {
                follow_up = recovery;
            }
        }
    }
    follow_up
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vama_core::{GalleryImage, Timer};

    fn open_batch() -> Vec<Effect> {
        vec![
            Effect::OpenLightbox {
                image: GalleryImage::new("a.jpg", None, 1),
                navigable: true,
            },
            Effect::LockScroll(true),
            Effect::AttachLightboxKeys,
            Effect::schedule(std::time::Duration::from_millis(100), Timer::FocusLightboxClose),
        ]
    }

    #[test]
    fn failed_overlay_asks_for_close_after_the_batch() {
        let mut applied = Vec::new();
        let follow_up = apply_batch(open_batch(), |effect| {
            if matches!(effect, Effect::OpenLightbox { .. }) {
                return Err("no body");
            }
            applied.push(effect);
            Ok(())
        });
        assert_eq!(follow_up, Some(SiteEvent::LightboxFailed));
        assert_eq!(applied.len(), 3);
        assert_eq!(applied[0], Effect::LockScroll(true));
    }

    #[test]
    fn clean_batch_needs_nothing() {
        let follow_up = apply_batch(open_batch(), |_| Ok::<(), &str>(()));
        assert_eq!(follow_up, None);
    }

    #[test]
    fn other_failures_are_only_logged() {
        let effects = vec![Effect::LockScroll(true), Effect::CloseLightbox];
        let follow_up = apply_batch(effects, |_| Err("detached"));
        assert_eq!(follow_up, None);
    }
}
