//! The browser host: runs [`Site`] against the real document.
//!
//! Listeners translate DOM events into [`SiteEvent`]s; [`dispatch`] feeds them
//! to the site and applies the returned effects. Timers and animation frames
//! requested by the coordinators are scheduled here and come back as events.
//! Callbacks hold a [`Weak`] handle so the host owns its listeners without a
//! reference cycle.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use js_sys::Array;
use tracing::{debug, warn};
use vama_core::reactive::Subscription;
use vama_core::{
    Effect, FrameTask, GalleryImage, Key, LightboxHit, PageError, Site, SiteConfig, SiteEvent,
    Timer, Widget,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, ErrorEvent, Event, EventTarget, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, Node, PromiseRejectionEvent,
};

use super::dom::Dom;
use super::listeners::listen;
use crate::{batch, selectors};

pub struct Host {
    site: Site,
    dom: Dom,
    /// Page-lifetime listeners.
    listeners: Vec<Subscription>,
    /// Lightbox keyboard guard, present while the lightbox is open.
    lightbox_keys: Option<Subscription>,
    /// Keeps the observer callback alive.
    _reveal_callback: Option<Closure<dyn FnMut(Array, IntersectionObserver)>>,
}

pub type Shared = Rc<RefCell<Host>>;

impl Host {
    pub fn new(site: Site, dom: Dom) -> Shared {
        Rc::new(RefCell::new(Self {
            site,
            dom,
            listeners: Vec::new(),
            lightbox_keys: None,
            _reveal_callback: None,
        }))
    }
}

/// Route one event through the site and apply the result.
pub fn dispatch(host: &Shared, event: SiteEvent) {
    let effects = match host.try_borrow_mut() {
        Ok(mut inner) => inner.site.handle(event),
        Err(_) => {
            warn!(?event, "re-entrant dispatch dropped");
            return;
        }
    };
    apply(host, effects);
}

fn dispatch_weak(host: &Weak<RefCell<Host>>, event: SiteEvent) {
    if let Some(host) = host.upgrade() {
        dispatch(&host, event);
    }
}

/// Initialize the site and bind every page listener.
pub fn start(host: &Shared, config: &SiteConfig) -> Result<(), JsValue> {
    install_observer(host, config)?;
    bind_listeners(host)?;
    let effects = host.borrow_mut().site.init();
    apply(host, effects);
    Ok(())
}

/// Show the shared banner for a start-up that could not finish.
pub fn bootstrap_failed(host: &Shared) {
    let effects = host.borrow_mut().site.bootstrap_failed();
    apply(host, effects);
}

pub fn apply(host: &Shared, effects: Vec<Effect>) {
    let follow_up = batch::apply_batch(effects, |effect| match effect {
        Effect::Schedule { delay, timer } => schedule(host, delay, timer),
        Effect::RequestFrame(task) => request_frame(host, task),
        Effect::AttachLightboxKeys => attach_lightbox_keys(host),
        Effect::ReleaseLightboxKeys => {
            let guard = host.borrow_mut().lightbox_keys.take();
            drop(guard);
            Ok(())
        }
        Effect::OpenLightbox { image, navigable } => open_lightbox(host, &image, navigable),
        other => host.borrow_mut().dom.apply(other),
    });
    if let Some(event) = follow_up {
        dispatch(host, event);
    }
}

fn schedule(host: &Shared, delay: Duration, timer: Timer) -> Result<(), JsValue> {
    let weak = Rc::downgrade(host);
    let callback = Closure::once_into_js(move || {
        dispatch_weak(&weak, SiteEvent::TimerFired(timer));
    });
    let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    host.borrow()
        .dom
        .window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)?;
    Ok(())
}

fn request_frame(host: &Shared, task: FrameTask) -> Result<(), JsValue> {
    let weak = Rc::downgrade(host);
    let callback = Closure::once_into_js(move || {
        let Some(host) = weak.upgrade() else {
            return;
        };
        let metrics = host.borrow().dom.metrics(task.needs_sections());
        dispatch(&host, SiteEvent::Frame { task, metrics });
    });
    host.borrow()
        .dom
        .window
        .request_animation_frame(callback.unchecked_ref())?;
    Ok(())
}

fn attach_lightbox_keys(host: &Shared) -> Result<(), JsValue> {
    let weak = Rc::downgrade(host);
    let document: EventTarget = host.borrow().dom.document.clone().into();
    let guard = listen(&document, "keydown", move |event| {
        if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
            dispatch_weak(&weak, SiteEvent::LightboxKey(Key::from_dom(&key.key())));
        }
    })?;
    let previous = host.borrow_mut().lightbox_keys.replace(guard);
    if previous.is_some() {
        debug!("replaced a live lightbox key guard");
    }
    Ok(())
}

fn open_lightbox(host: &Shared, image: &GalleryImage, navigable: bool) -> Result<(), JsValue> {
    let overlay = host.borrow_mut().dom.create_lightbox(image, navigable)?;
    let weak = Rc::downgrade(host);
    let clicks = listen(&overlay, "click", move |event| {
        let Some(host) = weak.upgrade() else {
            return;
        };
        let hit = lightbox_hit(&host, &event);
        dispatch(&host, SiteEvent::LightboxClicked(hit));
    })?;
    if let Some(lightbox) = host.borrow_mut().dom.lightbox.as_mut() {
        lightbox.clicks = Some(clicks);
    }
    Ok(())
}

/// Classify a click inside the overlay.
fn lightbox_hit(host: &Shared, event: &Event) -> LightboxHit {
    let inner = host.borrow();
    let (Some(lightbox), Some(target)) = (
        inner.dom.lightbox.as_ref(),
        event.target().and_then(|t| t.dyn_into::<Node>().ok()),
    ) else {
        return LightboxHit::Image;
    };
    let is = |el: &HtmlElement| el.contains(Some(&target));
    let overlay: &Node = lightbox.overlay.as_ref();
    if target == *overlay {
        LightboxHit::Backdrop
    } else if is(&lightbox.close) {
        LightboxHit::Close
    } else if lightbox.prev.as_ref().is_some_and(is) {
        LightboxHit::Prev
    } else if lightbox.next.as_ref().is_some_and(is) {
        LightboxHit::Next
    } else {
        LightboxHit::Image
    }
}

fn install_observer(host: &Shared, config: &SiteConfig) -> Result<(), JsValue> {
    if host.borrow().dom.reveal_blocks.is_empty() {
        return Ok(());
    }
    let weak = Rc::downgrade(host);
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, _observer: IntersectionObserver| {
            let Some(host) = weak.upgrade() else {
                return;
            };
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let target = entry.target();
                let index = host
                    .borrow()
                    .dom
                    .reveal_blocks
                    .iter()
                    .position(|block| *block == target);
                if let Some(index) = index {
                    dispatch(
                        &host,
                        SiteEvent::BlockIntersected {
                            index,
                            intersecting: entry.is_intersecting(),
                        },
                    );
                }
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(config.reveal_threshold));
    options.set_root_margin(&config.reveal_root_margin());
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;

    let mut inner = host.borrow_mut();
    inner.dom.observer = Some(observer);
    inner._reveal_callback = Some(callback);
    Ok(())
}

/// Attach `handler` to each element, passing its index.
fn bind_each<T: AsRef<EventTarget>>(
    host: &Shared,
    elements: &[T],
    kind: &'static str,
    handler: impl Fn(&Weak<RefCell<Host>>, usize, Event) + Clone + 'static,
) -> Result<Vec<Subscription>, JsValue> {
    elements
        .iter()
        .enumerate()
        .map(|(index, element)| {
            let weak = Rc::downgrade(host);
            let handler = handler.clone();
            listen(element.as_ref(), kind, move |event| handler(&weak, index, event))
        })
        .collect()
}

fn bind_listeners(host: &Shared) -> Result<(), JsValue> {
    let mut guards = Vec::new();
    let (window, document, widgets) = {
        let inner = host.borrow();
        (
            inner.dom.window.clone(),
            inner.dom.document.clone(),
            inner.dom.widgets.clone(),
        )
    };
    let weak = || Rc::downgrade(host);

    // Page-level failures.
    let w = weak();
    guards.push(listen(&window, "error", move |event| {
        let detail = event
            .dyn_ref::<ErrorEvent>()
            .map(ErrorEvent::message)
            .unwrap_or_default();
        dispatch_weak(&w, SiteEvent::PageError(PageError::Uncaught(detail)));
    })?);
    let w = weak();
    guards.push(listen(&window, "unhandledrejection", move |event| {
        let detail = event
            .dyn_ref::<PromiseRejectionEvent>()
            .map(|e| format!("{:?}", e.reason()))
            .unwrap_or_default();
        dispatch_weak(&w, SiteEvent::PageError(PageError::UnhandledRejection(detail)));
    })?);

    // Language dropdown. The switcher click must not reach the document
    // listener, or it would close the dropdown it just opened.
    if let Some(switcher) = widgets.get(&Widget::LangSwitcher) {
        let w = weak();
        guards.push(listen(switcher, "click", move |event| {
            event.prevent_default();
            event.stop_propagation();
            dispatch_weak(&w, SiteEvent::LangSwitcherClicked);
        })?);
    }
    let control: Vec<HtmlElement> = [Widget::LangDropdown, Widget::LangSwitcher]
        .iter()
        .filter_map(|widget| widgets.get(widget).cloned())
        .collect();
    let w = weak();
    guards.push(listen(&document, "click", move |event| {
        let inside_dropdown = event
            .target()
            .and_then(|t| t.dyn_into::<Node>().ok())
            .is_some_and(|target| control.iter().any(|el| el.contains(Some(&target))));
        dispatch_weak(&w, SiteEvent::DocumentClicked { inside_dropdown });
    })?);
    let w = weak();
    guards.push(listen(&document, "keydown", move |event| {
        if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
            dispatch_weak(&w, SiteEvent::Key(Key::from_dom(&key.key())));
        }
    })?);

    let inner = host.borrow();
    let dom = &inner.dom;

    guards.extend(bind_each(host, &dom.lang_options, "click", |w, _, event| {
        event.prevent_default();
        let code = event
            .current_target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.get_attribute("data-lang"))
            .unwrap_or_default();
        dispatch_weak(w, SiteEvent::LangOptionSelected(code));
    })?);

    // Navigation.
    if let Some(toggle) = widgets.get(&Widget::NavToggle) {
        let w = weak();
        guards.push(listen(toggle, "click", move |_| {
            dispatch_weak(&w, SiteEvent::NavToggleClicked);
        })?);
    }
    guards.extend(bind_each(host, &dom.nav_links, "click", |w, _, _| {
        dispatch_weak(w, SiteEvent::NavLinkClicked);
    })?);
    guards.extend(bind_each(host, &dom.anchors, "click", |w, _, event| {
        let Some(href) = event
            .current_target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.get_attribute("href"))
        else {
            return;
        };
        let Some(host) = w.upgrade() else {
            return;
        };
        let target_top =
            selectors::anchor_id(&href).and_then(|id| host.borrow().dom.offset_top(id));
        if target_top.is_some() {
            event.prevent_default();
        }
        dispatch(&host, SiteEvent::AnchorClicked { href, target_top });
    })?);
    let w = weak();
    guards.push(listen(&window, "scroll", move |_| {
        let now = web_sys::window()
            .and_then(|w| w.performance())
            .map_or(0.0, |p| p.now());
        let now = Duration::from_secs_f64(now.max(0.0) / 1000.0);
        dispatch_weak(&w, SiteEvent::Scrolled { now });
    })?);

    // Menu.
    guards.extend(bind_each(host, &dom.category_buttons, "click", |w, _, event| {
        let category = event
            .current_target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.get_attribute("data-category"))
            .unwrap_or_default();
        dispatch_weak(w, SiteEvent::CategorySelected(category));
    })?);
    if let Some(button) = &dom.show_more_button {
        let w = weak();
        guards.push(listen(button, "click", move |_| {
            dispatch_weak(&w, SiteEvent::ShowMoreClicked);
        })?);
    }

    // Gallery.
    guards.extend(bind_each(host, &dom.gallery_items, "click", |w, index, _| {
        dispatch_weak(w, SiteEvent::GalleryActivated(index));
    })?);
    guards.extend(bind_each(host, &dom.gallery_items, "keydown", |w, index, event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|k| Key::from_dom(&k.key())) else {
            return;
        };
        if key.is_activation() {
            event.prevent_default();
        }
        dispatch_weak(w, SiteEvent::GalleryKey { index, key });
    })?);

    // Scroll effects.
    if let Some(button) = widgets.get(&Widget::BackToTop) {
        let w = weak();
        guards.push(listen(button, "click", move |event| {
            event.prevent_default();
            dispatch_weak(&w, SiteEvent::BackToTopClicked);
        })?);
    }

    // Outbound map links.
    for link in &dom.map_links {
        guards.push(listen(link, "click", |event| {
            event.prevent_default();
            super::open_map();
        })?);
    }

    drop(inner);
    host.borrow_mut().listeners.extend(guards);
    Ok(())
}
