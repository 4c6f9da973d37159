//! Bound page elements and effect application.
//!
//! [`Dom::bind`] walks the document once, keeping every element of the DOM
//! contract and the [`PageMarkup`] snapshot the coordinators are built from.
//! Element indexes in [`Target`] refer to the collections kept here, in the
//! same order.

use std::collections::HashMap;

use tracing::{debug, warn};
use vama_core::reactive::Subscription;
use vama_core::{
    Display, Effect, Fade, GalleryImage, PageMarkup, PageMetrics, SectionBounds, Target, Widget,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, IntersectionObserver, ScrollBehavior,
    ScrollToOptions, Window,
};

use super::listeners::listen_once;
use crate::selectors;

/// Collect every element matching `selector`, in document order.
pub fn query_all<T: JsCast>(document: &Document, selector: &str) -> Result<Vec<T>, JsValue> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect())
}

/// Nodes of the open lightbox overlay.
pub struct LightboxDom {
    pub overlay: HtmlElement,
    pub image: HtmlImageElement,
    pub close: HtmlElement,
    pub prev: Option<HtmlElement>,
    pub next: Option<HtmlElement>,
    /// Click guard of the overlay; dropped with it.
    pub clicks: Option<Subscription>,
}

pub struct Dom {
    pub window: Window,
    pub document: Document,
    pub widgets: HashMap<Widget, HtmlElement>,
    pub translatables: Vec<Element>,
    pub lang_options: Vec<Element>,
    pub nav_links: Vec<Element>,
    pub anchors: Vec<Element>,
    pub sections: Vec<HtmlElement>,
    pub category_buttons: Vec<Element>,
    pub menu_items: Vec<HtmlElement>,
    pub show_more_button: Option<Element>,
    pub gallery_items: Vec<HtmlElement>,
    pub reveal_blocks: Vec<Element>,
    pub map_links: Vec<Element>,
    pub lightbox: Option<LightboxDom>,
    pub observer: Option<IntersectionObserver>,
    announcements: HashMap<u64, Element>,
}

impl Dom {
    /// Bind the page. Fails only when the document itself is unreachable or
    /// a selector is rejected by the browser.
    pub fn bind(window: Window) -> Result<(Self, PageMarkup), JsValue> {
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let mut widgets = HashMap::new();
        for widget in selectors::STATIC_WIDGETS {
            let Some(selector) = selectors::widget(widget) else {
                continue;
            };
            match document.query_selector(selector)? {
                Some(element) => match element.dyn_into::<HtmlElement>() {
                    Ok(element) => {
                        widgets.insert(widget, element);
                    }
                    Err(_) => debug!(selector, "widget is not an HTML element"),
                },
                None => debug!(selector, "widget missing from page"),
            }
        }

        let translatables: Vec<Element> = query_all(&document, selectors::TRANSLATABLE)?;
        let lang_options: Vec<Element> = query_all(&document, selectors::LANG_OPTION)?;
        let nav_links: Vec<Element> = query_all(&document, selectors::NAV_LINK)?;
        let category_buttons: Vec<Element> = query_all(&document, selectors::CATEGORY_BUTTON)?;
        let menu_items: Vec<HtmlElement> = query_all(&document, selectors::MENU_ITEM)?;

        let mut gallery_items = Vec::new();
        let mut gallery = Vec::new();
        for item in query_all::<HtmlElement>(&document, selectors::GALLERY_ITEM)? {
            let Some(img) = item
                .query_selector("img")?
                .and_then(|img| img.dyn_into::<HtmlImageElement>().ok())
            else {
                continue;
            };
            let alt = img.alt();
            gallery.push(GalleryImage::new(img.src(), Some(alt.as_str()), gallery.len() + 1));
            gallery_items.push(item);
        }

        let reveal_blocks = if supports_intersection_observer(&window) {
            query_all(&document, selectors::REVEAL_BLOCK)?
        } else {
            debug!("no IntersectionObserver, reveal disabled");
            Vec::new()
        };

        let markup = PageMarkup {
            translatable_keys: translatables
                .iter()
                .map(|el| el.get_attribute("data-translate").unwrap_or_default())
                .collect(),
            lang_options: lang_options.len(),
            nav_links: nav_links
                .iter()
                .map(|el| el.get_attribute("href").unwrap_or_default())
                .collect(),
            category_buttons: category_buttons
                .iter()
                .map(|el| el.get_attribute("data-category").unwrap_or_default())
                .collect(),
            menu_items: menu_items
                .iter()
                .map(|el| el.get_attribute("data-category").unwrap_or_default())
                .collect(),
            gallery,
            reveal_blocks: reveal_blocks.len(),
            has_skip_nav: widgets.contains_key(&Widget::SkipNav),
        };

        let dom = Self {
            anchors: query_all(&document, selectors::SAME_PAGE_ANCHOR)?,
            sections: query_all(&document, selectors::SECTION)?,
            show_more_button: document.query_selector(selectors::SHOW_MORE_BUTTON)?,
            map_links: query_all(&document, selectors::MAP_LINK)?,
            window,
            document,
            widgets,
            translatables,
            lang_options,
            nav_links,
            category_buttons,
            menu_items,
            gallery_items,
            reveal_blocks,
            lightbox: None,
            observer: None,
            announcements: HashMap::new(),
        };
        Ok((dom, markup))
    }

    /// Text of the inline configuration block, if present.
    pub fn config_text(document: &Document) -> Option<String> {
        document
            .query_selector(selectors::CONFIG_SCRIPT)
            .ok()
            .flatten()
            .and_then(|el| el.text_content())
    }

    /// Scroll offset, plus section bounds when `with_sections` is set.
    pub fn metrics(&self, with_sections: bool) -> PageMetrics {
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        let sections = if with_sections {
            self.sections
                .iter()
                .map(|section| {
                    SectionBounds::new(
                        section.id(),
                        f64::from(section.offset_top()),
                        f64::from(section.offset_height()),
                    )
                })
                .collect()
        } else {
            Vec::new()
        };
        PageMetrics { scroll_y, sections }
    }

    /// `offsetTop` of the element with `id`.
    pub fn offset_top(&self, id: &str) -> Option<f64> {
        self.document
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()
            .map(|el| f64::from(el.offset_top()))
    }

    pub fn element(&self, target: &Target) -> Option<Element> {
        let found: Option<Element> = match target {
            Target::Widget(Widget::LightboxClose) => {
                self.lightbox.as_ref().map(|lb| lb.close.clone().into())
            }
            Target::Widget(widget) => self.widgets.get(widget).map(|el| el.clone().into()),
            Target::Translatable(i) => self.translatables.get(*i).cloned(),
            Target::LangOption(i) => self.lang_options.get(*i).cloned(),
            Target::NavLink(i) => self.nav_links.get(*i).cloned(),
            Target::CategoryButton(i) => self.category_buttons.get(*i).cloned(),
            Target::MenuItem(i) => self.menu_items.get(*i).map(|el| el.clone().into()),
            Target::RevealBlock(i) => self.reveal_blocks.get(*i).cloned(),
            Target::Element(id) => self.document.get_element_by_id(id),
        };
        if found.is_none() {
            debug!(?target, "effect target not on page");
        }
        found
    }

    fn html(&self, target: &Target) -> Option<HtmlElement> {
        self.element(target)?.dyn_into::<HtmlElement>().ok()
    }

    /// Apply a DOM-only effect. Host-level effects (timers, frames, listener
    /// guards, the lightbox overlay) are handled by the caller.
    pub fn apply(&mut self, effect: Effect) -> Result<(), JsValue> {
        match effect {
            Effect::SetText { target, text } => {
                if let Some(el) = self.element(&target) {
                    el.set_text_content(Some(&text));
                }
            }
            Effect::SetClass { target, class, on } => {
                if let Some(el) = self.element(&target) {
                    el.class_list().toggle_with_force(class, on)?;
                }
            }
            Effect::SetAttr {
                target,
                name,
                value,
            } => {
                if let Some(el) = self.element(&target) {
                    el.set_attribute(name, &value)?;
                }
            }
            Effect::RemoveAttr { target, name } => {
                if let Some(el) = self.element(&target) {
                    el.remove_attribute(name)?;
                }
            }
            Effect::SetDisplay { target, display } => {
                if let Some(el) = self.html(&target) {
                    el.style().set_property("display", display.as_css())?;
                }
            }
            Effect::SetFade { target, fade } => {
                if let Some(el) = self.html(&target) {
                    let (opacity, transform) = match fade {
                        Fade::In => ("1", "translateY(0)"),
                        Fade::Out => ("0", "translateY(20px)"),
                    };
                    let style = el.style();
                    style.set_property("opacity", opacity)?;
                    style.set_property("transform", transform)?;
                }
            }
            Effect::SetDocumentLang(locale) => {
                if let Some(root) = self.document.document_element() {
                    root.set_attribute("lang", locale.code())?;
                }
            }
            Effect::Announce { id, text } => self.announce(id, &text)?,
            Effect::RemoveAnnouncement(id) => {
                if let Some(el) = self.announcements.remove(&id) {
                    el.remove();
                }
            }
            Effect::Focus(target) => {
                if let Some(el) = self.html(&target) {
                    el.focus()?;
                }
            }
            Effect::FocusTemporarily(target) => {
                if let Some(el) = self.html(&target) {
                    el.set_attribute("tabindex", "-1")?;
                    el.focus()?;
                    let blurred = el.clone();
                    listen_once(&el, "blur", move || {
                        if let Err(err) = blurred.remove_attribute("tabindex") {
                            warn!(error = ?err, "tabindex cleanup failed");
                        }
                    })?;
                }
            }
            Effect::ScrollTo { top } => {
                let options = ScrollToOptions::new();
                options.set_top(top);
                options.set_behavior(ScrollBehavior::Smooth);
                self.window.scroll_to_with_scroll_to_options(&options);
            }
            Effect::LockScroll(locked) => {
                if let Some(body) = self.document.body() {
                    if locked {
                        body.style().set_property("overflow", "hidden")?;
                    } else {
                        body.style().remove_property("overflow")?;
                    }
                }
            }
            Effect::ShowBanner(message) => show_banner(&self.document, &message)?,
            Effect::ShowLightboxImage(image) => {
                if let Some(lightbox) = &self.lightbox {
                    lightbox.image.set_src(&image.src);
                    lightbox.image.set_alt(&image.alt);
                }
            }
            Effect::CloseLightbox => {
                if let Some(lightbox) = self.lightbox.take() {
                    lightbox.overlay.remove();
                }
            }
            Effect::Observe(index) => {
                if let (Some(observer), Some(block)) =
                    (&self.observer, self.reveal_blocks.get(index))
                {
                    observer.observe(block);
                }
            }
            Effect::Unobserve(index) => {
                if let (Some(observer), Some(block)) =
                    (&self.observer, self.reveal_blocks.get(index))
                {
                    observer.unobserve(block);
                }
            }
            other => warn!(effect = ?other, "host effect reached the DOM layer"),
        }
        Ok(())
    }

    /// Build and attach the lightbox overlay. Returns the overlay so the
    /// caller can bind its clicks.
    pub fn create_lightbox(
        &mut self,
        image: &GalleryImage,
        navigable: bool,
    ) -> Result<HtmlElement, JsValue> {
        let overlay = self.create("div", "lightbox")?;
        overlay.set_attribute("role", "dialog")?;
        overlay.set_attribute("aria-modal", "true")?;
        overlay.set_attribute("aria-label", "Gallery lightbox")?;

        let content = self.create("div", "lightbox-content")?;
        let img = self
            .document
            .create_element("img")?
            .dyn_into::<HtmlImageElement>()
            .map_err(|_| JsValue::from_str("img is not an image element"))?;
        img.set_src(&image.src);
        img.set_alt(&image.alt);
        content.append_child(&img)?;

        let close = self.button("lightbox-close", "Close lightbox", "\u{00d7}")?;
        content.append_child(&close)?;

        let (prev, next) = if navigable {
            let prev = self.button("lightbox-prev", "Previous image", "\u{2039}")?;
            let next = self.button("lightbox-next", "Next image", "\u{203a}")?;
            content.append_child(&prev)?;
            content.append_child(&next)?;
            (Some(prev), Some(next))
        } else {
            (None, None)
        };

        overlay.append_child(&content)?;
        self.document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&overlay)?;

        self.lightbox = Some(LightboxDom {
            overlay: overlay.clone(),
            image: img,
            close,
            prev,
            next,
            clicks: None,
        });
        Ok(overlay)
    }

    fn announce(&mut self, id: u64, text: &str) -> Result<(), JsValue> {
        let region = self.create("div", "sr-only")?;
        region.set_attribute("aria-live", "polite")?;
        region.set_attribute("aria-atomic", "true")?;
        region.set_text_content(Some(text));
        if let Some(body) = self.document.body() {
            body.append_child(&region)?;
            self.announcements.insert(id, region.into());
        }
        Ok(())
    }

    fn create(&self, tag: &str, class: &str) -> Result<HtmlElement, JsValue> {
        let el = self
            .document
            .create_element(tag)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| JsValue::from_str("created node is not an HTML element"))?;
        el.set_class_name(class);
        Ok(el)
    }

    fn button(&self, class: &str, label: &str, glyph: &str) -> Result<HtmlElement, JsValue> {
        let button = self.create("button", class)?;
        button.set_attribute("type", "button")?;
        button.set_attribute("aria-label", label)?;
        button.set_text_content(Some(glyph));
        Ok(button)
    }
}

/// Write the shared banner. Works before anything is bound.
pub fn show_banner(document: &Document, message: &str) -> Result<(), JsValue> {
    let Some(boundary) = document.query_selector(selectors::ERROR_BOUNDARY)? else {
        warn!(message, "no error boundary on page");
        return Ok(());
    };
    if let Some(text) = boundary.query_selector("p")? {
        text.set_text_content(Some(message));
    }
    if let Ok(boundary) = boundary.dyn_into::<HtmlElement>() {
        boundary.style().set_property("display", Display::Flex.as_css())?;
    }
    Ok(())
}

fn supports_intersection_observer(window: &Window) -> bool {
    js_sys::Reflect::has(window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
}
