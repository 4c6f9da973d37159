//! CSS selectors of the page's DOM contract.

use vama_core::Widget;

pub const TRANSLATABLE: &str = "[data-translate]";
pub const LANG_OPTION: &str = ".lang-option[data-lang]";
pub const NAV_LINK: &str = ".nav-link";
pub const SAME_PAGE_ANCHOR: &str = "a[href^=\"#\"]";
pub const SECTION: &str = "section[id]";
pub const CATEGORY_BUTTON: &str = ".category-btn[data-category]";
pub const MENU_ITEM: &str = ".menu-item[data-category]";
pub const SHOW_MORE_BUTTON: &str = "#show-more-btn";
pub const GALLERY_ITEM: &str = ".gallery-item";
pub const REVEAL_BLOCK: &str = ".about-feature, .menu-item, .gallery-item, .contact-item";
pub const ERROR_BOUNDARY: &str = "#error-boundary";
pub const MAP_LINK: &str = "[data-map-link]";
pub const CONFIG_SCRIPT: &str = "#vama-config";

/// Static selector of a widget. The lightbox close button is created on
/// demand and has none.
#[must_use]
pub const fn widget(widget: Widget) -> Option<&'static str> {
    Some(match widget {
        Widget::Navbar => "#navbar",
        Widget::NavToggle => "#nav-toggle",
        Widget::NavMenu => "#nav-menu",
        Widget::LangDropdown => "#language-dropdown",
        Widget::LangSwitcher => "#lang-switcher",
        Widget::LangMenu => "#language-menu",
        Widget::CurrentLang => "#current-lang",
        Widget::ShowMoreContainer => "#menu-show-more",
        Widget::ShowMoreLabel => "#show-more-btn span",
        Widget::ShowMoreIcon => "#show-more-btn i",
        Widget::MenuLoading => "#menu-loading",
        Widget::BackToTop => "#back-to-top",
        Widget::SkipNav => ".skip-nav",
        Widget::LightboxClose => return None,
    })
}

/// Widgets bound once at startup.
pub const STATIC_WIDGETS: [Widget; 13] = [
    Widget::Navbar,
    Widget::NavToggle,
    Widget::NavMenu,
    Widget::LangDropdown,
    Widget::LangSwitcher,
    Widget::LangMenu,
    Widget::CurrentLang,
    Widget::ShowMoreContainer,
    Widget::ShowMoreLabel,
    Widget::ShowMoreIcon,
    Widget::MenuLoading,
    Widget::BackToTop,
    Widget::SkipNav,
];

/// `#id` of a same-page anchor, or `None` for a bare `#`.
#[must_use]
pub fn anchor_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}
