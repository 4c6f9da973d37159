//! Menu filter coordinator: category filtering with a "show more" toggle.
//!
//! # Truncation policy
//!
//! For the selected category (`all` matches every item) the first
//! `collapsed_item_limit` matching items in DOM order are shown; the rest are
//! shown only while expanded. The toggle is displayed only when the matching
//! count exceeds the limit. Items outside the category are always hidden.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info};
use vama_i18n::StringCatalog;

use crate::config::SiteConfig;
use crate::effect::{Display, Effect, Target, Timer, Widget, aria_bool};
use crate::error::SiteError;
use crate::reactive::Subscription;
use crate::state::{Announcer, LocaleState};
use crate::visibility::AnimatedVisibility;

/// Category id meaning "every item".
pub const ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    All,
    Named(String),
}

impl Category {
    fn matches(&self, item_category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == item_category,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Named(name) => name,
        }
    }
}

#[derive(Debug)]
struct MenuItem {
    category: String,
    visibility: AnimatedVisibility,
}

#[derive(Debug)]
pub struct MenuFilter {
    catalog: Rc<StringCatalog>,
    locale: LocaleState,
    locale_changed: Rc<Cell<bool>>,
    _locale_sub: Subscription,
    announcer: Announcer,
    buttons: Vec<String>,
    items: Vec<MenuItem>,
    current: Category,
    expanded: bool,
    toggle_visible: bool,
    visitor_selected: bool,
    limit: usize,
    animation: Duration,
    initial_delay: Duration,
    skeleton: Duration,
    ready: bool,
}

impl MenuFilter {
    pub fn new(
        config: &SiteConfig,
        catalog: Rc<StringCatalog>,
        locale: LocaleState,
        announcer: Announcer,
        buttons: Vec<String>,
        item_categories: Vec<String>,
    ) -> Self {
        let locale_changed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&locale_changed);
        let locale_sub = locale.subscribe(move |_| flag.set(true));

        let items = item_categories
            .into_iter()
            .enumerate()
            .map(|(index, category)| MenuItem {
                category,
                visibility: AnimatedVisibility::new(index),
            })
            .collect();

        Self {
            catalog,
            locale,
            locale_changed,
            _locale_sub: locale_sub,
            announcer,
            buttons,
            items,
            current: Category::All,
            expanded: false,
            toggle_visible: false,
            visitor_selected: false,
            limit: config.collapsed_item_limit,
            animation: config.animation(),
            initial_delay: config.initial_category_delay(),
            skeleton: config.loading_skeleton(),
            ready: false,
        }
    }

    /// Show the loading skeleton and schedule the initial `all` selection.
    pub fn init(&mut self) -> Vec<Effect> {
        if self.ready {
            return Vec::new();
        }
        self.ready = true;
        let mut out = vec![
            Effect::display(Widget::MenuLoading, Display::Grid),
            Effect::schedule(self.skeleton, Timer::HideMenuLoading),
        ];
        if self.buttons.iter().any(|b| b == ALL) {
            out.push(Effect::schedule(self.initial_delay, Timer::SelectInitialCategory));
        }
        out
    }

    #[must_use]
    pub fn current_category(&self) -> &Category {
        &self.current
    }

    #[must_use]
    pub fn expanded(&self) -> bool {
        self.expanded
    }

    #[must_use]
    pub fn toggle_visible(&self) -> bool {
        self.toggle_visible
    }

    /// Indexes of items currently shown or fading in.
    #[must_use]
    pub fn visible_items(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.visibility.is_visible())
            .map(|(index, _)| index)
            .collect()
    }

    /// A category button was clicked.
    pub fn select_category(&mut self, id: &str) -> Result<Vec<Effect>, SiteError> {
        let category = self.parse_category(id)?;
        self.visitor_selected = true;
        Ok(self.apply_category(category))
    }

    /// Delayed initial selection; skipped if the visitor already chose.
    pub fn select_initial(&mut self) -> Vec<Effect> {
        if self.visitor_selected {
            debug!("initial category skipped, visitor already filtered");
            return Vec::new();
        }
        self.apply_category(Category::All)
    }

    /// The "show more" / "show less" control was clicked.
    pub fn toggle_expansion(&mut self) -> Vec<Effect> {
        self.expanded = !self.expanded;
        let mut out = Vec::new();
        self.apply_policy(&mut out);
        self.update_toggle_label(&mut out);
        out
    }

    pub fn hide_loading(&self) -> Vec<Effect> {
        vec![Effect::display(Widget::MenuLoading, Display::None)]
    }

    pub fn item_frame(&mut self, item: usize, generation: u64) -> Vec<Effect> {
        let mut out = Vec::new();
        if let Some(entry) = self.items.get_mut(item) {
            entry.visibility.frame(generation, &mut out);
        }
        out
    }

    pub fn item_timer(&mut self, item: usize, generation: u64) -> Vec<Effect> {
        let mut out = Vec::new();
        if let Some(entry) = self.items.get_mut(item) {
            entry.visibility.timer(generation, &mut out);
        }
        out
    }

    /// Relabel the toggle if the locale changed since the last call.
    pub fn sync_locale(&mut self) -> Vec<Effect> {
        let mut out = Vec::new();
        if self.locale_changed.replace(false) {
            self.update_toggle_label(&mut out);
        }
        out
    }

    fn parse_category(&self, id: &str) -> Result<Category, SiteError> {
        if id == ALL {
            return Ok(Category::All);
        }
        let known = self.buttons.iter().any(|b| b == id)
            || self.items.iter().any(|item| item.category == id);
        if known {
            Ok(Category::Named(id.to_owned()))
        } else {
            Err(SiteError::UnknownCategory(id.to_owned()))
        }
    }

    fn apply_category(&mut self, category: Category) -> Vec<Effect> {
        let mut out = Vec::new();
        self.current = category;
        self.expanded = false;
        self.apply_policy(&mut out);
        if self.toggle_visible {
            self.update_toggle_label(&mut out);
        }

        let selected = self.current.id().to_owned();
        for (index, button) in self.buttons.iter().enumerate() {
            let active = *button == selected;
            out.push(Effect::class(Target::CategoryButton(index), "active", active));
            out.push(Effect::attr(
                Target::CategoryButton(index),
                "aria-selected",
                aria_bool(active),
            ));
        }

        let message = match &self.current {
            Category::All => "Menu filtered to show all items".to_owned(),
            Category::Named(name) => format!("Menu filtered to show {name} items"),
        };
        self.announcer.announce(message, &mut out);
        info!(category = %selected, "menu filtered");
        out
    }

    fn apply_policy(&mut self, out: &mut Vec<Effect>) {
        let mut matching = 0usize;
        for item in &mut self.items {
            if self.current.matches(&item.category) {
                if matching < self.limit || self.expanded {
                    item.visibility.show(out);
                } else {
                    item.visibility.hide(self.animation, out);
                }
                matching += 1;
            } else {
                item.visibility.hide(self.animation, out);
            }
        }

        self.toggle_visible = matching > self.limit;
        out.push(Effect::display(
            Widget::ShowMoreContainer,
            if self.toggle_visible {
                Display::Block
            } else {
                Display::None
            },
        ));
    }

    fn update_toggle_label(&self, out: &mut Vec<Effect>) {
        let key = if self.expanded {
            "menu_show_less"
        } else {
            "menu_show_more"
        };
        let locale = self.locale.get();
        match self.catalog.get(locale, key) {
            Some(text) => out.push(Effect::text(Widget::ShowMoreLabel, text)),
            None => debug!(%locale, key, "toggle label untranslated"),
        }
        out.push(Effect::class(Widget::ShowMoreIcon, "fa-chevron-down", !self.expanded));
        out.push(Effect::class(Widget::ShowMoreIcon, "fa-chevron-up", self.expanded));
    }
}
