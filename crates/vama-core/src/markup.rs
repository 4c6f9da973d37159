//! Snapshot of the externally rendered markup the coordinators act on.
//!
//! The host walks the DOM once at startup and records, for every collection
//! of the DOM contract, what the coordinators need to know. Effects later
//! refer back to elements by their index in these collections.

/// One image of the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryImage {
    pub src: String,
    pub alt: String,
}

impl GalleryImage {
    /// Build an image, substituting `Gallery image {position}` for an empty
    /// alt text (`position` is 1-based).
    pub fn new(src: impl Into<String>, alt: Option<&str>, position: usize) -> Self {
        let alt = match alt.map(str::trim) {
            Some(alt) if !alt.is_empty() => alt.to_owned(),
            _ => format!("Gallery image {position}"),
        };
        Self {
            src: src.into(),
            alt,
        }
    }
}

/// Everything collected from the page at bootstrap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMarkup {
    /// `data-translate` key of each translatable node, in DOM order.
    pub translatable_keys: Vec<String>,
    /// Number of `.lang-option` entries.
    pub lang_options: usize,
    /// `href` of each `.nav-link`, in DOM order.
    pub nav_links: Vec<String>,
    /// `data-category` of each `.category-btn`, in DOM order.
    pub category_buttons: Vec<String>,
    /// `data-category` of each `.menu-item`, in DOM order.
    pub menu_items: Vec<String>,
    /// Gallery images, in DOM order.
    pub gallery: Vec<GalleryImage>,
    /// Number of reveal-on-scroll blocks. Zero when the browser has no
    /// intersection observer.
    pub reveal_blocks: usize,
    /// Whether a `.skip-nav` control exists.
    pub has_skip_nav: bool,
}

/// Vertical extent of a `section[id]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    /// Half-open containment: `top <= y < top + height`.
    #[must_use]
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Layout measured by the host when an animation frame fires.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMetrics {
    /// `window.pageYOffset`
    pub scroll_y: f64,
    /// Filled only for tasks that need it (see `FrameTask::needs_sections`).
    pub sections: Vec<SectionBounds>,
}

impl PageMetrics {
    #[must_use]
    pub fn at(scroll_y: f64) -> Self {
        Self {
            scroll_y,
            sections: Vec::new(),
        }
    }
}
