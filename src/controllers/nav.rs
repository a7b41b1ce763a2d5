use crate::state::Store;
use crate::types::Section;
use std::rc::Rc;

/// Collapsed navigation panel on narrow viewports.
pub struct NavToggle {
    store: Rc<Store>,
}

impl NavToggle {
    pub fn new(store: Rc<Store>) -> Self {
        Self { store }
    }

    pub fn toggle(&self) {
        let open = !self.is_open();
        tracing::debug!(open, "toggle nav menu");
        self.store.set_nav_menu_open(open);
    }

    /// Follow a nav link: closes the panel and returns the anchor fragment.
    pub fn navigate(&self, target: Section) -> String {
        self.store.set_nav_menu_open(false);
        format!("#{}", target.anchor())
    }

    pub fn is_open(&self) -> bool {
        self.store.with_state(|s| s.is_nav_menu_open)
    }
}
