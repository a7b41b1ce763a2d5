use super::PageError;
use crate::content::Content;
use crate::state::Store;
use crate::types::MenuItem;
use std::rc::Rc;

/// Menu tab selection.
///
/// The displayed items are always derived from the active index; they are
/// never stored separately, so a switch swaps the whole list at once.
pub struct CategorySelector {
    store: Rc<Store>,
    category_count: usize,
}

impl CategorySelector {
    pub fn new(store: Rc<Store>, category_count: usize) -> Self {
        Self {
            store,
            category_count,
        }
    }

    pub fn select(&self, index: usize) -> Result<(), PageError> {
        if index >= self.category_count {
            return Err(PageError::CategoryOutOfRange {
                index,
                count: self.category_count,
            });
        }
        tracing::debug!(index, "select menu category");
        self.store.set_active_menu_category(index);
        Ok(())
    }

    pub fn active(&self) -> usize {
        self.store.with_state(|s| s.active_menu_category_index)
    }

    /// Items of the active category.
    pub fn displayed<'c>(&self, content: &'c Content) -> &'c [MenuItem] {
        content.menu_items(self.active()).unwrap_or_default()
    }
}
