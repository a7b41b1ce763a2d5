//! Shared test utilities for the unit test suite.
//!
//! Provides page/environment setup and lookups that panic with a clear
//! message on a miss.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let page = stock_page();
//! let sim = SimEnv::new();
//! let mounted = page.mount(&sim.environment());
//! sim.clock.advance(6000);
//! assert_eq!(page.active_review().unwrap().id, 2);
//! ```

use crate::config::PageConfig;
use crate::content::Content;
use crate::page::Page;
use crate::types::{MenuCategory, Section};

pub use crate::sim::SimEnv;

// =========================================================================
// Fixture setup
// =========================================================================

/// A page over the stock content with default config.
pub fn stock_page() -> Page {
    Page::new(Content::stock(), PageConfig::default())
}

/// A page over stock content with only the first `n` reviews.
pub fn page_with_reviews(n: usize) -> Page {
    let mut content = Content::stock();
    content.reviews.truncate(n);
    Page::new(content, PageConfig::default())
}

// =========================================================================
// Lookups (panic with a clear message on miss)
// =========================================================================

/// Find a menu category by title. Panics if not found.
pub fn find_category<'a>(content: &'a Content, title: &str) -> (usize, &'a MenuCategory) {
    content
        .menu
        .iter()
        .enumerate()
        .find(|(_, c)| c.title == title)
        .unwrap_or_else(|| {
            let titles: Vec<&str> = content.menu.iter().map(|c| c.title.as_str()).collect();
            panic!("menu category '{title}' not found. Available: {titles:?}")
        })
}

/// Scroll offset that brings `section` to the top of the simulated viewport.
pub fn top_of(sim: &SimEnv, section: Section) -> f64 {
    sim.viewport
        .section_top(section)
        .unwrap_or_else(|| panic!("section '{section}' missing from simulated layout"))
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// Names of the menu items currently displayed.
pub fn displayed_names(page: &Page) -> Vec<String> {
    page.displayed_menu_items()
        .iter()
        .map(|i| i.name.clone())
        .collect()
}

/// Revealed non-hero sections in document order.
pub fn revealed_sections(page: &Page) -> Vec<Section> {
    page.reveals().revealed().collect()
}
