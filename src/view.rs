//! Incremental rendering driven by store notifications.
//!
//! A [`LiveView`] keeps the last rendered markup of every [`Region`] and
//! subscribes to the page's store. Each [`Change`] marks the region that
//! displays the changed field as dirty; [`LiveView::flush`] re-renders exactly
//! those regions. This is the rendering side's half of the subscribe/notify
//! contract: nothing re-renders unless the store said something changed.

use crate::env::Lease;
use crate::generate::render_region;
use crate::page::Page;
use crate::state::Change;
use crate::types::Section;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

/// An independently re-renderable part of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    Nav,
    Section(Section),
}

impl Region {
    /// All regions in document order.
    pub const ALL: [Region; 8] = [
        Region::Nav,
        Region::Section(Section::Hero),
        Region::Section(Section::Experience),
        Region::Section(Section::Menu),
        Region::Section(Section::Wine),
        Region::Section(Section::Reviews),
        Region::Section(Section::Gallery),
        Region::Section(Section::Contact),
    ];

    /// The region that displays the field `change` touched.
    pub fn affected_by(change: &Change) -> Region {
        match change {
            Change::Scrolled { .. } | Change::NavMenuOpen { .. } => Region::Nav,
            Change::ActiveReview { .. } => Region::Section(Section::Reviews),
            Change::ActiveMenuCategory { .. } => Region::Section(Section::Menu),
            Change::ReservationEdited { .. } | Change::ReservationReset => {
                Region::Section(Section::Contact)
            }
            Change::SectionRevealed { section } => Region::Section(*section),
            Change::HeroReplayed { .. } | Change::HeroHidden => Region::Section(Section::Hero),
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Region::Nav => f.write_str("nav"),
            Region::Section(section) => write!(f, "{section}"),
        }
    }
}

pub struct LiveView {
    rendered: BTreeMap<Region, String>,
    dirty: Rc<RefCell<BTreeSet<Region>>>,
    renders: usize,
    _subscription: Lease,
}

impl LiveView {
    /// Render every region once and start listening for changes.
    pub fn bind(page: &Page) -> Self {
        let dirty = Rc::new(RefCell::new(BTreeSet::new()));
        let sink = Rc::clone(&dirty);
        let subscription = page.store().subscribe(move |change| {
            sink.borrow_mut().insert(Region::affected_by(change));
        });

        let ctx = page.render_context();
        let rendered: BTreeMap<Region, String> = Region::ALL
            .into_iter()
            .map(|region| (region, render_region(region, &ctx).into_string()))
            .collect();

        Self {
            renders: rendered.len(),
            rendered,
            dirty,
            _subscription: subscription,
        }
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.borrow().is_empty()
    }

    /// Regions waiting for a re-render.
    pub fn pending(&self) -> Vec<Region> {
        self.dirty.borrow().iter().copied().collect()
    }

    /// Re-render the dirty regions and return them in document order.
    pub fn flush(&mut self, page: &Page) -> Vec<Region> {
        let regions: Vec<Region> = std::mem::take(&mut *self.dirty.borrow_mut())
            .into_iter()
            .collect();
        if regions.is_empty() {
            return regions;
        }

        let ctx = page.render_context();
        for region in &regions {
            let html = render_region(*region, &ctx).into_string();
            self.rendered.insert(*region, html);
        }
        self.renders += regions.len();
        tracing::debug!(?regions, "re-rendered");
        regions
    }

    /// Last rendered markup of `region`.
    pub fn region(&self, region: Region) -> &str {
        self.rendered.get(&region).map(String::as_str).unwrap_or_default()
    }

    /// Total region renders since binding, the initial pass included.
    pub fn render_count(&self) -> usize {
        self.renders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::UserEvent;
    use crate::test_helpers::*;
    use crate::types::FormField;

    #[test]
    fn bind_renders_all_regions_clean() {
        let page = stock_page();
        let view = LiveView::bind(&page);
        assert!(!view.is_dirty());
        assert_eq!(view.render_count(), Region::ALL.len());
        assert!(view.region(Region::Nav).contains("site-nav"));
    }

    #[test]
    fn scroll_dirties_only_nav() {
        let page = stock_page();
        let sim = SimEnv::new();
        let mut view = LiveView::bind(&page);
        let _mounted = page.mount(&sim.environment());
        // Mounting plays the hero; settle that first.
        view.flush(&page);

        sim.viewport.scroll_to(10.0);
        assert!(!view.is_dirty());
        sim.viewport.scroll_to(60.0);
        assert_eq!(view.flush(&page), vec![Region::Nav]);
        assert!(view.region(Region::Nav).contains("scrolled"));
    }

    #[test]
    fn rotation_dirties_reviews() {
        let page = stock_page();
        let sim = SimEnv::new();
        let mut view = LiveView::bind(&page);
        let _mounted = page.mount(&sim.environment());
        view.flush(&page);

        sim.clock.advance(6000);
        assert_eq!(view.pending(), vec![Region::Section(Section::Reviews)]);
        view.flush(&page);
        assert!(view.region(Region::Section(Section::Reviews)).contains("<cite>Marcus T.</cite>"));
    }

    #[test]
    fn several_changes_coalesce_per_region() {
        let page = stock_page();
        let sim = SimEnv::new();
        let mut view = LiveView::bind(&page);
        let mounted = page.mount(&sim.environment());
        view.flush(&page);

        for value in ["J", "Ja", "Jan"] {
            mounted
                .dispatch(UserEvent::EditField {
                    field: FormField::Name,
                    value: value.into(),
                })
                .unwrap();
        }
        mounted.dispatch(UserEvent::ToggleNav).unwrap();
        let before = view.render_count();
        assert_eq!(
            view.flush(&page),
            vec![Region::Nav, Region::Section(Section::Contact)]
        );
        assert_eq!(view.render_count(), before + 2);
        assert!(view.region(Region::Section(Section::Contact)).contains("value=\"Jan\""));
    }

    #[test]
    fn dropping_view_unsubscribes() {
        let page = stock_page();
        let view = LiveView::bind(&page);
        assert_eq!(page.store().subscriber_count(), 1);
        drop(view);
        assert_eq!(page.store().subscriber_count(), 0);
    }

    #[test]
    fn reveal_maps_to_its_section() {
        let change = Change::SectionRevealed {
            section: Section::Gallery,
        };
        assert_eq!(
            Region::affected_by(&change),
            Region::Section(Section::Gallery)
        );
        assert_eq!(Region::affected_by(&Change::HeroHidden), Region::Section(Section::Hero));
    }
}
