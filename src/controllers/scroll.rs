//! Scroll-driven navigation chrome and reveal arming.
//!
//! Two independent signals come out of this controller:
//!
//! - **Nav chrome**: every scroll event recomputes `is_scrolled` from the
//!   offset. There is no throttling; each native event is handled.
//! - **Reveal arming**: the hero is observed in [`ObserveMode::Repeat`] and
//!   restarts its entrance sequence every time it comes back into view. Every
//!   other section is observed in [`ObserveMode::Once`] and, once revealed,
//!   never reverts.

use crate::env::{
    Lease, ObserveMode, ScrollSource, ViewportObserver, scoped_observer, scoped_scroll_listener,
};
use crate::state::Store;
use crate::types::Section;
use std::cell::RefCell;
use std::rc::Rc;

/// Strict threshold test: exactly at the threshold is not scrolled.
pub fn is_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

pub struct ScrollMonitor {
    store: Rc<Store>,
    threshold: f64,
    leases: RefCell<Vec<Lease>>,
}

impl ScrollMonitor {
    pub fn new(store: Rc<Store>, threshold: f64) -> Self {
        Self {
            store,
            threshold,
            leases: RefCell::new(Vec::new()),
        }
    }

    /// Attach the scroll listener, the hero observer, and one observer per
    /// section not yet revealed.
    ///
    /// Re-attaching releases the previous registrations first.
    pub fn attach(&self, scroll: &Rc<dyn ScrollSource>, viewport: &Rc<dyn ViewportObserver>) {
        self.detach();
        let mut leases = Vec::with_capacity(Section::ALL.len() + 1);

        let store = Rc::clone(&self.store);
        let threshold = self.threshold;
        leases.push(scoped_scroll_listener(
            scroll,
            Box::new(move |y| {
                let scrolled = is_scrolled(y, threshold);
                tracing::trace!(y, scrolled, "scroll");
                store.set_scrolled(scrolled);
            }),
        ));

        let revealed = self.store.reveals();
        for section in Section::ALL {
            if !section.is_hero() && revealed.is_revealed(section) {
                continue;
            }
            let store = Rc::clone(&self.store);
            let lease = if section.is_hero() {
                scoped_observer(
                    viewport,
                    section,
                    ObserveMode::Repeat,
                    Box::new(move |visible| {
                        tracing::debug!(visible, "hero visibility");
                        store.set_hero_visible(visible);
                    }),
                )
            } else {
                scoped_observer(
                    viewport,
                    section,
                    ObserveMode::Once,
                    Box::new(move |visible| {
                        if visible {
                            tracing::debug!(%section, "reveal");
                            store.reveal_section(section);
                        }
                    }),
                )
            };
            leases.push(lease);
        }

        *self.leases.borrow_mut() = leases;
    }

    /// Release the listener and all observers.
    pub fn detach(&self) {
        let leases = std::mem::take(&mut *self.leases.borrow_mut());
        drop(leases);
    }

    pub fn is_attached(&self) -> bool {
        !self.leases.borrow().is_empty()
    }
}

impl Drop for ScrollMonitor {
    fn drop(&mut self) {
        self.detach();
    }
}
