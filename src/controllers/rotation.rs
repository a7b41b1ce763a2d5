//! Automatic review rotation.

use super::PageError;
use crate::env::{Lease, Scheduler, scoped_timer};
use crate::state::Store;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Advances the featured review every `interval` while mounted.
///
/// At most one timer is live at a time: [`start`](Self::start) cancels any
/// previous timer before scheduling a new one, and [`stop`](Self::stop) (or
/// dropping the controller) cancels it.
pub struct RotationTimer {
    store: Rc<Store>,
    review_count: usize,
    interval: Duration,
    live: RefCell<Option<Lease>>,
}

impl RotationTimer {
    pub fn new(store: Rc<Store>, review_count: usize, interval: Duration) -> Self {
        Self {
            store,
            review_count,
            interval,
            live: RefCell::new(None),
        }
    }

    /// Schedule the recurring advance. Returns `false` without scheduling
    /// when there are no reviews to rotate through.
    pub fn start(&self, scheduler: &Rc<dyn Scheduler>) -> bool {
        self.stop();
        if self.review_count == 0 {
            tracing::warn!("no reviews to rotate; rotation timer not started");
            return false;
        }

        let store = Rc::clone(&self.store);
        let count = self.review_count;
        let lease = scoped_timer(
            scheduler,
            self.interval,
            Box::new(move || advance(&store, count)),
        );
        *self.live.borrow_mut() = Some(lease);
        tracing::debug!(interval_ms = self.interval.as_millis() as u64, "rotation started");
        true
    }

    /// Cancel the live timer, if any.
    pub fn stop(&self) {
        let lease = self.live.borrow_mut().take();
        if let Some(lease) = lease {
            lease.release();
            tracing::debug!("rotation stopped");
        }
    }

    #[cfg(test)]
    fn is_running(&self) -> bool {
        self.live.borrow().is_some()
    }

    /// One timer firing: move to the next review, wrapping at the end.
    pub fn advance(&self) {
        if self.review_count > 0 {
            advance(&self.store, self.review_count);
        }
    }

    /// Jump straight to a review (the dot buttons). Does not reset the cadence.
    pub fn select(&self, index: usize) -> Result<(), PageError> {
        if index >= self.review_count {
            return Err(PageError::ReviewOutOfRange {
                index,
                count: self.review_count,
            });
        }
        self.store.set_active_review(index);
        Ok(())
    }
}

impl Drop for RotationTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn advance(store: &Store, count: usize) {
    let next = store.with_state(|s| (s.active_review_index + 1) % count);
    tracing::debug!(next, "rotate review");
    store.set_active_review(next);
}
