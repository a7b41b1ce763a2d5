//! Capabilities supplied by the hosting environment.
//!
//! The controllers never talk to a browser directly. They are handed an
//! [`Environment`] holding four capabilities:
//!
//! | Capability | Used by |
//! |------------|---------|
//! | [`Scheduler`] | rotation timer |
//! | [`ScrollSource`] | scroll monitor (nav chrome) |
//! | [`ViewportObserver`] | scroll monitor (reveal arming) |
//! | [`Notifier`] | reservation form |
//!
//! [`crate::sim`] provides deterministic implementations for tests and the
//! `simulate` command.
//!
//! # Scoped acquisition
//!
//! Every registration (timer, scroll listener, viewport observer, store
//! subscription) is returned to its owner wrapped in a [`Lease`]. Dropping the
//! lease releases the registration exactly once, so teardown happens on every
//! exit path, including early unmount and panics unwinding through the owner.

use crate::types::Section;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Identifier returned by [`Scheduler::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Identifier returned by [`ScrollSource::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Identifier returned by [`ViewportObserver::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

/// Recurring timer capability.
pub trait Scheduler {
    /// Run `callback` every `interval` until cancelled.
    fn schedule(&self, interval: Duration, callback: Box<dyn FnMut()>) -> TimerId;
    /// Cancel a timer. Cancelling an unknown or already-cancelled id is a no-op.
    fn cancel(&self, id: TimerId);
}

/// Source of scroll events and the current vertical offset.
pub trait ScrollSource {
    /// Current vertical scroll offset in CSS pixels.
    fn scroll_y(&self) -> f64;
    /// Invoke `callback` with the new offset on every scroll event.
    fn add_listener(&self, callback: Box<dyn FnMut(f64)>) -> ListenerId;
    fn remove_listener(&self, id: ListenerId);
}

/// How a viewport subscription reports visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserveMode {
    /// Report the first entry into the viewport, then stop observing.
    Once,
    /// Report every enter and exit for as long as the subscription lives.
    Repeat,
}

/// Viewport intersection capability.
pub trait ViewportObserver {
    /// Watch `anchor` and call `callback(visible)` per `mode`.
    fn observe(
        &self,
        anchor: Section,
        mode: ObserveMode,
        callback: Box<dyn FnMut(bool)>,
    ) -> ObserverId;
    fn unobserve(&self, id: ObserverId);
}

/// User-facing acknowledgement surface (modal, toast, alert).
pub trait Notifier {
    fn acknowledge(&self, message: &str);
}

/// The capabilities a page needs to mount.
#[derive(Clone)]
pub struct Environment {
    pub scheduler: Rc<dyn Scheduler>,
    pub scroll: Rc<dyn ScrollSource>,
    pub viewport: Rc<dyn ViewportObserver>,
    pub notifier: Rc<dyn Notifier>,
}

// ============================================================================
// Lease
// ============================================================================

/// Guard that runs its release action exactly once, on drop or on
/// [`Lease::release`].
#[must_use = "dropping a lease releases the resource immediately"]
pub struct Lease {
    label: &'static str,
    release: Option<Box<dyn FnOnce()>>,
}

impl Lease {
    pub fn new(label: &'static str, release: impl FnOnce() + 'static) -> Self {
        Self {
            label,
            release: Some(Box::new(release)),
        }
    }

    /// Release now instead of at end of scope.
    pub fn release(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(release) = self.release.take() {
            tracing::trace!(lease = self.label, "released");
            release();
        }
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        self.run();
    }
}

impl fmt::Debug for Lease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease")
            .field("label", &self.label)
            .field("held", &self.release.is_some())
            .finish()
    }
}

/// Schedule a recurring timer whose lease cancels it.
pub fn scoped_timer(
    scheduler: &Rc<dyn Scheduler>,
    interval: Duration,
    callback: Box<dyn FnMut()>,
) -> Lease {
    let id = scheduler.schedule(interval, callback);
    let scheduler = Rc::clone(scheduler);
    Lease::new("timer", move || scheduler.cancel(id))
}

/// Attach a scroll listener whose lease detaches it.
pub fn scoped_scroll_listener(
    scroll: &Rc<dyn ScrollSource>,
    callback: Box<dyn FnMut(f64)>,
) -> Lease {
    let id = scroll.add_listener(callback);
    let scroll = Rc::clone(scroll);
    Lease::new("scroll-listener", move || scroll.remove_listener(id))
}

/// Start observing an anchor; the lease stops observing it.
pub fn scoped_observer(
    viewport: &Rc<dyn ViewportObserver>,
    anchor: Section,
    mode: ObserveMode,
    callback: Box<dyn FnMut(bool)>,
) -> Lease {
    let id = viewport.observe(anchor, mode, callback);
    let viewport = Rc::clone(viewport);
    Lease::new("viewport-observer", move || viewport.unobserve(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn lease_releases_on_drop() {
        let count = Rc::new(Cell::new(0));
        {
            let c = Rc::clone(&count);
            let _lease = Lease::new("test", move || c.set(c.get() + 1));
            assert_eq!(count.get(), 0);
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn explicit_release_runs_once() {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let lease = Lease::new("test", move || c.set(c.get() + 1));
        lease.release();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn lease_releases_during_unwind() {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _lease = Lease::new("test", move || c.set(c.get() + 1));
            panic!("mount failed");
        }));
        assert!(result.is_err());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn debug_shows_label_and_state() {
        let lease = Lease::new("timer", || {});
        let text = format!("{lease:?}");
        assert!(text.contains("timer"));
        assert!(text.contains("held: true"));
    }
}
