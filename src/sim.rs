//! Deterministic in-process environment.
//!
//! Stands in for the browser when running tests and the `simulate` command:
//!
//! - [`VirtualClock`]: a [`Scheduler`] driven by explicit `advance(ms)` calls.
//! - [`SimulatedViewport`]: a [`ScrollSource`] and [`ViewportObserver`] over a
//!   fixed vertical stack of sections.
//! - [`RecordingNotifier`]: a [`Notifier`] that keeps every message.
//!
//! Callbacks are always invoked after internal borrows are released, so a
//! callback may call back into the same object (e.g. cancel its own timer).

use crate::env::{
    Environment, ListenerId, Notifier, ObserveMode, ObserverId, ScrollSource, Scheduler, TimerId,
    ViewportObserver,
};
use crate::types::Section;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

type Shared<F> = Rc<RefCell<Box<F>>>;

// ============================================================================
// Virtual clock
// ============================================================================

struct TimerSlot {
    interval_ms: u64,
    next_due: u64,
    callback: Shared<dyn FnMut()>,
}

/// Manually advanced clock implementing [`Scheduler`].
#[derive(Default)]
pub struct VirtualClock {
    now: Cell<u64>,
    timers: RefCell<BTreeMap<u64, TimerSlot>>,
    next_id: Cell<u64>,
}

impl VirtualClock {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn now_ms(&self) -> u64 {
        self.now.get()
    }

    pub fn live_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Move time forward by `ms`, firing every timer that comes due, in due
    /// order (ties broken by registration order). Returns the number of firings.
    pub fn advance(&self, ms: u64) -> usize {
        let target = self.now.get().saturating_add(ms);
        let mut fired = 0;
        loop {
            let next = self
                .timers
                .borrow()
                .iter()
                .filter(|(_, slot)| slot.next_due <= target)
                .min_by_key(|(id, slot)| (slot.next_due, **id))
                .map(|(id, slot)| (*id, slot.next_due, Rc::clone(&slot.callback)));
            let Some((id, due, callback)) = next else {
                break;
            };

            self.now.set(due);
            let retired = match self.timers.borrow_mut().get_mut(&id) {
                Some(slot) => match due.checked_add(slot.interval_ms) {
                    Some(next_due) => {
                        slot.next_due = next_due;
                        false
                    }
                    None => true,
                },
                None => false,
            };
            if retired {
                // Past the end of representable time: this was its last firing.
                tracing::debug!(timer = id, "timer retired at clock limit");
                self.timers.borrow_mut().remove(&id);
            }
            (callback.borrow_mut())();
            fired += 1;
        }
        self.now.set(target);
        fired
    }
}

impl Scheduler for VirtualClock {
    fn schedule(&self, interval: Duration, callback: Box<dyn FnMut()>) -> TimerId {
        // Zero intervals are clamped like browsers do, otherwise advance() never ends.
        let interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX).max(1);
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.timers.borrow_mut().insert(
            id,
            TimerSlot {
                interval_ms,
                next_due: self.now.get().saturating_add(interval_ms),
                callback: Rc::new(RefCell::new(callback)),
            },
        );
        TimerId(id)
    }

    fn cancel(&self, id: TimerId) {
        self.timers.borrow_mut().remove(&id.0);
    }
}

// ============================================================================
// Simulated viewport
// ============================================================================

/// Vertical placement of one section, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionLayout {
    pub section: Section,
    pub top: f64,
    pub height: f64,
}

/// Stack sections top to bottom with the given heights.
pub fn stack_layout(heights: &[(Section, f64)]) -> Vec<SectionLayout> {
    let mut top = 0.0;
    heights
        .iter()
        .map(|&(section, height)| {
            let layout = SectionLayout {
                section,
                top,
                height,
            };
            top += height;
            layout
        })
        .collect()
}

/// Section heights for a typical 1280x800 desktop rendering.
pub fn default_layout() -> Vec<SectionLayout> {
    stack_layout(&[
        (Section::Hero, 900.0),
        (Section::Experience, 1000.0),
        (Section::Menu, 1200.0),
        (Section::Wine, 800.0),
        (Section::Reviews, 800.0),
        (Section::Gallery, 1000.0),
        (Section::Contact, 1200.0),
    ])
}

struct Observation {
    anchor: Section,
    mode: ObserveMode,
    visible: bool,
    callback: Shared<dyn FnMut(bool)>,
}

/// Scroll position plus intersection tracking over a static layout.
pub struct SimulatedViewport {
    scroll_y: Cell<f64>,
    height: f64,
    layout: Vec<SectionLayout>,
    listeners: RefCell<BTreeMap<u64, Shared<dyn FnMut(f64)>>>,
    observers: RefCell<BTreeMap<u64, Observation>>,
    next_id: Cell<u64>,
}

impl SimulatedViewport {
    /// 800px tall viewport over [`default_layout`].
    pub fn new() -> Rc<Self> {
        Self::with_layout(800.0, default_layout())
    }

    pub fn with_layout(height: f64, layout: Vec<SectionLayout>) -> Rc<Self> {
        Rc::new(Self {
            scroll_y: Cell::new(0.0),
            height,
            layout,
            listeners: RefCell::new(BTreeMap::new()),
            observers: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(0),
        })
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn section_top(&self, section: Section) -> Option<f64> {
        self.layout
            .iter()
            .find(|l| l.section == section)
            .map(|l| l.top)
    }

    /// Whether any part of `section` overlaps `[scroll_y, scroll_y + height)`.
    pub fn is_visible(&self, section: Section) -> bool {
        let y = self.scroll_y.get();
        self.layout
            .iter()
            .find(|l| l.section == section)
            .is_some_and(|l| l.top < y + self.height && l.top + l.height > y)
    }

    /// Scroll to `y`: fire scroll listeners, then intersection changes.
    pub fn scroll_to(&self, y: f64) {
        self.scroll_y.set(y.max(0.0));
        let y = self.scroll_y.get();

        let listeners: Vec<Shared<dyn FnMut(f64)>> =
            self.listeners.borrow().values().cloned().collect();
        for listener in listeners {
            (listener.borrow_mut())(y);
        }

        let ids: Vec<u64> = self.observers.borrow().keys().copied().collect();
        for id in ids {
            self.evaluate(id);
        }
    }

    /// Scroll so that `section` starts at the top of the viewport.
    pub fn scroll_into_view(&self, section: Section) {
        if let Some(top) = self.section_top(section) {
            self.scroll_to(top);
        }
    }

    /// Recompute one observation and deliver a notification if it changed.
    fn evaluate(&self, id: u64) {
        let delivery = {
            let mut observers = self.observers.borrow_mut();
            let Some(obs) = observers.get_mut(&id) else {
                return;
            };
            let visible = self.is_visible(obs.anchor);
            if visible == obs.visible {
                return;
            }
            obs.visible = visible;
            let mode = obs.mode;
            match mode {
                ObserveMode::Repeat => Some((Rc::clone(&obs.callback), visible)),
                ObserveMode::Once if visible => {
                    let callback = Rc::clone(&obs.callback);
                    observers.remove(&id);
                    Some((callback, true))
                }
                ObserveMode::Once => None,
            }
        };
        if let Some((callback, visible)) = delivery {
            (callback.borrow_mut())(visible);
        }
    }
}

impl ScrollSource for SimulatedViewport {
    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn add_listener(&self, callback: Box<dyn FnMut(f64)>) -> ListenerId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners
            .borrow_mut()
            .insert(id, Rc::new(RefCell::new(callback)));
        ListenerId(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().remove(&id.0);
    }
}

impl ViewportObserver for SimulatedViewport {
    fn observe(
        &self,
        anchor: Section,
        mode: ObserveMode,
        callback: Box<dyn FnMut(bool)>,
    ) -> ObserverId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.observers.borrow_mut().insert(
            id,
            Observation {
                anchor,
                mode,
                visible: false,
                callback: Rc::new(RefCell::new(callback)),
            },
        );
        // Initial delivery, like an intersection observer's first entry.
        self.evaluate(id);
        ObserverId(id)
    }

    fn unobserve(&self, id: ObserverId) {
        self.observers.borrow_mut().remove(&id.0);
    }
}

// ============================================================================
// Notifier
// ============================================================================

/// Keeps every acknowledgement for later inspection.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: RefCell<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn acknowledge(&self, message: &str) {
        tracing::info!(message, "acknowledgement shown");
        self.messages.borrow_mut().push(message.to_string());
    }
}

// ============================================================================
// Bundle
// ============================================================================

/// A full simulated environment with typed handles to each part.
#[derive(Clone)]
pub struct SimEnv {
    pub clock: Rc<VirtualClock>,
    pub viewport: Rc<SimulatedViewport>,
    pub notifier: Rc<RecordingNotifier>,
}

impl SimEnv {
    pub fn new() -> Self {
        Self {
            clock: VirtualClock::new(),
            viewport: SimulatedViewport::new(),
            notifier: RecordingNotifier::new(),
        }
    }

    /// Type-erased capabilities for [`Page::mount`](crate::page::Page::mount).
    pub fn environment(&self) -> Environment {
        Environment {
            scheduler: self.clock.clone(),
            scroll: self.viewport.clone(),
            viewport: self.viewport.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::new()
    }
}
