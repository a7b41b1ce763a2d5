//! Page interaction state and change notification.
//!
//! [`Store`] holds the five [`PageState`] fields plus the [`RevealBoard`], and
//! publishes a [`Change`] to every subscriber after each effective write. The
//! rendering side subscribes instead of assuming an ambient re-render loop.
//!
//! Each field has exactly one writer:
//!
//! | Field | Writer |
//! |-------|--------|
//! | `active_review_index` | [`RotationTimer`](crate::controllers::RotationTimer) |
//! | `active_menu_category_index` | [`CategorySelector`](crate::controllers::CategorySelector) |
//! | `is_nav_menu_open` | [`NavToggle`](crate::controllers::NavToggle) |
//! | `is_scrolled`, reveal board | [`ScrollMonitor`](crate::controllers::ScrollMonitor) |
//! | `reservation` | [`ReservationForm`](crate::controllers::ReservationForm) |
//!
//! The setters are `pub(crate)` and called only from those controllers.
//!
//! Execution is single-threaded and cooperative, so the store uses
//! `RefCell`/`Rc` rather than locks. A write borrow is always dropped before
//! subscribers run, so a subscriber may read the store freely.

use crate::env::Lease;
use crate::types::{FormField, ReservationRequest, Section};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::{Rc, Weak};

/// The mutable state of one page visit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageState {
    /// Featured review, always in `[0, review_count)`.
    pub active_review_index: usize,
    /// Selected menu tab, always in `[0, category_count)`.
    pub active_menu_category_index: usize,
    pub is_nav_menu_open: bool,
    /// True iff the last observed scroll offset exceeded the threshold.
    pub is_scrolled: bool,
    pub reservation: ReservationRequest,
}

/// Which sections have played their entrance animation.
///
/// Non-hero sections are one-shot: once revealed they stay revealed. The hero
/// replays every time it re-enters the viewport; `hero_plays` counts starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RevealBoard {
    revealed: BTreeSet<Section>,
    hero_visible: bool,
    hero_plays: u32,
}

impl RevealBoard {
    pub fn is_revealed(&self, section: Section) -> bool {
        if section.is_hero() {
            self.hero_visible || self.hero_plays > 0
        } else {
            self.revealed.contains(&section)
        }
    }

    /// Revealed non-hero sections in document order.
    pub fn revealed(&self) -> impl Iterator<Item = Section> + '_ {
        self.revealed.iter().copied()
    }

    pub fn hero_visible(&self) -> bool {
        self.hero_visible
    }

    pub fn hero_plays(&self) -> u32 {
        self.hero_plays
    }

    /// Returns `true` the first time `section` is revealed.
    fn reveal(&mut self, section: Section) -> bool {
        self.revealed.insert(section)
    }

    /// Returns `true` when this transition starts a new hero sequence.
    fn set_hero_visible(&mut self, visible: bool) -> bool {
        let entered = visible && !self.hero_visible;
        self.hero_visible = visible;
        if entered {
            self.hero_plays += 1;
        }
        entered
    }
}

/// A published state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    ActiveReview { index: usize },
    ActiveMenuCategory { index: usize },
    NavMenuOpen { open: bool },
    Scrolled { scrolled: bool },
    ReservationEdited { field: FormField },
    ReservationReset,
    SectionRevealed { section: Section },
    HeroReplayed { plays: u32 },
    HeroHidden,
}

type Callback = Rc<dyn Fn(&Change)>;

/// Shared state container with subscribe/notify.
#[derive(Default)]
pub struct Store {
    state: RefCell<PageState>,
    reveals: RefCell<RevealBoard>,
    subscribers: RefCell<Vec<(u64, Callback)>>,
    next_subscriber: Cell<u64>,
}

impl Store {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// A copy of the current page state.
    pub fn snapshot(&self) -> PageState {
        self.state.borrow().clone()
    }

    /// Read the state without cloning.
    pub fn with_state<R>(&self, f: impl FnOnce(&PageState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn reveals(&self) -> RevealBoard {
        self.reveals.borrow().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Register `callback` for every subsequent [`Change`].
    ///
    /// The subscription lasts as long as the returned lease.
    pub fn subscribe(self: &Rc<Self>, callback: impl Fn(&Change) + 'static) -> Lease {
        let id = self.next_subscriber.get();
        self.next_subscriber.set(id + 1);
        self.subscribers
            .borrow_mut()
            .push((id, Rc::new(callback)));

        let store: Weak<Self> = Rc::downgrade(self);
        Lease::new("store-subscription", move || {
            if let Some(store) = store.upgrade() {
                store.subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
            }
        })
    }

    fn publish(&self, change: Change) {
        tracing::trace!(?change, "publish");
        // Clone the list so callbacks may subscribe or unsubscribe.
        let callbacks: Vec<Callback> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(&change);
        }
    }

    // ------------------------------------------------------------------
    // Writers, one per controller
    // ------------------------------------------------------------------

    pub(crate) fn set_active_review(&self, index: usize) {
        let changed = replace_if_changed(&mut self.state.borrow_mut().active_review_index, index);
        if changed {
            self.publish(Change::ActiveReview { index });
        }
    }

    pub(crate) fn set_active_menu_category(&self, index: usize) {
        let changed = replace_if_changed(
            &mut self.state.borrow_mut().active_menu_category_index,
            index,
        );
        if changed {
            self.publish(Change::ActiveMenuCategory { index });
        }
    }

    pub(crate) fn set_nav_menu_open(&self, open: bool) {
        let changed = replace_if_changed(&mut self.state.borrow_mut().is_nav_menu_open, open);
        if changed {
            self.publish(Change::NavMenuOpen { open });
        }
    }

    pub(crate) fn set_scrolled(&self, scrolled: bool) {
        let changed = replace_if_changed(&mut self.state.borrow_mut().is_scrolled, scrolled);
        if changed {
            self.publish(Change::Scrolled { scrolled });
        }
    }

    pub(crate) fn edit_reservation(&self, field: FormField, value: String) {
        self.state.borrow_mut().reservation.set(field, value);
        self.publish(Change::ReservationEdited { field });
    }

    /// Clear all four fields. Always publishes so bound inputs re-render.
    pub(crate) fn reset_reservation(&self) {
        self.state.borrow_mut().reservation = ReservationRequest::default();
        self.publish(Change::ReservationReset);
    }

    pub(crate) fn reveal_section(&self, section: Section) {
        let first = self.reveals.borrow_mut().reveal(section);
        if first {
            self.publish(Change::SectionRevealed { section });
        }
    }

    pub(crate) fn set_hero_visible(&self, visible: bool) {
        let (entered, was_visible, plays) = {
            let mut board = self.reveals.borrow_mut();
            let was_visible = board.hero_visible;
            let entered = board.set_hero_visible(visible);
            (entered, was_visible, board.hero_plays)
        };
        if entered {
            self.publish(Change::HeroReplayed { plays });
        } else if was_visible && !visible {
            self.publish(Change::HeroHidden);
        }
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
