//! Reservation form input and submit cycle.
//!
//! Edits replace a single field with no validation. Submit assumes the
//! presentation layer already enforced the required inputs (name, phone,
//! date); it acknowledges the request and clears the form. Nothing is sent
//! anywhere and submit has no failure path.

use crate::env::Notifier;
use crate::state::Store;
use crate::types::{FormField, ReservationRequest};
use std::rc::Rc;

pub struct ReservationForm {
    store: Rc<Store>,
    acknowledgement: String,
}

impl ReservationForm {
    pub fn new(store: Rc<Store>, acknowledgement: impl Into<String>) -> Self {
        Self {
            store,
            acknowledgement: acknowledgement.into(),
        }
    }

    pub fn edit_field(&self, field: FormField, value: impl Into<String>) {
        self.store.edit_reservation(field, value.into());
    }

    /// Acknowledge through `notifier`, then reset all four fields.
    pub fn submit(&self, notifier: &dyn Notifier) {
        tracing::debug!("reservation submitted");
        notifier.acknowledge(&self.acknowledgement);
        self.store.reset_reservation();
    }

    pub fn request(&self) -> ReservationRequest {
        self.store.with_state(|s| s.reservation.clone())
    }
}
