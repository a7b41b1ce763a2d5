//! The five presentation controllers.
//!
//! Each controller owns the writes to one slice of [`PageState`](crate::state::PageState)
//! and nothing else. They share the [`Store`](crate::state::Store) but never
//! read each other's fields, so event handlers from different sources can
//! interleave in any order.

mod category;
mod nav;
mod reservation;
mod rotation;
mod scroll;

pub use category::CategorySelector;
pub use nav::NavToggle;
pub use reservation::ReservationForm;
pub use rotation::RotationTimer;
pub use scroll::{ScrollMonitor, is_scrolled};

use thiserror::Error;

/// Rejected user events. State is left untouched when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("menu category {index} out of range (have {count})")]
    CategoryOutOfRange { index: usize, count: usize },
    #[error("review {index} out of range (have {count})")]
    ReviewOutOfRange { index: usize, count: usize },
}
