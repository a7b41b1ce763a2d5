//! # Alchemist Page
//!
//! The marketing page of The Alchemist Dine & Wine, and the presentation state
//! that makes it interactive: a rotating review carousel, a navigation bar that
//! changes once the visitor scrolls, menu category tabs, a mobile menu, and a
//! reservation form.
//!
//! # Architecture: State, Controllers, View
//!
//! ```text
//! content.toml ─┐
//! config.toml  ─┴─▶ Page ──mount(Environment)──▶ MountedPage
//!                    │                               │
//!                    │  five controllers write       │ dispatch(UserEvent)
//!                    ▼                               ▼
//!                  Store ──Change──▶ LiveView ──▶ regions re-rendered (maud)
//! ```
//!
//! The page never touches a browser directly. Timers, scroll events, viewport
//! intersection and the acknowledgement popup are capabilities passed in at
//! mount time ([`env::Environment`]). [`sim`] implements all four
//! deterministically, which is what the tests and the `simulate` command run
//! against.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Content records, page sections, form fields, the reservation request |
//! | [`content`] | Built-in restaurant content, optional `content.toml` override, validation |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`env`] | Capability traits, the `Environment` bundle, and `Lease` scoped guards |
//! | [`state`] | `PageState`, the reveal board, and the subscribe/notify `Store` |
//! | [`controllers`] | Rotation, scroll, category, nav, and reservation controllers |
//! | [`page`] | Composition root: mount/unmount and user event dispatch |
//! | [`view`] | Store subscriber that re-renders only the regions a change touched |
//! | [`generate`] | Maud rendering of each region and of the full page |
//! | [`particles`] | Seeded decorative particle field for the hero |
//! | [`sim`] | Virtual clock, simulated viewport, recording notifier |
//! | [`script`] | Session script parser and runner behind `simulate` |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Writer Per Field
//!
//! Each of the five state fields is written by exactly one controller. Timer
//! ticks, scroll events and clicks can interleave in any order without any
//! controller reading another's field, so there is nothing to lock and nothing
//! to order.
//!
//! ## Leases Instead of Cleanup Callbacks
//!
//! Every timer, scroll listener, viewport observation and store subscription is
//! held as a [`env::Lease`]. Dropping the lease releases the resource, so an
//! early return or a panic during teardown cannot leak a timer that keeps
//! advancing the carousel after the page is gone.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Templates are
//! checked at compile time, every interpolation is escaped, and there are no
//! runtime template files to ship.

pub mod config;
pub mod content;
pub mod controllers;
pub mod env;
pub mod generate;
pub mod output;
pub mod page;
pub mod particles;
pub mod script;
pub mod sim;
pub mod state;
pub mod types;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
