//! Composition root.
//!
//! [`Page`] owns the content, the config, the [`Store`] and the five
//! controllers. Mounting it against an [`Environment`] starts the rotation
//! timer and attaches the scroll monitor; the returned [`MountedPage`] guard
//! tears both down when dropped.
//!
//! ```text
//!   Environment ──schedule/scroll/observe──▶ controllers ──writes──▶ Store
//!                                                                      │
//!   rendered surface ◀──────────── LiveView (subscriber) ◀──Change─────┘
//!          │
//!          └──── UserEvent ──▶ MountedPage::dispatch ──▶ controllers
//! ```
//!
//! Mounting again while a previous mount is alive restarts the timer and
//! re-attaches the listeners; the older guard becomes stale and its drop is a
//! no-op, so exactly one timer is live per page.

use crate::config::PageConfig;
use crate::content::Content;
use crate::controllers::{
    CategorySelector, NavToggle, PageError, ReservationForm, RotationTimer, ScrollMonitor,
};
use crate::env::Environment;
use crate::generate::RenderContext;
use crate::particles::{Particle, particle_field};
use crate::state::{PageState, RevealBoard, Store};
use crate::types::{FormField, MenuItem, ReviewEntry, Section};
use std::cell::Cell;
use std::rc::Rc;

/// An event originating from the rendered page.
#[derive(Debug, Clone, PartialEq)]
pub enum UserEvent {
    /// Hamburger button.
    ToggleNav,
    /// A navigation link (desktop bar or mobile panel).
    NavLink(Section),
    /// A menu category tab.
    SelectCategory(usize),
    /// A review dot.
    SelectReview(usize),
    /// An input or textarea change.
    EditField { field: FormField, value: String },
    /// Form submit, after the surface's required-field checks passed.
    Submit,
}

/// What the surface should do after an event was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    Handled,
    /// Scroll to this anchor fragment.
    Navigate(String),
}

pub struct Page {
    content: Content,
    config: PageConfig,
    store: Rc<Store>,
    particles: Vec<Particle>,
    rotation: RotationTimer,
    scroll: ScrollMonitor,
    categories: CategorySelector,
    nav: NavToggle,
    reservation: ReservationForm,
    mount_generation: Cell<u64>,
    mounted: Cell<bool>,
}

impl Page {
    pub fn new(content: Content, config: PageConfig) -> Self {
        let store = Store::new();
        let rotation = RotationTimer::new(
            Rc::clone(&store),
            content.reviews.len(),
            config.rotation.interval(),
        );
        let scroll = ScrollMonitor::new(Rc::clone(&store), config.scroll.threshold_px);
        let categories = CategorySelector::new(Rc::clone(&store), content.menu.len());
        let nav = NavToggle::new(Rc::clone(&store));
        let reservation = ReservationForm::new(
            Rc::clone(&store),
            config.reservation.acknowledgement.clone(),
        );
        let particles = particle_field(config.particles.count, config.particles.seed);

        Self {
            content,
            config,
            store,
            particles,
            rotation,
            scroll,
            categories,
            nav,
            reservation,
            mount_generation: Cell::new(0),
            mounted: Cell::new(false),
        }
    }

    /// Start the timer and attach scroll/viewport listeners.
    pub fn mount(&self, env: &Environment) -> MountedPage<'_> {
        let generation = self.mount_generation.get() + 1;
        self.mount_generation.set(generation);

        let rotating = self.rotation.start(&env.scheduler);
        self.scroll.attach(&env.scroll, &env.viewport);
        self.mounted.set(true);
        tracing::info!(generation, rotating, "page mounted");

        MountedPage {
            page: self,
            env: env.clone(),
            generation,
        }
    }

    fn teardown(&self, generation: u64) {
        if self.mount_generation.get() != generation || !self.mounted.get() {
            return;
        }
        self.rotation.stop();
        self.scroll.detach();
        self.mounted.set(false);
        tracing::info!(generation, "page unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    pub fn store(&self) -> &Rc<Store> {
        &self.store
    }

    pub fn state(&self) -> PageState {
        self.store.snapshot()
    }

    pub fn reveals(&self) -> RevealBoard {
        self.store.reveals()
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The review on show, or `None` when the content has no reviews.
    pub fn active_review(&self) -> Option<&ReviewEntry> {
        let index = self.store.with_state(|s| s.active_review_index);
        self.content.reviews.get(index)
    }

    /// Items of the active menu category.
    pub fn displayed_menu_items(&self) -> &[MenuItem] {
        self.categories.displayed(&self.content)
    }

    pub fn render_context(&self) -> RenderContext<'_> {
        RenderContext {
            content: &self.content,
            config: &self.config,
            state: self.store.snapshot(),
            reveals: self.store.reveals(),
            particles: &self.particles,
        }
    }
}

/// A page attached to its environment. Dropping it unmounts the page.
pub struct MountedPage<'a> {
    page: &'a Page,
    env: Environment,
    generation: u64,
}

impl MountedPage<'_> {
    pub fn page(&self) -> &Page {
        self.page
    }

    /// Whether a later mount has superseded this one.
    pub fn is_stale(&self) -> bool {
        self.page.mount_generation.get() != self.generation
    }

    /// Route a user event to the controller that owns the affected state.
    pub fn dispatch(&self, event: UserEvent) -> Result<Dispatched, PageError> {
        let page = self.page;
        match event {
            UserEvent::ToggleNav => page.nav.toggle(),
            UserEvent::NavLink(section) => {
                return Ok(Dispatched::Navigate(page.nav.navigate(section)));
            }
            UserEvent::SelectCategory(index) => page.categories.select(index)?,
            UserEvent::SelectReview(index) => page.rotation.select(index)?,
            UserEvent::EditField { field, value } => page.reservation.edit_field(field, value),
            UserEvent::Submit => page.reservation.submit(self.env.notifier.as_ref()),
        }
        Ok(Dispatched::Handled)
    }

    /// Unmount now rather than at end of scope.
    pub fn unmount(self) {}
}

impl std::ops::Deref for MountedPage<'_> {
    type Target = Page;

    fn deref(&self) -> &Page {
        self.page
    }
}

impl Drop for MountedPage<'_> {
    fn drop(&mut self) {
        self.page.teardown(self.generation);
    }
}
