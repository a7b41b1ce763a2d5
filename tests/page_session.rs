//! End-to-end page sessions through the public API.
//!
//! Each test mounts a page over the built-in content in a simulated browser
//! and drives it the way a visitor would: waiting, scrolling, clicking tabs and
//! filling in the reservation form.

use alchemist_page::config::PageConfig;
use alchemist_page::content::Content;
use alchemist_page::page::{Page, UserEvent};
use alchemist_page::sim::SimEnv;
use alchemist_page::types::{FormField, Section};
use alchemist_page::view::{LiveView, Region};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn stock_page() -> Page {
    Page::new(Content::stock(), PageConfig::default())
}

fn page_with_reviews(n: usize) -> Page {
    let mut content = Content::stock();
    content.reviews.truncate(n);
    Page::new(content, PageConfig::default())
}

fn edit(field: FormField, value: &str) -> UserEvent {
    UserEvent::EditField {
        field,
        value: value.to_string(),
    }
}

// ============================================================================
// Review rotation
// ============================================================================

#[test]
fn six_reviews_return_to_first_after_six_ticks() {
    let page = stock_page();
    let sim = SimEnv::new();
    let _mounted = page.mount(&sim.environment());

    let mut ids = Vec::new();
    for _ in 0..6 {
        sim.clock.advance(6000);
        ids.push(page.active_review().map(|r| r.id));
    }
    assert_eq!(ids, [2, 3, 4, 5, 6, 1].map(Some).to_vec());
    assert_eq!(page.state().active_review_index, 0);
}

#[test]
fn rotation_wraps_for_every_review_count() {
    for n in 1..=6 {
        let page = page_with_reviews(n);
        let sim = SimEnv::new();
        let _mounted = page.mount(&sim.environment());
        for k in 1..n {
            sim.clock.advance(6000);
            assert_eq!(page.state().active_review_index, k, "n={n} k={k}");
        }
        sim.clock.advance(6000);
        assert_eq!(page.state().active_review_index, 0, "n={n}");
    }
}

#[test]
fn no_tick_before_interval_elapses() {
    let page = stock_page();
    let sim = SimEnv::new();
    let _mounted = page.mount(&sim.environment());
    sim.clock.advance(5999);
    assert_eq!(page.state().active_review_index, 0);
    sim.clock.advance(1);
    assert_eq!(page.state().active_review_index, 1);
}

#[test]
fn empty_review_list_schedules_nothing() {
    let page = page_with_reviews(0);
    let sim = SimEnv::new();
    let _mounted = page.mount(&sim.environment());
    assert_eq!(sim.clock.live_timers(), 0);
    sim.clock.advance(60_000);
    assert_eq!(page.state().active_review_index, 0);
    assert!(page.active_review().is_none());
}

#[test]
fn remounting_never_leaks_timers() {
    let page = stock_page();
    let sim = SimEnv::new();
    for _ in 0..5 {
        let mounted = page.mount(&sim.environment());
        assert_eq!(sim.clock.live_timers(), 1);
        drop(mounted);
        assert_eq!(sim.clock.live_timers(), 0);
    }
    let _a = page.mount(&sim.environment());
    let _b = page.mount(&sim.environment());
    assert_eq!(sim.clock.live_timers(), 1);
    sim.clock.advance(6000);
    assert_eq!(page.state().active_review_index, 1);
}

// ============================================================================
// Scroll monitor
// ============================================================================

#[test]
fn scroll_sequence_toggles_chrome() {
    let page = stock_page();
    let sim = SimEnv::new();
    let _mounted = page.mount(&sim.environment());

    let observed: Vec<bool> = [0.0, 51.0, 40.0]
        .into_iter()
        .map(|y| {
            sim.viewport.scroll_to(y);
            page.state().is_scrolled
        })
        .collect();
    assert_eq!(observed, vec![false, true, false]);
}

#[test]
fn threshold_is_strict_and_idempotent() {
    let page = stock_page();
    let sim = SimEnv::new();
    let _mounted = page.mount(&sim.environment());

    sim.viewport.scroll_to(50.0);
    assert!(!page.state().is_scrolled);
    sim.viewport.scroll_to(51.0);
    assert!(page.state().is_scrolled);
    sim.viewport.scroll_to(51.0);
    assert!(page.state().is_scrolled);
}

#[test]
fn sections_reveal_once_and_hero_replays() {
    let page = stock_page();
    let sim = SimEnv::new();
    let _mounted = page.mount(&sim.environment());
    assert_eq!(page.reveals().hero_plays(), 1);

    let gallery_top = sim.viewport.section_top(Section::Gallery).unwrap();
    sim.viewport.scroll_to(gallery_top);
    assert!(page.reveals().is_revealed(Section::Gallery));
    assert!(!page.reveals().hero_visible());

    sim.viewport.scroll_to(0.0);
    assert!(page.reveals().is_revealed(Section::Gallery));
    assert_eq!(page.reveals().hero_plays(), 2);

    sim.viewport.scroll_to(gallery_top);
    sim.viewport.scroll_to(0.0);
    assert_eq!(page.reveals().hero_plays(), 3);
    assert!(page.reveals().is_revealed(Section::Gallery));
}

#[test]
fn unmount_releases_listeners() {
    let page = stock_page();
    let sim = SimEnv::new();
    page.mount(&sim.environment()).unmount();
    assert_eq!(sim.viewport.listener_count(), 0);
    assert_eq!(sim.viewport.observer_count(), 0);

    sim.viewport.scroll_to(500.0);
    assert!(!page.state().is_scrolled);
}

// ============================================================================
// Menu, nav
// ============================================================================

#[test]
fn wine_tab_shows_exactly_its_four_items() {
    let page = stock_page();
    let sim = SimEnv::new();
    let mounted = page.mount(&sim.environment());
    mounted.dispatch(UserEvent::SelectCategory(2)).unwrap();

    let shown: Vec<&str> = page
        .displayed_menu_items()
        .iter()
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(
        shown,
        vec![
            "Old World Wine Flight",
            "New World Reds",
            "Signature Cocktails",
            "Non-Alcoholic Pairing",
        ]
    );

    let others: Vec<&str> = page
        .content()
        .menu
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 2)
        .flat_map(|(_, c)| c.items.iter().map(|i| i.name.as_str()))
        .collect();
    assert_eq!(others.len(), 12);
    assert!(others.iter().all(|name| !shown.contains(name)));
}

#[test]
fn every_category_swaps_atomically() {
    let page = stock_page();
    let sim = SimEnv::new();
    let mounted = page.mount(&sim.environment());
    for i in (0..page.content().menu.len()).rev() {
        mounted.dispatch(UserEvent::SelectCategory(i)).unwrap();
        assert_eq!(page.displayed_menu_items(), page.content().menu[i].items.as_slice());
    }
}

#[test]
fn nav_link_closes_mobile_menu() {
    let page = stock_page();
    let sim = SimEnv::new();
    let mounted = page.mount(&sim.environment());

    mounted.dispatch(UserEvent::ToggleNav).unwrap();
    mounted.dispatch(UserEvent::ToggleNav).unwrap();
    assert!(!page.state().is_nav_menu_open);

    mounted.dispatch(UserEvent::ToggleNav).unwrap();
    mounted.dispatch(UserEvent::NavLink(Section::Menu)).unwrap();
    assert!(!page.state().is_nav_menu_open);

    // Navigating with the menu already closed leaves it closed.
    mounted.dispatch(UserEvent::NavLink(Section::Hero)).unwrap();
    assert!(!page.state().is_nav_menu_open);
}

// ============================================================================
// Reservation form
// ============================================================================

#[test]
fn submit_acknowledges_once_and_clears_form() {
    let page = stock_page();
    let sim = SimEnv::new();
    let mounted = page.mount(&sim.environment());

    mounted.dispatch(edit(FormField::Name, "Jane")).unwrap();
    mounted.dispatch(edit(FormField::Phone, "0911000000")).unwrap();
    mounted.dispatch(edit(FormField::Date, "2024-01-01T19:00")).unwrap();
    mounted.dispatch(edit(FormField::Message, "")).unwrap();
    mounted.dispatch(UserEvent::Submit).unwrap();

    let r = page.state().reservation;
    for field in FormField::ALL {
        assert_eq!(r.get(field), "", "{field} not cleared");
    }
    assert_eq!(
        sim.notifier.messages(),
        vec![page.config().reservation.acknowledgement.clone()]
    );
}

#[test]
fn random_edit_sequences_always_reset() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let values = ["", "Jane", "0911", "2024-01-01T19:00", "window seat", "x"];

    for round in 0..50 {
        let page = stock_page();
        let sim = SimEnv::new();
        let mounted = page.mount(&sim.environment());

        for _ in 0..rng.gen_range(0..12) {
            let field = FormField::ALL[rng.gen_range(0..FormField::ALL.len())];
            let value = values[rng.gen_range(0..values.len())];
            mounted.dispatch(edit(field, value)).unwrap();
        }
        mounted.dispatch(UserEvent::Submit).unwrap();
        assert!(page.state().reservation.is_empty(), "round {round}");

        // A fresh edit behaves as on a new form.
        mounted.dispatch(edit(FormField::Phone, "0911")).unwrap();
        let r = page.state().reservation;
        assert_eq!(r.phone, "0911");
        assert_eq!(r.name, "");
        assert_eq!(r.date, "");
        assert_eq!(r.message, "");
    }
}

#[test]
fn cleared_inputs_re_render_empty() {
    let page = stock_page();
    let sim = SimEnv::new();
    let mut view = LiveView::bind(&page);
    let mounted = page.mount(&sim.environment());

    mounted.dispatch(edit(FormField::Name, "Jane")).unwrap();
    view.flush(&page);
    assert!(view.region(Region::Section(Section::Contact)).contains("value=\"Jane\""));

    mounted.dispatch(UserEvent::Submit).unwrap();
    assert_eq!(view.flush(&page), vec![Region::Section(Section::Contact)]);
    let html = view.region(Region::Section(Section::Contact));
    assert!(!html.contains("Jane"));
    assert!(html.contains("name=\"name\" value=\"\""));
}

// ============================================================================
// Interleaving
// ============================================================================

#[test]
fn interleaved_sources_touch_only_their_own_fields() {
    let page = stock_page();
    let sim = SimEnv::new();
    let mounted = page.mount(&sim.environment());

    mounted.dispatch(UserEvent::SelectCategory(3)).unwrap();
    sim.clock.advance(3000);
    sim.viewport.scroll_to(200.0);
    mounted.dispatch(edit(FormField::Name, "Jane")).unwrap();
    sim.clock.advance(3000);
    mounted.dispatch(UserEvent::ToggleNav).unwrap();

    let state = page.state();
    assert_eq!(state.active_review_index, 1);
    assert_eq!(state.active_menu_category_index, 3);
    assert!(state.is_nav_menu_open);
    assert!(state.is_scrolled);
    assert_eq!(state.reservation.name, "Jane");
}
