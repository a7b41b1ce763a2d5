//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output leads with what the page contains and what the user did, not with
//! files. Each entity (review, menu category, gallery item) is shown by its
//! positional index and title, with details on indented context lines.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Reviews
//! 001 Sophia R. (5 stars)
//!     1 week ago
//!     An absolutely magical dining experience. The Wagyu beef was...
//!
//! Menu
//! 001 Starters & Appetizers (4 items)
//!     001 Truffle Burrata · ETB 850
//!
//! Config
//!     rotation: every 6000ms
//!     scroll threshold: 50px
//! ```
//!
//! ## Simulate
//!
//! ```text
//! [    6000ms] tick 6000           review 2/6  menu 1/4  nav closed  top   (1 timer firing(s))
//! [    6000ms] scroll 120          review 2/6  menu 1/4  nav closed  fixed
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 home
//! 002 experience
//! ...
//! Generated 7 sections → dist/index.html
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::config::PageConfig;
use crate::content::Content;
use crate::script::TraceEntry;
use crate::types::Section;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional detail.
///
/// ```text
/// 001 Starters & Appetizers (4 items)
/// 001 Artistic Plating
/// ```
fn entity_header(index: usize, title: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("{} {} ({})", format_index(index), title, d),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

// ============================================================================
// check
// ============================================================================

/// Content inventory plus the effective config.
pub fn format_check_output(content: &Content, config: &PageConfig) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Reviews".to_string());
    for (i, review) in content.reviews.iter().enumerate() {
        let stars = plural(review.rating as usize, "star");
        lines.push(entity_header(i + 1, &review.name, Some(&stars)));
        lines.push(format!("{}{}", indent(1), review.time));
        lines.push(format!("{}{}", indent(1), truncate_desc(&review.body, 60)));
    }

    lines.push(String::new());
    lines.push("Menu".to_string());
    for (i, category) in content.menu.iter().enumerate() {
        let count = plural(category.items.len(), "item");
        lines.push(entity_header(i + 1, &category.title, Some(&count)));
        for (j, item) in category.items.iter().enumerate() {
            lines.push(format!(
                "{}{} · {}",
                indent(1),
                entity_header(j + 1, &item.name, None),
                item.price
            ));
        }
    }

    lines.push(String::new());
    lines.push("Wine".to_string());
    for (i, wine) in content.wines.iter().enumerate() {
        lines.push(entity_header(i + 1, &wine.title, None));
    }

    lines.push(String::new());
    lines.push("Gallery".to_string());
    for (i, item) in content.gallery.iter().enumerate() {
        lines.push(format!(
            "{} [{}]",
            entity_header(i + 1, &item.title, None),
            item.category
        ));
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    lines.push(format!(
        "{}rotation: every {}ms",
        indent(1),
        config.rotation.interval_ms
    ));
    lines.push(format!(
        "{}scroll threshold: {}px",
        indent(1),
        config.scroll.threshold_px
    ));
    lines.push(format!(
        "{}particles: {} (seed {})",
        indent(1),
        config.particles.count,
        config.particles.seed
    ));
    lines
}

pub fn print_check_output(content: &Content, config: &PageConfig) {
    for line in format_check_output(content, config) {
        println!("{}", line);
    }
}

// ============================================================================
// simulate
// ============================================================================

/// One trace line: clock, step, then the five state fields at a glance.
pub fn format_trace_entry(entry: &TraceEntry, review_count: usize, category_count: usize) -> String {
    let state = &entry.state;
    let nav = if state.is_nav_menu_open { "open" } else { "closed" };
    let chrome = if state.is_scrolled { "fixed" } else { "top" };
    let mut line = format!(
        "[{:>8}ms] {:<18} review {}/{}  menu {}/{}  nav {:<6} {:<5}",
        entry.at_ms,
        entry.step,
        state.active_review_index + 1,
        review_count,
        state.active_menu_category_index + 1,
        category_count,
        nav,
        chrome,
    );
    if !entry.mounted {
        line.push_str("  [unmounted]");
    }
    if let Some(note) = &entry.note {
        line.push_str(&format!("  ({})", note));
    }
    line.trim_end().to_string()
}

/// Summary block after a simulated session.
pub fn format_final_state(entry: &TraceEntry) -> Vec<String> {
    let r = &entry.state.reservation;
    let revealed: Vec<&str> = entry.revealed.iter().map(|s| s.anchor()).collect();
    let mut lines = vec![
        "Final state".to_string(),
        format!("{}scroll: {}px", indent(1), entry.scroll_y),
        format!(
            "{}revealed: {}",
            indent(1),
            if revealed.is_empty() {
                "none".to_string()
            } else {
                revealed.join(", ")
            }
        ),
        format!("{}hero plays: {}", indent(1), entry.hero_plays),
    ];
    if r.is_empty() {
        lines.push(format!("{}reservation: empty", indent(1)));
    } else {
        lines.push(format!("{}reservation:", indent(1)));
        for field in crate::types::FormField::ALL {
            let value = r.get(field);
            if !value.is_empty() {
                lines.push(format!("{}{}: {}", indent(2), field, value));
            }
        }
    }
    lines
}

pub fn print_trace(trace: &[TraceEntry], review_count: usize, category_count: usize) {
    for entry in trace {
        println!(
            "{}",
            format_trace_entry(entry, review_count, category_count)
        );
    }
    if let Some(last) = trace.last() {
        println!();
        for line in format_final_state(last) {
            println!("{}", line);
        }
    }
}

/// JSON lines, one object per step.
pub fn print_trace_json(trace: &[TraceEntry]) -> Result<(), serde_json::Error> {
    for entry in trace {
        println!("{}", serde_json::to_string(entry)?);
    }
    Ok(())
}

// ============================================================================
// build
// ============================================================================

pub fn format_build_output(index_path: &Path) -> Vec<String> {
    let mut lines: Vec<String> = Section::ALL
        .iter()
        .enumerate()
        .map(|(i, section)| entity_header(i + 1, section.anchor(), None))
        .collect();
    lines.push(format!(
        "Generated {} → {}",
        plural(Section::ALL.len(), "section"),
        index_path.display()
    ));
    lines
}

pub fn print_build_output(index_path: &Path) {
    for line in format_build_output(index_path) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
