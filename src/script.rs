//! Session scripts for the `simulate` command.
//!
//! A script is a plain-text list of steps, one per line. Blank lines and
//! `#` comments are ignored.
//!
//! ```text
//! # open the page, wait two rotations, book a table
//! tick 12000
//! scroll 120
//! navigate contact
//! edit name Jane Doe
//! edit phone 0911 000 000
//! edit date 2024-01-01T19:00
//! submit
//! ```
//!
//! A single `tick` may advance the clock by at most one hour
//! ([`MAX_TICK_MS`]); longer waits are written as several ticks.
//!
//! [`run_script`] mounts the page in a [`SimEnv`] and records one
//! [`TraceEntry`] per step. A rejected step (out-of-range index, submit with
//! empty required fields, unmount while unmounted) is noted in the trace and
//! the run continues.

use crate::env::{Environment, ScrollSource};
use crate::page::{Dispatched, MountedPage, Page, UserEvent};
use crate::sim::SimEnv;
use crate::state::PageState;
use crate::types::{FormField, Section};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Upper bound on a single `tick` step.
pub const MAX_TICK_MS: u64 = 60 * 60 * 1000;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One scripted interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Advance the virtual clock by this many milliseconds.
    Tick(u64),
    /// Scroll the viewport to this offset.
    Scroll(f64),
    ToggleNav,
    /// Click a nav link; the viewport follows the anchor.
    Navigate(Section),
    SelectCategory(usize),
    SelectReview(usize),
    Edit(FormField, String),
    Submit,
    Unmount,
    Mount,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Tick(ms) => write!(f, "tick {ms}"),
            Step::Scroll(y) => write!(f, "scroll {y}"),
            Step::ToggleNav => f.write_str("toggle-nav"),
            Step::Navigate(section) => write!(f, "navigate {section}"),
            Step::SelectCategory(i) => write!(f, "select-category {i}"),
            Step::SelectReview(i) => write!(f, "select-review {i}"),
            Step::Edit(field, value) if value.is_empty() => write!(f, "edit {field}"),
            Step::Edit(field, value) => write!(f, "edit {field} {value}"),
            Step::Submit => f.write_str("submit"),
            Step::Unmount => f.write_str("unmount"),
            Step::Mount => f.write_str("mount"),
        }
    }
}

pub fn load_script(path: &Path) -> Result<Vec<Step>, ScriptError> {
    let text = std::fs::read_to_string(path)?;
    parse_script(&text)
}

pub fn parse_script(text: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        let step = parse_step(line).map_err(|message| ScriptError::Parse {
            line: idx + 1,
            message,
        })?;
        steps.push(step);
    }
    Ok(steps)
}

/// A comment is a `#` at the start of the line or followed by whitespace, so
/// `navigate #menu` keeps its anchor.
fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    let cut = line.char_indices().find(|&(i, c)| {
        c == '#' && line[i + 1..].chars().next().is_none_or(|next| next.is_whitespace())
    });
    match cut {
        Some((i, _)) => &line[..i],
        None => line,
    }
}

fn parse_step(line: &str) -> Result<Step, String> {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let step = match command {
        "tick" => {
            let ms: u64 = parse_arg(command, rest)?;
            if ms > MAX_TICK_MS {
                return Err(format!("'tick {ms}' exceeds the {MAX_TICK_MS}ms limit"));
            }
            Step::Tick(ms)
        }
        "scroll" => Step::Scroll(parse_arg(command, rest)?),
        "toggle-nav" => no_args(command, rest, Step::ToggleNav)?,
        "navigate" => Step::Navigate(rest.parse().map_err(|e| format!("{e}"))?),
        "select-category" => Step::SelectCategory(parse_arg(command, rest)?),
        "select-review" => Step::SelectReview(parse_arg(command, rest)?),
        "edit" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            let field: FormField = field.parse().map_err(|e| format!("{e}"))?;
            Step::Edit(field, value.to_string())
        }
        "submit" => no_args(command, rest, Step::Submit)?,
        "unmount" => no_args(command, rest, Step::Unmount)?,
        "mount" => no_args(command, rest, Step::Mount)?,
        other => return Err(format!("unknown step '{other}'")),
    };
    Ok(step)
}

fn parse_arg<T: std::str::FromStr>(command: &str, arg: &str) -> Result<T, String> {
    if arg.is_empty() {
        return Err(format!("'{command}' needs an argument"));
    }
    arg.parse()
        .map_err(|_| format!("'{command}': invalid argument '{arg}'"))
}

fn no_args(command: &str, rest: &str, step: Step) -> Result<Step, String> {
    if rest.is_empty() {
        Ok(step)
    } else {
        Err(format!("'{command}' takes no arguments"))
    }
}

/// Page state after one step.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEntry {
    pub step: String,
    pub at_ms: u64,
    pub scroll_y: f64,
    pub mounted: bool,
    pub state: PageState,
    pub revealed: Vec<Section>,
    pub hero_plays: u32,
    /// Why the step had no effect, or what it produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Mount `page` in `sim`, replay `steps`, and unmount at the end.
pub fn run_script(page: &Page, sim: &SimEnv, steps: &[Step]) -> Vec<TraceEntry> {
    let env = sim.environment();
    let mut mounted: Option<MountedPage<'_>> = Some(page.mount(&env));
    let mut trace = Vec::with_capacity(steps.len());

    for step in steps {
        let note = apply(step, page, sim, &env, &mut mounted);
        if let Some(note) = &note {
            tracing::debug!(%step, note = note.as_str(), "step noted");
        }
        trace.push(entry(step, page, sim, note));
    }
    trace
}

fn apply<'a>(
    step: &Step,
    page: &'a Page,
    sim: &SimEnv,
    env: &Environment,
    mounted: &mut Option<MountedPage<'a>>,
) -> Option<String> {
    match step {
        Step::Tick(ms) => {
            let fired = sim.clock.advance(*ms);
            (fired > 0).then(|| format!("{fired} timer firing(s)"))
        }
        Step::Scroll(y) => {
            sim.viewport.scroll_to(*y);
            None
        }
        Step::Mount => {
            let was_mounted = mounted.is_some();
            *mounted = None;
            *mounted = Some(page.mount(env));
            was_mounted.then(|| "remounted".to_string())
        }
        Step::Unmount => match mounted.take() {
            Some(m) => {
                m.unmount();
                None
            }
            None => Some("not mounted".to_string()),
        },
        _ => {
            let Some(m) = mounted.as_ref() else {
                return Some("ignored: page not mounted".to_string());
            };
            dispatch(step, m, sim)
        }
    }
}

fn dispatch(step: &Step, mounted: &MountedPage<'_>, sim: &SimEnv) -> Option<String> {
    let event = match step {
        Step::ToggleNav => UserEvent::ToggleNav,
        Step::Navigate(section) => UserEvent::NavLink(*section),
        Step::SelectCategory(i) => UserEvent::SelectCategory(*i),
        Step::SelectReview(i) => UserEvent::SelectReview(*i),
        Step::Edit(field, value) => UserEvent::EditField {
            field: *field,
            value: value.clone(),
        },
        Step::Submit => {
            let missing = mounted.state().reservation.missing_required();
            if !missing.is_empty() {
                let names: Vec<&str> = missing.iter().map(|f| f.name()).collect();
                return Some(format!("blocked: required {} empty", names.join(", ")));
            }
            UserEvent::Submit
        }
        Step::Tick(_) | Step::Scroll(_) | Step::Mount | Step::Unmount => return None,
    };

    match mounted.dispatch(event) {
        Ok(Dispatched::Handled) if matches!(step, Step::Submit) => {
            sim.notifier.messages().last().map(|m| format!("acknowledged: {m}"))
        }
        Ok(Dispatched::Handled) => None,
        Ok(Dispatched::Navigate(anchor)) => {
            if let Step::Navigate(section) = step {
                sim.viewport.scroll_into_view(*section);
            }
            Some(anchor)
        }
        Err(e) => Some(format!("rejected: {e}")),
    }
}

fn entry(step: &Step, page: &Page, sim: &SimEnv, note: Option<String>) -> TraceEntry {
    let reveals = page.reveals();
    TraceEntry {
        step: step.to_string(),
        at_ms: sim.clock.now_ms(),
        scroll_y: sim.viewport.scroll_y(),
        mounted: page.is_mounted(),
        state: page.state(),
        revealed: reveals.revealed().collect(),
        hero_plays: reveals.hero_plays(),
        note,
    }
}
