//! `shiftfeed next`: the shift to clock in for.
//!
//! The first live shift wins; otherwise the soonest upcoming one.

use std::io::Write;

use clap::Args;
use serde::Serialize;
use shiftfeed_core::temporal::to_iso;
use shiftfeed_core::{ShiftMapper, next_shift};

use super::feed::{FeedEntry, pretty_shift, text_line};
use super::{SourceArgs, load_feed, resolve_instant};
use crate::output::{OutputMode, pretty_section, render_mode};

/// Arguments for `shiftfeed next`.
#[derive(Args, Debug)]
pub struct NextArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Serialize)]
struct NextReport {
    now: String,
    next: Option<FeedEntry>,
}

/// Execute `shiftfeed next`.
///
/// # Errors
///
/// Returns an error if loading the dumps or parsing `--now` fails.
pub fn run_next(args: &NextArgs, mapper: ShiftMapper, output: OutputMode) -> anyhow::Result<()> {
    let now = resolve_instant("--now", args.source.now.as_deref(), output)?;
    let feed = load_feed(&args.source, mapper, output)?;

    let next = next_shift(&feed, now).map(|shift| FeedEntry::at(shift.clone(), now));
    tracing::debug!(found = next.is_some(), "resolved next shift");

    let report = NextReport {
        now: to_iso(now),
        next,
    };
    render_mode(output, &report, render_text, render_pretty)
}

fn render_text(report: &NextReport, w: &mut dyn Write) -> std::io::Result<()> {
    match report.next {
        Some(ref entry) => writeln!(w, "{}", text_line(entry)),
        None => Ok(()),
    }
}

fn render_pretty(report: &NextReport, w: &mut dyn Write) -> std::io::Result<()> {
    let Some(ref entry) = report.next else {
        return writeln!(w, "Nothing live or upcoming as of {}.", report.now);
    };
    pretty_section(w, "Next shift")?;
    pretty_shift(w, entry)
}
