//! `shiftfeed feed`: print the ordered, visible feed for one employee.
//!
//! Each entry carries its phase and the status badge derived from the clock.

use std::io::Write;

use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use serde::Serialize;
use shiftfeed_core::temporal::to_iso;
use shiftfeed_core::{PhaseBuckets, Shift, ShiftMapper, ShiftPhase, ShiftStatus, effective_status};

use super::{SourceArgs, load_feed, resolve_instant};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Phase filter accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PhaseFilter {
    Live,
    Upcoming,
    Past,
}

impl From<PhaseFilter> for ShiftPhase {
    fn from(filter: PhaseFilter) -> Self {
        match filter {
            PhaseFilter::Live => Self::Live,
            PhaseFilter::Upcoming => Self::Upcoming,
            PhaseFilter::Past => Self::Past,
        }
    }
}

/// Arguments for `shiftfeed feed`.
#[derive(Args, Debug)]
pub struct FeedArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Only show shifts in this phase.
    #[arg(long, value_enum)]
    pub phase: Option<PhaseFilter>,
}

/// One feed row as rendered: the shift plus its clock-derived badges.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    #[serde(flatten)]
    pub shift: Shift,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<ShiftPhase>,
    pub effective_status: ShiftStatus,
}

impl FeedEntry {
    #[must_use]
    pub fn at(shift: Shift, now: DateTime<Utc>) -> Self {
        Self {
            phase: shift.phase_at(now),
            effective_status: effective_status(&shift, now),
            shift,
        }
    }
}

#[derive(Debug, Serialize)]
struct FeedReport {
    now: String,
    count: usize,
    shifts: Vec<FeedEntry>,
    #[serde(skip)]
    buckets: PhaseBuckets,
    #[serde(skip)]
    at: DateTime<Utc>,
}

/// Execute `shiftfeed feed`.
///
/// # Errors
///
/// Returns an error if loading the dumps or parsing `--now` fails.
pub fn run_feed(args: &FeedArgs, mapper: ShiftMapper, output: OutputMode) -> anyhow::Result<()> {
    let now = resolve_instant("--now", args.source.now.as_deref(), output)?;
    let feed = load_feed(&args.source, mapper, output)?;

    let wanted = args.phase.map(ShiftPhase::from);
    let shifts: Vec<Shift> = feed
        .into_iter()
        .filter(|shift| wanted.is_none_or(|phase| shift.phase_at(now) == Some(phase)))
        .collect();

    let report = FeedReport {
        now: to_iso(now),
        count: shifts.len(),
        buckets: PhaseBuckets::from_feed(&shifts, now),
        shifts: shifts.into_iter().map(|s| FeedEntry::at(s, now)).collect(),
        at: now,
    };

    render_mode(output, &report, render_text, render_pretty)
}

fn render_text(report: &FeedReport, w: &mut dyn Write) -> std::io::Result<()> {
    for entry in &report.shifts {
        writeln!(w, "{}", text_line(entry))?;
    }
    Ok(())
}

/// Tab-separated: id, start, end, phase, effective status, title.
#[must_use]
pub fn text_line(entry: &FeedEntry) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        entry.shift.id,
        entry.shift.start,
        entry.shift.end,
        entry.phase.map_or("-", ShiftPhase::as_str),
        entry.effective_status,
        entry.shift.title
    )
}

fn render_pretty(report: &FeedReport, w: &mut dyn Write) -> std::io::Result<()> {
    if report.shifts.is_empty() {
        return writeln!(w, "No shifts to show.");
    }

    for phase in [ShiftPhase::Live, ShiftPhase::Upcoming, ShiftPhase::Past] {
        let shifts = report.buckets.get(phase);
        if shifts.is_empty() {
            continue;
        }
        pretty_section(w, &format!("{} ({})", heading(phase), shifts.len()))?;
        for shift in shifts {
            pretty_shift(w, &FeedEntry::at(shift.clone(), report.at))?;
            writeln!(w)?;
        }
    }
    Ok(())
}

const fn heading(phase: ShiftPhase) -> &'static str {
    match phase {
        ShiftPhase::Live => "Live now",
        ShiftPhase::Upcoming => "Upcoming",
        ShiftPhase::Past => "Past",
    }
}

/// Key/value block for a single shift, shared with `shiftfeed next`.
pub fn pretty_shift(w: &mut dyn Write, entry: &FeedEntry) -> std::io::Result<()> {
    let shift = &entry.shift;
    writeln!(w, "{}  [{}]", shift.title, shift.id)?;
    pretty_kv(w, "start", &shift.start)?;
    pretty_kv(w, "end", &shift.end)?;
    pretty_kv(w, "location", &shift.location)?;
    pretty_kv(w, "status", entry.effective_status.as_str())?;
    if let Some(ref confirmation) = shift.confirmation_status {
        pretty_kv(w, "confirmation", confirmation.label())?;
    }
    if let Some(ref name) = shift.object_name {
        pretty_kv(w, "object", name)?;
    }
    if let Some(ref address) = shift.object_address {
        pretty_kv(w, "address", address)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiftfeed_core::temporal::parse_instant;
    use shiftfeed_core::{RawRow, map_shift_record};

    fn entry(now: &str) -> FeedEntry {
        let shift = map_shift_record(
            &RawRow::new()
                .with("id", "s-1")
                .with("title", "Dock")
                .with("start", "2026-03-01T08:00:00Z")
                .with("end", "2026-03-01T16:00:00Z"),
        );
        FeedEntry::at(shift, parse_instant(now).expect("now"))
    }

    #[test]
    fn entry_derives_phase_and_badge() {
        let live = entry("2026-03-01T09:00:00Z");
        assert_eq!(live.phase, Some(ShiftPhase::Live));
        assert_eq!(live.effective_status, ShiftStatus::InProgress);

        let past = entry("2026-03-02T00:00:00Z");
        assert_eq!(past.effective_status, ShiftStatus::Completed);
    }

    #[test]
    fn entry_json_is_flat_camel_case() {
        let value = serde_json::to_value(entry("2026-03-01T07:00:00Z")).expect("json");
        assert_eq!(value["id"], "s-1");
        assert_eq!(value["phase"], "upcoming");
        assert_eq!(value["effectiveStatus"], "scheduled");
    }

    #[test]
    fn text_line_is_tab_separated() {
        let line = text_line(&entry("2026-03-01T09:00:00Z"));
        assert_eq!(
            line,
            "s-1\t2026-03-01T08:00:00.000Z\t2026-03-01T16:00:00.000Z\tlive\tin-progress\tDock"
        );
    }
}
