//! `shiftfeed phase`: classify a single `[start, end)` window.

use std::io::Write;

use clap::Args;
use serde::Serialize;
use shiftfeed_core::error::ErrorCode;
use shiftfeed_core::temporal::{enforce_after, to_iso};
use shiftfeed_core::{ShiftPhase, shift_phase};

use super::{require_instant, resolve_instant};
use crate::output::{CliError, OutputMode, pretty_kv, render_error, render_mode};

/// Arguments for `shiftfeed phase`.
#[derive(Args, Debug)]
pub struct PhaseArgs {
    /// Window start (inclusive).
    #[arg(long, value_name = "TIMESTAMP")]
    pub start: String,

    /// Window end (exclusive). An end at or before the start rolls forward
    /// a day, as it would for a mapped overnight shift.
    #[arg(long, value_name = "TIMESTAMP")]
    pub end: String,

    /// Evaluate at this instant instead of the current time.
    #[arg(long, value_name = "TIMESTAMP")]
    pub now: Option<String>,
}

#[derive(Debug, Serialize)]
struct PhaseReport {
    start: String,
    end: String,
    now: String,
    phase: ShiftPhase,
}

/// Execute `shiftfeed phase`.
///
/// # Errors
///
/// Returns an error (code `E4004`) if any timestamp does not parse, or if
/// no end after `--start` can be represented.
pub fn run_phase(args: &PhaseArgs, output: OutputMode) -> anyhow::Result<()> {
    let start = require_instant("--start", &args.start, output)?;
    let raw_end = require_instant("--end", &args.end, output)?;
    let Some(end) = enforce_after(start, raw_end) else {
        let message = format!(
            "no --end after --start '{}' is representable",
            args.start.trim()
        );
        render_error(
            output,
            &CliError::coded(ErrorCode::InvalidTimestamp, message.clone()),
        )?;
        anyhow::bail!(message)
    };
    let now = resolve_instant("--now", args.now.as_deref(), output)?;

    let report = PhaseReport {
        start: to_iso(start),
        end: to_iso(end),
        now: to_iso(now),
        phase: shift_phase(start, end, now),
    };

    render_mode(
        output,
        &report,
        |r, w| writeln!(w, "{}", r.phase),
        |r, w| {
            pretty_kv(w, "phase", r.phase.as_str())?;
            pretty_kv(w, "start", &r.start)?;
            pretty_kv(w, "end", &r.end)?;
            pretty_kv(w, "now", &r.now)
        },
    )
}
