//! A shift's temporal relationship to "now", and the badges derived from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::shift::{Shift, ShiftStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftPhase {
    Past,
    Live,
    Upcoming,
}

impl ShiftPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Past => "past",
            Self::Live => "live",
            Self::Upcoming => "upcoming",
        }
    }
}

impl fmt::Display for ShiftPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `now` against `[start, end)`.
///
/// `start` is inclusive and `end` exclusive: at exactly `end` the shift is
/// already past.
#[must_use]
pub fn shift_phase(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> ShiftPhase {
    if now >= end {
        ShiftPhase::Past
    } else if now >= start {
        ShiftPhase::Live
    } else {
        ShiftPhase::Upcoming
    }
}

impl Shift {
    /// Phase at `now`, or `None` if either timestamp is unparsable.
    #[must_use]
    pub fn phase_at(&self, now: DateTime<Utc>) -> Option<ShiftPhase> {
        Some(shift_phase(self.start_at()?, self.end_at()?, now))
    }
}

/// Status to show on the badge at `now`.
///
/// `blocked` and `completed` are sticky. Otherwise the clock decides: a live
/// shift is in progress, a past one completed, an upcoming one scheduled.
/// Shifts with unparsable timestamps keep their stored status.
#[must_use]
pub fn effective_status(shift: &Shift, now: DateTime<Utc>) -> ShiftStatus {
    if matches!(shift.status, ShiftStatus::Blocked | ShiftStatus::Completed) {
        return shift.status;
    }
    match shift.phase_at(now) {
        Some(ShiftPhase::Live) => ShiftStatus::InProgress,
        Some(ShiftPhase::Past) => ShiftStatus::Completed,
        Some(ShiftPhase::Upcoming) => ShiftStatus::Scheduled,
        None => shift.status,
    }
}

/// A feed split by phase for the home screen sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhaseBuckets {
    pub live: Vec<Shift>,
    /// Soonest first.
    pub upcoming: Vec<Shift>,
    /// Most recent first.
    pub past: Vec<Shift>,
}

impl PhaseBuckets {
    /// Split an ordered feed. Shifts with unparsable timestamps are left out.
    #[must_use]
    pub fn from_feed(feed: &[Shift], now: DateTime<Utc>) -> Self {
        let mut buckets = Self::default();
        for shift in feed {
            match shift.phase_at(now) {
                Some(ShiftPhase::Live) => buckets.live.push(shift.clone()),
                Some(ShiftPhase::Upcoming) => buckets.upcoming.push(shift.clone()),
                Some(ShiftPhase::Past) => buckets.past.push(shift.clone()),
                None => {}
            }
        }
        buckets.past.reverse();
        buckets
    }

    #[must_use]
    pub fn get(&self, phase: ShiftPhase) -> &[Shift] {
        match phase {
            ShiftPhase::Live => &self.live,
            ShiftPhase::Upcoming => &self.upcoming,
            ShiftPhase::Past => &self.past,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len() + self.upcoming.len() + self.past.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The shift to clock in for: the first live one, else the soonest upcoming.
///
/// `feed` is expected in feed order (ascending start).
#[must_use]
pub fn next_shift(feed: &[Shift], now: DateTime<Utc>) -> Option<&Shift> {
    feed.iter()
        .find(|shift| shift.phase_at(now) == Some(ShiftPhase::Live))
        .or_else(|| {
            feed.iter()
                .find(|shift| shift.phase_at(now) == Some(ShiftPhase::Upcoming))
        })
}
