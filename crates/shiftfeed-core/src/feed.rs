//! Feed ordering.
//!
//! Ordering is ascending by `start`. Entries whose `start` does not parse
//! sort after every parsable entry and keep their relative input order.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::model::shift::Shift;

fn compare_starts(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by parsed start, parsing each timestamp once.
pub(crate) fn sort_in_place(shifts: &mut Vec<Shift>) {
    let mut keyed: Vec<(Option<DateTime<Utc>>, Shift)> = shifts
        .drain(..)
        .map(|shift| (shift.start_at(), shift))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_starts(*a, *b));
    shifts.extend(keyed.into_iter().map(|(_, shift)| shift));
}

/// Sorted copy of `shifts`; unparsable starts go last in input order.
#[must_use]
pub fn sort_shifts_by_start(shifts: &[Shift]) -> Vec<Shift> {
    let mut sorted = shifts.to_vec();
    sort_in_place(&mut sorted);
    sorted
}

/// Drop entries with an unparsable `start`, then sort.
///
/// This is the guard the live feed runs before rendering.
#[must_use]
pub fn order_feed(shifts: &[Shift]) -> Vec<Shift> {
    let mut kept: Vec<Shift> = shifts
        .iter()
        .filter(|shift| shift.start_at().is_some())
        .cloned()
        .collect();
    let dropped = shifts.len() - kept.len();
    if dropped > 0 {
        tracing::warn!(dropped, "dropped shifts with unparsable start");
    }
    sort_in_place(&mut kept);
    kept
}
