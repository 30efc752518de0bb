//! Timestamp resolution for shift rows.
//!
//! Rows encode a shift boundary as a separate date and time (either of
//! which may already be a full timestamp), or as one combined value. All
//! arithmetic here is UTC.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};

use crate::row::{FieldValue, RawRow};

/// Start used when a row carries no resolvable start at all.
pub const FALLBACK_START: &str = "1970-01-01T00:00:00.000Z";

/// End used when a row carries no resolvable end at all.
pub const FALLBACK_END: &str = "1970-01-01T01:00:00.000Z";

/// A normalized temporal candidate taken from one row cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    /// A full point in time.
    Instant(DateTime<Utc>),
    /// A bare time of day with no calendar date attached.
    Clock(NaiveTime),
}

impl Temporal {
    #[must_use]
    pub fn time_of_day(self) -> NaiveTime {
        match self {
            Self::Instant(at) => at.time(),
            Self::Clock(time) => time,
        }
    }

    #[must_use]
    pub const fn instant(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Instant(at) => Some(at),
            Self::Clock(_) => None,
        }
    }
}

/// Normalize one cell into a temporal candidate.
///
/// Numbers are epoch milliseconds. Text accepts RFC 3339, Postgres
/// `timestamptz` output, `YYYY-MM-DD`, naive `YYYY-MM-DD HH:MM[:SS]`
/// (read as UTC), and bare `HH:MM[:SS]`.
#[must_use]
pub fn parse_temporal(value: &FieldValue) -> Option<Temporal> {
    match value {
        FieldValue::Timestamp(at) => Some(Temporal::Instant(*at)),
        FieldValue::Number(ms) => from_epoch_millis(*ms).map(Temporal::Instant),
        FieldValue::Text(_) => value.as_text().and_then(parse_temporal_text),
        FieldValue::Null | FieldValue::Bool(_) | FieldValue::Nested(_) => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn from_epoch_millis(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(ms.trunc() as i64)
}

fn parse_temporal_text(text: &str) -> Option<Temporal> {
    parse_instant(text)
        .map(Temporal::Instant)
        .or_else(|| parse_clock(text).map(Temporal::Clock))
}

/// Parse a text timestamp into a UTC instant.
#[must_use]
pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    // Postgres renders timestamptz as `2026-03-01 08:00:00+00`.
    for format in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(at) = DateTime::parse_from_str(text, format) {
            return Some(at.with_timezone(&Utc));
        }
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn parse_clock(text: &str) -> Option<NaiveTime> {
    ["%H:%M:%S%.f", "%H:%M"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
}

/// First key in `keys` that yields a temporal candidate.
#[must_use]
pub fn first_temporal(row: &RawRow, keys: &[String]) -> Option<Temporal> {
    keys.iter()
        .filter_map(|key| row.get(key))
        .find_map(parse_temporal)
}

/// First key in `keys` that yields a full instant, skipping bare clocks.
#[must_use]
pub fn first_instant(row: &RawRow, keys: &[String]) -> Option<DateTime<Utc>> {
    keys.iter()
        .filter_map(|key| row.get(key))
        .find_map(|value| parse_temporal(value).and_then(Temporal::instant))
}

/// Resolve one shift boundary from its date keys and time keys.
///
/// A bare time of day only counts when a dated candidate exists to anchor
/// it. Without one, the first full instant among the time keys is used, so
/// a `start_time` clock cannot shadow a complete `start` timestamp.
#[must_use]
pub fn resolve_boundary(
    row: &RawRow,
    date_keys: &[String],
    time_keys: &[String],
) -> Option<DateTime<Utc>> {
    match first_instant(row, date_keys) {
        Some(day) => combine(Some(Temporal::Instant(day)), first_temporal(row, time_keys)),
        None => first_instant(row, time_keys),
    }
}

/// Combine a date candidate and a time candidate into one instant.
///
/// With both present, the date candidate contributes its calendar date and
/// the time candidate its time of day. A lone instant is used as-is; a lone
/// bare time of day does not resolve.
#[must_use]
pub fn combine(date: Option<Temporal>, time: Option<Temporal>) -> Option<DateTime<Utc>> {
    match (date, time) {
        (Some(Temporal::Instant(day)), Some(time)) => {
            let naive = day.date_naive().and_time(time.time_of_day());
            Some(Utc.from_utc_datetime(&naive))
        }
        (Some(Temporal::Clock(_)), Some(time)) => time.instant(),
        (Some(only), None) | (None, Some(only)) => only.instant(),
        (None, None) => None,
    }
}

/// Force `end` strictly after `start`.
///
/// An end at or before the start is re-anchored onto the start's calendar
/// date and, if still not after the start, moved to the following day.
/// Returns `None` when that day lies past the last representable instant.
#[must_use]
pub fn enforce_after(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if end > start {
        return Some(end);
    }
    let anchored = Utc.from_utc_datetime(&start.date_naive().and_time(end.time()));
    if anchored > start {
        Some(anchored)
    } else {
        anchored.checked_add_signed(Duration::days(1))
    }
}

/// Render an instant the way the feed stores it: `YYYY-MM-DDTHH:MM:SS.mmmZ`.
#[must_use]
pub fn to_iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parsed form of [`FALLBACK_START`].
#[must_use]
pub fn fallback_start() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Parsed form of [`FALLBACK_END`].
#[must_use]
pub fn fallback_end() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::hours(1)
}
