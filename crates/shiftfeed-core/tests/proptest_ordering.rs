//! Property tests for feed ordering and the end-after-start guarantee.

use proptest::prelude::*;
use shiftfeed_core::{RawRow, Shift, map_shift_array, map_shift_record, sort_shifts_by_start};

fn shift_with_start(id: usize, start: Option<i64>) -> Shift {
    let mut shift = map_shift_record(&RawRow::new().with("id", format!("s-{id}")));
    shift.start = start.map_or_else(
        || "unparsable".to_string(),
        |secs| {
            chrono::DateTime::from_timestamp(secs, 0)
                .map(shiftfeed_core::temporal::to_iso)
                .unwrap_or_default()
        },
    );
    shift
}

fn arb_starts() -> impl Strategy<Value = Vec<Option<i64>>> {
    // A narrow range forces plenty of equal starts.
    prop::collection::vec(prop::option::weighted(0.8, 1_700_000_000i64..1_700_000_100), 0..40)
}

proptest! {
    #[test]
    fn prop_sort_is_idempotent(starts in arb_starts()) {
        let input: Vec<Shift> = starts
            .into_iter()
            .enumerate()
            .map(|(i, s)| shift_with_start(i, s))
            .collect();
        let once = sort_shifts_by_start(&input);
        let twice = sort_shifts_by_start(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.len(), input.len());
    }

    #[test]
    fn prop_unparsable_starts_sort_last_in_input_order(starts in arb_starts()) {
        let input: Vec<Shift> = starts
            .into_iter()
            .enumerate()
            .map(|(i, s)| shift_with_start(i, s))
            .collect();
        let sorted = sort_shifts_by_start(&input);

        let first_bad = sorted.iter().position(|s| s.start_at().is_none());
        if let Some(first_bad) = first_bad {
            prop_assert!(sorted[first_bad..].iter().all(|s| s.start_at().is_none()));
        }

        let bad_in: Vec<&str> = input
            .iter()
            .filter(|s| s.start_at().is_none())
            .map(|s| s.id.as_str())
            .collect();
        let bad_out: Vec<&str> = sorted
            .iter()
            .filter(|s| s.start_at().is_none())
            .map(|s| s.id.as_str())
            .collect();
        prop_assert_eq!(bad_in, bad_out);

        let good: Vec<_> = sorted.iter().filter_map(Shift::start_at).collect();
        prop_assert!(good.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn prop_end_is_after_start(start_h in 0u32..24, start_m in 0u32..60, end_h in 0u32..24, end_m in 0u32..60) {
        let row = RawRow::new()
            .with("id", "p")
            .with("shift_date", "2026-03-01")
            .with("start_time", format!("{start_h:02}:{start_m:02}"))
            .with("end_time", format!("{end_h:02}:{end_m:02}"));
        let shift = map_shift_record(&row);
        let start = shift.start_at().expect("start parses");
        let end = shift.end_at().expect("end parses");
        prop_assert!(end > start);
        prop_assert!(end - start <= chrono::Duration::hours(24));
    }

    #[test]
    fn prop_mapped_feed_is_sorted_and_unique(ids in prop::collection::vec(0u8..6, 0..20)) {
        let rows: Vec<RawRow> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                RawRow::new()
                    .with("id", format!("shift-{id}"))
                    .with("start", format!("2026-03-{:02}T08:00:00Z", 1 + (i % 28)))
            })
            .collect();
        let feed = map_shift_array(&rows, &[]);

        let mut seen = std::collections::HashSet::new();
        prop_assert!(feed.iter().all(|s| seen.insert(s.id.clone())));
        let starts: Vec<_> = feed.iter().filter_map(Shift::start_at).collect();
        prop_assert!(starts.windows(2).all(|w| w[0] <= w[1]));
    }
}
