//! # Event Normalizer
//!
//! Orders a raw event log and repairs missing elapsed times.
//!
//! ## Algorithm
//! 1. Pick the anchor: earliest event (by wall clock) carrying an elapsed time
//! 2. Sort on one axis: recorded elapsed when present, else the wall-clock
//!    offset from the anchor (or from the earliest event when there is none)
//! 3. Fill gaps: `round((wall - anchor_wall) / 1000)` with an anchor,
//!    `previous + 1` (first event: 0) without one
//! 4. Single non-decreasing pass: a value below the previous one becomes
//!    `previous + 1`
//!
//! Only Score events count as repaired; Cancel events carry no timing of
//! their own and are dropped right after this step.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::MatchEvent;

/// Output of [`normalize_events`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedLog {
    /// Globally ordered, every `elapsed_seconds` set and non-decreasing.
    pub events: Vec<MatchEvent>,
    /// Score events whose elapsed time was filled in or bumped.
    pub repaired: usize,
}

/// Running state of the fill pass.
#[derive(Debug, Default)]
struct ElapsedCursor {
    previous: Option<u32>,
}

impl ElapsedCursor {
    /// Returns the assigned value and whether it differs from the recorded one.
    fn assign(&mut self, recorded: Option<u32>, derived: Option<i64>) -> (u32, bool) {
        let candidate = match (recorded, derived) {
            (Some(value), _) => i64::from(value),
            (None, Some(value)) => value,
            (None, None) => self.previous.map(|p| i64::from(p) + 1).unwrap_or(0),
        };
        let candidate = candidate.clamp(0, i64::from(u32::MAX)) as u32;

        let assigned = match self.previous {
            Some(prev) if candidate < prev => prev.saturating_add(1),
            _ => candidate,
        };
        self.previous = Some(assigned);
        (assigned, recorded != Some(assigned))
    }
}

/// Milliseconds → seconds, rounding half away from zero.
fn millis_to_rounded_secs(ms: i64) -> i64 {
    (ms as f64 / 1000.0).round() as i64
}

/// Wall clock of the earliest event carrying both clocks.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    wall: DateTime<Utc>,
}

impl Anchor {
    fn find(events: &[MatchEvent]) -> Option<Self> {
        events
            .iter()
            .filter(|e| e.elapsed_seconds.is_some())
            .map(|e| e.wall_clock_time)
            .min()
            .map(|wall| Self { wall })
    }

    fn offset_millis(&self, wall: DateTime<Utc>) -> i64 {
        (wall - self.wall).num_milliseconds()
    }

    fn derive_secs(&self, wall: DateTime<Utc>) -> i64 {
        millis_to_rounded_secs(self.offset_millis(wall))
    }
}

/// Order `events` and fill in every missing elapsed time.
pub fn normalize_events(events: Vec<MatchEvent>) -> NormalizedLog {
    if events.is_empty() {
        return NormalizedLog::default();
    }

    let anchor = Anchor::find(&events);
    let earliest = events
        .iter()
        .map(|e| e.wall_clock_time)
        .min()
        .unwrap_or(events[0].wall_clock_time);

    let sort_key = |event: &MatchEvent| -> i64 {
        match (event.elapsed_seconds, anchor) {
            (Some(secs), _) => i64::from(secs) * 1000,
            (None, Some(anchor)) => anchor.offset_millis(event.wall_clock_time),
            (None, None) => (event.wall_clock_time - earliest).num_milliseconds(),
        }
    };

    let mut keyed: Vec<(i64, MatchEvent)> =
        events.into_iter().map(|e| (sort_key(&e), e)).collect();
    keyed.sort_by(|(ka, a), (kb, b)| {
        ka.cmp(kb)
            .then_with(|| a.wall_clock_time.cmp(&b.wall_clock_time))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut cursor = ElapsedCursor::default();
    let mut repaired = 0usize;
    let mut out = Vec::with_capacity(keyed.len());

    for (_, mut event) in keyed {
        let derived = anchor.map(|a| a.derive_secs(event.wall_clock_time));
        let (assigned, changed) = cursor.assign(event.elapsed_seconds, derived);
        if changed && event.is_score() {
            repaired += 1;
        }
        event.elapsed_seconds = Some(assigned);
        out.push(event);
    }

    debug!(
        events = out.len(),
        repaired,
        anchored = anchor.is_some(),
        "normalized event log"
    );
    NormalizedLog {
        events: out,
        repaired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap()
    }

    fn score_at(id: &str, wall_ms: i64, elapsed: Option<u32>) -> MatchEvent {
        let mut event =
            MatchEvent::score(id, "A", "A", "B", base() + Duration::milliseconds(wall_ms));
        event.elapsed_seconds = elapsed;
        event
    }

    fn elapsed_of(log: &NormalizedLog) -> Vec<(String, u32)> {
        log.events
            .iter()
            .map(|e| (e.id.clone(), e.elapsed()))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let log = normalize_events(Vec::new());
        assert!(log.events.is_empty());
        assert_eq!(log.repaired, 0);
    }

    #[test]
    fn test_sorts_by_recorded_elapsed() {
        let log = normalize_events(vec![
            score_at("late", 1_000, Some(30)),
            score_at("early", 2_000, Some(4)),
        ]);
        assert_eq!(
            elapsed_of(&log),
            vec![("early".into(), 4), ("late".into(), 30)]
        );
        assert_eq!(log.repaired, 0);
    }

    #[test]
    fn test_fills_from_anchor() {
        // Anchor is "a" (recorded elapsed, wall = base). "b" is 12.4s later.
        let log = normalize_events(vec![
            score_at("b", 12_400, None),
            score_at("a", 0, Some(0)),
            score_at("c", 20_600, None),
        ]);
        assert_eq!(
            elapsed_of(&log),
            vec![("a".into(), 0), ("b".into(), 12), ("c".into(), 21)]
        );
        assert_eq!(log.repaired, 2);
    }

    #[test]
    fn test_derived_value_ignores_anchor_elapsed() {
        // Anchor recorded at 30s; the untimed touch came 7s later on the wall clock.
        let log = normalize_events(vec![
            score_at("untimed", 17_000, None),
            score_at("anchor", 10_000, Some(30)),
        ]);
        assert_eq!(
            elapsed_of(&log),
            vec![("untimed".into(), 7), ("anchor".into(), 30)]
        );
        assert_eq!(log.repaired, 1);
    }

    #[test]
    fn test_derived_value_sorts_between_recorded_values() {
        let log = normalize_events(vec![
            score_at("late", 40_000, Some(40)),
            score_at("untimed", 35_000, None),
            score_at("anchor", 0, Some(30)),
        ]);
        assert_eq!(
            elapsed_of(&log),
            vec![
                ("anchor".into(), 30),
                ("untimed".into(), 35),
                ("late".into(), 40),
            ]
        );
    }

    #[test]
    fn test_untimed_cancel_is_not_counted_as_repair() {
        let cancel = MatchEvent::cancel("c1", Some("a".into()), base() + Duration::seconds(3));
        let log = normalize_events(vec![score_at("a", 0, Some(0)), cancel]);
        assert_eq!(elapsed_of(&log), vec![("a".into(), 0), ("c1".into(), 3)]);
        assert_eq!(log.repaired, 0);
    }

    #[test]
    fn test_without_anchor_uses_previous_plus_one() {
        let log = normalize_events(vec![
            score_at("third", 9_000, None),
            score_at("first", 1_000, None),
            score_at("second", 4_000, None),
        ]);
        assert_eq!(
            elapsed_of(&log),
            vec![
                ("first".into(), 0),
                ("second".into(), 1),
                ("third".into(), 2),
            ]
        );
        assert_eq!(log.repaired, 3);
    }

    #[test]
    fn test_cursor_bumps_value_below_previous() {
        let mut cursor = ElapsedCursor::default();
        assert_eq!(cursor.assign(Some(10), None), (10, false));
        assert_eq!(cursor.assign(Some(4), None), (11, true));
        assert_eq!(cursor.assign(None, Some(3)), (12, true));
        assert_eq!(cursor.assign(None, None), (13, true));
    }

    #[test]
    fn test_event_before_anchor_clamps_to_zero() {
        // "x" happened 5s before the anchor's wall clock.
        let log = normalize_events(vec![
            score_at("anchor", 5_000, Some(0)),
            score_at("x", 0, None),
            score_at("y", 15_000, None),
        ]);
        assert_eq!(
            elapsed_of(&log),
            vec![("x".into(), 0), ("anchor".into(), 0), ("y".into(), 10)]
        );
    }

    #[test]
    fn test_equal_values_are_not_bumped() {
        let log = normalize_events(vec![score_at("a", 0, Some(9)), score_at("b", 10, Some(9))]);
        assert_eq!(elapsed_of(&log), vec![("a".into(), 9), ("b".into(), 9)]);
    }

    fn arb_events() -> impl Strategy<Value = Vec<MatchEvent>> {
        let entries = prop::collection::vec((0i64..600_000, prop::option::of(0u32..600)), 0..40);
        entries.prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, (wall_ms, elapsed))| {
                    score_at(&format!("e{i}"), wall_ms, elapsed)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_output_is_monotonic_and_complete(events in arb_events()) {
            let count = events.len();
            let log = normalize_events(events);
            prop_assert_eq!(log.events.len(), count);
            prop_assert!(log.events.iter().all(|e| e.elapsed_seconds.is_some()));
            prop_assert!(log.events.windows(2).all(|w| w[0].elapsed() <= w[1].elapsed()));
        }

        #[test]
        fn prop_input_order_does_not_matter(
            (events, shuffled) in arb_events().prop_flat_map(|events| {
                let shuffled = Just(events.clone()).prop_shuffle();
                (Just(events), shuffled)
            })
        ) {
            prop_assert_eq!(normalize_events(events), normalize_events(shuffled));
        }
    }
}
