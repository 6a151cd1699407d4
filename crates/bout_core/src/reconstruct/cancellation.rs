//! # Cancellation Resolver
//!
//! Turns the normalized log into the list of effective Score events.
//!
//! Cancellation is order-independent: the full set of cancelled ids is
//! collected before any Score event is judged, so a Cancel may appear before
//! or after its target. Deduplication is by exact id only; two genuine touches
//! can share an elapsed time and scorer.

use std::collections::HashSet;

use tracing::debug;

use crate::models::{Diagnostic, MatchEvent};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveLog {
    /// Surviving Score events, in normalized order.
    pub events: Vec<MatchEvent>,
    /// Score events removed by a Cancel.
    pub cancelled: usize,
    /// Repeated ids dropped after their first occurrence.
    pub duplicates: usize,
    pub cancel_events: usize,
    pub diagnostics: Vec<Diagnostic>,
}

fn cancel_target(event: &MatchEvent) -> Option<&str> {
    event
        .cancelled_event_id
        .as_deref()
        .map(str::trim)
        .filter(|target| !target.is_empty())
}

/// Drop Cancel events, cancelled Score events and repeated ids.
pub fn resolve_cancellations(events: Vec<MatchEvent>) -> EffectiveLog {
    let mut log = EffectiveLog::default();
    let mut cancelled_ids: HashSet<String> = HashSet::new();

    for event in events.iter().filter(|e| e.is_cancel()) {
        log.cancel_events += 1;
        match cancel_target(event) {
            Some(target) => {
                cancelled_ids.insert(target.to_string());
            }
            None => {
                let diag = Diagnostic::malformed_cancel(&event.id);
                log.diagnostics.push(diag);
            }
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    for event in events.into_iter().filter(MatchEvent::is_score) {
        if !seen.insert(event.id.clone()) {
            log.duplicates += 1;
            continue;
        }
        if cancelled_ids.contains(&event.id) {
            log.cancelled += 1;
            continue;
        }
        log.events.push(event);
    }

    debug!(
        effective = log.events.len(),
        cancelled = log.cancelled,
        duplicates = log.duplicates,
        cancel_events = log.cancel_events,
        "resolved cancellations"
    );
    log
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DiagnosticCode;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn score(id: &str, scorer: &str, elapsed: u32) -> MatchEvent {
        MatchEvent::score(id, scorer, "A", "B", at(i64::from(elapsed))).with_elapsed(elapsed)
    }

    fn cancel(id: &str, target: &str, secs: i64) -> MatchEvent {
        MatchEvent::cancel(id, Some(target.to_string()), at(secs))
    }

    fn ids(log: &EffectiveLog) -> Vec<&str> {
        log.events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_cancel_after_target() {
        let log = resolve_cancellations(vec![score("s1", "A", 3), cancel("c1", "s1", 4)]);
        assert!(log.events.is_empty());
        assert_eq!(log.cancelled, 1);
        assert_eq!(log.cancel_events, 1);
        assert!(log.diagnostics.is_empty());
    }

    #[test]
    fn test_cancel_before_target() {
        let log = resolve_cancellations(vec![
            cancel("c1", "s2", 1),
            score("s1", "A", 3),
            score("s2", "B", 5),
        ]);
        assert_eq!(ids(&log), vec!["s1"]);
        assert_eq!(log.cancelled, 1);
    }

    #[test]
    fn test_duplicate_id_counts_once() {
        let log = resolve_cancellations(vec![score("s1", "A", 3), score("s1", "A", 3)]);
        assert_eq!(ids(&log), vec!["s1"]);
        assert_eq!(log.duplicates, 1);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let log = resolve_cancellations(vec![score("s1", "A", 3), score("s1", "B", 7)]);
        assert_eq!(log.events.len(), 1);
        assert_eq!(log.events[0].scorer_label.as_deref(), Some("A"));
    }

    #[test]
    fn test_same_time_and_scorer_both_count() {
        let log = resolve_cancellations(vec![score("s1", "A", 9), score("s2", "A", 9)]);
        assert_eq!(ids(&log), vec!["s1", "s2"]);
        assert_eq!(log.duplicates, 0);
    }

    #[test]
    fn test_malformed_cancel_is_dropped_and_diagnosed() {
        let log = resolve_cancellations(vec![
            score("s1", "A", 3),
            MatchEvent::cancel("c1", None, at(4)),
            cancel("c2", "  ", 5),
        ]);
        // Never treated as "cancel the previous event".
        assert_eq!(ids(&log), vec!["s1"]);
        assert_eq!(log.diagnostics.len(), 2);
        assert!(log
            .diagnostics
            .iter()
            .all(|d| d.code == DiagnosticCode::MalformedCancelEvent));
        assert_eq!(log.diagnostics[0].event_id.as_deref(), Some("c1"));
    }

    #[test]
    fn test_cancel_of_unknown_id_is_harmless() {
        let log = resolve_cancellations(vec![score("s1", "A", 3), cancel("c1", "ghost", 4)]);
        assert_eq!(ids(&log), vec!["s1"]);
        assert_eq!(log.cancelled, 0);
    }

    proptest! {
        #[test]
        fn prop_every_cancelled_id_is_absent(
            n in 1usize..30,
            cancel_mask in prop::collection::vec(any::<bool>(), 30)
        ) {
            let mut events: Vec<MatchEvent> = (0..n)
                .map(|i| score(&format!("s{i}"), "A", i as u32))
                .collect();
            let mut expected = Vec::new();
            for i in 0..n {
                if cancel_mask[i] {
                    events.push(cancel(&format!("c{i}"), &format!("s{i}"), i as i64));
                } else {
                    expected.push(format!("s{i}"));
                }
            }
            let log = resolve_cancellations(events);
            let got: Vec<String> = log.events.iter().map(|e| e.id.clone()).collect();
            prop_assert_eq!(got, expected);
        }
    }
}
