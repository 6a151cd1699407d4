use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// One touch/point for `scorer_label`
    Score,
    /// Voids the Score event named by `cancelled_event_id`
    Cancel,
}

/// One immutable entry of a bout's event log.
///
/// Corrections never mutate an event; they append a [`EventKind::Cancel`] entry instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct MatchEvent {
    pub id: String,
    pub kind: EventKind,
    /// Set only for Score events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scorer_label: Option<String>,
    /// Slot A label as known when this event was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_a_label_at_creation: Option<String>,
    /// Slot B label as known when this event was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_b_label_at_creation: Option<String>,
    /// Seconds since bout start. Filled in by normalization when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<u32>,
    pub wall_clock_time: DateTime<Utc>,
    /// Set only for Cancel events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_ref: Option<String>,
}

impl MatchEvent {
    /// Score event with both creation-time labels recorded.
    pub fn score(
        id: impl Into<String>,
        scorer: impl Into<String>,
        slot_a_at_creation: impl Into<String>,
        slot_b_at_creation: impl Into<String>,
        wall_clock_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: EventKind::Score,
            scorer_label: Some(scorer.into()),
            slot_a_label_at_creation: Some(slot_a_at_creation.into()),
            slot_b_label_at_creation: Some(slot_b_at_creation.into()),
            elapsed_seconds: None,
            wall_clock_time,
            cancelled_event_id: None,
            period_ref: None,
        }
    }

    /// Cancel event targeting `target` (or nothing, for a malformed cancel).
    pub fn cancel(
        id: impl Into<String>,
        target: Option<String>,
        wall_clock_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: EventKind::Cancel,
            scorer_label: None,
            slot_a_label_at_creation: None,
            slot_b_label_at_creation: None,
            elapsed_seconds: None,
            wall_clock_time,
            cancelled_event_id: target,
            period_ref: None,
        }
    }

    pub fn with_elapsed(mut self, elapsed_seconds: u32) -> Self {
        self.elapsed_seconds = Some(elapsed_seconds);
        self
    }

    pub fn with_period_ref(mut self, period_ref: impl Into<String>) -> Self {
        self.period_ref = Some(period_ref.into());
        self
    }

    pub fn is_score(&self) -> bool {
        self.kind == EventKind::Score
    }

    pub fn is_cancel(&self) -> bool {
        self.kind == EventKind::Cancel
    }

    /// Elapsed seconds after normalization. Zero before normalization has run.
    pub fn elapsed(&self) -> u32 {
        self.elapsed_seconds.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_event_json_shape() {
        let t = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let event = MatchEvent::score("e1", "Alice", "Alice", "Bob", t).with_elapsed(5);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "score");
        assert_eq!(json["scorer_label"], "Alice");
        assert_eq!(json["elapsed_seconds"], 5);
        assert!(json.get("cancelled_event_id").is_none());

        let back: MatchEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_legacy_event_without_creation_labels() {
        let json = r#"{
            "id": "old-1",
            "kind": "score",
            "scorer_label": "Bob",
            "wall_clock_time": "2026-03-01T10:00:00Z"
        }"#;
        let event: MatchEvent = serde_json::from_str(json).unwrap();
        assert!(event.slot_a_label_at_creation.is_none());
        assert!(event.elapsed_seconds.is_none());
        assert!(event.is_score());
    }
}
