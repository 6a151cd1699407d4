use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One of the two fixed competitor positions.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// Opaque identity of a competitor.
///
/// The event log only carries display labels, so an entity is keyed by its label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(String);

impl Entity {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn label(&self) -> &str {
        &self.0
    }
}

/// Which entity occupies which slot at one point in time.
///
/// Lookups scan slot A before slot B, so two entities sharing a label always
/// resolve to A.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAssignment {
    slots: [(Entity, Side); 2],
}

impl SlotAssignment {
    pub fn new(slot_a: Entity, slot_b: Entity) -> Self {
        Self {
            slots: [(slot_a, Side::A), (slot_b, Side::B)],
        }
    }

    /// Assignment recorded on an event at creation time, if both labels were captured.
    pub fn at_creation(slot_a: Option<&str>, slot_b: Option<&str>) -> Option<Self> {
        match (slot_a, slot_b) {
            (Some(a), Some(b)) => Some(Self::new(Entity::new(a), Entity::new(b))),
            _ => None,
        }
    }

    pub fn slot_of(&self, entity: &Entity) -> Option<Side> {
        self.slots
            .iter()
            .find(|(e, _)| e == entity)
            .map(|(_, side)| *side)
    }

    pub fn occupant(&self, side: Side) -> &Entity {
        match side {
            Side::A => &self.slots[0].0,
            Side::B => &self.slots[1].0,
        }
    }

    /// Two slots hold entities with the same label.
    pub fn has_collision(&self) -> bool {
        self.slots[0].0 == self.slots[1].0
    }
}

/// A bounded sub-interval of the bout (e.g. a round).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Period {
    pub number: u32,
    /// Identifier referenced by `MatchEvent::period_ref`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub start_time: DateTime<Utc>,
    /// `None` while the period is still open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl Period {
    pub fn new(number: u32, start_time: DateTime<Utc>, end_time: Option<DateTime<Utc>>) -> Self {
        Self {
            number,
            id: None,
            start_time,
            end_time,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Whether `period_ref` names this period, by id or by number.
    pub fn matches_ref(&self, period_ref: &str) -> bool {
        let period_ref = period_ref.trim();
        self.id.as_deref() == Some(period_ref)
            || period_ref.parse::<u32>().ok() == Some(self.number)
    }
}

/// Bout metadata owned by the match registry.
///
/// The current labels reflect any swap performed during the bout; the
/// authoritative scores are ground truth and never recomputed here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Bout {
    pub current_slot_a_label: String,
    pub current_slot_b_label: String,
    pub authoritative_score_a: u32,
    pub authoritative_score_b: u32,
    #[serde(default)]
    pub periods: Vec<Period>,
}

impl Bout {
    pub fn new(slot_a: impl Into<String>, slot_b: impl Into<String>) -> Self {
        Self {
            current_slot_a_label: slot_a.into(),
            current_slot_b_label: slot_b.into(),
            authoritative_score_a: 0,
            authoritative_score_b: 0,
            periods: Vec::new(),
        }
    }

    pub fn with_scores(mut self, score_a: u32, score_b: u32) -> Self {
        self.authoritative_score_a = score_a;
        self.authoritative_score_b = score_b;
        self
    }

    pub fn with_periods(mut self, periods: Vec<Period>) -> Self {
        self.periods = periods;
        self
    }

    pub fn current_assignment(&self) -> SlotAssignment {
        SlotAssignment::new(
            Entity::new(self.current_slot_a_label.as_str()),
            Entity::new(self.current_slot_b_label.as_str()),
        )
    }

    pub fn authoritative_score(&self, side: Side) -> u32 {
        match side {
            Side::A => self.authoritative_score_a,
            Side::B => self.authoritative_score_b,
        }
    }
}
