//! # Identity Resolver
//!
//! Maps the scorer recorded on an event to one of the bout's *current* slots.
//!
//! Slots can be swapped after events were recorded, so the recorded label is
//! first located in the event's creation-time assignment, and the entity found
//! there is then looked up in the current assignment:
//!
//! | creation A | creation B | scorer | current A | current B | result |
//! |------------|------------|--------|-----------|-----------|--------|
//! | Alice      | Bob        | Alice  | Alice     | Bob       | A      |
//! | Alice      | Bob        | Alice  | Bob       | Alice     | B      |
//!
//! Resolution is a pure function of `(event, bout)`: no counters, no caches.

use tracing::{debug, warn};

use crate::models::{Bout, Diagnostic, Entity, MatchEvent, Side, SlotAssignment};

/// How an attribution was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// Creation-time slot mapped through the current assignment.
    CreationSnapshot,
    /// Scorer label matched a current label directly.
    CurrentLabel,
    /// Nothing matched; credited to the conventional side.
    Conventional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribution {
    pub side: Side,
    pub source: IdentitySource,
}

impl Attribution {
    pub fn new(side: Side, source: IdentitySource) -> Self {
        Self { side, source }
    }

    /// A conventional attribution is a guess; streak logic treats it as neutral.
    pub fn is_neutral(&self) -> bool {
        self.source == IdentitySource::Conventional
    }

    /// Side to use for streaks, `None` for neutral events.
    pub fn streak_side(&self) -> Option<Side> {
        if self.is_neutral() {
            None
        } else {
            Some(self.side)
        }
    }
}

/// An effective Score event with its current-slot attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEvent {
    pub event: MatchEvent,
    pub attribution: Attribution,
}

impl ResolvedEvent {
    pub fn side(&self) -> Side {
        self.attribution.side
    }

    pub fn elapsed(&self) -> u32 {
        self.event.elapsed()
    }
}

pub struct IdentityResolver {
    current: SlotAssignment,
    conventional: Side,
}

impl IdentityResolver {
    pub fn new(bout: &Bout, conventional: Side) -> Self {
        let current = bout.current_assignment();
        if current.has_collision() {
            warn!(
                label = current.occupant(Side::A).label(),
                "both current slots share a label; matches resolve to slot A"
            );
        }
        Self {
            current,
            conventional,
        }
    }

    /// Resolve one event. A diagnostic accompanies conventional attributions.
    pub fn resolve(&self, event: &MatchEvent) -> (Attribution, Option<Diagnostic>) {
        if let Some(side) = self.via_creation_snapshot(event) {
            return (Attribution::new(side, IdentitySource::CreationSnapshot), None);
        }

        let scorer = event.scorer_label.as_deref().map(Entity::new);
        if let Some(side) = scorer.as_ref().and_then(|e| self.current.slot_of(e)) {
            return (Attribution::new(side, IdentitySource::CurrentLabel), None);
        }

        let side = self.conventional;
        (
            Attribution::new(side, IdentitySource::Conventional),
            Some(Diagnostic::unresolvable_identity(&event.id, side)),
        )
    }

    fn via_creation_snapshot(&self, event: &MatchEvent) -> Option<Side> {
        let scorer = Entity::new(event.scorer_label.as_deref()?);
        let creation = SlotAssignment::at_creation(
            event.slot_a_label_at_creation.as_deref(),
            event.slot_b_label_at_creation.as_deref(),
        )?;
        let creation_slot = creation.slot_of(&scorer)?;
        self.current.slot_of(creation.occupant(creation_slot))
    }

    /// Attribute every effective event, collecting diagnostics in event order.
    pub fn resolve_all(&self, events: Vec<MatchEvent>) -> (Vec<ResolvedEvent>, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let resolved: Vec<ResolvedEvent> = events
            .into_iter()
            .map(|event| {
                let (attribution, diagnostic) = self.resolve(&event);
                diagnostics.extend(diagnostic);
                ResolvedEvent { event, attribution }
            })
            .collect();

        debug!(
            events = resolved.len(),
            unresolved = diagnostics.len(),
            "resolved identities"
        );
        (resolved, diagnostics)
    }
}
