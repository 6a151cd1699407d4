//! Collaborator boundary: where snapshots come from.
//!
//! The engine never talks to storage itself. Callers hand it an [`EventStore`]
//! and a [`MatchRegistry`]; [`MatchSnapshot::fetch`] reads everything once, and
//! reconstruction then runs on that value alone.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ReconstructConfig;
use crate::error::{FetchError, Result};
use crate::models::{Bout, BoutStats, MatchEvent, Period};
use crate::reconstruct::reconstruct;

pub type FetchResult<T> = std::result::Result<T, FetchError>;

pub trait EventStore {
    /// All events recorded for a bout, in no particular order.
    fn events_for_match(&self, match_id: &str) -> FetchResult<Vec<MatchEvent>>;
}

pub trait MatchRegistry {
    fn get_match(&self, match_id: &str) -> FetchResult<Bout>;
    fn get_periods(&self, match_id: &str) -> FetchResult<Vec<Period>>;
}

/// One closed, immutable view of a bout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchSnapshot {
    pub match_id: String,
    pub events: Vec<MatchEvent>,
    pub bout: Bout,
}

impl MatchSnapshot {
    /// Read events, bout record and periods for `match_id`.
    ///
    /// The collaborators must serve these from one consistent read; reading
    /// them at different points in time can tear (a period closing between
    /// two fetches). Periods from the registry replace those on the record.
    pub fn fetch<S, R>(store: &S, registry: &R, match_id: &str) -> FetchResult<Self>
    where
        S: EventStore + ?Sized,
        R: MatchRegistry + ?Sized,
    {
        let mut bout = registry.get_match(match_id)?;
        bout.periods = registry.get_periods(match_id)?;
        let events = store.events_for_match(match_id)?;

        debug!(
            match_id,
            events = events.len(),
            periods = bout.periods.len(),
            "fetched snapshot"
        );
        Ok(Self {
            match_id: match_id.to_string(),
            events,
            bout,
        })
    }
}

/// Fetch a snapshot and reconstruct it. Only a fetch failure is an error.
pub fn reconstruct_match<S, R>(
    store: &S,
    registry: &R,
    match_id: &str,
    config: &ReconstructConfig,
) -> Result<BoutStats>
where
    S: EventStore + ?Sized,
    R: MatchRegistry + ?Sized,
{
    let snapshot = MatchSnapshot::fetch(store, registry, match_id)?;
    Ok(reconstruct(&snapshot, config))
}

/// Snapshots held in memory, serving as both collaborators.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    snapshots: HashMap<String, MatchSnapshot>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, snapshot: MatchSnapshot) {
        self.snapshots.insert(snapshot.match_id.clone(), snapshot);
    }

    pub fn with_snapshot(mut self, snapshot: MatchSnapshot) -> Self {
        self.insert(snapshot);
        self
    }

    fn lookup(&self, match_id: &str) -> FetchResult<&MatchSnapshot> {
        self.snapshots
            .get(match_id)
            .ok_or_else(|| FetchError::MatchNotFound {
                match_id: match_id.to_string(),
            })
    }
}

impl EventStore for InMemoryStore {
    fn events_for_match(&self, match_id: &str) -> FetchResult<Vec<MatchEvent>> {
        Ok(self.lookup(match_id)?.events.clone())
    }
}

impl MatchRegistry for InMemoryStore {
    fn get_match(&self, match_id: &str) -> FetchResult<Bout> {
        Ok(self.lookup(match_id)?.bout.clone())
    }

    fn get_periods(&self, match_id: &str) -> FetchResult<Vec<Period>> {
        Ok(self.lookup(match_id)?.bout.periods.clone())
    }
}
