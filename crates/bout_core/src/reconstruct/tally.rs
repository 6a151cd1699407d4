//! Touches per period and side.

use tracing::debug;

use super::identity::ResolvedEvent;
use crate::models::{Period, PeriodTally, TouchTable};

/// A resolved event with its period number.
#[derive(Debug, Clone, Copy)]
pub struct ClassifiedEvent<'a> {
    pub resolved: &'a ResolvedEvent,
    pub period: u32,
}

/// Every period of the bout gets a row, touched or not. Events classified to a
/// number the bout does not list still get counted under that number.
pub fn tally_touches(events: &[ClassifiedEvent<'_>], periods: &[Period]) -> TouchTable {
    let mut table: TouchTable = periods
        .iter()
        .map(|p| (p.number, PeriodTally::default()))
        .collect();

    for classified in events {
        table
            .entry(classified.period)
            .or_default()
            .add(classified.resolved.side());
    }

    debug!(
        periods = table.len(),
        touches = events.len(),
        "tallied touches"
    );
    table
}
