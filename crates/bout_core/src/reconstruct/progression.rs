//! Cumulative score-over-time series for both current slots.

use tracing::debug;

use super::identity::ResolvedEvent;
use crate::models::{ProgressionPoint, ScoreProgression, Side};

/// Running count for one side.
#[derive(Debug, Default, Clone, Copy)]
struct SideCounter {
    count: u32,
}

impl SideCounter {
    fn bump(&mut self) -> u32 {
        self.count += 1;
        self.count
    }
}

/// Build both series from time-ordered resolved events.
///
/// Each event appends one point to its own side only; the other side's series
/// is left alone (see [`ScoreProgression::aligned`] for a shared time axis).
pub fn build_progression(events: &[ResolvedEvent]) -> ScoreProgression {
    let mut progression = ScoreProgression::default();
    let mut counter_a = SideCounter::default();
    let mut counter_b = SideCounter::default();

    for resolved in events {
        let side = resolved.side();
        let count = match side {
            Side::A => counter_a.bump(),
            Side::B => counter_b.bump(),
        };
        progression
            .series_mut(side)
            .push(ProgressionPoint::new(resolved.elapsed(), count));
    }

    debug!(
        side_a = counter_a.count,
        side_b = counter_b.count,
        "built progression"
    );
    progression
}
