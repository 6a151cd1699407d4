//! Longest unbroken scoring streak ("best run") for one side.
//!
//! Period boundaries are ignored. A touch by the opponent resets the streak;
//! neutral (conventionally attributed) touches neither extend nor reset it.

use super::identity::ResolvedEvent;
use crate::models::{BestRun, Side};

#[derive(Debug, Default, Clone, Copy)]
struct StreakState {
    current: u32,
    best: u32,
}

impl StreakState {
    fn observe(&mut self, scorer: Option<Side>, focal: Side) {
        match scorer {
            Some(side) if side == focal => {
                self.current += 1;
                self.best = self.best.max(self.current);
            }
            Some(_) => self.current = 0,
            None => {}
        }
    }
}

/// Longest streak of `focal` over a sequence of scorers (`None` = neutral).
pub fn longest_streak<I>(scorers: I, focal: Side) -> u32
where
    I: IntoIterator<Item = Option<Side>>,
{
    let mut state = StreakState::default();
    for scorer in scorers {
        state.observe(scorer, focal);
    }
    state.best
}

pub fn best_run(events: &[ResolvedEvent], focal: Side) -> u32 {
    longest_streak(events.iter().map(|e| e.attribution.streak_side()), focal)
}

pub fn best_runs(events: &[ResolvedEvent]) -> BestRun {
    BestRun {
        side_a: best_run(events, Side::A),
        side_b: best_run(events, Side::B),
    }
}
