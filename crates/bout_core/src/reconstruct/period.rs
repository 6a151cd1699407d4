//! # Period Classifier
//!
//! Assigns each resolved event to a period number.
//!
//! ## Priority
//! 1. `period_ref` naming a known period
//! 2. Containing interval `start <= wall <= effective_end`, where the effective
//!    end is the period's own end, else the next period's start, else open
//! 3. Nearest start/end boundary within the tolerance window, else the
//!    fallback period (both emit `PeriodBoundaryAmbiguous`)
//!
//! Step 3 exists because periods can be skipped, merged or left open at the
//! end of a bout, so strict containment alone misses boundary events.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Diagnostic, MatchEvent, Period};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodSource {
    Reference,
    Interval,
    NearestBoundary,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodAssignment {
    pub number: u32,
    pub source: PeriodSource,
}

impl PeriodAssignment {
    pub fn new(number: u32, source: PeriodSource) -> Self {
        Self { number, source }
    }
}

pub struct PeriodClassifier {
    /// Sorted by start time; "next period" means next in this order.
    periods: Vec<Period>,
    tolerance: Duration,
    fallback_period: u32,
}

impl PeriodClassifier {
    pub fn new(periods: &[Period], tolerance_secs: u32, fallback_period: u32) -> Self {
        let mut periods = periods.to_vec();
        periods.sort_by_key(|p| (p.start_time, p.number));
        Self {
            periods,
            tolerance: Duration::seconds(i64::from(tolerance_secs)),
            fallback_period,
        }
    }

    pub fn classify(&self, event: &MatchEvent) -> (PeriodAssignment, Option<Diagnostic>) {
        if let Some(number) = self.by_reference(event) {
            return (PeriodAssignment::new(number, PeriodSource::Reference), None);
        }

        if let Some(number) = self.by_interval(event.wall_clock_time) {
            return (PeriodAssignment::new(number, PeriodSource::Interval), None);
        }

        let assignment = match self.nearest_boundary(event.wall_clock_time) {
            Some((number, distance)) if distance <= self.tolerance => {
                PeriodAssignment::new(number, PeriodSource::NearestBoundary)
            }
            _ => PeriodAssignment::new(self.fallback_period, PeriodSource::Fallback),
        };
        let diag = Diagnostic::period_ambiguous(&event.id, assignment.number);
        (assignment, Some(diag))
    }

    fn by_reference(&self, event: &MatchEvent) -> Option<u32> {
        let period_ref = event.period_ref.as_deref()?;
        self.periods
            .iter()
            .find(|p| p.matches_ref(period_ref))
            .map(|p| p.number)
    }

    fn effective_end(&self, idx: usize) -> Option<DateTime<Utc>> {
        self.periods[idx]
            .end_time
            .or_else(|| self.periods.get(idx + 1).map(|next| next.start_time))
    }

    fn by_interval(&self, wall: DateTime<Utc>) -> Option<u32> {
        (0..self.periods.len())
            .find(|&idx| {
                let period = &self.periods[idx];
                period.start_time <= wall
                    && self.effective_end(idx).map_or(true, |end| wall <= end)
            })
            .map(|idx| self.periods[idx].number)
    }

    /// Closest period by distance to its start or recorded end. Ties keep the earlier period.
    fn nearest_boundary(&self, wall: DateTime<Utc>) -> Option<(u32, Duration)> {
        let mut best: Option<(u32, Duration)> = None;
        for period in &self.periods {
            let boundaries = std::iter::once(period.start_time).chain(period.end_time);
            for boundary in boundaries {
                let distance = if wall >= boundary {
                    wall - boundary
                } else {
                    boundary - wall
                };
                if best.map_or(true, |(_, d)| distance < d) {
                    best = Some((period.number, distance));
                }
            }
        }
        best
    }
}
