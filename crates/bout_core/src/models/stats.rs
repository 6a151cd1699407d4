use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::bout::Side;
use super::diagnostics::Diagnostic;

/// One point of a cumulative score series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct ProgressionPoint {
    pub elapsed: u32,
    pub count: u32,
}

impl ProgressionPoint {
    pub const ORIGIN: ProgressionPoint = ProgressionPoint {
        elapsed: 0,
        count: 0,
    };

    pub fn new(elapsed: u32, count: u32) -> Self {
        Self { elapsed, count }
    }
}

impl From<(u32, u32)> for ProgressionPoint {
    fn from((elapsed, count): (u32, u32)) -> Self {
        Self { elapsed, count }
    }
}

/// A row of both series merged onto one time axis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct AlignedPoint {
    pub elapsed: u32,
    pub side_a: u32,
    pub side_b: u32,
}

/// Cumulative score-over-time for both current slots.
///
/// Each series only holds points where its own side scored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct ScoreProgression {
    pub side_a: Vec<ProgressionPoint>,
    pub side_b: Vec<ProgressionPoint>,
}

impl Default for ScoreProgression {
    fn default() -> Self {
        Self {
            side_a: vec![ProgressionPoint::ORIGIN],
            side_b: vec![ProgressionPoint::ORIGIN],
        }
    }
}

impl ScoreProgression {
    pub fn series(&self, side: Side) -> &[ProgressionPoint] {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    pub fn series_mut(&mut self, side: Side) -> &mut Vec<ProgressionPoint> {
        match side {
            Side::A => &mut self.side_a,
            Side::B => &mut self.side_b,
        }
    }

    pub fn terminal(&self, side: Side) -> u32 {
        self.series(side).last().map(|p| p.count).unwrap_or(0)
    }

    /// Merge both series onto a shared axis, carrying the last known value
    /// forward for the side that did not score at a given instant.
    ///
    /// Points are consumed in elapsed order; at equal elapsed, side A goes first.
    /// Every input point yields one row, so simultaneous touches stay visible.
    pub fn aligned(&self) -> Vec<AlignedPoint> {
        let mut rows = Vec::with_capacity(self.side_a.len() + self.side_b.len());
        let (mut ia, mut ib) = (0usize, 0usize);
        let (mut last_a, mut last_b) = (0u32, 0u32);

        while ia < self.side_a.len() || ib < self.side_b.len() {
            let take_a = match (self.side_a.get(ia), self.side_b.get(ib)) {
                (Some(a), Some(b)) => a.elapsed <= b.elapsed,
                (Some(_), None) => true,
                _ => false,
            };
            let elapsed = if take_a {
                let p = self.side_a[ia];
                ia += 1;
                last_a = p.count;
                p.elapsed
            } else {
                let p = self.side_b[ib];
                ib += 1;
                last_b = p.count;
                p.elapsed
            };

            let row = AlignedPoint {
                elapsed,
                side_a: last_a,
                side_b: last_b,
            };
            // Origins of both series collapse into one row.
            if rows.last() == Some(&row) {
                continue;
            }
            rows.push(row);
        }
        rows
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct PeriodTally {
    pub side_a: u32,
    pub side_b: u32,
}

impl PeriodTally {
    pub fn add(&mut self, side: Side) {
        match side {
            Side::A => self.side_a += 1,
            Side::B => self.side_b += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.side_a + self.side_b
    }
}

/// Period number → touches per side.
pub type TouchTable = BTreeMap<u32, PeriodTally>;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct BestRun {
    pub side_a: u32,
    pub side_b: u32,
}

impl BestRun {
    /// Side with the longer streak, `None` on a tie.
    pub fn leader(&self) -> Option<Side> {
        match self.side_a.cmp(&self.side_b) {
            std::cmp::Ordering::Greater => Some(Side::A),
            std::cmp::Ordering::Less => Some(Side::B),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// What normalization and cancellation did to the raw log.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct ReconstructionSummary {
    pub raw_events: usize,
    pub effective_events: usize,
    /// Score events removed by a Cancel.
    pub cancelled: usize,
    /// Repeated ids dropped after their first occurrence.
    pub duplicates: usize,
    pub cancel_events: usize,
    /// Events whose elapsed time was filled in or bumped.
    pub repaired_timing: usize,
}

/// Everything reconstructed from one bout snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct BoutStats {
    pub match_id: String,
    pub progression: ScoreProgression,
    pub touches_by_period: TouchTable,
    pub best_run: BestRun,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_run_leader: Option<Side>,
    pub summary: ReconstructionSummary,
    pub diagnostics: Vec<Diagnostic>,
}

impl BoutStats {
    /// SHA-256 of the canonical JSON encoding, hex encoded.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        let digest = Sha256::digest(&bytes);
        Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
    }
}
