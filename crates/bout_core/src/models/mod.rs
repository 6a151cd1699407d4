//! Data model: the event log, bout metadata and the reconstructed statistics.

pub mod bout;
pub mod diagnostics;
pub mod events;
pub mod stats;

pub use bout::{Bout, Entity, Period, Side, SlotAssignment};
pub use diagnostics::{Diagnostic, DiagnosticCode};
pub use events::{EventKind, MatchEvent};
pub use stats::{
    AlignedPoint, BestRun, BoutStats, PeriodTally, ProgressionPoint, ReconstructionSummary,
    ScoreProgression, TouchTable,
};
