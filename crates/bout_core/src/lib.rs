//! # bout_core - Post-hoc Bout Statistics Reconstruction
//!
//! Rebuilds statistics for a head-to-head scored bout from its append-only
//! event log.
//!
//! ## Features
//! - Cumulative score-over-time series per current slot
//! - Touches per period and side
//! - Longest scoring streak ("best run") per side
//! - Reconciliation against the authoritative final score
//! - Diagnostics instead of failures for every data-quality problem
//!
//! The engine is a pure function of one snapshot: no I/O, no state that
//! outlives a call, identical output for identical input.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod reconstruct;
pub mod source;

pub use api::{bout_stats_schema, reconstruct_json, ReconstructRequest};
pub use config::ReconstructConfig;
pub use error::{BoutError, ConfigError, FetchError, Result};
pub use models::{
    BestRun, Bout, BoutStats, Diagnostic, DiagnosticCode, EventKind, MatchEvent, Period,
    PeriodTally, ProgressionPoint, ScoreProgression, Side,
};
pub use reconstruct::reconstruct;
pub use source::{reconstruct_match, EventStore, InMemoryStore, MatchRegistry, MatchSnapshot};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
