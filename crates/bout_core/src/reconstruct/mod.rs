//! # Reconstruction Pipeline
//!
//! Derives bout statistics from one closed snapshot of the event log.
//!
//! ```text
//! raw events ─ normalizer ─ cancellation ─ identity ─┬─ progression ─ reconcile
//!                                                    ├─ period ─ tally
//!                                                    └─ run
//! ```
//!
//! Every stage consumes the previous stage's output by value and keeps its
//! accumulators local, so a call owns all of its state and the three branches
//! can run on the rayon pool without synchronization.

pub mod cancellation;
pub mod identity;
pub mod normalizer;
pub mod period;
pub mod progression;
pub mod reconcile;
pub mod run;
pub mod tally;

pub use cancellation::{resolve_cancellations, EffectiveLog};
pub use identity::{Attribution, IdentityResolver, IdentitySource, ResolvedEvent};
pub use normalizer::{normalize_events, NormalizedLog};
pub use period::{PeriodAssignment, PeriodClassifier, PeriodSource};
pub use progression::build_progression;
pub use reconcile::reconcile;
pub use run::{best_run, best_runs, longest_streak};
pub use tally::{tally_touches, ClassifiedEvent};

use tracing::{debug, info, info_span};

use crate::config::ReconstructConfig;
use crate::models::{
    Bout, BoutStats, Diagnostic, ReconstructionSummary, ScoreProgression, TouchTable,
};
use crate::source::MatchSnapshot;

type Branch<T> = (T, Vec<Diagnostic>);

fn progression_branch(events: &[ResolvedEvent], bout: &Bout) -> Branch<ScoreProgression> {
    reconcile(build_progression(events), bout)
}

fn tally_branch(
    events: &[ResolvedEvent],
    bout: &Bout,
    config: &ReconstructConfig,
) -> Branch<TouchTable> {
    let classifier = PeriodClassifier::new(
        &bout.periods,
        config.period_tolerance_secs,
        config.fallback_period,
    );
    let mut diagnostics = Vec::new();
    let classified: Vec<ClassifiedEvent<'_>> = events
        .iter()
        .map(|resolved| {
            let (assignment, diagnostic) = classifier.classify(&resolved.event);
            diagnostics.extend(diagnostic);
            ClassifiedEvent {
                resolved,
                period: assignment.number,
            }
        })
        .collect();
    (tally_touches(&classified, &bout.periods), diagnostics)
}

/// Reconstruct statistics for one snapshot.
///
/// Never fails: every data-quality problem becomes a [`Diagnostic`]. Calling it
/// twice with the same snapshot yields identical output.
pub fn reconstruct(snapshot: &MatchSnapshot, config: &ReconstructConfig) -> BoutStats {
    let span = info_span!("reconstruct", match_id = %snapshot.match_id);
    let _guard = span.enter();

    let raw_events = snapshot.events.len();
    let normalized = normalize_events(snapshot.events.clone());
    let effective = resolve_cancellations(normalized.events);

    let resolver = IdentityResolver::new(&snapshot.bout, config.conventional_side);
    let (resolved, identity_diagnostics) = resolver.resolve_all(effective.events);

    let bout = &snapshot.bout;
    let (progression_out, (tally_out, best_run)) = if config.parallel_stats {
        rayon::join(
            || progression_branch(&resolved, bout),
            || {
                rayon::join(
                    || tally_branch(&resolved, bout, config),
                    || best_runs(&resolved),
                )
            },
        )
    } else {
        (
            progression_branch(&resolved, bout),
            (tally_branch(&resolved, bout, config), best_runs(&resolved)),
        )
    };
    let (progression, reconcile_diagnostics) = progression_out;
    let (touches_by_period, period_diagnostics) = tally_out;

    let mut diagnostics = effective.diagnostics;
    diagnostics.extend(identity_diagnostics);
    diagnostics.extend(period_diagnostics);
    diagnostics.extend(reconcile_diagnostics);

    let summary = ReconstructionSummary {
        raw_events,
        effective_events: resolved.len(),
        cancelled: effective.cancelled,
        duplicates: effective.duplicates,
        cancel_events: effective.cancel_events,
        repaired_timing: normalized.repaired,
    };
    debug!(?summary, "reconstruction summary");
    info!(
        effective = resolved.len(),
        diagnostics = diagnostics.len(),
        best_run_a = best_run.side_a,
        best_run_b = best_run.side_b,
        "reconstructed bout"
    );

    BoutStats {
        match_id: snapshot.match_id.clone(),
        progression,
        touches_by_period,
        best_run_leader: best_run.leader(),
        best_run,
        summary,
        diagnostics,
    }
}
