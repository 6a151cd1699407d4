//! # Reconciler
//!
//! Aligns derived series with the authoritative final score.
//!
//! - Over-count: trailing points are trimmed until the last one is within the
//!   authoritative score, then that point is pinned to it exactly.
//! - Under-count: the series is left as is. No touch times are invented.
//!
//! Both directions emit `ScoreReconciliationMismatch { side, expected, observed }`.

use tracing::debug;

use crate::models::{Bout, Diagnostic, ProgressionPoint, ScoreProgression, Side};

fn reconcile_series(
    series: &mut Vec<ProgressionPoint>,
    side: Side,
    authoritative: u32,
) -> Option<Diagnostic> {
    let observed = series.last().map(|p| p.count).unwrap_or(0);
    if observed == authoritative {
        return None;
    }

    if observed > authoritative {
        while series.len() > 1 && series.last().is_some_and(|p| p.count > authoritative) {
            series.pop();
        }
        match series.last_mut() {
            Some(last) => last.count = authoritative,
            None => series.push(ProgressionPoint::ORIGIN),
        }
        debug!(
            %side,
            observed,
            authoritative,
            retained = series.len(),
            "trimmed over-counted series"
        );
    }

    Some(Diagnostic::score_mismatch(side, authoritative, observed))
}

/// Reconcile both series against `bout`'s authoritative scores.
pub fn reconcile(
    mut progression: ScoreProgression,
    bout: &Bout,
) -> (ScoreProgression, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    for side in [Side::A, Side::B] {
        let authoritative = bout.authoritative_score(side);
        let series = progression.series_mut(side);
        diagnostics.extend(reconcile_series(series, side, authoritative));
    }
    (progression, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DiagnosticCode;

    fn series(counts: &[(u32, u32)]) -> Vec<ProgressionPoint> {
        counts.iter().copied().map(ProgressionPoint::from).collect()
    }

    fn progression(a: &[(u32, u32)], b: &[(u32, u32)]) -> ScoreProgression {
        ScoreProgression {
            side_a: series(a),
            side_b: series(b),
        }
    }

    #[test]
    fn test_over_count_is_capped() {
        let derived = progression(
            &[(0, 0), (3, 1), (8, 2), (12, 3), (15, 4), (20, 5), (22, 6)],
            &[(0, 0)],
        );
        let bout = Bout::new("A", "B").with_scores(5, 0);

        let (reconciled, diagnostics) = reconcile(derived, &bout);
        assert_eq!(
            reconciled.side_a.last(),
            Some(&ProgressionPoint::new(20, 5))
        );
        assert_eq!(reconciled.side_a.len(), 6);

        assert_eq!(diagnostics.len(), 1);
        let diag = &diagnostics[0];
        assert_eq!(diag.code, DiagnosticCode::ScoreReconciliationMismatch);
        assert_eq!(diag.side, Some(Side::A));
        assert_eq!(diag.expected, Some(5));
        assert_eq!(diag.observed, Some(6));
    }

    #[test]
    fn test_over_count_to_zero_keeps_origin() {
        let derived = progression(&[(0, 0)], &[(0, 0), (4, 1), (6, 2)]);
        let bout = Bout::new("A", "B").with_scores(0, 0);

        let (reconciled, diagnostics) = reconcile(derived, &bout);
        assert_eq!(reconciled.side_b, vec![ProgressionPoint::ORIGIN]);
        assert_eq!(diagnostics[0].side, Some(Side::B));
    }

    #[test]
    fn test_under_count_is_flagged_not_filled() {
        let derived = progression(&[(0, 0), (5, 1)], &[(0, 0)]);
        let bout = Bout::new("A", "B").with_scores(3, 0);

        let (reconciled, diagnostics) = reconcile(derived.clone(), &bout);
        assert_eq!(reconciled, derived);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].expected, Some(3));
        assert_eq!(diagnostics[0].observed, Some(1));
    }

    #[test]
    fn test_matching_totals_emit_nothing() {
        let derived = progression(&[(0, 0), (5, 1)], &[(0, 0), (6, 1)]);
        let bout = Bout::new("A", "B").with_scores(1, 1);

        let (reconciled, diagnostics) = reconcile(derived.clone(), &bout);
        assert_eq!(reconciled, derived);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_both_sides_mismatched() {
        let derived = progression(&[(0, 0), (5, 1), (6, 2)], &[(0, 0)]);
        let bout = Bout::new("A", "B").with_scores(1, 2);

        let (reconciled, diagnostics) = reconcile(derived, &bout);
        assert_eq!(reconciled.terminal(Side::A), 1);
        assert_eq!(reconciled.terminal(Side::B), 0);
        let sides: Vec<Option<Side>> = diagnostics.iter().map(|d| d.side).collect();
        assert_eq!(sides, vec![Some(Side::A), Some(Side::B)]);
    }
}
