use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::bout::Side;

/// Data-quality conditions found while reconstructing a bout.
///
/// None of these abort reconstruction. Missing timing data is repaired during
/// normalization and only counted in the summary, so it has no code here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    MalformedCancelEvent,
    UnresolvableIdentity,
    PeriodBoundaryAmbiguous,
    ScoreReconciliationMismatch,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::MalformedCancelEvent => "malformed_cancel_event",
            DiagnosticCode::UnresolvableIdentity => "unresolvable_identity",
            DiagnosticCode::PeriodBoundaryAmbiguous => "period_boundary_ambiguous",
            DiagnosticCode::ScoreReconciliationMismatch => "score_reconciliation_mismatch",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode) -> Self {
        Self {
            code,
            side: None,
            expected: None,
            observed: None,
            event_id: None,
        }
    }

    pub fn malformed_cancel(event_id: &str) -> Self {
        Self::new(DiagnosticCode::MalformedCancelEvent)
            .with_event(event_id)
            .logged()
    }

    pub fn unresolvable_identity(event_id: &str, attributed_to: Side) -> Self {
        let mut diag = Self::new(DiagnosticCode::UnresolvableIdentity).with_event(event_id);
        diag.side = Some(attributed_to);
        diag.logged()
    }

    /// `observed` carries the period number the event fell back to.
    pub fn period_ambiguous(event_id: &str, assigned_period: u32) -> Self {
        let mut diag = Self::new(DiagnosticCode::PeriodBoundaryAmbiguous).with_event(event_id);
        diag.observed = Some(assigned_period);
        diag.logged()
    }

    pub fn score_mismatch(side: Side, expected: u32, observed: u32) -> Self {
        let mut diag = Self::new(DiagnosticCode::ScoreReconciliationMismatch);
        diag.side = Some(side);
        diag.expected = Some(expected);
        diag.observed = Some(observed);
        diag.logged()
    }

    pub fn with_event(mut self, event_id: &str) -> Self {
        self.event_id = Some(event_id.to_string());
        self
    }

    /// Mirror the diagnostic to the tracing sink.
    fn logged(self) -> Self {
        warn!(
            code = self.code.as_str(),
            side = ?self.side,
            expected = ?self.expected,
            observed = ?self.observed,
            event_id = ?self.event_id,
            "reconstruction diagnostic"
        );
        self
    }
}
