use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::error_codes;
use crate::config::ReconstructConfig;
use crate::models::{Bout, BoutStats, MatchEvent, Period};
use crate::reconstruct::reconstruct;
use crate::source::MatchSnapshot;

pub const REQUEST_SCHEMA_VERSION: u8 = 1;

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

/// A snapshot plus optional config, as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReconstructRequest {
    pub schema_version: u8,
    #[serde(default)]
    pub match_id: String,
    pub bout: Bout,
    /// Overrides `bout.periods` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periods: Option<Vec<Period>>,
    #[serde(default)]
    pub events: Vec<MatchEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ReconstructConfig>,
}

impl ReconstructRequest {
    pub fn from_json(request_json: &str) -> Result<Self, String> {
        let request: ReconstructRequest = serde_json::from_str(request_json)
            .map_err(|e| err_code(error_codes::INVALID_REQUEST, e))?;

        if request.schema_version != REQUEST_SCHEMA_VERSION {
            let message = format!(
                "expected {REQUEST_SCHEMA_VERSION}, got {}",
                request.schema_version
            );
            return Err(err_code(error_codes::INVALID_SCHEMA_VERSION, message));
        }
        if let Some(config) = &request.config {
            config
                .validate()
                .map_err(|e| err_code(error_codes::INVALID_CONFIG, e))?;
        }
        Ok(request)
    }

    /// Split into the snapshot and the embedded config, if any.
    pub fn into_parts(self) -> (MatchSnapshot, Option<ReconstructConfig>) {
        let ReconstructRequest {
            match_id,
            mut bout,
            periods,
            events,
            config,
            ..
        } = self;
        if let Some(periods) = periods {
            bout.periods = periods;
        }
        let snapshot = MatchSnapshot {
            match_id,
            events,
            bout,
        };
        (snapshot, config)
    }
}

/// Main entry point for the JSON API: reconstruct statistics from a request.
///
/// Errors are `"CODE: message"` strings; data-quality problems in the log are
/// never errors and come back in the response's `diagnostics`.
pub fn reconstruct_json(request_json: &str) -> Result<String, String> {
    let (snapshot, config) = ReconstructRequest::from_json(request_json)?.into_parts();
    let config = config.unwrap_or_default();

    let stats = reconstruct(&snapshot, &config);
    serde_json::to_string(&stats).map_err(|e| err_code(error_codes::SERIALIZATION_FAILED, e))
}

/// JSON Schema of the response payload.
pub fn bout_stats_schema() -> Result<String, String> {
    let schema = schemars::schema_for!(BoutStats);
    serde_json::to_string_pretty(&schema)
        .map_err(|e| err_code(error_codes::SERIALIZATION_FAILED, e))
}
