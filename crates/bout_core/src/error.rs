use thiserror::Error;

/// Failure reported by an [`EventStore`](crate::source::EventStore) or
/// [`MatchRegistry`](crate::source::MatchRegistry) collaborator.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Match not found: {match_id}")]
    MatchNotFound { match_id: String },

    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl FetchError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            FetchError::Unavailable(_) => true,
            FetchError::Io(_) => true,
            FetchError::MatchNotFound { .. } => false,
            FetchError::Parse(_) => false,
        }
    }
}

/// Errors raised while loading or validating a
/// [`ReconstructConfig`](crate::config::ReconstructConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level error. Data-quality problems inside an event log never end up here;
/// they are reported as [`Diagnostic`](crate::models::Diagnostic) values instead.
#[derive(Error, Debug)]
pub enum BoutError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BoutError {
    /// Whether retrying the same call could succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            BoutError::Fetch(err) => err.is_recoverable(),
            BoutError::Config(_) => false,
            BoutError::Serialization(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, BoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_recoverability() {
        let not_found = FetchError::MatchNotFound {
            match_id: "m1".into(),
        };
        assert!(!not_found.is_recoverable());
        assert!(FetchError::Unavailable("timeout".into()).is_recoverable());

        let unavailable = BoutError::from(FetchError::Unavailable("503".into()));
        assert!(unavailable.is_recoverable());
        let invalid = BoutError::from(ConfigError::Validation("bad".into()));
        assert!(!invalid.is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = BoutError::from(FetchError::MatchNotFound {
            match_id: "m42".into(),
        });
        assert_eq!(err.to_string(), "Fetch failed: Match not found: m42");
    }
}
