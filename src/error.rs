//! Error types for Synheart Affect

use std::time::Duration;

use thiserror::Error;

use crate::types::SourceKind;

/// Errors that can occur during assessment
#[derive(Debug, Error)]
pub enum AssessError {
    /// Caller-supplied input cannot be scored. Never recovered locally.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed provider response: {0}")]
    MalformedProviderResponse(String),

    #[error("All {attempted} configured sources failed")]
    AllSourcesExhausted { attempted: usize },

    #[error("Source {source_kind} failed: {reason}")]
    SourceFailed {
        source_kind: SourceKind,
        reason: String,
    },

    #[error("Source {source_kind} timed out after {after:?}")]
    Timeout {
        source_kind: SourceKind,
        after: Duration,
    },

    #[error("Assessment cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl AssessError {
    /// Whether the fallback chain may recover from this error by advancing
    /// to the next source.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AssessError::MalformedProviderResponse(_)
                | AssessError::SourceFailed { .. }
                | AssessError::Timeout { .. }
                | AssessError::AllSourcesExhausted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classes() {
        assert!(AssessError::MalformedProviderResponse("x".into()).is_recoverable());
        assert!(AssessError::Timeout {
            source_kind: SourceKind::RemotePrimary,
            after: Duration::from_secs(30),
        }
        .is_recoverable());
        assert!(!AssessError::InvalidInput("empty image".into()).is_recoverable());
        assert!(!AssessError::Cancelled.is_recoverable());
    }

    #[test]
    fn test_display_includes_source_kind() {
        let err = AssessError::SourceFailed {
            source_kind: SourceKind::RemoteSecondary,
            reason: "HTTP 503".into(),
        };
        assert_eq!(err.to_string(), "Source remote_secondary failed: HTTP 503");
    }
}
