//! Classified failures for the generation and orchestration seams.

use std::time::Duration;
use thiserror::Error;

/// Why a single role failed to produce text.
///
/// Cloneable so the runner can both log the failure and carry it in the
/// final error when every role failed.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// Network or transport failure talking to the backend.
    #[error("{provider} request failed: {message}")]
    Request { provider: String, message: String },

    /// The backend answered with a non-success HTTP status.
    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    /// The backend answered but the response carried no completion at all.
    #[error("{provider} returned no completion")]
    EmptyResponse { provider: String },

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    /// The backend cannot be used with the current configuration.
    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// Failure of a whole task run.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Neither role produced a candidate; no decision was made.
    #[error("all roles failed (architect: {architect}; oracle: {oracle})")]
    AllRolesFailed {
        architect: GenerationError,
        oracle: GenerationError,
    },

    /// The event log could not be appended to.
    #[error("event log error: {0:#}")]
    EventLog(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_roles_failed_names_both_causes() {
        let err = TaskError::AllRolesFailed {
            architect: GenerationError::Timeout(Duration::from_secs(5)),
            oracle: GenerationError::NotConfigured("unknown provider 'x'".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("timed out after 5s"));
        assert!(msg.contains("unknown provider 'x'"));
    }

    #[test]
    fn test_status_error_message() {
        let err = GenerationError::Status {
            provider: "Ollama".into(),
            status: 404,
            body: "model not found".into(),
        };
        assert_eq!(err.to_string(), "Ollama returned HTTP 404: model not found");
    }
}
