use crate::gateway::GatewayError;
use crate::review::state_machine::ReviewCommandKind;
use crate::review::types::SubmissionStatus;
use thiserror::Error;

/// Failures surfaced by the review workflow.
///
/// Every mutating operation either completes locally and remotely or fails
/// with one of these and leaves the local cache untouched.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("cannot {command} submission {id} while it is {from}")]
    InvalidTransition {
        id: String,
        from: SubmissionStatus,
        command: ReviewCommandKind,
    },
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("remote update of submission {id} failed: {source}")]
    RemoteUpdateFailed {
        id: String,
        #[source]
        source: GatewayError,
    },
    #[error("remote fetch failed: {0}")]
    RemoteFetchFailed(#[source] GatewayError),
    #[error("submission {0} not found")]
    NotFound(String),
    #[error("a review transition for submission {0} is already in flight")]
    TransitionInFlight(String),
}

impl ReviewError {
    /// Errors that were decided locally, before any remote call
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ReviewError::InvalidTransition { .. }
                | ReviewError::Validation(_)
                | ReviewError::NotFound(_)
                | ReviewError::TransitionInFlight(_)
        )
    }

    /// Underlying gateway failure, if the error came from the remote side
    pub fn gateway_error(&self) -> Option<&GatewayError> {
        match self {
            ReviewError::RemoteUpdateFailed { source, .. } => Some(source),
            ReviewError::RemoteFetchFailed(source) => Some(source),
            _ => None,
        }
    }
}
