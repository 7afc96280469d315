//! Error types for herald-sync.

use thiserror::Error;

use herald_core::{ContentError, ContentState, EditionId, EntityRef};
use herald_presenter::PresentError;

/// Errors raised by the dispatch orchestrator.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Republish requested for content that is not publicly visible.
    #[error("{entity} is not publicly visible (state: {state}); refusing to republish")]
    UnpublishableState { entity: EntityRef, state: ContentState },

    /// Schedule requested for an edition with no publication time.
    #[error("edition {edition} has no scheduled publication time")]
    MissingPublishTime { edition: EditionId },

    #[error("enqueue failed: {0}")]
    Enqueue(#[from] EnqueueError),

    #[error("publishing API error: {0}")]
    Client(#[from] ClientError),
}

/// The job substrate refused a job.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnqueueError {
    #[error("job queue is closed")]
    QueueClosed,
}

/// A failed call to the publishing API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },

    /// The request body could not be encoded; resending cannot help.
    #[error("failed to encode request body: {0}")]
    Encode(String),
}

impl ClientError {
    /// Transport failures, 5xx and 429 are worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(_) => true,
            ClientError::Status { code, .. } => *code == 429 || *code >= 500,
            ClientError::Encode(_) => false,
        }
    }
}

/// Errors raised while executing a job.
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("transient delivery failure: {0}")]
    TransientDelivery(ClientError),

    #[error("publishing API rejected the payload: {0}")]
    Rejected(ClientError),

    #[error("presentation error: {0}")]
    Present(#[from] PresentError),

    #[error("content error: {0}")]
    Content(#[from] ContentError),
}

impl ExecuteError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExecuteError::TransientDelivery(_))
    }
}

impl From<ClientError> for ExecuteError {
    fn from(err: ClientError) -> Self {
        if err.is_retryable() {
            ExecuteError::TransientDelivery(err)
        } else {
            ExecuteError::Rejected(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(ClientError::Transport("connection refused".into()), true)]
    #[case(ClientError::Status { code: 500, body: String::new() }, true)]
    #[case(ClientError::Status { code: 503, body: String::new() }, true)]
    #[case(ClientError::Status { code: 429, body: String::new() }, true)]
    #[case(ClientError::Status { code: 400, body: String::new() }, false)]
    #[case(ClientError::Status { code: 422, body: String::new() }, false)]
    #[case(ClientError::Encode("key must be a string".into()), false)]
    fn client_errors_classify_into_execute_errors(#[case] err: ClientError, #[case] retryable: bool) {
        assert_eq!(err.is_retryable(), retryable);
        assert_eq!(ExecuteError::from(err).is_retryable(), retryable);
    }

    #[test]
    fn unpublishable_state_names_entity_and_state() {
        let err = SyncError::UnpublishableState {
            entity: EntityRef::ContentItem(EditionId(4)),
            state: ContentState::Draft,
        };
        let msg = err.to_string();
        assert!(msg.contains("content_item:4"), "got: {msg}");
        assert!(msg.contains("not publicly visible"), "got: {msg}");
        assert!(msg.contains("draft"), "got: {msg}");
    }
}
