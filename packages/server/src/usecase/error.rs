//! UseCase error types.

use thiserror::Error;

/// Errors from `BroadcastHub::publish`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// The dispatch task has stopped
    #[error("broadcast hub is closed")]
    HubClosed,
}

/// Errors while turning the first frame of a stream into an active participant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("participant '{0}' is already connected")]
    DuplicateParticipant(String),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("invalid message content: {0}")]
    InvalidContent(String),

    #[error(transparent)]
    Publish(#[from] PublishError),
}
