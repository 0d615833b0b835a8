//! Domain error types.

use thiserror::Error;

use super::session::SessionState;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} is too long ({len} > {max} characters)")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

/// Connection registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// At most one connection per participant id
    #[error("participant '{0}' is already registered")]
    AlreadyExists(String),

    #[error("participant '{0}' is not registered")]
    NotFound(String),
}

/// Errors reported by a frame transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The peer is gone
    #[error("transport closed")]
    Closed,

    /// A frame arrived but could not be decoded
    #[error("malformed frame: {0}")]
    Decode(String),

    #[error("failed to encode frame: {0}")]
    Encode(String),

    #[error("transport I/O error: {0}")]
    Io(String),
}

/// Session lifecycle errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("invalid session transition from {from:?} to {to:?}")]
    InvalidTransition { from: SessionState, to: SessionState },
}
