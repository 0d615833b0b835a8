//! Domain logic for client-side operations.
//!
//! Pure functions and state without side effects, so they are easy to test.

use hiroba_server::infrastructure::dto::websocket::{ChatMessage, MessageType};

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
///
/// A rejection (duplicate participant id, invalid identity) would only be
/// rejected again on reconnect.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::Rejected(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }
    current_attempt < max_attempts
}

/// What the client has learned about its own membership on one connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipState {
    participant_id: String,
    joined: bool,
    rejection: Option<String>,
}

impl MembershipState {
    pub fn new(participant_id: &str) -> Self {
        Self {
            participant_id: participant_id.to_string(),
            joined: false,
            rejection: None,
        }
    }

    /// Update the state from a frame the server sent
    pub fn observe(&mut self, message: &ChatMessage) {
        match message.r#type {
            MessageType::Join if message.sender_id == self.participant_id => self.joined = true,
            // A notice before our own Join is the reason the server closes on us.
            MessageType::System if !self.joined => self.rejection = Some(message.content.clone()),
            _ => {}
        }
    }

    pub fn is_joined(&self) -> bool {
        self.joined
    }

    /// The error to report once the server has closed the connection
    pub fn close_error(&self) -> ClientError {
        match (&self.rejection, self.joined) {
            (Some(reason), false) => ClientError::Rejected(reason.clone()),
            _ => ClientError::ConnectionError("Connection lost".to_string()),
        }
    }
}
