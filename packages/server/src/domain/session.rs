//! Session lifecycle state machine.
//!
//! ```text
//! Connecting ──> Active ──> Terminating ──> Closed
//!      └───────────────────────┘
//! ```
//!
//! Connecting may go straight to Terminating when the stream ends or is
//! rejected before an identity is established. Closed is terminal.

use super::error::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Stream opened, no identity yet
    Connecting,
    /// Identity established, registered, fan-out enabled
    Active,
    /// A loop has ended, teardown in progress
    Terminating,
    /// All resources released
    Closed,
}

impl SessionState {
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Connecting, Active)
                | (Connecting, Terminating)
                | (Active, Terminating)
                | (Terminating, Closed)
        )
    }
}

/// Tracks one connection's state and whether it ever became Active.
#[derive(Debug)]
pub struct SessionLifecycle {
    state: SessionState,
    was_active: bool,
}

impl SessionLifecycle {
    pub fn new() -> Self {
        Self {
            state: SessionState::Connecting,
            was_active: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// A Leave announcement is owed iff this is true
    pub fn was_active(&self) -> bool {
        self.was_active
    }

    pub fn activate(&mut self) -> Result<(), SessionError> {
        self.transition(SessionState::Active)?;
        self.was_active = true;
        Ok(())
    }

    pub fn terminate(&mut self) -> Result<(), SessionError> {
        self.transition(SessionState::Terminating)
    }

    pub fn close(&mut self) -> Result<(), SessionError> {
        self.transition(SessionState::Closed)
    }

    fn transition(&mut self, next: SessionState) -> Result<(), SessionError> {
        if !self.state.can_transition_to(next) {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!("Session transition {:?} -> {:?}", self.state, next);
        self.state = next;
        Ok(())
    }
}

impl Default for SessionLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
