//! Value Objects
//!
//! 検証済みの値のみを保持する型。生成に成功した時点で不変条件が保証されます。

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

const MAX_PARTICIPANT_ID_LEN: usize = 64;
const MAX_DISPLAY_NAME_LEN: usize = 64;
const MAX_CONTENT_LEN: usize = 4096;

/// The single room served by the hub.
pub const GENERAL_ROOM_ID: &str = "general";

/// Sender id used for server-generated system messages.
pub const SYSTEM_SENDER_ID: &str = "system";

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ValueObjectError> {
    let len = value.chars().count();
    if len > max {
        return Err(ValueObjectError::TooLong { field, len, max });
    }
    Ok(())
}

/// Participant identity, supplied by the first frame of a stream
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Leading/trailing whitespace is stripped before validation.
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(ValueObjectError::Empty("participant id"));
        }
        check_len("participant id", &value, MAX_PARTICIPANT_ID_LEN)?;
        Ok(Self(value))
    }

    pub fn system() -> Self {
        Self(SYSTEM_SENDER_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ParticipantId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human readable participant name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(ValueObjectError::Empty("display name"));
        }
        check_len("display name", &value, MAX_DISPLAY_NAME_LEN)?;
        Ok(Self(value))
    }

    /// Build a display name, falling back to the participant id when `value` is blank.
    pub fn or_participant_id(value: String, id: &ParticipantId) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Self::new(id.as_str().to_string());
        }
        Self::new(value)
    }

    pub fn system() -> Self {
        Self(SYSTEM_SENDER_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Message body. May be empty for non-text messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        check_len("message content", &value, MAX_CONTENT_LEN)?;
        Ok(Self(value))
    }

    /// Text composed by the server from already validated parts
    pub(crate) fn server_generated(value: String) -> Self {
        Self(value)
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque server-assigned message token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(ValueObjectError::Empty("room id"));
        }
        Ok(Self(value))
    }

    pub fn general() -> Self {
        Self(GENERAL_ROOM_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::general()
    }
}

/// Unix timestamp in milliseconds (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
