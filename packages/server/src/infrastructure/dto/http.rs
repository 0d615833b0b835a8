//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticipantDto {
    pub participant_id: String,
    pub display_name: String,
    /// RFC 3339 (UTC)
    pub joined_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HubStatsDto {
    pub published: u64,
    pub delivered: u64,
    pub dropped: u64,
    pub participants: usize,
}
