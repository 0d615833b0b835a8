//! Server configuration.

use std::{num::NonZeroUsize, time::Duration};

use thiserror::Error;

use crate::{
    domain::RoomId,
    usecase::{HubConfig, SessionSettings},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be at least 1")]
    ZeroCapacity(&'static str),

    #[error("invalid room id: {0}")]
    InvalidRoomId(String),
}

/// Everything needed to start a hub server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Capacity of the shared inbound queue
    pub inbound_capacity: usize,
    /// Capacity of each participant's outbound queue
    pub outbound_capacity: usize,
    /// Deliver Text messages back to their sender
    pub echo_to_sender: bool,
    pub room_id: String,
    /// How long a closing session waits for its loops
    pub shutdown_grace: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            inbound_capacity: 100,
            outbound_capacity: 10,
            echo_to_sender: true,
            room_id: crate::domain::value_object::GENERAL_ROOM_ID.to_string(),
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.hub_config()?;
        self.session_settings()?;
        Ok(())
    }

    pub fn hub_config(&self) -> Result<HubConfig, ConfigError> {
        Ok(HubConfig {
            inbound_capacity: non_zero(self.inbound_capacity, "inbound capacity")?,
            echo_to_sender: self.echo_to_sender,
        })
    }

    pub fn session_settings(&self) -> Result<SessionSettings, ConfigError> {
        let outbound_capacity = non_zero(self.outbound_capacity, "outbound capacity")?;
        let room_id = RoomId::new(self.room_id.clone())
            .map_err(|e| ConfigError::InvalidRoomId(e.to_string()))?;
        Ok(SessionSettings {
            room_id,
            outbound_capacity,
            shutdown_grace: self.shutdown_grace,
        })
    }
}

fn non_zero(capacity: usize, name: &'static str) -> Result<NonZeroUsize, ConfigError> {
    NonZeroUsize::new(capacity).ok_or(ConfigError::ZeroCapacity(name))
}
