//! Data Transfer Objects (DTOs) for the hub.
//!
//! DTOs are organized by protocol:
//! - `websocket`: wire frames exchanged over a participant stream
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
