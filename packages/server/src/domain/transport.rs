//! Frame transport traits.
//!
//! The hub is agnostic to the concrete transport. A transport only has to
//! deliver an ordered sequence of decoded frames per connection and accept
//! messages to write back.

use async_trait::async_trait;

use super::{
    entity::{ChatMessage, InboundFrame},
    error::TransportError,
};

/// Inbound half of a participant stream, owned by the read loop
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FrameReader: Send {
    /// Next decoded frame. `Ok(None)` means the peer ended the stream cleanly.
    async fn next_frame(&mut self) -> Result<Option<InboundFrame>, TransportError>;
}

/// Outbound half of a participant stream, owned by the write loop
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FrameWriter: Send {
    async fn write_frame(&mut self, message: &ChatMessage) -> Result<(), TransportError>;

    /// Best-effort close of the outbound direction
    async fn close(&mut self) -> Result<(), TransportError>;
}
