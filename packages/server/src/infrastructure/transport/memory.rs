//! In-process loopback transport.
//!
//! `memory_transport` returns the server-side halves plus a `MemoryPeer`
//! that plays the remote participant. The peer's receive buffer is bounded,
//! so a peer that stops reading eventually stalls the write loop just like a
//! slow network client.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{ChatMessage, FrameReader, FrameWriter, InboundFrame, TransportError};

type FrameResult = Result<InboundFrame, TransportError>;

/// Create a connected transport with `buffer` frames of capacity per direction
pub fn memory_transport(buffer: usize) -> (MemoryFrameReader, MemoryFrameWriter, MemoryPeer) {
    let buffer = buffer.max(1);
    let (frames_tx, frames_rx) = mpsc::channel(buffer);
    let (delivered_tx, delivered_rx) = mpsc::channel(buffer);
    (
        MemoryFrameReader { frames: frames_rx },
        MemoryFrameWriter {
            delivered: Some(delivered_tx),
        },
        MemoryPeer {
            frames: Some(frames_tx),
            delivered: delivered_rx,
        },
    )
}

pub struct MemoryFrameReader {
    frames: mpsc::Receiver<FrameResult>,
}

#[async_trait]
impl FrameReader for MemoryFrameReader {
    async fn next_frame(&mut self) -> Result<Option<InboundFrame>, TransportError> {
        match self.frames.recv().await {
            Some(frame) => frame.map(Some),
            None => Ok(None),
        }
    }
}

pub struct MemoryFrameWriter {
    delivered: Option<mpsc::Sender<ChatMessage>>,
}

#[async_trait]
impl FrameWriter for MemoryFrameWriter {
    async fn write_frame(&mut self, message: &ChatMessage) -> Result<(), TransportError> {
        let Some(delivered) = &self.delivered else {
            return Err(TransportError::Closed);
        };
        delivered
            .send(message.clone())
            .await
            .map_err(|_| TransportError::Closed)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.delivered = None;
        Ok(())
    }
}

/// The remote end of a loopback transport
pub struct MemoryPeer {
    frames: Option<mpsc::Sender<FrameResult>>,
    delivered: mpsc::Receiver<ChatMessage>,
}

impl MemoryPeer {
    /// Send a frame to the server
    pub async fn send(&self, frame: InboundFrame) -> Result<(), TransportError> {
        let Some(frames) = &self.frames else {
            return Err(TransportError::Closed);
        };
        frames
            .send(Ok(frame))
            .await
            .map_err(|_| TransportError::Closed)
    }

    /// End the inbound stream cleanly; the peer keeps receiving
    pub fn end_stream(&mut self) {
        self.frames = None;
    }

    /// Fail the inbound stream with `error` and drop the peer entirely
    pub async fn disconnect_with_error(self, error: TransportError) {
        if let Some(frames) = &self.frames {
            // The server may already be gone; nothing to report then.
            let _ = frames.send(Err(error)).await;
        }
    }

    /// Next message written by the server; `None` once the server closed its side
    pub async fn recv(&mut self) -> Option<ChatMessage> {
        self.delivered.recv().await
    }

    /// A message that is already buffered, without waiting
    pub fn try_recv(&mut self) -> Option<ChatMessage> {
        self.delivered.try_recv().ok()
    }
}
