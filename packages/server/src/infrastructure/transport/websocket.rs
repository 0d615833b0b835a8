//! WebSocket を使った FrameReader / FrameWriter 実装
//!
//! ## 責務
//!
//! - Text フレームの JSON と DTO の相互変換
//! - Close フレームをストリーム終端として扱う
//!
//! ## 設計ノート
//!
//! WebSocket の受付は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は受け付けたソケットを読み書きの半分に分割して受け取ります。

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};

use crate::{
    domain::{ChatMessage, FrameReader, FrameWriter, InboundFrame, TransportError},
    infrastructure::dto::websocket as dto,
};

/// Decode one Text frame payload
pub fn decode_frame(text: &str) -> Result<InboundFrame, TransportError> {
    serde_json::from_str::<dto::ChatMessage>(text)
        .map(InboundFrame::from)
        .map_err(|e| TransportError::Decode(e.to_string()))
}

/// Encode a message as a Text frame payload
pub fn encode_message(message: &ChatMessage) -> Result<String, TransportError> {
    serde_json::to_string(&dto::ChatMessage::from(message))
        .map_err(|e| TransportError::Encode(e.to_string()))
}

/// Split an upgraded socket into its read and write halves
pub fn split_websocket(socket: WebSocket) -> (WebSocketFrameReader, WebSocketFrameWriter) {
    let (sink, stream) = socket.split();
    (
        WebSocketFrameReader { stream },
        WebSocketFrameWriter { sink },
    )
}

pub struct WebSocketFrameReader {
    stream: SplitStream<WebSocket>,
}

#[async_trait]
impl FrameReader for WebSocketFrameReader {
    async fn next_frame(&mut self) -> Result<Option<InboundFrame>, TransportError> {
        while let Some(msg) = self.stream.next().await {
            match msg.map_err(|e| TransportError::Io(e.to_string()))? {
                Message::Text(text) => return decode_frame(text.as_str()).map(Some),
                Message::Close(_) => return Ok(None),
                Message::Ping(_) | Message::Pong(_) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                    tracing::debug!("Received ping/pong");
                }
                Message::Binary(data) => {
                    tracing::warn!("Ignoring binary frame ({} bytes)", data.len());
                }
            }
        }
        Ok(None)
    }
}

pub struct WebSocketFrameWriter {
    sink: SplitSink<WebSocket, Message>,
}

#[async_trait]
impl FrameWriter for WebSocketFrameWriter {
    async fn write_frame(&mut self, message: &ChatMessage) -> Result<(), TransportError> {
        let json = encode_message(message)?;
        self.sink
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| TransportError::Io(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.sink
            .close()
            .await
            .map_err(|e| TransportError::Io(e.to_string()))
    }
}
