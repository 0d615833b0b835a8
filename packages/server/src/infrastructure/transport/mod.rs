//! Frame transports
//!
//! - `websocket`: axum WebSocket（本番用）
//! - `memory`: プロセス内のループバック（テスト・組み込み用）

pub mod memory;
pub mod websocket;

pub use memory::{MemoryFrameReader, MemoryFrameWriter, MemoryPeer, memory_transport};
pub use websocket::{WebSocketFrameReader, WebSocketFrameWriter, split_websocket};
