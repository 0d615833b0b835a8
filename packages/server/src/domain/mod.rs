//! ドメイン層
//!
//! ブロードキャストハブの中核となる型と、外部協調者（レジストリ・トランスポート）
//! への境界となる trait を定義します。具体的な実装は Infrastructure 層が提供します。

pub mod connection;
pub mod entity;
pub mod error;
pub mod registry;
pub mod session;
pub mod transport;
pub mod value_object;

pub use connection::{OfferOutcome, OutboundReceiver, ParticipantHandle};
pub use entity::{ChatMessage, InboundFrame, MessageKind, Participant};
pub use error::{RegistryError, SessionError, TransportError, ValueObjectError};
pub use registry::ConnectionRegistry;
pub use session::{SessionLifecycle, SessionState};
pub use transport::{FrameReader, FrameWriter};
pub use value_object::{DisplayName, MessageContent, MessageId, ParticipantId, RoomId, Timestamp};
