//! UseCase 層
//!
//! ハブのディスパッチ、参加・退出、メッセージ送信、そして一接続分の
//! セッション（読み取り・書き込みループ）を組み立てます。

pub mod broadcast_hub;
pub mod connect_participant;
pub mod disconnect_participant;
pub mod error;
pub mod participant_session;
pub mod send_message;

pub use broadcast_hub::{BroadcastHub, HubConfig, HubStatsSnapshot};
pub use connect_participant::{ConnectParticipantUseCase, JoinedParticipant};
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{JoinError, PublishError, SendMessageError};
pub use participant_session::{CloseReason, ParticipantSession, SessionReport, SessionSettings};
pub use send_message::SendMessageUseCase;
