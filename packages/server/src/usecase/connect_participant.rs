//! UseCase: 参加者接続処理
//!
//! ストリームの最初のフレームから参加者の身元を確定し、レジストリへ登録して
//! 参加通知（Join）をブロードキャストします。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - Join 通知が発行されるのは登録に成功した場合だけであることを保証
//! - 重複した参加者 ID の接続は明示的に失敗し、既存の接続に影響しないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：Join フレーム、送信者 ID 付きの Text フレーム
//! - 異常系：身元を持たない最初のフレーム、重複 ID、予約済み ID
//! - エッジケース：表示名が空の場合は参加者 ID を表示名にする

use std::{num::NonZeroUsize, sync::Arc};

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatMessage, ConnectionRegistry, DisplayName, InboundFrame, MessageKind,
    OutboundReceiver, ParticipantHandle, ParticipantId, RegistryError, RoomId, Timestamp,
    value_object::SYSTEM_SENDER_ID,
};

use super::{broadcast_hub::BroadcastHub, error::JoinError};

/// A participant that has been registered and announced
pub struct JoinedParticipant {
    pub handle: Arc<ParticipantHandle>,
    /// Consumer side of the handle's outbound queue, for the write loop
    pub outbound: OutboundReceiver,
    /// Content of a first frame that was a chat message
    pub first_text: Option<String>,
}

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    hub: BroadcastHub,
    clock: Arc<dyn Clock>,
    room_id: RoomId,
    outbound_capacity: NonZeroUsize,
}

impl ConnectParticipantUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        hub: BroadcastHub,
        clock: Arc<dyn Clock>,
        room_id: RoomId,
        outbound_capacity: NonZeroUsize,
    ) -> Self {
        Self {
            registry,
            hub,
            clock,
            room_id,
            outbound_capacity,
        }
    }

    /// 最初のフレームで参加者を登録し、Join 通知をブロードキャストする
    ///
    /// # Returns
    ///
    /// * `Ok(JoinedParticipant)` - 登録と Join 通知に成功
    /// * `Err(JoinError)` - 身元が不正、重複、またはハブが停止済み（何も登録されていない）
    pub async fn execute(&self, frame: InboundFrame) -> Result<JoinedParticipant, JoinError> {
        if !frame.carries_identity() {
            return Err(JoinError::ProtocolViolation(
                "first frame must be a join or carry a sender id".to_string(),
            ));
        }

        let id = ParticipantId::new(frame.sender_id)
            .map_err(|e| JoinError::ProtocolViolation(e.to_string()))?;
        if id.as_str() == SYSTEM_SENDER_ID {
            return Err(JoinError::ProtocolViolation(format!(
                "participant id '{}' is reserved",
                SYSTEM_SENDER_ID
            )));
        }
        let name = DisplayName::or_participant_id(frame.sender_name, &id)
            .map_err(|e| JoinError::ProtocolViolation(e.to_string()))?;

        // Content is checked when it is published, like any later Text.
        let first_text = match frame.kind {
            MessageKind::Text => Some(frame.content),
            _ => None,
        };

        let joined_at = Timestamp::new(self.clock.now_millis());
        let (handle, outbound) =
            ParticipantHandle::new(id.clone(), name.clone(), joined_at, self.outbound_capacity);

        self.registry
            .register(handle.clone())
            .await
            .map_err(|e| match e {
                RegistryError::AlreadyExists(id) => JoinError::DuplicateParticipant(id),
                other => JoinError::ProtocolViolation(other.to_string()),
            })?;

        let announcement =
            ChatMessage::join_announcement(id.clone(), name, self.room_id.clone(), joined_at);
        if let Err(e) = self.hub.publish(announcement).await {
            // Without a Join there must be no registration either.
            let _ = self.registry.unregister(&id).await;
            return Err(e.into());
        }

        tracing::info!("Participant '{}' joined as '{}'", id, handle.name());
        Ok(JoinedParticipant {
            handle,
            outbound,
            first_text,
        })
    }
}
