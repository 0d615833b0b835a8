//! UseCase: 参加者切断処理
//!
//! レジストリからの削除と退出通知（Leave）の発行を、セッションの後始末から
//! 別々に呼べるように分けています。間に送信キューのクローズが入るためです。

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatMessage, ConnectionRegistry, ParticipantHandle, ParticipantId, RegistryError, RoomId,
    Timestamp,
};

use super::{broadcast_hub::BroadcastHub, error::PublishError};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    hub: BroadcastHub,
    clock: Arc<dyn Clock>,
    room_id: RoomId,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        hub: BroadcastHub,
        clock: Arc<dyn Clock>,
        room_id: RoomId,
    ) -> Self {
        Self {
            registry,
            hub,
            clock,
            room_id,
        }
    }

    /// Remove the participant from fan-out.
    ///
    /// Returns `false` when it was already gone; that is not an error.
    pub async fn unregister(&self, id: &ParticipantId) -> bool {
        match self.registry.unregister(id).await {
            Ok(_) => true,
            Err(RegistryError::NotFound(_)) => {
                tracing::debug!("Participant '{}' was already unregistered", id);
                false
            }
            Err(e) => {
                tracing::warn!("Failed to unregister participant '{}': {}", id, e);
                false
            }
        }
    }

    /// Broadcast that `participant` left
    pub async fn announce_leave(&self, participant: &ParticipantHandle) -> Result<(), PublishError> {
        let message = ChatMessage::leave_announcement(
            participant.id().clone(),
            participant.name().clone(),
            self.room_id.clone(),
            Timestamp::new(self.clock.now_millis()),
        );
        self.hub.publish(message).await?;
        tracing::info!("Participant '{}' left", participant.id());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DisplayName, MessageKind},
        infrastructure::registry::InMemoryConnectionRegistry,
        usecase::broadcast_hub::HubConfig,
    };
    use hiroba_shared::time::FixedClock;
    use std::{num::NonZeroUsize, time::Duration};
    use tokio::time::timeout;

    fn create_handle(id: &str) -> Arc<ParticipantHandle> {
        ParticipantHandle::new(
            ParticipantId::new(id.to_string()).unwrap(),
            DisplayName::new(id.to_string()).unwrap(),
            Timestamp::new(0),
            NonZeroUsize::new(4).unwrap(),
        )
        .0
    }

    #[tokio::test]
    async fn test_unregister_twice_is_harmless() {
        // テスト項目: 2 回目の削除は false を返すだけでエラーにならない
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let (hub, _task) = BroadcastHub::start(registry.clone(), HubConfig::default());
        let usecase = DisconnectParticipantUseCase::new(
            registry.clone(),
            hub,
            Arc::new(FixedClock::new(5)),
            RoomId::general(),
        );
        let handle = create_handle("alice");
        registry.register(handle.clone()).await.unwrap();

        // when (操作):
        let first = usecase.unregister(handle.id()).await;
        let second = usecase.unregister(handle.id()).await;

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn test_leave_reaches_remaining_participants() {
        // テスト項目: 退出通知は残っている参加者に届く
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let (hub, _task) = BroadcastHub::start(registry.clone(), HubConfig::default());
        let usecase = DisconnectParticipantUseCase::new(
            registry.clone(),
            hub,
            Arc::new(FixedClock::new(5)),
            RoomId::general(),
        );
        let leaving = create_handle("alice");
        let (staying, mut staying_rx) = ParticipantHandle::new(
            ParticipantId::new("bob".to_string()).unwrap(),
            DisplayName::new("Bob".to_string()).unwrap(),
            Timestamp::new(0),
            NonZeroUsize::new(4).unwrap(),
        );
        registry.register(staying).await.unwrap();

        // when (操作):
        usecase.announce_leave(&leaving).await.unwrap();

        // then (期待する結果):
        let message = timeout(Duration::from_secs(1), staying_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(message.kind, MessageKind::Leave);
        assert_eq!(message.sender_id.as_str(), "alice");
        assert_eq!(message.content.as_str(), "alice left");
        assert_eq!(message.timestamp, Timestamp::new(5));
    }
}
