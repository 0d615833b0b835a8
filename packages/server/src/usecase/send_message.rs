//! UseCase: メッセージ送信処理

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{ChatMessage, MessageContent, MessageId, ParticipantHandle, RoomId, Timestamp};

use super::{broadcast_hub::BroadcastHub, error::SendMessageError};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    hub: BroadcastHub,
    clock: Arc<dyn Clock>,
    room_id: RoomId,
}

impl SendMessageUseCase {
    pub fn new(hub: BroadcastHub, clock: Arc<dyn Clock>, room_id: RoomId) -> Self {
        Self {
            hub,
            clock,
            room_id,
        }
    }

    /// Publish `content` as a chat message from `sender`.
    ///
    /// The sender identity, message id and timestamp are always assigned
    /// here. Blank content is skipped and yields `Ok(None)`.
    pub async fn execute(
        &self,
        sender: &ParticipantHandle,
        content: String,
    ) -> Result<Option<MessageId>, SendMessageError> {
        let content = MessageContent::new(content)
            .map_err(|e| SendMessageError::InvalidContent(e.to_string()))?;
        if content.is_blank() {
            tracing::debug!("Ignoring blank message from '{}'", sender.id());
            return Ok(None);
        }

        let message = ChatMessage::text(
            sender.id().clone(),
            sender.name().clone(),
            content,
            self.room_id.clone(),
            Timestamp::new(self.clock.now_millis()),
        );
        let id = message.id.clone();
        self.hub.publish(message).await?;
        Ok(Some(id))
    }
}
