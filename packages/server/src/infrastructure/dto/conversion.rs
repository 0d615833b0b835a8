//! Conversion logic between DTOs and domain entities.

use hiroba_shared::time::timestamp_to_rfc3339;

use crate::domain::{ChatMessage, InboundFrame, MessageKind, Participant};
use crate::infrastructure::dto::{http as http_dto, websocket as dto};

// ========================================
// DTO → Domain Entity
// ========================================

impl From<dto::MessageType> for MessageKind {
    fn from(value: dto::MessageType) -> Self {
        match value {
            dto::MessageType::Join => MessageKind::Join,
            dto::MessageType::Leave => MessageKind::Leave,
            dto::MessageType::Text => MessageKind::Text,
            dto::MessageType::System => MessageKind::System,
        }
    }
}

impl From<dto::ChatMessage> for InboundFrame {
    fn from(dto: dto::ChatMessage) -> Self {
        // id, room_id and timestamp are server-owned and discarded here
        Self {
            sender_id: dto.sender_id,
            sender_name: dto.sender_name,
            content: dto.content,
            kind: dto.r#type.into(),
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<MessageKind> for dto::MessageType {
    fn from(value: MessageKind) -> Self {
        match value {
            MessageKind::Join => dto::MessageType::Join,
            MessageKind::Leave => dto::MessageType::Leave,
            MessageKind::Text => dto::MessageType::Text,
            MessageKind::System => dto::MessageType::System,
        }
    }
}

impl From<&ChatMessage> for dto::ChatMessage {
    fn from(model: &ChatMessage) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            sender_id: model.sender_id.as_str().to_string(),
            sender_name: model.sender_name.as_str().to_string(),
            content: model.content.as_str().to_string(),
            r#type: model.kind.into(),
            room_id: model.room_id.as_str().to_string(),
            timestamp: model.timestamp.value(),
        }
    }
}

impl From<Participant> for http_dto::ParticipantDto {
    fn from(model: Participant) -> Self {
        Self {
            participant_id: model.id.into_string(),
            display_name: model.name.as_str().to_string(),
            joined_at: timestamp_to_rfc3339(model.joined_at.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, MessageContent, ParticipantId, RoomId, Timestamp};

    #[test]
    fn test_dto_to_inbound_frame_discards_server_fields() {
        // テスト項目: DTO からの変換ではサーバー所有のフィールドが捨てられる
        // given (前提条件):
        let dto_msg = dto::ChatMessage {
            id: "forged".to_string(),
            sender_id: "alice".to_string(),
            sender_name: "Alice".to_string(),
            content: "Hello!".to_string(),
            r#type: dto::MessageType::Text,
            room_id: "elsewhere".to_string(),
            timestamp: 42,
        };

        // when (操作):
        let frame: InboundFrame = dto_msg.into();

        // then (期待する結果):
        assert_eq!(frame, InboundFrame::text("alice", "Alice", "Hello!"));
    }

    #[test]
    fn test_domain_chat_message_to_dto() {
        // テスト項目: ドメインエンティティの ChatMessage が DTO に変換される
        // given (前提条件):
        let domain_msg = ChatMessage::text(
            ParticipantId::new("bob".to_string()).unwrap(),
            DisplayName::new("Bob".to_string()).unwrap(),
            MessageContent::new("Hi!".to_string()).unwrap(),
            RoomId::general(),
            Timestamp::new(2000),
        );

        // when (操作):
        let dto_msg = dto::ChatMessage::from(&domain_msg);

        // then (期待する結果):
        assert_eq!(dto_msg.id, domain_msg.id.as_str());
        assert_eq!(dto_msg.sender_id, "bob");
        assert_eq!(dto_msg.sender_name, "Bob");
        assert_eq!(dto_msg.content, "Hi!");
        assert_eq!(dto_msg.room_id, "general");
        assert_eq!(dto_msg.timestamp, 2000);
        assert_eq!(dto_msg.r#type, dto::MessageType::Text);
    }

    #[test]
    fn test_domain_participant_to_dto() {
        // テスト項目: ドメインエンティティの Participant が DTO に変換される
        // given (前提条件):
        let participant = Participant {
            id: ParticipantId::new("bob".to_string()).unwrap(),
            name: DisplayName::new("Bob".to_string()).unwrap(),
            joined_at: Timestamp::new(1672531200000),
        };

        // when (操作):
        let dto_participant: http_dto::ParticipantDto = participant.into();

        // then (期待する結果):
        assert_eq!(dto_participant.participant_id, "bob");
        assert_eq!(dto_participant.display_name, "Bob");
        assert!(dto_participant.joined_at.starts_with("2023-01-01T00:00:00"));
    }
}
