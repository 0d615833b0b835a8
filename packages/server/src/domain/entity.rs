//! Domain entities.

use super::value_object::{
    DisplayName, MessageContent, MessageId, ParticipantId, RoomId, Timestamp,
};

/// Discriminates what a message means to the room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Join,
    Leave,
    Text,
    System,
}

/// A message on its way through the hub.
///
/// Constructed once by the server and shared between outbound queues as
/// `Arc<ChatMessage>`; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender_id: ParticipantId,
    pub sender_name: DisplayName,
    pub content: MessageContent,
    pub kind: MessageKind,
    pub room_id: RoomId,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// A chat message from a registered participant
    pub fn text(
        sender_id: ParticipantId,
        sender_name: DisplayName,
        content: MessageContent,
        room_id: RoomId,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: MessageId::generate(),
            sender_id,
            sender_name,
            content,
            kind: MessageKind::Text,
            room_id,
            timestamp,
        }
    }

    /// Announcement that `name` entered the room
    pub fn join_announcement(
        id: ParticipantId,
        name: DisplayName,
        room_id: RoomId,
        timestamp: Timestamp,
    ) -> Self {
        let content = MessageContent::server_generated(format!("{} joined", name));
        Self {
            id: MessageId::generate(),
            sender_id: id,
            sender_name: name,
            content,
            kind: MessageKind::Join,
            room_id,
            timestamp,
        }
    }

    /// Announcement that `name` left the room
    pub fn leave_announcement(
        id: ParticipantId,
        name: DisplayName,
        room_id: RoomId,
        timestamp: Timestamp,
    ) -> Self {
        let content = MessageContent::server_generated(format!("{} left", name));
        Self {
            id: MessageId::generate(),
            sender_id: id,
            sender_name: name,
            content,
            kind: MessageKind::Leave,
            room_id,
            timestamp,
        }
    }

    /// A server-generated notice
    pub fn system(content: MessageContent, room_id: RoomId, timestamp: Timestamp) -> Self {
        Self {
            id: MessageId::generate(),
            sender_id: ParticipantId::system(),
            sender_name: DisplayName::system(),
            content,
            kind: MessageKind::System,
            room_id,
            timestamp,
        }
    }
}

/// A decoded client frame whose fields are not trusted yet.
///
/// Server-owned fields (id, room, timestamp) are never taken from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFrame {
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
    pub kind: MessageKind,
}

impl InboundFrame {
    pub fn join(sender_id: &str, sender_name: &str) -> Self {
        Self {
            sender_id: sender_id.to_string(),
            sender_name: sender_name.to_string(),
            content: String::new(),
            kind: MessageKind::Join,
        }
    }

    pub fn text(sender_id: &str, sender_name: &str, content: &str) -> Self {
        Self {
            sender_id: sender_id.to_string(),
            sender_name: sender_name.to_string(),
            content: content.to_string(),
            kind: MessageKind::Text,
        }
    }

    pub fn leave(sender_id: &str) -> Self {
        Self {
            sender_id: sender_id.to_string(),
            sender_name: String::new(),
            content: String::new(),
            kind: MessageKind::Leave,
        }
    }

    /// Whether this frame may open a session
    pub fn carries_identity(&self) -> bool {
        self.kind == MessageKind::Join || !self.sender_id.trim().is_empty()
    }
}

/// A registered participant as seen from the outside
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: DisplayName,
    pub joined_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> (ParticipantId, DisplayName) {
        (
            ParticipantId::new("alice".to_string()).unwrap(),
            DisplayName::new("Alice".to_string()).unwrap(),
        )
    }

    #[test]
    fn test_join_announcement_names_the_participant() {
        // テスト項目: 参加通知は参加者の名前を含む Join メッセージになる
        // given (前提条件):
        let (id, name) = alice();

        // when (操作):
        let msg = ChatMessage::join_announcement(id.clone(), name, RoomId::general(), Timestamp::new(1));

        // then (期待する結果):
        assert_eq!(msg.kind, MessageKind::Join);
        assert_eq!(msg.sender_id, id);
        assert_eq!(msg.content.as_str(), "Alice joined");
        assert_eq!(msg.room_id.as_str(), "general");
    }

    #[test]
    fn test_leave_announcement_names_the_participant() {
        // テスト項目: 退出通知は参加者の名前を含む Leave メッセージになる
        // given (前提条件):
        let (id, name) = alice();

        // when (操作):
        let msg = ChatMessage::leave_announcement(id, name, RoomId::general(), Timestamp::new(2));

        // then (期待する結果):
        assert_eq!(msg.kind, MessageKind::Leave);
        assert_eq!(msg.content.as_str(), "Alice left");
        assert_eq!(msg.timestamp, Timestamp::new(2));
    }

    #[test]
    fn test_system_message_uses_system_sender() {
        // テスト項目: システムメッセージの送信者は system
        // when (操作):
        let msg = ChatMessage::system(
            MessageContent::new("hello".to_string()).unwrap(),
            RoomId::general(),
            Timestamp::new(3),
        );

        // then (期待する結果):
        assert_eq!(msg.kind, MessageKind::System);
        assert_eq!(msg.sender_id.as_str(), "system");
    }

    #[test]
    fn test_carries_identity() {
        // テスト項目: Join フレーム、または送信者 ID を持つフレームのみがセッションを開始できる
        // then (期待する結果):
        assert!(InboundFrame::join("", "").carries_identity());
        assert!(InboundFrame::text("alice", "", "hi").carries_identity());
        assert!(!InboundFrame::text("  ", "", "hi").carries_identity());
    }
}
