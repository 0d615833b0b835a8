//! Wire message schema.
//!
//! Every frame in both directions is one JSON object:
//!
//! ```json
//! {"id":"…","senderId":"alice","senderName":"Alice","content":"hi",
//!  "type":"text","roomId":"general","timestamp":1700000000000}
//! ```
//!
//! Clients may omit the server-owned fields (`id`, `roomId`, `timestamp`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Join,
    Leave,
    Text,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub content: String,
    pub r#type: MessageType,
    #[serde(default)]
    pub room_id: String,
    #[serde(default)]
    pub timestamp: i64,
}

impl ChatMessage {
    /// A client-originated frame; server-owned fields are left empty
    pub fn from_client(
        r#type: MessageType,
        sender_id: &str,
        sender_name: &str,
        content: &str,
    ) -> Self {
        Self {
            id: String::new(),
            sender_id: sender_id.to_string(),
            sender_name: sender_name.to_string(),
            content: content.to_string(),
            r#type,
            room_id: String::new(),
            timestamp: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_camel_case_fields() {
        // テスト項目: ワイヤー上のフィールド名は camelCase、type は小文字
        // given (前提条件):
        let msg = ChatMessage {
            id: "m1".to_string(),
            sender_id: "alice".to_string(),
            sender_name: "Alice".to_string(),
            content: "hi".to_string(),
            r#type: MessageType::Text,
            room_id: "general".to_string(),
            timestamp: 1000,
        };

        // when (操作):
        let value = serde_json::to_value(&msg).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            serde_json::json!({
                "id": "m1",
                "senderId": "alice",
                "senderName": "Alice",
                "content": "hi",
                "type": "text",
                "roomId": "general",
                "timestamp": 1000
            })
        );
    }

    #[test]
    fn test_deserializes_minimal_client_frame() {
        // テスト項目: サーバー所有のフィールドを省略したフレームを受理する
        // given (前提条件):
        let json = r#"{"senderId":"alice","senderName":"Alice","type":"join"}"#;

        // when (操作):
        let msg: ChatMessage = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            msg,
            ChatMessage::from_client(MessageType::Join, "alice", "Alice", "")
        );
    }

    #[test]
    fn test_rejects_unknown_type() {
        // テスト項目: 未知の type は復号エラーになる
        // when (操作):
        let result = serde_json::from_str::<ChatMessage>(r#"{"type":"shout"}"#);

        // then (期待する結果):
        assert!(result.is_err());
    }
}
