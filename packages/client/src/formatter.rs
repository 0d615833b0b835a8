//! Message formatting utilities for client display.

use hiroba_server::infrastructure::dto::websocket::{ChatMessage, MessageType};
use hiroba_shared::time::timestamp_to_local_clock;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a broadcast frame for the terminal
    ///
    /// # Arguments
    ///
    /// * `message` - The frame received from the server
    /// * `me` - The current participant's id (to mark own messages)
    pub fn format_message(message: &ChatMessage, me: &str) -> String {
        let time = timestamp_to_local_clock(message.timestamp);
        match message.r#type {
            MessageType::Join => format!("\n[{}] + {}\n", time, message.content),
            MessageType::Leave => format!("\n[{}] - {}\n", time, message.content),
            MessageType::System => format!("\n[{}] ! {}\n", time, message.content),
            MessageType::Text => {
                let me_suffix = if message.sender_id == me { " (me)" } else { "" };
                format!(
                    "\n[{}] {}{}: {}\n",
                    time, message.sender_name, me_suffix, message.content
                )
            }
        }
    }

    /// Format a text frame that could not be decoded
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    /// Greeting shown once connected
    pub fn format_welcome(name: &str) -> String {
        format!(
            "\nYou are '{}'. Type messages and press Enter to send. Type /help for commands.\n",
            name
        )
    }

    pub fn format_help() -> String {
        "\nCommands:\n  /help          show this help\n  /quit, /exit   leave the room and exit\n"
            .to_string()
    }

    pub fn format_unknown_command(command: &str) -> String {
        format!("\nUnknown command '{}'. Type /help for commands.\n", command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_message(r#type: MessageType, sender: &str, content: &str) -> ChatMessage {
        let mut message = ChatMessage::from_client(r#type, sender, sender, content);
        message.timestamp = 1_700_000_000_000;
        message
    }

    #[test]
    fn test_format_text_message_from_other() {
        // テスト項目: 他の参加者の発言は時刻・名前・本文で表示される
        // given (前提条件):
        let message = create_message(MessageType::Text, "bob", "hi");

        // when (操作):
        let formatted = MessageFormatter::format_message(&message, "alice");

        // then (期待する結果):
        let time = timestamp_to_local_clock(1_700_000_000_000);
        assert_eq!(formatted, format!("\n[{}] bob: hi\n", time));
    }

    #[test]
    fn test_format_own_text_message() {
        // テスト項目: 自分の発言には (me) が付く
        // given (前提条件):
        let message = create_message(MessageType::Text, "alice", "hello");

        // when (操作):
        let formatted = MessageFormatter::format_message(&message, "alice");

        // then (期待する結果):
        assert!(formatted.contains("alice (me): hello"));
    }

    #[test]
    fn test_format_join_and_leave() {
        // テスト項目: 参加・退出通知は記号付きで本文を表示する
        // given (前提条件):
        let join = create_message(MessageType::Join, "bob", "bob joined");
        let leave = create_message(MessageType::Leave, "bob", "bob left");

        // when (操作):
        let join = MessageFormatter::format_message(&join, "alice");
        let leave = MessageFormatter::format_message(&leave, "alice");

        // then (期待する結果):
        assert!(join.ends_with("+ bob joined\n"));
        assert!(leave.ends_with("- bob left\n"));
    }

    #[test]
    fn test_format_system_notice() {
        // テスト項目: システム通知は ! 付きで表示される
        // given (前提条件):
        let notice = create_message(MessageType::System, "system", "server is restarting");

        // when (操作):
        let formatted = MessageFormatter::format_message(&notice, "alice");

        // then (期待する結果):
        assert!(formatted.ends_with("! server is restarting\n"));
    }

    #[test]
    fn test_format_help_lists_commands() {
        // テスト項目: ヘルプに全コマンドが含まれる
        // given (前提条件):
        let commands = ["/help", "/quit", "/exit"];

        // when (操作):
        let help = MessageFormatter::format_help();

        // then (期待する結果):
        for command in commands {
            assert!(help.contains(command));
        }
    }
}
