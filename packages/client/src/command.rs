//! Prompt input parsing.

/// One line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// Send the text as a chat message
    Say(String),
    /// Show the command list
    Help,
    /// Leave the room and exit
    Quit,
    /// A `/command` the client does not know
    Unknown(String),
}

impl InputCommand {
    /// Parse a prompt line; blank lines yield `None`
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let command = match line {
            "/help" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            _ if line.starts_with('/') => Self::Unknown(line.to_string()),
            _ => Self::Say(line.to_string()),
        };
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_message() {
        // テスト項目: コマンドでない入力は前後の空白を除いてメッセージになる
        // given (前提条件):
        let line = "  hello world ";

        // when (操作):
        let command = InputCommand::parse(line);

        // then (期待する結果):
        assert_eq!(command, Some(InputCommand::Say("hello world".to_string())));
    }

    #[test]
    fn test_quit_and_exit_are_equivalent() {
        // テスト項目: /quit と /exit はどちらも終了コマンド
        // given (前提条件):
        let lines = ["/quit", "/exit"];

        // when (操作):
        let commands: Vec<_> = lines.iter().map(|l| InputCommand::parse(l)).collect();

        // then (期待する結果):
        assert_eq!(commands, vec![Some(InputCommand::Quit), Some(InputCommand::Quit)]);
    }

    #[test]
    fn test_help_and_unknown_commands() {
        // テスト項目: /help はヘルプ、未知のスラッシュコマンドは Unknown になる
        // given (前提条件):
        let help = "/help";
        let unknown = "/dance";

        // when (操作):
        let help = InputCommand::parse(help);
        let unknown = InputCommand::parse(unknown);

        // then (期待する結果):
        assert_eq!(help, Some(InputCommand::Help));
        assert_eq!(unknown, Some(InputCommand::Unknown("/dance".to_string())));
    }

    #[test]
    fn test_blank_line_is_ignored() {
        // テスト項目: 空行は何も送らない
        // given (前提条件):
        let line = "   ";

        // when (操作):
        let command = InputCommand::parse(line);

        // then (期待する結果):
        assert_eq!(command, None);
    }
}
