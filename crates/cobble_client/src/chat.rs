use std::collections::VecDeque;

use cobble_input::context::Chat;
use tracing::info;

const MAX_LINES: usize = 100;

/// Chat history plus messages waiting to go out to the server.
#[derive(Debug, Default)]
pub struct ChatLog {
    lines: VecDeque<String>,
    outgoing: Vec<String>,
}

impl ChatLog {
    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    pub fn take_outgoing(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outgoing)
    }

    fn push_line(&mut self, text: String) {
        if self.lines.len() == MAX_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(text);
    }
}

impl Chat for ChatLog {
    fn add_message(&mut self, text: &str) {
        info!("[chat] {text}");
        self.push_line(text.to_owned());
    }

    fn send_message(&mut self, text: &str) {
        let text = text.trim_end();
        if text.is_empty() {
            return;
        }
        self.outgoing.push(text.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use cobble_input::context::Chat;

    use super::{ChatLog, MAX_LINES};

    #[test]
    fn history_keeps_most_recent_lines() {
        let mut chat = ChatLog::default();
        for i in 0..MAX_LINES + 5 {
            chat.add_message(&format!("line {i}"));
        }

        assert_eq!(chat.lines.len(), MAX_LINES);
        assert_eq!(chat.lines.front().map(String::as_str), Some("line 5"));
        assert_eq!(chat.last(), Some("line 104"));
    }

    #[test]
    fn blank_messages_are_not_sent() {
        let mut chat = ChatLog::default();
        chat.send_message("   ");
        chat.send_message("/tp 1 2 3 ");

        assert_eq!(chat.take_outgoing(), vec!["/tp 1 2 3".to_string()]);
        assert!(chat.take_outgoing().is_empty());
    }
}
