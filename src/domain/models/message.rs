use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::SessionId;

pub type ChatId = i64;
pub type MessageId = i64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseMode {
    Plain,
    Markdown,
}

/// A one-time reply keyboard, row by row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    pub rows: Vec<Vec<String>>,
}

impl Keyboard {
    pub fn single_row(buttons: Vec<String>) -> Keyboard {
        return Keyboard {
            rows: vec![buttons],
        };
    }

    pub fn cell_count(&self) -> usize {
        return self.rows.iter().map(|row| return row.len()).sum();
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub text: String,
    pub parse_mode: ParseMode,
    pub keyboard: Option<Keyboard>,
}

impl OutboundMessage {
    pub fn text(text: &str) -> OutboundMessage {
        return OutboundMessage {
            text: text.to_string(),
            parse_mode: ParseMode::Plain,
            keyboard: None,
        };
    }

    pub fn markdown(text: &str) -> OutboundMessage {
        return OutboundMessage {
            text: text.to_string(),
            parse_mode: ParseMode::Markdown,
            keyboard: None,
        };
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> OutboundMessage {
        self.keyboard = Some(keyboard);
        return self;
    }
}

/// A text message from a chat participant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage {
    pub session_id: SessionId,
    pub chat_id: ChatId,
    pub user_name: String,
    pub text: String,
}
