use thiserror::Error;

use super::Keyboard;

/// Failures the dispatch wrapper knows how to recover from. Anything that
/// isn't one of these is treated as an unexpected failure.
#[derive(Error, Debug)]
pub enum BotError {
    /// Non-2xx answer from the game API carrying a structured body.
    #[error("game service error ({status}): {message}")]
    RemoteService {
        status: u16,
        message: String,
        details: serde_json::Value,
    },

    /// Chat input that can't be understood in the current state. The prompt
    /// is sent back and the conversation stays where it is.
    #[error("{prompt}")]
    BadInput {
        prompt: String,
        keyboard: Option<Keyboard>,
    },

    /// Timeout or connection failure talking to the game API.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The game API answered with something we can't read.
    #[error("unexpected response from {url} ({status}): {reason}")]
    UnexpectedResponse {
        url: String,
        status: u16,
        reason: String,
    },

    /// The game API broke its contract, e.g. a move that didn't advance
    /// the turn.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
}

impl BotError {
    pub fn bad_input(prompt: &str) -> BotError {
        return BotError::BadInput {
            prompt: prompt.to_string(),
            keyboard: None,
        };
    }

    pub fn bad_input_with_keyboard(prompt: &str, keyboard: Keyboard) -> BotError {
        return BotError::BadInput {
            prompt: prompt.to_string(),
            keyboard: Some(keyboard),
        };
    }
}

/// Renders the structured details of an error body the way users see them.
pub fn format_details(details: &serde_json::Value) -> String {
    match details {
        serde_json::Value::Null => return "".to_string(),
        serde_json::Value::String(text) => return text.to_string(),
        other => return other.to_string(),
    }
}
