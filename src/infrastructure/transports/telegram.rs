#[cfg(test)]
#[path = "telegram_test.rs"]
mod tests;

use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ChatId;
use crate::domain::models::ChatTransport;
use crate::domain::models::InboundMessage;
use crate::domain::models::Keyboard;
use crate::domain::models::MessageId;
use crate::domain::models::OutboundMessage;
use crate::domain::models::ParseMode;
use crate::domain::models::TransportName;

/// Extra time on top of the long poll before the request itself times out.
const POLL_GRACE: Duration = Duration::from_secs(10);
const SEND_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest {
    offset: i64,
    timeout: u64,
    allowed_updates: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    message_id: MessageId,
    chat: Chat,
    from: Option<User>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: ChatId,
}

#[derive(Debug, Deserialize)]
struct User {
    id: i64,
    first_name: String,
}

#[derive(Debug, Serialize)]
struct KeyboardButton {
    text: String,
}

#[derive(Debug, Serialize)]
struct ReplyKeyboardMarkup {
    keyboard: Vec<Vec<KeyboardButton>>,
    one_time_keyboard: bool,
    resize_keyboard: bool,
}

impl From<Keyboard> for ReplyKeyboardMarkup {
    fn from(keyboard: Keyboard) -> ReplyKeyboardMarkup {
        let keyboard = keyboard
            .rows
            .into_iter()
            .map(|row| {
                return row
                    .into_iter()
                    .map(|text| return KeyboardButton { text })
                    .collect();
            })
            .collect();

        return ReplyKeyboardMarkup {
            keyboard,
            one_time_keyboard: true,
            resize_keyboard: true,
        };
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest {
    chat_id: ChatId,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<ReplyKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
struct EditMessageReplyMarkupRequest {
    chat_id: ChatId,
    message_id: MessageId,
}

/// Telegram Bot API over long polling.
pub struct Telegram {
    url: String,
    token: String,
    poll_timeout: u64,
    offset: AtomicI64,
    client: reqwest::Client,
}

impl Default for Telegram {
    fn default() -> Telegram {
        return Telegram::new(
            &Config::get(ConfigKey::TelegramURL),
            &Config::get(ConfigKey::TelegramToken),
            Config::get_u64(ConfigKey::PollTimeout),
        );
    }
}

impl Telegram {
    pub fn new(url: &str, token: &str, poll_timeout: u64) -> Telegram {
        return Telegram {
            url: url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            poll_timeout,
            offset: AtomicI64::new(0),
            client: reqwest::Client::new(),
        };
    }

    async fn call<Req, Res>(&self, method: &str, body: &Req, timeout: Duration) -> Result<Res>
    where
        Req: serde::Serialize,
        Res: DeserializeOwned,
    {
        // The token is part of the URL, so it is never logged.
        let url = format!("{url}/bot{token}/{method}", url = self.url, token = self.token);
        let res = self
            .client
            .post(url)
            .json(body)
            .timeout(timeout)
            .send()
            .await?
            .json::<ApiResponse<Res>>()
            .await?;

        if !res.ok {
            let description = res.description.unwrap_or_default();
            tracing::debug!(method, description = %description, "Telegram call failed");
            bail!("Telegram {method} failed: {description}");
        }

        match res.result {
            Some(result) => return Ok(result),
            None => bail!("Telegram {method} returned no result"),
        }
    }
}

fn to_inbound(message: Message) -> Option<InboundMessage> {
    let text = message.text?;
    let from = message.from?;

    return Some(InboundMessage {
        session_id: from.id,
        chat_id: message.chat.id,
        user_name: from.first_name,
        text,
    });
}

#[async_trait]
impl ChatTransport for Telegram {
    fn name(&self) -> TransportName {
        return TransportName::Telegram;
    }

    #[allow(clippy::implicit_return)]
    async fn receive(&self) -> Result<Option<Vec<InboundMessage>>> {
        let req = GetUpdatesRequest {
            offset: self.offset.load(Ordering::SeqCst),
            timeout: self.poll_timeout,
            allowed_updates: vec!["message".to_string()],
        };
        let timeout = Duration::from_secs(self.poll_timeout) + POLL_GRACE;
        let updates: Vec<Update> = self.call("getUpdates", &req, timeout).await?;

        if let Some(last) = updates.iter().map(|update| return update.update_id).max() {
            self.offset.store(last + 1, Ordering::SeqCst);
        }

        let messages = updates
            .into_iter()
            .filter_map(|update| return update.message)
            .filter_map(to_inbound)
            .collect::<Vec<InboundMessage>>();
        tracing::debug!(count = messages.len(), "Received Telegram messages");

        return Ok(Some(messages));
    }

    #[allow(clippy::implicit_return)]
    async fn send(&self, chat_id: ChatId, message: OutboundMessage) -> Result<MessageId> {
        let parse_mode = match message.parse_mode {
            ParseMode::Markdown => Some("Markdown".to_string()),
            ParseMode::Plain => None,
        };
        let req = SendMessageRequest {
            chat_id,
            text: message.text,
            parse_mode,
            reply_markup: message.keyboard.map(ReplyKeyboardMarkup::from),
        };

        let sent: Message = self.call("sendMessage", &req, SEND_TIMEOUT).await?;
        return Ok(sent.message_id);
    }

    #[allow(clippy::implicit_return)]
    async fn remove_keyboard(&self, chat_id: ChatId, message_id: MessageId) -> Result<()> {
        let req = EditMessageReplyMarkupRequest {
            chat_id,
            message_id,
        };

        // Telegram answers with the edited message, or `true` for inline
        // messages.
        let _: serde_json::Value = self
            .call("editMessageReplyMarkup", &req, SEND_TIMEOUT)
            .await?;
        return Ok(());
    }
}
