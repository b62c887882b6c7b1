use anyhow::Result;
use async_trait::async_trait;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

use super::ChatId;
use super::InboundMessage;
use super::MessageId;
use super::OutboundMessage;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum TransportName {
    Telegram,
    Console,
}

impl TransportName {
    pub fn parse(text: String) -> Option<TransportName> {
        return TransportName::iter().find(|e| return e.to_string() == text);
    }
}

#[async_trait]
pub trait ChatTransport {
    fn name(&self) -> TransportName;

    /// Waits for the next batch of inbound messages. An empty batch is
    /// valid, e.g. when a long poll timed out. `None` means the transport is
    /// closed and no more messages will arrive.
    async fn receive(&self) -> Result<Option<Vec<InboundMessage>>>;

    async fn send(&self, chat_id: ChatId, message: OutboundMessage) -> Result<MessageId>;

    /// Takes the keyboard off a previously sent message.
    async fn remove_keyboard(&self, chat_id: ChatId, message_id: MessageId) -> Result<()>;
}

pub type TransportBox = Box<dyn ChatTransport + Send + Sync>;
