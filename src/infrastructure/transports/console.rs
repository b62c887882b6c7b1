#[cfg(test)]
#[path = "console_test.rs"]
mod tests;

use std::env;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use tokio::sync::Mutex;
use yansi::Paint;

use crate::domain::models::ChatId;
use crate::domain::models::ChatTransport;
use crate::domain::models::InboundMessage;
use crate::domain::models::MessageId;
use crate::domain::models::OutboundMessage;
use crate::domain::models::TransportName;

/// The terminal is a single chat with a single player.
const CONSOLE_ID: i64 = 1;

type Reader = Box<dyn AsyncBufRead + Unpin + Send>;
type Writer = Box<dyn AsyncWrite + Unpin + Send>;

/// Plays over stdin and stdout, for local runs against a game service.
pub struct Console {
    user_name: String,
    reader: Mutex<Reader>,
    writer: Mutex<Writer>,
    next_id: AtomicI64,
}

impl Default for Console {
    fn default() -> Console {
        let user_name = env::var("USER").unwrap_or_else(|_| return "player".to_string());
        return Console::new(
            &user_name,
            Box::new(BufReader::new(tokio::io::stdin())),
            Box::new(tokio::io::stdout()),
        );
    }
}

impl Console {
    pub fn new(user_name: &str, reader: Reader, writer: Writer) -> Console {
        return Console {
            user_name: user_name.to_string(),
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
            next_id: AtomicI64::new(1),
        };
    }
}

/// Formats a message for the terminal. Keyboards become bracketed rows.
pub fn render(message: &OutboundMessage) -> String {
    let mut text = format!("{}\n", message.text);
    if let Some(keyboard) = &message.keyboard {
        for row in &keyboard.rows {
            let cells = row
                .iter()
                .map(|cell| return format!("[{cell}]"))
                .collect::<Vec<String>>()
                .join(" ");
            text += &format!("  {cells}\n");
        }
    }

    return text;
}

#[async_trait]
impl ChatTransport for Console {
    fn name(&self) -> TransportName {
        return TransportName::Console;
    }

    #[allow(clippy::implicit_return)]
    async fn receive(&self) -> Result<Option<Vec<InboundMessage>>> {
        let mut line = String::new();
        let read = self.reader.lock().await.read_line(&mut line).await?;
        if read == 0 {
            return Ok(None);
        }

        let text = line.trim();
        if text.is_empty() {
            return Ok(Some(vec![]));
        }

        return Ok(Some(vec![InboundMessage {
            session_id: CONSOLE_ID,
            chat_id: CONSOLE_ID,
            user_name: self.user_name.to_string(),
            text: text.to_string(),
        }]));
    }

    #[allow(clippy::implicit_return)]
    async fn send(&self, _chat_id: ChatId, message: OutboundMessage) -> Result<MessageId> {
        let text = render(&message);
        let mut writer = self.writer.lock().await;
        writer
            .write_all(Paint::cyan(text).to_string().as_bytes())
            .await?;
        writer.flush().await?;

        return Ok(self.next_id.fetch_add(1, Ordering::SeqCst));
    }

    #[allow(clippy::implicit_return)]
    async fn remove_keyboard(&self, _chat_id: ChatId, _message_id: MessageId) -> Result<()> {
        return Ok(());
    }
}
