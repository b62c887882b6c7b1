#[cfg(test)]
#[path = "recovery_test.rs"]
mod tests;

use super::Bot;
use crate::domain::models::format_details;
use crate::domain::models::BotError;
use crate::domain::models::InboundMessage;
use crate::domain::models::MessageId;
use crate::domain::models::OutboundMessage;

pub const GENERIC_FAILURE_TEXT: &str = "💔 Something went wrong, please try again.";

/// Turns a failed dispatch into something the user can see. Never fails:
/// whatever goes wrong in here is logged and dropped.
pub async fn recover(bot: &Bot, event: &InboundMessage, err: anyhow::Error) {
    match err.downcast_ref::<BotError>() {
        Some(BotError::RemoteService {
            status,
            message,
            details,
        }) => {
            tracing::debug!(status, message = %message, details = %details, "Game service rejected the request");
            let details = format_details(details);
            let text = if details.is_empty() {
                message.to_string()
            } else {
                format!("{message}: {details}")
            };
            if let Err(err) = bot.send_text(event.chat_id, &text).await {
                tracing::debug!(error = ?err, "Failed to send service error");
            }
        }
        Some(BotError::BadInput { prompt, keyboard }) => {
            tracing::debug!(prompt = %prompt, "Bad input");
            let mut message = OutboundMessage::text(prompt);
            if let Some(keyboard) = keyboard {
                message = message.with_keyboard(keyboard.clone());
            }

            match bot.send(event.chat_id, message).await {
                Ok(message_id) => {
                    if keyboard.is_some() {
                        remember_keyboard(bot, event, message_id);
                    }
                }
                Err(err) => tracing::debug!(error = ?err, "Failed to send prompt"),
            }
        }
        _ => {
            tracing::error!(error = ?err, "Failed handling message");
            if let Err(err) = bot.send_text(event.chat_id, GENERIC_FAILURE_TEXT).await {
                tracing::debug!(error = ?err, "Failed to send failure notice");
            }
            resync(bot, event).await;
        }
    }
}

/// Board keyboards sent as corrective prompts get retracted like any other.
fn remember_keyboard(bot: &Bot, event: &InboundMessage, message_id: MessageId) {
    if let Some(mut session) = bot.sessions.get(event.session_id) {
        if session.game.is_some() {
            session.last_keyboard_message = Some(message_id);
            bot.sessions.set(event.session_id, Some(session));
        }
    }
}

/// Pulls the authoritative state so the next message works from what the
/// service actually has.
async fn resync(bot: &Bot, event: &InboundMessage) {
    let game_id = match bot
        .sessions
        .get(event.session_id)
        .and_then(|session| return session.game_id().map(|id| return id.to_string()))
    {
        Some(game_id) => game_id,
        None => return,
    };

    match bot.client.get_state(&game_id).await {
        Ok(res) => {
            if let Some(mut session) = bot.sessions.get(event.session_id) {
                if session.game_id() == Some(game_id.as_str()) {
                    session.set_state(res.game_state);
                    bot.sessions.set(event.session_id, Some(session));
                    tracing::info!(game_id = %game_id, "Resynced game state");
                }
            }
        }
        Err(err) => {
            tracing::debug!(error = ?err, game_id = %game_id, "Failed to resync game state");
        }
    }
}
