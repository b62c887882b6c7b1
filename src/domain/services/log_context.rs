#[cfg(test)]
#[path = "log_context_test.rs"]
mod tests;

use std::cell::RefCell;
use std::future::Future;

use serde_derive::Serialize;
use tokio::task_local;
use uuid::Uuid;

use crate::domain::models::ChatId;
use crate::domain::models::SessionId;

/// Identifiers attached to everything logged or requested while handling one
/// inbound message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LogContext {
    pub context_id: String,
    pub user_id: Option<SessionId>,
    pub chat_id: Option<ChatId>,
    pub game_id: Option<String>,
}

impl LogContext {
    pub fn new(user_id: SessionId, chat_id: ChatId, game_id: Option<&str>) -> LogContext {
        return LogContext {
            context_id: Uuid::new_v4().to_string(),
            user_id: Some(user_id),
            chat_id: Some(chat_id),
            game_id: game_id.map(|id| return id.to_string()),
        };
    }
}

task_local! {
    static LOG_CONTEXT: RefCell<LogContext>;
}

/// Runs a future with the context in scope. The context is gone once the
/// future completes, whatever its outcome.
pub async fn with_log_context<F, R>(context: LogContext, future: F) -> R
where
    F: Future<Output = R>,
{
    return LOG_CONTEXT.scope(RefCell::new(context), future).await;
}

pub fn current() -> Option<LogContext> {
    return LOG_CONTEXT
        .try_with(|context| return context.borrow().clone())
        .ok();
}

/// Records the game being played for the rest of the dispatch.
pub fn set_game_id(game_id: &str) {
    let _ = LOG_CONTEXT.try_with(|context| {
        context.borrow_mut().game_id = Some(game_id.to_string());
    });
    tracing::Span::current().record("game_id", game_id);
}
