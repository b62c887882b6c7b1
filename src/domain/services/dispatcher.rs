#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod tests;

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::Instrument;

use super::log_context;
use super::log_context::LogContext;
use super::recovery;
use super::Bot;
use super::Handler;
use crate::domain::models::BotError;
use crate::domain::models::ConversationState;
use crate::domain::models::InboundMessage;
use crate::domain::models::SessionId;

/// Routes inbound messages to handlers and keeps each participant's
/// conversation state. Messages of one session are handled strictly in
/// order by a dedicated worker task; sessions never wait on each other.
pub struct Dispatcher {
    bot: Arc<Bot>,
    states: DashMap<SessionId, ConversationState>,
    workers: DashMap<SessionId, mpsc::UnboundedSender<InboundMessage>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Dispatcher {
    pub fn new(bot: Bot) -> Dispatcher {
        return Dispatcher {
            bot: Arc::new(bot),
            states: DashMap::new(),
            workers: DashMap::new(),
            handles: Mutex::new(vec![]),
        };
    }

    pub fn bot(&self) -> &Bot {
        return &self.bot;
    }

    pub fn state(&self, session_id: SessionId) -> ConversationState {
        return self
            .states
            .get(&session_id)
            .map(|state| return *state)
            .unwrap_or_default();
    }

    fn state_after_failure(&self, session_id: SessionId) -> ConversationState {
        let has_game = self
            .bot
            .sessions
            .get(session_id)
            .map(|session| return session.game.is_some())
            .unwrap_or(false);
        if has_game {
            return ConversationState::Playing;
        }

        return ConversationState::Entry;
    }

    fn set_state(&self, session_id: SessionId, state: ConversationState) {
        if state == ConversationState::Entry {
            self.states.remove(&session_id);
            return;
        }
        self.states.insert(session_id, state);
    }

    /// Handles one message to completion and returns the state the
    /// conversation is left in. Failures are turned into chat replies by the
    /// recovery policy. Bad input keeps the state so the same question is
    /// answered again; any other failure lands in Playing if the session
    /// holds a game by then, otherwise in Entry.
    pub async fn dispatch(&self, event: InboundMessage) -> ConversationState {
        let session_id = event.session_id;
        let current = self.state(session_id);
        let handler = Handler::route(current, &event.text);
        let game_id = self
            .bot
            .sessions
            .get(session_id)
            .and_then(|session| return session.game_id().map(|id| return id.to_string()));

        let context = LogContext::new(session_id, event.chat_id, game_id.as_deref());
        let span = tracing::info_span!(
            "dispatch",
            context_id = %context.context_id,
            user_id = session_id,
            chat_id = event.chat_id,
            game_id = tracing::field::Empty,
            handler = %handler,
            state = %current,
        );
        if let Some(game_id) = &game_id {
            span.record("game_id", game_id.as_str());
        }

        let bot = self.bot.as_ref();
        let next = log_context::with_log_context(
            context,
            async {
                tracing::debug!(text = %event.text, "Dispatching message");
                match handler.handle(bot, &event).await {
                    Ok(Some(next)) => return next,
                    Ok(None) => return ConversationState::Entry,
                    Err(err) => {
                        let is_bad_input = matches!(
                            err.downcast_ref::<BotError>(),
                            Some(BotError::BadInput { .. })
                        );
                        recovery::recover(bot, &event, err).await;
                        if is_bad_input {
                            return current;
                        }
                        return self.state_after_failure(session_id);
                    }
                }
            }
            .instrument(span),
        )
        .await;

        self.set_state(session_id, next);
        return next;
    }

    /// Queues a message on its session's worker, spawning the worker when
    /// the session has none.
    pub async fn submit(self: &Arc<Self>, event: InboundMessage) {
        let session_id = event.session_id;
        let (tx, rx) = mpsc::unbounded_channel::<InboundMessage>();
        let queued = match self.workers.entry(session_id) {
            Entry::Occupied(mut worker) => match worker.get().send(event) {
                Ok(()) => return,
                Err(mpsc::error::SendError(event)) => {
                    let queued = tx.send(event);
                    worker.insert(tx);
                    queued
                }
            },
            Entry::Vacant(slot) => {
                let queued = tx.send(event);
                slot.insert(tx);
                queued
            }
        };
        if let Err(err) = queued {
            tracing::error!(error = ?err, session_id, "Failed to queue message");
            return;
        }

        let dispatcher = Arc::clone(self);
        let handle = tokio::spawn(async move {
            dispatcher.work(session_id, rx).await;
        });

        let mut handles = self.handles.lock().await;
        handles.retain(|handle| return !handle.is_finished());
        handles.push(handle);
    }

    /// Sessions with a worker right now.
    pub fn active_workers(&self) -> usize {
        return self.workers.len();
    }

    /// Drains a session's queue. Once it runs dry the worker unregisters and
    /// exits; the next message for the session starts a fresh one.
    async fn work(&self, session_id: SessionId, mut rx: mpsc::UnboundedReceiver<InboundMessage>) {
        let mut next = rx.recv().await;
        while let Some(event) = next {
            self.dispatch(event).await;
            next = match rx.try_recv() {
                Ok(event) => Some(event),
                Err(_) => self.release_worker(session_id, &mut rx),
            };
        }
        tracing::debug!(session_id, "Session worker released");
    }

    /// Drops the worker's map entry unless a message slipped in first, which
    /// is returned instead. Senders only touch the entry under its lock, so
    /// a queue found empty under that lock stays empty.
    fn release_worker(
        &self,
        session_id: SessionId,
        rx: &mut mpsc::UnboundedReceiver<InboundMessage>,
    ) -> Option<InboundMessage> {
        let mut pending = None;
        self.workers.remove_if(&session_id, |_, _| {
            pending = rx.try_recv().ok();
            return pending.is_none();
        });

        return pending;
    }

    /// Stops accepting messages and waits for every queued one to be handled.
    pub async fn shutdown(&self) {
        tracing::info!(active = self.active_workers(), "Stopping session workers");
        self.workers.clear();
        let handles = self.handles.lock().await.drain(..).collect::<Vec<JoinHandle<()>>>();
        tracing::info!(workers = handles.len(), "Waiting for session workers");

        for res in futures::future::join_all(handles).await {
            if let Err(err) = res {
                tracing::error!(error = ?err, "Session worker failed");
            }
        }
    }
}
