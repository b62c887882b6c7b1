#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use strum::IntoEnumIterator;

use crate::domain::models::Language;
use crate::domain::models::LoadModelsRequest;
use crate::domain::models::ModelIdentifier;
use crate::domain::services::Bot;
use crate::domain::services::Dispatcher;

const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Asks the game API to load the default model of every language so the
/// first games don't wait on it. Failures only get logged.
pub async fn warm_up(bot: &Bot) {
    let model_identifiers = Language::iter()
        .map(ModelIdentifier::default_for)
        .collect::<Vec<ModelIdentifier>>();

    match bot
        .client
        .load_models(LoadModelsRequest { model_identifiers })
        .await
    {
        Ok(res) => tracing::info!(count = res.loaded_models_count, "Loading models"),
        Err(err) => tracing::warn!(error = ?err, "Failed to trigger model loading"),
    }
}

/// Pulls messages off the transport and hands them to the dispatcher until
/// the transport closes or the process is interrupted.
pub struct Runner {
    dispatcher: Arc<Dispatcher>,
    retry_delay: Duration,
}

impl Runner {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Runner {
        return Runner {
            dispatcher,
            retry_delay: Duration::from_secs(1),
        };
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Runner {
        self.retry_delay = retry_delay;
        return self;
    }

    pub async fn run(&self) -> Result<()> {
        let transport = &self.dispatcher.bot().transport;
        tracing::info!(transport = %transport.name(), "Bot started");

        let mut delay = self.retry_delay;
        loop {
            let res = tokio::select! {
                res = transport.receive() => res,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupted");
                    break;
                }
            };

            match res {
                Ok(Some(messages)) => {
                    delay = self.retry_delay;
                    for message in messages {
                        self.dispatcher.submit(message).await;
                    }
                }
                Ok(None) => {
                    tracing::info!("Transport closed");
                    break;
                }
                Err(err) => {
                    tracing::warn!(error = ?err, delay_ms = delay.as_millis() as u64, "Failed to receive messages");
                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * 2, MAX_RETRY_DELAY);
                }
            }
        }

        self.dispatcher.shutdown().await;
        for (session_id, session) in self.dispatcher.bot().sessions.list() {
            if let Some(game_id) = session.game_id() {
                tracing::info!(session_id, game_id, "Game left unfinished");
            }
        }
        tracing::info!(sessions = self.dispatcher.bot().sessions.len(), "Bot stopped");

        return Ok(());
    }
}
