use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::Rng;
use rand::RngCore;
use rand::SeedableRng;

use super::SessionStore;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ChatId;
use crate::domain::models::GameClientBox;
use crate::domain::models::GameConfig;
use crate::domain::models::MessageId;
use crate::domain::models::OutboundMessage;
use crate::domain::models::TransportBox;

/// Delay between automated moves so they read like someone playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacing {
    pub min: Duration,
    pub max: Duration,
}

impl Default for Pacing {
    fn default() -> Pacing {
        return Pacing {
            min: Duration::from_millis(Config::get_u64(ConfigKey::PacingMin)),
            max: Duration::from_millis(Config::get_u64(ConfigKey::PacingMax)),
        };
    }
}

impl Pacing {
    pub fn none() -> Pacing {
        return Pacing {
            min: Duration::ZERO,
            max: Duration::ZERO,
        };
    }

    pub fn delay(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }

        return rand::thread_rng().gen_range(self.min..=self.max);
    }
}

/// Draws that decide whether an automated guesser passes its turn.
pub struct Dice {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl Default for Dice {
    fn default() -> Dice {
        return Dice::new(StdRng::from_entropy());
    }
}

impl Dice {
    pub fn new(rng: impl RngCore + Send + 'static) -> Dice {
        return Dice {
            rng: Mutex::new(Box::new(rng)),
        };
    }

    /// Uniform draw from `[0, 1)`.
    pub fn roll(&self) -> f64 {
        let mut rng = match self.rng.lock() {
            Ok(rng) => rng,
            Err(poisoned) => poisoned.into_inner(),
        };

        return rng.gen::<f64>();
    }
}

/// Everything a handler needs: the session store, the game API and the chat.
pub struct Bot {
    pub sessions: SessionStore,
    pub client: GameClientBox,
    pub transport: TransportBox,
    pub pacing: Pacing,
    pub dice: Dice,
    /// Settings for `/start` when the player has none of their own.
    pub defaults: GameConfig,
}

impl Bot {
    pub fn new(client: GameClientBox, transport: TransportBox) -> Bot {
        return Bot {
            sessions: SessionStore::default(),
            client,
            transport,
            pacing: Pacing::default(),
            dice: Dice::default(),
            defaults: GameConfig::from_names(
                &Config::get(ConfigKey::Language),
                &Config::get(ConfigKey::Difficulty),
                &Config::get(ConfigKey::Solver),
            ),
        };
    }

    pub async fn send(&self, chat_id: ChatId, message: OutboundMessage) -> Result<MessageId> {
        return self.transport.send(chat_id, message).await;
    }

    pub async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageId> {
        return self.send(chat_id, OutboundMessage::text(text)).await;
    }

    pub async fn send_markdown(&self, chat_id: ChatId, text: &str) -> Result<MessageId> {
        return self.send(chat_id, OutboundMessage::markdown(text)).await;
    }
}
