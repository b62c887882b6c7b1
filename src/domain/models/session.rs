use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::GameConfig;
use super::GameState;
use super::MessageId;

/// Identifies one chat participant.
pub type SessionId = i64;

/// Handle and last known snapshot of a remote game. Kept together so a
/// session can never hold one without the other.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveGame {
    pub game_id: String,
    pub state: GameState,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub config: GameConfig,
    pub game: Option<ActiveGame>,
    pub last_keyboard_message: Option<MessageId>,
}

impl Session {
    /// A session that only carries configuration, used by the wizard.
    pub fn with_config(config: GameConfig) -> Session {
        return Session {
            config,
            game: None,
            last_keyboard_message: None,
        };
    }

    /// A fresh session for a newly started game. Keyboard bookkeeping of any
    /// previous session is dropped.
    pub fn for_game(config: GameConfig, game_id: &str, state: GameState) -> Session {
        return Session {
            config,
            game: Some(ActiveGame {
                game_id: game_id.to_string(),
                state,
            }),
            last_keyboard_message: None,
        };
    }

    pub fn game_id(&self) -> Option<&str> {
        return self.game.as_ref().map(|game| return game.game_id.as_str());
    }

    pub fn state(&self) -> Option<&GameState> {
        return self.game.as_ref().map(|game| return &game.state);
    }

    pub fn set_state(&mut self, state: GameState) {
        if let Some(game) = self.game.as_mut() {
            game.state = state;
        }
    }

    pub fn end_game(&mut self) {
        self.game = None;
    }
}
