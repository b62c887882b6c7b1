#[cfg(test)]
#[path = "game_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Guess index that passes the turn.
pub const PASS_GUESS: i32 = -1;
/// Guess index that forfeits the game.
pub const QUIT_GAME: i32 = -2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "title_case")]
pub enum TeamColor {
    Blue,
    Red,
}

impl TeamColor {
    pub fn emoji(&self) -> &'static str {
        return CardColor::from(*self).emoji();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "lowercase")]
pub enum PlayerRole {
    Hinter,
    Guesser,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardColor {
    Blue,
    Red,
    Gray,
    Black,
}

impl CardColor {
    pub fn emoji(&self) -> &'static str {
        match self {
            CardColor::Blue => return "🟦",
            CardColor::Red => return "🟥",
            CardColor::Gray => return "⬜",
            CardColor::Black => return "💀",
        }
    }
}

impl From<TeamColor> for CardColor {
    fn from(team: TeamColor) -> CardColor {
        match team {
            TeamColor::Blue => return CardColor::Blue,
            TeamColor::Red => return CardColor::Red,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WinningReason {
    TargetScoreReached,
    OpponentHitBlack,
    OpponentQuit,
}

impl WinningReason {
    pub fn description(&self) -> &'static str {
        match self {
            WinningReason::TargetScoreReached => return "Target score reached",
            WinningReason::OpponentHitBlack => return "Opponent hit black card",
            WinningReason::OpponentQuit => return "Opponent quit",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            WinningReason::TargetScoreReached => return "🤓",
            WinningReason::OpponentHitBlack => return "😵",
            WinningReason::OpponentQuit => return "🥴",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub word: String,
    /// Absent when the board was censored for the guessers.
    #[serde(default)]
    pub color: Option<CardColor>,
    #[serde(default)]
    pub revealed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub team_color: TeamColor,
    pub reason: WinningReason,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingScore {
    #[serde(rename = "BLUE")]
    pub blue: u32,
    #[serde(rename = "RED")]
    pub red: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GivenHint {
    pub word: String,
    pub card_amount: u32,
    #[serde(default)]
    pub for_words: Option<Vec<String>>,
    pub team_color: TeamColor,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GivenGuess {
    pub guessed_card: Card,
    pub correct: bool,
}

/// Snapshot of a remote game. Only the remote service mutates it; locally it
/// is replaced wholesale after every call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub cards: Vec<Card>,
    pub current_team_color: TeamColor,
    pub current_player_role: PlayerRole,
    #[serde(default)]
    pub remaining_score: RemainingScore,
    #[serde(default)]
    pub winner: Option<Winner>,
    #[serde(default)]
    pub is_game_over: bool,
    #[serde(default)]
    pub raw_hints: Vec<GivenHint>,
    #[serde(default)]
    pub bonus_given: bool,
}

pub const HUMAN_TEAM: TeamColor = TeamColor::Blue;
pub const HUMAN_ROLE: PlayerRole = PlayerRole::Guesser;

impl GameState {
    pub fn is_human_turn(&self) -> bool {
        return self.current_team_color == HUMAN_TEAM && self.current_player_role == HUMAN_ROLE;
    }

    /// Identifies whose move it is.
    pub fn turn(&self) -> (TeamColor, PlayerRole) {
        return (self.current_team_color, self.current_player_role);
    }

    pub fn remaining(&self, team: TeamColor) -> u32 {
        match team {
            TeamColor::Blue => return self.remaining_score.blue,
            TeamColor::Red => return self.remaining_score.red,
        }
    }

    /// Cards as the human guesser may see them: colors of unrevealed cards
    /// are hidden.
    pub fn censored_cards(&self) -> Vec<Card> {
        return self
            .cards
            .iter()
            .map(|card| {
                if card.revealed {
                    return card.clone();
                }
                return Card {
                    word: card.word.to_string(),
                    color: None,
                    revealed: false,
                };
            })
            .collect();
    }

    /// Finds a card by its word, ignoring case and surrounding whitespace.
    pub fn find_card_index(&self, word: &str) -> Option<usize> {
        let needle = word.trim().to_lowercase();
        return self
            .cards
            .iter()
            .position(|card| return card.word.to_lowercase() == needle);
    }
}
