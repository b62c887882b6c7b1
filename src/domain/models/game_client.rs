use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::GameState;
use super::GivenGuess;
use super::GivenHint;
use super::Language;
use super::ModelIdentifier;
use super::Solver;
use super::TeamColor;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StartGameRequest {
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_team: Option<TeamColor>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StartGameResponse {
    pub game_id: String,
    pub game_state: GameState,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClueRequest {
    pub game_id: String,
    pub word: String,
    pub card_amount: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub for_words: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClueResponse {
    pub given_clue: Option<GivenHint>,
    pub game_state: GameState,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuessRequest {
    pub game_id: String,
    /// Zero based card index, or one of the pass / quit sentinels.
    pub card_index: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuessResponse {
    #[serde(default)]
    pub given_guess: Option<GivenGuess>,
    pub game_state: GameState,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NextMoveRequest {
    pub game_id: String,
    pub solver: Solver,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_identifier: Option<ModelIdentifier>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NextMoveResponse {
    pub used_solver: Solver,
    #[serde(default)]
    pub used_model_identifier: Option<ModelIdentifier>,
    #[serde(default)]
    pub given_clue: Option<GivenHint>,
    #[serde(default)]
    pub given_guess: Option<GivenGuess>,
    pub game_state: GameState,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameStateResponse {
    pub game_state: GameState,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadModelsRequest {
    pub model_identifiers: Vec<ModelIdentifier>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadModelsResponse {
    pub loaded_models_count: u32,
}

/// Typed access to the game API. The game rules and the solvers live behind
/// it; every call returns the authoritative state after the move.
///
/// Implementations return `BotError` variants for failures so the dispatch
/// wrapper can classify them.
#[async_trait]
pub trait GameClient {
    async fn start_game(&self, request: StartGameRequest) -> Result<StartGameResponse>;

    async fn clue(&self, request: ClueRequest) -> Result<ClueResponse>;

    async fn guess(&self, request: GuessRequest) -> Result<GuessResponse>;

    /// Asks the solver service to play the current automated role. A reply
    /// that leaves both the turn and the board untouched is a protocol
    /// violation.
    async fn next_move(&self, request: NextMoveRequest) -> Result<NextMoveResponse>;

    async fn get_state(&self, game_id: &str) -> Result<GameStateResponse>;

    /// Warms solver models in the background on the service side.
    async fn load_models(&self, request: LoadModelsRequest) -> Result<LoadModelsResponse>;
}

pub type GameClientBox = Box<dyn GameClient + Send + Sync>;
