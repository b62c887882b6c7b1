//! Scriptable stand-ins for the chat and the game API.

use std::collections::VecDeque;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use test_utils::BOARD_COLORS;
use test_utils::BOARD_WORDS;

use super::Bot;
use super::Dice;
use super::Pacing;
use super::SessionStore;
use crate::domain::models::BotError;
use crate::domain::models::Card;
use crate::domain::models::CardColor;
use crate::domain::models::ChatId;
use crate::domain::models::ChatTransport;
use crate::domain::models::ClueRequest;
use crate::domain::models::ClueResponse;
use crate::domain::models::Difficulty;
use crate::domain::models::GameClient;
use crate::domain::models::GameConfig;
use crate::domain::models::GameState;
use crate::domain::models::GameStateResponse;
use crate::domain::models::GivenGuess;
use crate::domain::models::GivenHint;
use crate::domain::models::GuessRequest;
use crate::domain::models::GuessResponse;
use crate::domain::models::InboundMessage;
use crate::domain::models::LoadModelsRequest;
use crate::domain::models::LoadModelsResponse;
use crate::domain::models::MessageId;
use crate::domain::models::NextMoveRequest;
use crate::domain::models::NextMoveResponse;
use crate::domain::models::OutboundMessage;
use crate::domain::models::PlayerRole;
use crate::domain::models::RemainingScore;
use crate::domain::models::Solver;
use crate::domain::models::StartGameRequest;
use crate::domain::models::StartGameResponse;
use crate::domain::models::TeamColor;
use crate::domain::models::TransportName;
use crate::domain::models::Winner;
use crate::domain::models::WinningReason;

pub const SESSION_ID: i64 = 7;
pub const CHAT_ID: ChatId = 70;

#[derive(Clone, Debug, PartialEq)]
pub enum Sent {
    Message(OutboundMessage),
    RemoveKeyboard(MessageId),
}

/// Batches handed out by `receive`, in order. `Err` fails that poll; once
/// the inbox is empty the transport reports itself closed.
pub type Inbox = VecDeque<Result<Vec<InboundMessage>, String>>;

#[derive(Clone)]
pub struct RecordingTransport {
    pub log: Arc<Mutex<Vec<Sent>>>,
    pub inbox: Arc<Mutex<Inbox>>,
    pub fail_remove: bool,
    next_id: Arc<AtomicI64>,
}

impl Default for RecordingTransport {
    fn default() -> RecordingTransport {
        return RecordingTransport {
            log: Arc::new(Mutex::new(vec![])),
            inbox: Arc::new(Mutex::new(VecDeque::new())),
            fail_remove: false,
            next_id: Arc::new(AtomicI64::new(100)),
        };
    }
}

impl RecordingTransport {
    /// A chat where every keyboard removal fails, like edits of messages
    /// that were deleted.
    pub fn failing_removals() -> RecordingTransport {
        return RecordingTransport {
            fail_remove: true,
            ..RecordingTransport::default()
        };
    }

    pub fn sent(&self) -> Vec<Sent> {
        return self.log.lock().unwrap().clone();
    }

    pub fn messages(&self) -> Vec<OutboundMessage> {
        return self
            .sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Message(message) => return Some(message),
                Sent::RemoveKeyboard(_) => return None,
            })
            .collect();
    }

    pub fn texts(&self) -> Vec<String> {
        return self
            .messages()
            .into_iter()
            .map(|message| return message.text)
            .collect();
    }

    pub fn removed_keyboards(&self) -> Vec<MessageId> {
        return self
            .sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::RemoveKeyboard(message_id) => return Some(message_id),
                Sent::Message(_) => return None,
            })
            .collect();
    }

    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    fn name(&self) -> TransportName {
        return TransportName::Console;
    }

    #[allow(clippy::implicit_return)]
    async fn receive(&self) -> Result<Option<Vec<InboundMessage>>> {
        let batch = self.inbox.lock().unwrap().pop_front();
        match batch {
            Some(Ok(messages)) => return Ok(Some(messages)),
            Some(Err(err)) => bail!(err),
            None => return Ok(None),
        }
    }

    #[allow(clippy::implicit_return)]
    async fn send(&self, _chat_id: ChatId, message: OutboundMessage) -> Result<MessageId> {
        self.log.lock().unwrap().push(Sent::Message(message));
        return Ok(self.next_id.fetch_add(1, Ordering::SeqCst));
    }

    #[allow(clippy::implicit_return)]
    async fn remove_keyboard(&self, _chat_id: ChatId, message_id: MessageId) -> Result<()> {
        self.log
            .lock()
            .unwrap()
            .push(Sent::RemoveKeyboard(message_id));
        if self.fail_remove {
            bail!("Bad Request: message to edit not found");
        }
        return Ok(());
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    StartGame,
    Clue(String),
    Guess(i32),
    NextMove(Solver),
    GetState(String),
    LoadModels,
}

#[derive(Clone, Debug)]
pub enum Reply {
    Start(StartGameResponse),
    Guess(GuessResponse),
    NextMove(NextMoveResponse),
    State(GameStateResponse),
    Remote(u16, String, serde_json::Value),
    Network,
}

/// Game API answering from a queue, in order, whatever the call.
#[derive(Clone, Default)]
pub struct ScriptedGameClient {
    pub replies: Arc<Mutex<VecDeque<Reply>>>,
    pub calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedGameClient {
    pub fn new(replies: Vec<Reply>) -> ScriptedGameClient {
        return ScriptedGameClient {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            calls: Arc::new(Mutex::new(vec![])),
        };
    }

    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> Vec<Call> {
        return self.calls.lock().unwrap().clone();
    }

    pub fn remaining(&self) -> usize {
        return self.replies.lock().unwrap().len();
    }

    fn next(&self, call: Call) -> Result<Reply> {
        self.calls.lock().unwrap().push(call.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| return anyhow!("no reply scripted for {call:?}"))?;

        match reply {
            Reply::Remote(status, message, details) => {
                return Err(BotError::RemoteService {
                    status,
                    message,
                    details,
                }
                .into());
            }
            Reply::Network => bail!("connection reset by peer"),
            reply => return Ok(reply),
        }
    }
}

#[async_trait]
impl GameClient for ScriptedGameClient {
    #[allow(clippy::implicit_return)]
    async fn start_game(&self, _request: StartGameRequest) -> Result<StartGameResponse> {
        match self.next(Call::StartGame)? {
            Reply::Start(res) => return Ok(res),
            other => bail!("unexpected reply to start: {other:?}"),
        }
    }

    #[allow(clippy::implicit_return)]
    async fn clue(&self, request: ClueRequest) -> Result<ClueResponse> {
        let reply = self.next(Call::Clue(request.word))?;
        bail!("unexpected reply to clue: {reply:?}")
    }

    #[allow(clippy::implicit_return)]
    async fn guess(&self, request: GuessRequest) -> Result<GuessResponse> {
        match self.next(Call::Guess(request.card_index))? {
            Reply::Guess(res) => return Ok(res),
            other => bail!("unexpected reply to guess: {other:?}"),
        }
    }

    #[allow(clippy::implicit_return)]
    async fn next_move(&self, request: NextMoveRequest) -> Result<NextMoveResponse> {
        match self.next(Call::NextMove(request.solver))? {
            Reply::NextMove(res) => return Ok(res),
            other => bail!("unexpected reply to next move: {other:?}"),
        }
    }

    #[allow(clippy::implicit_return)]
    async fn get_state(&self, game_id: &str) -> Result<GameStateResponse> {
        match self.next(Call::GetState(game_id.to_string()))? {
            Reply::State(res) => return Ok(res),
            other => bail!("unexpected reply to get state: {other:?}"),
        }
    }

    #[allow(clippy::implicit_return)]
    async fn load_models(&self, _request: LoadModelsRequest) -> Result<LoadModelsResponse> {
        let reply = self.next(Call::LoadModels)?;
        bail!("unexpected reply to load models: {reply:?}")
    }
}

fn card_color(name: &str) -> CardColor {
    match name {
        "BLUE" => return CardColor::Blue,
        "RED" => return CardColor::Red,
        "BLACK" => return CardColor::Black,
        _ => return CardColor::Gray,
    }
}

/// Fresh 25 card board with nothing revealed.
pub fn board(team: TeamColor, role: PlayerRole) -> GameState {
    let cards = BOARD_WORDS
        .iter()
        .zip(BOARD_COLORS.iter())
        .map(|(word, color)| {
            return Card {
                word: word.to_string(),
                color: Some(card_color(color)),
                revealed: false,
            };
        })
        .collect();

    return GameState {
        cards,
        current_team_color: team,
        current_player_role: role,
        remaining_score: RemainingScore { blue: 9, red: 8 },
        winner: None,
        is_game_over: false,
        raw_hints: vec![],
        bonus_given: false,
    };
}

/// Same board with the turn handed to someone else.
pub fn with_turn(state: &GameState, team: TeamColor, role: PlayerRole) -> GameState {
    let mut next = state.clone();
    next.current_team_color = team;
    next.current_player_role = role;
    return next;
}

pub fn reveal(state: &GameState, idx: usize) -> GameState {
    let mut next = state.clone();
    next.cards[idx].revealed = true;
    match next.cards[idx].color {
        Some(CardColor::Blue) => next.remaining_score.blue -= 1,
        Some(CardColor::Red) => next.remaining_score.red -= 1,
        _ => {}
    }
    return next;
}

pub fn game_over(state: &GameState, team: TeamColor, reason: WinningReason) -> GameState {
    let mut next = state.clone();
    next.is_game_over = true;
    next.winner = Some(Winner {
        team_color: team,
        reason,
    });
    return next;
}

pub fn hint(team: TeamColor, word: &str, card_amount: u32, for_words: &[&str]) -> GivenHint {
    return GivenHint {
        word: word.to_string(),
        card_amount,
        for_words: Some(for_words.iter().map(|word| return word.to_string()).collect()),
        team_color: team,
    };
}

pub fn guess_of(state: &GameState, idx: usize, correct: bool) -> GivenGuess {
    let mut card = state.cards[idx].clone();
    card.revealed = true;
    return GivenGuess {
        guessed_card: card,
        correct,
    };
}

pub fn clue_move(hint: GivenHint, game_state: GameState) -> Reply {
    return Reply::NextMove(NextMoveResponse {
        used_solver: Solver::Naive,
        used_model_identifier: None,
        given_clue: Some(hint),
        given_guess: None,
        game_state,
    });
}

pub fn guess_move(guess: GivenGuess, game_state: GameState) -> Reply {
    return Reply::NextMove(NextMoveResponse {
        used_solver: Solver::Naive,
        used_model_identifier: None,
        given_clue: None,
        given_guess: Some(guess),
        game_state,
    });
}

pub fn event(text: &str) -> InboundMessage {
    return InboundMessage {
        session_id: SESSION_ID,
        chat_id: CHAT_ID,
        user_name: "Sam".to_string(),
        text: text.to_string(),
    };
}

/// Config whose automated guessers never pass, so scripted games are
/// deterministic.
pub fn deterministic_config() -> GameConfig {
    return GameConfig {
        difficulty: Difficulty::Hard,
        ..GameConfig::default()
    };
}

pub fn test_bot(client: &ScriptedGameClient, transport: &RecordingTransport) -> Bot {
    return Bot {
        sessions: SessionStore::default(),
        client: Box::new(client.clone()),
        transport: Box::new(transport.clone()),
        pacing: Pacing::none(),
        dice: Dice::new(StdRng::seed_from_u64(7)),
        defaults: deterministic_config(),
    };
}
