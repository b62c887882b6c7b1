#[cfg(test)]
#[path = "handlers_test.rs"]
mod tests;

use std::str::FromStr;

use anyhow::Result;

use super::log_context;
use super::renderer;
use super::turn_engine;
use super::Bot;
use crate::domain::models::difficulty_options;
use crate::domain::models::model_options;
use crate::domain::models::solver_options;
use crate::domain::models::BotError;
use crate::domain::models::ConversationState;
use crate::domain::models::Difficulty;
use crate::domain::models::GameConfig;
use crate::domain::models::GameState;
use crate::domain::models::GuessCommand;
use crate::domain::models::GuessRequest;
use crate::domain::models::InboundMessage;
use crate::domain::models::Keyboard;
use crate::domain::models::Language;
use crate::domain::models::ModelIdentifier;
use crate::domain::models::OutboundMessage;
use crate::domain::models::Session;
use crate::domain::models::SlashCommand;
use crate::domain::models::Solver;
use crate::domain::models::StartGameRequest;
use crate::domain::models::PASS_GUESS;
use crate::domain::models::QUIT_GAME;

type Transition = Result<Option<ConversationState>>;

/// Every way an inbound message can be handled. Selected by `route` from the
/// active conversation state and the command in the message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum Handler {
    Start,
    Custom,
    ConfigLanguage,
    ConfigDifficulty,
    ConfigModel,
    Solver,
    ConfigSolver,
    Continue,
    ContinueGetId,
    Fallback,
    Help,
    ProcessMessage,
}

impl Handler {
    pub fn route(state: ConversationState, text: &str) -> Handler {
        if let Some(command) = SlashCommand::parse(text) {
            if command.is_start() {
                return Handler::Start;
            }
            if command.is_custom() {
                return Handler::Custom;
            }
            if command.is_continue() {
                return Handler::Continue;
            }
            if command.is_solver() {
                return Handler::Solver;
            }
            if command.is_help() {
                return Handler::Help;
            }
            if command.is_quit() {
                return Handler::Fallback;
            }
        }

        match state {
            ConversationState::ConfigLanguage => return Handler::ConfigLanguage,
            ConversationState::ConfigDifficulty => return Handler::ConfigDifficulty,
            ConversationState::ConfigModel => return Handler::ConfigModel,
            ConversationState::ConfigSolver => return Handler::ConfigSolver,
            ConversationState::ContinueGetId => return Handler::ContinueGetId,
            ConversationState::Entry | ConversationState::Playing => {
                return Handler::ProcessMessage
            }
        }
    }

    /// Handles the message and returns the next conversation state. `None`
    /// ends the conversation and falls back to `Entry`.
    pub async fn handle(&self, bot: &Bot, event: &InboundMessage) -> Transition {
        match self {
            Handler::Start => return start(bot, event).await,
            Handler::Custom => return custom(bot, event).await,
            Handler::ConfigLanguage => return config_language(bot, event).await,
            Handler::ConfigDifficulty => return config_difficulty(bot, event).await,
            Handler::ConfigModel => return config_model(bot, event).await,
            Handler::Solver => return solver(bot, event).await,
            Handler::ConfigSolver => return config_solver(bot, event).await,
            Handler::Continue => return continue_game(bot, event).await,
            Handler::ContinueGetId => return continue_get_id(bot, event).await,
            Handler::Fallback => return fallback(bot, event).await,
            Handler::Help => {
                help(bot, event).await?;
                if has_active_game(bot, event) {
                    return Ok(Some(ConversationState::Playing));
                }
                return Ok(None);
            }
            Handler::ProcessMessage => return process_message(bot, event).await,
        }
    }
}

fn has_active_game(bot: &Bot, event: &InboundMessage) -> bool {
    return bot
        .sessions
        .get(event.session_id)
        .map(|session| return session.game.is_some())
        .unwrap_or(false);
}

/// Session being configured, created on the fly when the wizard is entered
/// without one (e.g. after a restart).
fn wizard_session(bot: &Bot, event: &InboundMessage) -> Session {
    return bot
        .sessions
        .get(event.session_id)
        .unwrap_or_else(|| return Session::with_config(bot.defaults.clone()));
}

async fn retract_previous_keyboard(bot: &Bot, event: &InboundMessage) {
    if let Some(mut session) = bot.sessions.get(event.session_id) {
        turn_engine::remove_keyboard(bot, event.chat_id, &mut session).await;
        bot.sessions.set(event.session_id, Some(session));
    }
}

fn session_config(bot: &Bot, event: &InboundMessage) -> GameConfig {
    return bot
        .sessions
        .get(event.session_id)
        .map(|session| return session.config)
        .unwrap_or_else(|| return bot.defaults.clone());
}

/// Replaces any previous session with a brand new one for the given game and
/// plays until the human is up.
async fn begin_game(
    bot: &Bot,
    event: &InboundMessage,
    game_id: &str,
    state: GameState,
    announcement: &str,
) -> Transition {
    let config = session_config(bot, event);
    retract_previous_keyboard(bot, event).await;
    bot.sessions.set(
        event.session_id,
        Some(Session::for_game(config, game_id, state)),
    );
    log_context::set_game_id(game_id);

    bot.send_markdown(event.chat_id, announcement).await?;
    return turn_engine::fast_forward(bot, event).await;
}

async fn start(bot: &Bot, event: &InboundMessage) -> Transition {
    let config = session_config(bot, event);
    tracing::info!(user_name = %event.user_name, config = ?config, "Got start event");

    let res = bot
        .client
        .start_game(StartGameRequest {
            language: config.language,
            first_team: None,
        })
        .await?;

    return begin_game(
        bot,
        event,
        &res.game_id,
        res.game_state,
        &renderer::game_starting_text(&res.game_id),
    )
    .await;
}

async fn custom(bot: &Bot, event: &InboundMessage) -> Transition {
    retract_previous_keyboard(bot, event).await;
    bot.sessions.set(
        event.session_id,
        Some(Session::with_config(bot.defaults.clone())),
    );

    let message =
        OutboundMessage::text("🌍 Pick language:").with_keyboard(renderer::language_keyboard());
    bot.send(event.chat_id, message).await?;

    return Ok(Some(ConversationState::ConfigLanguage));
}

async fn config_language(bot: &Bot, event: &InboundMessage) -> Transition {
    let text = event.text.trim();
    tracing::info!(text, "Setting language");
    let language = Language::from_str(text).map_err(|_| {
        return BotError::bad_input_with_keyboard(
            &format!("Unknown language '{text}'. 🌍 Pick language:"),
            renderer::language_keyboard(),
        );
    })?;

    let mut session = wizard_session(bot, event);
    session.config.language = language;
    session.config.model_identifier = None;
    bot.sessions.set(event.session_id, Some(session));

    let message = OutboundMessage::text("🥵 Pick difficulty:")
        .with_keyboard(Keyboard::single_row(difficulty_options()));
    bot.send(event.chat_id, message).await?;

    return Ok(Some(ConversationState::ConfigDifficulty));
}

async fn config_difficulty(bot: &Bot, event: &InboundMessage) -> Transition {
    let text = event.text.trim();
    tracing::info!(text, "Setting difficulty");
    let difficulty = Difficulty::from_str(text).map_err(|_| {
        return BotError::bad_input_with_keyboard(
            &format!("Unknown difficulty '{text}'. 🥵 Pick difficulty:"),
            Keyboard::single_row(difficulty_options()),
        );
    })?;

    let mut session = wizard_session(bot, event);
    session.config.difficulty = difficulty;
    let language = session.config.language;
    bot.sessions.set(event.session_id, Some(session));

    let message = OutboundMessage::text("🧠 Pick model:")
        .with_keyboard(Keyboard::single_row(model_options(language)));
    bot.send(event.chat_id, message).await?;

    return Ok(Some(ConversationState::ConfigModel));
}

async fn config_model(bot: &Bot, event: &InboundMessage) -> Transition {
    let text = event.text.trim();
    tracing::info!(text, "Setting model");
    let mut session = wizard_session(bot, event);
    let language = session.config.language;
    let model_identifier = ModelIdentifier::parse(language, text).map_err(|_| {
        return BotError::bad_input_with_keyboard(
            &format!("Unknown model '{text}' for {language}. 🧠 Pick model:"),
            Keyboard::single_row(model_options(language)),
        );
    })?;

    session.config.model_identifier = model_identifier;
    bot.sessions.set(event.session_id, Some(session));

    return start(bot, event).await;
}

async fn solver(bot: &Bot, event: &InboundMessage) -> Transition {
    if has_active_game(bot, event) {
        bot.send_text(
            event.chat_id,
            "The solver can only be changed between games. Use /quit to end this one.",
        )
        .await?;
        return Ok(Some(ConversationState::Playing));
    }

    bot.sessions
        .set(event.session_id, Some(wizard_session(bot, event)));
    let message = OutboundMessage::text("🤖 Pick solver:")
        .with_keyboard(Keyboard::single_row(solver_options()));
    bot.send(event.chat_id, message).await?;

    return Ok(Some(ConversationState::ConfigSolver));
}

async fn config_solver(bot: &Bot, event: &InboundMessage) -> Transition {
    let text = event.text.trim();
    tracing::info!(text, "Setting solver");
    let solver = Solver::from_str(text).map_err(|_| {
        return BotError::bad_input_with_keyboard(
            &format!("Unknown solver '{text}'. 🤖 Pick solver:"),
            Keyboard::single_row(solver_options()),
        );
    })?;

    let mut session = wizard_session(bot, event);
    session.config.solver = solver;
    bot.sessions.set(event.session_id, Some(session));

    bot.send_markdown(
        event.chat_id,
        &format!("Solver set to *{solver}*. Use /start to play."),
    )
    .await?;

    return Ok(None);
}

async fn continue_game(bot: &Bot, event: &InboundMessage) -> Transition {
    if let Some(command) = SlashCommand::parse(&event.text) {
        if let Some(game_id) = command.args.first() {
            return resume(bot, event, game_id).await;
        }
    }

    bot.send_text(event.chat_id, "🔗 Send the id of the game to continue:")
        .await?;

    return Ok(Some(ConversationState::ContinueGetId));
}

async fn continue_get_id(bot: &Bot, event: &InboundMessage) -> Transition {
    let game_id = event.text.trim().trim_start_matches('#');
    return resume(bot, event, game_id).await;
}

async fn resume(bot: &Bot, event: &InboundMessage, game_id: &str) -> Transition {
    if game_id.is_empty() || game_id.starts_with('/') || game_id.contains(char::is_whitespace) {
        return Err(BotError::bad_input("🔗 Please send a single game id, e.g. 3f2a9c.").into());
    }

    tracing::info!(game_id, "Resuming game");
    let res = bot.client.get_state(game_id).await?;

    return begin_game(
        bot,
        event,
        game_id,
        res.game_state,
        &renderer::game_resumed_text(game_id),
    )
    .await;
}

/// `/quit`: forfeits a running game on the service and locally, or abandons
/// the wizard.
async fn fallback(bot: &Bot, event: &InboundMessage) -> Transition {
    let session = bot.sessions.get(event.session_id);
    let game_id = session
        .as_ref()
        .and_then(|session| return session.game_id())
        .map(|game_id| return game_id.to_string());

    match game_id {
        Some(game_id) => {
            retract_previous_keyboard(bot, event).await;
            return submit_guess(bot, event, &game_id, QUIT_GAME).await;
        }
        None => {
            bot.sessions.set(event.session_id, None);
            bot.send_text(event.chat_id, "Alright, see you next time! 👋")
                .await?;
            return Ok(None);
        }
    }
}

pub async fn help(bot: &Bot, event: &InboundMessage) -> Result<()> {
    tracing::info!("Got help message");
    // Plain text: user names may carry `_` or `*`.
    bot.send_text(event.chat_id, &renderer::help_text(&event.user_name))
        .await?;

    return Ok(());
}

/// Maps a guess to a card index: 1-based numbers or board words.
pub fn parse_card_index(state: &GameState, text: &str) -> Option<i32> {
    if let Some(command) = GuessCommand::parse(text) {
        match command {
            GuessCommand::Pass => return Some(PASS_GUESS),
            GuessCommand::Quit => return Some(QUIT_GAME),
        }
    }

    if let Ok(number) = text.trim().parse::<usize>() {
        if number >= 1 && number <= state.cards.len() {
            return i32::try_from(number - 1).ok();
        }
        return None;
    }

    return state
        .find_card_index(text)
        .and_then(|idx| return i32::try_from(idx).ok());
}

async fn submit_guess(
    bot: &Bot,
    event: &InboundMessage,
    game_id: &str,
    card_index: i32,
) -> Transition {
    tracing::info!(game_id, card_index, "Submitting guess");
    let res = bot
        .client
        .guess(GuessRequest {
            game_id: game_id.to_string(),
            card_index,
        })
        .await?;

    if let Some(mut session) = bot.sessions.get(event.session_id) {
        session.set_state(res.game_state);
        bot.sessions.set(event.session_id, Some(session));
    }

    match res.given_guess {
        Some(guess) => {
            bot.send_markdown(event.chat_id, &renderer::guess_text(&guess))
                .await?;
        }
        None if card_index == QUIT_GAME => {
            bot.send_text(event.chat_id, "You quit the game. 🏳️").await?;
        }
        // Passing doesn't reveal anything.
        None => {}
    }

    return turn_engine::fast_forward(bot, event).await;
}

async fn process_message(bot: &Bot, event: &InboundMessage) -> Transition {
    let text = event.text.trim().to_lowercase();
    tracing::info!(text = %text, "Processing message");

    let game = bot
        .sessions
        .get(event.session_id)
        .and_then(|session| return session.game);
    let (game_id, state) = match game {
        Some(game) => (game.game_id, game.state),
        None => {
            help(bot, event).await?;
            return Ok(None);
        }
    };

    // A previous dispatch stopped before the human's turn came up, so carry on
    // from there instead of guessing out of turn.
    if state.is_game_over || !state.is_human_turn() {
        return turn_engine::fast_forward(bot, event).await;
    }

    let card_index = match parse_card_index(&state, &text) {
        Some(card_index) => card_index,
        None => {
            retract_previous_keyboard(bot, event).await;
            return Err(BotError::bad_input_with_keyboard(
                &renderer::card_not_found_text(&event.text, state.cards.len()),
                renderer::board_keyboard(&state, false),
            )
            .into());
        }
    };

    retract_previous_keyboard(bot, event).await;
    return submit_guess(bot, event, &game_id, card_index).await;
}
