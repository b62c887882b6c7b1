#[cfg(test)]
#[path = "turn_engine_test.rs"]
mod tests;

use anyhow::Result;

use super::handlers;
use super::renderer;
use super::Bot;
use crate::domain::models::BotError;
use crate::domain::models::ChatId;
use crate::domain::models::ConversationState;
use crate::domain::models::GameState;
use crate::domain::models::GuessRequest;
use crate::domain::models::InboundMessage;
use crate::domain::models::NextMoveRequest;
use crate::domain::models::OutboundMessage;
use crate::domain::models::PlayerRole;
use crate::domain::models::Session;
use crate::domain::models::PASS_GUESS;

/// Upper bound on automated moves between two human turns. A real game never
/// gets close; hitting it means the service keeps handing the turn around
/// without ever reaching the human.
const MAX_AUTOMATED_MOVES: usize = 200;

/// Decides whether an automated guesser passes instead of guessing. `dice` is
/// a uniform draw from `[0, 1)`.
pub fn should_skip_turn(role: PlayerRole, pass_probability: f64, dice: f64) -> bool {
    return role == PlayerRole::Guesser && dice < pass_probability;
}

/// Whether an automated move moved the game forward: the turn changed, a card
/// got revealed, or the game ended.
pub fn made_progress(before: &GameState, after: &GameState) -> bool {
    let revealed = |state: &GameState| {
        return state.cards.iter().filter(|card| return card.revealed).count();
    };

    return after.is_game_over || after.turn() != before.turn() || revealed(after) > revealed(before);
}

/// Takes the keyboard off the last board we sent. Failures are expected
/// (message gone, already edited) and only logged.
pub async fn remove_keyboard(bot: &Bot, chat_id: ChatId, session: &mut Session) {
    let message_id = match session.last_keyboard_message.take() {
        Some(message_id) => message_id,
        None => return,
    };

    tracing::debug!(message_id, "Removing keyboard");
    if let Err(err) = bot.transport.remove_keyboard(chat_id, message_id).await {
        tracing::debug!(error = ?err, message_id, "Failed to remove keyboard");
    }
}

/// Sends the board as a keyboard and remembers the message so it can be
/// retracted later.
pub async fn send_board(
    bot: &Bot,
    chat_id: ChatId,
    session: &mut Session,
    text: Option<String>,
) -> Result<()> {
    let state = match session.state() {
        Some(state) => state,
        None => return Ok(()),
    };

    let keyboard = renderer::board_keyboard(state, state.is_game_over);
    let text = text.unwrap_or_else(|| return renderer::board_text(state));
    let message_id = bot
        .send(chat_id, OutboundMessage::markdown(&text).with_keyboard(keyboard))
        .await?;
    session.last_keyboard_message = Some(message_id);

    return Ok(());
}

async fn send_game_summary(bot: &Bot, chat_id: ChatId, state: &GameState) -> Result<()> {
    let winner_text = renderer::winner_text(state)?;
    if let Some(intents) = renderer::intents_text(state) {
        bot.send_markdown(chat_id, &intents).await?;
    }

    tracing::info!(winner = ?state.winner, "Game over");
    bot.send_text(chat_id, &winner_text).await?;

    return Ok(());
}

/// Plays one automated move and returns the state after it.
async fn next_move(
    bot: &Bot,
    chat_id: ChatId,
    session: &Session,
    game_id: &str,
    state: &GameState,
) -> Result<GameState> {
    let team = state.current_team_color;
    let role = state.current_player_role;
    if role == PlayerRole::Hinter {
        bot.send_markdown(chat_id, &renderer::score_text(state))
            .await?;
        bot.send_text(chat_id, &renderer::thinking_text(team))
            .await?;
    }

    let dice = bot.dice.roll();
    if should_skip_turn(role, session.config.difficulty.pass_probability(), dice) {
        tracing::info!(team = %team, "Automated guesser skips the turn");
        bot.send_text(chat_id, &renderer::skipped_turn_text(team))
            .await?;
        let res = bot
            .client
            .guess(GuessRequest {
                game_id: game_id.to_string(),
                card_index: PASS_GUESS,
            })
            .await?;

        return Ok(res.game_state);
    }

    let res = bot
        .client
        .next_move(NextMoveRequest {
            game_id: game_id.to_string(),
            solver: session.config.solver,
            model_identifier: session.config.model_identifier.clone(),
        })
        .await?;

    tracing::debug!(
        solver = %res.used_solver,
        model = ?res.used_model_identifier,
        "Automated move played"
    );

    if let Some(clue) = &res.given_clue {
        let text = renderer::clue_text(team, clue);
        tracing::info!(text = %text, "Automated clue");
        bot.send_text(chat_id, &text).await?;
    }
    if let Some(guess) = &res.given_guess {
        bot.send_text(chat_id, &renderer::automated_guess_text(team, guess))
            .await?;
    }

    return Ok(res.game_state);
}

/// Plays automated moves until it's the human's turn or the game is over,
/// then renders the board. The session is written back after every move so
/// a failure midway leaves the latest known state behind.
pub async fn fast_forward(bot: &Bot, event: &InboundMessage) -> Result<Option<ConversationState>> {
    let session_id = event.session_id;
    let chat_id = event.chat_id;
    let mut session = match bot.sessions.get(session_id) {
        Some(session) => session,
        None => return Ok(None),
    };

    remove_keyboard(bot, chat_id, &mut session).await;
    bot.sessions.set(session_id, Some(session.clone()));

    let mut moves = 0;
    loop {
        let (game_id, state) = match &session.game {
            Some(game) => (game.game_id.to_string(), game.state.clone()),
            None => return Ok(None),
        };
        if state.is_game_over || state.is_human_turn() {
            break;
        }
        if moves >= MAX_AUTOMATED_MOVES {
            return Err(BotError::ProtocolViolation(format!(
                "no human turn after {moves} automated moves"
            ))
            .into());
        }

        let next_state = next_move(bot, chat_id, &session, &game_id, &state).await?;
        if !made_progress(&state, &next_state) {
            tracing::error!(
                game_id = %game_id,
                team = %state.current_team_color,
                role = %state.current_player_role,
                "Automated move did not advance the turn"
            );
            return Err(BotError::ProtocolViolation(format!(
                "move by {} {} did not advance the turn",
                state.current_team_color, state.current_player_role
            ))
            .into());
        }

        session.set_state(next_state);
        bot.sessions.set(session_id, Some(session.clone()));
        moves += 1;

        tokio::time::sleep(bot.pacing.delay()).await;
    }

    send_board(bot, chat_id, &mut session, None).await?;
    bot.sessions.set(session_id, Some(session.clone()));

    let state = match session.state() {
        Some(state) => state.clone(),
        None => return Ok(None),
    };
    if !state.is_game_over {
        return Ok(Some(ConversationState::Playing));
    }

    let summary = send_game_summary(bot, chat_id, &state).await;
    // Only the game goes; the player's config stays for the next /start.
    session.end_game();
    bot.sessions.set(session_id, Some(session));
    summary?;
    handlers::help(bot, event).await?;

    return Ok(None);
}
