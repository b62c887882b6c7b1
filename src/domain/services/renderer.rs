#[cfg(test)]
#[path = "renderer_test.rs"]
mod tests;

use anyhow::Result;

use crate::domain::models::language_options;
use crate::domain::models::BotError;
use crate::domain::models::Card;
use crate::domain::models::GameState;
use crate::domain::models::GivenGuess;
use crate::domain::models::GivenHint;
use crate::domain::models::GuessCommand;
use crate::domain::models::Keyboard;
use crate::domain::models::TeamColor;
use crate::domain::models::HUMAN_TEAM;

fn row_width(cell_count: usize) -> usize {
    let mut width = 1;
    while width * width < cell_count {
        width += 1;
    }

    return width;
}

fn card_cell(card: &Card, is_game_over: bool) -> String {
    let emoji = card.color.map(|color| return color.emoji());
    if is_game_over {
        if let Some(emoji) = emoji {
            return format!("{emoji} {}", card.word);
        }
        return card.word.to_string();
    }

    if card.revealed {
        if let Some(emoji) = emoji {
            return emoji.to_string();
        }
    }

    return card.word.to_string();
}

/// Builds the guessing keyboard. Unrevealed colors stay hidden until the game
/// is over, after which every card shows its color and word.
pub fn board_keyboard(state: &GameState, is_game_over: bool) -> Keyboard {
    let cards = if is_game_over {
        state.cards.to_vec()
    } else {
        state.censored_cards()
    };

    let mut rows = cards
        .chunks(row_width(cards.len()))
        .map(|row| {
            return row
                .iter()
                .map(|card| return card_cell(card, is_game_over))
                .collect::<Vec<String>>();
        })
        .collect::<Vec<Vec<String>>>();

    rows.push(vec![
        GuessCommand::Pass.label().to_string(),
        GuessCommand::Quit.label().to_string(),
    ]);

    return Keyboard { rows };
}

pub fn board_text(state: &GameState) -> String {
    let mut text = if state.is_game_over {
        "Game over!".to_string()
    } else {
        "Pick your guess!".to_string()
    };
    if state.bonus_given {
        text += " (bonus round)";
    }

    return text;
}

pub fn score_text(state: &GameState) -> String {
    return format!(
        "{}  *{}*  remaining card(s)  *{}*  {}",
        TeamColor::Blue.emoji(),
        state.remaining(TeamColor::Blue),
        state.remaining(TeamColor::Red),
        TeamColor::Red.emoji()
    );
}

pub fn thinking_text(team: TeamColor) -> String {
    return format!("{team} hinter is thinking... 🤔");
}

pub fn skipped_turn_text(team: TeamColor) -> String {
    return format!("{team} guesser has skipped the turn.");
}

pub fn clue_text(team: TeamColor, hint: &GivenHint) -> String {
    return format!(
        "{team} says '{}' with {} card(s).",
        hint.word, hint.card_amount
    );
}

fn guess_result(guess: &GivenGuess) -> String {
    let card = &guess.guessed_card;
    let color = card
        .color
        .map(|color| return color.emoji())
        .unwrap_or("❔");
    let result = if guess.correct {
        "Correct! ✅"
    } else {
        "Wrong! ❌"
    };

    return format!("'{}' is {color}, {result}", card.word);
}

pub fn guess_text(guess: &GivenGuess) -> String {
    return format!("Card {}", guess_result(guess));
}

pub fn automated_guess_text(team: TeamColor, guess: &GivenGuess) -> String {
    return format!("{team} guesser: {}", guess_result(guess));
}

/// Lists what hinters meant with their clues, if they said.
pub fn intents_text(state: &GameState) -> Option<String> {
    let intents = state
        .raw_hints
        .iter()
        .filter_map(|hint| {
            let for_words = hint.for_words.as_ref()?;
            if for_words.is_empty() {
                return None;
            }
            return Some(format!("'*{}*' for {}", hint.word, for_words.join(", ")));
        })
        .collect::<Vec<String>>();

    if intents.is_empty() {
        return None;
    }

    return Some(format!("Hinters intents were:\n{}\n", intents.join("\n")));
}

pub fn winner_text(state: &GameState) -> Result<String> {
    let winner = match &state.winner {
        Some(winner) => winner,
        None => {
            return Err(BotError::ProtocolViolation(
                "game is over but has no winner".to_string(),
            )
            .into())
        }
    };

    let player_won = winner.team_color == HUMAN_TEAM;
    let (status, emoji) = if player_won {
        ("won", "🎉")
    } else {
        ("lose", "😭")
    };

    return Ok(format!(
        "You {status}! {emoji}\n{} team won: {} {}",
        winner.team_color,
        winner.reason.description(),
        winner.reason.emoji()
    ));
}

pub fn game_starting_text(game_id: &str) -> String {
    return format!("Game *#{game_id}* is starting! 🥳");
}

pub fn game_resumed_text(game_id: &str) -> String {
    return format!("Game *#{game_id}* is back on! 🔁");
}

pub fn card_not_found_text(text: &str, card_count: usize) -> String {
    return format!(
        "Card '{text}' not found. Please reply with card index (1-{card_count}) or a word on the board."
    );
}

pub fn language_keyboard() -> Keyboard {
    return Keyboard::single_row(language_options());
}

pub fn help_text(user_name: &str) -> String {
    let text = format!(
        r#"
Hi {user_name}!
/start - start a new game.
/custom - start a new game with custom configurations.
/continue - continue an old game.
/solver - pick the solver playing the other roles.
/quit - quit the current game or configuration.
/help - show this message.

How to play:
You are the blue guesser. The bot will play all other roles. When the blue hinter sends a hint, you can reply with a card index (1-25), or just click the word on the keyboard. Use '-pass' and '-quit' to pass the turn and quit the game.
        "#
    );

    return text.trim().to_string();
}
