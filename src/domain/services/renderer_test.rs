use anyhow::Result;
use test_utils::game_state_fixture;

use super::automated_guess_text;
use super::board_keyboard;
use super::board_text;
use super::clue_text;
use super::intents_text;
use super::score_text;
use super::winner_text;
use crate::domain::models::BotError;
use crate::domain::models::CardColor;
use crate::domain::models::GameState;
use crate::domain::models::GivenGuess;
use crate::domain::models::GivenHint;
use crate::domain::models::TeamColor;
use crate::domain::models::Winner;
use crate::domain::models::WinningReason;

fn fixture() -> Result<GameState> {
    return Ok(serde_json::from_str(&game_state_fixture())?);
}

#[test]
fn it_renders_a_censored_grid_with_controls() -> Result<()> {
    let state = fixture()?;
    let keyboard = board_keyboard(&state, false);

    assert_eq!(keyboard.rows.len(), 6);
    assert_eq!(keyboard.cell_count(), 27);
    assert!(keyboard.rows[..5].iter().all(|row| return row.len() == 5));
    assert_eq!(keyboard.rows[0][..3], ["🟦", "🟦", "ship"]);
    assert_eq!(keyboard.rows[2][1], "river");
    assert_eq!(keyboard.rows[5], vec!["-pass", "-quit"]);

    return Ok(());
}

#[test]
fn it_reveals_everything_when_game_is_over() -> Result<()> {
    let state = fixture()?;
    let keyboard = board_keyboard(&state, true);

    assert_eq!(keyboard.rows[0][0], "🟦 ocean");
    assert_eq!(keyboard.rows[2][1], "💀 river");
    assert_eq!(keyboard.rows[4][4], "⬜ mint");
    assert_eq!(keyboard.rows[5], vec!["-pass", "-quit"]);

    return Ok(());
}

#[test]
fn it_renders_identically_for_identical_input() -> Result<()> {
    let state = fixture()?;

    assert_eq!(board_keyboard(&state, false), board_keyboard(&state, false));
    assert_eq!(board_keyboard(&state, true), board_keyboard(&state, true));
    assert_eq!(score_text(&state), score_text(&state));
    assert_eq!(intents_text(&state), intents_text(&state));

    return Ok(());
}

#[test]
fn it_renders_board_text() -> Result<()> {
    let mut state = fixture()?;
    assert_eq!(board_text(&state), "Pick your guess!");

    state.bonus_given = true;
    assert_eq!(board_text(&state), "Pick your guess! (bonus round)");

    state.is_game_over = true;
    state.bonus_given = false;
    assert_eq!(board_text(&state), "Game over!");

    return Ok(());
}

#[test]
fn it_renders_score() -> Result<()> {
    let state = fixture()?;
    insta::assert_snapshot!(score_text(&state), @"🟦  *7*  remaining card(s)  *8*  🟥");

    return Ok(());
}

#[test]
fn it_renders_moves() {
    let hint = GivenHint {
        word: "ocean".to_string(),
        card_amount: 2,
        for_words: None,
        team_color: TeamColor::Red,
    };
    insta::assert_snapshot!(clue_text(TeamColor::Red, &hint), @"Red says 'ocean' with 2 card(s).");

    let guess = GivenGuess {
        guessed_card: crate::domain::models::Card {
            word: "whale".to_string(),
            color: Some(CardColor::Blue),
            revealed: true,
        },
        correct: false,
    };
    insta::assert_snapshot!(automated_guess_text(TeamColor::Red, &guess), @"Red guesser: 'whale' is 🟦, Wrong! ❌");
}

#[test]
fn it_renders_intents() -> Result<()> {
    let mut state = fixture()?;
    assert_eq!(
        intents_text(&state),
        Some("Hinters intents were:\n'*sea*' for ocean, whale\n".to_string())
    );

    state.raw_hints[0].for_words = None;
    assert_eq!(intents_text(&state), None);

    return Ok(());
}

#[test]
fn it_renders_winner() -> Result<()> {
    let mut state = fixture()?;
    state.is_game_over = true;
    state.winner = Some(Winner {
        team_color: TeamColor::Red,
        reason: WinningReason::OpponentHitBlack,
    });

    assert_eq!(
        winner_text(&state)?,
        "You lose! 😭\nRed team won: Opponent hit black card 😵"
    );

    state.winner = Some(Winner {
        team_color: TeamColor::Blue,
        reason: WinningReason::TargetScoreReached,
    });
    assert_eq!(
        winner_text(&state)?,
        "You won! 🎉\nBlue team won: Target score reached 🤓"
    );

    return Ok(());
}

#[test]
fn it_rejects_game_over_without_winner() -> Result<()> {
    let mut state = fixture()?;
    state.is_game_over = true;

    let err = winner_text(&state).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BotError>(),
        Some(BotError::ProtocolViolation(_))
    ));

    return Ok(());
}
