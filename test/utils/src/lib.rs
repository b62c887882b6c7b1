//! Boards and game states shared by the bot's tests.

pub const BOARD_WORDS: [&str; 25] = [
    "ocean", "whale", "ship", "anchor", "pirate", "moon", "piano", "dragon", "castle", "knight",
    "bank", "river", "glass", "spider", "robot", "apple", "tower", "jet", "ice", "cloud", "ninja",
    "lemon", "crown", "bridge", "mint",
];

pub const BOARD_COLORS: [&str; 25] = [
    "BLUE", "BLUE", "BLUE", "RED", "RED", "GRAY", "BLUE", "RED", "RED", "GRAY", "BLUE", "BLACK",
    "RED", "BLUE", "GRAY", "RED", "BLUE", "RED", "GRAY", "BLUE", "RED", "BLUE", "GRAY", "GRAY",
    "GRAY",
];

/// Returns a game state as served by the game API. The first two cards are
/// revealed, blue guesser is up with one hint on record.
pub fn game_state_fixture() -> String {
    let cards = BOARD_WORDS
        .iter()
        .zip(BOARD_COLORS.iter())
        .enumerate()
        .map(|(idx, (word, color))| {
            let revealed = idx < 2;
            return format!(r#"{{"word":"{word}","color":"{color}","revealed":{revealed}}}"#);
        })
        .collect::<Vec<String>>()
        .join(",");

    return format!(
        r#"{{
  "cards": [{cards}],
  "current_team_color": "BLUE",
  "current_player_role": "GUESSER",
  "remaining_score": {{"BLUE": 7, "RED": 8}},
  "winner": null,
  "is_game_over": false,
  "raw_hints": [
    {{"word": "sea", "card_amount": 2, "for_words": ["ocean", "whale"], "team_color": "BLUE"}}
  ],
  "bonus_given": false
}}"#
    );
}
