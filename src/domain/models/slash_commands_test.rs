use super::GuessCommand;
use super::SlashCommand;

#[test]
fn it_parse_empty_string() {
    let text = "";
    assert!(SlashCommand::parse(text).is_none());
}

#[test]
fn it_parse_space_only() {
    let text = " ";
    assert!(SlashCommand::parse(text).is_none());
}

#[test]
fn it_parse_single_slash() {
    let text = "/";
    assert!(SlashCommand::parse(text).is_none());
}

#[test]
fn it_parse_invalid_prefix() {
    let text = "!start";
    assert!(SlashCommand::parse(text).is_none());
}

#[test]
fn it_parse_card_word() {
    assert!(SlashCommand::parse("ocean").is_none());
}

#[test]
fn it_parse_valid_prefix() {
    let text = "/start";
    let cmd = SlashCommand::parse(text);
    assert!(cmd.is_some());
    assert_eq!(cmd.unwrap().command, "/start");
}

#[test]
fn it_parse_bot_mention() {
    let cmd = SlashCommand::parse("/Custom@SpymasterBot").unwrap();
    assert!(cmd.is_custom());
}

#[test]
fn it_parse_args() {
    let cmd = SlashCommand::parse("/continue  01h2x ").unwrap();
    assert!(cmd.is_continue());
    assert_eq!(cmd.args, vec!["01h2x".to_string()]);
}

#[test]
fn it_is_short_help() {
    let cmd = SlashCommand::parse("/h").unwrap();
    assert!(cmd.is_help());
}

#[test]
fn it_is_quit() {
    let cmd = SlashCommand::parse("/quit").unwrap();
    assert!(cmd.is_quit());
    assert!(!cmd.is_start());
}

#[test]
fn it_is_solver() {
    let cmd = SlashCommand::parse("/solver").unwrap();
    assert!(cmd.is_solver());
}

#[test]
fn it_parses_guess_commands() {
    assert_eq!(GuessCommand::parse("-pass"), Some(GuessCommand::Pass));
    assert_eq!(GuessCommand::parse(" -QUIT "), Some(GuessCommand::Quit));
    assert_eq!(GuessCommand::parse("pass"), None);
}
