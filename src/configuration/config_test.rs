use anyhow::Result;

use super::Config;
use super::ConfigKey;
use crate::application::cli;

#[test]
fn it_serializes_to_valid_toml() -> Result<()> {
    let res = Config::serialize_default(cli::build());
    let doc = res.parse::<toml_edit::Document>()?;

    assert_eq!(doc["backend-url"].as_str(), Some("http://localhost:8000"));
    assert_eq!(doc["request-timeout"].as_integer(), Some(15000));
    assert_eq!(doc["transport"].as_str(), Some("telegram"));
    assert!(doc.get("telegram-token").is_none());
    assert!(doc.get("config-file").is_none());
    assert!(res.contains("[possible values: easy, medium, hard]"));

    return Ok(());
}

#[test]
fn it_falls_back_to_default_numbers() {
    assert_eq!(
        Config::default(ConfigKey::RequestTimeout).parse::<u64>().ok(),
        Some(15000)
    );
    assert_eq!(Config::default(ConfigKey::PacingMin), "200");
}

#[tokio::test]
async fn it_loads_config_from_file() -> Result<()> {
    let matches =
        cli::build().try_get_matches_from(vec!["spymaster-bot", "-c", "./config.example.toml"])?;
    Config::load(cli::build(), vec![&matches]).await?;
    return Ok(());
}

#[tokio::test]
async fn it_fails_to_loads_config_from_file() -> Result<()> {
    let matches =
        cli::build().try_get_matches_from(vec!["spymaster-bot", "-c", "./test/bad-config.toml"])?;
    let res = Config::load(cli::build(), vec![&matches]).await;
    assert!(res.is_err());
    return Ok(());
}
