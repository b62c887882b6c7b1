#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

use crate::domain::models::Difficulty;
use crate::domain::models::Language;
use crate::domain::models::Solver;
use crate::domain::models::TransportName;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    BackendURL,
    ConfigFile,
    Difficulty,
    Language,
    PacingMax,
    PacingMin,
    PollTimeout,
    RequestTimeout,
    Solver,
    TelegramToken,
    TelegramURL,
    Transport,
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    /// Reads a numeric key, falling back to its default when unset or
    /// malformed.
    pub fn get_u64(key: ConfigKey) -> u64 {
        if let Ok(val) = Config::get(key).parse::<u64>() {
            return val;
        }

        return Config::default(key).parse::<u64>().unwrap_or_default();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        let default_transport = TransportName::Telegram.to_string();
        let default_language = Language::English.to_string();
        let default_difficulty = Difficulty::Easy.to_string();
        let default_solver = Solver::Naive.to_string();

        let config_path = dirs::config_dir()
            .unwrap_or_else(|| return path::PathBuf::from("."))
            .join("spymaster-bot/config.toml");
        let config_path_str = config_path.to_string_lossy().to_string();

        let res = match key {
            ConfigKey::BackendURL => "http://localhost:8000",
            ConfigKey::Difficulty => &default_difficulty,
            ConfigKey::Language => &default_language,
            ConfigKey::PacingMax => "700",
            ConfigKey::PacingMin => "200",
            ConfigKey::PollTimeout => "30",
            ConfigKey::RequestTimeout => "15000",
            ConfigKey::Solver => &default_solver,
            ConfigKey::TelegramToken => "",
            ConfigKey::TelegramURL => "https://api.telegram.org",
            ConfigKey::Transport => &default_transport,

            // Special
            ConfigKey::ConfigFile => &config_path_str,
        };

        return res.to_string();
    }

    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if let Some(val) = doc.get(&key.to_string()) {
                    // Use clap value parsers to do validation.
                    let mut possible_values = vec![];
                    if let Some(arg) = cmd
                        .get_arguments()
                        .find(|e| return e.get_long() == Some(key.to_string().as_str()))
                    {
                        if !arg.get_possible_values().is_empty() {
                            possible_values = arg
                                .get_possible_values()
                                .iter()
                                .map(|e| return e.get_name().to_string())
                                .collect::<Vec<String>>();
                        }
                    }

                    if let Some(val_int) = val.as_integer() {
                        Config::set(key, &val_int.to_string());
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        if !possible_values.is_empty()
                            && !possible_values.contains(&val_str.to_string())
                        {
                            bail!(format!("config.toml has an invalid value for key '{key}': {val_str}\nPossible values are: {}", possible_values.join(", ")));
                        }
                        Config::set(key, val_str);
                    }
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        if Config::get_u64(ConfigKey::PacingMin) > Config::get_u64(ConfigKey::PacingMax) {
            bail!(format!(
                "{} must not be larger than {}",
                ConfigKey::PacingMin,
                ConfigKey::PacingMax
            ));
        }

        tracing::debug!(
            backend_url = %Config::get(ConfigKey::BackendURL),
            transport = %Config::get(ConfigKey::Transport),
            telegram_url = %Config::get(ConfigKey::TelegramURL),
            request_timeout = %Config::get(ConfigKey::RequestTimeout),
            language = %Config::get(ConfigKey::Language),
            difficulty = %Config::get(ConfigKey::Difficulty),
            solver = %Config::get(ConfigKey::Solver),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                if key == ConfigKey::TelegramToken {
                    return Some(
                        "# Bot token issued by BotFather. Prefer the SPYMASTER_TELEGRAM_TOKEN environment variable.\n# telegram-token = \"\""
                            .to_string(),
                    );
                }

                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.to_string().as_str()))?;

                let mut description = arg
                    .get_help()
                    .map(|help| return help.to_string())
                    .unwrap_or_default();

                description = description
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                if !arg.get_possible_values().is_empty() {
                    let possible_values = arg
                        .get_possible_values()
                        .iter()
                        .map(|e| return e.get_name())
                        .collect::<Vec<_>>()
                        .join(", ");
                    description = format!("{description} [possible values: {}]", possible_values);
                }

                let mut val = Config::default(key);
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if val.parse::<i64>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
