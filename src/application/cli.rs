use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Difficulty;
use crate::domain::models::Language;
use crate::domain::models::Solver;
use crate::domain::models::TransportName;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

/// Directory the JSON debug log is written to.
pub fn log_dir() -> path::PathBuf {
    if let Ok(dir) = std::env::var("SPYMASTER_LOG_DIR") {
        return path::PathBuf::from(dir);
    }

    return dirs::cache_dir()
        .unwrap_or_else(|| return path::PathBuf::from("."))
        .join("spymaster-bot");
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for the bot")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to the debug log file generated when running with environment variable RUST_LOG=spymaster_bot")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn config_arg(key: ConfigKey, env: &'static str, help: &str) -> Arg {
    let default = Config::default(key);
    let help = if default.is_empty() {
        help.to_string()
    } else {
        format!("{help} [default: {default}]")
    };

    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(env)
        .num_args(1)
        .help(help)
        .global(true);
}

fn config_args() -> Vec<Arg> {
    return vec![
        config_arg(
            ConfigKey::BackendURL,
            "SPYMASTER_BACKEND_URL",
            "Base URL of The Spymaster game API.",
        )
        .short('u'),
        config_arg(
            ConfigKey::RequestTimeout,
            "SPYMASTER_REQUEST_TIMEOUT",
            "Time to wait in milliseconds for the game API before giving up on a request.",
        ),
        config_arg(
            ConfigKey::Transport,
            "SPYMASTER_TRANSPORT",
            "Chat transport to serve players through.",
        )
        .short('t')
        .value_parser(PossibleValuesParser::new(TransportName::VARIANTS)),
        config_arg(
            ConfigKey::TelegramToken,
            "SPYMASTER_TELEGRAM_TOKEN",
            "Bot token issued by BotFather when using the telegram transport.",
        ),
        config_arg(
            ConfigKey::TelegramURL,
            "SPYMASTER_TELEGRAM_URL",
            "Telegram Bot API URL. Can be swapped to a local Bot API server.",
        ),
        config_arg(
            ConfigKey::PollTimeout,
            "SPYMASTER_POLL_TIMEOUT",
            "Seconds a Telegram long poll waits for new messages.",
        ),
        config_arg(
            ConfigKey::PacingMin,
            "SPYMASTER_PACING_MIN",
            "Shortest delay in milliseconds between automated moves.",
        ),
        config_arg(
            ConfigKey::PacingMax,
            "SPYMASTER_PACING_MAX",
            "Longest delay in milliseconds between automated moves.",
        ),
        config_arg(
            ConfigKey::Language,
            "SPYMASTER_LANGUAGE",
            "Board language used by /start when a player has no custom configuration.",
        )
        .short('l')
        .value_parser(PossibleValuesParser::new(Language::VARIANTS)),
        config_arg(
            ConfigKey::Difficulty,
            "SPYMASTER_DIFFICULTY",
            "Difficulty used by /start when a player has no custom configuration.",
        )
        .short('d')
        .value_parser(PossibleValuesParser::new(Difficulty::VARIANTS)),
        config_arg(
            ConfigKey::Solver,
            "SPYMASTER_SOLVER",
            "Solver playing the automated roles unless a player picks another one.",
        )
        .value_parser(PossibleValuesParser::new(Solver::VARIANTS)),
        config_arg(
            ConfigKey::ConfigFile,
            "SPYMASTER_CONFIG_FILE",
            "Path to configuration file",
        )
        .short('c'),
    ];
}

pub fn build() -> Command {
    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("spymaster-bot")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(false)
        .subcommand(Command::new("run").about("Serve players until the transport closes. This is the default."))
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .args(config_args());
}

/// Parses the command line. Returns whether the bot should be started.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    println!("{}", log_dir().join("debug.log").to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("run", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
