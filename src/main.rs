#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;
use std::sync::Arc;

use anyhow::anyhow;
use anyhow::Error;
use anyhow::Result;
use yansi::Paint;

use crate::application::cli;
use crate::application::runner;
use crate::application::runner::Runner;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::TransportName;
use crate::domain::services::Bot;
use crate::domain::services::Dispatcher;
use crate::infrastructure::game_clients::spymaster::Spymaster;
use crate::infrastructure::transports::TransportManager;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        Paint::red(format!(
            "Oh no! The Spymaster bot has failed with the following app version and error.\n\nVersion: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            err
        ))
    );

    let backtrace = err.backtrace();
    if backtrace.to_string() == "disabled backtrace" {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 {args}");
    } else {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

async fn start() -> Result<()> {
    let name = TransportName::parse(Config::get(ConfigKey::Transport))
        .ok_or_else(|| return anyhow!("Unknown transport {}", Config::get(ConfigKey::Transport)))?;
    let transport = TransportManager::get(name)?;
    let bot = Bot::new(Box::<Spymaster>::default(), transport);

    runner::warm_up(&bot).await;

    let dispatcher = Arc::new(Dispatcher::new(bot));
    return Runner::new(dispatcher).run().await;
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let debug_enabled = env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("spymaster_bot");
    let level = if debug_enabled {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Logs go to stdout when running in a container, to a file otherwise.
    let _guard = if env::var("SPYMASTER_LOG_STDOUT").is_ok() {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        tracing_subscriber::fmt()
            .json()
            .with_max_level(level)
            .with_writer(writer)
            .init();
        guard
    } else {
        let file_appender = tracing_appender::rolling::never(cli::log_dir(), "debug.log");
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        tracing_subscriber::fmt()
            .json()
            .with_max_level(level)
            .with_writer(writer)
            .init();
        guard
    };

    match cli::parse().await {
        Ok(true) => {}
        Ok(false) => process::exit(0),
        Err(err) => {
            handle_error(err);
            return;
        }
    }

    if let Err(err) = start().await {
        handle_error(err);
    }
}
