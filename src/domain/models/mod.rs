mod conversation;
mod error;
mod game;
mod game_client;
mod game_config;
mod message;
mod session;
mod slash_commands;
mod transport;

pub use conversation::*;
pub use error::*;
pub use game::*;
pub use game_client::*;
pub use game_config::*;
pub use message::*;
pub use session::*;
pub use slash_commands::*;
pub use transport::*;
