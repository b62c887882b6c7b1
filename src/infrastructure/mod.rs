pub mod game_clients;
pub mod transports;
