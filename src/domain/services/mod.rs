mod bot;
mod dispatcher;
mod handlers;
pub mod log_context;
pub mod recovery;
pub mod renderer;
mod sessions;
#[cfg(test)]
pub mod test_doubles;
pub mod turn_engine;

pub use bot::*;
pub use dispatcher::*;
pub use handlers::*;
pub use sessions::*;
