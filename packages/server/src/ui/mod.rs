//! Listening room server: axum router, handlers and shared state.

mod handler;
mod server;
mod signal;
pub mod state;

pub use handler::decode_frame;
pub use server::Server;
