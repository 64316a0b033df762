//! CLI client for the live listening room server.

pub mod domain;
pub mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use domain::ClientIdentity;
pub use runner::run_client;
