//! Utilities shared by the listening room server and client binaries.

pub mod logger;
pub mod time;
