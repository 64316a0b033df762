//! Error types for the listening room client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The server URL could not be used at all
    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A line typed by the user that does not map to a frame
    #[error("{0}")]
    InvalidInput(String),
}
