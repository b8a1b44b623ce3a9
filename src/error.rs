//! Errors raised while talking to the game server
//!
//! Application rejections (`success: false`) are not errors: they are
//! decoded into the `Rejected` variant of each reply. This type only
//! covers the cases where no usable reply was obtained at all.

use thiserror::Error;

/// Failure to obtain a decodable reply from the game server
#[derive(Error, Debug)]
pub enum Error {
    /// The request could not be sent or the body could not be read
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    /// The body was received but is not the expected JSON shape
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The server answered with an error status and an unreadable body
    #[error("server responded with status {0}")]
    Status(u16),
    /// The client configuration is unusable
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result alias for fallible API operations
pub type Result<T> = std::result::Result<T, Error>;
