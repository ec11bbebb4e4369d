//! Error type for the fallible edges of the crate (files and configuration).
//!
//! The simulation itself never fails; only loading and saving brains and
//! reading trainer configuration can.

use thiserror::Error;

/// Errors raised while persisting brains or reading configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// A file did not contain valid JSON for the expected type.
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
