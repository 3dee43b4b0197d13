//! Error types for the Project Lens core.

use thiserror::Error;

/// Errors that can occur while loading config or reading feed data.
#[derive(Error, Debug)]
pub enum LensError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store responded with {status}: {message}")]
    Store { status: u16, message: String },

    #[error("Store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Could not decode store response: {0}")]
    Decode(String),

    #[error("Store is not configured")]
    StoreNotConfigured,
}

/// Result type alias for Project Lens operations.
pub type LensResult<T> = Result<T, LensError>;
