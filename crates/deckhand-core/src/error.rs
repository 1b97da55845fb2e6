//! Error types for deckhand-core

use thiserror::Error;

/// Result type alias using deckhand-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in deckhand-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Remote client error
    #[error(transparent)]
    Client(#[from] crate::client::ClientError),

    /// Local deck file could not be parsed
    #[error(transparent)]
    Deck(#[from] crate::parser::MalformedDeckError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
