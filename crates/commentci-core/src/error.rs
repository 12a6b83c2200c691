//! Error types for comment-triggered builds.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid trigger pattern '{pattern}': {message}")]
    InvalidTriggerPattern { pattern: String, message: String },

    #[error("collaborator lookup failed: {0}")]
    CollaboratorLookup(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
