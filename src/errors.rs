// src/errors.rs

use thiserror::Error;

pub type ColloquyResult<T> = Result<T, ColloquyError>;

/// Error taxonomy for the chat core. The three completion variants
/// (`Network`, `Http`, `Decode`) all fold into the same user-visible
/// fallback reply; the rest are contract violations surfaced to the caller.
#[derive(Debug, Error)]
pub enum ColloquyError {
    #[error("network failure: {0}")]
    Network(String),

    #[error("completion endpoint returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("unexpected response shape: {0}")]
    Decode(String),

    #[error("storage failure: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("conversation index {index} out of range (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("no active conversation")]
    NoActiveConversation,

    #[error("input is empty")]
    EmptyInput,
}

impl ColloquyError {
    pub fn network(msg: impl Into<String>) -> Self {
        ColloquyError::Network(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        ColloquyError::Decode(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        ColloquyError::Storage(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        ColloquyError::Config(msg.into())
    }

    /// True for the failures that the submit flow masks behind the
    /// fallback assistant reply.
    pub fn is_completion_failure(&self) -> bool {
        matches!(
            self,
            ColloquyError::Network(_) | ColloquyError::Http { .. } | ColloquyError::Decode(_)
        )
    }
}
