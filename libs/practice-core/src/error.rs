//! Error types for practice-core.

use crate::types::QuestionId;
use thiserror::Error;

/// Result type alias using BankError.
pub type Result<T> = std::result::Result<T, BankError>;

/// Errors that can occur while loading a question bank.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("empty prompt for question {id}")]
    EmptyPrompt { id: QuestionId },

    #[error("empty answer for question {id}")]
    EmptyAnswer { id: QuestionId },

    #[error("duplicate question id {id}")]
    DuplicateId { id: QuestionId },
}
