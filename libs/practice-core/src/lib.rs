//! Core practice-session library shared by the engine and its consumers.
//!
//! Provides:
//! - Question bank loading with load-time prompt classification
//! - Free-text answer evaluation (normalized, multi-variant matching)
//! - SM-2 spaced repetition calculator
//! - Session plan selection (category, random, incorrect, marked, due)
//! - Shared types (Question, SrsRecord, Quality, etc.)

pub mod bank;
pub mod error;
pub mod evaluate;
pub mod select;
pub mod sm2;
pub mod types;

pub use bank::QuestionBank;
pub use error::{BankError, Result};
pub use evaluate::is_correct;
pub use select::{SessionBuilder, SessionSlot};
pub use sm2::{review_status, Quality, Sm2};
pub use types::{
    Category, Difficulty, PresentationMode, Question, QuestionId, QuestionKind, RawQuestion,
    SessionMode, SrsRecord,
};
