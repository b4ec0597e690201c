//! Async practice-session engine.
//!
//! Owns the pieces that touch time and storage: the canonical progress
//! store over an opaque key-value adapter, and the session controller state
//! machine that drives answer evaluation and spaced repetition. Pure
//! algorithms live in `practice-core`.

pub mod session;
pub mod store;

pub use session::{
    AnswerOutcome, CuePlayer, NullCue, Progress, SessionController, SessionPhase, SessionSettings,
    SessionStats,
};
pub use store::{
    KeyValueStore, MemoryStore, ProgressSnapshot, ProgressStore, StorageError, INCORRECT_KEY,
    MARKED_KEY, SRS_KEY,
};
