//! Session state machine and its capability seams.

mod controller;

pub use controller::{
    AnswerOutcome, Progress, SessionController, SessionPhase, SessionSettings, SessionStats,
};

use practice_core::types::Question;

/// Audio collaborator for audio-cue presentation slots.
///
/// Injected at construction time so the controller never reaches for a
/// global playback handle and stays testable without real audio.
pub trait CuePlayer: Send + Sync {
    /// Called when a question is presented in audio-cue mode.
    fn begin_cue(&self, question: &Question);
}

/// No-op cue player for tests and headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCue;

impl CuePlayer for NullCue {
    fn begin_cue(&self, _question: &Question) {}
}
