//! Session controller state machine.
//!
//! Drives one practice session: builds the plan, evaluates answers,
//! updates recall state in spaced-repetition mode, and mediates all
//! persistence through the progress store. Storage failures never block a
//! state transition; the in-memory session is the source of truth.

use crate::session::CuePlayer;
use crate::store::ProgressStore;
use chrono::{DateTime, Utc};
use practice_core::bank::QuestionBank;
use practice_core::evaluate::is_correct;
use practice_core::select::{SessionBuilder, SessionSlot};
use practice_core::sm2::{review_status, Quality, Sm2};
use practice_core::types::{PresentationMode, Question, QuestionId, SessionMode, SrsRecord};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Pool and recall state are being fetched; no question is exposed.
    Loading,
    /// A question is exposed and an answer is accepted.
    Presenting,
    /// The current question has been judged; waiting for advance.
    Answered,
    /// All questions answered (or the plan was empty); stats are frozen.
    Completed,
}

/// Position within the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Progress {
    /// Index of the question being presented; equals `total` once completed.
    pub current: usize,
    pub total: usize,
}

/// Session statistics. `score` is percent correct over answered questions.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SessionStats {
    pub correct: usize,
    pub incorrect: usize,
    pub total: usize,
    pub score: f64,
}

/// Tunables for session construction.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Target number of questions per session.
    pub session_size: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { session_size: 10 }
    }
}

/// Outcome of judging one answer.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    /// Derived quality; present only in spaced-repetition sessions.
    pub quality: Option<Quality>,
}

/// State machine owning one active practice session.
pub struct SessionController {
    id: Uuid,
    mode: SessionMode,
    bank: Arc<QuestionBank>,
    store: Arc<ProgressStore>,
    cue: Arc<dyn CuePlayer>,
    sm2: Sm2,
    settings: SessionSettings,
    plan: Vec<SessionSlot>,
    phase: SessionPhase,
    current: usize,
    correct: usize,
    answered: usize,
    srs: HashMap<QuestionId, SrsRecord>,
    presented_at: Option<DateTime<Utc>>,
    final_stats: Option<SessionStats>,
}

impl SessionController {
    /// Create a controller in the `Loading` phase. Call [`begin`] to fetch
    /// progress and present the first question.
    ///
    /// [`begin`]: SessionController::begin
    pub fn new(
        bank: Arc<QuestionBank>,
        store: Arc<ProgressStore>,
        cue: Arc<dyn CuePlayer>,
        mode: SessionMode,
        settings: SessionSettings,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            bank,
            store,
            cue,
            sm2: Sm2::default(),
            settings,
            plan: Vec::new(),
            phase: SessionPhase::Loading,
            current: 0,
            correct: 0,
            answered: 0,
            srs: HashMap::new(),
            presented_at: None,
            final_stats: None,
        }
    }

    /// Fetch persisted progress, build the plan, and present the first
    /// question. An empty plan completes the session immediately (the
    /// "nothing to practice" empty state).
    pub async fn begin(&mut self) {
        if self.phase != SessionPhase::Loading {
            return;
        }

        let incorrect = self.store.incorrect().await;
        let marked = self.store.marked().await;
        let srs = self.store.srs_map().await;

        let now = Utc::now();
        let mut rng = rand::thread_rng();
        self.plan = SessionBuilder::new(self.mode, self.settings.session_size, now)
            .with_srs(&srs)
            .with_incorrect(&incorrect)
            .with_marked(&marked)
            .build(self.bank.questions(), &mut rng);

        if self.mode == SessionMode::SpacedRepetition {
            self.srs = srs;
        }

        if self.plan.is_empty() {
            tracing::info!(session = %self.id, mode = ?self.mode, "nothing to practice");
            self.phase = SessionPhase::Completed;
            self.final_stats = Some(self.live_stats());
        } else {
            tracing::info!(session = %self.id, mode = ?self.mode, total = self.plan.len(), "session started");
            self.phase = SessionPhase::Presenting;
            self.present(now);
        }
    }

    fn present(&mut self, now: DateTime<Utc>) {
        self.presented_at = Some(now);
        let slot = self.plan[self.current];
        if slot.mode == PresentationMode::AudioCue {
            if let Some(question) = self.bank.get(slot.question_id) {
                self.cue.begin_cue(question);
            }
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The question currently presented, if any.
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            SessionPhase::Presenting | SessionPhase::Answered => self
                .plan
                .get(self.current)
                .and_then(|slot| self.bank.get(slot.question_id)),
            SessionPhase::Loading | SessionPhase::Completed => None,
        }
    }

    /// Presentation mode of the current slot, if any.
    pub fn current_mode(&self) -> Option<PresentationMode> {
        match self.phase {
            SessionPhase::Presenting | SessionPhase::Answered => {
                self.plan.get(self.current).map(|slot| slot.mode)
            }
            SessionPhase::Loading | SessionPhase::Completed => None,
        }
    }

    pub fn progress(&self) -> Progress {
        Progress {
            current: self.current,
            total: self.plan.len(),
        }
    }

    /// Live stats during the session, frozen values after completion.
    pub fn stats(&self) -> SessionStats {
        self.final_stats.unwrap_or_else(|| self.live_stats())
    }

    fn live_stats(&self) -> SessionStats {
        let score = if self.answered == 0 {
            0.0
        } else {
            self.correct as f64 / self.answered as f64 * 100.0
        };
        SessionStats {
            correct: self.correct,
            incorrect: self.answered - self.correct,
            total: self.plan.len(),
            score,
        }
    }

    /// Judge an answer for the current question.
    ///
    /// Only valid while `Presenting`; a duplicate call for the same
    /// presented question returns `None` and changes nothing.
    pub async fn handle_answer(&mut self, text: &str) -> Option<AnswerOutcome> {
        if self.phase != SessionPhase::Presenting {
            return None;
        }

        let slot = self.plan[self.current];
        let Some(question) = self.bank.get(slot.question_id) else {
            tracing::error!(session = %self.id, question = slot.question_id, "question missing from bank");
            return None;
        };

        let correct = is_correct(text, &question.answer);
        let now = Utc::now();

        self.answered += 1;
        if correct {
            self.correct += 1;
        } else {
            self.store.record_incorrect(slot.question_id).await;
        }

        let mut quality = None;
        if self.mode == SessionMode::SpacedRepetition {
            let elapsed = now - self.presented_at.unwrap_or(now);
            let graded = Quality::from_result(correct, elapsed);
            let record = self
                .srs
                .remove(&slot.question_id)
                .unwrap_or_else(|| self.sm2.initial_record(slot.question_id));
            let updated = self.sm2.next_review(&record, graded, now);
            self.srs.insert(slot.question_id, updated.clone());
            self.store.save_record(updated).await;
            quality = Some(graded);
        }

        tracing::debug!(
            session = %self.id,
            question = slot.question_id,
            correct,
            quality = ?quality,
            "answer judged"
        );
        self.phase = SessionPhase::Answered;
        Some(AnswerOutcome { correct, quality })
    }

    /// Advance past an answered question, completing the session after the
    /// last one.
    pub fn handle_next(&mut self) {
        if self.phase != SessionPhase::Answered {
            return;
        }

        if self.current + 1 < self.plan.len() {
            self.current += 1;
            self.phase = SessionPhase::Presenting;
            self.present(Utc::now());
        } else {
            self.current = self.plan.len();
            self.phase = SessionPhase::Completed;
            let stats = self.live_stats();
            self.final_stats = Some(stats);
            tracing::info!(
                session = %self.id,
                correct = stats.correct,
                total = stats.total,
                score = stats.score,
                "session completed"
            );
        }
    }

    /// Flip a question's marked state. Available in every phase except
    /// `Loading`; does not affect the main transitions. Returns the new
    /// state, or `None` while loading.
    pub async fn toggle_marked(&self, id: QuestionId) -> Option<bool> {
        if self.phase == SessionPhase::Loading {
            return None;
        }
        Some(self.store.toggle_marked(id).await)
    }

    /// Human-readable recall status for a question ("new", "due now",
    /// "review in N days").
    pub async fn srs_status_message(&self, id: QuestionId) -> String {
        let now = Utc::now();
        if let Some(record) = self.srs.get(&id) {
            return review_status(Some(record), now);
        }
        review_status(self.store.srs_record(id).await.as_ref(), now)
    }
}
