//! Session plan construction.
//!
//! Builds the ordered `(question, presentation mode)` list for a session.
//! All shuffling goes through a caller-supplied [`Rng`], so tests substitute
//! a seeded generator for deterministic output.

use crate::types::{
    PresentationMode, Question, QuestionId, SessionMode, SrsRecord,
};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// One scheduled slot in a session plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSlot {
    pub question_id: QuestionId,
    pub mode: PresentationMode,
}

/// Builds a session plan for a selection mode.
#[derive(Debug, Clone)]
pub struct SessionBuilder<'a> {
    mode: SessionMode,
    count: usize,
    now: DateTime<Utc>,
    srs: Option<&'a HashMap<QuestionId, SrsRecord>>,
    incorrect: Option<&'a HashSet<QuestionId>>,
    marked: Option<&'a HashSet<QuestionId>>,
}

impl<'a> SessionBuilder<'a> {
    pub fn new(mode: SessionMode, count: usize, now: DateTime<Utc>) -> Self {
        Self {
            mode,
            count,
            now,
            srs: None,
            incorrect: None,
            marked: None,
        }
    }

    /// Recall state used by the spaced-repetition due split.
    pub fn with_srs(mut self, srs: &'a HashMap<QuestionId, SrsRecord>) -> Self {
        self.srs = Some(srs);
        self
    }

    /// Ids answered incorrectly in earlier sessions.
    pub fn with_incorrect(mut self, incorrect: &'a HashSet<QuestionId>) -> Self {
        self.incorrect = Some(incorrect);
        self
    }

    /// Ids the user has marked for later practice.
    pub fn with_marked(mut self, marked: &'a HashSet<QuestionId>) -> Self {
        self.marked = Some(marked);
        self
    }

    /// Build the ordered session plan.
    ///
    /// An empty result is a valid outcome (nothing to practice), not an
    /// error.
    pub fn build<R: Rng>(&self, questions: &[Question], rng: &mut R) -> Vec<SessionSlot> {
        let mut ids = match self.mode {
            SessionMode::Category(category) => {
                let pool: Vec<&Question> =
                    questions.iter().filter(|q| q.category == category).collect();
                weighted_order(&pool, rng)
            }
            SessionMode::Random => {
                let pool: Vec<&Question> = questions.iter().collect();
                weighted_order(&pool, rng)
            }
            SessionMode::Incorrect => self.membership_pool(questions, self.incorrect, rng),
            SessionMode::Marked => self.membership_pool(questions, self.marked, rng),
            SessionMode::SpacedRepetition => self.spaced_repetition_pool(questions, rng),
        };

        ids.truncate(self.count);
        assign_modes(ids, rng)
    }

    fn membership_pool<R: Rng>(
        &self,
        questions: &[Question],
        members: Option<&HashSet<QuestionId>>,
        rng: &mut R,
    ) -> Vec<QuestionId> {
        let Some(members) = members else {
            return Vec::new();
        };
        let pool: Vec<&Question> = questions
            .iter()
            .filter(|q| members.contains(&q.id))
            .collect();
        weighted_order(&pool, rng)
    }

    /// Due questions first, then never-reviewed ones, then backfill with the
    /// remainder, until the target count is reached.
    fn spaced_repetition_pool<R: Rng>(
        &self,
        questions: &[Question],
        rng: &mut R,
    ) -> Vec<QuestionId> {
        let mut due = Vec::new();
        let mut fresh = Vec::new();
        let mut rest = Vec::new();

        for question in questions {
            match self.srs.and_then(|map| map.get(&question.id)) {
                Some(record) if record.is_due(self.now) => due.push(question),
                Some(_) => rest.push(question),
                None => fresh.push(question),
            }
        }

        let mut ids = weighted_order(&due, rng);
        ids.extend(weighted_order(&fresh, rng));
        ids.extend(weighted_order(&rest, rng));
        ids
    }
}

/// Difficulty-weighted shuffle order.
///
/// Each question enters the shuffle multiset once per unit of shuffle
/// weight, then the multiset is shuffled and deduplicated by first
/// occurrence: higher-weight questions keep per-session uniqueness but tend
/// to surface earlier.
fn weighted_order<R: Rng>(pool: &[&Question], rng: &mut R) -> Vec<QuestionId> {
    let mut multiset: Vec<QuestionId> = Vec::new();
    for question in pool {
        for _ in 0..question.difficulty.shuffle_weight() {
            multiset.push(question.id);
        }
    }
    multiset.shuffle(rng);

    let mut seen = HashSet::new();
    multiset.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Pair questions with presentation modes.
///
/// Exactly `n / 2` slots are text and the remainder audio cues; the mode
/// list is shuffled independently of question order and paired by position.
fn assign_modes<R: Rng>(ids: Vec<QuestionId>, rng: &mut R) -> Vec<SessionSlot> {
    let n = ids.len();
    let mut modes = Vec::with_capacity(n);
    modes.resize(n / 2, PresentationMode::Text);
    modes.resize(n, PresentationMode::AudioCue);
    modes.shuffle(rng);

    ids.into_iter()
        .zip(modes)
        .map(|(question_id, mode)| SessionSlot { question_id, mode })
        .collect()
}
