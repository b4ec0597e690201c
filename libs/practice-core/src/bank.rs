//! Question bank loaded once at startup.
//!
//! Validation and prompt classification happen here, at data-load time, so
//! the rest of the engine works with immutable, already-tagged questions.

use crate::error::{BankError, Result};
use crate::types::{Category, Question, QuestionId, QuestionKind, RawQuestion};
use std::collections::HashMap;

/// Immutable, validated question list with id lookup.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
    index: HashMap<QuestionId, usize>,
}

impl QuestionBank {
    /// Build a bank from raw questions.
    ///
    /// Rejects duplicate ids and empty prompt/answer text. Classifies each
    /// prompt into a [`QuestionKind`] exactly once.
    pub fn from_raw(raw: Vec<RawQuestion>) -> Result<Self> {
        let mut questions = Vec::with_capacity(raw.len());
        let mut index = HashMap::with_capacity(raw.len());

        for entry in raw {
            if entry.prompt.trim().is_empty() {
                return Err(BankError::EmptyPrompt { id: entry.id });
            }
            if entry.answer.trim().is_empty() {
                return Err(BankError::EmptyAnswer { id: entry.id });
            }
            if index.contains_key(&entry.id) {
                return Err(BankError::DuplicateId { id: entry.id });
            }

            let kind = QuestionKind::classify(&entry.prompt);
            index.insert(entry.id, questions.len());
            questions.push(Question {
                id: entry.id,
                prompt: entry.prompt,
                translations: entry.translations,
                answer: entry.answer,
                category: entry.category,
                difficulty: entry.difficulty,
                kind,
            });
        }

        Ok(Self { questions, index })
    }

    /// Look up a question by id.
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.index.get(&id).map(|&i| &self.questions[i])
    }

    /// All questions, in load order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Questions in the given category, in load order.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(move |q| q.category == category)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
