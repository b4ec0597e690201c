//! Factory functions for test data.

use practice_core::bank::QuestionBank;
use practice_core::types::{Category, Difficulty, QuestionId, RawQuestion};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Build a raw question with sensible defaults.
pub fn question(
    id: QuestionId,
    prompt: &str,
    answer: &str,
    category: Category,
    difficulty: Difficulty,
) -> RawQuestion {
    RawQuestion {
        id,
        prompt: prompt.to_string(),
        translations: BTreeMap::new(),
        answer: answer.to_string(),
        category,
        difficulty,
    }
}

/// A small civics bank covering all three categories.
pub fn civics_bank() -> Arc<QuestionBank> {
    let bank = QuestionBank::from_raw(vec![
        question(
            1,
            "What is the economic system in the United States?",
            "capitalist economy, market economy",
            Category::Government,
            Difficulty::Medium,
        ),
        question(
            2,
            "Who was the first President?",
            "(George) Washington",
            Category::History,
            Difficulty::Easy,
        ),
        question(
            3,
            "When do we celebrate Independence Day?",
            "July 4",
            Category::SymbolsHolidays,
            Difficulty::Easy,
        ),
        question(
            4,
            "How many justices are on the Supreme Court?",
            "nine, 9",
            Category::Government,
            Difficulty::Hard,
        ),
    ])
    .expect("fixture bank is valid");
    Arc::new(bank)
}
