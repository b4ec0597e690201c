//! Core types for the practice engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable identifier for a question in the bank.
pub type QuestionId = i64;

/// Default ease factor for a question that has never been reviewed.
pub const INITIAL_EASE: f64 = 2.5;

/// Topic area a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Government,
    History,
    SymbolsHolidays,
}

impl Category {
    /// Get the category name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Government => "government",
            Self::History => "history",
            Self::SymbolsHolidays => "symbols_holidays",
        }
    }
}

/// Difficulty rating assigned at authoring time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

impl Difficulty {
    /// Multiplicity of a question in the weighted shuffle.
    ///
    /// Harder questions are duplicated more often before shuffling, so they
    /// tend to land earlier in the session order.
    pub fn shuffle_weight(self) -> usize {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }
}

/// Prompt shape, classified once when the bank is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Who,
    What,
    When,
    Where,
    HowMany,
    Other,
}

impl QuestionKind {
    /// Classify a prompt by its leading interrogative.
    pub fn classify(prompt: &str) -> Self {
        let lowered = prompt.trim().to_lowercase();
        if lowered.starts_with("how many") {
            Self::HowMany
        } else if lowered.starts_with("who") {
            Self::Who
        } else if lowered.starts_with("when") {
            Self::When
        } else if lowered.starts_with("where") {
            Self::Where
        } else if lowered.starts_with("what") {
            Self::What
        } else {
            Self::Other
        }
    }
}

/// How a question is surfaced during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationMode {
    Text,
    AudioCue,
}

/// Selection mode for building a session pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Category(Category),
    Random,
    Incorrect,
    Marked,
    SpacedRepetition,
}

/// Raw question as authored (pre-validation, pre-classification).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawQuestion {
    pub id: QuestionId,
    pub prompt: String,
    /// Optional per-language prompt variants, keyed by language code.
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
    /// Accepted answer; may list several phrasings separated by commas,
    /// bullets, or newlines.
    pub answer: String,
    pub category: Category,
    #[serde(default)]
    pub difficulty: Difficulty,
}

/// Validated, classified question. Created once at data-load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
    pub answer: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub kind: QuestionKind,
}

impl Question {
    /// Prompt text in the requested language, falling back to the primary.
    pub fn prompt_in(&self, lang: &str) -> &str {
        self.translations
            .get(lang)
            .map(String::as_str)
            .unwrap_or(&self.prompt)
    }
}

/// Per-question recall state maintained by the SM-2 calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrsRecord {
    pub question_id: QuestionId,
    pub ease_factor: f64,
    pub interval_days: u32,
    pub repetitions: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
    pub last_quality: u8,
}

impl SrsRecord {
    /// State for a question that has never been reviewed.
    pub fn new(question_id: QuestionId) -> Self {
        Self {
            question_id,
            ease_factor: INITIAL_EASE,
            interval_days: 0,
            repetitions: 0,
            last_review: None,
            next_review: None,
            last_quality: 0,
        }
    }

    /// Whether the question is due for review.
    ///
    /// A record with no scheduled review is always due. Otherwise the
    /// scheduled time is compared as a precise instant, not a calendar day.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.next_review {
            Some(next) => now >= next,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    #[test]
    fn classify_prompt_kinds() {
        assert_eq!(QuestionKind::classify("Who vetoes bills?"), QuestionKind::Who);
        assert_eq!(
            QuestionKind::classify("What is the supreme law of the land?"),
            QuestionKind::What
        );
        assert_eq!(
            QuestionKind::classify("When do we celebrate Independence Day?"),
            QuestionKind::When
        );
        assert_eq!(
            QuestionKind::classify("Where is the Statue of Liberty?"),
            QuestionKind::Where
        );
        assert_eq!(
            QuestionKind::classify("How many amendments does the Constitution have?"),
            QuestionKind::HowMany
        );
        assert_eq!(
            QuestionKind::classify("Name one branch of the government."),
            QuestionKind::Other
        );
    }

    #[test]
    fn new_record_is_due() {
        let record = SrsRecord::new(1);
        assert!(record.is_due(Utc::now()));
        assert_eq!(record.ease_factor, INITIAL_EASE);
        assert_eq!(record.repetitions, 0);
        assert_eq!(record.interval_days, 0);
    }

    #[test]
    fn due_comparison_is_instant_based() {
        let now = Utc::now();
        let mut record = SrsRecord::new(7);

        record.next_review = Some(now - Duration::seconds(1));
        assert!(record.is_due(now));

        record.next_review = Some(now);
        assert!(record.is_due(now));

        record.next_review = Some(now + Duration::seconds(1));
        assert!(!record.is_due(now));
    }

    #[test]
    fn record_round_trips_through_json() {
        let now = Utc::now();
        let record = SrsRecord {
            question_id: 42,
            ease_factor: 2.36,
            interval_days: 6,
            repetitions: 2,
            last_review: Some(now),
            next_review: Some(now + Duration::days(6)),
            last_quality: 4,
        };

        let json = serde_json::to_string(&record).unwrap();
        let parsed: SrsRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn prompt_falls_back_to_primary_language() {
        let mut translations = BTreeMap::new();
        translations.insert("es".to_string(), "¿Quién veta las leyes?".to_string());
        let question = Question {
            id: 1,
            prompt: "Who vetoes bills?".to_string(),
            translations,
            answer: "the President".to_string(),
            category: Category::Government,
            difficulty: Difficulty::Easy,
            kind: QuestionKind::Who,
        };

        assert_eq!(question.prompt_in("es"), "¿Quién veta las leyes?");
        assert_eq!(question.prompt_in("fr"), "Who vetoes bills?");
    }
}
