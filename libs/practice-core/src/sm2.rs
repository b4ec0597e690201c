//! SM-2 spaced repetition calculator.
//!
//! Pure and deterministic given an explicit `now`; callers own the clock.

use crate::types::{QuestionId, SrsRecord};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Recall quality on the 0-5 SM-2 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Blackout,
    Incorrect,
    Almost,
    Difficult,
    Hesitant,
    Perfect,
}

impl Quality {
    /// Convert to the numeric 0-5 value.
    pub fn to_value(self) -> u8 {
        match self {
            Self::Blackout => 0,
            Self::Incorrect => 1,
            Self::Almost => 2,
            Self::Difficult => 3,
            Self::Hesitant => 4,
            Self::Perfect => 5,
        }
    }

    /// Create from a numeric 0-5 value.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Blackout),
            1 => Some(Self::Incorrect),
            2 => Some(Self::Almost),
            3 => Some(Self::Difficult),
            4 => Some(Self::Hesitant),
            5 => Some(Self::Perfect),
            _ => None,
        }
    }

    /// Derive quality from a boolean verdict and response latency.
    ///
    /// Maps observed effort onto the SM-2 scale without a self-rating UI:
    /// an incorrect answer is a blackout; a correct one grades down as the
    /// response takes longer. Anything slower than 20 seconds lands below
    /// the recall threshold and resets the repetition streak.
    pub fn from_result(correct: bool, elapsed: Duration) -> Self {
        if !correct {
            return Self::Blackout;
        }
        let secs = elapsed.num_seconds();
        if secs < 5 {
            Self::Perfect
        } else if secs < 10 {
            Self::Hesitant
        } else if secs < 20 {
            Self::Difficult
        } else {
            Self::Almost
        }
    }

    /// Whether this quality counts as a successful recall.
    pub fn is_recalled(self) -> bool {
        self.to_value() >= 3
    }
}

/// SM-2 calculator with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
        }
    }
}

impl Sm2 {
    /// State for a question that has never been reviewed.
    pub fn initial_record(&self, question_id: QuestionId) -> SrsRecord {
        SrsRecord {
            ease_factor: self.initial_ease,
            ..SrsRecord::new(question_id)
        }
    }

    /// Calculate the updated recall state after a review.
    pub fn next_review(
        &self,
        record: &SrsRecord,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> SrsRecord {
        let q = quality.to_value();

        let (repetitions, interval_days, ease_factor) = if quality.is_recalled() {
            let interval = match record.repetitions {
                0 => 1,
                1 => 6,
                _ => (record.interval_days as f64 * record.ease_factor).round() as u32,
            };
            let spread = f64::from(5 - q);
            let ease = record.ease_factor + (0.1 - spread * (0.08 + spread * 0.02));
            (record.repetitions + 1, interval, ease.max(self.minimum_ease))
        } else {
            // Forgotten: the streak restarts and the ease takes a penalty.
            let ease = (record.ease_factor - 0.2).max(self.minimum_ease);
            (0, 1, ease)
        };

        SrsRecord {
            question_id: record.question_id,
            ease_factor,
            interval_days,
            repetitions,
            last_review: Some(now),
            next_review: Some(now + Duration::days(i64::from(interval_days))),
            last_quality: q,
        }
    }
}

/// Human-readable review status for a question.
///
/// `None` (or a record that was never scheduled) reads as "new"; a due
/// record reads "due now"; otherwise the remaining time is rounded up to
/// whole days.
pub fn review_status(record: Option<&SrsRecord>, now: DateTime<Utc>) -> String {
    let next = match record.and_then(|r| r.next_review) {
        Some(next) => next,
        None => return "new".to_string(),
    };

    if now >= next {
        return "due now".to_string();
    }

    let remaining = next - now;
    let mut days = remaining.num_days();
    if remaining > Duration::days(days) {
        days += 1;
    }

    if days <= 1 {
        "review in 1 day".to_string()
    } else {
        format!("review in {days} days")
    }
}
