//! Flashcard is a <prompt, response> pair plus its spaced repetition state.
//! Only text is used in prompts and responses; the scheduler never reads them.
use crate::error::ReviewError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_EASE_FACTOR: f64 = 2.5;
pub const MIN_EASE_FACTOR: f64 = 1.3;
/// Cards whose interval exceeds three weeks count as mastered.
pub const MASTERY_THRESHOLD_DAYS: f64 = 21.0;

/// Where a card sits in its learning lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardStatus {
    /// Never reviewed
    New,
    Learning,
    Mastered,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    #[serde(default = "new_card_id")]
    pub id: String,
    pub prompt: String,
    pub response: String,
    /// Days until the next review; 0 means not yet scheduled.
    #[serde(default)]
    pub interval: f64,
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default = "due_immediately")]
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub mastered: bool,
}

fn new_card_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_ease_factor() -> f64 {
    DEFAULT_EASE_FACTOR
}

fn due_immediately() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl Flashcard {
    /// A freshly authored card, due right away.
    pub fn new(prompt: impl Into<String>, response: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::with_id(new_card_id(), prompt, response, now)
    }

    pub fn with_id(
        id: impl Into<String>,
        prompt: impl Into<String>,
        response: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            response: response.into(),
            interval: 0.0,
            ease_factor: DEFAULT_EASE_FACTOR,
            review_count: 0,
            due_date: now,
            mastered: false,
        }
    }

    /// Rejects scheduling state the scheduler could not have produced.
    /// Bad values are reported rather than clamped so upstream bugs surface.
    pub fn validate(&self) -> Result<(), ReviewError> {
        if !self.interval.is_finite() || self.interval < 0.0 {
            return Err(ReviewError::InvalidState(format!(
                "card `{}` has interval {}; expected a finite value >= 0",
                self.id, self.interval
            )));
        }
        if !self.ease_factor.is_finite() || self.ease_factor < MIN_EASE_FACTOR {
            return Err(ReviewError::InvalidState(format!(
                "card `{}` has ease factor {}; expected a finite value >= {MIN_EASE_FACTOR}",
                self.id, self.ease_factor
            )));
        }
        if self.mastered != (self.interval > MASTERY_THRESHOLD_DAYS) {
            return Err(ReviewError::InvalidState(format!(
                "card `{}` has interval {} but mastered is {}",
                self.id, self.interval, self.mastered
            )));
        }
        Ok(())
    }

    pub fn status(&self) -> CardStatus {
        if self.mastered {
            CardStatus::Mastered
        } else if self.review_count == 0 {
            CardStatus::New
        } else {
            CardStatus::Learning
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_date <= now
    }
}
