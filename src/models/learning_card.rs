//! Wrapper for flashcards that tracks what happened to them in a session.
use super::{Flashcard, Rating};
use chrono::{DateTime, Utc};

#[derive(Clone, Debug)]
pub struct LearningCard {
    pub flashcard: Flashcard,
    pub rating: Option<Rating>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl LearningCard {
    pub fn new(flashcard: Flashcard) -> Self {
        Self {
            flashcard,
            rating: None,
            reviewed_at: None,
        }
    }

    pub fn is_reviewed(&self) -> bool {
        self.rating.is_some()
    }

    /// Replaces the card with its rescheduled state and records the rating.
    pub fn record(&mut self, rescheduled: Flashcard, rating: Rating, at: DateTime<Utc>) {
        self.flashcard = rescheduled;
        self.rating = Some(rating);
        self.reviewed_at = Some(at);
    }
}
