//! Review session management.
//! Presents each card once, in order, and schedules it with the rating it receives.

use super::scheduler::apply_rating;
use super::{Flashcard, LearningCard, Rating};
use crate::error::{Result, ReviewError};
use chrono::{DateTime, Utc};

/// Aggregated view of session progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

/// What a finished session hands back to the caller for persisting.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub cards: Vec<Flashcard>,
    /// Number of Good or Easy ratings.
    pub score: usize,
}

/// A single pass over an ordered list of cards.
/// Cards are independent: rating one never changes how the next one is scheduled.
pub struct LearningSession {
    pub deck_name: String,
    pub cards: Vec<LearningCard>,
    pub current_index: usize,
    pub show_response: bool,
    score: usize,
}

impl LearningSession {
    pub fn new(deck_name: impl Into<String>, cards: Vec<Flashcard>) -> Self {
        Self {
            deck_name: deck_name.into(),
            cards: cards.into_iter().map(LearningCard::new).collect(),
            current_index: 0,
            show_response: false,
            score: 0,
        }
    }

    pub fn current_card(&self) -> Option<&LearningCard> {
        self.cards.get(self.current_index)
    }

    pub fn toggle_response(&mut self) {
        self.show_response = !self.show_response;
    }

    /// Schedules the current card with `rating` and moves to the next one.
    ///
    /// On error the session is left where it was.
    pub fn grade_current_card(&mut self, rating: Rating, now: DateTime<Utc>) -> Result<()> {
        let Some(card) = self.cards.get_mut(self.current_index) else {
            return Err(ReviewError::InvalidArgument(
                "session is already complete".to_string(),
            ));
        };

        let rescheduled = apply_rating(&card.flashcard, rating, now)?;
        card.record(rescheduled, rating, now);

        if rating.is_successful() {
            self.score += 1;
        }
        self.current_index += 1;
        self.show_response = false;
        Ok(())
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn answered_count(&self) -> usize {
        self.cards.iter().filter(|card| card.is_reviewed()).count()
    }

    pub fn total_count(&self) -> usize {
        self.cards.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.total_count() - self.answered_count()
    }

    pub fn is_completed(&self) -> bool {
        self.current_index >= self.cards.len()
    }

    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total_count(),
            answered: self.answered_count(),
            remaining: self.remaining_count(),
            is_complete: self.is_completed(),
        }
    }

    pub fn phase_message(&self) -> String {
        if self.is_completed() {
            format!(
                "{}: done, {} of {} recalled",
                self.deck_name,
                self.score,
                self.total_count()
            )
        } else {
            format!(
                "{}: card {} of {}",
                self.deck_name,
                self.current_index + 1,
                self.total_count()
            )
        }
    }

    /// Ends the session. Cards that were never graded are returned unchanged.
    pub fn finish(self) -> SessionOutcome {
        log::info!(
            "session for deck '{}' finished: {}/{} answered, score {}",
            self.deck_name,
            self.answered_count(),
            self.total_count(),
            self.score
        );
        SessionOutcome {
            cards: self.cards.into_iter().map(|card| card.flashcard).collect(),
            score: self.score,
        }
    }
}

/// Applies `ratings[i]` to `cards[i]` for every card, in order.
pub fn run_session(
    cards: Vec<Flashcard>,
    ratings: &[Rating],
    now: DateTime<Utc>,
) -> Result<SessionOutcome> {
    if cards.len() != ratings.len() {
        return Err(ReviewError::InvalidArgument(format!(
            "got {} ratings for {} cards",
            ratings.len(),
            cards.len()
        )));
    }

    let mut session = LearningSession::new("session", cards);
    for &rating in ratings {
        session.grade_current_card(rating, now)?;
    }
    Ok(session.finish())
}
