//! Deck is a named set of flashcards
use super::Flashcard;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
}

impl Deck {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flashcards: Vec::new(),
        }
    }

    pub fn due_cards(&self, now: DateTime<Utc>) -> impl Iterator<Item = &Flashcard> {
        self.flashcards.iter().filter(move |card| card.is_due(now))
    }

    pub fn mastered_count(&self) -> usize {
        self.flashcards.iter().filter(|card| card.mastered).count()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new("My Deck")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_due_and_mastered_counts() {
        let now = Utc.with_ymd_and_hms(2026, 2, 2, 0, 0, 0).unwrap();
        let mut later = Flashcard::new("b", "2", now + Duration::days(3));
        later.mastered = true;
        let deck = Deck {
            name: "Numbers".to_string(),
            flashcards: vec![Flashcard::new("a", "1", now), later],
        };

        assert_eq!(deck.due_cards(now).count(), 1);
        assert_eq!(deck.mastered_count(), 1);
        assert_eq!(Deck::default().name, "My Deck");
    }
}
