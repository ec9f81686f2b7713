//! Container for all available decks
use super::Deck;
use chrono::{DateTime, Utc};

#[derive(Clone, Debug, Default)]
pub struct DeckSet {
    pub decks: Vec<Deck>,
}

impl DeckSet {
    pub fn find(&self, name: &str) -> Option<&Deck> {
        self.decks.iter().find(|deck| deck.name == name)
    }

    pub fn total_cards(&self) -> usize {
        self.decks.iter().map(|deck| deck.flashcards.len()).sum()
    }

    pub fn due_count(&self, now: DateTime<Utc>) -> usize {
        self.decks.iter().map(|deck| deck.due_cards(now).count()).sum()
    }
}
