pub mod deck;
pub mod deck_set;
pub mod flashcard;
pub mod learning_card;
pub mod learning_session;
pub mod rating;
pub mod scheduler;

pub use deck::Deck;
pub use deck_set::DeckSet;
pub use flashcard::{CardStatus, Flashcard};
pub use learning_card::LearningCard;
pub use learning_session::{LearningSession, SessionOutcome, SessionProgress, run_session};
pub use rating::Rating;
