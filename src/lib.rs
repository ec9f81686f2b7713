pub mod database;
pub mod error;
pub mod export;
pub mod models;

pub use error::ReviewError;
pub use models::scheduler::{apply_rating, preview_intervals, project_rating};
pub use models::{
    CardStatus, Deck, DeckSet, Flashcard, LearningCard, LearningSession, Rating, SessionOutcome,
    run_session,
};
