//! JSON import/export module for flashcard decks.
//! Saves and loads Deck structures, review state included, to/from JSON files.

use crate::error::ReviewError;
use crate::models::Deck;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid card in deck: {0}")]
    Review(#[from] ReviewError),
}

/// Exports a deck to a JSON file at the specified path.
/// Returns an error if file creation or writing fails.
pub fn export_json_to_path(deck: &Deck, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let json_string = serde_json::to_string_pretty(deck)?;
    let mut file = File::create(path.as_ref())?;
    file.write_all(json_string.as_bytes())?;
    log::info!(
        "deck '{}' exported to '{}'",
        deck.name,
        path.as_ref().display()
    );
    Ok(())
}

/// Imports a deck from a JSON file.
/// Returns an error if the file doesn't exist, contains invalid JSON, or
/// carries review state no scheduler could have produced.
pub fn import_json(path: impl AsRef<Path>) -> Result<Deck, ExportError> {
    let mut file = File::open(path.as_ref())?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let deck: Deck = serde_json::from_str(&contents)?;
    for card in &deck.flashcards {
        card.validate()?;
    }

    log::info!(
        "deck '{}' imported from '{}'",
        deck.name,
        path.as_ref().display()
    );
    Ok(deck)
}
