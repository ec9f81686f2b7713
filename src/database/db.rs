//! Database operations for the flashcard store
//!
//! Handles SQLite database initialization, CRUD operations for decks and flashcards,
//! persistence of scheduler output and the simulated "today" used for reviews.

use crate::error::ReviewError;
use crate::models::{Deck, DeckSet, Flashcard};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

const CARD_COLUMNS: &str =
    "id, prompt, response, interval, ease_factor, review_count, due_at, mastered";

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Deck not found: {0}")]
    DeckNotFound(String),

    #[error("Deck already exists: {0}")]
    DeckExists(String),

    #[error("Flashcard not found: {0}")]
    CardNotFound(String),

    #[error("Invalid card state: {0}")]
    Review(#[from] ReviewError),

    #[error("Invalid persisted data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Opens (or creates) the database at `path` and makes sure all tables exist.
pub fn init_database(path: impl AsRef<Path>) -> Result<Connection> {
    let conn = Connection::open(path.as_ref())?;
    create_schema(&conn)?;
    log::info!("opened flashcard store at {}", path.as_ref().display());
    Ok(conn)
}

/// Throwaway store, mostly for tests.
pub fn init_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Creates tables for decks, flashcards with their review state, and app state.
/// Sets the current date to now if not already initialized.
fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS decks (
            name TEXT PRIMARY KEY
        );

        CREATE TABLE IF NOT EXISTS flashcards (
            id TEXT PRIMARY KEY,
            deck_name TEXT NOT NULL,
            prompt TEXT NOT NULL,
            response TEXT NOT NULL,
            interval REAL NOT NULL DEFAULT 0,
            ease_factor REAL NOT NULL DEFAULT 2.5,
            review_count INTEGER NOT NULL DEFAULT 0,
            due_at INTEGER NOT NULL,
            mastered INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (deck_name) REFERENCES decks(name) ON DELETE CASCADE,
            UNIQUE(deck_name, prompt)
        );

        CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO app_state (key, value) VALUES ('current_date', ?1)",
        params![Utc::now().timestamp_millis().to_string()],
    )?;

    Ok(())
}

/// Retrieves the simulated current date from the database
pub fn get_current_date(conn: &Connection) -> Result<DateTime<Utc>> {
    let value: String = conn.query_row(
        "SELECT value FROM app_state WHERE key = 'current_date'",
        [],
        |row| row.get(0),
    )?;

    value
        .parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .ok_or_else(|| DbError::InvalidData(format!("current_date `{value}` is not a timestamp")))
}

/// Advances the current date by 24 hours, returning the new date
pub fn advance_day(conn: &Connection) -> Result<DateTime<Utc>> {
    let next_day = get_current_date(conn)? + Duration::days(1);

    conn.execute(
        "UPDATE app_state SET value = ?1 WHERE key = 'current_date'",
        params![next_day.timestamp_millis().to_string()],
    )?;

    log::info!("advanced current date to {}", next_day.format("%Y-%m-%d"));
    Ok(next_day)
}

/// Creates a new, empty deck
pub fn new_deck(name: &str, conn: &Connection) -> Result<()> {
    if deck_exists(name, conn)? {
        return Err(DbError::DeckExists(name.to_string()));
    }
    conn.execute("INSERT INTO decks (name) VALUES (?1)", params![name])?;
    log::info!("created deck '{name}'");
    Ok(())
}

pub fn deck_exists(name: &str, conn: &Connection) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM decks WHERE name = ?1", params![name], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

/// Adds a flashcard to a deck with a fresh review state, due right away.
///
/// Returns the flashcard ID. If a card with the same prompt already exists in
/// the deck, its ID is returned and nothing is inserted.
pub fn add_flashcard(
    deck_name: &str,
    prompt: &str,
    response: &str,
    conn: &Connection,
) -> Result<String> {
    if !deck_exists(deck_name, conn)? {
        return Err(DbError::DeckNotFound(deck_name.to_string()));
    }

    let card = Flashcard::new(prompt, response, get_current_date(conn)?);
    insert_card(deck_name, &card, conn)?;

    let id = conn.query_row(
        "SELECT id FROM flashcards WHERE deck_name = ?1 AND prompt = ?2",
        params![deck_name, prompt],
        |row| row.get(0),
    )?;
    Ok(id)
}

fn insert_card(deck_name: &str, card: &Flashcard, conn: &Connection) -> Result<usize> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO flashcards
            (id, deck_name, prompt, response, interval, ease_factor, review_count, due_at, mastered)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            card.id,
            deck_name,
            card.prompt,
            card.response,
            card.interval,
            card.ease_factor,
            card.review_count,
            card.due_date.timestamp_millis(),
            card.mastered
        ],
    )?;
    Ok(inserted)
}

/// Raw row before timestamp conversion and validation.
struct CardRow {
    id: String,
    prompt: String,
    response: String,
    interval: f64,
    ease_factor: f64,
    review_count: u32,
    due_at: i64,
    mastered: bool,
}

impl CardRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            prompt: row.get(1)?,
            response: row.get(2)?,
            interval: row.get(3)?,
            ease_factor: row.get(4)?,
            review_count: row.get(5)?,
            due_at: row.get(6)?,
            mastered: row.get(7)?,
        })
    }

    /// Read paths refuse invalid persisted state instead of masking it.
    fn into_flashcard(self) -> Result<Flashcard> {
        let due_date = DateTime::<Utc>::from_timestamp_millis(self.due_at).ok_or_else(|| {
            DbError::InvalidData(format!("card `{}` has due_at {}", self.id, self.due_at))
        })?;
        let card = Flashcard {
            id: self.id,
            prompt: self.prompt,
            response: self.response,
            interval: self.interval,
            ease_factor: self.ease_factor,
            review_count: self.review_count,
            due_date,
            mastered: self.mastered,
        };
        if let Err(err) = card.validate() {
            log::warn!("rejecting stored card {}: {err}", card.id);
            return Err(err.into());
        }
        Ok(card)
    }
}

fn query_cards(
    sql: &str,
    params: impl rusqlite::Params,
    conn: &Connection,
) -> Result<Vec<Flashcard>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, CardRow::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    rows.into_iter().map(CardRow::into_flashcard).collect()
}

/// Retrieves a single flashcard by ID
pub fn get_flashcard(id: &str, conn: &Connection) -> Result<Flashcard> {
    let sql = format!("SELECT {CARD_COLUMNS} FROM flashcards WHERE id = ?1");
    query_cards(&sql, params![id], conn)?
        .pop()
        .ok_or_else(|| DbError::CardNotFound(id.to_string()))
}

/// Retrieves all flashcards for a given deck, in insertion order
pub fn get_flashcards_for_deck(deck_name: &str, conn: &Connection) -> Result<Vec<Flashcard>> {
    let sql = format!("SELECT {CARD_COLUMNS} FROM flashcards WHERE deck_name = ?1 ORDER BY rowid");
    query_cards(&sql, params![deck_name], conn)
}

/// Retrieves flashcards due for review in a deck
///
/// Returns flashcards where the due date is not after the current date,
/// ordered by due date (oldest first).
pub fn get_flashcards_due_for_review(deck_name: &str, conn: &Connection) -> Result<Vec<Flashcard>> {
    let current = get_current_date(conn)?.timestamp_millis();
    let sql = format!(
        "SELECT {CARD_COLUMNS} FROM flashcards
         WHERE deck_name = ?1 AND due_at <= ?2
         ORDER BY due_at ASC, rowid ASC"
    );
    query_cards(&sql, params![deck_name, current], conn)
}

/// Persists the review state of a flashcard (last write wins)
pub fn update_flashcard(card: &Flashcard, conn: &Connection) -> Result<()> {
    card.validate()?;

    let updated = conn.execute(
        "UPDATE flashcards
         SET interval = ?1, ease_factor = ?2, review_count = ?3, due_at = ?4, mastered = ?5
         WHERE id = ?6",
        params![
            card.interval,
            card.ease_factor,
            card.review_count,
            card.due_date.timestamp_millis(),
            card.mastered,
            card.id
        ],
    )?;

    if updated == 0 {
        return Err(DbError::CardNotFound(card.id.clone()));
    }
    Ok(())
}

/// Persists a batch of cards in one transaction, e.g. the outcome of a session
pub fn update_flashcards(cards: &[Flashcard], conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    for card in cards {
        update_flashcard(card, &tx)?;
    }
    tx.commit()?;
    Ok(())
}

pub fn delete_flashcard(id: &str, conn: &Connection) -> Result<()> {
    let deleted = conn.execute("DELETE FROM flashcards WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DbError::CardNotFound(id.to_string()));
    }
    log::info!("deleted flashcard {id}");
    Ok(())
}

/// Retrieves all deck names from database
pub fn get_all_decks(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM decks ORDER BY name")?;
    let decks = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(decks)
}

/// Loads all decks with their flashcards and review state into memory
pub fn load_all_decks(conn: &Connection) -> Result<DeckSet> {
    let mut decks = Vec::new();

    for deck_name in get_all_decks(conn)? {
        let flashcards = get_flashcards_for_deck(&deck_name, conn)?;
        decks.push(Deck {
            name: deck_name,
            flashcards,
        });
    }

    Ok(DeckSet { decks })
}

/// Stores an imported deck, keeping the review state of its cards.
///
/// Fails with `DeckExists` if a deck with that name is already present.
/// Card IDs already used elsewhere are replaced with fresh ones; repeated
/// prompts within the deck are skipped. Returns the number of cards stored.
pub fn import_deck(deck: &Deck, conn: &Connection) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    new_deck(&deck.name, &tx)?;

    let mut stored = 0;
    for card in &deck.flashcards {
        card.validate()?;
        let id_taken = tx
            .query_row("SELECT 1 FROM flashcards WHERE id = ?1", params![card.id], |_| Ok(()))
            .optional()?
            .is_some();

        let inserted = if id_taken {
            let renamed = Flashcard {
                id: Uuid::new_v4().to_string(),
                ..card.clone()
            };
            insert_card(&deck.name, &renamed, &tx)?
        } else {
            insert_card(&deck.name, card, &tx)?
        };
        stored += inserted;
    }

    tx.commit()?;
    log::info!("imported deck '{}' with {stored} cards", deck.name);
    Ok(stored)
}
