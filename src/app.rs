//! Command handlers for the flashcards CLI.
//! Each handler talks to the card store and writes human-readable output.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use flashcard_review::database::db;
use flashcard_review::export::json::{export_json_to_path, import_json};
use flashcard_review::models::scheduler::{format_interval, preview_intervals};
use flashcard_review::models::{Flashcard, LearningSession, Rating, SessionOutcome};
use rusqlite::Connection;
use std::io::{BufRead, Write};
use std::path::Path;

pub struct App {
    conn: Connection,
}

/// Formats a timestamp as YYYY-MM-DD
fn format_date(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d").to_string()
}

impl App {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = db::init_database(db_path)
            .with_context(|| format!("failed to open database {}", db_path.display()))?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn list_decks(&self, out: &mut impl Write) -> Result<()> {
        let today = db::get_current_date(&self.conn)?;
        let deck_set = db::load_all_decks(&self.conn)?;

        writeln!(
            out,
            "{} decks, {} cards, {} due on {}",
            deck_set.decks.len(),
            deck_set.total_cards(),
            deck_set.due_count(today),
            format_date(today)
        )?;
        for deck in &deck_set.decks {
            writeln!(
                out,
                "  - {} ({} cards, {} due, {} mastered)",
                deck.name,
                deck.flashcards.len(),
                deck.due_cards(today).count(),
                deck.mastered_count()
            )?;
        }
        Ok(())
    }

    pub fn new_deck(&self, name: &str, out: &mut impl Write) -> Result<()> {
        if name.trim().is_empty() {
            bail!("deck name cannot be empty");
        }
        db::new_deck(name, &self.conn)?;
        writeln!(out, "Deck '{name}' created.")?;
        Ok(())
    }

    pub fn add_card(
        &self,
        deck: &str,
        prompt: &str,
        response: &str,
        out: &mut impl Write,
    ) -> Result<()> {
        if prompt.is_empty() || response.is_empty() {
            bail!("prompt and response must both be non-empty");
        }
        let id = db::add_flashcard(deck, prompt, response, &self.conn)?;
        writeln!(out, "{id}")?;
        Ok(())
    }

    pub fn list_cards(&self, deck: &str, out: &mut impl Write) -> Result<()> {
        if !db::deck_exists(deck, &self.conn)? {
            bail!("deck '{deck}' does not exist");
        }
        for card in db::get_flashcards_for_deck(deck, &self.conn)? {
            writeln!(
                out,
                "{}  {} -> {}  [{:?}, interval {}, ease {:.2}, due {}]",
                card.id,
                card.prompt,
                card.response,
                card.status(),
                format_interval(card.interval),
                card.ease_factor,
                format_date(card.due_date)
            )?;
        }
        Ok(())
    }

    pub fn preview(&self, id: &str, out: &mut impl Write) -> Result<()> {
        let card = db::get_flashcard(id, &self.conn)?;
        writeln!(out, "{}: {}", card.id, card.prompt)?;
        write_preview(&card, out)
    }

    /// Reviews the due cards of a deck. With `ratings` the answers are applied in
    /// order; otherwise they are read interactively from `input`.
    pub fn review(
        &self,
        deck: &str,
        ratings: Option<&[Rating]>,
        input: &mut impl BufRead,
        out: &mut impl Write,
    ) -> Result<()> {
        let today = db::get_current_date(&self.conn)?;
        let due = db::get_flashcards_due_for_review(deck, &self.conn)?;
        if due.is_empty() {
            writeln!(out, "Nothing due in '{deck}' on {}.", format_date(today))?;
            return Ok(());
        }

        let outcome = match ratings {
            Some(ratings) => {
                let ratings = ratings.get(..due.len()).with_context(|| {
                    format!(
                        "{} cards are due but only {} ratings were given",
                        due.len(),
                        ratings.len()
                    )
                })?;
                flashcard_review::run_session(due, ratings, today)?
            }
            None => {
                let session = LearningSession::new(deck, due);
                run_interactive(session, today, input, out)?
            }
        };

        db::update_flashcards(&outcome.cards, &self.conn)?;
        write_summary(&outcome, out)
    }

    pub fn next_day(&self, out: &mut impl Write) -> Result<()> {
        let today = db::advance_day(&self.conn)?;
        writeln!(out, "Today is now {}.", format_date(today))?;
        Ok(())
    }

    pub fn today(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "{}", format_date(db::get_current_date(&self.conn)?))?;
        Ok(())
    }

    pub fn delete_card(&self, id: &str, out: &mut impl Write) -> Result<()> {
        db::delete_flashcard(id, &self.conn)?;
        writeln!(out, "Deleted {id}.")?;
        Ok(())
    }

    pub fn export(&self, deck: &str, path: &Path, out: &mut impl Write) -> Result<()> {
        let deck_set = db::load_all_decks(&self.conn)?;
        let Some(found) = deck_set.find(deck) else {
            bail!("deck '{deck}' does not exist");
        };
        export_json_to_path(found, path)?;
        writeln!(
            out,
            "Deck '{}' exported to {} ({} cards).",
            found.name,
            path.display(),
            found.flashcards.len()
        )?;
        Ok(())
    }

    pub fn import(&self, path: &Path, out: &mut impl Write) -> Result<()> {
        let deck = import_json(path)
            .with_context(|| format!("failed to read deck from {}", path.display()))?;
        let stored = db::import_deck(&deck, &self.conn)?;
        writeln!(out, "Deck '{}' imported with {stored} cards.", deck.name)?;
        Ok(())
    }
}

fn write_preview(card: &Flashcard, out: &mut impl Write) -> Result<()> {
    let intervals = preview_intervals(card)?;
    let labels: Vec<String> = Rating::ALL
        .iter()
        .zip(intervals)
        .map(|(rating, days)| format!("{rating} {}", format_interval(days)))
        .collect();
    writeln!(out, "  {}", labels.join(" | "))?;
    Ok(())
}

fn run_interactive(
    mut session: LearningSession,
    today: DateTime<Utc>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<SessionOutcome> {
    let mut line = String::new();

    while let Some(card) = session.current_card() {
        let card = card.flashcard.clone();
        writeln!(out, "{}", session.phase_message())?;
        writeln!(out, "Q: {}", card.prompt)?;
        write!(out, "(press Enter to reveal)")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        session.toggle_response();
        writeln!(out, "A: {}", card.response)?;
        write_preview(&card, out)?;

        let rating = loop {
            write!(out, "rating [again/hard/good/easy]: ")?;
            out.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Ok(session.finish());
            }
            match line.parse::<Rating>() {
                Ok(rating) => break rating,
                Err(err) => writeln!(out, "{err}")?,
            }
        };
        session.grade_current_card(rating, today)?;
    }

    Ok(session.finish())
}

fn write_summary(outcome: &SessionOutcome, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Score: {}/{}", outcome.score, outcome.cards.len())?;
    for card in &outcome.cards {
        writeln!(
            out,
            "  {} -> next in {} (due {}){}",
            card.prompt,
            format_interval(card.interval),
            format_date(card.due_date),
            if card.mastered { ", mastered" } else { "" }
        )?;
    }
    Ok(())
}
