mod app;

use anyhow::Result;
use app::App;
use clap::{Parser, Subcommand};
use flashcard_review::models::rating::parse_ratings;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flashcards", about = "Spaced repetition flashcards", version)]
struct Cli {
    /// SQLite database holding decks, cards and review state
    #[arg(long, global = true, env = "FLASHCARDS_DB", default_value = "db.sqlite3")]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List decks with card, due and mastered counts
    Decks,

    /// Create an empty deck
    NewDeck { name: String },

    /// Add a flashcard to a deck
    Add {
        deck: String,
        prompt: String,
        response: String,
    },

    /// List the cards of a deck with their review state
    Cards { deck: String },

    /// Review the cards due today
    Review {
        deck: String,
        /// Comma-separated ratings applied in order instead of asking
        #[arg(long)]
        ratings: Option<String>,
    },

    /// Show the interval each rating would give a card
    Preview { id: String },

    /// Move the simulated date forward by one day
    NextDay,

    /// Print the simulated date
    Today,

    /// Delete a flashcard
    Delete { id: String },

    /// Write a deck to a JSON file
    Export { deck: String, path: PathBuf },

    /// Load a deck from a JSON file
    Import { path: PathBuf },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let app = App::open(&cli.db)?;
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Decks => app.list_decks(&mut out)?,
        Command::NewDeck { name } => app.new_deck(&name, &mut out)?,
        Command::Add {
            deck,
            prompt,
            response,
        } => app.add_card(&deck, &prompt, &response, &mut out)?,
        Command::Cards { deck } => app.list_cards(&deck, &mut out)?,
        Command::Review { deck, ratings } => {
            let ratings = ratings.as_deref().map(parse_ratings).transpose()?;
            let mut input = io::stdin().lock();
            app.review(&deck, ratings.as_deref(), &mut input, &mut out)?;
        }
        Command::Preview { id } => app.preview(&id, &mut out)?,
        Command::NextDay => app.next_day(&mut out)?,
        Command::Today => app.today(&mut out)?,
        Command::Delete { id } => app.delete_card(&id, &mut out)?,
        Command::Export { deck, path } => app.export(&deck, &path, &mut out)?,
        Command::Import { path } => app.import(&path, &mut out)?,
    }

    Ok(())
}
