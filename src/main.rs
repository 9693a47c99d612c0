//! Personal Flashcards - decks, cards and quiz-style study sessions in the terminal.

use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use personal_flashcards::config::Config;
use personal_flashcards::logging::{self, LogSink};
use personal_flashcards::repository::{CardRepository, DeckRepository};
use personal_flashcards::store::{JsonStore, MemoryStore, Store};
use personal_flashcards::ui::App;
use personal_flashcards::import;

// ══════════════════════════════════════════════════════════════════════════
// CLI Arguments
// ══════════════════════════════════════════════════════════════════════════

#[derive(Parser, Debug)]
#[command(name = "flashcards")]
#[command(author, version, about = "Personal flashcard decks with quiz-style study sessions", long_about = None)]
struct Args {
    /// Directory holding the deck and card tables
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is saved
    #[arg(long)]
    ephemeral: bool,

    /// Import cards from a `front,back` CSV file into a new deck
    #[arg(short, long)]
    import: Option<PathBuf>,

    /// Title for the imported deck (defaults to the file name)
    #[arg(long, requires = "import")]
    import_title: Option<String>,

    /// Print all decks and exit
    #[arg(short, long)]
    list: bool,

    /// Log filter, e.g. `debug` or `personal_flashcards=trace`
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// One-shot commands log to stderr. Ephemeral runs leave nothing on
    /// disk, the log included.
    fn log_sink<'a>(&self, data_dir: &'a Path) -> LogSink<'a> {
        if self.import.is_some() || self.list {
            LogSink::Stderr
        } else if self.ephemeral {
            LogSink::Discard
        } else {
            LogSink::File(data_dir)
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Main Entry Point
// ══════════════════════════════════════════════════════════════════════════

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: {:#}, using defaults", e);
        Config::default()
    });

    // Determine data directory
    let data_dir = args
        .data_dir
        .clone()
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(JsonStore::default_path);

    logging::init(
        args.log_sink(&data_dir),
        &config.log_level,
        args.log_level.as_deref(),
    )?;

    // Initialize storage
    let store: Rc<dyn Store> = if args.ephemeral {
        log::info!("Using in-memory store");
        Rc::new(MemoryStore::new())
    } else {
        let store = JsonStore::open(data_dir.clone())
            .with_context(|| format!("Failed to open data directory: {:?}", data_dir))?;
        Rc::new(store)
    };
    let decks = DeckRepository::new(store.clone());
    let cards = CardRepository::new(store);

    // Handle import if requested
    if let Some(csv_path) = args.import {
        let report = import::import_csv(&decks, &cards, &csv_path, args.import_title.as_deref())?;
        println!(
            "✓ Imported {} cards into '{}'",
            report.imported, report.deck.title
        );
        if report.skipped > 0 {
            println!("  {} rows skipped (see log)", report.skipped);
        }
        return Ok(());
    }

    if args.list {
        return print_decks(&decks, &cards);
    }

    // Run TUI
    run_tui(decks, cards, config)
}

fn print_decks(decks: &DeckRepository, cards: &CardRepository) -> Result<()> {
    let all = decks.list_decks().context("Failed to read decks")?;
    if all.is_empty() {
        println!("No decks yet.");
        return Ok(());
    }

    for deck in all {
        let count = cards
            .list_cards_for_deck(&deck.deck_id)
            .context("Failed to read cards")?
            .len();
        println!("{}  {} ({} cards)", deck.deck_id, deck.title, count);
    }
    Ok(())
}

fn run_tui(decks: DeckRepository, cards: CardRepository, config: Config) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::new(decks, cards, config);

    // Run main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        log::error!("Exited with error: {:#}", err);
        eprintln!("Error: {}", err);
        return Err(err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| app.render(frame))?;
        app.handle_events()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("flashcards").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_log_sink_per_mode() {
        let dir = Path::new("/tmp/flashcards-data");
        assert_eq!(args(&[]).log_sink(dir), LogSink::File(dir));
        assert_eq!(args(&["--ephemeral"]).log_sink(dir), LogSink::Discard);
        assert_eq!(args(&["--list"]).log_sink(dir), LogSink::Stderr);
        assert_eq!(args(&["--ephemeral", "--list"]).log_sink(dir), LogSink::Stderr);
        assert_eq!(args(&["--import", "deck.csv"]).log_sink(dir), LogSink::Stderr);
    }
}
