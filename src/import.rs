//! Import a deck from a `front,back` CSV file.

use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Deck;
use crate::repository::{CardRepository, DeckRepository};

/// What an import produced.
#[derive(Debug)]
pub struct ImportReport {
    pub deck: Deck,
    pub imported: usize,
    pub skipped: usize,
}

/// Create a deck and one card per CSV row.
///
/// The deck title defaults to the file name in Title Case. Fields may be
/// quoted. Rows that fail card validation are skipped.
pub fn import_csv(
    decks: &DeckRepository,
    cards: &CardRepository,
    csv_path: &Path,
    title: Option<&str>,
) -> Result<ImportReport> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(csv_path)
        .with_context(|| format!("Failed to read CSV file: {:?}", csv_path))?;

    let title = match title {
        Some(t) => t.to_string(),
        None => csv_path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(filename_to_title_case)
            .unwrap_or_else(|| "Imported Deck".to_string()),
    };
    let deck = decks
        .create_deck(&title, None)
        .with_context(|| format!("Invalid deck title '{}'", title))?;

    let mut imported = 0;
    let mut skipped = 0;
    for (i, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Row {}: {}", i + 1, e);
                skipped += 1;
                continue;
            }
        };
        let line = record.position().map_or(i as u64 + 1, |p| p.line());

        // Skip header
        if i == 0 && record.iter().any(|f| f.to_lowercase().contains("front")) {
            continue;
        }
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let (Some(front), Some(back)) = (record.get(0), record.get(1)) else {
            log::warn!("Line {}: expected 'front,back'", line);
            skipped += 1;
            continue;
        };
        match cards.create_card(&deck.deck_id, front, back) {
            Ok(_) => imported += 1,
            Err(e) => {
                log::warn!("Line {}: {}", line, e);
                skipped += 1;
            }
        }
    }

    log::info!(
        "Imported {} cards into '{}' ({} skipped)",
        imported,
        deck.title,
        skipped
    );
    Ok(ImportReport {
        deck,
        imported,
        skipped,
    })
}

/// Convert a filename (snake_case or kebab-case) to Title Case.
fn filename_to_title_case(name: &str) -> String {
    name.split(|c| c == '_' || c == '-')
        .filter(|s| !s.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => {
                    first.to_uppercase().collect::<String>() + chars.as_str().to_lowercase().as_str()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Store};
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn repos() -> (DeckRepository, CardRepository) {
        let store: Rc<dyn Store> = Rc::new(MemoryStore::new());
        (DeckRepository::new(store.clone()), CardRepository::new(store))
    }

    #[test]
    fn test_import_skips_header_and_bad_rows() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state_capitals.csv");
        fs::write(
            &path,
            "Front,Back\nOhio,Columbus\n\nno comma here\nTexas, Austin\n,empty front\n",
        )
        .unwrap();

        let (decks, cards) = repos();
        let report = import_csv(&decks, &cards, &path, None).unwrap();

        assert_eq!(report.deck.title, "State Capitals");
        assert_eq!(report.imported, 2);
        assert_eq!(report.skipped, 2);

        let stored = cards.list_cards_for_deck(&report.deck.deck_id).unwrap();
        assert_eq!(stored[1].front, "Texas");
        assert_eq!(stored[1].back, "Austin");
    }

    #[test]
    fn test_quoted_fields_keep_their_commas() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cities.csv");
        fs::write(
            &path,
            "\"Largest city, by population\",Tokyo\n\"Say \"\"hi\"\"\",\"Hello, world\"\n",
        )
        .unwrap();

        let (decks, cards) = repos();
        let report = import_csv(&decks, &cards, &path, None).unwrap();
        assert_eq!(report.imported, 2);
        assert_eq!(report.skipped, 0);

        let stored = cards.list_cards_for_deck(&report.deck.deck_id).unwrap();
        assert_eq!(stored[0].front, "Largest city, by population");
        assert_eq!(stored[0].back, "Tokyo");
        assert_eq!(stored[1].front, "Say \"hi\"");
        assert_eq!(stored[1].back, "Hello, world");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let (decks, cards) = repos();
        assert!(import_csv(&decks, &cards, &temp.path().join("absent.csv"), None).is_err());
    }

    #[test]
    fn test_explicit_title_is_validated() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("deck.csv");
        fs::write(&path, "a,b\n").unwrap();

        let (decks, cards) = repos();
        assert!(import_csv(&decks, &cards, &path, Some("")).is_err());
        assert!(decks.list_decks().unwrap().is_empty());

        let report = import_csv(&decks, &cards, &path, Some("Letters")).unwrap();
        assert_eq!(report.deck.title, "Letters");
        assert_eq!(report.imported, 1);
    }

    #[test]
    fn test_filename_to_title_case() {
        assert_eq!(filename_to_title_case("spanish_verbs"), "Spanish Verbs");
        assert_eq!(filename_to_title_case("rust--TRAITS"), "Rust Traits");
    }
}
