//! Deck and card repositories over the local store.
//!
//! Writes are optimistic: the caller gets the new record back even when the
//! store refuses it. The failure is logged and not retried.

use std::rc::Rc;

use crate::error::{StorageError, ValidationError};
use crate::models::{Card, Deck};
use crate::store::{Record, Store, Table};

type StorageResult<T> = std::result::Result<T, StorageError>;

fn write_optimistic<R: Record>(store: &dyn Store, record: &R, what: &str, id: &str) {
    if let Err(e) = Table::new(store).put(record) {
        log::warn!("Failed to persist {} {}: {}", what, id, e);
    }
}

/// CRUD over deck records.
#[derive(Clone)]
pub struct DeckRepository {
    store: Rc<dyn Store>,
}

impl DeckRepository {
    pub fn new(store: Rc<dyn Store>) -> Self {
        Self { store }
    }

    fn table(&self) -> Table<'_, Deck> {
        Table::new(self.store.as_ref())
    }

    /// Validate and write a new deck.
    pub fn create_deck(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Deck, ValidationError> {
        let deck = Deck::new(title, description)?;
        write_optimistic(self.store.as_ref(), &deck, "deck", &deck.deck_id);
        log::info!("Created deck '{}' ({})", deck.title, deck.deck_id);
        Ok(deck)
    }

    /// All decks in creation order.
    pub fn list_decks(&self) -> StorageResult<Vec<Deck>> {
        self.table().to_array()
    }

    pub fn get_deck(&self, deck_id: &str) -> StorageResult<Option<Deck>> {
        Ok(self
            .table()
            .filter(|d| d.deck_id == deck_id)
            .to_array()?
            .into_iter()
            .next())
    }
}

/// CRUD over card records, scoped by deck.
#[derive(Clone)]
pub struct CardRepository {
    store: Rc<dyn Store>,
}

impl CardRepository {
    pub fn new(store: Rc<dyn Store>) -> Self {
        Self { store }
    }

    fn table(&self) -> Table<'_, Card> {
        Table::new(self.store.as_ref())
    }

    /// Validate and write a new card. The deck is not checked for existence.
    pub fn create_card(&self, deck_id: &str, front: &str, back: &str) -> Result<Card, ValidationError> {
        let card = Card::new(deck_id, front, back)?;
        write_optimistic(self.store.as_ref(), &card, "card", &card.card_id);
        log::debug!("Created card {} in deck {}", card.card_id, deck_id);
        Ok(card)
    }

    pub fn list_cards_for_deck(&self, deck_id: &str) -> StorageResult<Vec<Card>> {
        self.table().filter(|c| c.deck_id == deck_id).to_array()
    }

    pub fn count_cards(&self) -> StorageResult<usize> {
        Ok(self.table().to_array()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{BrokenStore, JsonStore, MemoryStore};
    use tempfile::TempDir;

    fn repos(store: Rc<dyn Store>) -> (DeckRepository, CardRepository) {
        (DeckRepository::new(store.clone()), CardRepository::new(store))
    }

    #[test]
    fn test_create_deck_round_trips_exact_fields() {
        let (decks, _) = repos(Rc::new(MemoryStore::new()));
        let created = decks
            .create_deck("Capitals", Some("European capitals"))
            .unwrap();

        assert!(!created.deck_id.is_empty());
        assert_eq!(created.title, "Capitals");
        assert_eq!(created.description.as_deref(), Some("European capitals"));
        assert_eq!(decks.list_decks().unwrap(), vec![created.clone()]);
        assert_eq!(decks.get_deck(&created.deck_id).unwrap(), Some(created));
    }

    #[test]
    fn test_deck_ids_are_unique() {
        let (decks, _) = repos(Rc::new(MemoryStore::new()));
        let a = decks.create_deck("Same", None).unwrap();
        let b = decks.create_deck("Same", None).unwrap();
        assert_ne!(a.deck_id, b.deck_id);
        assert_eq!(decks.list_decks().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_deck_is_not_written() {
        let (decks, _) = repos(Rc::new(MemoryStore::new()));
        assert_eq!(decks.create_deck("", None), Err(ValidationError::EmptyTitle));
        assert!(matches!(
            decks.create_deck(&"x".repeat(51), None),
            Err(ValidationError::TitleTooLong { .. })
        ));
        assert!(decks.list_decks().unwrap().is_empty());
    }

    #[test]
    fn test_cards_are_scoped_by_deck() {
        let (decks, cards) = repos(Rc::new(MemoryStore::new()));
        let math = decks.create_deck("Math", None).unwrap();
        let geo = decks.create_deck("Geography", None).unwrap();

        cards.create_card(&math.deck_id, "1+1", "2").unwrap();
        cards.create_card(&geo.deck_id, "Capital of France", "Paris").unwrap();
        cards.create_card(&math.deck_id, "2+2", "4").unwrap();

        let math_cards = cards.list_cards_for_deck(&math.deck_id).unwrap();
        let fronts: Vec<&str> = math_cards.iter().map(|c| c.front.as_str()).collect();
        assert_eq!(fronts, ["1+1", "2+2"]);
        assert!(cards.list_cards_for_deck("no-such-deck").unwrap().is_empty());
        assert_eq!(cards.count_cards().unwrap(), 3);
    }

    #[test]
    fn test_invalid_card_is_not_written() {
        let (_, cards) = repos(Rc::new(MemoryStore::new()));
        assert_eq!(cards.create_card("d", "", "x"), Err(ValidationError::EmptyFront));
        assert_eq!(cards.create_card("d", "x", ""), Err(ValidationError::EmptyBack));
        assert_eq!(cards.count_cards().unwrap(), 0);
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let (decks, cards) = repos(Rc::new(BrokenStore));
        let deck = decks.create_deck("Offline", None).unwrap();
        let card = cards.create_card(&deck.deck_id, "q", "a").unwrap();
        assert_eq!(card.deck_id, deck.deck_id);

        assert!(decks.list_decks().is_err());
        assert!(cards.list_cards_for_deck(&deck.deck_id).is_err());
    }

    #[test]
    fn test_json_store_persists_across_repositories() {
        let temp = TempDir::new().unwrap();
        let deck_id = {
            let store: Rc<dyn Store> = Rc::new(JsonStore::open(temp.path().to_path_buf()).unwrap());
            let (decks, cards) = repos(store);
            let deck = decks.create_deck("Durable", None).unwrap();
            cards.create_card(&deck.deck_id, "front", "back").unwrap();
            deck.deck_id
        };

        let store: Rc<dyn Store> = Rc::new(JsonStore::open(temp.path().to_path_buf()).unwrap());
        let (decks, cards) = repos(store);
        assert_eq!(decks.list_decks().unwrap()[0].title, "Durable");
        assert_eq!(cards.list_cards_for_deck(&deck_id).unwrap()[0].back, "back");
    }
}
