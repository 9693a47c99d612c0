//! Local table store for decks and cards.
//!
//! Layout on disk:
//! ```text
//! {data_dir}/
//! ├── decks.json   # { "version": 1, "records": [ ...decks ] }
//! └── cards.json   # { "version": 1, "records": [ ...cards ] }
//! ```
//!
//! Records keep insertion order. `put` replaces a record with the same key
//! in place and appends otherwise.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StorageError;
use crate::models::{Card, Deck};

pub type Result<T> = std::result::Result<T, StorageError>;

/// Version written into every table file.
pub const SCHEMA_VERSION: u32 = 1;

/// A declared table and the field its records are keyed by.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    pub key: &'static str,
}

pub const DECKS: TableSchema = TableSchema {
    name: "decks",
    key: "deck_id",
};

pub const CARDS: TableSchema = TableSchema {
    name: "cards",
    key: "card_id",
};

pub const SCHEMA: &[TableSchema] = &[DECKS, CARDS];

fn schema_for(table: &str) -> Result<&'static TableSchema> {
    SCHEMA
        .iter()
        .find(|s| s.name == table)
        .ok_or_else(|| StorageError::UnknownTable(table.to_string()))
}

fn record_key(schema: &TableSchema, record: &Value) -> Result<String> {
    record
        .get(schema.key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(StorageError::MissingKey {
            table: schema.name,
            key: schema.key,
        })
}

fn upsert(schema: &TableSchema, records: &mut Vec<Value>, record: Value) -> Result<()> {
    let key = record_key(schema, &record)?;
    let existing = records
        .iter()
        .position(|r| record_key(schema, r).map_or(false, |k| k == key));
    match existing {
        Some(pos) => records[pos] = record,
        None => records.push(record),
    }
    Ok(())
}

/// Untyped table storage. Typed access goes through [`Table`].
pub trait Store {
    /// Insert or replace a record in `table`.
    fn put(&self, table: &str, record: Value) -> Result<()>;

    /// All records of `table` in insertion order.
    fn scan(&self, table: &str) -> Result<Vec<Value>>;
}

/// A record type bound to one declared table.
pub trait Record: Serialize + DeserializeOwned {
    const TABLE: TableSchema;
}

impl Record for Deck {
    const TABLE: TableSchema = DECKS;
}

impl Record for Card {
    const TABLE: TableSchema = CARDS;
}

/// Typed view over one table of a [`Store`].
pub struct Table<'a, R> {
    store: &'a dyn Store,
    _record: PhantomData<R>,
}

impl<'a, R: Record> Table<'a, R> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub fn put(&self, record: &R) -> Result<()> {
        self.store.put(R::TABLE.name, serde_json::to_value(record)?)
    }

    pub fn to_array(&self) -> Result<Vec<R>> {
        self.store
            .scan(R::TABLE.name)?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(StorageError::from))
            .collect()
    }

    pub fn filter<F>(&self, predicate: F) -> Filtered<'a, R, F>
    where
        F: Fn(&R) -> bool,
    {
        Filtered {
            table: Table::new(self.store),
            predicate,
        }
    }
}

/// Pending scan with a predicate, evaluated by [`Filtered::to_array`].
pub struct Filtered<'a, R, F> {
    table: Table<'a, R>,
    predicate: F,
}

impl<R: Record, F: Fn(&R) -> bool> Filtered<'_, R, F> {
    pub fn to_array(&self) -> Result<Vec<R>> {
        Ok(self
            .table
            .to_array()?
            .into_iter()
            .filter(|r| (self.predicate)(r))
            .collect())
    }
}

// ══════════════════════════════════════════════════════════════════════════
// JSON file store
// ══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize, Deserialize)]
struct TableFile {
    version: u32,
    #[serde(default)]
    records: Vec<Value>,
}

/// Store backed by one JSON file per table.
#[derive(Debug)]
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)?;
        log::debug!("Opened store at {:?}", data_dir);
        Ok(Self { data_dir })
    }

    /// Get default storage location.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("personal-flashcards")
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", table))
    }

    fn read_table(&self, schema: &TableSchema) -> Result<Vec<Value>> {
        let path = self.table_path(schema.name);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let json = fs::read_to_string(&path)?;
        let file: TableFile = serde_json::from_str(&json)?;
        if file.version > SCHEMA_VERSION {
            return Err(StorageError::UnsupportedVersion {
                path,
                found: file.version,
                supported: SCHEMA_VERSION,
            });
        }
        Ok(file.records)
    }

    fn write_table(&self, schema: &TableSchema, records: Vec<Value>) -> Result<()> {
        let path = self.table_path(schema.name);
        let tmp = path.with_extension("json.tmp");
        let file = TableFile {
            version: SCHEMA_VERSION,
            records,
        };
        fs::write(&tmp, serde_json::to_string_pretty(&file)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl Store for JsonStore {
    fn put(&self, table: &str, record: Value) -> Result<()> {
        let schema = schema_for(table)?;
        let mut records = self.read_table(schema)?;
        upsert(schema, &mut records, record)?;
        self.write_table(schema, records)
    }

    fn scan(&self, table: &str) -> Result<Vec<Value>> {
        let schema = schema_for(table)?;
        self.read_table(schema)
    }
}

// ══════════════════════════════════════════════════════════════════════════
// In-memory store
// ══════════════════════════════════════════════════════════════════════════

/// Store that keeps everything in memory for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RefCell<HashMap<&'static str, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn put(&self, table: &str, record: Value) -> Result<()> {
        let schema = schema_for(table)?;
        let mut tables = self.tables.borrow_mut();
        upsert(schema, tables.entry(schema.name).or_default(), record)
    }

    fn scan(&self, table: &str) -> Result<Vec<Value>> {
        let schema = schema_for(table)?;
        Ok(self
            .tables
            .borrow()
            .get(schema.name)
            .cloned()
            .unwrap_or_default())
    }
}

/// Store whose every operation fails.
#[cfg(test)]
pub(crate) struct BrokenStore;

#[cfg(test)]
impl Store for BrokenStore {
    fn put(&self, _table: &str, _record: Value) -> Result<()> {
        Err(StorageError::Unavailable("disk on fire".to_string()))
    }

    fn scan(&self, _table: &str) -> Result<Vec<Value>> {
        Err(StorageError::Unavailable("disk on fire".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_store() -> (JsonStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::open(temp_dir.path().join("data")).unwrap();
        (store, temp_dir)
    }

    fn deck(id: &str, title: &str) -> Deck {
        Deck {
            deck_id: id.to_string(),
            title: title.to_string(),
            description: None,
            created_at: chrono::Local::now(),
        }
    }

    #[test]
    fn test_empty_tables_read_as_empty() {
        let (store, _temp) = create_test_store();
        assert!(Table::<Deck>::new(&store).to_array().unwrap().is_empty());
        assert!(Table::<Card>::new(&store).to_array().unwrap().is_empty());
    }

    #[test]
    fn test_put_survives_reopen() {
        let (store, temp) = create_test_store();
        Table::new(&store).put(&deck("a", "Spanish")).unwrap();
        drop(store);

        let reopened = JsonStore::open(temp.path().join("data")).unwrap();
        let decks: Vec<Deck> = Table::new(&reopened).to_array().unwrap();
        assert_eq!(decks.len(), 1);
        assert_eq!(decks[0].title, "Spanish");
    }

    #[test]
    fn test_put_replaces_same_key_in_place() {
        let (store, _temp) = create_test_store();
        let decks = Table::new(&store);
        decks.put(&deck("a", "First")).unwrap();
        decks.put(&deck("b", "Second")).unwrap();
        decks.put(&deck("a", "First, renamed")).unwrap();

        let all = decks.to_array().unwrap();
        let titles: Vec<&str> = all.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, ["First, renamed", "Second"]);
    }

    #[test]
    fn test_filter_by_deck() {
        let store = MemoryStore::new();
        let cards = Table::new(&store);
        for (deck_id, front) in [("x", "1"), ("y", "2"), ("x", "3")] {
            cards.put(&Card::new(deck_id, front, "back").unwrap()).unwrap();
        }

        let in_x = cards.filter(|c: &Card| c.deck_id == "x").to_array().unwrap();
        let fronts: Vec<&str> = in_x.iter().map(|c| c.front.as_str()).collect();
        assert_eq!(fronts, ["1", "3"]);
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let (store, _temp) = create_test_store();
        fs::write(
            store.data_dir().join("decks.json"),
            json!({ "version": SCHEMA_VERSION + 1, "records": [] }).to_string(),
        )
        .unwrap();

        let err = Table::<Deck>::new(&store).to_array().unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedVersion { found: 2, .. }));
    }

    #[test]
    fn test_unknown_table_and_missing_key() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.put("notes", json!({ "id": "1" })),
            Err(StorageError::UnknownTable(_))
        ));
        assert!(matches!(
            store.put("decks", json!({ "title": "No id" })),
            Err(StorageError::MissingKey { key: "deck_id", .. })
        ));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let (store, _temp) = create_test_store();
        fs::write(store.data_dir().join("cards.json"), "{ not json").unwrap();
        assert!(matches!(
            Table::<Card>::new(&store).to_array(),
            Err(StorageError::Json(_))
        ));
    }
}
