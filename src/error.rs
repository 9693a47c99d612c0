//! Error types shared across the store, repositories and study session.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid user input. Nothing is written when this is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    EmptyTitle,

    #[error("Title is {len} characters long (max {max})")]
    TitleTooLong { len: usize, max: usize },

    #[error("Front of the card is required")]
    EmptyFront,

    #[error("Back of the card is required")]
    EmptyBack,
}

/// Failure reading or writing the persistent store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Table file {path:?} has version {found}, this build reads up to {supported}")]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        supported: u32,
    },

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Record in table '{table}' has no string '{key}' field")]
    MissingKey {
        table: &'static str,
        key: &'static str,
    },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Operation not allowed in the session's current state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session is not active")]
    NotActive,

    #[error("Session cards are already loaded")]
    AlreadyLoaded,

    #[error("No card to grade")]
    NoCurrentCard,
}
