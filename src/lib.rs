//! Personal flashcards: decks of front/back cards studied in quiz-style sessions.
//!
//! Decks and cards are kept in a local table store ([`store`]) behind the
//! [`repository`] types. A [`session::StudySession`] walks one deck's cards
//! in memory, and [`ui`] renders it in the terminal.

pub mod config;
pub mod error;
pub mod import;
pub mod logging;
pub mod models;
pub mod repository;
pub mod session;
pub mod store;
pub mod ui;
