//! Data models for decks and cards.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Longest allowed deck title, in characters.
pub const MAX_TITLE_LEN: usize = 50;

/// Generate a new time-ordered identifier.
///
/// UUID v7 strings sort lexicographically by creation time.
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

/// Which side of a card is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Face {
    #[default]
    Front,
    Back,
}

impl Face {
    pub fn flipped(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Front => "QUESTION",
            Self::Back => "ANSWER",
        }
    }
}

/// A named collection of cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub deck_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "Local::now")]
    pub created_at: DateTime<Local>,
}

impl Deck {
    /// Build a new deck after validating the title.
    pub fn new(title: &str, description: Option<&str>) -> Result<Self, ValidationError> {
        let title = validate_title(title)?;
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(Self {
            deck_id: new_id(),
            title,
            description,
            created_at: Local::now(),
        })
    }
}

/// A front/back pair belonging to one deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub card_id: String,
    pub deck_id: String,
    pub front: String,
    pub back: String,
    #[serde(default = "Local::now")]
    pub created_at: DateTime<Local>,
}

impl Card {
    pub fn new(deck_id: &str, front: &str, back: &str) -> Result<Self, ValidationError> {
        let front = front.trim();
        if front.is_empty() {
            return Err(ValidationError::EmptyFront);
        }
        let back = back.trim();
        if back.is_empty() {
            return Err(ValidationError::EmptyBack);
        }

        Ok(Self {
            card_id: new_id(),
            deck_id: deck_id.to_string(),
            front: front.to_string(),
            back: back.to_string(),
            created_at: Local::now(),
        })
    }

    /// Text for the given face.
    pub fn text(&self, face: Face) -> &str {
        match face {
            Face::Front => &self.front,
            Face::Back => &self.back,
        }
    }
}

fn validate_title(title: &str) -> Result<String, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong {
            len,
            max: MAX_TITLE_LEN,
        });
    }
    Ok(title.to_string())
}
