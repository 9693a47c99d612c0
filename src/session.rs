//! Study session engine.
//!
//! A session walks a fixed set of cards for one deck. Cards answered wrong
//! stay in play; the session completes once every card has been marked
//! right at least once. Nothing here is persisted.

use crate::error::SessionError;
use crate::models::{Card, Face};
use crate::repository::CardRepository;

pub type Result<T> = std::result::Result<T, SessionError>;

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Active,
    Complete,
}

/// A card as seen by the session.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyCard {
    pub card: Card,
    pub marked_correct: bool,
    pub face: Face,
}

impl StudyCard {
    fn new(card: Card) -> Self {
        Self {
            card,
            marked_correct: false,
            face: Face::Front,
        }
    }
}

/// Counters and position for the running pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionProgress {
    /// `None` once complete, or when there is nothing to show.
    pub current_index: Option<usize>,
    pub face: Face,
    pub total_tries: u32,
    pub total_correct: u32,
}

impl SessionProgress {
    fn initial(card_count: usize) -> Self {
        Self {
            current_index: (card_count > 0).then_some(0),
            ..Default::default()
        }
    }
}

/// The displayable side of the current card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentCard<'a> {
    pub index: usize,
    pub face: Face,
    pub text: &'a str,
    pub card: &'a Card,
}

/// Results shown when a session completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    pub total_tries: u32,
    pub total_correct: u32,
    /// Percentage rounded to two decimals, `None` without any tries.
    pub success_rate: Option<f64>,
}

impl SessionSummary {
    fn from_progress(progress: &SessionProgress) -> Self {
        let success_rate = (progress.total_tries > 0).then(|| {
            let rate = progress.total_correct as f64 / progress.total_tries as f64 * 100.0;
            (rate * 100.0).round() / 100.0
        });
        Self {
            total_tries: progress.total_tries,
            total_correct: progress.total_correct,
            success_rate,
        }
    }

    /// Success rate as shown to the user, e.g. `"66.67%"`.
    pub fn success_rate_display(&self) -> String {
        match self.success_rate {
            Some(rate) => format!("{:.2}%", rate),
            None => "n/a".to_string(),
        }
    }
}

/// One study pass over a deck's cards.
#[derive(Debug, Clone)]
pub struct StudySession {
    deck_id: String,
    state: SessionState,
    cards: Vec<StudyCard>,
    progress: SessionProgress,
}

impl StudySession {
    /// A session for `deck_id`, waiting for its cards.
    pub fn new(deck_id: impl Into<String>) -> Self {
        Self {
            deck_id: deck_id.into(),
            state: SessionState::Loading,
            cards: Vec::new(),
            progress: SessionProgress::default(),
        }
    }

    /// Create a session and load the deck's cards from the repository.
    ///
    /// A read failure starts the session with no cards.
    pub fn start(deck_id: &str, cards: &CardRepository) -> Self {
        let loaded = cards.list_cards_for_deck(deck_id).unwrap_or_else(|e| {
            log::warn!("Failed to load cards for deck {}: {}", deck_id, e);
            Vec::new()
        });

        let mut session = Self::new(deck_id);
        if let Err(e) = session.load(loaded) {
            log::debug!("Ignored load: {}", e);
        }
        log::info!(
            "Started session for deck {} with {} cards",
            deck_id,
            session.cards.len()
        );
        session
    }

    /// Move from `Loading` to `Active` with the given cards.
    pub fn load(&mut self, cards: Vec<Card>) -> Result<()> {
        if self.state != SessionState::Loading {
            return Err(SessionError::AlreadyLoaded);
        }
        self.cards = cards.into_iter().map(StudyCard::new).collect();
        self.progress = SessionProgress::initial(self.cards.len());
        self.state = SessionState::Active;
        Ok(())
    }

    pub fn deck_id(&self) -> &str {
        &self.deck_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn progress(&self) -> &SessionProgress {
        &self.progress
    }

    pub fn cards(&self) -> &[StudyCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards not yet marked right.
    pub fn remaining(&self) -> usize {
        self.cards.iter().filter(|c| !c.marked_correct).count()
    }

    pub fn current_card(&self) -> Option<CurrentCard<'_>> {
        let index = self.progress.current_index?;
        let study = self.cards.get(index)?;
        Some(CurrentCard {
            index,
            face: study.face,
            text: study.card.text(study.face),
            card: &study.card,
        })
    }

    /// Completion summary, only once the session is complete.
    pub fn summary(&self) -> Option<SessionSummary> {
        (self.state == SessionState::Complete).then(|| SessionSummary::from_progress(&self.progress))
    }

    fn ensure_active(&self) -> Result<()> {
        if self.state == SessionState::Active {
            Ok(())
        } else {
            Err(SessionError::NotActive)
        }
    }

    /// First pending card after `current`, wrapping around, never `current` itself.
    fn next_pending(&self, current: usize) -> Option<usize> {
        let len = self.cards.len();
        (1..len)
            .map(|offset| (current + offset) % len)
            .find(|&i| !self.cards[i].marked_correct)
    }

    fn show(&mut self, index: usize) {
        self.cards[index].face = Face::Front;
        self.progress.current_index = Some(index);
        self.progress.face = Face::Front;
    }

    /// Toggle the face of the current card.
    pub fn flip(&mut self) -> Result<()> {
        self.ensure_active()?;
        if let Some(index) = self.progress.current_index {
            let face = self.cards[index].face.flipped();
            self.cards[index].face = face;
            self.progress.face = face;
        }
        Ok(())
    }

    /// Count a miss and move on to another pending card, if there is one.
    pub fn mark_wrong(&mut self) -> Result<()> {
        self.ensure_active()?;
        let current = self.progress.current_index.ok_or(SessionError::NoCurrentCard)?;

        let next = self.next_pending(current).unwrap_or(current);
        self.progress.total_tries += 1;
        self.show(next);
        Ok(())
    }

    /// Count a hit, retire the current card and move on or complete.
    pub fn mark_right(&mut self) -> Result<()> {
        self.ensure_active()?;
        let current = self.progress.current_index.ok_or(SessionError::NoCurrentCard)?;

        self.cards[current].marked_correct = true;
        self.progress.total_tries += 1;
        self.progress.total_correct += 1;

        match self.next_pending(current) {
            Some(next) => self.show(next),
            None => {
                self.progress.current_index = None;
                self.progress.face = Face::Front;
                self.state = SessionState::Complete;
                log::info!(
                    "Completed session for deck {}: {}/{} correct",
                    self.deck_id,
                    self.progress.total_correct,
                    self.progress.total_tries
                );
            }
        }
        Ok(())
    }

    /// Put every card back in play and zero the counters.
    pub fn restart(&mut self) -> Result<()> {
        if self.state == SessionState::Loading {
            return Err(SessionError::NotActive);
        }
        for study in &mut self.cards {
            study.marked_correct = false;
            study.face = Face::Front;
        }
        self.progress = SessionProgress::initial(self.cards.len());
        self.state = SessionState::Active;
        Ok(())
    }

    /// Append a card created while the session is open.
    ///
    /// An active session with nothing to show picks it up right away; a
    /// complete session holds it until the next restart.
    pub fn push_card(&mut self, card: Card) {
        self.cards.push(StudyCard::new(card));
        if self.state == SessionState::Active && self.progress.current_index.is_none() {
            self.show(self.cards.len() - 1);
        }
    }
}
