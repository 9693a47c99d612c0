//! Main application state and logic.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::theme::Theme;
use super::widgets::{
    truncate_to_width, CompletionScreen, FlashcardWidget, GradeButtons, Header, KeyHints, StatsBar,
};
use crate::config::Config;
use crate::models::{Deck, Face, MAX_TITLE_LEN};
use crate::repository::{CardRepository, DeckRepository};
use crate::session::{SessionState, StudySession};

/// How long a status message stays on screen.
const STATUS_TTL: Duration = Duration::from_secs(5);

// ══════════════════════════════════════════════════════════════════════════
// Application State
// ══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    AddDeck,
    Deck,
    AddCard,
}

/// Two text fields with focus, shared by the add-deck and add-card forms.
#[derive(Debug, Default)]
pub struct Form {
    pub first: String,
    pub second: String,
    pub focus: usize, // 0 = first, 1 = second
    /// Character limit for the first field.
    pub first_limit: Option<usize>,
}

impl Form {
    fn with_limit(limit: usize) -> Self {
        Self {
            first_limit: Some(limit),
            ..Default::default()
        }
    }

    fn push(&mut self, c: char) {
        if self.focus == 0 {
            let full = self
                .first_limit
                .map_or(false, |max| self.first.chars().count() >= max);
            if !full {
                self.first.push(c);
            }
        } else {
            self.second.push(c);
        }
    }

    fn pop(&mut self) {
        if self.focus == 0 {
            self.first.pop();
        } else {
            self.second.pop();
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = (self.focus + 1) % 2;
    }
}

pub struct App {
    pub screen: Screen,
    pub running: bool,

    // Config and theme
    pub config: Config,
    pub theme: Theme,

    // Repositories
    decks: DeckRepository,
    cards: CardRepository,

    // Dashboard
    pub deck_list: Vec<Deck>,
    pub deck_list_state: ListState,
    pub card_total: usize,

    // Deck view, scoped to the selected deck
    pub current_deck: Option<Deck>,
    pub session: Option<StudySession>,

    // Add deck / add card form
    pub form: Form,

    // Status message (shown temporarily)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(decks: DeckRepository, cards: CardRepository, config: Config) -> Self {
        let theme = Theme::from_name(&config.theme);

        let mut app = Self {
            screen: Screen::Dashboard,
            running: true,
            config,
            theme,
            decks,
            cards,
            deck_list: Vec::new(),
            deck_list_state: ListState::default(),
            card_total: 0,
            current_deck: None,
            session: None,
            form: Form::default(),
            status_message: None,
        };
        app.refresh_dashboard();
        app
    }

    /// Reload deck list and card total. Read failures show as empty.
    pub fn refresh_dashboard(&mut self) {
        self.deck_list = self.decks.list_decks().unwrap_or_else(|e| {
            log::warn!("Failed to list decks: {}", e);
            Vec::new()
        });
        self.card_total = self.cards.count_cards().unwrap_or_else(|e| {
            log::warn!("Failed to count cards: {}", e);
            0
        });
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        if self.deck_list.is_empty() {
            self.deck_list_state.select(None);
        } else {
            let i = self.deck_list_state.selected().unwrap_or(0);
            self.deck_list_state.select(Some(i.min(self.deck_list.len() - 1)));
        }
    }

    pub fn cycle_theme(&mut self) {
        let new_theme_name = self.theme.name.next();
        self.theme = Theme::new(new_theme_name);
        self.config.theme = new_theme_name.as_str().to_string();
        if let Err(e) = self.config.save() {
            log::warn!("Failed to save config: {:#}", e);
        }
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    fn clear_status(&mut self) {
        self.status_message = None;
    }

    // ══════════════════════════════════════════════════════════════════════
    // Dashboard
    // ══════════════════════════════════════════════════════════════════════

    pub fn open_add_deck(&mut self) {
        self.form = Form::with_limit(MAX_TITLE_LEN);
        self.clear_status();
        self.screen = Screen::AddDeck;
    }

    pub fn submit_deck(&mut self) {
        let description = Some(self.form.second.as_str());
        match self.decks.create_deck(&self.form.first, description) {
            Ok(deck) => {
                // Optimistic: show the deck even if the write was lost.
                self.set_status(format!("Added deck '{}'", deck.title));
                self.deck_list.push(deck);
                self.deck_list_state.select(Some(self.deck_list.len() - 1));
                self.form = Form::default();
                self.screen = Screen::Dashboard;
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    pub fn cancel_form(&mut self) {
        self.form = Form::default();
        self.clear_status();
        self.screen = if self.session.is_some() {
            Screen::Deck
        } else {
            Screen::Dashboard
        };
    }

    /// Open the deck view for `deck_id` and start a fresh session.
    pub fn open_deck(&mut self, deck_id: &str) {
        self.current_deck = match self.decks.get_deck(deck_id) {
            Ok(Some(deck)) => Some(deck),
            Ok(None) => self.deck_list.iter().find(|d| d.deck_id == deck_id).cloned(),
            Err(e) => {
                log::warn!("Failed to load deck {}: {}", deck_id, e);
                self.deck_list.iter().find(|d| d.deck_id == deck_id).cloned()
            }
        };
        self.session = Some(StudySession::start(deck_id, &self.cards));
        self.clear_status();
        self.screen = Screen::Deck;
    }

    pub fn open_selected_deck(&mut self) {
        let selected = self
            .deck_list_state
            .selected()
            .and_then(|i| self.deck_list.get(i))
            .map(|d| d.deck_id.clone());
        if let Some(deck_id) = selected {
            self.open_deck(&deck_id);
        }
    }

    /// Leave the deck view. Session progress is dropped.
    pub fn close_deck(&mut self) {
        self.session = None;
        self.current_deck = None;
        self.screen = Screen::Dashboard;
        self.refresh_dashboard();
    }

    // ══════════════════════════════════════════════════════════════════════
    // Deck view
    // ══════════════════════════════════════════════════════════════════════

    fn showing_back(&self) -> bool {
        self.session
            .as_ref()
            .and_then(|s| s.current_card())
            .map_or(false, |c| c.face == Face::Back)
    }

    pub fn flip(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if let Err(e) = session.flip() {
                log::debug!("Ignored flip: {}", e);
            }
        }
    }

    pub fn grade(&mut self, right: bool) {
        if !self.showing_back() {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            let result = if right {
                session.mark_right()
            } else {
                session.mark_wrong()
            };
            if let Err(e) = result {
                log::debug!("Ignored grade: {}", e);
            }
        }
    }

    pub fn restart(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if let Err(e) = session.restart() {
                log::debug!("Ignored restart: {}", e);
            }
        }
    }

    pub fn open_add_card(&mut self) {
        self.form = Form::default();
        self.clear_status();
        self.screen = Screen::AddCard;
    }

    pub fn submit_card(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match self
            .cards
            .create_card(session.deck_id(), &self.form.first, &self.form.second)
        {
            Ok(card) => {
                session.push_card(card);
                self.card_total += 1;
                self.form = Form::default();
                self.set_status("Card added".to_string());
                self.screen = Screen::Deck;
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Event Handling
    // ══════════════════════════════════════════════════════════════════════

    pub fn handle_events(&mut self) -> anyhow::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match self.screen {
            Screen::Dashboard => self.handle_dashboard_keys(key),
            Screen::AddDeck => self.handle_form_keys(key, Self::submit_deck),
            Screen::Deck => self.handle_deck_keys(key),
            Screen::AddCard => self.handle_form_keys(key, Self::submit_card),
        }
    }

    fn handle_dashboard_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('t') => self.cycle_theme(),
            KeyCode::Char('n') => self.open_add_deck(),
            KeyCode::Up | KeyCode::Char('k') => {
                if !self.deck_list.is_empty() {
                    let i = self.deck_list_state.selected().unwrap_or(0);
                    let new_i = if i == 0 { self.deck_list.len() - 1 } else { i - 1 };
                    self.deck_list_state.select(Some(new_i));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if !self.deck_list.is_empty() {
                    let i = self.deck_list_state.selected().unwrap_or(0);
                    let new_i = if i + 1 >= self.deck_list.len() { 0 } else { i + 1 };
                    self.deck_list_state.select(Some(new_i));
                }
            }
            KeyCode::Enter => self.open_selected_deck(),
            _ => {}
        }
    }

    fn handle_form_keys(&mut self, key: KeyCode, submit: fn(&mut Self)) {
        match key {
            KeyCode::Esc => self.cancel_form(),
            KeyCode::Tab | KeyCode::BackTab => self.form.toggle_focus(),
            KeyCode::Enter => {
                if self.form.focus == 0 {
                    self.form.focus = 1;
                } else {
                    submit(self);
                }
            }
            KeyCode::Char(c) => self.form.push(c),
            KeyCode::Backspace => self.form.pop(),
            _ => {}
        }
    }

    fn handle_deck_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') => self.close_deck(),
            KeyCode::Char('t') => self.cycle_theme(),
            KeyCode::Char(' ') | KeyCode::Enter => self.flip(),
            KeyCode::Char('x') | KeyCode::Char('1') => self.grade(false),
            KeyCode::Char('v') | KeyCode::Char('2') => self.grade(true),
            KeyCode::Char('r') => self.restart(),
            KeyCode::Char('a') => self.open_add_card(),
            _ => {}
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Rendering
    // ══════════════════════════════════════════════════════════════════════

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Clear with background
        frame.render_widget(Clear, area);
        frame.render_widget(
            Block::default().style(Style::default().bg(self.theme.colors.bg_dark)),
            area,
        );

        match self.screen {
            Screen::Dashboard => self.render_dashboard(frame, area),
            Screen::AddDeck => self.render_add_deck(frame, area),
            Screen::Deck => self.render_deck(frame, area),
            Screen::AddCard => self.render_add_card(frame, area),
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, style: Style) {
        if let Some((ref msg, time)) = self.status_message {
            if time.elapsed() < STATUS_TTL {
                let status = Paragraph::new(msg.as_str())
                    .alignment(Alignment::Center)
                    .style(style);
                frame.render_widget(status, area);
            }
        }
    }

    fn render_dashboard(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(1),   // Top padding
            Constraint::Length(5),   // Header
            Constraint::Length(1),   // Counts
            Constraint::Length(1),   // Spacing
            Constraint::Min(5),      // Deck list
            Constraint::Length(1),   // Status
            Constraint::Length(2),   // Help
        ])
        .split(area);

        frame.render_widget(Header::new(&self.theme), chunks[1]);

        let counts = StatsBar::new(&self.theme)
            .item("Decks", self.deck_list.len(), Style::default().fg(self.theme.colors.right))
            .item("Cards", self.card_total, Style::default().fg(self.theme.colors.info));
        frame.render_widget(counts, centered_rect(50, 100, chunks[2]));

        let list_area = centered_rect(60, 100, chunks[4]);
        let list_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.colors.primary))
            .title(" Decks ")
            .title_style(self.theme.highlight());

        if self.deck_list.is_empty() {
            let empty = Paragraph::new("No decks added yet. Press n to get started.")
                .alignment(Alignment::Center)
                .style(self.theme.muted())
                .block(list_block);
            frame.render_widget(empty, list_area);
        } else {
            let title_width = (list_area.width as usize).saturating_sub(6);
            let items: Vec<ListItem> = self
                .deck_list
                .iter()
                .map(|deck| {
                    ListItem::new(Line::from(Span::styled(
                        truncate_to_width(&deck.title, title_width),
                        Style::default().add_modifier(Modifier::BOLD),
                    )))
                })
                .collect();

            let list = List::new(items)
                .block(list_block)
                .highlight_style(self.theme.selected())
                .highlight_symbol("> ");
            frame.render_stateful_widget(list, list_area, &mut self.deck_list_state);
        }

        self.render_status(frame, chunks[5], Style::default().fg(self.theme.colors.right));

        let theme_hint = format!("[{}]", self.theme.name.display_name());
        let hints_data: [(&str, &str); 5] = [
            ("j/k", "nav"),
            ("Enter", "study"),
            ("n", "new deck"),
            ("t", &theme_hint),
            ("q", "quit"),
        ];
        frame.render_widget(KeyHints::new(&hints_data, &self.theme), chunks[6]);
    }

    fn render_form(
        &self,
        frame: &mut Frame,
        area: Rect,
        heading: String,
        labels: (String, &str),
        hints: &[(&str, &str)],
    ) {
        let chunks = Layout::vertical([
            Constraint::Length(3),   // Title
            Constraint::Length(1),   // Spacing
            Constraint::Length(3),   // First field
            Constraint::Length(1),   // Spacing
            Constraint::Length(5),   // Second field
            Constraint::Length(1),   // Spacing
            Constraint::Length(1),   // Status
            Constraint::Min(1),      // Spacer
            Constraint::Length(2),   // Hints
        ])
        .split(centered_rect(60, 100, area));

        let title = Paragraph::new(heading)
            .alignment(Alignment::Center)
            .style(self.theme.title());
        frame.render_widget(title, chunks[0]);

        let fields = [
            (self.form.first.as_str(), labels.0.as_str(), chunks[2]),
            (self.form.second.as_str(), labels.1, chunks[4]),
        ];
        for (i, (value, label, field_area)) in fields.into_iter().enumerate() {
            let style = if self.form.focus == i {
                Style::default().fg(self.theme.colors.accent)
            } else {
                self.theme.muted()
            };
            let field = Paragraph::new(value)
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(style)
                        .title(format!(" {} ", label))
                        .title_style(style),
                );
            frame.render_widget(field, field_area);
        }

        self.render_status(frame, chunks[6], self.theme.error());
        frame.render_widget(KeyHints::new(hints, &self.theme), chunks[8]);
    }

    fn render_add_deck(&mut self, frame: &mut Frame, area: Rect) {
        let title_label = format!(
            "Title ({}/{})",
            self.form.first.chars().count(),
            MAX_TITLE_LEN
        );
        self.render_form(
            frame,
            area,
            "Add Deck".to_string(),
            (title_label, "Description (optional)"),
            &[("Tab", "switch field"), ("Enter", "add"), ("Esc", "cancel")],
        );
    }

    fn render_add_card(&mut self, frame: &mut Frame, area: Rect) {
        let deck_title = self
            .current_deck
            .as_ref()
            .map(|d| d.title.as_str())
            .unwrap_or("Deck");
        self.render_form(
            frame,
            area,
            format!("Add Card to {}", deck_title),
            ("Front (Question)".to_string(), "Back (Answer)"),
            &[("Tab", "switch field"), ("Enter", "add card"), ("Esc", "cancel")],
        );
    }

    fn render_deck(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(1),   // Title
            Constraint::Length(1),   // Description
            Constraint::Length(1),   // Progress
            Constraint::Length(1),   // Separator
            Constraint::Min(8),      // Card
            Constraint::Length(3),   // Buttons
            Constraint::Length(1),   // Status
            Constraint::Length(2),   // Hints
        ])
        .split(area);

        let Some(session) = self.session.as_ref() else {
            return;
        };

        let (title, description, created) = match &self.current_deck {
            Some(deck) => (
                deck.title.as_str(),
                deck.description.as_deref().unwrap_or(""),
                deck.created_at.format("%Y-%m-%d").to_string(),
            ),
            None => ("Deck", "", String::new()),
        };
        let header = Line::from(vec![
            Span::styled(title, self.theme.title()),
            Span::styled(
                format!("  {} Cards", session.len()),
                self.theme.muted(),
            ),
            Span::styled(
                if created.is_empty() { String::new() } else { format!("  created {}", created) },
                self.theme.key_hint(),
            ),
        ]);
        frame.render_widget(Paragraph::new(header).alignment(Alignment::Center), chunks[0]);
        frame.render_widget(
            Paragraph::new(description)
                .alignment(Alignment::Center)
                .style(self.theme.muted()),
            chunks[1],
        );

        let progress = session.progress();
        let stats = StatsBar::new(&self.theme)
            .item("Tries", progress.total_tries, Style::default().fg(self.theme.colors.info))
            .item("Correct", progress.total_correct, Style::default().fg(self.theme.colors.right))
            .item("Remaining", session.remaining(), Style::default().fg(self.theme.colors.accent));
        frame.render_widget(stats, centered_rect(70, 100, chunks[2]));

        let card_area = centered_rect(80, 100, chunks[4]);
        if let Some(summary) = session.summary() {
            frame.render_widget(
                CompletionScreen::new(summary, &self.theme),
                centered_rect(60, 80, chunks[4]),
            );
        } else if let Some(current) = session.current_card() {
            frame.render_widget(
                FlashcardWidget::new(current.text, current.face, &self.theme),
                card_area,
            );
        } else {
            let empty = Paragraph::new("No cards in this deck yet. Press a to add one.")
                .alignment(Alignment::Center)
                .style(self.theme.muted());
            frame.render_widget(empty, card_area);
        }

        let showing_back = self.showing_back();
        if session.state() == SessionState::Active && !session.is_empty() {
            frame.render_widget(
                GradeButtons::new(showing_back, &self.theme),
                centered_rect(60, 100, chunks[5]),
            );
        }

        self.render_status(frame, chunks[6], Style::default().fg(self.theme.colors.right));

        let hints: &[(&str, &str)] = if session.state() == SessionState::Complete {
            &[("r", "restart"), ("a", "add card"), ("Esc", "back")]
        } else if showing_back {
            &[("x", "wrong"), ("v", "right"), ("Space", "flip"), ("Esc", "back")]
        } else {
            &[("Space", "flip"), ("a", "add card"), ("r", "restart"), ("Esc", "back")]
        };
        frame.render_widget(KeyHints::new(hints, &self.theme), chunks[7]);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Helper Functions
// ══════════════════════════════════════════════════════════════════════════

/// Create a centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{BrokenStore, MemoryStore, Store};
    use ratatui::{backend::TestBackend, Terminal};
    use std::rc::Rc;

    fn create_test_app() -> App {
        let store: Rc<dyn Store> = Rc::new(MemoryStore::new());
        App::new(
            DeckRepository::new(store.clone()),
            CardRepository::new(store),
            Config::default(),
        )
    }

    #[test]
    fn test_unreadable_store_shows_empty_dashboard() {
        let store: Rc<dyn Store> = Rc::new(BrokenStore);
        let mut app = App::new(
            DeckRepository::new(store.clone()),
            CardRepository::new(store),
            Config::default(),
        );

        assert!(app.deck_list.is_empty());
        assert_eq!(app.card_total, 0);
        assert_eq!(app.deck_list_state.selected(), None);
        assert!(screen_text(&mut app).contains("No decks added yet"));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    fn add_deck(app: &mut App, title: &str) {
        app.handle_key(KeyCode::Char('n'));
        type_text(app, title);
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Enter);
    }

    fn add_card(app: &mut App, front: &str, back: &str) {
        app.handle_key(KeyCode::Char('a'));
        type_text(app, front);
        app.handle_key(KeyCode::Tab);
        type_text(app, back);
        app.handle_key(KeyCode::Enter);
    }

    fn screen_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_add_deck_from_dashboard() {
        let mut app = create_test_app();
        add_deck(&mut app, "Arithmetic");

        assert_eq!(app.screen, Screen::Dashboard);
        assert_eq!(app.deck_list.len(), 1);
        assert_eq!(app.deck_list[0].title, "Arithmetic");
        assert_eq!(app.deck_list_state.selected(), Some(0));
    }

    #[test]
    fn test_empty_title_keeps_form_open() {
        let mut app = create_test_app();
        add_deck(&mut app, "   ");

        assert_eq!(app.screen, Screen::AddDeck);
        assert!(app.deck_list.is_empty());
        assert_eq!(
            app.status_message.as_ref().map(|(m, _)| m.as_str()),
            Some("Title is required")
        );
    }

    #[test]
    fn test_title_input_stops_at_limit() {
        let mut app = create_test_app();
        app.handle_key(KeyCode::Char('n'));
        type_text(&mut app, &"a".repeat(MAX_TITLE_LEN + 10));
        assert_eq!(app.form.first.chars().count(), MAX_TITLE_LEN);
    }

    #[test]
    fn test_study_flow_to_completion_and_restart() {
        let mut app = create_test_app();
        add_deck(&mut app, "Arithmetic");
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.screen, Screen::Deck);

        add_card(&mut app, "1+1", "2");
        add_card(&mut app, "2+2", "4");
        assert_eq!(app.screen, Screen::Deck);
        assert_eq!(app.card_total, 2);

        // Grading is ignored until the answer is showing.
        app.handle_key(KeyCode::Char('v'));
        assert_eq!(app.session.as_ref().unwrap().progress().total_tries, 0);

        for _ in 0..2 {
            app.handle_key(KeyCode::Char(' '));
            app.handle_key(KeyCode::Char('v'));
        }
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.state(), SessionState::Complete);
        assert!(screen_text(&mut app).contains("100.00%"));

        app.handle_key(KeyCode::Char('r'));
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.progress().current_index, Some(0));
    }

    #[test]
    fn test_leaving_deck_drops_session() {
        let mut app = create_test_app();
        add_deck(&mut app, "Geography");
        app.handle_key(KeyCode::Enter);
        add_card(&mut app, "Capital of France", "Paris");
        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Char('x'));

        app.handle_key(KeyCode::Esc);
        assert_eq!(app.screen, Screen::Dashboard);
        assert!(app.session.is_none());
        assert_eq!(app.card_total, 1);

        // Reopening starts over.
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.session.as_ref().unwrap().progress().total_tries, 0);
    }

    #[test]
    fn test_render_every_screen() {
        let mut app = create_test_app();
        assert!(screen_text(&mut app).contains("No decks added yet"));

        app.handle_key(KeyCode::Char('n'));
        assert!(screen_text(&mut app).contains("Add Deck"));
        type_text(&mut app, "Empty");
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Enter);
        assert!(screen_text(&mut app).contains("Empty"));

        app.handle_key(KeyCode::Enter);
        assert!(screen_text(&mut app).contains("No cards in this deck yet"));

        app.handle_key(KeyCode::Char('a'));
        assert!(screen_text(&mut app).contains("Add Card to Empty"));
        app.handle_key(KeyCode::Esc);
        assert_eq!(app.screen, Screen::Deck);
    }
}
