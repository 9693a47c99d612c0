//! Custom widgets for the flashcard TUI.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthChar;

use super::theme::Theme;
use crate::models::Face;
use crate::session::SessionSummary;

// ══════════════════════════════════════════════════════════════════════════
// Header Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct Header<'a> {
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    const ART: &'static str = r#"
 ╭──────────────────────────────────────╮
 │  ┌───┐ ┌───┐                         │
 │  │ ? │ │ ! │   Personal Flashcards   │
 │  └───┘ └───┘                         │
 ╰──────────────────────────────────────╯"#;

    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = Self::ART
            .lines()
            .skip(1)
            .map(|line| Line::from(Span::styled(line, Style::default().fg(self.theme.colors.primary))))
            .collect();

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Stats Bar Widget
// ══════════════════════════════════════════════════════════════════════════

/// A row of labelled counters, evenly spaced.
pub struct StatsBar<'a> {
    items: Vec<(&'a str, String, Style)>,
    theme: &'a Theme,
}

impl<'a> StatsBar<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            items: Vec::new(),
            theme,
        }
    }

    pub fn item(mut self, label: &'a str, value: impl ToString, style: Style) -> Self {
        self.items.push((label, value.to_string(), style));
        self
    }
}

impl Widget for StatsBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.items.is_empty() {
            return;
        }
        let chunks = Layout::horizontal(vec![Constraint::Fill(1); self.items.len()]).split(area);

        for (chunk, (label, value, style)) in chunks.iter().zip(self.items) {
            let text = Line::from(vec![
                Span::styled("● ", style),
                Span::styled(format!("{}: ", label), self.theme.muted()),
                Span::styled(value, style),
            ]);
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .render(*chunk, buf);
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Flashcard Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct FlashcardWidget<'a> {
    content: &'a str,
    face: Face,
    theme: &'a Theme,
}

impl<'a> FlashcardWidget<'a> {
    pub fn new(content: &'a str, face: Face, theme: &'a Theme) -> Self {
        Self { content, face, theme }
    }
}

impl Widget for FlashcardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (label_style, border_style) = match self.face {
            Face::Front => (self.theme.card_front(), Style::default().fg(self.theme.colors.accent)),
            Face::Back => (self.theme.card_back(), Style::default().fg(self.theme.colors.right)),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(self.face.label(), label_style),
                Span::raw(" "),
            ]))
            .title_alignment(Alignment::Center);

        let inner = block.inner(area);
        block.render(area, buf);

        let content_para = Paragraph::new(self.content)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(self.theme.colors.text));

        // Center vertically
        let content_height = self.content.lines().count() as u16;
        let vertical_padding = inner.height.saturating_sub(content_height) / 2;

        let content_area = Rect {
            x: inner.x + 2,
            y: inner.y + vertical_padding,
            width: inner.width.saturating_sub(4),
            height: inner.height.saturating_sub(vertical_padding),
        };

        content_para.render(content_area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Grade Buttons Widget
// ══════════════════════════════════════════════════════════════════════════

/// Wrong / right buttons, dimmed until the answer is showing.
pub struct GradeButtons<'a> {
    enabled: bool,
    theme: &'a Theme,
}

impl<'a> GradeButtons<'a> {
    pub fn new(enabled: bool, theme: &'a Theme) -> Self {
        Self { enabled, theme }
    }
}

impl Widget for GradeButtons<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);
        let buttons = [
            ("x", "✗ Wrong", self.theme.colors.wrong),
            ("v", "✓ Right", self.theme.colors.right),
        ];

        for (chunk, (key, name, color)) in chunks.iter().zip(buttons) {
            let color = if self.enabled { color } else { self.theme.colors.text_dim };

            let button = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color));
            let inner = button.inner(*chunk);
            button.render(*chunk, buf);

            let line = Line::from(vec![
                Span::styled(key, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(name, Style::default().fg(color)),
            ]);
            Paragraph::new(line)
                .alignment(Alignment::Center)
                .render(inner, buf);
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Key Hints Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct KeyHints<'a> {
    hints: &'a [(&'a str, &'a str)],
    theme: &'a Theme,
}

impl<'a> KeyHints<'a> {
    pub fn new(hints: &'a [(&'a str, &'a str)], theme: &'a Theme) -> Self {
        Self { hints, theme }
    }
}

impl Widget for KeyHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let spans: Vec<Span> = self
            .hints
            .iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(*key, self.theme.key_highlight()),
                    Span::styled(format!(" {} ", desc), self.theme.key_hint()),
                    Span::styled("│ ", Style::default().fg(self.theme.colors.text_dim)),
                ]
            })
            .collect();

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Completion Screen Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct CompletionScreen<'a> {
    summary: SessionSummary,
    theme: &'a Theme,
}

impl<'a> CompletionScreen<'a> {
    pub fn new(summary: SessionSummary, theme: &'a Theme) -> Self {
        Self { summary, theme }
    }
}

impl Widget for CompletionScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.colors.right))
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled("SESSION COMPLETE", self.theme.card_back()),
                Span::raw(" "),
            ]))
            .title_alignment(Alignment::Center);

        let inner = block.inner(area);
        block.render(area, buf);

        let value = Style::default()
            .fg(self.theme.colors.primary)
            .add_modifier(Modifier::BOLD);
        let text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("Total tries: ", self.theme.muted()),
                Span::styled(self.summary.total_tries.to_string(), value),
            ]),
            Line::from(vec![
                Span::styled("Total correct: ", self.theme.muted()),
                Span::styled(self.summary.total_correct.to_string(), value),
            ]),
            Line::from(vec![
                Span::styled("Success: ", self.theme.muted()),
                Span::styled(self.summary.success_rate_display(), value),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", self.theme.key_hint()),
                Span::styled("r", self.theme.key_highlight()),
                Span::styled(" to restart", self.theme.key_hint()),
            ]),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════

/// Cut `text` to at most `max_width` terminal columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    if max_width > 0 {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Spanish", 10), "Spanish");
        assert_eq!(truncate_to_width("Spanish verbs", 8), "Spanish…");
        // Wide characters take two columns each.
        assert_eq!(truncate_to_width("日本語の単語", 7), "日本語…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
