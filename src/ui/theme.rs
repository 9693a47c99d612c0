//! Theme and styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// Color palette for a theme.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub primary: Color,
    pub accent: Color,
    pub info: Color,

    pub bg_dark: Color,
    pub bg_highlight: Color,

    pub text: Color,
    pub text_muted: Color,
    pub text_dim: Color,

    // Grading
    pub right: Color,
    pub wrong: Color,
}

/// Available theme names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Default,
    KanagawaWave,
}

impl ThemeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Default => "default",
            ThemeName::KanagawaWave => "kanagawa-wave",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ThemeName::Default => "Default",
            ThemeName::KanagawaWave => "Kanagawa Wave",
        }
    }

    /// Unknown names fall back to the default theme.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "kanagawa-wave" | "kanagawa_wave" | "kanagawa" => ThemeName::KanagawaWave,
            _ => ThemeName::Default,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ThemeName::Default => ThemeName::KanagawaWave,
            ThemeName::KanagawaWave => ThemeName::Default,
        }
    }
}

/// Theme struct that holds colors and provides style methods.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,
    pub colors: ThemeColors,
}

impl Theme {
    pub fn new(name: ThemeName) -> Self {
        let colors = match name {
            ThemeName::Default => Self::default_colors(),
            ThemeName::KanagawaWave => Self::kanagawa_wave_colors(),
        };
        Self { name, colors }
    }

    pub fn from_name(name: &str) -> Self {
        Self::new(ThemeName::parse(name))
    }

    fn default_colors() -> ThemeColors {
        ThemeColors {
            primary: Color::Rgb(20, 184, 166),     // Teal
            accent: Color::Rgb(245, 158, 11),      // Amber
            info: Color::Rgb(96, 165, 250),        // Sky

            bg_dark: Color::Rgb(17, 24, 39),       // Gray 900
            bg_highlight: Color::Rgb(55, 65, 81),  // Gray 700

            text: Color::Rgb(243, 244, 246),       // Gray 100
            text_muted: Color::Rgb(156, 163, 175), // Gray 400
            text_dim: Color::Rgb(107, 114, 128),   // Gray 500

            right: Color::Rgb(74, 222, 128),       // Green 400
            wrong: Color::Rgb(248, 113, 113),      // Red 400
        }
    }

    /// Kanagawa Wave, after kanagawa.nvim.
    fn kanagawa_wave_colors() -> ThemeColors {
        ThemeColors {
            primary: Color::Rgb(0x7E, 0x9C, 0xD8),      // crystalBlue
            accent: Color::Rgb(0xD2, 0x7E, 0x99),       // sakuraPink
            info: Color::Rgb(0x7F, 0xB4, 0xCA),         // springBlue

            bg_dark: Color::Rgb(0x16, 0x16, 0x1D),      // sumiInk0
            bg_highlight: Color::Rgb(0x36, 0x36, 0x46), // sumiInk3

            text: Color::Rgb(0xDC, 0xD7, 0xBA),         // fujiWhite
            text_muted: Color::Rgb(0xC8, 0xC0, 0x93),   // oldWhite
            text_dim: Color::Rgb(0x72, 0x71, 0x69),     // fujiGray

            right: Color::Rgb(0x98, 0xBB, 0x6C),        // springGreen
            wrong: Color::Rgb(0xE8, 0x24, 0x24),        // samuraiRed
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Styles
    // ══════════════════════════════════════════════════════════════════════

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.colors.text)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.colors.text_muted)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.colors.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.colors.bg_highlight)
            .fg(self.colors.text)
    }

    pub fn card_front(&self) -> Style {
        Style::default()
            .fg(self.colors.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn card_back(&self) -> Style {
        Style::default()
            .fg(self.colors.right)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.colors.wrong)
    }

    pub fn key_hint(&self) -> Style {
        Style::default().fg(self.colors.text_dim)
    }

    pub fn key_highlight(&self) -> Style {
        Style::default()
            .fg(self.colors.accent)
            .add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeName::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_names_round_trip() {
        for name in [ThemeName::Default, ThemeName::KanagawaWave] {
            assert_eq!(ThemeName::parse(name.as_str()), name);
            assert_eq!(name.next().next(), name);
        }
        assert_eq!(ThemeName::parse("solarized"), ThemeName::Default);
        assert_eq!(Theme::from_name("KANAGAWA").name, ThemeName::KanagawaWave);
    }
}
