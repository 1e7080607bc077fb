//! Theme system for syntax highlighting.
//!
//! Maps token kinds and editor chrome to terminal cell styles over the 16
//! ANSI colours.

use super::TokenKind;
use crate::mode::Mode;
use std::collections::HashMap;

/// A terminal colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The terminal's own foreground or background.
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

/// Style of a terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    pub underline: bool,
}

impl Style {
    /// A style with only a foreground colour.
    pub const fn fg(fg: Color) -> Self {
        Self {
            fg,
            bg: Color::Default,
            bold: false,
            underline: false,
        }
    }

    pub const fn new(fg: Color, bg: Color) -> Self {
        Self {
            fg,
            bg,
            bold: false,
            underline: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }
}

/// An editor colour scheme.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Theme name.
    pub name: String,
    /// Plain text.
    pub text: Style,
    /// Line number gutter.
    pub line_number: Style,
    /// `~` filler drawn past the end of the document.
    pub filler: Style,
    /// Status bar body.
    pub status_bar: Style,
    /// Message and command line.
    pub message: Style,
    /// Search matches.
    pub search_match: Style,
    /// The match under the cursor.
    pub search_current: Style,
    /// Styles for each token kind.
    tokens: HashMap<TokenKind, Style>,
    /// Colour of the mode indicator.
    modes: HashMap<Mode, Color>,
}

impl Theme {
    /// Creates a theme where everything uses the terminal defaults.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            text: Style::default(),
            line_number: Style::default(),
            filler: Style::default(),
            status_bar: Style::default(),
            message: Style::default(),
            search_match: Style::default(),
            search_current: Style::default(),
            tokens: HashMap::new(),
            modes: HashMap::new(),
        }
    }

    /// Sets the style for a token kind.
    pub fn set_token_style(&mut self, kind: TokenKind, style: Style) {
        self.tokens.insert(kind, style);
    }

    /// Gets the style for a token kind, falling back to plain text.
    pub fn token_style(&self, kind: TokenKind) -> Style {
        self.tokens.get(&kind).copied().unwrap_or(self.text)
    }

    pub fn set_mode_color(&mut self, mode: Mode, color: Color) {
        self.modes.insert(mode, color);
    }

    /// Style of the mode indicator at the left of the status bar.
    pub fn mode_style(&self, mode: Mode) -> Style {
        match self.modes.get(&mode) {
            Some(&fg) => Style::fg(fg).bold(),
            None => self.status_bar.bold(),
        }
    }

    /// Creates the default dark theme.
    pub fn dark() -> Self {
        let mut theme = Self::new("dark");

        theme.line_number = Style::fg(Color::Yellow);
        theme.filler = Style::fg(Color::Blue);
        theme.status_bar = Style::new(Color::Black, Color::White);
        theme.search_match = Style::new(Color::Black, Color::Yellow);
        theme.search_current = Style::new(Color::Black, Color::BrightYellow);

        theme.set_token_style(TokenKind::Keyword, Style::fg(Color::Blue));
        theme.set_token_style(TokenKind::Type, Style::fg(Color::Cyan));
        theme.set_token_style(TokenKind::String, Style::fg(Color::Green));
        theme.set_token_style(TokenKind::Number, Style::fg(Color::Magenta));
        theme.set_token_style(TokenKind::Comment, Style::fg(Color::BrightBlack));
        theme.set_token_style(TokenKind::Preprocessor, Style::fg(Color::Yellow));
        theme.set_token_style(TokenKind::Function, Style::fg(Color::BrightBlue));
        theme.set_token_style(TokenKind::Operator, Style::fg(Color::White));
        theme.set_token_style(TokenKind::Bracket, Style::fg(Color::BrightYellow));

        theme.set_mode_color(Mode::Normal, Color::Blue);
        theme.set_mode_color(Mode::Insert, Color::Green);
        theme.set_mode_color(Mode::Command, Color::Red);
        theme.set_mode_color(Mode::Visual, Color::Magenta);
        theme.set_mode_color(Mode::Search, Color::Cyan);

        theme
    }

    /// Creates a light theme.
    pub fn light() -> Self {
        let mut theme = Self::new("light");

        theme.line_number = Style::fg(Color::BrightBlack);
        theme.filler = Style::fg(Color::BrightBlue);
        theme.status_bar = Style::new(Color::White, Color::Black);
        theme.search_match = Style::new(Color::Black, Color::BrightYellow);
        theme.search_current = Style::new(Color::White, Color::Red);

        theme.set_token_style(TokenKind::Keyword, Style::fg(Color::Magenta));
        theme.set_token_style(TokenKind::Type, Style::fg(Color::Blue));
        theme.set_token_style(TokenKind::String, Style::fg(Color::Green));
        theme.set_token_style(TokenKind::Number, Style::fg(Color::Red));
        theme.set_token_style(TokenKind::Comment, Style::fg(Color::BrightBlack));
        theme.set_token_style(TokenKind::Preprocessor, Style::fg(Color::Yellow));
        theme.set_token_style(TokenKind::Function, Style::fg(Color::Blue).bold());
        theme.set_token_style(TokenKind::Operator, Style::fg(Color::Black));
        theme.set_token_style(TokenKind::Bracket, Style::fg(Color::BrightBlack));

        theme.set_mode_color(Mode::Normal, Color::BrightBlue);
        theme.set_mode_color(Mode::Insert, Color::BrightGreen);
        theme.set_mode_color(Mode::Command, Color::BrightRed);
        theme.set_mode_color(Mode::Visual, Color::BrightMagenta);
        theme.set_mode_color(Mode::Search, Color::BrightCyan);

        theme
    }

    /// Looks up a built-in theme by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" | "default" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme() {
        let theme = Theme::dark();
        assert_eq!(theme.name, "dark");
        assert_eq!(theme.token_style(TokenKind::Keyword).fg, Color::Blue);
        assert_eq!(theme.token_style(TokenKind::Comment).fg, Color::BrightBlack);
        assert_ne!(
            theme.token_style(TokenKind::Keyword),
            theme.token_style(TokenKind::Default)
        );
    }

    #[test]
    fn test_mode_styles() {
        let theme = Theme::dark();
        let insert = theme.mode_style(Mode::Insert);
        assert_eq!(insert.fg, Color::Green);
        assert!(insert.bold);
        assert_ne!(theme.mode_style(Mode::Normal), insert);
    }

    #[test]
    fn test_fallback_style() {
        let theme = Theme::new("test");
        assert_eq!(theme.token_style(TokenKind::Keyword), theme.text);
        assert_eq!(theme.mode_style(Mode::Normal), theme.status_bar.bold());
    }

    #[test]
    fn test_by_name() {
        assert_eq!(Theme::by_name("Light").map(|t| t.name), Some("light".to_string()));
        assert_eq!(Theme::by_name("default").map(|t| t.name), Some("dark".to_string()));
        assert!(Theme::by_name("solarized").is_none());
    }
}
