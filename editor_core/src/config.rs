//! Editor configuration.

use crate::syntax::Theme;

/// User-facing editor settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub show_line_numbers: bool,
    pub show_status_bar: bool,
    pub syntax_highlighting: bool,
    /// Width of a tab stop in columns.
    pub tab_size: usize,
    /// Insert spaces instead of a tab character.
    pub expand_tabs: bool,
    /// Name of the colour theme.
    pub theme: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            show_line_numbers: true,
            show_status_bar: true,
            syntax_highlighting: true,
            tab_size: 4,
            expand_tabs: true,
            theme: "dark".to_string(),
        }
    }
}

impl EditorConfig {
    /// Text inserted for the Tab key.
    pub fn indent_unit(&self) -> String {
        if self.expand_tabs {
            " ".repeat(self.tab_size.max(1))
        } else {
            "\t".to_string()
        }
    }

    /// Resolves the configured theme, falling back to the dark theme.
    pub fn resolve_theme(&self) -> Theme {
        Theme::by_name(&self.theme).unwrap_or_else(|| {
            log::warn!("Unknown theme {:?}, using dark", self.theme);
            Theme::dark()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert!(config.show_line_numbers);
        assert!(config.show_status_bar);
        assert!(config.syntax_highlighting);
        assert_eq!(config.tab_size, 4);
        assert!(config.expand_tabs);
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn test_indent_unit() {
        let mut config = EditorConfig::default();
        assert_eq!(config.indent_unit(), "    ");
        config.expand_tabs = false;
        assert_eq!(config.indent_unit(), "\t");
    }

    #[test]
    fn test_resolve_theme() {
        let mut config = EditorConfig::default();
        config.theme = "light".to_string();
        assert_eq!(config.resolve_theme().name, "light");
        config.theme = "missing".to_string();
        assert_eq!(config.resolve_theme().name, "dark");
    }
}
