//! Editor modes.

/// The modal state of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Command,
    Visual,
    Search,
}

impl Mode {
    /// Label shown in the status bar.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Command => "COMMAND",
            Self::Visual => "VISUAL",
            Self::Search => "SEARCH",
        }
    }

    /// Prompt character of modes that read a line of input.
    pub fn prompt(&self) -> Option<char> {
        match self {
            Self::Command => Some(':'),
            Self::Search => Some('/'),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_and_prompts() {
        assert_eq!(Mode::default(), Mode::Normal);
        assert_eq!(Mode::Insert.name(), "INSERT");
        assert_eq!(Mode::Command.prompt(), Some(':'));
        assert_eq!(Mode::Search.prompt(), Some('/'));
        assert_eq!(Mode::Visual.prompt(), None);
    }
}
