//! Language detection and highlighter registry.
//!
//! Detects programming languages from file extensions and hands out the
//! matching highlighter.

use super::c_family::{CFamilyHighlighter, LanguageSyntax, C, CPP, JAVA, JAVASCRIPT, TYPESCRIPT};
use super::Highlighter;
use std::path::Path;

/// Supported programming languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    C,
    Cpp,
    JavaScript,
    TypeScript,
    Java,
    #[default]
    PlainText,
}

impl Language {
    /// Returns all available languages.
    pub fn all() -> &'static [Language] {
        &[
            Language::C,
            Language::Cpp,
            Language::JavaScript,
            Language::TypeScript,
            Language::Java,
            Language::PlainText,
        ]
    }

    /// Detects language from a file path based on extension.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::PlainText)
    }

    /// Detects language from a file extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "c" | "h" => Self::C,
            "cpp" | "cc" | "cxx" | "c++" | "hpp" | "hh" | "hxx" | "h++" => Self::Cpp,
            "js" | "jsx" | "mjs" | "cjs" => Self::JavaScript,
            "ts" | "tsx" | "mts" | "cts" => Self::TypeScript,
            "java" => Self::Java,
            _ => Self::PlainText,
        }
    }

    /// Looks a language up by display name or common alias, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "c" => Some(Self::C),
            "c++" | "cpp" | "cxx" => Some(Self::Cpp),
            "javascript" | "js" => Some(Self::JavaScript),
            "typescript" | "ts" => Some(Self::TypeScript),
            "java" => Some(Self::Java),
            "plain text" | "text" | "plain" | "none" => Some(Self::PlainText),
            _ => None,
        }
    }

    /// Returns the display name of the language.
    pub fn name(&self) -> &'static str {
        match self {
            Self::C => "C",
            Self::Cpp => "C++",
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Java => "Java",
            Self::PlainText => "Plain Text",
        }
    }

    /// Returns whether this language supports syntax highlighting.
    pub fn has_highlighting(&self) -> bool {
        self.syntax().is_some()
    }

    /// Returns the tokenizer table for this language, if any.
    pub fn syntax(&self) -> Option<&'static LanguageSyntax> {
        match self {
            Self::C => Some(&C),
            Self::Cpp => Some(&CPP),
            Self::JavaScript => Some(&JAVASCRIPT),
            Self::TypeScript => Some(&TYPESCRIPT),
            Self::Java => Some(&JAVA),
            Self::PlainText => None,
        }
    }

    /// Creates a fresh highlighter, or `None` for plain text.
    pub fn highlighter(&self) -> Option<Box<dyn Highlighter>> {
        self.syntax()
            .map(|syntax| Box::new(CFamilyHighlighter::new(syntax)) as Box<dyn Highlighter>)
    }
}
