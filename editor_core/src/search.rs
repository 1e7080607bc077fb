//! Search and replace functionality.
//!
//! Searches run over a borrowed snapshot of lines. Columns and lengths in
//! results are character counts, matching the rest of the editor.

use crate::cursor::{byte_to_char, char_len, char_slice, char_to_byte, Position, Range};
use regex::{Regex, RegexBuilder};

/// Maximum number of patterns kept in the search history.
pub const MAX_HISTORY: usize = 100;

/// Direction used by [`Search::find`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

/// Search options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub use_regex: bool,
    pub wrap_around: bool,
    pub direction: SearchDirection,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            whole_word: false,
            use_regex: false,
            wrap_around: true,
            direction: SearchDirection::Forward,
        }
    }
}

/// A search match in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// Start of the match.
    pub position: Position,
    /// Length of the match in characters.
    pub length: usize,
    /// The matched text.
    pub text: String,
}

impl SearchMatch {
    /// Column just past the end of the match.
    pub fn end_column(&self) -> usize {
        self.position.column + self.length
    }

    /// The matched span as a range.
    pub fn range(&self) -> Range {
        Range::new(
            self.position,
            Position::new(self.position.line, self.end_column()),
        )
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Search and replace engine.
#[derive(Debug, Clone, Default)]
pub struct Search {
    /// The current pattern.
    pattern: String,
    /// Pattern characters, used by literal matching.
    pattern_chars: Vec<char>,
    options: SearchOptions,
    /// Compiled pattern in regex mode.
    regex: Option<Regex>,
    /// Diagnostic of the last failed regex compile.
    error: Option<String>,
    /// Most recently used patterns, newest first.
    history: Vec<String>,
}

impl Search {
    /// Creates a new search with no pattern.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Pattern ====================

    /// Sets the pattern and options.
    ///
    /// An invalid regex leaves the search in an invalid state: every find
    /// reports no match and [`Search::error`] holds the diagnostic.
    pub fn set_pattern(&mut self, pattern: &str, options: SearchOptions) {
        self.pattern = pattern.to_string();
        self.pattern_chars = pattern.chars().collect();
        self.options = options;
        self.regex = None;
        self.error = None;

        if options.use_regex && !pattern.is_empty() {
            let source = if options.whole_word {
                format!(r"\b(?:{})\b", pattern)
            } else {
                pattern.to_string()
            };
            match RegexBuilder::new(&source)
                .case_insensitive(!options.case_sensitive)
                .build()
            {
                Ok(regex) => self.regex = Some(regex),
                Err(err) => {
                    log::debug!("invalid search pattern {:?}: {}", pattern, err);
                    self.error = Some(err.to_string());
                }
            }
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Returns false if the last regex failed to compile.
    pub fn is_pattern_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Returns the diagnostic of an invalid pattern.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns true if there is a valid, non-empty pattern to search for.
    pub fn is_active(&self) -> bool {
        !self.pattern.is_empty() && self.is_pattern_valid()
    }

    /// Clears the pattern; history is kept.
    pub fn clear(&mut self) {
        self.set_pattern("", self.options);
    }

    // ==================== Search Operations ====================

    /// Finds the next match in the configured direction.
    pub fn find<S: AsRef<str>>(&self, lines: &[S], from: Position) -> Option<SearchMatch> {
        match self.options.direction {
            SearchDirection::Forward => self.find_next(lines, from),
            SearchDirection::Backward => self.find_previous(lines, from),
        }
    }

    /// Finds the first match strictly after `from`.
    ///
    /// With wrap-around enabled, continues from the top of the document up
    /// to and including `from`.
    pub fn find_next<S: AsRef<str>>(&self, lines: &[S], from: Position) -> Option<SearchMatch> {
        if !self.is_active() || lines.is_empty() {
            return None;
        }
        let start_line = from.line.min(lines.len() - 1);
        let start_col = from.column + 1;

        for (index, line) in lines.iter().enumerate().skip(start_line) {
            let line = line.as_ref();
            let min_col = if index == start_line { start_col } else { 0 };
            if let Some((col, len)) = self.first_match_from(line, min_col) {
                return Some(Self::make_match(line, index, col, len));
            }
        }

        if self.options.wrap_around {
            for (index, line) in lines.iter().enumerate().take(start_line + 1) {
                let line = line.as_ref();
                if let Some((col, len)) = self.first_match_from(line, 0) {
                    if index < start_line || col < start_col {
                        return Some(Self::make_match(line, index, col, len));
                    }
                }
            }
        }

        None
    }

    /// Finds the last match starting strictly before `from`.
    ///
    /// With wrap-around enabled, continues from the bottom of the document
    /// back down to and including `from`.
    pub fn find_previous<S: AsRef<str>>(
        &self,
        lines: &[S],
        from: Position,
    ) -> Option<SearchMatch> {
        if !self.is_active() || lines.is_empty() {
            return None;
        }
        let start_line = from.line.min(lines.len() - 1);

        for index in (0..=start_line).rev() {
            let line = lines[index].as_ref();
            let max_col = if index == start_line {
                match from.column.checked_sub(1) {
                    Some(col) => col,
                    None => continue,
                }
            } else {
                usize::MAX
            };
            if let Some((col, len)) = self.last_match_until(line, max_col) {
                return Some(Self::make_match(line, index, col, len));
            }
        }

        if self.options.wrap_around {
            for index in (start_line..lines.len()).rev() {
                let line = lines[index].as_ref();
                if let Some((col, len)) = self.last_match_until(line, usize::MAX) {
                    if index > start_line || col >= from.column {
                        return Some(Self::make_match(line, index, col, len));
                    }
                }
            }
        }

        None
    }

    /// Finds every non-overlapping match in document order.
    pub fn find_all<S: AsRef<str>>(&self, lines: &[S]) -> Vec<SearchMatch> {
        if !self.is_active() {
            return Vec::new();
        }
        lines
            .iter()
            .enumerate()
            .flat_map(|(index, line)| self.find_in_line(line.as_ref(), index))
            .collect()
    }

    /// Finds every non-overlapping match in a single line.
    pub fn find_in_line(&self, line: &str, index: usize) -> Vec<SearchMatch> {
        if !self.is_active() {
            return Vec::new();
        }
        let mut matches = Vec::new();
        let mut col = 0;
        while let Some((start, len)) = self.first_match_from(line, col) {
            matches.push(Self::make_match(line, index, start, len));
            col = start + len;
        }
        matches
    }

    /// Returns the number of matches in the document.
    pub fn count_matches<S: AsRef<str>>(&self, lines: &[S]) -> usize {
        self.find_all(lines).len()
    }

    // ==================== Replace Operations ====================

    /// Replaces the span of `found` with `replacement`.
    ///
    /// Returns the removed text. A match that no longer fits its line
    /// changes nothing and returns an empty string.
    pub fn replace(
        &self,
        lines: &mut [String],
        found: &SearchMatch,
        replacement: &str,
    ) -> String {
        let Some(line) = lines.get_mut(found.position.line) else {
            return String::new();
        };
        if found.end_column() > char_len(line) {
            return String::new();
        }
        let from = char_to_byte(line, found.position.column);
        let to = char_to_byte(line, found.end_column());
        let removed = line[from..to].to_string();
        line.replace_range(from..to, replacement);
        removed
    }

    /// Replaces every match, returning how many were replaced.
    ///
    /// Matches are collected first and applied from last to first so
    /// earlier positions stay valid.
    pub fn replace_all(&self, lines: &mut [String], replacement: &str) -> usize {
        let matches = self.find_all(lines);
        for found in matches.iter().rev() {
            self.replace(lines, found, replacement);
        }
        matches.len()
    }

    // ==================== History ====================

    /// Adds a pattern to the front of the history.
    pub fn add_to_history(&mut self, pattern: &str) {
        if pattern.is_empty() {
            return;
        }
        self.history.retain(|p| p != pattern);
        self.history.insert(0, pattern.to_string());
        self.history.truncate(MAX_HISTORY);
    }

    /// Returns the history, newest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn history_item(&self, index: usize) -> Option<&str> {
        self.history.get(index).map(String::as_str)
    }

    // ==================== Matching ====================

    fn make_match(line: &str, index: usize, col: usize, len: usize) -> SearchMatch {
        SearchMatch {
            position: Position::new(index, col),
            length: len,
            text: char_slice(line, col, col + len).to_string(),
        }
    }

    /// Leftmost non-empty match starting at or after `min_col`, as
    /// `(column, length)`.
    fn first_match_from(&self, line: &str, min_col: usize) -> Option<(usize, usize)> {
        match &self.regex {
            Some(regex) => {
                if min_col > char_len(line) {
                    return None;
                }
                let mut byte = char_to_byte(line, min_col);
                while byte <= line.len() {
                    let m = regex.find_at(line, byte)?;
                    if m.start() < m.end() {
                        return Some((byte_to_char(line, m.start()), char_len(m.as_str())));
                    }
                    // Skip empty matches by one character.
                    byte = match line[m.start()..].chars().next() {
                        Some(c) => m.start() + c.len_utf8(),
                        None => return None,
                    };
                }
                None
            }
            None => {
                let chars: Vec<char> = line.chars().collect();
                let len = self.pattern_chars.len();
                if len == 0 || len > chars.len() {
                    return None;
                }
                (min_col..=chars.len() - len)
                    .find(|&col| self.literal_matches_at(&chars, col))
                    .map(|col| (col, len))
            }
        }
    }

    /// Rightmost non-empty match starting at or before `max_col`.
    fn last_match_until(&self, line: &str, max_col: usize) -> Option<(usize, usize)> {
        match &self.regex {
            Some(_) => {
                // Every start `first_match_from` can reach, so backward
                // search visits the same matches as forward search.
                let mut found = None;
                let mut col = 0;
                while let Some((start, len)) = self.first_match_from(line, col) {
                    if start > max_col {
                        break;
                    }
                    found = Some((start, len));
                    col = start + 1;
                }
                found
            }
            None => {
                let chars: Vec<char> = line.chars().collect();
                let len = self.pattern_chars.len();
                if len == 0 || len > chars.len() {
                    return None;
                }
                let last = (chars.len() - len).min(max_col);
                (0..=last)
                    .rev()
                    .find(|&col| self.literal_matches_at(&chars, col))
                    .map(|col| (col, len))
            }
        }
    }

    fn literal_matches_at(&self, chars: &[char], col: usize) -> bool {
        let candidate = &chars[col..col + self.pattern_chars.len()];
        let equal = if self.options.case_sensitive {
            candidate == self.pattern_chars.as_slice()
        } else {
            candidate
                .iter()
                .zip(&self.pattern_chars)
                .all(|(a, b)| a == b || a.to_lowercase().eq(b.to_lowercase()))
        };
        if !equal || !self.options.whole_word {
            return equal;
        }
        let end = col + self.pattern_chars.len();
        let before_ok = col == 0 || !is_word_char(chars[col - 1]);
        let after_ok = end >= chars.len() || !is_word_char(chars[end]);
        before_ok && after_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(pattern: &str) -> Search {
        let mut search = Search::new();
        search.set_pattern(pattern, SearchOptions::default());
        search
    }

    fn with_options(pattern: &str, options: SearchOptions) -> Search {
        let mut search = Search::new();
        search.set_pattern(pattern, options);
        search
    }

    #[test]
    fn test_find_next_basic() {
        let lines = ["hello world hello", "say hello"];
        let search = literal("hello");

        let m = search.find_next(&lines, Position::new(0, 0)).unwrap();
        assert_eq!(m.position, Position::new(0, 12));
        assert_eq!(m.length, 5);
        assert_eq!(m.text, "hello");

        let m = search.find_next(&lines, m.position).unwrap();
        assert_eq!(m.position, Position::new(1, 4));
    }

    #[test]
    fn test_find_next_wraps() {
        let lines = ["foo", "bar"];
        let search = literal("foo");
        let m = search.find_next(&lines, Position::new(0, 2)).unwrap();
        assert_eq!(m.position, Position::new(0, 0));
    }

    #[test]
    fn test_find_next_finds_match_at_from_when_wrapping() {
        let lines = ["foo", "bar"];
        let search = literal("foo");
        let m = search.find_next(&lines, Position::new(0, 0)).unwrap();
        assert_eq!(m.position, Position::new(0, 0));
    }

    #[test]
    fn test_find_next_without_wrap() {
        let lines = ["foo", "bar"];
        let options = SearchOptions {
            wrap_around: false,
            ..SearchOptions::default()
        };
        let search = with_options("foo", options);
        assert!(search.find_next(&lines, Position::new(0, 2)).is_none());
        assert!(search.find_next(&lines, Position::new(1, 0)).is_none());
    }

    #[test]
    fn test_find_next_overlapping_start() {
        let search = literal("aa");
        let m = search.find_next(&["aaa"], Position::new(0, 0)).unwrap();
        assert_eq!(m.position, Position::new(0, 1));
    }

    #[test]
    fn test_find_previous() {
        let lines = ["a b a", "c a"];
        let search = literal("a");

        let m = search.find_previous(&lines, Position::new(1, 2)).unwrap();
        assert_eq!(m.position, Position::new(0, 4));
        let m = search.find_previous(&lines, m.position).unwrap();
        assert_eq!(m.position, Position::new(0, 0));
        // Wraps to the bottom.
        let m = search.find_previous(&lines, m.position).unwrap();
        assert_eq!(m.position, Position::new(1, 2));
    }

    #[test]
    fn test_find_previous_without_wrap() {
        let options = SearchOptions {
            wrap_around: false,
            ..SearchOptions::default()
        };
        let search = with_options("x", options);
        assert!(search.find_previous(&["ax"], Position::new(0, 0)).is_none());
    }

    #[test]
    fn test_find_dispatches_on_direction() {
        let lines = ["x.x.x"];
        let options = SearchOptions {
            direction: SearchDirection::Backward,
            ..SearchOptions::default()
        };
        let search = with_options("x", options);
        let m = search.find(&lines, Position::new(0, 2)).unwrap();
        assert_eq!(m.position, Position::new(0, 0));
    }

    #[test]
    fn test_case_insensitive_by_default() {
        let lines = ["Hello HELLO hello"];
        assert_eq!(literal("hello").count_matches(&lines), 3);

        let options = SearchOptions {
            case_sensitive: true,
            ..SearchOptions::default()
        };
        assert_eq!(with_options("hello", options).count_matches(&lines), 1);
    }

    #[test]
    fn test_whole_word() {
        let options = SearchOptions {
            whole_word: true,
            ..SearchOptions::default()
        };
        let lines = ["cat concat cat_x cat."];
        let matches = with_options("cat", options).find_all(&lines);
        let cols: Vec<usize> = matches.iter().map(|m| m.position.column).collect();
        assert_eq!(cols, vec![0, 17]);

        let regex_options = SearchOptions {
            use_regex: true,
            ..options
        };
        assert_eq!(with_options("ca.", regex_options).count_matches(&lines), 2);
    }

    #[test]
    fn test_regex_search() {
        let options = SearchOptions {
            use_regex: true,
            ..SearchOptions::default()
        };
        let search = with_options(r"\d+", options);
        let lines = ["abc 12 de 345", "none", "7"];
        let all = search.find_all(&lines);
        let found: Vec<(usize, usize, &str)> = all
            .iter()
            .map(|m| (m.position.line, m.position.column, m.text.as_str()))
            .collect();
        assert_eq!(found, vec![(0, 4, "12"), (0, 10, "345"), (2, 0, "7")]);

        let m = search.find_next(&lines, Position::new(0, 5)).unwrap();
        assert_eq!(m.position, Position::new(0, 10));
        let m = search.find_previous(&lines, Position::new(0, 11)).unwrap();
        assert_eq!(m.position, Position::new(0, 10));
        assert_eq!(m.text, "345");
        // The last digit run start on line 0 is the trailing "5".
        let m = search.find_previous(&lines, Position::new(2, 0)).unwrap();
        assert_eq!(m.position, Position::new(0, 12));
        assert_eq!(m.text, "5");
    }

    #[test]
    fn test_regex_find_previous_overlapping() {
        let options = SearchOptions {
            use_regex: true,
            ..SearchOptions::default()
        };
        let search = with_options("aa", options);
        let lines = ["aaaa"];

        let m = search.find_previous(&lines, Position::new(0, 2)).unwrap();
        assert_eq!(m.position, Position::new(0, 1));
        let plain = literal("aa").find_previous(&lines, Position::new(0, 2)).unwrap();
        assert_eq!(m.position, plain.position);

        let next = search.find_next(&lines, Position::new(0, 0)).unwrap();
        assert_eq!(next.position, Position::new(0, 1));
        let back = search.find_previous(&lines, Position::new(0, 2)).unwrap();
        assert_eq!(back.position, next.position);
    }

    #[test]
    fn test_regex_case_insensitive() {
        let options = SearchOptions {
            use_regex: true,
            ..SearchOptions::default()
        };
        assert_eq!(with_options("h.llo", options).count_matches(&["HELLO"]), 1);
    }

    #[test]
    fn test_regex_empty_matches_do_not_loop() {
        let options = SearchOptions {
            use_regex: true,
            ..SearchOptions::default()
        };
        let search = with_options("x*", options);
        let all = search.find_all(&["abxxc", ""]);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].position, Position::new(0, 2));
        assert_eq!(all[0].length, 2);
    }

    #[test]
    fn test_invalid_regex() {
        let options = SearchOptions {
            use_regex: true,
            ..SearchOptions::default()
        };
        let search = with_options("(unclosed", options);
        assert!(!search.is_pattern_valid());
        assert!(search.error().is_some());
        assert!(search.find_next(&["(unclosed"], Position::new(0, 0)).is_none());
        assert!(search.find_all(&["(unclosed"]).is_empty());
    }

    #[test]
    fn test_empty_pattern_finds_nothing() {
        let search = literal("");
        assert!(!search.is_active());
        assert!(search.find_next(&["abc"], Position::new(0, 0)).is_none());
        assert!(search.find_all(&["abc"]).is_empty());
    }

    #[test]
    fn test_multibyte_columns() {
        let search = literal("ö");
        let m = search.find_next(&["aöböc"], Position::new(0, 1)).unwrap();
        assert_eq!(m.position, Position::new(0, 3));
        assert_eq!(m.length, 1);
    }

    #[test]
    fn test_replace() {
        let search = literal("world");
        let mut lines = vec!["hello world".to_string()];
        let m = search.find_next(&lines, Position::new(0, 0)).unwrap();
        let removed = search.replace(&mut lines, &m, "there");
        assert_eq!(removed, "world");
        assert_eq!(lines, vec!["hello there"]);

        let stale = SearchMatch {
            position: Position::new(3, 0),
            length: 1,
            text: "x".to_string(),
        };
        assert_eq!(search.replace(&mut lines, &stale, "y"), "");
    }

    #[test]
    fn test_replace_all() {
        let search = literal("X");
        let mut lines = vec!["aXbXc".to_string()];
        assert_eq!(search.replace_all(&mut lines, "-"), 2);
        assert_eq!(lines, vec!["a-b-c"]);
    }

    #[test]
    fn test_replace_all_with_longer_text() {
        let search = literal("ab");
        let mut lines = vec!["ab ab".to_string(), "xab".to_string()];
        assert_eq!(search.replace_all(&mut lines, "abab"), 3);
        assert_eq!(lines, vec!["abab abab", "xabab"]);
    }

    #[test]
    fn test_history() {
        let mut search = Search::new();
        search.add_to_history("one");
        search.add_to_history("two");
        search.add_to_history("one");
        assert_eq!(search.history(), &["one".to_string(), "two".to_string()]);
        assert_eq!(search.history_item(1), Some("two"));
        assert_eq!(search.history_item(5), None);

        for i in 0..150 {
            search.add_to_history(&i.to_string());
        }
        assert_eq!(search.history().len(), MAX_HISTORY);
        assert_eq!(search.history_item(0), Some("149"));
    }
}
