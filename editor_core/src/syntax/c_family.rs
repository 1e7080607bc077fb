//! Tokenizer for C-family languages.
//!
//! One scanner serves C, C++, Java, JavaScript and TypeScript. The
//! per-language differences (word lists, preprocessor lines, raw strings,
//! quote characters) live in a static [`LanguageSyntax`] table.

use super::{Highlighter, LineState, Token, TokenKind};

/// Static description of a C-family language.
#[derive(Debug)]
pub struct LanguageSyntax {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub types: &'static [&'static str],
    /// Lines starting with `#` are preprocessor directives.
    pub preprocessor: bool,
    /// `R"delim( ... )delim"` raw string literals.
    pub raw_strings: bool,
    /// Characters that open and close a string literal.
    pub quotes: &'static [char],
}

impl LanguageSyntax {
    fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(&word)
    }

    fn is_type(&self, word: &str) -> bool {
        self.types.contains(&word)
    }
}

/// Words shared by the C and C++ tables.
const C_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "break",
    "case", "catch", "class", "compl", "concept", "const", "consteval", "constexpr",
    "constinit", "const_cast", "continue", "co_await", "co_return", "co_yield",
    "decltype", "default", "delete", "do", "dynamic_cast", "else", "enum", "explicit",
    "export", "extern", "false", "for", "friend", "goto", "if", "inline", "mutable",
    "namespace", "new", "noexcept", "not", "not_eq", "nullptr", "operator", "or",
    "or_eq", "private", "protected", "public", "register", "reinterpret_cast",
    "requires", "return", "sizeof", "static", "static_assert", "static_cast", "struct",
    "switch", "template", "this", "thread_local", "throw", "true", "try", "typedef",
    "typeid", "typename", "union", "using", "virtual", "volatile", "while", "xor",
    "xor_eq", "override", "final",
];

const C_TYPES: &[&str] = &[
    "void", "bool", "char", "wchar_t", "char8_t", "char16_t", "char32_t", "short", "int",
    "long", "signed", "unsigned", "float", "double", "size_t", "int8_t", "int16_t",
    "int32_t", "int64_t", "uint8_t", "uint16_t", "uint32_t", "uint64_t", "ptrdiff_t",
    "intptr_t", "uintptr_t", "string", "vector", "map", "unordered_map", "set",
    "unordered_set", "array", "list", "deque", "queue", "stack", "pair", "tuple",
    "unique_ptr", "shared_ptr", "weak_ptr", "optional", "variant", "string_view", "span",
    "any", "function",
];

pub static C: LanguageSyntax = LanguageSyntax {
    name: "C",
    extensions: &["c", "h"],
    keywords: C_KEYWORDS,
    types: C_TYPES,
    preprocessor: true,
    raw_strings: false,
    quotes: &['"', '\''],
};

pub static CPP: LanguageSyntax = LanguageSyntax {
    name: "C++",
    extensions: &["cpp", "cc", "cxx", "c++", "hpp", "hh", "hxx", "h++"],
    keywords: C_KEYWORDS,
    types: C_TYPES,
    preprocessor: true,
    raw_strings: true,
    quotes: &['"', '\''],
};

pub static JAVASCRIPT: LanguageSyntax = LanguageSyntax {
    name: "JavaScript",
    extensions: &["js", "jsx", "mjs", "cjs"],
    keywords: &[
        "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
        "default", "delete", "do", "else", "export", "extends", "false", "finally", "for",
        "from", "function", "if", "import", "in", "instanceof", "let", "new", "null", "of",
        "return", "static", "super", "switch", "this", "throw", "true", "try", "typeof",
        "undefined", "var", "void", "while", "with", "yield",
    ],
    types: &[
        "Array", "Boolean", "Date", "Error", "Map", "Number", "Object", "Promise", "RegExp",
        "Set", "String", "Symbol", "WeakMap", "WeakSet",
    ],
    preprocessor: false,
    raw_strings: false,
    quotes: &['"', '\'', '`'],
};

pub static TYPESCRIPT: LanguageSyntax = LanguageSyntax {
    name: "TypeScript",
    extensions: &["ts", "tsx", "mts", "cts"],
    keywords: &[
        "abstract", "as", "async", "await", "break", "case", "catch", "class", "const",
        "continue", "declare", "default", "delete", "do", "else", "enum", "export", "extends",
        "false", "finally", "for", "from", "function", "if", "implements", "import", "in",
        "instanceof", "interface", "keyof", "let", "namespace", "new", "null", "of",
        "private", "protected", "public", "readonly", "return", "static", "super", "switch",
        "this", "throw", "true", "try", "type", "typeof", "undefined", "var", "while",
        "yield",
    ],
    types: &[
        "any", "bigint", "boolean", "never", "number", "object", "string", "symbol",
        "unknown", "void", "Array", "Map", "Promise", "Record", "Set",
    ],
    preprocessor: false,
    raw_strings: false,
    quotes: &['"', '\'', '`'],
};

pub static JAVA: LanguageSyntax = LanguageSyntax {
    name: "Java",
    extensions: &["java"],
    keywords: &[
        "abstract", "assert", "break", "case", "catch", "class", "continue", "default", "do",
        "else", "enum", "extends", "false", "final", "finally", "for", "if", "implements",
        "import", "instanceof", "interface", "native", "new", "null", "package", "private",
        "protected", "public", "record", "return", "static", "strictfp", "super", "switch",
        "synchronized", "this", "throw", "throws", "transient", "true", "try", "var",
        "volatile", "while", "yield",
    ],
    types: &[
        "boolean", "byte", "char", "double", "float", "int", "long", "short", "void",
        "Boolean", "Character", "Double", "Integer", "List", "Long", "Map", "Object",
        "Optional", "Set", "String",
    ],
    preprocessor: false,
    raw_strings: false,
    quotes: &['"', '\''],
};

fn is_word_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Index of the first occurrence of `pattern` in `chars` at or after `from`.
fn find_seq(chars: &[char], from: usize, pattern: &[char]) -> Option<usize> {
    if pattern.len() > chars.len() {
        return None;
    }
    (from..=chars.len() - pattern.len()).find(|&i| chars[i..].starts_with(pattern))
}

/// Highlighter for a C-family language.
#[derive(Debug)]
pub struct CFamilyHighlighter {
    syntax: &'static LanguageSyntax,
    state: LineState,
}

impl CFamilyHighlighter {
    pub fn new(syntax: &'static LanguageSyntax) -> Self {
        Self {
            syntax,
            state: LineState::Normal,
        }
    }

    pub fn syntax(&self) -> &'static LanguageSyntax {
        self.syntax
    }

    /// Returns the state carried into the next line.
    pub fn state(&self) -> &LineState {
        &self.state
    }

    /// Scans one line, reporting tokens through `emit`.
    fn scan(&mut self, chars: &[char], emit: &mut dyn FnMut(Token)) {
        let len = chars.len();
        let mut pos = 0;

        // Constructs continued from the previous line.
        match std::mem::take(&mut self.state) {
            LineState::Normal => {}
            LineState::BlockComment => {
                let close = ['*', '/'];
                match find_seq(chars, 0, &close) {
                    Some(end) => {
                        emit(Token::new(0, end + 2, TokenKind::Comment));
                        pos = end + 2;
                    }
                    None => {
                        if len > 0 {
                            emit(Token::new(0, len, TokenKind::Comment));
                        }
                        self.state = LineState::BlockComment;
                        return;
                    }
                }
            }
            LineState::RawString { delimiter } => {
                let close: Vec<char> = delimiter.chars().collect();
                match find_seq(chars, 0, &close) {
                    Some(end) => {
                        emit(Token::new(0, end + close.len(), TokenKind::String));
                        pos = end + close.len();
                    }
                    None => {
                        if len > 0 {
                            emit(Token::new(0, len, TokenKind::String));
                        }
                        self.state = LineState::RawString { delimiter };
                        return;
                    }
                }
            }
        }

        while pos < len {
            let c = chars[pos];
            let next = chars.get(pos + 1).copied();

            if c.is_whitespace() {
                pos += 1;
            } else if c == '#' && self.syntax.preprocessor {
                pos = self.scan_preprocessor(chars, pos, emit);
            } else if c == '/' && next == Some('/') {
                emit(Token::new(pos, len - pos, TokenKind::Comment));
                pos = len;
            } else if c == '/' && next == Some('*') {
                pos = self.scan_block_comment(chars, pos, emit);
            } else if self.syntax.quotes.contains(&c) {
                pos = Self::scan_string(chars, pos, emit);
            } else if c == 'R' && next == Some('"') && self.syntax.raw_strings {
                pos = self.scan_raw_string(chars, pos, emit);
            } else if c.is_ascii_digit()
                || (c == '.' && next.is_some_and(|n| n.is_ascii_digit()))
            {
                pos = Self::scan_number(chars, pos, emit);
            } else if is_word_start(c) {
                pos = self.scan_word(chars, pos, emit);
            } else if matches!(c, '(' | ')' | '[' | ']' | '{' | '}') {
                emit(Token::new(pos, 1, TokenKind::Bracket));
                pos += 1;
            } else {
                pos += 1;
            }
        }
    }

    fn scan_preprocessor(&self, chars: &[char], start: usize, emit: &mut dyn FnMut(Token)) -> usize {
        let mut pos = start + 1;
        while pos < chars.len() && chars[pos].is_whitespace() {
            pos += 1;
        }
        while pos < chars.len() && is_word_char(chars[pos]) {
            pos += 1;
        }
        emit(Token::new(start, pos - start, TokenKind::Preprocessor));
        pos
    }

    fn scan_block_comment(
        &mut self,
        chars: &[char],
        start: usize,
        emit: &mut dyn FnMut(Token),
    ) -> usize {
        match find_seq(chars, start + 2, &['*', '/']) {
            Some(end) => {
                emit(Token::new(start, end + 2 - start, TokenKind::Comment));
                end + 2
            }
            None => {
                self.state = LineState::BlockComment;
                emit(Token::new(start, chars.len() - start, TokenKind::Comment));
                chars.len()
            }
        }
    }

    fn scan_string(chars: &[char], start: usize, emit: &mut dyn FnMut(Token)) -> usize {
        let quote = chars[start];
        let mut pos = start + 1;
        while pos < chars.len() {
            if chars[pos] == '\\' && pos + 1 < chars.len() {
                pos += 2;
            } else if chars[pos] == quote {
                pos += 1;
                break;
            } else {
                pos += 1;
            }
        }
        emit(Token::new(start, pos - start, TokenKind::String));
        pos
    }

    fn scan_raw_string(
        &mut self,
        chars: &[char],
        start: usize,
        emit: &mut dyn FnMut(Token),
    ) -> usize {
        let len = chars.len();
        let open = start + 2;
        let Some(paren) = chars[open..].iter().position(|&c| c == '(').map(|i| open + i) else {
            // Malformed: no opening parenthesis.
            emit(Token::new(start, len - start, TokenKind::String));
            return len;
        };

        let mut close = vec![')'];
        close.extend_from_slice(&chars[open..paren]);
        close.push('"');

        match find_seq(chars, paren + 1, &close) {
            Some(end) => {
                let stop = end + close.len();
                emit(Token::new(start, stop - start, TokenKind::String));
                stop
            }
            None => {
                self.state = LineState::RawString {
                    delimiter: close.into_iter().collect(),
                };
                emit(Token::new(start, len - start, TokenKind::String));
                len
            }
        }
    }

    fn scan_number(chars: &[char], start: usize, emit: &mut dyn FnMut(Token)) -> usize {
        let len = chars.len();
        let mut pos = start;
        let digits_while = |mut pos: usize, pred: fn(&char) -> bool| {
            while pos < len && pred(&chars[pos]) {
                pos += 1;
            }
            pos
        };

        if chars[pos] == '0' && pos + 1 < len {
            match chars[pos + 1] {
                'x' | 'X' => {
                    pos = digits_while(pos + 2, char::is_ascii_hexdigit);
                    pos = digits_while(pos, |c| matches!(c, 'u' | 'U' | 'l' | 'L'));
                    emit(Token::new(start, pos - start, TokenKind::Number));
                    return pos;
                }
                'b' | 'B' => {
                    pos = digits_while(pos + 2, |c| matches!(c, '0' | '1'));
                    pos = digits_while(pos, |c| matches!(c, 'u' | 'U' | 'l' | 'L'));
                    emit(Token::new(start, pos - start, TokenKind::Number));
                    return pos;
                }
                _ => {}
            }
        }

        pos = digits_while(pos, char::is_ascii_digit);
        if pos < len && chars[pos] == '.' {
            pos = digits_while(pos + 1, char::is_ascii_digit);
        }
        if pos < len && matches!(chars[pos], 'e' | 'E') {
            pos += 1;
            if pos < len && matches!(chars[pos], '+' | '-') {
                pos += 1;
            }
            pos = digits_while(pos, char::is_ascii_digit);
        }
        pos = digits_while(pos, |c| matches!(c, 'u' | 'U' | 'l' | 'L' | 'f' | 'F'));

        emit(Token::new(start, pos - start, TokenKind::Number));
        pos
    }

    fn scan_word(&self, chars: &[char], start: usize, emit: &mut dyn FnMut(Token)) -> usize {
        let mut pos = start;
        while pos < chars.len() && is_word_char(chars[pos]) {
            pos += 1;
        }
        let word: String = chars[start..pos].iter().collect();

        let kind = if self.syntax.is_keyword(&word) {
            TokenKind::Keyword
        } else if self.syntax.is_type(&word) {
            TokenKind::Type
        } else if chars.get(pos) == Some(&'(') {
            TokenKind::Function
        } else {
            TokenKind::Default
        };

        if kind != TokenKind::Default {
            emit(Token::new(start, pos - start, kind));
        }
        pos
    }
}

impl Highlighter for CFamilyHighlighter {
    fn language(&self) -> &str {
        self.syntax.name
    }

    fn extensions(&self) -> &[&'static str] {
        self.syntax.extensions
    }

    fn highlight_line(&mut self, line: &str) -> Vec<Token> {
        let chars: Vec<char> = line.chars().collect();
        let mut tokens = Vec::new();
        self.scan(&chars, &mut |token| tokens.push(token));
        tokens
    }

    fn reset(&mut self) {
        self.state = LineState::Normal;
    }

    fn update_state(&mut self, line: &str) {
        let chars: Vec<char> = line.chars().collect();
        self.scan(&chars, &mut |_| {});
    }

    fn in_multiline_construct(&self) -> bool {
        self.state != LineState::Normal
    }
}
