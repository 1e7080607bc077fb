//! Parsing of `:` command lines.

/// A command entered at the `:` prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExCommand {
    /// `:w [file]`
    Write(Option<String>),
    /// `:q`, or `:q!` when forced.
    Quit { force: bool },
    /// `:wq [file]`
    WriteQuit(Option<String>),
    /// `:x`, writes only when modified.
    Exit,
    /// `:e[!] file`
    Edit { path: String, force: bool },
    /// `:new`
    New { force: bool },
    /// `:saveas file`
    SaveAs(String),
    /// `:set option`
    Set(String),
    /// `:noh`
    NoHighlight,
    /// `:help`
    Help,
    /// `:N`, 1-indexed.
    GotoLine(usize),
    /// `:[%]s/pattern/replacement/[g]`
    Substitute {
        pattern: String,
        replacement: String,
        whole_file: bool,
        global: bool,
    },
}

/// Text shown by `:help`.
pub const HELP_TEXT: &str =
    "Commands: :w :q :q! :wq :x :e <file> :new :saveas <file> :set <opt> :s/a/b/g :noh :<line>";

impl ExCommand {
    /// Parses a command line without its leading `:`.
    ///
    /// Returns `Ok(None)` for a blank line and an error message for
    /// unknown or malformed commands.
    pub fn parse(input: &str) -> Result<Option<Self>, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        if let Some(rest) = input.strip_prefix('%') {
            return Self::parse_substitute(rest, true).map(Some);
        }
        if input.starts_with('s') && input[1..].starts_with(|c: char| !c.is_alphanumeric()) {
            return Self::parse_substitute(input, false).map(Some);
        }

        let mut parts = input.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::to_string);

        let command = match name {
            "w" | "write" => Self::Write(arg),
            "q" | "quit" => Self::Quit { force: false },
            "q!" | "quit!" => Self::Quit { force: true },
            "wq" => Self::WriteQuit(arg),
            "x" | "exit" => Self::Exit,
            "e" | "edit" | "e!" | "edit!" => {
                let path = arg.ok_or_else(|| "Filename required".to_string())?;
                Self::Edit {
                    path,
                    force: name.ends_with('!'),
                }
            }
            "new" => Self::New { force: false },
            "new!" => Self::New { force: true },
            "saveas" => Self::SaveAs(arg.ok_or_else(|| "Filename required".to_string())?),
            "set" => Self::Set(arg.ok_or_else(|| "Option required".to_string())?),
            "noh" | "nohlsearch" => Self::NoHighlight,
            "help" | "h" => Self::Help,
            _ => match name.parse::<usize>() {
                Ok(line) => Self::GotoLine(line),
                Err(_) => return Err(format!("Unknown command: {}", name)),
            },
        };
        Ok(Some(command))
    }

    /// Parses `s/pattern/replacement/flags`.
    fn parse_substitute(input: &str, whole_file: bool) -> Result<Self, String> {
        let mut chars = input.chars();
        if chars.next() != Some('s') {
            return Err(format!("Unknown command: {}", input));
        }
        let delimiter = chars
            .next()
            .ok_or_else(|| "Pattern required".to_string())?;
        let fields = split_unescaped(chars.as_str(), delimiter);

        let pattern = fields.first().cloned().unwrap_or_default();
        if pattern.is_empty() {
            return Err("Pattern required".to_string());
        }
        let replacement = fields.get(1).cloned().unwrap_or_default();
        let flags = fields.get(2).map(String::as_str).unwrap_or("");
        if let Some(bad) = flags.chars().find(|&c| c != 'g') {
            return Err(format!("Unknown flag: {}", bad));
        }

        Ok(Self::Substitute {
            pattern,
            replacement,
            whole_file,
            global: flags.contains('g'),
        })
    }
}

/// Splits on `delimiter`, treating `\<delimiter>` as a literal delimiter.
fn split_unescaped(input: &str, delimiter: char) -> Vec<String> {
    let mut fields = vec![String::new()];
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == delimiter {
            fields.push(String::new());
            continue;
        }
        let literal = if c == '\\' && chars.peek() == Some(&delimiter) {
            chars.next();
            delimiter
        } else {
            c
        };
        if let Some(field) = fields.last_mut() {
            field.push(literal);
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> ExCommand {
        ExCommand::parse(input).unwrap().unwrap()
    }

    #[test]
    fn test_file_commands() {
        assert_eq!(parse("w"), ExCommand::Write(None));
        assert_eq!(parse("w out.txt"), ExCommand::Write(Some("out.txt".to_string())));
        assert_eq!(parse("q"), ExCommand::Quit { force: false });
        assert_eq!(parse("q!"), ExCommand::Quit { force: true });
        assert_eq!(parse("wq"), ExCommand::WriteQuit(None));
        assert_eq!(parse(" x "), ExCommand::Exit);
        assert_eq!(
            parse("e! main.c"),
            ExCommand::Edit {
                path: "main.c".to_string(),
                force: true
            }
        );
        assert_eq!(parse("saveas b.c"), ExCommand::SaveAs("b.c".to_string()));
    }

    #[test]
    fn test_missing_arguments() {
        assert_eq!(ExCommand::parse("e"), Err("Filename required".to_string()));
        assert_eq!(ExCommand::parse("set"), Err("Option required".to_string()));
        assert_eq!(ExCommand::parse("frobnicate"), Err("Unknown command: frobnicate".to_string()));
        assert_eq!(ExCommand::parse("   "), Ok(None));
    }

    #[test]
    fn test_goto_line() {
        assert_eq!(parse("42"), ExCommand::GotoLine(42));
    }

    #[test]
    fn test_substitute() {
        assert_eq!(
            parse("s/foo/bar/"),
            ExCommand::Substitute {
                pattern: "foo".to_string(),
                replacement: "bar".to_string(),
                whole_file: false,
                global: false,
            }
        );
        assert_eq!(
            parse("%s#a\\#b#c#g"),
            ExCommand::Substitute {
                pattern: "a#b".to_string(),
                replacement: "c".to_string(),
                whole_file: true,
                global: true,
            }
        );
        assert_eq!(
            parse("%s/x/"),
            ExCommand::Substitute {
                pattern: "x".to_string(),
                replacement: String::new(),
                whole_file: true,
                global: false,
            }
        );
        assert!(ExCommand::parse("s//x/").is_err());
        assert!(ExCommand::parse("s/a/b/q").is_err());
        // `set` and `saveas` start with 's' but are not substitutions.
        assert_eq!(parse("set nu"), ExCommand::Set("nu".to_string()));
    }
}
