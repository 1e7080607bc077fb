//! Main editor application: ties the buffer, search and renderer to the
//! modal key dispatcher and runs the terminal event loop.

use crate::command::{ExCommand, HELP_TEXT};
use crate::input::{EditorCommand, InputHandler};
use crate::renderer::Renderer;
use crate::terminal::{CrosstermTerminal, GridTerminal, Terminal};
use astrax_core::{
    EditorConfig, Language, Mode, Position, Range, Search, SearchOptions, TextBuffer,
};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::io;
use std::path::{Path, PathBuf};

/// The main editor application.
pub struct EditorApp {
    /// The document.
    pub buffer: TextBuffer,
    /// Screen renderer.
    pub renderer: Renderer,
    /// Search state shared by `/`, `n`, `N` and `:s`.
    pub search: Search,
    /// Current mode.
    mode: Mode,
    /// Editor settings.
    config: EditorConfig,
    /// Input handler.
    input: InputHandler,
    /// Pending `:` or `/` input.
    prompt: String,
    /// Start of the visual selection.
    visual_anchor: Option<Position>,
    should_quit: bool,
}

impl Default for EditorApp {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorApp {
    /// Creates an editor with an empty buffer.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            buffer: TextBuffer::new(),
            renderer: Renderer::new(config.clone()),
            search: Search::new(),
            mode: Mode::Normal,
            config,
            input: InputHandler::new(),
            prompt: String::new(),
            visual_anchor: None,
            should_quit: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Opens a file. A missing file starts an empty buffer with that name.
    pub fn open_file<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref();
        match self.buffer.load(path) {
            Ok(()) => {
                self.renderer.set_status_message(format!(
                    "\"{}\" {}L",
                    path.display(),
                    self.buffer.line_count()
                ));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.buffer = TextBuffer::new();
                self.buffer.set_filename(path);
                self.renderer
                    .set_status_message(format!("\"{}\" [New File]", path.display()));
            }
            Err(e) => {
                log::error!("Failed to open file {:?}: {}", path, e);
                self.renderer.set_status_message(format!("Error: {}", e));
                return;
            }
        }
        self.attach_highlighter(path);
    }

    fn attach_highlighter(&mut self, path: &Path) {
        let language = Language::from_path(path);
        log::debug!("language for {}: {}", path.display(), language.name());
        self.renderer.set_highlighter(language.highlighter());
    }

    /// Draws the current state.
    pub fn render<T: Terminal + ?Sized>(&mut self, terminal: &mut T) -> io::Result<()> {
        let search = self.search.is_active().then_some(&self.search);
        self.renderer.render(terminal, &self.buffer, self.mode, search)
    }

    /// Feeds one key press through the dispatcher.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(command) = self.input.handle_key(key, self.mode) {
            self.execute(command);
        }
    }

    // ==================== Commands ====================

    /// Executes an editor command.
    pub fn execute(&mut self, command: EditorCommand) {
        use EditorCommand::*;

        match command {
            InsertChar(ch) => self.buffer.insert_char(ch),
            InsertNewline => self.buffer.insert_newline(),
            InsertTab => {
                let indent = self.config.indent_unit();
                self.buffer.insert_str(&indent);
            }

            DeleteBackward => self.buffer.delete_char_before(),
            DeleteForward => self.buffer.delete_char_at(),
            DeleteLine => self.buffer.delete_line(),
            DeleteToLineEnd => self.buffer.delete_to_line_end(),
            JoinLines => self.buffer.join_lines(),

            MoveLeft => self.buffer.move_cursor(-1, 0),
            MoveRight => self.buffer.move_cursor(1, 0),
            MoveUp => self.buffer.move_cursor(0, -1),
            MoveDown => self.buffer.move_cursor(0, 1),
            MoveWordForward => self.buffer.move_word_forward(),
            MoveWordBackward => self.buffer.move_word_backward(),
            MoveToLineStart => self.buffer.move_to_line_start(),
            MoveToFirstNonBlank => self.buffer.move_to_first_non_blank(),
            MoveToLineEnd => self.buffer.move_to_line_end(),
            MoveToBufferStart => self.buffer.move_to_buffer_start(),
            MoveToBufferEnd => self.buffer.move_to_buffer_end(),

            EnterInsert => self.mode = Mode::Insert,
            Append => {
                self.buffer.move_cursor(1, 0);
                self.mode = Mode::Insert;
            }
            AppendLineEnd => {
                self.buffer.move_to_line_end();
                self.mode = Mode::Insert;
            }
            InsertLineStart => {
                self.buffer.move_to_first_non_blank();
                self.mode = Mode::Insert;
            }
            OpenLineBelow => {
                self.buffer.insert_line_below();
                self.mode = Mode::Insert;
            }
            OpenLineAbove => {
                self.buffer.insert_line_above();
                self.mode = Mode::Insert;
            }
            EnterVisual => {
                self.visual_anchor = Some(self.buffer.cursor());
                self.mode = Mode::Visual;
            }
            EnterCommand => self.open_prompt(Mode::Command),
            EnterSearch => self.open_prompt(Mode::Search),
            ExitToNormal => {
                self.visual_anchor = None;
                self.mode = Mode::Normal;
            }

            YankLine => {
                self.buffer.yank_line();
                self.renderer.set_status_message("1 line yanked");
            }
            YankSelection => self.yank_selection(),
            Paste => self.buffer.paste(),
            PasteBefore => self.buffer.paste_before(),

            Undo => {
                if !self.buffer.undo() {
                    self.renderer.set_status_message("Already at oldest change");
                }
            }
            Redo => {
                if !self.buffer.redo() {
                    self.renderer.set_status_message("Already at newest change");
                }
            }

            SearchNext => self.search_step(true),
            SearchPrevious => self.search_step(false),

            ScrollUp(lines) => self.scroll(-(lines as isize)),
            ScrollDown(lines) => self.scroll(lines as isize),

            PromptInput(ch) => {
                self.prompt.push(ch);
                self.renderer.set_command_line(self.prompt.clone());
            }
            PromptBackspace => {
                if self.prompt.pop().is_none() {
                    self.close_prompt();
                } else {
                    self.renderer.set_command_line(self.prompt.clone());
                }
            }
            PromptCancel => self.close_prompt(),
            PromptSubmit => {
                let input = std::mem::take(&mut self.prompt);
                let mode = self.mode;
                self.close_prompt();
                match mode {
                    Mode::Search => self.submit_search(&input),
                    _ => self.run_command_line(&input),
                }
            }
        }
    }

    fn open_prompt(&mut self, mode: Mode) {
        self.prompt.clear();
        self.renderer.set_command_line("");
        self.renderer.set_status_message("");
        self.mode = mode;
    }

    fn close_prompt(&mut self) {
        self.prompt.clear();
        self.renderer.set_command_line("");
        self.mode = Mode::Normal;
    }

    fn yank_selection(&mut self) {
        let Some(anchor) = self.visual_anchor.take() else {
            return;
        };
        let range = Range::new(anchor, self.buffer.cursor()).normalized();
        // The selection includes the character under its last position.
        let end = Position::new(range.end.line, range.end.column + 1);
        self.buffer.yank_range(Range::new(range.start, end));
        self.buffer.set_cursor(range.start);
        self.mode = Mode::Normal;
        self.renderer.set_status_message("Selection yanked");
    }

    fn scroll(&mut self, delta: isize) {
        self.renderer.scroll(delta);
        let visible = self.renderer.viewport().visible_lines();
        let cursor = self.buffer.cursor();
        let line = cursor.line.clamp(visible.start, visible.end.saturating_sub(1));
        self.buffer.set_cursor(Position::new(line, cursor.column));
    }

    // ==================== Search ====================

    fn submit_search(&mut self, pattern: &str) {
        if pattern.is_empty() {
            return;
        }
        let options = SearchOptions {
            use_regex: true,
            ..SearchOptions::default()
        };
        self.search.set_pattern(pattern, options);
        self.search.add_to_history(pattern);
        if let Some(error) = self.search.error() {
            self.renderer
                .set_status_message(format!("Invalid pattern: {}", error));
            return;
        }
        self.search_step(true);
    }

    fn search_step(&mut self, forward: bool) {
        if !self.search.is_active() {
            self.renderer.set_status_message("No previous search pattern");
            return;
        }
        let from = self.buffer.cursor();
        let found = if forward {
            self.search.find_next(self.buffer.lines(), from)
        } else {
            self.search.find_previous(self.buffer.lines(), from)
        };
        match found {
            Some(m) => {
                let wrapped = if forward {
                    m.position <= from
                } else {
                    m.position >= from
                };
                self.buffer.set_cursor(m.position);
                let message = if wrapped {
                    "Search wrapped".to_string()
                } else {
                    format!("/{}", self.search.pattern())
                };
                self.renderer.set_status_message(message);
            }
            None => {
                self.renderer.set_status_message(format!(
                    "Pattern not found: {}",
                    self.search.pattern()
                ));
            }
        }
    }

    // ==================== Command line ====================

    /// Parses and runs a `:` command line.
    pub fn run_command_line(&mut self, input: &str) {
        match ExCommand::parse(input) {
            Ok(Some(command)) => self.run_ex(command),
            Ok(None) => {}
            Err(message) => self.renderer.set_status_message(message),
        }
    }

    fn run_ex(&mut self, command: ExCommand) {
        match command {
            ExCommand::Write(path) => {
                self.write(path.as_deref());
            }
            ExCommand::Quit { force } => {
                if self.buffer.is_modified() && !force {
                    self.renderer
                        .set_status_message("No write since last change (add ! to override)");
                } else {
                    self.should_quit = true;
                }
            }
            ExCommand::WriteQuit(path) => {
                if self.write(path.as_deref()) {
                    self.should_quit = true;
                }
            }
            ExCommand::Exit => {
                if !self.buffer.is_modified() || self.write(None) {
                    self.should_quit = true;
                }
            }
            ExCommand::Edit { path, force } => {
                if self.buffer.is_modified() && !force {
                    self.renderer
                        .set_status_message("No write since last change (add ! to override)");
                } else {
                    self.open_file(PathBuf::from(path));
                }
            }
            ExCommand::New { force } => {
                if self.buffer.is_modified() && !force {
                    self.renderer
                        .set_status_message("No write since last change (add ! to override)");
                } else {
                    self.buffer = TextBuffer::new();
                    self.renderer.set_highlighter(None);
                    self.renderer.set_status_message("[No Name]");
                }
            }
            ExCommand::SaveAs(path) => {
                if self.write(Some(&path)) {
                    self.attach_highlighter(Path::new(&path));
                }
            }
            ExCommand::Set(option) => self.set_option(&option),
            ExCommand::NoHighlight => self.search.clear(),
            ExCommand::Help => self.renderer.set_status_message(HELP_TEXT),
            ExCommand::GotoLine(line) => self.buffer.move_to_line(line.saturating_sub(1)),
            ExCommand::Substitute {
                pattern,
                replacement,
                whole_file,
                global,
            } => self.substitute(&pattern, &replacement, whole_file, global),
        }
    }

    /// Saves to `path`, or to the current filename. Returns true on success.
    fn write(&mut self, path: Option<&str>) -> bool {
        let result = match path {
            Some(path) => self.buffer.save(path),
            None => self.buffer.save_current(),
        };
        match result {
            Ok(()) => {
                let name = self
                    .buffer
                    .filename()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.renderer.set_status_message(format!(
                    "\"{}\" {}L written",
                    name,
                    self.buffer.line_count()
                ));
                true
            }
            Err(e) => {
                log::error!("Failed to save: {}", e);
                self.renderer.set_status_message(format!("Error: {}", e));
                false
            }
        }
    }

    fn set_option(&mut self, option: &str) {
        let mut config = self.config.clone();
        match option {
            "number" | "nu" => config.show_line_numbers = true,
            "nonumber" | "nonu" => config.show_line_numbers = false,
            "syntax" => config.syntax_highlighting = true,
            "nosyntax" => config.syntax_highlighting = false,
            "statusbar" => config.show_status_bar = true,
            "nostatusbar" => config.show_status_bar = false,
            "expandtab" | "et" => config.expand_tabs = true,
            "noexpandtab" | "noet" => config.expand_tabs = false,
            _ => {
                let tab_size = option
                    .strip_prefix("tabstop=")
                    .or_else(|| option.strip_prefix("ts="))
                    .and_then(|n| n.parse::<usize>().ok())
                    .filter(|&n| n > 0);
                match tab_size {
                    Some(n) => config.tab_size = n,
                    None => {
                        self.renderer
                            .set_status_message(format!("Unknown option: {}", option));
                        return;
                    }
                }
            }
        }
        self.config = config.clone();
        self.renderer.set_config(config);
    }

    /// Replaces matches of `pattern` on the current line or the whole file.
    fn substitute(&mut self, pattern: &str, replacement: &str, whole_file: bool, global: bool) {
        let options = SearchOptions {
            use_regex: true,
            case_sensitive: true,
            ..SearchOptions::default()
        };
        let mut search = Search::new();
        search.set_pattern(pattern, options);
        if let Some(error) = search.error() {
            self.renderer
                .set_status_message(format!("Invalid pattern: {}", error));
            return;
        }

        let lines = if whole_file {
            0..self.buffer.line_count()
        } else {
            let line = self.buffer.cursor().line;
            line..line + 1
        };
        let mut matches = Vec::new();
        for index in lines {
            let mut found = search.find_in_line(&self.buffer.lines()[index], index);
            if !global {
                found.truncate(1);
            }
            matches.extend(found);
        }
        if matches.is_empty() {
            self.renderer
                .set_status_message(format!("Pattern not found: {}", pattern));
            return;
        }

        let count = self.buffer.edit_lines(|lines| {
            for found in matches.iter().rev() {
                search.replace(lines, found, replacement);
            }
            matches.len()
        });
        log::debug!("substituted {} matches of {:?}", count, pattern);
        self.renderer
            .set_status_message(format!("{} substitutions", count));
    }
}

/// Runs the interactive editor until the user quits.
pub fn run(file: Option<PathBuf>, config: EditorConfig) -> io::Result<()> {
    let mut app = EditorApp::new(config);
    if let Some(path) = file {
        app.open_file(path);
    }

    let mut terminal = CrosstermTerminal::new()?;
    app.render(&mut terminal)?;

    while !app.should_quit() {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
            Event::Resize(width, height) => {
                log::debug!("terminal resized to {}x{}", width, height);
                app.renderer.invalidate();
            }
            _ => continue,
        }
        app.render(&mut terminal)?;
    }

    log::info!("Exiting editor");
    Ok(())
}

/// Renders one frame into an in-memory grid and returns its text.
pub fn dump(
    file: Option<PathBuf>,
    config: EditorConfig,
    width: usize,
    height: usize,
) -> io::Result<String> {
    let mut app = EditorApp::new(config);
    if let Some(path) = file {
        app.open_file(path);
    }
    let mut terminal = GridTerminal::new(width, height);
    app.render(&mut terminal)?;
    Ok(terminal.contents())
}
