//! The viewing session.
//!
//! A [`Viewer`] owns one open file and everything the user can change while
//! looking at it: the cursor and viewport, the selection, search state,
//! options, the input mode and the prompt line. Keys go in through
//! [`Viewer::dispatch`]; the caller repaints when the returned [`Outcome`]
//! asks for it.
//!
//! Painting needs the bytes on screen, and reading them may fault a new
//! window into the cache. The session therefore keeps a copy of the visible
//! page, refreshed after every key, so [`view::render`](crate::view::render)
//! can take the viewer by shared reference.

use std::collections::VecDeque;
use std::fmt;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use hexview_term::input::{KeyCode, KeyEvent, Modifiers};
use tracing::{debug, warn};

use crate::command::{Address, Command, CommandLine, parse_command};
use crate::error::{NavError, PagedFileError, SearchError};
use crate::keymap::{Keymap, Op};
use crate::mode::Mode;
use crate::navigation::{Motion, Navigator};
use crate::options::Options;
use crate::paged_file::{PagedFile, cache_size_for};
use crate::search::{
    SearchDirection, SearchEngine, SearchKind, SearchMatch, SearchRequest, parse_hex,
};
use crate::selection::Selection;
use crate::view_mode::ROW_BYTES;

/// What the caller should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Something visible changed.
    Redraw,
    /// Nothing to repaint.
    Unchanged,
    /// End the session.
    Quit,
}

/// A line for the message row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub is_error: bool,
}

/// One open file and its viewing state.
pub struct Viewer<R = File> {
    file: PagedFile<R>,
    name: String,
    nav: Navigator,
    selection: Selection,
    search: SearchEngine,
    options: Options,
    keymap: Keymap,
    mode: Mode,
    cmdline: CommandLine,

    /// `:` history, most recent first.
    commands: VecDeque<String>,

    message: Option<Message>,

    /// A `Z` was typed; a second one quits.
    pending_quit: bool,

    /// The visible bytes, starting at `page_top`.
    page: Vec<u8>,
    page_top: u64,
}

impl Viewer<File> {
    /// Open `path` with a page of `page_rows` lines.
    ///
    /// # Errors
    ///
    /// Returns [`PagedFileError::Io`] if the file cannot be opened or read.
    pub fn open(
        path: impl AsRef<Path>,
        options: Options,
        page_rows: u16,
    ) -> Result<Self, PagedFileError> {
        let path = path.as_ref();
        let cache_size = cache_size_for(options.cache_size, page_bytes(page_rows));
        let file = PagedFile::open(path, cache_size)?;
        Ok(Self::with_file(file, path.display().to_string(), options, page_rows))
    }
}

impl<R: Read + Seek> Viewer<R> {
    /// View `len` bytes from `source` under the display name `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PagedFileError::Io`] if the first window cannot be read.
    pub fn from_reader(
        source: R,
        len: u64,
        name: impl Into<String>,
        options: Options,
        page_rows: u16,
    ) -> Result<Self, PagedFileError> {
        let cache_size = cache_size_for(options.cache_size, page_bytes(page_rows));
        let file = PagedFile::from_reader(source, len, cache_size)?;
        Ok(Self::with_file(file, name.into(), options, page_rows))
    }

    fn with_file(file: PagedFile<R>, name: String, options: Options, page_rows: u16) -> Self {
        let mut viewer = Self {
            nav: Navigator::new(file.len(), page_rows),
            search: SearchEngine::new(options.history),
            file,
            name,
            selection: Selection::new(),
            options,
            keymap: Keymap::new(),
            mode: Mode::Normal,
            cmdline: CommandLine::new(),
            commands: VecDeque::new(),
            message: None,
            pending_quit: false,
            page: Vec::new(),
            page_top: 0,
        };
        viewer.refresh_page();
        viewer
    }

    // -- accessors ----------------------------------------------------------

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn len(&self) -> u64 {
        self.file.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.file.is_empty()
    }

    #[must_use]
    pub const fn navigator(&self) -> &Navigator {
        &self.nav
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub const fn search(&self) -> &SearchEngine {
        &self.search
    }

    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub const fn command_line(&self) -> &CommandLine {
        &self.cmdline
    }

    #[must_use]
    pub const fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    #[must_use]
    pub const fn file(&self) -> &PagedFile<R> {
        &self.file
    }

    /// The byte at `addr` if it is on screen.
    #[must_use]
    pub fn visible_byte(&self, addr: u64) -> Option<u8> {
        let offset = usize::try_from(addr.checked_sub(self.page_top)?).ok()?;
        self.page.get(offset).copied()
    }

    // -- events -------------------------------------------------------------

    /// Handle one key.
    pub fn dispatch(&mut self, key: KeyEvent) -> Outcome {
        let outcome = if self.mode.is_prompt() {
            self.handle_prompt(key)
        } else {
            self.handle_normal(key)
        };
        if outcome == Outcome::Redraw {
            self.refresh_page();
        }
        outcome
    }

    /// Adopt a new page height.
    pub fn resize(&mut self, page_rows: u16) {
        self.nav.resize(page_rows);
        self.refresh_page();
    }

    /// Show an informational message.
    pub fn set_message(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            text: text.into(),
            is_error: false,
        });
    }

    /// Show an error message.
    pub fn set_error(&mut self, err: impl fmt::Display) {
        let text = err.to_string();
        warn!(%text, "error");
        self.message = Some(Message {
            text,
            is_error: true,
        });
    }

    // -- normal mode --------------------------------------------------------

    fn handle_normal(&mut self, key: KeyEvent) -> Outcome {
        let had_message = self.message.take().is_some();
        let pending_quit = std::mem::take(&mut self.pending_quit);

        let Some(op) = self.keymap.lookup(key) else {
            return redraw_if(had_message);
        };
        if pending_quit && op == Op::QuitPrefix {
            return Outcome::Quit;
        }

        let changed = self.run_op(op);
        redraw_if(changed || had_message)
    }

    /// Run a normal-mode operation. Returns whether anything visible changed.
    fn run_op(&mut self, op: Op) -> bool {
        let motion = match op {
            Op::MoveUp => self.nav.move_up(),
            Op::MoveDown => self.nav.move_down(),
            Op::MoveLeft => self.nav.move_left(),
            Op::MoveRight => self.nav.move_right(),
            Op::RollLeft => self.nav.roll_left(),
            Op::RollRight => self.nav.roll_right(),
            Op::PageUp => self.nav.page_up(),
            Op::PageDown => self.nav.page_down(),
            Op::Home => self.nav.move_home(),
            Op::End => self.nav.move_end(),
            Op::LineStart => self.nav.move_line_start(),
            Op::LineEnd => self.nav.move_line_end(),
            Op::ScreenTop => self.nav.move_screen_top(),
            Op::ScreenMiddle => self.nav.move_screen_middle(),
            Op::ScreenBottom => self.nav.move_screen_bottom(),
            Op::WordForward => {
                let result = self.nav.move_word(&mut self.file);
                return self.navigated(result);
            }
            Op::WordBack => {
                let result = self.nav.move_word_back(&mut self.file);
                return self.navigated(result);
            }
            other => return self.run_other(other),
        };
        self.moved(motion)
    }

    /// Operations that are not plain cursor motions.
    fn run_other(&mut self, op: Op) -> bool {
        match op {
            Op::View(mode) => self.nav.select_view(mode),
            Op::ToggleSelect => {
                self.selection.toggle(self.nav.address());
                true
            }
            Op::LeaveSelect => {
                let was_active = self.selection.is_active();
                self.selection.deactivate();
                was_active
            }
            Op::Search(kind, direction) => self.open_prompt(Mode::Search(kind, direction)),
            Op::SearchNext | Op::SearchPrev => {
                let from = self.nav.address();
                let result = if op == Op::SearchNext {
                    self.search.search_next(&mut self.file, from)
                } else {
                    self.search.search_prev(&mut self.file, from)
                };
                let kind = self.search.last_kind();
                self.found(result, kind)
            }
            Op::CommandLine => self.open_prompt(Mode::Command),
            Op::QuitPrefix => {
                self.pending_quit = true;
                false
            }
            _ => false,
        }
    }

    /// Let the selection follow a cursor move.
    fn moved(&mut self, motion: Option<Motion>) -> bool {
        self.selection.follow(motion);
        motion.is_some()
    }

    fn navigated(&mut self, result: Result<Option<Motion>, NavError>) -> bool {
        match result {
            Ok(motion) => self.moved(motion),
            Err(err) => {
                self.set_error(err);
                true
            }
        }
    }

    fn found(&mut self, result: Result<Option<SearchMatch>, SearchError>, kind: SearchKind) -> bool {
        match result {
            Ok(Some(m)) => {
                debug!(offset = m.offset, len = m.len, "match");
                let motion = self.nav.recenter_on(m.offset);
                self.moved(motion);
            }
            Ok(None) => {
                let pattern = self
                    .search
                    .history(kind)
                    .latest()
                    .map(|p| kind.display(p))
                    .unwrap_or_default();
                self.set_error(format!("Pattern not found: {pattern}"));
            }
            Err(err) => self.set_error(err),
        }
        true
    }

    // -- prompts ------------------------------------------------------------

    fn open_prompt(&mut self, mode: Mode) -> bool {
        self.mode = mode;
        self.cmdline.clear();
        true
    }

    fn close_prompt(&mut self) -> Outcome {
        self.mode = Mode::Normal;
        self.cmdline.clear();
        Outcome::Redraw
    }

    fn handle_prompt(&mut self, key: KeyEvent) -> Outcome {
        if key.modifiers.contains(Modifiers::CTRL) {
            return match key.code {
                KeyCode::Char('c') => self.close_prompt(),
                _ => Outcome::Unchanged,
            };
        }

        match key.code {
            KeyCode::Escape => return self.close_prompt(),
            KeyCode::Enter => {
                let input = self.cmdline.take();
                let mode = std::mem::take(&mut self.mode);
                return self.submit(mode, input);
            }
            KeyCode::Char(ch) => self.cmdline.insert_char(ch),
            KeyCode::Backspace => {
                if !self.cmdline.backspace() && self.cmdline.is_empty() {
                    return self.close_prompt();
                }
            }
            KeyCode::Delete => {
                self.cmdline.delete();
            }
            KeyCode::Left => self.cmdline.move_left(),
            KeyCode::Right => self.cmdline.move_right(),
            KeyCode::Home => self.cmdline.move_home(),
            KeyCode::End => self.cmdline.move_end(),
            KeyCode::Up => return redraw_if(self.browse_history(true)),
            KeyCode::Down => return redraw_if(self.browse_history(false)),
            _ => return Outcome::Unchanged,
        }
        Outcome::Redraw
    }

    /// Step through the history belonging to the open prompt.
    fn browse_history(&mut self, older: bool) -> bool {
        match self.mode {
            Mode::Normal => false,
            Mode::Command => {
                let commands = &self.commands;
                let entry = |n: usize| commands.get(n).cloned();
                if older {
                    self.cmdline.history_older(entry)
                } else {
                    self.cmdline.history_newer(entry)
                }
            }
            Mode::Search(kind, _) => {
                let history = self.search.history(kind);
                let entry = |n: usize| history.get(n).map(|p| kind.display(p));
                if older {
                    self.cmdline.history_older(entry)
                } else {
                    self.cmdline.history_newer(entry)
                }
            }
        }
    }

    fn submit(&mut self, mode: Mode, input: String) -> Outcome {
        match mode {
            Mode::Normal => Outcome::Unchanged,
            Mode::Command => {
                self.remember_command(&input);
                self.run_command(parse_command(&input))
            }
            Mode::Search(kind, direction) => {
                let from = self.nav.address();
                let result = match (kind, direction) {
                    (SearchKind::Text, SearchDirection::Forward) => {
                        self.search
                            .find_forward(&mut self.file, &SearchRequest::new(input), from)
                    }
                    (SearchKind::Text, SearchDirection::Backward) => {
                        self.search
                            .find_backward(&mut self.file, &SearchRequest::new(input), from)
                    }
                    // A malformed pattern leaves the stored direction alone.
                    (SearchKind::Hex, _) => match parse_hex(&input) {
                        Ok(_) => {
                            self.search.set_hex_direction(direction);
                            self.search.find_hex(&mut self.file, &input, from, false)
                        }
                        Err(e) => Err(e),
                    },
                };
                self.found(result, kind);
                Outcome::Redraw
            }
        }
    }

    // -- commands -----------------------------------------------------------

    fn remember_command(&mut self, input: &str) {
        let input = input.trim();
        if input.is_empty() {
            return;
        }
        self.commands.retain(|c| c != input);
        self.commands.push_front(input.to_string());
        self.commands.truncate(self.options.history);
    }

    fn run_command(&mut self, cmd: Command) -> Outcome {
        debug!(?cmd, "command");
        match cmd {
            Command::Empty => {}
            Command::Quit => return Outcome::Quit,
            Command::Goto(Address::End) => {
                let motion = self.nav.jump_address(self.nav.last());
                self.moved(motion);
            }
            Command::Goto(Address::At(addr)) => {
                if addr > self.file.len() {
                    self.set_error(NavError::InvalidAddress(format!("{addr:#x}")));
                } else {
                    let motion = self.nav.jump_address(addr);
                    self.moved(motion);
                }
            }
            Command::Forward(delta) => {
                let result = self.nav.plus_offset(delta);
                self.navigated(result);
            }
            Command::Back(delta) => {
                let result = self.nav.minus_offset(delta);
                self.navigated(result);
            }
            Command::Set(args) => self.set_options(&args),
            Command::View(mode) => {
                self.nav.select_view(mode);
            }
            Command::Invalid(msg) => self.set_error(msg),
            Command::Unknown(input) => self.set_error(format!("Not a command: {input}")),
        }
        Outcome::Redraw
    }

    fn set_options(&mut self, args: &str) {
        let cache_size = self.options.cache_size;
        match self.options.set(args) {
            // The open window keeps its size.
            Ok(_) if self.options.cache_size != cache_size => self.set_message(format!(
                "cachesize={} takes effect at next start",
                self.options.cache_size
            )),
            Ok(Some(text)) => self.set_message(text),
            Ok(None) => {}
            Err(msg) => self.set_error(msg),
        }
        self.search.set_history_depth(self.options.history);
        self.commands.truncate(self.options.history);
    }

    // -- page copy ----------------------------------------------------------

    fn refresh_page(&mut self) {
        let top = self.nav.top();
        let end = top.saturating_add(self.nav.page_bytes()).min(self.file.len());
        self.page_top = top;
        self.page.clear();
        match self.file.slice(top, end) {
            Ok(bytes) => self.page.extend_from_slice(bytes),
            Err(err) => self.set_error(err),
        }
    }
}

fn page_bytes(page_rows: u16) -> u64 {
    u64::from(page_rows.max(1)) * ROW_BYTES
}

const fn redraw_if(changed: bool) -> Outcome {
    if changed {
        Outcome::Redraw
    } else {
        Outcome::Unchanged
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
