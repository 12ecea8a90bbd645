//! The bottom-line prompt and `:` commands.
//!
//! Every prompt (`:`, `/`, `?`, `\`, `|`) edits its input in a
//! [`CommandLine`]. Enter hands the text to the viewer, Escape cancels.
//! Up and Down browse the history of whatever the prompt is for.
//!
//! # Commands
//!
//! | Command                      | Action                            |
//! |------------------------------|-----------------------------------|
//! | `:q` `:q!` `:quit`           | Quit                              |
//! | `:wq` `:wq!` `:x` `:exit`    | Quit (there is nothing to write)  |
//! | `:ZZ`                        | Quit                              |
//! | `:1234` `:0x4d2`             | Jump to an address                |
//! | `:$`                         | Jump to the last byte             |
//! | `:+N` `:-N`                  | Jump relative to the cursor       |
//! | `:set args`                  | Change options (see `options`)    |
//! | `:view N`                    | Select view mode 1 to 5           |
//!
//! Numbers are decimal unless prefixed with `0x`.

use crate::view_mode::ViewMode;

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Target of an absolute jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    At(u64),
    /// `$`: the last byte.
    End,
}

/// A parsed `:` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Nothing typed.
    Empty,

    Quit,

    /// `:<addr>`: absolute jump.
    Goto(Address),

    /// `:+N`: jump forward.
    Forward(u64),

    /// `:-N`: jump back.
    Back(u64),

    /// `:set <args>`: the raw arguments.
    Set(String),

    /// `:view N`.
    View(ViewMode),

    /// A known command with a bad argument, with the message to show.
    Invalid(String),

    /// Unknown command, with the full input for error reporting.
    Unknown(String),
}

/// Parse a command (without the leading `:`).
#[must_use]
pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }

    let (cmd, arg) = trimmed
        .find(char::is_whitespace)
        .map_or((trimmed, ""), |pos| {
            (&trimmed[..pos], trimmed[pos..].trim_start())
        });

    match cmd {
        "q" | "q!" | "quit" | "wq" | "wq!" | "x" | "exit" | "ZZ" => Command::Quit,
        "set" | "se" => Command::Set(arg.to_string()),
        "view" => arg
            .parse::<u8>()
            .ok()
            .and_then(ViewMode::from_number)
            .map_or_else(
                || Command::Invalid(format!("view: expected 1 to 5, got '{arg}'")),
                Command::View,
            ),
        "$" => Command::Goto(Address::End),
        _ => parse_jump(trimmed),
    }
}

fn parse_jump(input: &str) -> Command {
    if let Some(rest) = input.strip_prefix('+') {
        return parse_number(rest)
            .map_or_else(|| Command::Unknown(input.to_string()), Command::Forward);
    }
    if let Some(rest) = input.strip_prefix('-') {
        return parse_number(rest)
            .map_or_else(|| Command::Unknown(input.to_string()), Command::Back);
    }
    parse_number(input).map_or_else(
        || Command::Unknown(input.to_string()),
        |addr| Command::Goto(Address::At(addr)),
    )
}

/// A decimal or `0x`-prefixed hex number.
#[must_use]
pub fn parse_number(s: &str) -> Option<u64> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok();
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

// ---------------------------------------------------------------------------
// CommandLine
// ---------------------------------------------------------------------------

/// The prompt input buffer.
///
/// Tracks the text being typed, the cursor inside it, and where the user is
/// in the history. The prompt character is not stored; the view layer draws
/// it from the mode.
#[derive(Debug, Clone, Default)]
pub struct CommandLine {
    input: String,

    /// Cursor position within `input` (char offset).
    cursor: usize,

    /// History entry being shown, 0 being the most recent.
    history_pos: Option<usize>,

    /// What was typed before browsing started.
    stash: String,
}

impl CommandLine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
            history_pos: None,
            stash: String::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The cursor position within the input (char offset).
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    // -- editing ------------------------------------------------------------

    pub fn insert_char(&mut self, ch: char) {
        let byte_idx = self.char_to_byte(self.cursor);
        self.input.insert(byte_idx, ch);
        self.cursor += 1;
    }

    /// Delete the character before the cursor. Returns `false` at the start.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let byte_idx = self.char_to_byte(self.cursor);
        self.input.remove(byte_idx);
        true
    }

    /// Delete the character under the cursor. Returns `false` at the end.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let byte_idx = self.char_to_byte(self.cursor);
        self.input.remove(byte_idx);
        true
    }

    pub const fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Empty the input and forget the history position.
    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
        self.history_pos = None;
        self.stash.clear();
    }

    /// Take the input, leaving the line cleared.
    pub fn take(&mut self) -> String {
        let input = std::mem::take(&mut self.input);
        self.clear();
        input
    }

    // -- history ------------------------------------------------------------

    /// Show the next older history entry. `entry(n)` returns entry `n`,
    /// 0 being the most recent. Returns `false` when there is none.
    pub fn history_older(&mut self, entry: impl Fn(usize) -> Option<String>) -> bool {
        let next = self.history_pos.map_or(0, |n| n + 1);
        let Some(text) = entry(next) else {
            return false;
        };
        if self.history_pos.is_none() {
            self.stash = self.input.clone();
        }
        self.history_pos = Some(next);
        self.set_input(text);
        true
    }

    /// Show the next newer history entry, or what was typed before browsing
    /// once past the newest. Returns `false` when not browsing.
    pub fn history_newer(&mut self, entry: impl Fn(usize) -> Option<String>) -> bool {
        match self.history_pos {
            None => false,
            Some(0) => {
                self.history_pos = None;
                let stash = std::mem::take(&mut self.stash);
                self.set_input(stash);
                true
            }
            Some(n) => {
                let text = entry(n - 1).unwrap_or_default();
                self.history_pos = Some(n - 1);
                self.set_input(text);
                true
            }
        }
    }

    // -- internals ----------------------------------------------------------

    fn set_input(&mut self, text: String) {
        self.input = text;
        self.cursor = self.char_len();
    }

    fn char_len(&self) -> usize {
        self.input.chars().count()
    }

    /// Convert a char offset to a byte offset in `self.input`.
    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map_or(self.input.len(), |(byte_idx, _)| byte_idx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> CommandLine {
        let mut cl = CommandLine::new();
        for ch in s.chars() {
            cl.insert_char(ch);
        }
        cl
    }

    // -- editing --------------------------------------------------------------

    #[test]
    fn insert_and_backspace() {
        let mut cl = typed("abc");
        assert_eq!(cl.input(), "abc");
        assert_eq!(cl.cursor(), 3);
        assert!(cl.backspace());
        assert_eq!(cl.input(), "ab");
        cl.move_home();
        assert!(!cl.backspace());
    }

    #[test]
    fn insert_in_middle_with_multibyte() {
        let mut cl = typed("aé");
        cl.move_left();
        cl.insert_char('x');
        assert_eq!(cl.input(), "axé");
        cl.move_end();
        assert!(!cl.delete());
        cl.move_home();
        assert!(cl.delete());
        assert_eq!(cl.input(), "xé");
    }

    #[test]
    fn take_clears() {
        let mut cl = typed("set ascii");
        assert_eq!(cl.take(), "set ascii");
        assert!(cl.is_empty());
        assert_eq!(cl.cursor(), 0);
    }

    // -- history --------------------------------------------------------------

    #[test]
    fn browse_history_and_back() {
        let entries = ["newest".to_string(), "older".to_string()];
        let lookup = |n: usize| entries.get(n).cloned();
        let mut cl = typed("dra");

        assert!(!cl.history_newer(lookup));
        assert!(cl.history_older(lookup));
        assert_eq!(cl.input(), "newest");
        assert_eq!(cl.cursor(), 6);
        assert!(cl.history_older(lookup));
        assert_eq!(cl.input(), "older");
        assert!(!cl.history_older(lookup));
        assert_eq!(cl.input(), "older");

        assert!(cl.history_newer(lookup));
        assert_eq!(cl.input(), "newest");
        assert!(cl.history_newer(lookup));
        assert_eq!(cl.input(), "dra");
        assert!(!cl.history_newer(lookup));
    }

    #[test]
    fn empty_history() {
        let mut cl = CommandLine::new();
        assert!(!cl.history_older(|_| None));
        assert!(cl.is_empty());
    }

    // -- parsing --------------------------------------------------------------

    #[test]
    fn quit_aliases() {
        for q in ["q", "q!", "quit", "wq", "wq!", "x", "exit", "ZZ", "  q  "] {
            assert_eq!(parse_command(q), Command::Quit, "{q}");
        }
    }

    #[test]
    fn absolute_addresses() {
        assert_eq!(parse_command("1234"), Command::Goto(Address::At(1234)));
        assert_eq!(parse_command("0x4d2"), Command::Goto(Address::At(0x4d2)));
        assert_eq!(parse_command("0X4D2"), Command::Goto(Address::At(0x4d2)));
        assert_eq!(parse_command("$"), Command::Goto(Address::End));
    }

    #[test]
    fn relative_addresses() {
        assert_eq!(parse_command("+16"), Command::Forward(16));
        assert_eq!(parse_command("-0x10"), Command::Back(16));
        assert_eq!(parse_command("+"), Command::Unknown("+".into()));
    }

    #[test]
    fn set_and_view() {
        assert_eq!(parse_command("set noascii"), Command::Set("noascii".into()));
        assert_eq!(parse_command("set"), Command::Set(String::new()));
        assert_eq!(parse_command("view 3"), Command::View(ViewMode::Words16Swapped));
        assert!(matches!(parse_command("view 9"), Command::Invalid(_)));
        assert!(matches!(parse_command("view"), Command::Invalid(_)));
    }

    #[test]
    fn unknown_and_empty() {
        assert_eq!(parse_command(""), Command::Empty);
        assert_eq!(parse_command("   "), Command::Empty);
        assert_eq!(parse_command("frob"), Command::Unknown("frob".into()));
        assert_eq!(parse_command("12ab"), Command::Unknown("12ab".into()));
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_number("0"), Some(0));
        assert_eq!(parse_number("0xff"), Some(255));
        assert_eq!(parse_number("ff"), None);
        assert_eq!(parse_number("+5"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("99999999999999999999999"), None);
    }
}
